//! Storefront error types and Sentry helpers.
//!
//! Store operations absorb failures into state (a `false` login, an error
//! string on the restaurant list). These types carry the cause for callers
//! that want it and for logging.

use thiserror::Error;

use yummeal_core::EmailError;

use crate::api::ApiError;
use crate::token_store::TokenStoreError;

/// Errors that can occur while opening a [`Store`](crate::Store).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The API client could not be built.
    #[error("API client error: {0}")]
    Api(#[from] ApiError),

    /// Token storage is unavailable.
    #[error("Token storage error: {0}")]
    TokenStore(#[from] TokenStoreError),
}

/// Why a login or signup did not produce a session.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The email address is not well-formed.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The API call failed or rejected the credentials.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// The token could not be persisted.
    #[error("could not save session: {0}")]
    TokenStore(#[from] TokenStoreError),
}

impl AuthError {
    /// A message fit for showing to the customer.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidEmail(_) => "Invalid email address".to_string(),
            Self::Api(ApiError::Api { message, .. }) => message.clone(),
            Self::Api(_) => "Could not reach the server, please try again".to_string(),
            Self::TokenStore(_) => "Could not save your session".to_string(),
        }
    }
}

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for a customer action.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added item", Some(&[("item_id", "3")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
