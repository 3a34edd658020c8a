//! Remote catalog API client.
//!
//! Thin typed wrapper over the Yummeal REST API: restaurant listings per
//! location and token-based authentication. Responses are read as text first
//! so failures can be logged with the body that caused them.

mod wire;

use std::sync::Arc;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error, instrument, warn};
use url::Url;

use yummeal_core::Email;

use crate::models::{Restaurant, User};

use wire::{ErrorBody, LoginRequest, LoginResponse, RestaurantsResponse, SignupRequest};

/// Longest body excerpt written to logs.
const LOG_BODY_LIMIT: usize = 500;

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or the body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The API answered 2xx but reported `success: false`.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The response body did not have the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An endpoint URL could not be built from the base URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// HTTP status of an API error response, if this is one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A freshly authenticated session.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: SecretString,
    pub user: User,
}

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the catalog API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

#[derive(Debug)]
struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl CatalogClient {
    /// Create a client for the API at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be initialised.
    pub fn new(base_url: Url) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("yummeal/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_client(client, base_url))
    }

    /// Create a client that reuses an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(client: reqwest::Client, mut base_url: Url) -> Self {
        // Endpoints are joined as relative paths, so the base must end in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self {
            inner: Arc::new(CatalogClientInner { client, base_url }),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Fetch the restaurants serving `location`.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, non-success statuses, `success: false`
    /// and malformed bodies.
    #[instrument(skip(self), fields(location = %location))]
    pub async fn restaurants(&self, location: &str) -> Result<Vec<Restaurant>, ApiError> {
        let request = self
            .inner
            .client
            .get(self.endpoint("api/restaurants")?)
            .query(&[("location", location)]);

        let response: RestaurantsResponse = self.send(request).await?;
        if !response.success {
            let message = response
                .message
                .unwrap_or_else(|| "Failed to fetch restaurants".to_string());
            warn!(message = %message, "Restaurant listing rejected");
            return Err(ApiError::Rejected(message));
        }

        debug!(count = response.data.len(), "Fetched restaurants");
        Ok(response.data)
    }

    /// Exchange credentials for a token and the user record.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, rejected credentials and malformed bodies.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<AuthSession, ApiError> {
        let request = self
            .inner
            .client
            .post(self.endpoint("api/auth/login")?)
            .json(&LoginRequest {
                email: email.as_str(),
                password: password.expose_secret(),
            });

        let response: LoginResponse = self.send(request).await?;
        Ok(AuthSession {
            token: SecretString::from(response.token),
            user: response.user,
        })
    }

    /// Register a new account. The response body is not used.
    ///
    /// # Errors
    ///
    /// Fails on transport errors and non-success statuses.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn signup(
        &self,
        name: &str,
        email: &Email,
        password: &SecretString,
    ) -> Result<(), ApiError> {
        let request = self
            .inner
            .client
            .post(self.endpoint("api/auth/signup")?)
            .json(&SignupRequest {
                name,
                email: email.as_str(),
                password: password.expose_secret(),
            });

        self.send_raw(request).await.map(|_| ())
    }

    /// Fetch the user a token belongs to.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, invalid tokens and malformed bodies.
    #[instrument(skip_all)]
    pub async fn me(&self, token: &SecretString) -> Result<User, ApiError> {
        let request = self
            .inner
            .client
            .get(self.endpoint("api/auth/me")?)
            .bearer_auth(token.expose_secret());

        self.send(request).await
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// Send a request and parse a successful JSON body.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let body = self.send_raw(request).await?;

        serde_json::from_str(&body).map_err(|e| {
            error!(
                error = %e,
                body = %excerpt(&body),
                "Failed to parse catalog API response"
            );
            ApiError::Parse(e)
        })
    }

    /// Send a request and return the body of a successful response.
    async fn send_raw(&self, request: reqwest::RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = error_message(status, &body);
            warn!(
                status = %status,
                message = %message,
                "Catalog API returned non-success status"
            );
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }
}

/// The `message` of an error body, or the status reason.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        })
}

fn excerpt(body: &str) -> String {
    body.chars().take(LOG_BODY_LIMIT).collect()
}
