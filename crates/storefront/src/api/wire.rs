//! Request and response bodies of the catalog API.

use serde::{Deserialize, Serialize};

use crate::models::{Restaurant, User};

/// `GET /api/restaurants`
#[derive(Debug, Deserialize)]
pub(super) struct RestaurantsResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Vec<Restaurant>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `POST /api/auth/login`
#[derive(Serialize)]
pub(super) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Deserialize)]
pub(super) struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// `POST /api/auth/signup`
#[derive(Serialize)]
pub(super) struct SignupRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Body of a non-success response.
#[derive(Debug, Deserialize)]
pub(super) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_listing_without_data() {
        let response: RestaurantsResponse =
            serde_json::from_str(r#"{"success": false, "message": "No restaurants"}"#).unwrap();
        assert!(!response.success);
        assert!(response.data.is_empty());
        assert_eq!(response.message.as_deref(), Some("No restaurants"));
    }

    #[test]
    fn test_login_request_body() {
        let body = serde_json::to_value(LoginRequest {
            email: "user@example.com",
            password: "hunter22",
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"email": "user@example.com", "password": "hunter22"})
        );
    }
}
