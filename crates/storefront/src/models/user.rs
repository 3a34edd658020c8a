//! User domain types.
//!
//! The authenticated-user record returned by `/api/auth/login` and
//! `/api/auth/me`.

use serde::{Deserialize, Serialize};

use yummeal_core::{AddressId, Email, UserId};

/// The signed-in customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Backend user ID (document stores send `_id`).
    #[serde(alias = "_id")]
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email address.
    pub email: Email,
    /// Saved delivery addresses.
    #[serde(default)]
    pub addresses: Vec<Address>,
}

impl User {
    /// The address to deliver to by default.
    ///
    /// Prefers the address flagged as default, then the first saved one.
    #[must_use]
    pub fn default_address(&self) -> Option<&Address> {
        self.addresses
            .iter()
            .find(|address| address.is_default)
            .or_else(|| self.addresses.first())
    }
}

/// A saved delivery address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(alias = "_id")]
    pub id: AddressId,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    /// Whether this is the customer's default address.
    #[serde(rename = "default", default)]
    pub is_default: bool,
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, {}, {} {}",
            self.street, self.city, self.state, self.zip_code
        )
    }
}
