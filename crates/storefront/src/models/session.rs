//! Session-related keys.
//!
//! The durable key-value store holds exactly one entry for the session.

/// Keys used in the persistent key-value store.
pub mod keys {
    /// Key for the authentication token returned by login.
    pub const AUTH_TOKEN: &str = "token";
}
