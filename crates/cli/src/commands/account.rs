//! Session commands.
//!
//! # Usage
//!
//! ```bash
//! YUMMEAL_PASSWORD=... yummeal signup -n "Ada" -e ada@example.com
//! yummeal login -e ada@example.com -p ...
//! yummeal whoami
//! yummeal logout
//! ```
//!
//! The session token is stored in `YUMMEAL_TOKEN_PATH` (default: the
//! platform data directory) and reused by later commands.

use secrecy::SecretString;
use yummeal_storefront::models::User;
use yummeal_storefront::{Store, StoreConfig};

use super::CommandError;

fn print_user(user: &User) {
    println!("{} <{}>", user.name, user.email);
    if let Some(address) = user.default_address() {
        println!("Delivers to {address}");
    }
}

/// Sign in and store the session token.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or login fails.
pub async fn login(
    config: &StoreConfig,
    email: &str,
    password: SecretString,
) -> Result<(), CommandError> {
    let store = Store::open(config).await?;
    let user = store.try_login(email, &password).await?;

    print!("Logged in as ");
    print_user(&user);
    Ok(())
}

/// Create an account, then sign in.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or signup fails.
pub async fn signup(
    config: &StoreConfig,
    name: &str,
    email: &str,
    password: SecretString,
) -> Result<(), CommandError> {
    let store = Store::open(config).await?;
    let user = store.try_signup(name, email, &password).await?;

    print!("Welcome, ");
    print_user(&user);
    Ok(())
}

/// Forget the stored session.
///
/// # Errors
///
/// Returns an error if the store cannot be opened.
pub async fn logout(config: &StoreConfig) -> Result<(), CommandError> {
    let store = Store::open(config).await?;
    store.logout();
    println!("Logged out");
    Ok(())
}

/// Show the customer the stored session belongs to.
///
/// # Errors
///
/// Returns an error if the store cannot be opened.
pub async fn whoami(config: &StoreConfig) -> Result<(), CommandError> {
    let store = Store::open(config).await?;
    match store.session() {
        Some(user) => print_user(&user),
        None => println!("Not logged in"),
    }
    Ok(())
}
