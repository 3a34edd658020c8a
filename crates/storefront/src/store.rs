//! The session and cart store.
//!
//! [`Store`] owns the signed-in user, the restaurant list for the current
//! location and the cart. Consumers read cloned [`StoreState`] snapshots or
//! subscribe to changes, and mutate only through the store's methods.
//!
//! # Concurrency
//!
//! State lives in a `tokio::sync::watch` channel. Every mutation is a single
//! `send_modify` closure, so subscribers always see a consistent state and no
//! lock is held across an `.await`.
//!
//! Restaurant listings are fetched on spawned tasks. Changing the location
//! aborts the in-flight fetch and bumps a generation counter; a listing that
//! arrives for an older generation is dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tracing::{debug, info, instrument, warn};

use yummeal_core::{DeliveryMethod, Email, FoodItemId, Price, RestaurantId};

use crate::api::{ApiError, CatalogClient};
use crate::catalog;
use crate::checkout::{CheckoutError, OrderConfirmation, OrderSummary};
use crate::config::StoreConfig;
use crate::error::{AuthError, StoreError, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::models::{Cart, FoodItem, Restaurant, User};
use crate::token_store::{FileTokenStore, TokenStore};

/// Number of restaurants shown as "featured".
pub const FEATURED_RESTAURANT_COUNT: usize = 4;

/// Error shown when the restaurant listing cannot be loaded.
pub const RESTAURANTS_ERROR: &str = "Failed to load restaurants. Please try again later.";

// =============================================================================
// StoreState
// =============================================================================

/// Everything the store holds, as seen by one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreState {
    /// The signed-in user; `None` when logged out.
    pub session: Option<User>,
    /// True until the startup session check has finished.
    pub is_loading: bool,
    /// Restaurants serving `location`, as last returned by the API.
    pub restaurants: Vec<Restaurant>,
    /// True while a restaurant fetch is outstanding.
    pub loading_restaurants: bool,
    /// Message from the last failed restaurant fetch.
    pub error: Option<String>,
    pub location: String,
    pub cart: Cart,
    generation: u64,
}

impl StoreState {
    fn new(location: String) -> Self {
        Self {
            session: None,
            is_loading: true,
            restaurants: Vec::new(),
            loading_restaurants: true,
            error: None,
            location,
            cart: Cart::new(),
            generation: 0,
        }
    }

    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn cart_total(&self) -> Price {
        self.cart.total()
    }

    #[must_use]
    pub fn cart_item_count(&self) -> u32 {
        self.cart.item_count()
    }

    /// The first few restaurants of the current list.
    #[must_use]
    pub fn featured_restaurants(&self) -> &[Restaurant] {
        self.restaurants
            .get(..FEATURED_RESTAURANT_COUNT)
            .unwrap_or(&self.restaurants)
    }

    #[must_use]
    pub fn find_restaurant(&self, id: &RestaurantId) -> Option<&Restaurant> {
        self.restaurants.iter().find(|r| &r.id == id)
    }

    /// Number of restaurant fetches started so far.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

// =============================================================================
// Store
// =============================================================================

/// Shared handle to the storefront state.
///
/// Cheap to clone; all clones observe and mutate the same state. Operations
/// that fetch restaurants spawn Tokio tasks and need a running runtime.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    api: CatalogClient,
    tokens: Arc<dyn TokenStore>,
    state: watch::Sender<StoreState>,
    restaurant_fetch: Mutex<Option<AbortHandle>>,
    bootstrapped: AtomicBool,
    order_processing_delay: Duration,
}

impl Store {
    /// Create a store. Nothing is fetched until [`bootstrap`](Self::bootstrap).
    #[must_use]
    pub fn new(config: &StoreConfig, api: CatalogClient, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                api,
                tokens,
                state: watch::Sender::new(StoreState::new(config.default_location.clone())),
                restaurant_fetch: Mutex::new(None),
                bootstrapped: AtomicBool::new(false),
                order_processing_delay: config.order_processing_delay,
            }),
        }
    }

    /// Build a store from configuration and run the startup sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if the API client cannot be built or no token file
    /// location is available.
    pub async fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let api = CatalogClient::new(config.api_base_url.clone())?;
        let tokens = match &config.token_path {
            Some(path) => FileTokenStore::new(path),
            None => FileTokenStore::in_data_dir()?,
        };
        debug!(path = %tokens.path().display(), "Using token file");

        let store = Self::new(config, api, Arc::new(tokens));
        store.bootstrap().await;
        Ok(store)
    }

    /// Startup sequence: start loading restaurants for the current location
    /// and restore the session from a stored token.
    ///
    /// Runs once per store; later calls return immediately.
    pub async fn bootstrap(&self) {
        if self.inner.bootstrapped.swap(true, Ordering::SeqCst) {
            return;
        }

        self.start_restaurant_fetch(None);
        self.restore_session().await;
        self.inner.state.send_modify(|state| state.is_loading = false);
    }

    async fn restore_session(&self) {
        let token = match self.inner.tokens.get() {
            Ok(Some(token)) => token,
            Ok(None) => {
                debug!("No stored session token");
                return;
            }
            Err(e) => {
                warn!(error = %e, "Could not read stored session token");
                return;
            }
        };

        let result = self.inner.api.me(&token).await;

        // A login or logout while validating replaced the token
        if !self.token_is_current(&token) {
            debug!("Session token changed during validation, discarding the result");
            return;
        }

        match result {
            Ok(user) => {
                info!(user_id = %user.id, "Session restored");
                set_sentry_user(&user.id, Some(user.email.as_str()));
                self.inner.state.send_modify(|state| state.session = Some(user));
            }
            Err(e) => {
                warn!(error = %e, "Stored session token rejected, discarding it");
                if let Err(e) = self.inner.tokens.remove() {
                    warn!(error = %e, "Failed to remove stored session token");
                }
            }
        }
    }

    fn token_is_current(&self, token: &SecretString) -> bool {
        matches!(
            self.inner.tokens.get(),
            Ok(Some(current)) if current.expose_secret() == token.expose_secret()
        )
    }

    // -------------------------------------------------------------------------
    // Authentication
    // -------------------------------------------------------------------------

    /// Log in. Returns whether a session was established.
    ///
    /// Failures leave the store untouched and are only logged; use
    /// [`try_login`](Self::try_login) for the cause.
    pub async fn login(&self, email: &str, password: &SecretString) -> bool {
        match self.try_login(email, password).await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "Login failed");
                false
            }
        }
    }

    /// Log in, reporting why it failed.
    ///
    /// The token is persisted before the session is set, so a storage
    /// failure leaves the store logged out.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed email, a failed or rejected API call,
    /// or a token that cannot be stored.
    #[instrument(skip(self, password))]
    pub async fn try_login(&self, email: &str, password: &SecretString) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        let session = self.inner.api.login(&email, password).await?;
        self.inner.tokens.set(&session.token)?;

        let user = session.user;
        info!(user_id = %user.id, "Logged in");
        set_sentry_user(&user.id, Some(user.email.as_str()));
        add_breadcrumb("auth", "Logged in", None);

        let stored = user.clone();
        self.inner.state.send_modify(|state| state.session = Some(stored));
        Ok(user)
    }

    /// Create an account and log in with it. Returns whether a session was
    /// established.
    pub async fn signup(&self, name: &str, email: &str, password: &SecretString) -> bool {
        match self.try_signup(name, email, password).await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "Signup failed");
                false
            }
        }
    }

    /// Create an account and log in with it, reporting why it failed.
    ///
    /// # Errors
    ///
    /// Returns an error if registration or the follow-up login fails.
    #[instrument(skip(self, password))]
    pub async fn try_signup(
        &self,
        name: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<User, AuthError> {
        let parsed = Email::parse(email)?;
        self.inner.api.signup(name, &parsed, password).await?;
        info!("Account created");

        self.try_login(email, password).await
    }

    /// End the session: forget the token, the user and the cart.
    pub fn logout(&self) {
        if let Err(e) = self.inner.tokens.remove() {
            warn!(error = %e, "Failed to remove stored session token");
        }

        clear_sentry_user();
        add_breadcrumb("auth", "Logged out", None);
        self.inner.state.send_modify(|state| {
            state.session = None;
            state.cart.clear();
        });
        info!("Logged out");
    }

    // -------------------------------------------------------------------------
    // Cart
    // -------------------------------------------------------------------------

    /// Add one unit of `item` to the cart.
    pub fn add_to_cart(&self, item: &FoodItem) {
        self.inner.state.send_modify(|state| state.cart.add(item));
        debug!(item_id = %item.id, "Added to cart");
        add_breadcrumb("cart", "Added item", Some(&[("item_id", item.id.as_str())]));
    }

    /// Remove the cart line for `item_id`, if any.
    pub fn remove_from_cart(&self, item_id: &FoodItemId) {
        if self
            .inner
            .state
            .send_if_modified(|state| state.cart.remove(item_id))
        {
            debug!(item_id = %item_id, "Removed from cart");
            add_breadcrumb("cart", "Removed item", Some(&[("item_id", item_id.as_str())]));
        }
    }

    /// Set the quantity of a cart line. Zero or less removes the line.
    pub fn update_quantity(&self, item_id: &FoodItemId, quantity: i64) {
        if self
            .inner
            .state
            .send_if_modified(|state| state.cart.set_quantity(item_id, quantity))
        {
            debug!(item_id = %item_id, quantity, "Cart quantity updated");
        }
    }

    // -------------------------------------------------------------------------
    // Restaurants
    // -------------------------------------------------------------------------

    /// Switch to `location` and reload its restaurants in the background.
    pub fn update_location(&self, location: impl Into<String>) {
        let location = location.into();
        info!(location = %location, "Location changed");
        add_breadcrumb("location", "Changed location", Some(&[("location", location.as_str())]));
        self.start_restaurant_fetch(Some(location));
    }

    /// Start a fetch for `location` (or the current one), superseding any
    /// fetch in flight.
    fn start_restaurant_fetch(&self, location: Option<String>) {
        // Held while the generation is bumped and the task registered, so
        // concurrent callers cannot abort each other's newer fetch.
        let mut slot = self
            .inner
            .restaurant_fetch
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut generation = 0;
        let mut fetch_location = String::new();
        self.inner.state.send_modify(|state| {
            if let Some(location) = location {
                state.location = location;
            }
            state.generation += 1;
            state.loading_restaurants = true;
            state.error = None;
            generation = state.generation;
            fetch_location.clone_from(&state.location);
        });

        let api = self.inner.api.clone();
        let inner = Arc::downgrade(&self.inner);
        let task = tokio::spawn(async move {
            let result = api.restaurants(&fetch_location).await;
            finish_restaurant_fetch(&inner, generation, &fetch_location, result);
        });

        if let Some(previous) = slot.replace(task.abort_handle()) {
            previous.abort();
        }
    }

    /// Wait until no restaurant fetch is outstanding.
    ///
    /// A store that was never bootstrapped has not started its first fetch,
    /// so this waits for [`bootstrap`](Self::bootstrap) to be called.
    pub async fn wait_for_restaurants(&self) {
        let mut receiver = self.inner.state.subscribe();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = receiver.wait_for(|state| !state.loading_restaurants).await;
    }

    // -------------------------------------------------------------------------
    // Checkout
    // -------------------------------------------------------------------------

    /// Price the current cart.
    #[must_use]
    pub fn checkout_summary(&self, method: DeliveryMethod) -> OrderSummary {
        OrderSummary::for_cart(&self.inner.state.borrow().cart, method)
    }

    /// Place an order for the current cart.
    ///
    /// After the simulated payment delay the ordered quantities are taken out
    /// of the cart; anything added meanwhile stays.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::NotAuthenticated` when logged out and
    /// `CheckoutError::EmptyCart` when there is nothing to order.
    pub async fn place_order(
        &self,
        method: DeliveryMethod,
    ) -> Result<OrderConfirmation, CheckoutError> {
        let confirmation = {
            let state = self.inner.state.borrow();
            if state.session.is_none() {
                return Err(CheckoutError::NotAuthenticated);
            }
            if state.cart.is_empty() {
                return Err(CheckoutError::EmptyCart);
            }
            OrderConfirmation::new(&state.cart, method)
        };

        info!(
            order_id = %confirmation.id,
            total = %confirmation.summary.total,
            method = %method,
            "Processing order"
        );
        tokio::time::sleep(self.inner.order_processing_delay).await;

        self.inner.state.send_modify(|state| {
            for line in &confirmation.lines {
                let remaining = state
                    .cart
                    .line(&line.item.id)
                    .map_or(0, |current| i64::from(current.quantity) - i64::from(line.quantity));
                state.cart.set_quantity(&line.item.id, remaining);
            }
        });

        info!(order_id = %confirmation.id, "Order placed");
        add_breadcrumb(
            "checkout",
            "Placed order",
            Some(&[("order_id", confirmation.id.to_string().as_str())]),
        );
        Ok(confirmation)
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// A copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> StoreState {
        self.inner.state.borrow().clone()
    }

    /// Receive every subsequent state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.inner.state.subscribe()
    }

    #[must_use]
    pub fn session(&self) -> Option<User> {
        self.inner.state.borrow().session.clone()
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.inner.state.borrow().is_logged_in()
    }

    #[must_use]
    pub fn cart(&self) -> Cart {
        self.inner.state.borrow().cart.clone()
    }

    #[must_use]
    pub fn cart_total(&self) -> Price {
        self.inner.state.borrow().cart_total()
    }

    #[must_use]
    pub fn cart_item_count(&self) -> u32 {
        self.inner.state.borrow().cart_item_count()
    }

    #[must_use]
    pub fn location(&self) -> String {
        self.inner.state.borrow().location.clone()
    }

    #[must_use]
    pub fn restaurants(&self) -> Vec<Restaurant> {
        self.inner.state.borrow().restaurants.clone()
    }

    #[must_use]
    pub fn featured_restaurants(&self) -> Vec<Restaurant> {
        self.inner.state.borrow().featured_restaurants().to_vec()
    }

    #[must_use]
    pub fn find_restaurant(&self, id: &RestaurantId) -> Option<Restaurant> {
        self.inner.state.borrow().find_restaurant(id).cloned()
    }

    /// Highlighted items from the bundled catalog.
    #[must_use]
    pub fn popular_items(&self) -> &'static [FoodItem] {
        catalog::popular_items()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("api", &self.inner.api.base_url().as_str())
            .field("state", &*self.inner.state.borrow())
            .finish_non_exhaustive()
    }
}

/// Apply a finished restaurant fetch, unless a newer one has started.
fn finish_restaurant_fetch(
    inner: &Weak<StoreInner>,
    generation: u64,
    location: &str,
    result: Result<Vec<Restaurant>, ApiError>,
) {
    let Some(inner) = inner.upgrade() else {
        return;
    };

    if let Err(e) = &result {
        warn!(location = %location, error = %e, "Failed to load restaurants");
    }

    let applied = inner.state.send_if_modified(|state| {
        if state.generation != generation {
            return false;
        }

        match result {
            Ok(restaurants) => {
                state.restaurants = restaurants;
                state.error = None;
            }
            Err(_) => {
                state.restaurants.clear();
                state.error = Some(RESTAURANTS_ERROR.to_string());
            }
        }
        state.loading_restaurants = false;
        true
    });

    if applied {
        debug!(location = %location, "Restaurant list updated");
    } else {
        debug!(location = %location, "Discarding superseded restaurant listing");
    }
}
