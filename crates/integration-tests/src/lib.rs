//! Integration tests for the Yummeal storefront.
//!
//! Tests run the real [`Store`] against [`FakeCatalogApi`], an in-process
//! implementation of the catalog REST API served by `axum` on an ephemeral
//! local port. No external services are needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p yummeal-integration-tests
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! let api = FakeCatalogApi::start().await?;
//! api.set_restaurants("Chicago", vec![restaurant("1", "Green Garden", "Vegan", "Chicago")]);
//!
//! let store = api.store(Arc::new(MemoryTokenStore::new()));
//! store.update_location("Chicago");
//! store.wait_for_restaurants().await;
//! ```

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

use yummeal_storefront::{CatalogClient, Store, StoreConfig, TokenStore};

/// Processing delay used by stores built with [`FakeCatalogApi::store`].
pub const TEST_ORDER_DELAY: Duration = Duration::from_millis(100);

/// A 200 body that is not JSON at all.
const GARBLED_BODY: &str = "<html><body>502 Bad Gateway</body></html>";

/// A restaurant record as the catalog API sends it.
#[must_use]
pub fn restaurant(id: &str, name: &str, cuisine: &str, location: &str) -> Value {
    json!({
        "_id": id,
        "name": name,
        "image": format!("https://images.example/{id}.jpg"),
        "rating": 4.5,
        "deliveryTime": "20-30 min",
        "deliveryFee": "$1.99",
        "cuisine": cuisine,
        "location": location,
    })
}

// =============================================================================
// Fake API state
// =============================================================================

#[derive(Clone)]
struct Account {
    id: String,
    name: String,
    email: String,
    password: String,
}

impl Account {
    fn to_json(&self) -> Value {
        json!({
            "_id": self.id,
            "name": self.name,
            "email": self.email,
            "addresses": [{
                "_id": format!("{}-home", self.id),
                "street": "12 MG Road",
                "city": "Vijayawada",
                "state": "AP",
                "zipCode": "520010",
                "default": true,
            }],
        })
    }
}

/// How the fake answers a restaurant listing for one location.
#[derive(Clone)]
enum Listing {
    Restaurants(Vec<Value>),
    /// 200 with `success: false`.
    Rejected(String),
    /// 500 with an error body.
    ServerError,
    /// 200 with a body that is not JSON.
    Garbled,
}

#[derive(Default)]
struct FakeState {
    accounts: Mutex<Vec<Account>>,
    tokens: Mutex<HashMap<String, String>>,
    listings: Mutex<HashMap<String, Listing>>,
    delays: Mutex<HashMap<String, Duration>>,
    revoked: Mutex<HashSet<String>>,
    me_delay: Mutex<Option<Duration>>,
    garbled_auth: AtomicBool,
    restaurant_requests: Mutex<Vec<String>>,
    login_requests: AtomicUsize,
    signup_requests: AtomicUsize,
    next_id: AtomicUsize,
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl FakeState {
    fn next_id(&self) -> usize {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn issue_token(&self, email: &str) -> String {
        let token = format!("token-{}", self.next_id());
        lock(&self.tokens).insert(token.clone(), email.to_string());
        token
    }

    fn account_by_email(&self, email: &str) -> Option<Account> {
        lock(&self.accounts)
            .iter()
            .find(|a| a.email == email)
            .cloned()
    }
}

// =============================================================================
// FakeCatalogApi
// =============================================================================

/// In-process catalog API.
///
/// Unknown locations list no restaurants. The server stops when dropped.
pub struct FakeCatalogApi {
    addr: SocketAddr,
    state: Arc<FakeState>,
    server: JoinHandle<()>,
}

impl FakeCatalogApi {
    /// Bind to an ephemeral port and start serving.
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn start() -> std::io::Result<Self> {
        let state = Arc::new(FakeState::default());
        let app = Router::new()
            .route("/api/restaurants", get(list_restaurants))
            .route("/api/auth/login", post(login))
            .route("/api/auth/signup", post(signup))
            .route("/api/auth/me", get(me))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            addr,
            state,
            server,
        })
    }

    /// Base URL of the running server.
    #[must_use]
    pub fn url(&self) -> Url {
        Url::parse(&format!("http://{}/", self.addr)).expect("socket address forms a valid URL")
    }

    /// Store configuration pointing at this server with a short order delay.
    #[must_use]
    pub fn config(&self) -> StoreConfig {
        let mut config = StoreConfig::with_api_url(self.url());
        config.order_processing_delay = TEST_ORDER_DELAY;
        config
    }

    /// A store talking to this server. Not bootstrapped.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn store(&self, tokens: Arc<dyn TokenStore>) -> Store {
        let config = self.config();
        let api =
            CatalogClient::new(config.api_base_url.clone()).expect("Failed to build catalog client");
        Store::new(&config, api, tokens)
    }

    /// Register an account directly. Returns its user ID.
    pub fn add_user(&self, name: &str, email: &str, password: &str) -> String {
        let id = format!("user-{}", self.state.next_id());
        lock(&self.state.accounts).push(Account {
            id: id.clone(),
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        });
        id
    }

    /// A valid token for the account with `email`, as login would return.
    pub fn issue_token(&self, email: &str) -> String {
        self.state.issue_token(email)
    }

    /// Make `token` fail validation.
    pub fn revoke_token(&self, token: &str) {
        lock(&self.state.revoked).insert(token.to_string());
    }

    /// Serve `restaurants` for `location`.
    pub fn set_restaurants(&self, location: &str, restaurants: Vec<Value>) {
        lock(&self.state.listings).insert(location.to_string(), Listing::Restaurants(restaurants));
    }

    /// Answer `location` with `success: false` and `message`.
    pub fn reject_location(&self, location: &str, message: &str) {
        lock(&self.state.listings).insert(location.to_string(), Listing::Rejected(message.to_string()));
    }

    /// Answer `location` with a 500.
    pub fn fail_location(&self, location: &str) {
        lock(&self.state.listings).insert(location.to_string(), Listing::ServerError);
    }

    /// Answer `location` with 200 and a body that is not JSON.
    pub fn garble_location(&self, location: &str) {
        lock(&self.state.listings).insert(location.to_string(), Listing::Garbled);
    }

    /// Make login and token validation answer 200 with a body that has the
    /// wrong shape. Signup is unaffected.
    pub fn garble_auth(&self) {
        self.state.garbled_auth.store(true, Ordering::SeqCst);
    }

    /// Hold token validation responses for `delay`.
    pub fn delay_me(&self, delay: Duration) {
        *lock(&self.state.me_delay) = Some(delay);
    }

    /// Hold responses for `location` for `delay`.
    pub fn delay_location(&self, location: &str, delay: Duration) {
        lock(&self.state.delays).insert(location.to_string(), delay);
    }

    /// Locations requested so far, in request order.
    #[must_use]
    pub fn restaurant_requests(&self) -> Vec<String> {
        lock(&self.state.restaurant_requests).clone()
    }

    #[must_use]
    pub fn login_requests(&self) -> usize {
        self.state.login_requests.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn signup_requests(&self) -> usize {
        self.state.signup_requests.load(Ordering::SeqCst)
    }

    /// The user record the API returns for `email`.
    #[must_use]
    pub fn user_json(&self, email: &str) -> Option<Value> {
        self.state.account_by_email(email).map(|a| a.to_json())
    }
}

impl Drop for FakeCatalogApi {
    fn drop(&mut self) {
        self.server.abort();
    }
}

// =============================================================================
// Handlers
// =============================================================================

#[derive(Deserialize)]
struct LocationQuery {
    #[serde(default)]
    location: String,
}

async fn list_restaurants(
    State(state): State<Arc<FakeState>>,
    Query(query): Query<LocationQuery>,
) -> Response {
    lock(&state.restaurant_requests).push(query.location.clone());

    let delay = lock(&state.delays).get(&query.location).copied();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let listing = lock(&state.listings).get(&query.location).cloned();
    match listing {
        Some(Listing::Restaurants(data)) => {
            (StatusCode::OK, Json(json!({"success": true, "data": data}))).into_response()
        }
        Some(Listing::Rejected(message)) => (
            StatusCode::OK,
            Json(json!({"success": false, "message": message})),
        )
            .into_response(),
        Some(Listing::ServerError) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"success": false, "message": "Server error"})),
        )
            .into_response(),
        Some(Listing::Garbled) => (StatusCode::OK, GARBLED_BODY).into_response(),
        None => (StatusCode::OK, Json(json!({"success": true, "data": []}))).into_response(),
    }
}

/// A 200 whose JSON matches neither the auth response nor a user record.
fn wrong_shape() -> Response {
    (StatusCode::OK, Json(json!({"success": true, "data": null}))).into_response()
}

#[derive(Deserialize)]
struct Credentials {
    email: String,
    password: String,
}

async fn login(
    State(state): State<Arc<FakeState>>,
    Json(body): Json<Credentials>,
) -> Response {
    state.login_requests.fetch_add(1, Ordering::SeqCst);

    match state.account_by_email(&body.email) {
        Some(_) if state.garbled_auth.load(Ordering::SeqCst) => wrong_shape(),
        Some(account) if account.password == body.password => {
            let token = state.issue_token(&account.email);
            (
                StatusCode::OK,
                Json(json!({"token": token, "user": account.to_json()})),
            )
                .into_response()
        }
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid credentials"})),
        )
            .into_response(),
    }
}

#[derive(Deserialize)]
struct Registration {
    name: String,
    email: String,
    password: String,
}

async fn signup(
    State(state): State<Arc<FakeState>>,
    Json(body): Json<Registration>,
) -> (StatusCode, Json<Value>) {
    state.signup_requests.fetch_add(1, Ordering::SeqCst);

    if state.account_by_email(&body.email).is_some() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "User already exists"})),
        );
    }

    let id = format!("user-{}", state.next_id());
    lock(&state.accounts).push(Account {
        id,
        name: body.name,
        email: body.email,
        password: body.password,
    });
    (
        StatusCode::CREATED,
        Json(json!({"message": "User registered successfully"})),
    )
}

async fn me(State(state): State<Arc<FakeState>>, headers: HeaderMap) -> Response {
    let delay = *lock(&state.me_delay);
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    if state.garbled_auth.load(Ordering::SeqCst) {
        return wrong_shape();
    }

    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or_default();

    let unauthorized = || {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid token"})),
        )
            .into_response()
    };

    if lock(&state.revoked).contains(token) {
        return unauthorized();
    }
    let email = lock(&state.tokens).get(token).cloned();
    match email.and_then(|email| state.account_by_email(&email)) {
        Some(account) => (StatusCode::OK, Json(account.to_json())).into_response(),
        None => unauthorized(),
    }
}
