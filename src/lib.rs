//! Account Deletion Service Library
//!
//! Authenticates a caller, purges their data, revokes any Apple grant and
//! deletes the identity. Exposed as a library for testing and reuse.

pub mod clients;
pub mod config;
pub mod constants;
pub mod deletion;
pub mod error;
pub mod models;
pub mod routes;

pub use config::Config;
pub use deletion::{AccountDeleter, DeletionMode};
pub use error::{AppError, Result};

use std::any::Any;
use std::sync::Arc;

use axum::{
    http::{HeaderName, Method},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tokio_util::task::TaskTracker;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    trace::TraceLayer,
};

use clients::{AppleRevoker, PostgrestStore, SupabaseAuthority, TokenRevoker};
use constants::CORS_ALLOW_HEADERS;
use routes::{delete_account, health_check};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub deleter: AccountDeleter,
    /// Owns detached deletions so they outlive their request
    pub tasks: TaskTracker,
}

impl AppState {
    /// Create a new AppState with the given configuration and deletion pipeline
    pub fn new(config: Config, deleter: AccountDeleter) -> Self {
        Self {
            config,
            deleter,
            tasks: TaskTracker::new(),
        }
    }

    /// Wire the Supabase and Apple clients described by `config`
    pub fn from_config(config: Config, http: reqwest::Client) -> Self {
        let authority = Arc::new(SupabaseAuthority::new(
            http.clone(),
            &config.supabase_url,
            &config.service_role_key,
        ));
        let store = Arc::new(PostgrestStore::new(
            http.clone(),
            &config.supabase_url,
            &config.service_role_key,
        ));
        let revoker = config.apple_client_secret.as_deref().map(|secret| {
            Arc::new(AppleRevoker::new(
                http,
                &config.apple_revoke_url,
                &config.apple_client_id,
                secret,
            )) as Arc<dyn TokenRevoker>
        });

        let deleter = AccountDeleter::new(
            authority,
            store,
            revoker,
            config.user_data_collections.clone(),
        );

        Self::new(config, deleter)
    }
}

/// Build the router: deletion on any path, plus `GET /health`
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers(CORS_ALLOW_HEADERS.map(HeaderName::from_static));

    Router::new()
        .route("/health", get(health_check).post(delete_account))
        .route("/", post(delete_account))
        .route("/*path", post(delete_account))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
        .with_state(state)
}

/// Map a handler panic to the generic 500 body
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    AppError::Internal(error::panic_message(err.as_ref())).into_response()
}
