//! External collaborators the deletion pipeline talks to
//!
//! Each collaborator sits behind a trait so handlers only depend on the
//! contract. The reqwest implementations target Supabase (GoTrue admin API
//! and PostgREST) and Apple's token revocation endpoint.

pub mod apple;
pub mod postgrest;
pub mod supabase_auth;

use async_trait::async_trait;
use std::time::Duration;

use crate::error::{AuthError, RevokeError, StoreError};
use crate::models::UserIdentity;

pub use apple::AppleRevoker;
pub use postgrest::PostgrestStore;
pub use supabase_auth::SupabaseAuthority;

/// Service owning user identities
#[async_trait]
pub trait AuthorityService: Send + Sync {
    /// Verify a bearer token and return the identity it belongs to
    async fn verify_token(&self, token: &str) -> Result<UserIdentity, AuthError>;

    /// Permanently delete an identity
    async fn delete_user(&self, user_id: &str) -> Result<(), AuthError>;
}

/// Store holding per-user rows in named collections
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Delete every row of `collection` keyed by `user_id`
    ///
    /// Returns the number of deleted rows when the store reports it.
    async fn delete_where(&self, collection: &str, user_id: &str)
        -> Result<Option<u64>, StoreError>;
}

/// Endpoint able to revoke a federated refresh token
#[async_trait]
pub trait TokenRevoker: Send + Sync {
    async fn revoke_refresh_token(&self, refresh_token: &str) -> Result<(), RevokeError>;
}

/// Build the shared reqwest client with a per-request timeout
pub fn http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
}
