use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::AuthorityService;
use crate::error::AuthError;
use crate::models::{AuthProvider, UserIdentity};

/// Supabase Auth (GoTrue) client using the service role key
#[derive(Clone)]
pub struct SupabaseAuthority {
    client: Client,
    base_url: String,
    service_role_key: String,
}

/// Subset of the GoTrue user object this service reads
#[derive(Debug, Deserialize)]
struct GoTrueUser {
    id: Option<String>,
    #[serde(default)]
    app_metadata: AppMetadata,
    #[serde(default)]
    user_metadata: UserMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct AppMetadata {
    provider: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct UserMetadata {
    apple_refresh_token: Option<String>,
}

impl GoTrueUser {
    fn into_identity(self) -> Result<UserIdentity, AuthError> {
        let id = self
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AuthError::Rejected("no user for token".to_string()))?;

        let provider = AuthProvider::from_name(self.app_metadata.provider.as_deref().unwrap_or(""));

        Ok(UserIdentity::new(
            id,
            provider,
            self.user_metadata.apple_refresh_token,
        ))
    }
}

impl SupabaseAuthority {
    pub fn new(client: Client, base_url: &str, service_role_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_role_key: service_role_key.to_string(),
        }
    }

    /// Build auth API URL
    fn auth_url(&self, endpoint: &str) -> String {
        format!("{}/auth/v1{}", self.base_url, endpoint)
    }
}

#[async_trait]
impl AuthorityService for SupabaseAuthority {
    async fn verify_token(&self, token: &str) -> Result<UserIdentity, AuthError> {
        let response = self
            .client
            .get(self.auth_url("/user"))
            .header("apikey", &self.service_role_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = response.status();
        if matches!(
            status,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND
        ) {
            return Err(AuthError::Rejected(format!("status {status}")));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Malformed(format!("status {status}: {body}")));
        }

        let user: GoTrueUser = response
            .json()
            .await
            .map_err(|e| AuthError::Malformed(e.to_string()))?;

        user.into_identity()
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), AuthError> {
        let response = self
            .client
            .delete(self.auth_url(&format!("/admin/users/{user_id}")))
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body).unwrap_or_else(|| format!("status {status}"));

        if status == StatusCode::NOT_FOUND {
            Err(AuthError::Rejected(message))
        } else {
            Err(AuthError::Malformed(message))
        }
    }
}

/// Pull a human readable message out of a GoTrue error body
fn error_message(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        msg: Option<String>,
        message: Option<String>,
        error_description: Option<String>,
    }

    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed.msg.or(parsed.message).or(parsed.error_description)
}
