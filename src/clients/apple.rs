use async_trait::async_trait;
use reqwest::Client;

use super::TokenRevoker;
use crate::error::RevokeError;

/// Sign in with Apple token revocation client
#[derive(Clone)]
pub struct AppleRevoker {
    client: Client,
    revoke_url: String,
    client_id: String,
    client_secret: String,
}

impl AppleRevoker {
    pub fn new(client: Client, revoke_url: &str, client_id: &str, client_secret: &str) -> Self {
        Self {
            client,
            revoke_url: revoke_url.to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
        }
    }
}

#[async_trait]
impl TokenRevoker for AppleRevoker {
    async fn revoke_refresh_token(&self, refresh_token: &str) -> Result<(), RevokeError> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("token", refresh_token),
            ("token_type_hint", "refresh_token"),
        ];

        let response = self
            .client
            .post(&self.revoke_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| RevokeError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(RevokeError::Rejected { status, body });
        }

        Ok(())
    }
}
