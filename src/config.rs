use std::env;
use std::time::Duration;

use crate::constants::{
    DEFAULT_APPLE_CLIENT_ID, DEFAULT_APPLE_REVOKE_URL, DEFAULT_HTTP_TIMEOUT_SECS,
    DEFAULT_USER_DATA_COLLECTIONS,
};
use crate::deletion::DeletionMode;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub environment: String,
    /// Base URL of the Supabase project (auth + REST)
    pub supabase_url: String,
    /// Service role key used for admin calls and as the `apikey` header
    pub service_role_key: String,
    pub apple_client_id: String,
    /// Revocation is skipped entirely while this is `None`
    pub apple_client_secret: Option<String>,
    pub apple_revoke_url: String,
    pub deletion_mode: DeletionMode,
    pub user_data_collections: Vec<String>,
    pub http_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists (development)
        dotenvy::dotenv().ok();

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| "Invalid SERVER_PORT")?;

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let supabase_url = env::var("SUPABASE_URL")
            .map_err(|_| "SUPABASE_URL must be set")?
            .trim_end_matches('/')
            .to_string();

        let service_role_key = env::var("SUPABASE_SERVICE_ROLE_KEY")
            .map_err(|_| "SUPABASE_SERVICE_ROLE_KEY must be set for admin operations")?;

        let apple_client_id =
            env::var("APPLE_CLIENT_ID").unwrap_or_else(|_| DEFAULT_APPLE_CLIENT_ID.to_string());

        let apple_client_secret = env::var("APPLE_CLIENT_SECRET")
            .ok()
            .filter(|secret| !secret.trim().is_empty());

        let apple_revoke_url =
            env::var("APPLE_REVOKE_URL").unwrap_or_else(|_| DEFAULT_APPLE_REVOKE_URL.to_string());

        let deletion_mode = env::var("DELETION_MODE")
            .unwrap_or_else(|_| "async".to_string())
            .parse::<DeletionMode>()?;

        let user_data_collections = env::var("USER_DATA_COLLECTIONS")
            .map(|raw| parse_collections(&raw))
            .unwrap_or_else(|_| default_collections());

        let http_timeout_secs = env::var("HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_HTTP_TIMEOUT_SECS.to_string())
            .parse()
            .map_err(|_| "Invalid HTTP_TIMEOUT_SECS")?;

        Ok(Config {
            server_host,
            server_port,
            environment,
            supabase_url,
            service_role_key,
            apple_client_id,
            apple_client_secret,
            apple_revoke_url,
            deletion_mode,
            user_data_collections,
            http_timeout_secs,
        })
    }

    /// Get server address as string
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Timeout applied to every outbound HTTP call
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

/// The built-in user data collections as owned names
pub fn default_collections() -> Vec<String> {
    DEFAULT_USER_DATA_COLLECTIONS
        .iter()
        .map(|name| name.to_string())
        .collect()
}

/// Split a comma-separated collection list, dropping blank entries
fn parse_collections(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_collections_trims_and_skips_blanks() {
        let parsed = parse_collections(" journal_entries, ,user_settings ,");
        assert_eq!(parsed, vec!["journal_entries", "user_settings"]);
    }

    #[test]
    fn test_default_collections() {
        let defaults = default_collections();
        assert_eq!(defaults.len(), 4);
        assert_eq!(defaults[0], "journal_entries");
        assert_eq!(defaults[3], "user_settings");
    }

    #[test]
    fn test_server_address() {
        let config = Config {
            server_host: "127.0.0.1".to_string(),
            server_port: 9000,
            environment: "test".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            service_role_key: "service-role".to_string(),
            apple_client_id: DEFAULT_APPLE_CLIENT_ID.to_string(),
            apple_client_secret: None,
            apple_revoke_url: DEFAULT_APPLE_REVOKE_URL.to_string(),
            deletion_mode: DeletionMode::Synchronous,
            user_data_collections: default_collections(),
            http_timeout_secs: 3,
        };

        assert_eq!(config.server_address(), "127.0.0.1:9000");
        assert_eq!(config.http_timeout(), Duration::from_secs(3));
    }
}
