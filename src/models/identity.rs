use serde::Serialize;

use crate::constants::APPLE_PROVIDER;

/// How the user originally signed in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Password,
    Apple,
    Other(String),
}

impl AuthProvider {
    /// Map the provider name recorded by the authority service
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "" | "email" | "password" => AuthProvider::Password,
            APPLE_PROVIDER => AuthProvider::Apple,
            other => AuthProvider::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            AuthProvider::Password => "password",
            AuthProvider::Apple => APPLE_PROVIDER,
            AuthProvider::Other(name) => name,
        }
    }
}

/// Verified identity of the caller, read once per request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserIdentity {
    pub id: String,
    pub auth_provider: AuthProvider,
    /// Refresh token issued by the federated provider, if one was stored
    pub federated_refresh_token: Option<String>,
}

impl UserIdentity {
    pub fn new(
        id: impl Into<String>,
        auth_provider: AuthProvider,
        federated_refresh_token: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            auth_provider,
            federated_refresh_token: federated_refresh_token.filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn is_apple(&self) -> bool {
        self.auth_provider == AuthProvider::Apple
    }
}
