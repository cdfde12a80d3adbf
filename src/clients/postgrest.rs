use async_trait::async_trait;
use reqwest::{header::HeaderMap, Client, StatusCode};
use serde::Deserialize;

use super::DataStore;
use crate::constants::{COLLECTION_NOT_FOUND_CODES, USER_ID_COLUMN};
use crate::error::StoreError;

/// Data store backed by the PostgREST API of a Supabase project
#[derive(Clone)]
pub struct PostgrestStore {
    client: Client,
    base_url: String,
    service_role_key: String,
}

/// PostgREST error payload
#[derive(Debug, Deserialize)]
struct PostgrestError {
    code: Option<String>,
    message: Option<String>,
}

impl PostgrestStore {
    pub fn new(client: Client, base_url: &str, service_role_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_role_key: service_role_key.to_string(),
        }
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, collection)
    }
}

#[async_trait]
impl DataStore for PostgrestStore {
    async fn delete_where(
        &self,
        collection: &str,
        user_id: &str,
    ) -> Result<Option<u64>, StoreError> {
        let response = self
            .client
            .delete(self.collection_url(collection))
            .query(&[(USER_ID_COLUMN, format!("eq.{user_id}"))])
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .header("Prefer", "return=minimal, count=exact")
            .send()
            .await
            .map_err(|e| StoreError::Failed(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(deleted_count(response.headers()));
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_error(collection, status, &body))
    }
}

/// Read the total from a `Content-Range` header such as `*/3` or `0-2/3`
fn deleted_count(headers: &HeaderMap) -> Option<u64> {
    headers
        .get("content-range")?
        .to_str()
        .ok()?
        .rsplit('/')
        .next()?
        .parse()
        .ok()
}

fn classify_error(collection: &str, status: StatusCode, body: &str) -> StoreError {
    let parsed: Option<PostgrestError> = serde_json::from_str(body).ok();

    match parsed {
        Some(PostgrestError {
            code: Some(code), ..
        }) if COLLECTION_NOT_FOUND_CODES.contains(&code.as_str()) => {
            StoreError::CollectionNotFound(collection.to_string())
        }
        Some(PostgrestError {
            code,
            message: Some(message),
        }) => StoreError::Failed(match code {
            Some(code) => format!("{code}: {message}"),
            None => message,
        }),
        _ if status == StatusCode::NOT_FOUND => {
            StoreError::CollectionNotFound(collection.to_string())
        }
        _ => StoreError::Failed(format!("status {status}: {body}")),
    }
}
