use futures::future::join_all;

use crate::clients::DataStore;
use crate::error::StoreError;
use crate::models::{DeletionOutcome, StepOutcome};

/// Delete the user's rows from every collection
///
/// Collections are deleted concurrently and independently. A missing
/// collection is a skip, any other error is recorded and the remaining
/// collections still run. Never fails.
pub async fn purge_user_data(
    store: &dyn DataStore,
    collections: &[String],
    user_id: &str,
) -> Vec<StepOutcome> {
    let deletions = collections.iter().map(|collection| async move {
        let outcome = match store.delete_where(collection, user_id).await {
            Ok(deleted) => {
                tracing::debug!(
                    collection = %collection,
                    deleted = ?deleted,
                    "User rows deleted"
                );
                DeletionOutcome::Succeeded { deleted }
            }
            Err(StoreError::CollectionNotFound(_)) => {
                tracing::debug!(collection = %collection, "Collection not found, skipping");
                DeletionOutcome::SkippedNotFound
            }
            Err(StoreError::Failed(reason)) => {
                tracing::error!(
                    collection = %collection,
                    user_id = %user_id,
                    "Error deleting user rows: {}",
                    reason
                );
                DeletionOutcome::Failed { reason }
            }
        };

        StepOutcome::new(collection.clone(), outcome)
    });

    join_all(deletions).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Store answering from a fixed table of per-collection results
    struct ScriptedStore {
        results: HashMap<String, Result<Option<u64>, StoreError>>,
        calls: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl DataStore for ScriptedStore {
        async fn delete_where(
            &self,
            collection: &str,
            user_id: &str,
        ) -> Result<Option<u64>, StoreError> {
            self.calls
                .lock()
                .unwrap()
                .push((collection.to_string(), user_id.to_string()));
            self.results
                .get(collection)
                .cloned()
                .unwrap_or(Ok(Some(0)))
        }
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_other_collections() {
        let store = ScriptedStore {
            results: HashMap::from([
                (
                    "journal_entries".to_string(),
                    Err(StoreError::Failed("connection reset".to_string())),
                ),
                (
                    "user_bookmarks".to_string(),
                    Err(StoreError::CollectionNotFound("user_bookmarks".to_string())),
                ),
                ("user_progress".to_string(), Ok(Some(7))),
            ]),
            calls: Mutex::new(Vec::new()),
        };
        let collections: Vec<String> = ["journal_entries", "user_bookmarks", "user_progress"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let outcomes = purge_user_data(&store, &collections, "u1").await;

        assert_eq!(store.calls.lock().unwrap().len(), 3);
        assert!(store
            .calls
            .lock()
            .unwrap()
            .iter()
            .all(|(_, user_id)| user_id == "u1"));

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].step, "journal_entries");
        assert_eq!(
            outcomes[0].outcome,
            DeletionOutcome::Failed {
                reason: "connection reset".to_string()
            }
        );
        assert_eq!(outcomes[1].outcome, DeletionOutcome::SkippedNotFound);
        assert_eq!(
            outcomes[2].outcome,
            DeletionOutcome::Succeeded { deleted: Some(7) }
        );
    }

    #[tokio::test]
    async fn test_no_collections() {
        let store = ScriptedStore {
            results: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        };

        let outcomes = purge_user_data(&store, &[], "u1").await;

        assert!(outcomes.is_empty());
        assert!(store.calls.lock().unwrap().is_empty());
    }
}
