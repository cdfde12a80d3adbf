//! Account deletion pipeline
//!
//! Order is fixed: purge user data, revoke the federated grant, then delete
//! the identity. Only the identity step can fail the operation.

pub mod purge;
pub mod revoke;

use std::fmt;
use std::panic::AssertUnwindSafe;
use std::str::FromStr;
use std::sync::Arc;

use futures::FutureExt;
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;

use crate::clients::{AuthorityService, DataStore, TokenRevoker};
use crate::error::{panic_message, AppError, Result};
use crate::models::{DeletionOutcome, DeletionReport, StepOutcome, UserIdentity};

pub use purge::purge_user_data;
pub use revoke::revoke_federated_grant;

pub const IDENTITY_STEP: &str = "identity";

/// When the HTTP response is sent relative to the destructive work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionMode {
    /// Respond after the identity has been deleted (or failed to)
    Synchronous,
    /// Respond once authenticated; delete in a detached task
    Detached,
}

impl DeletionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeletionMode::Synchronous => "sync",
            DeletionMode::Detached => "async",
        }
    }
}

impl fmt::Display for DeletionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeletionMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sync" | "synchronous" => Ok(DeletionMode::Synchronous),
            "async" | "asynchronous" | "detached" => Ok(DeletionMode::Detached),
            other => Err(format!("Invalid DELETION_MODE: {other}")),
        }
    }
}

/// Runs the deletion steps against the configured collaborators
#[derive(Clone)]
pub struct AccountDeleter {
    authority: Arc<dyn AuthorityService>,
    store: Arc<dyn DataStore>,
    revoker: Option<Arc<dyn TokenRevoker>>,
    collections: Arc<[String]>,
}

impl AccountDeleter {
    pub fn new(
        authority: Arc<dyn AuthorityService>,
        store: Arc<dyn DataStore>,
        revoker: Option<Arc<dyn TokenRevoker>>,
        collections: Vec<String>,
    ) -> Self {
        Self {
            authority,
            store,
            revoker,
            collections: collections.into(),
        }
    }

    /// Verify the caller's token; nothing is deleted before this succeeds
    pub async fn authenticate(&self, token: &str) -> Result<UserIdentity> {
        let identity = self.authority.verify_token(token).await?;
        Ok(identity)
    }

    /// Purge, revoke and delete the identity, in that order
    ///
    /// Returns `IdentityDeletionFailed` only when the identity step fails.
    /// The report is logged either way.
    pub async fn run(&self, identity: &UserIdentity) -> Result<DeletionReport> {
        tracing::info!(
            user_id = %identity.id,
            provider = %identity.auth_provider.as_str(),
            "Deleting account"
        );

        let mut report = DeletionReport::new(identity.id.clone());

        report.collections =
            purge_user_data(self.store.as_ref(), &self.collections, &identity.id).await;

        report.revocation = Some(revoke_federated_grant(self.revoker.as_deref(), identity).await);

        let deleted = self.authority.delete_user(&identity.id).await;
        let outcome = match &deleted {
            Ok(()) => DeletionOutcome::Succeeded { deleted: None },
            Err(e) => DeletionOutcome::Failed {
                reason: e.to_string(),
            },
        };
        report.identity = Some(StepOutcome::new(IDENTITY_STEP, outcome));

        log_report(&report);

        match deleted {
            Ok(()) => Ok(report),
            Err(e) => Err(AppError::IdentityDeletionFailed(e.to_string())),
        }
    }

    /// Run the deletion on `tasks` without waiting for it
    ///
    /// The task is owned by the tracker, not the request, so it keeps running
    /// after the response is sent and is awaited on shutdown. A panic inside
    /// the pipeline is caught and logged against the user; the task itself
    /// always finishes cleanly.
    pub fn spawn_detached(&self, tasks: &TaskTracker, identity: UserIdentity) -> JoinHandle<()> {
        let deleter = self.clone();
        tasks.spawn(async move {
            // Client already received a success response
            match AssertUnwindSafe(deleter.run(&identity)).catch_unwind().await {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => {
                    tracing::error!(
                        user_id = %identity.id,
                        "Detached account deletion failed: {}",
                        e
                    );
                }
                Err(payload) => {
                    tracing::error!(
                        user_id = %identity.id,
                        "Detached account deletion panicked, identity not deleted: {}",
                        panic_message(payload.as_ref())
                    );
                }
            }
        })
    }
}

fn log_report(report: &DeletionReport) {
    let failed = report.failed_collections();
    if failed > 0 {
        tracing::warn!(
            user_id = %report.user_id,
            failed,
            total = report.collections.len(),
            "Some user data collections could not be purged"
        );
    }

    if report.identity_deleted() {
        tracing::info!(
            user_id = %report.user_id,
            purged = report.collections.len() - failed - report.skipped_collections(),
            skipped = report.skipped_collections(),
            failed,
            "Account deleted successfully"
        );
    } else {
        tracing::error!(
            user_id = %report.user_id,
            report = ?report,
            "Account deletion failed at identity step"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AuthError, StoreError};
    use crate::models::AuthProvider;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Authority that accepts any token and counts identity deletions
    #[derive(Default)]
    struct CountingAuthority {
        deletions: AtomicUsize,
    }

    #[async_trait]
    impl AuthorityService for CountingAuthority {
        async fn verify_token(&self, _token: &str) -> std::result::Result<UserIdentity, AuthError> {
            Ok(UserIdentity::new("u1", AuthProvider::Password, None))
        }

        async fn delete_user(&self, _user_id: &str) -> std::result::Result<(), AuthError> {
            self.deletions.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct CrashingStore;

    #[async_trait]
    impl DataStore for CrashingStore {
        async fn delete_where(
            &self,
            _collection: &str,
            _user_id: &str,
        ) -> std::result::Result<Option<u64>, StoreError> {
            panic!("store client crashed");
        }
    }

    #[tokio::test]
    async fn test_detached_panic_is_contained() {
        let authority = Arc::new(CountingAuthority::default());
        let deleter = AccountDeleter::new(
            authority.clone(),
            Arc::new(CrashingStore),
            None,
            vec!["journal_entries".to_string()],
        );
        let tasks = TaskTracker::new();

        let handle = deleter.spawn_detached(
            &tasks,
            UserIdentity::new("u1", AuthProvider::Password, None),
        );

        // The task completes normally instead of propagating the panic
        assert!(handle.await.is_ok());
        assert_eq!(authority.deletions.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_deletion_mode_parsing() {
        assert_eq!("sync".parse::<DeletionMode>(), Ok(DeletionMode::Synchronous));
        assert_eq!(
            "Synchronous".parse::<DeletionMode>(),
            Ok(DeletionMode::Synchronous)
        );
        assert_eq!("async".parse::<DeletionMode>(), Ok(DeletionMode::Detached));
        assert_eq!(" detached ".parse::<DeletionMode>(), Ok(DeletionMode::Detached));
        assert!("later".parse::<DeletionMode>().is_err());
    }

    #[test]
    fn test_deletion_mode_display() {
        assert_eq!(DeletionMode::Synchronous.to_string(), "sync");
        assert_eq!(DeletionMode::Detached.to_string(), "async");
    }
}
