use crate::clients::TokenRevoker;
use crate::models::{DeletionOutcome, StepOutcome, UserIdentity};

pub const REVOCATION_STEP: &str = "apple_refresh_token";

/// Returns the refresh token to revoke, if revocation applies
///
/// Revocation applies only to Apple sign-ins with a stored refresh token,
/// and only when a revoker (i.e. a client secret) is configured.
fn revocable_token<'a>(
    identity: &'a UserIdentity,
    revoker_configured: bool,
) -> Option<&'a str> {
    if !revoker_configured || !identity.is_apple() {
        return None;
    }
    identity.federated_refresh_token.as_deref()
}

/// Revoke the user's federated grant when applicable
///
/// Failures are logged as warnings and reported, never propagated.
pub async fn revoke_federated_grant(
    revoker: Option<&dyn TokenRevoker>,
    identity: &UserIdentity,
) -> StepOutcome {
    let token = revocable_token(identity, revoker.is_some());
    let (Some(revoker), Some(token)) = (revoker, token) else {
        return StepOutcome::new(REVOCATION_STEP, DeletionOutcome::NotApplicable);
    };

    let outcome = match revoker.revoke_refresh_token(token).await {
        Ok(()) => {
            tracing::info!(user_id = %identity.id, "Apple refresh token revoked successfully");
            DeletionOutcome::Succeeded { deleted: None }
        }
        Err(e) => {
            tracing::warn!(user_id = %identity.id, "Failed to revoke Apple token: {}", e);
            DeletionOutcome::Failed {
                reason: e.to_string(),
            }
        }
    };

    StepOutcome::new(REVOCATION_STEP, outcome)
}
