use axum::{extract::State, Json};
use serde::Serialize;

use crate::constants::{MSG_ACCOUNT_DELETED, MSG_DELETION_INITIATED};
use crate::deletion::DeletionMode;
use crate::error::Result;
use crate::routes::BearerToken;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct DeleteAccountResponse {
    pub success: bool,
    pub message: String,
}

/// Delete the caller's account
///
/// The caller is identified by the bearer token only. In synchronous mode the
/// response waits for the identity deletion; in detached mode it is sent as
/// soon as the token is verified and deletion continues in the background.
///
/// # Note
/// This action is irreversible. Failures while purging user data or revoking
/// an Apple grant are logged and never reported to the caller.
pub async fn delete_account(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<DeleteAccountResponse>> {
    let identity = state.deleter.authenticate(&token).await?;

    let message = match state.config.deletion_mode {
        DeletionMode::Synchronous => {
            state.deleter.run(&identity).await?;
            MSG_ACCOUNT_DELETED
        }
        DeletionMode::Detached => {
            tracing::info!(user_id = %identity.id, "Account deletion scheduled");
            let _ = state.deleter.spawn_detached(&state.tasks, identity);
            MSG_DELETION_INITIATED
        }
    };

    Ok(Json(DeleteAccountResponse {
        success: true,
        message: message.to_string(),
    }))
}
