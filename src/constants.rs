/// Collections holding per-user rows keyed by `user_id`
/// Order is only used for logging; deletions are independent
pub const DEFAULT_USER_DATA_COLLECTIONS: [&str; 4] = [
    "journal_entries",
    "user_bookmarks",
    "user_progress",
    "user_settings",
];

/// Column every user data collection is keyed by
pub const USER_ID_COLUMN: &str = "user_id";

/// Error codes the data store returns when a collection does not exist
/// PGRST116 is what older PostgREST releases report, PGRST205 newer ones,
/// 42P01 is the raw Postgres "undefined_table"
pub const COLLECTION_NOT_FOUND_CODES: [&str; 3] = ["PGRST116", "PGRST205", "42P01"];

/// Default timeout for a single outbound HTTP call (seconds)
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// Sign in with Apple
// =============================================================================

/// Provider name the authority service records for Apple sign-ins
pub const APPLE_PROVIDER: &str = "apple";

/// Apple token revocation endpoint
pub const DEFAULT_APPLE_REVOKE_URL: &str = "https://appleid.apple.com/auth/revoke";

/// Bundle identifier used when `APPLE_CLIENT_ID` is not set
pub const DEFAULT_APPLE_CLIENT_ID: &str = "com.hub4apps.gitawisdom";

// =============================================================================
// CORS
// =============================================================================

/// Headers browsers may send on the deletion request
pub const CORS_ALLOW_HEADERS: [&str; 4] =
    ["authorization", "x-client-info", "apikey", "content-type"];

// =============================================================================
// Response Messages
// =============================================================================

pub const ERR_MISSING_AUTHORIZATION: &str = "Missing authorization header";

pub const ERR_INVALID_TOKEN: &str = "Invalid or expired token";

pub const ERR_IDENTITY_DELETION_FAILED: &str = "Failed to delete user account";

pub const ERR_INTERNAL: &str = "Internal server error";

/// Returned once the identity has been deleted (synchronous mode)
pub const MSG_ACCOUNT_DELETED: &str = "Account deleted successfully";

/// Returned once deletion has been scheduled (detached mode)
pub const MSG_DELETION_INITIATED: &str = "Account deletion initiated";
