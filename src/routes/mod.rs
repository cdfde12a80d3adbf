pub mod auth;
pub mod delete;
pub mod health;

pub use auth::BearerToken;
pub use delete::delete_account;
pub use health::health_check;
