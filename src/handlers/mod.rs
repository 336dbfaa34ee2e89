// handlers/mod.rs - route handlers grouped by resource
//
// Guards are attached in the router; handlers assume they already ran.

pub mod auth;
pub mod companies;
pub mod extract;
pub mod health;
pub mod jobs;
pub mod users;

pub use health::health;

use validator::ValidationError;

use crate::error::ApiError;

/// Fallback for unmatched routes
pub async fn not_found() -> ApiError {
    ApiError::not_found("Not Found")
}

/// `url` accepts any scheme; logo URLs must be web addresses.
pub(crate) fn http_url(value: &str) -> Result<(), ValidationError> {
    match url::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(ValidationError::new("http_url")),
    }
}
