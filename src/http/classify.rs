//! Status classification for raw responses.
//!
//! Upstream error bodies are not guaranteed to be JSON, so the body text is
//! kept verbatim as the error message.

use crate::error::ApiError;

use super::transport::RawResponse;

pub fn is_error(status: u16) -> bool {
    status >= 400
}

pub fn is_not_found(status: u16) -> bool {
    status == 404
}

pub fn is_rate_limited(status: u16) -> bool {
    status == 429
}

pub fn is_unauthorized(status: u16) -> bool {
    status == 401
}

pub fn is_forbidden(status: u16) -> bool {
    status == 403
}

pub fn is_client_error(status: u16) -> bool {
    (400..=499).contains(&status)
}

pub fn is_server_error(status: u16) -> bool {
    (500..=599).contains(&status)
}

/// Transient statuses: rate limiting and every 5xx.
pub fn should_retry(status: u16) -> bool {
    is_rate_limited(status) || is_server_error(status)
}

/// Splits a raw response into its body on success or an [`ApiError`] for
/// any status >= 400.
pub fn classify(response: RawResponse, path: &str) -> Result<Vec<u8>, ApiError> {
    if is_error(response.status) {
        let message = String::from_utf8_lossy(&response.body).into_owned();
        return Err(ApiError::new(response.status, message, path));
    }
    Ok(response.body)
}
