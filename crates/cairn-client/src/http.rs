//! Shared HTTP response helpers.
//!
//! Centralizes the status-code check (non-success → [`ClientError::Api`]
//! with status and body) so the fetch modules stay focused on request
//! construction and response mapping.

use crate::error::ClientError;

/// Check an HTTP response for a non-success status.
///
/// Returns the response unchanged on success; otherwise the status code
/// and response body are folded into [`ClientError::Api`].
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    if !resp.status().is_success() {
        return Err(ClientError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}
