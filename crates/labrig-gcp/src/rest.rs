//! Shared plumbing for the Google REST clients
//!
//! Every Google API reports failures with the same envelope:
//! `{"error": {"code": ..., "message": ..., "status": ...}}`. The helper
//! here turns a non-2xx response into a typed error carrying that message.

use crate::error::{GcpError, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[allow(dead_code)]
    code: i32,
    message: String,
    #[serde(default)]
    status: String,
}

/// Return the response unchanged when it succeeded, otherwise decode the
/// Google error envelope into a [`GcpError::ApiError`].
pub(crate) async fn expect_success(
    api: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ApiErrorEnvelope>(&body) {
        Ok(envelope) if !envelope.error.status.is_empty() => {
            format!("{} ({})", envelope.error.message, envelope.error.status)
        }
        Ok(envelope) => envelope.error.message,
        Err(_) => format!("HTTP {status}: {body}"),
    };

    Err(GcpError::ApiError {
        api: api.to_string(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_parsing() {
        let body = r#"{"error": {"code": 403, "message": "Permission denied", "status": "PERMISSION_DENIED"}}"#;
        let envelope: ApiErrorEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.error.message, "Permission denied");
        assert_eq!(envelope.error.status, "PERMISSION_DENIED");
    }

    #[test]
    fn test_error_envelope_without_status() {
        let body = r#"{"error": {"code": 500, "message": "boom"}}"#;
        let envelope: ApiErrorEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.error.status, "");
    }
}
