//! Shared request plumbing.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;

use crate::error::{ClientError, Result};

const USER_AGENT_VALUE: &str = concat!("breath/", env!("CARGO_PKG_VERSION"));

pub(crate) fn build_client(timeout: Duration) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

    Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .build()
        .map_err(|e| ClientError::Transport(format!("failed to create HTTP client: {e}")))
}

/// Passes a success response through unread; otherwise reads the service's
/// error message.
pub(crate) fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text()?;
    Err(ClientError::Service {
        status: status.as_u16(),
        message: error_message(&body),
    })
}

/// Returns the response body text for a success status, or the service's
/// error message otherwise.
pub(crate) fn success_text(response: Response) -> Result<String> {
    Ok(ensure_success(response)?.text()?)
}

pub(crate) fn success_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = success_text(response)?;
    Ok(serde_json::from_str(&body)?)
}

/// The `error` field of a JSON body, then `message`, then the raw body.
pub(crate) fn error_message(body: &str) -> String {
    message_field(body, &["error", "message"]).unwrap_or_else(|| body.trim().to_string())
}

/// Text of the first string field present in a JSON object body.
pub(crate) fn message_field(body: &str, fields: &[&str]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    fields
        .iter()
        .find_map(|field| value.get(*field).and_then(serde_json::Value::as_str))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_error_field() {
        assert_eq!(
            error_message(r#"{"error": "Training failed: insufficient rows", "message": "x"}"#),
            "Training failed: insufficient rows"
        );
        assert_eq!(error_message(r#"{"message": "bad model"}"#), "bad model");
        assert_eq!(error_message("  Internal Server Error\n"), "Internal Server Error");
        assert_eq!(error_message(r#"{"error": 5}"#), r#"{"error": 5}"#);
    }
}
