//! Shared HTTP plumbing for the backend and auth clients.
//!
//! Single-attempt requests with a conservative timeout; callers decide
//! whether to retry. Non-success statuses are classified into the error
//! taxonomy with the backend's JSON error message surfaced when present.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::util::{compact_text, is_http_url};

const HTTP_TIMEOUT_SECS: u64 = 15;

/// Build the shared API client with the default request timeout.
pub fn build_client() -> Result<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()?)
}

/// Build a client without an overall timeout, for long-lived uploads.
pub fn build_upload_client() -> Result<Client> {
    Ok(Client::builder().build()?)
}

/// Normalize an API base URL: trimmed, scheme-checked, no trailing slash.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let base = raw.trim().trim_end_matches('/').to_string();
    if base.is_empty() {
        return Err(Error::Validation("API base URL must not be empty".into()));
    }
    if !is_http_url(&base) {
        return Err(Error::Validation(
            "API base URL must include http:// or https://".into(),
        ));
    }
    Ok(base)
}

/// Classify a non-success response into the error taxonomy.
///
/// Consumes the response body to extract the backend's error message.
pub async fn classify_error(response: Response) -> Error {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = parse_api_error(status, &body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Auth(message),
        StatusCode::NOT_FOUND => Error::NotFound(message),
        _ => Error::Api(message),
    }
}

/// Return the response unchanged when successful, classified error otherwise.
pub async fn check_response(response: Response) -> Result<Response> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(classify_error(response).await)
    }
}

#[derive(Debug, Deserialize)]
struct BackendErrorResponse {
    error: Option<String>,
    message: Option<String>,
    msg: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<BackendErrorResponse>(body) {
        if let Some(message) = payload.message.or(payload.msg).or(payload.error) {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", compact_text(trimmed), status.as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_base_url_rejects_invalid_values() {
        assert!(normalize_base_url("").is_err());
        assert!(normalize_base_url("example.com").is_err());
    }

    #[test]
    fn normalize_base_url_trims_trailing_slash() {
        assert_eq!(
            normalize_base_url("https://api.example.com/").unwrap(),
            "https://api.example.com"
        );
    }

    #[test]
    fn parse_api_error_prefers_json_message() {
        let rendered = parse_api_error(
            StatusCode::BAD_REQUEST,
            r#"{"message": "Invalid credentials"}"#,
        );
        assert_eq!(rendered, "Invalid credentials (400)");
    }

    #[test]
    fn parse_api_error_falls_back_to_body_text() {
        let rendered = parse_api_error(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(rendered, "upstream down (502)");
    }

    #[test]
    fn parse_api_error_handles_empty_body() {
        let rendered = parse_api_error(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(rendered, "HTTP 500");
    }
}
