//! HTTP utilities for Pulumi Cloud REST API calls

use crate::error::{FetchError, Result};
use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use std::time::Duration;

/// Fixed client-side timeout for every API call
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
pub(crate) fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| c.is_control(), "")
}

/// Build the `Authorization: token <token>` header value
fn token_header(token: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("token {}", token)).map_err(|_| {
        FetchError::RequestConstruction {
            message: "access token is not a valid header value".to_string(),
        }
    })?;
    value.set_sensitive(true);
    Ok(value)
}

/// HTTP client wrapper for Pulumi API calls
///
/// Holds one preconfigured `reqwest::Client`; clones share its connection pool.
#[derive(Clone)]
pub struct PulumiHttpClient {
    client: Client,
}

impl PulumiHttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("pulumi-stack-outputs/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| FetchError::RequestConstruction {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self { client })
    }

    /// Make a GET request and return the raw response body
    ///
    /// Non-success statuses are rejected before the body is decoded.
    pub async fn get(&self, url: &str, token: &str) -> Result<String> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, token_header(token)?)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Only log sanitized/truncated error body to avoid leaking sensitive data
            let body = sanitize_for_log(&body);
            tracing::error!("API error: {} - {}", status, body);
            return Err(FetchError::Status { status, body });
        }

        Ok(body)
    }
}

/// Format a Pulumi API error for display
pub fn format_api_error(error: &FetchError) -> String {
    let Some(status) = error.status() else {
        return error.to_string();
    };

    match status.as_u16() {
        401 => "Authentication failed. Check PULUMI_ACCESS_TOKEN.".to_string(),
        403 => "Permission denied. The token cannot read this stack.".to_string(),
        404 => "Stack not found. Check organization, project and stack names.".to_string(),
        429 => "Rate limit exceeded. Please try again later.".to_string(),
        500..=599 => "Pulumi Cloud temporarily unavailable. Please try again.".to_string(),
        _ => error.to_string(),
    }
}
