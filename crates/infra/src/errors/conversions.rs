//! Conversions from external infrastructure errors into domain errors.

use mailbridge_domain::constants::MAX_ERROR_BODY_CHARS;
use mailbridge_domain::{Platform, PlatformError};
use reqwest::Error as HttpError;
use reqwest::StatusCode;
use serde_json::Error as JsonError;
use url::ParseError as UrlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct InfraError(pub PlatformError);

impl From<InfraError> for PlatformError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<PlatformError> for InfraError {
    fn from(value: PlatformError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoPlatformError {
    fn into_platform_error(self) -> PlatformError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → PlatformError */
/* -------------------------------------------------------------------------- */

impl IntoPlatformError for HttpError {
    fn into_platform_error(self) -> PlatformError {
        if self.is_timeout() {
            return PlatformError::Transport("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return PlatformError::Transport("HTTP connection failure".into());
        }

        if self.is_builder() {
            return PlatformError::InvalidInput(format!("invalid HTTP request: {self}"));
        }

        if self.is_decode() {
            return PlatformError::Transport(format!("failed to decode response body: {self}"));
        }

        if let Some(status) = self.status() {
            return PlatformError::Transport(format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown status")
            ));
        }

        // Display of reqwest errors can include the URL; keep only the kind.
        PlatformError::Transport(format!("HTTP request failed: {}", self.without_url()))
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_platform_error())
    }
}

/* -------------------------------------------------------------------------- */
/* url::ParseError → PlatformError */
/* -------------------------------------------------------------------------- */

impl IntoPlatformError for UrlError {
    fn into_platform_error(self) -> PlatformError {
        PlatformError::Config(format!("invalid URL: {self}"))
    }
}

impl From<UrlError> for InfraError {
    fn from(value: UrlError) -> Self {
        InfraError(value.into_platform_error())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → PlatformError */
/* -------------------------------------------------------------------------- */

impl IntoPlatformError for JsonError {
    fn into_platform_error(self) -> PlatformError {
        PlatformError::Transport(format!("unexpected response payload: {self}"))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_platform_error())
    }
}

/* -------------------------------------------------------------------------- */
/* HTTP status → PlatformError */
/* -------------------------------------------------------------------------- */

/// Classify a non-success response.
///
/// 404 is reported against a generic resource; adapters that know which
/// resource they asked for replace it.
pub fn status_error(platform: Platform, status: StatusCode, body: &str) -> PlatformError {
    let code = status.as_u16();
    let reason = status.canonical_reason().unwrap_or("unknown status");
    let summary = format!("HTTP {code} {reason}");
    let detail = truncate_body(body);

    match code {
        401 | 403 => {
            PlatformError::Authentication { platform, message: with_detail(summary, &detail) }
        }
        404 => PlatformError::not_found("resource", with_detail(summary, &detail)),
        429 => PlatformError::RateLimitExceeded { platform, attempts: 1, retry_after_secs: None },
        400 | 422 => PlatformError::InvalidInput(format!(
            "{platform} rejected the request: {}",
            with_detail(summary, &detail)
        )),
        _ => PlatformError::Transport(format!(
            "{platform} returned {}",
            with_detail(summary, &detail)
        )),
    }
}

fn with_detail(summary: String, detail: &str) -> String {
    if detail.is_empty() {
        summary
    } else {
        format!("{summary}: {detail}")
    }
}

fn truncate_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_ERROR_BODY_CHARS {
        return trimmed.to_string();
    }
    let mut truncated: String = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
    truncated.push_str("...");
    truncated
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
