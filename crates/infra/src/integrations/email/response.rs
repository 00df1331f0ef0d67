//! Response handling shared by the platform adapters

use chrono::{DateTime, Utc};
use mailbridge_domain::{Platform, PlatformError, Result};
use reqwest::Response;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::errors::{status_error, InfraError};

/// Pass successful responses through; classify everything else.
///
/// A 404 is reported against `resource`/`id` when the caller addressed a
/// single resource.
pub(crate) async fn ensure_success(
    platform: Platform,
    response: Response,
    resource: &str,
    id: Option<&str>,
) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    debug!(%platform, %status, resource, "remote call failed");

    match (status_error(platform, status, &body), id) {
        (PlatformError::NotFound { .. }, Some(id)) => Err(PlatformError::not_found(resource, id)),
        (error, _) => Err(error),
    }
}

/// Decode a JSON body.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await.map_err(|err| PlatformError::from(InfraError::from(err)))?;
    serde_json::from_slice(&bytes).map_err(|err| PlatformError::from(InfraError::from(err)))
}

/// RFC 3339 timestamp; blank or unparsable values are absent.
pub(crate) fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(raw).ok().map(|ts| ts.with_timezone(&Utc))
}

/// Reject ids that cannot address a single remote resource.
///
/// Blank ids are invalid input; ids containing path or query separators
/// cannot exist remotely and are reported as not found without a request.
pub(crate) fn check_id(resource: &str, id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(PlatformError::InvalidInput(format!("{resource} id must not be empty")));
    }
    if id.contains(['/', '?', '#']) {
        return Err(PlatformError::not_found(resource, id));
    }
    Ok(())
}

/// Drop blank strings.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339_with_offset_and_fraction() {
        let ts = parse_timestamp(Some("2024-03-01T10:00:00+02:00")).unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-03-01T08:00:00+00:00");
        assert!(parse_timestamp(Some("2024-03-01T10:00:00.000Z")).is_some());
    }

    #[test]
    fn blank_or_invalid_timestamps_are_none() {
        assert!(parse_timestamp(None).is_none());
        assert!(parse_timestamp(Some("")).is_none());
        assert!(parse_timestamp(Some("yesterday")).is_none());
    }

    #[test]
    fn check_id_rejects_blank_and_path_like_ids() {
        assert!(matches!(check_id("campaign", " "), Err(PlatformError::InvalidInput(_))));
        assert!(matches!(check_id("campaign", "../lists"), Err(PlatformError::NotFound { .. })));
        assert!(check_id("campaign", "42").is_ok());
    }

    #[test]
    fn non_blank_filters_whitespace() {
        assert_eq!(non_blank(Some("  ".into())), None);
        assert_eq!(non_blank(Some("x".into())), Some("x".into()));
    }
}
