//! Opaque pagination cursors
//!
//! A cursor is URL-safe base64 over a small JSON envelope naming the issuing
//! platform, the collection it pages through and the position to resume
//! from. Remote page tokens are wrapped, never returned verbatim, so a cursor
//! handed to the wrong adapter or collection is rejected before any request.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use mailbridge_domain::{PaginationOptions, Platform, PlatformError, Result};
use serde::{Deserialize, Serialize};

/// Collection a cursor pages through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorResource {
    Campaigns,
    Lists,
}

/// Where the next page starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorPosition {
    Offset(u32),
    Token(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    #[serde(rename = "p")]
    platform: Platform,
    #[serde(rename = "r")]
    resource: CursorResource,
    #[serde(rename = "at")]
    position: CursorPosition,
}

/// Encode a position as an opaque cursor.
pub fn encode(platform: Platform, resource: CursorResource, position: CursorPosition) -> String {
    let envelope = Envelope { platform, resource, position };
    // Serializing a plain enum/struct tree cannot fail.
    let json = serde_json::to_vec(&envelope).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

/// Decode a cursor issued by `platform` for `resource`.
pub fn decode(
    platform: Platform,
    resource: CursorResource,
    cursor: &str,
) -> Result<CursorPosition> {
    let bytes = URL_SAFE_NO_PAD
        .decode(cursor.trim())
        .map_err(|_| PlatformError::InvalidCursor("cursor is not valid base64".into()))?;
    let envelope: Envelope = serde_json::from_slice(&bytes)
        .map_err(|_| PlatformError::InvalidCursor("cursor payload is malformed".into()))?;

    if envelope.platform != platform {
        return Err(PlatformError::InvalidCursor(format!(
            "cursor was issued by {}, not {}",
            envelope.platform, platform
        )));
    }
    if envelope.resource != resource {
        return Err(PlatformError::InvalidCursor(format!(
            "cursor pages {:?}, not {:?}",
            envelope.resource, resource
        )));
    }

    Ok(envelope.position)
}

/// Validate page options and resolve where the requested page starts.
///
/// `None` means the first page.
pub fn start_position(
    platform: Platform,
    resource: CursorResource,
    options: &PaginationOptions,
) -> Result<Option<CursorPosition>> {
    options.validate()?;
    options.cursor.as_deref().map(|cursor| decode(platform, resource, cursor)).transpose()
}

/// Offset to resume from; a token cursor on an offset-paged collection is
/// invalid.
pub fn start_offset(
    platform: Platform,
    resource: CursorResource,
    options: &PaginationOptions,
) -> Result<u32> {
    match start_position(platform, resource, options)? {
        None => Ok(0),
        Some(CursorPosition::Offset(offset)) => Ok(offset),
        Some(CursorPosition::Token(_)) => {
            Err(PlatformError::InvalidCursor("expected an offset cursor".into()))
        }
    }
}

/// Remote page token to resume from; an offset cursor on a token-paged
/// collection is invalid.
pub fn start_token(
    platform: Platform,
    resource: CursorResource,
    options: &PaginationOptions,
) -> Result<Option<String>> {
    match start_position(platform, resource, options)? {
        None => Ok(None),
        Some(CursorPosition::Token(token)) => Ok(Some(token)),
        Some(CursorPosition::Offset(_)) => {
            Err(PlatformError::InvalidCursor("expected a page-token cursor".into()))
        }
    }
}

/// Cursor for the page after an offset-paged response, or `None` when the
/// collection is exhausted.
///
/// An empty page always ends the scan, even if the remote total claims more.
pub fn next_offset_cursor(
    platform: Platform,
    resource: CursorResource,
    offset: u32,
    returned: usize,
    total: u64,
) -> Option<String> {
    let returned = u32::try_from(returned).ok()?;
    let next = offset.checked_add(returned)?;
    (returned > 0 && u64::from(next) < total)
        .then(|| encode(platform, resource, CursorPosition::Offset(next)))
}
