//! Normalized audience list

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "ts-gen")]
use ts_rs::TS;

use crate::types::{Extras, Platform};

/// Audience/list on a remote platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct PlatformList {
    pub id: String,
    pub platform: Platform,
    pub name: String,
    pub subscriber_count: u64,
    /// `None` when the platform does not expose a modification time.
    pub updated_at: Option<DateTime<Utc>>,
    #[cfg_attr(feature = "ts-gen", ts(type = "Record<string, unknown>"))]
    pub extras: Extras,
}
