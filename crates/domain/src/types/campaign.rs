//! Normalized campaign types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "ts-gen")]
use ts_rs::TS;

use crate::errors::{PlatformError, Result};
use crate::types::Platform;

/// Platform-specific passthrough values.
///
/// Non-contractual: keys and shapes differ per platform and may change with
/// the remote API. Callers must not depend on them for core logic.
pub type Extras = serde_json::Map<String, serde_json::Value>;

/// Normalized campaign lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Draft,
    Scheduled,
    Sending,
    Sent,
    Paused,
    Unknown,
}

crate::impl_domain_status_conversions!(CampaignStatus {
    Draft => "draft",
    Scheduled => "scheduled",
    Sending => "sending",
    Sent => "sent",
    Paused => "paused",
    Unknown => "unknown",
});

impl CampaignStatus {
    /// Whether performance numbers can exist for a campaign in this state.
    pub const fn has_metrics(&self) -> bool {
        !matches!(self, Self::Draft | Self::Scheduled)
    }

    /// Whether the campaign has left the editable phase.
    pub const fn is_dispatched(&self) -> bool {
        matches!(self, Self::Sending | Self::Sent)
    }
}

/// Normalized view of a remote campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct PlatformCampaign {
    pub id: String,
    pub platform: Platform,
    pub name: String,
    pub status: CampaignStatus,
    /// Empty when the platform has no subject yet (e.g. summary listings).
    pub subject: String,
    pub from_name: Option<String>,
    pub reply_to: Option<String>,
    pub preview_text: Option<String>,
    pub list_ids: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub sent_at: Option<DateTime<Utc>>,
    #[cfg_attr(feature = "ts-gen", ts(type = "Record<string, unknown>"))]
    pub extras: Extras,
}

/// Payload for creating a campaign.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCampaignInput {
    pub name: String,
    pub subject: String,
    #[serde(default)]
    pub list_ids: Vec<String>,
    #[serde(default)]
    pub from_name: Option<String>,
    #[serde(default)]
    pub from_email: Option<String>,
    #[serde(default)]
    pub reply_to: Option<String>,
    #[serde(default)]
    pub preview_text: Option<String>,
    #[serde(default)]
    pub html_content: Option<String>,
}

impl CreateCampaignInput {
    pub fn new(name: impl Into<String>, subject: impl Into<String>) -> Self {
        Self { name: name.into(), subject: subject.into(), ..Self::default() }
    }

    pub fn with_list(mut self, list_id: impl Into<String>) -> Self {
        self.list_ids.push(list_id.into());
        self
    }

    pub fn with_sender(mut self, name: impl Into<String>, email: impl Into<String>) -> Self {
        self.from_name = Some(name.into());
        self.from_email = Some(email.into());
        self
    }

    /// Reject payloads no platform would accept.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(PlatformError::InvalidInput("campaign name must not be empty".into()));
        }
        if self.subject.trim().is_empty() {
            return Err(PlatformError::InvalidInput("campaign subject must not be empty".into()));
        }
        if self.list_ids.iter().any(|id| id.trim().is_empty()) {
            return Err(PlatformError::InvalidInput("list ids must not be empty".into()));
        }
        Ok(())
    }
}

/// Partial update; `None` fields are left untouched remotely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCampaignInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub list_ids: Option<Vec<String>>,
    #[serde(default)]
    pub from_name: Option<String>,
    #[serde(default)]
    pub from_email: Option<String>,
    #[serde(default)]
    pub reply_to: Option<String>,
    #[serde(default)]
    pub preview_text: Option<String>,
    #[serde(default)]
    pub html_content: Option<String>,
}

impl UpdateCampaignInput {
    /// True when no field is supplied.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.subject.is_none()
            && self.list_ids.is_none()
            && self.from_name.is_none()
            && self.from_email.is_none()
            && self.reply_to.is_none()
            && self.preview_text.is_none()
            && self.html_content.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(PlatformError::InvalidInput("update contains no fields".into()));
        }
        if self.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            return Err(PlatformError::InvalidInput("campaign name must not be empty".into()));
        }
        if self.subject.as_deref().is_some_and(|subject| subject.trim().is_empty()) {
            return Err(PlatformError::InvalidInput("campaign subject must not be empty".into()));
        }
        Ok(())
    }
}
