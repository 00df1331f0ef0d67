//! Error types used throughout the platform-adapter layer

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{CampaignStatus, Platform};

/// Main error type for MailBridge
///
/// Every adapter operation resolves to one of these kinds. Locally detected
/// failures (unknown platform, bad credential shape, invalid cursor or input)
/// are raised before any network call; the remaining kinds are classified
/// from the remote response.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum PlatformError {
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("Platform {0} is recognised but not implemented yet")]
    NotImplemented(Platform),

    #[error(
        "Invalid credentials for {platform}: missing [{}], malformed [{}]",
        .missing.join(", "),
        .malformed.join(", ")
    )]
    InvalidCredentials { platform: Platform, missing: Vec<String>, malformed: Vec<String> },

    #[error("Authentication rejected by {platform}: {message}")]
    Authentication { platform: Platform, message: String },

    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    #[error("Operation {operation} is not supported by {platform}")]
    UnsupportedOperation { operation: String, platform: Platform },

    #[error("Rate limit exceeded on {platform} after {attempts} attempt(s)")]
    RateLimitExceeded { platform: Platform, attempts: u32, retry_after_secs: Option<u64> },

    #[error("Request to {platform} timed out after {elapsed_ms} ms")]
    Timeout { platform: Platform, elapsed_ms: u64 },

    #[error("Metrics unavailable for campaign {campaign_id} with status {status}")]
    MetricsUnavailable { campaign_id: String, status: CampaignStatus },

    #[error("Invalid pagination cursor: {0}")]
    InvalidCursor(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PlatformError {
    /// Shorthand for a missing remote resource.
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound { resource: resource.into(), id: id.into() }
    }

    /// Shorthand for an operation the platform cannot perform.
    pub fn unsupported_operation(operation: impl Into<String>, platform: Platform) -> Self {
        Self::UnsupportedOperation { operation: operation.into(), platform }
    }

    /// Stable label suitable for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedPlatform(_) => "unsupported_platform",
            Self::NotImplemented(_) => "not_implemented",
            Self::InvalidCredentials { .. } => "invalid_credentials",
            Self::Authentication { .. } => "authentication",
            Self::NotFound { .. } => "not_found",
            Self::UnsupportedOperation { .. } => "unsupported_operation",
            Self::RateLimitExceeded { .. } => "rate_limit_exceeded",
            Self::Timeout { .. } => "timeout",
            Self::MetricsUnavailable { .. } => "metrics_unavailable",
            Self::InvalidCursor(_) => "invalid_cursor",
            Self::InvalidInput(_) => "invalid_input",
            Self::Transport(_) => "transport",
            Self::Config(_) => "config",
        }
    }

    /// Returns true if a caller may reasonably retry the whole operation later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimitExceeded { .. } | Self::Timeout { .. } | Self::Transport(_))
    }

    /// Returns true for errors detected without contacting the remote service.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedPlatform(_)
                | Self::NotImplemented(_)
                | Self::InvalidCredentials { .. }
                | Self::InvalidCursor(_)
                | Self::InvalidInput(_)
                | Self::Config(_)
        )
    }
}

/// Result type alias for MailBridge operations
pub type Result<T> = std::result::Result<T, PlatformError>;
