//! Normalized campaign performance snapshot

use serde::{Deserialize, Serialize};

#[cfg(feature = "ts-gen")]
use ts_rs::TS;

use crate::types::Platform;

/// Counters for one campaign. Rates are derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct PlatformMetrics {
    pub campaign_id: String,
    pub platform: Platform,
    pub sent: u64,
    pub delivered: u64,
    pub opened: u64,
    pub clicked: u64,
    pub bounced: u64,
    pub unsubscribed: u64,
}

impl PlatformMetrics {
    /// Zero-valued snapshot for a campaign.
    pub fn empty(campaign_id: impl Into<String>, platform: Platform) -> Self {
        Self {
            campaign_id: campaign_id.into(),
            platform,
            sent: 0,
            delivered: 0,
            opened: 0,
            clicked: 0,
            bounced: 0,
            unsubscribed: 0,
        }
    }

    /// delivered / sent
    pub fn delivery_rate(&self) -> f64 {
        ratio(self.delivered, self.sent)
    }

    /// opened / delivered
    pub fn open_rate(&self) -> f64 {
        ratio(self.opened, self.delivered)
    }

    /// clicked / delivered
    pub fn click_rate(&self) -> f64 {
        ratio(self.clicked, self.delivered)
    }

    /// clicked / opened
    pub fn click_to_open_rate(&self) -> f64 {
        ratio(self.clicked, self.opened)
    }

    /// bounced / sent
    pub fn bounce_rate(&self) -> f64 {
        ratio(self.bounced, self.sent)
    }

    /// unsubscribed / delivered
    pub fn unsubscribe_rate(&self) -> f64 {
        ratio(self.unsubscribed, self.delivered)
    }
}

// 0/0 resolves to 0.0
fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
