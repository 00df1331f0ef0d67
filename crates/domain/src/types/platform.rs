//! Platform identifiers

use serde::{Deserialize, Serialize};

#[cfg(feature = "ts-gen")]
use ts_rs::TS;

use crate::errors::{PlatformError, Result};

/// A third-party email-marketing service known to MailBridge.
///
/// Declaration order is the display order used by onboarding screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Mailchimp,
    #[serde(rename = "sendgrid")]
    SendGrid,
    Brevo,
    Klaviyo,
    #[serde(rename = "activecampaign")]
    ActiveCampaign,
    ConstantContact,
    CampaignMonitor,
    #[serde(rename = "convertkit")]
    ConvertKit,
}

crate::impl_domain_status_conversions!(Platform {
    Mailchimp => "mailchimp",
    SendGrid => "sendgrid",
    Brevo => "brevo",
    Klaviyo => "klaviyo",
    ActiveCampaign => "activecampaign",
    ConstantContact => "constant_contact",
    CampaignMonitor => "campaign_monitor",
    ConvertKit => "convertkit",
});

impl Platform {
    /// Every known platform in display order.
    pub const ALL: [Platform; 8] = [
        Platform::Mailchimp,
        Platform::SendGrid,
        Platform::Brevo,
        Platform::Klaviyo,
        Platform::ActiveCampaign,
        Platform::ConstantContact,
        Platform::CampaignMonitor,
        Platform::ConvertKit,
    ];

    /// Parse a platform identifier, failing with `UnsupportedPlatform`.
    pub fn parse(identifier: &str) -> Result<Self> {
        identifier
            .parse()
            .map_err(|_| PlatformError::UnsupportedPlatform(identifier.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Platform::parse("SendGrid").unwrap(), Platform::SendGrid);
        assert_eq!(Platform::parse(" constant_contact ").unwrap(), Platform::ConstantContact);
    }

    #[test]
    fn parse_unknown_is_unsupported_platform() {
        match Platform::parse("carrier-pigeon") {
            Err(PlatformError::UnsupportedPlatform(id)) => assert_eq!(id, "carrier-pigeon"),
            other => panic!("expected unsupported platform, got {:?}", other),
        }
    }

    #[test]
    fn serde_uses_identifier_strings() {
        for platform in Platform::ALL {
            let json = serde_json::to_string(&platform).unwrap();
            assert_eq!(json, format!("\"{}\"", platform.as_str()));
            let back: Platform = serde_json::from_str(&json).unwrap();
            assert_eq!(back, platform);
        }
    }
}
