//! Credential descriptor registry and capability queries
//!
//! A static table populated at compile time and never mutated. It answers
//! three questions for onboarding screens and for the adapter factory:
//! which platforms are recognised, which of them have a working
//! implementation, and which credential fields each one needs.

use mailbridge_domain::{
    CredentialField, CredentialFormat, Platform, PlatformCredentials, PlatformError, Result,
};
use serde::Serialize;
use tracing::debug;

/// Static metadata for one platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlatformDescriptor {
    pub platform: Platform,
    pub display_name: &'static str,
    /// `false` for recognised platforms that only have a placeholder.
    pub implemented: bool,
    pub credentials: &'static [CredentialField],
}

const MAILCHIMP_CREDENTIALS: &[CredentialField] = &[
    CredentialField::secret("apiKey", "API key", CredentialFormat::ApiKey),
    CredentialField::plain("serverPrefix", "Server prefix (e.g. us6)", CredentialFormat::Text)
        .optional(),
];

const SENDGRID_CREDENTIALS: &[CredentialField] =
    &[CredentialField::secret("apiKey", "API key", CredentialFormat::ApiKey)];

const BREVO_CREDENTIALS: &[CredentialField] =
    &[CredentialField::secret("apiKey", "API key", CredentialFormat::ApiKey)];

const KLAVIYO_CREDENTIALS: &[CredentialField] =
    &[CredentialField::secret("privateApiKey", "Private API key", CredentialFormat::ApiKey)];

const ACTIVECAMPAIGN_CREDENTIALS: &[CredentialField] = &[
    CredentialField::plain("apiUrl", "Account API URL", CredentialFormat::Url),
    CredentialField::secret("apiKey", "API key", CredentialFormat::ApiKey),
];

const CONSTANT_CONTACT_CREDENTIALS: &[CredentialField] = &[
    CredentialField::secret("accessToken", "OAuth access token", CredentialFormat::OauthToken),
    CredentialField::secret("refreshToken", "OAuth refresh token", CredentialFormat::OauthToken)
        .optional(),
];

const CAMPAIGN_MONITOR_CREDENTIALS: &[CredentialField] = &[
    CredentialField::secret("apiKey", "API key", CredentialFormat::ApiKey),
    CredentialField::plain("clientId", "Client ID", CredentialFormat::AccountId),
];

const CONVERTKIT_CREDENTIALS: &[CredentialField] =
    &[CredentialField::secret("apiSecret", "API secret", CredentialFormat::ApiKey)];

static PLATFORMS: [PlatformDescriptor; 8] = [
    PlatformDescriptor {
        platform: Platform::Mailchimp,
        display_name: "Mailchimp",
        implemented: true,
        credentials: MAILCHIMP_CREDENTIALS,
    },
    PlatformDescriptor {
        platform: Platform::SendGrid,
        display_name: "SendGrid",
        implemented: true,
        credentials: SENDGRID_CREDENTIALS,
    },
    PlatformDescriptor {
        platform: Platform::Brevo,
        display_name: "Brevo",
        implemented: true,
        credentials: BREVO_CREDENTIALS,
    },
    PlatformDescriptor {
        platform: Platform::Klaviyo,
        display_name: "Klaviyo",
        implemented: false,
        credentials: KLAVIYO_CREDENTIALS,
    },
    PlatformDescriptor {
        platform: Platform::ActiveCampaign,
        display_name: "ActiveCampaign",
        implemented: false,
        credentials: ACTIVECAMPAIGN_CREDENTIALS,
    },
    PlatformDescriptor {
        platform: Platform::ConstantContact,
        display_name: "Constant Contact",
        implemented: false,
        credentials: CONSTANT_CONTACT_CREDENTIALS,
    },
    PlatformDescriptor {
        platform: Platform::CampaignMonitor,
        display_name: "Campaign Monitor",
        implemented: false,
        credentials: CAMPAIGN_MONITOR_CREDENTIALS,
    },
    PlatformDescriptor {
        platform: Platform::ConvertKit,
        display_name: "ConvertKit",
        implemented: false,
        credentials: CONVERTKIT_CREDENTIALS,
    },
];

/// Every recognised platform in display order.
pub fn get_supported_platforms() -> &'static [PlatformDescriptor] {
    &PLATFORMS
}

/// Descriptor for a parsed platform.
pub fn descriptor(platform: Platform) -> Result<&'static PlatformDescriptor> {
    PLATFORMS
        .iter()
        .find(|entry| entry.platform == platform)
        .ok_or_else(|| PlatformError::UnsupportedPlatform(platform.to_string()))
}

fn lookup(identifier: &str) -> Option<&'static PlatformDescriptor> {
    Platform::parse(identifier).ok().and_then(|platform| descriptor(platform).ok())
}

/// True when the identifier names a recognised platform.
pub fn is_platform_supported(identifier: &str) -> bool {
    lookup(identifier).is_some()
}

/// True when the platform is recognised and has a working adapter.
pub fn is_platform_implemented(identifier: &str) -> bool {
    lookup(identifier).is_some_and(|entry| entry.implemented)
}

/// Ordered credential fields for a platform identifier.
pub fn get_required_credentials(identifier: &str) -> Result<&'static [CredentialField]> {
    let platform = Platform::parse(identifier)?;
    Ok(descriptor(platform)?.credentials)
}

/// Check credentials against the platform's descriptor.
///
/// Fails with `InvalidCredentials` naming, in descriptor order, every
/// required field that is absent or blank and every supplied field whose
/// value has the wrong shape. Unknown extra fields are ignored.
pub fn validate_credentials(platform: Platform, credentials: &PlatformCredentials) -> Result<()> {
    let entry = descriptor(platform)?;
    let mut missing = Vec::new();
    let mut malformed = Vec::new();

    for field in entry.credentials {
        match credentials.expose(field.field) {
            None if field.required => missing.push(field.field.to_string()),
            None => {}
            Some(value)
                if !matches_format(value, field.format)
                    || !matches_platform_rule(platform, field.field, value) =>
            {
                malformed.push(field.field.to_string());
            }
            Some(_) => {}
        }
    }

    if platform == Platform::Mailchimp && !missing.iter().any(|f| f == "apiKey") {
        let has_prefix = credentials.has_value("serverPrefix");
        let key_has_dc = credentials.expose("apiKey").and_then(mailchimp_datacenter).is_some();
        if !has_prefix && !key_has_dc && !malformed.iter().any(|f| f == "apiKey") {
            malformed.push("apiKey".to_string());
        }
    }

    if missing.is_empty() && malformed.is_empty() {
        return Ok(());
    }

    debug!(%platform, ?missing, ?malformed, "credential validation failed");
    Err(PlatformError::InvalidCredentials { platform, missing, malformed })
}

/// Datacenter suffix of a Mailchimp API key (`<key>-us6` → `us6`).
pub fn mailchimp_datacenter(api_key: &str) -> Option<&str> {
    let (_, dc) = api_key.trim().rsplit_once('-')?;
    mailchimp_server_prefix(dc)
}

/// An explicit Mailchimp server prefix, accepted only as a bare datacenter
/// label since it becomes part of the API hostname.
pub fn mailchimp_server_prefix(prefix: &str) -> Option<&str> {
    let prefix = prefix.trim();
    if !prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some(prefix)
    } else {
        None
    }
}

fn matches_platform_rule(platform: Platform, field: &str, value: &str) -> bool {
    match (platform, field) {
        (Platform::Mailchimp, "serverPrefix") => mailchimp_server_prefix(value).is_some(),
        _ => true,
    }
}

fn matches_format(value: &str, format: CredentialFormat) -> bool {
    match format {
        CredentialFormat::Url => value.starts_with("https://") || value.starts_with("http://"),
        CredentialFormat::ApiKey | CredentialFormat::OauthToken | CredentialFormat::AccountId => {
            !value.chars().any(char::is_whitespace)
        }
        CredentialFormat::Text => true,
    }
}
