//! Adapter factory
//!
//! Turns a platform identifier plus a credential map into a ready adapter.
//! Checks run in a fixed order (supported, implemented, credentials) and no
//! network I/O happens here.

use mailbridge_core::{descriptor, is_platform_supported, validate_credentials, PlatformAdapter};
use mailbridge_domain::{Config, Platform, PlatformCredentials, PlatformError, Result};
use tracing::debug;

use super::providers::{BrevoAdapter, MailchimpAdapter, SendGridAdapter};
use crate::http::HttpClient;

/// Builds adapters that share one pooled HTTP client.
#[derive(Clone)]
pub struct PlatformAdapterFactory {
    http: HttpClient,
    config: Config,
}

impl PlatformAdapterFactory {
    /// Validate `config` and build the shared HTTP client.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let http = HttpClient::from_settings(&config.http)?;
        Ok(Self { http, config: config.clone() })
    }

    /// Create an adapter for `platform_id`.
    ///
    /// # Errors
    /// - `UnsupportedPlatform` for identifiers outside the registry
    /// - `NotImplemented` for recognised placeholder platforms
    /// - `InvalidCredentials` naming every missing or malformed field
    pub fn create(
        &self,
        platform_id: &str,
        credentials: &PlatformCredentials,
    ) -> Result<Box<dyn PlatformAdapter>> {
        if !is_platform_supported(platform_id) {
            return Err(PlatformError::UnsupportedPlatform(platform_id.trim().to_string()));
        }
        let platform = Platform::parse(platform_id)?;
        if !descriptor(platform)?.implemented {
            return Err(PlatformError::NotImplemented(platform));
        }
        validate_credentials(platform, credentials)?;

        let base_url = self.config.base_url_for(platform);
        debug!(%platform, base_url_override = base_url.is_some(), "creating platform adapter");

        let adapter: Box<dyn PlatformAdapter> = match platform {
            Platform::Mailchimp => {
                Box::new(MailchimpAdapter::new(self.http.clone(), credentials, base_url)?)
            }
            Platform::SendGrid => {
                Box::new(SendGridAdapter::new(self.http.clone(), credentials, base_url)?)
            }
            Platform::Brevo => {
                Box::new(BrevoAdapter::new(self.http.clone(), credentials, base_url)?)
            }
            other => return Err(PlatformError::NotImplemented(other)),
        };
        Ok(adapter)
    }
}

/// Create an adapter with the default configuration.
pub fn create_platform_adapter(
    platform_id: &str,
    credentials: &PlatformCredentials,
) -> Result<Box<dyn PlatformAdapter>> {
    PlatformAdapterFactory::new(&Config::default())?.create(platform_id, credentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_platform_is_rejected_before_credentials() {
        let err = create_platform_adapter("mailjet", &PlatformCredentials::new()).err().unwrap();
        assert_eq!(err, PlatformError::UnsupportedPlatform("mailjet".into()));
    }

    #[test]
    fn placeholder_platform_is_not_implemented_even_without_credentials() {
        let err = create_platform_adapter("klaviyo", &PlatformCredentials::new()).err().unwrap();
        assert_eq!(err, PlatformError::NotImplemented(Platform::Klaviyo));
    }

    #[test]
    fn missing_credentials_are_named() {
        let err = create_platform_adapter("sendgrid", &PlatformCredentials::new()).err().unwrap();
        match err {
            PlatformError::InvalidCredentials { platform, missing, .. } => {
                assert_eq!(platform, Platform::SendGrid);
                assert_eq!(missing, vec!["apiKey".to_string()]);
            }
            other => panic!("expected invalid credentials, got {:?}", other),
        }
    }

    #[test]
    fn builds_each_implemented_adapter() {
        let cases = [
            (
                "mailchimp",
                PlatformCredentials::new().with("apiKey", "key-us6"),
                Platform::Mailchimp,
            ),
            ("SendGrid", PlatformCredentials::new().with("apiKey", "SG.x"), Platform::SendGrid),
            (" brevo ", PlatformCredentials::new().with("apiKey", "xkeysib"), Platform::Brevo),
        ];
        for (id, credentials, expected) in cases {
            let adapter = create_platform_adapter(id, &credentials).expect("adapter");
            assert_eq!(adapter.platform(), expected);
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = Config::default();
        config.http.max_attempts = 0;
        assert!(matches!(PlatformAdapterFactory::new(&config), Err(PlatformError::Config(_))));
    }
}
