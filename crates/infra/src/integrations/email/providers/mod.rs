//! Platform adapter implementations
//!
//! Each adapter owns its credentials, a base URL and a clone of the shared
//! [`HttpClient`](crate::http::HttpClient).

pub mod brevo;
pub mod mailchimp;
pub mod sendgrid;

pub use brevo::BrevoAdapter;
pub use mailchimp::MailchimpAdapter;
pub use sendgrid::SendGridAdapter;

use mailbridge_domain::{Platform, PlatformCredentials, PlatformError, Result, SecretValue};
use url::Url;

use crate::errors::InfraError;

/// Copy a required secret out of the credential map.
fn required_secret(
    platform: Platform,
    credentials: &PlatformCredentials,
    field: &str,
) -> Result<SecretValue> {
    credentials.expose(field).map(SecretValue::new).ok_or_else(|| {
        PlatformError::InvalidCredentials {
            platform,
            missing: vec![field.to_string()],
            malformed: Vec::new(),
        }
    })
}

/// Resolve the base URL, preferring a configured override.
fn resolve_base_url(override_url: Option<&str>, default_url: String) -> Result<String> {
    let base = override_url.map_or(default_url, |url| url.trim_end_matches('/').to_string());
    Url::parse(&base).map_err(|err| PlatformError::from(InfraError::from(err)))?;
    Ok(base)
}
