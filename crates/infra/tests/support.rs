//! Shared helpers for `mailbridge-infra` integration tests.

use std::sync::OnceLock;

use mailbridge_domain::{Config, HttpSettings, Platform, PlatformCredentials};
use mailbridge_infra::PlatformAdapterFactory;
use tracing_subscriber::EnvFilter;

/// Install a test-writer subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    static INIT: OnceLock<()> = OnceLock::new();
    INIT.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Config pointing `platform` at a mock server, with millisecond backoff.
pub fn mock_config(platform: Platform, base_url: &str) -> Config {
    let mut config = Config {
        http: HttpSettings {
            timeout_secs: 5,
            call_budget_secs: 30,
            max_attempts: 3,
            base_backoff_ms: 1,
            max_backoff_ms: 5,
            user_agent: Some("mailbridge-tests".into()),
        },
        ..Config::default()
    };
    config.base_urls.insert(platform.as_str().to_string(), base_url.to_string());
    config
}

/// Factory whose adapters for `platform` talk to `base_url`.
pub fn mock_factory(platform: Platform, base_url: &str) -> PlatformAdapterFactory {
    init_tracing();
    PlatformAdapterFactory::new(&mock_config(platform, base_url)).expect("factory")
}

/// Well-formed credentials for an implemented platform.
pub fn credentials_for(platform: Platform) -> PlatformCredentials {
    match platform {
        Platform::Mailchimp => PlatformCredentials::new().with("apiKey", "0123abcd-us6"),
        Platform::SendGrid => PlatformCredentials::new().with("apiKey", "SG.integration"),
        Platform::Brevo => PlatformCredentials::new().with("apiKey", "xkeysib-integration"),
        other => panic!("{other} has no adapter"),
    }
}
