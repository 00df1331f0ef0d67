//! Integration tests for adapter creation and capability queries.

mod support;

use mailbridge_core::{get_required_credentials, get_supported_platforms, is_platform_implemented};
use mailbridge_domain::{Platform, PlatformCredentials, PlatformError};
use mailbridge_infra::create_platform_adapter;
use support::credentials_for;

#[test]
fn every_placeholder_platform_is_not_implemented() {
    let placeholders: Vec<_> =
        get_supported_platforms().iter().filter(|d| !d.implemented).map(|d| d.platform).collect();
    assert_eq!(placeholders.len(), 5);

    for platform in placeholders {
        let err = create_platform_adapter(platform.as_str(), &PlatformCredentials::new())
            .err()
            .unwrap();
        assert_eq!(err, PlatformError::NotImplemented(platform));
    }
}

#[test]
fn every_implemented_platform_builds_from_its_descriptor() {
    for descriptor in get_supported_platforms().iter().filter(|d| d.implemented) {
        assert!(is_platform_implemented(descriptor.platform.as_str()));
        let adapter = create_platform_adapter(
            descriptor.platform.as_str(),
            &credentials_for(descriptor.platform),
        )
        .expect("adapter");
        assert_eq!(adapter.platform(), descriptor.platform);
    }
}

#[test]
fn empty_sendgrid_credentials_name_api_key() {
    let required = get_required_credentials("sendgrid").unwrap();
    assert_eq!(required.iter().map(|f| f.field).collect::<Vec<_>>(), vec!["apiKey"]);

    match create_platform_adapter("sendgrid", &PlatformCredentials::new()) {
        Err(PlatformError::InvalidCredentials { missing, malformed, .. }) => {
            assert_eq!(missing, vec!["apiKey".to_string()]);
            assert!(malformed.is_empty());
        }
        Err(other) => panic!("expected invalid credentials, got {:?}", other),
        Ok(_) => panic!("expected invalid credentials"),
    }
}

#[test]
fn mailchimp_key_without_datacenter_is_malformed() {
    let credentials = PlatformCredentials::new().with("apiKey", "nodatacenter");
    match create_platform_adapter("mailchimp", &credentials) {
        Err(PlatformError::InvalidCredentials { malformed, .. }) => {
            assert_eq!(malformed, vec!["apiKey".to_string()]);
        }
        Err(other) => panic!("expected invalid credentials, got {:?}", other),
        Ok(_) => panic!("expected invalid credentials"),
    }
}

#[test]
fn unknown_identifier_is_unsupported() {
    for id in ["", "mailjet", "send grid"] {
        let err = create_platform_adapter(id, &credentials_for(Platform::SendGrid)).err().unwrap();
        assert_eq!(err.kind(), "unsupported_platform");
        assert!(err.is_local());
    }
}
