//! # MailBridge Core
//!
//! Platform-agnostic contract and static registries - no infrastructure
//! dependencies.
//!
//! This crate contains:
//! - The `PlatformAdapter` port every integration implements
//! - The credential descriptor registry and capability queries
//! - Pagination helpers written against the port
//!
//! ## Architecture Principles
//! - Only depends on `mailbridge-domain`
//! - No HTTP or platform protocol code
//! - All remote access via the `PlatformAdapter` trait

pub mod platform_ports;
pub mod platforms;

pub use platform_ports::PlatformAdapter;
pub use platforms::enumerate::{collect_all_campaigns, collect_all_lists};
pub use platforms::registry::{
    descriptor, get_required_credentials, get_supported_platforms, is_platform_implemented,
    is_platform_supported, validate_credentials, PlatformDescriptor,
};
