//! # MailBridge Infrastructure
//!
//! Infrastructure implementations of the core platform port.
//!
//! This crate contains:
//! - The retrying HTTP transport shared by every adapter
//! - Email-platform adapters (Mailchimp, SendGrid, Brevo) and their factory
//! - Configuration loading from environment variables and files
//!
//! ## Architecture
//! - Implements the `PlatformAdapter` trait defined in `mailbridge-core`
//! - Depends on `mailbridge-domain` and `mailbridge-core`
//! - Contains all "impure" code (network I/O, environment, filesystem)

pub mod config;
pub mod errors;
pub mod http;
pub mod integrations;

// Re-export commonly used items
pub use http::*;
pub use integrations::email::{create_platform_adapter, PlatformAdapterFactory};
