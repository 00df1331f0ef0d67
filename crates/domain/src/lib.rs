//! # MailBridge Domain
//!
//! Normalized email-marketing types shared by every platform adapter.
//!
//! This crate contains:
//! - Normalized campaign, list and metrics models
//! - Credential and pagination types
//! - The `PlatformError` taxonomy and `Result` alias
//! - Configuration structures
//!
//! ## Architecture
//! - No dependencies on other MailBridge crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
