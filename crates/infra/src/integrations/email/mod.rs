//! Email-marketing platform integrations
//!
//! One adapter per implemented platform, all speaking the
//! `mailbridge_core::PlatformAdapter` contract, plus the factory that
//! validates credentials and hands out adapters sharing one HTTP pool.

pub mod cursor;
pub mod factory;
pub mod providers;
mod response;

pub use factory::{create_platform_adapter, PlatformAdapterFactory};
pub use providers::{BrevoAdapter, MailchimpAdapter, SendGridAdapter};
