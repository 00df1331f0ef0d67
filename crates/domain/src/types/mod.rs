//! Normalized domain types
//!
//! Every adapter produces and consumes these shapes, so callers never branch
//! on platform identity.

pub mod campaign;
pub mod connection;
pub mod credentials;
pub mod list;
pub mod metrics;
pub mod pagination;
pub mod platform;

pub use campaign::{
    CampaignStatus, CreateCampaignInput, Extras, PlatformCampaign, UpdateCampaignInput,
};
pub use connection::{AccountInfo, ConnectionTestResult};
pub use credentials::{CredentialField, CredentialFormat, PlatformCredentials, SecretValue};
pub use list::PlatformList;
pub use metrics::PlatformMetrics;
pub use pagination::{PaginatedResult, PaginationOptions};
pub use platform::Platform;
