//! Platform adapter port interface
//!
//! The normalized operation set every email-marketing integration must
//! implement. Implementations live in `mailbridge-infra`.

use async_trait::async_trait;
use mailbridge_domain::{
    ConnectionTestResult, CreateCampaignInput, PaginatedResult, PaginationOptions, Platform,
    PlatformCampaign, PlatformList, PlatformMetrics, Result, UpdateCampaignInput,
};

/// Normalized contract over one platform account.
///
/// An adapter is bound to a single credential set for its whole lifetime and
/// keeps no per-call state: pagination position travels in the cursor, so
/// concurrent calls (including concurrent scans of the same collection) are
/// safe.
///
/// Operations a platform cannot perform fail with
/// `PlatformError::UnsupportedOperation`; callers should degrade gracefully.
#[async_trait]
pub trait PlatformAdapter: Send + Sync {
    /// Platform this adapter talks to.
    fn platform(&self) -> Platform;

    /// Verify the bound credentials without side effects.
    ///
    /// Remote rejection of the credentials is reported as `success: false`.
    /// Transport failures (DNS, connect, timeout) are still returned as
    /// errors.
    async fn test_connection(&self) -> Result<ConnectionTestResult>;

    /// One page of campaigns in a stable order.
    async fn list_campaigns(
        &self,
        options: &PaginationOptions,
    ) -> Result<PaginatedResult<PlatformCampaign>>;

    /// Fetch a campaign, failing with `NotFound` when absent remotely.
    async fn get_campaign(&self, id: &str) -> Result<PlatformCampaign>;

    /// Create a draft campaign. Never retried on ambiguous failures.
    async fn create_campaign(&self, input: &CreateCampaignInput) -> Result<PlatformCampaign>;

    /// Apply a partial update; fields absent from `input` stay untouched.
    async fn update_campaign(
        &self,
        id: &str,
        input: &UpdateCampaignInput,
    ) -> Result<PlatformCampaign>;

    /// One page of audience lists in a stable order.
    async fn list_lists(
        &self,
        options: &PaginationOptions,
    ) -> Result<PaginatedResult<PlatformList>>;

    /// Performance snapshot.
    ///
    /// Fails with `NotFound` when the campaign is absent and with
    /// `MetricsUnavailable` when it has not been sent yet.
    async fn get_metrics(&self, campaign_id: &str) -> Result<PlatformMetrics>;
}
