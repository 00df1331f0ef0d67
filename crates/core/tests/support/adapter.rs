use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use mailbridge_core::PlatformAdapter;
use mailbridge_domain::{
    AccountInfo, CampaignStatus, ConnectionTestResult, CreateCampaignInput, Extras,
    PaginatedResult, PaginationOptions, Platform, PlatformCampaign, PlatformError, PlatformList,
    PlatformMetrics, Result as DomainResult, UpdateCampaignInput,
};

/// In-memory `PlatformAdapter`.
///
/// Cursors are `mem:<offset>` strings so tests can observe them; anything
/// else is rejected as an invalid cursor, mirroring real adapters.
#[derive(Clone)]
pub struct InMemoryAdapter {
    platform: Platform,
    campaigns: Arc<Mutex<Vec<PlatformCampaign>>>,
    lists: Arc<Mutex<Vec<PlatformList>>>,
}

impl InMemoryAdapter {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            campaigns: Arc::new(Mutex::new(Vec::new())),
            lists: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Seed `count` campaigns with ids `c-000`, `c-001`, ...
    pub fn with_campaigns(self, count: usize) -> Self {
        {
            let mut campaigns = self.campaigns.lock().unwrap();
            for index in 0..count {
                let id = format!("c-{index:03}");
                campaigns.push(campaign(self.platform, &id, CampaignStatus::Sent));
            }
        }
        self
    }

    /// Seed `count` lists with ids `l-000`, `l-001`, ...
    pub fn with_lists(self, count: usize) -> Self {
        {
            let mut lists = self.lists.lock().unwrap();
            for index in 0..count {
                lists.push(PlatformList {
                    id: format!("l-{index:03}"),
                    platform: self.platform,
                    name: format!("List {index}"),
                    subscriber_count: index as u64 * 10,
                    updated_at: None,
                    extras: Extras::new(),
                });
            }
        }
        self
    }
}

fn campaign(platform: Platform, id: &str, status: CampaignStatus) -> PlatformCampaign {
    PlatformCampaign {
        id: id.to_string(),
        platform,
        name: format!("Campaign {id}"),
        status,
        subject: format!("Subject {id}"),
        from_name: None,
        reply_to: None,
        preview_text: None,
        list_ids: Vec::new(),
        created_at: Some(Utc::now()),
        scheduled_at: None,
        sent_at: None,
        extras: Extras::new(),
    }
}

fn page<T: Clone>(items: &[T], options: &PaginationOptions) -> DomainResult<PaginatedResult<T>> {
    options.validate()?;
    let offset = match options.cursor.as_deref() {
        None => 0,
        Some(cursor) => cursor
            .strip_prefix("mem:")
            .and_then(|raw| raw.parse::<usize>().ok())
            .ok_or_else(|| PlatformError::InvalidCursor(cursor.to_string()))?,
    };

    let end = (offset + options.page_size as usize).min(items.len());
    let slice = items.get(offset..end).unwrap_or_default().to_vec();
    let next = (end < items.len()).then(|| format!("mem:{end}"));
    Ok(PaginatedResult::new(slice, next))
}

#[async_trait]
impl PlatformAdapter for InMemoryAdapter {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn test_connection(&self) -> DomainResult<ConnectionTestResult> {
        Ok(ConnectionTestResult::connected("in-memory", AccountInfo::default()))
    }

    async fn list_campaigns(
        &self,
        options: &PaginationOptions,
    ) -> DomainResult<PaginatedResult<PlatformCampaign>> {
        page(&self.campaigns.lock().unwrap(), options)
    }

    async fn get_campaign(&self, id: &str) -> DomainResult<PlatformCampaign> {
        self.campaigns
            .lock()
            .unwrap()
            .iter()
            .find(|campaign| campaign.id == id)
            .cloned()
            .ok_or_else(|| PlatformError::not_found("campaign", id))
    }

    async fn create_campaign(&self, input: &CreateCampaignInput) -> DomainResult<PlatformCampaign> {
        input.validate()?;
        let mut campaigns = self.campaigns.lock().unwrap();
        let mut created =
            campaign(self.platform, &format!("c-{:03}", campaigns.len()), CampaignStatus::Draft);
        created.name = input.name.clone();
        created.subject = input.subject.clone();
        created.list_ids = input.list_ids.clone();
        campaigns.push(created.clone());
        Ok(created)
    }

    async fn update_campaign(
        &self,
        id: &str,
        input: &UpdateCampaignInput,
    ) -> DomainResult<PlatformCampaign> {
        input.validate()?;
        let mut campaigns = self.campaigns.lock().unwrap();
        let existing = campaigns
            .iter_mut()
            .find(|campaign| campaign.id == id)
            .ok_or_else(|| PlatformError::not_found("campaign", id))?;
        if existing.status.is_dispatched() {
            return Err(PlatformError::unsupported_operation("update_campaign", self.platform));
        }
        if let Some(name) = &input.name {
            existing.name = name.clone();
        }
        if let Some(subject) = &input.subject {
            existing.subject = subject.clone();
        }
        Ok(existing.clone())
    }

    async fn list_lists(
        &self,
        options: &PaginationOptions,
    ) -> DomainResult<PaginatedResult<PlatformList>> {
        page(&self.lists.lock().unwrap(), options)
    }

    async fn get_metrics(&self, campaign_id: &str) -> DomainResult<PlatformMetrics> {
        let campaign = self.get_campaign(campaign_id).await?;
        if !campaign.status.has_metrics() {
            return Err(PlatformError::MetricsUnavailable {
                campaign_id: campaign.id,
                status: campaign.status,
            });
        }
        Ok(PlatformMetrics::empty(campaign.id, self.platform))
    }
}
