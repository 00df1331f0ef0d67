//! Brevo (formerly Sendinblue) API v3 adapter
//!
//! Authenticated with the `api-key` header. Campaign and list ids are
//! numeric; anything else cannot exist remotely.

use async_trait::async_trait;
use mailbridge_core::PlatformAdapter;
use mailbridge_domain::{
    AccountInfo, CampaignStatus, ConnectionTestResult, CreateCampaignInput, Extras,
    PaginatedResult, PaginationOptions, Platform, PlatformCampaign, PlatformCredentials,
    PlatformError, PlatformList, PlatformMetrics, Result, SecretValue, UpdateCampaignInput,
};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::{required_secret, resolve_base_url};
use crate::http::HttpClient;
use crate::integrations::email::cursor::{self, CursorResource};
use crate::integrations::email::response::{
    check_id, ensure_success, non_blank, parse_timestamp, read_json,
};

const PLATFORM: Platform = Platform::Brevo;
const DEFAULT_BASE_URL: &str = "https://api.brevo.com/v3";
const API_KEY_HEADER: &str = "api-key";
/// Brevo rejects list pages larger than this.
const MAX_LIST_PAGE: u32 = 50;

/// Adapter for Brevo.
pub struct BrevoAdapter {
    http: HttpClient,
    base_url: String,
    api_key: SecretValue,
}

impl BrevoAdapter {
    pub fn new(
        http: HttpClient,
        credentials: &PlatformCredentials,
        base_url_override: Option<&str>,
    ) -> Result<Self> {
        let api_key = required_secret(PLATFORM, credentials, "apiKey")?;
        let base_url = resolve_base_url(base_url_override, DEFAULT_BASE_URL.to_string())?;
        Ok(Self { http, base_url, api_key })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .header(API_KEY_HEADER, self.api_key.expose())
    }

    async fn fetch_campaign(&self, id: &str) -> Result<BrevoCampaign> {
        let numeric_id = campaign_id(id)?;
        let builder = self
            .request(Method::GET, &format!("/emailCampaigns/{numeric_id}"))
            .query(&[("statistics", "globalStats")]);
        let response = self.http.send(PLATFORM, builder).await?;
        let response = ensure_success(PLATFORM, response, "campaign", Some(id)).await?;
        read_json(response).await
    }
}

#[async_trait]
impl PlatformAdapter for BrevoAdapter {
    fn platform(&self) -> Platform {
        PLATFORM
    }

    #[instrument(skip_all, fields(platform = %PLATFORM))]
    async fn test_connection(&self) -> Result<ConnectionTestResult> {
        let response = self.http.send(PLATFORM, self.request(Method::GET, "/account")).await?;

        if matches!(response.status(), StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            info!(status = %response.status(), "Brevo rejected credentials");
            return Ok(ConnectionTestResult::rejected(format!(
                "Brevo rejected the API key (HTTP {})",
                response.status().as_u16()
            )));
        }

        let response = ensure_success(PLATFORM, response, "account", None).await?;
        let account: BrevoAccount = read_json(response).await?;
        let account_name = non_blank(account.company_name).or_else(|| {
            let full = format!(
                "{} {}",
                account.first_name.unwrap_or_default(),
                account.last_name.unwrap_or_default()
            );
            non_blank(Some(full.trim().to_string()))
        });
        let message = match account_name.as_deref() {
            Some(name) => format!("Connected to Brevo account {name}"),
            None => "Connected to Brevo".to_string(),
        };

        Ok(ConnectionTestResult::connected(
            message,
            AccountInfo {
                account_id: None,
                account_name,
                email: account.email,
                plan: account.plan.into_iter().next().and_then(|plan| plan.plan_type),
            },
        ))
    }

    #[instrument(skip_all, fields(platform = %PLATFORM, page_size = options.page_size))]
    async fn list_campaigns(
        &self,
        options: &PaginationOptions,
    ) -> Result<PaginatedResult<PlatformCampaign>> {
        let offset = cursor::start_offset(PLATFORM, CursorResource::Campaigns, options)?;
        let builder = self.request(Method::GET, "/emailCampaigns").query(&[
            ("limit", options.page_size.to_string()),
            ("offset", offset.to_string()),
            ("sort", "asc".to_string()),
        ]);
        let response = self.http.send(PLATFORM, builder).await?;
        let response = ensure_success(PLATFORM, response, "campaigns", None).await?;
        let page: CampaignsPage = read_json(response).await?;

        let next = cursor::next_offset_cursor(
            PLATFORM,
            CursorResource::Campaigns,
            offset,
            page.campaigns.len(),
            page.count,
        );
        debug!(offset, returned = page.campaigns.len(), total = page.count, "listed campaigns");

        Ok(PaginatedResult::new(page.campaigns.into_iter().map(normalize_campaign).collect(), next))
    }

    #[instrument(skip_all, fields(platform = %PLATFORM, campaign_id = %id))]
    async fn get_campaign(&self, id: &str) -> Result<PlatformCampaign> {
        self.fetch_campaign(id).await.map(normalize_campaign)
    }

    #[instrument(skip_all, fields(platform = %PLATFORM))]
    async fn create_campaign(&self, input: &CreateCampaignInput) -> Result<PlatformCampaign> {
        input.validate()?;
        let from_email = input
            .from_email
            .as_deref()
            .and_then(|email| non_blank(Some(email.to_string())))
            .ok_or_else(|| {
                PlatformError::InvalidInput("Brevo campaigns require a sender email".into())
            })?;
        let list_ids = parse_list_ids(&input.list_ids)?;

        let body = CampaignBody {
            name: Some(input.name.as_str()),
            subject: Some(input.subject.as_str()),
            campaign_type: Some("classic"),
            sender: Some(SenderBody { name: input.from_name.as_deref(), email: &from_email }),
            reply_to: input.reply_to.as_deref(),
            preview_text: input.preview_text.as_deref(),
            html_content: input.html_content.as_deref(),
            recipients: (!list_ids.is_empty()).then_some(RecipientsBody { list_ids }),
        };
        let builder = self.request(Method::POST, "/emailCampaigns").json(&body);
        let response = self.http.send(PLATFORM, builder).await?;
        let response = ensure_success(PLATFORM, response, "campaign", None).await?;
        let created: CreatedId = read_json(response).await?;
        info!(campaign_id = created.id, "created Brevo campaign");

        // The campaign exists remotely from here on.
        match self.get_campaign(&created.id.to_string()).await {
            Ok(campaign) => Ok(campaign),
            Err(err) => {
                warn!(campaign_id = created.id, error = %err, "read-back after create failed");
                Ok(created_from_input(created.id, input))
            }
        }
    }

    #[instrument(skip_all, fields(platform = %PLATFORM, campaign_id = %id))]
    async fn update_campaign(
        &self,
        id: &str,
        input: &UpdateCampaignInput,
    ) -> Result<PlatformCampaign> {
        input.validate()?;
        let list_ids = input.list_ids.as_deref().map(parse_list_ids).transpose()?;

        let current = self.fetch_campaign(id).await?;
        let status = map_status(&current.status);
        if status.is_dispatched() {
            return Err(PlatformError::unsupported_operation(
                format!("update_campaign on a {status} campaign"),
                PLATFORM,
            ));
        }

        let sender = if input.from_name.is_none() && input.from_email.is_none() {
            None
        } else {
            let existing = current.sender.as_ref();
            let email = input
                .from_email
                .as_deref()
                .or_else(|| existing.and_then(|sender| sender.email.as_deref()))
                .ok_or_else(|| {
                    PlatformError::InvalidInput("Brevo sender updates need a sender email".into())
                })?;
            let name = input
                .from_name
                .as_deref()
                .or_else(|| existing.and_then(|sender| sender.name.as_deref()));
            Some(SenderBody { name, email })
        };

        let body = CampaignBody {
            name: input.name.as_deref(),
            subject: input.subject.as_deref(),
            campaign_type: None,
            sender,
            reply_to: input.reply_to.as_deref(),
            preview_text: input.preview_text.as_deref(),
            html_content: input.html_content.as_deref(),
            recipients: list_ids.map(|list_ids| RecipientsBody { list_ids }),
        };
        let builder =
            self.request(Method::PUT, &format!("/emailCampaigns/{}", current.id)).json(&body);
        let response = self.http.send(PLATFORM, builder).await?;
        ensure_success(PLATFORM, response, "campaign", Some(id)).await?;

        info!("updated Brevo campaign");
        self.get_campaign(id).await
    }

    #[instrument(skip_all, fields(platform = %PLATFORM, page_size = options.page_size))]
    async fn list_lists(
        &self,
        options: &PaginationOptions,
    ) -> Result<PaginatedResult<PlatformList>> {
        let offset = cursor::start_offset(PLATFORM, CursorResource::Lists, options)?;
        let limit = options.page_size.min(MAX_LIST_PAGE);
        let builder = self.request(Method::GET, "/contacts/lists").query(&[
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
            ("sort", "asc".to_string()),
        ]);
        let response = self.http.send(PLATFORM, builder).await?;
        let response = ensure_success(PLATFORM, response, "lists", None).await?;
        let page: ListsPage = read_json(response).await?;

        let next = cursor::next_offset_cursor(
            PLATFORM,
            CursorResource::Lists,
            offset,
            page.lists.len(),
            page.count,
        );
        let lists = page
            .lists
            .into_iter()
            .map(|list| {
                let mut extras = Extras::new();
                if let Some(folder_id) = list.folder_id {
                    extras.insert("folder_id".into(), Value::from(folder_id));
                }
                PlatformList {
                    id: list.id.to_string(),
                    platform: PLATFORM,
                    name: list.name,
                    subscriber_count: list.unique_subscribers.unwrap_or(list.total_subscribers),
                    updated_at: None,
                    extras,
                }
            })
            .collect();

        Ok(PaginatedResult::new(lists, next))
    }

    #[instrument(skip_all, fields(platform = %PLATFORM, campaign_id = %campaign_id))]
    async fn get_metrics(&self, campaign_id: &str) -> Result<PlatformMetrics> {
        let campaign = self.fetch_campaign(campaign_id).await?;
        let status = map_status(&campaign.status);
        if !status.has_metrics() {
            return Err(PlatformError::MetricsUnavailable {
                campaign_id: campaign.id.to_string(),
                status,
            });
        }

        let stats = campaign.statistics.unwrap_or_default().global_stats.unwrap_or_default();
        Ok(PlatformMetrics {
            campaign_id: campaign.id.to_string(),
            platform: PLATFORM,
            sent: stats.sent,
            delivered: stats.delivered,
            opened: stats.unique_views,
            clicked: stats.unique_clicks,
            bounced: stats.hard_bounces.saturating_add(stats.soft_bounces),
            unsubscribed: stats.unsubscriptions,
        })
    }
}

/// Brevo campaign status → normalized status.
pub fn map_status(raw: &str) -> CampaignStatus {
    match raw {
        "draft" => CampaignStatus::Draft,
        "queued" => CampaignStatus::Scheduled,
        "in_process" => CampaignStatus::Sending,
        "sent" => CampaignStatus::Sent,
        "suspended" => CampaignStatus::Paused,
        _ => CampaignStatus::Unknown,
    }
}

fn campaign_id(id: &str) -> Result<u64> {
    check_id("campaign", id)?;
    id.trim().parse().map_err(|_| PlatformError::not_found("campaign", id))
}

fn parse_list_ids(ids: &[String]) -> Result<Vec<u64>> {
    ids.iter()
        .map(|id| {
            id.trim()
                .parse()
                .map_err(|_| {
                    PlatformError::InvalidInput(format!("Brevo list ids are numeric, got '{id}'"))
                })
        })
        .collect()
}

/// Normalized view of a just-created draft when Brevo cannot be re-read.
fn created_from_input(id: u64, input: &CreateCampaignInput) -> PlatformCampaign {
    PlatformCampaign {
        id: id.to_string(),
        platform: PLATFORM,
        name: input.name.clone(),
        status: CampaignStatus::Draft,
        subject: input.subject.clone(),
        from_name: non_blank(input.from_name.clone()),
        reply_to: non_blank(input.reply_to.clone()),
        preview_text: non_blank(input.preview_text.clone()),
        list_ids: input.list_ids.iter().map(|id| id.trim().to_string()).collect(),
        created_at: None,
        scheduled_at: None,
        sent_at: None,
        extras: Extras::new(),
    }
}

fn normalize_campaign(raw: BrevoCampaign) -> PlatformCampaign {
    let mut extras = Extras::new();
    if let Some(kind) = non_blank(raw.campaign_type) {
        extras.insert("type".into(), Value::String(kind));
    }
    if let Some(tag) = non_blank(raw.tag) {
        extras.insert("tag".into(), Value::String(tag));
    }

    let sender = raw.sender.unwrap_or_default();
    PlatformCampaign {
        id: raw.id.to_string(),
        platform: PLATFORM,
        name: raw.name,
        status: map_status(&raw.status),
        subject: raw.subject.unwrap_or_default(),
        from_name: non_blank(sender.name),
        reply_to: non_blank(raw.reply_to),
        preview_text: non_blank(raw.preview_text),
        list_ids: raw
            .recipients
            .map(|recipients| recipients.lists.iter().map(u64::to_string).collect())
            .unwrap_or_default(),
        created_at: parse_timestamp(raw.created_at.as_deref()),
        scheduled_at: parse_timestamp(raw.scheduled_at.as_deref()),
        sent_at: parse_timestamp(raw.sent_date.as_deref()),
        extras,
    }
}

/* -------------------------------------------------------------------------- */
/* Wire types */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BrevoAccount {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    company_name: Option<String>,
    #[serde(default)]
    plan: Vec<BrevoPlan>,
}

#[derive(Debug, Deserialize)]
struct BrevoPlan {
    #[serde(rename = "type", default)]
    plan_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CampaignsPage {
    #[serde(default)]
    campaigns: Vec<BrevoCampaign>,
    #[serde(default)]
    count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BrevoCampaign {
    id: u64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    subject: Option<String>,
    #[serde(rename = "type", default)]
    campaign_type: Option<String>,
    #[serde(default)]
    status: String,
    #[serde(default)]
    tag: Option<String>,
    #[serde(default)]
    sender: Option<BrevoSender>,
    #[serde(default)]
    reply_to: Option<String>,
    #[serde(default)]
    preview_text: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    scheduled_at: Option<String>,
    #[serde(default)]
    sent_date: Option<String>,
    #[serde(default)]
    recipients: Option<BrevoRecipients>,
    #[serde(default)]
    statistics: Option<BrevoStatistics>,
}

#[derive(Debug, Default, Deserialize)]
struct BrevoSender {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BrevoRecipients {
    #[serde(default)]
    lists: Vec<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BrevoStatistics {
    #[serde(default)]
    global_stats: Option<GlobalStats>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GlobalStats {
    #[serde(default)]
    sent: u64,
    #[serde(default)]
    delivered: u64,
    #[serde(default)]
    unique_views: u64,
    #[serde(default)]
    unique_clicks: u64,
    #[serde(default)]
    hard_bounces: u64,
    #[serde(default)]
    soft_bounces: u64,
    #[serde(default)]
    unsubscriptions: u64,
}

#[derive(Debug, Deserialize)]
struct CreatedId {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct ListsPage {
    #[serde(default)]
    lists: Vec<BrevoList>,
    #[serde(default)]
    count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BrevoList {
    id: u64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    total_subscribers: u64,
    #[serde(default)]
    unique_subscribers: Option<u64>,
    #[serde(default)]
    folder_id: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CampaignBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subject: Option<&'a str>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    campaign_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sender: Option<SenderBody<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    preview_text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    html_content: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    recipients: Option<RecipientsBody>,
}

#[derive(Debug, Serialize)]
struct SenderBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    email: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecipientsBody {
    list_ids: Vec<u64>,
}
