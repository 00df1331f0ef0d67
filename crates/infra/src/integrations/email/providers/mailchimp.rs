//! Mailchimp Marketing API v3 adapter
//!
//! Authentication is HTTP Basic with the API key as password. The key's
//! `-<dc>` suffix (or an explicit `serverPrefix`) selects the datacenter
//! host. Campaigns and audiences page with `count`/`offset` and report
//! `total_items`.

use async_trait::async_trait;
use mailbridge_core::platforms::registry::{mailchimp_datacenter, mailchimp_server_prefix};
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

const PLATFORM: Platform = Platform::Mailchimp;
const BASIC_AUTH_USER: &str = "mailbridge";

/// Adapter for Mailchimp.
pub struct MailchimpAdapter {
    http: HttpClient,
    base_url: String,
    api_key: SecretValue,
}

impl MailchimpAdapter {
    /// Build an adapter from already-validated credentials.
    ///
    /// `base_url_override` replaces the datacenter URL (sandboxes, tests).
    pub fn new(
        http: HttpClient,
        credentials: &PlatformCredentials,
        base_url_override: Option<&str>,
    ) -> Result<Self> {
        let api_key = required_secret(PLATFORM, credentials, "apiKey")?;
        let (datacenter, source) = match credentials.expose("serverPrefix") {
            Some(prefix) => (mailchimp_server_prefix(prefix), "serverPrefix"),
            None => (mailchimp_datacenter(api_key.expose()), "apiKey"),
        };
        let datacenter = datacenter.ok_or_else(|| PlatformError::InvalidCredentials {
            platform: PLATFORM,
            missing: Vec::new(),
            malformed: vec![source.to_string()],
        })?;
        let base_url = resolve_base_url(
            base_url_override,
            format!("https://{datacenter}.api.mailchimp.com/3.0"),
        )?;

        Ok(Self { http, base_url, api_key })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .basic_auth(BASIC_AUTH_USER, Some(self.api_key.expose()))
    }

    async fn fetch_campaign(&self, id: &str) -> Result<MailchimpCampaign> {
        check_id("campaign", id)?;
        let builder = self.request(Method::GET, &format!("/campaigns/{id}"));
        let response = self.http.send(PLATFORM, builder).await?;
        let response = ensure_success(PLATFORM, response, "campaign", Some(id)).await?;
        read_json(response).await
    }

    async fn put_content(&self, id: &str, html: &str) -> Result<()> {
        let builder = self
            .request(Method::PUT, &format!("/campaigns/{id}/content"))
            .json(&ContentBody { html });
        let response = self.http.send(PLATFORM, builder).await?;
        ensure_success(PLATFORM, response, "campaign", Some(id)).await?;
        Ok(())
    }

    /// Delete a draft left behind by a create that failed part-way.
    async fn discard_draft(&self, id: &str) {
        let builder = self.request(Method::DELETE, &format!("/campaigns/{id}"));
        let result = match self.http.send(PLATFORM, builder).await {
            Ok(response) => {
                ensure_success(PLATFORM, response, "campaign", Some(id)).await.map(drop)
            }
            Err(err) => Err(err),
        };
        match result {
            Ok(()) => info!(campaign_id = %id, "discarded partially created campaign"),
            Err(err) => {
                warn!(
                    campaign_id = %id,
                    error = %err,
                    "could not discard partially created campaign"
                );
            }
        }
    }
}

#[async_trait]
impl PlatformAdapter for MailchimpAdapter {
    fn platform(&self) -> Platform {
        PLATFORM
    }

    #[instrument(skip_all, fields(platform = %PLATFORM))]
    async fn test_connection(&self) -> Result<ConnectionTestResult> {
        let response = self.http.send(PLATFORM, self.request(Method::GET, "/")).await?;

        if matches!(response.status(), StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            info!(status = %response.status(), "Mailchimp rejected credentials");
            return Ok(ConnectionTestResult::rejected(format!(
                "Mailchimp rejected the API key (HTTP {})",
                response.status().as_u16()
            )));
        }

        let response = ensure_success(PLATFORM, response, "account", None).await?;
        let account: MailchimpAccount = read_json(response).await?;
        let message = match account.account_name.as_deref() {
            Some(name) => format!("Connected to Mailchimp account {name}"),
            None => "Connected to Mailchimp".to_string(),
        };

        Ok(ConnectionTestResult::connected(
            message,
            AccountInfo {
                account_id: account.account_id,
                account_name: account.account_name,
                email: account.email,
                plan: account.pricing_plan_type,
            },
        ))
    }

    #[instrument(skip_all, fields(platform = %PLATFORM, page_size = options.page_size))]
    async fn list_campaigns(
        &self,
        options: &PaginationOptions,
    ) -> Result<PaginatedResult<PlatformCampaign>> {
        let offset = cursor::start_offset(PLATFORM, CursorResource::Campaigns, options)?;
        let builder = self.request(Method::GET, "/campaigns").query(&[
            ("count", options.page_size.to_string()),
            ("offset", offset.to_string()),
            ("sort_field", "create_time".to_string()),
            ("sort_dir", "ASC".to_string()),
        ]);
        let response = self.http.send(PLATFORM, builder).await?;
        let response = ensure_success(PLATFORM, response, "campaigns", None).await?;
        let page: CampaignsPage = read_json(response).await?;

        let next = cursor::next_offset_cursor(
            PLATFORM,
            CursorResource::Campaigns,
            offset,
            page.campaigns.len(),
            page.total_items,
        );
        debug!(
            offset,
            returned = page.campaigns.len(),
            total = page.total_items,
            "listed campaigns"
        );

        Ok(PaginatedResult::new(page.campaigns.into_iter().map(normalize_campaign).collect(), next))
    }

    #[instrument(skip_all, fields(platform = %PLATFORM, campaign_id = %id))]
    async fn get_campaign(&self, id: &str) -> Result<PlatformCampaign> {
        self.fetch_campaign(id).await.map(normalize_campaign)
    }

    #[instrument(skip_all, fields(platform = %PLATFORM))]
    async fn create_campaign(&self, input: &CreateCampaignInput) -> Result<PlatformCampaign> {
        input.validate()?;
        if input.list_ids.len() > 1 {
            return Err(PlatformError::unsupported_operation(
                "create_campaign with multiple lists",
                PLATFORM,
            ));
        }

        let body = CampaignBody {
            campaign_type: Some("regular"),
            recipients: input
                .list_ids
                .first()
                .map(|list_id| RecipientsBody { list_id: list_id.as_str() }),
            settings: SettingsBody {
                subject_line: Some(input.subject.as_str()),
                title: Some(input.name.as_str()),
                from_name: input.from_name.as_deref(),
                reply_to: input.reply_to.as_deref().or(input.from_email.as_deref()),
                preview_text: input.preview_text.as_deref(),
            },
        };
        let builder = self.request(Method::POST, "/campaigns").json(&body);
        let response = self.http.send(PLATFORM, builder).await?;
        let response = ensure_success(PLATFORM, response, "campaign", None).await?;
        let created: MailchimpCampaign = read_json(response).await?;

        if let Some(html) = input.html_content.as_deref() {
            if let Err(err) = self.put_content(&created.id, html).await {
                self.discard_draft(&created.id).await;
                return Err(err);
            }
        }

        info!(campaign_id = %created.id, "created Mailchimp campaign");
        Ok(normalize_campaign(created))
    }

    #[instrument(skip_all, fields(platform = %PLATFORM, campaign_id = %id))]
    async fn update_campaign(
        &self,
        id: &str,
        input: &UpdateCampaignInput,
    ) -> Result<PlatformCampaign> {
        input.validate()?;
        match input.list_ids.as_deref() {
            Some([]) => {
                return Err(PlatformError::unsupported_operation(
                    "update_campaign removing the audience",
                    PLATFORM,
                ));
            }
            Some(ids) if ids.len() > 1 => {
                return Err(PlatformError::unsupported_operation(
                    "update_campaign with multiple lists",
                    PLATFORM,
                ));
            }
            _ => {}
        }

        let current = self.fetch_campaign(id).await?;
        let status = map_status(&current.status);
        if status.is_dispatched() {
            return Err(PlatformError::unsupported_operation(
                format!("update_campaign on a {status} campaign"),
                PLATFORM,
            ));
        }

        let body = CampaignBody {
            campaign_type: None,
            recipients: input
                .list_ids
                .as_ref()
                .and_then(|ids| ids.first())
                .map(|list_id| RecipientsBody { list_id: list_id.as_str() }),
            settings: SettingsBody {
                subject_line: input.subject.as_deref(),
                title: input.name.as_deref(),
                from_name: input.from_name.as_deref(),
                reply_to: input.reply_to.as_deref().or(input.from_email.as_deref()),
                preview_text: input.preview_text.as_deref(),
            },
        };

        let mut updated = current;
        if body.recipients.is_some() || !body.settings.is_empty() {
            let builder = self.request(Method::PATCH, &format!("/campaigns/{id}")).json(&body);
            let response = self.http.send(PLATFORM, builder).await?;
            let response = ensure_success(PLATFORM, response, "campaign", Some(id)).await?;
            updated = read_json(response).await?;
        }
        if let Some(html) = input.html_content.as_deref() {
            self.put_content(id, html).await?;
        }

        info!("updated Mailchimp campaign");
        Ok(normalize_campaign(updated))
    }

    #[instrument(skip_all, fields(platform = %PLATFORM, page_size = options.page_size))]
    async fn list_lists(
        &self,
        options: &PaginationOptions,
    ) -> Result<PaginatedResult<PlatformList>> {
        let offset = cursor::start_offset(PLATFORM, CursorResource::Lists, options)?;
        let builder = self.request(Method::GET, "/lists").query(&[
            ("count", options.page_size.to_string()),
            ("offset", offset.to_string()),
            ("sort_field", "date_created".to_string()),
            ("sort_dir", "ASC".to_string()),
        ]);
        let response = self.http.send(PLATFORM, builder).await?;
        let response = ensure_success(PLATFORM, response, "lists", None).await?;
        let page: ListsPage = read_json(response).await?;

        let next = cursor::next_offset_cursor(
            PLATFORM,
            CursorResource::Lists,
            offset,
            page.lists.len(),
            page.total_items,
        );

        Ok(PaginatedResult::new(page.lists.into_iter().map(normalize_list).collect(), next))
    }

    #[instrument(skip_all, fields(platform = %PLATFORM, campaign_id = %campaign_id))]
    async fn get_metrics(&self, campaign_id: &str) -> Result<PlatformMetrics> {
        let campaign = self.fetch_campaign(campaign_id).await?;
        let status = map_status(&campaign.status);
        if !status.has_metrics() {
            return Err(PlatformError::MetricsUnavailable { campaign_id: campaign.id, status });
        }

        let response = self
            .http
            .send(PLATFORM, self.request(Method::GET, &format!("/reports/{campaign_id}")))
            .await?;
        let response = ensure_success(PLATFORM, response, "campaign", Some(campaign_id)).await?;
        let report: MailchimpReport = read_json(response).await?;

        let bounced = report.bounces.hard_bounces.saturating_add(report.bounces.soft_bounces);
        Ok(PlatformMetrics {
            campaign_id: campaign.id,
            platform: PLATFORM,
            sent: report.emails_sent,
            delivered: report.emails_sent.saturating_sub(bounced),
            opened: report.opens.unique_opens,
            clicked: report.clicks.unique_subscriber_clicks,
            bounced,
            unsubscribed: report.unsubscribed,
        })
    }
}

/// Mailchimp campaign status → normalized status.
pub fn map_status(raw: &str) -> CampaignStatus {
    match raw {
        "save" => CampaignStatus::Draft,
        "schedule" => CampaignStatus::Scheduled,
        "sending" => CampaignStatus::Sending,
        "sent" => CampaignStatus::Sent,
        "paused" => CampaignStatus::Paused,
        _ => CampaignStatus::Unknown,
    }
}

fn normalize_campaign(raw: MailchimpCampaign) -> PlatformCampaign {
    let status = map_status(&raw.status);
    let settings = raw.settings.unwrap_or_default();
    let send_time = parse_timestamp(raw.send_time.as_deref());
    let (scheduled_at, sent_at) = match status {
        CampaignStatus::Scheduled | CampaignStatus::Paused => (send_time, None),
        CampaignStatus::Sending | CampaignStatus::Sent => (None, send_time),
        _ => (None, None),
    };

    let mut extras = Extras::new();
    if let Some(kind) = raw.campaign_type {
        extras.insert("type".into(), Value::String(kind));
    }
    if let Some(sent) = raw.emails_sent {
        extras.insert("emails_sent".into(), Value::from(sent));
    }
    if let Some(url) = non_blank(raw.archive_url) {
        extras.insert("archive_url".into(), Value::String(url));
    }

    PlatformCampaign {
        id: raw.id,
        platform: PLATFORM,
        name: settings.title.unwrap_or_default(),
        status,
        subject: settings.subject_line.unwrap_or_default(),
        from_name: non_blank(settings.from_name),
        reply_to: non_blank(settings.reply_to),
        preview_text: non_blank(settings.preview_text),
        list_ids: raw
            .recipients
            .and_then(|recipients| non_blank(recipients.list_id))
            .into_iter()
            .collect(),
        created_at: parse_timestamp(raw.create_time.as_deref()),
        scheduled_at,
        sent_at,
        extras,
    }
}

fn normalize_list(raw: MailchimpList) -> PlatformList {
    let mut extras = Extras::new();
    if let Some(visibility) = raw.visibility {
        extras.insert("visibility".into(), Value::String(visibility));
    }
    extras.insert("unsubscribe_count".into(), Value::from(raw.stats.unsubscribe_count));

    PlatformList {
        id: raw.id,
        platform: PLATFORM,
        name: raw.name,
        subscriber_count: raw.stats.member_count,
        updated_at: parse_timestamp(raw.stats.last_sub_date.as_deref())
            .or_else(|| parse_timestamp(raw.date_created.as_deref())),
        extras,
    }
}

/* -------------------------------------------------------------------------- */
/* Wire types */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Deserialize)]
struct MailchimpAccount {
    account_id: Option<String>,
    account_name: Option<String>,
    email: Option<String>,
    pricing_plan_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CampaignsPage {
    #[serde(default)]
    campaigns: Vec<MailchimpCampaign>,
    #[serde(default)]
    total_items: u64,
}

#[derive(Debug, Deserialize)]
struct MailchimpCampaign {
    id: String,
    #[serde(default)]
    status: String,
    #[serde(rename = "type", default)]
    campaign_type: Option<String>,
    #[serde(default)]
    create_time: Option<String>,
    #[serde(default)]
    send_time: Option<String>,
    #[serde(default)]
    emails_sent: Option<u64>,
    #[serde(default)]
    archive_url: Option<String>,
    #[serde(default)]
    recipients: Option<MailchimpRecipients>,
    #[serde(default)]
    settings: Option<MailchimpSettings>,
}

#[derive(Debug, Deserialize)]
struct MailchimpRecipients {
    #[serde(default)]
    list_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct MailchimpSettings {
    #[serde(default)]
    subject_line: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    from_name: Option<String>,
    #[serde(default)]
    reply_to: Option<String>,
    #[serde(default)]
    preview_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListsPage {
    #[serde(default)]
    lists: Vec<MailchimpList>,
    #[serde(default)]
    total_items: u64,
}

#[derive(Debug, Deserialize)]
struct MailchimpList {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    date_created: Option<String>,
    #[serde(default)]
    visibility: Option<String>,
    #[serde(default)]
    stats: MailchimpListStats,
}

#[derive(Debug, Default, Deserialize)]
struct MailchimpListStats {
    #[serde(default)]
    member_count: u64,
    #[serde(default)]
    unsubscribe_count: u64,
    #[serde(default)]
    last_sub_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MailchimpReport {
    #[serde(default)]
    emails_sent: u64,
    #[serde(default)]
    unsubscribed: u64,
    #[serde(default)]
    bounces: ReportBounces,
    #[serde(default)]
    opens: ReportOpens,
    #[serde(default)]
    clicks: ReportClicks,
}

#[derive(Debug, Default, Deserialize)]
struct ReportBounces {
    #[serde(default)]
    hard_bounces: u64,
    #[serde(default)]
    soft_bounces: u64,
}

#[derive(Debug, Default, Deserialize)]
struct ReportOpens {
    #[serde(default)]
    unique_opens: u64,
}

#[derive(Debug, Default, Deserialize)]
struct ReportClicks {
    #[serde(default)]
    unique_subscriber_clicks: u64,
}

#[derive(Debug, Serialize)]
struct CampaignBody<'a> {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    campaign_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    recipients: Option<RecipientsBody<'a>>,
    #[serde(skip_serializing_if = "SettingsBody::is_empty")]
    settings: SettingsBody<'a>,
}

#[derive(Debug, Serialize)]
struct RecipientsBody<'a> {
    list_id: &'a str,
}

#[derive(Debug, Serialize)]
struct SettingsBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    subject_line: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    from_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    preview_text: Option<&'a str>,
}

impl SettingsBody<'_> {
    fn is_empty(&self) -> bool {
        self.subject_line.is_none()
            && self.title.is_none()
            && self.from_name.is_none()
            && self.reply_to.is_none()
            && self.preview_text.is_none()
    }
}

#[derive(Debug, Serialize)]
struct ContentBody<'a> {
    html: &'a str,
}
