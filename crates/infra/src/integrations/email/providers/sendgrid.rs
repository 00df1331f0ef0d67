//! SendGrid Marketing Campaigns adapter
//!
//! Campaigns are Single Sends. Collections page with `page_size` and an
//! opaque `page_token` carried in the `_metadata.next` link.

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
use tracing::{debug, info, instrument};
use url::Url;

use super::{required_secret, resolve_base_url};
use crate::http::HttpClient;
use crate::integrations::email::cursor::{self, CursorPosition, CursorResource};
use crate::integrations::email::response::{
    check_id, ensure_success, non_blank, parse_timestamp, read_json,
};

const PLATFORM: Platform = Platform::SendGrid;
const DEFAULT_BASE_URL: &str = "https://api.sendgrid.com";

/// Adapter for SendGrid.
pub struct SendGridAdapter {
    http: HttpClient,
    base_url: String,
    api_key: SecretValue,
}

impl SendGridAdapter {
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
            .bearer_auth(self.api_key.expose())
    }

    async fn fetch_single_send(&self, id: &str) -> Result<SingleSend> {
        check_id("campaign", id)?;
        let builder = self.request(Method::GET, &format!("/v3/marketing/singlesends/{id}"));
        let response = self.http.send(PLATFORM, builder).await?;
        let response = ensure_success(PLATFORM, response, "campaign", Some(id)).await?;
        read_json(response).await
    }

    fn page_query(
        &self,
        resource: CursorResource,
        options: &PaginationOptions,
    ) -> Result<Vec<(&'static str, String)>> {
        let mut query = vec![("page_size", options.page_size.to_string())];
        if let Some(token) = cursor::start_token(PLATFORM, resource, options)? {
            query.push(("page_token", token));
        }
        Ok(query)
    }
}

#[async_trait]
impl PlatformAdapter for SendGridAdapter {
    fn platform(&self) -> Platform {
        PLATFORM
    }

    #[instrument(skip_all, fields(platform = %PLATFORM))]
    async fn test_connection(&self) -> Result<ConnectionTestResult> {
        let builder = self.request(Method::GET, "/v3/user/account");
        let response = self.http.send(PLATFORM, builder).await?;

        if matches!(response.status(), StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            info!(status = %response.status(), "SendGrid rejected credentials");
            return Ok(ConnectionTestResult::rejected(format!(
                "SendGrid rejected the API key (HTTP {})",
                response.status().as_u16()
            )));
        }

        let response = ensure_success(PLATFORM, response, "account", None).await?;
        let account: SendGridAccount = read_json(response).await?;

        Ok(ConnectionTestResult::connected(
            "Connected to SendGrid",
            AccountInfo { plan: account.account_type, ..AccountInfo::default() },
        ))
    }

    #[instrument(skip_all, fields(platform = %PLATFORM, page_size = options.page_size))]
    async fn list_campaigns(
        &self,
        options: &PaginationOptions,
    ) -> Result<PaginatedResult<PlatformCampaign>> {
        let query = self.page_query(CursorResource::Campaigns, options)?;
        let builder = self.request(Method::GET, "/v3/marketing/singlesends").query(&query);
        let response = self.http.send(PLATFORM, builder).await?;
        let response = ensure_success(PLATFORM, response, "campaigns", None).await?;
        let page: Page<SingleSend> = read_json(response).await?;

        let next = next_cursor(CursorResource::Campaigns, &page)?;
        debug!(returned = page.result.len(), has_more = next.is_some(), "listed single sends");

        Ok(PaginatedResult::new(page.result.into_iter().map(normalize_campaign).collect(), next))
    }

    #[instrument(skip_all, fields(platform = %PLATFORM, campaign_id = %id))]
    async fn get_campaign(&self, id: &str) -> Result<PlatformCampaign> {
        self.fetch_single_send(id).await.map(normalize_campaign)
    }

    #[instrument(skip_all, fields(platform = %PLATFORM))]
    async fn create_campaign(&self, input: &CreateCampaignInput) -> Result<PlatformCampaign> {
        input.validate()?;
        reject_sender_fields(
            "create_campaign",
            [
                ("from_name", input.from_name.is_some()),
                ("from_email", input.from_email.is_some()),
                ("reply_to", input.reply_to.is_some()),
                ("preview_text", input.preview_text.is_some()),
            ],
        )?;

        let body = SingleSendBody {
            name: Some(input.name.as_str()),
            send_to: (!input.list_ids.is_empty())
                .then_some(SendToBody { list_ids: &input.list_ids }),
            email_config: Some(EmailConfigBody {
                subject: Some(input.subject.as_str()),
                html_content: input.html_content.as_deref(),
            }),
        };
        let builder = self.request(Method::POST, "/v3/marketing/singlesends").json(&body);
        let response = self.http.send(PLATFORM, builder).await?;
        let response = ensure_success(PLATFORM, response, "campaign", None).await?;
        let created: SingleSend = read_json(response).await?;

        info!(campaign_id = %created.id, "created SendGrid single send");
        Ok(normalize_campaign(created))
    }

    #[instrument(skip_all, fields(platform = %PLATFORM, campaign_id = %id))]
    async fn update_campaign(
        &self,
        id: &str,
        input: &UpdateCampaignInput,
    ) -> Result<PlatformCampaign> {
        input.validate()?;
        reject_sender_fields(
            "update_campaign",
            [
                ("from_name", input.from_name.is_some()),
                ("from_email", input.from_email.is_some()),
                ("reply_to", input.reply_to.is_some()),
                ("preview_text", input.preview_text.is_some()),
            ],
        )?;

        let current = self.fetch_single_send(id).await?;
        let status = map_status(&current.status);
        if status.is_dispatched() {
            return Err(PlatformError::unsupported_operation(
                format!("update_campaign on a {status} campaign"),
                PLATFORM,
            ));
        }

        let email_config = EmailConfigBody {
            subject: input.subject.as_deref(),
            html_content: input.html_content.as_deref(),
        };
        let body = SingleSendBody {
            name: input.name.as_deref(),
            send_to: input.list_ids.as_deref().map(|list_ids| SendToBody { list_ids }),
            email_config: (!email_config.is_empty()).then_some(email_config),
        };
        let builder = self
            .request(Method::PATCH, &format!("/v3/marketing/singlesends/{id}"))
            .json(&body);
        let response = self.http.send(PLATFORM, builder).await?;
        let response = ensure_success(PLATFORM, response, "campaign", Some(id)).await?;
        let updated: SingleSend = read_json(response).await?;

        info!("updated SendGrid single send");
        Ok(normalize_campaign(updated))
    }

    #[instrument(skip_all, fields(platform = %PLATFORM, page_size = options.page_size))]
    async fn list_lists(
        &self,
        options: &PaginationOptions,
    ) -> Result<PaginatedResult<PlatformList>> {
        let query = self.page_query(CursorResource::Lists, options)?;
        let builder = self.request(Method::GET, "/v3/marketing/lists").query(&query);
        let response = self.http.send(PLATFORM, builder).await?;
        let response = ensure_success(PLATFORM, response, "lists", None).await?;
        let page: Page<SendGridList> = read_json(response).await?;

        let next = next_cursor(CursorResource::Lists, &page)?;
        let lists = page
            .result
            .into_iter()
            .map(|list| PlatformList {
                id: list.id,
                platform: PLATFORM,
                name: list.name,
                subscriber_count: list.contact_count,
                updated_at: None,
                extras: Extras::new(),
            })
            .collect();

        Ok(PaginatedResult::new(lists, next))
    }

    #[instrument(skip_all, fields(platform = %PLATFORM, campaign_id = %campaign_id))]
    async fn get_metrics(&self, campaign_id: &str) -> Result<PlatformMetrics> {
        let single_send = self.fetch_single_send(campaign_id).await?;
        let status = map_status(&single_send.status);
        if !status.has_metrics() {
            return Err(PlatformError::MetricsUnavailable { campaign_id: single_send.id, status });
        }

        let builder =
            self.request(Method::GET, &format!("/v3/marketing/stats/singlesends/{campaign_id}"));
        let response = self.http.send(PLATFORM, builder).await?;
        let response = ensure_success(PLATFORM, response, "campaign", Some(campaign_id)).await?;
        let stats: StatsResponse = read_json(response).await?;

        let mut metrics = PlatformMetrics::empty(single_send.id, PLATFORM);
        for row in stats.results {
            let s = row.stats;
            metrics.sent = metrics.sent.saturating_add(s.requests);
            metrics.delivered = metrics.delivered.saturating_add(s.delivered);
            metrics.opened = metrics.opened.saturating_add(s.unique_opens);
            metrics.clicked = metrics.clicked.saturating_add(s.unique_clicks);
            metrics.bounced = metrics.bounced.saturating_add(s.bounces);
            metrics.unsubscribed = metrics.unsubscribed.saturating_add(s.unsubscribes);
        }
        Ok(metrics)
    }
}

/// Sender identity and preview text belong to a SendGrid sender and design,
/// which single sends only reference by id.
fn reject_sender_fields<const N: usize>(operation: &str, fields: [(&str, bool); N]) -> Result<()> {
    let supplied: Vec<&str> =
        fields.iter().filter(|(_, present)| *present).map(|(name, _)| *name).collect();
    if supplied.is_empty() {
        return Ok(());
    }
    Err(PlatformError::unsupported_operation(
        format!("{operation} setting {}", supplied.join(", ")),
        PLATFORM,
    ))
}

/// SendGrid single-send status → normalized status.
pub fn map_status(raw: &str) -> CampaignStatus {
    match raw {
        "draft" => CampaignStatus::Draft,
        "scheduled" => CampaignStatus::Scheduled,
        "triggered" => CampaignStatus::Sent,
        _ => CampaignStatus::Unknown,
    }
}

/// Wrap the `page_token` of the `_metadata.next` link, if any.
fn next_cursor<T>(resource: CursorResource, page: &Page<T>) -> Result<Option<String>> {
    let Some(next) = page.metadata.as_ref().and_then(|m| non_blank(m.next.clone())) else {
        return Ok(None);
    };
    let url = Url::parse(&next)
        .map_err(|err| {
            PlatformError::Transport(format!("SendGrid returned an invalid next link: {err}"))
        })?;
    let token = url
        .query_pairs()
        .find(|(key, _)| key == "page_token")
        .map(|(_, value)| value.into_owned())
        .filter(|token| !token.is_empty())
        .ok_or_else(|| PlatformError::Transport("SendGrid next link has no page_token".into()))?;

    Ok(Some(cursor::encode(PLATFORM, resource, CursorPosition::Token(token))))
}

fn normalize_campaign(raw: SingleSend) -> PlatformCampaign {
    let status = map_status(&raw.status);
    let send_at = parse_timestamp(raw.send_at.as_deref());
    let (scheduled_at, sent_at) = match status {
        CampaignStatus::Scheduled => (send_at, None),
        CampaignStatus::Sent => (None, send_at),
        _ => (None, None),
    };

    let mut extras = Extras::new();
    if !raw.categories.is_empty() {
        extras.insert("categories".into(), Value::from(raw.categories));
    }
    if let Some(updated_at) = non_blank(raw.updated_at) {
        extras.insert("updated_at".into(), Value::String(updated_at));
    }
    if let Some(is_abtest) = raw.is_abtest {
        extras.insert("is_abtest".into(), Value::Bool(is_abtest));
    }

    let email_config = raw.email_config.unwrap_or_default();
    PlatformCampaign {
        id: raw.id,
        platform: PLATFORM,
        name: raw.name,
        status,
        subject: email_config.subject.unwrap_or_default(),
        from_name: None,
        reply_to: None,
        preview_text: None,
        list_ids: raw.send_to.map(|send_to| send_to.list_ids).unwrap_or_default(),
        created_at: parse_timestamp(raw.created_at.as_deref()),
        scheduled_at,
        sent_at,
        extras,
    }
}

/* -------------------------------------------------------------------------- */
/* Wire types */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Deserialize)]
struct SendGridAccount {
    #[serde(rename = "type", default)]
    account_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    result: Vec<T>,
    #[serde(rename = "_metadata", default)]
    metadata: Option<PageMetadata>,
}

#[derive(Debug, Deserialize)]
struct PageMetadata {
    #[serde(default)]
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SingleSend {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    categories: Vec<String>,
    #[serde(default)]
    send_at: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
    #[serde(default)]
    is_abtest: Option<bool>,
    #[serde(default)]
    send_to: Option<SendTo>,
    #[serde(default)]
    email_config: Option<EmailConfig>,
}

#[derive(Debug, Deserialize)]
struct SendTo {
    #[serde(default)]
    list_ids: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct EmailConfig {
    #[serde(default)]
    subject: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SendGridList {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    contact_count: u64,
}

#[derive(Debug, Deserialize)]
struct StatsResponse {
    #[serde(default)]
    results: Vec<StatsRow>,
}

#[derive(Debug, Deserialize)]
struct StatsRow {
    #[serde(default)]
    stats: SingleSendStats,
}

#[derive(Debug, Default, Deserialize)]
struct SingleSendStats {
    #[serde(default)]
    requests: u64,
    #[serde(default)]
    delivered: u64,
    #[serde(default)]
    unique_opens: u64,
    #[serde(default)]
    unique_clicks: u64,
    #[serde(default)]
    bounces: u64,
    #[serde(default)]
    unsubscribes: u64,
}

#[derive(Debug, Serialize)]
struct SingleSendBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    send_to: Option<SendToBody<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email_config: Option<EmailConfigBody<'a>>,
}

#[derive(Debug, Serialize)]
struct SendToBody<'a> {
    list_ids: &'a [String],
}

#[derive(Debug, Serialize)]
struct EmailConfigBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    subject: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    html_content: Option<&'a str>,
}

impl EmailConfigBody<'_> {
    fn is_empty(&self) -> bool {
        self.subject.is_none() && self.html_content.is_none()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn adapter(server: &MockServer) -> SendGridAdapter {
        let http = HttpClient::builder()
            .base_backoff(Duration::from_millis(5))
            .max_backoff(Duration::from_millis(20))
            .build()
            .expect("http client");
        let credentials = PlatformCredentials::new().with("apiKey", "SG.test-key");
        SendGridAdapter::new(http, &credentials, Some(&server.uri())).expect("adapter")
    }

    fn single_send(id: &str, status: &str) -> Value {
        json!({
            "id": id,
            "name": format!("Single send {id}"),
            "status": status,
            "categories": ["promo"],
            "send_at": "2024-06-01T12:00:00Z",
            "created_at": "2024-05-30T08:00:00Z",
            "updated_at": "2024-05-31T08:00:00Z",
            "is_abtest": false,
            "send_to": { "list_ids": ["l1", "l2"], "segment_ids": [], "all": false },
            "email_config": { "subject": "Summer", "html_content": "<p/>", "sender_id": 7 }
        })
    }

    #[test]
    fn status_table() {
        assert_eq!(map_status("draft"), CampaignStatus::Draft);
        assert_eq!(map_status("scheduled"), CampaignStatus::Scheduled);
        assert_eq!(map_status("triggered"), CampaignStatus::Sent);
        assert_eq!(map_status("archived"), CampaignStatus::Unknown);
    }

    #[tokio::test]
    async fn test_connection_uses_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v3/user/account"))
            .and(header("authorization", "Bearer SG.test-key"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"type": "paid", "reputation": 99.7})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let result = adapter(&server).test_connection().await.unwrap();
        assert!(result.success);
        assert_eq!(result.account.unwrap().plan.as_deref(), Some("paid"));
    }

    #[tokio::test]
    async fn test_connection_forbidden_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v3/user/account"))
            .respond_with(ResponseTemplate::new(403))
            .expect(1)
            .mount(&server)
            .await;

        let result = adapter(&server).test_connection().await.unwrap();
        assert!(!result.success);
        assert!(result.message.contains("403"));
    }

    #[tokio::test]
    async fn pages_through_single_sends_with_wrapped_token() {
        let server = MockServer::start().await;
        let next_link =
            format!("{}/v3/marketing/singlesends?page_size=1&page_token=tok-2", server.uri());
        Mock::given(method("GET"))
            .and(path("/v3/marketing/singlesends"))
            .and(query_param("page_token", "tok-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": [single_send("b", "draft")],
                "_metadata": { "self": "ignored" }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v3/marketing/singlesends"))
            .and(query_param("page_size", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": [single_send("a", "triggered")],
                "_metadata": { "next": next_link, "count": 2 }
            })))
            .mount(&server)
            .await;

        let adapter = adapter(&server);
        let first = adapter.list_campaigns(&PaginationOptions::first_page(1)).await.unwrap();
        assert_eq!(first.items[0].id, "a");
        assert_eq!(first.items[0].status, CampaignStatus::Sent);
        assert!(first.items[0].sent_at.is_some());
        let cursor = first.next_cursor.unwrap();
        assert!(!cursor.contains("tok-2"));

        let second = adapter.list_campaigns(&PaginationOptions::after(cursor, 1)).await.unwrap();
        assert_eq!(second.items[0].id, "b");
        assert!(!second.has_more);
    }

    #[tokio::test]
    async fn get_campaign_reads_subject_and_lists() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v3/marketing/singlesends/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(single_send("abc", "scheduled")))
            .mount(&server)
            .await;

        let campaign = adapter(&server).get_campaign("abc").await.unwrap();
        assert_eq!(campaign.subject, "Summer");
        assert_eq!(campaign.list_ids, vec!["l1".to_string(), "l2".to_string()]);
        assert!(campaign.scheduled_at.is_some());
        assert_eq!(campaign.extras["categories"], json!(["promo"]));
    }

    #[tokio::test]
    async fn create_posts_single_send() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v3/marketing/singlesends"))
            .and(body_json(json!({
                "name": "Launch",
                "send_to": { "list_ids": ["l1"] },
                "email_config": { "subject": "Hello" }
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(single_send("new", "draft")))
            .expect(1)
            .mount(&server)
            .await;

        let created = adapter(&server)
            .create_campaign(&CreateCampaignInput::new("Launch", "Hello").with_list("l1"))
            .await
            .unwrap();
        assert_eq!(created.id, "new");
        assert_eq!(created.status, CampaignStatus::Draft);
    }

    #[tokio::test]
    async fn update_patches_only_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v3/marketing/singlesends/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(single_send("abc", "draft")))
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/v3/marketing/singlesends/abc"))
            .and(body_json(json!({ "name": "Renamed" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(single_send("abc", "draft")))
            .expect(1)
            .mount(&server)
            .await;

        let update = UpdateCampaignInput { name: Some("Renamed".into()), ..Default::default() };
        adapter(&server).update_campaign("abc", &update).await.unwrap();
    }

    #[tokio::test]
    async fn sender_fields_are_unsupported_without_io() {
        let server = MockServer::start().await;
        let adapter = adapter(&server);

        let create =
            CreateCampaignInput::new("Launch", "Hello").with_sender("Shop", "shop@example.com");
        let err = adapter.create_campaign(&create).await.unwrap_err();
        assert!(matches!(
            err,
            PlatformError::UnsupportedOperation { ref operation, platform: Platform::SendGrid }
                if operation.contains("from_name") && operation.contains("from_email")
        ));

        let update =
            UpdateCampaignInput { from_name: Some("New Sender".into()), ..Default::default() };
        let err = adapter.update_campaign("abc", &update).await.unwrap_err();
        assert!(matches!(
            err,
            PlatformError::UnsupportedOperation { ref operation, .. }
                if operation.contains("from_name")
        ));

        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn metrics_saturate_on_oversized_counters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v3/marketing/singlesends/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(single_send("abc", "triggered")))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v3/marketing/stats/singlesends/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    { "stats": { "requests": u64::MAX, "bounces": u64::MAX } },
                    { "stats": { "requests": 5, "bounces": 1 } }
                ]
            })))
            .mount(&server)
            .await;

        let metrics = adapter(&server).get_metrics("abc").await.unwrap();
        assert_eq!(metrics.sent, u64::MAX);
        assert_eq!(metrics.bounced, u64::MAX);
    }

    #[tokio::test]
    async fn lists_have_no_update_time() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v3/marketing/lists"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": [{ "id": "l1", "name": "VIP", "contact_count": 41 }],
                "_metadata": {}
            })))
            .mount(&server)
            .await;

        let page = adapter(&server).list_lists(&PaginationOptions::default()).await.unwrap();
        assert_eq!(page.items[0].subscriber_count, 41);
        assert!(page.items[0].updated_at.is_none());
        assert!(!page.has_more);
    }

    #[tokio::test]
    async fn metrics_map_stats_row() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v3/marketing/singlesends/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(single_send("abc", "triggered")))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v3/marketing/stats/singlesends/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{
                    "id": "abc",
                    "aggregation": "total",
                    "stats": {
                        "requests": 200, "delivered": 190, "unique_opens": 80,
                        "unique_clicks": 12, "bounces": 10, "unsubscribes": 3, "opens": 150
                    }
                }]
            })))
            .mount(&server)
            .await;

        let metrics = adapter(&server).get_metrics("abc").await.unwrap();
        assert_eq!(metrics.sent, 200);
        assert_eq!(metrics.delivered, 190);
        assert_eq!(metrics.opened, 80);
        assert_eq!(metrics.clicked, 12);
        assert_eq!(metrics.bounced, 10);
        assert_eq!(metrics.unsubscribed, 3);
    }

    #[tokio::test]
    async fn metrics_for_scheduled_send_are_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v3/marketing/singlesends/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(single_send("abc", "scheduled")))
            .mount(&server)
            .await;

        let err = adapter(&server).get_metrics("abc").await.unwrap_err();
        assert_eq!(err.kind(), "metrics_unavailable");
    }
}
