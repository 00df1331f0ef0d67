use std::time::{Duration, Instant};

use mailbridge_domain::constants::{
    DEFAULT_BASE_BACKOFF_MS, DEFAULT_CALL_BUDGET_SECS, DEFAULT_HTTP_TIMEOUT_SECS,
    DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_BACKOFF_MS, DEFAULT_USER_AGENT,
};
use mailbridge_domain::{HttpSettings, Platform, PlatformError, Result};
use reqwest::header::RETRY_AFTER;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response, StatusCode};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::InfraError;

/// HTTP client with built-in retry, rate-limit and timeout support.
///
/// Cloning is cheap; clones share one connection pool.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    max_attempts: u32,
    base_backoff: Duration,
    max_backoff: Duration,
    call_budget: Duration,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Build a client from configured transport settings.
    pub fn from_settings(settings: &HttpSettings) -> Result<Self> {
        let mut builder = Self::builder()
            .timeout(settings.timeout())
            .call_budget(settings.call_budget())
            .max_attempts(settings.max_attempts)
            .base_backoff(settings.base_backoff())
            .max_backoff(settings.max_backoff());
        if let Some(agent) = &settings.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        builder.build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder with retry semantics.
    ///
    /// 429 is retried for every method. 5xx and per-attempt timeouts are
    /// retried only for idempotent methods. The final 429 becomes
    /// `RateLimitExceeded`; any other status is returned to the caller.
    /// The whole exchange, backoff included, is bounded by the call budget.
    pub async fn send(&self, platform: Platform, builder: RequestBuilder) -> Result<Response> {
        let started = Instant::now();
        let exchange = self.send_with_retries(platform, builder, started);
        match tokio::time::timeout(self.call_budget, exchange).await {
            Ok(result) => result,
            Err(_) => {
                let elapsed_ms = elapsed_ms(started);
                warn!(%platform, elapsed_ms, "HTTP call budget exhausted");
                Err(PlatformError::Timeout { platform, elapsed_ms })
            }
        }
    }

    async fn send_with_retries(
        &self,
        platform: Platform,
        builder: RequestBuilder,
        started: Instant,
    ) -> Result<Response> {
        let attempts = self.max_attempts.max(1);
        let request_id = Uuid::new_v4();

        for attempt in 1..=attempts {
            let cloned_builder = builder.try_clone().ok_or_else(|| {
                PlatformError::Transport(
                    "request body cannot be cloned; buffer the body to enable retries".into(),
                )
            })?;

            let request = cloned_builder.build().map_err(|err| {
                let infra: InfraError = err.into();
                PlatformError::from(infra)
            })?;

            let method = request.method().clone();
            let path = request.url().path().to_string();
            let idempotent = is_idempotent(&method);
            let last_attempt = attempt == attempts;
            debug!(%request_id, %platform, attempt, %method, %path, "sending HTTP request");

            match self.client.execute(request).await {
                Ok(response) => {
                    let status = response.status();
                    debug!(
                        %request_id, %platform, attempt, %method, %path, %status,
                        "received HTTP response"
                    );

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        let retry_after_secs = retry_after_secs(&response);
                        if last_attempt {
                            warn!(
                                %platform,
                                attempts,
                                ?retry_after_secs,
                                "rate limit retries exhausted"
                            );
                            return Err(PlatformError::RateLimitExceeded {
                                platform,
                                attempts,
                                retry_after_secs,
                            });
                        }
                        self.sleep(self.rate_limit_delay(attempt, retry_after_secs)).await;
                        continue;
                    }

                    if status.is_server_error() && idempotent && !last_attempt {
                        self.sleep(self.backoff_delay(attempt)).await;
                        continue;
                    }

                    return Ok(response);
                }
                Err(err) => {
                    debug!(
                        %request_id, %platform, attempt, %method, %path, error = %err,
                        "HTTP request failed"
                    );

                    if !last_attempt && should_retry_error(&err, idempotent) {
                        self.sleep(self.backoff_delay(attempt)).await;
                        continue;
                    }

                    if err.is_timeout() {
                        let elapsed_ms = elapsed_ms(started);
                        return Err(PlatformError::Timeout { platform, elapsed_ms });
                    }

                    let infra: InfraError = err.into();
                    return Err(PlatformError::from(infra));
                }
            }
        }

        Err(PlatformError::Transport(
            "http client exhausted retries without producing a result".into(),
        ))
    }

    fn backoff_delay(&self, retry_number: u32) -> Duration {
        let shift = retry_number.saturating_sub(1).min(8);
        let multiplier = 1u32 << shift;
        self.base_backoff.saturating_mul(multiplier).min(self.max_backoff)
    }

    fn rate_limit_delay(&self, retry_number: u32, retry_after_secs: Option<u64>) -> Duration {
        match retry_after_secs {
            Some(secs) => Duration::from_secs(secs).min(self.max_backoff),
            None => self.backoff_delay(retry_number),
        }
    }

    async fn sleep(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    call_budget: Duration,
    max_attempts: u32,
    base_backoff: Duration,
    max_backoff: Duration,
    user_agent: Option<String>,
    default_headers: Option<reqwest::header::HeaderMap>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            call_budget: Duration::from_secs(DEFAULT_CALL_BUDGET_SECS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_backoff: Duration::from_millis(DEFAULT_BASE_BACKOFF_MS),
            max_backoff: Duration::from_millis(DEFAULT_MAX_BACKOFF_MS),
            user_agent: None,
            default_headers: None,
        }
    }
}

impl HttpClientBuilder {
    /// Per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Upper bound for one `send`, retries and backoff included.
    pub fn call_budget(mut self, budget: Duration) -> Self {
        self.call_budget = budget;
        self
    }

    /// Configure the total number of attempts (initial try + retries).
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    pub fn max_backoff(mut self, backoff: Duration) -> Self {
        self.max_backoff = backoff;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    pub fn build(self) -> Result<HttpClient> {
        let agent = self.user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        let mut builder =
            ReqwestClient::builder().timeout(self.timeout).user_agent(agent).no_proxy();

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder.build().map_err(|err| {
            let infra: InfraError = err.into();
            PlatformError::from(infra)
        })?;

        Ok(HttpClient {
            client,
            max_attempts: self.max_attempts.max(1),
            base_backoff: self.base_backoff,
            max_backoff: self.max_backoff,
            call_budget: self.call_budget,
        })
    }
}

fn is_idempotent(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::PUT | Method::DELETE | Method::OPTIONS)
}

/// Connect failures never reached the server and are always safe to retry.
fn should_retry_error(err: &reqwest::Error, idempotent: bool) -> bool {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if err.is_connect() {
            return true;
        }
    }
    err.is_timeout() && idempotent
}

/// `Retry-After` in delta-seconds form. HTTP-date values are ignored.
fn retry_after_secs(response: &Response) -> Option<u64> {
    response.headers().get(RETRY_AFTER)?.to_str().ok()?.trim().parse().ok()
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
