// src/integrations/http.rs
//
// HTTP transport for server-rendered sources, plus the per-pipeline rate
// limiter every outbound call goes through.

use async_trait::async_trait;
use reqwest::{header, Client};
use std::time::{Duration, Instant};

use crate::error::{AppError, AppResult};
use crate::integrations::ports::DocumentFetcher;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

/// Politeness limiter: enforces a minimum interval before every outbound
/// call. One instance per pipeline; never shared across concurrent
/// pipelines, so each pipeline pays its own delay.
pub struct RateLimiter {
    last_request: Option<Instant>,
    min_interval: Duration,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            last_request: None,
            min_interval,
        }
    }

    /// Block (asynchronously) until the interval since the previous request
    /// has elapsed, then claim the slot.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        self.last_request = Some(Instant::now());
    }
}

/// reqwest-backed DocumentFetcher for server-rendered pages.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> AppResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT_LANGUAGE,
            header::HeaderValue::from_static("en-US,en;q=0.9"),
        );

        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| AppError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, params: &[(String, String)]) -> AppResult<String> {
        let response = self.client.get(url).query(params).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Transport(format!(
                "GET {} returned status {}",
                url, status
            )));
        }

        Ok(response.text().await?)
    }
}

/// Fetch with bounded retries and linear backoff. Only transport errors are
/// retried; anything else propagates immediately.
pub async fn fetch_with_retry(
    fetcher: &dyn DocumentFetcher,
    url: &str,
    params: &[(String, String)],
    max_attempts: u32,
) -> AppResult<String> {
    let mut last_error = AppError::Transport("no attempts made".to_string());

    for attempt in 1..=max_attempts.max(1) {
        match fetcher.fetch(url, params).await {
            Ok(body) => return Ok(body),
            Err(err) if err.is_retryable() && attempt < max_attempts => {
                log::warn!(
                    "fetch attempt {}/{} for {} failed: {}",
                    attempt,
                    max_attempts,
                    url,
                    err
                );
                tokio::time::sleep(Duration::from_secs(attempt as u64)).await;
                last_error = err;
            }
            Err(err) => return Err(err),
        }
    }

    Err(last_error)
}
