//! HTTPS ingest transport with retry and job polling.

use std::thread;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::LOCATION;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::entity::EntitySet;
use crate::error::{IngestError, Result};

use super::{IngestReceipt, IngestTransport};

/// Default number of attempts per request.
const MAX_ATTEMPTS: u32 = 5;

const API_PREFIX: &str = "conduce/api/v1";

/// Configuration for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Host name, without scheme.
    pub host: String,
    pub api_key: String,
    /// Attempts per request, including the first.
    pub max_attempts: u32,
    /// First retry delay; doubled on every further attempt.
    pub backoff_base: Duration,
    /// Delay between job status checks.
    pub poll_interval: Duration,
    /// Give up on a job after this many checks (None = wait forever).
    pub max_polls: Option<u32>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl TransportConfig {
    pub fn new(host: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            api_key: api_key.into(),
            max_attempts: MAX_ATTEMPTS,
            backoff_base: Duration::from_secs(1),
            poll_interval: Duration::from_millis(500),
            max_polls: None,
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_max_polls(mut self, max_polls: u32) -> Self {
        self.max_polls = Some(max_polls);
        self
    }
}

/// Build an API path from a fragment.
///
/// Fragments that already name an API version are kept as they are;
/// anything else is placed under `conduce/api/v1/`.
pub fn compose_uri(fragment: &str) -> String {
    if fragment.contains("api/v") {
        return fragment.to_string();
    }

    let fragment = fragment.trim_start_matches('/');
    if fragment.contains("conduce/api") {
        fragment.to_string()
    } else {
        format!("{}/{}", API_PREFIX, fragment)
    }
}

/// Delay before retrying after the failed attempt number `attempt` (0-based).
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt))
}

/// Run `op` until it succeeds, fails with a non-retryable error, or
/// `max_attempts` is reached.
pub(crate) fn retry_with_backoff<T>(
    max_attempts: u32,
    base: Duration,
    mut op: impl FnMut() -> Result<T>,
    mut sleep: impl FnMut(Duration),
) -> Result<T> {
    let mut attempt = 0;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt + 1 < max_attempts => {
                let delay = backoff_delay(base, attempt);
                tracing::warn!(
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "request failed, retrying"
                );
                sleep(delay);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Check a job until its status document carries `response`.
///
/// A client error (4xx) ends the job as failed; anything else is logged
/// and checked again after `sleep`.
pub(crate) fn poll_job(
    job: &str,
    max_polls: Option<u32>,
    mut check: impl FnMut() -> Result<Value>,
    mut sleep: impl FnMut(),
) -> Result<Value> {
    let mut polls = 0;
    loop {
        sleep();
        polls += 1;

        match check() {
            Ok(status) if status.get("response").is_some() => return Ok(status),
            Ok(_) => tracing::debug!(job, polls, "job still running"),
            Err(IngestError::HttpStatus { status, body }) if status < 500 => {
                return Err(IngestError::JobFailed {
                    job: job.to_string(),
                    message: format!("HTTP {}: {}", status, body),
                });
            }
            Err(e) => tracing::warn!(job, error = %e, "job status check failed, will retry"),
        }

        if max_polls.is_some_and(|max| polls >= max) {
            return Err(IngestError::JobFailed {
                job: job.to_string(),
                message: format!("no result after {} status checks", polls),
            });
        }
    }
}

/// Turn a non-success response into [`IngestError::HttpStatus`].
fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(IngestError::HttpStatus {
        status: status.as_u16(),
        body: response.text().unwrap_or_default(),
    })
}

/// Blocking HTTPS transport for the datasets API.
pub struct HttpTransport {
    client: Client,
    config: TransportConfig,
}

impl HttpTransport {
    pub fn new(config: TransportConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| IngestError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Build from resolved client settings. Fails without an API key.
    pub fn from_client_config(client: &ClientConfig) -> Result<Self> {
        let api_key = client.require_api_key()?;
        Self::new(TransportConfig::new(client.host.clone(), api_key))
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    fn url(&self, fragment: &str) -> String {
        if fragment.starts_with("https://") || fragment.starts_with("http://") {
            return fragment.to_string();
        }
        format!(
            "https://{}/{}",
            self.config.host,
            compose_uri(fragment).trim_start_matches('/')
        )
    }

    fn send(&self, request: impl Fn() -> RequestBuilder) -> Result<Response> {
        retry_with_backoff(
            self.config.max_attempts,
            self.config.backoff_base,
            || {
                request()
                    .bearer_auth(&self.config.api_key)
                    .send()
                    .map_err(IngestError::from)
                    .and_then(check_status)
            },
            thread::sleep,
        )
    }

    fn wait_for_job(&self, job: &str) -> Result<Value> {
        let url = self.url(job);
        tracing::info!(job, "waiting for ingest job");

        poll_job(
            job,
            self.config.max_polls,
            || {
                self.send(|| self.client.get(&url))?
                    .json::<Value>()
                    .map_err(IngestError::from)
            },
            || thread::sleep(self.config.poll_interval),
        )
    }
}

impl IngestTransport for HttpTransport {
    fn ingest(&self, dataset_id: &str, set: &EntitySet) -> Result<IngestReceipt> {
        let url = self.url(&format!("datasets/add-data/{}", dataset_id));
        let body = set.to_json()?;

        tracing::debug!(url = %url, entities = set.len(), "posting entity set");
        let response = self.send(|| {
            self.client
                .post(&url)
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body.clone())
        })?;

        let mut receipt = IngestReceipt {
            dataset_id: dataset_id.to_string(),
            requests: 1,
            entities: set.len(),
            jobs: Vec::new(),
        };

        let job = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        if let Some(job) = job {
            self.wait_for_job(&job)?;
            receipt.jobs.push(job);
        }

        Ok(receipt)
    }

    fn name(&self) -> &str {
        "http"
    }
}
