//! HTTP client for remote proof generation.
//!
//! Submits a job to the first endpoint that accepts it, pins that endpoint
//! for the rest of the session, and polls until the proof completes or the
//! wall-clock budget runs out.

use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

use crate::types::{ProofBundle, ProofRequest, StatusResponse, SubmitResponse};
use crate::{JobId, ProverError};

/// Public prover endpoints used when the operator configures none.
pub const DEFAULT_PROVERS: [&str; 2] = [
    "https://worm-miner-3.darkube.app",
    "https://worm-testnet.metatarz.xyz",
];

/// Per-request timeout for job submission.
const SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-request timeout for status polls.
const POLL_TIMEOUT: Duration = Duration::from_secs(10);

/// Per-request timeout for the health probe.
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Interval between coarse progress log lines while waiting.
const PROGRESS_LOG_SECS: u64 = 30;

/// Settings for [`ProverClient`].
#[derive(Clone, Debug)]
pub struct ProverConfig {
    /// Preferred endpoint. When no endpoint is configured at all, the
    /// public prover list is used instead.
    pub primary_url: Option<String>,
    /// Fallbacks tried in order after the primary.
    pub backup_urls: Vec<String>,
    /// Wall-clock budget for one proof generation.
    pub timeout: Duration,
    /// Delay between status polls.
    pub poll_interval: Duration,
}

impl Default for ProverConfig {
    fn default() -> Self {
        Self {
            primary_url: None,
            backup_urls: Vec::new(),
            timeout: Duration::from_secs(600),
            poll_interval: Duration::from_secs(5),
        }
    }
}

/// Client for remote ZK proof generation.
pub struct ProverClient {
    http: reqwest::Client,
    /// All known endpoints in preference order, trailing slashes trimmed.
    endpoints: Vec<String>,
    /// Endpoint that last accepted a job (session affinity, not persisted).
    active: Mutex<String>,
    timeout: Duration,
    poll_interval: Duration,
}

impl ProverClient {
    pub fn new(config: ProverConfig) -> Result<Self, ProverError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ProverError::Transport(format!("failed to build HTTP client: {e}")))?;

        let mut endpoints: Vec<String> = Vec::new();
        let configured = config
            .primary_url
            .iter()
            .chain(config.backup_urls.iter())
            .map(|url| url.trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());
        for url in configured {
            if !endpoints.contains(&url) {
                endpoints.push(url);
            }
        }
        if endpoints.is_empty() {
            endpoints = DEFAULT_PROVERS.iter().map(|url| url.to_string()).collect();
        }

        let active = Mutex::new(endpoints[0].clone());
        Ok(Self {
            http,
            endpoints,
            active,
            timeout: config.timeout,
            poll_interval: config.poll_interval,
        })
    }

    /// The endpoint new jobs and polls currently go to.
    pub fn active_endpoint(&self) -> String {
        self.active.lock().expect("endpoint lock poisoned").clone()
    }

    fn pin_endpoint(&self, endpoint: &str) {
        let mut active = self.active.lock().expect("endpoint lock poisoned");
        if *active != endpoint {
            tracing::info!(endpoint, "switched to prover");
            *active = endpoint.to_string();
        }
    }

    /// Endpoints in try-order: the pinned one first, then the rest.
    fn candidates(&self) -> Vec<String> {
        let active = self.active_endpoint();
        let mut list = vec![active.clone()];
        for ep in &self.endpoints {
            if *ep != active {
                list.push(ep.clone());
            }
        }
        list
    }

    /// Submit a proof job, failing over between endpoints.
    ///
    /// Queue-full (429) and unavailable (503) responses, transport errors
    /// and application-level error payloads all advance to the next
    /// endpoint. The first endpoint to accept becomes the new default.
    pub async fn submit(&self, request: &ProofRequest) -> Result<JobId, ProverError> {
        let mut last_error = String::from("no endpoints configured");

        for endpoint in self.candidates() {
            let url = format!("{endpoint}/proof");
            tracing::debug!(%url, "submitting proof job");

            let response = match self
                .http
                .post(&url)
                .timeout(SUBMIT_TIMEOUT)
                .json(request)
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(e) => {
                    last_error = e.to_string();
                    tracing::warn!(%endpoint, error = %last_error, "failed to reach prover");
                    continue;
                }
            };

            match response.status().as_u16() {
                429 => {
                    last_error = format!("queue full at {endpoint}");
                    tracing::warn!(%endpoint, "prover queue full, trying next");
                    continue;
                }
                503 => {
                    last_error = format!("service unavailable at {endpoint}");
                    tracing::warn!(%endpoint, "prover unavailable, trying next");
                    continue;
                }
                _ => {}
            }

            let body: SubmitResponse = match response.json().await {
                Ok(body) => body,
                Err(e) => {
                    last_error = format!("invalid submit response: {e}");
                    tracing::warn!(%endpoint, error = %last_error, "skipping endpoint");
                    continue;
                }
            };

            if body.status.as_deref() == Some("error") {
                last_error = body.message.unwrap_or_else(|| "unspecified error".into());
                tracing::warn!(%endpoint, error = %last_error, "prover rejected job");
                continue;
            }

            let Some(job_id) = body.result.and_then(|r| r.job_id) else {
                last_error = format!("no job id from {endpoint}");
                continue;
            };

            self.pin_endpoint(&endpoint);
            let job = JobId(job_id);
            tracing::info!(%job, "proof job submitted");
            return Ok(job);
        }

        Err(ProverError::AllEndpointsFailed { last_error })
    }

    /// Single status poll.
    ///
    /// `pending`/`in_progress` (and unknown states) return `Ok(None)`;
    /// `error` fails immediately; `completed` yields the parsed bundle.
    pub async fn poll(&self, job: &JobId) -> Result<Option<ProofBundle>, ProverError> {
        let url = format!("{}/proof/{}", self.active_endpoint(), job.0);

        let response = self
            .http
            .get(&url)
            .timeout(POLL_TIMEOUT)
            .send()
            .await
            .map_err(|e| ProverError::Transport(format!("poll failed: {e}")))?;

        let body: StatusResponse = response
            .json()
            .await
            .map_err(|e| ProverError::MalformedResponse(format!("status body: {e}")))?;

        match body.status.as_deref() {
            Some("pending") | Some("in_progress") => {
                tracing::debug!(%job, status = body.status.as_deref().unwrap_or(""), "not ready");
                Ok(None)
            }
            Some("error") => Err(ProverError::ProofRejected(
                body.message.unwrap_or_else(|| "unspecified error".into()),
            )),
            Some("completed") => {
                let wire = body.result.ok_or_else(|| {
                    ProverError::MalformedResponse("completed job without result".into())
                })?;
                Ok(Some(ProofBundle::try_from(wire)?))
            }
            other => {
                tracing::warn!(%job, status = ?other, "unknown job status");
                Ok(None)
            }
        }
    }

    /// Submit a job and poll until completion, failure or timeout.
    ///
    /// This is the long suspension point of a burn attempt: commonly tens
    /// of seconds to minutes. Progress is logged every 30 seconds.
    pub async fn generate(&self, request: &ProofRequest) -> Result<ProofBundle, ProverError> {
        let job = self.submit(request).await?;
        let started = Instant::now();
        let mut last_progress = 0u64;

        loop {
            let elapsed = started.elapsed();
            if elapsed > self.timeout {
                return Err(ProverError::ProofTimeout {
                    elapsed_secs: elapsed.as_secs(),
                });
            }

            if elapsed.as_secs().saturating_sub(last_progress) >= PROGRESS_LOG_SECS {
                tracing::info!(%job, elapsed_secs = elapsed.as_secs(), "waiting for proof");
                last_progress = elapsed.as_secs();
            }

            if let Some(bundle) = self.poll(&job).await? {
                tracing::info!(%job, elapsed_secs = elapsed.as_secs(), "proof generated");
                return Ok(bundle);
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Advisory reachability probe against the pinned endpoint.
    ///
    /// An empty POST that draws any request-level status — including the
    /// client errors an empty body provokes — counts as healthy; only
    /// transport failures and unexpected statuses do not. Real attempts do
    /// their own failover, so a failed probe never blocks anything.
    pub async fn check_health(&self) -> bool {
        let url = format!("{}/proof", self.active_endpoint());
        match self
            .http
            .post(&url)
            .timeout(HEALTH_TIMEOUT)
            .json(&serde_json::json!({}))
            .send()
            .await
        {
            Ok(resp) => matches!(resp.status().as_u16(), 200 | 400 | 405 | 422),
            Err(_) => false,
        }
    }
}
