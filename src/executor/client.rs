//! Resilient request executor.
//!
//! # Responsibilities
//! - Resolve the target and assemble headers (defaults, credential, request ID)
//! - Run attempts with a per-attempt deadline
//! - Retry transient failures with exponential backoff
//! - Publish the lifecycle to observers and notify on terminal failure

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::Method;
use serde::Serialize;
use tokio::sync::watch;
use url::Url;
use uuid::Uuid;

use crate::config::{ClientConfig, ExecutorConfig};
use crate::executor::error::RequestError;
use crate::executor::options::{Credential, RequestOptions};
use crate::executor::state::{decode_response, Payload, RequestState, RequestStatus};
use crate::notification::{Notice, NotificationSink, TracingSink};
use crate::observability::metrics;
use crate::resilience::retries::{is_retryable_status, is_retryable_transport_error};
use crate::resilience::timeouts::{with_deadline, Deadline};
use crate::resilience::{Backoff, RetryPolicy, RetryReason};
use crate::transport::{HttpTransport, OutboundRequest, Transport, TransportError};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Performs one logical HTTP request at a time and exposes its lifecycle.
///
/// Each `execute` returns its own result. The shared [`RequestState`] holds
/// whichever call settled last, so one executor per independent operation is
/// the intended usage.
pub struct RequestExecutor {
    config: ExecutorConfig,
    transport: Arc<dyn Transport>,
    notifier: Arc<dyn NotificationSink>,
    credential: Option<Credential>,
    state: watch::Sender<RequestState>,
}

impl RequestExecutor {
    /// Create an executor backed by the default HTTP transport.
    pub fn new(config: ExecutorConfig) -> Result<Self, TransportError> {
        let transport = HttpTransport::new()?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create an executor over a custom transport.
    pub fn with_transport(config: ExecutorConfig, transport: Arc<dyn Transport>) -> Self {
        let (state, _) = watch::channel(RequestState::default());
        Self {
            config,
            transport,
            notifier: Arc::new(TracingSink),
            credential: None,
            state,
        }
    }

    /// Build from a full client configuration, including credentials.
    pub fn from_config(config: &ClientConfig) -> Result<Self, TransportError> {
        let executor = Self::new(config.executor.clone())?;
        Ok(match config.auth.credential() {
            Some(credential) => executor.with_credential(credential),
            None => executor,
        })
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn NotificationSink>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Current lifecycle snapshot.
    pub fn state(&self) -> RequestState {
        self.state.borrow().clone()
    }

    /// Follow lifecycle transitions as they happen.
    pub fn subscribe(&self) -> watch::Receiver<RequestState> {
        self.state.subscribe()
    }

    /// Perform `options` against `target`, retrying transient failures.
    pub async fn execute(
        &self,
        target: &str,
        options: RequestOptions,
    ) -> Result<Payload, RequestError> {
        self.run(target, Ok(options)).await
    }

    pub async fn get(&self, target: &str) -> Result<Payload, RequestError> {
        self.execute(target, RequestOptions::new(Method::GET).json_content())
            .await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        target: &str,
        body: &B,
    ) -> Result<Payload, RequestError> {
        self.run(target, RequestOptions::new(Method::POST).json(body))
            .await
    }

    pub async fn put<B: Serialize + ?Sized>(
        &self,
        target: &str,
        body: &B,
    ) -> Result<Payload, RequestError> {
        self.run(target, RequestOptions::new(Method::PUT).json(body))
            .await
    }

    pub async fn delete(&self, target: &str) -> Result<Payload, RequestError> {
        self.execute(target, RequestOptions::new(Method::DELETE).json_content())
            .await
    }

    /// Return to Idle. An in-flight call is not cancelled and will still
    /// write its result when it settles.
    pub fn reset(&self) {
        self.state.send_replace(RequestState::default());
    }

    /// Re-run a failed call with a fresh attempt budget.
    ///
    /// Returns `None` without touching state unless the executor is in
    /// Error or Timeout.
    pub async fn retry(
        &self,
        target: &str,
        options: RequestOptions,
    ) -> Option<Result<Payload, RequestError>> {
        let status = self.state.borrow().status;
        if !status.is_failure() {
            tracing::debug!(status = ?status, "Retry ignored; no failed call to repeat");
            return None;
        }
        Some(self.execute(target, options).await)
    }

    async fn run(
        &self,
        target: &str,
        options: Result<RequestOptions, RequestError>,
    ) -> Result<Payload, RequestError> {
        let started = Instant::now();
        let request_id = Uuid::new_v4();
        self.state.send_replace(RequestState::loading());

        let prepared = options.and_then(|opts| self.prepare(target, opts, request_id));
        let (result, retries) = match prepared {
            Ok(request) => self.attempt_all(request, request_id).await,
            Err(e) => (Err(e), 0),
        };

        self.settle(&result, retries, request_id, started);
        result
    }

    /// Resolve the URL and assemble the final header set.
    fn prepare(
        &self,
        target: &str,
        options: RequestOptions,
        request_id: Uuid,
    ) -> Result<OutboundRequest, RequestError> {
        let url = resolve_target(self.config.base_url.as_deref(), target)?;

        let mut headers = HeaderMap::new();
        for (name, value) in &self.config.default_headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| RequestError::invalid_request(format!("invalid header name '{}': {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| RequestError::invalid_request(format!("invalid value for header '{}': {}", name, e)))?;
            headers.insert(name, value);
        }
        headers.extend(options.headers);

        if let Some(credential) = &self.credential {
            if !headers.contains_key(AUTHORIZATION) {
                let value = credential
                    .header_value()
                    .map_err(|e| RequestError::invalid_request(format!("invalid credential: {}", e)))?;
                headers.insert(AUTHORIZATION, value);
            }
        }

        if !headers.contains_key(REQUEST_ID_HEADER) {
            if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
                headers.insert(REQUEST_ID_HEADER, value);
            }
        }

        Ok(OutboundRequest {
            method: options.method,
            url,
            headers,
            body: options.body,
        })
    }

    /// Attempt loop. Returns the settled result and the number of retries made.
    async fn attempt_all(
        &self,
        request: OutboundRequest,
        request_id: Uuid,
    ) -> (Result<Payload, RequestError>, u32) {
        let policy = RetryPolicy::new(self.config.max_retries);
        let backoff = Backoff::new(self.config.retry_delay_ms, self.config.retry_delay_multiplier);
        let limit = Duration::from_millis(self.config.timeout_ms);
        let mut attempt = 0u32;

        loop {
            metrics::record_attempt();
            tracing::debug!(
                request_id = %request_id,
                attempt,
                method = %request.method,
                url = %request.url,
                "Dispatching request"
            );

            let outcome = with_deadline(limit, self.transport.send(request.clone())).await;

            let reason = match &outcome {
                Deadline::Elapsed => Some(RetryReason::Timeout),
                Deadline::Completed(Err(e)) if is_retryable_transport_error(e) => {
                    Some(RetryReason::Network)
                }
                Deadline::Completed(Ok(response)) if is_retryable_status(response.status) => {
                    Some(RetryReason::Status(response.status))
                }
                _ => None,
            };

            if let Some(reason) = reason {
                if policy.can_retry(attempt) {
                    let delay = backoff.delay(attempt);
                    attempt += 1;
                    tracing::info!(
                        request_id = %request_id,
                        attempt,
                        reason = reason.as_label(),
                        delay = ?delay,
                        "Retrying request"
                    );
                    metrics::record_retry(reason);
                    self.state.send_modify(|state| state.retry_count = attempt);
                    tokio::time::sleep(delay).await;
                    continue;
                }
            }

            let result = match outcome {
                Deadline::Elapsed => Err(RequestError::timeout(limit)),
                Deadline::Completed(Err(e)) => {
                    tracing::error!(request_id = %request_id, attempt, error = %e, "Upstream error");
                    Err(RequestError::from(e))
                }
                Deadline::Completed(Ok(response)) => decode_response(response),
            };
            return (result, attempt);
        }
    }

    fn settle(
        &self,
        result: &Result<Payload, RequestError>,
        retries: u32,
        request_id: Uuid,
        started: Instant,
    ) {
        let next = match result {
            Ok(payload) => RequestState::success(payload.clone(), retries),
            Err(err) => RequestState::failed(err.clone(), retries),
        };
        let status = next.status;
        self.state.send_replace(next);
        metrics::record_outcome(outcome_label(status), started);

        match result {
            Ok(_) => {
                tracing::debug!(request_id = %request_id, retries, "Request succeeded");
            }
            Err(err) => {
                tracing::warn!(
                    request_id = %request_id,
                    retries,
                    status = ?err.http_status,
                    kind = ?err.kind,
                    error = %err,
                    "Request failed"
                );
                if self.config.notify_on_error {
                    self.notifier.notify(&Notice::from_error(err));
                }
            }
        }
    }
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("config", &self.config)
            .field("credential", &self.credential)
            .field("status", &self.state.borrow().status)
            .finish()
    }
}

fn outcome_label(status: RequestStatus) -> &'static str {
    match status {
        RequestStatus::Success => "success",
        RequestStatus::Timeout => "timeout",
        RequestStatus::Error => "error",
        RequestStatus::Idle => "idle",
        RequestStatus::Loading => "loading",
    }
}

/// Resolve `target` against an optional base URL. Absolute targets are used as-is.
pub fn resolve_target(base: Option<&str>, target: &str) -> Result<Url, RequestError> {
    match Url::parse(target) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = base.ok_or_else(|| {
                RequestError::invalid_request(format!(
                    "relative target '{}' requires a base_url",
                    target
                ))
            })?;
            let base = Url::parse(base).map_err(|e| {
                RequestError::invalid_request(format!("invalid base_url '{}': {}", base, e))
            })?;
            base.join(target).map_err(|e| {
                RequestError::invalid_request(format!("invalid target '{}': {}", target, e))
            })
        }
        Err(e) => Err(RequestError::invalid_request(format!(
            "invalid target '{}': {}",
            target, e
        ))),
    }
}
