//! Handle for long-running queries executed as server-side tasks.
//!
//! A query sent with `async=true` is answered with a status URL instead of the
//! result. The handle polls that URL until the task settles and then fetches
//! the result, which has the same shape as the synchronous response.

use crate::client::{Client, api_error};
use crate::error::{ClientError, Result};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sklad_core::{ApiError, ErrorDocument};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Poll interval used when the server gives no `Retry-After` hint.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Progress of an asynchronous task.
#[derive(Debug, Clone, PartialEq)]
pub enum AsyncState<T> {
    /// Still running.
    Pending,
    /// Finished with a result.
    Ready(T),
    /// Finished with errors.
    Failed(Vec<ApiError>),
}

impl<T> AsyncState<T> {
    /// Whether the task has settled.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Whether a result is available.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Ready(_) => "ready",
            Self::Failed(_) => "failed",
        }
    }
}

/// Status body fields that tell a task status apart from a result.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusProbe {
    #[serde(default)]
    errors: Option<Vec<ApiError>>,
    #[serde(default)]
    state: Option<Value>,
    #[serde(default)]
    result_url: Option<String>,
}

enum Status {
    Pending,
    Done(Option<String>),
    ServerError(Option<String>),
    Failed(Vec<ApiError>),
    Result,
}

fn error_document(body: &[u8]) -> Option<ErrorDocument> {
    let value = serde_json::from_slice::<Value>(body).ok()?;
    ErrorDocument::from_value(&value).filter(|doc| !doc.errors.is_empty())
}

fn classify(body: &[u8]) -> Result<Status> {
    let Ok(probe) = serde_json::from_slice::<StatusProbe>(body) else {
        return Ok(Status::Result);
    };

    if let Some(errors) = probe.errors {
        return Ok(Status::Failed(errors));
    }

    // Entities may carry an object-valued `state`; only a string marks a task.
    let Some(state) = probe.state.as_ref().and_then(Value::as_str) else {
        return Ok(Status::Result);
    };

    match state {
        "PENDING" | "PROCESSING" => Ok(Status::Pending),
        "DONE" => Ok(Status::Done(probe.result_url)),
        "API_ERROR" => Ok(Status::ServerError(probe.result_url)),
        "CANCEL" => Ok(Status::Failed(vec![ApiError::new(
            "Async task was cancelled",
            None,
        )])),
        other => Err(ClientError::InvalidResponse(format!(
            "Unknown async task state: {}",
            other
        ))),
    }
}

/// 4xx answers other than rate limiting settle a task.
fn is_task_rejection(status: StatusCode) -> bool {
    status.is_client_error() && status != StatusCode::TOO_MANY_REQUESTS
}

/// Handle for a submitted asynchronous query.
///
/// Obtained from [`RequestBuilder::get_async`](crate::RequestBuilder::get_async).
/// Polling is driven by the caller; once the task settles the state is cached
/// and further polls do not touch the network.
#[derive(Debug)]
pub struct AsyncOperation<T> {
    status_url: String,
    result_url: Option<String>,
    poll_interval: Duration,
    state: AsyncState<T>,
}

impl<T> AsyncOperation<T> {
    /// Create a handle for a task.
    pub fn new(
        status_url: impl Into<String>,
        result_url: Option<String>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            status_url: status_url.into(),
            result_url,
            poll_interval,
            state: AsyncState::Pending,
        }
    }

    /// Override the poll interval hint.
    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// URL polled for the task status.
    pub fn status_url(&self) -> &str {
        &self.status_url
    }

    /// URL the result is fetched from, if known yet.
    pub fn result_url(&self) -> Option<&str> {
        self.result_url.as_deref()
    }

    /// Interval the server suggested between polls.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Last observed state.
    pub fn state(&self) -> &AsyncState<T> {
        &self.state
    }

    fn remember_result_url(&mut self, url: Option<String>) {
        if let Some(url) = url {
            self.result_url = Some(url);
        }
    }

    /// Error records a failed task left at its result URL.
    async fn server_errors(
        &self,
        client: &Client,
        cancel: &CancellationToken,
    ) -> Result<Vec<ApiError>> {
        let fallback = || vec![ApiError::new("Async task failed on the server", None)];
        let Some(url) = self.result_url.as_deref() else {
            return Ok(fallback());
        };

        let request = client.prepare(Method::GET, url, &[], None);
        let response = client.send(request, cancel).await?;
        if response.status.is_server_error() {
            return Err(api_error(response.status, &response.body));
        }

        Ok(error_document(&response.body).map_or_else(fallback, |doc| doc.errors))
    }

    /// Consume the handle, returning the outcome if the task has settled.
    pub fn into_result(self) -> Option<Result<T>> {
        match self.state {
            AsyncState::Pending => None,
            AsyncState::Ready(value) => Some(Ok(value)),
            AsyncState::Failed(errors) => Some(Err(ClientError::AsyncFailed { errors })),
        }
    }
}

impl<T: DeserializeOwned> AsyncOperation<T> {
    /// Check the task once.
    ///
    /// When the task reports `DONE` the result is fetched in the same call.
    ///
    /// A client error answered with an error document settles the task as
    /// failed, as does a task that ended in `API_ERROR`; the records served
    /// at its result URL become the failure detail.
    ///
    /// # Errors
    ///
    /// Transport errors, server errors and decode errors leave the state
    /// unchanged.
    pub async fn poll(
        &mut self,
        client: &Client,
        cancel: &CancellationToken,
    ) -> Result<&AsyncState<T>> {
        if self.state.is_terminal() {
            return Ok(&self.state);
        }

        let request = client.prepare(Method::GET, &self.status_url, &[], None);
        let response = client.send(request, cancel).await?;

        let next = if response.status.is_success() {
            match classify(&response.body)? {
                Status::Pending => AsyncState::Pending,
                Status::Failed(errors) => AsyncState::Failed(errors),
                Status::Result => AsyncState::Ready(serde_json::from_slice(&response.body)?),
                Status::Done(result_url) => {
                    self.remember_result_url(result_url);
                    let url = self.result_url.clone().ok_or_else(|| {
                        ClientError::InvalidResponse("Async task has no result URL".to_string())
                    })?;

                    let request = client.prepare(Method::GET, &url, &[], None);
                    AsyncState::Ready(client.send(request, cancel).await?.json()?)
                }
                Status::ServerError(result_url) => {
                    self.remember_result_url(result_url);
                    AsyncState::Failed(self.server_errors(client, cancel).await?)
                }
            }
        } else {
            match error_document(&response.body) {
                Some(doc) if is_task_rejection(response.status) => AsyncState::Failed(doc.errors),
                _ => return Err(api_error(response.status, &response.body)),
            }
        };

        tracing::debug!(
            status_url = %self.status_url,
            state = next.label(),
            "Async task polled"
        );

        self.state = next;
        Ok(&self.state)
    }

    /// Poll until the task settles, sleeping the poll interval in between.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Timeout`] if the task has not settled within
    /// `timeout`, [`ClientError::Cancelled`] if `cancel` fires, and
    /// [`ClientError::AsyncFailed`] if the task finished with errors.
    pub async fn wait(
        mut self,
        client: &Client,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<T> {
        let polling = async {
            loop {
                if self.poll(client, cancel).await?.is_terminal() {
                    break;
                }

                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(ClientError::Cancelled),
                    _ = tokio::time::sleep(self.poll_interval) => {}
                }
            }
            Ok::<(), ClientError>(())
        };

        match tokio::time::timeout(timeout, polling).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => {
                tracing::debug!(status_url = %self.status_url, ?timeout, "Async task timed out");
                return Err(ClientError::Timeout(timeout));
            }
        }

        self.into_result().unwrap_or_else(|| {
            Err(ClientError::InvalidResponse(
                "Async task settled without an outcome".to_string(),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_task_states() {
        assert!(matches!(
            classify(br#"{"state":"PENDING"}"#).unwrap(),
            Status::Pending
        ));
        assert!(matches!(
            classify(br#"{"state":"PROCESSING"}"#).unwrap(),
            Status::Pending
        ));
        assert!(matches!(
            classify(br#"{"state":"DONE","resultUrl":"http://x/result"}"#).unwrap(),
            Status::Done(Some(url)) if url == "http://x/result"
        ));
        assert!(matches!(
            classify(br#"{"state":"CANCEL"}"#).unwrap(),
            Status::Failed(_)
        ));
        assert!(matches!(
            classify(br#"{"state":"API_ERROR"}"#).unwrap(),
            Status::ServerError(None)
        ));
        assert!(matches!(
            classify(br#"{"state":"API_ERROR","resultUrl":"http://x/result"}"#).unwrap(),
            Status::ServerError(Some(url)) if url == "http://x/result"
        ));
    }

    #[test]
    fn test_classify_errors_and_results() {
        assert!(matches!(
            classify(br#"{"errors":[{"error":"boom","code":1000}]}"#).unwrap(),
            Status::Failed(errors) if errors[0].code == Some(1000)
        ));
        assert!(matches!(
            classify(br#"{"meta":{"size":0},"rows":[]}"#).unwrap(),
            Status::Result
        ));
        assert!(matches!(
            classify(br#"{"state":{"meta":{"href":"h","type":"state"}}}"#).unwrap(),
            Status::Result
        ));
        assert!(matches!(classify(b"[1,2]").unwrap(), Status::Result));
    }

    #[test]
    fn test_classify_unknown_state() {
        assert!(matches!(
            classify(br#"{"state":"EXPLODED"}"#),
            Err(ClientError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_task_rejection_statuses() {
        assert!(is_task_rejection(StatusCode::BAD_REQUEST));
        assert!(is_task_rejection(StatusCode::PRECONDITION_FAILED));
        assert!(!is_task_rejection(StatusCode::TOO_MANY_REQUESTS));
        assert!(!is_task_rejection(StatusCode::SERVICE_UNAVAILABLE));
    }

    #[test]
    fn test_error_document_requires_records() {
        let doc = error_document(br#"{"errors":[{"error":"heavy","code":1049}]}"#).unwrap();
        assert_eq!(doc.errors[0].code, Some(1049));
        assert!(error_document(br#"{"errors":[]}"#).is_none());
        assert!(error_document(b"oops").is_none());
    }

    #[test]
    fn test_into_result() {
        let pending = AsyncOperation::<u32>::new("http://x/status", None, DEFAULT_POLL_INTERVAL);
        assert!(pending.into_result().is_none());

        let mut failed =
            AsyncOperation::<u32>::new("http://x/status", None, DEFAULT_POLL_INTERVAL);
        failed.state = AsyncState::Failed(vec![ApiError::new("boom", None)]);
        assert!(matches!(
            failed.into_result(),
            Some(Err(ClientError::AsyncFailed { .. }))
        ));
    }
}
