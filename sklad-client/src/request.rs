//! Generic request builder.

use crate::async_op::{AsyncOperation, DEFAULT_POLL_INTERVAL};
use crate::client::{Client, RawResponse};
use crate::error::{ClientError, Result};
use reqwest::Method;
use reqwest::header::{CONTENT_LOCATION, LOCATION, RETRY_AFTER};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::value::RawValue;
use sklad_core::Params;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// A request against one path, with optional query parameters.
///
/// The builder only reads its [`Params`]; the same builder can be sent any
/// number of times.
///
/// # Example
///
/// ```no_run
/// # use sklad_client::{Client, CashOut, List, Params};
/// # use tokio_util::sync::CancellationToken;
/// # async fn example(client: Client) -> sklad_client::Result<()> {
/// let cancel = CancellationToken::new();
/// let page: List<CashOut> = client
///     .request("entity/cashout")
///     .with_params(Params::new().with_filter_eq("applicable", true).with_limit(10))
///     .get(&cancel)
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    client: Client,
    path: String,
    params: Option<Params>,
}

impl RequestBuilder {
    pub(crate) fn new(client: Client, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
            params: None,
        }
    }

    /// Set the query parameters.
    #[must_use]
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = Some(params);
        self
    }

    /// Request path relative to the API root.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query parameters, if set.
    pub fn params(&self) -> Option<&Params> {
        self.params.as_ref()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        self.params.as_ref().map(Params::to_query).unwrap_or_default()
    }

    async fn send(
        &self,
        method: Method,
        query: &[(&'static str, String)],
        body: Option<Vec<u8>>,
        cancel: &CancellationToken,
    ) -> Result<RawResponse> {
        let request = self.client.prepare(method, &self.path, query, body);
        self.client.send(request, cancel).await
    }

    /// GET the path and decode the response.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Api`] for non-2xx responses,
    /// [`ClientError::Cancelled`] if `cancel` fires first, and a decode or
    /// transport error otherwise.
    pub async fn get<T: DeserializeOwned>(&self, cancel: &CancellationToken) -> Result<T> {
        self.send(Method::GET, &self.query(), None, cancel)
            .await?
            .json()
    }

    /// POST a JSON body and decode the response.
    ///
    /// # Errors
    ///
    /// Same as [`RequestBuilder::get`].
    pub async fn post<B, T>(&self, body: &B, cancel: &CancellationToken) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_vec(body)?;
        self.send(Method::POST, &self.query(), Some(body), cancel)
            .await?
            .json()
    }

    /// PUT a JSON body and decode the response.
    ///
    /// # Errors
    ///
    /// Same as [`RequestBuilder::get`].
    pub async fn put<B, T>(&self, body: &B, cancel: &CancellationToken) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_vec(body)?;
        self.send(Method::PUT, &self.query(), Some(body), cancel)
            .await?
            .json()
    }

    /// DELETE the path.
    ///
    /// Returns `true` on a 2xx response.
    ///
    /// # Errors
    ///
    /// Any non-2xx response, including 404, is a [`ClientError::Api`].
    pub async fn delete(&self, cancel: &CancellationToken) -> Result<bool> {
        let response = self
            .send(Method::DELETE, &self.query(), None, cancel)
            .await?
            .error_for_status()?;
        Ok(response.status.is_success())
    }

    /// POST without a body, ignoring any response body.
    ///
    /// # Errors
    ///
    /// Same as [`RequestBuilder::delete`].
    pub async fn post_empty(&self, cancel: &CancellationToken) -> Result<()> {
        self.send(Method::POST, &self.query(), None, cancel)
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// POST a JSON array and return the raw response items.
    ///
    /// A non-2xx response whose body is still an array is treated as per-item
    /// outcomes. A response whose length differs from the input is rejected.
    pub(crate) async fn post_items<B: Serialize>(
        &self,
        items: &[B],
        cancel: &CancellationToken,
    ) -> Result<Vec<Box<RawValue>>> {
        let body = serde_json::to_vec(items)?;
        let response = self
            .send(Method::POST, &self.query(), Some(body), cancel)
            .await?;

        let raw_items = match serde_json::from_slice::<Vec<Box<RawValue>>>(&response.body) {
            Ok(raw_items) => raw_items,
            Err(e) => {
                response.error_for_status()?;
                return Err(ClientError::Deserialize(e));
            }
        };

        if raw_items.len() != items.len() {
            tracing::warn!(
                path = %self.path,
                sent = items.len(),
                received = raw_items.len(),
                "Batch response length mismatch"
            );
            return Err(ClientError::InvalidResponse(format!(
                "Batch of {} items answered with {} outcomes",
                items.len(),
                raw_items.len()
            )));
        }

        Ok(raw_items)
    }

    /// Submit the GET as an asynchronous task.
    ///
    /// Sends the same query with `async=true`. The returned handle carries the
    /// status URL from `Location`, the result URL from `Content-Location` and
    /// the poll interval hint from `Retry-After`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Api`] if the task was rejected and
    /// [`ClientError::InvalidResponse`] if the server did not return a status
    /// URL.
    pub async fn get_async<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
    ) -> Result<AsyncOperation<T>> {
        let params = self.params.clone().unwrap_or_default().with_async();
        let response = self
            .send(Method::GET, &params.to_query(), None, cancel)
            .await?
            .error_for_status()?;

        let status_url = response
            .header(LOCATION.as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                ClientError::InvalidResponse("Async response has no Location header".to_string())
            })?;
        let result_url = response.header(CONTENT_LOCATION.as_str()).map(str::to_string);
        let poll_interval = response
            .header(RETRY_AFTER.as_str())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_POLL_INTERVAL);

        tracing::debug!(
            path = %self.path,
            status_url = %status_url,
            "Async task submitted"
        );

        Ok(AsyncOperation::new(status_url, result_url, poll_interval))
    }
}
