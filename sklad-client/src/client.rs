//! Core sklad client implementation.

use crate::config::{ClientConfig, Credentials, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
use crate::error::{ClientError, Result};
use crate::request::RequestBuilder;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap};
use reqwest::{Client as HttpClient, Method, StatusCode};
use serde::de::DeserializeOwned;
use sklad_core::ErrorDocument;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const ACCEPT_JSON: &str = "application/json;charset=utf-8";

/// A client for the sklad JSON API.
///
/// Cloning is cheap; clones share one connection pool.
///
/// # Example
///
/// ```no_run
/// use sklad_client::{Client, Params};
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::new("https://api.moysklad.ru/api/remap/1.2")?
///     .with_token("my-secret-token")
///     .with_timeout(Duration::from_secs(30))?;
///
/// let cancel = CancellationToken::new();
/// let page = client
///     .assortment()
///     .list(&Params::new().with_limit(100), &cancel)
///     .await?;
/// println!("{} of {}", page.len(), page.meta.size);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    /// API root, without a trailing slash.
    base_url: String,
    /// HTTP client.
    http: HttpClient,
    /// Authentication, if any.
    credentials: Option<Credentials>,
    /// `User-Agent` header value.
    user_agent: String,
}

/// Fully read HTTP response.
#[derive(Debug)]
pub(crate) struct RawResponse {
    pub(crate) status: StatusCode,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Vec<u8>,
}

impl RawResponse {
    /// Header value as text.
    pub(crate) fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Turn a non-2xx response into [`ClientError::Api`].
    pub(crate) fn error_for_status(self) -> Result<Self> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(api_error(self.status, &self.body))
        }
    }

    /// Decode the body of a 2xx response.
    pub(crate) fn json<T: DeserializeOwned>(self) -> Result<T> {
        let response = self.error_for_status()?;
        Ok(serde_json::from_slice(&response.body)?)
    }
}

/// Build an API error from a non-2xx body.
///
/// Bodies in the `{"errors": [...]}` shape keep their records; other JSON
/// bodies contribute an `error` or `message` field; anything else is used as
/// text.
pub(crate) fn api_error(status: StatusCode, body: &[u8]) -> ClientError {
    let text = String::from_utf8_lossy(body);

    if let Ok(json) = serde_json::from_slice::<serde_json::Value>(body) {
        if let Some(document) = ErrorDocument::from_value(&json) {
            return ClientError::Api {
                status: status.as_u16(),
                message: document.message(),
                errors: document.errors,
            };
        }

        let message = json["error"]
            .as_str()
            .or_else(|| json["message"].as_str())
            .map(str::to_string)
            .unwrap_or_else(|| text.to_string());

        return ClientError::Api {
            status: status.as_u16(),
            message,
            errors: Vec::new(),
        };
    }

    let message = if text.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    } else {
        text.to_string()
    };

    ClientError::Api {
        status: status.as_u16(),
        message,
        errors: Vec::new(),
    }
}

impl Client {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - API root (e.g., "https://api.moysklad.ru/api/remap/1.2")
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be created.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::from_config(ClientConfig::builder().base_url(base_url).build())
    }

    /// Create a client from a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be created.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let base_url = config.base_url().trim_end_matches('/').to_string();

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(format!(
                "URL must start with http:// or https://, got: {}",
                base_url
            )));
        }

        let http = build_http(config.timeout(), config.user_agent())?;

        Ok(Self {
            base_url,
            http,
            credentials: config.credentials().cloned(),
            user_agent: config.user_agent().to_string(),
        })
    }

    /// Authenticate with a bearer token.
    ///
    /// The token will be sent in the `Authorization` header as `Bearer <token>`.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::Token(token.into()));
        self
    }

    /// Authenticate with login and password.
    #[must_use]
    pub fn with_basic_auth(
        mut self,
        login: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some(Credentials::Basic {
            login: login.into(),
            password: password.into(),
        });
        self
    }

    /// Set a custom timeout for all requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be rebuilt.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http = build_http(timeout, &self.user_agent)?;
        Ok(self)
    }

    /// API root this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start a request against a path relative to the API root.
    ///
    /// Absolute `http(s)://` URLs, such as hrefs taken from a [`Meta`](crate::Meta),
    /// are used as given.
    pub fn request(&self, path: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(self.clone(), path)
    }

    /// Build a full URL from a path.
    pub(crate) fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let path = path.strip_prefix('/').unwrap_or(path);
        format!("{}/{}", self.base_url, path)
    }

    /// Add authentication and content negotiation headers to a request.
    ///
    /// `Accept-Encoding: gzip` is added by the HTTP client itself.
    fn with_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder.header(ACCEPT, ACCEPT_JSON);

        match &self.credentials {
            Some(Credentials::Token(token)) => {
                builder.header("Authorization", format!("Bearer {}", token))
            }
            Some(Credentials::Basic { login, password }) => {
                builder.basic_auth(login, Some(password))
            }
            None => builder,
        }
    }

    /// Prepare a request with headers and an optional JSON body.
    pub(crate) fn prepare(
        &self,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        body: Option<Vec<u8>>,
    ) -> reqwest::RequestBuilder {
        let mut builder = self.with_auth(self.http.request(method, self.url(path)));

        if !query.is_empty() {
            builder = builder.query(query);
        }

        if let Some(body) = body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        builder
    }

    /// Send a request and read the whole body.
    ///
    /// Cancellation aborts both the send and the body read.
    pub(crate) async fn send(
        &self,
        builder: reqwest::RequestBuilder,
        cancel: &CancellationToken,
    ) -> Result<RawResponse> {
        let request = builder.build()?;
        let method = request.method().clone();
        let url = request.url().clone();

        tracing::trace!(
            method = %method,
            path = url.path(),
            query = url.query().unwrap_or_default(),
            "Sending request"
        );

        let exchange = async {
            let response = self.http.execute(request).await?;
            let status = response.status();
            let headers = response.headers().clone();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>(RawResponse {
                status,
                headers,
                body: body.to_vec(),
            })
        };

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(method = %method, url = %url, "Request cancelled");
                return Err(ClientError::Cancelled);
            }
            result = exchange => result?,
        };

        tracing::debug!(
            method = %method,
            url = %url,
            status = response.status.as_u16(),
            "Request completed"
        );

        Ok(response)
    }
}

fn build_http(timeout: Duration, user_agent: &str) -> Result<HttpClient> {
    let timeout = if timeout.is_zero() {
        DEFAULT_TIMEOUT
    } else {
        timeout
    };
    let user_agent = if user_agent.is_empty() {
        DEFAULT_USER_AGENT
    } else {
        user_agent
    };

    Ok(HttpClient::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .gzip(true)
        .build()?)
}
