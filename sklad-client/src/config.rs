//! Client configuration.

use crate::error::{ClientError, Result};
use std::env;
use std::fmt;
use std::time::Duration;

/// Base URL of the public JSON API.
pub const DEFAULT_BASE_URL: &str = "https://api.moysklad.ru/api/remap/1.2";

/// Request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent sent with every request unless overridden.
pub const DEFAULT_USER_AGENT: &str = concat!("sklad-client/", env!("CARGO_PKG_VERSION"));

/// Credentials sent in the `Authorization` header.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// `Bearer <token>`.
    Token(String),
    /// HTTP basic authentication.
    Basic {
        /// Login, usually `user@account`.
        login: String,
        /// Password.
        password: String,
    },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(_) => f.write_str("Token(***)"),
            Self::Basic { login, .. } => f
                .debug_struct("Basic")
                .field("login", login)
                .field("password", &"***")
                .finish(),
        }
    }
}

/// Configuration for [`Client`](crate::Client).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, without a trailing slash.
    base_url: String,
    /// Authentication, if any.
    credentials: Option<Credentials>,
    /// Per-request timeout.
    timeout: Duration,
    /// `User-Agent` header value.
    user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a new builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Create configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SKLAD_BASE_URL`: API root (defaults to the public API)
    /// - `SKLAD_TOKEN`: bearer token
    /// - `SKLAD_LOGIN` and `SKLAD_PASSWORD`: basic credentials, used when no
    ///   token is set
    /// - `SKLAD_TIMEOUT_SECS`: request timeout in seconds
    /// - `SKLAD_USER_AGENT`: custom user agent
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if the timeout is not a number or only
    /// one half of the basic credentials is set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();

        if let Some(base_url) = lookup("SKLAD_BASE_URL") {
            builder = builder.base_url(base_url);
        }

        match (
            lookup("SKLAD_TOKEN"),
            lookup("SKLAD_LOGIN"),
            lookup("SKLAD_PASSWORD"),
        ) {
            (Some(token), _, _) => builder = builder.token(token),
            (None, Some(login), Some(password)) => builder = builder.basic_auth(login, password),
            (None, None, None) => {}
            (None, _, _) => {
                return Err(ClientError::Config(
                    "SKLAD_LOGIN and SKLAD_PASSWORD must be set together".to_string(),
                ));
            }
        }

        if let Some(secs) = lookup("SKLAD_TIMEOUT_SECS") {
            let secs = secs.trim().parse::<u64>().map_err(|_| {
                ClientError::Config(format!("SKLAD_TIMEOUT_SECS is not a number: {}", secs))
            })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }

        if let Some(user_agent) = lookup("SKLAD_USER_AGENT") {
            builder = builder.user_agent(user_agent);
        }

        Ok(builder.build())
    }

    /// Get the API root.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the credentials.
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Get the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Get the user agent.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the API root.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Authenticate with a bearer token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.config.credentials = Some(Credentials::Token(token.into()));
        self
    }

    /// Authenticate with login and password.
    pub fn basic_auth(mut self, login: impl Into<String>, password: impl Into<String>) -> Self {
        self.config.credentials = Some(Credentials::Basic {
            login: login.into(),
            password: password.into(),
        });
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}
