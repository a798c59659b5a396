//! HTTP client for the remote user directory.
//!
//! One [`ProfileClient`] owns a long-lived `reqwest::Client`, so every batch
//! shares the same connection pool. Each lookup is a single
//! `GET <base>/users/<username>` wrapped in the [`RetryPolicy`].

use std::time::Duration;

use ghusers_core::{AppConfig, ProfileRecord, Username};
use reqwest::{Client, Url};

use crate::decode::decode_profile;
use crate::error::FetchError;
use crate::retry::{is_transient, retry_with_backoff, RawResponse, RetryPolicy};

const DEFAULT_BASE_URL: &str = "https://api.github.com/";

/// Transport settings for [`ProfileClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: "coreAPI".to_owned(),
            retry: RetryPolicy::default(),
        }
    }
}

impl ClientConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
            retry: RetryPolicy::new(config.max_retries, config.retry_backoff_base_secs),
        }
    }
}

/// Client for profile lookups against the user directory.
///
/// Use [`ProfileClient::new`] for the public API or
/// [`ProfileClient::with_base_url`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct ProfileClient {
    client: Client,
    base_url: Url,
    retry: RetryPolicy,
}

impl ProfileClient {
    /// Creates a client pointed at the public GitHub API.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, FetchError> {
        Self::with_base_url(config, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`FetchError::InvalidUrl`] if `base_url`
    /// is not a valid URL.
    pub fn with_base_url(config: &ClientConfig, base_url: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(config.user_agent.as_str())
            .build()?;

        // Exactly one trailing slash, so `join` appends below any base path
        // instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| FetchError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            retry: config.retry,
        })
    }

    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Fetches and decodes one user's public profile.
    ///
    /// Transient outcomes are retried per the client's [`RetryPolicy`]; the
    /// outcome of the last attempt decides the result.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Http`] on network failure after all retries.
    /// - [`FetchError::Status`] if the last attempt returned a non-2xx status.
    /// - [`FetchError::Deserialize`] / [`FetchError::EmptyBody`] if the body
    ///   does not decode to a profile.
    pub async fn fetch_profile(&self, username: &Username) -> Result<ProfileRecord, FetchError> {
        let url = self.profile_url(username)?;

        let response = retry_with_backoff(self.retry, is_transient, || self.get_once(url.clone()))
            .await?;

        if !response.status.is_success() {
            return Err(FetchError::Status {
                status: response.status.as_u16(),
                url: url.to_string(),
            });
        }

        decode_profile(&response.body, username)
    }

    fn profile_url(&self, username: &Username) -> Result<Url, FetchError> {
        self.base_url
            .join(&format!("users/{username}"))
            .map_err(|e| FetchError::InvalidUrl {
                url: format!("{}users/{username}", self.base_url),
                reason: e.to_string(),
            })
    }

    async fn get_once(&self, url: Url) -> Result<RawResponse, reqwest::Error> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok(RawResponse { status, body })
    }
}
