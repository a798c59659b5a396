use thiserror::Error;

/// Reasons a single profile fetch can fail.
///
/// None of these abort a batch; the pipeline records them as skipped items.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network or TLS failure from the underlying HTTP client, after retries.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The final attempt returned a non-2xx status.
    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    /// The response body could not be deserialized into a profile.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The response body decoded to JSON `null`.
    #[error("empty profile payload for {context}")]
    EmptyBody { context: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl FetchError {
    /// `true` when the remote answered but the payload was unusable.
    #[must_use]
    pub fn is_decode_failure(&self) -> bool {
        matches!(self, Self::Deserialize { .. } | Self::EmptyBody { .. })
    }
}
