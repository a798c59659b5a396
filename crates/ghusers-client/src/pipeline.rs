//! Batch retrieval orchestration.
//!
//! 1. Validate: dedup, filter, and sort the raw usernames.
//! 2. Paginate the sorted list.
//! 3. Fetch each username in the page, up to `concurrency` at a time.
//! 4. Assemble the fetched records in page order, dropping skipped items.
//!
//! A failed fetch never fails the batch; the only signal of a failure is the
//! missing record (plus the log line).

use std::pin::pin;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use ghusers_core::{normalize_usernames, paginate, PageRequest, ProfileRecord, Username};

use crate::client::ProfileClient;
use crate::error::FetchError;

/// Anything that can look up one profile by username.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch_profile(&self, username: &Username) -> Result<ProfileRecord, FetchError>;
}

#[async_trait]
impl ProfileSource for ProfileClient {
    async fn fetch_profile(&self, username: &Username) -> Result<ProfileRecord, FetchError> {
        ProfileClient::fetch_profile(self, username).await
    }
}

/// Result of fetching a single username.
#[derive(Debug)]
pub enum FetchOutcome {
    Fetched(ProfileRecord),
    Skipped {
        username: Username,
        reason: FetchError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Maximum fetches in flight at once. Zero is treated as one.
    pub concurrency: usize,
    /// Time budget for the fetch phase of one batch.
    pub deadline: Option<Duration>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            concurrency: 4,
            deadline: None,
        }
    }
}

pub struct RetrievalPipeline<S> {
    source: S,
    options: PipelineOptions,
}

impl<S: ProfileSource> RetrievalPipeline<S> {
    #[must_use]
    pub fn new(source: S, options: PipelineOptions) -> Self {
        Self { source, options }
    }

    #[must_use]
    pub fn options(&self) -> PipelineOptions {
        self.options
    }

    /// Runs the full pipeline for one inbound batch.
    ///
    /// The output follows sorted username order and may be shorter than the
    /// requested page when fetches fail or the deadline elapses.
    pub async fn retrieve<R>(&self, raw: &[R], page: PageRequest) -> Vec<ProfileRecord>
    where
        R: AsRef<str> + Sync,
    {
        tracing::info!(requested = raw.len(), "validating usernames");
        let valid = normalize_usernames(raw);
        tracing::info!(valid = valid.len(), "validated usernames");

        let batch = paginate(&valid, page);
        tracing::info!(
            page = page.page,
            page_size = page.page_size,
            batch = batch.len(),
            "paginated usernames"
        );

        let outcomes = self.fetch_all(&batch).await;
        let records = assemble(outcomes);
        tracing::info!(
            batch = batch.len(),
            returned = records.len(),
            "batch retrieval complete"
        );
        records
    }

    /// Fetches every username in `batch`, preserving `batch` order.
    ///
    /// When a deadline is configured and elapses, in-flight and pending
    /// fetches are dropped and the outcomes collected so far are returned.
    pub async fn fetch_all(&self, batch: &[Username]) -> Vec<FetchOutcome> {
        let concurrency = self.options.concurrency.max(1);
        // A budget too large to represent as an instant means no deadline.
        let deadline = self
            .options
            .deadline
            .and_then(|budget| tokio::time::Instant::now().checked_add(budget));

        // `buffered` yields in input order regardless of completion order.
        let mut outcomes_stream = pin!(stream::iter(batch.iter().cloned())
            .map(|username| self.fetch_one(username))
            .buffered(concurrency));

        let mut outcomes = Vec::with_capacity(batch.len());
        loop {
            let next = match deadline {
                Some(at) => {
                    if let Ok(next) = tokio::time::timeout_at(at, outcomes_stream.next()).await {
                        next
                    } else {
                        tracing::warn!(
                            completed = outcomes.len(),
                            abandoned = batch.len() - outcomes.len(),
                            "batch deadline elapsed, abandoning remaining fetches"
                        );
                        break;
                    }
                }
                None => outcomes_stream.next().await,
            };
            match next {
                Some(outcome) => outcomes.push(outcome),
                None => break,
            }
        }
        outcomes
    }

    async fn fetch_one(&self, username: Username) -> FetchOutcome {
        tracing::info!(username = %username, "fetching profile");
        match self.source.fetch_profile(&username).await {
            Ok(record) => FetchOutcome::Fetched(record),
            Err(reason) => FetchOutcome::Skipped { username, reason },
        }
    }
}

/// Keeps fetched records in order and logs each skipped item.
fn assemble(outcomes: Vec<FetchOutcome>) -> Vec<ProfileRecord> {
    outcomes
        .into_iter()
        .filter_map(|outcome| match outcome {
            FetchOutcome::Fetched(record) => Some(record),
            FetchOutcome::Skipped { username, reason } if reason.is_decode_failure() => {
                tracing::warn!(
                    username = %username,
                    error = %reason,
                    "profile response could not be decoded, skipping"
                );
                None
            }
            FetchOutcome::Skipped { username, reason } => {
                tracing::error!(
                    username = %username,
                    error = %reason,
                    "failed to retrieve profile, skipping"
                );
                None
            }
        })
        .collect()
}
