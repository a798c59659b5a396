pub mod client;
pub mod decode;
pub mod error;
pub mod pipeline;
pub mod retry;

pub use client::{ClientConfig, ProfileClient};
pub use decode::decode_profile;
pub use error::FetchError;
pub use pipeline::{FetchOutcome, PipelineOptions, ProfileSource, RetrievalPipeline};
pub use retry::RetryPolicy;
