pub mod app_config;
pub mod config;
pub mod page;
pub mod profile;
pub mod username;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use page::{paginate, PageRequest};
pub use profile::ProfileRecord;
pub use username::{normalize_usernames, Username};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
