use std::time::Duration;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields a usable
/// config pointed at the public GitHub API.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::str::FromStr;

    fn parse_value<T>(var: &str, raw: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        raw.parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    }

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let env = parse_environment(&or_default("GHUSERS_ENV", "development"));
    let bind_addr: SocketAddr = parse_value(
        "GHUSERS_BIND_ADDR",
        &or_default("GHUSERS_BIND_ADDR", "0.0.0.0:3000"),
    )?;
    let log_level = or_default("GHUSERS_LOG_LEVEL", "info");
    let api_base_url = or_default("GHUSERS_API_BASE_URL", "https://api.github.com");
    let user_agent = or_default("GHUSERS_USER_AGENT", "coreAPI");

    let request_timeout_secs: u64 = parse_value(
        "GHUSERS_REQUEST_TIMEOUT_SECS",
        &or_default("GHUSERS_REQUEST_TIMEOUT_SECS", "30"),
    )?;
    let max_retries: u32 =
        parse_value("GHUSERS_MAX_RETRIES", &or_default("GHUSERS_MAX_RETRIES", "6"))?;
    let retry_backoff_base_secs: u64 = parse_value(
        "GHUSERS_RETRY_BACKOFF_BASE_SECS",
        &or_default("GHUSERS_RETRY_BACKOFF_BASE_SECS", "2"),
    )?;
    let fetch_concurrency: usize = parse_value(
        "GHUSERS_FETCH_CONCURRENCY",
        &or_default("GHUSERS_FETCH_CONCURRENCY", "4"),
    )?;

    let batch_deadline = match lookup("GHUSERS_BATCH_DEADLINE_SECS") {
        Ok(raw) if !raw.trim().is_empty() => Some(Duration::from_secs(parse_value(
            "GHUSERS_BATCH_DEADLINE_SECS",
            raw.trim(),
        )?)),
        _ => None,
    };

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        api_base_url,
        user_agent,
        request_timeout_secs,
        max_retries,
        retry_backoff_base_secs,
        fetch_concurrency: fetch_concurrency.max(1),
        batch_deadline,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
