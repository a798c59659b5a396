//! Decoding of remote profile payloads into [`ProfileRecord`].
//!
//! Field names are folded before binding (ASCII-lowercased, underscores
//! removed) so `public_repos`, `Public_Repos`, and `publicRepos` all land on
//! the same field regardless of the directory's naming convention.

use ghusers_core::{ProfileRecord, Username};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::FetchError;

#[derive(Debug, Deserialize)]
struct RemoteProfile {
    name: Option<String>,
    login: Option<String>,
    company: Option<String>,
    #[serde(default)]
    followers: u64,
    #[serde(default, rename = "publicrepos")]
    public_repos: u64,
}

fn fold_field_name(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn fold_keys(map: Map<String, Value>) -> Map<String, Value> {
    let mut folded = Map::with_capacity(map.len());
    for (key, value) in map {
        folded.entry(fold_field_name(&key)).or_insert(value);
    }
    folded
}

/// Decodes `body` into a [`ProfileRecord`] for `requested`.
///
/// A missing or blank `login` is backfilled with the requested username.
/// Missing counts default to zero; negative or fractional counts are a
/// decode failure.
///
/// # Errors
///
/// - [`FetchError::Deserialize`] if `body` is not JSON or has the wrong shape.
/// - [`FetchError::EmptyBody`] if `body` is JSON `null`.
pub fn decode_profile(body: &str, requested: &Username) -> Result<ProfileRecord, FetchError> {
    let context = || format!("profile of {requested}");

    let value: Value = serde_json::from_str(body).map_err(|e| FetchError::Deserialize {
        context: context(),
        source: e,
    })?;

    let value = match value {
        Value::Null => return Err(FetchError::EmptyBody { context: context() }),
        Value::Object(map) => Value::Object(fold_keys(map)),
        other => other,
    };

    let remote: RemoteProfile =
        serde_json::from_value(value).map_err(|e| FetchError::Deserialize {
            context: context(),
            source: e,
        })?;

    let login = match remote.login {
        Some(login) if !login.trim().is_empty() => {
            tracing::info!(username = %requested, "found user in directory response");
            login
        }
        _ => {
            tracing::warn!(
                username = %requested,
                "directory response carried no login; using requested username"
            );
            requested.as_str().to_owned()
        }
    };

    Ok(ProfileRecord::new(
        remote.name,
        login,
        remote.company,
        remote.followers,
        remote.public_repos,
    ))
}
