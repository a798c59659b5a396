use serde::{Serialize, Serializer};

/// One remote user profile as returned to API callers.
///
/// Constructed once per successful fetch and never mutated. The derived
/// `followers_per_repo` ratio is computed on demand and emitted alongside the
/// stored fields when serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRecord {
    name: Option<String>,
    login: String,
    company: Option<String>,
    followers: u64,
    public_repos: u64,
}

impl ProfileRecord {
    #[must_use]
    pub fn new(
        name: Option<String>,
        login: impl Into<String>,
        company: Option<String>,
        followers: u64,
        public_repos: u64,
    ) -> Self {
        Self {
            name,
            login: login.into(),
            company,
            followers,
            public_repos,
        }
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn login(&self) -> &str {
        &self.login
    }

    #[must_use]
    pub fn company(&self) -> Option<&str> {
        self.company.as_deref()
    }

    #[must_use]
    pub fn followers(&self) -> u64 {
        self.followers
    }

    #[must_use]
    pub fn public_repos(&self) -> u64 {
        self.public_repos
    }

    /// Followers divided by public repositories, truncated. Zero when the
    /// user has no public repositories.
    #[must_use]
    pub fn followers_per_repo(&self) -> u64 {
        self.followers.checked_div(self.public_repos).unwrap_or(0)
    }
}

#[derive(Serialize)]
struct ProfileRecordWire<'a> {
    name: Option<&'a str>,
    login: &'a str,
    company: Option<&'a str>,
    followers: u64,
    public_repos: u64,
    followers_per_repo: u64,
}

impl Serialize for ProfileRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ProfileRecordWire {
            name: self.name(),
            login: self.login(),
            company: self.company(),
            followers: self.followers,
            public_repos: self.public_repos,
            followers_per_repo: self.followers_per_repo(),
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(followers: u64, public_repos: u64) -> ProfileRecord {
        ProfileRecord::new(
            Some("John Doe".to_owned()),
            "johndoe",
            Some("bcd".to_owned()),
            followers,
            public_repos,
        )
    }

    #[test]
    fn ratio_is_integer_division() {
        assert_eq!(record(100, 10).followers_per_repo(), 10);
        assert_eq!(record(200, 21).followers_per_repo(), 9);
    }

    #[test]
    fn ratio_is_zero_without_public_repos() {
        assert_eq!(record(200, 0).followers_per_repo(), 0);
        assert_eq!(record(0, 0).followers_per_repo(), 0);
    }

    #[test]
    fn serializes_with_derived_ratio() {
        let json = serde_json::to_value(record(200, 21)).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "name": "John Doe",
                "login": "johndoe",
                "company": "bcd",
                "followers": 200,
                "public_repos": 21,
                "followers_per_repo": 9
            })
        );
    }

    #[test]
    fn serializes_missing_optionals_as_null() {
        let json = serde_json::to_value(ProfileRecord::new(None, "jane", None, 0, 0)).unwrap();
        assert!(json["name"].is_null());
        assert!(json["company"].is_null());
        assert_eq!(json["followers_per_repo"], 0);
    }
}
