//! Client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// User agent sent when the configuration leaves it empty.
pub const DEFAULT_USER_AGENT: &str = concat!("mxclient/", env!("CARGO_PKG_VERSION"));

/// Connection settings for a [`Client`](crate::Client).
///
/// Supplied by the caller; the crate never loads it from disk or the
/// environment. Every field is optional when deserializing.
///
/// # Example
///
/// ```
/// use mxclient::Config;
///
/// let config = Config::new("https://app.example.com/xas/")
///     .username("MxAdmin")
///     .password("secret");
/// assert_eq!(config.url, "https://app.example.com/xas/");
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Action endpoint every request is POSTed to.
    pub url: String,
    /// Login name.
    pub username: String,
    /// Login password.
    pub password: String,
    /// Use an anonymous session instead of credentials.
    pub anonymous: bool,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
    /// Overall per-request timeout. `None` waits indefinitely.
    #[serde(rename = "timeout_ms", with = "duration_ms")]
    pub timeout: Option<Duration>,
}

impl Config {
    /// Create a configuration for the given endpoint with defaults elsewhere.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Set the login name.
    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    /// Set the login password.
    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Request an anonymous session.
    #[must_use]
    pub fn anonymous(mut self, anonymous: bool) -> Self {
        self.anonymous = anonymous;
        self
    }

    /// Override the `User-Agent` header.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Bound every request by `timeout`.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Replace every empty string field with its default.
    ///
    /// `anonymous` and `timeout` pass through unchanged.
    #[must_use]
    pub fn normalized(self) -> Self {
        let defaults = Self::default();
        Self {
            url: or_default(self.url, defaults.url),
            username: or_default(self.username, defaults.username),
            password: or_default(self.password, defaults.password),
            anonymous: self.anonymous,
            user_agent: or_default(self.user_agent, defaults.user_agent),
            timeout: self.timeout,
        }
    }
}

fn or_default(value: String, default: String) -> String {
    if value.is_empty() { default } else { value }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: String::new(),
            username: String::new(),
            password: String::new(),
            anonymous: false,
            user_agent: DEFAULT_USER_AGENT.into(),
            timeout: None,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let password = if self.password.is_empty() { "" } else { "[REDACTED]" };
        f.debug_struct("Config")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &password)
            .field("anonymous", &self.anonymous)
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Optional durations as plain integer milliseconds on the wire.
mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&(d.as_millis() as u64)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_user_agent_is_set() {
        let config = Config::default();
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert!(config.user_agent.starts_with("mxclient/"));
    }

    #[test]
    fn normalized_fills_empty_user_agent() {
        let config = Config::new("http://localhost:8080/xas/").user_agent("").normalized();
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.url, "http://localhost:8080/xas/");
    }

    #[test]
    fn normalized_keeps_anonymous_and_timeout() {
        let config = Config::default()
            .anonymous(true)
            .timeout(Duration::from_secs(5))
            .normalized();
        assert!(config.anonymous);
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn builder_overrides_fields() {
        let config = Config::new("http://a/xas/")
            .username("user")
            .password("pw")
            .user_agent("agent/1.0");
        assert_eq!(config.username, "user");
        assert_eq!(config.password, "pw");
        assert_eq!(config.user_agent, "agent/1.0");
    }

    #[test]
    fn debug_redacts_password() {
        let rendered = format!("{:?}", Config::new("http://a/").password("hunter2"));
        assert!(!rendered.contains("hunter2"), "{rendered}");
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn deserializes_partial_document() {
        let config: Config = serde_json::from_value(serde_json::json!({
            "url": "http://localhost/xas/",
            "anonymous": true,
            "timeout_ms": 1500
        }))
        .expect("valid config");
        assert_eq!(config.url, "http://localhost/xas/");
        assert!(config.anonymous);
        assert_eq!(config.username, "");
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.timeout, Some(Duration::from_millis(1500)));
    }

    #[test]
    fn serializes_timeout_as_millis() {
        let json = serde_json::to_value(Config::default().timeout(Duration::from_secs(2)))
            .expect("serializable");
        assert_eq!(json["timeout_ms"], 2000);
        assert_eq!(json["user_agent"], DEFAULT_USER_AGENT);
    }

    proptest! {
        #[test]
        fn normalized_passes_non_empty_fields_through(
            url in ".{1,40}",
            username in ".{1,20}",
            password in ".{1,20}",
            user_agent in ".{1,30}",
            anonymous in any::<bool>(),
        ) {
            let config = Config {
                url: url.clone(),
                username: username.clone(),
                password: password.clone(),
                anonymous,
                user_agent: user_agent.clone(),
                timeout: None,
            }
            .normalized();
            prop_assert_eq!(config.url, url);
            prop_assert_eq!(config.username, username);
            prop_assert_eq!(config.password, password);
            prop_assert_eq!(config.user_agent, user_agent);
            prop_assert_eq!(config.anonymous, anonymous);
        }

        #[test]
        fn normalized_defaults_empty_fields(anonymous in any::<bool>()) {
            let config = Config {
                url: String::new(),
                username: String::new(),
                password: String::new(),
                anonymous,
                user_agent: String::new(),
                timeout: None,
            }
            .normalized();
            prop_assert_eq!(config, Config::default().anonymous(anonymous));
        }
    }
}
