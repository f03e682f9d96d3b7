//! Client configuration.
//!
//! Configuration is a flat key-value source. It can be built in code or read
//! from a TOML file, either from its top-level keys or from one named table:
//!
//! ```toml
//! api_key = "0123abcd"
//! api_url = "https://folksaurus.example.com/"
//! expire_time = 86400
//!
//! [staging]
//! api_key = "4567ef01"
//! api_url = "https://staging.folksaurus.example.com"
//! expire_time = 60
//! ```

use crate::error::{FolksaurusError, FolksaurusResult};
use folksaurus_protocol::DEFAULT_TERM_LIST_LIMIT;
use std::path::Path;
use std::time::Duration;
use toml::{Table, Value};

/// Keys that must be present in a configuration source.
pub const REQUIRED_KEYS: [&str; 3] = ["api_key", "api_url", "expire_time"];

/// Expiration window used when the config is built in code.
pub const DEFAULT_EXPIRE_TIME: Duration = Duration::from_secs(24 * 60 * 60);

/// Configuration for the term client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API key sent with every request.
    pub api_key: String,
    /// Base URL of the term service, without trailing slash.
    pub api_url: String,
    /// How long a cached term is trusted before it is checked again.
    pub expire_time: Duration,
    /// Default limit for term-list searches.
    pub term_list_limit: u32,
    /// Request timeout handed to the HTTP client.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Creates a new configuration.
    ///
    /// Surrounding slashes and spaces are trimmed from `api_url`.
    pub fn new(api_key: impl Into<String>, api_url: impl AsRef<str>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: trim_url(api_url.as_ref()),
            expire_time: DEFAULT_EXPIRE_TIME,
            term_list_limit: DEFAULT_TERM_LIST_LIMIT,
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the expiration window.
    pub fn with_expire_time(mut self, expire_time: Duration) -> Self {
        self.expire_time = expire_time;
        self
    }

    /// Sets the default term-list limit.
    pub fn with_term_list_limit(mut self, limit: u32) -> Self {
        self.term_list_limit = limit;
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reads the configuration from a TOML file.
    ///
    /// With `section`, values come from that table; otherwise from the
    /// top-level keys, ignoring any tables.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed, the section does not
    /// exist, or required keys are missing.
    pub fn from_file(path: impl AsRef<Path>, section: Option<&str>) -> FolksaurusResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| FolksaurusError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, section)
    }

    /// Parses the configuration from TOML text. See [`ClientConfig::from_file`].
    pub fn from_toml_str(text: &str, section: Option<&str>) -> FolksaurusResult<Self> {
        let root: Table = text.parse()?;
        let values = match section {
            Some(name) => root
                .get(name)
                .and_then(Value::as_table)
                .ok_or_else(|| FolksaurusError::ConfigSectionNotFound(name.to_string()))?,
            None => &root,
        };

        let missing: Vec<String> = REQUIRED_KEYS
            .iter()
            .filter(|key| scalar(values, key).is_none())
            .map(|key| key.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(FolksaurusError::MissingConfigKeys(missing));
        }

        let api_key = required_string(values, "api_key")?;
        let api_url = required_string(values, "api_url")?;
        let mut config = Self::new(api_key, api_url)
            .with_expire_time(Duration::from_secs(seconds(values, "expire_time")?));

        if scalar(values, "term_list_limit").is_some() {
            let limit = seconds(values, "term_list_limit")?;
            let limit = u32::try_from(limit)
                .ok()
                .filter(|limit| *limit > 0)
                .ok_or_else(|| invalid("term_list_limit", "expected a positive 32-bit integer"))?;
            config = config.with_term_list_limit(limit);
        }
        if scalar(values, "timeout").is_some() {
            config = config.with_timeout(Duration::from_secs(seconds(values, "timeout")?));
        }

        Ok(config)
    }
}

fn trim_url(url: &str) -> String {
    url.trim_matches(|c| c == '/' || c == ' ').to_string()
}

fn scalar<'a>(values: &'a Table, key: &str) -> Option<&'a Value> {
    values.get(key).filter(|value| !value.is_table())
}

fn invalid(key: &str, message: &str) -> FolksaurusError {
    FolksaurusError::InvalidConfigValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}

fn required_string(values: &Table, key: &str) -> FolksaurusResult<String> {
    scalar(values, key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| invalid(key, "expected a string"))
}

/// Reads a non-negative integer, given either as a TOML integer or as text.
fn seconds(values: &Table, key: &str) -> FolksaurusResult<u64> {
    match scalar(values, key) {
        Some(Value::Integer(n)) => {
            u64::try_from(*n).map_err(|_| invalid(key, "expected a non-negative integer"))
        }
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map_err(|_| invalid(key, "expected a non-negative integer")),
        _ => Err(invalid(key, "expected a non-negative integer")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CONFIG: &str = r#"
api_key = "test-key"
api_url = "https://folksaurus.example.com/ "
expire_time = 3600

[staging]
api_key = "staging-key"
api_url = "https://staging.example.com"
expire_time = "60"
term_list_limit = 10
timeout = 5
"#;

    #[test]
    fn builder() {
        let config = ClientConfig::new("key", "https://folksaurus.example.com/")
            .with_expire_time(Duration::from_secs(60))
            .with_term_list_limit(5)
            .with_timeout(Duration::from_secs(2));

        assert_eq!(config.api_url, "https://folksaurus.example.com");
        assert_eq!(config.expire_time, Duration::from_secs(60));
        assert_eq!(config.term_list_limit, 5);
        assert_eq!(config.timeout, Duration::from_secs(2));
    }

    #[test]
    fn top_level_keys_ignore_sections() {
        let config = ClientConfig::from_toml_str(CONFIG, None).unwrap();
        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.api_url, "https://folksaurus.example.com");
        assert_eq!(config.expire_time, Duration::from_secs(3600));
        assert_eq!(config.term_list_limit, DEFAULT_TERM_LIST_LIMIT);
    }

    #[test]
    fn named_section() {
        let config = ClientConfig::from_toml_str(CONFIG, Some("staging")).unwrap();
        assert_eq!(config.api_key, "staging-key");
        assert_eq!(config.expire_time, Duration::from_secs(60));
        assert_eq!(config.term_list_limit, 10);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn missing_section() {
        let err = ClientConfig::from_toml_str(CONFIG, Some("production")).unwrap_err();
        assert!(matches!(err, FolksaurusError::ConfigSectionNotFound(name) if name == "production"));
    }

    #[test]
    fn missing_keys_are_all_reported() {
        let err = ClientConfig::from_toml_str("api_url = \"http://x\"", None).unwrap_err();
        match err {
            FolksaurusError::MissingConfigKeys(keys) => {
                assert_eq!(keys, vec!["api_key".to_string(), "expire_time".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn section_keys_do_not_satisfy_top_level() {
        let err = ClientConfig::from_toml_str("[api_key]\nx = 1", None).unwrap_err();
        assert!(matches!(err, FolksaurusError::MissingConfigKeys(keys) if keys.len() == 3));
    }

    #[test]
    fn invalid_values() {
        let text = "api_key = \"k\"\napi_url = \"u\"\nexpire_time = -5";
        assert!(matches!(
            ClientConfig::from_toml_str(text, None),
            Err(FolksaurusError::InvalidConfigValue { key, .. }) if key == "expire_time"
        ));

        let text = "api_key = 7\napi_url = \"u\"\nexpire_time = 5";
        assert!(matches!(
            ClientConfig::from_toml_str(text, None),
            Err(FolksaurusError::InvalidConfigValue { key, .. }) if key == "api_key"
        ));
    }

    #[test]
    fn malformed_toml() {
        assert!(matches!(
            ClientConfig::from_toml_str("api_key = ", None),
            Err(FolksaurusError::ConfigParse(_))
        ));
    }

    #[test]
    fn from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CONFIG.as_bytes()).unwrap();

        let config = ClientConfig::from_file(file.path(), Some("staging")).unwrap();
        assert_eq!(config.api_key, "staging-key");

        let err = ClientConfig::from_file("/nonexistent/folksaurus.toml", None).unwrap_err();
        assert!(matches!(err, FolksaurusError::ConfigRead { .. }));
        assert!(err.is_config_error());
    }
}
