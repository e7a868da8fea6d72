//! Environment configuration reader module
//!
//! Abstracts access to `GBENCHDIFF_*` environment variables so that the
//! configuration priority logic can be tested without touching the process
//! environment.

use std::env;

/// Environment variable holding the default significance level
pub const ALPHA_VAR: &str = "GBENCHDIFF_ALPHA";

/// Environment variable holding the default benchmark name filter
pub const FILTER_VAR: &str = "GBENCHDIFF_FILTER";

/// Trait for reading configuration values from the environment
pub trait EnvReader {
    /// Get a value by key, `None` when unset or empty
    fn get(&self, key: &str) -> Option<String>;
}

/// Reader backed by the process environment
pub struct SystemEnvReader;

impl EnvReader for SystemEnvReader {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key)
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
    }
}

/// Mock environment reader for testing
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockEnvReader {
    values: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl MockEnvReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_owned(), value.to_owned());
        self
    }
}

#[cfg(test)]
impl EnvReader for MockEnvReader {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **What is tested:** Mock reader lookups
    /// **Why it is tested:** Configuration tests depend on the mock behaving like the environment
    /// **Test conditions:** Mock with one variable set
    /// **Expectations:** Set key returns its value, other keys return None
    #[test]
    fn test_mock_reader() {
        let reader = MockEnvReader::new().with_var(ALPHA_VAR, "0.01");
        assert_eq!(reader.get(ALPHA_VAR), Some("0.01".to_owned()));
        assert_eq!(reader.get(FILTER_VAR), None);
    }

    /// **What is tested:** System reader on an unset variable
    /// **Why it is tested:** Unset variables must fall through to defaults
    /// **Test conditions:** Looks up a variable name that is never set
    /// **Expectations:** None
    #[test]
    fn test_system_reader_unset() {
        assert_eq!(SystemEnvReader.get("GBENCHDIFF_TEST_NEVER_SET_8F2A"), None);
    }
}
