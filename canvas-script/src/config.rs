//! Harness configuration.

/// Sandbox limits and fault decoration for a [`ScriptHarness`](crate::ScriptHarness).
///
/// The default imposes no operation limit: a runaway script occupies its
/// worker until the process exits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Maximum interpreter operations per execution (`None` = unlimited).
    pub max_operations: Option<u64>,
    /// Maximum function call nesting depth.
    pub max_call_levels: usize,
    /// Maximum length of any string value, in bytes.
    pub max_string_size: usize,
    /// Maximum number of elements in any array value.
    pub max_array_size: usize,
    /// Base URL used to build help links for faults that have none.
    pub help_url: Option<String>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            max_operations: None,
            max_call_levels: 64,
            max_string_size: 1_000_000,
            max_array_size: 100_000,
            help_url: None,
        }
    }
}

impl HarnessConfig {
    /// Limit the number of operations per execution.
    #[must_use]
    pub fn with_max_operations(mut self, max_operations: u64) -> Self {
        self.max_operations = Some(max_operations);
        self
    }

    /// Set the maximum call depth.
    #[must_use]
    pub fn with_max_call_levels(mut self, levels: usize) -> Self {
        self.max_call_levels = levels;
        self
    }

    /// Set the maximum string size.
    #[must_use]
    pub fn with_max_string_size(mut self, size: usize) -> Self {
        self.max_string_size = size;
        self
    }

    /// Set the maximum array size.
    #[must_use]
    pub fn with_max_array_size(mut self, size: usize) -> Self {
        self.max_array_size = size;
        self
    }

    /// Set the help link base URL. A trailing slash is dropped.
    #[must_use]
    pub fn with_help_url(mut self, url: impl Into<String>) -> Self {
        let url: String = url.into();
        self.help_url = Some(url.trim_end_matches('/').to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_unlimited_operations() {
        let config = HarnessConfig::default();
        assert!(config.max_operations.is_none());
        assert_eq!(config.max_call_levels, 64);
        assert!(config.help_url.is_none());
    }

    #[test]
    fn test_builder() {
        let config = HarnessConfig::default()
            .with_max_operations(1_000)
            .with_max_call_levels(8)
            .with_help_url("https://docs.example.com/errors/");
        assert_eq!(config.max_operations, Some(1_000));
        assert_eq!(config.max_call_levels, 8);
        assert_eq!(
            config.help_url.as_deref(),
            Some("https://docs.example.com/errors")
        );
    }
}
