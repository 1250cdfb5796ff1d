//! Request-time recognition parameters
//!
//! Nothing here is persisted; these are the fixed per-session values
//! handed to the engine every time listening starts.

/// Configuration for a recognition session
#[derive(Clone, Debug)]
pub struct SpeechConfig {
    /// BCP-47 tag of the single recognition language
    pub locale: String,

    /// Whether the engine should stream partial hypotheses
    pub partial_results: bool,

    /// Upper bound on alternative transcripts per result
    pub max_alternatives: usize,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            locale: "en-US".to_string(),
            partial_results: false,
            max_alternatives: 4,
        }
    }
}

impl SpeechConfig {
    /// Set the recognition locale
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Enable or disable partial hypothesis streaming
    pub fn with_partial_results(mut self, enabled: bool) -> Self {
        self.partial_results = enabled;
        self
    }

    /// Set the alternative transcript cap
    pub fn with_max_alternatives(mut self, cap: usize) -> Self {
        self.max_alternatives = cap;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SpeechConfig::default();
        assert_eq!(config.locale, "en-US");
        assert!(!config.partial_results);
        assert_eq!(config.max_alternatives, 4);
    }

    #[test]
    fn test_config_builder() {
        let config = SpeechConfig::default()
            .with_locale("en-GB")
            .with_max_alternatives(2);

        assert_eq!(config.locale, "en-GB");
        assert_eq!(config.max_alternatives, 2);
    }
}
