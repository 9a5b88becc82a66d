use crate::recurrence::{RecurrenceExpander, DEFAULT_EXPANSION_LIMIT};
use serde::{Deserialize, Serialize};

/// Tunables for the calendar engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Occurrences pulled from rrule per expansion page
    pub expansion_limit: u16,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            expansion_limit: DEFAULT_EXPANSION_LIMIT,
        }
    }
}

impl EngineConfig {
    pub fn expander(&self) -> RecurrenceExpander {
        RecurrenceExpander::new(self.expansion_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.expander().limit(), 1000);
    }

    #[test]
    fn test_expansion_limit_is_configurable() {
        let config: EngineConfig = serde_json::from_str(r#"{"expansion_limit": 25}"#).unwrap();
        assert_eq!(config.expander().limit(), 25);
    }
}
