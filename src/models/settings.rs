//! Settings Models
//!
//! Assistant configuration and partial-update shapes.

use serde::{Deserialize, Serialize};

use timeclerk_llm::ProviderConfig;
pub use timeclerk_tools::WorkCalendar;

/// Assistant configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Completion backend connection settings
    pub provider: ProviderConfig,
    /// Tool result cache TTL in seconds
    pub tool_cache_ttl_secs: u64,
    /// Conversation response cache TTL in seconds
    pub response_cache_ttl_secs: u64,
    /// Maximum prior turns replayed into the prompt
    pub history_limit: usize,
    /// Work-calendar policy for missing-hours reporting
    pub work_calendar: WorkCalendar,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            tool_cache_ttl_secs: 300,
            response_cache_ttl_secs: 600,
            history_limit: 10,
            work_calendar: WorkCalendar::default(),
        }
    }
}

/// Settings update request (partial update)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AssistantConfigUpdate {
    pub tool_cache_ttl_secs: Option<u64>,
    pub response_cache_ttl_secs: Option<u64>,
    pub history_limit: Option<usize>,
    pub expected_daily_hours: Option<f64>,
    pub include_weekends: Option<bool>,
}

impl AssistantConfig {
    /// Apply a partial update to the configuration
    pub fn apply_update(&mut self, update: AssistantConfigUpdate) {
        if let Some(ttl) = update.tool_cache_ttl_secs {
            self.tool_cache_ttl_secs = ttl;
        }
        if let Some(ttl) = update.response_cache_ttl_secs {
            self.response_cache_ttl_secs = ttl;
        }
        if let Some(limit) = update.history_limit {
            self.history_limit = limit;
        }
        if let Some(hours) = update.expected_daily_hours {
            self.work_calendar.expected_daily_hours = hours;
        }
        if let Some(weekends) = update.include_weekends {
            self.work_calendar.include_weekends = weekends;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.tool_cache_ttl_secs == 0 {
            return Err("tool_cache_ttl_secs must be at least 1 second".to_string());
        }
        if self.response_cache_ttl_secs == 0 {
            return Err("response_cache_ttl_secs must be at least 1 second".to_string());
        }
        let hours = self.work_calendar.expected_daily_hours;
        if !(0.0..=24.0).contains(&hours) || hours == 0.0 {
            return Err(format!(
                "expected_daily_hours must be within (0, 24], got {hours}"
            ));
        }
        Ok(())
    }
}
