use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;

use crate::error::{CrmError, CrmResult};

/// Longest activity chart accepted, one leap year of days.
pub const MAX_WINDOW_DAYS: u32 = 366;

/// Root application configuration. Loaded from environment variables
/// with the prefix `CRM_DASHBOARD__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Offset from UTC, in minutes, of the calendar the dashboard buckets by.
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
    /// Number of calendar days in the rolling lead activity chart.
    #[serde(default = "default_window_days")]
    pub window_days: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

// Default functions
fn default_utc_offset_minutes() -> i32 {
    0
}
fn default_window_days() -> u32 {
    7
}
fn default_log_filter() -> String {
    "crm_dashboard=info,crm_reporting=info".to_string()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: default_utc_offset_minutes(),
            window_days: default_window_days(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dashboard: DashboardConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// The configured offset as a `chrono` offset. Out-of-range values
    /// (beyond +/- 24h) fall back to UTC.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).unwrap_or(Utc.fix())
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> CrmResult<Self> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("CRM_DASHBOARD")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CrmResult<()> {
        let days = self.dashboard.window_days;
        if !(1..=MAX_WINDOW_DAYS).contains(&days) {
            return Err(CrmError::Config(format!(
                "dashboard.window_days must be between 1 and {MAX_WINDOW_DAYS}, got {days}"
            )));
        }
        Ok(())
    }
}
