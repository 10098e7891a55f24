//! Store and analytics configuration.
//!
//! # Responsibility
//! - Hold tunables the UI shell may override (storage key, seed pillars,
//!   analytics weights and ceilings).
//! - Reject configurations that would make derived scores meaningless.
//!
//! # Invariants
//! - Each weight group sums to 1.0 (within `WEIGHT_TOLERANCE`).
//! - Ceilings and windows are strictly positive.
//! - Missing fields in JSON overrides fall back to defaults.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key used for the persisted snapshot.
pub const DEFAULT_STORAGE_KEY: &str = "lifedash-store";
/// Pillars seeded into a brand-new store.
pub const DEFAULT_PILLARS: [&str; 4] = ["Brain", "Voice", "Body", "Soul"];

const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Invalid configuration input.
#[derive(Debug)]
pub enum ConfigError {
    /// Weight group does not sum to 1.0.
    WeightSum { group: &'static str, sum: f64 },
    /// A weight is negative or not finite.
    InvalidWeight { name: &'static str, value: f64 },
    /// A ceiling or window is zero.
    ZeroLimit(&'static str),
    EmptyStorageKey,
    NoDefaultPillars,
    /// JSON override could not be parsed.
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WeightSum { group, sum } => {
                write!(f, "{group} weights must sum to 1.0, got {sum}")
            }
            Self::InvalidWeight { name, value } => {
                write!(f, "weight `{name}` must be a finite non-negative number, got {value}")
            }
            Self::ZeroLimit(name) => write!(f, "`{name}` must be greater than zero"),
            Self::EmptyStorageKey => write!(f, "storage key must not be blank"),
            Self::NoDefaultPillars => write!(f, "at least one default pillar is required"),
            Self::Parse(err) => write!(f, "invalid store config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Weights and normalization ceilings for derived analytics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Share of the weekly score taken by goal completion.
    pub weekly_goal_weight: f64,
    /// Share of the weekly score taken by logged minutes.
    pub weekly_time_weight: f64,
    /// Minutes per pillar per day that count as 100%.
    pub weekly_minutes_ceiling: u32,
    pub category_goal_weight: f64,
    pub category_time_weight: f64,
    pub category_journal_weight: f64,
    /// Total minutes per pillar that count as 100%.
    pub category_minutes_ceiling: u32,
    /// Journal entries per pillar that count as 100%.
    pub category_journal_ceiling: u32,
    /// Number of trailing days in the weekly series.
    pub weekly_window_days: u32,
    /// Number of trailing months in the streak series.
    pub monthly_window: u32,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            weekly_goal_weight: 0.7,
            weekly_time_weight: 0.3,
            weekly_minutes_ceiling: 120,
            category_goal_weight: 0.5,
            category_time_weight: 0.3,
            category_journal_weight: 0.2,
            category_minutes_ceiling: 600,
            category_journal_ceiling: 10,
            weekly_window_days: 7,
            monthly_window: 5,
        }
    }
}

impl AnalyticsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_weight_group(
            "weekly",
            &[
                ("weekly_goal_weight", self.weekly_goal_weight),
                ("weekly_time_weight", self.weekly_time_weight),
            ],
        )?;
        check_weight_group(
            "category",
            &[
                ("category_goal_weight", self.category_goal_weight),
                ("category_time_weight", self.category_time_weight),
                ("category_journal_weight", self.category_journal_weight),
            ],
        )?;
        for (name, value) in [
            ("weekly_minutes_ceiling", self.weekly_minutes_ceiling),
            ("category_minutes_ceiling", self.category_minutes_ceiling),
            ("category_journal_ceiling", self.category_journal_ceiling),
            ("weekly_window_days", self.weekly_window_days),
            ("monthly_window", self.monthly_window),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroLimit(name));
            }
        }
        Ok(())
    }
}

/// Top-level store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Key the snapshot blob is saved under.
    pub storage_key: String,
    /// Pillars used when no snapshot exists or a snapshot has none.
    pub default_pillars: Vec<String>,
    pub analytics: AnalyticsConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            default_pillars: DEFAULT_PILLARS.iter().map(|name| name.to_string()).collect(),
            analytics: AnalyticsConfig::default(),
        }
    }
}

impl StoreConfig {
    /// Parses a JSON override; absent fields keep their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        if !self
            .default_pillars
            .iter()
            .any(|pillar| !pillar.trim().is_empty())
        {
            return Err(ConfigError::NoDefaultPillars);
        }
        self.analytics.validate()
    }
}

fn check_weight_group(group: &'static str, weights: &[(&'static str, f64)]) -> Result<(), ConfigError> {
    let mut sum = 0.0;
    for &(name, value) in weights {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::InvalidWeight { name, value });
        }
        sum += value;
    }
    if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
        return Err(ConfigError::WeightSum { group, sum });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, StoreConfig};

    #[test]
    fn defaults_are_valid() {
        StoreConfig::default().validate().expect("defaults should validate");
    }

    #[test]
    fn json_override_keeps_unspecified_defaults() {
        let config = StoreConfig::from_json_str(
            r#"{"storage_key":"alt","analytics":{"weekly_minutes_ceiling":300}}"#,
        )
        .unwrap();
        assert_eq!(config.storage_key, "alt");
        assert_eq!(config.analytics.weekly_minutes_ceiling, 300);
        assert_eq!(config.analytics.weekly_goal_weight, 0.7);
        assert_eq!(config.default_pillars.len(), 4);
    }

    #[test]
    fn rejects_weights_not_summing_to_one() {
        let err = StoreConfig::from_json_str(
            r#"{"analytics":{"category_goal_weight":0.6,"category_time_weight":0.3,"category_journal_weight":0.2}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::WeightSum { group: "category", .. }));
    }

    #[test]
    fn rejects_negative_weight_and_zero_ceiling() {
        let mut config = StoreConfig::default();
        config.analytics.weekly_goal_weight = 1.2;
        config.analytics.weekly_time_weight = -0.2;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidWeight { name: "weekly_time_weight", .. })
        ));

        let mut config = StoreConfig::default();
        config.analytics.category_journal_ceiling = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroLimit("category_journal_ceiling"))
        ));
    }

    #[test]
    fn rejects_blank_storage_key_and_empty_pillars() {
        let mut config = StoreConfig::default();
        config.storage_key = "  ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::EmptyStorageKey)));

        let mut config = StoreConfig::default();
        config.default_pillars.clear();
        assert!(matches!(config.validate(), Err(ConfigError::NoDefaultPillars)));
    }
}
