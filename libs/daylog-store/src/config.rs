use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, Local, Utc};
use serde::Deserialize;

use crate::error::{StoreError, StoreResult};

// ════════════════════════════════════════════════════════════════
//  Configuration
// ════════════════════════════════════════════════════════════════

/// How a calendar date is spelled in a partition file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IdFormat {
    /// `{year}_{zero_based_month}_{day}`, no padding: `2026_9_19`.
    #[default]
    Legacy,
    /// `{YYYY}-{MM}-{DD}`: `2026-10-19`. Sorts lexically.
    Iso,
}

/// Which clock decides "today" for `*_now` operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClockZone {
    #[default]
    Local,
    Utc,
}

impl ClockZone {
    pub fn now(self) -> DateTime<FixedOffset> {
        match self {
            ClockZone::Local => Local::now().fixed_offset(),
            ClockZone::Utc => Utc::now().fixed_offset(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Directory holding one file per partition.
    pub data_dir: PathBuf,
    /// Number of trailing days (today included) that are kept.
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
    /// File name suffix of every partition, dot included.
    #[serde(default = "default_suffix")]
    pub suffix: String,
    #[serde(default)]
    pub id_format: IdFormat,
    #[serde(default)]
    pub time_zone: ClockZone,
}

fn default_retention_days() -> u32 {
    30
}
fn default_suffix() -> String {
    ".db".to_string()
}

impl StoreConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            retention_days: default_retention_days(),
            suffix: default_suffix(),
            id_format: IdFormat::default(),
            time_zone: ClockZone::default(),
        }
    }

    pub fn with_retention_days(mut self, days: u32) -> Self {
        self.retention_days = days;
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn with_id_format(mut self, id_format: IdFormat) -> Self {
        self.id_format = id_format;
        self
    }

    pub fn with_time_zone(mut self, time_zone: ClockZone) -> Self {
        self.time_zone = time_zone;
        self
    }

    pub fn validate(&self) -> StoreResult<()> {
        if self.retention_days == 0 {
            return Err(StoreError::Config("retention_days must be at least 1".into()));
        }
        if self.suffix.is_empty() {
            return Err(StoreError::Config("suffix must not be empty".into()));
        }
        if self.suffix.contains(['/', '\\']) {
            return Err(StoreError::Config(format!(
                "suffix '{}' must not contain path separators",
                self.suffix
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let cfg: StoreConfig = serde_json::from_str(r#"{"data_dir": "data"}"#).unwrap();
        assert_eq!(cfg.data_dir, PathBuf::from("data"));
        assert_eq!(cfg.retention_days, 30);
        assert_eq!(cfg.suffix, ".db");
        assert_eq!(cfg.id_format, IdFormat::Legacy);
        assert_eq!(cfg.time_zone, ClockZone::Local);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn enums_use_snake_case() {
        let cfg: StoreConfig = serde_json::from_str(
            r#"{"data_dir": "d", "id_format": "iso", "time_zone": "utc", "retention_days": 7}"#,
        )
        .unwrap();
        assert_eq!(cfg.id_format, IdFormat::Iso);
        assert_eq!(cfg.time_zone, ClockZone::Utc);
        assert_eq!(cfg.retention_days, 7);
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert!(StoreConfig::new("d").with_retention_days(0).validate().is_err());
        assert!(StoreConfig::new("d").with_suffix("").validate().is_err());
        assert!(StoreConfig::new("d").with_suffix("/x.db").validate().is_err());
    }
}
