//! Scheduler configuration loaded from TOML.

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::conflicts::ConflictStrategy;
use crate::drag::DEFAULT_HOUR_WIDTH_PX;
use crate::error::{SchedulerError, SchedulerResult};
use crate::layout::LaneGeometry;

/// Default gap between neighbouring mission blocks.
pub const DEFAULT_BLOCK_GAP_PX: f64 = 4.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub hour_width_px: f64,
    pub block_gap_px: f64,
    pub conflict_strategy: ConflictStrategy,
    /// Day the timeline represents; only used for exports.
    pub schedule_date: NaiveDate,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            hour_width_px: DEFAULT_HOUR_WIDTH_PX,
            block_gap_px: DEFAULT_BLOCK_GAP_PX,
            conflict_strategy: ConflictStrategy::default(),
            schedule_date: NaiveDate::from_ymd_opt(2024, 12, 15).unwrap_or(NaiveDate::MIN),
        }
    }
}

impl SchedulerConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> SchedulerResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SchedulerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate; missing keys fall back to defaults.
    pub fn from_toml_str(content: &str) -> SchedulerResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SchedulerResult<()> {
        if !(self.hour_width_px.is_finite() && self.hour_width_px > 0.0) {
            return Err(SchedulerError::InvalidConfig(format!(
                "hour_width_px must be positive, got {}",
                self.hour_width_px
            )));
        }
        if !(self.block_gap_px >= 0.0 && self.block_gap_px < self.hour_width_px) {
            return Err(SchedulerError::InvalidConfig(format!(
                "block_gap_px must be in [0, {}), got {}",
                self.hour_width_px, self.block_gap_px
            )));
        }
        Ok(())
    }

    pub fn geometry(&self) -> LaneGeometry {
        LaneGeometry {
            hour_width_px: self.hour_width_px,
            block_gap_px: self.block_gap_px,
        }
    }
}
