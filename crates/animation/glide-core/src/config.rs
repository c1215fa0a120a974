//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::ease::LookupMode;
use crate::error::{GlideError, Result};

/// Sizing and behavior knobs. Every field has a default, so partial JSON works.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Samples per (family, direction) row of the easing table.
    pub lut_samples: usize,
    /// How the easing table is read.
    pub lookup: LookupMode,

    /// Initial capacity hints; storage doubles when exhausted.
    pub initial_records: usize,
    pub initial_writes: usize,
    pub initial_ephemeral: usize,

    /// Blank records kept for reuse. Extra retired records are dropped.
    pub pool_capacity: usize,

    /// Global multiplier on every tick delta.
    pub time_scale: f32,

    /// Collapse same-key writes within a tick to the last one.
    pub coalesce_writes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lut_samples: crate::ease::table::DEFAULT_SAMPLES,
            lookup: LookupMode::Interpolated,
            initial_records: 64,
            initial_writes: 64,
            initial_ephemeral: 32,
            pool_capacity: 256,
            time_scale: 1.0,
            coalesce_writes: true,
        }
    }
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Config = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.lut_samples < 2 {
            return Err(GlideError::InvalidConfig {
                reason: format!("lut_samples must be >= 2, got {}", self.lut_samples),
            });
        }
        if !self.time_scale.is_finite() {
            return Err(GlideError::InvalidConfig {
                reason: "time_scale must be finite".to_string(),
            });
        }
        Ok(())
    }
}
