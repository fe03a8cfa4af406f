//! JSON-loadable configuration for end-to-end binarization.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::BinarizeParams;
use crate::BinarizeError;

/// Longer-side limit applied before thresholding unless configured otherwise.
pub const DEFAULT_MAX_SIDE: u32 = 4096;

/// Pipeline parameters plus the downscale safeguard.
///
/// ```json
/// {
///   "grayscale": "luminance",
///   "pre_blur": null,
///   "threshold": { "block_size": 25, "sensitivity": 10, "weighting": "uniform" },
///   "max_side": 2048
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BinarizeConfig {
    #[serde(flatten)]
    pub params: BinarizeParams,
    /// Inputs whose longer side exceeds this are downscaled first; `None` disables it.
    #[serde(default = "default_max_side")]
    pub max_side: Option<u32>,
}

fn default_max_side() -> Option<u32> {
    Some(DEFAULT_MAX_SIDE)
}

impl Default for BinarizeConfig {
    fn default() -> Self {
        Self {
            params: BinarizeParams::default(),
            max_side: default_max_side(),
        }
    }
}

impl BinarizeConfig {
    pub fn from_json_str(json: &str) -> Result<Self, BinarizeError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, BinarizeError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check everything that can be checked without an image.
    pub fn validate(&self) -> Result<(), BinarizeError> {
        if self.max_side == Some(0) {
            return Err(BinarizeError::InvalidMaxSide);
        }
        self.params
            .validate()
            .map_err(crate::core::ThresholdError::from)?;
        Ok(())
    }
}
