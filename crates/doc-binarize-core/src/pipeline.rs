//! Grayscale -> optional blur -> adaptive threshold.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{ParamError, ThresholdError};
use crate::filter::{gaussian_blur, normalize_blur_size};
use crate::grayscale::{to_grayscale, GrayscaleMethod};
use crate::grid::PixelGrid;
use crate::threshold::{adaptive_threshold, BinaryImage, ThresholdParams};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Full set of parameters for one binarization call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinarizeParams {
    pub grayscale: GrayscaleMethod,
    /// Gaussian pre-blur kernel size to suppress scanner noise; `None` disables it.
    pub pre_blur: Option<usize>,
    pub threshold: ThresholdParams,
}

impl Default for BinarizeParams {
    fn default() -> Self {
        Self {
            grayscale: GrayscaleMethod::default(),
            pre_blur: Some(5),
            threshold: ThresholdParams::default(),
        }
    }
}

impl BinarizeParams {
    /// Check the blur and threshold parameters without touching any pixels.
    pub fn validate(&self) -> Result<(), ParamError> {
        if let Some(size) = self.pre_blur {
            normalize_blur_size(size)?;
        }
        self.threshold.validate()?;
        Ok(())
    }
}

/// Binarize a caller-supplied grid.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "info",
        skip(grid, params),
        fields(width = grid.width(), height = grid.height(), channels = grid.channels())
    )
)]
pub fn binarize(grid: &PixelGrid, params: &BinarizeParams) -> Result<BinaryImage, ThresholdError> {
    let gray = to_grayscale(grid, params.grayscale);
    debug!(
        "grayscale {:?} from {} channel(s)",
        params.grayscale,
        grid.channels()
    );
    match params.pre_blur {
        Some(size) => {
            let blurred = gaussian_blur(&gray.view(), size, None)?;
            adaptive_threshold(&blurred.view(), &params.threshold)
        }
        None => adaptive_threshold(&gray.view(), &params.threshold),
    }
}
