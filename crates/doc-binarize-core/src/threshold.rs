//! Local adaptive thresholding.
//!
//! Every pixel is compared against the mean of its `block_size × block_size`
//! neighborhood (edge-replicated at the borders) minus `sensitivity`.
//! Pixels strictly brighter than that threshold become foreground (255).

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{ParamError, ThresholdError};
use crate::filter::{local_mean, resolve_sigma};
use crate::image::{GrayImage, GrayImageView};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Foreground value of a binary image.
pub const FOREGROUND: u8 = 255;
/// Background value of a binary image.
pub const BACKGROUND: u8 = 0;

/// Largest accepted window side; keeps window sums and pad offsets in range.
pub const MAX_BLOCK_SIZE: usize = 32_767;

/// Weighting of samples inside the local window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weighting {
    /// Arithmetic mean of the window.
    Uniform,
    /// Gaussian-weighted mean, σ derived from the window size.
    #[default]
    Gaussian,
}

/// Parameters of [`adaptive_threshold`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdParams {
    /// Side of the square window. Even values are bumped to the next odd one.
    pub block_size: usize,
    /// Subtracted from the local mean; larger values mark more pixels as foreground.
    pub sensitivity: f32,
    pub weighting: Weighting,
    /// Explicit Gaussian σ. `None` uses `0.3 * ((block_size - 1) * 0.5 - 1) + 0.8`.
    pub sigma: Option<f32>,
}

impl Default for ThresholdParams {
    fn default() -> Self {
        Self {
            block_size: 11,
            sensitivity: 2.0,
            weighting: Weighting::Gaussian,
            sigma: None,
        }
    }
}

impl ThresholdParams {
    pub fn new(block_size: usize, sensitivity: f32, weighting: Weighting) -> Self {
        Self {
            block_size,
            sensitivity,
            weighting,
            sigma: None,
        }
    }

    /// Check the parameters and return the normalized (odd) block size.
    pub fn validate(&self) -> Result<usize, ParamError> {
        let size = normalize_block_size(self.block_size)?;
        if !self.sensitivity.is_finite() {
            return Err(ParamError::NonFiniteSensitivity(self.sensitivity));
        }
        if self.weighting == Weighting::Gaussian {
            resolve_sigma(size, self.sigma)?;
        }
        Ok(size)
    }
}

/// Bump an even window size to the next odd value; reject anything below 3
/// or above [`MAX_BLOCK_SIZE`].
pub fn normalize_block_size(block_size: usize) -> Result<usize, ParamError> {
    if block_size > MAX_BLOCK_SIZE {
        return Err(ParamError::BlockSizeTooLarge {
            requested: block_size,
            max: MAX_BLOCK_SIZE,
        });
    }
    let normalized = if block_size % 2 == 0 {
        block_size + 1
    } else {
        block_size
    };
    if normalized < 3 {
        return Err(ParamError::BlockSizeTooSmall {
            requested: block_size,
            normalized,
        });
    }
    Ok(normalized)
}

/// Binary image with values restricted to [`FOREGROUND`] and [`BACKGROUND`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryImage(GrayImage);

impl BinaryImage {
    #[inline]
    pub fn width(&self) -> usize {
        self.0.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.0.height
    }

    #[inline]
    pub fn is_foreground(&self, x: usize, y: usize) -> bool {
        self.0.get(x, y) == FOREGROUND
    }

    pub fn data(&self) -> &[u8] {
        &self.0.data
    }

    pub fn view(&self) -> GrayImageView<'_> {
        self.0.view()
    }

    pub fn foreground_count(&self) -> usize {
        self.0.data.iter().filter(|&&v| v == FOREGROUND).count()
    }

    /// Share of foreground pixels in `[0, 1]`.
    pub fn foreground_ratio(&self) -> f64 {
        self.foreground_count() as f64 / self.0.data.len() as f64
    }

    pub fn into_gray(self) -> GrayImage {
        self.0
    }
}

/// Binarize `src` against its local means.
///
/// `output(x, y) = 255` iff `src(x, y) > mean(x, y) - sensitivity`; equality
/// maps to background. Window sizes at or above the image side are accepted
/// and handled by edge replication.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "info",
        skip(src, params),
        fields(
            width = src.width,
            height = src.height,
            block_size = params.block_size,
            weighting = ?params.weighting
        )
    )
)]
pub fn adaptive_threshold(
    src: &GrayImageView<'_>,
    params: &ThresholdParams,
) -> Result<BinaryImage, ThresholdError> {
    src.validate()?;
    let size = params.validate()?;
    debug!(
        "adaptive threshold {}x{} block_size={} (requested {}) sensitivity={} weighting={:?}",
        src.width, src.height, size, params.block_size, params.sensitivity, params.weighting
    );
    if size >= src.width.min(src.height) {
        warn!(
            "block size {size} covers the whole {}x{} image; output is dominated by edge replication",
            src.width, src.height
        );
    }

    let mean = local_mean(src, size, params.weighting, params.sigma)?;
    let sensitivity = params.sensitivity as f64;
    let data = src
        .data
        .iter()
        .enumerate()
        .map(|(idx, &v)| {
            if v as f64 > mean.at(idx) - sensitivity {
                FOREGROUND
            } else {
                BACKGROUND
            }
        })
        .collect();

    Ok(BinaryImage(GrayImage {
        width: src.width,
        height: src.height,
        data,
    }))
}
