//! Local mean filters with edge replication.
//!
//! Both filters accumulate in integers. The box filter keeps exact window
//! sums; the Gaussian filter uses fixed-point taps that sum to exactly
//! `1 << GAUSS_SHIFT` per pass. A flat region therefore reproduces its own
//! value exactly, which keeps the strict `>` comparison of the thresholder
//! deterministic.

use log::debug;

use crate::error::{ParamError, ThresholdError};
use crate::image::{GrayImage, GrayImageView};
use crate::padding::replicate_index;
use crate::threshold::{normalize_block_size, Weighting, MAX_BLOCK_SIZE};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Fixed-point precision of one Gaussian pass.
pub const GAUSS_SHIFT: u32 = 24;
const GAUSS_ONE: u64 = 1 << GAUSS_SHIFT;

/// Conventional σ for a kernel of side `size`: `0.3 * ((size - 1) * 0.5 - 1) + 0.8`.
pub fn sigma_for_block_size(size: usize) -> f32 {
    0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Normalized 1-D Gaussian weights of length `size` (odd), centered.
pub fn gaussian_kernel_1d(size: usize, sigma: f32) -> Vec<f64> {
    let half = (size / 2) as isize;
    let sigma = sigma as f64;
    let denom = 2.0 * sigma * sigma;
    let mut taps: Vec<f64> = (-half..=half)
        .map(|k| (-((k * k) as f64) / denom).exp())
        .collect();
    let sum: f64 = taps.iter().sum();
    for t in &mut taps {
        *t /= sum;
    }
    taps
}

/// Fixed-point version of [`gaussian_kernel_1d`] summing to `1 << GAUSS_SHIFT`.
///
/// Side taps are floored in symmetric pairs and the center absorbs the
/// remainder, so the kernel stays symmetric and non-negative.
pub fn gaussian_kernel_fixed(size: usize, sigma: f32) -> Vec<u64> {
    let taps = gaussian_kernel_1d(size, sigma);
    let half = size / 2;
    let mut fixed = vec![0u64; size];
    let mut side_total = 0u64;
    for k in 1..=half {
        let w = (taps[half + k] * GAUSS_ONE as f64).floor() as u64;
        fixed[half + k] = w;
        fixed[half - k] = w;
        side_total += 2 * w;
    }
    fixed[half] = GAUSS_ONE - side_total;
    fixed
}

/// Per-pixel local statistic, kept as integer sums plus a common divisor.
#[derive(Clone, Debug)]
pub struct LocalMean {
    pub width: usize,
    pub height: usize,
    sums: Vec<u64>,
    scale: f64,
}

impl LocalMean {
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.at(y * self.width + x)
    }

    #[inline]
    pub(crate) fn at(&self, idx: usize) -> f64 {
        self.sums[idx] as f64 / self.scale
    }
}

/// Local mean of every pixel over a `size × size` window (size normalized to odd).
///
/// `sigma` only applies to [`Weighting::Gaussian`]; `None` derives it from the size.
pub fn local_mean(
    src: &GrayImageView<'_>,
    size: usize,
    weighting: Weighting,
    sigma: Option<f32>,
) -> Result<LocalMean, ThresholdError> {
    src.validate()?;
    let size = normalize_block_size(size)?;
    Ok(match weighting {
        Weighting::Uniform => LocalMean {
            width: src.width,
            height: src.height,
            sums: box_window_sums(src, size),
            scale: (size * size) as f64,
        },
        Weighting::Gaussian => {
            let sigma = resolve_sigma(size, sigma)?;
            let taps = gaussian_kernel_fixed(size, sigma);
            LocalMean {
                width: src.width,
                height: src.height,
                sums: gaussian_window_sums(src, &taps),
                scale: (GAUSS_ONE * GAUSS_ONE) as f64,
            }
        }
    })
}

/// Gaussian blur with edge replication, rounded back to `u8`.
///
/// `size` is normalized to odd and must be at least 3.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(src), fields(width = src.width, height = src.height))
)]
pub fn gaussian_blur(
    src: &GrayImageView<'_>,
    size: usize,
    sigma: Option<f32>,
) -> Result<GrayImage, ThresholdError> {
    src.validate()?;
    let normalized = normalize_blur_size(size)?;
    let sigma = resolve_sigma(normalized, sigma)?;
    debug!("gaussian blur size={normalized} sigma={sigma:.3}");

    let taps = gaussian_kernel_fixed(normalized, sigma);
    let shift = 2 * GAUSS_SHIFT;
    let half = 1u64 << (shift - 1);
    let data = gaussian_window_sums(src, &taps)
        .into_iter()
        .map(|s| ((s + half) >> shift).min(255) as u8)
        .collect();
    Ok(GrayImage {
        width: src.width,
        height: src.height,
        data,
    })
}

/// Odd blur kernel size for `size`, within `3..=MAX_BLOCK_SIZE`.
pub(crate) fn normalize_blur_size(size: usize) -> Result<usize, ParamError> {
    if size > MAX_BLOCK_SIZE {
        return Err(ParamError::BlockSizeTooLarge {
            requested: size,
            max: MAX_BLOCK_SIZE,
        });
    }
    let normalized = if size % 2 == 0 { size + 1 } else { size };
    if normalized < 3 {
        return Err(ParamError::BlurSizeTooSmall {
            requested: size,
            normalized,
        });
    }
    Ok(normalized)
}

pub(crate) fn resolve_sigma(size: usize, sigma: Option<f32>) -> Result<f32, ParamError> {
    match sigma {
        Some(s) if !(s.is_finite() && s > 0.0) => Err(ParamError::InvalidSigma(s)),
        Some(s) => Ok(s),
        None => Ok(sigma_for_block_size(size)),
    }
}

/// Exact `size × size` window sums via running sums, O(w*h) for any size.
fn box_window_sums(src: &GrayImageView<'_>, size: usize) -> Vec<u64> {
    let (w, h) = (src.width, src.height);
    let pad = (size / 2) as isize;

    let mut horiz = vec![0u64; w * h];
    for y in 0..h {
        let row = src.row(y);
        let out = &mut horiz[y * w..(y + 1) * w];
        let mut s: u64 = (-pad..=pad)
            .map(|k| row[replicate_index(k, w)] as u64)
            .sum();
        out[0] = s;
        for x in 1..w {
            let xi = x as isize;
            s += row[replicate_index(xi + pad, w)] as u64;
            s -= row[replicate_index(xi - 1 - pad, w)] as u64;
            out[x] = s;
        }
    }

    let mut sums = vec![0u64; w * h];
    let mut col = vec![0u64; w];
    for k in -pad..=pad {
        let r = replicate_index(k, h);
        for (c, &v) in col.iter_mut().zip(&horiz[r * w..(r + 1) * w]) {
            *c += v;
        }
    }
    sums[..w].copy_from_slice(&col);
    for y in 1..h {
        let yi = y as isize;
        let add = replicate_index(yi + pad, h);
        let sub = replicate_index(yi - 1 - pad, h);
        for x in 0..w {
            col[x] += horiz[add * w + x];
            col[x] -= horiz[sub * w + x];
        }
        sums[y * w..(y + 1) * w].copy_from_slice(&col);
    }
    sums
}

/// Separable fixed-point Gaussian sums, scaled by `1 << (2 * GAUSS_SHIFT)`.
fn gaussian_window_sums(src: &GrayImageView<'_>, taps: &[u64]) -> Vec<u64> {
    let (w, h) = (src.width, src.height);
    let pad = (taps.len() / 2) as isize;

    let mut horiz = vec![0u64; w * h];
    for y in 0..h {
        let row = src.row(y);
        for x in 0..w {
            let xi = x as isize;
            horiz[y * w + x] = taps
                .iter()
                .enumerate()
                .map(|(k, &t)| t * row[replicate_index(xi + k as isize - pad, w)] as u64)
                .sum();
        }
    }

    let mut sums = vec![0u64; w * h];
    for y in 0..h {
        let out = &mut sums[y * w..(y + 1) * w];
        let yi = y as isize;
        for (k, &t) in taps.iter().enumerate() {
            if t == 0 {
                continue;
            }
            let r = replicate_index(yi + k as isize - pad, h);
            for (o, &v) in out.iter_mut().zip(&horiz[r * w..(r + 1) * w]) {
                *o += t * v;
            }
        }
    }
    sums
}
