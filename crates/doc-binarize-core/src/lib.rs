//! Local adaptive thresholding for document images.
//!
//! This crate is the pure core: it consumes in-memory pixel grids and produces
//! binary grids. It does *not* decode or encode image files; see the
//! `doc-binarize` facade for that.
//!
//! ```
//! use doc_binarize_core::{adaptive_threshold, GrayImage, ThresholdParams, Weighting};
//!
//! let page = GrayImage::filled(5, 5, 100);
//! let params = ThresholdParams::new(3, 1.0, Weighting::Uniform);
//! let binary = adaptive_threshold(&page.view(), &params).unwrap();
//! assert_eq!(binary.foreground_count(), 25);
//! ```

mod error;
mod filter;
mod grayscale;
mod grid;
mod image;
mod logger;
mod padding;
mod pipeline;
mod threshold;

pub use error::{ParamError, ShapeError, ThresholdError};
pub use filter::{
    gaussian_blur, gaussian_kernel_1d, gaussian_kernel_fixed, local_mean, sigma_for_block_size,
    LocalMean, GAUSS_SHIFT,
};
pub use grayscale::{to_grayscale, GrayscaleMethod};
pub use grid::PixelGrid;
pub use image::{GrayImage, GrayImageView};
pub use padding::{pad_edge_replicate, replicate_index};
pub use pipeline::{binarize, BinarizeParams};
pub use threshold::{
    adaptive_threshold, normalize_block_size, BinaryImage, ThresholdParams, Weighting,
    BACKGROUND, FOREGROUND, MAX_BLOCK_SIZE,
};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
