//! Document image binarization by local adaptive thresholding.
//!
//! This crate provides:
//! - re-exports of the pure thresholding core (`doc-binarize-core`) as [`core`],
//! - JSON-loadable [`BinarizeConfig`] with the downscale safeguard,
//! - (feature `image`) helpers that decode files, bridge `image::DynamicImage`
//!   to core grids and write PNG results,
//! - (feature `cli`) the `doc-binarize` command-line tool.
//!
//! ## Quickstart
//!
//! ```no_run
//! use doc_binarize::{io, BinarizeConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = io::load_image("scan.jpg")?;
//! let binary = io::binarize_image(&img, &BinarizeConfig::default())?;
//! io::save_png(&binary, "scan_bin.png")?;
//! println!("foreground: {:.1}%", 100.0 * binary.foreground_ratio());
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `doc_binarize::core`: grids, grayscale, padding, filters, thresholder, pipeline.
//! - `doc_binarize::io` (feature `image`): decode/encode and end-to-end helpers.

pub use doc_binarize_core as core;

pub use doc_binarize_core::{
    adaptive_threshold, binarize, BinarizeParams, BinaryImage, GrayscaleMethod, PixelGrid,
    ThresholdError, ThresholdParams, Weighting,
};

mod config;
mod error;

pub use config::{BinarizeConfig, DEFAULT_MAX_SIDE};
pub use error::BinarizeError;

#[cfg(feature = "image")]
pub mod io;
