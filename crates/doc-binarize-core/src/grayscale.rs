//! Color to intensity conversion ahead of thresholding.

use serde::{Deserialize, Serialize};

use crate::grid::PixelGrid;
use crate::image::GrayImage;

/// How three color channels collapse into one intensity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrayscaleMethod {
    /// Unweighted `(r + g + b) / 3`, truncated.
    #[default]
    Mean,
    /// ITU-R 601-2 luma, `0.299 r + 0.587 g + 0.114 b`, rounded.
    Luminance,
}

impl GrayscaleMethod {
    #[inline]
    pub fn convert(self, r: u8, g: u8, b: u8) -> u8 {
        match self {
            GrayscaleMethod::Mean => ((r as u16 + g as u16 + b as u16) / 3) as u8,
            // 16-bit fixed point; weights sum to 65536.
            GrayscaleMethod::Luminance => {
                ((19595 * r as u32 + 38470 * g as u32 + 7471 * b as u32 + 0x8000) >> 16) as u8
            }
        }
    }
}

/// Collapse a grid to one channel. Single-channel grids pass through unchanged.
///
/// `PixelGrid` enforces its shape on construction, so this cannot fail.
pub fn to_grayscale(grid: &PixelGrid, method: GrayscaleMethod) -> GrayImage {
    let data = match grid.channels() {
        3 => grid
            .data()
            .chunks_exact(3)
            .map(|px| method.convert(px[0], px[1], px[2]))
            .collect(),
        _ => grid.data().to_vec(),
    };
    GrayImage {
        width: grid.width(),
        height: grid.height(),
        data,
    }
}
