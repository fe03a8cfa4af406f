//! Caller-supplied pixel grids with one (gray) or three (color) channels.

use crate::error::ShapeError;

/// Interleaved, row-major pixel grid as handed over by the host.
///
/// Invariant: `width >= 1`, `height >= 1`, `channels` is 1 or 3 and
/// `data.len() == width * height * channels`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelGrid {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<u8>,
}

impl PixelGrid {
    /// Wrap an interleaved buffer.
    pub fn from_raw(
        width: usize,
        height: usize,
        channels: usize,
        data: Vec<u8>,
    ) -> Result<Self, ShapeError> {
        if channels != 1 && channels != 3 {
            return Err(ShapeError::UnsupportedChannels(channels));
        }
        if width == 0 || height == 0 {
            return Err(ShapeError::Empty { width, height });
        }
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(channels))
            .ok_or(ShapeError::BufferLength {
                expected: usize::MAX,
                got: data.len(),
            })?;
        if data.len() != expected {
            return Err(ShapeError::BufferLength {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Build a single-channel grid from rows of intensities.
    pub fn from_gray_rows(rows: Vec<Vec<u8>>) -> Result<Self, ShapeError> {
        let width = check_rows(&rows)?;
        let height = rows.len();
        let data = rows.into_iter().flatten().collect();
        Self::from_raw(width, height, 1, data)
    }

    /// Build a three-channel grid from rows of `[r, g, b]` tuples.
    pub fn from_rgb_rows(rows: Vec<Vec<[u8; 3]>>) -> Result<Self, ShapeError> {
        let width = check_rows(&rows)?;
        let height = rows.len();
        let data = rows.into_iter().flatten().flatten().collect();
        Self::from_raw(width, height, 3, data)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }
}

/// Width shared by all rows, or the first shape violation.
fn check_rows<T>(rows: &[Vec<T>]) -> Result<usize, ShapeError> {
    let Some(first) = rows.first() else {
        return Err(ShapeError::Empty {
            width: 0,
            height: 0,
        });
    };
    let width = first.len();
    if width == 0 {
        return Err(ShapeError::Empty {
            width,
            height: rows.len(),
        });
    }
    for (row, r) in rows.iter().enumerate().skip(1) {
        if r.len() != width {
            return Err(ShapeError::RaggedRow {
                row,
                expected: width,
                got: r.len(),
            });
        }
    }
    Ok(width)
}
