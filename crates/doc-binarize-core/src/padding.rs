//! Edge-replication boundary policy.
//!
//! Out-of-bounds samples take the value of the nearest in-bounds edge sample.
//! The filters apply the policy through [`replicate_index`] so that windows
//! larger than the image never allocate the full padded grid;
//! [`pad_edge_replicate`] materializes it for callers that want to inspect it.

use crate::image::{GrayImage, GrayImageView};

/// Map a possibly out-of-range coordinate onto `0..len` by clamping.
///
/// `len` must be non-zero.
#[inline]
pub fn replicate_index(i: isize, len: usize) -> usize {
    if i <= 0 {
        0
    } else if i as usize >= len {
        len - 1
    } else {
        i as usize
    }
}

/// Build the `(h + 2*pad) × (w + 2*pad)` edge-replicated copy of `src`.
pub fn pad_edge_replicate(src: &GrayImageView<'_>, pad: usize) -> GrayImage {
    let out_w = src.width + 2 * pad;
    let out_h = src.height + 2 * pad;
    let mut data = Vec::with_capacity(out_w * out_h);
    for py in 0..out_h {
        let row = src.row(replicate_index(py as isize - pad as isize, src.height));
        let first = row[0];
        let last = row[src.width - 1];
        data.extend(std::iter::repeat(first).take(pad));
        data.extend_from_slice(row);
        data.extend(std::iter::repeat(last).take(pad));
    }
    GrayImage {
        width: out_w,
        height: out_h,
        data,
    }
}
