//! Bridges between the `image` crate and the core grids.

use std::path::Path;

use ::image::imageops::FilterType;
use ::image::{DynamicImage, ImageFormat, ImageReader, Luma};
use log::{debug, info};

use crate::core::{binarize, BinaryImage, GrayImageView, PixelGrid, ShapeError};
use crate::{BinarizeConfig, BinarizeError};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Convert an `image::GrayImage` into the lightweight core view type.
pub fn gray_view(img: &::image::GrayImage) -> GrayImageView<'_> {
    GrayImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Build a core grid: one channel for luma inputs, three otherwise (alpha dropped).
pub fn pixel_grid_from_dynamic(img: &DynamicImage) -> Result<PixelGrid, BinarizeError> {
    let (width, height) = (img.width() as usize, img.height() as usize);
    let grid = if img.color().has_color() {
        PixelGrid::from_raw(width, height, 3, img.to_rgb8().into_raw())
    } else {
        PixelGrid::from_raw(width, height, 1, img.to_luma8().into_raw())
    };
    grid.map_err(|e| BinarizeError::Threshold(e.into()))
}

/// Copy a binary result into an `image::GrayImage` for display or encoding.
pub fn to_image_gray(binary: &BinaryImage) -> Result<::image::GrayImage, BinarizeError> {
    let (width, height) = (binary.width(), binary.height());
    ::image::GrayImage::from_raw(width as u32, height as u32, binary.data().to_vec()).ok_or_else(
        || {
            BinarizeError::Threshold(
                ShapeError::BufferLength {
                    expected: width * height,
                    got: binary.data().len(),
                }
                .into(),
            )
        },
    )
}

/// Shrink `img` so its longer side is at most `max_side`, keeping the aspect ratio.
///
/// Images already within the limit are returned untouched.
pub fn downscale_to_fit(img: DynamicImage, max_side: u32) -> Result<DynamicImage, BinarizeError> {
    if max_side == 0 {
        return Err(BinarizeError::InvalidMaxSide);
    }
    let (w, h) = (img.width(), img.height());
    if w.max(h) <= max_side {
        return Ok(img);
    }
    let scaled = img.resize(max_side, max_side, FilterType::Triangle);
    info!(
        "downscaled {}x{} -> {}x{} (max_side={max_side})",
        w,
        h,
        scaled.width(),
        scaled.height()
    );
    Ok(scaled)
}

/// Decode an image file (format guessed from content).
pub fn load_image(path: impl AsRef<Path>) -> Result<DynamicImage, BinarizeError> {
    let path = path.as_ref();
    let img = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(::image::ImageError::IoError)
        .and_then(|reader| reader.decode())
        .map_err(|source| BinarizeError::Load {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(
        "loaded {} ({}x{}, {:?})",
        path.display(),
        img.width(),
        img.height(),
        img.color()
    );
    Ok(img)
}

/// Encode a binary result as an 8-bit grayscale PNG.
pub fn save_png(binary: &BinaryImage, path: impl AsRef<Path>) -> Result<(), BinarizeError> {
    let path = path.as_ref();
    to_image_gray(binary)?
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| BinarizeError::Save {
            path: path.to_path_buf(),
            source,
        })
}

/// Run the downscale safeguard and the full pipeline on a decoded image.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(img, cfg), fields(width = img.width(), height = img.height()))
)]
pub fn binarize_image(
    img: &DynamicImage,
    cfg: &BinarizeConfig,
) -> Result<BinaryImage, BinarizeError> {
    cfg.validate()?;
    let grid = match cfg.max_side {
        Some(max_side) if img.width().max(img.height()) > max_side => {
            pixel_grid_from_dynamic(&downscale_to_fit(img.clone(), max_side)?)?
        }
        _ => pixel_grid_from_dynamic(img)?,
    };
    Ok(binarize(&grid, &cfg.params)?)
}

/// Load, binarize and save in one call.
pub fn binarize_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    cfg: &BinarizeConfig,
) -> Result<BinaryImage, BinarizeError> {
    let img = load_image(input)?;
    let binary = binarize_image(&img, cfg)?;
    save_png(&binary, output)?;
    Ok(binary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ThresholdParams, Weighting};
    use ::image::{Rgb, RgbImage};

    fn striped_rgb(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(w, h, |x, _| {
            if x % 4 == 0 {
                Rgb([20, 30, 40])
            } else {
                Rgb([240, 230, 220])
            }
        }))
    }

    #[test]
    fn luma_input_stays_single_channel() {
        let img = DynamicImage::ImageLuma8(::image::GrayImage::from_pixel(3, 2, Luma([9])));
        let grid = pixel_grid_from_dynamic(&img).expect("grid");
        assert_eq!(grid.channels(), 1);
        assert_eq!((grid.width(), grid.height()), (3, 2));
    }

    #[test]
    fn color_input_drops_alpha() {
        let img = DynamicImage::ImageRgba8(::image::RgbaImage::from_pixel(
            2,
            2,
            ::image::Rgba([1, 2, 3, 4]),
        ));
        let grid = pixel_grid_from_dynamic(&img).expect("grid");
        assert_eq!(grid.channels(), 3);
        assert_eq!(&grid.data()[..3], &[1, 2, 3]);
    }

    #[test]
    fn downscale_keeps_aspect_and_small_images() {
        let small = striped_rgb(40, 20);
        let same = downscale_to_fit(small, 64).expect("fit");
        assert_eq!((same.width(), same.height()), (40, 20));

        let big = striped_rgb(400, 200);
        let scaled = downscale_to_fit(big, 100).expect("fit");
        assert_eq!((scaled.width(), scaled.height()), (100, 50));

        assert!(matches!(
            downscale_to_fit(striped_rgb(2, 2), 0),
            Err(BinarizeError::InvalidMaxSide)
        ));
    }

    #[test]
    fn binarize_image_applies_safeguard() {
        let cfg = BinarizeConfig {
            max_side: Some(50),
            ..BinarizeConfig::default()
        };
        let out = binarize_image(&striped_rgb(200, 100), &cfg).expect("binarize");
        assert_eq!((out.width(), out.height()), (50, 25));

        let cfg = BinarizeConfig {
            max_side: None,
            ..BinarizeConfig::default()
        };
        let out = binarize_image(&striped_rgb(200, 100), &cfg).expect("binarize");
        assert_eq!((out.width(), out.height()), (200, 100));
    }

    #[test]
    fn png_round_trip_keeps_binary_values() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("page.png");
        let output = dir.path().join("page_bin.png");
        striped_rgb(32, 16).save(&input).expect("save input");

        let mut cfg = BinarizeConfig::default();
        cfg.params.pre_blur = None;
        cfg.params.threshold = ThresholdParams::new(7, 5.0, Weighting::Uniform);
        let binary = binarize_file(&input, &output, &cfg).expect("binarize file");

        let decoded = load_image(&output).expect("decode").to_luma8();
        assert_eq!(decoded.as_raw(), binary.data());
        // Dark stripes fall in the background, paper in the foreground.
        assert_eq!(decoded.get_pixel(0, 5)[0], 0);
        assert_eq!(decoded.get_pixel(2, 5)[0], 255);
    }

    #[test]
    fn binary_result_converts_to_image_buffer() {
        let mut cfg = BinarizeConfig::default();
        cfg.params.pre_blur = None;
        let binary = binarize_image(&striped_rgb(12, 6), &cfg).expect("binarize");
        let gray = to_image_gray(&binary).expect("image buffer");
        assert_eq!(gray.dimensions(), (12, 6));
        assert_eq!(gray.as_raw(), binary.data());
    }

    #[test]
    fn load_errors_name_the_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("missing-scan.png");
        let err = load_image(&missing).unwrap_err();
        assert!(matches!(err, BinarizeError::Load { .. }));
        assert!(err.to_string().contains("missing-scan.png"), "{err}");

        let garbage = dir.path().join("garbage.png");
        std::fs::write(&garbage, b"not an image").expect("write");
        let err = load_image(&garbage).unwrap_err();
        assert!(err.to_string().contains("garbage.png"), "{err}");
    }

    #[test]
    fn gray_view_shares_buffer() {
        let img = ::image::GrayImage::from_pixel(4, 3, Luma([77]));
        let view = gray_view(&img);
        assert_eq!((view.width, view.height), (4, 3));
        assert_eq!(view.data.len(), 12);
    }
}
