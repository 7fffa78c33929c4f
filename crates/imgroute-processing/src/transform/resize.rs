//! Exact resize with optional aspect-preserving crop.

use std::cmp::Ordering;

use image::imageops::FilterType;
use image::DynamicImage;

use super::{check_pixels, dimension, parse_filter, TransformError};

const NAME: &str = "r";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Crop {
    Top,
    Bottom,
    Center,
}

impl Crop {
    fn parse(raw: &str) -> Result<Self, TransformError> {
        match raw.trim() {
            "t" => Ok(Crop::Top),
            "b" => Ok(Crop::Bottom),
            "c" => Ok(Crop::Center),
            other => Err(TransformError::invalid(
                NAME,
                format!("unknown crop method {other:?}"),
            )),
        }
    }

    /// Offset of a `kept`-long window inside `total`.
    fn offset(self, total: u32, kept: u32) -> u32 {
        match self {
            Crop::Top => 0,
            Crop::Bottom => total.saturating_sub(kept),
            Crop::Center => total.saturating_sub(kept) / 2,
        }
    }
}

/// Resize to exactly `width × height`.
///
/// Options: `[width, height, filter?, crop?]`. With a crop letter (`t`, `b`
/// or `c`) the image is first scaled to cover the target on its tighter side,
/// keeping its aspect ratio, then the overflowing side is cropped from the
/// top/left, bottom/right or centre.
///
/// The output and the scaled intermediate are both held to the pixel limit.
pub fn resize(image: DynamicImage, options: &[String]) -> Result<DynamicImage, TransformError> {
    let width = dimension(NAME, options, 0)?;
    let height = dimension(NAME, options, 1)?;
    let filter = parse_filter(NAME, options.get(2))?;
    let crop = options.get(3).map(|raw| Crop::parse(raw)).transpose()?;

    check_pixels(NAME, u64::from(width), u64::from(height))?;

    match crop {
        None => Ok(image.resize_exact(width, height, filter)),
        Some(crop) => resize_crop(&image, width, height, filter, crop),
    }
}

fn resize_crop(
    image: &DynamicImage,
    width: u32,
    height: u32,
    filter: FilterType,
    crop: Crop,
) -> Result<DynamicImage, TransformError> {
    let (ow, oh) = (u64::from(image.width()), u64::from(image.height()));
    let (w, h) = (u64::from(width), u64::from(height));
    if ow == 0 || oh == 0 {
        return Err(TransformError::invalid(NAME, "cannot crop an empty image"));
    }

    // width/height against ow/oh without floating point
    let resized = match (w * oh).cmp(&(ow * h)) {
        Ordering::Greater => {
            let scaled_height = (w * oh / ow).max(h);
            check_pixels(NAME, w, scaled_height)?;
            let scaled_height = intermediate_size(scaled_height)?;
            let scaled = image.resize_exact(width, scaled_height, filter);
            let y = crop.offset(scaled_height, height);
            scaled.crop_imm(0, y, width, height)
        }
        Ordering::Less => {
            let scaled_width = (h * ow / oh).max(w);
            check_pixels(NAME, scaled_width, h)?;
            let scaled_width = intermediate_size(scaled_width)?;
            let scaled = image.resize_exact(scaled_width, height, filter);
            let x = crop.offset(scaled_width, width);
            scaled.crop_imm(x, 0, width, height)
        }
        Ordering::Equal => image.resize_exact(width, height, filter),
    };
    Ok(resized)
}

fn intermediate_size(value: u64) -> Result<u32, TransformError> {
    u32::try_from(value)
        .map_err(|_| TransformError::invalid(NAME, format!("intermediate size {value} is too large")))
}
