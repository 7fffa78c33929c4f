use image::DynamicImage;

use super::{dimension, parse_filter, TransformError};

const NAME: &str = "t";

/// Shrink to fit within `width × height`, keeping the aspect ratio.
///
/// Options: `[width, height, filter?]`. Never upscales; an image that already
/// fits is returned unchanged.
pub fn thumbnail(image: DynamicImage, options: &[String]) -> Result<DynamicImage, TransformError> {
    let width = dimension(NAME, options, 0)?;
    let height = dimension(NAME, options, 1)?;
    let filter = parse_filter(NAME, options.get(2))?;

    if image.width() <= width && image.height() <= height {
        return Ok(image);
    }
    Ok(image.resize(width, height, filter))
}
