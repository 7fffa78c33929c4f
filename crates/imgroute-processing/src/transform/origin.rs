use image::DynamicImage;

use super::TransformError;

/// Identity. Options are ignored.
pub fn origin(image: DynamicImage, _options: &[String]) -> Result<DynamicImage, TransformError> {
    Ok(image)
}
