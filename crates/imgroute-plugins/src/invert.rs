use image::DynamicImage;
use imgroute_processing::TransformError;

use crate::PluginInfo;

pub(crate) const INFO: PluginInfo = PluginInfo {
    name: "invert",
    description: "Invert colour channels, keeping alpha",
};

/// Negative of the image. Options are ignored.
pub fn invert(mut image: DynamicImage, _options: &[String]) -> Result<DynamicImage, TransformError> {
    image.invert();
    Ok(image)
}
