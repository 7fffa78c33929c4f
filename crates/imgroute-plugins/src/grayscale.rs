use image::DynamicImage;
use imgroute_processing::TransformError;

use crate::PluginInfo;

pub(crate) const INFO: PluginInfo = PluginInfo {
    name: "grayscale",
    description: "Convert to grayscale, keeping alpha",
};

pub fn grayscale(image: DynamicImage, _options: &[String]) -> Result<DynamicImage, TransformError> {
    Ok(image.grayscale())
}
