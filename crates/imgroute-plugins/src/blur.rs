use image::DynamicImage;
use imgroute_processing::TransformError;

use crate::PluginInfo;

pub(crate) const INFO: PluginInfo = PluginInfo {
    name: "blur",
    description: "Gaussian blur; optional sigma (default 2.0)",
};

const DEFAULT_SIGMA: f32 = 2.0;
const MAX_SIGMA: f32 = 100.0;

/// Gaussian blur. Options: `[sigma?]`.
pub fn blur(image: DynamicImage, options: &[String]) -> Result<DynamicImage, TransformError> {
    let sigma = match options.first() {
        None => DEFAULT_SIGMA,
        Some(raw) => raw
            .trim()
            .parse::<f32>()
            .ok()
            .filter(|sigma| sigma.is_finite() && *sigma > 0.0 && *sigma <= MAX_SIGMA)
            .ok_or_else(|| TransformError::InvalidOptions {
                transform: INFO.name.to_string(),
                reason: format!("sigma must be a number in (0, {MAX_SIGMA}], got {raw:?}"),
            })?,
    };
    Ok(image.blur(sigma))
}
