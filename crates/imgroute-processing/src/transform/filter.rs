use image::imageops::FilterType;

use super::TransformError;

/// Resample filter from a transform option.
///
/// Accepts the numeric codes `0` nearest, `1` lanczos, `2` bilinear,
/// `3` bicubic, `4` box and `5` hamming, or the names `nearest`, `lanczos`,
/// `bilinear`, `bicubic` and `gaussian`. Box and hamming have no direct
/// counterpart and fall back to bilinear. `None` means nearest.
pub fn parse_filter(transform: &str, option: Option<&String>) -> Result<FilterType, TransformError> {
    let Some(raw) = option else {
        return Ok(FilterType::Nearest);
    };

    let filter = match raw.trim().to_lowercase().as_str() {
        "0" | "nearest" => FilterType::Nearest,
        "1" | "lanczos" => FilterType::Lanczos3,
        "2" | "bilinear" | "4" | "box" | "5" | "hamming" => FilterType::Triangle,
        "3" | "bicubic" => FilterType::CatmullRom,
        "gaussian" => FilterType::Gaussian,
        _ => {
            return Err(TransformError::invalid(
                transform,
                format!("unknown resample filter {raw:?}"),
            ))
        }
    };
    Ok(filter)
}
