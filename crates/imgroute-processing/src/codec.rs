//! Decoding source bytes and encoding rendered images.

use std::io::Cursor;

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use imgroute_core::{AppError, Format, SaveOptions};
use serde_json::Value;
use thiserror::Error;

const DEFAULT_JPEG_QUALITY: u8 = 75;

/// ICO entries cannot be larger than this on either side.
const ICO_MAX_SIZE: u32 = 256;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode {format} image: {reason}")]
    Encode { format: Format, reason: String },

    #[error("Invalid save option {option}: {reason}")]
    InvalidOption { option: String, reason: String },
}

impl From<CodecError> for AppError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Decode(reason) => AppError::DecodeFailure(reason),
            other => AppError::EncodeFailure(other.to_string()),
        }
    }
}

/// An encoded image ready to be served.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub bytes: Bytes,
    pub format: Format,
}

impl EncodedImage {
    pub fn content_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// Decode `data`, guessing the container format from its magic bytes.
pub fn decode(data: &[u8]) -> Result<DynamicImage, CodecError> {
    image::ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| CodecError::Decode(e.to_string()))?
        .decode()
        .map_err(|e| CodecError::Decode(e.to_string()))
}

/// Encode `image` as `format` with the route's save options for that format.
pub fn encode(
    image: &DynamicImage,
    format: Format,
    options: &SaveOptions,
) -> Result<EncodedImage, CodecError> {
    let estimated_size = (image.width() as usize) * (image.height() as usize) * 3;
    let mut buffer = Vec::with_capacity(estimated_size);

    let encode_error = |e: image::ImageError| CodecError::Encode {
        format,
        reason: e.to_string(),
    };

    match format {
        Format::Jpeg => {
            let quality = u8_option(options, "quality", 1, 100)?.unwrap_or(DEFAULT_JPEG_QUALITY);
            warn_unused(format, options, &["quality"]);
            let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
            DynamicImage::ImageRgb8(image.to_rgb8())
                .write_with_encoder(encoder)
                .map_err(encode_error)?;
        }
        Format::Png => {
            let compression = png_compression(options)?;
            warn_unused(format, options, &["compress_level", "compression"]);
            let encoder =
                PngEncoder::new_with_quality(&mut buffer, compression, PngFilterType::Adaptive);
            image.write_with_encoder(encoder).map_err(encode_error)?;
        }
        Format::Ico => {
            warn_unused(format, options, &[]);
            let rgba = DynamicImage::ImageRgba8(image.to_rgba8());
            let rgba = if rgba.width() > ICO_MAX_SIZE || rgba.height() > ICO_MAX_SIZE {
                rgba.resize(ICO_MAX_SIZE, ICO_MAX_SIZE, FilterType::Lanczos3)
            } else {
                rgba
            };
            rgba.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Ico)
                .map_err(encode_error)?;
        }
        _ => {
            warn_unused(format, options, &[]);
            // The remaining encoders do not all accept every colour type
            let rgba = DynamicImage::ImageRgba8(image.to_rgba8());
            rgba.write_to(&mut Cursor::new(&mut buffer), image_format(format))
                .map_err(encode_error)?;
        }
    }

    Ok(EncodedImage {
        bytes: Bytes::from(buffer),
        format,
    })
}

pub fn image_format(format: Format) -> ImageFormat {
    match format {
        Format::Jpeg => ImageFormat::Jpeg,
        Format::Png => ImageFormat::Png,
        Format::Gif => ImageFormat::Gif,
        Format::WebP => ImageFormat::WebP,
        Format::Bmp => ImageFormat::Bmp,
        Format::Tiff => ImageFormat::Tiff,
        Format::Ico => ImageFormat::Ico,
    }
}

fn png_compression(options: &SaveOptions) -> Result<CompressionType, CodecError> {
    if let Some(level) = u8_option(options, "compress_level", 0, 9)? {
        return Ok(match level {
            0..=3 => CompressionType::Fast,
            4..=6 => CompressionType::Default,
            _ => CompressionType::Best,
        });
    }

    match options.get("compression") {
        None | Some(Value::Null) => Ok(CompressionType::Default),
        Some(Value::String(name)) => match name.to_lowercase().as_str() {
            "fast" => Ok(CompressionType::Fast),
            "default" => Ok(CompressionType::Default),
            "best" => Ok(CompressionType::Best),
            other => Err(CodecError::InvalidOption {
                option: "compression".to_string(),
                reason: format!("expected fast, default or best, got {other:?}"),
            }),
        },
        Some(other) => Err(CodecError::InvalidOption {
            option: "compression".to_string(),
            reason: format!("expected a string, got {other}"),
        }),
    }
}

/// Integer option in `min..=max`, written as a number or a numeric string.
fn u8_option(options: &SaveOptions, name: &str, min: u8, max: u8) -> Result<Option<u8>, CodecError> {
    let invalid = |reason: String| CodecError::InvalidOption {
        option: name.to_string(),
        reason,
    };

    let value = match options.get(name) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        Some(other) => return Err(invalid(format!("expected an integer, got {other}"))),
    };

    match value {
        Some(v) if (u64::from(min)..=u64::from(max)).contains(&v) => Ok(Some(v as u8)),
        _ => Err(invalid(format!("expected an integer between {min} and {max}"))),
    }
}

fn warn_unused(format: Format, options: &SaveOptions, known: &[&str]) {
    for key in options.keys().filter(|key| !known.contains(&key.as_str())) {
        tracing::debug!(format = %format, option = %key, "Ignoring unsupported save option");
    }
}
