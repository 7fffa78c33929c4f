//! Image fixtures.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::path::Path;

pub fn gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 4 % 256) as u8, (y * 8 % 256) as u8, 120])
    }))
}

/// Write `<dir>/<key>.jpg`, creating parent folders.
pub fn write_jpeg(dir: &Path, key: &str, width: u32, height: u32) {
    let path = dir.join(format!("{}.jpg", key));
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create fixture folder");
    }
    gradient(width, height)
        .save_with_format(&path, ImageFormat::Jpeg)
        .expect("Failed to write fixture");
}

pub fn decode(bytes: &[u8]) -> DynamicImage {
    image::load_from_memory(bytes).expect("Response is not an image")
}
