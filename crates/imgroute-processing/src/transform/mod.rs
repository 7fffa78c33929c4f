//! Named image transforms
//!
//! A transform is a function from an image and its string options to a new
//! image. The registry maps names to transforms; a chain of
//! [`TransformStep`]s is run left to right, each step feeding the next.

mod filter;
mod origin;
mod resize;
mod thumbnail;

pub use filter::parse_filter;
pub use origin::origin;
pub use resize::resize;
pub use thumbnail::thumbnail;

use std::collections::HashMap;
use std::sync::Arc;

use image::DynamicImage;
use imgroute_core::{AppError, TransformStep};
use thiserror::Error;

/// Largest width or height a transform may produce.
pub const MAX_DIMENSION: u32 = 16_384;

/// Largest pixel count of any image a transform allocates, intermediates included.
pub const MAX_PIXELS: u64 = 64 * 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransformError {
    #[error("Unknown transform: {0}")]
    UnknownTransform(String),

    #[error("Invalid options for {transform}: {reason}")]
    InvalidOptions { transform: String, reason: String },
}

impl TransformError {
    pub(crate) fn invalid(transform: &str, reason: impl Into<String>) -> Self {
        TransformError::InvalidOptions {
            transform: transform.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<TransformError> for AppError {
    fn from(err: TransformError) -> Self {
        match err {
            TransformError::UnknownTransform(name) => AppError::UnknownTransform(name),
            err @ TransformError::InvalidOptions { .. } => AppError::InvalidOptions(err.to_string()),
        }
    }
}

/// An image operation addressable by name.
pub trait Transform: Send + Sync {
    fn apply(&self, image: DynamicImage, options: &[String]) -> Result<DynamicImage, TransformError>;
}

impl<F> Transform for F
where
    F: Fn(DynamicImage, &[String]) -> Result<DynamicImage, TransformError> + Send + Sync,
{
    fn apply(&self, image: DynamicImage, options: &[String]) -> Result<DynamicImage, TransformError> {
        self(image, options)
    }
}

/// Name to transform. The first registration of a name wins.
#[derive(Clone, Default)]
pub struct TransformRegistry {
    transforms: HashMap<String, Arc<dyn Transform>>,
}

impl TransformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `origin`, `t` (thumbnail) and `r` (resize).
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("origin", origin);
        registry.register("t", thumbnail);
        registry.register("r", resize);
        registry
    }

    /// Register `transform` under `name`. Returns false and keeps the
    /// existing entry if the name is taken.
    pub fn register<T>(&mut self, name: &str, transform: T) -> bool
    where
        T: Transform + 'static,
    {
        if self.transforms.contains_key(name) {
            tracing::debug!(transform = %name, "Transform already registered, keeping first");
            return false;
        }
        self.transforms.insert(name.to_string(), Arc::new(transform));
        true
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Transform>> {
        self.transforms.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.transforms.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.transforms.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Run `steps` over `image` in order. The first failing step aborts the chain.
    pub fn run(
        &self,
        image: DynamicImage,
        steps: &[TransformStep],
    ) -> Result<DynamicImage, TransformError> {
        steps.iter().try_fold(image, |image, step| {
            let transform = self
                .get(&step.kind)
                .ok_or_else(|| TransformError::UnknownTransform(step.kind.clone()))?;

            tracing::debug!(
                transform = %step.kind,
                options = ?step.options,
                width = image.width(),
                height = image.height(),
                "Applying transform"
            );
            transform.apply(image, &step.options)
        })
    }
}

/// Required positive integer option at `index`.
pub(crate) fn dimension(
    transform: &str,
    options: &[String],
    index: usize,
) -> Result<u32, TransformError> {
    let raw = options
        .get(index)
        .ok_or_else(|| TransformError::invalid(transform, "not enough arguments"))?;
    let value: u32 = raw
        .trim()
        .parse()
        .map_err(|_| TransformError::invalid(transform, format!("{raw:?} is not a size")))?;
    if value == 0 {
        return Err(TransformError::invalid(transform, "size must be greater than 0"));
    }
    if value > MAX_DIMENSION {
        return Err(TransformError::invalid(
            transform,
            format!("size {value} exceeds the maximum of {MAX_DIMENSION}"),
        ));
    }
    Ok(value)
}

/// Reject a `width × height` image above [`MAX_PIXELS`] before allocating it.
pub(crate) fn check_pixels(transform: &str, width: u64, height: u64) -> Result<(), TransformError> {
    if width.saturating_mul(height) > MAX_PIXELS {
        return Err(TransformError::invalid(
            transform,
            format!("{width}x{height} exceeds the pixel limit of {MAX_PIXELS}"),
        ));
    }
    Ok(())
}
