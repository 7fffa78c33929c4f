pub mod cache;
pub mod resolver;

pub use cache::CachedStorage;
pub use resolver::{ImageResolver, RenderedImage};
