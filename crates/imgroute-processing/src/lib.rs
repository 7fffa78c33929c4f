//! imgroute Processing Library
//!
//! Image decoding, the named transform registry and encoding. Pixel work is
//! delegated to the `image` crate; this crate only decides which operations
//! run, with which options, and in which order.

pub mod codec;
pub mod transform;

pub use codec::{decode, encode, CodecError, EncodedImage};
pub use transform::{Transform, TransformError, TransformRegistry};
