//! Raw float-image loading and tone-mapped rendering.

pub mod format;
pub mod image;

pub use format::LoadError;
pub use image::RawFloatImage;
