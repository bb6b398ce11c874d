//! Relume Core — domain layer for HDR raw tone editing.
//!
//! This crate contains the numeric pipeline: CIE luminance/lightness
//! conversions, the spline-interpolated tone curve, intensity histograms,
//! and the raw float image loader with hue-preserving tone-mapped
//! rendering. No GUI or framework dependencies.

pub mod color;
pub mod curve;
pub mod raw;
pub mod scopes;

// Re-exports for convenience.
pub use curve::{ControlPoint, CurveError, CurveEvent, ToneCurve};
pub use raw::{LoadError, RawFloatImage};
pub use scopes::{Histogram, IntensityRange};
