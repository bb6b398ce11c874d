//! Editable tone-response curve: control points and spline interpolation.

pub mod point;
pub mod spline;
pub mod tone_curve;

pub use point::ControlPoint;
pub use tone_curve::{CurveError, CurveEvent, ToneCurve};
