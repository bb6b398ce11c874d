//! Scope computation for intensity visualization.

pub mod histogram;

pub use histogram::{Histogram, IntensityRange};
