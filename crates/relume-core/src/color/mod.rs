//! Color science: sRGB linearization and CIE L* lightness.

pub mod cie;
