//! CIE luminance and lightness conversions.
//!
//! Pure functions used by the raw-image pipeline to move between linear
//! radiance, relative luminance (Y), and CIE 1931 L* perceptual lightness.
//! All constants follow the published CIELAB definition with the exact
//! rational thresholds (216/24389 rather than the rounded 0.008856).

/// CIELAB δ = 6/29.
const DELTA: f64 = 6.0 / 29.0;

/// δ³ = 216/24389 (the exact value behind the textbook 0.008856).
const DELTA_POW3: f64 = 216.0 / 24389.0;

/// Reference white luminance for the L* scale.
const Y_N: f64 = 100.0;

/// Convert an sRGB gamma-encoded channel value to linear light.
///
/// Per IEC 61966-2-1:
/// ```text
/// V <= 0.04045 → V / 12.92
/// V >  0.04045 → ((V + 0.055) / 1.055) ^ 2.4
/// ```
///
/// Input is expected in `[0, 1]`; no clamping is applied.
pub fn srgb_channel_to_linear(channel: f64) -> f64 {
    if channel <= 0.04045 {
        channel / 12.92
    } else {
        ((channel + 0.055) / 1.055).powf(2.4)
    }
}

/// Convert a linear-light channel value to its sRGB gamma encoding.
///
/// Inverse of [`srgb_channel_to_linear`]:
/// ```text
/// L <= 0.0031308 → L × 12.92
/// L >  0.0031308 → 1.055 × L^(1/2.4) − 0.055
/// ```
pub fn linear_to_srgb_channel(linear: f64) -> f64 {
    if linear <= 0.0031308 {
        linear * 12.92
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

/// Relative luminance Y of a linear RGB triple, ITU-R BT.709 weights.
///
/// ```text
/// Y = 0.2126 R + 0.7152 G + 0.0722 B
/// ```
///
/// Callers pass already-normalized channel ratios; the result is on the
/// same scale as the inputs and is not clamped.
pub fn relative_luminance(linear_r: f64, linear_g: f64, linear_b: f64) -> f64 {
    0.2126 * linear_r + 0.7152 * linear_g + 0.0722 * linear_b
}

/// Convert relative luminance Y (0–100 scale) to CIE L* lightness.
///
/// L* runs from 0 (black) to 100 (white), with 50 the perceptual middle
/// grey (Y ≈ 18.4, an 18% grey card).
///
/// ```text
/// t = Y / 100
/// t >  δ³ → f = t^(1/3)
/// t <= δ³ → f = t / (3δ²) + 4/29
/// L* = 116 f − 16
/// ```
pub fn luminance_to_lstar(y: f64) -> f64 {
    let t = y / Y_N;

    let f = if t > DELTA_POW3 {
        t.cbrt()
    } else {
        t / (3.0 * DELTA * DELTA) + 4.0 / 29.0
    };

    116.0 * f - 16.0
}

/// Convert CIE L* lightness back to relative luminance Y (0–100 scale).
///
/// Exact inverse of [`luminance_to_lstar`]:
/// ```text
/// t = (L* + 16) / 116
/// t >  δ → f = t³
/// t <= δ → f = 3δ² (t − 4/29)
/// Y = 100 f
/// ```
pub fn lstar_to_luminance(lstar: f64) -> f64 {
    let t = (lstar + 16.0) / 116.0;

    let f = if t > DELTA {
        t * t * t
    } else {
        3.0 * DELTA * DELTA * (t - 4.0 / 29.0)
    };

    Y_N * f
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-3;

    fn assert_lstar_roundtrip(y: f64) {
        let lstar = luminance_to_lstar(y);
        let back = lstar_to_luminance(lstar);
        assert!(
            (y - back).abs() < EPSILON,
            "roundtrip failed for Y={y}: L*={lstar}, back={back}"
        );
    }

    #[test]
    fn test_lstar_roundtrip_black() {
        assert_lstar_roundtrip(0.0);
    }

    #[test]
    fn test_lstar_roundtrip_white() {
        assert_lstar_roundtrip(100.0);
    }

    #[test]
    fn test_lstar_roundtrip_across_range() {
        let mut y = 0.0;
        while y <= 100.0 {
            assert_lstar_roundtrip(y);
            y += 0.5;
        }
    }

    #[test]
    fn test_lstar_endpoints() {
        assert!(luminance_to_lstar(0.0).abs() < EPSILON);
        assert!((luminance_to_lstar(100.0) - 100.0).abs() < EPSILON);
    }

    #[test]
    fn test_middle_grey_maps_to_lstar_50() {
        // An 18% grey card (Y ≈ 18.4) sits at the perceptual midpoint.
        let lstar = luminance_to_lstar(18.4);
        assert!((lstar - 50.0).abs() < 0.05, "L* for Y=18.4 was {lstar}");
    }

    #[test]
    fn test_lstar_linear_segment_below_threshold() {
        // Below δ³ the forward transform is linear in t.
        let y = 100.0 * DELTA_POW3 * 0.5;
        assert_lstar_roundtrip(y);
        let lstar = luminance_to_lstar(y);
        assert!(lstar > 0.0 && lstar < 10.0);
    }

    #[test]
    fn test_srgb_linearize_roundtrip_preserves_values() {
        for v in [0.0, 0.001, 0.01, 0.04045, 0.1, 0.5, 0.9, 1.0] {
            let linear = srgb_channel_to_linear(v);
            let back = linear_to_srgb_channel(linear);
            assert!(
                (v - back).abs() < 1e-9,
                "roundtrip failed for {v}: linear={linear}, back={back}"
            );
        }
    }

    #[test]
    fn test_srgb_linearize_known_values() {
        assert!(srgb_channel_to_linear(0.0).abs() < 1e-12);
        assert!((srgb_channel_to_linear(1.0) - 1.0).abs() < 1e-12);
        // Mid-grey sRGB 0.5 encodes ~0.2140 linear
        assert!((srgb_channel_to_linear(0.5) - 0.214041).abs() < 1e-4);
    }

    #[test]
    fn test_relative_luminance_weights_sum_to_one() {
        assert!((relative_luminance(1.0, 1.0, 1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_relative_luminance_green_dominates() {
        let r = relative_luminance(1.0, 0.0, 0.0);
        let g = relative_luminance(0.0, 1.0, 0.0);
        let b = relative_luminance(0.0, 0.0, 1.0);
        assert!((r - 0.2126).abs() < 1e-12);
        assert!((g - 0.7152).abs() < 1e-12);
        assert!((b - 0.0722).abs() < 1e-12);
    }
}
