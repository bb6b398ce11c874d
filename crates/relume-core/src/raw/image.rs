//! The decoded HDR raster and its tone-mapped renderings.
//!
//! A [`RawFloatImage`] owns three dense linear-radiance channel buffers and
//! a per-pixel CIE L* lightness buffer precomputed at load time from the
//! unmodified image. Rendering remaps each pixel's overall intensity
//! through a [`ToneCurve`] while scaling all three channels by the same
//! factor, which preserves the pixel's chromaticity.
//!
//! All per-pixel passes are pure functions of the immutable buffers and the
//! curve snapshot; the image itself never changes after loading.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use image::{Rgba, RgbaImage};
use tracing::{debug, info, warn};

use crate::color::cie;
use crate::curve::ToneCurve;
use crate::raw::format::{self, LoadError};
use crate::scopes::{Histogram, IntensityRange};

/// An immutable HDR raster with precomputed perceptual lightness.
#[derive(Debug, Clone)]
pub struct RawFloatImage {
    width: u32,
    height: u32,
    r: Vec<f64>,
    g: Vec<f64>,
    b: Vec<f64>,
    /// Global maximum over all three channel buffers; radiance is divided
    /// by this to get the relative working range.
    channel_max: f64,
    /// Per-pixel CIE L* lightness of the unmodified image.
    lightness: Vec<f64>,
    intensity_min: f64,
    intensity_max: f64,
}

impl RawFloatImage {
    /// Load an image from a raw float stream (format in [`crate::raw::format`]).
    ///
    /// Fails on short reads or a corrupt header; on failure nothing is
    /// partially built, so a previously loaded image stays usable.
    pub fn load<R: Read>(mut reader: R) -> Result<Self, LoadError> {
        let header = format::read_header(&mut reader)?;
        debug!(
            major = header.major_version,
            minor = header.minor_version,
            "raw image stream version"
        );

        let count = header.pixel_count();
        let (r, g, b) = format::read_pixels(&mut reader, count)?;

        // An all-black (or negative) image would make the normalization
        // divisor zero; fall back to 1.0 so lightness stays well-defined.
        let observed_max = r
            .iter()
            .chain(&g)
            .chain(&b)
            .fold(f64::MIN, |acc, &v| acc.max(v));
        let channel_max = if observed_max > 0.0 { observed_max } else { 1.0 };

        let mut lightness = Vec::with_capacity(count);
        let mut intensity_min = f64::MAX;
        let mut intensity_max = f64::MIN;
        for i in 0..count {
            let y = cie::relative_luminance(
                r[i] / channel_max,
                g[i] / channel_max,
                b[i] / channel_max,
            );
            let lstar = cie::luminance_to_lstar(y);
            intensity_min = intensity_min.min(lstar);
            intensity_max = intensity_max.max(lstar);
            lightness.push(lstar);
        }

        info!(
            width = header.width,
            height = header.height,
            channel_max,
            intensity_min,
            intensity_max,
            "raw image loaded"
        );

        Ok(Self {
            width: header.width,
            height: header.height,
            r,
            g,
            b,
            channel_max,
            lightness,
            intensity_min,
            intensity_max,
        })
    }

    /// Load an image from a file on disk.
    pub fn load_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let file = File::open(path.as_ref())?;
        Self::load(BufReader::new(file))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.lightness.len()
    }

    /// Raw linear radiance of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [f64; 3] {
        let i = (y * self.width + x) as usize;
        [self.r[i], self.g[i], self.b[i]]
    }

    pub fn channel_max(&self) -> f64 {
        self.channel_max
    }

    /// Per-pixel L* lightness of the unmodified image, row-major.
    pub fn lightness(&self) -> &[f64] {
        &self.lightness
    }

    /// Observed minimum of the lightness buffer.
    pub fn intensity_min(&self) -> f64 {
        self.intensity_min
    }

    /// Observed maximum of the lightness buffer. The tone curve's domain is
    /// normalized against this value, coupling the curve to this image.
    pub fn intensity_max(&self) -> f64 {
        self.intensity_max
    }

    /// Lightness at `(x, y)`, with out-of-bounds coordinates clamped to the
    /// nearest edge pixel.
    pub fn intensity_at(&self, x: i64, y: i64) -> f64 {
        let (cx, cy) = if x < 0 || x >= i64::from(self.width) || y < 0 || y >= i64::from(self.height)
        {
            warn!(
                x,
                y,
                width = self.width,
                height = self.height,
                "intensity lookup outside image bounds, clamping"
            );
            (
                x.clamp(0, i64::from(self.width) - 1),
                y.clamp(0, i64::from(self.height) - 1),
            )
        } else {
            (x, y)
        };
        self.lightness[(cy * i64::from(self.width) + cx) as usize]
    }

    /// The tone-mapping core: the uniform scale factor for all three
    /// channels of pixel `index` under `curve`.
    ///
    /// The pixel's luminance is converted to L*, normalized by the image's
    /// observed maximum lightness, remapped through the curve, and
    /// converted back:
    /// ```text
    /// Y0 = relative_luminance(r/max, g/max, b/max)
    /// L0 = lstar(Y0)            n0 = L0 / intensity_max
    /// n1 = curve(n0)            L1 = n1 × intensity_max
    /// Y1 = luminance(L1)        factor = Y1 / Y0
    /// ```
    /// A zero-luminance pixel has no defined ratio; the factor is 1.0
    /// (leave the pixel unchanged) rather than letting 0/0 propagate.
    pub fn pixel_intensity_factor(&self, index: usize, curve: &ToneCurve) -> f64 {
        let y0 = cie::relative_luminance(
            self.r[index] / self.channel_max,
            self.g[index] / self.channel_max,
            self.b[index] / self.channel_max,
        );
        if y0 == 0.0 {
            return 1.0;
        }

        let l0 = cie::luminance_to_lstar(y0);
        let n0 = l0 / self.intensity_max;
        let n1 = curve.value(n0);
        let l1 = n1 * self.intensity_max;
        let y1 = cie::lstar_to_luminance(l1);

        y1 / y0
    }

    /// Render the image through `curve` to an 8-bit RGBA raster.
    ///
    /// Every pixel's channels are scaled by its intensity factor and
    /// quantized with `clamp(0, 255, round(256 × factor × channel / channel_max))`.
    /// Alpha is fully opaque. Always a full pass over all pixels.
    pub fn render(&self, curve: &ToneCurve) -> RgbaImage {
        let quantize = 256.0 / self.channel_max;

        let mut out = RgbaImage::new(self.width, self.height);
        for (i, pixel) in out.pixels_mut().enumerate() {
            let factor = self.pixel_intensity_factor(i, curve);
            *pixel = Rgba([
                quantize_channel(factor * self.r[i] * quantize),
                quantize_channel(factor * self.g[i] * quantize),
                quantize_channel(factor * self.b[i] * quantize),
                255,
            ]);
        }

        debug!(width = self.width, height = self.height, "rendered RGBA frame");
        out
    }

    /// Histogram of the image's lightness values, optionally remapped
    /// through `curve` first.
    ///
    /// `range` restricts the histogram to a normalized sub-interval of the
    /// intensity axis (the zoom feature); values outside it are excluded
    /// entirely, not clamped. The filter applies to the normalized output
    /// intensity when a curve is given, otherwise to the normalized source
    /// intensity.
    pub fn intensity_histogram(
        &self,
        bins: usize,
        curve: Option<&ToneCurve>,
        range: Option<IntensityRange>,
    ) -> Histogram {
        let (min, max) = match range {
            None => (0.0, self.intensity_max),
            Some(r) => (r.min * self.intensity_max, r.max * self.intensity_max),
        };
        let mut histogram = Histogram::new(bins, min, max);

        let intensity_max_inv = 1.0 / self.intensity_max;
        for &lstar in &self.lightness {
            let normalized = lstar * intensity_max_inv;
            let (value, filter_on) = match curve {
                None => (lstar, normalized),
                Some(curve) => {
                    let normalized_out = curve.value(normalized);
                    (normalized_out * self.intensity_max, normalized_out)
                }
            };
            if range.is_none_or(|r| r.contains(filter_on)) {
                histogram.add_value(value);
            }
        }

        histogram
    }
}

fn quantize_channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
