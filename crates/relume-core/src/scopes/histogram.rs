//! Fixed-bin intensity histogram.

use serde::{Deserialize, Serialize};

/// A normalized sub-interval of the intensity axis, both ends in `[0, 1]`.
///
/// Used to zoom histogram computation into part of the lightness range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntensityRange {
    pub min: f64,
    pub max: f64,
}

impl IntensityRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn length(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Fixed-bin counter over a value range.
///
/// Built in a single pass by repeated [`add_value`](Self::add_value) calls
/// and read-only afterwards. Values outside `[min, max]` are clamped into
/// the boundary bins, so out-of-range mass piles up at the edges; callers
/// that want strict exclusion must filter before adding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Histogram {
    bins: Vec<u32>,
    range_min: f64,
    range_max: f64,
    /// Precomputed `bins / (max − min)` for O(1) bucketing.
    scale: f64,
    max_count: u32,
}

impl Histogram {
    /// Allocate `bins` zeroed counters over `[min, max]`.
    pub fn new(bins: usize, min: f64, max: f64) -> Self {
        Self {
            bins: vec![0; bins],
            range_min: min,
            range_max: max,
            scale: bins as f64 / (max - min),
            max_count: 0,
        }
    }

    /// Count `value` into its bucket, clamping to the boundary bins.
    pub fn add_value(&mut self, value: f64) {
        let index = ((value - self.range_min) * self.scale) as isize;
        let index = index.clamp(0, self.bins.len() as isize - 1) as usize;
        self.bins[index] += 1;
        self.max_count = self.max_count.max(self.bins[index]);
    }

    /// Bin height normalized against the fullest bin, in `[0, 1]`.
    ///
    /// Returns 0 for an empty histogram.
    pub fn normalized_value(&self, index: usize) -> f64 {
        if self.max_count == 0 {
            return 0.0;
        }
        f64::from(self.bins[index]) / f64::from(self.max_count)
    }

    /// Number of bins.
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Raw bin counts.
    pub fn counts(&self) -> &[u32] {
        &self.bins
    }

    /// Sum of all bin counts, i.e. the number of values added.
    pub fn total_count(&self) -> u64 {
        self.bins.iter().map(|&c| u64::from(c)).sum()
    }

    /// Count of the fullest bin.
    pub fn max_count(&self) -> u32 {
        self.max_count
    }

    /// The value range this histogram covers.
    pub fn range(&self) -> (f64, f64) {
        (self.range_min, self.range_max)
    }
}
