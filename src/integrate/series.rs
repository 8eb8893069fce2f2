use std::ops::Range;

use log::debug;

use super::{SeriesError, Window};

/// Ordered (time, value) samples of one channel, time in seconds.
///
/// Construction guarantees at least one sample, finite values and strictly
/// increasing time.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    time_s: Vec<f64>,
    values: Vec<f64>,
}

impl Series {
    /// Build a series from parallel time (seconds) and value arrays.
    ///
    /// Pairs with a non-finite time or value are dropped. A sample whose time
    /// equals the previous accepted time is dropped as a duplicate (the first
    /// one wins). A decreasing time stamp is an error.
    pub fn new(time_s: Vec<f64>, values: Vec<f64>) -> Result<Self, SeriesError> {
        if time_s.len() != values.len() {
            return Err(SeriesError::LengthMismatch {
                time_len: time_s.len(),
                value_len: values.len(),
            });
        }

        let mut kept_t = Vec::with_capacity(time_s.len());
        let mut kept_v = Vec::with_capacity(values.len());
        let mut dropped_non_finite = 0usize;
        let mut dropped_duplicates = 0usize;

        for (index, (&t, &v)) in time_s.iter().zip(values.iter()).enumerate() {
            if !t.is_finite() || !v.is_finite() {
                dropped_non_finite += 1;
                continue;
            }
            if let Some(&previous) = kept_t.last() {
                if t == previous {
                    dropped_duplicates += 1;
                    continue;
                }
                if t < previous {
                    return Err(SeriesError::NonMonotonic {
                        index,
                        previous,
                        current: t,
                    });
                }
            }
            kept_t.push(t);
            kept_v.push(v);
        }

        if kept_t.is_empty() {
            return Err(SeriesError::Empty);
        }
        if dropped_non_finite > 0 || dropped_duplicates > 0 {
            debug!(
                "series: dropped {} non-finite and {} duplicate-time samples",
                dropped_non_finite, dropped_duplicates
            );
        }

        Ok(Self {
            time_s: kept_t,
            values: kept_v,
        })
    }

    /// Build a series from `(time_s, value)` pairs
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Self, SeriesError> {
        let (time_s, values) = pairs.iter().copied().unzip();
        Self::new(time_s, values)
    }

    /// Time stamps in seconds
    pub fn time(&self) -> &[f64] {
        &self.time_s
    }

    /// Sample values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.time_s.len()
    }

    /// Always false; kept for API symmetry with slices
    pub fn is_empty(&self) -> bool {
        self.time_s.is_empty()
    }

    /// First and last time stamp in seconds
    pub fn time_range(&self) -> (f64, f64) {
        // Non-empty by construction.
        (self.time_s[0], self.time_s[self.time_s.len() - 1])
    }

    /// Time stamps converted to minutes, for display
    pub fn time_minutes(&self) -> Vec<f64> {
        self.time_s.iter().map(|t| t / super::SECONDS_PER_MINUTE).collect()
    }

    /// Copy of this series with `f` applied to every value, time unchanged
    pub fn map_values<F: Fn(f64) -> f64>(&self, f: F) -> Self {
        Self {
            time_s: self.time_s.clone(),
            values: self.values.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Index range of samples with `start <= t <= end`
    pub fn window_indices(&self, window: &Window) -> Range<usize> {
        let lo = self.time_s.partition_point(|&t| t < window.start_s());
        let hi = self.time_s.partition_point(|&t| t <= window.end_s());
        lo..hi.max(lo)
    }

    /// Index range of samples with `from <= t < to`
    pub(crate) fn half_open_indices(&self, from: f64, to: f64) -> Range<usize> {
        let lo = self.time_s.partition_point(|&t| t < from);
        let hi = self.time_s.partition_point(|&t| t < to);
        lo..hi.max(lo)
    }
}
