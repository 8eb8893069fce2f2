//! # Integration Module
//!
//! Baseline-corrected trapezoidal integration of QMS channels over a time
//! window.
//!
//! Integration always runs against time in seconds, whatever axis is used for
//! plotting. Windows are usually configured in minutes and converted once via
//! [`Window::from_minutes`].
//!
//! ## Example
//!
//! ```rust
//! use qms_ice::integrate::{integrate, BaselinePolicy, Series, Window};
//!
//! let series = Series::from_pairs(&[(0.0, 10.0), (1.0, 20.0), (2.0, 10.0)])?;
//! let window = Window::from_seconds(0.0, 2.0)?;
//!
//! let raw = integrate(&series, &window, BaselinePolicy::None)?;
//! assert_eq!(raw.area, 30.0);
//!
//! let corrected = integrate(&series, &window, BaselinePolicy::Fixed(10.0))?;
//! assert_eq!(corrected.area, 10.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod series;

#[cfg(test)]
mod tests;

pub use error::{IntegrationError, SeriesError};
pub use series::Series;

use serde::{Deserialize, Serialize};

/// Seconds in one minute
pub const SECONDS_PER_MINUTE: f64 = 60.0;

/// Closed integration interval, stored in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Window {
    start_s: f64,
    end_s: f64,
}

impl Window {
    /// Create a window from bounds in seconds
    pub fn from_seconds(start_s: f64, end_s: f64) -> Result<Self, IntegrationError> {
        if !start_s.is_finite() || !end_s.is_finite() || start_s >= end_s {
            return Err(IntegrationError::InvalidWindow { start_s, end_s });
        }
        Ok(Self { start_s, end_s })
    }

    /// Create a window from bounds in minutes
    pub fn from_minutes(start_min: f64, end_min: f64) -> Result<Self, IntegrationError> {
        Self::from_seconds(start_min * SECONDS_PER_MINUTE, end_min * SECONDS_PER_MINUTE)
    }

    /// Start in seconds
    pub fn start_s(&self) -> f64 {
        self.start_s
    }

    /// End in seconds
    pub fn end_s(&self) -> f64 {
        self.end_s
    }

    /// Start in minutes
    pub fn start_min(&self) -> f64 {
        self.start_s / SECONDS_PER_MINUTE
    }

    /// End in minutes
    pub fn end_min(&self) -> f64 {
        self.end_s / SECONDS_PER_MINUTE
    }

    /// Window length in seconds
    pub fn duration_s(&self) -> f64 {
        self.end_s - self.start_s
    }

    /// Whether `t` (seconds) lies inside the closed window
    pub fn contains(&self, t: f64) -> bool {
        t >= self.start_s && t <= self.end_s
    }
}

/// How the baseline is estimated before integration.
///
/// In TOML this reads `baseline = "linear"`, `baseline = "none"`,
/// `baseline = { fixed = 1e-11 }` or `baseline = { pre_window_mean = 30.0 }`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselinePolicy {
    /// No correction
    None,
    /// Straight line through the first and last sample inside the window
    #[default]
    Linear,
    /// Fixed value subtracted from every sample
    Fixed(f64),
    /// Mean of the samples in the given margin (seconds) before the window start
    PreWindowMean(f64),
}

/// Baseline actually subtracted during an integration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Baseline {
    /// Constant level
    Constant {
        /// Baseline value
        level: f64,
    },
    /// `slope * t + intercept`, with `t` in seconds
    Linear {
        /// Slope per second
        slope: f64,
        /// Value at t = 0 s
        intercept: f64,
    },
}

impl Baseline {
    /// Zero baseline
    pub const ZERO: Baseline = Baseline::Constant { level: 0.0 };

    /// Baseline value at time `t_s`
    pub fn at(&self, t_s: f64) -> f64 {
        match *self {
            Baseline::Constant { level } => level,
            Baseline::Linear { slope, intercept } => slope * t_s + intercept,
        }
    }

    /// Mean baseline value over `window`, reported as the scalar baseline
    pub fn mean_level(&self, window: &Window) -> f64 {
        match *self {
            Baseline::Constant { level } => level,
            Baseline::Linear { .. } => self.at(0.5 * (window.start_s() + window.end_s())),
        }
    }
}

/// Outcome of a successful integration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Integration {
    /// Area under the baseline-corrected curve (value * seconds)
    pub area: f64,
    /// Baseline that was subtracted
    pub baseline: Baseline,
    /// Number of samples inside the window
    pub samples: usize,
}

/// Integrate `series` over `window` after subtracting the baseline chosen by `policy`.
///
/// Both window bounds must lie within the time range of the series and at
/// least two samples must fall inside the window.
pub fn integrate(
    series: &Series,
    window: &Window,
    policy: BaselinePolicy,
) -> Result<Integration, IntegrationError> {
    let (min_s, max_s) = series.time_range();
    if window.start_s() < min_s || window.end_s() > max_s {
        return Err(IntegrationError::Range {
            start_s: window.start_s(),
            end_s: window.end_s(),
            min_s,
            max_s,
        });
    }

    let range = series.window_indices(window);
    let time = &series.time()[range.clone()];
    let values = &series.values()[range];
    if time.len() < 2 {
        return Err(IntegrationError::EmptySeries {
            samples: time.len(),
            start_s: window.start_s(),
            end_s: window.end_s(),
        });
    }

    let baseline = estimate_baseline(series, window, time, values, policy)?;
    let corrected: Vec<f64> = time
        .iter()
        .zip(values)
        .map(|(&t, &v)| v - baseline.at(t))
        .collect();

    Ok(Integration {
        area: trapezoid(time, &corrected),
        baseline,
        samples: time.len(),
    })
}

/// Trapezoidal area of `values` against `time_s`.
///
/// Extra elements of the longer slice are ignored; fewer than two points give 0.
pub fn trapezoid(time_s: &[f64], values: &[f64]) -> f64 {
    let n = time_s.len().min(values.len());
    (1..n)
        .map(|i| 0.5 * (values[i - 1] + values[i]) * (time_s[i] - time_s[i - 1]))
        .sum()
}

fn estimate_baseline(
    series: &Series,
    window: &Window,
    time: &[f64],
    values: &[f64],
    policy: BaselinePolicy,
) -> Result<Baseline, IntegrationError> {
    match policy {
        BaselinePolicy::None => Ok(Baseline::ZERO),
        BaselinePolicy::Fixed(level) => Ok(Baseline::Constant { level }),
        BaselinePolicy::Linear => {
            // Caller guarantees at least two strictly increasing samples.
            let (t0, y0) = (time[0], values[0]);
            let (t1, y1) = (time[time.len() - 1], values[values.len() - 1]);
            let slope = (y1 - y0) / (t1 - t0);
            Ok(Baseline::Linear {
                slope,
                intercept: y0 - slope * t0,
            })
        }
        BaselinePolicy::PreWindowMean(margin_s) => {
            let unavailable = IntegrationError::BaselineUnavailable {
                margin_s,
                start_s: window.start_s(),
            };
            if !margin_s.is_finite() || margin_s <= 0.0 {
                return Err(unavailable);
            }
            let range = series.half_open_indices(window.start_s() - margin_s, window.start_s());
            let before = &series.values()[range];
            if before.is_empty() {
                return Err(unavailable);
            }
            let level = before.iter().sum::<f64>() / before.len() as f64;
            Ok(Baseline::Constant { level })
        }
    }
}
