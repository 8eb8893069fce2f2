/// Errors raised while building a [`Series`](super::Series)
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeriesError {
    /// No finite (time, value) pair survived construction
    #[error("series contains no finite samples")]
    Empty,

    /// Time and value arrays differ in length
    #[error("Array length mismatch: time array has {time_len} elements, value array has {value_len} elements")]
    LengthMismatch {
        /// Length of the time array
        time_len: usize,
        /// Length of the value array
        value_len: usize,
    },

    /// Time decreased between two consecutive samples
    #[error("time is not monotonic at sample {index}: {current} s follows {previous} s")]
    NonMonotonic {
        /// Index of the offending sample in the input arrays
        index: usize,
        /// Time of the previously accepted sample
        previous: f64,
        /// Time of the offending sample
        current: f64,
    },
}

/// Errors raised by [`integrate`](super::integrate) and window construction
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IntegrationError {
    /// Window bounds are not finite or not ordered
    #[error("invalid integration window: start {start_s} s must be finite and before end {end_s} s")]
    InvalidWindow {
        /// Requested start in seconds
        start_s: f64,
        /// Requested end in seconds
        end_s: f64,
    },

    /// Window extends beyond the time range covered by the series
    #[error(
        "integration window [{start_s:.1}, {end_s:.1}] s outside data range [{min_s:.1}, {max_s:.1}] s"
    )]
    Range {
        /// Window start in seconds
        start_s: f64,
        /// Window end in seconds
        end_s: f64,
        /// First time stamp of the series
        min_s: f64,
        /// Last time stamp of the series
        max_s: f64,
    },

    /// Fewer than two samples inside the window, trapezoidal rule undefined
    #[error("{samples} sample(s) inside integration window [{start_s:.1}, {end_s:.1}] s, at least 2 required")]
    EmptySeries {
        /// Number of samples found inside the window
        samples: usize,
        /// Window start in seconds
        start_s: f64,
        /// Window end in seconds
        end_s: f64,
    },

    /// Pre-window baseline margin holds no samples
    #[error("no samples within {margin_s} s before window start {start_s:.1} s to estimate a baseline")]
    BaselineUnavailable {
        /// Margin searched before the window, in seconds
        margin_s: f64,
        /// Window start in seconds
        start_s: f64,
    },
}
