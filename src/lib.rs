//! # qms-ice - QMS analysis for astrophysical ice experiments
//!
//! `qms_ice` turns the tabular exports of a quadrupole mass spectrometer into
//! quantitative results: the baseline-corrected area of each mass channel over
//! a chosen time window, and the photon fluence received by the ice sample
//! during that window.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use qms_ice::prelude::*;
//!
//! let config = AnalysisConfig::from_file("qms.toml".as_ref())?;
//! let report = run(&config)?;
//!
//! for result in &report.results.results {
//!     println!("{}: {:.4e}", result.channel, result.area);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Integration on its own:
//!
//! ```rust
//! use qms_ice::integrate::{integrate, BaselinePolicy, Series, Window};
//!
//! let series = Series::new(vec![0.0, 60.0, 120.0], vec![1e-11, 3e-11, 1e-11])?;
//! let window = Window::from_minutes(0.0, 2.0)?;
//! let result = integrate(&series, &window, BaselinePolicy::Linear)?;
//!
//! assert!((result.area - 1.2e-9).abs() < 1e-20);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`reader`]: tab or whitespace delimited QMS table parsing and channel selection
//! - [`integrate`]: time series, integration windows, baseline policies, trapezoidal rule
//! - [`photon`]: photodiode current to photon flux conversion
//! - [`config`]: TOML run configuration
//! - [`results`]: result records, text and JSON output
//! - `plot`: PNG rendering of signals and integration regions (feature `plots`)
//! - [`pipeline`]: one complete analysis run
//!
//! Time stamps are seconds everywhere; windows are configured in minutes and
//! converted once at the edge.

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod integrate;
pub mod photon;
pub mod pipeline;
#[cfg(feature = "plots")]
pub mod plot;
pub mod reader;
pub mod results;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::config::{AnalysisConfig, AnalysisMode, ConfigError};
    pub use crate::integrate::{
        integrate, trapezoid, Baseline, BaselinePolicy, Integration, IntegrationError, Series,
        SeriesError, Window,
    };
    pub use crate::photon::{flux_series, to_photon_flux, DEFAULT_PHOTON_SCALE};
    pub use crate::pipeline::{run, AnalysisReport, PipelineError};
    pub use crate::reader::{
        read_qms_file, ChannelRequest, ChannelSet, QmsTable, ReaderError, TableSummary,
    };
    pub use crate::results::{ChannelFailure, ChannelId, IntegrationResult, ResultSet};
}
