//! TOML configuration for an analysis run.
//!
//! All options live in one flat table. Keys are snake_case; the uppercase
//! names used by earlier versions of the tool are accepted as aliases, so
//! both forms below are equivalent:
//!
//! ```toml
//! # qms.toml
//! qms_path = "data/20251023_CO_irr_TPD_QMS.txt"
//! analysis_mode = "time"
//! masses = ["18.00", "28.00", "32.00", "44.00"]
//! integration_range = [10.0, 25.0]   # minutes
//! photon_key = "Photodiode"
//! photon_scale = 1.924e22
//! baseline = "linear"
//! ```
//!
//! ```toml
//! QMS_PATH = "data/20251023_CO_irr_TPD_QMS.txt"
//! ANALYSIS_MODE = "time"
//! MASSES = ["18.00", "28.00"]
//! INTEGRATION_RANGE = [10.0, 25.0]
//! ```
//!
//! The configuration is immutable once loaded; the pipeline receives it by
//! reference.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::integrate::{BaselinePolicy, IntegrationError, Window};
use crate::photon::DEFAULT_PHOTON_SCALE;

/// Pixels per inch used to turn `figsize` into an image size
pub const PIXELS_PER_INCH: f64 = 100.0;

/// Errors raised while loading or validating a configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path of the config file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// TOML syntax or type error
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// No input file configured
    #[error("No QMS input file configured (qms_path)")]
    MissingInput,

    /// Integration enabled without a range
    #[error("Integration enabled but no integration_range configured")]
    MissingIntegrationRange,

    /// Integration range is inverted or not finite
    #[error("Invalid integration_range: {0}")]
    InvalidRange(#[from] IntegrationError),

    /// Photon scale must be a positive finite number
    #[error("photon_scale must be positive and finite, got {0}")]
    InvalidPhotonScale(f64),

    /// Figure size or line width not positive
    #[error("Invalid plot geometry: {0}")]
    InvalidPlotGeometry(String),

    /// Unknown analysis mode
    #[error("analysis_mode must be 'time' or 'temperature', got '{0}'")]
    InvalidMode(String),
}

/// Independent axis used for signal plots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    /// Signals against experiment time
    #[default]
    #[serde(alias = "Time", alias = "TIME")]
    Time,
    /// Signals against temperature (TPD)
    #[serde(alias = "Temperature", alias = "TEMPERATURE")]
    Temperature,
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisMode::Time => write!(f, "time"),
            AnalysisMode::Temperature => write!(f, "temperature"),
        }
    }
}

impl FromStr for AnalysisMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "time" => Ok(AnalysisMode::Time),
            "temperature" => Ok(AnalysisMode::Temperature),
            _ => Err(ConfigError::InvalidMode(s.to_string())),
        }
    }
}

/// Settings for one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// QMS data file
    #[serde(alias = "QMS_PATH")]
    pub qms_path: Option<PathBuf>,

    /// Plot axis: time or temperature
    #[serde(alias = "ANALYSIS_MODE")]
    pub analysis_mode: AnalysisMode,

    /// Experiment time column (seconds)
    #[serde(alias = "TIME_KEY")]
    pub time_key: String,

    /// Temperature column (K)
    #[serde(alias = "TEMP_KEY")]
    pub temp_key: String,

    /// Mass channels to analyse; empty selects every numeric header
    #[serde(alias = "MASSES")]
    pub masses: Vec<String>,

    /// Integration window `[start, end]` in minutes
    #[serde(alias = "INTEGRATION_RANGE")]
    pub integration_range: Option<[f64; 2]>,

    /// Photodiode current column; photon flux is skipped when unset
    #[serde(alias = "PHOTON_KEY")]
    pub photon_key: Option<String>,

    /// Photons cm⁻² s⁻¹ per ampere
    #[serde(alias = "PHOTON_SCALE")]
    pub photon_scale: f64,

    /// Baseline policy for mass channels
    #[serde(alias = "BASELINE")]
    pub baseline: BaselinePolicy,

    /// Render the overview signal plots
    #[serde(alias = "PLOT_SIGNALS")]
    pub plot_signals: bool,

    /// Integrate the selected channels
    #[serde(alias = "INTEGRATE_SIGNALS")]
    pub integrate_signals: bool,

    /// Write plots to `plot_dir`
    #[serde(alias = "SAVE_PLOTS")]
    pub save_plots: bool,

    /// Render plots and report their location for viewing
    #[serde(alias = "SHOW_PLOTS")]
    pub show_plots: bool,

    /// Write the integration results text file
    #[serde(alias = "SAVE_INTEGRATION_RESULTS")]
    pub save_integration_results: bool,

    /// Integration results text file
    #[serde(alias = "INTEGRATION_RESULTS_FILE")]
    pub integration_results_file: PathBuf,

    /// Optional JSON summary of the run
    pub results_json: Option<PathBuf>,

    /// Directory receiving the rendered plots
    pub plot_dir: PathBuf,

    /// Figure size in inches `[width, height]`
    #[serde(alias = "FIGSIZE")]
    pub figsize: [f64; 2],

    /// Line width in pixels
    #[serde(alias = "LINEWIDTH")]
    pub linewidth: f64,

    /// Title of the overview plot; mode-dependent when unset
    #[serde(alias = "TITLE", alias = "TITLE_TEMP")]
    pub title: Option<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            qms_path: None,
            analysis_mode: AnalysisMode::Time,
            time_key: "TimesExp".to_string(),
            temp_key: "TempAK".to_string(),
            masses: Vec::new(),
            integration_range: None,
            photon_key: None,
            photon_scale: DEFAULT_PHOTON_SCALE,
            baseline: BaselinePolicy::Linear,
            plot_signals: true,
            integrate_signals: true,
            save_plots: true,
            show_plots: false,
            save_integration_results: true,
            integration_results_file: PathBuf::from("results/qms_integration_results.txt"),
            results_json: None,
            plot_dir: PathBuf::from("results"),
            figsize: [8.0, 5.0],
            linewidth: 1.2,
            title: None,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Check the settings before any file is touched
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.qms_path.is_none() {
            return Err(ConfigError::MissingInput);
        }
        if self.integrate_signals {
            self.window()?;
        }
        if !self.photon_scale.is_finite() || self.photon_scale <= 0.0 {
            return Err(ConfigError::InvalidPhotonScale(self.photon_scale));
        }
        if self.figsize.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(ConfigError::InvalidPlotGeometry(format!(
                "figsize {:?}",
                self.figsize
            )));
        }
        if !self.linewidth.is_finite() || self.linewidth <= 0.0 {
            return Err(ConfigError::InvalidPlotGeometry(format!(
                "linewidth {}",
                self.linewidth
            )));
        }
        Ok(())
    }

    /// Integration window converted from the configured minutes
    pub fn window(&self) -> Result<Window, ConfigError> {
        let [start, end] = self
            .integration_range
            .ok_or(ConfigError::MissingIntegrationRange)?;
        Ok(Window::from_minutes(start, end)?)
    }

    /// Whether any plot has to be rendered
    pub fn renders_plots(&self) -> bool {
        self.save_plots || self.show_plots
    }

    /// Overview plot title
    pub fn plot_title(&self) -> String {
        self.title.clone().unwrap_or_else(|| match self.analysis_mode {
            AnalysisMode::Time => "QMS Signals vs Time".to_string(),
            AnalysisMode::Temperature => "QMS Signals (m/z vs Temperature)".to_string(),
        })
    }

    /// Image size in pixels derived from `figsize`
    pub fn figure_size_px(&self) -> (u32, u32) {
        let [w, h] = self.figsize;
        (
            (w * PIXELS_PER_INCH).round() as u32,
            (h * PIXELS_PER_INCH).round() as u32,
        )
    }
}
