//! Integration result records and their serialization.
//!
//! A [`ResultSet`] is filled once per run and written afterwards, either as
//! the plain text summary read by the lab's spreadsheets or as JSON.

use std::fmt;
use std::fs::{self, File};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "colorized_output")]
use console::style;

use crate::integrate::{Baseline, Window};

/// Header line of the text results file
pub const RESULTS_HEADER: [&str; 5] = ["channel_id", "area", "baseline", "window_start", "window_end"];

/// Channel identifier used in the photon flux row
pub const PHOTON_FLUX_ID: &str = "photon_flux";

/// Errors that can occur while writing results
#[derive(Debug, thiserror::Error)]
pub enum ResultsError {
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV writer error
    #[error("CSV writing error: {0}")]
    CsvError(#[from] csv::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Integrated channel
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "label", rename_all = "snake_case")]
pub enum ChannelId {
    /// Mass channel by m/z label
    Mass(String),
    /// Photon flux derived from the photodiode current
    PhotonFlux,
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelId::Mass(label) => write!(f, "{}", label),
            ChannelId::PhotonFlux => write!(f, "{}", PHOTON_FLUX_ID),
        }
    }
}

/// Area of one channel over the integration window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationResult {
    /// Integrated channel
    pub channel: ChannelId,
    /// Baseline-corrected area, value * seconds
    pub area: f64,
    /// Baseline subtracted before integration
    pub baseline: Baseline,
    /// Integration window
    pub window: Window,
}

impl IntegrationResult {
    /// Scalar baseline reported in the text file
    pub fn baseline_level(&self) -> f64 {
        self.baseline.mean_level(&self.window)
    }
}

/// Channel that could not be integrated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelFailure {
    /// Affected channel
    pub channel: ChannelId,
    /// Human-readable reason
    pub reason: String,
}

/// Results of one run, in the order channels were processed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    /// Successfully integrated channels
    pub results: Vec<IntegrationResult>,
    /// Channels skipped with the reason
    pub failures: Vec<ChannelFailure>,
}

#[derive(Serialize)]
struct JsonSummary<'a> {
    source_file: &'a str,
    generated_at: DateTime<Utc>,
    generator: String,
    results: &'a [IntegrationResult],
    failures: &'a [ChannelFailure],
}

impl ResultSet {
    /// Create an empty result set
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful integration
    pub fn push(&mut self, result: IntegrationResult) {
        self.results.push(result);
    }

    /// Record a skipped channel
    pub fn push_failure(&mut self, channel: ChannelId, reason: impl Into<String>) {
        self.failures.push(ChannelFailure {
            channel,
            reason: reason.into(),
        });
    }

    /// Result for a channel, if it was integrated
    pub fn get(&self, channel: &ChannelId) -> Option<&IntegrationResult> {
        self.results.iter().find(|r| &r.channel == channel)
    }

    /// Whether any channel failed
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Write the comma-separated results file, one line per integrated channel.
    ///
    /// Window bounds are written in minutes, numbers in `{:.6e}` notation.
    pub fn write_text(&self, path: &Path) -> Result<(), ResultsError> {
        create_parent(path)?;
        let file = File::create(path)?;
        self.write_text_to(file)
    }

    /// Write the results table to any writer
    pub fn write_text_to<W: std::io::Write>(&self, writer: W) -> Result<(), ResultsError> {
        let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);
        csv_writer.write_record(RESULTS_HEADER)?;
        for r in &self.results {
            csv_writer.write_record([
                r.channel.to_string(),
                format!("{:.6e}", r.area),
                format!("{:.6e}", r.baseline_level()),
                format!("{:.6e}", r.window.start_min()),
                format!("{:.6e}", r.window.end_min()),
            ])?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Write a JSON summary including failures and a generation timestamp
    pub fn write_json(&self, path: &Path, source_file: &Path) -> Result<(), ResultsError> {
        create_parent(path)?;
        let source = source_file.to_string_lossy();
        let summary = JsonSummary {
            source_file: &*source,
            generated_at: Utc::now(),
            generator: format!("qms-ice {}", env!("CARGO_PKG_VERSION")),
            results: &self.results,
            failures: &self.failures,
        };
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, &summary)?;
        Ok(())
    }

    /// Format the summary with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            let mut output = String::new();
            output.push_str(&format!("{}\n", style("Integration results (area under the curve)").bold().cyan()));
            for r in &self.results {
                output.push_str(&format!(
                    "  {} {}: {}\n",
                    style("•").green(),
                    style(channel_caption(&r.channel)).bold(),
                    format_area(r)
                ));
            }
            for failure in &self.failures {
                output.push_str(&format!(
                    "  {} {}: {}\n",
                    style("✗").red(),
                    style(channel_caption(&failure.channel)).bold(),
                    style(&failure.reason).red()
                ));
            }
            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

impl fmt::Display for ResultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Integration results (area under the curve)")?;
        for r in &self.results {
            writeln!(f, "  • {}: {}", channel_caption(&r.channel), format_area(r))?;
        }
        for failure in &self.failures {
            writeln!(f, "  ✗ {}: {}", channel_caption(&failure.channel), failure.reason)?;
        }
        Ok(())
    }
}

fn channel_caption(channel: &ChannelId) -> String {
    match channel {
        ChannelId::Mass(label) => format!("Mass {}", label),
        ChannelId::PhotonFlux => "Photon fluence".to_string(),
    }
}

fn format_area(result: &IntegrationResult) -> String {
    match result.channel {
        ChannelId::Mass(_) => format!("{:.4e}", result.area),
        ChannelId::PhotonFlux => format!("{:.6e} photons·cm⁻²", result.area),
    }
}

fn create_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir),
        _ => Ok(()),
    }
}
