//! # Analysis Pipeline
//!
//! One synchronous pass over a QMS file:
//!
//! 1. validate the configuration and load the file (fatal on failure);
//! 2. extract the requested channels, recording absent labels;
//! 3. integrate every mass channel and the photon flux over the window;
//! 4. write the results file(s);
//! 5. render the overview and integration plots.
//!
//! Problems that concern a single channel never abort the run; they end up in
//! [`ResultSet::failures`]. Plot failures are logged and collected in
//! [`AnalysisReport::plot_errors`].

use std::path::PathBuf;

use log::{info, warn};

use crate::config::{AnalysisConfig, AnalysisMode, ConfigError};
use crate::integrate::{
    integrate, Baseline, BaselinePolicy, Integration, IntegrationError, Series, SeriesError,
    Window,
};
use crate::photon::flux_series;
use crate::reader::{read_qms_file, ChannelRequest, ChannelSet, ReaderError};
use crate::results::{ChannelId, IntegrationResult, ResultSet, ResultsError};

/// Errors that stop a run
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Input file missing or malformed
    #[error("Failed to read QMS data: {0}")]
    Reader(#[from] ReaderError),

    /// Results could not be written
    #[error("Failed to write results: {0}")]
    Results(#[from] ResultsError),
}

/// Reasons a single channel could not be integrated
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// Channel data unusable as a time series
    #[error(transparent)]
    Series(#[from] SeriesError),

    /// Integration rejected the window or data
    #[error(transparent)]
    Integration(#[from] IntegrationError),
}

/// Outcome of [`run`]
#[derive(Debug)]
pub struct AnalysisReport {
    /// Input file
    pub source: PathBuf,
    /// Plot axis used
    pub mode: AnalysisMode,
    /// Number of data rows read
    pub rows: usize,
    /// Integrated channels and per-channel failures
    pub results: ResultSet,
    /// Results text file, when written
    pub results_file: Option<PathBuf>,
    /// JSON summary, when written
    pub results_json: Option<PathBuf>,
    /// Rendered plot files
    pub plots: Vec<PathBuf>,
    /// Plots that failed to render
    pub plot_errors: Vec<String>,
}

/// Integrated channel kept for plotting
#[cfg_attr(not(feature = "plots"), allow(dead_code))]
struct Integrated {
    channel: ChannelId,
    series: Series,
    baseline: Baseline,
}

/// Run the full analysis described by `config`
pub fn run(config: &AnalysisConfig) -> Result<AnalysisReport, PipelineError> {
    config.validate()?;
    let source = config.qms_path.clone().ok_or(ConfigError::MissingInput)?;

    info!("Loading QMS data from: {}", source.display());
    let table = read_qms_file(&source)?;
    info!(
        "File successfully read ({} columns detected)",
        table.headers().len()
    );
    info!("Selected analysis mode: {}", config.analysis_mode);

    let masses: Vec<String> = if config.masses.is_empty() {
        table.mass_labels().into_iter().map(String::from).collect()
    } else {
        config.masses.clone()
    };
    let request = ChannelRequest {
        time_key: &config.time_key,
        temp_key: match config.analysis_mode {
            AnalysisMode::Temperature => Some(config.temp_key.as_str()),
            AnalysisMode::Time => None,
        },
        masses: &masses,
        photon_key: config.photon_key.as_deref(),
    };
    let channels = table.select(&request)?;

    let mut results = ResultSet::new();
    for label in &channels.missing {
        let channel = if config.photon_key.as_deref() == Some(label.as_str()) {
            ChannelId::PhotonFlux
        } else {
            ChannelId::Mass(label.clone())
        };
        results.push_failure(channel, "not found in file header");
    }

    let mut integrated = Vec::new();
    let mut window = None;
    if config.integrate_signals {
        let w = config.window()?;
        info!(
            "Integrating signals between {:.1} and {:.1} min",
            w.start_min(),
            w.end_min()
        );
        integrated = integrate_channels(&channels, &w, config, &mut results);
        window = Some(w);
    }

    let mut report = AnalysisReport {
        source,
        mode: config.analysis_mode,
        rows: table.n_rows(),
        results,
        results_file: None,
        results_json: None,
        plots: Vec::new(),
        plot_errors: Vec::new(),
    };

    if config.integrate_signals && config.save_integration_results {
        let path = &config.integration_results_file;
        report.results.write_text(path)?;
        info!("Integration results saved to: {}", path.display());
        report.results_file = Some(path.clone());
    }
    if let Some(path) = &config.results_json {
        report.results.write_json(path, &report.source)?;
        info!("JSON summary saved to: {}", path.display());
        report.results_json = Some(path.clone());
    }

    if config.renders_plots() {
        render_plots(config, &channels, window.as_ref(), &integrated, &mut report);
    }

    Ok(report)
}

/// Integrate one column of `channels` over `window`
pub fn integrate_column(
    channels: &ChannelSet,
    values: &[f64],
    window: &Window,
    policy: BaselinePolicy,
) -> Result<(Series, Integration), ChannelError> {
    let series = channels.series(values)?;
    let integration = integrate(&series, window, policy)?;
    Ok((series, integration))
}

fn integrate_channels(
    channels: &ChannelSet,
    window: &Window,
    config: &AnalysisConfig,
    results: &mut ResultSet,
) -> Vec<Integrated> {
    let mut integrated = Vec::with_capacity(channels.masses.len() + 1);

    for mass in &channels.masses {
        let channel = ChannelId::Mass(mass.label.clone());
        match integrate_column(channels, &mass.values, window, config.baseline) {
            Ok((series, integration)) => {
                info!("Mass {}: {:.4e}", mass.label, integration.area);
                results.push(IntegrationResult {
                    channel: channel.clone(),
                    area: integration.area,
                    baseline: integration.baseline,
                    window: *window,
                });
                integrated.push(Integrated {
                    channel,
                    series,
                    baseline: integration.baseline,
                });
            }
            Err(e) => {
                warn!("Could not integrate mass {}: {}", mass.label, e);
                results.push_failure(channel, e.to_string());
            }
        }
    }

    if let Some(current) = &channels.photon_current {
        let outcome = channels
            .series(current)
            .map_err(ChannelError::from)
            .and_then(|series| {
                let flux = flux_series(&series, config.photon_scale);
                let integration = integrate(&flux, window, BaselinePolicy::None)?;
                Ok((flux, integration))
            });
        match outcome {
            Ok((flux, integration)) => {
                info!(
                    "Integrated photon flux: {:.6e} photons·cm⁻²",
                    integration.area
                );
                results.push(IntegrationResult {
                    channel: ChannelId::PhotonFlux,
                    area: integration.area,
                    baseline: integration.baseline,
                    window: *window,
                });
                integrated.push(Integrated {
                    channel: ChannelId::PhotonFlux,
                    series: flux,
                    baseline: integration.baseline,
                });
            }
            Err(e) => {
                warn!("Could not integrate photon flux: {}", e);
                results.push_failure(ChannelId::PhotonFlux, e.to_string());
            }
        }
    }

    integrated
}

#[cfg(feature = "plots")]
fn render_plots(
    config: &AnalysisConfig,
    channels: &ChannelSet,
    window: Option<&Window>,
    integrated: &[Integrated],
    report: &mut AnalysisReport,
) {
    use crate::plot::{
        integration_file_name, render_integration, render_photon_flux, render_signals, Labels,
        PlotError, PlotStyle, Trace,
    };

    let style = PlotStyle::from_config(config);
    let mut record = |path: PathBuf, outcome: Result<(), PlotError>| match outcome {
        Ok(()) => {
            info!("Saved plot: {}", path.display());
            report.plots.push(path);
        }
        Err(e) => {
            warn!("Could not render {}: {}", path.display(), e);
            report.plot_errors.push(format!("{}: {}", path.display(), e));
        }
    };

    if config.plot_signals {
        let (axis, x_desc, file): (Vec<f64>, &str, &str) = match config.analysis_mode {
            AnalysisMode::Time => (
                channels
                    .time_s
                    .iter()
                    .map(|t| t / crate::integrate::SECONDS_PER_MINUTE)
                    .collect(),
                "Time (min)",
                "qms_signals_time.png",
            ),
            AnalysisMode::Temperature => (
                channels.temperature_k.clone().unwrap_or_default(),
                "Temperature (K)",
                "qms_signals_temperature.png",
            ),
        };
        let traces: Vec<Trace<'_>> = channels
            .masses
            .iter()
            .map(|m| Trace {
                label: &m.label,
                x: &axis,
                y: &m.values,
            })
            .collect();
        let labels = Labels {
            title: config.plot_title(),
            x: x_desc.to_string(),
            y: "Intensity (A)".to_string(),
        };
        let path = config.plot_dir.join(file);
        let outcome = render_signals(&path, &traces, &labels, &style);
        record(path, outcome);

        if config.analysis_mode == AnalysisMode::Time {
            if let Some(current) = &channels.photon_current {
                let path = config.plot_dir.join("photon_flux.png");
                let outcome = channels
                    .series(current)
                    .map_err(|e| PlotError::NoData(e.to_string()))
                    .and_then(|s| {
                        render_photon_flux(&path, &flux_series(&s, config.photon_scale), &style)
                    });
                record(path, outcome);
            }
        }
    }

    if let Some(window) = window {
        let dir = config.plot_dir.join("integrations");
        for item in integrated {
            let (file, title, y_desc) = match &item.channel {
                ChannelId::Mass(label) => (
                    integration_file_name(label),
                    format!(
                        "Mass {} - Integration ({}-{} min)",
                        label,
                        window.start_min(),
                        window.end_min()
                    ),
                    "Intensity (A)",
                ),
                ChannelId::PhotonFlux => (
                    "photon_flux_integration.png".to_string(),
                    format!(
                        "Photon flux - Integration ({}-{} min)",
                        window.start_min(),
                        window.end_min()
                    ),
                    "Photon flux (photons cm⁻² s⁻¹)",
                ),
            };
            let labels = Labels {
                title,
                x: "Time (min)".to_string(),
                y: y_desc.to_string(),
            };
            let path = dir.join(file);
            let outcome =
                render_integration(&path, &item.series, window, &item.baseline, &labels, &style);
            record(path, outcome);
        }
    }
}

#[cfg(not(feature = "plots"))]
fn render_plots(
    _config: &AnalysisConfig,
    _channels: &ChannelSet,
    _window: Option<&Window>,
    _integrated: &[Integrated],
    report: &mut AnalysisReport,
) {
    warn!("Plots requested but qms-ice was built without the `plots` feature");
    report
        .plot_errors
        .push("built without the `plots` feature".to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::QmsTable;

    fn channels() -> ChannelSet {
        let table = QmsTable::parse(
            "t\t28.00\tLamp\n0\t10\t1e-12\n1\t20\t1e-12\n2\t10\t1e-12\n",
        )
        .unwrap();
        let masses = vec!["28.00".to_string()];
        table
            .select(&ChannelRequest {
                time_key: "t",
                temp_key: None,
                masses: &masses,
                photon_key: Some("Lamp"),
            })
            .unwrap()
    }

    #[test]
    fn test_integrate_column() {
        let set = channels();
        let window = Window::from_seconds(0.0, 2.0).unwrap();

        let (series, integration) =
            integrate_column(&set, &set.masses[0].values, &window, BaselinePolicy::None).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(integration.area, 30.0);
    }

    #[test]
    fn test_integrate_channels_collects_results_and_failures() {
        let set = channels();
        let config = AnalysisConfig {
            baseline: BaselinePolicy::Fixed(10.0),
            photon_scale: 1.924e22,
            ..Default::default()
        };
        let mut results = ResultSet::new();

        let window = Window::from_seconds(0.0, 2.0).unwrap();
        let integrated = integrate_channels(&set, &window, &config, &mut results);
        assert_eq!(integrated.len(), 2);
        assert_eq!(
            results.get(&ChannelId::Mass("28.00".to_string())).unwrap().area,
            10.0
        );
        let fluence = results.get(&ChannelId::PhotonFlux).unwrap().area;
        assert!((fluence - 2.0 * 1e-12 * 1.924e22).abs() / fluence < 1e-12);

        let mut results = ResultSet::new();
        let outside = Window::from_seconds(3.0, 5.0).unwrap();
        let integrated = integrate_channels(&set, &outside, &config, &mut results);
        assert!(integrated.is_empty());
        assert_eq!(results.failures.len(), 2);
        assert!(results.failures[0].reason.contains("outside data range"));
    }
}
