use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use qms_ice::config::AnalysisConfig;
use qms_ice::pipeline;

use super::RunOverrides;

/// Run one analysis
pub fn run(config_path: Option<PathBuf>, overrides: RunOverrides) -> Result<()> {
    let mut config = match &config_path {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            AnalysisConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?
        }
        None => AnalysisConfig::default(),
    };
    apply_overrides(&mut config, overrides);

    info!("qms-ice analysis");
    info!("================");
    if let Some(input) = &config.qms_path {
        info!("Input: {}", input.display());
    }
    info!("Mode:  {}", config.analysis_mode);

    let report = pipeline::run(&config).context("Analysis failed")?;

    #[cfg(feature = "colorized_output")]
    {
        print!("{}", report.results.format_colored());
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        print!("{}", report.results);
    }

    if let Some(path) = &report.results_file {
        println!("Integration results saved to: {}", path.display());
    }
    if let Some(path) = &report.results_json {
        println!("JSON summary saved to: {}", path.display());
    }
    if config.show_plots {
        for plot in &report.plots {
            println!("Plot: {}", plot.display());
        }
    }
    for error in &report.plot_errors {
        eprintln!("Plot error: {}", error);
    }

    Ok(())
}

fn apply_overrides(config: &mut AnalysisConfig, overrides: RunOverrides) {
    if let Some(input) = overrides.input {
        config.qms_path = Some(input);
    }
    if let Some(mode) = overrides.mode {
        config.analysis_mode = mode;
    }
    if let Some(masses) = overrides.masses {
        config.masses = masses;
    }
    if let Some(range) = overrides.range {
        config.integration_range = Some(range);
    }
    if let Some(key) = overrides.photon_key {
        config.photon_key = Some(key);
    }
    if let Some(output) = overrides.output {
        config.integration_results_file = output;
    }
    if let Some(json) = overrides.json {
        config.results_json = Some(json);
    }
    if overrides.no_plots {
        config.save_plots = false;
        config.show_plots = false;
    }
}
