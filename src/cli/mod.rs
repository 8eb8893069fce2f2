use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use qms_ice::config::AnalysisMode;

mod inspect;
mod run;

/// qms-ice - QMS signal integration for ice irradiation experiments
#[derive(Parser)]
#[command(name = "qms-ice")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Plot axis selection
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ModeArg {
    /// Signals against experiment time
    Time,
    /// Signals against temperature
    Temperature,
}

impl From<ModeArg> for AnalysisMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Time => AnalysisMode::Time,
            ModeArg::Temperature => AnalysisMode::Temperature,
        }
    }
}

/// Command-line overrides applied on top of the config file
#[derive(Debug, Default)]
pub struct RunOverrides {
    pub input: Option<PathBuf>,
    pub mode: Option<AnalysisMode>,
    pub masses: Option<Vec<String>>,
    pub range: Option<[f64; 2]>,
    pub photon_key: Option<String>,
    pub output: Option<PathBuf>,
    pub json: Option<PathBuf>,
    pub no_plots: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Integrate QMS signals and render plots
    Run {
        /// QMS data file (overrides qms_path)
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,

        /// Load settings from a TOML config file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Plot axis
        #[arg(short, long, value_enum)]
        mode: Option<ModeArg>,

        /// Comma-separated mass labels, e.g. 28.00,44.00
        #[arg(long, value_delimiter = ',')]
        masses: Option<Vec<String>>,

        /// Integration window in minutes
        #[arg(short, long, num_args = 2, value_names = ["START", "END"], allow_negative_numbers = true)]
        range: Option<Vec<f64>>,

        /// Photodiode current column
        #[arg(long, value_name = "COLUMN")]
        photon_key: Option<String>,

        /// Results text file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Also write a JSON summary
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,

        /// Skip all plot rendering
        #[arg(long)]
        no_plots: bool,
    },

    /// Display the columns and time span of a QMS file
    Inspect {
        /// QMS data file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Time column
        #[arg(long, default_value = "TimesExp")]
        time_key: String,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run {
            input,
            config,
            mode,
            masses,
            range,
            photon_key,
            output,
            json,
            no_plots,
        } => {
            let overrides = RunOverrides {
                input,
                mode: mode.map(AnalysisMode::from),
                masses,
                range: range.and_then(|r| match r.as_slice() {
                    [start, end] => Some([*start, *end]),
                    _ => None,
                }),
                photon_key,
                output,
                json,
                no_plots,
            };
            run::run(config, overrides)
        }
        Commands::Inspect { file, time_key } => inspect::run(file, &time_key),
    }
}
