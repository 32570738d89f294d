use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Light curve and spectrum analysis.
#[derive(Debug, Parser)]
#[command(name = "rusty-pulsar", version, about)]
pub struct Cli {
    /// JSON settings file; flags below override its values.
    #[arg(long, global = true, env = "RUSTY_PULSAR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Smooth, search for a period, flag outliers and measure variability
    Lightcurve {
        /// .csv, .json or .parquet with time, magnitude[, error]
        file: PathBuf,
        /// Smoothing window size
        #[arg(long)]
        window: Option<usize>,
        /// Outlier threshold in standard deviations
        #[arg(long)]
        sigma: Option<f64>,
        /// Shortest trial period
        #[arg(long)]
        min_period: Option<f64>,
        /// Longest trial period
        #[arg(long)]
        max_period: Option<f64>,
        /// Phase-fold the series at the detected period
        #[arg(long)]
        fold: bool,
    },
    /// Detect and identify spectral peaks and estimate redshift
    Spectrum {
        /// .csv, .json or .parquet with wavelength, flux[, error]
        file: PathBuf,
        /// Minimum normalized flux of a peak
        #[arg(long)]
        threshold: Option<f64>,
        /// Line identification tolerance in Ångströms
        #[arg(long)]
        tolerance: Option<f64>,
        /// Catalog line assumed for the strongest peak
        #[arg(long)]
        reference: Option<String>,
    },
    /// Find and classify deviations from a baseline
    Transients {
        /// .csv, .json or .parquet with time, magnitude, baseline
        file: PathBuf,
        #[arg(long)]
        threshold_sigma: Option<f64>,
        #[arg(long)]
        baseline_sigma: Option<f64>,
    },
    /// List the spectral line catalog
    Lines {
        /// Only lines of this element
        #[arg(long)]
        element: Option<String>,
    },
    /// Redshift from an observed and a rest wavelength
    Redshift { observed: f64, rest: f64 },
}
