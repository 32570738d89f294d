use std::fmt::Display;

use anyhow::{bail, Context, Result};
use log::{info, warn};
use serde::Serialize;

use rusty_pulsar::analysis::spectrum;
use rusty_pulsar::catalog::{self, SpectralLine};
use rusty_pulsar::data::{loader, model};
use rusty_pulsar::report;
use rusty_pulsar::AnalysisSettings;

use crate::cli::{Cli, Command, OutputFormat};

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

pub fn run(cli: Cli) -> Result<()> {
    let mut settings = match &cli.config {
        Some(path) => AnalysisSettings::from_file(path)?,
        None => AnalysisSettings::default(),
    };
    apply_overrides(&mut settings, &cli.command);
    settings.validate().context("invalid analysis settings")?;

    match cli.command {
        Command::Lightcurve { file, fold, .. } => {
            let mut series = loader::load_light_curve(&file)?;
            if !model::is_time_sorted(&series) {
                warn!("{}: sorting light curve by time", file.display());
                model::sort_by_time(&mut series);
            }
            let report = report::analyze_light_curve(&series, &settings, fold)
                .with_context(|| format!("analyzing {}", file.display()))?;
            emit(&report, cli.format)
        }
        Command::Spectrum { file, .. } => {
            let mut series = loader::load_spectrum(&file)?;
            model::sort_by_wavelength(&mut series);
            let report = report::analyze_spectrum(&series, &settings)
                .with_context(|| format!("analyzing {}", file.display()))?;
            emit(&report, cli.format)
        }
        Command::Transients { file, .. } => {
            let mut samples = loader::load_transient_samples(&file)?;
            model::sort_samples_by_time(&mut samples);
            let report = report::analyze_transients(&samples, &settings)
                .with_context(|| format!("analyzing {}", file.display()))?;
            emit(&report, cli.format)
        }
        Command::Lines { element } => {
            let lines: Vec<&'static SpectralLine> = match &element {
                Some(e) => catalog::lines_for(e).collect(),
                None => catalog::lines().iter().collect(),
            };
            if lines.is_empty() {
                bail!(
                    "no catalog lines for element '{}' (known: {})",
                    element.unwrap_or_default(),
                    catalog::elements().join(", ")
                );
            }
            emit(&LineTable(lines), cli.format)
        }
        Command::Redshift { observed, rest } => {
            if rest <= 0.0 {
                bail!("rest wavelength must be positive, got {rest}");
            }
            let z = spectrum::estimate_redshift(observed, rest);
            info!("redshift of {observed} Å against {rest} Å");
            match cli.format {
                OutputFormat::Text => println!("z = {z:.6}"),
                OutputFormat::Json => println!("{}", serde_json::json!({ "redshift": z })),
            }
            Ok(())
        }
    }
}

/// Command-line flags take precedence over the settings file.
fn apply_overrides(settings: &mut AnalysisSettings, command: &Command) {
    match command {
        Command::Lightcurve {
            window,
            sigma,
            min_period,
            max_period,
            ..
        } => {
            if let Some(w) = window {
                settings.smoothing_window = *w;
            }
            if let Some(s) = sigma {
                settings.sigma_threshold = *s;
            }
            if let Some(p) = min_period {
                settings.period_search.min_period = *p;
            }
            if let Some(p) = max_period {
                settings.period_search.max_period = *p;
            }
        }
        Command::Spectrum {
            threshold,
            tolerance,
            reference,
            ..
        } => {
            if let Some(t) = threshold {
                settings.peak_threshold = *t;
            }
            if let Some(t) = tolerance {
                settings.line_tolerance = *t;
            }
            if let Some(r) = reference {
                settings.redshift_reference = r.clone();
            }
        }
        Command::Transients {
            threshold_sigma,
            baseline_sigma,
            ..
        } => {
            if let Some(t) = threshold_sigma {
                settings.transient.threshold_sigma = *t;
            }
            if let Some(s) = baseline_sigma {
                settings.transient.baseline_sigma = *s;
            }
        }
        Command::Lines { .. } | Command::Redshift { .. } => {}
    }
}

fn emit<T: Serialize + Display>(report: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => println!("{report}"),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(report).context("serializing report")?;
            println!("{json}");
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Catalog listing
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(transparent)]
struct LineTable(Vec<&'static SpectralLine>);

impl Display for LineTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for line in &self.0 {
            if !first {
                writeln!(f)?;
            }
            first = false;
            write!(f, "{:<10} {:<14} {:>8.1} Å", line.element, line.name, line.rest_wavelength)?;
        }
        Ok(())
    }
}
