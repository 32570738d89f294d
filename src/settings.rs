use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::analysis::lightcurve::PeriodSearch;
use crate::analysis::transient::TransientParams;
use crate::analysis::{AnalysisError, AnalysisResult};
use crate::catalog::{self, SpectralLine};

// ---------------------------------------------------------------------------
// Analysis settings
// ---------------------------------------------------------------------------

/// Every tunable analysis parameter, independent of how it was supplied.
///
/// Missing keys in a settings file fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Moving-average window for light-curve smoothing.
    pub smoothing_window: usize,
    /// Outlier cut in standard deviations.
    pub sigma_threshold: f64,
    pub period_search: PeriodSearch,
    /// Minimum normalized flux for a spectral peak.
    pub peak_threshold: f64,
    /// Line identification tolerance in Ångströms.
    pub line_tolerance: f64,
    pub transient: TransientParams,
    /// Catalog line the strongest spectral peak is assumed to be.
    pub redshift_reference: String,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            smoothing_window: 5,
            sigma_threshold: 3.0,
            period_search: PeriodSearch::default(),
            peak_threshold: 0.3,
            line_tolerance: 10.0,
            transient: TransientParams::default(),
            redshift_reference: "H-alpha".to_string(),
        }
    }
}

impl AnalysisSettings {
    /// Read settings from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings file {}", path.display()))?;
        let settings: AnalysisSettings =
            serde_json::from_str(&text).context("parsing settings JSON")?;
        Ok(settings)
    }

    /// Check every parameter, reporting the first invalid one.
    pub fn validate(&self) -> AnalysisResult<()> {
        if self.smoothing_window == 0 {
            return Err(AnalysisError::invalid("smoothing window must be positive"));
        }
        if !(self.sigma_threshold.is_finite() && self.sigma_threshold > 0.0) {
            return Err(AnalysisError::invalid(format!(
                "sigma threshold must be positive, got {}",
                self.sigma_threshold
            )));
        }
        self.period_search.validate()?;
        if !self.peak_threshold.is_finite() {
            return Err(AnalysisError::invalid("peak threshold must be finite"));
        }
        if !(self.line_tolerance.is_finite() && self.line_tolerance > 0.0) {
            return Err(AnalysisError::invalid(format!(
                "line tolerance must be positive, got {}",
                self.line_tolerance
            )));
        }
        self.transient.validate()?;
        self.reference_line()?;
        Ok(())
    }

    /// The catalog entry named by `redshift_reference`.
    pub fn reference_line(&self) -> AnalysisResult<&'static SpectralLine> {
        catalog::find(&self.redshift_reference).ok_or_else(|| {
            AnalysisError::invalid(format!(
                "unknown reference line '{}'",
                self.redshift_reference
            ))
        })
    }
}
