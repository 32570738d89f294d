use std::fmt;

use serde::Serialize;

use crate::analysis::lightcurve::{self, PeriodResult, PhasePoint};
use crate::analysis::spectrum::{self, IdentifiedPeak, RedshiftEstimate};
use crate::analysis::transient::{self, Classification, TransientCandidate};
use crate::analysis::AnalysisResult;
use crate::data::model::{LightCurvePoint, SpectrumPoint, TransientSample};
use crate::settings::AnalysisSettings;

// ---------------------------------------------------------------------------
// Light curve report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct LightCurveReport {
    pub n_points: usize,
    pub period: PeriodResult,
    /// `null` in JSON when the mean measurement error is zero.
    pub variability: f64,
    pub outliers: Vec<usize>,
    pub smoothed: Vec<LightCurvePoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folded: Option<Vec<PhasePoint>>,
}

/// Run every light-curve analyzer with the given settings. The fold is
/// only computed when requested and a period was found.
pub fn analyze_light_curve(
    series: &[LightCurvePoint],
    settings: &AnalysisSettings,
    fold: bool,
) -> AnalysisResult<LightCurveReport> {
    let period = lightcurve::detect_period_with(series, &settings.period_search)?;
    let folded = if fold && period.period > 0.0 {
        Some(lightcurve::phase_fold(series, period.period)?)
    } else {
        None
    };

    Ok(LightCurveReport {
        n_points: series.len(),
        period,
        variability: lightcurve::variability(series)?,
        outliers: lightcurve::detect_outliers(series, settings.sigma_threshold)?,
        smoothed: lightcurve::smooth(series, settings.smoothing_window)?,
        folded,
    })
}

impl fmt::Display for LightCurveReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Light curve: {} points", self.n_points)?;
        if self.period.power > 0.0 {
            writeln!(
                f,
                "  Period:      {:.4} (power {:.4})",
                self.period.period, self.period.power
            )?;
        } else {
            writeln!(f, "  Period:      none (flat series)")?;
        }
        writeln!(f, "  Variability: {:.3}", self.variability)?;
        writeln!(f, "  Outliers:    {} {:?}", self.outliers.len(), self.outliers)?;
        write!(f, "  Smoothed:    {} points", self.smoothed.len())?;
        if let Some(folded) = &self.folded {
            write!(f, "\n  Folded:      {} points", folded.len())?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Spectrum report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct SpectrumReport {
    pub n_points: usize,
    pub peaks: Vec<IdentifiedPeak>,
    pub redshift: Option<RedshiftEstimate>,
}

/// Detect and identify peaks, then estimate the redshift of the strongest
/// one against the configured reference line.
pub fn analyze_spectrum(
    series: &[SpectrumPoint],
    settings: &AnalysisSettings,
) -> AnalysisResult<SpectrumReport> {
    let reference = settings.reference_line()?;
    let peaks = spectrum::identify_peaks(series, settings.peak_threshold, settings.line_tolerance)?;

    let bare: Vec<spectrum::Peak> = peaks
        .iter()
        .map(|p| spectrum::Peak {
            wavelength: p.wavelength,
            flux: p.flux,
        })
        .collect();

    Ok(SpectrumReport {
        n_points: series.len(),
        redshift: spectrum::redshift_from_strongest_peak(&bare, reference),
        peaks,
    })
}

impl fmt::Display for SpectrumReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Spectrum: {} points, {} peaks", self.n_points, self.peaks.len())?;
        for peak in &self.peaks {
            writeln!(
                f,
                "  {:>10.2} Å  flux {:>12.4}  {}",
                peak.wavelength,
                peak.flux,
                peak.line.as_deref().unwrap_or("-")
            )?;
        }
        match &self.redshift {
            Some(z) => write!(
                f,
                "  Redshift:  z = {:.5} (strongest peak {:.2} Å as {} at {:.1} Å)",
                z.redshift, z.observed, z.line, z.rest
            ),
            None => write!(f, "  Redshift:  no peaks"),
        }
    }
}

// ---------------------------------------------------------------------------
// Transient report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct TransientReport {
    pub n_points: usize,
    pub candidates: Vec<TransientCandidate>,
}

impl TransientReport {
    pub fn count(&self, class: Classification) -> usize {
        self.candidates
            .iter()
            .filter(|c| c.classification == class)
            .count()
    }
}

pub fn analyze_transients(
    samples: &[TransientSample],
    settings: &AnalysisSettings,
) -> AnalysisResult<TransientReport> {
    Ok(TransientReport {
        n_points: samples.len(),
        candidates: transient::detect_transients(samples, &settings.transient)?,
    })
}

impl fmt::Display for TransientReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transients: {} candidates in {} points (nova {}, flare {}, eclipse {}, unknown {})",
            self.candidates.len(),
            self.n_points,
            self.count(Classification::Nova),
            self.count(Classification::Flare),
            self.count(Classification::Eclipse),
            self.count(Classification::Unknown),
        )?;
        for c in &self.candidates {
            write!(
                f,
                "\n  {}  t={:.3}  mag {:.3} (baseline {:.3}, Δ {:.3})  score {:.2}  {}",
                c.id,
                c.time,
                c.magnitude,
                c.baseline_magnitude,
                c.delta_magnitude,
                c.anomaly_score,
                c.classification
            )?;
        }
        Ok(())
    }
}
