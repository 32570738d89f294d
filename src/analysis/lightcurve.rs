use std::f64::consts::PI;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::error::{AnalysisError, AnalysisResult};
use super::stats;
use crate::data::model::LightCurvePoint;

// ---------------------------------------------------------------------------
// Smoothing
// ---------------------------------------------------------------------------

/// Moving-average smoothing over a window of the *original* series.
///
/// The window around index `i` is `[i - floor(w/2), i + ceil(w/2))`, clipped
/// to the series bounds, so it shrinks near both edges. The smoothed error is
/// `mean(window errors) / sqrt(window length)`. Times are copied unchanged.
pub fn smooth(series: &[LightCurvePoint], window_size: usize) -> AnalysisResult<Vec<LightCurvePoint>> {
    if window_size == 0 {
        return Err(AnalysisError::invalid("smoothing window size must be positive"));
    }

    let n = series.len();
    let before = window_size / 2;
    let after = window_size.div_ceil(2);

    let smoothed = (0..n)
        .map(|i| {
            let window = &series[i.saturating_sub(before)..n.min(i + after)];
            let count = window.len() as f64;
            let magnitude = window.iter().map(|p| p.magnitude).sum::<f64>() / count;
            let error = window.iter().map(|p| p.error).sum::<f64>() / count / count.sqrt();
            LightCurvePoint::new(series[i].time, magnitude, error)
        })
        .collect();

    Ok(smoothed)
}

// ---------------------------------------------------------------------------
// Period detection
// ---------------------------------------------------------------------------

/// Trial-period grid for the periodogram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodSearch {
    pub min_period: f64,
    pub max_period: f64,
    pub trials: usize,
}

impl Default for PeriodSearch {
    fn default() -> Self {
        Self {
            min_period: 0.1,
            max_period: 10.0,
            trials: 1000,
        }
    }
}

impl PeriodSearch {
    pub fn validate(&self) -> AnalysisResult<()> {
        if !(self.min_period.is_finite() && self.max_period.is_finite()) {
            return Err(AnalysisError::invalid("period bounds must be finite"));
        }
        if self.min_period <= 0.0 {
            return Err(AnalysisError::invalid(format!(
                "minimum period must be positive, got {}",
                self.min_period
            )));
        }
        if self.min_period >= self.max_period {
            return Err(AnalysisError::invalid(format!(
                "minimum period {} must be below maximum period {}",
                self.min_period, self.max_period
            )));
        }
        if self.trials == 0 {
            return Err(AnalysisError::invalid("period search needs at least one trial"));
        }
        Ok(())
    }

    /// Spacing between consecutive trial periods.
    pub fn step(&self) -> f64 {
        (self.max_period - self.min_period) / self.trials as f64
    }

    /// Period of trial `i`. The grid starts at `min_period` and stops one
    /// step short of `max_period`.
    pub fn trial_period(&self, i: usize) -> f64 {
        self.min_period + (self.max_period - self.min_period) * (i as f64 / self.trials as f64)
    }
}

/// One point of the periodogram curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodogramSample {
    pub period: f64,
    pub power: f64,
}

/// Best period found by [`detect_period`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodResult {
    pub period: f64,
    pub power: f64,
}

/// Brute-force periodogram over the trial grid.
///
/// This is a simplified Lomb-Scargle: magnitudes are centred on their mean
/// once, and for each trial frequency `ω = 2π/P`
///
/// ```text
/// power = (Σ dev·cos ωt)² + (Σ dev·sin ωt)²  /  (2 · variance · n)
/// ```
///
/// with the population variance. There is no per-frequency time offset and
/// no floating mean, so the powers are not the normalized Lomb-Scargle
/// statistic and carry no false-alarm probability.
///
/// A series with zero variance yields zero power at every trial.
pub fn periodogram(
    series: &[LightCurvePoint],
    search: &PeriodSearch,
) -> AnalysisResult<Vec<PeriodogramSample>> {
    search.validate()?;

    let mags: Vec<f64> = series.iter().map(|p| p.magnitude).collect();
    let mean_mag = stats::mean(&mags)?;
    let variance = stats::variance(&mags)?;

    if variance == 0.0 || stats::is_constant(&mags) {
        warn!("periodogram: constant magnitudes over {} points, no periodic signal", series.len());
        return Ok((0..search.trials)
            .map(|i| PeriodogramSample {
                period: search.trial_period(i),
                power: 0.0,
            })
            .collect());
    }

    let norm = 2.0 * variance * series.len() as f64;
    let samples = (0..search.trials)
        .map(|i| {
            let period = search.trial_period(i);
            let omega = 2.0 * PI / period;

            let (sum_cos, sum_sin) = series.iter().fold((0.0, 0.0), |(c, s), p| {
                let phase = omega * p.time;
                let dev = p.magnitude - mean_mag;
                (c + dev * phase.cos(), s + dev * phase.sin())
            });

            PeriodogramSample {
                period,
                power: (sum_cos * sum_cos + sum_sin * sum_sin) / norm,
            }
        })
        .collect();

    Ok(samples)
}

/// Strongest period over the default grid (0.1 to 10, 1000 trials).
pub fn detect_period(series: &[LightCurvePoint]) -> AnalysisResult<PeriodResult> {
    detect_period_with(series, &PeriodSearch::default())
}

/// Strongest period over a custom grid.
///
/// Returns `{ period: 0, power: 0 }` when no trial has positive power,
/// which is always the case for a constant series.
pub fn detect_period_with(
    series: &[LightCurvePoint],
    search: &PeriodSearch,
) -> AnalysisResult<PeriodResult> {
    let best = periodogram(series, search)?.into_iter().fold(
        PeriodResult {
            period: 0.0,
            power: 0.0,
        },
        |best, sample| {
            if sample.power > best.power {
                PeriodResult {
                    period: sample.period,
                    power: sample.power,
                }
            } else {
                best
            }
        },
    );

    debug!(
        "detect_period: n={} best period={:.4} power={:.4}",
        series.len(),
        best.period,
        best.power
    );
    Ok(best)
}

// ---------------------------------------------------------------------------
// Phase folding
// ---------------------------------------------------------------------------

/// A light-curve point mapped onto one cycle of a period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhasePoint {
    /// Fraction of a cycle in `[0, 1)`.
    pub phase: f64,
    pub magnitude: f64,
    pub error: f64,
}

/// Fold the series at `period`, measuring phase from the earliest time.
/// Output keeps input order.
pub fn phase_fold(series: &[LightCurvePoint], period: f64) -> AnalysisResult<Vec<PhasePoint>> {
    if !(period.is_finite() && period > 0.0) {
        return Err(AnalysisError::invalid(format!(
            "fold period must be positive, got {period}"
        )));
    }

    let t_min = series.iter().map(|p| p.time).fold(f64::INFINITY, f64::min);
    Ok(series
        .iter()
        .map(|p| PhasePoint {
            phase: (p.time - t_min).rem_euclid(period) / period,
            magnitude: p.magnitude,
            error: p.error,
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Outliers and variability
// ---------------------------------------------------------------------------

/// Indices of points lying `sigma_threshold` standard deviations or more
/// from the mean magnitude (population standard deviation).
///
/// An empty series or one with zero scatter has no outliers.
pub fn detect_outliers(series: &[LightCurvePoint], sigma_threshold: f64) -> AnalysisResult<Vec<usize>> {
    if !(sigma_threshold.is_finite() && sigma_threshold > 0.0) {
        return Err(AnalysisError::invalid(format!(
            "sigma threshold must be positive, got {sigma_threshold}"
        )));
    }
    if series.is_empty() {
        return Ok(Vec::new());
    }

    let mags: Vec<f64> = series.iter().map(|p| p.magnitude).collect();
    let (mean, std) = stats::mean_std(&mags)?;
    if stats::is_constant(&mags) || std.is_nan() {
        return Ok(Vec::new());
    }

    let limit = sigma_threshold * std;
    let outliers: Vec<usize> = mags
        .iter()
        .enumerate()
        .filter(|(_, m)| (*m - mean).abs() >= limit)
        .map(|(i, _)| i)
        .collect();

    debug!(
        "detect_outliers: {} of {} points beyond {sigma_threshold} sigma",
        outliers.len(),
        series.len()
    );
    Ok(outliers)
}

/// The series without the points [`detect_outliers`] flags.
pub fn remove_outliers(
    series: &[LightCurvePoint],
    sigma_threshold: f64,
) -> AnalysisResult<Vec<LightCurvePoint>> {
    let outliers = detect_outliers(series, sigma_threshold)?;
    Ok(series
        .iter()
        .enumerate()
        .filter(|(i, _)| outliers.binary_search(i).is_err())
        .map(|(_, p)| *p)
        .collect())
}

/// Variability index: magnitude scatter over mean measurement error.
///
/// Values well above 1 mean the brightness varies more than the errors
/// explain. With zero mean error the index is `+∞` if the magnitudes
/// scatter and `0.0` if they do not.
pub fn variability(series: &[LightCurvePoint]) -> AnalysisResult<f64> {
    let mags: Vec<f64> = series.iter().map(|p| p.magnitude).collect();
    let errors: Vec<f64> = series.iter().map(|p| p.error).collect();

    let std = stats::std_dev(&mags)?;
    let mean_error = stats::mean(&errors)?;

    if mean_error == 0.0 {
        warn!("variability: mean measurement error is zero");
        return Ok(if stats::is_constant(&mags) { 0.0 } else { f64::INFINITY });
    }
    Ok(std / mean_error)
}
