use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// LightCurvePoint – one photometric measurement
// ---------------------------------------------------------------------------

/// A single brightness measurement of a light curve.
///
/// `magnitude` follows the astronomical convention: smaller is brighter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightCurvePoint {
    /// Observation time (e.g. Julian date offset).
    pub time: f64,
    pub magnitude: f64,
    /// 1-sigma uncertainty on `magnitude`, non-negative.
    #[serde(default)]
    pub error: f64,
}

impl LightCurvePoint {
    pub fn new(time: f64, magnitude: f64, error: f64) -> Self {
        Self {
            time,
            magnitude,
            error,
        }
    }
}

// ---------------------------------------------------------------------------
// SpectrumPoint – one wavelength bin
// ---------------------------------------------------------------------------

/// A flux sample at a wavelength in Ångströms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectrumPoint {
    pub wavelength: f64,
    pub flux: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<f64>,
}

impl SpectrumPoint {
    pub fn new(wavelength: f64, flux: f64) -> Self {
        Self {
            wavelength,
            flux,
            error: None,
        }
    }

    pub fn with_error(wavelength: f64, flux: f64, error: f64) -> Self {
        Self {
            wavelength,
            flux,
            error: Some(error),
        }
    }
}

// ---------------------------------------------------------------------------
// TransientSample – a measurement paired with its reference level
// ---------------------------------------------------------------------------

/// Input to the transient classifier: a magnitude and the baseline it is
/// compared against (constant, or a smoothed/modelled reference).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransientSample {
    pub time: f64,
    pub magnitude: f64,
    pub baseline: f64,
}

impl TransientSample {
    pub fn new(time: f64, magnitude: f64, baseline: f64) -> Self {
        Self {
            time,
            magnitude,
            baseline,
        }
    }
}

// ---------------------------------------------------------------------------
// Ordering helpers
// ---------------------------------------------------------------------------

/// Whether the series is already non-decreasing in time.
pub fn is_time_sorted(series: &[LightCurvePoint]) -> bool {
    series
        .windows(2)
        .all(|w| w[0].time.total_cmp(&w[1].time) != Ordering::Greater)
}

/// Stable sort by time. Smoothing works on input order, so callers that
/// read unsorted files sort here first.
pub fn sort_by_time(series: &mut [LightCurvePoint]) {
    series.sort_by(|a, b| a.time.total_cmp(&b.time));
}

/// Stable sort by time for transient samples.
pub fn sort_samples_by_time(samples: &mut [TransientSample]) {
    samples.sort_by(|a, b| a.time.total_cmp(&b.time));
}

/// Stable sort by wavelength.
pub fn sort_by_wavelength(series: &mut [SpectrumPoint]) {
    series.sort_by(|a, b| a.wavelength.total_cmp(&b.wavelength));
}
