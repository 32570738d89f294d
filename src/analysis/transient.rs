use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use super::error::{AnalysisError, AnalysisResult};
use crate::data::model::TransientSample;

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Qualitative event type of a baseline deviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// Strong brightening, more than 1.5 mag above baseline.
    Nova,
    /// Moderate brightening, more than 0.5 mag.
    Flare,
    /// Dimming by more than 0.8 mag.
    Eclipse,
    Unknown,
}

impl Classification {
    /// Fixed-threshold rules, checked in order. Magnitudes decrease as
    /// brightness increases.
    pub fn from_deviation(magnitude: f64, baseline: f64) -> Self {
        if magnitude < baseline - 1.5 {
            Classification::Nova
        } else if magnitude < baseline - 0.5 {
            Classification::Flare
        } else if magnitude > baseline + 0.8 {
            Classification::Eclipse
        } else {
            Classification::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Nova => "nova",
            Classification::Flare => "flare",
            Classification::Eclipse => "eclipse",
            Classification::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

/// Detection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransientParams {
    /// Deviation, in units of `baseline_sigma`, a point must exceed.
    pub threshold_sigma: f64,
    /// Expected scatter of quiet measurements around the baseline.
    pub baseline_sigma: f64,
}

impl Default for TransientParams {
    fn default() -> Self {
        Self {
            threshold_sigma: 3.0,
            baseline_sigma: 0.2,
        }
    }
}

impl TransientParams {
    pub fn validate(&self) -> AnalysisResult<()> {
        if !(self.baseline_sigma.is_finite() && self.baseline_sigma > 0.0) {
            return Err(AnalysisError::invalid(format!(
                "baseline sigma must be positive, got {}",
                self.baseline_sigma
            )));
        }
        if !(self.threshold_sigma.is_finite() && self.threshold_sigma >= 0.0) {
            return Err(AnalysisError::invalid(format!(
                "threshold sigma must be non-negative, got {}",
                self.threshold_sigma
            )));
        }
        Ok(())
    }
}

/// A point that deviates significantly from its baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransientCandidate {
    /// `TR-` followed by the zero-padded input index.
    pub id: String,
    pub index: usize,
    pub time: f64,
    pub magnitude: f64,
    pub baseline_magnitude: f64,
    /// Absolute deviation from the baseline.
    pub delta_magnitude: f64,
    /// `delta_magnitude / baseline_sigma`.
    pub anomaly_score: f64,
    pub classification: Classification,
}

/// Flag every sample whose deviation exceeds
/// `threshold_sigma * baseline_sigma`, classify it, and return the
/// candidates by descending anomaly score. Equal scores keep input order.
pub fn detect_transients(
    samples: &[TransientSample],
    params: &TransientParams,
) -> AnalysisResult<Vec<TransientCandidate>> {
    params.validate()?;

    let limit = params.threshold_sigma * params.baseline_sigma;
    let mut candidates: Vec<TransientCandidate> = samples
        .iter()
        .enumerate()
        .filter_map(|(index, s)| {
            let delta = (s.magnitude - s.baseline).abs();
            (delta > limit).then(|| TransientCandidate {
                id: format!("TR-{index:04}"),
                index,
                time: s.time,
                magnitude: s.magnitude,
                baseline_magnitude: s.baseline,
                delta_magnitude: delta,
                anomaly_score: delta / params.baseline_sigma,
                classification: Classification::from_deviation(s.magnitude, s.baseline),
            })
        })
        .collect();

    candidates.sort_by(|a, b| b.anomaly_score.total_cmp(&a.anomaly_score));

    debug!(
        "detect_transients: {} candidates in {} samples",
        candidates.len(),
        samples.len()
    );
    Ok(candidates)
}
