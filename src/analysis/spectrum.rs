use log::{debug, warn};
use serde::Serialize;

use super::error::{AnalysisError, AnalysisResult};
use crate::catalog::{self, SpectralLine};
use crate::data::model::SpectrumPoint;

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Divide every flux (and error) by the maximum flux.
///
/// A maximum of exactly zero leaves the series unchanged; a negative
/// maximum is divided through as-is.
pub fn normalize(series: &[SpectrumPoint]) -> Vec<SpectrumPoint> {
    let max_flux = series.iter().map(|p| p.flux).fold(f64::NEG_INFINITY, f64::max);

    let scale = if max_flux == 0.0 {
        warn!("normalize: maximum flux is zero, leaving spectrum unscaled");
        1.0
    } else {
        if max_flux < 0.0 {
            warn!("normalize: maximum flux {max_flux} is negative");
        }
        max_flux
    };

    series
        .iter()
        .map(|p| SpectrumPoint {
            wavelength: p.wavelength,
            flux: p.flux / scale,
            error: p.error.map(|e| e / scale),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Peak detection
// ---------------------------------------------------------------------------

/// A local maximum of a spectrum, in original (unnormalized) units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Peak {
    pub wavelength: f64,
    pub flux: f64,
}

/// Local maxima whose normalized flux exceeds `threshold`.
///
/// A point at index `i` is a peak when it is strictly higher than the two
/// points on either side, so the first and last two samples never qualify.
pub fn detect_peaks(series: &[SpectrumPoint], threshold: f64) -> Vec<Peak> {
    let n = series.len();
    if n < 5 {
        return Vec::new();
    }

    let normalized = normalize(series);
    let flux = |i: usize| normalized[i].flux;

    let peaks: Vec<Peak> = (2..n - 2)
        .filter(|&i| {
            let current = flux(i);
            current > threshold
                && [i - 2, i - 1, i + 1, i + 2]
                    .iter()
                    .all(|&j| current > flux(j))
        })
        .map(|i| Peak {
            wavelength: series[i].wavelength,
            flux: series[i].flux,
        })
        .collect();

    debug!("detect_peaks: {} peaks above {threshold} in {n} points", peaks.len());
    peaks
}

// ---------------------------------------------------------------------------
// Line identification
// ---------------------------------------------------------------------------

/// First catalog line within `tolerance` Å of `wavelength`.
///
/// Lines are scanned in catalog order and the first hit wins, even when a
/// later line is closer.
pub fn identify_line_entry(
    wavelength: f64,
    tolerance: f64,
) -> AnalysisResult<Option<&'static SpectralLine>> {
    if !(tolerance.is_finite() && tolerance > 0.0) {
        return Err(AnalysisError::invalid(format!(
            "line tolerance must be positive, got {tolerance}"
        )));
    }
    Ok(catalog::lines()
        .iter()
        .find(|line| (wavelength - line.rest_wavelength).abs() < tolerance))
}

/// Like [`identify_line_entry`], formatted as `"{name} ({element})"`.
pub fn identify_line(wavelength: f64, tolerance: f64) -> AnalysisResult<Option<String>> {
    identify_line_entry(wavelength, tolerance).map(|hit| hit.map(ToString::to_string))
}

/// A detected peak with its catalog identification, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdentifiedPeak {
    pub wavelength: f64,
    pub flux: f64,
    pub line: Option<String>,
}

/// Detect peaks and match each against the catalog.
pub fn identify_peaks(
    series: &[SpectrumPoint],
    threshold: f64,
    tolerance: f64,
) -> AnalysisResult<Vec<IdentifiedPeak>> {
    detect_peaks(series, threshold)
        .into_iter()
        .map(|peak| {
            Ok(IdentifiedPeak {
                wavelength: peak.wavelength,
                flux: peak.flux,
                line: identify_line(peak.wavelength, tolerance)?,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Redshift
// ---------------------------------------------------------------------------

/// `z = (observed - rest) / rest`. `rest` must be positive; it is not checked.
pub fn estimate_redshift(observed: f64, rest: f64) -> f64 {
    (observed - rest) / rest
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RedshiftEstimate {
    /// Reference line, formatted as `"{name} ({element})"`.
    pub line: String,
    pub observed: f64,
    pub rest: f64,
    pub redshift: f64,
}

/// Treat the highest-flux peak as `line` shifted and estimate its redshift.
pub fn redshift_from_strongest_peak(peaks: &[Peak], line: &SpectralLine) -> Option<RedshiftEstimate> {
    let strongest = peaks.iter().max_by(|a, b| a.flux.total_cmp(&b.flux))?;
    Some(RedshiftEstimate {
        line: line.to_string(),
        observed: strongest.wavelength,
        rest: line.rest_wavelength,
        redshift: estimate_redshift(strongest.wavelength, line.rest_wavelength),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
        amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
    }

    /// Flat continuum with emission lines `(center, width, amplitude)`.
    fn emission_spectrum(lines: &[(f64, f64, f64)]) -> Vec<SpectrumPoint> {
        (3600..=7000)
            .map(|w| {
                let w = w as f64;
                let flux = 5.0 + lines.iter().map(|&(mu, s, a)| gaussian(w, mu, s, a)).sum::<f64>();
                SpectrumPoint::with_error(w, flux, 0.05 * flux.sqrt())
            })
            .collect()
    }

    #[test]
    fn test_normalize_scales_flux_and_error() {
        let series = vec![
            SpectrumPoint::with_error(4000.0, 2.0, 0.2),
            SpectrumPoint::new(4001.0, 8.0),
            SpectrumPoint::with_error(4002.0, 4.0, 0.4),
        ];
        let normalized = normalize(&series);
        assert_eq!(normalized[0].flux, 0.25);
        assert_eq!(normalized[0].error, Some(0.025));
        assert_eq!(normalized[1].flux, 1.0);
        assert_eq!(normalized[1].error, None);
        assert_eq!(normalized[2].wavelength, 4002.0);
    }

    #[test]
    fn test_normalize_degenerate_maximum() {
        let zeros = vec![SpectrumPoint::new(1.0, 0.0), SpectrumPoint::new(2.0, -1.0)];
        assert_eq!(normalize(&zeros), zeros);

        let negative = vec![SpectrumPoint::new(1.0, -2.0), SpectrumPoint::new(2.0, -4.0)];
        let normalized = normalize(&negative);
        assert_eq!(normalized[0].flux, 1.0);
        assert_eq!(normalized[1].flux, 2.0);

        assert!(normalize(&[]).is_empty());
    }

    #[test]
    fn test_detect_peaks_on_emission_lines() {
        let series = emission_spectrum(&[(4861.3, 3.0, 80.0), (5006.8, 3.0, 180.0), (6562.8, 4.0, 250.0)]);
        let peaks = detect_peaks(&series, 0.3);

        let wavelengths: Vec<f64> = peaks.iter().map(|p| p.wavelength).collect();
        assert_eq!(wavelengths, vec![4861.0, 5007.0, 6563.0]);
        // Values come from the unnormalized series
        assert!(peaks[2].flux > 250.0);
    }

    #[test]
    fn test_detect_peaks_threshold_filters_weak_lines() {
        let series = emission_spectrum(&[(4861.3, 3.0, 40.0), (6562.8, 4.0, 250.0)]);
        let peaks = detect_peaks(&series, 0.3);
        assert_eq!(peaks.len(), 1);
        assert_eq!(peaks[0].wavelength, 6563.0);
    }

    #[test]
    fn test_detect_peaks_ignores_edges_and_plateaus() {
        let flux = [9.0, 1.0, 2.0, 5.0, 5.0, 2.0, 1.0, 9.0];
        let series: Vec<SpectrumPoint> = flux
            .iter()
            .enumerate()
            .map(|(i, &f)| SpectrumPoint::new(i as f64, f))
            .collect();
        assert!(detect_peaks(&series, 0.1).is_empty());
        assert!(detect_peaks(&series[..4], 0.1).is_empty());
    }

    #[test]
    fn test_identify_line_first_match_wins() {
        // [N II] 6548 is closer, but H-alpha is declared first
        assert_eq!(
            identify_line(6555.0, 10.0).unwrap().as_deref(),
            Some("H-alpha (hydrogen)")
        );
        assert_eq!(
            identify_line(6548.0, 1.0).unwrap().as_deref(),
            Some("[N II] 6548 (nitrogen)")
        );
        assert_eq!(identify_line(8000.0, 10.0).unwrap(), None);
    }

    #[test]
    fn test_identify_line_rejects_bad_tolerance() {
        assert!(matches!(identify_line(6563.0, 0.0), Err(AnalysisError::InvalidArgument(_))));
        assert!(identify_line(6563.0, -5.0).is_err());
    }

    #[test]
    fn test_identify_peaks() {
        let series = emission_spectrum(&[(5006.8, 3.0, 180.0), (6300.0, 3.0, 150.0)]);
        let peaks = identify_peaks(&series, 0.3, 10.0).unwrap();
        assert_eq!(peaks.len(), 2);
        assert_eq!(peaks[0].line.as_deref(), Some("[O III] 5007 (oxygen)"));
        assert_eq!(peaks[1].line, None);
    }

    #[test]
    fn test_estimate_redshift() {
        assert!((estimate_redshift(6600.0, 6562.8) - 0.00567).abs() < 1e-5);
        assert_eq!(estimate_redshift(6562.8, 6562.8), 0.0);
    }

    #[test]
    fn test_redshift_from_strongest_peak() {
        let h_alpha = catalog::find("H-alpha").unwrap();
        let peaks = vec![
            Peak { wavelength: 5833.6, flux: 40.0 },
            Peak { wavelength: 7875.4, flux: 60.0 },
        ];
        let estimate = redshift_from_strongest_peak(&peaks, h_alpha).unwrap();
        assert_eq!(estimate.observed, 7875.4);
        assert!((estimate.redshift - 0.2).abs() < 1e-4);
        assert!(redshift_from_strongest_peak(&[], h_alpha).is_none());
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(
            flux in prop::collection::vec(0.0f64..1e6, 1..100),
        ) {
            let series: Vec<SpectrumPoint> = flux
                .iter()
                .enumerate()
                .map(|(i, &f)| SpectrumPoint::with_error(4000.0 + i as f64, f, 0.01 * f))
                .collect();
            let once = normalize(&series);
            let twice = normalize(&once);
            for (a, b) in once.iter().zip(&twice) {
                prop_assert!((a.flux - b.flux).abs() <= 1e-12);
            }
            if flux.iter().any(|&f| f > 0.0) {
                let max = once.iter().map(|p| p.flux).fold(f64::NEG_INFINITY, f64::max);
                prop_assert_eq!(max, 1.0);
            }
        }
    }
}
