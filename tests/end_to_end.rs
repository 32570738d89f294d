use rusty_pulsar::analysis::lightcurve::{detect_outliers, smooth, variability};
use rusty_pulsar::analysis::spectrum::{detect_peaks, estimate_redshift, identify_line, normalize};
use rusty_pulsar::analysis::transient::{detect_transients, Classification, TransientParams};
use rusty_pulsar::analysis::AnalysisError;
use rusty_pulsar::{LightCurvePoint, SpectrumPoint, TransientSample};

fn outlier_series() -> Vec<LightCurvePoint> {
    [10.0, 10.0, 15.0, 10.0, 10.0]
        .iter()
        .enumerate()
        .map(|(t, &m)| LightCurvePoint::new(t as f64, m, 0.1))
        .collect()
}

#[test]
fn outlier_scenario_flags_the_spike() {
    assert_eq!(detect_outliers(&outlier_series(), 2.0).unwrap(), vec![2]);
}

#[test]
fn redshift_scenario() {
    let z = estimate_redshift(6600.0, 6562.8);
    assert!((z - 0.00567).abs() < 1e-5, "z = {z}");
}

#[test]
fn transient_scenario_yields_one_nova() {
    let samples = vec![
        TransientSample::new(0.0, 15.5, 15.5),
        TransientSample::new(0.5, 13.0, 15.5),
        TransientSample::new(1.0, 15.5, 15.5),
    ];
    let params = TransientParams {
        threshold_sigma: 3.0,
        baseline_sigma: 0.2,
    };
    let candidates = detect_transients(&samples, &params).unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].classification, Classification::Nova);
    assert!((candidates[0].anomaly_score - 12.5).abs() < 1e-9);
    assert_eq!(candidates[0].time, 0.5);
}

#[test]
fn smoothing_then_statistics() {
    let series = outlier_series();
    let smoothed = smooth(&series, 3).unwrap();
    let times: Vec<f64> = smoothed.iter().map(|p| p.time).collect();
    assert_eq!(times, vec![0.0, 1.0, 2.0, 3.0, 4.0]);

    // Smoothing spreads the spike, lowering the scatter
    assert!(variability(&smoothed).unwrap() > 0.0);
    assert!(detect_outliers(&smoothed, 2.0).unwrap().len() <= 1);
}

#[test]
fn spectrum_pipeline_identifies_balmer_line() {
    let series: Vec<SpectrumPoint> = (4800..4920)
        .map(|w| {
            let w = w as f64;
            let flux = 1.0 + 10.0 * (-(w - 4861.3f64).powi(2) / 8.0).exp();
            SpectrumPoint::new(w, flux)
        })
        .collect();

    let normalized = normalize(&series);
    let max = normalized.iter().map(|p| p.flux).fold(f64::MIN, f64::max);
    assert_eq!(max, 1.0);

    let peaks = detect_peaks(&series, 0.3);
    assert_eq!(peaks.len(), 1);
    assert_eq!(
        identify_line(peaks[0].wavelength, 10.0).unwrap().as_deref(),
        Some("H-beta (hydrogen)")
    );
}

#[test]
fn empty_input_errors_are_descriptive() {
    let err = variability(&[]).unwrap_err();
    assert!(matches!(err, AnalysisError::DegenerateInput(_)));
    assert!(err.to_string().starts_with("Degenerate input"));
}
