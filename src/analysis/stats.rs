use super::error::{AnalysisError, AnalysisResult};

// ---------------------------------------------------------------------------
// Descriptive statistics over plain f64 slices
// ---------------------------------------------------------------------------

/// Arithmetic mean. Fails on an empty slice instead of returning NaN.
pub fn mean(values: &[f64]) -> AnalysisResult<f64> {
    if values.is_empty() {
        return Err(AnalysisError::degenerate("mean of an empty sequence"));
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population variance (divides by `n`, not `n - 1`).
pub fn variance(values: &[f64]) -> AnalysisResult<f64> {
    let mu = mean(values)?;
    Ok(variance_about(values, mu))
}

/// Population standard deviation.
pub fn std_dev(values: &[f64]) -> AnalysisResult<f64> {
    variance(values).map(f64::sqrt)
}

/// Mean and population standard deviation in one pass over the mean.
pub fn mean_std(values: &[f64]) -> AnalysisResult<(f64, f64)> {
    let mu = mean(values)?;
    Ok((mu, variance_about(values, mu).sqrt()))
}

/// True when every value equals the first. Rounding in the mean can leave a
/// tiny non-zero variance for such input, so flatness is tested directly.
pub fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

fn variance_about(values: &[f64], mu: f64) -> f64 {
    values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / values.len() as f64
}
