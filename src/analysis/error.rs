// ---------------------------------------------------------------------------
// AnalysisError – the only error type the analyzers return
// ---------------------------------------------------------------------------

/// Failure modes shared by every analyzer.
///
/// * `InvalidArgument` – a parameter is out of its domain (window size,
///   tolerance, period bounds, thresholds).
/// * `DegenerateInput` – a statistic was requested over data that cannot
///   support it, e.g. the mean of an empty series.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Degenerate input: {0}")]
    DegenerateInput(String),
}

impl AnalysisError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        AnalysisError::InvalidArgument(msg.into())
    }

    pub fn degenerate(msg: impl Into<String>) -> Self {
        AnalysisError::DegenerateInput(msg.into())
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
