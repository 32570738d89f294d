/// Analysis layer: stateless analyzers over in-memory series.
///
/// ```text
///   &[LightCurvePoint] ──▶ lightcurve  smooth · periodogram · outliers · variability
///   &[SpectrumPoint]   ──▶ spectrum    normalize · peaks · line id · redshift
///   &[TransientSample] ──▶ transient   deviation detection · classification
///                               │
///                               ▼
///                     AnalysisResult<T>  (error::AnalysisError)
/// ```
///
/// Every function is a pure, deterministic function of its arguments.

pub mod error;
pub mod lightcurve;
pub mod spectrum;
pub mod stats;
pub mod transient;

pub use error::{AnalysisError, AnalysisResult};
