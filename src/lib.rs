//! Signal analysis for astronomical light curves and spectra.
//!
//! The [`analysis`] module holds the analyzers: light-curve smoothing,
//! period search, outlier and variability statistics; spectrum
//! normalization, peak finding, line identification and redshift; and
//! transient classification against a baseline. [`catalog`] is the static
//! table of reference lines. [`data`] and [`report`] support the
//! command-line driver.

pub mod analysis;
pub mod catalog;
pub mod data;
pub mod report;
pub mod settings;

#[cfg(test)]
mod testutil;

pub use analysis::{AnalysisError, AnalysisResult};
pub use data::model::{LightCurvePoint, SpectrumPoint, TransientSample};
pub use settings::AnalysisSettings;
