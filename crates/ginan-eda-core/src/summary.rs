//! Summary statistics for the tabular view: RMS, mean and standard deviation.

use log::debug;
use serde::Serialize;

use crate::error::Result;
use crate::sample::{self, concat};

/// One row of the summary table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "RMS")]
    pub rms: f64,
    #[serde(rename = "Mean")]
    pub mean: f64,
    /// Population standard deviation (divides by N, not N-1).
    #[serde(rename = "Std")]
    pub std: f64,
}

/// Compute RMS, mean and population standard deviation of a sample.
///
/// `sample` must be non-empty and finite. Integer or categorical series are
/// excluded by the caller before they get here.
pub fn compute_summary(id: &str, sample: &[f64]) -> Result<SummaryStats> {
    sample::validate(sample, "summary statistics")?;

    let n = sample.len() as f64;
    let mean = sample::mean(sample);
    let std = sample::population_variance(sample, mean).sqrt();
    let rms = (sample.iter().map(|&x| x * x).sum::<f64>() / n).sqrt();

    Ok(SummaryStats {
        id: id.to_string(),
        rms,
        mean,
        std,
    })
}

/// Summary of several series pooled into one sample (aggregate mode).
pub fn compute_aggregate_summary<S: AsRef<[f64]>>(id: &str, samples: &[S]) -> Result<SummaryStats> {
    let pooled = concat(samples);
    debug!(
        "aggregate summary '{id}': {} series, {} points",
        samples.len(),
        pooled.len()
    );
    compute_summary(id, &pooled)
}
