//! Numeric samples: validation, leading-point exclusion and pooling.
//!
//! A sample is a plain `&[f64]` that is already time ordered. The helpers here
//! are the small amount of marshaling that happens between a series lookup and
//! the statistics engines: trimming the first `N` points the analyst asked to
//! exclude, pooling several series into one sample for aggregate mode, and the
//! shared moment computations.

use crate::error::{EdaError, Result};

/// Check that a sample is non-empty and contains only finite values.
pub fn validate(sample: &[f64], context: &'static str) -> Result<()> {
    if sample.is_empty() {
        return Err(EdaError::EmptySample { context });
    }
    if let Some((index, &value)) = sample.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(EdaError::NonFiniteValue { index, value });
    }
    Ok(())
}

/// Arithmetic mean. Caller guarantees a non-empty sample.
pub(crate) fn mean(sample: &[f64]) -> f64 {
    sample.iter().sum::<f64>() / sample.len() as f64
}

/// Population variance (divide by N) around a precomputed mean.
pub(crate) fn population_variance(sample: &[f64], mean: f64) -> f64 {
    sample.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / sample.len() as f64
}

/// True when every value equals the first one.
///
/// Rounding in the mean can leave a constant sample with a tiny non-zero
/// variance, so constancy is checked on the values themselves.
pub(crate) fn is_constant(sample: &[f64]) -> bool {
    sample.iter().all(|&x| x == sample[0])
}

/// Parse the "exclude the first N points" input.
///
/// Anything that does not parse as an integer, and any negative count, is
/// treated as zero.
pub fn parse_exclude_count(text: &str) -> usize {
    match text.trim().parse::<i64>() {
        Ok(n) if n > 0 => n as usize,
        _ => 0,
    }
}

/// Drop the first `exclude` points. Excluding more points than exist yields an
/// empty slice rather than panicking.
pub fn trim_leading(values: &[f64], exclude: usize) -> &[f64] {
    &values[exclude.min(values.len())..]
}

/// Pool several samples into one for aggregate mode.
///
/// Order of the pooled values is irrelevant to every consumer; this is plain
/// concatenation.
pub fn concat<S: AsRef<[f64]>>(samples: &[S]) -> Vec<f64> {
    let total = samples.iter().map(|s| s.as_ref().len()).sum();
    let mut pooled = Vec::with_capacity(total);
    for s in samples {
        pooled.extend_from_slice(s.as_ref());
    }
    pooled
}
