//! Quantile-quantile comparison of a sample against the standard normal.
//!
//! [`compute_qq`] standardizes the sample, shuffles it, keeps the first
//! `sample_size` values and sorts them. The reference axis is an independent
//! draw of `sample_size` standard-normal values, also sorted. Both the shuffle
//! and the reference draw consume the caller's generator, so output is only
//! reproducible when the caller seeds it.
//!
//! ```
//! use ginan_eda_core::compute_qq;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let residuals = [0.3, -1.2, 0.8, 0.1, -0.4, 1.9, -0.7];
//! let qq = compute_qq(&residuals, residuals.len(), &mut rng).unwrap();
//! assert_eq!(qq.len(), residuals.len());
//! ```

use rand::Rng;
use rand::distr::Open01;
use rand::seq::SliceRandom;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::{EdaError, Result};
use crate::sample;

/// One point of a QQ plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuantilePair {
    pub sample_quantile: f64,
    pub theoretical_quantile: f64,
}

/// Ordered QQ points; both axes are non-decreasing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct QqResult {
    pairs: Vec<QuantilePair>,
}

impl QqResult {
    pub fn pairs(&self) -> &[QuantilePair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn sample_quantiles(&self) -> Vec<f64> {
        self.pairs.iter().map(|p| p.sample_quantile).collect()
    }

    pub fn theoretical_quantiles(&self) -> Vec<f64> {
        self.pairs.iter().map(|p| p.theoretical_quantile).collect()
    }

    /// The y = x guide drawn over aggregated QQ plots: a segment from the
    /// first to the last sample quantile. It is not fitted to the points, so
    /// both ends lie on the identity line whatever the theoretical axis holds.
    pub fn reference_line(&self) -> Option<[(f64, f64); 2]> {
        let first = self.pairs.first()?.sample_quantile;
        let last = self.pairs.last()?.sample_quantile;
        Some([(first, first), (last, last)])
    }

    /// Pearson correlation between the two axes. Close to 1.0 when the sample
    /// looks normal. Returns 0.0 when either axis is constant.
    pub fn correlation(&self) -> f64 {
        let n = self.pairs.len() as f64;
        if self.pairs.is_empty() {
            return 0.0;
        }
        let mean_s = self.pairs.iter().map(|p| p.sample_quantile).sum::<f64>() / n;
        let mean_t = self.pairs.iter().map(|p| p.theoretical_quantile).sum::<f64>() / n;

        let mut cov = 0.0;
        let mut var_s = 0.0;
        let mut var_t = 0.0;
        for p in &self.pairs {
            let ds = p.sample_quantile - mean_s;
            let dt = p.theoretical_quantile - mean_t;
            cov += ds * dt;
            var_s += ds * ds;
            var_t += dt * dt;
        }

        let denom = (var_s * var_t).sqrt();
        if denom < 1e-12 { 0.0 } else { cov / denom }
    }
}

/// Build QQ-plot data for `sample` using `sample_size` points.
///
/// Not deterministic: the permutation and the normal reference draw both come
/// from `rng`. Fails on an empty or non-finite sample, on a constant sample
/// (zero standard deviation), and when `sample_size` is zero or larger than
/// the sample.
pub fn compute_qq<R: Rng + ?Sized>(
    sample: &[f64],
    sample_size: usize,
    rng: &mut R,
) -> Result<QqResult> {
    sample::validate(sample, "QQ computation")?;
    if sample_size == 0 || sample_size > sample.len() {
        return Err(EdaError::SampleSizeOutOfRange {
            requested: sample_size,
            available: sample.len(),
        });
    }

    let mean = sample::mean(sample);
    let std = sample::population_variance(sample, mean).sqrt();
    if std == 0.0 || sample::is_constant(sample) {
        return Err(EdaError::ZeroVariance);
    }

    let mut standardized: Vec<f64> = sample.iter().map(|&x| (x - mean) / std).collect();
    standardized.shuffle(rng);
    standardized.truncate(sample_size);
    standardized.sort_by(f64::total_cmp);

    let mut reference = standard_normal_draws(sample_size, rng)?;
    reference.sort_by(f64::total_cmp);

    let pairs = standardized
        .into_iter()
        .zip(reference)
        .map(|(sample_quantile, theoretical_quantile)| QuantilePair {
            sample_quantile,
            theoretical_quantile,
        })
        .collect();

    Ok(QqResult { pairs })
}

/// Draw `n` standard-normal values by inverse-transform sampling.
fn standard_normal_draws<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Result<Vec<f64>> {
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| EdaError::InvalidParameter(format!("standard normal: {e}")))?;
    // Open01 excludes 0 and 1, where the inverse CDF is infinite.
    Ok((0..n)
        .map(|_| normal.inverse_cdf(rng.sample::<f64, _>(Open01)))
        .collect())
}
