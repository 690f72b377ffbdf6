//! Polynomial trend fitting for fit and detrend views.
//!
//! Times are made relative to the first epoch and scaled to `[-1, 1]` before
//! the least-squares solve so that second-degree fits over GPS-second epochs
//! stay well conditioned. Coefficients are reported in the unscaled relative
//! time, intercept first.

use std::fmt;
use std::str::FromStr;

use nalgebra::{DMatrix, DVector};
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::error::{EdaError, Result};
use crate::sample;

/// Highest degree offered to analysts.
pub const MAX_POLY_DEGREE: usize = 2;

/// Singular values below this fraction of the largest count as zero.
const RANK_TOLERANCE: f64 = 1e-10;

/// Trend correction applied to a series before display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendMode {
    #[default]
    None,
    /// Keep the series and overlay the fitted curve.
    Fit,
    /// Replace the series by its residuals.
    Detrend,
}

impl TrendMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Fit => "fit",
            Self::Detrend => "detrend",
        }
    }
}

impl fmt::Display for TrendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrendMode {
    type Err = EdaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "fit" => Ok(Self::Fit),
            "detrend" => Ok(Self::Detrend),
            other => Err(EdaError::InvalidParameter(format!(
                "unknown trend mode '{other}'"
            ))),
        }
    }
}

/// Least-squares polynomial fit of one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolyFit {
    /// `degree + 1` coefficients in relative time, intercept first.
    pub coefficients: Vec<f64>,
    /// Fitted values, one per input point.
    pub fitted: Vec<f64>,
    /// `y - fitted`.
    pub residuals: Vec<f64>,
    /// RMS of the residuals.
    pub rms: f64,
}

impl PolyFit {
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    pub fn intercept(&self) -> f64 {
        self.coefficients[0]
    }

    /// Evaluate the polynomial at a time relative to the first epoch.
    pub fn eval(&self, t: f64) -> f64 {
        self.coefficients.iter().rev().fold(0.0, |acc, &c| acc * t + c)
    }
}

/// Fit a polynomial of `degree` to `(x, y)`.
///
/// `x` is shifted so the first sample is at zero. Needs at least `degree + 1`
/// points and distinct enough epochs to determine every coefficient.
pub fn fit_polynomial(x: &[f64], y: &[f64], degree: usize) -> Result<PolyFit> {
    if x.len() != y.len() {
        return Err(EdaError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    sample::validate(x, "polynomial fit (x)")?;
    sample::validate(y, "polynomial fit (y)")?;
    let n_coeff = degree + 1;
    if x.len() < n_coeff {
        return Err(EdaError::InsufficientData {
            required: n_coeff,
            got: x.len(),
        });
    }

    let t: Vec<f64> = x.iter().map(|&xi| xi - x[0]).collect();
    let scale = t.iter().fold(0.0f64, |m, &ti| m.max(ti.abs()));
    let scale = if scale > 0.0 { scale } else { 1.0 };
    let u: Vec<f64> = t.iter().map(|&ti| ti / scale).collect();

    let design = DMatrix::from_fn(u.len(), n_coeff, |i, k| u[i].powi(k as i32));
    let scaled = solve_least_squares(design, y)?;

    let fitted: Vec<f64> = u
        .iter()
        .map(|&ui| scaled.iter().rev().fold(0.0, |acc, &c| acc * ui + c))
        .collect();
    let residuals: Vec<f64> = y.iter().zip(&fitted).map(|(&yi, &fi)| yi - fi).collect();
    let rms = (residuals.iter().map(|r| r * r).sum::<f64>() / residuals.len() as f64).sqrt();

    let coefficients = scaled
        .iter()
        .enumerate()
        .map(|(k, &c)| c / scale.powi(k as i32))
        .collect();

    Ok(PolyFit {
        coefficients,
        fitted,
        residuals,
        rms,
    })
}

/// Least-squares solve of `design * c = y` through the SVD. A design whose
/// numerical rank is below its column count has no unique solution.
fn solve_least_squares(design: DMatrix<f64>, y: &[f64]) -> Result<Vec<f64>> {
    let n_coeff = design.ncols();
    let svd = design.svd(true, true);
    let max_sv = svd.singular_values.iter().fold(0.0f64, |m, &v| m.max(v));
    let eps = RANK_TOLERANCE * max_sv.max(1.0);
    if svd.rank(eps) < n_coeff {
        return Err(EdaError::SingularFit);
    }
    let solution = svd
        .solve(&DVector::from_column_slice(y), eps)
        .map_err(|_| EdaError::SingularFit)?;
    Ok(solution.iter().copied().collect())
}

/// One row of the trend coefficient table.
///
/// Serializes as `ID`, `Intercept`, `Deg 1` .. `Deg d`, `RMS`.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendRow {
    pub id: String,
    pub intercept: f64,
    /// Coefficients for degree 1 and up.
    pub terms: Vec<f64>,
    pub rms: f64,
}

impl TrendRow {
    pub fn from_fit(id: impl Into<String>, fit: &PolyFit) -> Self {
        Self {
            id: id.into(),
            intercept: fit.intercept(),
            terms: fit.coefficients[1..].to_vec(),
            rms: fit.rms,
        }
    }

    /// Column names for a table of rows fitted with `degree`.
    pub fn columns(degree: usize) -> Vec<String> {
        let mut cols = vec!["ID".to_string(), "Intercept".to_string()];
        cols.extend((1..=degree).map(|d| format!("Deg {d}")));
        cols.push("RMS".to_string());
        cols
    }
}

impl Serialize for TrendRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.terms.len() + 3))?;
        map.serialize_entry("ID", &self.id)?;
        map.serialize_entry("Intercept", &self.intercept)?;
        for (i, c) in self.terms.iter().enumerate() {
            map.serialize_entry(&format!("Deg {}", i + 1), c)?;
        }
        map.serialize_entry("RMS", &self.rms)?;
        map.end()
    }
}
