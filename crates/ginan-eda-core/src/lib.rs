//! # ginan-eda-core
//!
//! Exploratory statistics for GNSS analytics series.
//!
//! Given measurement or filter-state series selected by site, satellite and
//! key, this crate produces the numbers behind the exploration views:
//!
//! - QQ-plot data of a standardized sample against the standard normal
//!   ([`compute_qq`]);
//! - RMS, mean and population standard deviation per series or per pooled
//!   group ([`compute_summary`]);
//! - least-squares polynomial trends in fit or detrend mode
//!   ([`fit_polynomial`]).
//!
//! ## Quick Start
//!
//! ```
//! use ginan_eda_core::{compute_qq, compute_summary};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let residuals = [0.12, -0.31, 0.05, 0.44, -0.18, -0.02, 0.27];
//!
//! let stats = compute_summary("ALIC-G01", &residuals).unwrap();
//! assert!(stats.rms >= stats.std);
//!
//! // QQ data consumes randomness; pass a seeded generator for repeatable output.
//! let mut rng = StdRng::seed_from_u64(2024);
//! let qq = compute_qq(&residuals, residuals.len(), &mut rng).unwrap();
//! assert_eq!(qq.len(), residuals.len());
//! ```
//!
//! ## Architecture
//!
//! Dataset lookup → selection / exclusion trimming → engines → report
//!
//! The engines ([`qq`], [`summary`], [`trend`]) are pure functions over
//! `&[f64]`. The [`explore`] workflows do the marshaling between a
//! [`Dataset`] and the engines and return serializable reports.

pub mod dataset;
pub mod error;
pub mod explore;
pub mod qq;
pub mod sample;
pub mod selection;
pub mod summary;
pub mod trend;

pub use dataset::{Collection, Dataset, Series, SeriesRecord, ValueKind};
pub use error::{EdaError, Result};
pub use explore::{
    AGGREGATE_LABEL, MeasurementReport, MeasurementRequest, PlotKind, QqView, SeriesView,
    StateReport, StateRequest, explore_measurements, explore_states,
};
pub use qq::{QqResult, QuantilePair, compute_qq};
pub use sample::{concat, parse_exclude_count, trim_leading};
pub use selection::{ALL, SelectionShape, expand_selection, pair_id};
pub use summary::{SummaryStats, compute_aggregate_summary, compute_summary};
pub use trend::{MAX_POLY_DEGREE, PolyFit, TrendMode, TrendRow, fit_polynomial};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
