//! Measurement and state exploration workflows.
//!
//! Each workflow takes an analyst's selection, resolves `ALL`, fetches the
//! matching series, trims the excluded leading points and hands the samples to
//! the statistics engines. The reports carry display-ready series data and
//! table rows; drawing them is the caller's job.

use std::fmt;
use std::str::FromStr;

use log::{debug, warn};
use rand::Rng;
use serde::Serialize;

use crate::dataset::{Collection, Dataset, Series};
use crate::error::{EdaError, Result};
use crate::qq::{QqResult, compute_qq};
use crate::sample::{concat, is_constant, trim_leading};
use crate::selection::{SelectionShape, expand_selection, pair_id};
use crate::summary::{SummaryStats, compute_aggregate_summary, compute_summary};
use crate::trend::{TrendMode, TrendRow, fit_polynomial};

/// Label used for pooled QQ data in aggregate mode.
pub const AGGREGATE_LABEL: &str = "Agg";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum PlotKind {
    Line,
    Scatter,
    Polar,
    HistogramX,
    HistogramY,
    #[serde(rename = "QQ")]
    Qq,
}

impl PlotKind {
    pub const MEASUREMENT_KINDS: [PlotKind; 6] = [
        Self::Line,
        Self::Scatter,
        Self::Polar,
        Self::HistogramX,
        Self::HistogramY,
        Self::Qq,
    ];
    pub const STATE_KINDS: [PlotKind; 4] =
        [Self::Line, Self::Scatter, Self::HistogramX, Self::HistogramY];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Line => "Line",
            Self::Scatter => "Scatter",
            Self::Polar => "Polar",
            Self::HistogramX => "HistogramX",
            Self::HistogramY => "HistogramY",
            Self::Qq => "QQ",
        }
    }

    pub fn is_histogram(self) -> bool {
        matches!(self, Self::HistogramX | Self::HistogramY)
    }
}

impl fmt::Display for PlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlotKind {
    type Err = EdaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "line" => Ok(Self::Line),
            "scatter" => Ok(Self::Scatter),
            "polar" => Ok(Self::Polar),
            "histogramx" | "histx" => Ok(Self::HistogramX),
            "histogramy" | "histy" => Ok(Self::HistogramY),
            "qq" => Ok(Self::Qq),
            other => Err(EdaError::InvalidParameter(format!(
                "unknown plot type '{other}'"
            ))),
        }
    }
}

/// Data for one displayed series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesView {
    pub label: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// QQ data for one series or for the pooled sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QqView {
    pub label: String,
    pub points: QqResult,
    /// y = x guide, only drawn for pooled data.
    pub reference_line: Option<[(f64, f64); 2]>,
}

#[derive(Debug, Clone, Default)]
pub struct MeasurementRequest {
    pub kind: Option<PlotKind>,
    pub sites: Vec<String>,
    pub sats: Vec<String>,
    pub x_key: Option<String>,
    pub y_keys: Vec<String>,
    /// Leading points to drop from every series.
    pub exclude: usize,
    /// Pool the selected series for QQ, histograms and statistics.
    pub aggregate: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeasurementReport {
    pub kind: PlotKind,
    pub series: Vec<SeriesView>,
    pub qq: Vec<QqView>,
    pub summary: Vec<SummaryStats>,
}

#[derive(Debug, Clone, Default)]
pub struct StateRequest {
    pub kind: Option<PlotKind>,
    pub state: Option<String>,
    pub sites: Vec<String>,
    pub sats: Vec<String>,
    pub x_key: Option<String>,
    pub y_keys: Vec<String>,
    pub exclude: usize,
    pub trend: TrendMode,
    pub degree: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct StateReport {
    pub kind: PlotKind,
    pub trend: TrendMode,
    pub series: Vec<SeriesView>,
    /// Column order of `trend_rows`; empty when no trend was requested.
    pub trend_columns: Vec<String>,
    pub trend_rows: Vec<TrendRow>,
}

/// A fetched series with the excluded leading points removed.
struct Trimmed {
    site: String,
    sat: String,
    x: Vec<f64>,
    y: Vec<f64>,
    is_float: bool,
}

fn trim_all(series: Vec<Series>, exclude: usize, y_key: &str) -> Vec<Trimmed> {
    series
        .into_iter()
        .filter_map(|s| {
            let y = trim_leading(&s.y, exclude);
            if y.is_empty() {
                warn!(
                    "{} {} '{y_key}': all {} point(s) excluded, skipped",
                    s.site,
                    s.sat,
                    s.y.len()
                );
                return None;
            }
            Some(Trimmed {
                x: trim_leading(&s.x, exclude).to_vec(),
                y: y.to_vec(),
                is_float: s.is_float(),
                site: s.site,
                sat: s.sat,
            })
        })
        .collect()
}

fn require<'a, T>(value: Option<&'a T>, what: &'static str) -> Result<&'a T>
where
    T: ?Sized,
{
    value.ok_or(EdaError::IncompleteSelection(what))
}

fn require_selection(
    kind: Option<PlotKind>,
    sites: &[String],
    sats: &[String],
    x_key: Option<&str>,
    y_keys: &[String],
) -> Result<(PlotKind, String)> {
    let kind = kind.ok_or(EdaError::IncompleteSelection("plot type"))?;
    if sites.is_empty() {
        return Err(EdaError::IncompleteSelection("site"));
    }
    if sats.is_empty() {
        return Err(EdaError::IncompleteSelection("sat"));
    }
    let x_key = require(x_key, "x axis")?;
    if y_keys.is_empty() {
        return Err(EdaError::IncompleteSelection("y axis"));
    }
    Ok((kind, x_key.to_string()))
}

/// Run the measurement view: series, QQ data and summary statistics.
pub fn explore_measurements<R: Rng + ?Sized>(
    dataset: &Dataset,
    req: &MeasurementRequest,
    rng: &mut R,
) -> Result<MeasurementReport> {
    let (kind, x_key) = require_selection(
        req.kind,
        &req.sites,
        &req.sats,
        req.x_key.as_deref(),
        &req.y_keys,
    )?;

    let sites = expand_selection(&req.sites, &dataset.sites());
    let sats = expand_selection(&req.sats, &dataset.sats());
    let shape = SelectionShape {
        sites: sites.len(),
        sats: sats.len(),
        keys: req.y_keys.len(),
    };
    debug!(
        "plotting request type {kind}: sat {} / site {} / exclude {} / aggregate {}",
        sats.join(", "),
        sites.join(", "),
        req.exclude,
        req.aggregate
    );

    let mut report = MeasurementReport {
        kind,
        series: Vec::new(),
        qq: Vec::new(),
        summary: Vec::new(),
    };

    for y_key in &req.y_keys {
        let fetched = dataset.get_series(
            Collection::Measurements,
            None,
            &sites,
            &sats,
            &x_key,
            y_key,
        )?;
        let trimmed = trim_all(fetched, req.exclude, y_key);
        if trimmed.is_empty() {
            warn!("no series left for '{y_key}'");
            continue;
        }

        if kind == PlotKind::Qq {
            if req.aggregate {
                let pooled = concat(&trimmed.iter().map(|t| &t.y[..]).collect::<Vec<_>>());
                if is_constant(&pooled) {
                    warn!("'{y_key}': pooled sample is constant, no QQ data");
                    continue;
                }
                let points = compute_qq(&pooled, pooled.len(), rng)?;
                report.qq.push(QqView {
                    label: AGGREGATE_LABEL.to_string(),
                    reference_line: points.reference_line(),
                    points,
                });
            } else {
                for t in &trimmed {
                    if is_constant(&t.y) {
                        warn!(
                            "{} {} '{y_key}': constant over {} point(s), no QQ data",
                            t.site,
                            t.sat,
                            t.y.len()
                        );
                        continue;
                    }
                    let points = compute_qq(&t.y, t.y.len(), rng)?;
                    report.qq.push(QqView {
                        label: format!("{} {}", t.site, t.sat),
                        reference_line: None,
                        points,
                    });
                }
            }
        } else if req.aggregate && kind.is_histogram() {
            let samples: Vec<&[f64]> = trimmed.iter().map(|t| &t.y[..]).collect();
            report.series.push(SeriesView {
                label: y_key.clone(),
                x: trimmed[0].x.clone(),
                y: concat(&samples),
            });
            report
                .summary
                .push(compute_aggregate_summary(y_key, &samples)?);
        } else {
            for t in &trimmed {
                let label = shape.label(&t.site, &t.sat, y_key);
                if !req.aggregate && t.is_float {
                    report.summary.push(compute_summary(&label, &t.y)?);
                }
                report.series.push(SeriesView {
                    label,
                    x: t.x.clone(),
                    y: t.y.clone(),
                });
            }
            if req.aggregate && trimmed[0].is_float {
                let samples: Vec<&[f64]> = trimmed.iter().map(|t| &t.y[..]).collect();
                report
                    .summary
                    .push(compute_aggregate_summary(y_key, &samples)?);
            }
        }
    }

    Ok(report)
}

/// Run the state view: series with optional polynomial fit or detrend.
pub fn explore_states(dataset: &Dataset, req: &StateRequest) -> Result<StateReport> {
    let (kind, x_key) = require_selection(
        req.kind,
        &req.sites,
        &req.sats,
        req.x_key.as_deref(),
        &req.y_keys,
    )?;
    if !PlotKind::STATE_KINDS.contains(&kind) {
        return Err(EdaError::InvalidParameter(format!(
            "plot type {kind} is not available for states"
        )));
    }
    let state = require(req.state.as_ref(), "state")?;

    let sites = expand_selection(&req.sites, &dataset.state_sites(state));
    let sats = expand_selection(&req.sats, &dataset.state_sats(state));
    let shape = SelectionShape {
        sites: sites.len(),
        sats: sats.len(),
        keys: req.y_keys.len(),
    };
    debug!(
        "state {state}: {kind}, trend {} (degree {}), exclude {}",
        req.trend, req.degree, req.exclude
    );

    let mut series = Vec::new();
    let mut trend_rows = Vec::new();

    for y_key in &req.y_keys {
        let fetched = dataset.get_series(
            Collection::States,
            Some(state.as_str()),
            &sites,
            &sats,
            &x_key,
            y_key,
        )?;
        for t in trim_all(fetched, req.exclude, y_key) {
            let label = shape.label(&t.site, &t.sat, y_key);
            let mut y = t.y;
            let mut overlay = None;

            if req.trend != TrendMode::None {
                match fit_polynomial(&t.x, &y, req.degree) {
                    Ok(fit) => {
                        trend_rows.push(TrendRow::from_fit(pair_id(&t.site, &t.sat), &fit));
                        match req.trend {
                            TrendMode::Detrend => y = fit.residuals,
                            TrendMode::Fit => overlay = Some(fit.fitted),
                            TrendMode::None => {}
                        }
                    }
                    Err(e) => warn!(
                        "{} {} '{y_key}': degree {} trend not fitted ({e}), showing raw series",
                        t.site, t.sat, req.degree
                    ),
                }
            }

            if let Some(fitted) = overlay {
                series.push(SeriesView {
                    label: label.clone(),
                    x: t.x.clone(),
                    y,
                });
                series.push(SeriesView {
                    label: format!("{label}_deg{}", req.degree),
                    x: t.x,
                    y: fitted,
                });
            } else {
                series.push(SeriesView { label, x: t.x, y });
            }
        }
    }

    let trend_columns = if req.trend == TrendMode::None {
        Vec::new()
    } else {
        TrendRow::columns(req.degree)
    };

    Ok(StateReport {
        kind,
        trend: req.trend,
        series,
        trend_columns,
        trend_rows,
    })
}
