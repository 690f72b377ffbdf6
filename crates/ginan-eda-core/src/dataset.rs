//! In-memory series lookup over an exported JSON dataset.
//!
//! The dataset is a snapshot of the measurement and state collections, one
//! record per (site, satellite) pair with one array per key:
//!
//! ```json
//! {
//!   "measurements": [
//!     { "site": "ALIC", "sat": "G01", "values": { "Epoch": [0, 30], "Residual": [0.1, -0.2] } }
//!   ],
//!   "states": [
//!     { "state": "REC_POS", "site": "ALIC", "sat": "", "values": { "Epoch": [0, 30], "x": [1.0, 1.1] } }
//!   ]
//! }
//! ```
//!
//! Keys starting with `_` are internal and never offered as options.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{EdaError, Result};

/// Which collection a lookup reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collection {
    Measurements,
    States,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Measurements => "Measurements",
            Self::States => "States",
        }
    }
}

/// Storage type of a value array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    /// Every entry was written as an integer (flags, counters, PRNs).
    Integer,
    Float,
}

/// One record as stored in the dataset file.
#[derive(Debug, Clone, Deserialize)]
pub struct SeriesRecord {
    #[serde(default)]
    pub site: String,
    #[serde(default)]
    pub sat: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub values: BTreeMap<String, Vec<Value>>,
}

/// One (site, satellite) series for a chosen x key and y key.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub site: String,
    pub sat: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub y_kind: ValueKind,
}

impl Series {
    /// Whether the y values are floating point, which is what the summary
    /// table accepts.
    pub fn is_float(&self) -> bool {
        self.y_kind == ValueKind::Float
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    measurements: Vec<SeriesRecord>,
    #[serde(default)]
    states: Vec<SeriesRecord>,
}

impl Dataset {
    pub fn from_json(json: &str) -> Result<Self> {
        let dataset: Dataset = serde_json::from_str(json)?;
        debug!(
            "dataset: {} measurement record(s), {} state record(s)",
            dataset.measurements.len(),
            dataset.states.len()
        );
        Ok(dataset)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    fn records(&self, collection: Collection) -> &[SeriesRecord] {
        match collection {
            Collection::Measurements => &self.measurements,
            Collection::States => &self.states,
        }
    }

    fn state_records<'a>(&'a self, state: &'a str) -> impl Iterator<Item = &'a SeriesRecord> + 'a {
        self.states
            .iter()
            .filter(move |r| r.state.as_deref() == Some(state))
    }

    /// Every site present in either collection. Satellite-only records carry
    /// an empty site and are not listed.
    pub fn sites(&self) -> Vec<String> {
        distinct(
            self.measurements
                .iter()
                .chain(&self.states)
                .map(|r| &r.site)
                .filter(|s| !s.is_empty()),
        )
    }

    /// Every satellite present in either collection. Receiver-only records
    /// carry an empty satellite and are not listed.
    pub fn sats(&self) -> Vec<String> {
        distinct(
            self.measurements
                .iter()
                .chain(&self.states)
                .map(|r| &r.sat)
                .filter(|s| !s.is_empty()),
        )
    }

    pub fn measurement_keys(&self) -> Vec<String> {
        visible_keys(self.measurements.iter())
    }

    pub fn state_names(&self) -> Vec<String> {
        distinct(self.states.iter().filter_map(|r| r.state.as_ref()))
    }

    pub fn state_sites(&self, state: &str) -> Vec<String> {
        distinct(
            self.state_records(state)
                .map(|r| &r.site)
                .filter(|s| !s.is_empty()),
        )
    }

    pub fn state_sats(&self, state: &str) -> Vec<String> {
        distinct(
            self.state_records(state)
                .map(|r| &r.sat)
                .filter(|s| !s.is_empty()),
        )
    }

    pub fn state_keys(&self, state: &str) -> Vec<String> {
        visible_keys(self.state_records(state))
    }

    /// Fetch every series matching the selection that carries both keys.
    ///
    /// `state` is required for [`Collection::States`] and ignored otherwise.
    /// Records whose arrays hold non-numeric entries, or whose x and y arrays
    /// differ in length, are skipped with a warning.
    pub fn get_series(
        &self,
        collection: Collection,
        state: Option<&str>,
        sites: &[String],
        sats: &[String],
        x_key: &str,
        y_key: &str,
    ) -> Result<Vec<Series>> {
        if collection == Collection::States {
            let name = state.ok_or(EdaError::IncompleteSelection("state"))?;
            if self.state_records(name).next().is_none() {
                return Err(EdaError::UnknownState(name.to_string()));
            }
        }

        let mut out = Vec::new();
        for record in self.records(collection) {
            if collection == Collection::States && record.state.as_deref() != state {
                continue;
            }
            // Receiver-level records have no satellite and satellite-level
            // records have no site; an empty field matches any choice.
            if !record.site.is_empty() && !sites.contains(&record.site) {
                continue;
            }
            if !record.sat.is_empty() && !sats.contains(&record.sat) {
                continue;
            }
            let (Some(raw_x), Some(raw_y)) = (record.values.get(x_key), record.values.get(y_key))
            else {
                debug!(
                    "{}: {} {} has no '{x_key}'/'{y_key}'",
                    collection.as_str(),
                    record.site,
                    record.sat
                );
                continue;
            };
            let Some((x, _)) = numeric(raw_x) else {
                warn!(
                    "{}: {} {} key '{x_key}' is not numeric, skipped",
                    collection.as_str(),
                    record.site,
                    record.sat
                );
                continue;
            };
            let Some((y, y_kind)) = numeric(raw_y) else {
                warn!(
                    "{}: {} {} key '{y_key}' is not numeric, skipped",
                    collection.as_str(),
                    record.site,
                    record.sat
                );
                continue;
            };
            if x.len() != y.len() {
                warn!(
                    "{}: {} {} has {} '{x_key}' values but {} '{y_key}' values, skipped",
                    collection.as_str(),
                    record.site,
                    record.sat,
                    x.len(),
                    y.len()
                );
                continue;
            }
            out.push(Series {
                site: record.site.clone(),
                sat: record.sat.clone(),
                x,
                y,
                y_kind,
            });
        }
        Ok(out)
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
    values
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn visible_keys<'a>(records: impl Iterator<Item = &'a SeriesRecord>) -> Vec<String> {
    distinct(
        records
            .flat_map(|r| r.values.keys())
            .filter(|k| !k.starts_with('_')),
    )
}

/// Convert a JSON array to floats, remembering whether it was all integers.
fn numeric(values: &[Value]) -> Option<(Vec<f64>, ValueKind)> {
    let mut all_integer = true;
    let mut out = Vec::with_capacity(values.len());
    for v in values {
        let Value::Number(n) = v else {
            return None;
        };
        all_integer &= n.is_i64() || n.is_u64();
        out.push(n.as_f64()?);
    }
    let kind = if all_integer && !out.is_empty() {
        ValueKind::Integer
    } else {
        ValueKind::Float
    };
    Some((out, kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "measurements": [
            { "site": "ALIC", "sat": "G01", "values": { "Epoch": [0, 30, 60], "Residual": [0.1, -0.2, 0.05], "_id": [1, 2, 3] } },
            { "site": "ALIC", "sat": "G02", "values": { "Epoch": [0, 30], "Residual": [0.3, 0.1], "Flag": [0, 1] } },
            { "site": "HOB2", "sat": "G01", "values": { "Epoch": [0, 30], "Residual": [0.0, null] } }
        ],
        "states": [
            { "state": "REC_POS", "site": "ALIC", "values": { "Epoch": [0, 30, 60], "x": [1.0, 1.5, 2.0] } },
            { "state": "SAT_CLOCK", "site": "", "sat": "G05", "values": { "Epoch": [0, 30], "bias": [3.0, 3.1] } }
        ]
    }"#;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn dataset() -> Dataset {
        Dataset::from_json(SAMPLE).unwrap()
    }

    #[test]
    fn test_options() {
        let ds = dataset();
        assert_eq!(ds.sites(), strings(&["ALIC", "HOB2"]));
        assert_eq!(ds.sats(), strings(&["G01", "G02", "G05"]));
        assert_eq!(ds.measurement_keys(), strings(&["Epoch", "Flag", "Residual"]));
        assert_eq!(ds.state_names(), strings(&["REC_POS", "SAT_CLOCK"]));
        assert_eq!(ds.state_keys("REC_POS"), strings(&["Epoch", "x"]));
        assert_eq!(ds.state_sites("REC_POS"), strings(&["ALIC"]));
        assert!(ds.state_sats("REC_POS").is_empty());
        assert_eq!(ds.state_sats("SAT_CLOCK"), strings(&["G05"]));
        assert!(ds.state_sites("SAT_CLOCK").is_empty());
    }

    #[test]
    fn test_get_measurement_series() {
        let ds = dataset();
        let series = ds
            .get_series(
                Collection::Measurements,
                None,
                &strings(&["ALIC"]),
                &strings(&["G01", "G02"]),
                "Epoch",
                "Residual",
            )
            .unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].sat, "G01");
        assert_eq!(series[0].y, vec![0.1, -0.2, 0.05]);
        assert!(series[0].is_float());
        assert_eq!(series[1].x, vec![0.0, 30.0]);
    }

    #[test]
    fn test_integer_series_kind() {
        let ds = dataset();
        let series = ds
            .get_series(
                Collection::Measurements,
                None,
                &strings(&["ALIC"]),
                &strings(&["G02"]),
                "Epoch",
                "Flag",
            )
            .unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].y_kind, ValueKind::Integer);
    }

    #[test]
    fn test_non_numeric_series_skipped() {
        let ds = dataset();
        let series = ds
            .get_series(
                Collection::Measurements,
                None,
                &strings(&["HOB2"]),
                &strings(&["G01"]),
                "Epoch",
                "Residual",
            )
            .unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_state_series_requires_known_state() {
        let ds = dataset();
        let sites = strings(&["ALIC"]);
        let sats = strings(&["G01"]);
        assert!(matches!(
            ds.get_series(Collection::States, None, &sites, &sats, "Epoch", "x"),
            Err(EdaError::IncompleteSelection("state"))
        ));
        assert!(matches!(
            ds.get_series(Collection::States, Some("NOPE"), &sites, &sats, "Epoch", "x"),
            Err(EdaError::UnknownState(_))
        ));
        let series = ds
            .get_series(Collection::States, Some("REC_POS"), &sites, &sats, "Epoch", "x")
            .unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].y, vec![1.0, 1.5, 2.0]);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Dataset::from_json("{ not json"),
            Err(EdaError::Json(_))
        ));
    }
}
