//! Integration tests for ginan-eda-core.
//!
//! These tests exercise the public pipeline:
//! dataset file → selection → exploration workflow → statistics.

use ginan_eda_core::{
    Dataset, EdaError, MeasurementRequest, PlotKind, StateRequest, TrendMode, compute_qq,
    compute_summary, explore_measurements, explore_states, fit_polynomial, parse_exclude_count,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

const DATASET: &str = r#"{
    "measurements": [
        { "site": "ALIC", "sat": "G01", "values": { "Epoch": [0, 30, 60, 90, 120, 150], "Residual": [5.0, 0.12, -0.31, 0.05, 0.44, -0.18] } },
        { "site": "ALIC", "sat": "G07", "values": { "Epoch": [0, 30, 60, 90, 120, 150], "Residual": [5.0, -0.02, 0.27, -0.40, 0.10, 0.08] } },
        { "site": "PERT", "sat": "G01", "values": { "Epoch": [0, 30, 60, 90], "Residual": [5.0, 0.33, -0.21, 0.09], "_internal": [1, 2, 3, 4] } }
    ],
    "states": [
        { "state": "REC_CLOCK", "site": "ALIC", "values": { "Epoch": [0, 30, 60, 90, 120], "bias": [0.0, 1.0, 4.0, 9.0, 16.0] } },
        { "state": "REC_CLOCK", "site": "PERT", "values": { "Epoch": [0, 30, 60, 90, 120], "bias": [2.0, 2.5, 3.0, 3.5, 4.0] } }
    ]
}"#;

fn strings(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

fn write_dataset() -> (tempfile::TempDir, std::path::PathBuf) {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("dataset.json");
    std::fs::write(&path, DATASET).unwrap();
    (tmp, path)
}

#[test]
fn dataset_loads_from_file() {
    let (_tmp, path) = write_dataset();
    let ds = Dataset::load(&path).unwrap();
    assert_eq!(ds.sites(), strings(&["ALIC", "PERT"]));
    assert_eq!(ds.sats(), strings(&["G01", "G07"]));
    assert_eq!(ds.measurement_keys(), strings(&["Epoch", "Residual"]));
    assert_eq!(ds.state_names(), strings(&["REC_CLOCK"]));
}

#[test]
fn missing_dataset_file_is_io_error() {
    let tmp = tempfile::tempdir().unwrap();
    let err = Dataset::load(tmp.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, EdaError::Io(_)));
}

#[test]
fn measurement_workflow_with_user_exclusion_text() {
    let (_tmp, path) = write_dataset();
    let ds = Dataset::load(&path).unwrap();
    let req = MeasurementRequest {
        kind: Some(PlotKind::Scatter),
        sites: strings(&["ALIC"]),
        sats: strings(&["ALL"]),
        x_key: Some("Epoch".to_string()),
        y_keys: strings(&["Residual"]),
        exclude: parse_exclude_count("1"),
        aggregate: false,
    };
    let mut rng = StdRng::seed_from_u64(17);
    let report = explore_measurements(&ds, &req, &mut rng).unwrap();

    // One site selected, two satellites expanded from ALL: labels carry the sat only.
    let labels: Vec<&str> = report.series.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["G01", "G07"]);
    for (row, series) in report.summary.iter().zip(&report.series) {
        let expected = compute_summary(&series.label, &series.y).unwrap();
        assert_eq!(row, &expected);
    }
    // The excluded outlier never reaches the statistics.
    assert!(report.summary.iter().all(|s| s.mean.abs() < 1.0));
}

#[test]
fn measurement_qq_aggregate_matches_pooled_length() {
    let ds = Dataset::from_json(DATASET).unwrap();
    let req = MeasurementRequest {
        kind: Some(PlotKind::Qq),
        sites: strings(&["ALL"]),
        sats: strings(&["ALL"]),
        x_key: Some("Epoch".to_string()),
        y_keys: strings(&["Residual"]),
        exclude: 1,
        aggregate: true,
    };
    let mut rng = StdRng::seed_from_u64(99);
    let report = explore_measurements(&ds, &req, &mut rng).unwrap();
    assert_eq!(report.qq.len(), 1);
    assert_eq!(report.qq[0].points.len(), 5 + 5 + 3);
}

#[test]
fn state_workflow_fit_recovers_quadratic() {
    let ds = Dataset::from_json(DATASET).unwrap();
    let req = StateRequest {
        kind: Some(PlotKind::Line),
        state: Some("REC_CLOCK".to_string()),
        sites: strings(&["ALL"]),
        sats: strings(&["ALL"]),
        x_key: Some("Epoch".to_string()),
        y_keys: strings(&["bias"]),
        exclude: 0,
        trend: TrendMode::Fit,
        degree: 2,
    };
    let report = explore_states(&ds, &req).unwrap();
    assert_eq!(report.trend_rows.len(), 2);

    // ALIC bias = (t / 30)^2
    let alic = &report.trend_rows[0];
    assert_eq!(alic.id, "ALIC");
    assert!(alic.intercept.abs() < 1e-9);
    assert!(alic.terms[0].abs() < 1e-9);
    assert!((alic.terms[1] - 1.0 / 900.0).abs() < 1e-12);
    assert!(alic.rms < 1e-9);

    // PERT bias is linear, so the quadratic term vanishes.
    let pert = &report.trend_rows[1];
    assert!((pert.intercept - 2.0).abs() < 1e-9);
    assert!((pert.terms[0] - 0.5 / 30.0).abs() < 1e-9);
    assert!(pert.terms[1].abs() < 1e-12);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["trend"], "fit");
    assert_eq!(json["trend_rows"][0]["ID"], "ALIC");
    assert!(json["trend_rows"][0].get("Deg 2").is_some());
}

#[test]
fn qq_twice_differs_but_both_track_normal() {
    let mut seed_rng = StdRng::seed_from_u64(1);
    let base = compute_qq(&(0..2000).map(|i| i as f64).collect::<Vec<_>>(), 2000, &mut seed_rng)
        .unwrap();
    // Reuse the theoretical axis of a uniform sample as a normal-looking input.
    let sample = base.theoretical_quantiles();

    let mut rng = StdRng::seed_from_u64(2);
    let a = compute_qq(&sample, 500, &mut rng).unwrap();
    let b = compute_qq(&sample, 500, &mut rng).unwrap();
    assert_ne!(a, b);
    assert!(a.correlation() > 0.95);
    assert!(b.correlation() > 0.95);
}

#[test]
fn detrend_residual_rms_is_summary_rms() {
    let x: Vec<f64> = (0..40).map(|i| 1_000_000.0 + 30.0 * i as f64).collect();
    let y: Vec<f64> = x
        .iter()
        .enumerate()
        .map(|(i, &xi)| 0.001 * (xi - x[0]) + if i % 3 == 0 { 0.2 } else { -0.1 })
        .collect();
    let fit = fit_polynomial(&x, &y, 1).unwrap();
    let residual_stats = compute_summary("resid", &fit.residuals).unwrap();
    assert!((residual_stats.rms - fit.rms).abs() < 1e-12);
    assert!(residual_stats.mean.abs() < 1e-9);
}

fn non_constant_sample() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1.0e6f64..1.0e6, 2..200)
        .prop_filter("sample must not be constant", |v| {
            v.iter().any(|&x| (x - v[0]).abs() > 1e-3)
        })
}

proptest! {
    #[test]
    fn qq_has_requested_length_and_sorted_axes(
        sample in non_constant_sample(),
        fraction in 0.01f64..=1.0,
        seed in any::<u64>(),
    ) {
        let n = ((sample.len() as f64 * fraction).ceil() as usize).clamp(1, sample.len());
        let mut rng = StdRng::seed_from_u64(seed);
        let qq = compute_qq(&sample, n, &mut rng).unwrap();
        prop_assert_eq!(qq.len(), n);
        let s = qq.sample_quantiles();
        let t = qq.theoretical_quantiles();
        prop_assert!(s.windows(2).all(|w| w[0] <= w[1]));
        prop_assert!(t.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn qq_rejects_oversized_request(sample in non_constant_sample(), extra in 1usize..10) {
        let mut rng = StdRng::seed_from_u64(0);
        let too_many = sample.len() + extra;
        let is_out_of_range = matches!(
            compute_qq(&sample, too_many, &mut rng),
            Err(EdaError::SampleSizeOutOfRange { .. })
        );
        prop_assert!(is_out_of_range);
    }

    #[test]
    fn summary_rms_matches_definition(sample in prop::collection::vec(-1.0e3f64..1.0e3, 1..300)) {
        let stats = compute_summary("p", &sample).unwrap();
        let expected = (sample.iter().map(|x| x * x).sum::<f64>() / sample.len() as f64).sqrt();
        prop_assert!(stats.rms >= 0.0);
        prop_assert!((stats.rms - expected).abs() <= 1e-9 * (1.0 + expected));
        prop_assert!(stats.std >= 0.0);
    }

    #[test]
    fn aggregate_is_plain_concatenation(
        a in prop::collection::vec(-1.0e3f64..1.0e3, 1..100),
        b in prop::collection::vec(-1.0e3f64..1.0e3, 1..100),
    ) {
        let agg = ginan_eda_core::compute_aggregate_summary("agg", &[a.clone(), b.clone()]).unwrap();
        let mut joined = a;
        joined.extend(b);
        let direct = compute_summary("agg", &joined).unwrap();
        prop_assert_eq!(agg, direct);
    }
}
