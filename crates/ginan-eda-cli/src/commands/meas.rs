use ginan_eda_core::{
    MeasurementReport, MeasurementRequest, PlotKind, SummaryStats, explore_measurements,
    parse_exclude_count,
};

pub struct MeasCommandConfig<'a> {
    pub dataset_path: &'a str,
    pub kind: &'a str,
    pub sites: &'a str,
    pub sats: &'a str,
    pub x_key: &'a str,
    pub y_keys: &'a str,
    pub exclude: &'a str,
    pub aggregate: bool,
    pub seed: Option<u64>,
    pub output_path: Option<&'a str>,
}

pub fn run(cfg: MeasCommandConfig<'_>) {
    let ds = super::load_dataset(cfg.dataset_path);
    let req = MeasurementRequest {
        kind: Some(super::parse_kind(cfg.kind)),
        sites: super::split_list(cfg.sites),
        sats: super::split_list(cfg.sats),
        x_key: Some(cfg.x_key.to_string()),
        y_keys: super::split_list(cfg.y_keys),
        exclude: parse_exclude_count(cfg.exclude),
        aggregate: cfg.aggregate,
    };
    let mut rng = super::make_rng(cfg.seed);

    let report = match explore_measurements(&ds, &req, &mut rng) {
        Ok(r) => r,
        Err(e) => super::fail(&e.to_string()),
    };

    println!(
        "Measurements: {} (exclude {}, aggregate {})\n",
        report.kind,
        req.exclude,
        if req.aggregate { "on" } else { "off" }
    );
    print_report(&report);

    if let Some(path) = cfg.output_path {
        super::write_json(path, &report);
    }
}

fn print_report(report: &MeasurementReport) {
    if report.kind == PlotKind::Qq {
        for view in &report.qq {
            let pairs = view.points.pairs();
            println!("  ┌─ QQ {} ({} points)", view.label, pairs.len());
            if let (Some(first), Some(last)) = (pairs.first(), pairs.last()) {
                println!(
                    "  │ sample   {:+.3} .. {:+.3}",
                    first.sample_quantile, last.sample_quantile
                );
                println!(
                    "  │ normal   {:+.3} .. {:+.3}",
                    first.theoretical_quantile, last.theoretical_quantile
                );
            }
            println!("  │ axis correlation r = {:.4}", view.points.correlation());
            if let Some([(x0, y0), (x1, y1)]) = view.reference_line {
                println!("  │ reference line ({x0:+.3}, {y0:+.3}) → ({x1:+.3}, {y1:+.3})");
            }
            println!("  └─");
        }
    } else {
        for series in &report.series {
            let label = if series.label.is_empty() {
                "(series)"
            } else {
                series.label.as_str()
            };
            println!("  {:24} {:>8} points", label, series.y.len());
        }
    }

    if !report.summary.is_empty() {
        println!();
        print_summary_table(&report.summary);
    }
    if report.series.is_empty() && report.qq.is_empty() {
        println!("  No series matched the selection.");
    }
}

fn print_summary_table(rows: &[SummaryStats]) {
    println!("{:=<68}", "");
    println!("  {:24} {:>13} {:>13} {:>13}", "ID", "RMS", "Mean", "Std");
    println!("{:=<68}", "");
    for row in rows {
        println!(
            "  {:24} {:>13.4} {:>13.4} {:>13.4}",
            row.id, row.rms, row.mean, row.std
        );
    }
}
