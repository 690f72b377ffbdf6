use ginan_eda_core::{StateRequest, TrendRow, explore_states, parse_exclude_count};

pub struct StateCommandConfig<'a> {
    pub dataset_path: &'a str,
    pub state: &'a str,
    pub kind: &'a str,
    pub sites: &'a str,
    pub sats: &'a str,
    pub x_key: &'a str,
    pub y_keys: &'a str,
    pub exclude: &'a str,
    pub trend: &'a str,
    pub degree: usize,
    pub output_path: Option<&'a str>,
}

pub fn run(cfg: StateCommandConfig<'_>) {
    let ds = super::load_dataset(cfg.dataset_path);
    let req = StateRequest {
        kind: Some(super::parse_kind(cfg.kind)),
        state: Some(cfg.state.to_string()),
        sites: super::split_list(cfg.sites),
        sats: super::split_list(cfg.sats),
        x_key: Some(cfg.x_key.to_string()),
        y_keys: super::split_list(cfg.y_keys),
        exclude: parse_exclude_count(cfg.exclude),
        trend: super::parse_trend(cfg.trend),
        degree: cfg.degree,
    };

    let report = match explore_states(&ds, &req) {
        Ok(r) => r,
        Err(e) => super::fail(&e.to_string()),
    };

    println!(
        "State {}: {} (trend {}, degree {}, exclude {})\n",
        cfg.state, report.kind, report.trend, req.degree, req.exclude
    );
    for series in &report.series {
        let label = if series.label.is_empty() {
            "(series)"
        } else {
            series.label.as_str()
        };
        println!("  {:24} {:>8} points", label, series.y.len());
    }
    if report.series.is_empty() {
        println!("  No series matched the selection.");
    }

    if !report.trend_rows.is_empty() {
        println!();
        print_trend_table(&report.trend_columns, &report.trend_rows);
    }

    if let Some(path) = cfg.output_path {
        super::write_json(path, &report);
    }
}

fn print_trend_table(columns: &[String], rows: &[TrendRow]) {
    let width = 26 + 15 * (columns.len() - 1);
    println!("{:=<width$}", "");
    print!("  {:24}", columns[0]);
    for col in &columns[1..] {
        print!(" {col:>14}");
    }
    println!();
    println!("{:=<width$}", "");
    for row in rows {
        print!("  {:24} {:>14.6e}", row.id, row.intercept);
        for term in &row.terms {
            print!(" {term:>14.6e}");
        }
        println!(" {:>14.6e}", row.rms);
    }
}
