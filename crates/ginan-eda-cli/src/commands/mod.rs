pub mod keys;
pub mod meas;
pub mod state;

use ginan_eda_core::{Dataset, EdaError, PlotKind, TrendMode};
use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

/// Initialize env_logger. `RUST_LOG` wins; otherwise warn, or debug with -v.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

/// Split a comma-separated CLI list, dropping empty entries.
pub fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Load the dataset or exit with a message.
pub fn load_dataset(path: &str) -> Dataset {
    match Dataset::load(path) {
        Ok(ds) => {
            debug!("loaded dataset {path}");
            ds
        }
        Err(e) => fail(&format!("{path}: {e}")),
    }
}

/// Generator for QQ randomness: seeded when asked, OS-seeded otherwise.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Parse a plot type string. Unknown values are rejected by clap before here.
pub fn parse_kind(s: &str) -> PlotKind {
    s.parse().unwrap_or_else(|e: EdaError| fail(&e.to_string()))
}

pub fn parse_trend(s: &str) -> TrendMode {
    s.parse().unwrap_or_else(|e: EdaError| fail(&e.to_string()))
}

/// Write a report as pretty JSON.
pub fn write_json<T: Serialize>(path: &str, report: &T) {
    let json = match serde_json::to_string_pretty(report) {
        Ok(json) => json,
        Err(e) => fail(&format!("failed to encode report: {e}")),
    };
    match std::fs::write(path, json) {
        Ok(()) => println!("\nResults written to {path}"),
        Err(e) => eprintln!("\nFailed to write {path}: {e}"),
    }
}

pub fn fail(msg: &str) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}
