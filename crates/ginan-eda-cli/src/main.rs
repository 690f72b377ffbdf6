//! CLI for ginan-eda: exploratory statistics over GNSS measurement and state series.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ginan-eda")]
#[command(about = "ginan-eda: QQ data, summary statistics and trends for GNSS series")]
#[command(version = ginan_eda_core::VERSION)]
struct Cli {
    /// Log debug details (overrides RUST_LOG default of "warn")
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List sites, satellites, keys and states available in a dataset.
    /// With --state, list the options of that state only.
    Keys {
        /// Path to the exported JSON dataset
        #[arg(long)]
        dataset: String,

        /// Restrict the listing to one state
        #[arg(long)]
        state: Option<String>,
    },

    /// Explore measurement series: line/scatter/polar/histogram data, QQ data,
    /// RMS/mean/std table
    Meas {
        /// Path to the exported JSON dataset
        #[arg(long)]
        dataset: String,

        /// Plot type
        #[arg(long, default_value = "scatter", value_parser = ["line", "scatter", "polar", "histogramx", "histogramy", "qq"])]
        kind: String,

        /// Comma-separated sites, or "ALL"
        #[arg(long, default_value = "ALL")]
        sites: String,

        /// Comma-separated satellites, or "ALL"
        #[arg(long, default_value = "ALL")]
        sats: String,

        /// X axis key (usually the epoch)
        #[arg(long)]
        x: String,

        /// Comma-separated Y axis keys
        #[arg(long)]
        y: String,

        /// Exclude the first N points of every series (invalid or negative = 0)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        exclude: String,

        /// Pool the selected series for QQ, histograms and statistics
        #[arg(long)]
        aggregate: bool,

        /// Seed for QQ randomness (shuffle and normal reference draw)
        #[arg(long)]
        seed: Option<u64>,

        /// Write the full report as JSON
        #[arg(long)]
        output: Option<String>,
    },

    /// Explore filter-state series with optional polynomial fit or detrend
    State {
        /// Path to the exported JSON dataset
        #[arg(long)]
        dataset: String,

        /// State name (see `keys`)
        #[arg(long)]
        state: String,

        /// Plot type
        #[arg(long, default_value = "line", value_parser = ["line", "scatter", "histogramx", "histogramy"])]
        kind: String,

        /// Comma-separated sites, or "ALL"
        #[arg(long, default_value = "ALL")]
        sites: String,

        /// Comma-separated satellites, or "ALL"
        #[arg(long, default_value = "ALL")]
        sats: String,

        /// X axis key (usually the epoch)
        #[arg(long)]
        x: String,

        /// Comma-separated Y axis keys
        #[arg(long)]
        y: String,

        /// Exclude the first N points of every series (invalid or negative = 0)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        exclude: String,

        /// Trend correction
        #[arg(long, default_value = "none", value_parser = ["none", "fit", "detrend"])]
        trend: String,

        /// Polynomial degree for fit/detrend
        #[arg(long, default_value = "0", value_parser = clap::value_parser!(u8).range(0..=ginan_eda_core::MAX_POLY_DEGREE as i64))]
        degree: u8,

        /// Write the full report as JSON
        #[arg(long)]
        output: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    commands::init_logging(cli.verbose);

    match cli.command {
        Commands::Keys { dataset, state } => commands::keys::run(&dataset, state.as_deref()),
        Commands::Meas {
            dataset,
            kind,
            sites,
            sats,
            x,
            y,
            exclude,
            aggregate,
            seed,
            output,
        } => commands::meas::run(commands::meas::MeasCommandConfig {
            dataset_path: &dataset,
            kind: &kind,
            sites: &sites,
            sats: &sats,
            x_key: &x,
            y_keys: &y,
            exclude: &exclude,
            aggregate,
            seed,
            output_path: output.as_deref(),
        }),
        Commands::State {
            dataset,
            state,
            kind,
            sites,
            sats,
            x,
            y,
            exclude,
            trend,
            degree,
            output,
        } => commands::state::run(commands::state::StateCommandConfig {
            dataset_path: &dataset,
            state: &state,
            kind: &kind,
            sites: &sites,
            sats: &sats,
            x_key: &x,
            y_keys: &y,
            exclude: &exclude,
            trend: &trend,
            degree: degree as usize,
            output_path: output.as_deref(),
        }),
    }
}
