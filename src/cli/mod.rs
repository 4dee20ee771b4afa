//! Command-line parsing for the lead scorer.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from ingestion and modeling code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "leads", version, about = "Funding-likelihood lead scorer (live listing with synthetic fallback)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Ingest, train, select leads; print summary, report and leads, optionally plot/export.
    Run(RunArgs),
    /// Print the leads table only (useful for scripting).
    Rank(RunArgs),
    /// Print a synthetic dataset without touching the network.
    Sample(SampleArgs),
}

/// Common options for scoring runs.
#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// Listing pages to request from the live source (0 falls back immediately).
    #[arg(long, default_value_t = 5)]
    pub pages: usize,

    /// Skip the live source and use synthetic data.
    #[arg(long)]
    pub offline: bool,

    /// Pause between live page requests, in milliseconds.
    #[arg(long, default_value_t = 2000)]
    pub page_delay_ms: u64,

    /// Live request timeout, in seconds.
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Number of synthetic companies on the fallback path.
    #[arg(short = 'n', long, default_value_t = 100)]
    pub sample_count: usize,

    /// Seed for synthetic data, the train/test split and the forest.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Minimum funding probability for a lead, in [0, 1].
    #[arg(long, default_value_t = 0.7)]
    pub threshold: f64,

    /// Trees in the random forest.
    #[arg(long, default_value_t = 100)]
    pub trees: usize,

    /// Maximum tree depth (unbounded when omitted).
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Fraction of records held out for evaluation.
    #[arg(long, default_value_t = 0.2)]
    pub test_fraction: f64,

    /// Show the top-N leads.
    #[arg(long, default_value_t = 20)]
    pub top: usize,

    /// Skip the ASCII EDA charts (shown by default).
    #[arg(long)]
    pub no_plot: bool,

    /// Chart width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Chart height (rows).
    #[arg(long, default_value_t = 16)]
    pub height: usize,

    /// Export all selected leads to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the ingested dataset (with provenance) to JSON.
    #[arg(long = "export-dataset")]
    pub export_dataset: Option<PathBuf>,
}

/// Options for printing a synthetic dataset.
#[derive(Debug, Parser, Clone)]
pub struct SampleArgs {
    /// Number of synthetic companies.
    #[arg(short = 'n', long, default_value_t = 100)]
    pub sample_count: usize,

    /// Generator seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Render ASCII EDA charts after the table.
    #[arg(long)]
    pub plot: bool,

    /// Chart width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Chart height (rows).
    #[arg(long, default_value_t = 16)]
    pub height: usize,

    /// Export the generated dataset to JSON.
    #[arg(long = "export-dataset")]
    pub export_dataset: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_defaults() {
        let cli = Cli::parse_from(["leads", "run"]);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.pages, 5);
        assert_eq!(args.page_delay_ms, 2000);
        assert_eq!(args.sample_count, 100);
        assert_eq!(args.seed, 42);
        assert!((args.threshold - 0.7).abs() < 1e-12);
        assert_eq!(args.trees, 100);
        assert_eq!(args.max_depth, None);
        assert!(!args.no_plot && !args.offline);
    }

    #[test]
    fn rank_accepts_overrides() {
        let cli = Cli::parse_from([
            "leads", "rank", "--offline", "-n", "250", "--threshold", "0.9", "--max-depth", "6", "--export", "out.csv",
        ]);
        let Command::Rank(args) = cli.command else {
            panic!("expected rank");
        };
        assert!(args.offline);
        assert_eq!(args.sample_count, 250);
        assert_eq!(args.max_depth, Some(6));
        assert_eq!(args.export, Some(PathBuf::from("out.csv")));
    }

    #[test]
    fn run_has_no_plot_switch_only() {
        assert!(Cli::try_parse_from(["leads", "run", "--plot"]).is_err());
        let cli = Cli::parse_from(["leads", "run", "--no-plot"]);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert!(args.no_plot);
    }
}
