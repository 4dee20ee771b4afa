//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - initializes logging (stderr, so stdout stays clean for tables)
//! - runs ingestion, training and lead selection
//! - prints reports/plots
//! - writes optional exports

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;

use crate::cli::{Command, RunArgs, SampleArgs};
use crate::domain::{ForestParams, ScoringConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `leads` binary.
pub fn run() -> Result<(), AppError> {
    init_logging()?;

    // We want `leads` and `leads --offline` to behave like `leads run ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Run(args) => handle_run(args, OutputMode::Full),
        Command::Rank(args) => handle_run(args, OutputMode::RankOnly),
        Command::Sample(args) => handle_sample(args),
    }
}

/// `RUST_LOG` wins; otherwise this crate logs at `info`.
fn init_logging() -> Result<(), AppError> {
    let directive = "lead_scout=info"
        .parse::<Directive>()
        .map_err(|e| AppError::new(2, format!("Invalid log directive: {e}")))?;
    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .with_writer(std::io::stderr)
        .try_init();
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    RankOnly,
}

fn handle_run(args: RunArgs, mode: OutputMode) -> Result<(), AppError> {
    let config = scoring_config_from_args(&args);
    let run = pipeline::run_pipeline(&config)?;

    if mode == OutputMode::Full {
        println!(
            "{}",
            crate::report::format::format_run_summary(&run.dataset, &run.selection, &config)
        );
    }

    println!(
        "{}",
        crate::report::format::format_leads(&run.selection.leads, config.top_n)
    );

    if mode == OutputMode::Full && config.plot {
        let plot = crate::plot::render_eda(&run.dataset, config.plot_width, config.plot_height);
        println!("{plot}");
    }

    // Optional exports.
    if let Some(path) = &config.export_leads {
        crate::io::export::write_leads_csv(path, &run.selection.leads, run.dataset.provenance)?;
    }
    if let Some(path) = &config.export_dataset {
        crate::io::export::write_dataset_json(path, &run.dataset)?;
    }

    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let dataset = crate::data::generate_sample(args.sample_count, args.seed);

    println!("{}", crate::report::format::format_dataset(&dataset));

    if args.plot {
        println!("{}", crate::plot::render_eda(&dataset, args.width, args.height));
    }
    if let Some(path) = &args.export_dataset {
        crate::io::export::write_dataset_json(path, &dataset)?;
    }

    Ok(())
}

/// One seed drives the synthetic sample, the split and the forest.
pub fn scoring_config_from_args(args: &RunArgs) -> ScoringConfig {
    ScoringConfig {
        pages: args.pages,
        offline: args.offline,
        page_delay: Duration::from_millis(args.page_delay_ms),
        request_timeout: Duration::from_secs(args.timeout_secs),
        sample_count: args.sample_count,
        sample_seed: args.seed,
        test_fraction: args.test_fraction,
        split_seed: args.seed,
        forest: ForestParams {
            n_trees: args.trees,
            max_depth: args.max_depth,
            seed: args.seed,
            ..ForestParams::default()
        },
        threshold: args.threshold,
        top_n: args.top,
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_leads: args.export.clone(),
        export_dataset: args.export_dataset.clone(),
    }
}

/// Rewrite argv so `leads` defaults to `leads run`.
///
/// Rules:
/// - `leads`                       -> `leads run`
/// - `leads --offline ...`         -> `leads run --offline ...`
/// - `leads --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("run".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "run" | "rank" | "sample");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "run flags".
    if arg1.starts_with('-') {
        argv.insert(1, "run".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_runs() {
        assert_eq!(rewrite_args(argv(&["leads"])), argv(&["leads", "run"]));
    }

    #[test]
    fn leading_flags_go_to_run() {
        assert_eq!(
            rewrite_args(argv(&["leads", "--offline", "-n", "50"])),
            argv(&["leads", "run", "--offline", "-n", "50"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        for args in [
            argv(&["leads", "rank", "--top", "5"]),
            argv(&["leads", "sample"]),
            argv(&["leads", "--help"]),
            argv(&["leads", "-V"]),
        ] {
            assert_eq!(rewrite_args(args.clone()), args);
        }
    }

    #[test]
    fn config_threads_seed_and_flags() {
        let cli = crate::cli::Cli::parse_from(["leads", "run", "--seed", "7", "--no-plot", "--page-delay-ms", "0"]);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        let config = scoring_config_from_args(&args);
        assert_eq!(config.sample_seed, 7);
        assert_eq!(config.split_seed, 7);
        assert_eq!(config.forest.seed, 7);
        assert_eq!(config.forest.min_samples_split, 2);
        assert_eq!(config.page_delay, Duration::ZERO);
        assert!(!config.plot);
    }
}
