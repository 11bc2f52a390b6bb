//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and initialises logging
//! - parses CLI arguments
//! - generates the population
//! - prints the summary/preview
//! - writes the optional CSV export

use chrono::Local;
use clap::Parser;
use log::{debug, info};

use crate::cli::{Command, ConfigArgs, GenerateArgs};
use crate::domain::{Overrides, PopulationRequest, SynthConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `creditgen` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is fine; it only supplies RUST_LOG and friends.
    dotenvy::dotenv().ok();
    init_logging();

    // `creditgen` and `creditgen -n 100` behave like `creditgen generate ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Generate(args) => handle_generate(args),
        Command::Config(args) => handle_config(args),
    }
}

fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

fn handle_generate(args: GenerateArgs) -> Result<(), AppError> {
    let config = match &args.config {
        Some(path) => crate::io::read_config_json(path)?,
        None => {
            debug!("Using default synthesis config");
            SynthConfig::default()
        }
    };
    let request = population_request_from_args(&args);

    let records = pipeline::generate_population(&config, &request)?;

    if !args.no_summary {
        if let Some(stats) = crate::report::population_stats(&records) {
            println!("{}", crate::report::format_run_summary(&stats, request.seed, request.as_of));
        }
        let dist = crate::report::score_distribution(&records);
        println!("{}", crate::report::format_distribution(&dist));
    }
    if args.preview > 0 {
        println!("{}", crate::report::format_preview(&records, args.preview));
    }

    if let Some(path) = &args.output {
        crate::io::write_population_csv(path, &records)?;
    }

    Ok(())
}

fn handle_config(args: ConfigArgs) -> Result<(), AppError> {
    let config = SynthConfig::default();
    match &args.output {
        Some(path) => {
            crate::io::write_config_json(path, &config)?;
            info!("Wrote default config to {}", path.display());
        }
        None => crate::io::write_config(std::io::stdout().lock(), &config)?,
    }
    Ok(())
}

pub fn population_request_from_args(args: &GenerateArgs) -> PopulationRequest {
    PopulationRequest {
        count: args.count,
        seed: args.seed,
        as_of: args.as_of.unwrap_or_else(|| Local::now().date_naive()),
        overrides: Overrides {
            age: args.age,
            employment_status: args.employment,
            housing: args.housing,
        },
    }
}

/// Rewrite argv so `creditgen` defaults to `creditgen generate`.
///
/// Rules:
/// - `creditgen`                      -> `creditgen generate`
/// - `creditgen -n 100 ...`           -> `creditgen generate -n 100 ...`
/// - `creditgen --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("generate".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "generate" | "config");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "generate flags".
    if arg1.starts_with('-') {
        argv.insert(1, "generate".to_string());
        return argv;
    }

    argv
}
