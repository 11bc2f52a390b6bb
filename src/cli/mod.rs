//! Command-line parsing for the synthetic credit applicant generator.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! synthesis code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::domain::{EmploymentStatus, Housing};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "creditgen", version, about = "Synthetic credit applicant generator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a population, print a summary, and optionally export CSV.
    Generate(GenerateArgs),
    /// Print (or write) the default synthesis config as JSON.
    Config(ConfigArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct GenerateArgs {
    /// Number of applicants to generate.
    #[arg(short = 'n', long, default_value_t = 10_000)]
    pub count: usize,

    /// Random seed. Identical seed + config + as-of date gives identical output.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Reference date for bankruptcy recency (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub as_of: Option<NaiveDate>,

    /// Config JSON overriding the default distribution parameters.
    #[arg(long, value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// Export the population to CSV.
    #[arg(short = 'o', long, value_name = "CSV")]
    pub output: Option<PathBuf>,

    /// Print the first N records.
    #[arg(long, default_value_t = 5)]
    pub preview: usize,

    /// Skip the run summary and score distribution.
    #[arg(long)]
    pub no_summary: bool,

    /// Force every applicant's age.
    #[arg(long)]
    pub age: Option<u32>,

    /// Force every applicant's employment status.
    #[arg(long, value_enum)]
    pub employment: Option<EmploymentStatus>,

    /// Force every applicant's housing status.
    #[arg(long, value_enum)]
    pub housing: Option<Housing>,
}

#[derive(Debug, Parser, Clone)]
pub struct ConfigArgs {
    /// Write to this file instead of stdout.
    #[arg(short = 'o', long, value_name = "JSON")]
    pub output: Option<PathBuf>,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_generate_flags() {
        let cli = Cli::try_parse_from([
            "creditgen", "generate", "-n", "1", "--seed", "7", "--as-of", "2024-09-04", "--age", "45",
            "--employment", "full-time", "--housing", "owns",
        ])
        .unwrap();
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.count, 1);
        assert_eq!(args.seed, 7);
        assert_eq!(args.as_of, NaiveDate::from_ymd_opt(2024, 9, 4));
        assert_eq!(args.age, Some(45));
        assert_eq!(args.employment, Some(EmploymentStatus::FullTime));
        assert_eq!(args.housing, Some(Housing::Own));
    }

    #[test]
    fn rejects_bad_dates() {
        assert!(Cli::try_parse_from(["creditgen", "generate", "--as-of", "09/04/2024"]).is_err());
    }
}
