mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::compare::CompareArgs;
use commands::schedule::ScheduleArgs;

/// Business line of credit amortization schedules
#[derive(Parser)]
#[command(
    name = "loc",
    version,
    about = "Business line of credit amortization schedules",
    long_about = "Computes the period-by-period schedule of a revolving business line \
                  of credit: a two-year draw period followed by a fully amortizing \
                  repayment period, with fees, payment policies and rate changes. \
                  Set RUST_LOG=debug to trace rate changes and re-amortizations."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a draw + repayment schedule
    Schedule(ScheduleArgs),
    /// Compare two or more scenarios against the first
    Compare(CompareArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Schedule(args) => commands::schedule::run_schedule(args),
        Commands::Compare(args) => commands::compare::run_compare(args),
        Commands::Version => {
            println!("loc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
