mod commands;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::affordability::AffordabilityArgs;
use commands::amortization::AmortizeArgs;
use commands::interest_rate::SolveRateArgs;

/// Loan amortization, interest-rate and affordability calculations
#[derive(Parser)]
#[command(
    name = "loancalc",
    version,
    about = "Loan amortization, interest-rate and affordability calculations",
    long_about = "A CLI for loan calculations with decimal precision. Builds amortization \
                  schedules with extra, one-time and balloon payments, solves the implied \
                  interest rate of a payment stream, and sizes the maximum affordable loan."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Print amounts at full precision instead of rounding to cents
    #[arg(long, global = true)]
    raw: bool,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an amortization schedule
    Amortize(AmortizeArgs),
    /// Solve the nominal annual rate implied by a payment stream
    SolveRate(SolveRateArgs),
    /// Maximum loan and purchase price for a target monthly payment
    Affordability(AffordabilityArgs),
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
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Amortize(args) => commands::amortization::run_amortize(args, cli.raw),
        Commands::SolveRate(args) => commands::interest_rate::run_solve_rate(args, cli.raw),
        Commands::Affordability(args) => commands::affordability::run_affordability(args, cli.raw),
        Commands::Version => {
            println!("loancalc {}", env!("CARGO_PKG_VERSION"));
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
