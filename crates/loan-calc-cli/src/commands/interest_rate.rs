use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_calc_core::interest_rate::solver::{self, RateSolveInput, RateSolverConfig};
use loan_calc_core::CURRENCY_DP;

use crate::input;

/// Arguments for solving the implied interest rate
#[derive(Args)]
pub struct SolveRateArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount financed
    #[arg(long)]
    pub loan_amount: Option<Decimal>,

    /// Level monthly payment
    #[arg(long, alias = "payment")]
    pub monthly_payment: Option<Decimal>,

    /// Term in months
    #[arg(long, alias = "term")]
    pub term_months: Option<u32>,

    /// Balloon due at maturity
    #[arg(long, alias = "balloon")]
    pub balloon_payment: Option<Decimal>,

    /// Bisection iteration budget
    #[arg(long)]
    pub max_iterations: Option<u32>,

    /// Convergence tolerance on the present value residual
    #[arg(long)]
    pub tolerance: Option<Decimal>,
}

pub fn run_solve_rate(args: SolveRateArgs, raw: bool) -> Result<Value, Box<dyn std::error::Error>> {
    let rate_input: RateSolveInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        piped
    } else {
        RateSolveInput {
            loan_amount: args
                .loan_amount
                .ok_or("--loan-amount is required (or provide --input)")?,
            monthly_payment: args
                .monthly_payment
                .ok_or("--monthly-payment is required (or provide --input)")?,
            term_months: args
                .term_months
                .ok_or("--term-months is required (or provide --input)")?,
            balloon_payment: args.balloon_payment.unwrap_or(Decimal::ZERO),
        }
    };

    let mut config = RateSolverConfig::default();
    if let Some(max_iterations) = args.max_iterations {
        config.max_iterations = max_iterations;
    }
    if let Some(tolerance) = args.tolerance {
        config.tolerance = tolerance;
    }

    let result = solver::solve_rate_with(&rate_input, &config)?;
    let result = if raw {
        result
    } else {
        result.map(|r| r.rounded(CURRENCY_DP))
    };
    Ok(result.to_value()?)
}
