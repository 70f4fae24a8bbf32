use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_calc_core::affordability::max_loan::{self, AffordabilityInput};
use loan_calc_core::CURRENCY_DP;

use crate::input;

/// Arguments for the affordability calculation
#[derive(Args)]
pub struct AffordabilityArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Monthly payment the borrower can afford
    #[arg(long, alias = "payment")]
    pub desired_payment: Option<Decimal>,

    /// Annual nominal interest rate in percent
    #[arg(long, alias = "rate")]
    pub interest_rate: Option<Decimal>,

    /// Term in months
    #[arg(long, alias = "term")]
    pub term_months: Option<u32>,

    /// Down payment added to the purchase price
    #[arg(long)]
    pub down_payment: Option<Decimal>,
}

pub fn run_affordability(
    args: AffordabilityArgs,
    raw: bool,
) -> Result<Value, Box<dyn std::error::Error>> {
    let afford_input: AffordabilityInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        piped
    } else {
        AffordabilityInput {
            desired_payment: args
                .desired_payment
                .ok_or("--desired-payment is required (or provide --input)")?,
            interest_rate: args
                .interest_rate
                .ok_or("--interest-rate is required (or provide --input)")?,
            term_months: args
                .term_months
                .ok_or("--term-months is required (or provide --input)")?,
            down_payment: args.down_payment.unwrap_or(Decimal::ZERO),
        }
    };

    let result = max_loan::compute_max_loan(&afford_input)?;
    let result = if raw {
        result
    } else {
        result.map(|r| r.rounded(CURRENCY_DP))
    };
    Ok(result.to_value()?)
}
