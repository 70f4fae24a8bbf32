use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_calc_core::amortization::engine::{self, LoanParameters};
use loan_calc_core::CURRENCY_DP;

use crate::input;

/// Arguments for building an amortization schedule
#[derive(Args)]
pub struct AmortizeArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan amount before the down payment
    #[arg(long)]
    pub loan_amount: Option<Decimal>,

    /// Annual nominal interest rate in percent (e.g. 11.9)
    #[arg(long, alias = "rate")]
    pub interest_rate: Option<Decimal>,

    /// Term in months
    #[arg(long, alias = "term")]
    pub term_months: Option<u32>,

    /// Down payment
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Balloon due at maturity
    #[arg(long, alias = "balloon")]
    pub balloon_payment: Option<Decimal>,

    /// Extra principal paid every month
    #[arg(long, alias = "extra")]
    pub extra_monthly_payment: Option<Decimal>,

    /// One-time principal payment
    #[arg(long)]
    pub one_time_payment_amount: Option<Decimal>,

    /// Month (1-indexed) of the one-time payment
    #[arg(long)]
    pub one_time_payment_month: Option<u32>,

    /// Due date of the first payment (YYYY-MM-DD)
    #[arg(long)]
    pub first_payment_date: Option<NaiveDate>,
}

pub fn run_amortize(args: AmortizeArgs, raw: bool) -> Result<Value, Box<dyn std::error::Error>> {
    let params: LoanParameters = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        piped
    } else {
        LoanParameters {
            loan_amount: args
                .loan_amount
                .ok_or("--loan-amount is required (or provide --input)")?,
            interest_rate: args
                .interest_rate
                .ok_or("--interest-rate is required (or provide --input)")?,
            term_months: args
                .term_months
                .ok_or("--term-months is required (or provide --input)")?,
            down_payment: args.down_payment.unwrap_or(Decimal::ZERO),
            balloon_payment: args.balloon_payment.unwrap_or(Decimal::ZERO),
            extra_monthly_payment: args.extra_monthly_payment,
            one_time_payment_amount: args.one_time_payment_amount,
            one_time_payment_month: args.one_time_payment_month,
            first_payment_date: args.first_payment_date,
        }
    };

    let result = engine::compute_schedule(&params)?;
    let result = if raw {
        result
    } else {
        result.map(|r| r.rounded(CURRENCY_DP))
    };
    Ok(result.to_value()?)
}
