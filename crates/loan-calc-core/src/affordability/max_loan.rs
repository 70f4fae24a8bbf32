//! Maximum loan a borrower can service from a target monthly payment.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::error::LoanCalcError;
use crate::time_value;
use crate::types::{
    monthly_rate_from_percent, round_money, with_metadata, ComputationOutput, Money, Months,
    Percent, MAX_AMOUNT, MAX_RATE_PERCENT, MAX_TERM_MONTHS, MIN_AMOUNT,
};
use crate::LoanCalcResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityInput {
    /// Monthly payment the borrower can afford.
    pub desired_payment: Money,
    /// Annual nominal rate in percent.
    pub interest_rate: Percent,
    pub term_months: Months,
    #[serde(default)]
    pub down_payment: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityResult {
    pub max_loan_amount: Money,
    /// Max loan plus down payment.
    pub purchase_price: Money,
    /// Desired payment times term.
    pub total_payments: Money,
    pub total_interest: Money,
}

impl AffordabilityResult {
    pub fn rounded(&self, dp: u32) -> AffordabilityResult {
        AffordabilityResult {
            max_loan_amount: round_money(self.max_loan_amount, dp),
            purchase_price: round_money(self.purchase_price, dp),
            total_payments: round_money(self.total_payments, dp),
            total_interest: round_money(self.total_interest, dp),
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Closed-form inverse of the level payment formula:
/// `max_loan = pmt * (1 - (1 + r)^-n) / r`.
pub fn compute_max_loan(
    input: &AffordabilityInput,
) -> LoanCalcResult<ComputationOutput<AffordabilityResult>> {
    let start = Instant::now();
    validate_input(input)?;

    // Rates too small for Decimal round to zero here.
    let monthly_rate = monthly_rate_from_percent(input.interest_rate);
    if monthly_rate <= Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: "interest_rate".into(),
            reason: "Interest rate must be greater than zero".into(),
        });
    }

    let max_loan_amount = time_value::pv(
        monthly_rate,
        input.term_months,
        input.desired_payment,
        Decimal::ZERO,
    )?;
    let total_payments = input.desired_payment * Decimal::from(input.term_months);

    debug!(max_loan_amount = %max_loan_amount, "affordability computed");

    let output = AffordabilityResult {
        max_loan_amount,
        purchase_price: max_loan_amount + input.down_payment,
        total_payments,
        total_interest: total_payments - max_loan_amount,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Annuity Present Value (Maximum Serviceable Principal)",
        input,
        Vec::new(),
        elapsed,
        output,
    ))
}

fn validate_input(input: &AffordabilityInput) -> LoanCalcResult<()> {
    if input.desired_payment < MIN_AMOUNT {
        return Err(LoanCalcError::InvalidInput {
            field: "desired_payment".into(),
            reason: "Desired payment must be at least 0.01".into(),
        });
    }
    if input.desired_payment > MAX_AMOUNT {
        return Err(LoanCalcError::InvalidInput {
            field: "desired_payment".into(),
            reason: format!("Desired payment cannot exceed {MAX_AMOUNT}"),
        });
    }
    if input.interest_rate <= Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: "interest_rate".into(),
            reason: "Interest rate must be greater than zero".into(),
        });
    }
    if input.interest_rate > MAX_RATE_PERCENT {
        return Err(LoanCalcError::InvalidInput {
            field: "interest_rate".into(),
            reason: format!("Interest rate cannot exceed {MAX_RATE_PERCENT}%"),
        });
    }
    if input.term_months < 1 {
        return Err(LoanCalcError::InvalidInput {
            field: "term_months".into(),
            reason: "Term must be at least 1 month".into(),
        });
    }
    if input.term_months > MAX_TERM_MONTHS {
        return Err(LoanCalcError::InvalidInput {
            field: "term_months".into(),
            reason: format!("Term cannot exceed {MAX_TERM_MONTHS} months"),
        });
    }
    if input.down_payment < Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: "down_payment".into(),
            reason: "Down payment cannot be negative".into(),
        });
    }
    if input.down_payment > MAX_AMOUNT {
        return Err(LoanCalcError::InvalidInput {
            field: "down_payment".into(),
            reason: format!("Down payment cannot exceed {MAX_AMOUNT}"),
        });
    }
    Ok(())
}
