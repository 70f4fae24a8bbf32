//! Amortization engine: level payment, month-by-month schedule with extra,
//! one-time and balloon payments, and the interest saved against a run
//! without the extras.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use super::schedule::{AmortizationResult, ScheduleEntry};
use crate::error::LoanCalcError;
use crate::time_value;
use crate::types::{
    monthly_rate_from_percent, with_metadata, ComputationOutput, Money, Months, Percent, Rate,
    MAX_AMOUNT, MAX_RATE_PERCENT, MAX_TERM_MONTHS, MIN_AMOUNT,
};
use crate::LoanCalcResult;

/// Residual balance treated as fully repaid.
const BALANCE_EPSILON: Decimal = dec!(0.000000001);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Parameters of a single amortization request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoanParameters {
    /// Purchase / loan amount before the down payment.
    pub loan_amount: Money,
    /// Annual nominal rate in percent (11.9 = 11.9%).
    pub interest_rate: Percent,
    pub term_months: Months,
    #[serde(default)]
    pub down_payment: Money,
    /// Amount left outstanding at maturity and settled as a lump sum.
    #[serde(default)]
    pub balloon_payment: Money,
    /// Paid on top of the level payment every month.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_monthly_payment: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_time_payment_amount: Option<Money>,
    /// 1-indexed month in which the one-time payment is made.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_time_payment_month: Option<Months>,
    /// Due date of month 1; later rows fall on the same day of each month.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_payment_date: Option<NaiveDate>,
}

impl LoanParameters {
    pub fn new(loan_amount: Money, interest_rate: Percent, term_months: Months) -> Self {
        LoanParameters {
            loan_amount,
            interest_rate,
            term_months,
            ..Default::default()
        }
    }

    pub fn amortizing_principal(&self) -> Money {
        self.loan_amount - self.down_payment
    }

    /// Same loan with extra and one-time payments removed.
    pub fn without_extra_payments(&self) -> Self {
        LoanParameters {
            extra_monthly_payment: None,
            one_time_payment_amount: None,
            one_time_payment_month: None,
            ..self.clone()
        }
    }

    fn extra(&self) -> Money {
        self.extra_monthly_payment.unwrap_or(Decimal::ZERO)
    }

    fn one_time(&self) -> Option<(Months, Money)> {
        match (self.one_time_payment_month, self.one_time_payment_amount) {
            (Some(month), Some(amount)) if !amount.is_zero() => Some((month, amount)),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build the amortization schedule for a loan.
pub fn compute_schedule(
    params: &LoanParameters,
) -> LoanCalcResult<ComputationOutput<AmortizationResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_params(params)?;

    let principal = params.amortizing_principal();
    let monthly_rate = monthly_rate_from_percent(params.interest_rate);
    let payment = time_value::pmt(
        monthly_rate,
        params.term_months,
        principal,
        params.balloon_payment,
    )?;

    let actual = simulate(params, principal, monthly_rate, payment)?;
    let baseline = simulate(
        &params.without_extra_payments(),
        principal,
        monthly_rate,
        payment,
    )?;

    if let Some((month, _)) = params.one_time() {
        if month > actual.payoff_month {
            warnings.push(format!(
                "One-time payment month {month} falls after payoff in month {}; amount was not applied",
                actual.payoff_month
            ));
        }
    }
    if params.balloon_payment > Decimal::ZERO && !actual.balloon_settled {
        warnings.push(format!(
            "Loan is repaid in month {} before the balloon of {} falls due",
            actual.payoff_month, params.balloon_payment
        ));
    }

    let interest_saved = baseline.total_interest - actual.total_interest;
    debug!(
        payoff_month = actual.payoff_month,
        monthly_payment = %payment,
        interest_saved = %interest_saved,
        "amortization schedule built"
    );

    let output = AmortizationResult {
        monthly_payment: payment,
        amortizing_principal: principal,
        schedule: actual.schedule,
        payoff_month: actual.payoff_month,
        total_interest_paid: actual.total_interest,
        total_interest_baseline: baseline.total_interest,
        interest_saved,
        total_paid: actual.total_paid,
        baseline_payoff_month: baseline.payoff_month,
        months_saved: baseline.payoff_month.saturating_sub(actual.payoff_month),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-Payment Amortization with PV-Discounted Balloon",
        params,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

struct Simulation {
    schedule: Vec<ScheduleEntry>,
    payoff_month: Months,
    total_interest: Money,
    total_paid: Money,
    balloon_settled: bool,
}

/// Walk the loan month by month. Interest accrues on the balance entering the
/// month; principal is capped at that balance, leaving the interest as charged.
fn simulate(
    params: &LoanParameters,
    principal: Money,
    monthly_rate: Rate,
    payment: Money,
) -> LoanCalcResult<Simulation> {
    let term = params.term_months;
    let extra = params.extra();
    let one_time = params.one_time();

    let mut schedule = Vec::with_capacity(term as usize + 2);
    schedule.push(ScheduleEntry::Opening {
        balance: principal + params.balloon_payment,
    });

    let mut balance = principal;
    let mut total_interest = Decimal::ZERO;
    let mut total_paid = Decimal::ZERO;
    let mut payoff_month = None;

    for month in 1..=term {
        let interest = balance * monthly_rate;
        let mut principal_paid = payment - interest + extra;
        if let Some((due, amount)) = one_time {
            if due == month {
                principal_paid += amount;
            }
        }
        if balance - principal_paid <= BALANCE_EPSILON {
            principal_paid = balance;
        }

        balance -= principal_paid;
        total_interest += interest;
        total_paid += principal_paid + interest;

        schedule.push(ScheduleEntry::Regular {
            month,
            payment_date: payment_date(params.first_payment_date, month)?,
            payment: principal_paid + interest,
            interest,
            principal: principal_paid,
            balance,
        });

        if balance <= Decimal::ZERO {
            payoff_month = Some(month);
            break;
        }
    }

    let mut balloon_settled = false;
    let payoff_month = match payoff_month {
        Some(month) => month,
        None => {
            if params.balloon_payment > Decimal::ZERO && balance > Decimal::ZERO {
                schedule.push(ScheduleEntry::BalloonSettlement {
                    payment_date: payment_date(params.first_payment_date, term)?,
                    payment: balance,
                    principal: balance,
                    balance: Decimal::ZERO,
                });
                total_paid += balance;
                balloon_settled = true;
            }
            term
        }
    };

    Ok(Simulation {
        schedule,
        payoff_month,
        total_interest,
        total_paid,
        balloon_settled,
    })
}

fn payment_date(first: Option<NaiveDate>, month: Months) -> LoanCalcResult<Option<NaiveDate>> {
    let Some(first) = first else {
        return Ok(None);
    };
    first
        .checked_add_months(chrono::Months::new(month - 1))
        .map(Some)
        .ok_or_else(|| {
            LoanCalcError::DateError(format!(
                "Payment date for month {month} is out of range (first payment {first})"
            ))
        })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_params(params: &LoanParameters) -> LoanCalcResult<()> {
    if params.loan_amount < MIN_AMOUNT {
        return Err(LoanCalcError::InvalidInput {
            field: "loan_amount".into(),
            reason: "Loan amount must be at least 0.01".into(),
        });
    }
    if params.loan_amount > MAX_AMOUNT {
        return Err(LoanCalcError::InvalidInput {
            field: "loan_amount".into(),
            reason: format!("Loan amount cannot exceed {MAX_AMOUNT}"),
        });
    }
    if params.interest_rate < Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: "interest_rate".into(),
            reason: "Interest rate cannot be negative".into(),
        });
    }
    if params.interest_rate > MAX_RATE_PERCENT {
        return Err(LoanCalcError::InvalidInput {
            field: "interest_rate".into(),
            reason: format!("Interest rate cannot exceed {MAX_RATE_PERCENT}%"),
        });
    }
    if params.term_months < 1 {
        return Err(LoanCalcError::InvalidInput {
            field: "term_months".into(),
            reason: "Term must be at least 1 month".into(),
        });
    }
    if params.term_months > MAX_TERM_MONTHS {
        return Err(LoanCalcError::InvalidInput {
            field: "term_months".into(),
            reason: format!("Term cannot exceed {MAX_TERM_MONTHS} months"),
        });
    }
    if params.down_payment < Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: "down_payment".into(),
            reason: "Down payment cannot be negative".into(),
        });
    }
    if params.down_payment > params.loan_amount {
        return Err(LoanCalcError::InvalidInput {
            field: "down_payment".into(),
            reason: "Down payment cannot exceed loan amount".into(),
        });
    }
    if params.balloon_payment < Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: "balloon_payment".into(),
            reason: "Balloon payment cannot be negative".into(),
        });
    }
    if params.balloon_payment > params.amortizing_principal() {
        return Err(LoanCalcError::InvalidInput {
            field: "balloon_payment".into(),
            reason: "Balloon cannot exceed loan amount after down payment".into(),
        });
    }
    if params.extra() < Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: "extra_monthly_payment".into(),
            reason: "Extra monthly payment cannot be negative".into(),
        });
    }
    if params.extra() > MAX_AMOUNT {
        return Err(LoanCalcError::InvalidInput {
            field: "extra_monthly_payment".into(),
            reason: format!("Extra monthly payment cannot exceed {MAX_AMOUNT}"),
        });
    }
    if let Some(amount) = params.one_time_payment_amount {
        if amount < Decimal::ZERO {
            return Err(LoanCalcError::InvalidInput {
                field: "one_time_payment_amount".into(),
                reason: "One-time payment cannot be negative".into(),
            });
        }
        if amount > MAX_AMOUNT {
            return Err(LoanCalcError::InvalidInput {
                field: "one_time_payment_amount".into(),
                reason: format!("One-time payment cannot exceed {MAX_AMOUNT}"),
            });
        }
        if amount > Decimal::ZERO && params.one_time_payment_month.is_none() {
            return Err(LoanCalcError::InvalidInput {
                field: "one_time_payment_month".into(),
                reason: "Month is required when a one-time payment amount is given".into(),
            });
        }
    }
    if let Some(month) = params.one_time_payment_month {
        if month < 1 || month > params.term_months {
            return Err(LoanCalcError::InvalidInput {
                field: "one_time_payment_month".into(),
                reason: format!(
                    "One-time payment month must be between 1 and {}",
                    params.term_months
                ),
            });
        }
    }
    Ok(())
}
