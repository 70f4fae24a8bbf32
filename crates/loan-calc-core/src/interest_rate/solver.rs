//! Implied interest rate of a loan.
//!
//! Inverts the annuity-plus-balloon present value equation
//!
//! ```text
//! f(r) = pmt * (1 - (1 + r)^-n) / r + balloon / (1 + r)^n - loan
//! ```
//!
//! for the monthly rate `r` by bracketed bisection, and reports it as a
//! nominal APR (`r * 12 * 100`). When the iteration budget runs out before
//! `|f(r)|` drops below the tolerance, the last midpoint is returned tagged
//! [`Convergence::Degraded`] together with a warning.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::error::LoanCalcError;
use crate::time_value;
use crate::types::{
    percent_from_monthly_rate, round_money, with_metadata, ComputationOutput, Money, Months,
    Percent, Rate, MAX_AMOUNT, MAX_TERM_MONTHS, MIN_AMOUNT,
};
use crate::LoanCalcResult;

/// Solved APRs at or above this are flagged; display layers usually clamp.
const HIGH_RATE_WARNING: Percent = dec!(100);

/// Bracket limits that keep every doubled upper bound inside Decimal range.
const MAX_INITIAL_UPPER: Rate = dec!(1000000);
const MAX_DOUBLINGS: u32 = 64;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateSolveInput {
    pub loan_amount: Money,
    pub monthly_payment: Money,
    pub term_months: Months,
    #[serde(default)]
    pub balloon_payment: Money,
}

/// Search bounds and stopping rules for the bisection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateSolverConfig {
    /// Lower end of the initial monthly-rate bracket.
    pub initial_lower: Rate,
    /// Upper end of the initial bracket; doubled until the root is enclosed.
    pub initial_upper: Rate,
    pub max_doublings: u32,
    pub max_iterations: u32,
    /// Converged once `|f(r)|` (in currency units) falls below this.
    pub tolerance: Decimal,
}

impl Default for RateSolverConfig {
    fn default() -> Self {
        RateSolverConfig {
            initial_lower: dec!(0.0000001),
            initial_upper: Decimal::ONE,
            max_doublings: 20,
            max_iterations: 100,
            tolerance: dec!(0.000000001),
        }
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Convergence {
    /// `|f(r)|` fell below the tolerance.
    Converged,
    /// Iteration budget exhausted; the rate is the last bisection midpoint.
    Degraded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateSolution {
    /// Nominal annual rate in percent (monthly rate x 12, not compounded).
    pub annual_rate: Percent,
    pub monthly_rate: Rate,
    pub convergence: Convergence,
    /// Bisection steps taken.
    pub iterations: u32,
    /// Times the upper bracket was doubled before the root was enclosed.
    pub bracket_doublings: u32,
    /// `|f(r)|` at the returned rate.
    pub residual: Decimal,
}

impl RateSolution {
    pub fn is_converged(&self) -> bool {
        self.convergence == Convergence::Converged
    }

    /// Copy with the annual rate rounded for display.
    pub fn rounded(&self, dp: u32) -> RateSolution {
        RateSolution {
            annual_rate: round_money(self.annual_rate, dp),
            ..self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Solve for the nominal annual rate with the default solver settings.
pub fn solve_rate(input: &RateSolveInput) -> LoanCalcResult<ComputationOutput<RateSolution>> {
    solve_rate_with(input, &RateSolverConfig::default())
}

/// Solve for the nominal annual rate with explicit solver settings.
pub fn solve_rate_with(
    input: &RateSolveInput,
    config: &RateSolverConfig,
) -> LoanCalcResult<ComputationOutput<RateSolution>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;
    validate_config(config)?;

    let solution = bisect(input, config)?;

    if !solution.is_converged() {
        warn!(
            iterations = solution.iterations,
            residual = %solution.residual,
            "rate bisection did not reach tolerance"
        );
        warnings.push(format!(
            "Degraded convergence: |f(r)| = {} after {} iterations (tolerance {}); rate is a best-effort estimate",
            solution.residual, solution.iterations, config.tolerance
        ));
    }
    if solution.annual_rate >= HIGH_RATE_WARNING {
        warnings.push(format!(
            "Solved rate {}% APR is at or above 100%",
            round_money(solution.annual_rate, 2)
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Annuity Rate Inversion (Bracketed Bisection, Nominal APR)",
        input,
        warnings,
        elapsed,
        solution,
    ))
}

// ---------------------------------------------------------------------------
// Bisection
// ---------------------------------------------------------------------------

/// Present value of the payment stream at `rate` less the loan amount.
fn residual(input: &RateSolveInput, rate: Rate) -> LoanCalcResult<Decimal> {
    let pv = time_value::pv(
        rate,
        input.term_months,
        input.monthly_payment,
        input.balloon_payment,
    )?;
    Ok(pv - input.loan_amount)
}

fn same_sign(a: Decimal, b: Decimal) -> bool {
    (a > Decimal::ZERO && b > Decimal::ZERO) || (a < Decimal::ZERO && b < Decimal::ZERO)
}

fn bisect(input: &RateSolveInput, config: &RateSolverConfig) -> LoanCalcResult<RateSolution> {
    let mut lower = config.initial_lower;
    let mut upper = config.initial_upper;
    let mut f_lower = residual(input, lower)?;
    let mut f_upper = residual(input, upper)?;

    let mut doublings = 0;
    while same_sign(f_lower, f_upper) && doublings < config.max_doublings {
        upper *= dec!(2);
        f_upper = residual(input, upper)?;
        doublings += 1;
        debug!(doublings, upper = %upper, "expanding rate bracket");
    }

    if same_sign(f_lower, f_upper) {
        let total_payments =
            input.monthly_payment * Decimal::from(input.term_months) + input.balloon_payment;
        let root_above_range = f_upper > Decimal::ZERO;
        warn!(
            loan_amount = %input.loan_amount,
            total_payments = %total_payments,
            root_above_range,
            "rate equation has no sign change in the search range"
        );
        return Err(LoanCalcError::Unbracketable {
            loan_amount: input.loan_amount,
            total_payments,
            rate_lower: lower,
            rate_upper: upper,
            doublings,
        });
    }

    let mut mid = lower;
    let mut f_mid = f_lower;
    for iteration in 1..=config.max_iterations {
        mid = (lower + upper) / dec!(2);
        f_mid = residual(input, mid)?;

        if f_mid.abs() < config.tolerance {
            debug!(iteration, monthly_rate = %mid, "rate bisection converged");
            return Ok(RateSolution {
                annual_rate: percent_from_monthly_rate(mid),
                monthly_rate: mid,
                convergence: Convergence::Converged,
                iterations: iteration,
                bracket_doublings: doublings,
                residual: f_mid.abs(),
            });
        }

        if same_sign(f_lower, f_mid) || f_lower.is_zero() {
            lower = mid;
            f_lower = f_mid;
        } else {
            upper = mid;
        }
    }

    Ok(RateSolution {
        annual_rate: percent_from_monthly_rate(mid),
        monthly_rate: mid,
        convergence: Convergence::Degraded,
        iterations: config.max_iterations,
        bracket_doublings: doublings,
        residual: f_mid.abs(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &RateSolveInput) -> LoanCalcResult<()> {
    if input.loan_amount < MIN_AMOUNT {
        return Err(LoanCalcError::InvalidInput {
            field: "loan_amount".into(),
            reason: "Loan amount must be at least 0.01".into(),
        });
    }
    if input.loan_amount > MAX_AMOUNT {
        return Err(LoanCalcError::InvalidInput {
            field: "loan_amount".into(),
            reason: format!("Loan amount cannot exceed {MAX_AMOUNT}"),
        });
    }
    if input.monthly_payment <= Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: "monthly_payment".into(),
            reason: "Monthly payment must be greater than zero".into(),
        });
    }
    if input.monthly_payment > MAX_AMOUNT {
        return Err(LoanCalcError::InvalidInput {
            field: "monthly_payment".into(),
            reason: format!("Monthly payment cannot exceed {MAX_AMOUNT}"),
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
    if input.balloon_payment < Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: "balloon_payment".into(),
            reason: "Balloon payment cannot be negative".into(),
        });
    }
    if input.balloon_payment > input.loan_amount {
        return Err(LoanCalcError::InvalidInput {
            field: "balloon_payment".into(),
            reason: "Balloon cannot exceed loan amount".into(),
        });
    }
    Ok(())
}

fn validate_config(config: &RateSolverConfig) -> LoanCalcResult<()> {
    if config.initial_lower <= Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: "solver.initial_lower".into(),
            reason: "Lower bracket must be a positive monthly rate".into(),
        });
    }
    if config.initial_upper <= config.initial_lower {
        return Err(LoanCalcError::InvalidInput {
            field: "solver.initial_upper".into(),
            reason: "Upper bracket must exceed the lower bracket".into(),
        });
    }
    if config.initial_upper > MAX_INITIAL_UPPER {
        return Err(LoanCalcError::InvalidInput {
            field: "solver.initial_upper".into(),
            reason: format!("Upper bracket cannot exceed a monthly rate of {MAX_INITIAL_UPPER}"),
        });
    }
    if config.max_doublings > MAX_DOUBLINGS {
        return Err(LoanCalcError::InvalidInput {
            field: "solver.max_doublings".into(),
            reason: format!("At most {MAX_DOUBLINGS} bracket doublings are allowed"),
        });
    }
    if config.tolerance <= Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: "solver.tolerance".into(),
            reason: "Tolerance must be positive".into(),
        });
    }
    if config.max_iterations == 0 {
        return Err(LoanCalcError::InvalidInput {
            field: "solver.max_iterations".into(),
            reason: "At least one bisection iteration is required".into(),
        });
    }
    Ok(())
}
