//! Annuity arithmetic shared by the amortization engine, the rate solver and
//! the affordability calculator. Rates here are periodic (monthly) decimals
//! and all amounts are positive: a loan is a present value that a stream of
//! payments plus a final lump sum repays.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::LoanCalcError;
use crate::types::{Money, Months, Rate};
use crate::LoanCalcResult;

/// Compound growth `(1 + rate)^nper`, or `None` when it leaves Decimal range.
pub fn growth_factor(rate: Rate, nper: Months) -> Option<Decimal> {
    Decimal::ONE.checked_add(rate)?.checked_powu(u64::from(nper))
}

/// Discount factor `(1 + rate)^-nper`.
///
/// Growth beyond Decimal range discounts to zero, which is the limit the
/// factor approaches anyway; callers never see an overflow.
pub fn discount_factor(rate: Rate, nper: Months) -> Decimal {
    match growth_factor(rate, nper) {
        Some(g) if !g.is_zero() => Decimal::ONE / g,
        _ => Decimal::ZERO,
    }
}

/// Present value of one unit paid at the end of each of `nper` periods:
/// `(1 - (1 + rate)^-nper) / rate`, or `nper` at a zero rate.
pub fn annuity_factor(rate: Rate, nper: Months) -> Decimal {
    if rate.is_zero() {
        return Decimal::from(nper);
    }
    (Decimal::ONE - discount_factor(rate, nper)) / rate
}

fn validate_rate(rate: Rate) -> LoanCalcResult<()> {
    if rate <= dec!(-1) {
        return Err(LoanCalcError::InvalidInput {
            field: "rate".into(),
            reason: "Periodic rate must be greater than -100%".into(),
        });
    }
    Ok(())
}

fn overflow(what: &str) -> LoanCalcError {
    LoanCalcError::Overflow(format!("{what} is outside Decimal range"))
}

/// Present Value of a level payment stream plus a lump sum in the final period.
pub fn pv(rate: Rate, nper: Months, pmt: Money, lump_sum: Money) -> LoanCalcResult<Money> {
    validate_rate(rate)?;
    let stream = pmt
        .checked_mul(annuity_factor(rate, nper))
        .ok_or_else(|| overflow("present value of payments"))?;
    let lump = lump_sum
        .checked_mul(discount_factor(rate, nper))
        .ok_or_else(|| overflow("present value of lump sum"))?;
    stream
        .checked_add(lump)
        .ok_or_else(|| overflow("present value"))
}

/// Level payment (PMT) that amortizes `present_value` down to exactly
/// `remaining` outstanding after `nper` periods.
pub fn pmt(rate: Rate, nper: Months, present_value: Money, remaining: Money) -> LoanCalcResult<Money> {
    if nper == 0 {
        return Err(LoanCalcError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }
    validate_rate(rate)?;

    let annuity = annuity_factor(rate, nper);
    if rate.is_zero() || annuity.is_zero() {
        return present_value
            .checked_sub(remaining)
            .and_then(|d| d.checked_div(Decimal::from(nper)))
            .ok_or_else(|| overflow("payment"));
    }

    let pv_remaining = remaining
        .checked_mul(discount_factor(rate, nper))
        .ok_or_else(|| overflow("discounted lump sum"))?;
    present_value
        .checked_sub(pv_remaining)
        .and_then(|financed| financed.checked_div(annuity))
        .ok_or_else(|| overflow("payment"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_pmt_standard_loan() {
        // 175,000 over 60 months at 11.9% nominal
        let r = dec!(0.119) / dec!(12);
        let result = pmt(r, 60, dec!(175000), Decimal::ZERO).unwrap();
        assert!((result - dec!(3883.94)).abs() < dec!(0.01));
    }

    #[test]
    fn test_pmt_zero_rate_splits_evenly() {
        let result = pmt(Decimal::ZERO, 10, dec!(1000), dec!(200)).unwrap();
        assert_eq!(result, dec!(80));
    }

    #[test]
    fn test_pmt_zero_periods_rejected() {
        let err = pmt(dec!(0.01), 0, dec!(1000), Decimal::ZERO).unwrap_err();
        assert_eq!(err.field(), Some("nper"));
    }

    #[test]
    fn test_pv_inverts_pmt_with_lump_sum() {
        let r = dec!(0.005);
        let payment = pmt(r, 36, dec!(20000), dec!(5000)).unwrap();
        let result = pv(r, 36, payment, dec!(5000)).unwrap();
        assert!((result - dec!(20000)).abs() < dec!(0.000001));
    }

    #[test]
    fn test_discount_factor_overflow_is_zero() {
        // 2^2000 is far outside Decimal range
        assert_eq!(discount_factor(Decimal::ONE, 2000), Decimal::ZERO);
        assert_eq!(annuity_factor(Decimal::ONE, 2000), Decimal::ONE);
    }

    #[test]
    fn test_annuity_factor_zero_rate() {
        assert_eq!(annuity_factor(Decimal::ZERO, 12), dec!(12));
    }

    #[test]
    fn test_pv_out_of_range_is_error_not_panic() {
        let err = pv(dec!(0.0000001), 1200, Decimal::MAX, Decimal::ZERO).unwrap_err();
        assert!(matches!(err, LoanCalcError::Overflow(_)));
    }

    #[test]
    fn test_pmt_out_of_range_is_error_not_panic() {
        let err = pmt(Decimal::ZERO, 12, Decimal::MAX, -Decimal::MAX).unwrap_err();
        assert!(matches!(err, LoanCalcError::Overflow(_)));
    }

    #[test]
    fn test_pv_rate_below_minus_one_rejected() {
        assert!(pv(dec!(-1), 12, dec!(100), Decimal::ZERO).is_err());
    }
}
