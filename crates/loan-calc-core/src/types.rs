use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::LoanCalcResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Periodic rates expressed as decimals (0.01 = 1% per month).
pub type Rate = Decimal;

/// Annual rates as entered by borrowers (11.9 = 11.9% per year).
pub type Percent = Decimal;

/// Loan terms are whole months.
pub type Months = u32;

/// Smallest principal or payment amount accepted anywhere in the core.
pub const MIN_AMOUNT: Money = dec!(0.01);

/// Largest principal, payment or balloon accepted anywhere in the core.
/// Keeps every schedule total well inside Decimal range.
pub const MAX_AMOUNT: Money = dec!(1000000000000);

/// Highest annual nominal rate, in percent, the engine and the
/// affordability calculator accept.
pub const MAX_RATE_PERCENT: Percent = dec!(1000);

/// Longest supported loan term (100 years).
pub const MAX_TERM_MONTHS: Months = 1200;

/// Decimal places used when presenting currency.
pub const CURRENCY_DP: u32 = 2;

/// Convert an annual nominal percentage into the monthly periodic rate.
pub fn monthly_rate_from_percent(annual: Percent) -> Rate {
    annual / dec!(100) / dec!(12)
}

/// Convert a monthly periodic rate into the nominal annual percentage (APR).
pub fn percent_from_monthly_rate(monthly: Rate) -> Percent {
    monthly * dec!(12) * dec!(100)
}

/// Round a value for display. Never used inside a simulation loop.
pub fn round_money(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

impl<T: Serialize> ComputationOutput<T> {
    /// Replace the result, keeping methodology, warnings and metadata.
    pub fn map<U: Serialize>(self, f: impl FnOnce(T) -> U) -> ComputationOutput<U> {
        ComputationOutput {
            result: f(self.result),
            methodology: self.methodology,
            assumptions: self.assumptions,
            warnings: self.warnings,
            metadata: self.metadata,
        }
    }

    pub fn to_value(&self) -> LoanCalcResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_conversions_are_inverse() {
        let monthly = monthly_rate_from_percent(dec!(11.9));
        assert!((percent_from_monthly_rate(monthly) - dec!(11.9)).abs() < dec!(0.0000000001));
    }

    #[test]
    fn test_round_money_midpoint_away_from_zero() {
        assert_eq!(round_money(dec!(2.345), 2), dec!(2.35));
        assert_eq!(round_money(dec!(-2.345), 2), dec!(-2.35));
        assert_eq!(round_money(dec!(1735.416666), 2), dec!(1735.42));
    }

    #[test]
    fn test_envelope_map_keeps_warnings() {
        let out = with_metadata("test", &"input", vec!["w".into()], 5, dec!(1));
        let mapped = out.map(|v| v * dec!(2));
        assert_eq!(mapped.result, dec!(2));
        assert_eq!(mapped.warnings, vec!["w".to_string()]);
        assert_eq!(mapped.methodology, "test");
    }
}
