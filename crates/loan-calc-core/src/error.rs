use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoanCalcError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error(
        "Rate equation has no sign change for monthly rates in [{rate_lower}, {rate_upper}] \
         after {doublings} doublings (loan amount {loan_amount}, total payments {total_payments})"
    )]
    Unbracketable {
        loan_amount: Decimal,
        total_payments: Decimal,
        rate_lower: Decimal,
        rate_upper: Decimal,
        doublings: u32,
    },

    #[error("Arithmetic overflow: {0}")]
    Overflow(String),

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl LoanCalcError {
    /// Input field responsible for the failure, if the error is field-specific.
    pub fn field(&self) -> Option<&str> {
        match self {
            LoanCalcError::InvalidInput { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for LoanCalcError {
    fn from(e: serde_json::Error) -> Self {
        LoanCalcError::SerializationError(e.to_string())
    }
}
