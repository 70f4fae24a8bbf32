pub mod affordability;
pub mod amortization;
pub mod interest_rate;
