use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use loan_calc_core::affordability::max_loan::{self, AffordabilityInput};
use loan_calc_core::amortization::engine::{self, LoanParameters};
use loan_calc_core::interest_rate::solver::{self, RateSolveInput, RateSolverConfig};
use loan_calc_core::CURRENCY_DP;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_schedule(input_json: String) -> NapiResult<String> {
    let input: LoanParameters = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = engine::compute_schedule(&input)
        .map_err(to_napi_error)?
        .map(|r| r.rounded(CURRENCY_DP));
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Interest rate
// ---------------------------------------------------------------------------

/// Rate-solve request with optional solver overrides.
#[derive(Deserialize)]
struct SolveRateRequest {
    #[serde(flatten)]
    input: RateSolveInput,
    #[serde(default)]
    solver: RateSolverConfig,
}

#[napi]
pub fn solve_rate(input_json: String) -> NapiResult<String> {
    let request: SolveRateRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = solver::solve_rate_with(&request.input, &request.solver)
        .map_err(to_napi_error)?
        .map(|r| r.rounded(CURRENCY_DP));
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Affordability
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_max_loan(input_json: String) -> NapiResult<String> {
    let input: AffordabilityInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = max_loan::compute_max_loan(&input)
        .map_err(to_napi_error)?
        .map(|r| r.rounded(CURRENCY_DP));
    serde_json::to_string(&output).map_err(to_napi_error)
}
