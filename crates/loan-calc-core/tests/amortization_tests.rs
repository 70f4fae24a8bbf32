use loan_calc_core::amortization::engine::{compute_schedule, LoanParameters};
use loan_calc_core::amortization::schedule::ScheduleEntry;
use loan_calc_core::LoanCalcError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const BALANCE_TOL: Decimal = dec!(0.000001);

fn car_loan() -> LoanParameters {
    LoanParameters::new(dec!(175000), dec!(11.9), 60)
}

fn sum_principal(entries: &[ScheduleEntry]) -> Decimal {
    entries
        .iter()
        .filter(|e| e.is_regular())
        .filter_map(ScheduleEntry::principal)
        .sum()
}

// ===========================================================================
// Fully amortizing loans
// ===========================================================================

#[test]
fn test_level_payment_and_first_month_split() {
    let out = compute_schedule(&car_loan()).unwrap().result;

    // 175,000 x (0.119/12) / (1 - (1 + 0.119/12)^-60)
    assert!((out.monthly_payment - dec!(3883.94)).abs() < dec!(0.01));

    match &out.schedule[1] {
        ScheduleEntry::Regular {
            month,
            interest,
            principal,
            payment,
            ..
        } => {
            assert_eq!(*month, 1);
            assert!((*interest - dec!(1735.42)).abs() < dec!(0.01));
            assert!((*principal - dec!(2148.52)).abs() < dec!(0.01));
            assert_eq!(*payment, *interest + *principal);
        }
        other => panic!("Expected a regular row, got {other:?}"),
    }

    assert_eq!(out.payoff_month, 60);
    assert!(out.final_balance().abs() < BALANCE_TOL);
}

#[test]
fn test_principal_sums_to_amortizing_principal() {
    for (amount, rate, term) in [
        (dec!(175000), dec!(11.9), 60),
        (dec!(350000), dec!(6.5), 360),
        (dec!(8000), dec!(0), 24),
        (dec!(5000), dec!(29.99), 7),
    ] {
        let mut params = LoanParameters::new(amount, rate, term);
        params.down_payment = amount / dec!(10);
        let out = compute_schedule(&params).unwrap().result;

        assert_eq!(out.payoff_month, term);
        assert!(out.final_balance().abs() < BALANCE_TOL);
        let diff = sum_principal(&out.schedule) - out.amortizing_principal;
        assert!(diff.abs() < BALANCE_TOL, "principal drift {diff} for {amount} @ {rate}");
    }
}

#[test]
fn test_total_paid_is_principal_plus_interest() {
    let out = compute_schedule(&car_loan()).unwrap().result;
    let diff = out.total_paid - (out.amortizing_principal + out.total_interest_paid);
    assert!(diff.abs() < BALANCE_TOL);
}

#[test]
fn test_thirty_year_mortgage_schedule_length() {
    let out = compute_schedule(&LoanParameters::new(dec!(400000), dec!(7), 360))
        .unwrap()
        .result;
    assert_eq!(out.schedule.len(), 361);
    assert!((out.monthly_payment - dec!(2661.21)).abs() < dec!(0.01));
}

#[test]
fn test_maximum_term_is_bounded() {
    let out = compute_schedule(&LoanParameters::new(dec!(100000), dec!(5), 1200))
        .unwrap()
        .result;
    assert_eq!(out.payoff_month, 1200);
    assert!(out.final_balance().abs() < BALANCE_TOL);
}

// ===========================================================================
// Extra and one-time payments
// ===========================================================================

#[test]
fn test_extra_payment_shortens_term_and_saves_interest() {
    let mut params = car_loan();
    params.extra_monthly_payment = Some(dec!(500));
    let out = compute_schedule(&params).unwrap().result;

    assert!(out.payoff_month < 60);
    assert!(out.interest_saved > Decimal::ZERO);
    assert_eq!(
        out.interest_saved,
        out.total_interest_baseline - out.total_interest_paid
    );
    assert_eq!(out.final_balance(), Decimal::ZERO);
}

#[test]
fn test_extra_payments_never_increase_interest() {
    let mut previous_paid = None;
    for extra in [dec!(0), dec!(50), dec!(250), dec!(1000), dec!(10000), dec!(200000)] {
        let mut params = car_loan();
        params.balloon_payment = dec!(25000);
        params.extra_monthly_payment = Some(extra);
        params.one_time_payment_amount = Some(extra);
        params.one_time_payment_month = Some(6);
        let out = compute_schedule(&params).unwrap().result;

        assert!(out.interest_saved >= Decimal::ZERO);
        if let Some(prev) = previous_paid {
            assert!(out.total_interest_paid <= prev);
        }
        previous_paid = Some(out.total_interest_paid);
    }
}

#[test]
fn test_zero_extra_matches_plain_schedule() {
    let mut params = car_loan();
    params.extra_monthly_payment = Some(Decimal::ZERO);
    params.one_time_payment_amount = Some(Decimal::ZERO);
    params.one_time_payment_month = Some(3);

    let with_zero = compute_schedule(&params).unwrap().result;
    let plain = compute_schedule(&car_loan()).unwrap().result;
    assert_eq!(with_zero.schedule, plain.schedule);
    assert_eq!(with_zero.interest_saved, Decimal::ZERO);
}

#[test]
fn test_extra_payments_keep_contractual_payment() {
    let mut params = car_loan();
    params.extra_monthly_payment = Some(dec!(750));
    let with_extra = compute_schedule(&params).unwrap().result;
    let plain = compute_schedule(&car_loan()).unwrap().result;
    assert_eq!(with_extra.monthly_payment, plain.monthly_payment);
    assert_eq!(with_extra.total_interest_baseline, plain.total_interest_paid);
}

#[test]
fn test_one_time_payment_larger_than_balance_pays_off() {
    let mut params = car_loan();
    params.one_time_payment_amount = Some(dec!(500000));
    params.one_time_payment_month = Some(2);
    let out = compute_schedule(&params).unwrap().result;

    assert_eq!(out.payoff_month, 2);
    assert_eq!(out.schedule.len(), 3);
    let last = out.schedule.last().unwrap();
    assert_eq!(last.principal(), Some(out.schedule[1].balance()));
    assert_eq!(last.balance(), Decimal::ZERO);
}

// ===========================================================================
// Balloon payments
// ===========================================================================

#[test]
fn test_balloon_schedule_shape() {
    let mut params = car_loan();
    params.down_payment = dec!(25000);
    params.balloon_payment = dec!(40000);
    let out = compute_schedule(&params).unwrap().result;

    assert_eq!(out.schedule[0], ScheduleEntry::Opening { balance: dec!(190000) });
    assert_eq!(out.schedule.len(), 62);
    assert!(out.schedule.last().unwrap().is_balloon());
    assert_eq!(out.payoff_month, 60);

    // Regular principal repays everything except the balloon.
    let regular_principal = sum_principal(&out.schedule);
    assert!((regular_principal - dec!(110000)).abs() < BALANCE_TOL);

    let total_principal: Decimal = out.schedule.iter().filter_map(ScheduleEntry::principal).sum();
    assert!((total_principal - dec!(150000)).abs() < BALANCE_TOL);
}

#[test]
fn test_balloon_equal_to_principal_at_zero_rate_is_interest_free_bullet() {
    let mut params = LoanParameters::new(dec!(10000), Decimal::ZERO, 12);
    params.balloon_payment = dec!(10000);
    let out = compute_schedule(&params).unwrap().result;

    assert_eq!(out.monthly_payment, Decimal::ZERO);
    assert_eq!(out.balloon_entry().unwrap().payment(), Some(dec!(10000)));
    assert_eq!(out.total_paid, dec!(10000));
}

// ===========================================================================
// Serialization and errors
// ===========================================================================

#[test]
fn test_parameters_deserialize_with_defaults() {
    let params: LoanParameters = serde_json::from_str(
        r#"{"loan_amount": 175000, "interest_rate": "11.9", "term_months": 60}"#,
    )
    .unwrap();
    assert_eq!(params.down_payment, Decimal::ZERO);
    assert_eq!(params.balloon_payment, Decimal::ZERO);
    assert_eq!(params.extra_monthly_payment, None);
    assert!(compute_schedule(&params).is_ok());
}

#[test]
fn test_envelope_carries_methodology_and_assumptions() {
    let out = compute_schedule(&car_loan()).unwrap();
    assert!(out.methodology.contains("Amortization"));
    assert_eq!(out.assumptions["term_months"], 60);
    let value = out.to_value().unwrap();
    assert_eq!(value["result"]["schedule"][0]["kind"], "opening");
}

#[test]
fn test_invalid_input_reports_field() {
    let mut params = car_loan();
    params.extra_monthly_payment = Some(dec!(-1));
    match compute_schedule(&params) {
        Err(LoanCalcError::InvalidInput { field, reason }) => {
            assert_eq!(field, "extra_monthly_payment");
            assert!(reason.contains("negative"));
        }
        other => panic!("Expected InvalidInput, got {other:?}"),
    }
}
