//! Schedule rows and the amortization result.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{round_money, Money, Months};

/// One row of an amortization schedule, in time order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleEntry {
    /// Month 0: the amount owed before any payment (amortizing principal plus
    /// the balloon).
    Opening { balance: Money },
    /// A regular monthly payment.
    Regular {
        month: Months,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        payment_date: Option<NaiveDate>,
        payment: Money,
        interest: Money,
        principal: Money,
        balance: Money,
    },
    /// Lump sum settling whatever is still outstanding at maturity.
    BalloonSettlement {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        payment_date: Option<NaiveDate>,
        payment: Money,
        principal: Money,
        balance: Money,
    },
}

impl ScheduleEntry {
    /// Month index; `None` for the balloon settlement.
    pub fn month(&self) -> Option<Months> {
        match self {
            ScheduleEntry::Opening { .. } => Some(0),
            ScheduleEntry::Regular { month, .. } => Some(*month),
            ScheduleEntry::BalloonSettlement { .. } => None,
        }
    }

    pub fn payment(&self) -> Option<Money> {
        match self {
            ScheduleEntry::Opening { .. } => None,
            ScheduleEntry::Regular { payment, .. }
            | ScheduleEntry::BalloonSettlement { payment, .. } => Some(*payment),
        }
    }

    /// Interest portion. The balloon settlement carries none: interest for
    /// the final month is charged on the last regular row.
    pub fn interest(&self) -> Option<Money> {
        match self {
            ScheduleEntry::Opening { .. } => None,
            ScheduleEntry::Regular { interest, .. } => Some(*interest),
            ScheduleEntry::BalloonSettlement { .. } => Some(Decimal::ZERO),
        }
    }

    pub fn principal(&self) -> Option<Money> {
        match self {
            ScheduleEntry::Opening { .. } => None,
            ScheduleEntry::Regular { principal, .. }
            | ScheduleEntry::BalloonSettlement { principal, .. } => Some(*principal),
        }
    }

    pub fn balance(&self) -> Money {
        match self {
            ScheduleEntry::Opening { balance }
            | ScheduleEntry::Regular { balance, .. }
            | ScheduleEntry::BalloonSettlement { balance, .. } => *balance,
        }
    }

    pub fn payment_date(&self) -> Option<NaiveDate> {
        match self {
            ScheduleEntry::Opening { .. } => None,
            ScheduleEntry::Regular { payment_date, .. }
            | ScheduleEntry::BalloonSettlement { payment_date, .. } => *payment_date,
        }
    }

    pub fn is_regular(&self) -> bool {
        matches!(self, ScheduleEntry::Regular { .. })
    }

    pub fn is_balloon(&self) -> bool {
        matches!(self, ScheduleEntry::BalloonSettlement { .. })
    }

    /// Copy of the row with every amount rounded for display.
    pub fn rounded(&self, dp: u32) -> ScheduleEntry {
        match self {
            ScheduleEntry::Opening { balance } => ScheduleEntry::Opening {
                balance: round_money(*balance, dp),
            },
            ScheduleEntry::Regular {
                month,
                payment_date,
                payment,
                interest,
                principal,
                balance,
            } => ScheduleEntry::Regular {
                month: *month,
                payment_date: *payment_date,
                payment: round_money(*payment, dp),
                interest: round_money(*interest, dp),
                principal: round_money(*principal, dp),
                balance: round_money(*balance, dp),
            },
            ScheduleEntry::BalloonSettlement {
                payment_date,
                payment,
                principal,
                balance,
            } => ScheduleEntry::BalloonSettlement {
                payment_date: *payment_date,
                payment: round_money(*payment, dp),
                principal: round_money(*principal, dp),
                balance: round_money(*balance, dp),
            },
        }
    }
}

/// Full amortization output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationResult {
    /// Contractual level payment; extra payments are applied on top of it.
    pub monthly_payment: Money,
    /// Loan amount less down payment.
    pub amortizing_principal: Money,
    /// Opening row, regular rows up to payoff, then the optional balloon row.
    pub schedule: Vec<ScheduleEntry>,
    /// Month in which the balance first reached zero (or the term when a
    /// balloon settles the remainder).
    pub payoff_month: Months,
    /// Interest actually paid across regular rows.
    pub total_interest_paid: Money,
    /// Interest paid on the same loan without extra or one-time payments.
    pub total_interest_baseline: Money,
    pub interest_saved: Money,
    /// Every payment in the schedule, balloon included.
    pub total_paid: Money,
    /// Payoff month of the baseline run.
    pub baseline_payoff_month: Months,
    pub months_saved: Months,
}

impl AmortizationResult {
    /// Regular monthly rows only.
    pub fn regular_entries(&self) -> impl Iterator<Item = &ScheduleEntry> {
        self.schedule.iter().filter(|e| e.is_regular())
    }

    pub fn balloon_entry(&self) -> Option<&ScheduleEntry> {
        self.schedule.iter().find(|e| e.is_balloon())
    }

    /// Balance after the last row of the schedule.
    pub fn final_balance(&self) -> Money {
        self.schedule
            .last()
            .map(ScheduleEntry::balance)
            .unwrap_or(Decimal::ZERO)
    }

    /// Copy with every monetary amount rounded for display.
    pub fn rounded(&self, dp: u32) -> AmortizationResult {
        AmortizationResult {
            monthly_payment: round_money(self.monthly_payment, dp),
            amortizing_principal: round_money(self.amortizing_principal, dp),
            schedule: self.schedule.iter().map(|e| e.rounded(dp)).collect(),
            payoff_month: self.payoff_month,
            total_interest_paid: round_money(self.total_interest_paid, dp),
            total_interest_baseline: round_money(self.total_interest_baseline, dp),
            interest_saved: round_money(self.interest_saved, dp),
            total_paid: round_money(self.total_paid, dp),
            baseline_payoff_month: self.baseline_payoff_month,
            months_saved: self.months_saved,
        }
    }
}
