use serde::{Deserialize, Serialize};
use std::fmt;

/// amortization type of an installment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstallmentType {
    /// principal + interest stays constant (annuity)
    Equal,
    /// equal principal portions, interest on the remaining balance
    Decreasing,
}

/// billing / recurrence period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimePeriod {
    Month,
    Year,
}

impl TimePeriod {
    /// convert a count expressed in `self` units into `to` units, `None` on overflow
    pub fn convert(self, value: u32, to: TimePeriod) -> Option<u32> {
        match (self, to) {
            (TimePeriod::Year, TimePeriod::Month) => value.checked_mul(12),
            (TimePeriod::Month, TimePeriod::Year) => Some(value / 12),
            _ => Some(value),
        }
    }

    /// length of one period in months
    pub fn months(self) -> u32 {
        match self {
            TimePeriod::Month => 1,
            TimePeriod::Year => 12,
        }
    }
}

/// why a schedule cannot produce another installment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExhaustionReason {
    /// no principal left after the previous installment
    PrincipalRepaid,
    /// the previous installment was the last one of the term
    TermReached,
}

impl fmt::Display for ExhaustionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExhaustionReason::PrincipalRepaid => write!(f, "no principal left"),
            ExhaustionReason::TermReached => write!(f, "loan term reached"),
        }
    }
}

/// stable code describing how a value of an installment was derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Reason {
    OtherClosingCosts,
    ProvisionFee,
    EqualInterest,
    EqualPrincipal,
    DecreasingInterest,
    DecreasingPrincipal,
    FinalInstallmentPrincipal,
    #[serde(rename = "SUBSIDY_2PERCENT")]
    Subsidy2Percent,
    SubsidyEnded,
    EstateInsuranceMonthly,
    EstateInsuranceYearly,
    EstateInsuranceFinalInstallment,
    InsuranceAdvanceLump,
    InsuranceDuringAdvance,
    LifeInsuranceMonthly,
    LifeInsuranceYearly,
    LifeInsuranceFinalInstallment,
    ExcessFixed,
    ExcessToTarget,
    ExcessTargetAlreadyMet,
    ExcessCappedToRemaining,
    RemainingPrincipal,
    DueDate,
    DueDateShiftedToBusinessDay,
    MarginBase,
    MarginPromotion,
    TypeSubsidyDecreasing,
    TypeAfterSubsidy,
    NominalRate,
}

/// a derived value together with the code explaining it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explained<T> {
    pub value: T,
    pub reason: Option<Reason>,
}

impl<T> Explained<T> {
    pub fn of(value: T) -> Self {
        Self { value, reason: None }
    }

    pub fn because(value: T, reason: Reason) -> Self {
        Self {
            value,
            reason: Some(reason),
        }
    }

    /// same value, different reason
    pub fn with(self, reason: Reason) -> Self {
        Self::because(self.value, reason)
    }
}
