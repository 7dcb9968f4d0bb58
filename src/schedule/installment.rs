use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::types::{Explained, InstallmentType};

/// one scheduled payment.
///
/// Number 0 is the disbursement-day installment: it moves no capital, its
/// `principal` holds the other closing costs and its `interest` holds the
/// provision fee. Numbers 1.. are the monthly installments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    pub number: u32,
    pub principal: Explained<Money>,
    pub interest: Explained<Money>,
    pub subsidy: Explained<Money>,
    pub estate_insurance: Explained<Money>,
    pub life_insurance: Explained<Money>,
    pub overpayment: Explained<Money>,
    pub due_date: Explained<NaiveDate>,
    /// principal still owed once this installment is paid
    pub remaining_principal: Explained<Money>,
    pub margin: Explained<Rate>,
    /// margin + base rate
    pub rate: Explained<Rate>,
    pub installment_type: Explained<InstallmentType>,
}

impl Installment {
    pub fn is_initial(&self) -> bool {
        self.number == 0
    }

    pub fn capital_and_interest(&self) -> Money {
        self.principal.value + self.interest.value
    }

    /// capital and interest net of the subsidy
    pub fn after_subsidy(&self) -> Money {
        self.capital_and_interest() - self.subsidy.value
    }

    pub fn insurances(&self) -> Money {
        self.estate_insurance.value + self.life_insurance.value
    }

    /// everything due except the overpayment
    pub fn with_insurances(&self) -> Money {
        self.after_subsidy() + self.insurances()
    }

    /// total cash paid for this installment
    pub fn total(&self) -> Money {
        self.with_insurances() + self.overpayment.value
    }
}
