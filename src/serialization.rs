/// serialization support for schedules and summaries
use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calendar::CalendarPeriod;
use crate::decimal::{Money, Rate};
use crate::errors::Result;
use crate::schedule::{Installment, Schedule};
use crate::summary::Summary;
use crate::types::{ExhaustionReason, InstallmentType, Reason};

/// serializable view of a schedule, one flat row per installment
#[derive(Debug, Serialize, Deserialize)]
pub struct ScheduleView {
    pub installment_count: usize,
    pub exhaustion: Option<ExhaustionReason>,
    pub installments: Vec<InstallmentRow>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InstallmentRow {
    pub number: u32,
    pub due_date: NaiveDate,
    pub installment_type: InstallmentType,
    pub rate: Rate,
    pub margin: Rate,
    pub principal: Money,
    pub interest: Money,
    pub subsidy: Money,
    pub estate_insurance: Money,
    pub life_insurance: Money,
    pub overpayment: Money,
    pub capital_and_interest: Money,
    pub after_subsidy: Money,
    pub with_insurances: Money,
    pub total: Money,
    pub remaining_principal: Money,
    /// reason code per field, only for fields that carry one
    pub reasons: BTreeMap<String, Reason>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryView {
    pub principal: Money,
    pub interest: Money,
    pub subsidy: Money,
    pub interest_after_subsidy: Money,
    pub estate_insurance: Money,
    pub life_insurance: Money,
    pub overpayments: Money,
    pub cost: Money,
    pub total: Money,
    pub rrso: Rate,
    pub rrso_percentage: Decimal,
    pub last_date: NaiveDate,
    pub horizon: CalendarPeriod,
    pub horizon_months: u32,
}

impl ScheduleView {
    pub fn from_schedule(schedule: &Schedule) -> Self {
        ScheduleView {
            installment_count: schedule.len(),
            exhaustion: schedule.exhaustion_reason(),
            installments: schedule.iter().map(InstallmentRow::from_installment).collect(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl InstallmentRow {
    pub fn from_installment(installment: &Installment) -> Self {
        let mut reasons = BTreeMap::new();
        let mut note = |field: &str, reason: Option<Reason>| {
            if let Some(reason) = reason {
                reasons.insert(field.to_string(), reason);
            }
        };
        note("principal", installment.principal.reason);
        note("interest", installment.interest.reason);
        note("subsidy", installment.subsidy.reason);
        note("estate_insurance", installment.estate_insurance.reason);
        note("life_insurance", installment.life_insurance.reason);
        note("overpayment", installment.overpayment.reason);
        note("due_date", installment.due_date.reason);
        note("remaining_principal", installment.remaining_principal.reason);
        note("margin", installment.margin.reason);
        note("rate", installment.rate.reason);
        note("installment_type", installment.installment_type.reason);

        InstallmentRow {
            number: installment.number,
            due_date: installment.due_date.value,
            installment_type: installment.installment_type.value,
            rate: installment.rate.value,
            margin: installment.margin.value,
            principal: installment.principal.value,
            interest: installment.interest.value,
            subsidy: installment.subsidy.value,
            estate_insurance: installment.estate_insurance.value,
            life_insurance: installment.life_insurance.value,
            overpayment: installment.overpayment.value,
            capital_and_interest: installment.capital_and_interest(),
            after_subsidy: installment.after_subsidy(),
            with_insurances: installment.with_insurances(),
            total: installment.total(),
            remaining_principal: installment.remaining_principal.value,
            reasons,
        }
    }
}

impl SummaryView {
    pub fn from_summary(summary: &Summary) -> Self {
        SummaryView {
            principal: summary.principal,
            interest: summary.interest,
            subsidy: summary.subsidy,
            interest_after_subsidy: summary.interest_after_subsidy,
            estate_insurance: summary.estate_insurance,
            life_insurance: summary.life_insurance,
            overpayments: summary.overpayments,
            cost: summary.cost,
            total: summary.total,
            rrso: summary.rrso,
            rrso_percentage: summary.rrso.as_percentage(),
            last_date: summary.last_date,
            horizon: summary.horizon,
            horizon_months: summary.horizon.total_months(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
