use chrono::NaiveDate;
use log::{debug, trace};
use rust_decimal::Decimal;

use crate::calendar::{add_months, roll_forward_to_business_day, year_fraction};
use crate::config::{LoanConfiguration, SUBSIDY_BORROWER_RATE};
use crate::decimal::{Money, Rate};
use crate::errors::{Result, ScheduleError};
use crate::types::{ExhaustionReason, Explained, Reason};

use super::amortization::AmortizationCalculator;
use super::insurance::{estate_insurance, life_insurance};
use super::installment::Installment;
use super::overpayment::overpayment;

/// where a schedule stands between two installments
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratorState {
    /// nothing produced yet, the next installment is number 0
    Initial,
    /// the last produced installment
    Recurring(Installment),
    /// no further installment exists
    Exhausted(ExhaustionReason),
}

impl GeneratorState {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, GeneratorState::Exhausted(_))
    }

    /// produce the next installment and the state following it
    pub fn advance(&self, generator: &InstallmentGenerator<'_>) -> Result<(Option<Installment>, GeneratorState)> {
        match self {
            GeneratorState::Initial => {
                let initial = generator.initial();
                Ok((Some(initial.clone()), GeneratorState::Recurring(initial)))
            }
            GeneratorState::Recurring(previous) => match generator.next(previous) {
                Ok(installment) => Ok((Some(installment.clone()), GeneratorState::Recurring(installment))),
                Err(ScheduleError::ExhaustedSchedule { reason, .. }) => {
                    Ok((None, GeneratorState::Exhausted(reason)))
                }
                Err(e) => Err(e),
            },
            GeneratorState::Exhausted(reason) => Ok((None, GeneratorState::Exhausted(*reason))),
        }
    }
}

/// derives each installment from the configuration and the one before it
#[derive(Debug, Clone, Copy)]
pub struct InstallmentGenerator<'a> {
    config: &'a LoanConfiguration,
}

impl<'a> InstallmentGenerator<'a> {
    pub fn new(config: &'a LoanConfiguration) -> Self {
        Self { config }
    }

    /// installment 0: closing costs and provision due at disbursement
    pub fn initial(&self) -> Installment {
        let config = self.config;
        let installment = Installment {
            number: 0,
            principal: Explained::because(
                config.other_costs() + config.mortgage_tax(),
                Reason::OtherClosingCosts,
            ),
            interest: Explained::because(
                config.principal().times_rate(config.provision()),
                Reason::ProvisionFee,
            ),
            subsidy: Explained::of(Money::ZERO),
            estate_insurance: estate_insurance(0, config),
            life_insurance: life_insurance(0, config),
            overpayment: Explained::of(Money::ZERO),
            due_date: Explained::of(config.disbursement_date()),
            remaining_principal: Explained::of(config.principal()),
            margin: Explained::of(Rate::ZERO),
            rate: Explained::because(config.base_rate(), Reason::NominalRate),
            installment_type: config.installment_type_for(0),
        };

        trace!("installment 0: {} fees due {}", installment.total(), installment.due_date.value);
        installment
    }

    /// why no installment can follow `previous`, if so
    pub fn exhaustion(&self, previous: &Installment) -> Option<ExhaustionReason> {
        if !previous.remaining_principal.value.is_positive() {
            Some(ExhaustionReason::PrincipalRepaid)
        } else if previous.number + 1 > self.config.term_months() {
            Some(ExhaustionReason::TermReached)
        } else {
            None
        }
    }

    /// installment following `previous`
    pub fn next(&self, previous: &Installment) -> Result<Installment> {
        let config = self.config;
        let number = previous.number + 1;

        if let Some(reason) = self.exhaustion(previous) {
            debug!("schedule exhausted before installment {number}: {reason}");
            return Err(ScheduleError::ExhaustedSchedule { number, reason });
        }

        let due_date = self.due_date(number)?;
        let elapsed = year_fraction(previous.due_date.value, due_date.value);
        let margin = config.margin_for(number);
        let installment_type = config.installment_type_for(number);
        let rate = Explained::because(margin.value + config.base_rate(), Reason::NominalRate);

        let remaining = previous.remaining_principal.value;
        let installments_left = config.term_months() - previous.number;
        let split = AmortizationCalculator::new(installment_type.value).split(
            remaining,
            rate.value,
            elapsed,
            installments_left,
        )?;

        let subsidy = self.subsidy(number, remaining);
        let estate_insurance = estate_insurance(number, config);
        let life_insurance = life_insurance(number, config);

        let left_after_principal = remaining - split.principal.value;
        let scheduled_total = split.principal.value + split.interest.value - subsidy.value
            + estate_insurance.value
            + life_insurance.value;
        let overpayment = overpayment(number, scheduled_total, left_after_principal, config.overpayments());
        let remaining_principal = Explained::because(
            left_after_principal - overpayment.value,
            Reason::RemainingPrincipal,
        );

        trace!(
            "installment {number} due {}: principal {} interest {} overpayment {} left {}",
            due_date.value,
            split.principal.value,
            split.interest.value,
            overpayment.value,
            remaining_principal.value
        );

        Ok(Installment {
            number,
            principal: split.principal,
            interest: split.interest,
            subsidy,
            estate_insurance,
            life_insurance,
            overpayment,
            due_date,
            remaining_principal,
            margin,
            rate,
            installment_type,
        })
    }

    /// due date of installment `number`, rolled to a business day when configured
    pub fn due_date(&self, number: u32) -> Result<Explained<NaiveDate>> {
        let config = self.config;
        if number == 0 {
            return Ok(Explained::of(config.disbursement_date()));
        }

        let first = config.first_installment_date();
        let scheduled = add_months(first, number - 1).ok_or_else(|| ScheduleError::Calculation {
            message: format!("due date of installment {number} after {first} is out of range"),
        })?;

        if !config.business_days_only() {
            return Ok(Explained::because(scheduled, Reason::DueDate));
        }

        let rolled = roll_forward_to_business_day(scheduled);
        if rolled == scheduled {
            Ok(Explained::because(scheduled, Reason::DueDate))
        } else {
            Ok(Explained::because(rolled, Reason::DueDateShiftedToBusinessDay))
        }
    }

    /// monthly subsidy on the balance `remaining` owed before installment `number`
    fn subsidy(&self, number: u32, remaining: Money) -> Explained<Money> {
        match self.config.subsidy() {
            Some(program) if program.covers(number) => {
                let subsidised = (program.rate - SUBSIDY_BORROWER_RATE).as_decimal();
                Explained::because(
                    Money::from_decimal(remaining.as_decimal() * subsidised / Decimal::from(12)),
                    Reason::Subsidy2Percent,
                )
            }
            Some(_) => Explained::because(Money::ZERO, Reason::SubsidyEnded),
            None => Explained::of(Money::ZERO),
        }
    }
}

/// installment 0 of `config`
pub fn initial(config: &LoanConfiguration) -> Installment {
    InstallmentGenerator::new(config).initial()
}

/// installment following `previous` under `config`
pub fn next(config: &LoanConfiguration, previous: &Installment) -> Result<Installment> {
    InstallmentGenerator::new(config).next(previous)
}
