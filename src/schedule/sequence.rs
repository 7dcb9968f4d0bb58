use log::debug;
use serde::Serialize;

use crate::config::LoanConfiguration;
use crate::errors::Result;
use crate::rrso::CashFlow;
use crate::types::ExhaustionReason;

use super::generator::{GeneratorState, InstallmentGenerator};
use super::installment::Installment;

/// the complete list of installments of a loan, installment 0 first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schedule {
    installments: Vec<Installment>,
    exhaustion: Option<ExhaustionReason>,
}

impl Schedule {
    /// generate every installment until the schedule is exhausted
    pub fn generate(config: &LoanConfiguration) -> Result<Self> {
        let mut iter = Self::iter_lazy(config);
        let installments = iter.by_ref().collect::<Result<Vec<_>>>()?;
        let exhaustion = iter.exhaustion_reason();

        debug!(
            "generated {} installments for {} over {} months",
            installments.len(),
            config.principal(),
            config.term_months()
        );

        Ok(Self {
            installments,
            exhaustion,
        })
    }

    /// installments one at a time, computed on demand
    pub fn iter_lazy(config: &LoanConfiguration) -> ScheduleIter<'_> {
        ScheduleIter::new(config)
    }

    pub fn installments(&self) -> &[Installment] {
        &self.installments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Installment> {
        self.installments.iter()
    }

    pub fn initial(&self) -> Option<&Installment> {
        self.installments.first()
    }

    pub fn last(&self) -> Option<&Installment> {
        self.installments.last()
    }

    /// installments 1.. without the disbursement-day one
    pub fn recurring(&self) -> &[Installment] {
        self.installments.get(1..).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.installments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.installments.is_empty()
    }

    /// why generation stopped
    pub fn exhaustion_reason(&self) -> Option<ExhaustionReason> {
        self.exhaustion
    }

    /// dated totals of every installment, installment 0 included
    pub fn cash_flows(&self) -> Vec<CashFlow> {
        self.installments
            .iter()
            .map(|installment| CashFlow::new(installment.due_date.value, installment.total()))
            .collect()
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a Installment;
    type IntoIter = std::slice::Iter<'a, Installment>;

    fn into_iter(self) -> Self::IntoIter {
        self.installments.iter()
    }
}

/// lazy installment sequence; stops after the first error
pub struct ScheduleIter<'a> {
    generator: InstallmentGenerator<'a>,
    state: GeneratorState,
    failed: bool,
}

impl<'a> ScheduleIter<'a> {
    pub fn new(config: &'a LoanConfiguration) -> Self {
        Self {
            generator: InstallmentGenerator::new(config),
            state: GeneratorState::Initial,
            failed: false,
        }
    }

    /// set once the sequence has run out
    pub fn exhaustion_reason(&self) -> Option<ExhaustionReason> {
        match self.state {
            GeneratorState::Exhausted(reason) => Some(reason),
            _ => None,
        }
    }
}

impl Iterator for ScheduleIter<'_> {
    type Item = Result<Installment>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        match self.state.advance(&self.generator) {
            Ok((installment, state)) => {
                self.state = state;
                installment.map(Ok)
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
