use chrono::NaiveDate;
use log::{debug, trace, warn};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calendar::year_fraction;
use crate::decimal::{Money, Rate};
use crate::errors::{Result, ScheduleError};

/// annual rate the search starts from
pub const INITIAL_RATE: f64 = 0.1;
pub const DEFAULT_MAX_ITERATIONS: u32 = 1000;

/// a dated payment made by the borrower
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashFlow {
    pub date: NaiveDate,
    pub amount: Money,
}

impl CashFlow {
    pub fn new(date: NaiveDate, amount: Money) -> Self {
        Self { date, amount }
    }
}

/// effective annual rate of charge (rrso) solver.
///
/// finds the annual rate `r` with `principal = sum(amount / (1 + r) ^ years)`,
/// `years` being the actual/actual year fraction from disbursement to each
/// payment, installment 0 included. the search starts at 10% stepping by half
/// of it; the step is constant while the rate is too low and halves on every
/// iteration after the first overshoot. discounting runs on `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RrsoSolver {
    max_iterations: u32,
}

impl Default for RrsoSolver {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl RrsoSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// value of `flows` at `disbursement`, discounted at the annual `rate`
    pub fn present_value(&self, flows: &[CashFlow], disbursement: NaiveDate, rate: f64) -> Result<f64> {
        let discounted = discount_inputs(flows, disbursement)?;
        Ok(present_value(&discounted, rate))
    }

    /// rate at which `flows` discounted to `disbursement` come within
    /// `epsilon` of `principal`.
    ///
    /// No flows means a zero rate. Running out of iterations, or pushing the
    /// rate to -100% or below, yields [`ScheduleError::ConvergenceFailure`].
    pub fn solve(
        &self,
        flows: &[CashFlow],
        disbursement: NaiveDate,
        principal: Money,
        epsilon: Decimal,
    ) -> Result<Rate> {
        if flows.is_empty() {
            return Ok(Rate::ZERO);
        }

        let discounted = discount_inputs(flows, disbursement)?;
        let target = principal.to_f64();
        let epsilon = epsilon.to_f64().ok_or_else(|| ScheduleError::Calculation {
            message: format!("epsilon {epsilon} is not representable"),
        })?;

        let mut rate = INITIAL_RATE;
        let mut step = rate / 2.0;
        let mut too_low = true;
        let mut delta = f64::NAN;
        let mut previous_direction = None;

        trace!("rrso search for {target} over {} flows from {rate}", flows.len());
        for iteration in 1..=self.max_iterations {
            if rate <= -1.0 {
                warn!("rrso search left the valid range at iteration {iteration} (rate {rate})");
                return Err(ScheduleError::ConvergenceFailure {
                    iterations: iteration,
                    last_delta: delta,
                });
            }

            let value = present_value(&discounted, rate);
            delta = value - target;

            if delta.abs() < epsilon {
                debug!("rrso converged to {rate} after {iteration} iterations");
                return Rate::from_f64(rate).ok_or_else(|| ScheduleError::Calculation {
                    message: format!("rrso {rate} is not representable"),
                });
            }

            // payments worth more than the principal means the rate is too low
            let undershoot = value > target;
            if previous_direction.is_some_and(|previous| previous != undershoot) {
                trace!("rrso search reversed at {rate} (delta {delta})");
            }
            previous_direction = Some(undershoot);
            rate += if undershoot { step } else { -step };
            too_low &= undershoot;
            if !too_low {
                step /= 2.0;
            }
        }

        warn!(
            "rrso did not converge after {} iterations (last delta {delta})",
            self.max_iterations
        );
        Err(ScheduleError::ConvergenceFailure {
            iterations: self.max_iterations,
            last_delta: delta,
        })
    }
}

/// (amount, years since disbursement) pairs
fn discount_inputs(flows: &[CashFlow], disbursement: NaiveDate) -> Result<Vec<(f64, f64)>> {
    flows
        .iter()
        .map(|flow| {
            let years = year_fraction(disbursement, flow.date)
                .to_f64()
                .ok_or_else(|| ScheduleError::Calculation {
                    message: format!("year fraction to {} is not representable", flow.date),
                })?;
            Ok((flow.amount.to_f64(), years))
        })
        .collect()
}

fn present_value(discounted: &[(f64, f64)], rate: f64) -> f64 {
    discounted
        .iter()
        .map(|(amount, years)| amount / (1.0 + rate).powf(*years))
        .sum()
}
