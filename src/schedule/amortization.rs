use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};
use crate::errors::{Result, ScheduleError};
use crate::types::{Explained, InstallmentType, Reason};

/// capital and interest portions of one installment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapitalSplit {
    pub principal: Explained<Money>,
    pub interest: Explained<Money>,
}

/// amortization calculator
pub struct AmortizationCalculator {
    method: InstallmentType,
}

impl AmortizationCalculator {
    pub fn new(method: InstallmentType) -> Self {
        Self { method }
    }

    /// split the next installment of a balance `remaining` still owed over
    /// `installments_left` installments (this one included)
    pub fn split(
        &self,
        remaining: Money,
        annual_rate: Rate,
        year_fraction: Decimal,
        installments_left: u32,
    ) -> Result<CapitalSplit> {
        let installments_left = installments_left.max(1);
        match self.method {
            InstallmentType::Equal => self.equal_installment(remaining, annual_rate, installments_left),
            InstallmentType::Decreasing => {
                self.decreasing_installment(remaining, annual_rate, year_fraction, installments_left)
            }
        }
    }

    /// annuity: interest for one twelfth of a year, principal tops it up to the constant payment
    fn equal_installment(&self, remaining: Money, annual_rate: Rate, installments_left: u32) -> Result<CapitalSplit> {
        let monthly_rate = annual_rate.monthly_rate();
        let interest = remaining.times_rate(monthly_rate);

        let principal = if installments_left == 1 {
            // last one clears whatever rounding left behind
            Explained::because(remaining, Reason::FinalInstallmentPrincipal)
        } else {
            let payment = annuity_payment(remaining, annual_rate, installments_left)?;
            let principal = (payment - interest).max(Money::ZERO).min(remaining);
            Explained::because(principal, Reason::EqualPrincipal)
        };

        Ok(CapitalSplit {
            principal,
            interest: Explained::because(interest, Reason::EqualInterest),
        })
    }

    /// equal principal portions, interest accrued over the actual days elapsed
    fn decreasing_installment(
        &self,
        remaining: Money,
        annual_rate: Rate,
        year_fraction: Decimal,
        installments_left: u32,
    ) -> Result<CapitalSplit> {
        let interest = remaining
            .as_decimal()
            .checked_mul(annual_rate.as_decimal())
            .and_then(|accrued| accrued.checked_mul(year_fraction))
            .map(Money::from_decimal)
            .ok_or_else(|| ScheduleError::Calculation {
                message: format!("interest on {remaining} at {annual_rate} overflowed"),
            })?;
        let principal = remaining / Decimal::from(installments_left);

        Ok(CapitalSplit {
            principal: Explained::because(principal, Reason::DecreasingPrincipal),
            interest: Explained::because(interest, Reason::DecreasingInterest),
        })
    }
}

/// constant monthly payment repaying `principal` over `months`
pub fn annuity_payment(principal: Money, annual_rate: Rate, months: u32) -> Result<Money> {
    if months == 0 {
        return Ok(principal);
    }

    let monthly_rate = annual_rate.monthly_rate().as_decimal();
    let overflow = || ScheduleError::Calculation {
        message: format!("annuity of {principal} at {annual_rate} over {months} months overflowed"),
    };

    // P * r / (1 - (1 + r)^-n), the discount factor stays within (0, 1]
    let discount = discount_factor(Decimal::ONE + monthly_rate, months).ok_or_else(overflow)?;
    let denominator = Decimal::ONE - discount;
    if monthly_rate.is_zero() || denominator.is_zero() {
        return Ok(principal / Decimal::from(months));
    }

    principal
        .as_decimal()
        .checked_mul(monthly_rate)
        .and_then(|numerator| numerator.checked_div(denominator))
        .map(Money::from_decimal)
        .ok_or_else(overflow)
}

fn discount_factor(base: Decimal, periods: u32) -> Option<Decimal> {
    let step = Decimal::ONE.checked_div(base)?;
    let mut factor = Decimal::ONE;
    for _ in 0..periods {
        factor = factor.checked_mul(step)?;
    }
    Some(factor)
}
