use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::calendar::CalendarPeriod;
use crate::config::LoanConfiguration;
use crate::decimal::{Money, Rate};
use crate::errors::{Result, ScheduleError};
use crate::rrso::RrsoSolver;
use crate::schedule::{Installment, Schedule};

/// tolerance, in currency units, for the rrso search
pub const RRSO_EPSILON: Decimal = dec!(0.0001);

/// aggregated figures of a whole schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// capital repaid by installments 1..
    pub principal: Money,
    pub interest: Money,
    pub subsidy: Money,
    /// interest net of the subsidy
    pub interest_after_subsidy: Money,
    /// estate insurance over the whole schedule, installment 0 included
    pub estate_insurance: Money,
    /// life insurance over the whole schedule, installment 0 included
    pub life_insurance: Money,
    pub overpayments: Money,
    /// everything paid on top of the principal
    pub cost: Money,
    /// principal + cost
    pub total: Money,
    pub rrso: Rate,
    pub last_date: NaiveDate,
    /// calendar span from disbursement to the last installment
    pub horizon: CalendarPeriod,
}

impl Summary {
    /// generate the schedule of `config` and summarise it
    pub fn generate(config: &LoanConfiguration) -> Result<Self> {
        let schedule = Schedule::generate(config)?;
        Self::from_schedule(config, &schedule)
    }

    pub fn from_schedule(config: &LoanConfiguration, schedule: &Schedule) -> Result<Self> {
        Self::with_solver(config, schedule, &RrsoSolver::default())
    }

    pub fn with_solver(config: &LoanConfiguration, schedule: &Schedule, solver: &RrsoSolver) -> Result<Self> {
        let (initial, last) = match (schedule.initial(), schedule.last()) {
            (Some(initial), Some(last)) => (initial, last),
            _ => {
                return Err(ScheduleError::Calculation {
                    message: "cannot summarise an empty schedule".to_string(),
                })
            }
        };
        let recurring = schedule.recurring();
        let principal = total_of(recurring, |i| i.principal.value);
        let interest = total_of(recurring, |i| i.interest.value);
        let subsidy = total_of(recurring, |i| i.subsidy.value);
        let overpayments = total_of(recurring, |i| i.overpayment.value);
        let estate_insurance = total_of(schedule.installments(), |i| i.estate_insurance.value);
        let life_insurance = total_of(schedule.installments(), |i| i.life_insurance.value);

        let interest_after_subsidy = interest - subsidy;
        let cost = interest_after_subsidy
            + estate_insurance
            + life_insurance
            + initial.principal.value
            + initial.interest.value;
        let total = config.principal() + cost;

        let rrso = solver.solve(
            &schedule.cash_flows(),
            config.disbursement_date(),
            config.principal(),
            RRSO_EPSILON,
        )?;

        let last_date = last.due_date.value;
        let horizon = CalendarPeriod::between(initial.due_date.value, last_date);

        debug!("schedule of {} costs {cost} on top, rrso {rrso}", config.principal());

        Ok(Self {
            principal,
            interest,
            subsidy,
            interest_after_subsidy,
            estate_insurance,
            life_insurance,
            overpayments,
            cost,
            total,
            rrso,
            last_date,
            horizon,
        })
    }

    pub fn insurances(&self) -> Money {
        self.estate_insurance + self.life_insurance
    }
}

fn total_of(installments: &[Installment], field: impl Fn(&Installment) -> Money) -> Money {
    installments.iter().map(field).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EstateInsuranceConfig, LifeInsuranceConfig, OverpaymentPolicy, SubsidyProgram};
    use crate::types::TimePeriod;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn builder() -> crate::config::LoanConfigurationBuilder {
        LoanConfiguration::builder()
            .principal(Money::from_major(300_000))
            .term_months(240)
            .margin(Rate::from_decimal(dec!(0.021)))
            .base_rate(Rate::from_decimal(dec!(0.0585)))
            .disbursement_date(date(2024, 3, 5))
            .first_installment_date(date(2024, 4, 5))
    }

    #[test]
    fn test_totals() {
        let _ = env_logger::builder().is_test(true).try_init();
        let config = builder()
            .provision(Rate::from_percentage(2))
            .other_costs(Money::from_major(981))
            .mortgage_tax(Money::from_major(19))
            .estate_insurance(EstateInsuranceConfig::new(
                Rate::from_decimal(dec!(0.001)),
                Money::from_major(400_000),
                TimePeriod::Year,
            ))
            .life_insurance(LifeInsuranceConfig::new(
                Rate::from_decimal(dec!(0.0036)),
                Money::from_major(300_000),
                TimePeriod::Month,
            ))
            .build()
            .unwrap();
        let schedule = Schedule::generate(&config).unwrap();
        let summary = Summary::from_schedule(&config, &schedule).unwrap();

        assert_eq!(summary.principal, Money::from_major(300_000));
        assert_eq!(summary.overpayments, Money::ZERO);
        assert_eq!(summary.subsidy, Money::ZERO);
        assert_eq!(summary.interest_after_subsidy, summary.interest);
        // yearly estate premium of 400 at installments 0, 12, .. 228
        assert_eq!(summary.estate_insurance, Money::from_major(8_000));
        // 90 a month from installment 0 to 239
        assert_eq!(summary.life_insurance, Money::from_major(21_600));
        assert_eq!(
            summary.cost,
            summary.interest + summary.insurances() + Money::from_major(1_000) + Money::from_major(6_000)
        );
        assert_eq!(summary.total, Money::from_major(300_000) + summary.cost);

        let paid: Money = schedule.iter().map(Installment::total).sum();
        assert_eq!(paid, summary.total);
    }

    #[test]
    fn test_horizon_and_last_date() {
        let config = builder().build().unwrap();
        let summary = Summary::generate(&config).unwrap();

        assert_eq!(summary.last_date, date(2044, 3, 5));
        assert_eq!(summary.horizon, CalendarPeriod { years: 20, months: 0, days: 0 });
    }

    #[test]
    fn test_rrso_without_fees_matches_effective_nominal_rate() {
        let config = builder().build().unwrap();
        let summary = Summary::generate(&config).unwrap();

        // 7.95% compounded monthly is roughly 8.24% a year
        let rrso = summary.rrso.to_f64();
        assert!(rrso > 0.0815 && rrso < 0.0835, "{rrso}");
    }

    #[test]
    fn test_rrso_rises_with_fees() {
        let plain = Summary::generate(&builder().build().unwrap()).unwrap();
        let with_fees = Summary::generate(
            &builder()
                .provision(Rate::from_percentage(2))
                .life_insurance(LifeInsuranceConfig::new(
                    Rate::from_decimal(dec!(0.0036)),
                    Money::from_major(300_000),
                    TimePeriod::Month,
                ))
                .build()
                .unwrap(),
        )
        .unwrap();

        assert!(with_fees.rrso > plain.rrso);
        assert!(with_fees.cost > plain.cost);
    }

    #[test]
    fn test_subsidy_reduces_cost() {
        let plain = Summary::generate(&builder().build().unwrap()).unwrap();
        let subsidised = Summary::generate(
            &builder()
                .subsidy(SubsidyProgram::new(Rate::from_percentage(7)))
                .build()
                .unwrap(),
        )
        .unwrap();

        assert!(subsidised.subsidy.is_positive());
        assert_eq!(subsidised.interest_after_subsidy, subsidised.interest - subsidised.subsidy);
        assert!(subsidised.cost < plain.cost);
    }

    #[test]
    fn test_overpayments_shorten_the_horizon() {
        let config = builder()
            .overpayments(OverpaymentPolicy::fixed(1, TimePeriod::Month, Money::from_major(2_000)))
            .build()
            .unwrap();
        let schedule = Schedule::generate(&config).unwrap();
        let summary = Summary::from_schedule(&config, &schedule).unwrap();

        assert!(summary.overpayments.is_positive());
        assert_eq!(summary.principal + summary.overpayments, Money::from_major(300_000));
        assert!(summary.last_date < date(2044, 3, 5));
        assert!(summary.horizon.years < 20);
    }

    #[test]
    fn test_solver_failure_reaches_the_caller() {
        let config = builder().build().unwrap();
        let schedule = Schedule::generate(&config).unwrap();

        let err = Summary::with_solver(&config, &schedule, &RrsoSolver::new().with_max_iterations(1)).unwrap_err();
        assert!(
            matches!(err, ScheduleError::ConvergenceFailure { iterations: 1, .. }),
            "unexpected error: {err}"
        );
    }
}
