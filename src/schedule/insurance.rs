use rust_decimal::Decimal;

use crate::config::{LifeInsuranceConfig, LoanConfiguration};
use crate::decimal::{Money, Rate};
use crate::types::{Explained, Reason, TimePeriod};

/// premium for `months` months of an annual `rate` on `base`
fn premium(base: Money, rate: Rate, months: u32) -> Money {
    Money::from_decimal(base.as_decimal() * rate.as_decimal() * Decimal::from(months) / Decimal::from(12))
}

/// estate insurance charged with installment `number`
pub fn estate_insurance(number: u32, config: &LoanConfiguration) -> Explained<Money> {
    let insurance = config.estate_insurance();

    if number == config.term_months() {
        return Explained::because(Money::ZERO, Reason::EstateInsuranceFinalInstallment);
    }
    if insurance.rate.is_zero() || insurance.base_amount.is_zero() {
        return Explained::of(Money::ZERO);
    }

    match insurance.period {
        TimePeriod::Month => Explained::because(
            premium(insurance.base_amount, insurance.rate, 1),
            Reason::EstateInsuranceMonthly,
        ),
        TimePeriod::Year if number % 12 == 0 => Explained::because(
            premium(insurance.base_amount, insurance.rate, 12),
            Reason::EstateInsuranceYearly,
        ),
        TimePeriod::Year => Explained::of(Money::ZERO),
    }
}

/// life insurance charged with installment `number`
pub fn life_insurance(number: u32, config: &LoanConfiguration) -> Explained<Money> {
    match config.life_insurance() {
        Some(insurance) => life_premium(number, config.term_months(), insurance),
        None => Explained::of(Money::ZERO),
    }
}

fn life_premium(number: u32, term_months: u32, insurance: &LifeInsuranceConfig) -> Explained<Money> {
    if number >= term_months {
        return Explained::because(Money::ZERO, Reason::LifeInsuranceFinalInstallment);
    }

    let advance = insurance.advance_months;
    if advance > 0 {
        if number == 0 {
            return Explained::because(
                premium(insurance.base_amount, insurance.advance_rate, advance),
                Reason::InsuranceAdvanceLump,
            );
        }
        if number < advance {
            return Explained::because(Money::ZERO, Reason::InsuranceDuringAdvance);
        }
    }

    match insurance.period {
        TimePeriod::Month => Explained::because(
            premium(insurance.base_amount, insurance.rate, 1),
            Reason::LifeInsuranceMonthly,
        ),
        // yearly premiums are anchored to the end of the advance window,
        // the last one only covers the months left
        TimePeriod::Year if number % 12 == advance % 12 => Explained::because(
            premium(insurance.base_amount, insurance.rate, (term_months - number).min(12)),
            Reason::LifeInsuranceYearly,
        ),
        TimePeriod::Year => Explained::of(Money::ZERO),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EstateInsuranceConfig;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn config(
        term_months: u32,
        estate: EstateInsuranceConfig,
        life: Option<LifeInsuranceConfig>,
    ) -> LoanConfiguration {
        let builder = LoanConfiguration::builder()
            .principal(Money::from_major(300_000))
            .term_months(term_months)
            .base_rate(Rate::from_percentage(6))
            .disbursement_date(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap())
            .first_installment_date(NaiveDate::from_ymd_opt(2024, 2, 10).unwrap())
            .estate_insurance(estate);
        match life {
            Some(life) => builder.life_insurance(life).build().unwrap(),
            None => builder.build().unwrap(),
        }
    }

    fn estate(period: TimePeriod) -> EstateInsuranceConfig {
        EstateInsuranceConfig::new(Rate::from_decimal(dec!(0.0012)), Money::from_major(600_000), period)
    }

    #[test]
    fn test_monthly_estate_insurance() {
        let config = config(36, estate(TimePeriod::Month), None);

        let first = estate_insurance(1, &config);
        assert_eq!(first, Explained::because(Money::from_major(60), Reason::EstateInsuranceMonthly));
        // index 0 follows the same rule
        assert_eq!(estate_insurance(0, &config).value, Money::from_major(60));
        assert_eq!(estate_insurance(35, &config).value, Money::from_major(60));
        assert_eq!(
            estate_insurance(36, &config),
            Explained::because(Money::ZERO, Reason::EstateInsuranceFinalInstallment)
        );
    }

    #[test]
    fn test_yearly_estate_insurance() {
        let config = config(36, estate(TimePeriod::Year), None);

        assert_eq!(estate_insurance(0, &config).value, Money::from_major(720));
        assert_eq!(estate_insurance(1, &config).value, Money::ZERO);
        assert_eq!(estate_insurance(12, &config).value, Money::from_major(720));
        assert_eq!(estate_insurance(13, &config).value, Money::ZERO);
        assert_eq!(estate_insurance(24, &config).value, Money::from_major(720));
        assert_eq!(estate_insurance(36, &config).value, Money::ZERO);
    }

    #[test]
    fn test_disabled_insurances() {
        let config = config(36, EstateInsuranceConfig::none(), None);

        assert_eq!(estate_insurance(3, &config), Explained::of(Money::ZERO));
        assert_eq!(life_insurance(0, &config), Explained::of(Money::ZERO));
        assert_eq!(life_insurance(3, &config), Explained::of(Money::ZERO));
    }

    #[test]
    fn test_life_insurance_advance_lump() {
        let life = LifeInsuranceConfig::new(Rate::from_decimal(dec!(0.004)), Money::from_major(300_000), TimePeriod::Month)
            .with_advance(24, Rate::from_decimal(dec!(0.003)));
        let config = config(120, EstateInsuranceConfig::none(), Some(life));

        // 0.003 * 300000 * 24 / 12
        assert_eq!(
            life_insurance(0, &config),
            Explained::because(Money::from_major(1_800), Reason::InsuranceAdvanceLump)
        );
        for number in 1..24 {
            assert_eq!(
                life_insurance(number, &config),
                Explained::because(Money::ZERO, Reason::InsuranceDuringAdvance)
            );
        }
        assert_eq!(
            life_insurance(24, &config),
            Explained::because(Money::from_major(100), Reason::LifeInsuranceMonthly)
        );
        assert_eq!(life_insurance(120, &config).value, Money::ZERO);
    }

    #[test]
    fn test_yearly_life_insurance_anchored_to_advance_and_prorated() {
        let life = LifeInsuranceConfig::new(Rate::from_decimal(dec!(0.004)), Money::from_major(300_000), TimePeriod::Year)
            .with_advance(6, Rate::from_decimal(dec!(0.004)));
        let config = config(40, EstateInsuranceConfig::none(), Some(life));

        assert_eq!(life_insurance(0, &config).value, Money::from_major(600));
        assert_eq!(life_insurance(5, &config).value, Money::ZERO);
        assert_eq!(
            life_insurance(6, &config),
            Explained::because(Money::from_major(1_200), Reason::LifeInsuranceYearly)
        );
        assert_eq!(life_insurance(7, &config), Explained::of(Money::ZERO));
        assert_eq!(life_insurance(18, &config).value, Money::from_major(1_200));
        // ten months left after installment 30
        assert_eq!(life_insurance(30, &config).value, Money::from_major(1_000));
        assert_eq!(life_insurance(39, &config).value, Money::ZERO);
        assert_eq!(life_insurance(40, &config).value, Money::ZERO);
    }

    #[test]
    fn test_final_partial_year_is_prorated() {
        let life = LifeInsuranceConfig::new(Rate::from_decimal(dec!(0.004)), Money::from_major(300_000), TimePeriod::Year);
        let config = config(30, EstateInsuranceConfig::none(), Some(life));

        assert_eq!(life_insurance(0, &config).value, Money::from_major(1_200));
        assert_eq!(life_insurance(12, &config).value, Money::from_major(1_200));
        // six months left after installment 24
        assert_eq!(
            life_insurance(24, &config),
            Explained::because(Money::from_major(600), Reason::LifeInsuranceYearly)
        );
    }
}
