use crate::config::{OverpaymentMode, OverpaymentPolicy};
use crate::decimal::Money;
use crate::types::{Explained, Reason, TimePeriod};

/// overpayment made together with installment `number`.
///
/// `scheduled_total` is everything else due with the installment (capital
/// and interest net of subsidy, plus insurances) and `remaining` the
/// principal left once its capital portion is paid; the overpayment never
/// exceeds `remaining`.
pub fn overpayment(
    number: u32,
    scheduled_total: Money,
    remaining: Money,
    policy: Option<&OverpaymentPolicy>,
) -> Explained<Money> {
    let policy = match policy {
        Some(policy) if number >= policy.start => policy,
        _ => return Explained::of(Money::ZERO),
    };

    let excess = match policy.mode {
        OverpaymentMode::TargetTotal(target) => {
            let top_up = target - scheduled_total;
            if top_up.is_negative() {
                Explained::because(Money::ZERO, Reason::ExcessTargetAlreadyMet)
            } else {
                Explained::because(top_up, Reason::ExcessToTarget)
            }
        }
        // yearly overpayments fire when the installment number lines up
        // with `start` modulo 12
        OverpaymentMode::Fixed(value)
            if policy.period == TimePeriod::Month || number % 12 == policy.start % 12 =>
        {
            Explained::because(value, Reason::ExcessFixed)
        }
        OverpaymentMode::Fixed(_) => Explained::of(Money::ZERO),
    };

    if excess.value > remaining {
        return Explained::because(remaining, Reason::ExcessCappedToRemaining);
    }
    excess
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(value: i64) -> Money {
        Money::from_major(value)
    }

    #[test]
    fn test_disabled_or_not_started() {
        assert_eq!(overpayment(5, amount(3_000), amount(100_000), None), Explained::of(Money::ZERO));

        let policy = OverpaymentPolicy::fixed(12, TimePeriod::Month, amount(1_000));
        assert_eq!(overpayment(11, amount(3_000), amount(100_000), Some(&policy)).value, Money::ZERO);
        assert_eq!(overpayment(12, amount(3_000), amount(100_000), Some(&policy)).value, amount(1_000));
    }

    #[test]
    fn test_fixed_monthly() {
        let policy = OverpaymentPolicy::fixed(1, TimePeriod::Month, amount(500));

        for number in 1..30 {
            assert_eq!(
                overpayment(number, amount(3_000), amount(100_000), Some(&policy)),
                Explained::because(amount(500), Reason::ExcessFixed)
            );
        }
    }

    #[test]
    fn test_fixed_yearly_aligned_to_start_modulo_twelve() {
        let policy = OverpaymentPolicy::fixed(15, TimePeriod::Year, amount(10_000));
        let fired: Vec<u32> = (1..=60)
            .filter(|number| !overpayment(*number, amount(3_000), amount(100_000), Some(&policy)).value.is_zero())
            .collect();

        assert_eq!(fired, vec![15, 27, 39, 51]);
    }

    #[test]
    fn test_target_total() {
        let policy = OverpaymentPolicy::target_total(1, amount(5_000));

        assert_eq!(
            overpayment(3, amount(3_750), amount(100_000), Some(&policy)),
            Explained::because(amount(1_250), Reason::ExcessToTarget)
        );
        assert_eq!(
            overpayment(3, amount(5_200), amount(100_000), Some(&policy)),
            Explained::because(Money::ZERO, Reason::ExcessTargetAlreadyMet)
        );
    }

    #[test]
    fn test_capped_to_remaining_principal() {
        let policy = OverpaymentPolicy::fixed(1, TimePeriod::Month, amount(10_000));

        assert_eq!(
            overpayment(40, amount(3_000), amount(2_345), Some(&policy)),
            Explained::because(amount(2_345), Reason::ExcessCappedToRemaining)
        );

        let policy = OverpaymentPolicy::target_total(1, amount(8_000));
        assert_eq!(
            overpayment(40, amount(3_000), Money::ZERO, Some(&policy)),
            Explained::because(Money::ZERO, Reason::ExcessCappedToRemaining)
        );
    }
}
