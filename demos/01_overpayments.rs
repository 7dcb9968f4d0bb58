/// overpayments - compare a plain schedule with monthly and target overpayments
use mortgage_schedule_rs::chrono::NaiveDate;
use mortgage_schedule_rs::{
    LoanConfiguration, LoanConfigurationBuilder, Money, OverpaymentPolicy, Rate, Summary, TimePeriod,
};

fn base() -> Result<LoanConfigurationBuilder, Box<dyn std::error::Error>> {
    Ok(LoanConfiguration::builder()
        .principal(Money::from_major(400_000))
        .term(30, TimePeriod::Year)
        .margin(Rate::from_bps(190))
        .base_rate(Rate::from_bps(585))
        .disbursement_date(NaiveDate::from_ymd_opt(2024, 5, 6).ok_or("bad date")?)
        .first_installment_date(NaiveDate::from_ymd_opt(2024, 6, 6).ok_or("bad date")?))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let scenarios = [
        ("no overpayments", base()?.build()?),
        (
            "1000 every month",
            base()?
                .overpayments(OverpaymentPolicy::fixed(1, TimePeriod::Month, Money::from_major(1_000)))
                .build()?,
        ),
        (
            "10000 every year",
            base()?
                .overpayments(OverpaymentPolicy::fixed(12, TimePeriod::Year, Money::from_major(10_000)))
                .build()?,
        ),
        (
            "4000 a month in total",
            base()?
                .overpayments(OverpaymentPolicy::target_total(1, Money::from_major(4_000)))
                .build()?,
        ),
    ];

    for (name, config) in &scenarios {
        let summary = Summary::generate(config)?;
        println!(
            "{name:<24} cost {:>12}  last {}  rrso {}",
            summary.cost.round_dp(2),
            summary.last_date,
            summary.rrso
        );
    }

    Ok(())
}
