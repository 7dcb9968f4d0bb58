/// quick start - schedule and summary of a 25 year mortgage
use mortgage_schedule_rs::chrono::NaiveDate;
use mortgage_schedule_rs::{LoanConfiguration, Money, Rate, Schedule, Summary, SummaryView};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = LoanConfiguration::builder()
        .principal(Money::from_major(500_000))
        .term_months(300)
        .margin(Rate::from_bps(200))
        .base_rate(Rate::from_bps(567))
        .provision(Rate::from_percentage(1))
        .disbursement_date(NaiveDate::from_ymd_opt(2024, 1, 10).ok_or("bad date")?)
        .first_installment_date(NaiveDate::from_ymd_opt(2024, 2, 10).ok_or("bad date")?)
        .business_days_only(true)
        .build()?;

    let schedule = Schedule::generate(&config)?;
    for installment in schedule.iter().take(4) {
        println!(
            "{:>3}  {}  {:>10}  {:>10}  {:>12}",
            installment.number,
            installment.due_date.value,
            installment.principal.value.round_dp(2),
            installment.interest.value.round_dp(2),
            installment.remaining_principal.value.round_dp(2),
        );
    }

    let summary = Summary::from_schedule(&config, &schedule)?;
    println!("{}", SummaryView::from_summary(&summary).to_json_pretty()?);

    Ok(())
}
