use chrono::NaiveDate;
use log::debug;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{Result, ScheduleError};
use crate::types::{Explained, InstallmentType, Reason, TimePeriod};

/// civil-law transaction tax on establishing a mortgage, in currency units
pub const PCC3_MORTGAGE_TAX: Money = Money::whole(19);

/// annual rate left to the borrower under the subsidy program
pub const SUBSIDY_BORROWER_RATE: Rate = Rate::from_decimal(dec!(0.02));

/// installments covered by the subsidy program (ten years)
pub const SUBSIDY_INSTALLMENTS: u32 = 120;

/// estate (property) insurance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstateInsuranceConfig {
    /// annual premium as a fraction of `base_amount`
    pub rate: Rate,
    pub base_amount: Money,
    pub period: TimePeriod,
}

impl EstateInsuranceConfig {
    pub fn new(rate: Rate, base_amount: Money, period: TimePeriod) -> Self {
        Self {
            rate,
            base_amount,
            period,
        }
    }

    /// no estate insurance billed
    pub fn none() -> Self {
        Self::new(Rate::ZERO, Money::ZERO, TimePeriod::Month)
    }
}

impl Default for EstateInsuranceConfig {
    fn default() -> Self {
        Self::none()
    }
}

/// life insurance, optionally with a lump sum paid in advance at disbursement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeInsuranceConfig {
    /// annual premium as a fraction of `base_amount`
    pub rate: Rate,
    pub base_amount: Money,
    pub period: TimePeriod,
    /// months covered by the advance payment, 0 disables it
    pub advance_months: u32,
    /// annual rate used only for the advance lump sum
    pub advance_rate: Rate,
}

impl LifeInsuranceConfig {
    pub fn new(rate: Rate, base_amount: Money, period: TimePeriod) -> Self {
        Self {
            rate,
            base_amount,
            period,
            advance_months: 0,
            advance_rate: Rate::ZERO,
        }
    }

    pub fn with_advance(mut self, months: u32, rate: Rate) -> Self {
        self.advance_months = months;
        self.advance_rate = rate;
        self
    }
}

/// one block of installments with an overridden margin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PromotionSegment {
    pub duration_months: u32,
    pub margin: Rate,
}

/// consecutive promotional margin segments, chained by duration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromotionSchedule {
    segments: Vec<PromotionSegment>,
}

impl PromotionSchedule {
    pub fn new(segments: Vec<PromotionSegment>) -> Self {
        Self { segments }
    }

    pub fn segment(mut self, duration_months: u32, margin: Rate) -> Self {
        self.segments.push(PromotionSegment {
            duration_months,
            margin,
        });
        self
    }

    pub fn segments(&self) -> &[PromotionSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// first segment whose cumulative duration reaches `number`
    pub fn segment_for(&self, number: u32) -> Option<&PromotionSegment> {
        let mut covered = 0;
        self.segments.iter().find(|segment| {
            covered += segment.duration_months;
            covered >= number
        })
    }
}

/// government subsidy lowering the borrower's rate to 2% for ten years
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubsidyProgram {
    /// annual rate the subsidy is computed against
    pub rate: Rate,
}

impl SubsidyProgram {
    pub fn new(rate: Rate) -> Self {
        Self { rate }
    }

    pub fn covers(&self, number: u32) -> bool {
        number <= SUBSIDY_INSTALLMENTS
    }
}

/// how much is overpaid when an overpayment fires
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum OverpaymentMode {
    /// the same amount every time
    Fixed(Money),
    /// top the installment's total cash up to this amount
    TargetTotal(Money),
}

/// recurring extra principal payments
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverpaymentPolicy {
    /// first installment number eligible for an overpayment
    pub start: u32,
    pub period: TimePeriod,
    pub mode: OverpaymentMode,
}

impl OverpaymentPolicy {
    pub fn fixed(start: u32, period: TimePeriod, value: Money) -> Self {
        Self {
            start,
            period,
            mode: OverpaymentMode::Fixed(value),
        }
    }

    pub fn target_total(start: u32, value: Money) -> Self {
        Self {
            start,
            period: TimePeriod::Month,
            mode: OverpaymentMode::TargetTotal(value),
        }
    }

    pub fn value(&self) -> Money {
        match self.mode {
            OverpaymentMode::Fixed(value) | OverpaymentMode::TargetTotal(value) => value,
        }
    }
}

/// validated, immutable set of loan parameters for one calculation run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanConfiguration {
    principal: Money,
    term_months: u32,
    margin: Rate,
    base_rate: Rate,
    provision: Rate,
    other_costs: Money,
    mortgage_tax: Money,
    installment_type: InstallmentType,
    disbursement_date: NaiveDate,
    first_installment_date: NaiveDate,
    business_days_only: bool,
    estate_insurance: EstateInsuranceConfig,
    life_insurance: Option<LifeInsuranceConfig>,
    promotions: PromotionSchedule,
    subsidy: Option<SubsidyProgram>,
    overpayments: Option<OverpaymentPolicy>,
}

impl LoanConfiguration {
    pub fn builder() -> LoanConfigurationBuilder {
        LoanConfigurationBuilder::new()
    }

    /// load from json, validating like the builder does
    pub fn from_json(json: &str) -> Result<Self> {
        let builder: LoanConfigurationBuilder = serde_json::from_str(json)?;
        builder.build()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn principal(&self) -> Money {
        self.principal
    }

    pub fn term_months(&self) -> u32 {
        self.term_months
    }

    pub fn margin(&self) -> Rate {
        self.margin
    }

    pub fn base_rate(&self) -> Rate {
        self.base_rate
    }

    pub fn provision(&self) -> Rate {
        self.provision
    }

    pub fn other_costs(&self) -> Money {
        self.other_costs
    }

    pub fn mortgage_tax(&self) -> Money {
        self.mortgage_tax
    }

    pub fn installment_type(&self) -> InstallmentType {
        self.installment_type
    }

    pub fn disbursement_date(&self) -> NaiveDate {
        self.disbursement_date
    }

    pub fn first_installment_date(&self) -> NaiveDate {
        self.first_installment_date
    }

    pub fn business_days_only(&self) -> bool {
        self.business_days_only
    }

    pub fn estate_insurance(&self) -> &EstateInsuranceConfig {
        &self.estate_insurance
    }

    pub fn life_insurance(&self) -> Option<&LifeInsuranceConfig> {
        self.life_insurance.as_ref()
    }

    pub fn promotions(&self) -> &PromotionSchedule {
        &self.promotions
    }

    pub fn subsidy(&self) -> Option<&SubsidyProgram> {
        self.subsidy.as_ref()
    }

    pub fn overpayments(&self) -> Option<&OverpaymentPolicy> {
        self.overpayments.as_ref()
    }

    /// margin in force for installment `number`
    pub fn margin_for(&self, number: u32) -> Explained<Rate> {
        match self.promotions.segment_for(number) {
            Some(segment) => Explained::because(segment.margin, Reason::MarginPromotion),
            None => Explained::because(self.margin, Reason::MarginBase),
        }
    }

    /// amortization type in force for installment `number`
    pub fn installment_type_for(&self, number: u32) -> Explained<InstallmentType> {
        match self.subsidy {
            None => Explained::of(self.installment_type),
            Some(subsidy) if subsidy.covers(number) => {
                Explained::because(InstallmentType::Decreasing, Reason::TypeSubsidyDecreasing)
            }
            Some(_) => Explained::because(self.installment_type, Reason::TypeAfterSubsidy),
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.principal.is_positive() {
            return Err(ScheduleError::invalid("principal", "must be greater than zero"));
        }
        if self.term_months == 0 {
            return Err(ScheduleError::invalid("term_months", "must be greater than zero"));
        }
        if self.first_installment_date <= self.disbursement_date {
            return Err(ScheduleError::invalid(
                "first_installment_date",
                format!(
                    "{} is not after disbursement date {}",
                    self.first_installment_date, self.disbursement_date
                ),
            ));
        }
        non_negative_rate("base_rate", self.base_rate)?;
        non_negative_rate("margin", self.base_rate + self.margin)?;
        non_negative_rate("provision", self.provision)?;
        non_negative_money("other_costs", self.other_costs)?;
        non_negative_money("mortgage_tax", self.mortgage_tax)?;

        non_negative_rate("estate_insurance.rate", self.estate_insurance.rate)?;
        non_negative_money("estate_insurance.base_amount", self.estate_insurance.base_amount)?;

        if let Some(life) = &self.life_insurance {
            non_negative_rate("life_insurance.rate", life.rate)?;
            non_negative_rate("life_insurance.advance_rate", life.advance_rate)?;
            non_negative_money("life_insurance.base_amount", life.base_amount)?;
        }

        for segment in self.promotions.segments() {
            if segment.duration_months == 0 {
                return Err(ScheduleError::invalid(
                    "promotions",
                    "segment duration must be greater than zero",
                ));
            }
            non_negative_rate("promotions", self.base_rate + segment.margin)?;
        }

        if let Some(subsidy) = &self.subsidy {
            if subsidy.rate < SUBSIDY_BORROWER_RATE {
                return Err(ScheduleError::invalid(
                    "subsidy.rate",
                    format!("must be at least {SUBSIDY_BORROWER_RATE}"),
                ));
            }
        }

        if let Some(policy) = &self.overpayments {
            if policy.start == 0 {
                return Err(ScheduleError::invalid("overpayments.start", "installments start at 1"));
            }
            non_negative_money("overpayments.value", policy.value())?;
        }

        Ok(())
    }
}

fn non_negative_rate(field: &'static str, rate: Rate) -> Result<()> {
    if rate.is_negative() {
        return Err(ScheduleError::invalid(field, format!("must not be negative, got {rate}")));
    }
    Ok(())
}

fn non_negative_money(field: &'static str, amount: Money) -> Result<()> {
    if amount.is_negative() {
        return Err(ScheduleError::invalid(field, format!("must not be negative, got {amount}")));
    }
    Ok(())
}

/// builder for [`LoanConfiguration`]; everything is checked in `build`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoanConfigurationBuilder {
    principal: Option<Money>,
    term_months: Option<u32>,
    /// year count that did not fit in a month count
    #[serde(skip)]
    overflowing_term: Option<u32>,
    margin: Option<Rate>,
    base_rate: Option<Rate>,
    provision: Option<Rate>,
    other_costs: Option<Money>,
    mortgage_tax: Option<Money>,
    installment_type: Option<InstallmentType>,
    disbursement_date: Option<NaiveDate>,
    first_installment_date: Option<NaiveDate>,
    business_days_only: Option<bool>,
    estate_insurance: Option<EstateInsuranceConfig>,
    life_insurance: Option<LifeInsuranceConfig>,
    promotions: Option<PromotionSchedule>,
    subsidy: Option<SubsidyProgram>,
    overpayments: Option<OverpaymentPolicy>,
}

impl LoanConfigurationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn principal(mut self, amount: Money) -> Self {
        self.principal = Some(amount);
        self
    }

    pub fn term_months(mut self, months: u32) -> Self {
        self.term_months = Some(months);
        self.overflowing_term = None;
        self
    }

    /// term given in months or years
    pub fn term(mut self, value: u32, period: TimePeriod) -> Self {
        match period.convert(value, TimePeriod::Month) {
            Some(months) => self.term_months(months),
            None => {
                self.term_months = None;
                self.overflowing_term = Some(value);
                self
            }
        }
    }

    pub fn margin(mut self, margin: Rate) -> Self {
        self.margin = Some(margin);
        self
    }

    pub fn base_rate(mut self, rate: Rate) -> Self {
        self.base_rate = Some(rate);
        self
    }

    /// provision fee as a fraction of the principal
    pub fn provision(mut self, provision: Rate) -> Self {
        self.provision = Some(provision);
        self
    }

    pub fn other_costs(mut self, amount: Money) -> Self {
        self.other_costs = Some(amount);
        self
    }

    pub fn mortgage_tax(mut self, amount: Money) -> Self {
        self.mortgage_tax = Some(amount);
        self
    }

    pub fn installment_type(mut self, installment_type: InstallmentType) -> Self {
        self.installment_type = Some(installment_type);
        self
    }

    pub fn disbursement_date(mut self, date: NaiveDate) -> Self {
        self.disbursement_date = Some(date);
        self
    }

    pub fn first_installment_date(mut self, date: NaiveDate) -> Self {
        self.first_installment_date = Some(date);
        self
    }

    pub fn business_days_only(mut self, enabled: bool) -> Self {
        self.business_days_only = Some(enabled);
        self
    }

    pub fn estate_insurance(mut self, insurance: EstateInsuranceConfig) -> Self {
        self.estate_insurance = Some(insurance);
        self
    }

    pub fn life_insurance(mut self, insurance: LifeInsuranceConfig) -> Self {
        self.life_insurance = Some(insurance);
        self
    }

    pub fn promotions(mut self, promotions: PromotionSchedule) -> Self {
        self.promotions = Some(promotions);
        self
    }

    pub fn subsidy(mut self, subsidy: SubsidyProgram) -> Self {
        self.subsidy = Some(subsidy);
        self
    }

    pub fn overpayments(mut self, policy: OverpaymentPolicy) -> Self {
        self.overpayments = Some(policy);
        self
    }

    pub fn build(self) -> Result<LoanConfiguration> {
        if let Some(years) = self.overflowing_term {
            return Err(ScheduleError::invalid(
                "term_months",
                format!("{years} years do not fit in a month count"),
            ));
        }
        let config = LoanConfiguration {
            principal: self.principal.ok_or_else(|| ScheduleError::invalid("principal", "is required"))?,
            term_months: self.term_months.ok_or_else(|| ScheduleError::invalid("term_months", "is required"))?,
            margin: self.margin.unwrap_or(Rate::ZERO),
            base_rate: self.base_rate.unwrap_or(Rate::ZERO),
            provision: self.provision.unwrap_or(Rate::ZERO),
            other_costs: self.other_costs.unwrap_or(Money::ZERO),
            mortgage_tax: self.mortgage_tax.unwrap_or(Money::ZERO),
            installment_type: self.installment_type.unwrap_or(InstallmentType::Equal),
            disbursement_date: self
                .disbursement_date
                .ok_or_else(|| ScheduleError::invalid("disbursement_date", "is required"))?,
            first_installment_date: self
                .first_installment_date
                .ok_or_else(|| ScheduleError::invalid("first_installment_date", "is required"))?,
            business_days_only: self.business_days_only.unwrap_or(false),
            estate_insurance: self.estate_insurance.unwrap_or_default(),
            life_insurance: self.life_insurance,
            promotions: self.promotions.unwrap_or_default(),
            subsidy: self.subsidy,
            overpayments: self.overpayments,
        };

        if let Err(e) = config.validate() {
            debug!("rejected loan configuration: {e}");
            return Err(e);
        }

        Ok(config)
    }
}
