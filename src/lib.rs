pub mod calendar;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod rrso;
pub mod schedule;
pub mod serialization;
pub mod summary;
pub mod types;

// re-export key types
pub use calendar::CalendarPeriod;
pub use config::{
    EstateInsuranceConfig, LifeInsuranceConfig, LoanConfiguration, LoanConfigurationBuilder,
    OverpaymentMode, OverpaymentPolicy, PromotionSchedule, PromotionSegment, SubsidyProgram,
    PCC3_MORTGAGE_TAX,
};
pub use decimal::{Money, Rate};
pub use errors::{Result, ScheduleError};
pub use rrso::{CashFlow, RrsoSolver};
pub use schedule::{GeneratorState, Installment, InstallmentGenerator, Schedule, ScheduleIter};
pub use serialization::{InstallmentRow, ScheduleView, SummaryView};
pub use summary::{Summary, RRSO_EPSILON};
pub use types::{ExhaustionReason, Explained, InstallmentType, Reason, TimePeriod};

// re-export external dependencies that users will need
pub use chrono;
pub use rust_decimal::Decimal;
