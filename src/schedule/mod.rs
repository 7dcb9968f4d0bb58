pub mod amortization;
pub mod generator;
pub mod installment;
pub mod insurance;
pub mod overpayment;
pub mod sequence;

pub use amortization::{annuity_payment, AmortizationCalculator, CapitalSplit};
pub use generator::{GeneratorState, InstallmentGenerator};
pub use installment::Installment;
pub use insurance::{estate_insurance, life_insurance};
pub use overpayment::overpayment;
pub use sequence::{Schedule, ScheduleIter};
