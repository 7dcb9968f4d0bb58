use thiserror::Error;

use crate::types::ExhaustionReason;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    #[error("invalid configuration: {field}: {message}")]
    InvalidConfiguration {
        field: &'static str,
        message: String,
    },

    #[error("cannot calculate installment {number}: {reason}")]
    ExhaustedSchedule {
        number: u32,
        reason: ExhaustionReason,
    },

    #[error("rrso did not converge after {iterations} iterations (last delta: {last_delta})")]
    ConvergenceFailure {
        iterations: u32,
        last_delta: f64,
    },

    #[error("calculation error: {message}")]
    Calculation {
        message: String,
    },

    #[error("serialization error: {message}")]
    Serialization {
        message: String,
    },
}

impl ScheduleError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        ScheduleError::InvalidConfiguration {
            field,
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for ScheduleError {
    fn from(e: serde_json::Error) -> Self {
        ScheduleError::Serialization {
            message: e.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
