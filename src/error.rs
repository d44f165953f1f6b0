use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("simulation duration must be a positive, finite number of seconds (got {0})")]
    InvalidDuration(f64),

    #[error("invalid tuning for {field}: {reason}")]
    InvalidTuning { field: &'static str, reason: String },

    #[error("rotation exceeded {limit} casts before reaching {duration} seconds")]
    CastLimitExceeded { limit: u64, duration: f64 },
}

impl SimulationError {
    pub(crate) fn tuning(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidTuning {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;
