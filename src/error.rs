use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("division by zero: {0}")]
    DivisionByZero(String),

    #[error("insufficient data: window of {requested} games but only {available} rows")]
    InsufficientData { requested: usize, available: usize },

    #[error("no rows supplied: {0}")]
    EmptyInput(&'static str),

    #[error("suggestion index {index} out of range for {len} suggestions")]
    OutOfRange { index: usize, len: usize },
}

pub type StatsResult<T> = std::result::Result<T, StatsError>;
