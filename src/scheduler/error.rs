//! Error types for scheduler operations

use thiserror::Error;

/// Reasons a scheduler operation was rejected.
///
/// None of these are fatal. The scheduler logs each one where it is detected
/// and leaves its state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    #[error("a timer with the identifier {id:?} already exists")]
    DuplicateId { id: String },

    #[error("timer pool size reached its limit: {max_pool_size}")]
    PoolExhausted { max_pool_size: usize },

    #[error("{id:?} is not an active addressable timer")]
    UnknownId { id: String },

    #[error("addressable timers need a non-empty identifier")]
    EmptyId,

    #[error("timer handle no longer refers to an active timer")]
    StaleHandle,
}
