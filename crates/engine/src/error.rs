//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`CapacityExceeded`] thrown when a contribution would push a goal past
//!   its target amount.
//! - [`KeyNotFound`] thrown when an item is not found or not owned by the
//!   caller.
//!
//!  [`CapacityExceeded`]: EngineError::CapacityExceeded
//!  [`KeyNotFound`]: EngineError::KeyNotFound
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The contribution would exceed the goal target. `max_minor` is the
    /// largest amount the goal can still accept.
    #[error("goal \"{goal}\" can accept at most {max_minor} more")]
    CapacityExceeded { goal: String, max_minor: i64 },
    /// The user already holds the maximum number of active goals.
    #[error("active goal limit reached ({0})")]
    GoalLimitReached(usize),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid field: {0}")]
    InvalidField(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::CapacityExceeded {
                    goal: a,
                    max_minor: am,
                },
                Self::CapacityExceeded {
                    goal: b,
                    max_minor: bm,
                },
            ) => a == b && am == bm,
            (Self::GoalLimitReached(a), Self::GoalLimitReached(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidField(a), Self::InvalidField(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
