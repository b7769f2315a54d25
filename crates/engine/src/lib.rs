//! Hucha domain engine.
//!
//! The engine owns the data model (users, transactions, savings goals) and
//! the two decision cores of the application: the transaction
//! [categorizer](classify) and the income [goal allocator](Engine::allocate_income).
//! Everything else is owner-scoped CRUD over the database.
//!
//! All monetary amounts are integer minor units (cents, `i64`).

pub use categories::{Category, classify};
pub use commands::{ContributeCmd, NewGoalCmd, NewTransactionCmd, UpdateGoalCmd};
pub use error::EngineError;
pub use goals::{GOAL_CONTRIBUTION_SUBCATEGORY, Goal, GoalPriority, GoalStatus, ReminderFrequency};
pub use ops::{Engine, EngineBuilder, Statistics, TransactionListFilter};
pub use transactions::{PaymentMethod, Transaction, TransactionKind};

mod allocation;
mod categories;
mod commands;
mod error;
mod goals;
mod ops;
mod transactions;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
