use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{run, run_with_listener, spawn_with_listener};

mod goals;
mod server;
mod statistics;
mod transactions;
mod user;

pub mod types {
    pub mod transaction {
        pub use api_types::transaction::{
            PaymentMethod, TransactionKind, TransactionList, TransactionListResponse,
            TransactionNew, TransactionView,
        };
    }

    pub mod goal {
        pub use api_types::goal::{
            ContributionNew, ContributionResponse, GoalList, GoalListResponse, GoalNew,
            GoalPriority, GoalStatus, GoalUpdate, GoalView, ReminderFrequency,
        };
    }

    pub mod stats {
        pub use api_types::stats::Statistic;
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
    /// Only present for capacity rejections: the largest contribution the
    /// goal can still accept.
    #[serde(skip_serializing_if = "Option::is_none")]
    max_amount_minor: Option<i64>,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::CapacityExceeded { .. }
        | EngineError::GoalLimitReached(_)
        | EngineError::InvalidAmount(_)
        | EngineError::InvalidField(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn body_for_engine_error(err: EngineError) -> Error {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            Error {
                error: "internal server error".to_string(),
                max_amount_minor: None,
            }
        }
        EngineError::CapacityExceeded { goal, max_minor } => Error {
            error: format!("contribution exceeds remaining capacity of goal '{goal}'"),
            max_amount_minor: Some(max_minor),
        },
        other => Error {
            error: other.to_string(),
            max_amount_minor: None,
        },
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), body_for_engine_error(err)),
            ServerError::Generic(err) => (
                StatusCode::BAD_REQUEST,
                Error {
                    error: err,
                    max_amount_minor: None,
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
