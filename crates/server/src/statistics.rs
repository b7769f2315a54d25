//! Statistics API endpoint

use api_types::stats::Statistic;
use axum::{Extension, Json, extract::State};

use crate::{ServerError, server::ServerState, user};

pub async fn get_stats(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Statistic>, ServerError> {
    let stats = state.engine.statistics(&user.username).await?;

    Ok(Json(Statistic {
        total_income_minor: stats.total_income_minor,
        total_expenses_minor: stats.total_expenses_minor,
        balance_minor: stats.total_income_minor - stats.total_expenses_minor,
    }))
}
