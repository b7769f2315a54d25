//! Savings goals API endpoints

use api_types::goal::{
    ContributionNew, ContributionResponse, GoalList, GoalListResponse, GoalNew,
    GoalPriority as ApiPriority, GoalStatus as ApiStatus, GoalUpdate, GoalView,
    ReminderFrequency as ApiReminder,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::ServerState, transactions, user};
use engine::{ContributeCmd, Goal, NewGoalCmd, UpdateGoalCmd};

fn map_priority(priority: engine::GoalPriority) -> ApiPriority {
    match priority {
        engine::GoalPriority::Low => ApiPriority::Low,
        engine::GoalPriority::Medium => ApiPriority::Medium,
        engine::GoalPriority::High => ApiPriority::High,
    }
}

fn unmap_priority(priority: ApiPriority) -> engine::GoalPriority {
    match priority {
        ApiPriority::Low => engine::GoalPriority::Low,
        ApiPriority::Medium => engine::GoalPriority::Medium,
        ApiPriority::High => engine::GoalPriority::High,
    }
}

fn map_status(status: engine::GoalStatus) -> ApiStatus {
    match status {
        engine::GoalStatus::Active => ApiStatus::Active,
        engine::GoalStatus::Paused => ApiStatus::Paused,
        engine::GoalStatus::Completed => ApiStatus::Completed,
        engine::GoalStatus::Cancelled => ApiStatus::Cancelled,
    }
}

fn unmap_status(status: ApiStatus) -> engine::GoalStatus {
    match status {
        ApiStatus::Active => engine::GoalStatus::Active,
        ApiStatus::Paused => engine::GoalStatus::Paused,
        ApiStatus::Completed => engine::GoalStatus::Completed,
        ApiStatus::Cancelled => engine::GoalStatus::Cancelled,
    }
}

fn map_reminder(reminder: engine::ReminderFrequency) -> ApiReminder {
    match reminder {
        engine::ReminderFrequency::None => ApiReminder::None,
        engine::ReminderFrequency::Daily => ApiReminder::Daily,
        engine::ReminderFrequency::Weekly => ApiReminder::Weekly,
        engine::ReminderFrequency::Monthly => ApiReminder::Monthly,
    }
}

fn unmap_reminder(reminder: ApiReminder) -> engine::ReminderFrequency {
    match reminder {
        ApiReminder::None => engine::ReminderFrequency::None,
        ApiReminder::Daily => engine::ReminderFrequency::Daily,
        ApiReminder::Weekly => engine::ReminderFrequency::Weekly,
        ApiReminder::Monthly => engine::ReminderFrequency::Monthly,
    }
}

fn view(goal: Goal) -> GoalView {
    GoalView {
        id: goal.id,
        title: goal.title,
        description: goal.description,
        target_amount_minor: goal.target_amount_minor,
        current_amount_minor: goal.current_amount_minor,
        started_at: goal.started_at.fixed_offset(),
        deadline: goal.deadline.map(|dt| dt.fixed_offset()),
        category: goal.category,
        priority: map_priority(goal.priority),
        status: map_status(goal.status),
        reminder: map_reminder(goal.reminder),
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<GoalNew>,
) -> Result<(StatusCode, Json<GoalView>), ServerError> {
    let started_at = payload
        .started_at
        .map_or_else(Utc::now, |dt| dt.with_timezone(&Utc));

    let mut cmd = NewGoalCmd::new(
        &user.username,
        &payload.title,
        payload.target_amount_minor,
        started_at,
    );
    if let Some(description) = payload.description.as_deref() {
        cmd = cmd.description(description);
    }
    if let Some(deadline) = payload.deadline {
        cmd = cmd.deadline(deadline.with_timezone(&Utc));
    }
    if let Some(category) = payload.category.as_deref() {
        cmd = cmd.category(category);
    }
    if let Some(priority) = payload.priority {
        cmd = cmd.priority(unmap_priority(priority));
    }
    if let Some(reminder) = payload.reminder {
        cmd = cmd.reminder(unmap_reminder(reminder));
    }

    let goal = state.engine.new_goal(cmd).await?;

    Ok((StatusCode::CREATED, Json(view(goal))))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<GoalList>,
) -> Result<Json<GoalListResponse>, ServerError> {
    let status = query.status.map(unmap_status);
    let goals = state.engine.list_goals(&user.username, status).await?;

    Ok(Json(GoalListResponse {
        goals: goals.into_iter().map(view).collect(),
    }))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GoalView>, ServerError> {
    let goal = state.engine.goal(id, &user.username).await?;

    Ok(Json(view(goal)))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<GoalUpdate>,
) -> Result<Json<GoalView>, ServerError> {
    let mut cmd = UpdateGoalCmd::new(id, &user.username);
    cmd.title = payload.title;
    cmd.description = payload.description;
    cmd.deadline = payload.deadline.map(|dt| dt.with_timezone(&Utc));
    cmd.priority = payload.priority.map(unmap_priority);
    cmd.status = payload.status.map(unmap_status);
    cmd.reminder = payload.reminder.map(unmap_reminder);

    let goal = state.engine.update_goal(cmd).await?;

    Ok(Json(view(goal)))
}

pub async fn contribute(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ContributionNew>,
) -> Result<(StatusCode, Json<ContributionResponse>), ServerError> {
    let cmd = ContributeCmd::new(id, &user.username, payload.amount_minor);
    let (goal, tx) = state.engine.contribute(cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(ContributionResponse {
            goal: view(goal),
            transaction: transactions::view(tx),
        }),
    ))
}
