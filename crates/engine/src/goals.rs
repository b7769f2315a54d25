//! Savings goal primitives.
//!
//! A `Goal` is a savings target with a monetary objective, an optional
//! deadline, a priority and a lifecycle status. The invariant the engine
//! maintains is `current_amount_minor <= target_amount_minor`: the manual
//! contribution path rejects overshoot outright, the allocator clamps each
//! automatic contribution to the goal's remaining capacity.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Subcategory tag written on the expense record created by a manual goal
/// contribution. Automatic allocations create no record at all.
pub const GOAL_CONTRIBUTION_SUBCATEGORY: &str = "aporte_meta";

/// Maximum number of simultaneously active goals per user. Checked at goal
/// creation only.
pub const MAX_ACTIVE_GOALS: usize = 10;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl GoalPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl TryFrom<&str> for GoalPriority {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(EngineError::InvalidField(format!(
                "invalid goal priority: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    #[default]
    Active,
    Completed,
    Paused,
    Cancelled,
}

impl GoalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Paused => "paused",
            Self::Cancelled => "cancelled",
        }
    }
}

impl TryFrom<&str> for GoalStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "paused" => Ok(Self::Paused),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(EngineError::InvalidField(format!(
                "invalid goal status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderFrequency {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
}

impl ReminderFrequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl TryFrom<&str> for ReminderFrequency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "none" => Ok(Self::None),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(EngineError::InvalidField(format!(
                "invalid reminder frequency: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub target_amount_minor: i64,
    pub current_amount_minor: i64,
    pub started_at: DateTime<Utc>,
    pub deadline: Option<DateTime<Utc>>,
    pub category: Option<String>,
    pub priority: GoalPriority,
    pub status: GoalStatus,
    pub reminder: ReminderFrequency,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    /// The maximum further contribution the goal can accept.
    pub fn remaining_capacity_minor(&self) -> i64 {
        self.target_amount_minor - self.current_amount_minor
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "goals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub target_amount_minor: i64,
    pub current_amount_minor: i64,
    pub started_at: DateTimeUtc,
    pub deadline: Option<DateTimeUtc>,
    pub category: Option<String>,
    pub priority: String,
    pub status: String,
    pub reminder: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Goal> for ActiveModel {
    fn from(goal: &Goal) -> Self {
        Self {
            id: ActiveValue::Set(goal.id.to_string()),
            user_id: ActiveValue::Set(goal.user_id.clone()),
            title: ActiveValue::Set(goal.title.clone()),
            description: ActiveValue::Set(goal.description.clone()),
            target_amount_minor: ActiveValue::Set(goal.target_amount_minor),
            current_amount_minor: ActiveValue::Set(goal.current_amount_minor),
            started_at: ActiveValue::Set(goal.started_at),
            deadline: ActiveValue::Set(goal.deadline),
            category: ActiveValue::Set(goal.category.clone()),
            priority: ActiveValue::Set(goal.priority.as_str().to_string()),
            status: ActiveValue::Set(goal.status.as_str().to_string()),
            reminder: ActiveValue::Set(goal.reminder.as_str().to_string()),
            created_at: ActiveValue::Set(goal.created_at),
        }
    }
}

impl TryFrom<Model> for Goal {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("goal not exists".to_string()))?,
            user_id: model.user_id,
            title: model.title,
            description: model.description,
            target_amount_minor: model.target_amount_minor,
            current_amount_minor: model.current_amount_minor,
            started_at: model.started_at,
            deadline: model.deadline,
            category: model.category,
            priority: GoalPriority::try_from(model.priority.as_str())?,
            status: GoalStatus::try_from(model.status.as_str())?,
            reminder: ReminderFrequency::try_from(model.reminder.as_str()).unwrap_or_default(),
            created_at: model.created_at,
        })
    }
}
