//! Command structs for engine operations.
//!
//! These types group parameters for write operations (transaction and goal
//! creation, goal updates, contributions), keeping call sites readable and
//! avoiding long argument lists.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{Category, GoalPriority, GoalStatus, PaymentMethod, ReminderFrequency, TransactionKind};

/// Create an income or expense transaction.
#[derive(Clone, Debug)]
pub struct NewTransactionCmd {
    pub user_id: String,
    pub kind: TransactionKind,
    pub description: String,
    pub amount_minor: i64,
    pub occurred_at: DateTime<Utc>,
    /// When `None` the categorizer assigns one from the description.
    pub category: Option<Category>,
    pub subcategory: Option<String>,
    pub payment_method: PaymentMethod,
    pub note: Option<String>,
}

impl NewTransactionCmd {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        kind: TransactionKind,
        description: impl Into<String>,
        amount_minor: i64,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            kind,
            description: description.into(),
            amount_minor,
            occurred_at,
            category: None,
            subcategory: None,
            payment_method: PaymentMethod::default(),
            note: None,
        }
    }

    #[must_use]
    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    #[must_use]
    pub fn subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    #[must_use]
    pub fn payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = method;
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Create a savings goal.
#[derive(Clone, Debug)]
pub struct NewGoalCmd {
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub target_amount_minor: i64,
    pub started_at: DateTime<Utc>,
    pub deadline: Option<DateTime<Utc>>,
    pub category: Option<String>,
    pub priority: GoalPriority,
    pub reminder: ReminderFrequency,
}

impl NewGoalCmd {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        title: impl Into<String>,
        target_amount_minor: i64,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            title: title.into(),
            description: None,
            target_amount_minor,
            started_at,
            deadline: None,
            category: None,
            priority: GoalPriority::default(),
            reminder: ReminderFrequency::default(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn priority(mut self, priority: GoalPriority) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn reminder(mut self, reminder: ReminderFrequency) -> Self {
        self.reminder = reminder;
        self
    }
}

/// Update fields of an existing goal. `None` fields are left unchanged.
#[derive(Clone, Debug)]
pub struct UpdateGoalCmd {
    pub goal_id: Uuid,
    pub user_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub priority: Option<GoalPriority>,
    pub status: Option<GoalStatus>,
    pub reminder: Option<ReminderFrequency>,
}

impl UpdateGoalCmd {
    #[must_use]
    pub fn new(goal_id: Uuid, user_id: impl Into<String>) -> Self {
        Self {
            goal_id,
            user_id: user_id.into(),
            title: None,
            description: None,
            deadline: None,
            priority: None,
            status: None,
            reminder: None,
        }
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: GoalStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn priority(mut self, priority: GoalPriority) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// Manually contribute funds to a goal.
#[derive(Clone, Debug)]
pub struct ContributeCmd {
    pub goal_id: Uuid,
    pub user_id: String,
    pub amount_minor: i64,
}

impl ContributeCmd {
    #[must_use]
    pub fn new(goal_id: Uuid, user_id: impl Into<String>, amount_minor: i64) -> Self {
        Self {
            goal_id,
            user_id: user_id.into(),
            amount_minor,
        }
    }
}
