use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Income,
        Expense,
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PaymentMethod {
        #[default]
        Cash,
        CreditCard,
        DebitCard,
        Transfer,
        Other,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub kind: TransactionKind,
        pub description: String,
        /// Must be > 0, in minor units (cents).
        pub amount_minor: i64,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub occurred_at: DateTime<FixedOffset>,
        /// Canonical category string; when absent the server assigns one
        /// from the description.
        pub category: Option<String>,
        pub subcategory: Option<String>,
        pub payment_method: Option<PaymentMethod>,
        pub note: Option<String>,
    }

    /// Request body for listing transactions. All filters optional.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionList {
        pub kind: Option<TransactionKind>,
        pub category: Option<String>,
        /// Inclusive lower bound (RFC3339).
        pub from: Option<DateTime<FixedOffset>>,
        /// Exclusive upper bound (RFC3339).
        pub to: Option<DateTime<FixedOffset>>,
        pub include_inactive: Option<bool>,
        pub limit: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub kind: TransactionKind,
        pub description: String,
        pub amount_minor: i64,
        /// RFC3339 timestamp in UTC.
        pub occurred_at: DateTime<FixedOffset>,
        pub category: String,
        pub subcategory: Option<String>,
        pub payment_method: PaymentMethod,
        pub note: Option<String>,
        pub active: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
    }
}

pub mod goal {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum GoalPriority {
        Low,
        #[default]
        Medium,
        High,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum GoalStatus {
        Active,
        Paused,
        Completed,
        Cancelled,
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

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalNew {
        pub title: String,
        pub description: Option<String>,
        /// Must be >= 1, in minor units (cents).
        pub target_amount_minor: i64,
        /// Defaults to now when absent.
        pub started_at: Option<DateTime<FixedOffset>>,
        /// Must be after `started_at` when present.
        pub deadline: Option<DateTime<FixedOffset>>,
        pub category: Option<String>,
        pub priority: Option<GoalPriority>,
        pub reminder: Option<ReminderFrequency>,
    }

    /// Partial update; absent fields are left untouched.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct GoalUpdate {
        pub title: Option<String>,
        pub description: Option<String>,
        pub deadline: Option<DateTime<FixedOffset>>,
        pub priority: Option<GoalPriority>,
        pub status: Option<GoalStatus>,
        pub reminder: Option<ReminderFrequency>,
    }

    /// Query string for listing goals.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct GoalList {
        pub status: Option<GoalStatus>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalView {
        pub id: Uuid,
        pub title: String,
        pub description: Option<String>,
        pub target_amount_minor: i64,
        pub current_amount_minor: i64,
        pub started_at: DateTime<FixedOffset>,
        pub deadline: Option<DateTime<FixedOffset>>,
        pub category: Option<String>,
        pub priority: GoalPriority,
        pub status: GoalStatus,
        pub reminder: ReminderFrequency,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalListResponse {
        pub goals: Vec<GoalView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ContributionNew {
        /// Must be > 0 and within the goal's remaining capacity.
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ContributionResponse {
        pub goal: GoalView,
        pub transaction: transaction::TransactionView,
    }
}

pub mod stats {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Statistic {
        pub total_income_minor: i64,
        pub total_expenses_minor: i64,
        /// `total_income_minor - total_expenses_minor`.
        pub balance_minor: i64,
    }
}
