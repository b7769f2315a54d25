//! Transaction operations: creation (with automatic categorization and the
//! allocator trigger), owner-scoped reads, soft deletion and totals.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use sea_orm::{
    ActiveValue, QueryFilter, QueryOrder, QuerySelect, Statement, prelude::*,
};

use crate::util::{
    normalize_optional_text, validate_amount, validate_description, validate_occurred_at,
};
use crate::{
    Category, EngineError, NewTransactionCmd, ResultEngine, Transaction, TransactionKind,
    categories::classify, transactions,
};

use super::Engine;

/// Filters for listing transactions.
///
/// `from` is inclusive and `to` is exclusive (`[from, to)`), both in UTC.
#[derive(Clone, Debug, Default)]
pub struct TransactionListFilter {
    pub kind: Option<TransactionKind>,
    pub category: Option<Category>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    /// If true, includes soft-deleted transactions (default: false).
    pub include_inactive: bool,
    /// Maximum number of rows to return (default: 50).
    pub limit: Option<u64>,
}

/// Per-user totals over active transactions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub total_income_minor: i64,
    pub total_expenses_minor: i64,
}

fn validate_list_filter(filter: &TransactionListFilter) -> ResultEngine<()> {
    if let (Some(from), Some(to)) = (filter.from, filter.to)
        && from >= to
    {
        return Err(EngineError::InvalidField(
            "invalid range: from must be < to".to_string(),
        ));
    }
    Ok(())
}

impl Engine {
    /// Record a new transaction for a user.
    ///
    /// When the command carries no category, the keyword categorizer assigns
    /// one from the description. For income transactions the goal allocator
    /// runs afterwards as a best-effort side effect: its failures are logged
    /// and swallowed, never surfaced to the caller.
    pub async fn create_transaction(&self, cmd: NewTransactionCmd) -> ResultEngine<Transaction> {
        let description = validate_description(&cmd.description)?;
        validate_amount(cmd.amount_minor)?;
        validate_occurred_at(cmd.occurred_at)?;

        let category = cmd.category.unwrap_or_else(|| classify(&description));

        let tx = Transaction {
            id: Uuid::new_v4(),
            user_id: cmd.user_id,
            kind: cmd.kind,
            description,
            amount_minor: cmd.amount_minor,
            occurred_at: cmd.occurred_at,
            category,
            subcategory: normalize_optional_text(cmd.subcategory.as_deref()),
            payment_method: cmd.payment_method,
            note: normalize_optional_text(cmd.note.as_deref()),
            active: true,
            created_at: Utc::now(),
        };
        transactions::ActiveModel::from(&tx).insert(&self.database).await?;

        if tx.kind == TransactionKind::Income
            && let Err(err) = self.allocate_income(&tx.user_id, tx.amount_minor).await
        {
            tracing::warn!(
                user_id = %tx.user_id,
                transaction_id = %tx.id,
                "income allocation failed: {err}"
            );
        }

        Ok(tx)
    }

    /// Return a single transaction owned by `user_id`.
    pub async fn transaction(&self, id: Uuid, user_id: &str) -> ResultEngine<Transaction> {
        let model = transactions::Entity::find_by_id(id.to_string())
            .filter(transactions::Column::UserId.eq(user_id))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))?;

        Transaction::try_from(model)
    }

    /// List a user's transactions, newest first.
    pub async fn list_transactions(
        &self,
        user_id: &str,
        filter: &TransactionListFilter,
    ) -> ResultEngine<Vec<Transaction>> {
        validate_list_filter(filter)?;

        let mut query = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .order_by_desc(transactions::Column::OccurredAt)
            .limit(filter.limit.unwrap_or(50));

        if !filter.include_inactive {
            query = query.filter(transactions::Column::Active.eq(true));
        }
        if let Some(kind) = filter.kind {
            query = query.filter(transactions::Column::Kind.eq(kind.as_str()));
        }
        if let Some(category) = filter.category {
            query = query.filter(transactions::Column::Category.eq(category.as_str()));
        }
        if let Some(from) = filter.from {
            query = query.filter(transactions::Column::OccurredAt.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(transactions::Column::OccurredAt.lt(to));
        }

        let models = query.all(&self.database).await?;
        models.into_iter().map(Transaction::try_from).collect()
    }

    /// Soft-delete a transaction (sets `active = false`).
    ///
    /// Deleting a foreign, unknown or already-deleted transaction is
    /// NotFound; soft-deleted records cannot be reactivated.
    pub async fn delete_transaction(&self, id: Uuid, user_id: &str) -> ResultEngine<()> {
        let model = transactions::Entity::find_by_id(id.to_string())
            .filter(transactions::Column::UserId.eq(user_id))
            .filter(transactions::Column::Active.eq(true))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))?;

        let mut active_model: transactions::ActiveModel = model.into();
        active_model.active = ActiveValue::Set(false);
        active_model.update(&self.database).await?;

        Ok(())
    }

    /// Returns per-user totals: summed active income and expense amounts.
    pub async fn statistics(&self, user_id: &str) -> ResultEngine<Statistics> {
        let backend = self.database.get_database_backend();

        let mut totals = Statistics::default();
        for (kind, slot) in [
            (TransactionKind::Income, &mut totals.total_income_minor),
            (TransactionKind::Expense, &mut totals.total_expenses_minor),
        ] {
            let stmt = Statement::from_sql_and_values(
                backend,
                "SELECT COALESCE(SUM(amount_minor), 0) AS sum \
                 FROM transactions \
                 WHERE user_id = ? AND kind = ? AND active = TRUE",
                vec![user_id.into(), kind.as_str().into()],
            );
            let row = self.database.query_one(stmt).await?;
            *slot = row.and_then(|r| r.try_get("", "sum").ok()).unwrap_or(0);
        }

        Ok(totals)
    }
}
