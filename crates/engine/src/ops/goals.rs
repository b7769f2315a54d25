//! Savings goal operations: CRUD, the manual contribution path and the
//! automatic income allocator.

use chrono::Utc;
use uuid::Uuid;

use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, Statement, TransactionTrait, prelude::*,
};

use crate::goals::MAX_ACTIVE_GOALS;
use crate::util::{
    normalize_optional_text, validate_amount, validate_deadline, validate_target, validate_title,
};
use crate::{
    Category, ContributeCmd, EngineError, GOAL_CONTRIBUTION_SUBCATEGORY, Goal, GoalStatus,
    NewGoalCmd, PaymentMethod, ResultEngine, Transaction, TransactionKind, UpdateGoalCmd,
    allocation::{allocation_order, allocation_pool, plan_allocation},
    goals, transactions,
};

use super::{Engine, with_tx};

impl Engine {
    /// Create a savings goal.
    ///
    /// A user may hold at most ten active goals; the cap is enforced here
    /// only, not when a paused goal is set back to active.
    pub async fn new_goal(&self, cmd: NewGoalCmd) -> ResultEngine<Goal> {
        let title = validate_title(&cmd.title)?;
        validate_target(cmd.target_amount_minor)?;
        validate_deadline(cmd.started_at, cmd.deadline)?;

        let active_count = goals::Entity::find()
            .filter(goals::Column::UserId.eq(cmd.user_id.as_str()))
            .filter(goals::Column::Status.eq(GoalStatus::Active.as_str()))
            .count(&self.database)
            .await? as usize;
        if active_count >= MAX_ACTIVE_GOALS {
            return Err(EngineError::GoalLimitReached(MAX_ACTIVE_GOALS));
        }

        let goal = Goal {
            id: Uuid::new_v4(),
            user_id: cmd.user_id,
            title,
            description: normalize_optional_text(cmd.description.as_deref()),
            target_amount_minor: cmd.target_amount_minor,
            current_amount_minor: 0,
            started_at: cmd.started_at,
            deadline: cmd.deadline,
            category: normalize_optional_text(cmd.category.as_deref()),
            priority: cmd.priority,
            status: GoalStatus::Active,
            reminder: cmd.reminder,
            created_at: Utc::now(),
        };
        goals::ActiveModel::from(&goal).insert(&self.database).await?;

        Ok(goal)
    }

    /// Return a single goal owned by `user_id`.
    pub async fn goal(&self, id: Uuid, user_id: &str) -> ResultEngine<Goal> {
        let model = self.find_goal(&self.database, id, user_id).await?;
        Goal::try_from(model)
    }

    /// List a user's goals, optionally restricted to one status.
    pub async fn list_goals(
        &self,
        user_id: &str,
        status: Option<GoalStatus>,
    ) -> ResultEngine<Vec<Goal>> {
        let mut query = goals::Entity::find()
            .filter(goals::Column::UserId.eq(user_id))
            .order_by_asc(goals::Column::CreatedAt);

        if let Some(status) = status {
            query = query.filter(goals::Column::Status.eq(status.as_str()));
        }

        let models = query.all(&self.database).await?;
        models.into_iter().map(Goal::try_from).collect()
    }

    /// Update goal metadata and lifecycle status.
    ///
    /// The active-goal cap is deliberately not re-checked when a goal is
    /// reactivated here.
    pub async fn update_goal(&self, cmd: UpdateGoalCmd) -> ResultEngine<Goal> {
        let model = self.find_goal(&self.database, cmd.goal_id, &cmd.user_id).await?;
        let mut goal = Goal::try_from(model.clone())?;

        if let Some(title) = cmd.title.as_deref() {
            goal.title = validate_title(title)?;
        }
        if let Some(description) = cmd.description.as_deref() {
            goal.description = normalize_optional_text(Some(description));
        }
        if let Some(deadline) = cmd.deadline {
            validate_deadline(goal.started_at, Some(deadline))?;
            goal.deadline = Some(deadline);
        }
        if let Some(priority) = cmd.priority {
            goal.priority = priority;
        }
        if let Some(status) = cmd.status {
            goal.status = status;
        }
        if let Some(reminder) = cmd.reminder {
            goal.reminder = reminder;
        }

        let mut active_model = goals::ActiveModel::from(&goal);
        active_model.id = ActiveValue::Unchanged(model.id);
        active_model.update(&self.database).await?;

        Ok(goal)
    }

    /// Manually contribute funds to an active goal.
    ///
    /// Unlike the allocator, this path rejects overshoot outright (the error
    /// reports the largest acceptable amount), transitions the goal to
    /// completed when it reaches its target, and records the contribution as
    /// an expense transaction tagged [`GOAL_CONTRIBUTION_SUBCATEGORY`].
    pub async fn contribute(&self, cmd: ContributeCmd) -> ResultEngine<(Goal, Transaction)> {
        validate_amount(cmd.amount_minor)?;

        with_tx!(self, |db_tx| {
            let model = self.find_goal(&db_tx, cmd.goal_id, &cmd.user_id).await?;
            let mut goal = Goal::try_from(model)?;

            if goal.status != GoalStatus::Active {
                return Err(EngineError::KeyNotFound("goal not exists".to_string()));
            }

            let capacity = goal.remaining_capacity_minor();
            if cmd.amount_minor > capacity {
                return Err(EngineError::CapacityExceeded {
                    goal: goal.title,
                    max_minor: capacity.max(0),
                });
            }

            goal.current_amount_minor += cmd.amount_minor;
            if goal.current_amount_minor >= goal.target_amount_minor {
                goal.status = GoalStatus::Completed;
            }

            let goal_update = goals::ActiveModel {
                id: ActiveValue::Unchanged(goal.id.to_string()),
                current_amount_minor: ActiveValue::Set(goal.current_amount_minor),
                status: ActiveValue::Set(goal.status.as_str().to_string()),
                ..Default::default()
            };
            goal_update.update(&db_tx).await?;

            let tx = Transaction {
                id: Uuid::new_v4(),
                user_id: cmd.user_id.clone(),
                kind: TransactionKind::Expense,
                description: format!("Aporte a meta: {}", goal.title),
                amount_minor: cmd.amount_minor,
                occurred_at: Utc::now(),
                category: Category::Otros,
                subcategory: Some(GOAL_CONTRIBUTION_SUBCATEGORY.to_string()),
                payment_method: PaymentMethod::Transfer,
                note: None,
                active: true,
                created_at: Utc::now(),
            };
            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;

            Ok((goal, tx))
        })
    }

    /// Distribute a share of a new income across the user's active goals.
    ///
    /// The pool (10% of the income by default) is split over the goals in
    /// funding order: priority descending, soonest deadline first, undated
    /// goals last. Each contribution is clamped to the goal's remaining
    /// capacity and applied as a single conditional increment, so a
    /// concurrent allocation cannot push a goal past its target. No
    /// transaction record is written, and a goal reaching its target here is
    /// left active (only the manual path completes goals).
    ///
    /// Not atomic across goals: a mid-loop failure leaves earlier goals
    /// funded and later ones untouched. Callers treat the whole operation as
    /// best-effort.
    pub async fn allocate_income(&self, user_id: &str, income_minor: i64) -> ResultEngine<()> {
        let pool = allocation_pool(income_minor, self.allocation_rate_bps);
        if pool <= 0 {
            return Ok(());
        }

        let models = goals::Entity::find()
            .filter(goals::Column::UserId.eq(user_id))
            .filter(goals::Column::Status.eq(GoalStatus::Active.as_str()))
            .all(&self.database)
            .await?;
        let mut active_goals: Vec<Goal> = models
            .into_iter()
            .map(Goal::try_from)
            .collect::<ResultEngine<_>>()?;
        allocation_order(&mut active_goals);

        for (goal_id, share) in plan_allocation(pool, &active_goals) {
            let funded = self.try_fund_goal(goal_id, share).await?;
            if !funded {
                // A concurrent writer filled or closed the goal between the
                // snapshot and the update; that share is forfeited.
                tracing::debug!(%goal_id, share, "skipping goal changed concurrently");
            }
        }

        Ok(())
    }

    /// Apply one clamped contribution with capacity check and increment in a
    /// single statement. Returns false when the guarded update matched no
    /// row (goal no longer active, or not enough capacity left).
    async fn try_fund_goal(&self, goal_id: Uuid, amount_minor: i64) -> ResultEngine<bool> {
        let backend = self.database.get_database_backend();
        let stmt = Statement::from_sql_and_values(
            backend,
            "UPDATE goals \
             SET current_amount_minor = current_amount_minor + ? \
             WHERE id = ? AND status = ? \
               AND current_amount_minor + ? <= target_amount_minor",
            vec![
                amount_minor.into(),
                goal_id.to_string().into(),
                GoalStatus::Active.as_str().into(),
                amount_minor.into(),
            ],
        );
        let result = self.database.execute(stmt).await?;
        Ok(result.rows_affected() == 1)
    }

    async fn find_goal<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        user_id: &str,
    ) -> ResultEngine<goals::Model> {
        goals::Entity::find_by_id(id.to_string())
            .filter(goals::Column::UserId.eq(user_id))
            .one(conn)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("goal not exists".to_string()))
    }
}
