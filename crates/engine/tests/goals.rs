use chrono::{Duration, Utc};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    ContributeCmd, Engine, EngineError, GOAL_CONTRIBUTION_SUBCATEGORY, GoalPriority, GoalStatus,
    NewGoalCmd, NewTransactionCmd, TransactionKind, TransactionListFilter, UpdateGoalCmd,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    insert_user(&db, "alice").await;
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn insert_user(db: &DatabaseConnection, username: &str) {
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (username, password) VALUES (?, ?)",
        vec![username.into(), "password".into()],
    ))
    .await
    .unwrap();
}

fn goal(title: &str, target_minor: i64) -> NewGoalCmd {
    NewGoalCmd::new("alice", title, target_minor, Utc::now())
}

async fn income(engine: &Engine, amount_minor: i64) {
    engine
        .create_transaction(NewTransactionCmd::new(
            "alice",
            TransactionKind::Income,
            "Salario mensual",
            amount_minor,
            Utc::now(),
        ))
        .await
        .unwrap();
}

#[tokio::test]
async fn new_goal_starts_active_and_empty() {
    let (engine, _db) = engine_with_db().await;

    let created = engine.new_goal(goal("Vacaciones", 100_000)).await.unwrap();

    assert_eq!(created.status, GoalStatus::Active);
    assert_eq!(created.current_amount_minor, 0);

    let fetched = engine.goal(created.id, "alice").await.unwrap();
    assert_eq!(fetched.title, "Vacaciones");
}

#[tokio::test]
async fn goal_validation() {
    let (engine, _db) = engine_with_db().await;

    let blank = engine.new_goal(goal("   ", 100)).await;
    assert!(matches!(blank, Err(EngineError::InvalidField(_))));

    let target = engine.new_goal(goal("Vacaciones", 0)).await;
    assert!(matches!(target, Err(EngineError::InvalidAmount(_))));

    let started = Utc::now();
    let backwards = engine
        .new_goal(
            NewGoalCmd::new("alice", "Vacaciones", 100, started)
                .deadline(started - Duration::days(1)),
        )
        .await;
    assert!(matches!(backwards, Err(EngineError::InvalidField(_))));
}

#[tokio::test]
async fn eleventh_active_goal_is_rejected() {
    let (engine, _db) = engine_with_db().await;

    let mut last = None;
    for i in 0..10 {
        let created = engine
            .new_goal(goal(&format!("Meta {i}"), 10_000))
            .await
            .unwrap();
        last = Some(created.id);
    }

    let over = engine.new_goal(goal("Meta 10", 10_000)).await;
    assert_eq!(over, Err(EngineError::GoalLimitReached(10)));

    // Pausing one frees a slot.
    let paused_id = last.unwrap();
    engine
        .update_goal(UpdateGoalCmd::new(paused_id, "alice").status(GoalStatus::Paused))
        .await
        .unwrap();
    assert!(engine.new_goal(goal("Meta 10", 10_000)).await.is_ok());
}

#[tokio::test]
async fn income_allocates_ten_percent_by_default() {
    let (engine, _db) = engine_with_db().await;
    let created = engine.new_goal(goal("Vacaciones", 100_000)).await.unwrap();

    income(&engine, 50_000).await;

    let funded = engine.goal(created.id, "alice").await.unwrap();
    assert_eq!(funded.current_amount_minor, 5_000);
}

#[tokio::test]
async fn allocation_rate_is_configurable() {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    insert_user(&db, "alice").await;
    let engine = Engine::builder()
        .database(db.clone())
        .allocation_rate_bps(2_500)
        .build()
        .await
        .unwrap();

    let created = engine.new_goal(goal("Vacaciones", 100_000)).await.unwrap();
    income(&engine, 10_000).await;

    let funded = engine.goal(created.id, "alice").await.unwrap();
    assert_eq!(funded.current_amount_minor, 2_500);
}

#[tokio::test]
async fn allocation_clamps_and_spills_to_next_goal() {
    let (engine, _db) = engine_with_db().await;

    // Nearly reachable high priority goal, roomy medium priority one.
    let urgent = engine
        .new_goal(
            goal("Portátil", 200)
                .priority(GoalPriority::High)
                .deadline(Utc::now() + Duration::days(7)),
        )
        .await
        .unwrap();
    let roomy = engine.new_goal(goal("Vacaciones", 50_000)).await.unwrap();

    income(&engine, 10_000).await;

    let urgent = engine.goal(urgent.id, "alice").await.unwrap();
    assert_eq!(urgent.current_amount_minor, 200);
    // The allocator never completes goals, even at target.
    assert_eq!(urgent.status, GoalStatus::Active);

    let roomy = engine.goal(roomy.id, "alice").await.unwrap();
    assert_eq!(roomy.current_amount_minor, 800);
}

#[tokio::test]
async fn allocation_prefers_soonest_deadline_within_priority() {
    let (engine, _db) = engine_with_db().await;

    let later = engine
        .new_goal(goal("Meta lejana", 1_000).deadline(Utc::now() + Duration::days(90)))
        .await
        .unwrap();
    let soon = engine
        .new_goal(goal("Meta cercana", 1_000).deadline(Utc::now() + Duration::days(7)))
        .await
        .unwrap();
    let undated = engine.new_goal(goal("Meta sin fecha", 1_000)).await.unwrap();

    // Pool of 1000 covers exactly the soonest goal.
    income(&engine, 10_000).await;

    assert_eq!(
        engine.goal(soon.id, "alice").await.unwrap().current_amount_minor,
        1_000
    );
    assert_eq!(
        engine.goal(later.id, "alice").await.unwrap().current_amount_minor,
        0
    );
    assert_eq!(
        engine
            .goal(undated.id, "alice")
            .await
            .unwrap()
            .current_amount_minor,
        0
    );
}

#[tokio::test]
async fn extreme_income_funds_goals_without_failing() {
    let (engine, _db) = engine_with_db().await;
    let created = engine.new_goal(goal("Vacaciones", 100_000)).await.unwrap();

    // An income near the representable maximum must not blow up the pool
    // arithmetic; the goal is simply filled to capacity.
    income(&engine, i64::MAX).await;

    let funded = engine.goal(created.id, "alice").await.unwrap();
    assert_eq!(funded.current_amount_minor, 100_000);
}

#[tokio::test]
async fn allocation_failure_does_not_fail_transaction_creation() {
    let (engine, db) = engine_with_db().await;
    let created = engine.new_goal(goal("Vacaciones", 100_000)).await.unwrap();

    // Corrupt the stored priority so the allocator's goal fetch errors out.
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "UPDATE goals SET priority = ? WHERE id = ?",
        vec!["urgente".into(), created.id.to_string().into()],
    ))
    .await
    .unwrap();

    let recorded = engine
        .create_transaction(NewTransactionCmd::new(
            "alice",
            TransactionKind::Income,
            "Salario mensual",
            50_000,
            Utc::now(),
        ))
        .await
        .unwrap();
    assert_eq!(recorded.amount_minor, 50_000);

    // The income was persisted even though no allocation happened.
    let listed = engine
        .list_transactions("alice", &TransactionListFilter::default())
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn paused_goals_receive_no_allocation() {
    let (engine, _db) = engine_with_db().await;

    let created = engine.new_goal(goal("Vacaciones", 100_000)).await.unwrap();
    engine
        .update_goal(UpdateGoalCmd::new(created.id, "alice").status(GoalStatus::Paused))
        .await
        .unwrap();

    income(&engine, 50_000).await;

    let after = engine.goal(created.id, "alice").await.unwrap();
    assert_eq!(after.current_amount_minor, 0);
}

#[tokio::test]
async fn contribution_overshoot_reports_remaining_capacity() {
    let (engine, _db) = engine_with_db().await;
    let created = engine.new_goal(goal("Vacaciones", 100)).await.unwrap();

    engine
        .contribute(ContributeCmd::new(created.id, "alice", 90))
        .await
        .unwrap();

    let over = engine
        .contribute(ContributeCmd::new(created.id, "alice", 20))
        .await;
    assert_eq!(
        over,
        Err(EngineError::CapacityExceeded {
            goal: "Vacaciones".to_string(),
            max_minor: 10,
        })
    );
}

#[tokio::test]
async fn exact_fill_completes_goal_and_records_expense() {
    let (engine, _db) = engine_with_db().await;
    let created = engine.new_goal(goal("Vacaciones", 100)).await.unwrap();

    let (filled, tx) = engine
        .contribute(ContributeCmd::new(created.id, "alice", 100))
        .await
        .unwrap();

    assert_eq!(filled.status, GoalStatus::Completed);
    assert_eq!(filled.current_amount_minor, 100);

    assert_eq!(tx.kind, TransactionKind::Expense);
    assert_eq!(tx.amount_minor, 100);
    assert_eq!(
        tx.subcategory.as_deref(),
        Some(GOAL_CONTRIBUTION_SUBCATEGORY)
    );

    // Exactly one expense record, visible in listings and statistics.
    let listed = engine
        .list_transactions("alice", &TransactionListFilter::default())
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);

    let stats = engine.statistics("alice").await.unwrap();
    assert_eq!(stats.total_expenses_minor, 100);
}

#[tokio::test]
async fn contribution_requires_active_goal() {
    let (engine, _db) = engine_with_db().await;
    let created = engine.new_goal(goal("Vacaciones", 100)).await.unwrap();

    engine
        .update_goal(UpdateGoalCmd::new(created.id, "alice").status(GoalStatus::Paused))
        .await
        .unwrap();

    let res = engine
        .contribute(ContributeCmd::new(created.id, "alice", 10))
        .await;
    assert!(matches!(res, Err(EngineError::KeyNotFound(_))));
}

#[tokio::test]
async fn contributions_are_owner_scoped() {
    let (engine, db) = engine_with_db().await;
    insert_user(&db, "bob").await;

    let created = engine.new_goal(goal("Vacaciones", 100)).await.unwrap();

    let res = engine
        .contribute(ContributeCmd::new(created.id, "bob", 10))
        .await;
    assert!(matches!(res, Err(EngineError::KeyNotFound(_))));
}

#[tokio::test]
async fn list_goals_filters_by_status() {
    let (engine, _db) = engine_with_db().await;

    let a = engine.new_goal(goal("Meta A", 1_000)).await.unwrap();
    engine.new_goal(goal("Meta B", 1_000)).await.unwrap();
    engine
        .update_goal(UpdateGoalCmd::new(a.id, "alice").status(GoalStatus::Cancelled))
        .await
        .unwrap();

    let active = engine
        .list_goals("alice", Some(GoalStatus::Active))
        .await
        .unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].title, "Meta B");

    let all = engine.list_goals("alice", None).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn income_with_no_goals_allocates_nothing() {
    let (engine, _db) = engine_with_db().await;

    income(&engine, 50_000).await;

    let stats = engine.statistics("alice").await.unwrap();
    assert_eq!(stats.total_income_minor, 50_000);
    assert_eq!(stats.total_expenses_minor, 0);
}
