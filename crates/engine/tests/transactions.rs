use chrono::{Duration, Utc};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    Category, Engine, EngineError, NewTransactionCmd, TransactionKind, TransactionListFilter,
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

fn expense(description: &str, amount_minor: i64) -> NewTransactionCmd {
    NewTransactionCmd::new(
        "alice",
        TransactionKind::Expense,
        description,
        amount_minor,
        Utc::now(),
    )
}

#[tokio::test]
async fn create_assigns_category_from_description() {
    let (engine, _db) = engine_with_db().await;

    let tx = engine
        .create_transaction(expense("Cena en restaurante", 2_500))
        .await
        .unwrap();

    assert_eq!(tx.category, Category::Alimentacion);
}

#[tokio::test]
async fn explicit_category_wins_over_classifier() {
    let (engine, _db) = engine_with_db().await;

    let tx = engine
        .create_transaction(expense("Cena en restaurante", 2_500).category(Category::Entretenimiento))
        .await
        .unwrap();

    assert_eq!(tx.category, Category::Entretenimiento);
}

#[tokio::test]
async fn unknown_description_falls_back_to_otros() {
    let (engine, _db) = engine_with_db().await;

    let tx = engine
        .create_transaction(expense("Compra misteriosa", 1_000))
        .await
        .unwrap();

    assert_eq!(tx.category, Category::Otros);
}

#[tokio::test]
async fn create_rejects_invalid_fields() {
    let (engine, _db) = engine_with_db().await;

    let short = engine.create_transaction(expense("ab", 1_000)).await;
    assert!(matches!(short, Err(EngineError::InvalidField(_))));

    let zero = engine.create_transaction(expense("Cena", 0)).await;
    assert!(matches!(zero, Err(EngineError::InvalidAmount(_))));

    let negative = engine.create_transaction(expense("Cena", -5)).await;
    assert!(matches!(negative, Err(EngineError::InvalidAmount(_))));

    let future = engine
        .create_transaction(NewTransactionCmd::new(
            "alice",
            TransactionKind::Expense,
            "Cena",
            1_000,
            Utc::now() + Duration::hours(1),
        ))
        .await;
    assert!(matches!(future, Err(EngineError::InvalidField(_))));
}

#[tokio::test]
async fn soft_delete_hides_but_keeps_record() {
    let (engine, _db) = engine_with_db().await;

    let tx = engine
        .create_transaction(expense("Cena en restaurante", 2_500))
        .await
        .unwrap();

    engine.delete_transaction(tx.id, "alice").await.unwrap();

    let listed = engine
        .list_transactions("alice", &TransactionListFilter::default())
        .await
        .unwrap();
    assert!(listed.is_empty());

    // The record survives and can still be fetched directly.
    let fetched = engine.transaction(tx.id, "alice").await.unwrap();
    assert!(!fetched.active);

    // A second delete is NotFound; soft-deleted records are terminal.
    let again = engine.delete_transaction(tx.id, "alice").await;
    assert_eq!(
        again,
        Err(EngineError::KeyNotFound("transaction not exists".to_string()))
    );
}

#[tokio::test]
async fn foreign_transactions_are_invisible() {
    let (engine, db) = engine_with_db().await;
    insert_user(&db, "bob").await;

    let tx = engine
        .create_transaction(expense("Cena en restaurante", 2_500))
        .await
        .unwrap();

    let fetched = engine.transaction(tx.id, "bob").await;
    assert!(matches!(fetched, Err(EngineError::KeyNotFound(_))));

    let deleted = engine.delete_transaction(tx.id, "bob").await;
    assert!(matches!(deleted, Err(EngineError::KeyNotFound(_))));
}

#[tokio::test]
async fn list_filters_by_kind_and_category() {
    let (engine, _db) = engine_with_db().await;

    engine
        .create_transaction(expense("Cena en restaurante", 2_500))
        .await
        .unwrap();
    engine
        .create_transaction(expense("Uber al trabajo", 800))
        .await
        .unwrap();
    engine
        .create_transaction(NewTransactionCmd::new(
            "alice",
            TransactionKind::Income,
            "Salario mensual",
            100_000,
            Utc::now(),
        ))
        .await
        .unwrap();

    let incomes = engine
        .list_transactions(
            "alice",
            &TransactionListFilter {
                kind: Some(TransactionKind::Income),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(incomes.len(), 1);
    assert_eq!(incomes[0].amount_minor, 100_000);

    let transport = engine
        .list_transactions(
            "alice",
            &TransactionListFilter {
                category: Some(Category::Transporte),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(transport.len(), 1);
    assert_eq!(transport[0].description, "Uber al trabajo");
}

#[tokio::test]
async fn list_rejects_inverted_range() {
    let (engine, _db) = engine_with_db().await;

    let now = Utc::now();
    let res = engine
        .list_transactions(
            "alice",
            &TransactionListFilter {
                from: Some(now),
                to: Some(now - Duration::days(1)),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(res, Err(EngineError::InvalidField(_))));
}

#[tokio::test]
async fn statistics_sum_active_records_only() {
    let (engine, _db) = engine_with_db().await;

    engine
        .create_transaction(NewTransactionCmd::new(
            "alice",
            TransactionKind::Income,
            "Salario mensual",
            100_000,
            Utc::now(),
        ))
        .await
        .unwrap();
    engine
        .create_transaction(expense("Cena en restaurante", 2_500))
        .await
        .unwrap();
    let deleted = engine
        .create_transaction(expense("Uber al trabajo", 800))
        .await
        .unwrap();
    engine.delete_transaction(deleted.id, "alice").await.unwrap();

    let stats = engine.statistics("alice").await.unwrap();
    assert_eq!(stats.total_income_minor, 100_000);
    assert_eq!(stats.total_expenses_minor, 2_500);
}
