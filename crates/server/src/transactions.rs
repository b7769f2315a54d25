//! Transactions API endpoints

use api_types::transaction::{
    PaymentMethod as ApiPaymentMethod, TransactionKind as ApiKind, TransactionList,
    TransactionListResponse, TransactionNew, TransactionView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};
use engine::{Category, NewTransactionCmd, Transaction, TransactionListFilter};

fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Income => ApiKind::Income,
        engine::TransactionKind::Expense => ApiKind::Expense,
    }
}

fn unmap_kind(kind: ApiKind) -> engine::TransactionKind {
    match kind {
        ApiKind::Income => engine::TransactionKind::Income,
        ApiKind::Expense => engine::TransactionKind::Expense,
    }
}

fn map_payment_method(method: engine::PaymentMethod) -> ApiPaymentMethod {
    match method {
        engine::PaymentMethod::Cash => ApiPaymentMethod::Cash,
        engine::PaymentMethod::CreditCard => ApiPaymentMethod::CreditCard,
        engine::PaymentMethod::DebitCard => ApiPaymentMethod::DebitCard,
        engine::PaymentMethod::Transfer => ApiPaymentMethod::Transfer,
        engine::PaymentMethod::Other => ApiPaymentMethod::Other,
    }
}

fn unmap_payment_method(method: ApiPaymentMethod) -> engine::PaymentMethod {
    match method {
        ApiPaymentMethod::Cash => engine::PaymentMethod::Cash,
        ApiPaymentMethod::CreditCard => engine::PaymentMethod::CreditCard,
        ApiPaymentMethod::DebitCard => engine::PaymentMethod::DebitCard,
        ApiPaymentMethod::Transfer => engine::PaymentMethod::Transfer,
        ApiPaymentMethod::Other => engine::PaymentMethod::Other,
    }
}

pub(crate) fn view(tx: Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        kind: map_kind(tx.kind),
        description: tx.description,
        amount_minor: tx.amount_minor,
        occurred_at: tx.occurred_at.fixed_offset(),
        category: tx.category.as_str().to_string(),
        subcategory: tx.subcategory,
        payment_method: map_payment_method(tx.payment_method),
        note: tx.note,
        active: tx.active,
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let category = payload
        .category
        .as_deref()
        .map(Category::try_from)
        .transpose()?;

    let mut cmd = NewTransactionCmd::new(
        &user.username,
        unmap_kind(payload.kind),
        &payload.description,
        payload.amount_minor,
        payload.occurred_at.with_timezone(&Utc),
    );
    if let Some(category) = category {
        cmd = cmd.category(category);
    }
    if let Some(subcategory) = payload.subcategory.as_deref() {
        cmd = cmd.subcategory(subcategory);
    }
    if let Some(method) = payload.payment_method {
        cmd = cmd.payment_method(unmap_payment_method(method));
    }
    if let Some(note) = payload.note.as_deref() {
        cmd = cmd.note(note);
    }

    let tx = state.engine.create_transaction(cmd).await?;

    Ok((StatusCode::CREATED, Json(view(tx))))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    payload: Option<Json<TransactionList>>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();

    let category = payload
        .category
        .as_deref()
        .map(Category::try_from)
        .transpose()?;

    let filter = TransactionListFilter {
        kind: payload.kind.map(unmap_kind),
        category,
        from: payload.from.map(|dt| dt.with_timezone(&Utc)),
        to: payload.to.map(|dt| dt.with_timezone(&Utc)),
        include_inactive: payload.include_inactive.unwrap_or(false),
        limit: payload.limit,
    };

    let txs = state.engine.list_transactions(&user.username, &filter).await?;
    let transactions = txs.into_iter().map(view).collect();

    Ok(Json(TransactionListResponse { transactions }))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state.engine.transaction(id, &user.username).await?;

    Ok(Json(view(tx)))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_transaction(id, &user.username).await?;

    Ok(StatusCode::NO_CONTENT)
}
