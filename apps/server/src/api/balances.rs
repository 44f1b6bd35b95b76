use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use energycoop_core::balances::{
    AnalyticsPeriod, Balance, BalanceAnalytics, BalanceFilter, BalanceSummary,
    CashMovementRequest, NewBalanceRequest, YieldCreditRequest,
};
use energycoop_core::constants::per_page_caps;

use super::{ApiJson, ApiQuery};
use crate::{
    auth::AuthActor,
    error::ApiResult,
    main_lib::AppState,
    models::{PageQuery, PaginatedResponse},
};

/// Staff may look at another user's balances.
#[derive(Debug, Default, Deserialize)]
struct UserScope {
    user_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AnalyticsQuery {
    user_id: Option<String>,
    #[serde(default)]
    period: AnalyticsPeriod,
}

async fn list_entries(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    OriginalUri(uri): OriginalUri,
    ApiQuery(page): ApiQuery<PageQuery>,
    ApiQuery(filter): ApiQuery<BalanceFilter>,
) -> ApiResult<Json<PaginatedResponse<Balance>>> {
    let entries = state.balance_service.list_entries(
        &actor,
        filter,
        page.request(per_page_caps::BALANCES),
    )?;
    Ok(Json(PaginatedResponse::new(entries, &uri)))
}

async fn get_entry(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> ApiResult<Json<Balance>> {
    let entry = state.balance_service.get_entry(&actor, &id)?;
    Ok(Json(entry))
}

async fn create_entry(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<NewBalanceRequest>,
) -> ApiResult<(StatusCode, Json<Balance>)> {
    let entry = state.balance_service.create_entry(&actor, payload).await?;
    tracing::info!(
        "Ledger entry {} ({} {}) recorded for {} by {}",
        entry.id,
        entry.transaction_type,
        entry.amount,
        entry.user_id,
        actor.user_id
    );
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn summary(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiQuery(scope): ApiQuery<UserScope>,
) -> ApiResult<Json<BalanceSummary>> {
    let summary = state
        .balance_service
        .summary(&actor, scope.user_id.as_deref())?;
    Ok(Json(summary))
}

async fn analytics(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiQuery(query): ApiQuery<AnalyticsQuery>,
) -> ApiResult<Json<BalanceAnalytics>> {
    let analytics =
        state
            .balance_service
            .analytics(&actor, query.user_id.as_deref(), query.period)?;
    Ok(Json(analytics))
}

async fn deposit(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<CashMovementRequest>,
) -> ApiResult<(StatusCode, Json<Balance>)> {
    let entry = state.balance_service.record_deposit(&actor, payload).await?;
    tracing::info!("Deposit {} of {} by {}", entry.id, entry.amount, actor.user_id);
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn withdraw(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<CashMovementRequest>,
) -> ApiResult<(StatusCode, Json<Balance>)> {
    let entry = state
        .balance_service
        .record_withdrawal(&actor, payload)
        .await?;
    tracing::info!("Withdrawal {} of {} by {}", entry.id, entry.amount, actor.user_id);
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn credit_yield(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<YieldCreditRequest>,
) -> ApiResult<(StatusCode, Json<Balance>)> {
    let entry = state.balance_service.record_yield(&actor, payload).await?;
    tracing::info!("Yield {} of {} credited to {}", entry.id, entry.amount, entry.user_id);
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn complete_entry(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> ApiResult<Json<Balance>> {
    let entry = state.balance_service.complete_entry(&actor, &id).await?;
    Ok(Json(entry))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/balances", get(list_entries).post(create_entry))
        .route("/balances/summary", get(summary))
        .route("/balances/analytics", get(analytics))
        .route("/balances/deposit", post(deposit))
        .route("/balances/withdraw", post(withdraw))
        .route("/balances/yield", post(credit_yield))
        .route("/balances/{id}", get(get_entry))
        .route("/balances/{id}/complete", post(complete_entry))
}
