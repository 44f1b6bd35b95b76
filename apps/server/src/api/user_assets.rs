use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use energycoop_core::balances::{Balance, InvestmentRequest};
use energycoop_core::constants::per_page_caps;
use energycoop_core::user_assets::{
    OpenPositionRequest, PortfolioSummary, UserAsset, UserAssetFilter, UserAssetUpdate,
    YieldResult,
};

use super::{ApiJson, ApiQuery};
use crate::{
    auth::AuthActor,
    error::ApiResult,
    main_lib::AppState,
    models::{PageQuery, PaginatedResponse},
};

#[derive(Debug, Default, Deserialize)]
struct UserScope {
    user_id: Option<String>,
}

/// A position together with the ledger entry that paid for it.
#[derive(Debug, Serialize)]
struct PositionResponse {
    user_asset: UserAsset,
    balance: Balance,
}

impl From<(UserAsset, Balance)> for PositionResponse {
    fn from((user_asset, balance): (UserAsset, Balance)) -> Self {
        Self {
            user_asset,
            balance,
        }
    }
}

async fn list_assets(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    OriginalUri(uri): OriginalUri,
    ApiQuery(page): ApiQuery<PageQuery>,
    ApiQuery(filter): ApiQuery<UserAssetFilter>,
) -> ApiResult<Json<PaginatedResponse<UserAsset>>> {
    let assets = state.user_asset_service.list_assets(
        &actor,
        filter,
        page.request(per_page_caps::USER_ASSETS),
    )?;
    Ok(Json(PaginatedResponse::new(assets, &uri)))
}

async fn get_asset(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> ApiResult<Json<UserAsset>> {
    let asset = state.user_asset_service.get_asset(&actor, &id)?;
    Ok(Json(asset))
}

async fn portfolio(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiQuery(scope): ApiQuery<UserScope>,
) -> ApiResult<Json<PortfolioSummary>> {
    let summary = state
        .user_asset_service
        .portfolio_summary(&actor, scope.user_id.as_deref())?;
    Ok(Json(summary))
}

async fn open_position(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<OpenPositionRequest>,
) -> ApiResult<(StatusCode, Json<PositionResponse>)> {
    let (asset, entry) = state
        .user_asset_service
        .open_position(&actor, payload)
        .await?;
    tracing::info!(
        "Position {} opened in product {} for {} ({})",
        asset.id,
        asset.product_id,
        asset.user_id,
        asset.total_investment
    );
    Ok((StatusCode::CREATED, Json((asset, entry).into())))
}

async fn invest(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<InvestmentRequest>,
) -> ApiResult<Json<PositionResponse>> {
    let position = state
        .user_asset_service
        .invest(&actor, &id, payload)
        .await?;
    tracing::info!("Additional investment {} in position {}", position.1.amount, id);
    Ok(Json(position.into()))
}

async fn process_yield(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> ApiResult<Json<YieldResult>> {
    let result = state.user_asset_service.process_yield(&actor, &id).await?;
    tracing::info!(
        "Yield {} processed for position {} (reinvested: {})",
        result.yield_amount,
        id,
        result.reinvested
    );
    Ok(Json(result))
}

async fn update_asset(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<UserAssetUpdate>,
) -> ApiResult<Json<UserAsset>> {
    let asset = state
        .user_asset_service
        .update_asset(&actor, &id, payload)
        .await?;
    Ok(Json(asset))
}

async fn delete_asset(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> ApiResult<StatusCode> {
    state.user_asset_service.delete_asset(&actor, &id).await?;
    tracing::info!("Position {} deleted by {}", id, actor.user_id);
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/user-assets", get(list_assets).post(open_position))
        .route("/user-assets/portfolio", get(portfolio))
        .route(
            "/user-assets/{id}",
            get(get_asset).put(update_asset).delete(delete_asset),
        )
        .route("/user-assets/{id}/invest", post(invest))
        .route("/user-assets/{id}/process-yield", post(process_yield))
}
