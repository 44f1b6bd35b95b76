use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use energycoop_core::constants::per_page_caps;
use energycoop_core::content::banners::{Banner, BannerFilter, BannerUpdate, NewBanner};

use super::{ApiJson, ApiQuery};
use crate::{
    auth::{AuthActor, MaybeActor},
    error::ApiResult,
    main_lib::AppState,
    models::{PageQuery, PaginatedResponse},
};

async fn list_banners(
    State(state): State<Arc<AppState>>,
    MaybeActor(actor): MaybeActor,
    OriginalUri(uri): OriginalUri,
    ApiQuery(page): ApiQuery<PageQuery>,
    ApiQuery(filter): ApiQuery<BannerFilter>,
) -> ApiResult<Json<PaginatedResponse<Banner>>> {
    let banners = state.banner_service.list_banners(
        actor.as_ref(),
        filter,
        page.request(per_page_caps::CONTENT),
    )?;
    Ok(Json(PaginatedResponse::new(banners, &uri)))
}

async fn get_banner(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    MaybeActor(actor): MaybeActor,
) -> ApiResult<Json<Banner>> {
    let banner = state.banner_service.get_banner(actor.as_ref(), &id)?;
    Ok(Json(banner))
}

async fn create_banner(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<NewBanner>,
) -> ApiResult<(StatusCode, Json<Banner>)> {
    let banner = state.banner_service.create_banner(&actor, payload).await?;
    Ok((StatusCode::CREATED, Json(banner)))
}

async fn update_banner(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<BannerUpdate>,
) -> ApiResult<Json<Banner>> {
    let banner = state
        .banner_service
        .update_banner(&actor, &id, payload)
        .await?;
    Ok(Json(banner))
}

async fn delete_banner(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> ApiResult<StatusCode> {
    state.banner_service.delete_banner(&actor, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/banners", get(list_banners).post(create_banner))
        .route(
            "/banners/{id}",
            get(get_banner).put(update_banner).delete(delete_banner),
        )
}
