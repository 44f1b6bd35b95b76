use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use energycoop_core::constants::per_page_caps;
use energycoop_core::content::social_links::{
    NewSocialLink, SocialLink, SocialLinkFilter, SocialLinkUpdate,
};

use super::{ApiJson, ApiQuery};
use crate::{
    auth::{AuthActor, MaybeActor},
    error::ApiResult,
    main_lib::AppState,
    models::{PageQuery, PaginatedResponse},
};

async fn list_social_links(
    State(state): State<Arc<AppState>>,
    MaybeActor(actor): MaybeActor,
    OriginalUri(uri): OriginalUri,
    ApiQuery(page): ApiQuery<PageQuery>,
    ApiQuery(filter): ApiQuery<SocialLinkFilter>,
) -> ApiResult<Json<PaginatedResponse<SocialLink>>> {
    let links = state.social_link_service.list_social_links(
        actor.as_ref(),
        filter,
        page.request(per_page_caps::CONTENT),
    )?;
    Ok(Json(PaginatedResponse::new(links, &uri)))
}

async fn get_social_link(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    MaybeActor(actor): MaybeActor,
) -> ApiResult<Json<SocialLink>> {
    let link = state
        .social_link_service
        .get_social_link(actor.as_ref(), &id)?;
    Ok(Json(link))
}

async fn create_social_link(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<NewSocialLink>,
) -> ApiResult<(StatusCode, Json<SocialLink>)> {
    let link = state
        .social_link_service
        .create_social_link(&actor, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(link)))
}

async fn update_social_link(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<SocialLinkUpdate>,
) -> ApiResult<Json<SocialLink>> {
    let link = state
        .social_link_service
        .update_social_link(&actor, &id, payload)
        .await?;
    Ok(Json(link))
}

async fn delete_social_link(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> ApiResult<StatusCode> {
    state
        .social_link_service
        .delete_social_link(&actor, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/social-links",
            get(list_social_links).post(create_social_link),
        )
        .route(
            "/social-links/{id}",
            get(get_social_link)
                .put(update_social_link)
                .delete(delete_social_link),
        )
}
