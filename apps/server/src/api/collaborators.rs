use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use energycoop_core::constants::per_page_caps;
use energycoop_core::content::collaborators::{
    Collaborator, CollaboratorFilter, CollaboratorUpdate, NewCollaborator,
};

use super::{ApiJson, ApiQuery};
use crate::{
    auth::{AuthActor, MaybeActor},
    error::ApiResult,
    main_lib::AppState,
    models::{PageQuery, PaginatedResponse},
};

async fn list_collaborators(
    State(state): State<Arc<AppState>>,
    MaybeActor(actor): MaybeActor,
    OriginalUri(uri): OriginalUri,
    ApiQuery(page): ApiQuery<PageQuery>,
    ApiQuery(filter): ApiQuery<CollaboratorFilter>,
) -> ApiResult<Json<PaginatedResponse<Collaborator>>> {
    let collaborators = state.collaborator_service.list_collaborators(
        actor.as_ref(),
        filter,
        page.request(per_page_caps::CONTENT),
    )?;
    Ok(Json(PaginatedResponse::new(collaborators, &uri)))
}

async fn get_collaborator(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    MaybeActor(actor): MaybeActor,
) -> ApiResult<Json<Collaborator>> {
    let collaborator = state
        .collaborator_service
        .get_collaborator(actor.as_ref(), &id)?;
    Ok(Json(collaborator))
}

async fn create_collaborator(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<NewCollaborator>,
) -> ApiResult<(StatusCode, Json<Collaborator>)> {
    let collaborator = state
        .collaborator_service
        .create_collaborator(&actor, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(collaborator)))
}

async fn update_collaborator(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<CollaboratorUpdate>,
) -> ApiResult<Json<Collaborator>> {
    let collaborator = state
        .collaborator_service
        .update_collaborator(&actor, &id, payload)
        .await?;
    Ok(Json(collaborator))
}

async fn delete_collaborator(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> ApiResult<StatusCode> {
    state
        .collaborator_service
        .delete_collaborator(&actor, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/collaborators",
            get(list_collaborators).post(create_collaborator),
        )
        .route(
            "/collaborators/{id}",
            get(get_collaborator)
                .put(update_collaborator)
                .delete(delete_collaborator),
        )
}
