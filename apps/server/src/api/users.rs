use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use energycoop_core::constants::per_page_caps;
use energycoop_core::gamification::UnlockedAchievement;
use energycoop_core::users::{NewUser, User, UserFilter, UserUpdate};

use super::{ApiJson, ApiQuery};
use crate::{
    auth::AuthActor,
    error::ApiResult,
    main_lib::AppState,
    models::{PageQuery, PaginatedResponse},
};

async fn list_users(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    OriginalUri(uri): OriginalUri,
    ApiQuery(page): ApiQuery<PageQuery>,
    ApiQuery(filter): ApiQuery<UserFilter>,
) -> ApiResult<Json<PaginatedResponse<User>>> {
    let users = state
        .user_service
        .list_users(&actor, filter, page.request(per_page_caps::USERS))?;
    Ok(Json(PaginatedResponse::new(users, &uri)))
}

async fn get_user(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> ApiResult<Json<User>> {
    let user = state.user_service.get_user(&actor, &id)?;
    Ok(Json(user))
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<NewUser>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = state.user_service.create_user(&actor, payload).await?;
    tracing::info!("User {} ({}) created by {}", user.id, user.role, actor.user_id);
    Ok((StatusCode::CREATED, Json(user)))
}

async fn update_user(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<UserUpdate>,
) -> ApiResult<Json<User>> {
    let user = state.user_service.update_user(&actor, &id, payload).await?;
    Ok(Json(user))
}

async fn delete_user(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> ApiResult<StatusCode> {
    state.user_service.delete_user(&actor, &id).await?;
    tracing::info!("User {} deleted by {}", id, actor.user_id);
    Ok(StatusCode::NO_CONTENT)
}

async fn user_achievements(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> ApiResult<Json<Vec<UnlockedAchievement>>> {
    let achievements = state.achievement_service.user_achievements(&actor, &id)?;
    Ok(Json(achievements))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/users/{id}/achievements", get(user_achievements))
}
