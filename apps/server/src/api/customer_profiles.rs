use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use energycoop_core::constants::per_page_caps;
use energycoop_core::users::{
    CustomerProfile, CustomerProfileFilter, CustomerProfileUpdate, NewCustomerProfile,
    ProfileRank,
};

use super::{ApiJson, ApiQuery};
use crate::{
    auth::AuthActor,
    error::ApiResult,
    main_lib::AppState,
    models::{PageQuery, PaginatedResponse},
};

async fn list_profiles(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    OriginalUri(uri): OriginalUri,
    ApiQuery(page): ApiQuery<PageQuery>,
    ApiQuery(filter): ApiQuery<CustomerProfileFilter>,
) -> ApiResult<Json<PaginatedResponse<CustomerProfile>>> {
    let profiles = state.customer_profile_service.list_profiles(
        &actor,
        filter,
        page.request(per_page_caps::USERS),
    )?;
    Ok(Json(PaginatedResponse::new(profiles, &uri)))
}

async fn get_profile(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> ApiResult<Json<CustomerProfile>> {
    let profile = state.customer_profile_service.get_profile(&actor, &id)?;
    Ok(Json(profile))
}

async fn create_profile(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<NewCustomerProfile>,
) -> ApiResult<(StatusCode, Json<CustomerProfile>)> {
    let profile = state
        .customer_profile_service
        .create_profile(&actor, payload)
        .await?;
    tracing::info!(
        "Customer profile {} created for user {} in organization {}",
        profile.id,
        profile.user_id,
        profile.organization_id
    );
    Ok((StatusCode::CREATED, Json(profile)))
}

async fn update_profile(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<CustomerProfileUpdate>,
) -> ApiResult<Json<CustomerProfile>> {
    let profile = state
        .customer_profile_service
        .update_profile(&actor, &id, payload)
        .await?;
    Ok(Json(profile))
}

async fn delete_profile(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> ApiResult<StatusCode> {
    state
        .customer_profile_service
        .delete_profile(&actor, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn profile_rank(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> ApiResult<Json<ProfileRank>> {
    let rank = state.customer_profile_service.profile_rank(&actor, &id)?;
    Ok(Json(rank))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/customer-profiles",
            get(list_profiles).post(create_profile),
        )
        .route(
            "/customer-profiles/{id}",
            get(get_profile).put(update_profile).delete(delete_profile),
        )
        .route("/customer-profiles/{id}/rank", get(profile_rank))
}
