use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use energycoop_core::constants::per_page_caps;
use energycoop_core::organizations::{
    NewOrganization, Organization, OrganizationFilter, OrganizationUpdate,
};
use energycoop_core::ranking::Ranked;
use energycoop_core::users::ProfileStanding;

use super::{ApiJson, ApiQuery};
use crate::{
    auth::AuthActor,
    error::ApiResult,
    main_lib::AppState,
    models::{PageQuery, PaginatedResponse},
};

async fn list_organizations(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    OriginalUri(uri): OriginalUri,
    ApiQuery(page): ApiQuery<PageQuery>,
    ApiQuery(filter): ApiQuery<OrganizationFilter>,
) -> ApiResult<Json<PaginatedResponse<Organization>>> {
    let organizations = state.organization_service.list_organizations(
        &actor,
        filter,
        page.request(per_page_caps::ORGANIZATIONS),
    )?;
    Ok(Json(PaginatedResponse::new(organizations, &uri)))
}

async fn get_organization(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> ApiResult<Json<Organization>> {
    let organization = state.organization_service.get_organization(&actor, &id)?;
    Ok(Json(organization))
}

async fn create_organization(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<NewOrganization>,
) -> ApiResult<(StatusCode, Json<Organization>)> {
    let organization = state
        .organization_service
        .create_organization(&actor, payload)
        .await?;
    tracing::info!("Organization {} created by {}", organization.id, actor.user_id);
    Ok((StatusCode::CREATED, Json(organization)))
}

async fn update_organization(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<OrganizationUpdate>,
) -> ApiResult<Json<Organization>> {
    let organization = state
        .organization_service
        .update_organization(&actor, &id, payload)
        .await?;
    Ok(Json(organization))
}

async fn delete_organization(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> ApiResult<StatusCode> {
    state
        .organization_service
        .delete_organization(&actor, &id)
        .await?;
    tracing::info!("Organization {} deleted by {}", id, actor.user_id);
    Ok(StatusCode::NO_CONTENT)
}

async fn organization_leaderboard(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> ApiResult<Json<Vec<Ranked<ProfileStanding>>>> {
    let standings = state
        .customer_profile_service
        .organization_leaderboard(&actor, &id)?;
    Ok(Json(standings))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/organizations",
            get(list_organizations).post(create_organization),
        )
        .route(
            "/organizations/{id}",
            get(get_organization)
                .put(update_organization)
                .delete(delete_organization),
        )
        .route(
            "/organizations/{id}/leaderboard",
            get(organization_leaderboard),
        )
}
