use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use energycoop_core::constants::per_page_caps;
use energycoop_core::geography::{
    Municipality, MunicipalityFilter, MunicipalityUpdate, NewMunicipality, NewProvince,
    NewRegion, Province, ProvinceFilter, ProvinceUpdate, Region, RegionFilter, RegionUpdate,
    WeatherObservation, WeatherReading,
};

use super::{ApiJson, ApiQuery};
use crate::{
    auth::AuthActor,
    error::ApiResult,
    main_lib::AppState,
    models::{PageQuery, PaginatedResponse},
};

// Regions

async fn list_regions(
    State(state): State<Arc<AppState>>,
    OriginalUri(uri): OriginalUri,
    ApiQuery(page): ApiQuery<PageQuery>,
    ApiQuery(filter): ApiQuery<RegionFilter>,
) -> ApiResult<Json<PaginatedResponse<Region>>> {
    let regions = state
        .geography_service
        .list_regions(filter, page.request(per_page_caps::GEOGRAPHY))?;
    Ok(Json(PaginatedResponse::new(regions, &uri)))
}

async fn get_region(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Region>> {
    Ok(Json(state.geography_service.get_region(&id)?))
}

async fn create_region(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<NewRegion>,
) -> ApiResult<(StatusCode, Json<Region>)> {
    let region = state.geography_service.create_region(&actor, payload).await?;
    Ok((StatusCode::CREATED, Json(region)))
}

async fn update_region(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<RegionUpdate>,
) -> ApiResult<Json<Region>> {
    let region = state
        .geography_service
        .update_region(&actor, &id, payload)
        .await?;
    Ok(Json(region))
}

async fn delete_region(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> ApiResult<StatusCode> {
    state.geography_service.delete_region(&actor, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Provinces

async fn list_provinces(
    State(state): State<Arc<AppState>>,
    OriginalUri(uri): OriginalUri,
    ApiQuery(page): ApiQuery<PageQuery>,
    ApiQuery(filter): ApiQuery<ProvinceFilter>,
) -> ApiResult<Json<PaginatedResponse<Province>>> {
    let provinces = state
        .geography_service
        .list_provinces(filter, page.request(per_page_caps::GEOGRAPHY))?;
    Ok(Json(PaginatedResponse::new(provinces, &uri)))
}

async fn get_province(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Province>> {
    Ok(Json(state.geography_service.get_province(&id)?))
}

async fn create_province(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<NewProvince>,
) -> ApiResult<(StatusCode, Json<Province>)> {
    let province = state
        .geography_service
        .create_province(&actor, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(province)))
}

async fn update_province(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<ProvinceUpdate>,
) -> ApiResult<Json<Province>> {
    let province = state
        .geography_service
        .update_province(&actor, &id, payload)
        .await?;
    Ok(Json(province))
}

async fn delete_province(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> ApiResult<StatusCode> {
    state.geography_service.delete_province(&actor, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Municipalities

async fn list_municipalities(
    State(state): State<Arc<AppState>>,
    OriginalUri(uri): OriginalUri,
    ApiQuery(page): ApiQuery<PageQuery>,
    ApiQuery(filter): ApiQuery<MunicipalityFilter>,
) -> ApiResult<Json<PaginatedResponse<Municipality>>> {
    let municipalities = state
        .geography_service
        .list_municipalities(filter, page.request(per_page_caps::GEOGRAPHY))?;
    Ok(Json(PaginatedResponse::new(municipalities, &uri)))
}

async fn get_municipality(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Municipality>> {
    Ok(Json(state.geography_service.get_municipality(&id)?))
}

async fn create_municipality(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<NewMunicipality>,
) -> ApiResult<(StatusCode, Json<Municipality>)> {
    let municipality = state
        .geography_service
        .create_municipality(&actor, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(municipality)))
}

async fn update_municipality(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<MunicipalityUpdate>,
) -> ApiResult<Json<Municipality>> {
    let municipality = state
        .geography_service
        .update_municipality(&actor, &id, payload)
        .await?;
    Ok(Json(municipality))
}

async fn delete_municipality(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> ApiResult<StatusCode> {
    state
        .geography_service
        .delete_municipality(&actor, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn latest_weather(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<WeatherObservation>> {
    Ok(Json(state.geography_service.latest_weather(&id)?))
}

async fn record_weather(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<WeatherReading>,
) -> ApiResult<Json<WeatherObservation>> {
    let observation = state
        .geography_service
        .record_weather(&actor, &id, payload)
        .await?;
    tracing::debug!("Weather for municipality {} updated", id);
    Ok(Json(observation))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/regions", get(list_regions).post(create_region))
        .route(
            "/regions/{id}",
            get(get_region).put(update_region).delete(delete_region),
        )
        .route("/provinces", get(list_provinces).post(create_province))
        .route(
            "/provinces/{id}",
            get(get_province)
                .put(update_province)
                .delete(delete_province),
        )
        .route(
            "/municipalities",
            get(list_municipalities).post(create_municipality),
        )
        .route(
            "/municipalities/{id}",
            get(get_municipality)
                .put(update_municipality)
                .delete(delete_municipality),
        )
        .route(
            "/municipalities/{id}/weather",
            get(latest_weather).put(record_weather),
        )
}
