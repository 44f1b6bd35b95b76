use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use energycoop_core::catalog::{
    NewProduct, NewProvider, Product, ProductFilter, ProductQuote, ProductUpdate, Provider,
    ProviderFilter, ProviderUpdate,
};
use energycoop_core::constants::per_page_caps;

use super::{ApiJson, ApiQuery};
use crate::{
    auth::{AuthActor, MaybeActor},
    error::ApiResult,
    main_lib::AppState,
    models::{PageQuery, PaginatedResponse},
};

#[derive(Debug, Deserialize)]
struct PricingQuery {
    quantity: Decimal,
}

// Providers

async fn list_providers(
    State(state): State<Arc<AppState>>,
    MaybeActor(actor): MaybeActor,
    OriginalUri(uri): OriginalUri,
    ApiQuery(page): ApiQuery<PageQuery>,
    ApiQuery(filter): ApiQuery<ProviderFilter>,
) -> ApiResult<Json<PaginatedResponse<Provider>>> {
    let providers = state.provider_service.list_providers(
        actor.as_ref(),
        filter,
        page.request(per_page_caps::CATALOG),
    )?;
    Ok(Json(PaginatedResponse::new(providers, &uri)))
}

async fn get_provider(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    MaybeActor(actor): MaybeActor,
) -> ApiResult<Json<Provider>> {
    let provider = state.provider_service.get_provider(actor.as_ref(), &id)?;
    Ok(Json(provider))
}

async fn create_provider(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<NewProvider>,
) -> ApiResult<(StatusCode, Json<Provider>)> {
    let provider = state.provider_service.create_provider(&actor, payload).await?;
    tracing::info!("Provider {} created by {}", provider.id, actor.user_id);
    Ok((StatusCode::CREATED, Json(provider)))
}

async fn update_provider(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<ProviderUpdate>,
) -> ApiResult<Json<Provider>> {
    let provider = state
        .provider_service
        .update_provider(&actor, &id, payload)
        .await?;
    Ok(Json(provider))
}

async fn delete_provider(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> ApiResult<StatusCode> {
    state.provider_service.delete_provider(&actor, &id).await?;
    tracing::info!("Provider {} deleted by {}", id, actor.user_id);
    Ok(StatusCode::NO_CONTENT)
}

// Products

async fn list_products(
    State(state): State<Arc<AppState>>,
    MaybeActor(actor): MaybeActor,
    OriginalUri(uri): OriginalUri,
    ApiQuery(page): ApiQuery<PageQuery>,
    ApiQuery(filter): ApiQuery<ProductFilter>,
) -> ApiResult<Json<PaginatedResponse<Product>>> {
    let products = state.product_service.list_products(
        actor.as_ref(),
        filter,
        page.request(per_page_caps::CATALOG),
    )?;
    Ok(Json(PaginatedResponse::new(products, &uri)))
}

async fn get_product(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    MaybeActor(actor): MaybeActor,
) -> ApiResult<Json<Product>> {
    let product = state.product_service.get_product(actor.as_ref(), &id)?;
    Ok(Json(product))
}

async fn product_pricing(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    MaybeActor(actor): MaybeActor,
    ApiQuery(query): ApiQuery<PricingQuery>,
) -> ApiResult<Json<ProductQuote>> {
    let quote = state
        .product_service
        .quote(actor.as_ref(), &id, query.quantity)?;
    Ok(Json(quote))
}

async fn create_product(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<NewProduct>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let product = state.product_service.create_product(&actor, payload).await?;
    tracing::info!(
        "Product {} created under provider {} by {}",
        product.id,
        product.provider_id,
        actor.user_id
    );
    Ok((StatusCode::CREATED, Json(product)))
}

async fn update_product(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<ProductUpdate>,
) -> ApiResult<Json<Product>> {
    let product = state
        .product_service
        .update_product(&actor, &id, payload)
        .await?;
    Ok(Json(product))
}

async fn delete_product(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> ApiResult<StatusCode> {
    state.product_service.delete_product(&actor, &id).await?;
    tracing::info!("Product {} deleted by {}", id, actor.user_id);
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/providers", get(list_providers).post(create_provider))
        .route(
            "/providers/{id}",
            get(get_provider)
                .put(update_provider)
                .delete(delete_provider),
        )
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/products/{id}/pricing", get(product_pricing))
}
