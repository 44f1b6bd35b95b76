use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{FromRequest, FromRequestParts},
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{auth, config::Config, error::ApiError, main_lib::AppState};

mod articles;
mod balances;
mod banners;
mod catalog;
mod collaborators;
mod contacts;
mod customer_profiles;
mod faqs;
mod gamification;
mod geography;
mod health;
mod menus;
mod organizations;
mod social_links;
mod user_assets;
mod users;

/// JSON body extractor whose rejections use the API error shape.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor whose rejections use the API error shape.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

pub fn app_router(state: Arc<AppState>, config: &Config) -> anyhow::Result<Router> {
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .map(|o| o.parse().with_context(|| format!("Invalid CORS origin '{o}'")))
            .collect::<anyhow::Result<Vec<HeaderValue>>>()?;
        CorsLayer::new().allow_origin(origins)
    };
    let cors = cors.allow_methods(Any).allow_headers(Any);

    let api = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .merge(organizations::router())
        .merge(users::router())
        .merge(customer_profiles::router())
        .merge(balances::router())
        .merge(catalog::router())
        .merge(user_assets::router())
        .merge(gamification::router())
        .merge(articles::router())
        .merge(faqs::router())
        .merge(banners::router())
        .merge(collaborators::router())
        .merge(menus::router())
        .merge(contacts::router())
        .merge(social_links::router())
        .merge(geography::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::resolve_actor,
        ))
        .merge(health::router());

    Ok(Router::new()
        .nest("/api/v1", api)
        .with_state(state)
        .layer(cors)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http()))
}
