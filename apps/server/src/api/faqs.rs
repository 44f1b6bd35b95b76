use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use energycoop_core::constants::per_page_caps;
use energycoop_core::content::faqs::{Faq, FaqFeedback, FaqFilter, FaqUpdate, NewFaq};

use super::{ApiJson, ApiQuery};
use crate::{
    auth::{AuthActor, MaybeActor},
    error::ApiResult,
    main_lib::AppState,
    models::{PageQuery, PaginatedResponse},
};

async fn list_faqs(
    State(state): State<Arc<AppState>>,
    MaybeActor(actor): MaybeActor,
    OriginalUri(uri): OriginalUri,
    ApiQuery(page): ApiQuery<PageQuery>,
    ApiQuery(filter): ApiQuery<FaqFilter>,
) -> ApiResult<Json<PaginatedResponse<Faq>>> {
    let faqs = state.faq_service.list_faqs(
        actor.as_ref(),
        filter,
        page.request(per_page_caps::CONTENT),
    )?;
    Ok(Json(PaginatedResponse::new(faqs, &uri)))
}

async fn get_faq(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    MaybeActor(actor): MaybeActor,
) -> ApiResult<Json<Faq>> {
    let faq = state.faq_service.get_faq(actor.as_ref(), &id)?;
    Ok(Json(faq))
}

async fn create_faq(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<NewFaq>,
) -> ApiResult<(StatusCode, Json<Faq>)> {
    let faq = state.faq_service.create_faq(&actor, payload).await?;
    Ok((StatusCode::CREATED, Json(faq)))
}

async fn update_faq(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<FaqUpdate>,
) -> ApiResult<Json<Faq>> {
    let faq = state.faq_service.update_faq(&actor, &id, payload).await?;
    Ok(Json(faq))
}

async fn delete_faq(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> ApiResult<StatusCode> {
    state.faq_service.delete_faq(&actor, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn record_feedback(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<FaqFeedback>,
) -> ApiResult<Json<Faq>> {
    let faq = state.faq_service.record_feedback(&id, payload).await?;
    Ok(Json(faq))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/faqs", get(list_faqs).post(create_faq))
        .route(
            "/faqs/{id}",
            get(get_faq).put(update_faq).delete(delete_faq),
        )
        .route("/faqs/{id}/feedback", post(record_feedback))
}
