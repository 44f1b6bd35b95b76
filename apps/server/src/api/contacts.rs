use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use energycoop_core::constants::per_page_caps;
use energycoop_core::content::contacts::{Contact, ContactFilter, ContactUpdate, NewContact};

use super::{ApiJson, ApiQuery};
use crate::{
    auth::AuthActor,
    error::ApiResult,
    main_lib::AppState,
    models::{PageQuery, PaginatedResponse},
};

async fn list_contacts(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    OriginalUri(uri): OriginalUri,
    ApiQuery(page): ApiQuery<PageQuery>,
    ApiQuery(filter): ApiQuery<ContactFilter>,
) -> ApiResult<Json<PaginatedResponse<Contact>>> {
    let contacts = state.contact_service.list_contacts(
        &actor,
        filter,
        page.request(per_page_caps::CONTACTS),
    )?;
    Ok(Json(PaginatedResponse::new(contacts, &uri)))
}

async fn get_contact(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> ApiResult<Json<Contact>> {
    let contact = state.contact_service.get_contact(&actor, &id)?;
    Ok(Json(contact))
}

/// Public contact form.
async fn submit_contact(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<NewContact>,
) -> ApiResult<(StatusCode, Json<Contact>)> {
    let contact = state.contact_service.submit_contact(payload).await?;
    tracing::info!("Contact request {} received", contact.id);
    Ok((StatusCode::CREATED, Json(contact)))
}

async fn update_contact(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<ContactUpdate>,
) -> ApiResult<Json<Contact>> {
    let contact = state
        .contact_service
        .update_contact(&actor, &id, payload)
        .await?;
    Ok(Json(contact))
}

async fn delete_contact(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> ApiResult<StatusCode> {
    state.contact_service.delete_contact(&actor, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/contacts", get(list_contacts).post(submit_contact))
        .route(
            "/contacts/{id}",
            get(get_contact).put(update_contact).delete(delete_contact),
        )
}
