use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use energycoop_core::constants::per_page_caps;
use energycoop_core::content::menus::{
    MenuItem, MenuItemFilter, MenuItemUpdate, MenuNode, NewMenuItem,
};

use super::{ApiJson, ApiQuery};
use crate::{
    auth::{AuthActor, MaybeActor},
    error::ApiResult,
    main_lib::AppState,
    models::{PageQuery, PaginatedResponse},
};

async fn list_menu_items(
    State(state): State<Arc<AppState>>,
    MaybeActor(actor): MaybeActor,
    OriginalUri(uri): OriginalUri,
    ApiQuery(page): ApiQuery<PageQuery>,
    ApiQuery(filter): ApiQuery<MenuItemFilter>,
) -> ApiResult<Json<PaginatedResponse<MenuItem>>> {
    let items = state.menu_service.list_menu_items(
        actor.as_ref(),
        filter,
        page.request(per_page_caps::CONTENT),
    )?;
    Ok(Json(PaginatedResponse::new(items, &uri)))
}

async fn menu_tree(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<MenuNode>>> {
    let tree = state.menu_service.menu_tree()?;
    Ok(Json(tree))
}

async fn get_menu_item(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    MaybeActor(actor): MaybeActor,
) -> ApiResult<Json<MenuItem>> {
    let item = state.menu_service.get_menu_item(actor.as_ref(), &id)?;
    Ok(Json(item))
}

async fn create_menu_item(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<NewMenuItem>,
) -> ApiResult<(StatusCode, Json<MenuItem>)> {
    let item = state.menu_service.create_menu_item(&actor, payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn update_menu_item(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<MenuItemUpdate>,
) -> ApiResult<Json<MenuItem>> {
    let item = state
        .menu_service
        .update_menu_item(&actor, &id, payload)
        .await?;
    Ok(Json(item))
}

async fn delete_menu_item(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> ApiResult<StatusCode> {
    state.menu_service.delete_menu_item(&actor, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/menus", get(list_menu_items).post(create_menu_item))
        .route("/menus/tree", get(menu_tree))
        .route(
            "/menus/{id}",
            get(get_menu_item)
                .put(update_menu_item)
                .delete(delete_menu_item),
        )
}
