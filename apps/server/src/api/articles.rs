use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use energycoop_core::constants::per_page_caps;
use energycoop_core::content::articles::{Article, ArticleFilter, ArticleUpdate, NewArticle};

use super::{ApiJson, ApiQuery};
use crate::{
    auth::{AuthActor, MaybeActor},
    error::ApiResult,
    main_lib::AppState,
    models::{PageQuery, PaginatedResponse},
};

async fn list_articles(
    State(state): State<Arc<AppState>>,
    MaybeActor(actor): MaybeActor,
    OriginalUri(uri): OriginalUri,
    ApiQuery(page): ApiQuery<PageQuery>,
    ApiQuery(filter): ApiQuery<ArticleFilter>,
) -> ApiResult<Json<PaginatedResponse<Article>>> {
    let articles = state.article_service.list_articles(
        actor.as_ref(),
        filter,
        page.request(per_page_caps::CONTENT),
    )?;
    Ok(Json(PaginatedResponse::new(articles, &uri)))
}

async fn get_article(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    MaybeActor(actor): MaybeActor,
) -> ApiResult<Json<Article>> {
    let article = state.article_service.get_article(actor.as_ref(), &id)?;
    Ok(Json(article))
}

async fn get_article_by_slug(
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
    MaybeActor(actor): MaybeActor,
) -> ApiResult<Json<Article>> {
    let article = state
        .article_service
        .get_article_by_slug(actor.as_ref(), &slug)?;
    Ok(Json(article))
}

async fn create_article(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<NewArticle>,
) -> ApiResult<(StatusCode, Json<Article>)> {
    let article = state.article_service.create_article(&actor, payload).await?;
    tracing::info!("Article {} ({}) created", article.id, article.slug);
    Ok((StatusCode::CREATED, Json(article)))
}

async fn update_article(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<ArticleUpdate>,
) -> ApiResult<Json<Article>> {
    let article = state
        .article_service
        .update_article(&actor, &id, payload)
        .await?;
    Ok(Json(article))
}

async fn delete_article(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> ApiResult<StatusCode> {
    state.article_service.delete_article(&actor, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/articles", get(list_articles).post(create_article))
        .route("/articles/slug/{slug}", get(get_article_by_slug))
        .route(
            "/articles/{id}",
            get(get_article).put(update_article).delete(delete_article),
        )
}
