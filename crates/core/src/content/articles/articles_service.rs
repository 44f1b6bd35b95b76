use async_trait::async_trait;
use chrono::Utc;
use log::info;
use std::sync::Arc;

use super::articles_model::{
    Article, ArticleFilter, ArticleStatus, ArticleUpdate, NewArticle, NewArticleRecord,
};
use super::articles_traits::{ArticleRepositoryTrait, ArticleServiceTrait};
use crate::access::{is_editor, Actor, Role};
use crate::errors::{Error, Result};
use crate::pagination::{PageRequest, Paginated};
use crate::validation::FieldErrors;

pub struct ArticleService {
    repository: Arc<dyn ArticleRepositoryTrait>,
}

impl ArticleService {
    pub fn new(repository: Arc<dyn ArticleRepositoryTrait>) -> Self {
        Self { repository }
    }

    /// Drafts and archived articles do not exist for readers.
    fn visible(actor: Option<&Actor>, article: Article, key: &str) -> Result<Article> {
        if article.is_published() || is_editor(actor) {
            Ok(article)
        } else {
            Err(Error::not_found("Article", key))
        }
    }

    fn ensure_slug_free(&self, slug: &str, except_id: Option<&str>) -> Result<()> {
        match self.repository.find_by_slug(slug)? {
            Some(existing) if Some(existing.id.as_str()) != except_id => {
                let mut errors = FieldErrors::default();
                errors.add("slug", "The slug has already been taken.");
                Err(errors.into())
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl ArticleServiceTrait for ArticleService {
    fn get_article(&self, actor: Option<&Actor>, article_id: &str) -> Result<Article> {
        let article = self.repository.get_by_id(article_id)?;
        Self::visible(actor, article, article_id)
    }

    fn get_article_by_slug(&self, actor: Option<&Actor>, slug: &str) -> Result<Article> {
        let article = self
            .repository
            .find_by_slug(slug)?
            .ok_or_else(|| Error::not_found("Article", slug))?;
        Self::visible(actor, article, slug)
    }

    fn list_articles(
        &self,
        actor: Option<&Actor>,
        mut filter: ArticleFilter,
        page: PageRequest,
    ) -> Result<Paginated<Article>> {
        if !is_editor(actor) {
            filter.status = Some(ArticleStatus::Published);
        }
        self.repository.list(&filter, page)
    }

    async fn create_article(&self, actor: &Actor, new_article: NewArticle) -> Result<Article> {
        actor.require(Role::Admin)?;
        let new_article = new_article.normalized();
        new_article.validate()?;
        self.ensure_slug_free(new_article.slug(), None)?;
        let published_at = (new_article.status == ArticleStatus::Published)
            .then(|| Utc::now().naive_utc());
        let created = self
            .repository
            .create(NewArticleRecord {
                article: new_article,
                author_id: Some(actor.user_id.clone()),
                published_at,
            })
            .await?;
        info!("Created article {} ({})", created.id, created.status);
        Ok(created)
    }

    async fn update_article(
        &self,
        actor: &Actor,
        article_id: &str,
        update: ArticleUpdate,
    ) -> Result<Article> {
        actor.require(Role::Admin)?;
        let mut article = self.repository.get_by_id(article_id)?;
        if let Some(slug) = &update.slug {
            self.ensure_slug_free(slug, Some(article_id))?;
        }
        article.apply(update, Utc::now().naive_utc());
        article.validate()?;
        self.repository.update(article).await
    }

    async fn delete_article(&self, actor: &Actor, article_id: &str) -> Result<()> {
        actor.require(Role::Admin)?;
        self.repository.get_by_id(article_id)?;
        self.repository.delete(article_id).await?;
        Ok(())
    }
}
