use async_trait::async_trait;

use super::articles_model::{
    Article, ArticleFilter, ArticleUpdate, NewArticle, NewArticleRecord,
};
use crate::access::Actor;
use crate::errors::Result;
use crate::pagination::{PageRequest, Paginated};

#[async_trait]
pub trait ArticleRepositoryTrait: Send + Sync {
    fn get_by_id(&self, article_id: &str) -> Result<Article>;
    fn find_by_slug(&self, slug: &str) -> Result<Option<Article>>;
    /// Featured first, then newest publication first.
    fn list(&self, filter: &ArticleFilter, page: PageRequest) -> Result<Paginated<Article>>;
    async fn create(&self, record: NewArticleRecord) -> Result<Article>;
    async fn update(&self, article: Article) -> Result<Article>;
    async fn delete(&self, article_id: &str) -> Result<usize>;
}

#[async_trait]
pub trait ArticleServiceTrait: Send + Sync {
    fn get_article(&self, actor: Option<&Actor>, article_id: &str) -> Result<Article>;
    fn get_article_by_slug(&self, actor: Option<&Actor>, slug: &str) -> Result<Article>;
    fn list_articles(
        &self,
        actor: Option<&Actor>,
        filter: ArticleFilter,
        page: PageRequest,
    ) -> Result<Paginated<Article>>;
    async fn create_article(&self, actor: &Actor, new_article: NewArticle) -> Result<Article>;
    async fn update_article(
        &self,
        actor: &Actor,
        article_id: &str,
        update: ArticleUpdate,
    ) -> Result<Article>;
    async fn delete_article(&self, actor: &Actor, article_id: &str) -> Result<()>;
}
