use super::*;
use crate::access::{Actor, Role};
use crate::errors::{Error, Result};
use crate::pagination::{PageRequest, Paginated};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex};

// ============================================================================
// Mock Implementations
// ============================================================================

#[derive(Default)]
struct MockArticleRepository {
    articles: Mutex<Vec<Article>>,
}

#[async_trait]
impl ArticleRepositoryTrait for MockArticleRepository {
    fn get_by_id(&self, article_id: &str) -> Result<Article> {
        self.articles
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == article_id)
            .cloned()
            .ok_or_else(|| Error::not_found("Article", article_id))
    }

    fn find_by_slug(&self, slug: &str) -> Result<Option<Article>> {
        Ok(self
            .articles
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.slug == slug)
            .cloned())
    }

    fn list(&self, filter: &ArticleFilter, page: PageRequest) -> Result<Paginated<Article>> {
        let items: Vec<Article> = self
            .articles
            .lock()
            .unwrap()
            .iter()
            .filter(|a| filter.status.map_or(true, |s| a.status == s))
            .cloned()
            .collect();
        Ok(Paginated::from_vec(items, page))
    }

    async fn create(&self, record: NewArticleRecord) -> Result<Article> {
        let now = Utc::now().naive_utc();
        let mut articles = self.articles.lock().unwrap();
        let slug = record.article.slug().to_string();
        let article = Article {
            id: format!("article-{}", articles.len() + 1),
            title: record.article.title,
            slug,
            excerpt: record.article.excerpt,
            body: record.article.body,
            category: record.article.category,
            author_id: record.author_id,
            status: record.article.status,
            featured: record.article.featured,
            published_at: record.published_at,
            created_at: now,
            updated_at: now,
        };
        articles.push(article.clone());
        Ok(article)
    }

    async fn update(&self, article: Article) -> Result<Article> {
        let mut articles = self.articles.lock().unwrap();
        if let Some(existing) = articles.iter_mut().find(|a| a.id == article.id) {
            *existing = article.clone();
        }
        Ok(article)
    }

    async fn delete(&self, article_id: &str) -> Result<usize> {
        let mut articles = self.articles.lock().unwrap();
        let before = articles.len();
        articles.retain(|a| a.id != article_id);
        Ok(before - articles.len())
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn admin() -> Actor {
    Actor::new("admin-1", Role::Admin, None)
}

fn draft(title: &str) -> NewArticle {
    NewArticle {
        title: title.to_string(),
        slug: None,
        excerpt: None,
        body: "Cooperative news".to_string(),
        category: Some("news".to_string()),
        status: ArticleStatus::Draft,
        featured: false,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_unpublished_article_is_not_found_for_anonymous_readers() {
    let service = ArticleService::new(Arc::new(MockArticleRepository::default()));
    let article = service
        .create_article(&admin(), draft("Wind farm opening"))
        .await
        .unwrap();
    assert_eq!(article.slug, "wind-farm-opening");
    assert!(article.published_at.is_none());

    assert!(matches!(
        service.get_article(None, &article.id),
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        service.get_article_by_slug(None, "wind-farm-opening"),
        Err(Error::NotFound(_))
    ));
    assert!(service.get_article(Some(&admin()), &article.id).is_ok());

    let published = service
        .update_article(
            &admin(),
            &article.id,
            ArticleUpdate {
                status: Some(ArticleStatus::Published),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(published.published_at.is_some());
    assert!(service.get_article_by_slug(None, "wind-farm-opening").is_ok());
}

#[tokio::test]
async fn test_readers_only_list_published() {
    let service = ArticleService::new(Arc::new(MockArticleRepository::default()));
    service.create_article(&admin(), draft("Draft")).await.unwrap();
    let mut live = draft("Live");
    live.status = ArticleStatus::Published;
    service.create_article(&admin(), live).await.unwrap();

    let filter = ArticleFilter {
        status: Some(ArticleStatus::Draft),
        ..Default::default()
    };
    let public = service
        .list_articles(None, filter.clone(), PageRequest::default())
        .unwrap();
    assert_eq!(public.total, 1);
    assert_eq!(public.items[0].title, "Live");

    let editor = service
        .list_articles(Some(&admin()), filter, PageRequest::default())
        .unwrap();
    assert_eq!(editor.items[0].title, "Draft");
}

#[tokio::test]
async fn test_duplicate_slug_is_rejected() {
    let service = ArticleService::new(Arc::new(MockArticleRepository::default()));
    service.create_article(&admin(), draft("Same title")).await.unwrap();
    let result = service.create_article(&admin(), draft("Same title")).await;
    assert!(matches!(result, Err(Error::Validation(_))));
}
