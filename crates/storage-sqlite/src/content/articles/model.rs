//! Database model for articles.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use energycoop_core::content::articles::{Article, ArticleStatus, NewArticleRecord};

use crate::utils::{new_id, parse_enum};

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::articles)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct ArticleDB {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub body: String,
    pub category: Option<String>,
    pub author_id: Option<String>,
    pub status: String,
    pub featured: bool,
    pub published_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<ArticleDB> for Article {
    fn from(db: ArticleDB) -> Self {
        Self {
            status: parse_enum(&db.status, "articles.status", ArticleStatus::Draft),
            id: db.id,
            title: db.title,
            slug: db.slug,
            excerpt: db.excerpt,
            body: db.body,
            category: db.category,
            author_id: db.author_id,
            featured: db.featured,
            published_at: db.published_at,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<Article> for ArticleDB {
    fn from(a: Article) -> Self {
        Self {
            status: a.status.as_str().to_string(),
            id: a.id,
            title: a.title,
            slug: a.slug,
            excerpt: a.excerpt,
            body: a.body,
            category: a.category,
            author_id: a.author_id,
            featured: a.featured,
            published_at: a.published_at,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

impl From<NewArticleRecord> for ArticleDB {
    fn from(record: NewArticleRecord) -> Self {
        let now = chrono::Utc::now().naive_utc();
        let article = record.article.normalized();
        Self {
            id: new_id(),
            slug: article.slug().to_string(),
            title: article.title,
            excerpt: article.excerpt,
            body: article.body,
            category: article.category,
            author_id: record.author_id,
            status: article.status.as_str().to_string(),
            featured: article.featured,
            published_at: record.published_at,
            created_at: now,
            updated_at: now,
        }
    }
}
