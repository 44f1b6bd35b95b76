use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use energycoop_core::content::articles::{
    Article, ArticleFilter, ArticleRepositoryTrait, NewArticleRecord,
};
use energycoop_core::errors::{Error, Result};
use energycoop_core::pagination::{PageRequest, Paginated};

use super::model::ArticleDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::articles;
use crate::utils::like_pattern;

pub struct ArticleRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ArticleRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl ArticleRepositoryTrait for ArticleRepository {
    fn get_by_id(&self, article_id: &str) -> Result<Article> {
        let mut conn = get_connection(&self.pool)?;
        articles::table
            .find(article_id)
            .select(ArticleDB::as_select())
            .first::<ArticleDB>(&mut conn)
            .optional()
            .into_core()?
            .map(Article::from)
            .ok_or_else(|| Error::not_found("Article", article_id))
    }

    fn find_by_slug(&self, slug: &str) -> Result<Option<Article>> {
        let mut conn = get_connection(&self.pool)?;
        let row = articles::table
            .filter(articles::slug.eq(slug))
            .select(ArticleDB::as_select())
            .first::<ArticleDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.map(Article::from))
    }

    fn list(&self, filter: &ArticleFilter, page: PageRequest) -> Result<Paginated<Article>> {
        let mut conn = get_connection(&self.pool)?;

        let create_base_query = || {
            let mut query = articles::table.into_boxed();
            if let Some(status) = filter.status {
                query = query.filter(articles::status.eq(status.as_str()));
            }
            if let Some(ref category) = filter.category {
                query = query.filter(articles::category.eq(category.clone()));
            }
            if let Some(featured) = filter.featured {
                query = query.filter(articles::featured.eq(featured));
            }
            if let Some(ref term) = filter.search {
                let pattern = like_pattern(term);
                query = query.filter(
                    articles::title
                        .like(pattern.clone())
                        .or(articles::body.like(pattern)),
                );
            }
            query
        };

        let total = create_base_query()
            .count()
            .get_result::<i64>(&mut conn)
            .into_core()?;
        let rows = create_base_query()
            .select(ArticleDB::as_select())
            .order((
                articles::published_at.desc(),
                articles::created_at.desc(),
                articles::id.asc(),
            ))
            .limit(page.limit())
            .offset(page.offset())
            .load::<ArticleDB>(&mut conn)
            .into_core()?;

        Ok(Paginated::new(
            rows.into_iter().map(Article::from).collect(),
            total,
            page,
        ))
    }

    async fn create(&self, record: NewArticleRecord) -> Result<Article> {
        self.writer
            .exec(move |conn| {
                let row: ArticleDB = record.into();
                diesel::insert_into(articles::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(row.into())
            })
            .await
    }

    async fn update(&self, article: Article) -> Result<Article> {
        self.writer
            .exec(move |conn| {
                let mut row: ArticleDB = article.into();
                row.updated_at = chrono::Utc::now().naive_utc();
                let affected = diesel::update(articles::table.find(&row.id))
                    .set(&row)
                    .execute(conn)
                    .into_core()?;
                if affected == 0 {
                    return Err(Error::not_found("Article", &row.id));
                }
                Ok(row.into())
            })
            .await
    }

    async fn delete(&self, article_id: &str) -> Result<usize> {
        let article_id = article_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(articles::table.find(article_id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }
}
