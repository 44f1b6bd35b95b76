use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use energycoop_core::content::faqs::{Faq, FaqFilter, FaqRepositoryTrait, NewFaq};
use energycoop_core::errors::{Error, Result};
use energycoop_core::pagination::{PageRequest, Paginated};

use super::model::FaqDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::faqs;
use crate::utils::like_pattern;

pub struct FaqRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl FaqRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl FaqRepositoryTrait for FaqRepository {
    fn get_by_id(&self, faq_id: &str) -> Result<Faq> {
        let mut conn = get_connection(&self.pool)?;
        faqs::table
            .find(faq_id)
            .select(FaqDB::as_select())
            .first::<FaqDB>(&mut conn)
            .optional()
            .into_core()?
            .map(Faq::from)
            .ok_or_else(|| Error::not_found("Faq", faq_id))
    }

    fn list(&self, filter: &FaqFilter, page: PageRequest) -> Result<Paginated<Faq>> {
        let mut conn = get_connection(&self.pool)?;

        let create_base_query = || {
            let mut query = faqs::table.into_boxed();
            if let Some(ref category) = filter.category {
                query = query.filter(faqs::category.eq(category.clone()));
            }
            if let Some(active) = filter.is_active {
                query = query.filter(faqs::is_active.eq(active));
            }
            if let Some(ref term) = filter.search {
                let pattern = like_pattern(term);
                query = query.filter(
                    faqs::question
                        .like(pattern.clone())
                        .or(faqs::answer.like(pattern)),
                );
            }
            query
        };

        let total = create_base_query()
            .count()
            .get_result::<i64>(&mut conn)
            .into_core()?;
        let rows = create_base_query()
            .select(FaqDB::as_select())
            .order((faqs::position.asc(), faqs::created_at.asc()))
            .limit(page.limit())
            .offset(page.offset())
            .load::<FaqDB>(&mut conn)
            .into_core()?;

        Ok(Paginated::new(
            rows.into_iter().map(Faq::from).collect(),
            total,
            page,
        ))
    }

    async fn create(&self, new_faq: NewFaq) -> Result<Faq> {
        self.writer
            .exec(move |conn| {
                let row: FaqDB = new_faq.into();
                diesel::insert_into(faqs::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(row.into())
            })
            .await
    }

    async fn update(&self, faq: Faq) -> Result<Faq> {
        self.writer
            .exec(move |conn| {
                let mut row: FaqDB = faq.into();
                row.updated_at = chrono::Utc::now().naive_utc();
                // Counters are owned by record_feedback; never overwrite them here.
                let affected = diesel::update(faqs::table.find(&row.id))
                    .set((
                        faqs::question.eq(&row.question),
                        faqs::answer.eq(&row.answer),
                        faqs::category.eq(&row.category),
                        faqs::position.eq(row.position),
                        faqs::is_active.eq(row.is_active),
                        faqs::updated_at.eq(row.updated_at),
                    ))
                    .execute(conn)
                    .into_core()?;
                if affected == 0 {
                    return Err(Error::not_found("Faq", &row.id));
                }
                faqs::table
                    .find(&row.id)
                    .select(FaqDB::as_select())
                    .first::<FaqDB>(conn)
                    .into_core()
                    .map(Faq::from)
            })
            .await
    }

    async fn delete(&self, faq_id: &str) -> Result<usize> {
        let faq_id = faq_id.to_string();
        self.writer
            .exec(move |conn| diesel::delete(faqs::table.find(faq_id)).execute(conn).into_core())
            .await
    }

    async fn record_feedback(&self, faq_id: &str, helpful: bool) -> Result<Faq> {
        let faq_id = faq_id.to_string();
        self.writer
            .exec(move |conn| {
                let target = faqs::table.find(&faq_id);
                let affected = if helpful {
                    diesel::update(target)
                        .set(faqs::helpful_yes.eq(faqs::helpful_yes + 1))
                        .execute(conn)
                } else {
                    diesel::update(target)
                        .set(faqs::helpful_no.eq(faqs::helpful_no + 1))
                        .execute(conn)
                }
                .into_core()?;
                if affected == 0 {
                    return Err(Error::not_found("Faq", &faq_id));
                }
                faqs::table
                    .find(&faq_id)
                    .select(FaqDB::as_select())
                    .first::<FaqDB>(conn)
                    .into_core()
                    .map(Faq::from)
            })
            .await
    }
}
