use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use energycoop_core::content::social_links::{
    NewSocialLink, SocialLink, SocialLinkFilter, SocialLinkRepositoryTrait,
};
use energycoop_core::errors::{Error, Result};
use energycoop_core::pagination::{PageRequest, Paginated};

use super::model::SocialLinkDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::social_links;

pub struct SocialLinkRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SocialLinkRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl SocialLinkRepositoryTrait for SocialLinkRepository {
    fn get_by_id(&self, link_id: &str) -> Result<SocialLink> {
        let mut conn = get_connection(&self.pool)?;
        social_links::table
            .find(link_id)
            .select(SocialLinkDB::as_select())
            .first::<SocialLinkDB>(&mut conn)
            .optional()
            .into_core()?
            .map(SocialLink::from)
            .ok_or_else(|| Error::not_found("SocialLink", link_id))
    }

    fn list(&self, filter: &SocialLinkFilter, page: PageRequest) -> Result<Paginated<SocialLink>> {
        let mut conn = get_connection(&self.pool)?;

        let create_base_query = || {
            let mut query = social_links::table.into_boxed();
            if let Some(ref platform) = filter.platform {
                query = query.filter(social_links::platform.eq(platform.clone()));
            }
            if let Some(active) = filter.is_active {
                query = query.filter(social_links::is_active.eq(active));
            }
            query
        };

        let total = create_base_query()
            .count()
            .get_result::<i64>(&mut conn)
            .into_core()?;
        let rows = create_base_query()
            .select(SocialLinkDB::as_select())
            .order((social_links::position.asc(), social_links::platform.asc()))
            .limit(page.limit())
            .offset(page.offset())
            .load::<SocialLinkDB>(&mut conn)
            .into_core()?;

        Ok(Paginated::new(
            rows.into_iter().map(SocialLink::from).collect(),
            total,
            page,
        ))
    }

    async fn create(&self, new_link: NewSocialLink) -> Result<SocialLink> {
        self.writer
            .exec(move |conn| {
                let row: SocialLinkDB = new_link.into();
                diesel::insert_into(social_links::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(row.into())
            })
            .await
    }

    async fn update(&self, link: SocialLink) -> Result<SocialLink> {
        self.writer
            .exec(move |conn| {
                let mut row: SocialLinkDB = link.into();
                row.updated_at = chrono::Utc::now().naive_utc();
                let affected = diesel::update(social_links::table.find(&row.id))
                    .set(&row)
                    .execute(conn)
                    .into_core()?;
                if affected == 0 {
                    return Err(Error::not_found("SocialLink", &row.id));
                }
                Ok(row.into())
            })
            .await
    }

    async fn delete(&self, link_id: &str) -> Result<usize> {
        let link_id = link_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(social_links::table.find(link_id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }
}
