use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use energycoop_core::content::banners::{Banner, BannerFilter, BannerRepositoryTrait, NewBanner};
use energycoop_core::errors::{Error, Result};
use energycoop_core::pagination::{PageRequest, Paginated};

use super::model::BannerDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::banners;

pub struct BannerRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl BannerRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl BannerRepositoryTrait for BannerRepository {
    fn get_by_id(&self, banner_id: &str) -> Result<Banner> {
        let mut conn = get_connection(&self.pool)?;
        banners::table
            .find(banner_id)
            .select(BannerDB::as_select())
            .first::<BannerDB>(&mut conn)
            .optional()
            .into_core()?
            .map(Banner::from)
            .ok_or_else(|| Error::not_found("Banner", banner_id))
    }

    fn list(&self, filter: &BannerFilter, page: PageRequest) -> Result<Paginated<Banner>> {
        let mut conn = get_connection(&self.pool)?;

        let create_base_query = || {
            let mut query = banners::table.into_boxed();
            if let Some(ref placement) = filter.placement {
                query = query.filter(banners::placement.eq(placement.clone()));
            }
            if let Some(active) = filter.is_active {
                query = query.filter(banners::is_active.eq(active));
            }
            if let Some(now) = filter.visible_at {
                query = query
                    .filter(banners::is_active.eq(true))
                    .filter(banners::starts_at.is_null().or(banners::starts_at.le(now)))
                    .filter(banners::ends_at.is_null().or(banners::ends_at.ge(now)));
            }
            query
        };

        let total = create_base_query()
            .count()
            .get_result::<i64>(&mut conn)
            .into_core()?;
        let rows = create_base_query()
            .select(BannerDB::as_select())
            .order((banners::priority.desc(), banners::created_at.desc()))
            .limit(page.limit())
            .offset(page.offset())
            .load::<BannerDB>(&mut conn)
            .into_core()?;

        Ok(Paginated::new(
            rows.into_iter().map(Banner::from).collect(),
            total,
            page,
        ))
    }

    async fn create(&self, new_banner: NewBanner) -> Result<Banner> {
        self.writer
            .exec(move |conn| {
                let row: BannerDB = new_banner.into();
                diesel::insert_into(banners::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(row.into())
            })
            .await
    }

    async fn update(&self, banner: Banner) -> Result<Banner> {
        self.writer
            .exec(move |conn| {
                let mut row: BannerDB = banner.into();
                row.updated_at = chrono::Utc::now().naive_utc();
                let affected = diesel::update(banners::table.find(&row.id))
                    .set(&row)
                    .execute(conn)
                    .into_core()?;
                if affected == 0 {
                    return Err(Error::not_found("Banner", &row.id));
                }
                Ok(row.into())
            })
            .await
    }

    async fn delete(&self, banner_id: &str) -> Result<usize> {
        let banner_id = banner_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(banners::table.find(banner_id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }
}
