use chrono::NaiveDateTime;
use diesel::prelude::*;

use energycoop_core::content::banners::{Banner, NewBanner};

use crate::utils::new_id;

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::banners)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct BannerDB {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub link_url: Option<String>,
    pub placement: String,
    pub priority: i32,
    pub is_active: bool,
    pub starts_at: Option<NaiveDateTime>,
    pub ends_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<BannerDB> for Banner {
    fn from(db: BannerDB) -> Self {
        Self {
            id: db.id,
            title: db.title,
            image_url: db.image_url,
            link_url: db.link_url,
            placement: db.placement,
            priority: db.priority,
            is_active: db.is_active,
            starts_at: db.starts_at,
            ends_at: db.ends_at,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<Banner> for BannerDB {
    fn from(b: Banner) -> Self {
        Self {
            id: b.id,
            title: b.title,
            image_url: b.image_url,
            link_url: b.link_url,
            placement: b.placement,
            priority: b.priority,
            is_active: b.is_active,
            starts_at: b.starts_at,
            ends_at: b.ends_at,
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}

impl From<NewBanner> for BannerDB {
    fn from(new: NewBanner) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: new_id(),
            title: new.title,
            image_url: new.image_url,
            link_url: new.link_url,
            placement: new.placement,
            priority: new.priority,
            is_active: new.is_active,
            starts_at: new.starts_at,
            ends_at: new.ends_at,
            created_at: now,
            updated_at: now,
        }
    }
}
