use chrono::NaiveDateTime;
use diesel::prelude::*;

use energycoop_core::content::social_links::{NewSocialLink, SocialLink};

use crate::utils::new_id;

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::social_links)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct SocialLinkDB {
    pub id: String,
    pub platform: String,
    pub url: String,
    pub icon: Option<String>,
    pub position: i32,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<SocialLinkDB> for SocialLink {
    fn from(db: SocialLinkDB) -> Self {
        Self {
            id: db.id,
            platform: db.platform,
            url: db.url,
            icon: db.icon,
            position: db.position,
            is_active: db.is_active,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<SocialLink> for SocialLinkDB {
    fn from(l: SocialLink) -> Self {
        Self {
            id: l.id,
            platform: l.platform,
            url: l.url,
            icon: l.icon,
            position: l.position,
            is_active: l.is_active,
            created_at: l.created_at,
            updated_at: l.updated_at,
        }
    }
}

impl From<NewSocialLink> for SocialLinkDB {
    fn from(new: NewSocialLink) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: new_id(),
            platform: new.platform,
            url: new.url,
            icon: new.icon,
            position: new.position,
            is_active: new.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}
