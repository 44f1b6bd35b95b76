//! Database model for organizations.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use energycoop_core::organizations::{NewOrganization, Organization, OrganizationUpdate};

use crate::utils::new_id;

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::organizations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OrganizationDB {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<OrganizationDB> for Organization {
    fn from(db: OrganizationDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            slug: db.slug,
            description: db.description,
            is_active: db.is_active,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewOrganization> for OrganizationDB {
    fn from(domain: NewOrganization) -> Self {
        let now = chrono::Utc::now().naive_utc();
        let domain = domain.normalized();
        Self {
            id: new_id(),
            slug: domain.slug().to_string(),
            name: domain.name,
            description: domain.description,
            is_active: domain.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update; `None` fields are left untouched.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::organizations)]
pub struct OrganizationChangeset {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub updated_at: NaiveDateTime,
}

impl From<OrganizationUpdate> for OrganizationChangeset {
    fn from(update: OrganizationUpdate) -> Self {
        Self {
            name: update.name,
            slug: update.slug,
            description: update.description,
            is_active: update.is_active,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}
