use chrono::NaiveDateTime;
use diesel::prelude::*;

use energycoop_core::content::collaborators::{Collaborator, CollaboratorType, NewCollaborator};

use crate::utils::{new_id, parse_enum};

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::collaborators)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct CollaboratorDB {
    pub id: String,
    pub name: String,
    pub logo_url: Option<String>,
    pub website: Option<String>,
    pub collaborator_type: String,
    pub position: i32,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<CollaboratorDB> for Collaborator {
    fn from(db: CollaboratorDB) -> Self {
        Self {
            collaborator_type: parse_enum(
                &db.collaborator_type,
                "collaborators.collaborator_type",
                CollaboratorType::Partner,
            ),
            id: db.id,
            name: db.name,
            logo_url: db.logo_url,
            website: db.website,
            position: db.position,
            is_active: db.is_active,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<Collaborator> for CollaboratorDB {
    fn from(c: Collaborator) -> Self {
        Self {
            collaborator_type: c.collaborator_type.as_str().to_string(),
            id: c.id,
            name: c.name,
            logo_url: c.logo_url,
            website: c.website,
            position: c.position,
            is_active: c.is_active,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

impl From<NewCollaborator> for CollaboratorDB {
    fn from(new: NewCollaborator) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: new_id(),
            name: new.name,
            logo_url: new.logo_url,
            website: new.website,
            collaborator_type: new.collaborator_type.as_str().to_string(),
            position: new.position,
            is_active: new.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}
