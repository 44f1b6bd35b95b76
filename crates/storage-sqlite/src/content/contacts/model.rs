use chrono::NaiveDateTime;
use diesel::prelude::*;

use energycoop_core::content::contacts::{Contact, ContactStatus, NewContact};

use crate::utils::{new_id, parse_enum};

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::contacts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ContactDB {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<ContactDB> for Contact {
    fn from(db: ContactDB) -> Self {
        Self {
            status: parse_enum(&db.status, "contacts.status", ContactStatus::New),
            id: db.id,
            name: db.name,
            email: db.email,
            phone: db.phone,
            subject: db.subject,
            message: db.message,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewContact> for ContactDB {
    fn from(new: NewContact) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: new_id(),
            name: new.name,
            email: new.email,
            phone: new.phone,
            subject: new.subject,
            message: new.message,
            status: ContactStatus::New.as_str().to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}
