use chrono::NaiveDateTime;
use diesel::prelude::*;

use energycoop_core::content::faqs::{Faq, NewFaq};

use crate::utils::new_id;

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::faqs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct FaqDB {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub category: Option<String>,
    pub position: i32,
    pub is_active: bool,
    pub helpful_yes: i64,
    pub helpful_no: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<FaqDB> for Faq {
    fn from(db: FaqDB) -> Self {
        Self {
            id: db.id,
            question: db.question,
            answer: db.answer,
            category: db.category,
            position: db.position,
            is_active: db.is_active,
            helpful_yes: db.helpful_yes,
            helpful_no: db.helpful_no,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<Faq> for FaqDB {
    fn from(f: Faq) -> Self {
        Self {
            id: f.id,
            question: f.question,
            answer: f.answer,
            category: f.category,
            position: f.position,
            is_active: f.is_active,
            helpful_yes: f.helpful_yes,
            helpful_no: f.helpful_no,
            created_at: f.created_at,
            updated_at: f.updated_at,
        }
    }
}

impl From<NewFaq> for FaqDB {
    fn from(new: NewFaq) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: new_id(),
            question: new.question,
            answer: new.answer,
            category: new.category,
            position: new.position,
            is_active: new.is_active,
            helpful_yes: 0,
            helpful_no: 0,
            created_at: now,
            updated_at: now,
        }
    }
}
