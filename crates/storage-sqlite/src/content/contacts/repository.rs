use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use energycoop_core::content::contacts::{
    Contact, ContactFilter, ContactRepositoryTrait, ContactStatus, NewContact,
};
use energycoop_core::errors::{Error, Result};
use energycoop_core::pagination::{PageRequest, Paginated};

use super::model::ContactDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::contacts;
use crate::utils::like_pattern;

pub struct ContactRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ContactRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl ContactRepositoryTrait for ContactRepository {
    fn get_by_id(&self, contact_id: &str) -> Result<Contact> {
        let mut conn = get_connection(&self.pool)?;
        contacts::table
            .find(contact_id)
            .select(ContactDB::as_select())
            .first::<ContactDB>(&mut conn)
            .optional()
            .into_core()?
            .map(Contact::from)
            .ok_or_else(|| Error::not_found("Contact", contact_id))
    }

    fn list(&self, filter: &ContactFilter, page: PageRequest) -> Result<Paginated<Contact>> {
        let mut conn = get_connection(&self.pool)?;

        let create_base_query = || {
            let mut query = contacts::table.into_boxed();
            if let Some(status) = filter.status {
                query = query.filter(contacts::status.eq(status.as_str()));
            }
            if let Some(ref term) = filter.search {
                let pattern = like_pattern(term);
                query = query.filter(
                    contacts::name
                        .like(pattern.clone())
                        .or(contacts::email.like(pattern.clone()))
                        .or(contacts::message.like(pattern)),
                );
            }
            query
        };

        let total = create_base_query()
            .count()
            .get_result::<i64>(&mut conn)
            .into_core()?;
        let rows = create_base_query()
            .select(ContactDB::as_select())
            .order((contacts::created_at.desc(), contacts::id.asc()))
            .limit(page.limit())
            .offset(page.offset())
            .load::<ContactDB>(&mut conn)
            .into_core()?;

        Ok(Paginated::new(
            rows.into_iter().map(Contact::from).collect(),
            total,
            page,
        ))
    }

    async fn create(&self, new_contact: NewContact) -> Result<Contact> {
        self.writer
            .exec(move |conn| {
                let row: ContactDB = new_contact.into();
                diesel::insert_into(contacts::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(row.into())
            })
            .await
    }

    async fn set_status(&self, contact_id: &str, status: ContactStatus) -> Result<Contact> {
        let contact_id = contact_id.to_string();
        self.writer
            .exec(move |conn| {
                let affected = diesel::update(contacts::table.find(&contact_id))
                    .set((
                        contacts::status.eq(status.as_str()),
                        contacts::updated_at.eq(chrono::Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .into_core()?;
                if affected == 0 {
                    return Err(Error::not_found("Contact", &contact_id));
                }
                contacts::table
                    .find(&contact_id)
                    .select(ContactDB::as_select())
                    .first::<ContactDB>(conn)
                    .into_core()
                    .map(Contact::from)
            })
            .await
    }

    async fn delete(&self, contact_id: &str) -> Result<usize> {
        let contact_id = contact_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(contacts::table.find(contact_id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }
}
