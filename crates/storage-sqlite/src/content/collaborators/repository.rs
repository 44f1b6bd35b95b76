use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use energycoop_core::content::collaborators::{
    Collaborator, CollaboratorFilter, CollaboratorRepositoryTrait, NewCollaborator,
};
use energycoop_core::errors::{Error, Result};
use energycoop_core::pagination::{PageRequest, Paginated};

use super::model::CollaboratorDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::collaborators;
use crate::utils::like_pattern;

pub struct CollaboratorRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl CollaboratorRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl CollaboratorRepositoryTrait for CollaboratorRepository {
    fn get_by_id(&self, collaborator_id: &str) -> Result<Collaborator> {
        let mut conn = get_connection(&self.pool)?;
        collaborators::table
            .find(collaborator_id)
            .select(CollaboratorDB::as_select())
            .first::<CollaboratorDB>(&mut conn)
            .optional()
            .into_core()?
            .map(Collaborator::from)
            .ok_or_else(|| Error::not_found("Collaborator", collaborator_id))
    }

    fn list(
        &self,
        filter: &CollaboratorFilter,
        page: PageRequest,
    ) -> Result<Paginated<Collaborator>> {
        let mut conn = get_connection(&self.pool)?;

        let create_base_query = || {
            let mut query = collaborators::table.into_boxed();
            if let Some(kind) = filter.collaborator_type {
                query = query.filter(collaborators::collaborator_type.eq(kind.as_str()));
            }
            if let Some(active) = filter.is_active {
                query = query.filter(collaborators::is_active.eq(active));
            }
            if let Some(ref term) = filter.search {
                query = query.filter(collaborators::name.like(like_pattern(term)));
            }
            query
        };

        let total = create_base_query()
            .count()
            .get_result::<i64>(&mut conn)
            .into_core()?;
        let rows = create_base_query()
            .select(CollaboratorDB::as_select())
            .order((collaborators::position.asc(), collaborators::name.asc()))
            .limit(page.limit())
            .offset(page.offset())
            .load::<CollaboratorDB>(&mut conn)
            .into_core()?;

        Ok(Paginated::new(
            rows.into_iter().map(Collaborator::from).collect(),
            total,
            page,
        ))
    }

    async fn create(&self, new_collaborator: NewCollaborator) -> Result<Collaborator> {
        self.writer
            .exec(move |conn| {
                let row: CollaboratorDB = new_collaborator.into();
                diesel::insert_into(collaborators::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(row.into())
            })
            .await
    }

    async fn update(&self, collaborator: Collaborator) -> Result<Collaborator> {
        self.writer
            .exec(move |conn| {
                let mut row: CollaboratorDB = collaborator.into();
                row.updated_at = chrono::Utc::now().naive_utc();
                let affected = diesel::update(collaborators::table.find(&row.id))
                    .set(&row)
                    .execute(conn)
                    .into_core()?;
                if affected == 0 {
                    return Err(Error::not_found("Collaborator", &row.id));
                }
                Ok(row.into())
            })
            .await
    }

    async fn delete(&self, collaborator_id: &str) -> Result<usize> {
        let collaborator_id = collaborator_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(collaborators::table.find(collaborator_id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }
}
