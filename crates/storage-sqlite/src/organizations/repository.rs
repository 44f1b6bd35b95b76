use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use energycoop_core::errors::{Error, Result};
use energycoop_core::organizations::{
    NewOrganization, Organization, OrganizationFilter, OrganizationRepositoryTrait,
    OrganizationUpdate,
};
use energycoop_core::pagination::{PageRequest, Paginated};

use super::model::{OrganizationChangeset, OrganizationDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::{customer_profiles, organizations};
use crate::utils::like_pattern;

pub struct OrganizationRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl OrganizationRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl OrganizationRepositoryTrait for OrganizationRepository {
    fn get_by_id(&self, organization_id: &str) -> Result<Organization> {
        let mut conn = get_connection(&self.pool)?;
        organizations::table
            .find(organization_id)
            .select(OrganizationDB::as_select())
            .first::<OrganizationDB>(&mut conn)
            .optional()
            .into_core()?
            .map(Organization::from)
            .ok_or_else(|| Error::not_found("Organization", organization_id))
    }

    fn find_by_slug(&self, slug: &str) -> Result<Option<Organization>> {
        let mut conn = get_connection(&self.pool)?;
        let row = organizations::table
            .filter(organizations::slug.eq(slug))
            .select(OrganizationDB::as_select())
            .first::<OrganizationDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.map(Organization::from))
    }

    fn list(
        &self,
        filter: &OrganizationFilter,
        page: PageRequest,
    ) -> Result<Paginated<Organization>> {
        let mut conn = get_connection(&self.pool)?;

        let create_base_query = || {
            let mut query = organizations::table.into_boxed();
            if let Some(active) = filter.is_active {
                query = query.filter(organizations::is_active.eq(active));
            }
            if let Some(ref ids) = filter.ids {
                query = query.filter(organizations::id.eq_any(ids.clone()));
            }
            if let Some(ref term) = filter.search {
                let pattern = like_pattern(term);
                query = query.filter(
                    organizations::name
                        .like(pattern.clone())
                        .or(organizations::slug.like(pattern)),
                );
            }
            query
        };

        let total = create_base_query()
            .count()
            .get_result::<i64>(&mut conn)
            .into_core()?;
        let rows = create_base_query()
            .select(OrganizationDB::as_select())
            .order(organizations::name.asc())
            .limit(page.limit())
            .offset(page.offset())
            .load::<OrganizationDB>(&mut conn)
            .into_core()?;

        Ok(Paginated::new(
            rows.into_iter().map(Organization::from).collect(),
            total,
            page,
        ))
    }

    fn count_customer_profiles(&self, organization_id: &str) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        customer_profiles::table
            .filter(customer_profiles::organization_id.eq(organization_id))
            .count()
            .get_result::<i64>(&mut conn)
            .into_core()
    }

    async fn create(&self, new_organization: NewOrganization) -> Result<Organization> {
        self.writer
            .exec(move |conn| {
                let row: OrganizationDB = new_organization.into();
                diesel::insert_into(organizations::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(row.into())
            })
            .await
    }

    async fn update(
        &self,
        organization_id: &str,
        update: OrganizationUpdate,
    ) -> Result<Organization> {
        let organization_id = organization_id.to_string();
        self.writer
            .exec(move |conn| {
                let changes: OrganizationChangeset = update.into();
                let affected = diesel::update(organizations::table.find(&organization_id))
                    .set(&changes)
                    .execute(conn)
                    .into_core()?;
                if affected == 0 {
                    return Err(Error::not_found("Organization", &organization_id));
                }
                organizations::table
                    .find(&organization_id)
                    .select(OrganizationDB::as_select())
                    .first::<OrganizationDB>(conn)
                    .into_core()
                    .map(Organization::from)
            })
            .await
    }

    async fn delete(&self, organization_id: &str) -> Result<usize> {
        let organization_id = organization_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(organizations::table.find(organization_id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }
}
