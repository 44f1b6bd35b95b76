use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use energycoop_core::errors::{Error, Result};
use energycoop_core::pagination::{PageRequest, Paginated};
use energycoop_core::users::{
    CustomerProfile, CustomerProfileFilter, CustomerProfileRepositoryTrait,
    CustomerProfileUpdate, NewCustomerProfile, NewUserRecord, User, UserChangeset,
    UserCredentials, UserFilter, UserRepositoryTrait,
};

use super::model::{CustomerProfileChangeset, CustomerProfileDB, UserChangesetDB, UserDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::{customer_profiles, users};
use crate::utils::like_pattern;

pub struct UserRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl UserRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    fn get_by_id(&self, user_id: &str) -> Result<User> {
        let mut conn = get_connection(&self.pool)?;
        users::table
            .find(user_id)
            .select(UserDB::as_select())
            .first::<UserDB>(&mut conn)
            .optional()
            .into_core()?
            .map(User::from)
            .ok_or_else(|| Error::not_found("User", user_id))
    }

    fn find_credentials_by_email(&self, email: &str) -> Result<Option<UserCredentials>> {
        let mut conn = get_connection(&self.pool)?;
        let row = users::table
            .filter(users::email.eq(email.trim().to_lowercase()))
            .select(UserDB::as_select())
            .first::<UserDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.map(UserDB::into_credentials))
    }

    fn list(&self, filter: &UserFilter, page: PageRequest) -> Result<Paginated<User>> {
        let mut conn = get_connection(&self.pool)?;

        let create_base_query = || {
            let mut query = users::table.into_boxed();
            if let Some(role) = filter.role {
                query = query.filter(users::role.eq(role.as_str()));
            }
            if let Some(ref organization_id) = filter.organization_id {
                query = query.filter(users::organization_id.eq(organization_id.clone()));
            }
            if let Some(ref term) = filter.search {
                let pattern = like_pattern(term);
                query = query.filter(users::name.like(pattern.clone()).or(users::email.like(pattern)));
            }
            query
        };

        let total = create_base_query()
            .count()
            .get_result::<i64>(&mut conn)
            .into_core()?;
        let rows = create_base_query()
            .select(UserDB::as_select())
            .order((users::name.asc(), users::id.asc()))
            .limit(page.limit())
            .offset(page.offset())
            .load::<UserDB>(&mut conn)
            .into_core()?;

        Ok(Paginated::new(
            rows.into_iter().map(User::from).collect(),
            total,
            page,
        ))
    }

    async fn create(&self, new_user: NewUserRecord) -> Result<User> {
        self.writer
            .exec(move |conn| {
                let row: UserDB = new_user.into();
                diesel::insert_into(users::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(row.into())
            })
            .await
    }

    async fn update(&self, user_id: &str, changes: UserChangeset) -> Result<User> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn| {
                let changes: UserChangesetDB = changes.into();
                let affected = diesel::update(users::table.find(&user_id))
                    .set(&changes)
                    .execute(conn)
                    .into_core()?;
                if affected == 0 {
                    return Err(Error::not_found("User", &user_id));
                }
                users::table
                    .find(&user_id)
                    .select(UserDB::as_select())
                    .first::<UserDB>(conn)
                    .into_core()
                    .map(User::from)
            })
            .await
    }

    async fn delete(&self, user_id: &str) -> Result<usize> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn| diesel::delete(users::table.find(user_id)).execute(conn).into_core())
            .await
    }
}

pub struct CustomerProfileRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl CustomerProfileRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl CustomerProfileRepositoryTrait for CustomerProfileRepository {
    fn get_by_id(&self, profile_id: &str) -> Result<CustomerProfile> {
        let mut conn = get_connection(&self.pool)?;
        customer_profiles::table
            .find(profile_id)
            .select(CustomerProfileDB::as_select())
            .first::<CustomerProfileDB>(&mut conn)
            .optional()
            .into_core()?
            .map(CustomerProfile::from)
            .ok_or_else(|| Error::not_found("CustomerProfile", profile_id))
    }

    fn list(
        &self,
        filter: &CustomerProfileFilter,
        page: PageRequest,
    ) -> Result<Paginated<CustomerProfile>> {
        let mut conn = get_connection(&self.pool)?;

        let create_base_query = || {
            let mut query = customer_profiles::table.into_boxed();
            if let Some(ref user_id) = filter.user_id {
                query = query.filter(customer_profiles::user_id.eq(user_id.clone()));
            }
            if let Some(ref organization_id) = filter.organization_id {
                query = query.filter(customer_profiles::organization_id.eq(organization_id.clone()));
            }
            if let Some(kind) = filter.customer_type {
                query = query.filter(customer_profiles::customer_type.eq(kind.as_str()));
            }
            if let Some(active) = filter.is_active {
                query = query.filter(customer_profiles::is_active.eq(active));
            }
            query
        };

        let total = create_base_query()
            .count()
            .get_result::<i64>(&mut conn)
            .into_core()?;
        let rows = create_base_query()
            .select(CustomerProfileDB::as_select())
            .order((customer_profiles::created_at.desc(), customer_profiles::id.asc()))
            .limit(page.limit())
            .offset(page.offset())
            .load::<CustomerProfileDB>(&mut conn)
            .into_core()?;

        Ok(Paginated::new(
            rows.into_iter().map(CustomerProfile::from).collect(),
            total,
            page,
        ))
    }

    fn find_active(&self, user_id: &str, organization_id: &str) -> Result<Option<CustomerProfile>> {
        let mut conn = get_connection(&self.pool)?;
        let row = customer_profiles::table
            .filter(customer_profiles::user_id.eq(user_id))
            .filter(customer_profiles::organization_id.eq(organization_id))
            .filter(customer_profiles::is_active.eq(true))
            .select(CustomerProfileDB::as_select())
            .first::<CustomerProfileDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.map(CustomerProfile::from))
    }

    fn list_active_by_points(&self, organization_id: &str) -> Result<Vec<CustomerProfile>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = customer_profiles::table
            .filter(customer_profiles::organization_id.eq(organization_id))
            .filter(customer_profiles::is_active.eq(true))
            .order((
                customer_profiles::points_total.desc(),
                customer_profiles::created_at.asc(),
            ))
            .select(CustomerProfileDB::as_select())
            .load::<CustomerProfileDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(CustomerProfile::from).collect())
    }

    async fn create(&self, new_profile: NewCustomerProfile) -> Result<CustomerProfile> {
        self.writer
            .exec(move |conn| {
                let row: CustomerProfileDB = new_profile.into();
                diesel::insert_into(customer_profiles::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(row.into())
            })
            .await
    }

    async fn update(
        &self,
        profile_id: &str,
        update: CustomerProfileUpdate,
    ) -> Result<CustomerProfile> {
        let profile_id = profile_id.to_string();
        self.writer
            .exec(move |conn| {
                let changes: CustomerProfileChangeset = update.into();
                let affected = diesel::update(customer_profiles::table.find(&profile_id))
                    .set(&changes)
                    .execute(conn)
                    .into_core()?;
                if affected == 0 {
                    return Err(Error::not_found("CustomerProfile", &profile_id));
                }
                customer_profiles::table
                    .find(&profile_id)
                    .select(CustomerProfileDB::as_select())
                    .first::<CustomerProfileDB>(conn)
                    .into_core()
                    .map(CustomerProfile::from)
            })
            .await
    }

    async fn delete(&self, profile_id: &str) -> Result<usize> {
        let profile_id = profile_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(customer_profiles::table.find(profile_id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }
}
