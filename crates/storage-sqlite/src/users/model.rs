//! Database models for users and customer profiles.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use log::warn;

use energycoop_core::access::Role;
use energycoop_core::users::{
    CustomerProfile, CustomerProfileUpdate, CustomerType, NewCustomerProfile, NewUserRecord, User,
    UserChangeset, UserCredentials,
};

use crate::utils::{new_id, parse_enum};

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserDB {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub organization_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl UserDB {
    pub fn into_credentials(self) -> UserCredentials {
        let password_hash = self.password_hash.clone();
        UserCredentials {
            user: self.into(),
            password_hash,
        }
    }
}

impl From<UserDB> for User {
    fn from(db: UserDB) -> Self {
        Self {
            role: parse_enum(&db.role, "users.role", Role::Customer),
            id: db.id,
            name: db.name,
            email: db.email,
            organization_id: db.organization_id,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewUserRecord> for UserDB {
    fn from(record: NewUserRecord) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: new_id(),
            name: record.name,
            email: record.email.trim().to_lowercase(),
            password_hash: record.password_hash,
            role: record.role.as_str().to_string(),
            organization_id: record.organization_id,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
pub struct UserChangesetDB {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<String>,
    pub organization_id: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl From<UserChangeset> for UserChangesetDB {
    fn from(changes: UserChangeset) -> Self {
        Self {
            name: changes.name,
            email: changes.email.map(|e| e.trim().to_lowercase()),
            password_hash: changes.password_hash,
            role: changes.role.map(|r| r.as_str().to_string()),
            organization_id: changes.organization_id,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::customer_profiles)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CustomerProfileDB {
    pub id: String,
    pub user_id: String,
    pub organization_id: String,
    pub customer_type: String,
    pub supply_point: Option<String>,
    pub municipality_id: Option<String>,
    pub points_total: i64,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<CustomerProfileDB> for CustomerProfile {
    fn from(db: CustomerProfileDB) -> Self {
        let customer_type = CustomerType::parse(&db.customer_type).unwrap_or_else(|| {
            warn!(
                "Unknown customer type '{}' on profile {}",
                db.customer_type, db.id
            );
            CustomerType::Individual
        });
        Self {
            customer_type,
            id: db.id,
            user_id: db.user_id,
            organization_id: db.organization_id,
            supply_point: db.supply_point,
            municipality_id: db.municipality_id,
            points_total: db.points_total,
            is_active: db.is_active,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewCustomerProfile> for CustomerProfileDB {
    fn from(new: NewCustomerProfile) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: new_id(),
            user_id: new.user_id,
            organization_id: new.organization_id,
            customer_type: new.customer_type.as_str().to_string(),
            supply_point: new.supply_point,
            municipality_id: new.municipality_id,
            points_total: 0,
            is_active: new.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::customer_profiles)]
pub struct CustomerProfileChangeset {
    pub customer_type: Option<String>,
    pub supply_point: Option<String>,
    pub municipality_id: Option<String>,
    pub is_active: Option<bool>,
    pub updated_at: NaiveDateTime,
}

impl From<CustomerProfileUpdate> for CustomerProfileChangeset {
    fn from(update: CustomerProfileUpdate) -> Self {
        Self {
            customer_type: update.customer_type.map(|t| t.as_str().to_string()),
            supply_point: update.supply_point,
            municipality_id: update.municipality_id,
            is_active: update.is_active,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}
