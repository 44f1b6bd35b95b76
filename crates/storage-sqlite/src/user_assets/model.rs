//! Database model for portfolio positions.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use energycoop_core::user_assets::{AssetStatus, NewUserAsset, UserAsset};

use crate::utils::{decimal_to_text, new_id, parse_decimal, parse_enum};

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::user_assets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct UserAssetDB {
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    pub quantity: String,
    pub total_investment: String,
    pub current_value: String,
    pub daily_yield: String,
    pub auto_reinvest: bool,
    pub status: String,
    pub last_yield_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<UserAssetDB> for UserAsset {
    fn from(db: UserAssetDB) -> Self {
        Self {
            quantity: parse_decimal(&db.quantity, "user_assets.quantity"),
            total_investment: parse_decimal(&db.total_investment, "user_assets.total_investment"),
            current_value: parse_decimal(&db.current_value, "user_assets.current_value"),
            daily_yield: parse_decimal(&db.daily_yield, "user_assets.daily_yield"),
            status: parse_enum(&db.status, "user_assets.status", AssetStatus::Inactive),
            id: db.id,
            user_id: db.user_id,
            product_id: db.product_id,
            auto_reinvest: db.auto_reinvest,
            last_yield_at: db.last_yield_at,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<UserAsset> for UserAssetDB {
    fn from(a: UserAsset) -> Self {
        Self {
            quantity: decimal_to_text(a.quantity),
            total_investment: decimal_to_text(a.total_investment),
            current_value: decimal_to_text(a.current_value),
            daily_yield: decimal_to_text(a.daily_yield),
            status: a.status.as_str().to_string(),
            id: a.id,
            user_id: a.user_id,
            product_id: a.product_id,
            auto_reinvest: a.auto_reinvest,
            last_yield_at: a.last_yield_at,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

impl From<NewUserAsset> for UserAssetDB {
    fn from(new: NewUserAsset) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: new_id(),
            user_id: new.user_id,
            product_id: new.product_id,
            quantity: decimal_to_text(new.quantity),
            total_investment: decimal_to_text(new.total_investment),
            current_value: decimal_to_text(new.current_value),
            daily_yield: decimal_to_text(new.daily_yield),
            auto_reinvest: new.auto_reinvest,
            status: AssetStatus::Active.as_str().to_string(),
            last_yield_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}
