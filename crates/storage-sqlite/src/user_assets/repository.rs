use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::sync::Arc;

use energycoop_core::balances::{Balance, NewBalanceEntry};
use energycoop_core::catalog::Product;
use energycoop_core::errors::{Error, Result};
use energycoop_core::pagination::{PageRequest, Paginated};
use energycoop_core::user_assets::{
    valuation, NewUserAsset, UserAsset, UserAssetFilter, UserAssetRepositoryTrait,
    UserAssetUpdate, YieldResult,
};

use super::model::UserAssetDB;
use crate::balances::append_checked;
use crate::catalog::ProductDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::{products, user_assets};

pub struct UserAssetRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl UserAssetRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn load_asset(conn: &mut SqliteConnection, asset_id: &str) -> Result<UserAsset> {
    user_assets::table
        .find(asset_id)
        .select(UserAssetDB::as_select())
        .first::<UserAssetDB>(conn)
        .optional()
        .into_core()?
        .map(UserAsset::from)
        .ok_or_else(|| Error::not_found("UserAsset", asset_id))
}

fn save_asset(conn: &mut SqliteConnection, asset: UserAsset) -> Result<UserAsset> {
    let row: UserAssetDB = asset.into();
    diesel::update(user_assets::table.find(&row.id))
        .set(&row)
        .execute(conn)
        .into_core()?;
    Ok(row.into())
}

#[async_trait]
impl UserAssetRepositoryTrait for UserAssetRepository {
    fn get_by_id(&self, asset_id: &str) -> Result<UserAsset> {
        let mut conn = get_connection(&self.pool)?;
        load_asset(&mut conn, asset_id)
    }

    fn list(&self, filter: &UserAssetFilter, page: PageRequest) -> Result<Paginated<UserAsset>> {
        let mut conn = get_connection(&self.pool)?;

        let create_base_query = || {
            let mut query = user_assets::table.into_boxed();
            if let Some(ref user_id) = filter.user_id {
                query = query.filter(user_assets::user_id.eq(user_id.clone()));
            }
            if let Some(ref product_id) = filter.product_id {
                query = query.filter(user_assets::product_id.eq(product_id.clone()));
            }
            if let Some(status) = filter.status {
                query = query.filter(user_assets::status.eq(status.as_str()));
            }
            query
        };

        let total = create_base_query()
            .count()
            .get_result::<i64>(&mut conn)
            .into_core()?;
        let rows = create_base_query()
            .select(UserAssetDB::as_select())
            .order((user_assets::created_at.desc(), user_assets::id.asc()))
            .limit(page.limit())
            .offset(page.offset())
            .load::<UserAssetDB>(&mut conn)
            .into_core()?;

        Ok(Paginated::new(
            rows.into_iter().map(UserAsset::from).collect(),
            total,
            page,
        ))
    }

    fn list_with_products(&self, user_id: &str) -> Result<Vec<(UserAsset, Product)>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = user_assets::table
            .inner_join(products::table)
            .filter(user_assets::user_id.eq(user_id))
            .order(user_assets::created_at.asc())
            .select((UserAssetDB::as_select(), ProductDB::as_select()))
            .load::<(UserAssetDB, ProductDB)>(&mut conn)
            .into_core()?;
        Ok(rows
            .into_iter()
            .map(|(asset, product)| (asset.into(), product.into()))
            .collect())
    }

    async fn open_position(
        &self,
        new_asset: NewUserAsset,
        entry: NewBalanceEntry,
    ) -> Result<(UserAsset, Balance)> {
        self.writer
            .exec(move |conn| {
                let row: UserAssetDB = new_asset.into();
                diesel::insert_into(user_assets::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                // A rejected debit rolls the whole job back, position included.
                let mut entry = entry;
                entry.user_asset_id = Some(row.id.clone());
                let balance = append_checked(conn, entry)?;
                debug!("Opened position {} for user {}", row.id, row.user_id);
                Ok((row.into(), balance))
            })
            .await
    }

    async fn add_investment(
        &self,
        asset_id: &str,
        entry: NewBalanceEntry,
    ) -> Result<(UserAsset, Balance)> {
        let asset_id = asset_id.to_string();
        self.writer
            .exec(move |conn| {
                let mut asset = load_asset(conn, &asset_id)?;
                let mut entry = entry;
                entry.user_asset_id = Some(asset_id.clone());
                let amount = entry.magnitude();
                let balance = append_checked(conn, entry)?;
                asset.total_investment += amount;
                asset.current_value += amount;
                asset.updated_at = chrono::Utc::now().naive_utc();
                let asset = save_asset(conn, asset)?;
                Ok((asset, balance))
            })
            .await
    }

    async fn process_yield(&self, asset_id: &str, at: NaiveDateTime) -> Result<YieldResult> {
        let asset_id = asset_id.to_string();
        self.writer
            .exec(move |conn| {
                let mut asset = load_asset(conn, &asset_id)?;
                let result = valuation::process_yield(&mut asset, at)?;
                save_asset(conn, asset)?;
                Ok(result)
            })
            .await
    }

    async fn update(&self, asset_id: &str, update: UserAssetUpdate) -> Result<UserAsset> {
        let asset_id = asset_id.to_string();
        self.writer
            .exec(move |conn| {
                let mut asset = load_asset(conn, &asset_id)?;
                if let Some(auto_reinvest) = update.auto_reinvest {
                    asset.auto_reinvest = auto_reinvest;
                }
                if let Some(status) = update.status {
                    asset.status = status;
                }
                asset.updated_at = chrono::Utc::now().naive_utc();
                save_asset(conn, asset)
            })
            .await
    }

    async fn delete(&self, asset_id: &str) -> Result<usize> {
        let asset_id = asset_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(user_assets::table.find(asset_id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }
}
