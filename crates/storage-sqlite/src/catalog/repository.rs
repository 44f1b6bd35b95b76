use async_trait::async_trait;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{Bool, Double};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::sync::Arc;

use energycoop_core::catalog::{
    NewProduct, NewProvider, Product, ProductFilter, ProductRepositoryTrait, Provider,
    ProviderFilter, ProviderRepositoryTrait,
};
use energycoop_core::errors::{Error, Result};
use energycoop_core::pagination::{PageRequest, Paginated};

use super::model::{ProductDB, ProviderDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::{products, providers, user_assets};
use crate::utils::like_pattern;

pub struct ProviderRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ProviderRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl ProviderRepositoryTrait for ProviderRepository {
    fn get_by_id(&self, provider_id: &str) -> Result<Provider> {
        let mut conn = get_connection(&self.pool)?;
        providers::table
            .find(provider_id)
            .select(ProviderDB::as_select())
            .first::<ProviderDB>(&mut conn)
            .optional()
            .into_core()?
            .map(Provider::from)
            .ok_or_else(|| Error::not_found("Provider", provider_id))
    }

    fn list(&self, filter: &ProviderFilter, page: PageRequest) -> Result<Paginated<Provider>> {
        let mut conn = get_connection(&self.pool)?;

        let create_base_query = || {
            let mut query = providers::table.into_boxed();
            if let Some(active) = filter.is_active {
                query = query.filter(providers::is_active.eq(active));
            }
            if let Some(ref term) = filter.search {
                let pattern = like_pattern(term);
                query = query.filter(
                    providers::name
                        .like(pattern.clone())
                        .or(providers::description.like(pattern).assume_not_null()),
                );
            }
            query
        };

        let total = create_base_query()
            .count()
            .get_result::<i64>(&mut conn)
            .into_core()?;
        let rows = create_base_query()
            .select(ProviderDB::as_select())
            .order(providers::name.asc())
            .limit(page.limit())
            .offset(page.offset())
            .load::<ProviderDB>(&mut conn)
            .into_core()?;

        Ok(Paginated::new(
            rows.into_iter().map(Provider::from).collect(),
            total,
            page,
        ))
    }

    fn count_products(&self, provider_id: &str) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        products::table
            .filter(products::provider_id.eq(provider_id))
            .count()
            .get_result::<i64>(&mut conn)
            .into_core()
    }

    async fn create(&self, new_provider: NewProvider, sustainability_score: Decimal) -> Result<Provider> {
        self.writer
            .exec(move |conn| {
                let row = ProviderDB::from_new(new_provider, sustainability_score);
                diesel::insert_into(providers::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(row.into())
            })
            .await
    }

    async fn update(&self, provider: Provider) -> Result<Provider> {
        self.writer
            .exec(move |conn| {
                let mut row: ProviderDB = provider.into();
                row.updated_at = chrono::Utc::now().naive_utc();
                let affected = diesel::update(providers::table.find(&row.id))
                    .set(&row)
                    .execute(conn)
                    .into_core()?;
                if affected == 0 {
                    return Err(Error::not_found("Provider", &row.id));
                }
                Ok(row.into())
            })
            .await
    }

    async fn delete(&self, provider_id: &str) -> Result<usize> {
        let provider_id = provider_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(providers::table.find(provider_id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }
}

pub struct ProductRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ProductRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl ProductRepositoryTrait for ProductRepository {
    fn get_by_id(&self, product_id: &str) -> Result<Product> {
        let mut conn = get_connection(&self.pool)?;
        products::table
            .find(product_id)
            .select(ProductDB::as_select())
            .first::<ProductDB>(&mut conn)
            .optional()
            .into_core()?
            .map(Product::from)
            .ok_or_else(|| Error::not_found("Product", product_id))
    }

    fn list(&self, filter: &ProductFilter, page: PageRequest) -> Result<Paginated<Product>> {
        let mut conn = get_connection(&self.pool)?;

        let create_base_query = || {
            let mut query = products::table.into_boxed();
            if let Some(ref provider_id) = filter.provider_id {
                query = query.filter(products::provider_id.eq(provider_id.clone()));
            }
            if let Some(kind) = filter.product_type {
                query = query.filter(products::product_type.eq(kind.as_str()));
            }
            if let Some(active) = filter.is_active {
                query = query.filter(products::is_active.eq(active));
            }
            if let Some(min_score) = filter.min_score {
                // Scores are TEXT; compare numerically.
                query = query.filter(
                    sql::<Bool>("CAST(sustainability_score AS REAL) >= ")
                        .bind::<Double, _>(min_score.to_f64().unwrap_or(0.0)),
                );
            }
            if let Some(ref term) = filter.search {
                let pattern = like_pattern(term);
                query = query.filter(
                    products::name
                        .like(pattern.clone())
                        .or(products::description.like(pattern).assume_not_null()),
                );
            }
            query
        };

        let total = create_base_query()
            .count()
            .get_result::<i64>(&mut conn)
            .into_core()?;
        let rows = create_base_query()
            .select(ProductDB::as_select())
            .order(products::name.asc())
            .limit(page.limit())
            .offset(page.offset())
            .load::<ProductDB>(&mut conn)
            .into_core()?;

        Ok(Paginated::new(
            rows.into_iter().map(Product::from).collect(),
            total,
            page,
        ))
    }

    fn count_user_assets(&self, product_id: &str) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        user_assets::table
            .filter(user_assets::product_id.eq(product_id))
            .count()
            .get_result::<i64>(&mut conn)
            .into_core()
    }

    async fn create(&self, new_product: NewProduct, sustainability_score: Decimal) -> Result<Product> {
        self.writer
            .exec(move |conn| {
                let row = ProductDB::from_new(new_product, sustainability_score);
                diesel::insert_into(products::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(row.into())
            })
            .await
    }

    async fn update(&self, product: Product) -> Result<Product> {
        self.writer
            .exec(move |conn| {
                let mut row: ProductDB = product.into();
                row.updated_at = chrono::Utc::now().naive_utc();
                let affected = diesel::update(products::table.find(&row.id))
                    .set(&row)
                    .execute(conn)
                    .into_core()?;
                if affected == 0 {
                    return Err(Error::not_found("Product", &row.id));
                }
                Ok(row.into())
            })
            .await
    }

    async fn delete(&self, product_id: &str) -> Result<usize> {
        let product_id = product_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(products::table.find(product_id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }
}
