use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use energycoop_core::content::menus::{
    MenuItem, MenuItemFilter, MenuItemRepositoryTrait, NewMenuItem,
};
use energycoop_core::errors::{Error, Result};
use energycoop_core::pagination::{PageRequest, Paginated};

use super::model::MenuItemDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::menu_items;

pub struct MenuItemRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl MenuItemRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl MenuItemRepositoryTrait for MenuItemRepository {
    fn get_by_id(&self, item_id: &str) -> Result<MenuItem> {
        let mut conn = get_connection(&self.pool)?;
        menu_items::table
            .find(item_id)
            .select(MenuItemDB::as_select())
            .first::<MenuItemDB>(&mut conn)
            .optional()
            .into_core()?
            .map(MenuItem::from)
            .ok_or_else(|| Error::not_found("MenuItem", item_id))
    }

    fn list(&self, filter: &MenuItemFilter, page: PageRequest) -> Result<Paginated<MenuItem>> {
        let mut conn = get_connection(&self.pool)?;

        let create_base_query = || {
            let mut query = menu_items::table.into_boxed();
            if let Some(ref parent_id) = filter.parent_id {
                query = query.filter(menu_items::parent_id.eq(parent_id.clone()));
            }
            if let Some(active) = filter.is_active {
                query = query.filter(menu_items::is_active.eq(active));
            }
            query
        };

        let total = create_base_query()
            .count()
            .get_result::<i64>(&mut conn)
            .into_core()?;
        let rows = create_base_query()
            .select(MenuItemDB::as_select())
            .order((menu_items::position.asc(), menu_items::label.asc()))
            .limit(page.limit())
            .offset(page.offset())
            .load::<MenuItemDB>(&mut conn)
            .into_core()?;

        Ok(Paginated::new(
            rows.into_iter().map(MenuItem::from).collect(),
            total,
            page,
        ))
    }

    fn list_all(&self) -> Result<Vec<MenuItem>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = menu_items::table
            .order((menu_items::position.asc(), menu_items::label.asc()))
            .select(MenuItemDB::as_select())
            .load::<MenuItemDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(MenuItem::from).collect())
    }

    fn count_children(&self, item_id: &str) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        menu_items::table
            .filter(menu_items::parent_id.eq(item_id))
            .count()
            .get_result::<i64>(&mut conn)
            .into_core()
    }

    async fn create(&self, new_item: NewMenuItem) -> Result<MenuItem> {
        self.writer
            .exec(move |conn| {
                let row: MenuItemDB = new_item.into();
                diesel::insert_into(menu_items::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(row.into())
            })
            .await
    }

    async fn update(&self, item: MenuItem) -> Result<MenuItem> {
        self.writer
            .exec(move |conn| {
                let mut row: MenuItemDB = item.into();
                row.updated_at = chrono::Utc::now().naive_utc();
                let affected = diesel::update(menu_items::table.find(&row.id))
                    .set(&row)
                    .execute(conn)
                    .into_core()?;
                if affected == 0 {
                    return Err(Error::not_found("MenuItem", &row.id));
                }
                Ok(row.into())
            })
            .await
    }

    async fn delete(&self, item_id: &str) -> Result<usize> {
        let item_id = item_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(menu_items::table.find(item_id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }
}
