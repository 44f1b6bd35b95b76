use async_trait::async_trait;

use super::menus_model::{MenuItem, MenuItemFilter, MenuItemUpdate, MenuNode, NewMenuItem};
use crate::access::Actor;
use crate::errors::Result;
use crate::pagination::{PageRequest, Paginated};

#[async_trait]
pub trait MenuItemRepositoryTrait: Send + Sync {
    fn get_by_id(&self, item_id: &str) -> Result<MenuItem>;
    /// Ordered by position.
    fn list(&self, filter: &MenuItemFilter, page: PageRequest) -> Result<Paginated<MenuItem>>;
    /// Every item, active or not.
    fn list_all(&self) -> Result<Vec<MenuItem>>;
    fn count_children(&self, item_id: &str) -> Result<i64>;
    async fn create(&self, new_item: NewMenuItem) -> Result<MenuItem>;
    async fn update(&self, item: MenuItem) -> Result<MenuItem>;
    async fn delete(&self, item_id: &str) -> Result<usize>;
}

#[async_trait]
pub trait MenuItemServiceTrait: Send + Sync {
    fn get_menu_item(&self, actor: Option<&Actor>, item_id: &str) -> Result<MenuItem>;
    fn list_menu_items(
        &self,
        actor: Option<&Actor>,
        filter: MenuItemFilter,
        page: PageRequest,
    ) -> Result<Paginated<MenuItem>>;
    fn menu_tree(&self) -> Result<Vec<MenuNode>>;
    async fn create_menu_item(&self, actor: &Actor, new_item: NewMenuItem) -> Result<MenuItem>;
    async fn update_menu_item(
        &self,
        actor: &Actor,
        item_id: &str,
        update: MenuItemUpdate,
    ) -> Result<MenuItem>;
    async fn delete_menu_item(&self, actor: &Actor, item_id: &str) -> Result<()>;
}
