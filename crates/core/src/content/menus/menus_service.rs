use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

use super::menus_model::{
    build_tree, is_self_or_descendant, MenuItem, MenuItemFilter, MenuItemUpdate, MenuNode,
    NewMenuItem,
};
use super::menus_traits::{MenuItemRepositoryTrait, MenuItemServiceTrait};
use crate::access::{is_editor, Actor, Role};
use crate::errors::{Error, Result};
use crate::pagination::{PageRequest, Paginated};
use crate::validation::FieldErrors;

pub struct MenuItemService {
    repository: Arc<dyn MenuItemRepositoryTrait>,
}

impl MenuItemService {
    pub fn new(repository: Arc<dyn MenuItemRepositoryTrait>) -> Self {
        Self { repository }
    }

    fn ensure_parent_exists(&self, parent_id: &str) -> Result<()> {
        match self.repository.get_by_id(parent_id) {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => {
                let mut errors = FieldErrors::default();
                errors.add("parent_id", "The selected parent_id is invalid.");
                Err(errors.into())
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl MenuItemServiceTrait for MenuItemService {
    fn get_menu_item(&self, actor: Option<&Actor>, item_id: &str) -> Result<MenuItem> {
        let item = self.repository.get_by_id(item_id)?;
        if !item.is_active && !is_editor(actor) {
            return Err(Error::not_found("Menu item", item_id));
        }
        Ok(item)
    }

    fn list_menu_items(
        &self,
        actor: Option<&Actor>,
        mut filter: MenuItemFilter,
        page: PageRequest,
    ) -> Result<Paginated<MenuItem>> {
        if !is_editor(actor) {
            filter.is_active = Some(true);
        }
        self.repository.list(&filter, page)
    }

    fn menu_tree(&self) -> Result<Vec<MenuNode>> {
        let items = self.repository.list_all()?;
        debug!("Building menu tree from {} items", items.len());
        Ok(build_tree(items))
    }

    async fn create_menu_item(&self, actor: &Actor, new_item: NewMenuItem) -> Result<MenuItem> {
        actor.require(Role::Admin)?;
        new_item.validate()?;
        if let Some(parent_id) = &new_item.parent_id {
            self.ensure_parent_exists(parent_id)?;
        }
        self.repository.create(new_item).await
    }

    async fn update_menu_item(
        &self,
        actor: &Actor,
        item_id: &str,
        update: MenuItemUpdate,
    ) -> Result<MenuItem> {
        actor.require(Role::Admin)?;
        let mut item = self.repository.get_by_id(item_id)?;
        item.apply(update);
        item.validate()?;
        if let Some(parent_id) = &item.parent_id {
            self.ensure_parent_exists(parent_id)?;
            if is_self_or_descendant(&self.repository.list_all()?, item_id, parent_id) {
                return Err(Error::ConstraintViolation(
                    "A menu item cannot be nested under itself or its descendants".to_string(),
                ));
            }
        }
        self.repository.update(item).await
    }

    async fn delete_menu_item(&self, actor: &Actor, item_id: &str) -> Result<()> {
        actor.require(Role::Admin)?;
        self.repository.get_by_id(item_id)?;
        if self.repository.count_children(item_id)? > 0 {
            return Err(Error::ConstraintViolation(
                "Cannot delete a menu item that has children".to_string(),
            ));
        }
        self.repository.delete(item_id).await?;
        Ok(())
    }
}
