use super::*;
use crate::access::{Actor, Role};
use crate::errors::{Error, Result};
use crate::pagination::{PageRequest, Paginated};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex};

// ============================================================================
// Mock Implementations
// ============================================================================

#[derive(Default)]
struct MockMenuRepository {
    items: Mutex<Vec<MenuItem>>,
}

#[async_trait]
impl MenuItemRepositoryTrait for MockMenuRepository {
    fn get_by_id(&self, item_id: &str) -> Result<MenuItem> {
        self.items
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.id == item_id)
            .cloned()
            .ok_or_else(|| Error::not_found("Menu item", item_id))
    }

    fn list(&self, filter: &MenuItemFilter, page: PageRequest) -> Result<Paginated<MenuItem>> {
        let items: Vec<MenuItem> = self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|i| filter.is_active.map_or(true, |a| i.is_active == a))
            .cloned()
            .collect();
        Ok(Paginated::from_vec(items, page))
    }

    fn list_all(&self) -> Result<Vec<MenuItem>> {
        Ok(self.items.lock().unwrap().clone())
    }

    fn count_children(&self, item_id: &str) -> Result<i64> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.parent_id.as_deref() == Some(item_id))
            .count() as i64)
    }

    async fn create(&self, new_item: NewMenuItem) -> Result<MenuItem> {
        let now = Utc::now().naive_utc();
        let mut items = self.items.lock().unwrap();
        let item = MenuItem {
            id: format!("menu-{}", items.len() + 1),
            label: new_item.label,
            url: new_item.url,
            parent_id: new_item.parent_id,
            position: new_item.position,
            is_active: new_item.is_active,
            created_at: now,
            updated_at: now,
        };
        items.push(item.clone());
        Ok(item)
    }

    async fn update(&self, item: MenuItem) -> Result<MenuItem> {
        let mut items = self.items.lock().unwrap();
        if let Some(existing) = items.iter_mut().find(|i| i.id == item.id) {
            *existing = item.clone();
        }
        Ok(item)
    }

    async fn delete(&self, item_id: &str) -> Result<usize> {
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|i| i.id != item_id);
        Ok(before - items.len())
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn admin() -> Actor {
    Actor::new("admin-1", Role::Admin, None)
}

fn new_item(label: &str, parent_id: Option<&str>) -> NewMenuItem {
    NewMenuItem {
        label: label.to_string(),
        url: format!("/{}", label.to_lowercase()),
        parent_id: parent_id.map(str::to_string),
        position: 0,
        is_active: true,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_delete_with_children_is_blocked() {
    let service = MenuItemService::new(Arc::new(MockMenuRepository::default()));
    let parent = service
        .create_menu_item(&admin(), new_item("About", None))
        .await
        .unwrap();
    let child = service
        .create_menu_item(&admin(), new_item("Team", Some(&parent.id)))
        .await
        .unwrap();

    let blocked = service.delete_menu_item(&admin(), &parent.id).await;
    assert!(matches!(blocked, Err(Error::ConstraintViolation(_))));

    service.delete_menu_item(&admin(), &child.id).await.unwrap();
    service.delete_menu_item(&admin(), &parent.id).await.unwrap();
}

#[tokio::test]
async fn test_unknown_parent_is_a_validation_error() {
    let service = MenuItemService::new(Arc::new(MockMenuRepository::default()));
    let result = service
        .create_menu_item(&admin(), new_item("Orphan", Some("missing")))
        .await;
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[tokio::test]
async fn test_cannot_reparent_under_own_descendant() {
    let service = MenuItemService::new(Arc::new(MockMenuRepository::default()));
    let root = service
        .create_menu_item(&admin(), new_item("Root", None))
        .await
        .unwrap();
    let leaf = service
        .create_menu_item(&admin(), new_item("Leaf", Some(&root.id)))
        .await
        .unwrap();

    let result = service
        .update_menu_item(
            &admin(),
            &root.id,
            MenuItemUpdate {
                parent_id: Some(leaf.id.clone()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(Error::ConstraintViolation(_))));
}

#[tokio::test]
async fn test_inactive_items_are_hidden_from_readers() {
    let service = MenuItemService::new(Arc::new(MockMenuRepository::default()));
    let mut hidden = new_item("Hidden", None);
    hidden.is_active = false;
    let hidden = service.create_menu_item(&admin(), hidden).await.unwrap();
    service
        .create_menu_item(&admin(), new_item("Home", None))
        .await
        .unwrap();

    assert!(matches!(
        service.get_menu_item(None, &hidden.id),
        Err(Error::NotFound(_))
    ));
    assert!(service.get_menu_item(Some(&admin()), &hidden.id).is_ok());
    assert_eq!(service.menu_tree().unwrap().len(), 1);
    let public = service
        .list_menu_items(None, MenuItemFilter::default(), PageRequest::default())
        .unwrap();
    assert_eq!(public.total, 1);
}

#[tokio::test]
async fn test_customers_cannot_edit_menus() {
    let service = MenuItemService::new(Arc::new(MockMenuRepository::default()));
    let customer = Actor::new("user-1", Role::Customer, None);
    let result = service
        .create_menu_item(&customer, new_item("Home", None))
        .await;
    assert!(matches!(result, Err(Error::PermissionDenied(_))));
}
