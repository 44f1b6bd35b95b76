use chrono::NaiveDateTime;
use diesel::prelude::*;

use energycoop_core::content::menus::{MenuItem, NewMenuItem};

use crate::utils::new_id;

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::menu_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct MenuItemDB {
    pub id: String,
    pub label: String,
    pub url: String,
    pub parent_id: Option<String>,
    pub position: i32,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<MenuItemDB> for MenuItem {
    fn from(db: MenuItemDB) -> Self {
        Self {
            id: db.id,
            label: db.label,
            url: db.url,
            parent_id: db.parent_id,
            position: db.position,
            is_active: db.is_active,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<MenuItem> for MenuItemDB {
    fn from(m: MenuItem) -> Self {
        Self {
            id: m.id,
            label: m.label,
            url: m.url,
            parent_id: m.parent_id,
            position: m.position,
            is_active: m.is_active,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

impl From<NewMenuItem> for MenuItemDB {
    fn from(new: NewMenuItem) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: new_id(),
            label: new.label,
            url: new.url,
            parent_id: new.parent_id.filter(|p| !p.is_empty()),
            position: new.position,
            is_active: new.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}
