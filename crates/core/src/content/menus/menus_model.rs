//! Navigation menu items and the nested tree served to the site.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::Result;
use crate::validation::Validator;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub label: String,
    pub url: String,
    pub parent_id: Option<String>,
    pub position: i32,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl MenuItem {
    pub fn apply(&mut self, update: MenuItemUpdate) {
        if let Some(v) = update.label {
            self.label = v;
        }
        if let Some(v) = update.url {
            self.url = v;
        }
        if let Some(v) = update.parent_id {
            // An empty string detaches the item to the top level.
            self.parent_id = (!v.is_empty()).then_some(v);
        }
        if let Some(v) = update.position {
            self.position = v;
        }
        if let Some(v) = update.is_active {
            self.is_active = v;
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_menu_item(&self.label, &self.url, self.position)
    }
}

fn validate_menu_item(label: &str, url: &str, position: i32) -> Result<()> {
    let mut v = Validator::new();
    v.required("label", label).max_len("label", label, 100);
    v.required("url", url).max_len("url", url, 255);
    v.check(position >= 0, "position", "The position must be at least 0.");
    v.finish()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMenuItem {
    pub label: String,
    pub url: String,
    pub parent_id: Option<String>,
    #[serde(default)]
    pub position: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl NewMenuItem {
    pub fn validate(&self) -> Result<()> {
        validate_menu_item(&self.label, &self.url, self.position)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    pub label: Option<String>,
    pub url: Option<String>,
    pub parent_id: Option<String>,
    pub position: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItemFilter {
    pub parent_id: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuNode {
    pub id: String,
    pub label: String,
    pub url: String,
    pub position: i32,
    pub children: Vec<MenuNode>,
}

/// Nests active items under their parents, siblings ordered by position then
/// label. Items below an inactive or missing parent are not reachable and are
/// left out.
pub fn build_tree(items: Vec<MenuItem>) -> Vec<MenuNode> {
    let mut by_parent: HashMap<Option<String>, Vec<MenuItem>> = HashMap::new();
    for item in items.into_iter().filter(|i| i.is_active) {
        by_parent.entry(item.parent_id.clone()).or_default().push(item);
    }
    attach(None, &mut by_parent)
}

fn attach(
    parent: Option<String>,
    by_parent: &mut HashMap<Option<String>, Vec<MenuItem>>,
) -> Vec<MenuNode> {
    let mut siblings = by_parent.remove(&parent).unwrap_or_default();
    siblings.sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.label.cmp(&b.label)));
    siblings
        .into_iter()
        .map(|item| {
            let children = attach(Some(item.id.clone()), by_parent);
            MenuNode {
                id: item.id,
                label: item.label,
                url: item.url,
                position: item.position,
                children,
            }
        })
        .collect()
}

/// True when `candidate` is `item_id` itself or sits anywhere below it.
pub fn is_self_or_descendant(items: &[MenuItem], item_id: &str, candidate: &str) -> bool {
    let parents: HashMap<&str, Option<&str>> = items
        .iter()
        .map(|i| (i.id.as_str(), i.parent_id.as_deref()))
        .collect();
    let mut cursor = Some(candidate);
    let mut steps = 0;
    while let Some(current) = cursor {
        if current == item_id {
            return true;
        }
        steps += 1;
        if steps > items.len() {
            break;
        }
        cursor = parents.get(current).copied().flatten();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, parent: Option<&str>, position: i32, active: bool) -> MenuItem {
        MenuItem {
            id: id.to_string(),
            label: id.to_uppercase(),
            url: format!("/{}", id),
            parent_id: parent.map(str::to_string),
            position,
            is_active: active,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn test_tree_nests_and_orders_by_position() {
        let tree = build_tree(vec![
            item("about", None, 2, true),
            item("home", None, 1, true),
            item("team", Some("about"), 2, true),
            item("history", Some("about"), 1, true),
            item("hidden", Some("about"), 0, false),
        ]);

        let top: Vec<&str> = tree.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(top, vec!["home", "about"]);
        let children: Vec<&str> = tree[1].children.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(children, vec!["history", "team"]);
    }

    #[test]
    fn test_children_of_inactive_parent_are_dropped() {
        let tree = build_tree(vec![
            item("legal", None, 0, false),
            item("privacy", Some("legal"), 0, true),
        ]);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_descendant_detection() {
        let items = vec![
            item("a", None, 0, true),
            item("b", Some("a"), 0, true),
            item("c", Some("b"), 0, true),
            item("d", None, 0, true),
        ];
        assert!(is_self_or_descendant(&items, "a", "a"));
        assert!(is_self_or_descendant(&items, "a", "c"));
        assert!(!is_self_or_descendant(&items, "c", "a"));
        assert!(!is_self_or_descendant(&items, "a", "d"));
    }
}
