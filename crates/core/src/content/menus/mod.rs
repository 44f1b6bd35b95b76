mod menus_model;
mod menus_service;
mod menus_traits;

#[cfg(test)]
mod menus_service_tests;

pub use menus_model::{
    build_tree, MenuItem, MenuItemFilter, MenuItemUpdate, MenuNode, NewMenuItem,
};
pub use menus_service::MenuItemService;
pub use menus_traits::{MenuItemRepositoryTrait, MenuItemServiceTrait};
