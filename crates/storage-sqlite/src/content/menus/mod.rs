mod model;
mod repository;

pub use model::MenuItemDB;
pub use repository::MenuItemRepository;
