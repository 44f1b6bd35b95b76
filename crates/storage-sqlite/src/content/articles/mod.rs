mod model;
mod repository;

pub use model::ArticleDB;
pub use repository::ArticleRepository;
