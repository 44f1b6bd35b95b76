mod model;
mod repository;

pub use model::FaqDB;
pub use repository::FaqRepository;
