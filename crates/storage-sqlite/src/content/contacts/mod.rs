mod model;
mod repository;

pub use model::ContactDB;
pub use repository::ContactRepository;
