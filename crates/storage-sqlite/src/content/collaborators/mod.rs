mod model;
mod repository;

pub use model::CollaboratorDB;
pub use repository::CollaboratorRepository;
