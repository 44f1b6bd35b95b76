mod model;
mod repository;

pub use model::{ProductDB, ProviderDB};
pub use repository::{ProductRepository, ProviderRepository};
