mod model;
mod repository;

pub use model::UserAssetDB;
pub use repository::UserAssetRepository;
