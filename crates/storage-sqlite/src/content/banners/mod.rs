mod model;
mod repository;

pub use model::BannerDB;
pub use repository::BannerRepository;
