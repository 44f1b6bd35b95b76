mod model;
mod repository;

pub use model::SocialLinkDB;
pub use repository::SocialLinkRepository;
