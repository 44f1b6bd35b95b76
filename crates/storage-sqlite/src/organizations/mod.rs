mod model;
mod repository;

pub use model::{OrganizationChangeset, OrganizationDB};
pub use repository::OrganizationRepository;
