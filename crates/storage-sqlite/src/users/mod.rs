mod model;
mod repository;

pub use model::{CustomerProfileChangeset, CustomerProfileDB, UserChangesetDB, UserDB};
pub use repository::{CustomerProfileRepository, UserRepository};
