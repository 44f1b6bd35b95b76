//! Users, credentials and customer profiles (organization memberships).

mod customer_profiles_service;
mod users_model;
mod users_service;
mod users_traits;

#[cfg(test)]
mod users_service_tests;

pub use customer_profiles_service::CustomerProfileService;
pub use users_model::{
    CustomerProfile, CustomerProfileFilter, CustomerProfileUpdate, CustomerType,
    NewCustomerProfile, NewUser, NewUserRecord, ProfileRank, ProfileStanding, User,
    UserChangeset, UserCredentials, UserFilter, UserUpdate, MIN_PASSWORD_LENGTH,
};
pub use users_service::UserService;
pub use users_traits::{
    CustomerProfileRepositoryTrait, CustomerProfileServiceTrait, PasswordHasherTrait,
    UserRepositoryTrait, UserServiceTrait,
};
