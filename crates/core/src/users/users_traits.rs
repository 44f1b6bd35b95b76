use async_trait::async_trait;

use super::users_model::{
    CustomerProfile, CustomerProfileFilter, CustomerProfileUpdate, NewCustomerProfile,
    NewUser, NewUserRecord, ProfileRank, ProfileStanding, User, UserChangeset,
    UserCredentials, UserFilter, UserUpdate,
};
use crate::access::Actor;
use crate::errors::Result;
use crate::pagination::{PageRequest, Paginated};
use crate::ranking::Ranked;

/// Password hashing seam; the server provides the argon2 implementation.
pub trait PasswordHasherTrait: Send + Sync {
    fn hash(&self, password: &str) -> Result<String>;
    fn verify(&self, password: &str, password_hash: &str) -> Result<bool>;
}

#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    fn get_by_id(&self, user_id: &str) -> Result<User>;
    fn find_credentials_by_email(&self, email: &str) -> Result<Option<UserCredentials>>;
    fn list(&self, filter: &UserFilter, page: PageRequest) -> Result<Paginated<User>>;
    async fn create(&self, new_user: NewUserRecord) -> Result<User>;
    async fn update(&self, user_id: &str, changes: UserChangeset) -> Result<User>;
    async fn delete(&self, user_id: &str) -> Result<usize>;
}

#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    fn get_user(&self, actor: &Actor, user_id: &str) -> Result<User>;
    fn list_users(
        &self,
        actor: &Actor,
        filter: UserFilter,
        page: PageRequest,
    ) -> Result<Paginated<User>>;
    async fn create_user(&self, actor: &Actor, new_user: NewUser) -> Result<User>;
    async fn update_user(&self, actor: &Actor, user_id: &str, update: UserUpdate) -> Result<User>;
    async fn delete_user(&self, actor: &Actor, user_id: &str) -> Result<()>;

    /// Verifies a login; `None` when the email or password is wrong.
    fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>>;

    /// Creates the configured super-admin unless a user with that email exists.
    async fn ensure_super_admin(&self, name: &str, email: &str, password: &str) -> Result<User>;
}

#[async_trait]
pub trait CustomerProfileRepositoryTrait: Send + Sync {
    fn get_by_id(&self, profile_id: &str) -> Result<CustomerProfile>;
    fn list(
        &self,
        filter: &CustomerProfileFilter,
        page: PageRequest,
    ) -> Result<Paginated<CustomerProfile>>;
    /// Active profile of a user in an organization, if any.
    fn find_active(&self, user_id: &str, organization_id: &str) -> Result<Option<CustomerProfile>>;
    /// Active profiles of an organization ordered by points descending.
    fn list_active_by_points(&self, organization_id: &str) -> Result<Vec<CustomerProfile>>;
    async fn create(&self, new_profile: NewCustomerProfile) -> Result<CustomerProfile>;
    async fn update(
        &self,
        profile_id: &str,
        update: CustomerProfileUpdate,
    ) -> Result<CustomerProfile>;
    async fn delete(&self, profile_id: &str) -> Result<usize>;
}

#[async_trait]
pub trait CustomerProfileServiceTrait: Send + Sync {
    fn get_profile(&self, actor: &Actor, profile_id: &str) -> Result<CustomerProfile>;
    fn list_profiles(
        &self,
        actor: &Actor,
        filter: CustomerProfileFilter,
        page: PageRequest,
    ) -> Result<Paginated<CustomerProfile>>;
    async fn create_profile(
        &self,
        actor: &Actor,
        new_profile: NewCustomerProfile,
    ) -> Result<CustomerProfile>;
    async fn update_profile(
        &self,
        actor: &Actor,
        profile_id: &str,
        update: CustomerProfileUpdate,
    ) -> Result<CustomerProfile>;
    async fn delete_profile(&self, actor: &Actor, profile_id: &str) -> Result<()>;

    /// Dense rank of a profile by points among active profiles of its organization.
    fn profile_rank(&self, actor: &Actor, profile_id: &str) -> Result<ProfileRank>;

    fn organization_leaderboard(
        &self,
        actor: &Actor,
        organization_id: &str,
    ) -> Result<Vec<Ranked<ProfileStanding>>>;
}
