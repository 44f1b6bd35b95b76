use async_trait::async_trait;

use super::organizations_model::{
    NewOrganization, Organization, OrganizationFilter, OrganizationUpdate,
};
use crate::access::Actor;
use crate::errors::Result;
use crate::pagination::{PageRequest, Paginated};

#[async_trait]
pub trait OrganizationRepositoryTrait: Send + Sync {
    fn get_by_id(&self, organization_id: &str) -> Result<Organization>;
    fn find_by_slug(&self, slug: &str) -> Result<Option<Organization>>;
    fn list(
        &self,
        filter: &OrganizationFilter,
        page: PageRequest,
    ) -> Result<Paginated<Organization>>;
    /// Number of customer profiles (active or not) pointing at the organization.
    fn count_customer_profiles(&self, organization_id: &str) -> Result<i64>;
    async fn create(&self, new_organization: NewOrganization) -> Result<Organization>;
    async fn update(
        &self,
        organization_id: &str,
        update: OrganizationUpdate,
    ) -> Result<Organization>;
    async fn delete(&self, organization_id: &str) -> Result<usize>;
}

#[async_trait]
pub trait OrganizationServiceTrait: Send + Sync {
    fn get_organization(&self, actor: &Actor, organization_id: &str) -> Result<Organization>;
    fn list_organizations(
        &self,
        actor: &Actor,
        filter: OrganizationFilter,
        page: PageRequest,
    ) -> Result<Paginated<Organization>>;
    async fn create_organization(
        &self,
        actor: &Actor,
        new_organization: NewOrganization,
    ) -> Result<Organization>;
    async fn update_organization(
        &self,
        actor: &Actor,
        organization_id: &str,
        update: OrganizationUpdate,
    ) -> Result<Organization>;
    async fn delete_organization(&self, actor: &Actor, organization_id: &str) -> Result<()>;
}
