use async_trait::async_trait;
use log::info;
use std::sync::Arc;

use super::organizations_model::{
    NewOrganization, Organization, OrganizationFilter, OrganizationUpdate,
};
use super::organizations_traits::{OrganizationRepositoryTrait, OrganizationServiceTrait};
use crate::access::{Actor, OrganizationScope, Role};
use crate::errors::{Error, Result};
use crate::pagination::{PageRequest, Paginated};
use crate::validation::FieldErrors;

pub struct OrganizationService {
    repository: Arc<dyn OrganizationRepositoryTrait>,
}

impl OrganizationService {
    pub fn new(repository: Arc<dyn OrganizationRepositoryTrait>) -> Self {
        Self { repository }
    }

    fn ensure_slug_free(&self, slug: &str, except_id: Option<&str>) -> Result<()> {
        match self.repository.find_by_slug(slug)? {
            Some(existing) if Some(existing.id.as_str()) != except_id => {
                let mut errors = FieldErrors::default();
                errors.add("slug", "The slug has already been taken.");
                Err(errors.into())
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl OrganizationServiceTrait for OrganizationService {
    fn get_organization(&self, actor: &Actor, organization_id: &str) -> Result<Organization> {
        actor.require_in_organization(organization_id, Role::Customer)?;
        self.repository.get_by_id(organization_id)
    }

    fn list_organizations(
        &self,
        actor: &Actor,
        mut filter: OrganizationFilter,
        page: PageRequest,
    ) -> Result<Paginated<Organization>> {
        filter.ids = match actor.organization_scope() {
            OrganizationScope::All => None,
            OrganizationScope::Only(id) => Some(vec![id]),
            OrganizationScope::Nothing => return Ok(Paginated::new(Vec::new(), 0, page)),
        };
        self.repository.list(&filter, page)
    }

    async fn create_organization(
        &self,
        actor: &Actor,
        new_organization: NewOrganization,
    ) -> Result<Organization> {
        actor.require(Role::SuperAdmin)?;
        let new_organization = new_organization.normalized();
        new_organization.validate()?;
        self.ensure_slug_free(new_organization.slug(), None)?;
        let created = self.repository.create(new_organization).await?;
        info!("Created organization {} ({})", created.id, created.slug);
        Ok(created)
    }

    async fn update_organization(
        &self,
        actor: &Actor,
        organization_id: &str,
        update: OrganizationUpdate,
    ) -> Result<Organization> {
        actor.require_in_organization(organization_id, Role::Admin)?;
        update.validate()?;
        if let Some(slug) = &update.slug {
            self.ensure_slug_free(slug, Some(organization_id))?;
        }
        self.repository.update(organization_id, update).await
    }

    async fn delete_organization(&self, actor: &Actor, organization_id: &str) -> Result<()> {
        actor.require(Role::SuperAdmin)?;
        self.repository.get_by_id(organization_id)?;
        let profiles = self.repository.count_customer_profiles(organization_id)?;
        if profiles > 0 {
            return Err(Error::ConstraintViolation(format!(
                "Organization '{}' still has {} customer profile(s)",
                organization_id, profiles
            )));
        }
        self.repository.delete(organization_id).await?;
        info!("Deleted organization {}", organization_id);
        Ok(())
    }
}
