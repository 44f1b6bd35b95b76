use async_trait::async_trait;
use log::info;
use std::sync::Arc;

use super::users_model::{
    CustomerProfile, CustomerProfileFilter, CustomerProfileUpdate, NewCustomerProfile,
    ProfileRank, ProfileStanding,
};
use super::users_traits::{
    CustomerProfileRepositoryTrait, CustomerProfileServiceTrait, UserRepositoryTrait,
};
use crate::access::{Actor, OrganizationScope, Role};
use crate::errors::{Error, Result};
use crate::pagination::{PageRequest, Paginated};
use crate::ranking::{dense_rank, Ranked};

pub struct CustomerProfileService {
    repository: Arc<dyn CustomerProfileRepositoryTrait>,
    users: Arc<dyn UserRepositoryTrait>,
}

impl CustomerProfileService {
    pub fn new(
        repository: Arc<dyn CustomerProfileRepositoryTrait>,
        users: Arc<dyn UserRepositoryTrait>,
    ) -> Self {
        Self { repository, users }
    }

    fn ensure_visible(actor: &Actor, profile: &CustomerProfile) -> Result<()> {
        if actor.user_id == profile.user_id {
            return Ok(());
        }
        actor.require_in_organization(&profile.organization_id, Role::Agent)
    }

    fn ensure_single_active(&self, user_id: &str, organization_id: &str, except_id: Option<&str>) -> Result<()> {
        match self.repository.find_active(user_id, organization_id)? {
            Some(existing) if Some(existing.id.as_str()) != except_id => {
                Err(Error::ConstraintViolation(format!(
                    "User '{}' already has an active profile in organization '{}'",
                    user_id, organization_id
                )))
            }
            _ => Ok(()),
        }
    }

    fn standings(&self, organization_id: &str) -> Result<Vec<Ranked<ProfileStanding>>> {
        let profiles = self.repository.list_active_by_points(organization_id)?;
        let standings = profiles
            .into_iter()
            .map(|p| ProfileStanding {
                profile_id: p.id,
                user_id: p.user_id,
                points_total: p.points_total,
            })
            .collect();
        Ok(dense_rank(standings, |s: &ProfileStanding| s.points_total))
    }
}

#[async_trait]
impl CustomerProfileServiceTrait for CustomerProfileService {
    fn get_profile(&self, actor: &Actor, profile_id: &str) -> Result<CustomerProfile> {
        let profile = self.repository.get_by_id(profile_id)?;
        Self::ensure_visible(actor, &profile)?;
        Ok(profile)
    }

    fn list_profiles(
        &self,
        actor: &Actor,
        mut filter: CustomerProfileFilter,
        page: PageRequest,
    ) -> Result<Paginated<CustomerProfile>> {
        if !actor.has_role(Role::Agent) {
            filter.user_id = Some(actor.user_id.clone());
        } else {
            match actor.organization_scope() {
                OrganizationScope::All => {}
                OrganizationScope::Only(org) => filter.organization_id = Some(org),
                OrganizationScope::Nothing => return Ok(Paginated::new(Vec::new(), 0, page)),
            }
        }
        self.repository.list(&filter, page)
    }

    async fn create_profile(
        &self,
        actor: &Actor,
        new_profile: NewCustomerProfile,
    ) -> Result<CustomerProfile> {
        new_profile.validate()?;
        actor.require_in_organization(&new_profile.organization_id, Role::Agent)?;
        self.users.get_by_id(&new_profile.user_id)?;
        if new_profile.is_active {
            self.ensure_single_active(&new_profile.user_id, &new_profile.organization_id, None)?;
        }
        let created = self.repository.create(new_profile).await?;
        info!(
            "Created customer profile {} for user {} in organization {}",
            created.id, created.user_id, created.organization_id
        );
        Ok(created)
    }

    async fn update_profile(
        &self,
        actor: &Actor,
        profile_id: &str,
        update: CustomerProfileUpdate,
    ) -> Result<CustomerProfile> {
        let profile = self.repository.get_by_id(profile_id)?;
        actor.require_in_organization(&profile.organization_id, Role::Agent)?;
        update.validate()?;
        if update.is_active == Some(true) && !profile.is_active {
            self.ensure_single_active(&profile.user_id, &profile.organization_id, Some(profile_id))?;
        }
        self.repository.update(profile_id, update).await
    }

    async fn delete_profile(&self, actor: &Actor, profile_id: &str) -> Result<()> {
        let profile = self.repository.get_by_id(profile_id)?;
        actor.require_in_organization(&profile.organization_id, Role::Admin)?;
        self.repository.delete(profile_id).await?;
        Ok(())
    }

    fn profile_rank(&self, actor: &Actor, profile_id: &str) -> Result<ProfileRank> {
        let profile = self.repository.get_by_id(profile_id)?;
        Self::ensure_visible(actor, &profile)?;
        if !profile.is_active {
            return Err(Error::ConstraintViolation(
                "Inactive profiles are not ranked".to_string(),
            ));
        }
        let standings = self.standings(&profile.organization_id)?;
        let rank = standings
            .iter()
            .find(|r| r.item.profile_id == profile.id)
            .map(|r| r.rank)
            .ok_or_else(|| Error::Unexpected(format!("Profile '{}' missing from ranking", profile.id)))?;
        Ok(ProfileRank {
            profile_id: profile.id,
            organization_id: profile.organization_id,
            points_total: profile.points_total,
            rank,
            total_members: standings.len(),
        })
    }

    fn organization_leaderboard(
        &self,
        actor: &Actor,
        organization_id: &str,
    ) -> Result<Vec<Ranked<ProfileStanding>>> {
        actor.require_in_organization(organization_id, Role::Customer)?;
        self.standings(organization_id)
    }
}
