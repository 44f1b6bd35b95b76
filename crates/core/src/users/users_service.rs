use async_trait::async_trait;
use log::{debug, info};
use std::sync::Arc;

use super::users_model::{
    NewUser, NewUserRecord, User, UserChangeset, UserFilter, UserUpdate,
};
use super::users_traits::{PasswordHasherTrait, UserRepositoryTrait, UserServiceTrait};
use crate::access::{Actor, OrganizationScope, Role};
use crate::errors::{Error, Result};
use crate::pagination::{PageRequest, Paginated};
use crate::validation::FieldErrors;

pub struct UserService {
    repository: Arc<dyn UserRepositoryTrait>,
    hasher: Arc<dyn PasswordHasherTrait>,
}

impl UserService {
    pub fn new(
        repository: Arc<dyn UserRepositoryTrait>,
        hasher: Arc<dyn PasswordHasherTrait>,
    ) -> Self {
        Self { repository, hasher }
    }

    fn ensure_email_free(&self, email: &str, except_id: Option<&str>) -> Result<()> {
        match self.repository.find_credentials_by_email(email)? {
            Some(existing) if Some(existing.user.id.as_str()) != except_id => {
                let mut errors = FieldErrors::default();
                errors.add("email", "The email has already been taken.");
                Err(errors.into())
            }
            _ => Ok(()),
        }
    }

    /// Callers may only hand out roles up to their own.
    fn ensure_can_grant(actor: &Actor, role: Role) -> Result<()> {
        if role > actor.role {
            return Err(Error::PermissionDenied(format!(
                "You cannot grant the '{}' role",
                role
            )));
        }
        Ok(())
    }

    /// Staff may manage a user when the user sits in an organization they can see.
    fn ensure_manages(actor: &Actor, user: &User, minimum: Role) -> Result<()> {
        actor.require(minimum)?;
        match (&user.organization_id, actor.organization_scope()) {
            (_, OrganizationScope::All) => Ok(()),
            (Some(org), _) => actor.require_in_organization(org, minimum),
            (None, _) => Err(Error::PermissionDenied(
                "The user does not belong to your organization".to_string(),
            )),
        }
    }
}

#[async_trait]
impl UserServiceTrait for UserService {
    fn get_user(&self, actor: &Actor, user_id: &str) -> Result<User> {
        let user = self.repository.get_by_id(user_id)?;
        if actor.user_id != user.id {
            Self::ensure_manages(actor, &user, Role::Agent)?;
        }
        Ok(user)
    }

    fn list_users(
        &self,
        actor: &Actor,
        mut filter: UserFilter,
        page: PageRequest,
    ) -> Result<Paginated<User>> {
        actor.require(Role::Agent)?;
        match actor.organization_scope() {
            OrganizationScope::All => {}
            OrganizationScope::Only(org) => filter.organization_id = Some(org),
            OrganizationScope::Nothing => return Ok(Paginated::new(Vec::new(), 0, page)),
        }
        self.repository.list(&filter, page)
    }

    async fn create_user(&self, actor: &Actor, new_user: NewUser) -> Result<User> {
        actor.require(Role::Admin)?;
        new_user.validate()?;
        Self::ensure_can_grant(actor, new_user.role)?;

        let organization_id = match actor.organization_scope() {
            OrganizationScope::All => new_user.organization_id.clone(),
            _ => {
                let org = new_user
                    .organization_id
                    .clone()
                    .or_else(|| actor.organization_id.clone());
                if let Some(org) = &org {
                    actor.require_in_organization(org, Role::Admin)?;
                }
                org
            }
        };
        self.ensure_email_free(&new_user.email, None)?;

        let record = NewUserRecord {
            name: new_user.name,
            email: new_user.email.to_lowercase(),
            password_hash: self.hasher.hash(&new_user.password)?,
            role: new_user.role,
            organization_id,
        };
        let created = self.repository.create(record).await?;
        info!("Created user {} with role {}", created.id, created.role);
        Ok(created)
    }

    async fn update_user(&self, actor: &Actor, user_id: &str, update: UserUpdate) -> Result<User> {
        let user = self.repository.get_by_id(user_id)?;
        if actor.user_id != user.id || update.is_privileged() {
            Self::ensure_manages(actor, &user, Role::Admin)?;
        }
        update.validate()?;
        if let Some(role) = update.role {
            Self::ensure_can_grant(actor, role)?;
        }
        if let Some(org) = &update.organization_id {
            actor.require_in_organization(org, Role::Admin)?;
        }
        if let Some(email) = &update.email {
            self.ensure_email_free(email, Some(user_id))?;
        }

        let password_hash = match &update.password {
            Some(password) => Some(self.hasher.hash(password)?),
            None => None,
        };
        let changes = UserChangeset {
            name: update.name,
            email: update.email.map(|e| e.to_lowercase()),
            password_hash,
            role: update.role,
            organization_id: update.organization_id,
        };
        self.repository.update(user_id, changes).await
    }

    async fn delete_user(&self, actor: &Actor, user_id: &str) -> Result<()> {
        if actor.user_id == user_id {
            return Err(Error::ConstraintViolation(
                "You cannot delete your own account".to_string(),
            ));
        }
        let user = self.repository.get_by_id(user_id)?;
        Self::ensure_manages(actor, &user, Role::Admin)?;
        self.repository.delete(user_id).await?;
        info!("Deleted user {}", user_id);
        Ok(())
    }

    fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>> {
        let Some(credentials) = self
            .repository
            .find_credentials_by_email(&email.to_lowercase())?
        else {
            debug!("Login attempt for unknown email");
            return Ok(None);
        };
        if self.hasher.verify(password, &credentials.password_hash)? {
            Ok(Some(credentials.user))
        } else {
            Ok(None)
        }
    }

    async fn ensure_super_admin(&self, name: &str, email: &str, password: &str) -> Result<User> {
        let email = email.to_lowercase();
        if let Some(existing) = self.repository.find_credentials_by_email(&email)? {
            debug!("Bootstrap administrator {} already exists", existing.user.id);
            return Ok(existing.user);
        }
        let record = NewUserRecord {
            name: name.to_string(),
            email,
            password_hash: self.hasher.hash(password)?,
            role: Role::SuperAdmin,
            organization_id: None,
        };
        let created = self.repository.create(record).await?;
        info!("Bootstrapped super-admin {}", created.id);
        Ok(created)
    }
}
