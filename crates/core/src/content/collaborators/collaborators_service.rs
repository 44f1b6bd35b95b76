use async_trait::async_trait;
use std::sync::Arc;

use super::collaborators_model::{
    Collaborator, CollaboratorFilter, CollaboratorUpdate, NewCollaborator,
};
use super::collaborators_traits::{CollaboratorRepositoryTrait, CollaboratorServiceTrait};
use crate::access::{is_editor, Actor, Role};
use crate::errors::{Error, Result};
use crate::pagination::{PageRequest, Paginated};

pub struct CollaboratorService {
    repository: Arc<dyn CollaboratorRepositoryTrait>,
}

impl CollaboratorService {
    pub fn new(repository: Arc<dyn CollaboratorRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl CollaboratorServiceTrait for CollaboratorService {
    fn get_collaborator(
        &self,
        actor: Option<&Actor>,
        collaborator_id: &str,
    ) -> Result<Collaborator> {
        let collaborator = self.repository.get_by_id(collaborator_id)?;
        if !collaborator.is_active && !is_editor(actor) {
            return Err(Error::not_found("Collaborator", collaborator_id));
        }
        Ok(collaborator)
    }

    fn list_collaborators(
        &self,
        actor: Option<&Actor>,
        mut filter: CollaboratorFilter,
        page: PageRequest,
    ) -> Result<Paginated<Collaborator>> {
        if !is_editor(actor) {
            filter.is_active = Some(true);
        }
        self.repository.list(&filter, page)
    }

    async fn create_collaborator(
        &self,
        actor: &Actor,
        new_collaborator: NewCollaborator,
    ) -> Result<Collaborator> {
        actor.require(Role::Admin)?;
        new_collaborator.validate()?;
        self.repository.create(new_collaborator).await
    }

    async fn update_collaborator(
        &self,
        actor: &Actor,
        collaborator_id: &str,
        update: CollaboratorUpdate,
    ) -> Result<Collaborator> {
        actor.require(Role::Admin)?;
        let mut collaborator = self.repository.get_by_id(collaborator_id)?;
        collaborator.apply(update);
        collaborator.validate()?;
        self.repository.update(collaborator).await
    }

    async fn delete_collaborator(&self, actor: &Actor, collaborator_id: &str) -> Result<()> {
        actor.require(Role::Admin)?;
        self.repository.get_by_id(collaborator_id)?;
        self.repository.delete(collaborator_id).await?;
        Ok(())
    }
}
