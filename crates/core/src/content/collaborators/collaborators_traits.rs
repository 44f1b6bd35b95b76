use async_trait::async_trait;

use super::collaborators_model::{
    Collaborator, CollaboratorFilter, CollaboratorUpdate, NewCollaborator,
};
use crate::access::Actor;
use crate::errors::Result;
use crate::pagination::{PageRequest, Paginated};

#[async_trait]
pub trait CollaboratorRepositoryTrait: Send + Sync {
    fn get_by_id(&self, collaborator_id: &str) -> Result<Collaborator>;
    fn list(
        &self,
        filter: &CollaboratorFilter,
        page: PageRequest,
    ) -> Result<Paginated<Collaborator>>;
    async fn create(&self, new_collaborator: NewCollaborator) -> Result<Collaborator>;
    async fn update(&self, collaborator: Collaborator) -> Result<Collaborator>;
    async fn delete(&self, collaborator_id: &str) -> Result<usize>;
}

#[async_trait]
pub trait CollaboratorServiceTrait: Send + Sync {
    fn get_collaborator(&self, actor: Option<&Actor>, collaborator_id: &str)
        -> Result<Collaborator>;
    fn list_collaborators(
        &self,
        actor: Option<&Actor>,
        filter: CollaboratorFilter,
        page: PageRequest,
    ) -> Result<Paginated<Collaborator>>;
    async fn create_collaborator(
        &self,
        actor: &Actor,
        new_collaborator: NewCollaborator,
    ) -> Result<Collaborator>;
    async fn update_collaborator(
        &self,
        actor: &Actor,
        collaborator_id: &str,
        update: CollaboratorUpdate,
    ) -> Result<Collaborator>;
    async fn delete_collaborator(&self, actor: &Actor, collaborator_id: &str) -> Result<()>;
}
