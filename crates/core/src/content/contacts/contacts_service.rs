use async_trait::async_trait;
use log::info;
use std::sync::Arc;

use super::contacts_model::{Contact, ContactFilter, ContactUpdate, NewContact};
use super::contacts_traits::{ContactRepositoryTrait, ContactServiceTrait};
use crate::access::{Actor, Role};
use crate::errors::Result;
use crate::pagination::{PageRequest, Paginated};

pub struct ContactService {
    repository: Arc<dyn ContactRepositoryTrait>,
}

impl ContactService {
    pub fn new(repository: Arc<dyn ContactRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl ContactServiceTrait for ContactService {
    fn get_contact(&self, actor: &Actor, contact_id: &str) -> Result<Contact> {
        actor.require(Role::Admin)?;
        self.repository.get_by_id(contact_id)
    }

    fn list_contacts(
        &self,
        actor: &Actor,
        filter: ContactFilter,
        page: PageRequest,
    ) -> Result<Paginated<Contact>> {
        actor.require(Role::Admin)?;
        self.repository.list(&filter, page)
    }

    async fn submit_contact(&self, new_contact: NewContact) -> Result<Contact> {
        new_contact.validate()?;
        let created = self.repository.create(new_contact).await?;
        info!("Received contact message {}", created.id);
        Ok(created)
    }

    async fn update_contact(
        &self,
        actor: &Actor,
        contact_id: &str,
        update: ContactUpdate,
    ) -> Result<Contact> {
        actor.require(Role::Admin)?;
        let contact = self.repository.get_by_id(contact_id)?;
        match update.status {
            Some(status) if status != contact.status => {
                self.repository.set_status(contact_id, status).await
            }
            _ => Ok(contact),
        }
    }

    async fn delete_contact(&self, actor: &Actor, contact_id: &str) -> Result<()> {
        actor.require(Role::Admin)?;
        self.repository.get_by_id(contact_id)?;
        self.repository.delete(contact_id).await?;
        Ok(())
    }
}
