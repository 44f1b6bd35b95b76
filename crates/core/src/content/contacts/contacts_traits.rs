use async_trait::async_trait;

use super::contacts_model::{Contact, ContactFilter, ContactStatus, ContactUpdate, NewContact};
use crate::access::Actor;
use crate::errors::Result;
use crate::pagination::{PageRequest, Paginated};

#[async_trait]
pub trait ContactRepositoryTrait: Send + Sync {
    fn get_by_id(&self, contact_id: &str) -> Result<Contact>;
    /// Newest first.
    fn list(&self, filter: &ContactFilter, page: PageRequest) -> Result<Paginated<Contact>>;
    async fn create(&self, new_contact: NewContact) -> Result<Contact>;
    async fn set_status(&self, contact_id: &str, status: ContactStatus) -> Result<Contact>;
    async fn delete(&self, contact_id: &str) -> Result<usize>;
}

#[async_trait]
pub trait ContactServiceTrait: Send + Sync {
    fn get_contact(&self, actor: &Actor, contact_id: &str) -> Result<Contact>;
    fn list_contacts(
        &self,
        actor: &Actor,
        filter: ContactFilter,
        page: PageRequest,
    ) -> Result<Paginated<Contact>>;
    /// Public contact form submission.
    async fn submit_contact(&self, new_contact: NewContact) -> Result<Contact>;
    async fn update_contact(
        &self,
        actor: &Actor,
        contact_id: &str,
        update: ContactUpdate,
    ) -> Result<Contact>;
    async fn delete_contact(&self, actor: &Actor, contact_id: &str) -> Result<()>;
}
