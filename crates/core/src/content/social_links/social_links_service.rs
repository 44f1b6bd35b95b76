use async_trait::async_trait;
use std::sync::Arc;

use super::social_links_model::{NewSocialLink, SocialLink, SocialLinkFilter, SocialLinkUpdate};
use super::social_links_traits::{SocialLinkRepositoryTrait, SocialLinkServiceTrait};
use crate::access::{is_editor, Actor, Role};
use crate::errors::{Error, Result};
use crate::pagination::{PageRequest, Paginated};

pub struct SocialLinkService {
    repository: Arc<dyn SocialLinkRepositoryTrait>,
}

impl SocialLinkService {
    pub fn new(repository: Arc<dyn SocialLinkRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl SocialLinkServiceTrait for SocialLinkService {
    fn get_social_link(&self, actor: Option<&Actor>, link_id: &str) -> Result<SocialLink> {
        let link = self.repository.get_by_id(link_id)?;
        if !link.is_active && !is_editor(actor) {
            return Err(Error::not_found("Social link", link_id));
        }
        Ok(link)
    }

    fn list_social_links(
        &self,
        actor: Option<&Actor>,
        mut filter: SocialLinkFilter,
        page: PageRequest,
    ) -> Result<Paginated<SocialLink>> {
        if !is_editor(actor) {
            filter.is_active = Some(true);
        }
        self.repository.list(&filter, page)
    }

    async fn create_social_link(
        &self,
        actor: &Actor,
        new_link: NewSocialLink,
    ) -> Result<SocialLink> {
        actor.require(Role::Admin)?;
        new_link.validate()?;
        self.repository.create(new_link).await
    }

    async fn update_social_link(
        &self,
        actor: &Actor,
        link_id: &str,
        update: SocialLinkUpdate,
    ) -> Result<SocialLink> {
        actor.require(Role::Admin)?;
        let mut link = self.repository.get_by_id(link_id)?;
        link.apply(update);
        link.validate()?;
        self.repository.update(link).await
    }

    async fn delete_social_link(&self, actor: &Actor, link_id: &str) -> Result<()> {
        actor.require(Role::Admin)?;
        self.repository.get_by_id(link_id)?;
        self.repository.delete(link_id).await?;
        Ok(())
    }
}
