use async_trait::async_trait;

use super::social_links_model::{NewSocialLink, SocialLink, SocialLinkFilter, SocialLinkUpdate};
use crate::access::Actor;
use crate::errors::Result;
use crate::pagination::{PageRequest, Paginated};

#[async_trait]
pub trait SocialLinkRepositoryTrait: Send + Sync {
    fn get_by_id(&self, link_id: &str) -> Result<SocialLink>;
    /// Ordered by position.
    fn list(&self, filter: &SocialLinkFilter, page: PageRequest) -> Result<Paginated<SocialLink>>;
    async fn create(&self, new_link: NewSocialLink) -> Result<SocialLink>;
    async fn update(&self, link: SocialLink) -> Result<SocialLink>;
    async fn delete(&self, link_id: &str) -> Result<usize>;
}

#[async_trait]
pub trait SocialLinkServiceTrait: Send + Sync {
    fn get_social_link(&self, actor: Option<&Actor>, link_id: &str) -> Result<SocialLink>;
    fn list_social_links(
        &self,
        actor: Option<&Actor>,
        filter: SocialLinkFilter,
        page: PageRequest,
    ) -> Result<Paginated<SocialLink>>;
    async fn create_social_link(&self, actor: &Actor, new_link: NewSocialLink)
        -> Result<SocialLink>;
    async fn update_social_link(
        &self,
        actor: &Actor,
        link_id: &str,
        update: SocialLinkUpdate,
    ) -> Result<SocialLink>;
    async fn delete_social_link(&self, actor: &Actor, link_id: &str) -> Result<()>;
}
