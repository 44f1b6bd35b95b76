use async_trait::async_trait;

use super::banners_model::{Banner, BannerFilter, BannerUpdate, NewBanner};
use crate::access::Actor;
use crate::errors::Result;
use crate::pagination::{PageRequest, Paginated};

#[async_trait]
pub trait BannerRepositoryTrait: Send + Sync {
    fn get_by_id(&self, banner_id: &str) -> Result<Banner>;
    /// Highest priority first.
    fn list(&self, filter: &BannerFilter, page: PageRequest) -> Result<Paginated<Banner>>;
    async fn create(&self, new_banner: NewBanner) -> Result<Banner>;
    async fn update(&self, banner: Banner) -> Result<Banner>;
    async fn delete(&self, banner_id: &str) -> Result<usize>;
}

#[async_trait]
pub trait BannerServiceTrait: Send + Sync {
    fn get_banner(&self, actor: Option<&Actor>, banner_id: &str) -> Result<Banner>;
    fn list_banners(
        &self,
        actor: Option<&Actor>,
        filter: BannerFilter,
        page: PageRequest,
    ) -> Result<Paginated<Banner>>;
    async fn create_banner(&self, actor: &Actor, new_banner: NewBanner) -> Result<Banner>;
    async fn update_banner(
        &self,
        actor: &Actor,
        banner_id: &str,
        update: BannerUpdate,
    ) -> Result<Banner>;
    async fn delete_banner(&self, actor: &Actor, banner_id: &str) -> Result<()>;
}
