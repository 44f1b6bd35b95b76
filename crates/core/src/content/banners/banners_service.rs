use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

use super::banners_model::{Banner, BannerFilter, BannerUpdate, NewBanner};
use super::banners_traits::{BannerRepositoryTrait, BannerServiceTrait};
use crate::access::{is_editor, Actor, Role};
use crate::errors::{Error, Result};
use crate::pagination::{PageRequest, Paginated};

pub struct BannerService {
    repository: Arc<dyn BannerRepositoryTrait>,
}

impl BannerService {
    pub fn new(repository: Arc<dyn BannerRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl BannerServiceTrait for BannerService {
    fn get_banner(&self, actor: Option<&Actor>, banner_id: &str) -> Result<Banner> {
        let banner = self.repository.get_by_id(banner_id)?;
        if !is_editor(actor) && !banner.is_visible_at(Utc::now().naive_utc()) {
            return Err(Error::not_found("Banner", banner_id));
        }
        Ok(banner)
    }

    fn list_banners(
        &self,
        actor: Option<&Actor>,
        mut filter: BannerFilter,
        page: PageRequest,
    ) -> Result<Paginated<Banner>> {
        if !is_editor(actor) {
            filter.is_active = Some(true);
            filter.visible_at = Some(Utc::now().naive_utc());
        }
        self.repository.list(&filter, page)
    }

    async fn create_banner(&self, actor: &Actor, new_banner: NewBanner) -> Result<Banner> {
        actor.require(Role::Admin)?;
        new_banner.validate()?;
        self.repository.create(new_banner).await
    }

    async fn update_banner(
        &self,
        actor: &Actor,
        banner_id: &str,
        update: BannerUpdate,
    ) -> Result<Banner> {
        actor.require(Role::Admin)?;
        let mut banner = self.repository.get_by_id(banner_id)?;
        banner.apply(update);
        banner.validate()?;
        self.repository.update(banner).await
    }

    async fn delete_banner(&self, actor: &Actor, banner_id: &str) -> Result<()> {
        actor.require(Role::Admin)?;
        self.repository.get_by_id(banner_id)?;
        self.repository.delete(banner_id).await?;
        Ok(())
    }
}
