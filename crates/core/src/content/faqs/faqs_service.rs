use async_trait::async_trait;
use std::sync::Arc;

use super::faqs_model::{Faq, FaqFeedback, FaqFilter, FaqUpdate, NewFaq};
use super::faqs_traits::{FaqRepositoryTrait, FaqServiceTrait};
use crate::access::{is_editor, Actor, Role};
use crate::errors::{Error, Result};
use crate::pagination::{PageRequest, Paginated};

pub struct FaqService {
    repository: Arc<dyn FaqRepositoryTrait>,
}

impl FaqService {
    pub fn new(repository: Arc<dyn FaqRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl FaqServiceTrait for FaqService {
    fn get_faq(&self, actor: Option<&Actor>, faq_id: &str) -> Result<Faq> {
        let faq = self.repository.get_by_id(faq_id)?;
        if !faq.is_active && !is_editor(actor) {
            return Err(Error::not_found("FAQ", faq_id));
        }
        Ok(faq)
    }

    fn list_faqs(
        &self,
        actor: Option<&Actor>,
        mut filter: FaqFilter,
        page: PageRequest,
    ) -> Result<Paginated<Faq>> {
        if !is_editor(actor) {
            filter.is_active = Some(true);
        }
        self.repository.list(&filter, page)
    }

    async fn create_faq(&self, actor: &Actor, new_faq: NewFaq) -> Result<Faq> {
        actor.require(Role::Admin)?;
        new_faq.validate()?;
        self.repository.create(new_faq).await
    }

    async fn update_faq(&self, actor: &Actor, faq_id: &str, update: FaqUpdate) -> Result<Faq> {
        actor.require(Role::Admin)?;
        let mut faq = self.repository.get_by_id(faq_id)?;
        faq.apply(update);
        faq.validate()?;
        self.repository.update(faq).await
    }

    async fn delete_faq(&self, actor: &Actor, faq_id: &str) -> Result<()> {
        actor.require(Role::Admin)?;
        self.repository.get_by_id(faq_id)?;
        self.repository.delete(faq_id).await?;
        Ok(())
    }

    /// Public: anyone may vote on a visible FAQ.
    async fn record_feedback(&self, faq_id: &str, feedback: FaqFeedback) -> Result<Faq> {
        self.get_faq(None, faq_id)?;
        self.repository.record_feedback(faq_id, feedback.helpful).await
    }
}
