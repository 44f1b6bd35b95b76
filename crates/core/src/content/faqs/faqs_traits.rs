use async_trait::async_trait;

use super::faqs_model::{Faq, FaqFeedback, FaqFilter, FaqUpdate, NewFaq};
use crate::access::Actor;
use crate::errors::Result;
use crate::pagination::{PageRequest, Paginated};

#[async_trait]
pub trait FaqRepositoryTrait: Send + Sync {
    fn get_by_id(&self, faq_id: &str) -> Result<Faq>;
    /// Ordered by position.
    fn list(&self, filter: &FaqFilter, page: PageRequest) -> Result<Paginated<Faq>>;
    async fn create(&self, new_faq: NewFaq) -> Result<Faq>;
    async fn update(&self, faq: Faq) -> Result<Faq>;
    async fn delete(&self, faq_id: &str) -> Result<usize>;
    /// Increments one of the vote counters in place.
    async fn record_feedback(&self, faq_id: &str, helpful: bool) -> Result<Faq>;
}

#[async_trait]
pub trait FaqServiceTrait: Send + Sync {
    fn get_faq(&self, actor: Option<&Actor>, faq_id: &str) -> Result<Faq>;
    fn list_faqs(
        &self,
        actor: Option<&Actor>,
        filter: FaqFilter,
        page: PageRequest,
    ) -> Result<Paginated<Faq>>;
    async fn create_faq(&self, actor: &Actor, new_faq: NewFaq) -> Result<Faq>;
    async fn update_faq(&self, actor: &Actor, faq_id: &str, update: FaqUpdate) -> Result<Faq>;
    async fn delete_faq(&self, actor: &Actor, faq_id: &str) -> Result<()>;
    async fn record_feedback(&self, faq_id: &str, feedback: FaqFeedback) -> Result<Faq>;
}
