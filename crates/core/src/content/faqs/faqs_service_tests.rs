use super::*;
use crate::access::{Actor, Role};
use crate::errors::{Error, Result};
use crate::pagination::{PageRequest, Paginated};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex};

// ============================================================================
// Mock Implementations
// ============================================================================

#[derive(Default)]
struct MockFaqRepository {
    faqs: Mutex<Vec<Faq>>,
}

#[async_trait]
impl FaqRepositoryTrait for MockFaqRepository {
    fn get_by_id(&self, faq_id: &str) -> Result<Faq> {
        self.faqs
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.id == faq_id)
            .cloned()
            .ok_or_else(|| Error::not_found("Faq", faq_id))
    }

    fn list(&self, filter: &FaqFilter, page: PageRequest) -> Result<Paginated<Faq>> {
        let mut faqs: Vec<Faq> = self
            .faqs
            .lock()
            .unwrap()
            .iter()
            .filter(|f| filter.is_active.map_or(true, |a| f.is_active == a))
            .filter(|f| {
                filter
                    .category
                    .as_deref()
                    .map_or(true, |c| f.category.as_deref() == Some(c))
            })
            .cloned()
            .collect();
        faqs.sort_by_key(|f| f.position);
        Ok(Paginated::from_vec(faqs, page))
    }

    async fn create(&self, new_faq: NewFaq) -> Result<Faq> {
        let now = Utc::now().naive_utc();
        let mut faqs = self.faqs.lock().unwrap();
        let faq = Faq {
            id: format!("faq-{}", faqs.len() + 1),
            question: new_faq.question,
            answer: new_faq.answer,
            category: new_faq.category,
            position: new_faq.position,
            is_active: new_faq.is_active,
            helpful_yes: 0,
            helpful_no: 0,
            created_at: now,
            updated_at: now,
        };
        faqs.push(faq.clone());
        Ok(faq)
    }

    /// Like the SQLite repository, only editable columns are written.
    async fn update(&self, faq: Faq) -> Result<Faq> {
        let mut faqs = self.faqs.lock().unwrap();
        let existing = faqs
            .iter_mut()
            .find(|f| f.id == faq.id)
            .ok_or_else(|| Error::not_found("Faq", &faq.id))?;
        existing.question = faq.question;
        existing.answer = faq.answer;
        existing.category = faq.category;
        existing.position = faq.position;
        existing.is_active = faq.is_active;
        Ok(existing.clone())
    }

    async fn delete(&self, faq_id: &str) -> Result<usize> {
        let mut faqs = self.faqs.lock().unwrap();
        let before = faqs.len();
        faqs.retain(|f| f.id != faq_id);
        Ok(before - faqs.len())
    }

    async fn record_feedback(&self, faq_id: &str, helpful: bool) -> Result<Faq> {
        let mut faqs = self.faqs.lock().unwrap();
        let faq = faqs
            .iter_mut()
            .find(|f| f.id == faq_id)
            .ok_or_else(|| Error::not_found("Faq", faq_id))?;
        if helpful {
            faq.helpful_yes += 1;
        } else {
            faq.helpful_no += 1;
        }
        Ok(faq.clone())
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn admin() -> Actor {
    Actor::new("admin-1", Role::Admin, None)
}

fn customer() -> Actor {
    Actor::new("user-1", Role::Customer, None)
}

fn new_faq(question: &str, is_active: bool) -> NewFaq {
    NewFaq {
        question: question.to_string(),
        answer: "Through your cooperative dashboard.".to_string(),
        category: Some("billing".to_string()),
        position: 0,
        is_active,
    }
}

fn setup() -> FaqService {
    FaqService::new(Arc::new(MockFaqRepository::default()))
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_feedback_increments_one_counter_per_vote() {
    let service = setup();
    let faq = service
        .create_faq(&admin(), new_faq("How are yields paid?", true))
        .await
        .unwrap();

    service
        .record_feedback(&faq.id, FaqFeedback { helpful: true })
        .await
        .unwrap();
    service
        .record_feedback(&faq.id, FaqFeedback { helpful: true })
        .await
        .unwrap();
    let voted = service
        .record_feedback(&faq.id, FaqFeedback { helpful: false })
        .await
        .unwrap();

    assert_eq!(voted.helpful_yes, 2);
    assert_eq!(voted.helpful_no, 1);
    assert_eq!(voted.helpful_rate(), rust_decimal_macros::dec!(66.67));
}

#[tokio::test]
async fn test_update_leaves_vote_counters_alone() {
    let service = setup();
    let faq = service
        .create_faq(&admin(), new_faq("Can I withdraw anytime?", true))
        .await
        .unwrap();
    service
        .record_feedback(&faq.id, FaqFeedback { helpful: false })
        .await
        .unwrap();

    let updated = service
        .update_faq(
            &admin(),
            &faq.id,
            FaqUpdate {
                answer: Some("Yes, withdrawals settle within two days.".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.answer, "Yes, withdrawals settle within two days.");
    assert_eq!(updated.helpful_yes, 0);
    assert_eq!(updated.helpful_no, 1);
}

#[tokio::test]
async fn test_inactive_faq_is_not_found_for_public_readers() {
    let service = setup();
    let hidden = service
        .create_faq(&admin(), new_faq("Internal draft", false))
        .await
        .unwrap();
    service
        .create_faq(&admin(), new_faq("Who can join?", true))
        .await
        .unwrap();

    assert!(matches!(
        service.get_faq(None, &hidden.id),
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        service.get_faq(Some(&customer()), &hidden.id),
        Err(Error::NotFound(_))
    ));
    assert!(service.get_faq(Some(&admin()), &hidden.id).is_ok());

    let public = service
        .list_faqs(None, FaqFilter::default(), PageRequest::default())
        .unwrap();
    assert_eq!(public.total, 1);
    let all = service
        .list_faqs(Some(&admin()), FaqFilter::default(), PageRequest::default())
        .unwrap();
    assert_eq!(all.total, 2);

    let vote = service
        .record_feedback(&hidden.id, FaqFeedback { helpful: true })
        .await;
    assert!(matches!(vote, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn test_customers_cannot_edit_faqs() {
    let service = setup();
    let result = service.create_faq(&customer(), new_faq("Spam?", true)).await;
    assert!(matches!(result, Err(Error::PermissionDenied(_))));

    let result = service.create_faq(&admin(), new_faq("  ", true)).await;
    assert!(matches!(result, Err(Error::Validation(_))));
}
