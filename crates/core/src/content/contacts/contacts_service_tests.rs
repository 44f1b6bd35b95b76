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
struct MockContactRepository {
    contacts: Mutex<Vec<Contact>>,
    status_writes: Mutex<usize>,
}

#[async_trait]
impl ContactRepositoryTrait for MockContactRepository {
    fn get_by_id(&self, contact_id: &str) -> Result<Contact> {
        self.contacts
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == contact_id)
            .cloned()
            .ok_or_else(|| Error::not_found("Contact", contact_id))
    }

    fn list(&self, filter: &ContactFilter, page: PageRequest) -> Result<Paginated<Contact>> {
        let mut contacts: Vec<Contact> = self
            .contacts
            .lock()
            .unwrap()
            .iter()
            .filter(|c| filter.status.map_or(true, |s| c.status == s))
            .cloned()
            .collect();
        contacts.reverse();
        Ok(Paginated::from_vec(contacts, page))
    }

    async fn create(&self, new_contact: NewContact) -> Result<Contact> {
        let now = Utc::now().naive_utc();
        let mut contacts = self.contacts.lock().unwrap();
        let contact = Contact {
            id: format!("contact-{}", contacts.len() + 1),
            name: new_contact.name,
            email: new_contact.email,
            phone: new_contact.phone,
            subject: new_contact.subject,
            message: new_contact.message,
            status: ContactStatus::New,
            created_at: now,
            updated_at: now,
        };
        contacts.push(contact.clone());
        Ok(contact)
    }

    async fn set_status(&self, contact_id: &str, status: ContactStatus) -> Result<Contact> {
        *self.status_writes.lock().unwrap() += 1;
        let mut contacts = self.contacts.lock().unwrap();
        let contact = contacts
            .iter_mut()
            .find(|c| c.id == contact_id)
            .ok_or_else(|| Error::not_found("Contact", contact_id))?;
        contact.status = status;
        Ok(contact.clone())
    }

    async fn delete(&self, contact_id: &str) -> Result<usize> {
        let mut contacts = self.contacts.lock().unwrap();
        let before = contacts.len();
        contacts.retain(|c| c.id != contact_id);
        Ok(before - contacts.len())
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn admin() -> Actor {
    Actor::new("admin-1", Role::Admin, None)
}

fn message(email: &str) -> NewContact {
    NewContact {
        name: "Luis".to_string(),
        email: email.to_string(),
        phone: None,
        subject: Some("Membership".to_string()),
        message: "How do I join the cooperative?".to_string(),
    }
}

fn setup() -> (Arc<MockContactRepository>, ContactService) {
    let repo = Arc::new(MockContactRepository::default());
    (repo.clone(), ContactService::new(repo))
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_submission_starts_new_and_inbox_needs_admin() {
    let (_, service) = setup();
    let contact = service
        .submit_contact(message("luis@example.com"))
        .await
        .unwrap();
    assert_eq!(contact.status, ContactStatus::New);

    let agent = Actor::new("agent-1", Role::Agent, None);
    assert!(matches!(
        service.list_contacts(&agent, ContactFilter::default(), PageRequest::default()),
        Err(Error::PermissionDenied(_))
    ));
    assert!(matches!(
        service.get_contact(&agent, &contact.id),
        Err(Error::PermissionDenied(_))
    ));
    let inbox = service
        .list_contacts(&admin(), ContactFilter::default(), PageRequest::default())
        .unwrap();
    assert_eq!(inbox.total, 1);
}

#[tokio::test]
async fn test_invalid_submission_collects_field_errors() {
    let (repo, service) = setup();
    let mut input = message("not-an-email");
    input.message = String::new();

    match service.submit_contact(input).await {
        Err(Error::Validation(crate::errors::ValidationError::Fields(fields))) => {
            assert!(fields.contains("email"));
            assert!(fields.contains("message"));
        }
        other => panic!("expected field errors, got {other:?}"),
    }
    assert!(repo.contacts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_status_update_only_writes_on_change() {
    let (repo, service) = setup();
    let contact = service
        .submit_contact(message("ana@example.com"))
        .await
        .unwrap();

    let read = service
        .update_contact(
            &admin(),
            &contact.id,
            ContactUpdate {
                status: Some(ContactStatus::Read),
            },
        )
        .await
        .unwrap();
    assert_eq!(read.status, ContactStatus::Read);

    service
        .update_contact(
            &admin(),
            &contact.id,
            ContactUpdate {
                status: Some(ContactStatus::Read),
            },
        )
        .await
        .unwrap();
    service
        .update_contact(&admin(), &contact.id, ContactUpdate::default())
        .await
        .unwrap();
    assert_eq!(*repo.status_writes.lock().unwrap(), 1);

    let unread = service
        .list_contacts(
            &admin(),
            ContactFilter {
                status: Some(ContactStatus::New),
                ..Default::default()
            },
            PageRequest::default(),
        )
        .unwrap();
    assert_eq!(unread.total, 0);
}
