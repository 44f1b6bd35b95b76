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
struct MockCollaboratorRepository {
    collaborators: Mutex<Vec<Collaborator>>,
}

#[async_trait]
impl CollaboratorRepositoryTrait for MockCollaboratorRepository {
    fn get_by_id(&self, collaborator_id: &str) -> Result<Collaborator> {
        self.collaborators
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == collaborator_id)
            .cloned()
            .ok_or_else(|| Error::not_found("Collaborator", collaborator_id))
    }

    fn list(
        &self,
        filter: &CollaboratorFilter,
        page: PageRequest,
    ) -> Result<Paginated<Collaborator>> {
        let items: Vec<Collaborator> = self
            .collaborators
            .lock()
            .unwrap()
            .iter()
            .filter(|c| filter.is_active.map_or(true, |a| c.is_active == a))
            .filter(|c| {
                filter
                    .collaborator_type
                    .map_or(true, |t| c.collaborator_type == t)
            })
            .cloned()
            .collect();
        Ok(Paginated::from_vec(items, page))
    }

    async fn create(&self, new_collaborator: NewCollaborator) -> Result<Collaborator> {
        let now = Utc::now().naive_utc();
        let mut collaborators = self.collaborators.lock().unwrap();
        let collaborator = Collaborator {
            id: format!("collaborator-{}", collaborators.len() + 1),
            name: new_collaborator.name,
            logo_url: new_collaborator.logo_url,
            website: new_collaborator.website,
            collaborator_type: new_collaborator.collaborator_type,
            position: new_collaborator.position,
            is_active: new_collaborator.is_active,
            created_at: now,
            updated_at: now,
        };
        collaborators.push(collaborator.clone());
        Ok(collaborator)
    }

    async fn update(&self, collaborator: Collaborator) -> Result<Collaborator> {
        let mut collaborators = self.collaborators.lock().unwrap();
        if let Some(existing) = collaborators.iter_mut().find(|c| c.id == collaborator.id) {
            *existing = collaborator.clone();
        }
        Ok(collaborator)
    }

    async fn delete(&self, collaborator_id: &str) -> Result<usize> {
        let mut collaborators = self.collaborators.lock().unwrap();
        let before = collaborators.len();
        collaborators.retain(|c| c.id != collaborator_id);
        Ok(before - collaborators.len())
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn admin() -> Actor {
    Actor::new("admin-1", Role::Admin, None)
}

fn new_collaborator(name: &str, kind: CollaboratorType, is_active: bool) -> NewCollaborator {
    NewCollaborator {
        name: name.to_string(),
        logo_url: Some("https://cdn.energycoop.test/logo.png".to_string()),
        website: None,
        collaborator_type: kind,
        position: 0,
        is_active,
    }
}

fn setup() -> CollaboratorService {
    CollaboratorService::new(Arc::new(MockCollaboratorRepository::default()))
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_inactive_collaborator_is_hidden_from_readers() {
    let service = setup();
    let retired = service
        .create_collaborator(
            &admin(),
            new_collaborator("Old Sponsor", CollaboratorType::Sponsor, false),
        )
        .await
        .unwrap();
    service
        .create_collaborator(
            &admin(),
            new_collaborator("Green Bank", CollaboratorType::Partner, true),
        )
        .await
        .unwrap();

    assert!(matches!(
        service.get_collaborator(None, &retired.id),
        Err(Error::NotFound(_))
    ));
    assert!(service.get_collaborator(Some(&admin()), &retired.id).is_ok());

    let public = service
        .list_collaborators(
            None,
            CollaboratorFilter {
                is_active: Some(false),
                ..Default::default()
            },
            PageRequest::default(),
        )
        .unwrap();
    assert_eq!(public.total, 1);
    assert_eq!(public.items[0].name, "Green Bank");
}

#[tokio::test]
async fn test_deactivating_hides_an_existing_collaborator() {
    let service = setup();
    let partner = service
        .create_collaborator(
            &admin(),
            new_collaborator("City Council", CollaboratorType::Institution, true),
        )
        .await
        .unwrap();
    assert!(service.get_collaborator(None, &partner.id).is_ok());

    service
        .update_collaborator(
            &admin(),
            &partner.id,
            CollaboratorUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(service.get_collaborator(None, &partner.id).unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_invalid_website_is_rejected() {
    let service = setup();
    let mut input = new_collaborator("Solar Parts", CollaboratorType::Supplier, true);
    input.website = Some("not a url".to_string());
    let result = service.create_collaborator(&admin(), input).await;
    assert!(matches!(result, Err(Error::Validation(_))));
}
