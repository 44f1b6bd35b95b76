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
struct MockSocialLinkRepository {
    links: Mutex<Vec<SocialLink>>,
}

#[async_trait]
impl SocialLinkRepositoryTrait for MockSocialLinkRepository {
    fn get_by_id(&self, link_id: &str) -> Result<SocialLink> {
        self.links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.id == link_id)
            .cloned()
            .ok_or_else(|| Error::not_found("Social link", link_id))
    }

    fn list(&self, filter: &SocialLinkFilter, page: PageRequest) -> Result<Paginated<SocialLink>> {
        let mut links: Vec<SocialLink> = self
            .links
            .lock()
            .unwrap()
            .iter()
            .filter(|l| filter.is_active.map_or(true, |a| l.is_active == a))
            .cloned()
            .collect();
        links.sort_by_key(|l| l.position);
        Ok(Paginated::from_vec(links, page))
    }

    async fn create(&self, new_link: NewSocialLink) -> Result<SocialLink> {
        let now = Utc::now().naive_utc();
        let mut links = self.links.lock().unwrap();
        let link = SocialLink {
            id: format!("link-{}", links.len() + 1),
            platform: new_link.platform,
            url: new_link.url,
            icon: new_link.icon,
            position: new_link.position,
            is_active: new_link.is_active,
            created_at: now,
            updated_at: now,
        };
        links.push(link.clone());
        Ok(link)
    }

    async fn update(&self, link: SocialLink) -> Result<SocialLink> {
        let mut links = self.links.lock().unwrap();
        if let Some(existing) = links.iter_mut().find(|l| l.id == link.id) {
            *existing = link.clone();
        }
        Ok(link)
    }

    async fn delete(&self, link_id: &str) -> Result<usize> {
        let mut links = self.links.lock().unwrap();
        let before = links.len();
        links.retain(|l| l.id != link_id);
        Ok(before - links.len())
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn admin() -> Actor {
    Actor::new("admin-1", Role::Admin, None)
}

fn new_link(platform: &str, position: i32, is_active: bool) -> NewSocialLink {
    NewSocialLink {
        platform: platform.to_string(),
        url: format!("https://{}.example/energycoop", platform),
        icon: None,
        position,
        is_active,
    }
}

fn setup() -> SocialLinkService {
    SocialLinkService::new(Arc::new(MockSocialLinkRepository::default()))
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_inactive_link_is_not_found_for_anonymous_callers() {
    let service = setup();
    let hidden = service
        .create_social_link(&admin(), new_link("myspace", 2, false))
        .await
        .unwrap();
    service
        .create_social_link(&admin(), new_link("mastodon", 1, true))
        .await
        .unwrap();
    service
        .create_social_link(&admin(), new_link("linkedin", 0, true))
        .await
        .unwrap();

    assert!(matches!(
        service.get_social_link(None, &hidden.id),
        Err(Error::NotFound(_))
    ));
    assert!(service.get_social_link(Some(&admin()), &hidden.id).is_ok());

    let public = service
        .list_social_links(None, SocialLinkFilter::default(), PageRequest::default())
        .unwrap();
    let platforms: Vec<&str> = public.items.iter().map(|l| l.platform.as_str()).collect();
    assert_eq!(platforms, vec!["linkedin", "mastodon"]);
}

#[tokio::test]
async fn test_only_admins_manage_links() {
    let service = setup();
    let customer = Actor::new("user-1", Role::Customer, None);
    let result = service
        .create_social_link(&customer, new_link("mastodon", 0, true))
        .await;
    assert!(matches!(result, Err(Error::PermissionDenied(_))));

    let link = service
        .create_social_link(&admin(), new_link("mastodon", 0, true))
        .await
        .unwrap();
    let result = service.delete_social_link(&customer, &link.id).await;
    assert!(matches!(result, Err(Error::PermissionDenied(_))));
    service.delete_social_link(&admin(), &link.id).await.unwrap();
    assert!(service
        .get_social_link(Some(&admin()), &link.id)
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn test_url_must_be_http() {
    let service = setup();
    let mut input = new_link("mastodon", 0, true);
    input.url = "ftp://files.example".to_string();
    let result = service.create_social_link(&admin(), input).await;
    assert!(matches!(result, Err(Error::Validation(_))));
}
