//! Unit tests for user and customer profile services.

use super::*;
use crate::access::{Actor, Role};
use crate::errors::{Error, Result};
use crate::pagination::{PageRequest, Paginated};
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use std::sync::{Arc, Mutex};

// ============================================================================
// Mock Implementations
// ============================================================================

/// Stores passwords reversed so tests can tell hashes from plaintext.
struct ReversingHasher;

impl PasswordHasherTrait for ReversingHasher {
    fn hash(&self, password: &str) -> Result<String> {
        Ok(password.chars().rev().collect())
    }

    fn verify(&self, password: &str, password_hash: &str) -> Result<bool> {
        Ok(self.hash(password)? == password_hash)
    }
}

#[derive(Default)]
struct MockUserRepository {
    users: Mutex<Vec<(User, String)>>,
}

impl MockUserRepository {
    fn with_user(self, id: &str, email: &str, role: Role, org: Option<&str>) -> Self {
        let now = NaiveDateTime::default();
        self.users.lock().unwrap().push((
            User {
                id: id.to_string(),
                name: id.to_string(),
                email: email.to_string(),
                role,
                organization_id: org.map(str::to_string),
                created_at: now,
                updated_at: now,
            },
            "terces-drowssap".to_string(),
        ));
        self
    }
}

#[async_trait]
impl UserRepositoryTrait for MockUserRepository {
    fn get_by_id(&self, user_id: &str) -> Result<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|(u, _)| u.id == user_id)
            .map(|(u, _)| u.clone())
            .ok_or_else(|| Error::not_found("User", user_id))
    }

    fn find_credentials_by_email(&self, email: &str) -> Result<Option<UserCredentials>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|(u, _)| u.email == email)
            .map(|(u, h)| UserCredentials {
                user: u.clone(),
                password_hash: h.clone(),
            }))
    }

    fn list(&self, filter: &UserFilter, page: PageRequest) -> Result<Paginated<User>> {
        let users: Vec<User> = self
            .users
            .lock()
            .unwrap()
            .iter()
            .map(|(u, _)| u.clone())
            .filter(|u| {
                filter
                    .organization_id
                    .as_ref()
                    .map_or(true, |org| u.organization_id.as_ref() == Some(org))
            })
            .collect();
        Ok(Paginated::from_vec(users, page))
    }

    async fn create(&self, new_user: NewUserRecord) -> Result<User> {
        let now = Utc::now().naive_utc();
        let mut users = self.users.lock().unwrap();
        let user = User {
            id: format!("user-{}", users.len() + 1),
            name: new_user.name,
            email: new_user.email,
            role: new_user.role,
            organization_id: new_user.organization_id,
            created_at: now,
            updated_at: now,
        };
        users.push((user.clone(), new_user.password_hash));
        Ok(user)
    }

    async fn update(&self, user_id: &str, changes: UserChangeset) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        let (user, hash) = users
            .iter_mut()
            .find(|(u, _)| u.id == user_id)
            .ok_or_else(|| Error::not_found("User", user_id))?;
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        if let Some(password_hash) = changes.password_hash {
            *hash = password_hash;
        }
        Ok(user.clone())
    }

    async fn delete(&self, user_id: &str) -> Result<usize> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|(u, _)| u.id != user_id);
        Ok(before - users.len())
    }
}

#[derive(Default)]
struct MockProfileRepository {
    profiles: Mutex<Vec<CustomerProfile>>,
}

impl MockProfileRepository {
    fn with_profile(self, id: &str, user: &str, org: &str, points: i64, active: bool) -> Self {
        let now = NaiveDateTime::default();
        self.profiles.lock().unwrap().push(CustomerProfile {
            id: id.to_string(),
            user_id: user.to_string(),
            organization_id: org.to_string(),
            customer_type: CustomerType::Individual,
            supply_point: None,
            municipality_id: None,
            points_total: points,
            is_active: active,
            created_at: now,
            updated_at: now,
        });
        self
    }
}

#[async_trait]
impl CustomerProfileRepositoryTrait for MockProfileRepository {
    fn get_by_id(&self, profile_id: &str) -> Result<CustomerProfile> {
        self.profiles
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == profile_id)
            .cloned()
            .ok_or_else(|| Error::not_found("Customer profile", profile_id))
    }

    fn list(
        &self,
        _filter: &CustomerProfileFilter,
        page: PageRequest,
    ) -> Result<Paginated<CustomerProfile>> {
        Ok(Paginated::from_vec(self.profiles.lock().unwrap().clone(), page))
    }

    fn find_active(&self, user_id: &str, organization_id: &str) -> Result<Option<CustomerProfile>> {
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.user_id == user_id && p.organization_id == organization_id && p.is_active)
            .cloned())
    }

    fn list_active_by_points(&self, organization_id: &str) -> Result<Vec<CustomerProfile>> {
        let mut profiles: Vec<CustomerProfile> = self
            .profiles
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.organization_id == organization_id && p.is_active)
            .cloned()
            .collect();
        profiles.sort_by(|a, b| b.points_total.cmp(&a.points_total));
        Ok(profiles)
    }

    async fn create(&self, new_profile: NewCustomerProfile) -> Result<CustomerProfile> {
        let now = Utc::now().naive_utc();
        let mut profiles = self.profiles.lock().unwrap();
        let profile = CustomerProfile {
            id: format!("profile-{}", profiles.len() + 1),
            user_id: new_profile.user_id,
            organization_id: new_profile.organization_id,
            customer_type: new_profile.customer_type,
            supply_point: new_profile.supply_point,
            municipality_id: new_profile.municipality_id,
            points_total: 0,
            is_active: new_profile.is_active,
            created_at: now,
            updated_at: now,
        };
        profiles.push(profile.clone());
        Ok(profile)
    }

    async fn update(
        &self,
        _profile_id: &str,
        _update: CustomerProfileUpdate,
    ) -> Result<CustomerProfile> {
        unimplemented!()
    }

    async fn delete(&self, _profile_id: &str) -> Result<usize> {
        unimplemented!()
    }
}

fn admin() -> Actor {
    Actor::new("admin-1", Role::Admin, Some("org-1".to_string()))
}

fn new_user(email: &str, role: Role) -> NewUser {
    NewUser {
        name: "Member".to_string(),
        email: email.to_string(),
        password: "password-123".to_string(),
        role,
        organization_id: None,
    }
}

// ============================================================================
// User service
// ============================================================================

#[tokio::test]
async fn test_create_user_hashes_password_and_inherits_organization() {
    let repo = Arc::new(MockUserRepository::default());
    let service = UserService::new(repo.clone(), Arc::new(ReversingHasher));

    let user = service
        .create_user(&admin(), new_user("Member@Coop.example", Role::Customer))
        .await
        .unwrap();

    assert_eq!(user.email, "member@coop.example");
    assert_eq!(user.organization_id.as_deref(), Some("org-1"));
    let creds = repo
        .find_credentials_by_email("member@coop.example")
        .unwrap()
        .unwrap();
    assert_eq!(creds.password_hash, "321-drowssap");
}

#[tokio::test]
async fn test_admin_cannot_grant_super_admin() {
    let service = UserService::new(
        Arc::new(MockUserRepository::default()),
        Arc::new(ReversingHasher),
    );
    let result = service
        .create_user(&admin(), new_user("boss@coop.example", Role::SuperAdmin))
        .await;
    assert!(matches!(result, Err(Error::PermissionDenied(_))));
}

#[tokio::test]
async fn test_duplicate_email_is_a_field_error() {
    let repo = MockUserRepository::default().with_user(
        "user-1",
        "taken@coop.example",
        Role::Customer,
        Some("org-1"),
    );
    let service = UserService::new(Arc::new(repo), Arc::new(ReversingHasher));
    let result = service
        .create_user(&admin(), new_user("taken@coop.example", Role::Customer))
        .await;
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[tokio::test]
async fn test_authenticate() {
    let repo = MockUserRepository::default().with_user(
        "user-1",
        "ana@coop.example",
        Role::Customer,
        None,
    );
    let service = UserService::new(Arc::new(repo), Arc::new(ReversingHasher));

    assert!(service
        .authenticate("ANA@coop.example", "password-secret")
        .unwrap()
        .is_some());
    assert!(service
        .authenticate("ana@coop.example", "wrong")
        .unwrap()
        .is_none());
    assert!(service
        .authenticate("nobody@coop.example", "password-secret")
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_customer_cannot_escalate_own_role() {
    let repo = MockUserRepository::default().with_user(
        "user-1",
        "ana@coop.example",
        Role::Customer,
        Some("org-1"),
    );
    let service = UserService::new(Arc::new(repo), Arc::new(ReversingHasher));
    let me = Actor::new("user-1", Role::Customer, Some("org-1".to_string()));

    let renamed = service
        .update_user(
            &me,
            "user-1",
            UserUpdate {
                name: Some("Ana B.".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Ana B.");

    let escalation = service
        .update_user(
            &me,
            "user-1",
            UserUpdate {
                role: Some(Role::Admin),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(escalation, Err(Error::PermissionDenied(_))));
}

// ============================================================================
// Customer profile service
// ============================================================================

fn profile_service(profiles: MockProfileRepository) -> CustomerProfileService {
    let users = MockUserRepository::default()
        .with_user("user-1", "a@coop.example", Role::Customer, Some("org-1"))
        .with_user("user-2", "b@coop.example", Role::Customer, Some("org-1"));
    CustomerProfileService::new(Arc::new(profiles), Arc::new(users))
}

#[tokio::test]
async fn test_duplicate_active_membership_is_rejected() {
    let service = profile_service(
        MockProfileRepository::default().with_profile("profile-1", "user-1", "org-1", 0, true),
    );
    let result = service
        .create_profile(
            &admin(),
            NewCustomerProfile {
                user_id: "user-1".to_string(),
                organization_id: "org-1".to_string(),
                customer_type: CustomerType::Individual,
                supply_point: None,
                municipality_id: None,
                is_active: true,
            },
        )
        .await;
    assert!(matches!(result, Err(Error::ConstraintViolation(_))));
}

#[tokio::test]
async fn test_rank_is_dense_among_active_profiles() {
    let service = profile_service(
        MockProfileRepository::default()
            .with_profile("p1", "user-1", "org-1", 120, true)
            .with_profile("p2", "user-2", "org-1", 120, true)
            .with_profile("p3", "user-3", "org-1", 80, true)
            .with_profile("p4", "user-4", "org-1", 500, false)
            .with_profile("p5", "user-5", "org-2", 900, true),
    );

    let rank = service.profile_rank(&admin(), "p3").unwrap();
    assert_eq!(rank.rank, 2);
    assert_eq!(rank.total_members, 3);

    let board = service.organization_leaderboard(&admin(), "org-1").unwrap();
    let ranks: Vec<i64> = board.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, vec![1, 1, 2]);
}

#[tokio::test]
async fn test_customer_sees_only_own_profile() {
    let service = profile_service(
        MockProfileRepository::default()
            .with_profile("p1", "user-1", "org-1", 10, true)
            .with_profile("p2", "user-2", "org-1", 20, true),
    );
    let me = Actor::new("user-1", Role::Customer, Some("org-1".to_string()));
    assert!(service.get_profile(&me, "p1").is_ok());
    assert!(matches!(
        service.get_profile(&me, "p2"),
        Err(Error::PermissionDenied(_))
    ));
}
