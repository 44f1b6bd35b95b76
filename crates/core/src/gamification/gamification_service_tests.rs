//! Unit tests for leaderboards, unlocks and challenge progress.

use super::*;
use crate::access::{Actor, Role};
use crate::errors::{Error, Result};
use crate::pagination::{PageRequest, Paginated};
use crate::users::{NewUserRecord, User, UserChangeset, UserCredentials, UserFilter, UserRepositoryTrait};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::{Arc, Mutex};

// ============================================================================
// Mock Implementations
// ============================================================================

struct MockUserRepository;

#[async_trait]
impl UserRepositoryTrait for MockUserRepository {
    fn get_by_id(&self, user_id: &str) -> Result<User> {
        Ok(User {
            id: user_id.to_string(),
            name: "Member".to_string(),
            email: format!("{}@coop.example", user_id),
            role: Role::Customer,
            organization_id: Some("org-1".to_string()),
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        })
    }

    fn find_credentials_by_email(&self, _email: &str) -> Result<Option<UserCredentials>> {
        Ok(None)
    }

    fn list(&self, _filter: &UserFilter, _page: PageRequest) -> Result<Paginated<User>> {
        unimplemented!()
    }

    async fn create(&self, _new_user: NewUserRecord) -> Result<User> {
        unimplemented!()
    }

    async fn update(&self, _user_id: &str, _changes: UserChangeset) -> Result<User> {
        unimplemented!()
    }

    async fn delete(&self, _user_id: &str) -> Result<usize> {
        unimplemented!()
    }
}

#[derive(Default)]
struct MockAchievementRepository {
    achievements: Vec<Achievement>,
    unlocks: Mutex<Vec<UserAchievement>>,
}

#[async_trait]
impl AchievementRepositoryTrait for MockAchievementRepository {
    fn get_by_id(&self, achievement_id: &str) -> Result<Achievement> {
        self.achievements
            .iter()
            .find(|a| a.id == achievement_id)
            .cloned()
            .ok_or_else(|| Error::not_found("Achievement", achievement_id))
    }

    fn list(&self, _filter: &AchievementFilter, page: PageRequest) -> Result<Paginated<Achievement>> {
        Ok(Paginated::from_vec(self.achievements.clone(), page))
    }

    fn unlock_counts(&self) -> Result<Vec<(Achievement, i64)>> {
        let unlocks = self.unlocks.lock().unwrap();
        Ok(self
            .achievements
            .iter()
            .map(|a| {
                let count = unlocks.iter().filter(|u| u.achievement_id == a.id).count();
                (a.clone(), count as i64)
            })
            .collect())
    }

    fn list_unlocked_by_user(&self, _user_id: &str) -> Result<Vec<UnlockedAchievement>> {
        Ok(Vec::new())
    }

    fn find_unlock(&self, user_id: &str, achievement_id: &str) -> Result<Option<UserAchievement>> {
        Ok(self
            .unlocks
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.user_id == user_id && u.achievement_id == achievement_id)
            .cloned())
    }

    async fn create(&self, _new_achievement: NewAchievement) -> Result<Achievement> {
        unimplemented!()
    }

    async fn update(&self, achievement: Achievement) -> Result<Achievement> {
        Ok(achievement)
    }

    async fn delete(&self, _achievement_id: &str) -> Result<usize> {
        Ok(1)
    }

    async fn unlock(&self, user_id: &str, achievement: &Achievement) -> Result<UserAchievement> {
        let unlock = UserAchievement {
            id: format!("unlock-{}-{}", user_id, achievement.id),
            user_id: user_id.to_string(),
            achievement_id: achievement.id.clone(),
            unlocked_at: NaiveDateTime::default(),
        };
        self.unlocks.lock().unwrap().push(unlock.clone());
        Ok(unlock)
    }
}

struct MockChallengeRepository {
    challenge: TeamChallenge,
    progress: Mutex<Vec<TeamChallengeProgress>>,
}

#[async_trait]
impl TeamChallengeRepositoryTrait for MockChallengeRepository {
    fn get_by_id(&self, challenge_id: &str) -> Result<TeamChallenge> {
        if challenge_id == self.challenge.id {
            Ok(self.challenge.clone())
        } else {
            Err(Error::not_found("Team challenge", challenge_id))
        }
    }

    fn list(
        &self,
        _filter: &TeamChallengeFilter,
        page: PageRequest,
    ) -> Result<Paginated<TeamChallenge>> {
        Ok(Paginated::from_vec(vec![self.challenge.clone()], page))
    }

    fn list_progress(&self, _challenge_id: &str) -> Result<Vec<TeamChallengeProgress>> {
        Ok(self.progress.lock().unwrap().clone())
    }

    async fn create(&self, _new_challenge: NewTeamChallenge) -> Result<TeamChallenge> {
        unimplemented!()
    }

    async fn update(&self, challenge: TeamChallenge) -> Result<TeamChallenge> {
        Ok(challenge)
    }

    async fn delete(&self, _challenge_id: &str) -> Result<usize> {
        Ok(1)
    }

    async fn add_progress(
        &self,
        challenge_id: &str,
        team_name: &str,
        kwh: Decimal,
    ) -> Result<TeamChallengeProgress> {
        let mut progress = self.progress.lock().unwrap();
        if let Some(row) = progress.iter_mut().find(|p| p.team_name == team_name) {
            row.progress_kwh += kwh;
            return Ok(row.clone());
        }
        let row = TeamChallengeProgress {
            id: format!("progress-{}", team_name),
            challenge_id: challenge_id.to_string(),
            team_name: team_name.to_string(),
            progress_kwh: kwh,
            updated_at: NaiveDateTime::default(),
        };
        progress.push(row.clone());
        Ok(row)
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn achievement(id: &str, name: &str, active: bool) -> Achievement {
    Achievement {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
        category: "energy".to_string(),
        icon: None,
        points: 50,
        is_active: active,
        created_at: NaiveDateTime::default(),
        updated_at: NaiveDateTime::default(),
    }
}

fn challenge(status: ChallengeStatus) -> TeamChallenge {
    TeamChallenge {
        id: "challenge-1".to_string(),
        organization_id: "org-1".to_string(),
        name: "Winter Savings".to_string(),
        description: None,
        goal_kwh: dec!(1000),
        starts_on: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        ends_on: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        status,
        created_at: NaiveDateTime::default(),
        updated_at: NaiveDateTime::default(),
    }
}

fn agent() -> Actor {
    Actor::new("agent-1", Role::Agent, Some("org-1".to_string()))
}

fn unlock_for(user: &str) -> UnlockRequest {
    UnlockRequest {
        user_id: user.to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_more_unlocks_rank_first() {
    let ranked = rank_achievements(vec![
        (achievement("a", "Early Bird", true), 2),
        (achievement("b", "Sun Chaser", true), 4),
    ]);
    assert_eq!(ranked[0].item.achievement_id, "b");
    assert_eq!(ranked[0].rank, 1);
    assert_eq!(ranked[1].rank, 2);
}

#[test]
fn test_ties_share_rank_and_sort_by_name() {
    let ranked = rank_achievements(vec![
        (achievement("a", "Zephyr", true), 3),
        (achievement("b", "Aurora", true), 3),
        (achievement("c", "Comet", true), 1),
    ]);
    let names: Vec<&str> = ranked.iter().map(|r| r.item.name.as_str()).collect();
    assert_eq!(names, vec!["Aurora", "Zephyr", "Comet"]);
    let ranks: Vec<i64> = ranked.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, vec![1, 1, 2]);
}

#[tokio::test]
async fn test_unlock_twice_is_rejected() {
    let repo = Arc::new(MockAchievementRepository {
        achievements: vec![achievement("a", "Early Bird", true)],
        ..Default::default()
    });
    let service = AchievementService::new(repo, Arc::new(MockUserRepository));

    service.unlock(&agent(), "a", unlock_for("user-1")).await.unwrap();
    let second = service.unlock(&agent(), "a", unlock_for("user-1")).await;
    assert!(matches!(second, Err(Error::ConstraintViolation(_))));

    let board = service.leaderboard().unwrap();
    assert_eq!(board[0].item.unlock_count, 1);
}

#[tokio::test]
async fn test_inactive_achievement_cannot_be_unlocked() {
    let repo = Arc::new(MockAchievementRepository {
        achievements: vec![achievement("a", "Retired", false)],
        ..Default::default()
    });
    let service = AchievementService::new(repo, Arc::new(MockUserRepository));
    let result = service.unlock(&agent(), "a", unlock_for("user-1")).await;
    assert!(matches!(result, Err(Error::ConstraintViolation(_))));
    assert!(service.get_achievement(None, "a").unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_progress_accumulates_and_ranks() {
    let repo = Arc::new(MockChallengeRepository {
        challenge: challenge(ChallengeStatus::Active),
        progress: Mutex::new(Vec::new()),
    });
    let service = TeamChallengeService::new(repo);
    let report = |team: &str, kwh: Decimal| ProgressRequest {
        team_name: team.to_string(),
        kwh,
    };

    service.record_progress(&agent(), "challenge-1", report("North", dec!(200))).await.unwrap();
    service.record_progress(&agent(), "challenge-1", report("South", dec!(350))).await.unwrap();
    let north = service
        .record_progress(&agent(), "challenge-1", report("North", dec!(150)))
        .await
        .unwrap();
    assert_eq!(north.progress_kwh, dec!(350));

    let board = service.leaderboard(&agent(), "challenge-1").unwrap();
    assert_eq!(board.len(), 2);
    assert!(board.iter().all(|r| r.rank == 1));
    assert_eq!(board[0].item.goal_percent, dec!(35));
}

#[tokio::test]
async fn test_progress_requires_active_challenge() {
    let repo = Arc::new(MockChallengeRepository {
        challenge: challenge(ChallengeStatus::Draft),
        progress: Mutex::new(Vec::new()),
    });
    let service = TeamChallengeService::new(repo);
    let result = service
        .record_progress(
            &agent(),
            "challenge-1",
            ProgressRequest {
                team_name: "North".to_string(),
                kwh: dec!(10),
            },
        )
        .await;
    assert!(matches!(result, Err(Error::ConstraintViolation(_))));
}

#[tokio::test]
async fn test_other_organizations_cannot_see_a_challenge() {
    let repo = Arc::new(MockChallengeRepository {
        challenge: challenge(ChallengeStatus::Active),
        progress: Mutex::new(Vec::new()),
    });
    let service = TeamChallengeService::new(repo);
    let outsider = Actor::new("user-9", Role::Customer, Some("org-2".to_string()));
    assert!(matches!(
        service.get_challenge(&outsider, "challenge-1"),
        Err(Error::PermissionDenied(_))
    ));
}
