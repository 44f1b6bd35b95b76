use async_trait::async_trait;

use super::gamification_model::{
    Achievement, AchievementFilter, AchievementPopularity, AchievementUpdate, NewAchievement,
    NewTeamChallenge, ProgressRequest, TeamChallenge, TeamChallengeFilter,
    TeamChallengeProgress, TeamChallengeUpdate, TeamStanding, UnlockRequest,
    UnlockedAchievement, UserAchievement,
};
use crate::access::Actor;
use crate::errors::Result;
use crate::pagination::{PageRequest, Paginated};
use crate::ranking::Ranked;
use rust_decimal::Decimal;

#[async_trait]
pub trait AchievementRepositoryTrait: Send + Sync {
    fn get_by_id(&self, achievement_id: &str) -> Result<Achievement>;
    fn list(&self, filter: &AchievementFilter, page: PageRequest) -> Result<Paginated<Achievement>>;
    /// Every active achievement with its number of unlocks.
    fn unlock_counts(&self) -> Result<Vec<(Achievement, i64)>>;
    fn list_unlocked_by_user(&self, user_id: &str) -> Result<Vec<UnlockedAchievement>>;
    fn find_unlock(&self, user_id: &str, achievement_id: &str) -> Result<Option<UserAchievement>>;
    async fn create(&self, new_achievement: NewAchievement) -> Result<Achievement>;
    async fn update(&self, achievement: Achievement) -> Result<Achievement>;
    async fn delete(&self, achievement_id: &str) -> Result<usize>;
    /// Records the unlock and credits `achievement.points` to every active
    /// customer profile of the user, in one write transaction. A second
    /// unlock of the same pair fails with `Error::ConstraintViolation`.
    async fn unlock(&self, user_id: &str, achievement: &Achievement) -> Result<UserAchievement>;
}

#[async_trait]
pub trait TeamChallengeRepositoryTrait: Send + Sync {
    fn get_by_id(&self, challenge_id: &str) -> Result<TeamChallenge>;
    fn list(
        &self,
        filter: &TeamChallengeFilter,
        page: PageRequest,
    ) -> Result<Paginated<TeamChallenge>>;
    fn list_progress(&self, challenge_id: &str) -> Result<Vec<TeamChallengeProgress>>;
    async fn create(&self, new_challenge: NewTeamChallenge) -> Result<TeamChallenge>;
    async fn update(&self, challenge: TeamChallenge) -> Result<TeamChallenge>;
    async fn delete(&self, challenge_id: &str) -> Result<usize>;
    /// Adds `kwh` to the team's row, creating it on first report.
    async fn add_progress(
        &self,
        challenge_id: &str,
        team_name: &str,
        kwh: Decimal,
    ) -> Result<TeamChallengeProgress>;
}

#[async_trait]
pub trait AchievementServiceTrait: Send + Sync {
    fn get_achievement(&self, actor: Option<&Actor>, achievement_id: &str) -> Result<Achievement>;
    fn list_achievements(
        &self,
        actor: Option<&Actor>,
        filter: AchievementFilter,
        page: PageRequest,
    ) -> Result<Paginated<Achievement>>;
    fn leaderboard(&self) -> Result<Vec<Ranked<AchievementPopularity>>>;
    fn user_achievements(&self, actor: &Actor, user_id: &str) -> Result<Vec<UnlockedAchievement>>;
    async fn create_achievement(
        &self,
        actor: &Actor,
        new_achievement: NewAchievement,
    ) -> Result<Achievement>;
    async fn update_achievement(
        &self,
        actor: &Actor,
        achievement_id: &str,
        update: AchievementUpdate,
    ) -> Result<Achievement>;
    async fn delete_achievement(&self, actor: &Actor, achievement_id: &str) -> Result<()>;
    async fn unlock(
        &self,
        actor: &Actor,
        achievement_id: &str,
        request: UnlockRequest,
    ) -> Result<UserAchievement>;
}

#[async_trait]
pub trait TeamChallengeServiceTrait: Send + Sync {
    fn get_challenge(&self, actor: &Actor, challenge_id: &str) -> Result<TeamChallenge>;
    fn list_challenges(
        &self,
        actor: &Actor,
        filter: TeamChallengeFilter,
        page: PageRequest,
    ) -> Result<Paginated<TeamChallenge>>;
    fn leaderboard(&self, actor: &Actor, challenge_id: &str) -> Result<Vec<Ranked<TeamStanding>>>;
    async fn create_challenge(
        &self,
        actor: &Actor,
        new_challenge: NewTeamChallenge,
    ) -> Result<TeamChallenge>;
    async fn update_challenge(
        &self,
        actor: &Actor,
        challenge_id: &str,
        update: TeamChallengeUpdate,
    ) -> Result<TeamChallenge>;
    async fn delete_challenge(&self, actor: &Actor, challenge_id: &str) -> Result<()>;
    async fn record_progress(
        &self,
        actor: &Actor,
        challenge_id: &str,
        request: ProgressRequest,
    ) -> Result<TeamChallengeProgress>;
}
