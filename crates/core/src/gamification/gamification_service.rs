use async_trait::async_trait;
use log::info;
use rust_decimal::Decimal;
use std::sync::Arc;

use super::gamification_model::{
    Achievement, AchievementFilter, AchievementPopularity, AchievementUpdate, ChallengeStatus,
    NewAchievement, NewTeamChallenge, ProgressRequest, TeamChallenge, TeamChallengeFilter,
    TeamChallengeProgress, TeamChallengeUpdate, TeamStanding, UnlockRequest,
    UnlockedAchievement, UserAchievement,
};
use super::gamification_traits::{
    AchievementRepositoryTrait, AchievementServiceTrait, TeamChallengeRepositoryTrait,
    TeamChallengeServiceTrait,
};
use crate::access::{is_editor, Actor, OrganizationScope, Role};
use crate::errors::{Error, Result};
use crate::pagination::{PageRequest, Paginated};
use crate::ranking::{dense_rank, Ranked};
use crate::users::UserRepositoryTrait;

/// Orders achievements by unlock count (most first, ties by name) and ranks them.
pub fn rank_achievements(counts: Vec<(Achievement, i64)>) -> Vec<Ranked<AchievementPopularity>> {
    let mut rows: Vec<AchievementPopularity> = counts
        .into_iter()
        .map(|(a, unlock_count)| AchievementPopularity {
            achievement_id: a.id,
            name: a.name,
            category: a.category,
            points: a.points,
            unlock_count,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.unlock_count
            .cmp(&a.unlock_count)
            .then_with(|| a.name.cmp(&b.name))
    });
    dense_rank(rows, |r: &AchievementPopularity| r.unlock_count)
}

/// Orders teams by kWh (most first, ties by team name) and ranks them.
pub fn rank_teams(
    progress: &[TeamChallengeProgress],
    goal_kwh: Decimal,
) -> Vec<Ranked<TeamStanding>> {
    let mut rows: Vec<TeamStanding> = progress
        .iter()
        .map(|p| TeamStanding::new(p, goal_kwh))
        .collect();
    rows.sort_by(|a, b| {
        b.progress_kwh
            .cmp(&a.progress_kwh)
            .then_with(|| a.team_name.cmp(&b.team_name))
    });
    dense_rank(rows, |r: &TeamStanding| r.progress_kwh)
}

pub struct AchievementService {
    repository: Arc<dyn AchievementRepositoryTrait>,
    users: Arc<dyn UserRepositoryTrait>,
}

impl AchievementService {
    pub fn new(
        repository: Arc<dyn AchievementRepositoryTrait>,
        users: Arc<dyn UserRepositoryTrait>,
    ) -> Self {
        Self { repository, users }
    }
}

#[async_trait]
impl AchievementServiceTrait for AchievementService {
    fn get_achievement(&self, actor: Option<&Actor>, achievement_id: &str) -> Result<Achievement> {
        let achievement = self.repository.get_by_id(achievement_id)?;
        if !achievement.is_active && !is_editor(actor) {
            return Err(Error::not_found("Achievement", achievement_id));
        }
        Ok(achievement)
    }

    fn list_achievements(
        &self,
        actor: Option<&Actor>,
        mut filter: AchievementFilter,
        page: PageRequest,
    ) -> Result<Paginated<Achievement>> {
        if !is_editor(actor) {
            filter.is_active = Some(true);
        }
        self.repository.list(&filter, page)
    }

    fn leaderboard(&self) -> Result<Vec<Ranked<AchievementPopularity>>> {
        Ok(rank_achievements(self.repository.unlock_counts()?))
    }

    fn user_achievements(&self, actor: &Actor, user_id: &str) -> Result<Vec<UnlockedAchievement>> {
        actor.require_owner_or(user_id, Role::Agent)?;
        self.users.get_by_id(user_id)?;
        self.repository.list_unlocked_by_user(user_id)
    }

    async fn create_achievement(
        &self,
        actor: &Actor,
        new_achievement: NewAchievement,
    ) -> Result<Achievement> {
        actor.require(Role::Admin)?;
        new_achievement.validate()?;
        self.repository.create(new_achievement).await
    }

    async fn update_achievement(
        &self,
        actor: &Actor,
        achievement_id: &str,
        update: AchievementUpdate,
    ) -> Result<Achievement> {
        actor.require(Role::Admin)?;
        let mut achievement = self.repository.get_by_id(achievement_id)?;
        achievement.apply(update);
        achievement.validate()?;
        self.repository.update(achievement).await
    }

    async fn delete_achievement(&self, actor: &Actor, achievement_id: &str) -> Result<()> {
        actor.require(Role::Admin)?;
        let unlocks = self
            .repository
            .unlock_counts()?
            .into_iter()
            .find(|(a, _)| a.id == achievement_id)
            .map(|(_, count)| count)
            .unwrap_or(0);
        if unlocks > 0 {
            return Err(Error::ConstraintViolation(format!(
                "Achievement '{}' has been unlocked {} time(s)",
                achievement_id, unlocks
            )));
        }
        self.repository.get_by_id(achievement_id)?;
        self.repository.delete(achievement_id).await?;
        Ok(())
    }

    async fn unlock(
        &self,
        actor: &Actor,
        achievement_id: &str,
        request: UnlockRequest,
    ) -> Result<UserAchievement> {
        let user_id = if request.user_id.trim().is_empty() {
            actor.user_id.clone()
        } else {
            request.user_id
        };
        actor.require(Role::Agent)?;
        self.users.get_by_id(&user_id)?;

        let achievement = self.repository.get_by_id(achievement_id)?;
        if !achievement.is_active {
            return Err(Error::ConstraintViolation(format!(
                "Achievement '{}' is not active",
                achievement_id
            )));
        }
        if self.repository.find_unlock(&user_id, achievement_id)?.is_some() {
            return Err(Error::ConstraintViolation(format!(
                "User '{}' already unlocked achievement '{}'",
                user_id, achievement_id
            )));
        }
        let unlocked = self.repository.unlock(&user_id, &achievement).await?;
        info!(
            "User {} unlocked achievement {} (+{} points)",
            user_id, achievement.id, achievement.points
        );
        Ok(unlocked)
    }
}

pub struct TeamChallengeService {
    repository: Arc<dyn TeamChallengeRepositoryTrait>,
}

impl TeamChallengeService {
    pub fn new(repository: Arc<dyn TeamChallengeRepositoryTrait>) -> Self {
        Self { repository }
    }

    fn visible_challenge(&self, actor: &Actor, challenge_id: &str, minimum: Role) -> Result<TeamChallenge> {
        let challenge = self.repository.get_by_id(challenge_id)?;
        actor.require_in_organization(&challenge.organization_id, minimum)?;
        Ok(challenge)
    }
}

#[async_trait]
impl TeamChallengeServiceTrait for TeamChallengeService {
    fn get_challenge(&self, actor: &Actor, challenge_id: &str) -> Result<TeamChallenge> {
        self.visible_challenge(actor, challenge_id, Role::Customer)
    }

    fn list_challenges(
        &self,
        actor: &Actor,
        mut filter: TeamChallengeFilter,
        page: PageRequest,
    ) -> Result<Paginated<TeamChallenge>> {
        match actor.organization_scope() {
            OrganizationScope::All => {}
            OrganizationScope::Only(org) => filter.organization_id = Some(org),
            OrganizationScope::Nothing => return Ok(Paginated::new(Vec::new(), 0, page)),
        }
        self.repository.list(&filter, page)
    }

    fn leaderboard(&self, actor: &Actor, challenge_id: &str) -> Result<Vec<Ranked<TeamStanding>>> {
        let challenge = self.visible_challenge(actor, challenge_id, Role::Customer)?;
        let progress = self.repository.list_progress(challenge_id)?;
        Ok(rank_teams(&progress, challenge.goal_kwh))
    }

    async fn create_challenge(
        &self,
        actor: &Actor,
        new_challenge: NewTeamChallenge,
    ) -> Result<TeamChallenge> {
        new_challenge.validate()?;
        actor.require_in_organization(&new_challenge.organization_id, Role::Admin)?;
        let created = self.repository.create(new_challenge).await?;
        info!("Created team challenge {}", created.id);
        Ok(created)
    }

    async fn update_challenge(
        &self,
        actor: &Actor,
        challenge_id: &str,
        update: TeamChallengeUpdate,
    ) -> Result<TeamChallenge> {
        let mut challenge = self.visible_challenge(actor, challenge_id, Role::Admin)?;
        if challenge.status == ChallengeStatus::Completed
            && update.status.is_some_and(|s| s != ChallengeStatus::Completed)
        {
            return Err(Error::ConstraintViolation(
                "A completed challenge cannot be reopened".to_string(),
            ));
        }
        challenge.apply(update);
        challenge.validate()?;
        self.repository.update(challenge).await
    }

    async fn delete_challenge(&self, actor: &Actor, challenge_id: &str) -> Result<()> {
        self.visible_challenge(actor, challenge_id, Role::Admin)?;
        self.repository.delete(challenge_id).await?;
        Ok(())
    }

    async fn record_progress(
        &self,
        actor: &Actor,
        challenge_id: &str,
        request: ProgressRequest,
    ) -> Result<TeamChallengeProgress> {
        request.validate()?;
        let challenge = self.visible_challenge(actor, challenge_id, Role::Agent)?;
        if challenge.status != ChallengeStatus::Active {
            return Err(Error::ConstraintViolation(format!(
                "Challenge '{}' is {}, progress can only be recorded while active",
                challenge_id, challenge.status
            )));
        }
        self.repository
            .add_progress(challenge_id, request.team_name.trim(), request.kwh)
            .await
    }
}
