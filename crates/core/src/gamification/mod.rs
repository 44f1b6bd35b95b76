//! Achievements, unlocks and team challenges.

mod gamification_model;
mod gamification_service;
mod gamification_traits;

#[cfg(test)]
mod gamification_service_tests;

pub use gamification_model::{
    Achievement, AchievementFilter, AchievementPopularity, AchievementUpdate, ChallengeStatus,
    NewAchievement, NewTeamChallenge, ProgressRequest, TeamChallenge, TeamChallengeFilter,
    TeamChallengeProgress, TeamChallengeUpdate, TeamStanding, UnlockRequest,
    UnlockedAchievement, UserAchievement,
};
pub use gamification_service::{
    rank_achievements, rank_teams, AchievementService, TeamChallengeService,
};
pub use gamification_traits::{
    AchievementRepositoryTrait, AchievementServiceTrait, TeamChallengeRepositoryTrait,
    TeamChallengeServiceTrait,
};
