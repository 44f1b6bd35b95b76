mod model;
mod repository;

pub use model::{AchievementDB, TeamChallengeDB, TeamChallengeProgressDB, UserAchievementDB};
pub use repository::{AchievementRepository, TeamChallengeRepository};
