//! Achievement and team challenge domain models.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::MONEY_PRECISION;
use crate::errors::{Error, Result, ValidationError};
use crate::validation::Validator;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub icon: Option<String>,
    pub points: i64,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Achievement {
    pub fn apply(&mut self, update: AchievementUpdate) {
        if let Some(v) = update.name {
            self.name = v;
        }
        if update.description.is_some() {
            self.description = update.description;
        }
        if let Some(v) = update.category {
            self.category = v;
        }
        if update.icon.is_some() {
            self.icon = update.icon;
        }
        if let Some(v) = update.points {
            self.points = v;
        }
        if let Some(v) = update.is_active {
            self.is_active = v;
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_achievement(&self.name, &self.category, self.points)
    }
}

fn validate_achievement(name: &str, category: &str, points: i64) -> Result<()> {
    let mut v = Validator::new();
    v.required("name", name).max_len("name", name, 255);
    v.required("category", category).max_len("category", category, 100);
    v.check(points >= 0, "points", "The points must be at least 0.");
    v.finish()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAchievement {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub icon: Option<String>,
    #[serde(default)]
    pub points: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl NewAchievement {
    pub fn validate(&self) -> Result<()> {
        validate_achievement(&self.name, &self.category, self.points)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AchievementUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub icon: Option<String>,
    pub points: Option<i64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AchievementFilter {
    pub category: Option<String>,
    pub is_active: Option<bool>,
    pub search: Option<String>,
}

/// One unlock of an achievement by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAchievement {
    pub id: String,
    pub user_id: String,
    pub achievement_id: String,
    pub unlocked_at: NaiveDateTime,
}

/// Body of `POST /achievements/{id}/unlock`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnlockRequest {
    /// Defaults to the caller.
    #[serde(default)]
    pub user_id: String,
}

/// An achievement a user holds, as listed by `GET /users/{id}/achievements`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnlockedAchievement {
    #[serde(flatten)]
    pub achievement: Achievement,
    pub unlocked_at: NaiveDateTime,
}

/// Achievement leaderboard row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementPopularity {
    pub achievement_id: String,
    pub name: String,
    pub category: String,
    pub points: i64,
    pub unlock_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeStatus {
    Draft,
    Active,
    Completed,
}

impl ChallengeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChallengeStatus::Draft => "draft",
            ChallengeStatus::Active => "active",
            ChallengeStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for ChallengeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChallengeStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "draft" => Ok(ChallengeStatus::Draft),
            "active" => Ok(ChallengeStatus::Active),
            "completed" => Ok(ChallengeStatus::Completed),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown challenge status '{}'",
                other
            )))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamChallenge {
    pub id: String,
    pub organization_id: String,
    pub name: String,
    pub description: Option<String>,
    pub goal_kwh: Decimal,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub status: ChallengeStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TeamChallenge {
    pub fn apply(&mut self, update: TeamChallengeUpdate) {
        if let Some(v) = update.name {
            self.name = v;
        }
        if update.description.is_some() {
            self.description = update.description;
        }
        if let Some(v) = update.goal_kwh {
            self.goal_kwh = v;
        }
        if let Some(v) = update.starts_on {
            self.starts_on = v;
        }
        if let Some(v) = update.ends_on {
            self.ends_on = v;
        }
        if let Some(v) = update.status {
            self.status = v;
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_challenge(&self.name, self.goal_kwh, self.starts_on, self.ends_on)
    }
}

fn validate_challenge(name: &str, goal_kwh: Decimal, starts_on: NaiveDate, ends_on: NaiveDate) -> Result<()> {
    let mut v = Validator::new();
    v.required("name", name).max_len("name", name, 255);
    v.amount("goal_kwh", goal_kwh);
    v.check(
        ends_on >= starts_on,
        "ends_on",
        "The ends_on must be a date after or equal to starts_on.",
    );
    v.finish()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTeamChallenge {
    pub organization_id: String,
    pub name: String,
    pub description: Option<String>,
    pub goal_kwh: Decimal,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    #[serde(default = "default_challenge_status")]
    pub status: ChallengeStatus,
}

fn default_challenge_status() -> ChallengeStatus {
    ChallengeStatus::Draft
}

impl NewTeamChallenge {
    pub fn validate(&self) -> Result<()> {
        validate_challenge(&self.name, self.goal_kwh, self.starts_on, self.ends_on)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamChallengeUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub goal_kwh: Option<Decimal>,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub status: Option<ChallengeStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamChallengeFilter {
    pub organization_id: Option<String>,
    pub status: Option<ChallengeStatus>,
    pub search: Option<String>,
}

/// Accumulated kWh of one team in one challenge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamChallengeProgress {
    pub id: String,
    pub challenge_id: String,
    pub team_name: String,
    pub progress_kwh: Decimal,
    pub updated_at: NaiveDateTime,
}

/// Body of `POST /team-challenges/{id}/progress`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressRequest {
    pub team_name: String,
    pub kwh: Decimal,
}

impl ProgressRequest {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        v.required("team_name", &self.team_name)
            .max_len("team_name", &self.team_name, 100);
        v.amount("kwh", self.kwh);
        v.finish()
    }
}

/// Team challenge leaderboard row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStanding {
    pub team_name: String,
    pub progress_kwh: Decimal,
    /// Progress as a percentage of the challenge goal.
    pub goal_percent: Decimal,
}

impl TeamStanding {
    pub fn new(progress: &TeamChallengeProgress, goal_kwh: Decimal) -> Self {
        let goal_percent = if goal_kwh.is_zero() {
            Decimal::ZERO
        } else {
            (progress.progress_kwh / goal_kwh * dec!(100)).round_dp(MONEY_PRECISION)
        };
        Self {
            team_name: progress.team_name.clone(),
            progress_kwh: progress.progress_kwh,
            goal_percent,
        }
    }
}
