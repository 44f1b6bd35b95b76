//! Database models for achievements and team challenges.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use energycoop_core::gamification::{
    Achievement, ChallengeStatus, NewAchievement, NewTeamChallenge, TeamChallenge,
    TeamChallengeProgress, UserAchievement,
};

use crate::utils::{decimal_to_text, new_id, parse_decimal, parse_enum};

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::achievements)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct AchievementDB {
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

impl From<AchievementDB> for Achievement {
    fn from(db: AchievementDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            description: db.description,
            category: db.category,
            icon: db.icon,
            points: db.points,
            is_active: db.is_active,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<Achievement> for AchievementDB {
    fn from(a: Achievement) -> Self {
        Self {
            id: a.id,
            name: a.name,
            description: a.description,
            category: a.category,
            icon: a.icon,
            points: a.points,
            is_active: a.is_active,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

impl From<NewAchievement> for AchievementDB {
    fn from(new: NewAchievement) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: new_id(),
            name: new.name,
            description: new.description,
            category: new.category,
            icon: new.icon,
            points: new.points,
            is_active: new.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::user_achievements)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserAchievementDB {
    pub id: String,
    pub user_id: String,
    pub achievement_id: String,
    pub unlocked_at: NaiveDateTime,
}

impl From<UserAchievementDB> for UserAchievement {
    fn from(db: UserAchievementDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            achievement_id: db.achievement_id,
            unlocked_at: db.unlocked_at,
        }
    }
}

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::team_challenges)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct TeamChallengeDB {
    pub id: String,
    pub organization_id: String,
    pub name: String,
    pub description: Option<String>,
    pub goal_kwh: String,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<TeamChallengeDB> for TeamChallenge {
    fn from(db: TeamChallengeDB) -> Self {
        Self {
            goal_kwh: parse_decimal(&db.goal_kwh, "team_challenges.goal_kwh"),
            status: parse_enum(&db.status, "team_challenges.status", ChallengeStatus::Draft),
            id: db.id,
            organization_id: db.organization_id,
            name: db.name,
            description: db.description,
            starts_on: db.starts_on,
            ends_on: db.ends_on,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<TeamChallenge> for TeamChallengeDB {
    fn from(c: TeamChallenge) -> Self {
        Self {
            goal_kwh: decimal_to_text(c.goal_kwh),
            status: c.status.as_str().to_string(),
            id: c.id,
            organization_id: c.organization_id,
            name: c.name,
            description: c.description,
            starts_on: c.starts_on,
            ends_on: c.ends_on,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

impl From<NewTeamChallenge> for TeamChallengeDB {
    fn from(new: NewTeamChallenge) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: new_id(),
            organization_id: new.organization_id,
            name: new.name,
            description: new.description,
            goal_kwh: decimal_to_text(new.goal_kwh),
            starts_on: new.starts_on,
            ends_on: new.ends_on,
            status: new.status.as_str().to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::team_challenge_progress)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TeamChallengeProgressDB {
    pub id: String,
    pub challenge_id: String,
    pub team_name: String,
    pub progress_kwh: String,
    pub updated_at: NaiveDateTime,
}

impl From<TeamChallengeProgressDB> for TeamChallengeProgress {
    fn from(db: TeamChallengeProgressDB) -> Self {
        Self {
            progress_kwh: parse_decimal(&db.progress_kwh, "team_challenge_progress.progress_kwh"),
            id: db.id,
            challenge_id: db.challenge_id,
            team_name: db.team_name,
            updated_at: db.updated_at,
        }
    }
}
