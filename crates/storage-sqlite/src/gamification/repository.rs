use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::prelude::*;
use log::info;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

use energycoop_core::errors::{Error, Result};
use energycoop_core::gamification::{
    Achievement, AchievementFilter, AchievementRepositoryTrait, NewAchievement,
    NewTeamChallenge, TeamChallenge, TeamChallengeFilter, TeamChallengeProgress,
    TeamChallengeRepositoryTrait, UnlockedAchievement, UserAchievement,
};
use energycoop_core::pagination::{PageRequest, Paginated};

use super::model::{AchievementDB, TeamChallengeDB, TeamChallengeProgressDB, UserAchievementDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::{
    achievements, customer_profiles, team_challenge_progress, team_challenges, user_achievements,
};
use crate::utils::{decimal_to_text, like_pattern, new_id, parse_decimal};

pub struct AchievementRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl AchievementRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl AchievementRepositoryTrait for AchievementRepository {
    fn get_by_id(&self, achievement_id: &str) -> Result<Achievement> {
        let mut conn = get_connection(&self.pool)?;
        achievements::table
            .find(achievement_id)
            .select(AchievementDB::as_select())
            .first::<AchievementDB>(&mut conn)
            .optional()
            .into_core()?
            .map(Achievement::from)
            .ok_or_else(|| Error::not_found("Achievement", achievement_id))
    }

    fn list(&self, filter: &AchievementFilter, page: PageRequest) -> Result<Paginated<Achievement>> {
        let mut conn = get_connection(&self.pool)?;

        let create_base_query = || {
            let mut query = achievements::table.into_boxed();
            if let Some(ref category) = filter.category {
                query = query.filter(achievements::category.eq(category.clone()));
            }
            if let Some(active) = filter.is_active {
                query = query.filter(achievements::is_active.eq(active));
            }
            if let Some(ref term) = filter.search {
                query = query.filter(achievements::name.like(like_pattern(term)));
            }
            query
        };

        let total = create_base_query()
            .count()
            .get_result::<i64>(&mut conn)
            .into_core()?;
        let rows = create_base_query()
            .select(AchievementDB::as_select())
            .order((achievements::category.asc(), achievements::name.asc()))
            .limit(page.limit())
            .offset(page.offset())
            .load::<AchievementDB>(&mut conn)
            .into_core()?;

        Ok(Paginated::new(
            rows.into_iter().map(Achievement::from).collect(),
            total,
            page,
        ))
    }

    fn unlock_counts(&self) -> Result<Vec<(Achievement, i64)>> {
        let mut conn = get_connection(&self.pool)?;
        let counts: HashMap<String, i64> = user_achievements::table
            .group_by(user_achievements::achievement_id)
            .select((user_achievements::achievement_id, count_star()))
            .load::<(String, i64)>(&mut conn)
            .into_core()?
            .into_iter()
            .collect();

        let rows = achievements::table
            .filter(achievements::is_active.eq(true))
            .select(AchievementDB::as_select())
            .load::<AchievementDB>(&mut conn)
            .into_core()?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let unlocks = counts.get(&row.id).copied().unwrap_or(0);
                (Achievement::from(row), unlocks)
            })
            .collect())
    }

    fn list_unlocked_by_user(&self, user_id: &str) -> Result<Vec<UnlockedAchievement>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = user_achievements::table
            .inner_join(achievements::table)
            .filter(user_achievements::user_id.eq(user_id))
            .order(user_achievements::unlocked_at.desc())
            .select((AchievementDB::as_select(), user_achievements::unlocked_at))
            .load::<(AchievementDB, chrono::NaiveDateTime)>(&mut conn)
            .into_core()?;
        Ok(rows
            .into_iter()
            .map(|(achievement, unlocked_at)| UnlockedAchievement {
                achievement: achievement.into(),
                unlocked_at,
            })
            .collect())
    }

    fn find_unlock(&self, user_id: &str, achievement_id: &str) -> Result<Option<UserAchievement>> {
        let mut conn = get_connection(&self.pool)?;
        let row = user_achievements::table
            .filter(user_achievements::user_id.eq(user_id))
            .filter(user_achievements::achievement_id.eq(achievement_id))
            .select(UserAchievementDB::as_select())
            .first::<UserAchievementDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.map(UserAchievement::from))
    }

    async fn create(&self, new_achievement: NewAchievement) -> Result<Achievement> {
        self.writer
            .exec(move |conn| {
                let row: AchievementDB = new_achievement.into();
                diesel::insert_into(achievements::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(row.into())
            })
            .await
    }

    async fn update(&self, achievement: Achievement) -> Result<Achievement> {
        self.writer
            .exec(move |conn| {
                let mut row: AchievementDB = achievement.into();
                row.updated_at = chrono::Utc::now().naive_utc();
                let affected = diesel::update(achievements::table.find(&row.id))
                    .set(&row)
                    .execute(conn)
                    .into_core()?;
                if affected == 0 {
                    return Err(Error::not_found("Achievement", &row.id));
                }
                Ok(row.into())
            })
            .await
    }

    async fn delete(&self, achievement_id: &str) -> Result<usize> {
        let achievement_id = achievement_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(achievements::table.find(achievement_id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }

    async fn unlock(&self, user_id: &str, achievement: &Achievement) -> Result<UserAchievement> {
        let user_id = user_id.to_string();
        let achievement_id = achievement.id.clone();
        let points = achievement.points;
        self.writer
            .exec(move |conn| {
                let existing = user_achievements::table
                    .filter(user_achievements::user_id.eq(&user_id))
                    .filter(user_achievements::achievement_id.eq(&achievement_id))
                    .count()
                    .get_result::<i64>(conn)
                    .into_core()?;
                if existing > 0 {
                    return Err(Error::ConstraintViolation(format!(
                        "Achievement '{}' is already unlocked for user '{}'",
                        achievement_id, user_id
                    )));
                }

                let row = UserAchievementDB {
                    id: new_id(),
                    user_id: user_id.clone(),
                    achievement_id: achievement_id.clone(),
                    unlocked_at: chrono::Utc::now().naive_utc(),
                };
                diesel::insert_into(user_achievements::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;

                let credited = diesel::update(
                    customer_profiles::table
                        .filter(customer_profiles::user_id.eq(&user_id))
                        .filter(customer_profiles::is_active.eq(true)),
                )
                .set((
                    customer_profiles::points_total.eq(customer_profiles::points_total + points),
                    customer_profiles::updated_at.eq(row.unlocked_at),
                ))
                .execute(conn)
                .into_core()?;

                info!(
                    "User {} unlocked achievement {} (+{} points on {} profiles)",
                    user_id, achievement_id, points, credited
                );
                Ok(row.into())
            })
            .await
    }
}

pub struct TeamChallengeRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl TeamChallengeRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl TeamChallengeRepositoryTrait for TeamChallengeRepository {
    fn get_by_id(&self, challenge_id: &str) -> Result<TeamChallenge> {
        let mut conn = get_connection(&self.pool)?;
        team_challenges::table
            .find(challenge_id)
            .select(TeamChallengeDB::as_select())
            .first::<TeamChallengeDB>(&mut conn)
            .optional()
            .into_core()?
            .map(TeamChallenge::from)
            .ok_or_else(|| Error::not_found("TeamChallenge", challenge_id))
    }

    fn list(
        &self,
        filter: &TeamChallengeFilter,
        page: PageRequest,
    ) -> Result<Paginated<TeamChallenge>> {
        let mut conn = get_connection(&self.pool)?;

        let create_base_query = || {
            let mut query = team_challenges::table.into_boxed();
            if let Some(ref organization_id) = filter.organization_id {
                query = query.filter(team_challenges::organization_id.eq(organization_id.clone()));
            }
            if let Some(status) = filter.status {
                query = query.filter(team_challenges::status.eq(status.as_str()));
            }
            if let Some(ref term) = filter.search {
                query = query.filter(team_challenges::name.like(like_pattern(term)));
            }
            query
        };

        let total = create_base_query()
            .count()
            .get_result::<i64>(&mut conn)
            .into_core()?;
        let rows = create_base_query()
            .select(TeamChallengeDB::as_select())
            .order((team_challenges::starts_on.desc(), team_challenges::name.asc()))
            .limit(page.limit())
            .offset(page.offset())
            .load::<TeamChallengeDB>(&mut conn)
            .into_core()?;

        Ok(Paginated::new(
            rows.into_iter().map(TeamChallenge::from).collect(),
            total,
            page,
        ))
    }

    fn list_progress(&self, challenge_id: &str) -> Result<Vec<TeamChallengeProgress>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = team_challenge_progress::table
            .filter(team_challenge_progress::challenge_id.eq(challenge_id))
            .order(team_challenge_progress::team_name.asc())
            .select(TeamChallengeProgressDB::as_select())
            .load::<TeamChallengeProgressDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(TeamChallengeProgress::from).collect())
    }

    async fn create(&self, new_challenge: NewTeamChallenge) -> Result<TeamChallenge> {
        self.writer
            .exec(move |conn| {
                let row: TeamChallengeDB = new_challenge.into();
                diesel::insert_into(team_challenges::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(row.into())
            })
            .await
    }

    async fn update(&self, challenge: TeamChallenge) -> Result<TeamChallenge> {
        self.writer
            .exec(move |conn| {
                let mut row: TeamChallengeDB = challenge.into();
                row.updated_at = chrono::Utc::now().naive_utc();
                let affected = diesel::update(team_challenges::table.find(&row.id))
                    .set(&row)
                    .execute(conn)
                    .into_core()?;
                if affected == 0 {
                    return Err(Error::not_found("TeamChallenge", &row.id));
                }
                Ok(row.into())
            })
            .await
    }

    async fn delete(&self, challenge_id: &str) -> Result<usize> {
        let challenge_id = challenge_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(team_challenges::table.find(challenge_id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }

    async fn add_progress(
        &self,
        challenge_id: &str,
        team_name: &str,
        kwh: Decimal,
    ) -> Result<TeamChallengeProgress> {
        let challenge_id = challenge_id.to_string();
        let team_name = team_name.trim().to_string();
        self.writer
            .exec(move |conn| {
                let now = chrono::Utc::now().naive_utc();
                let existing = team_challenge_progress::table
                    .filter(team_challenge_progress::challenge_id.eq(&challenge_id))
                    .filter(team_challenge_progress::team_name.eq(&team_name))
                    .select(TeamChallengeProgressDB::as_select())
                    .first::<TeamChallengeProgressDB>(conn)
                    .optional()
                    .into_core()?;

                let row = match existing {
                    Some(mut row) => {
                        let total = parse_decimal(
                            &row.progress_kwh,
                            "team_challenge_progress.progress_kwh",
                        )
                        .checked_add(kwh)
                        .ok_or_else(|| {
                            Error::Calculation("Team progress is out of range".to_string())
                        })?;
                        row.progress_kwh = decimal_to_text(total);
                        row.updated_at = now;
                        diesel::update(team_challenge_progress::table.find(&row.id))
                            .set((
                                team_challenge_progress::progress_kwh.eq(&row.progress_kwh),
                                team_challenge_progress::updated_at.eq(now),
                            ))
                            .execute(conn)
                            .into_core()?;
                        row
                    }
                    None => {
                        let row = TeamChallengeProgressDB {
                            id: new_id(),
                            challenge_id: challenge_id.clone(),
                            team_name: team_name.clone(),
                            progress_kwh: decimal_to_text(kwh),
                            updated_at: now,
                        };
                        diesel::insert_into(team_challenge_progress::table)
                            .values(&row)
                            .execute(conn)
                            .into_core()?;
                        row
                    }
                };
                Ok(row.into())
            })
            .await
    }
}
