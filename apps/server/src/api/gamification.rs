use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use energycoop_core::constants::per_page_caps;
use energycoop_core::gamification::{
    Achievement, AchievementFilter, AchievementPopularity, AchievementUpdate, NewAchievement,
    NewTeamChallenge, ProgressRequest, TeamChallenge, TeamChallengeFilter,
    TeamChallengeProgress, TeamChallengeUpdate, TeamStanding, UnlockRequest, UserAchievement,
};
use energycoop_core::ranking::Ranked;

use super::{ApiJson, ApiQuery};
use crate::{
    auth::{AuthActor, MaybeActor},
    error::ApiResult,
    main_lib::AppState,
    models::{PageQuery, PaginatedResponse},
};

// Achievements

async fn list_achievements(
    State(state): State<Arc<AppState>>,
    MaybeActor(actor): MaybeActor,
    OriginalUri(uri): OriginalUri,
    ApiQuery(page): ApiQuery<PageQuery>,
    ApiQuery(filter): ApiQuery<AchievementFilter>,
) -> ApiResult<Json<PaginatedResponse<Achievement>>> {
    let achievements = state.achievement_service.list_achievements(
        actor.as_ref(),
        filter,
        page.request(per_page_caps::GAMIFICATION),
    )?;
    Ok(Json(PaginatedResponse::new(achievements, &uri)))
}

async fn get_achievement(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    MaybeActor(actor): MaybeActor,
) -> ApiResult<Json<Achievement>> {
    let achievement = state
        .achievement_service
        .get_achievement(actor.as_ref(), &id)?;
    Ok(Json(achievement))
}

async fn achievement_leaderboard(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Ranked<AchievementPopularity>>>> {
    let leaderboard = state.achievement_service.leaderboard()?;
    Ok(Json(leaderboard))
}

async fn create_achievement(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<NewAchievement>,
) -> ApiResult<(StatusCode, Json<Achievement>)> {
    let achievement = state
        .achievement_service
        .create_achievement(&actor, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(achievement)))
}

async fn update_achievement(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<AchievementUpdate>,
) -> ApiResult<Json<Achievement>> {
    let achievement = state
        .achievement_service
        .update_achievement(&actor, &id, payload)
        .await?;
    Ok(Json(achievement))
}

async fn delete_achievement(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> ApiResult<StatusCode> {
    state
        .achievement_service
        .delete_achievement(&actor, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn unlock_achievement(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    body: Option<Json<UnlockRequest>>,
) -> ApiResult<(StatusCode, Json<UserAchievement>)> {
    // An empty body unlocks for the caller.
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let unlocked = state
        .achievement_service
        .unlock(&actor, &id, request)
        .await?;
    tracing::info!(
        "Achievement {} unlocked for {} by {}",
        unlocked.achievement_id,
        unlocked.user_id,
        actor.user_id
    );
    Ok((StatusCode::CREATED, Json(unlocked)))
}

// Team challenges

async fn list_challenges(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    OriginalUri(uri): OriginalUri,
    ApiQuery(page): ApiQuery<PageQuery>,
    ApiQuery(filter): ApiQuery<TeamChallengeFilter>,
) -> ApiResult<Json<PaginatedResponse<TeamChallenge>>> {
    let challenges = state.team_challenge_service.list_challenges(
        &actor,
        filter,
        page.request(per_page_caps::GAMIFICATION),
    )?;
    Ok(Json(PaginatedResponse::new(challenges, &uri)))
}

async fn get_challenge(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> ApiResult<Json<TeamChallenge>> {
    let challenge = state.team_challenge_service.get_challenge(&actor, &id)?;
    Ok(Json(challenge))
}

async fn challenge_leaderboard(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> ApiResult<Json<Vec<Ranked<TeamStanding>>>> {
    let standings = state.team_challenge_service.leaderboard(&actor, &id)?;
    Ok(Json(standings))
}

async fn create_challenge(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<NewTeamChallenge>,
) -> ApiResult<(StatusCode, Json<TeamChallenge>)> {
    let challenge = state
        .team_challenge_service
        .create_challenge(&actor, payload)
        .await?;
    tracing::info!(
        "Team challenge {} created in organization {}",
        challenge.id,
        challenge.organization_id
    );
    Ok((StatusCode::CREATED, Json(challenge)))
}

async fn update_challenge(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<TeamChallengeUpdate>,
) -> ApiResult<Json<TeamChallenge>> {
    let challenge = state
        .team_challenge_service
        .update_challenge(&actor, &id, payload)
        .await?;
    Ok(Json(challenge))
}

async fn delete_challenge(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> ApiResult<StatusCode> {
    state
        .team_challenge_service
        .delete_challenge(&actor, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn record_progress(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<ProgressRequest>,
) -> ApiResult<Json<TeamChallengeProgress>> {
    let progress = state
        .team_challenge_service
        .record_progress(&actor, &id, payload)
        .await?;
    Ok(Json(progress))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/achievements",
            get(list_achievements).post(create_achievement),
        )
        .route("/achievements/leaderboard", get(achievement_leaderboard))
        .route(
            "/achievements/{id}",
            get(get_achievement)
                .put(update_achievement)
                .delete(delete_achievement),
        )
        .route("/achievements/{id}/unlock", post(unlock_achievement))
        .route(
            "/team-challenges",
            get(list_challenges).post(create_challenge),
        )
        .route(
            "/team-challenges/{id}",
            get(get_challenge)
                .put(update_challenge)
                .delete(delete_challenge),
        )
        .route(
            "/team-challenges/{id}/leaderboard",
            get(challenge_leaderboard),
        )
        .route("/team-challenges/{id}/progress", post(record_progress))
}
