//! Date-poll routes.
//!
//! Members suggest candidate time windows and toggle votes on them; an admin
//! promotes one option, copying its dates onto the hub's canonical schedule.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::models::{CreatePollOptionRequest, PollOptionResponse};
use persistence::repositories::{
    DatePollRepository, HubRepository, MemberRepository, VoteToggle,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{metrics, UserAuth};
use crate::services::authz;

/// Outcome of a vote toggle.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ToggleVoteResponse {
    pub voted: bool,
    pub user_count: i64,
}

/// POST /api/v1/hubs/:hub_id/poll-options
///
/// Suggest a candidate time window. Requires membership and the hub's
/// date poll module.
pub async fn create_option(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(hub_id): Path<Uuid>,
    Json(request): Json<CreatePollOptionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let hub_repo = HubRepository::new(state.pool.clone());
    let member_repo = MemberRepository::new(state.pool.clone());
    let poll_repo = DatePollRepository::new(state.pool.clone());

    let hub = hub_repo
        .find_by_id(hub_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Hub not found".to_string()))?;

    if !hub.date_poll_enabled {
        return Err(ApiError::Validation(
            "The date poll is disabled for this hub".to_string(),
        ));
    }

    authz::require_member(&member_repo, hub_id, auth.user_id).await?;

    let option = poll_repo
        .create_option(hub_id, request.start_date, request.end_date, auth.user_id)
        .await?;

    info!(
        hub_id = %hub_id,
        option_id = %option.id,
        suggested_by = %auth.user_id,
        "Created poll option"
    );

    // A fresh option has no votes; it is selected only if its dates already
    // match the hub's canonical schedule.
    let is_selected = Some(option.start_date) == hub.start_date && option.end_date == hub.end_date;

    Ok((
        StatusCode::CREATED,
        Json(PollOptionResponse {
            id: option.id,
            hub_id: option.hub_id,
            start_date: option.start_date,
            end_date: option.end_date,
            suggested_by: option.suggested_by,
            user_count: 0,
            is_selected,
            created_at: option.created_at,
        }),
    ))
}

/// GET /api/v1/hubs/:hub_id/poll-options
///
/// List a hub's poll options with vote counts and derived selection.
/// Requires membership.
pub async fn list_options(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(hub_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let member_repo = MemberRepository::new(state.pool.clone());
    let poll_repo = DatePollRepository::new(state.pool.clone());

    authz::require_member(&member_repo, hub_id, auth.user_id).await?;

    let options = poll_repo.list_options(hub_id).await?;

    let responses: Vec<PollOptionResponse> = options
        .into_iter()
        .map(|o| PollOptionResponse {
            id: o.id,
            hub_id: o.hub_id,
            start_date: o.start_date,
            end_date: o.end_date,
            suggested_by: o.suggested_by,
            user_count: o.user_count,
            is_selected: o.is_selected,
            created_at: o.created_at,
        })
        .collect();

    Ok(Json(responses))
}

/// POST /api/v1/poll-options/:option_id/vote
///
/// Toggle the caller's vote on an option. Requires membership.
pub async fn toggle_vote(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(option_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let member_repo = MemberRepository::new(state.pool.clone());
    let poll_repo = DatePollRepository::new(state.pool.clone());

    let option = poll_repo
        .find_option(option_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Poll option not found".to_string()))?;

    authz::require_member(&member_repo, option.hub_id, auth.user_id).await?;

    let outcome = poll_repo.toggle_vote(option_id, auth.user_id).await?;
    let voted = outcome == VoteToggle::Added;
    metrics::record_vote_toggled(voted);

    let user_count = poll_repo.list_voters(option_id).await?.len() as i64;

    info!(
        option_id = %option_id,
        user_id = %auth.user_id,
        voted = voted,
        "Toggled poll vote"
    );

    Ok(Json(ToggleVoteResponse { voted, user_count }))
}

/// POST /api/v1/poll-options/:option_id/promote
///
/// Copy the option's dates onto the hub's canonical schedule. Requires
/// admin. The option itself is untouched.
pub async fn promote_option(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(option_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let member_repo = MemberRepository::new(state.pool.clone());
    let poll_repo = DatePollRepository::new(state.pool.clone());

    let option = poll_repo
        .find_option(option_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Poll option not found".to_string()))?;

    authz::require_admin(&member_repo, option.hub_id, auth.user_id).await?;

    let schedule = poll_repo
        .promote_option(option_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Poll option not found".to_string()))?;

    info!(
        option_id = %option_id,
        hub_id = %schedule.hub_id,
        promoted_by = %auth.user_id,
        "Promoted poll option to canonical schedule"
    );

    Ok(Json(schedule))
}

/// DELETE /api/v1/poll-options/:option_id
///
/// Remove a poll option and its votes. Requires admin.
pub async fn remove_option(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(option_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let member_repo = MemberRepository::new(state.pool.clone());
    let poll_repo = DatePollRepository::new(state.pool.clone());

    let option = poll_repo
        .find_option(option_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Poll option not found".to_string()))?;

    authz::require_admin(&member_repo, option.hub_id, auth.user_id).await?;

    if !poll_repo.delete_option(option_id).await? {
        return Err(ApiError::NotFound("Poll option not found".to_string()));
    }

    info!(
        option_id = %option_id,
        hub_id = %option.hub_id,
        removed_by = %auth.user_id,
        "Removed poll option"
    );

    Ok(StatusCode::NO_CONTENT)
}
