//! Hub and roster routes.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::models::{CreateHubRequest, Hub, HubResponse, MemberResponse};
use persistence::repositories::{HubRepository, MemberRepository};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::UserAuth;
use crate::services::authz;

fn hub_response(hub: Hub, member_count: i64) -> HubResponse {
    HubResponse {
        id: hub.id,
        kind: hub.kind,
        name: hub.name,
        description: hub.description,
        is_private: hub.is_private,
        date_poll_enabled: hub.date_poll_enabled,
        prepare_list_enabled: hub.prepare_list_enabled,
        start_date: hub.start_date,
        end_date: hub.end_date,
        member_count,
        created_at: hub.created_at,
    }
}

/// POST /api/v1/hubs
///
/// Create a hub. The creator becomes its first admin.
pub async fn create_hub(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Json(request): Json<CreateHubRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let hub_repo = HubRepository::new(state.pool.clone());
    let hub = hub_repo
        .create(
            request.kind,
            &request.name,
            request.description.as_deref(),
            request.is_private,
            request.date_poll_enabled,
            request.prepare_list_enabled,
            auth.user_id,
        )
        .await?;

    info!(
        hub_id = %hub.id,
        kind = %hub.kind,
        created_by = %auth.user_id,
        "Created hub"
    );

    Ok((StatusCode::CREATED, Json(hub_response(hub, 1))))
}

/// GET /api/v1/hubs/:hub_id
///
/// Fetch a hub with its member count. Requires membership.
pub async fn get_hub(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(hub_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let hub_repo = HubRepository::new(state.pool.clone());
    let member_repo = MemberRepository::new(state.pool.clone());

    let hub = hub_repo
        .find_by_id(hub_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Hub not found".to_string()))?;

    authz::require_member(&member_repo, hub_id, auth.user_id).await?;

    let member_count = member_repo.count_members(hub_id).await?;

    Ok(Json(hub_response(hub, member_count)))
}

/// DELETE /api/v1/hubs/:hub_id
///
/// Delete a hub and everything attached to it. Requires admin.
pub async fn delete_hub(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(hub_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let hub_repo = HubRepository::new(state.pool.clone());
    let member_repo = MemberRepository::new(state.pool.clone());

    if hub_repo.find_by_id(hub_id).await?.is_none() {
        return Err(ApiError::NotFound("Hub not found".to_string()));
    }

    authz::require_admin(&member_repo, hub_id, auth.user_id).await?;

    hub_repo.delete(hub_id).await?;

    info!(hub_id = %hub_id, deleted_by = %auth.user_id, "Deleted hub");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/hubs/:hub_id/members
///
/// List the hub roster. Requires membership.
pub async fn list_members(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(hub_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let member_repo = MemberRepository::new(state.pool.clone());

    authz::require_member(&member_repo, hub_id, auth.user_id).await?;

    let members = member_repo.list_members(hub_id).await?;
    let roster: Vec<MemberResponse> = members
        .into_iter()
        .map(|m| MemberResponse {
            user_id: m.user_id,
            role: m.role,
            joined_at: m.created_at,
        })
        .collect();

    Ok(Json(roster))
}

/// DELETE /api/v1/hubs/:hub_id/members/:user_id
///
/// Remove a member. Admins may remove anyone; members may remove themselves.
pub async fn remove_member(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path((hub_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let member_repo = MemberRepository::new(state.pool.clone());

    let membership = authz::require_member(&member_repo, hub_id, auth.user_id).await?;

    if user_id != auth.user_id && !membership.role.is_admin() {
        return Err(ApiError::Unauthorized(
            "Only admins may remove other members".to_string(),
        ));
    }

    if !member_repo.remove_member(hub_id, user_id).await? {
        return Err(ApiError::NotFound("Member not found".to_string()));
    }

    info!(
        hub_id = %hub_id,
        removed_user = %user_id,
        removed_by = %auth.user_id,
        "Removed hub member"
    );

    Ok(StatusCode::NO_CONTENT)
}
