//! Invitation routes implementing the dual-consent protocol.
//!
//! Two shapes of creation are legal: an admin inviting a batch of users
//! (admin consent implicit) and a user requesting to join a private hub
//! (user consent implicit). Acceptance by the other side converts the
//! invitation into a membership in one atomic unit.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::models::{
    CreateInvitationsRequest, Invitation, InvitationResponse, MemberResponse,
    PendingInvitationsResponse,
};
use persistence::repositories::{HubRepository, InvitationRepository, MemberRepository};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{metrics, UserAuth};
use crate::services::authz;

fn invitation_response(inv: Invitation) -> InvitationResponse {
    InvitationResponse {
        id: inv.id,
        hub_id: inv.hub_id,
        user_id: inv.user_id,
        is_user_accepted: inv.is_user_accepted,
        is_admin_accepted: inv.is_admin_accepted,
        invited_by: inv.invited_by,
        created_at: inv.created_at,
    }
}

/// POST /api/v1/hubs/:hub_id/invitations
///
/// Create invitations for a batch of users. Admins invite others; a
/// non-admin may only self-request on a private hub.
pub async fn create_invitations(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(hub_id): Path<Uuid>,
    Json(request): Json<CreateInvitationsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let hub_repo = HubRepository::new(state.pool.clone());
    let member_repo = MemberRepository::new(state.pool.clone());
    let invitation_repo = InvitationRepository::new(state.pool.clone());

    let hub = hub_repo
        .find_by_id(hub_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Hub not found".to_string()))?;

    let actor_membership = member_repo.get_membership(hub_id, auth.user_id).await?;
    let actor_is_admin = actor_membership
        .as_ref()
        .map(|m| m.role.is_admin())
        .unwrap_or(false);
    let is_self_request = request.user_ids == [auth.user_id];

    // Determine the consent side implied by the shape of the call.
    let (invited_by, is_user_accepted, is_admin_accepted) = if actor_is_admin {
        (Some(auth.user_id), false, true)
    } else if is_self_request && hub.is_private {
        (None, true, false)
    } else {
        return Err(ApiError::Unauthorized(
            "Only admins may invite other users".to_string(),
        ));
    };

    // Existing members cannot be invited; report the offending ids.
    let already_members = member_repo.members_among(hub_id, &request.user_ids).await?;
    if !already_members.is_empty() {
        let offenders: Vec<String> = already_members.iter().map(Uuid::to_string).collect();
        return Err(ApiError::Validation(format!(
            "Already members: {}",
            offenders.join(", ")
        )));
    }

    let created = invitation_repo
        .create_for_targets(
            hub_id,
            &request.user_ids,
            invited_by,
            is_user_accepted,
            is_admin_accepted,
        )
        .await?;

    info!(
        hub_id = %hub_id,
        actor = %auth.user_id,
        count = created.len(),
        self_request = is_self_request && !actor_is_admin,
        "Created invitations"
    );

    let responses: Vec<InvitationResponse> =
        created.into_iter().map(invitation_response).collect();

    Ok((StatusCode::CREATED, Json(responses)))
}

/// GET /api/v1/hubs/:hub_id/invitations
///
/// List pending invitations for a hub, partitioned by the side whose
/// decision is outstanding. Requires membership.
pub async fn list_pending(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(hub_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let member_repo = MemberRepository::new(state.pool.clone());
    let invitation_repo = InvitationRepository::new(state.pool.clone());

    authz::require_member(&member_repo, hub_id, auth.user_id).await?;

    let pending = invitation_repo.list_pending(hub_id).await?;

    let (awaiting_admin, awaiting_user): (Vec<Invitation>, Vec<Invitation>) =
        pending.into_iter().partition(Invitation::awaits_admin);

    Ok(Json(PendingInvitationsResponse {
        awaiting_admin: awaiting_admin.into_iter().map(invitation_response).collect(),
        awaiting_user: awaiting_user.into_iter().map(invitation_response).collect(),
    }))
}

/// GET /api/v1/invitations
///
/// List pending invitations addressed to the caller across all hubs.
pub async fn list_mine(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
) -> Result<impl IntoResponse, ApiError> {
    let invitation_repo = InvitationRepository::new(state.pool.clone());

    let invitations = invitation_repo.list_for_user(auth.user_id).await?;
    let responses: Vec<InvitationResponse> =
        invitations.into_iter().map(invitation_response).collect();

    Ok(Json(responses))
}

/// POST /api/v1/invitations/:invitation_id/accept
///
/// Accept an invitation from the side whose consent is still missing.
/// Returns the created membership with 201.
pub async fn accept_invitation(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(invitation_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let member_repo = MemberRepository::new(state.pool.clone());
    let invitation_repo = InvitationRepository::new(state.pool.clone());

    let invitation = invitation_repo
        .find_by_id(invitation_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invitation not found".to_string()))?;

    // The invited user completes an admin-initiated invite; an admin
    // completes a self-request. Nobody else may accept.
    let eligible = if auth.user_id == invitation.user_id && invitation.is_admin_accepted {
        true
    } else if invitation.is_user_accepted {
        let membership = member_repo
            .get_membership(invitation.hub_id, auth.user_id)
            .await?;
        membership.map(|m| m.role.is_admin()).unwrap_or(false)
    } else {
        false
    };

    if !eligible {
        return Err(ApiError::Unauthorized(
            "You may not accept this invitation".to_string(),
        ));
    }

    let member = invitation_repo
        .accept(invitation_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invitation not found".to_string()))?;

    metrics::record_invitation_accepted();

    info!(
        invitation_id = %invitation_id,
        hub_id = %member.hub_id,
        user_id = %member.user_id,
        accepted_by = %auth.user_id,
        "Accepted invitation"
    );

    Ok((
        StatusCode::CREATED,
        Json(MemberResponse {
            user_id: member.user_id,
            role: member.role,
            joined_at: member.created_at,
        }),
    ))
}

/// DELETE /api/v1/invitations/:invitation_id
///
/// Decline or revoke an invitation. The invited user or any hub admin may
/// delete it unconditionally.
pub async fn decline_invitation(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(invitation_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let member_repo = MemberRepository::new(state.pool.clone());
    let invitation_repo = InvitationRepository::new(state.pool.clone());

    let invitation = invitation_repo
        .find_by_id(invitation_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invitation not found".to_string()))?;

    if auth.user_id != invitation.user_id {
        authz::require_admin(&member_repo, invitation.hub_id, auth.user_id).await?;
    }

    if !invitation_repo.delete(invitation_id).await? {
        return Err(ApiError::NotFound("Invitation not found".to_string()));
    }

    info!(
        invitation_id = %invitation_id,
        hub_id = %invitation.hub_id,
        declined_by = %auth.user_id,
        "Declined invitation"
    );

    Ok(StatusCode::NO_CONTENT)
}
