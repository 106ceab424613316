//! Role-based authorization guards for hub operations.
//!
//! Every mutating hub operation runs behind one of these guards. They load
//! the actor's membership row and fail with 401 when the actor is not a
//! member or lacks the required role. The returned membership is handed to
//! the handler so it never re-reads the roster.

use domain::models::HubMember;
use persistence::repositories::MemberRepository;
use uuid::Uuid;

use crate::error::ApiError;

/// Require that the actor is a member of the hub.
///
/// Returns the membership row on success, `ApiError::Unauthorized` otherwise.
pub async fn require_member(
    members: &MemberRepository,
    hub_id: Uuid,
    actor_id: Uuid,
) -> Result<HubMember, ApiError> {
    members
        .get_membership(hub_id, actor_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("You are not a member of this hub".to_string()))
}

/// Require that the actor is an admin of the hub.
///
/// Returns the membership row on success, `ApiError::Unauthorized` otherwise.
pub async fn require_admin(
    members: &MemberRepository,
    hub_id: Uuid,
    actor_id: Uuid,
) -> Result<HubMember, ApiError> {
    let membership = require_member(members, hub_id, actor_id).await?;

    if !membership.role.is_admin() {
        return Err(ApiError::Unauthorized(
            "This action requires the admin role".to_string(),
        ));
    }

    Ok(membership)
}
