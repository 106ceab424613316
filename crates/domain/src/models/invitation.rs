//! Invitation domain models.
//!
//! Membership is finalized by dual consent: the admin side and the user side
//! each set their acceptance flag independently. The act of creating an
//! invitation implies consent of the creating side, so a live invitation
//! always has exactly one flag still false.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A pending invitation linking a user to a hub.
///
/// A `(hub, user)` pair exists in at most one of memberships and invitations;
/// accepting converts the invitation into a membership atomically.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Invitation {
    pub id: Uuid,
    pub hub_id: Uuid,
    pub user_id: Uuid,
    pub is_user_accepted: bool,
    pub is_admin_accepted: bool,
    pub invited_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Invitation {
    /// True once both sides have consented. A stored invitation never has
    /// both flags set; the record is consumed into a membership instead.
    pub fn is_fully_accepted(&self) -> bool {
        self.is_user_accepted && self.is_admin_accepted
    }

    /// True if the invitation still needs an admin decision (self-request).
    pub fn awaits_admin(&self) -> bool {
        !self.is_admin_accepted
    }

    /// True if the invitation still needs the invited user's decision.
    pub fn awaits_user(&self) -> bool {
        !self.is_user_accepted
    }
}

/// Request payload for creating invitations.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateInvitationsRequest {
    #[validate(length(min = 1, max = 50, message = "Between 1 and 50 user ids required"))]
    pub user_ids: Vec<Uuid>,
}

/// Response for a single invitation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct InvitationResponse {
    pub id: Uuid,
    pub hub_id: Uuid,
    pub user_id: Uuid,
    pub is_user_accepted: bool,
    pub is_admin_accepted: bool,
    pub invited_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Pending invitations for a hub, partitioned by the side whose decision is
/// outstanding. Exactly one flag is false for any live invitation, so each
/// record appears in exactly one partition.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PendingInvitationsResponse {
    /// Self-requests waiting for an admin to accept.
    pub awaiting_admin: Vec<InvitationResponse>,
    /// Admin-initiated invitations waiting for the invited user.
    pub awaiting_user: Vec<InvitationResponse>,
}
