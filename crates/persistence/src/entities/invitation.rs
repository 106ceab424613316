//! Invitation entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the hub_invitations table.
#[derive(Debug, Clone, FromRow)]
pub struct HubInvitationEntity {
    pub id: Uuid,
    pub hub_id: Uuid,
    pub user_id: Uuid,
    pub is_user_accepted: bool,
    pub is_admin_accepted: bool,
    pub invited_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<HubInvitationEntity> for domain::models::Invitation {
    fn from(entity: HubInvitationEntity) -> Self {
        Self {
            id: entity.id,
            hub_id: entity.hub_id,
            user_id: entity.user_id,
            is_user_accepted: entity.is_user_accepted,
            is_admin_accepted: entity.is_admin_accepted,
            invited_by: entity.invited_by,
            created_at: entity.created_at,
        }
    }
}
