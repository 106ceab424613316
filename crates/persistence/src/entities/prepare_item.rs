//! Prepare-item and declaration entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the prepare_items table.
#[derive(Debug, Clone, FromRow)]
pub struct PrepareItemEntity {
    pub id: Uuid,
    pub hub_id: Uuid,
    pub description: String,
    pub participants_limit: i32,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<PrepareItemEntity> for domain::models::PrepareItem {
    fn from(entity: PrepareItemEntity) -> Self {
        Self {
            id: entity.id,
            hub_id: entity.hub_id,
            description: entity.description,
            participants_limit: entity.participants_limit,
            created_by: entity.created_by,
            created_at: entity.created_at,
        }
    }
}

/// Database row mapping for the declarations table.
#[derive(Debug, Clone, FromRow)]
pub struct DeclarationEntity {
    pub id: Uuid,
    pub item_id: Uuid,
    pub participant_id: Uuid,
    pub is_done: bool,
    pub created_at: DateTime<Utc>,
}

impl From<DeclarationEntity> for domain::models::Declaration {
    fn from(entity: DeclarationEntity) -> Self {
        Self {
            id: entity.id,
            item_id: entity.item_id,
            participant_id: entity.participant_id,
            is_done: entity.is_done,
            created_at: entity.created_at,
        }
    }
}
