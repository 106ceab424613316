//! Date-poll entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the poll_options table.
#[derive(Debug, Clone, FromRow)]
pub struct PollOptionEntity {
    pub id: Uuid,
    pub hub_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub suggested_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<PollOptionEntity> for domain::models::PollOption {
    fn from(entity: PollOptionEntity) -> Self {
        Self {
            id: entity.id,
            hub_id: entity.hub_id,
            start_date: entity.start_date,
            end_date: entity.end_date,
            suggested_by: entity.suggested_by,
            created_at: entity.created_at,
        }
    }
}

/// Poll option with its vote count and derived selection state.
///
/// `is_selected` is computed by comparing the option's dates with the hub's
/// canonical schedule at query time; promotion stores no link back to the
/// option it came from.
#[derive(Debug, Clone, FromRow)]
pub struct PollOptionWithVotesEntity {
    pub id: Uuid,
    pub hub_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub suggested_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub user_count: i64,
    pub is_selected: bool,
}
