//! Hub and membership entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::hub::{HubKind, HubRole};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for hub_kind that maps to the PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "hub_kind", rename_all = "lowercase")]
pub enum HubKindDb {
    Event,
    Group,
}

impl From<HubKindDb> for HubKind {
    fn from(db_kind: HubKindDb) -> Self {
        match db_kind {
            HubKindDb::Event => HubKind::Event,
            HubKindDb::Group => HubKind::Group,
        }
    }
}

impl From<HubKind> for HubKindDb {
    fn from(kind: HubKind) -> Self {
        match kind {
            HubKind::Event => HubKindDb::Event,
            HubKind::Group => HubKindDb::Group,
        }
    }
}

/// Database enum for hub_role that maps to the PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "hub_role", rename_all = "lowercase")]
pub enum HubRoleDb {
    Admin,
    Member,
}

impl From<HubRoleDb> for HubRole {
    fn from(db_role: HubRoleDb) -> Self {
        match db_role {
            HubRoleDb::Admin => HubRole::Admin,
            HubRoleDb::Member => HubRole::Member,
        }
    }
}

impl From<HubRole> for HubRoleDb {
    fn from(role: HubRole) -> Self {
        match role {
            HubRole::Admin => HubRoleDb::Admin,
            HubRole::Member => HubRoleDb::Member,
        }
    }
}

/// Database row mapping for the hubs table.
#[derive(Debug, Clone, FromRow)]
pub struct HubEntity {
    pub id: Uuid,
    pub kind: HubKindDb,
    pub name: String,
    pub description: Option<String>,
    pub is_private: bool,
    pub date_poll_enabled: bool,
    pub prepare_list_enabled: bool,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<HubEntity> for domain::models::Hub {
    fn from(entity: HubEntity) -> Self {
        Self {
            id: entity.id,
            kind: entity.kind.into(),
            name: entity.name,
            description: entity.description,
            is_private: entity.is_private,
            date_poll_enabled: entity.date_poll_enabled,
            prepare_list_enabled: entity.prepare_list_enabled,
            start_date: entity.start_date,
            end_date: entity.end_date,
            created_by: entity.created_by,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Database row mapping for the hub_members table.
#[derive(Debug, Clone, FromRow)]
pub struct HubMemberEntity {
    pub id: Uuid,
    pub hub_id: Uuid,
    pub user_id: Uuid,
    pub role: HubRoleDb,
    pub created_at: DateTime<Utc>,
}

impl From<HubMemberEntity> for domain::models::HubMember {
    fn from(entity: HubMemberEntity) -> Self {
        Self {
            id: entity.id,
            hub_id: entity.hub_id,
            user_id: entity.user_id,
            role: entity.role.into(),
            created_at: entity.created_at,
        }
    }
}
