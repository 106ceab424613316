//! Membership repository for database operations.

use domain::models::HubMember;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::hub::HubMemberEntity;
use crate::metrics::QueryTimer;

/// Repository for hub membership database operations.
#[derive(Clone)]
pub struct MemberRepository {
    pool: PgPool,
}

impl MemberRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the membership row for a user in a hub, if any.
    pub async fn get_membership(
        &self,
        hub_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<HubMember>, sqlx::Error> {
        let timer = QueryTimer::new("get_membership");

        let entity = sqlx::query_as::<_, HubMemberEntity>(
            r#"
            SELECT id, hub_id, user_id, role, created_at
            FROM hub_members
            WHERE hub_id = $1 AND user_id = $2
            "#,
        )
        .bind(hub_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        timer.record();
        Ok(entity.map(Into::into))
    }

    /// List all members of a hub, admins first.
    pub async fn list_members(&self, hub_id: Uuid) -> Result<Vec<HubMember>, sqlx::Error> {
        let timer = QueryTimer::new("list_members");

        let entities = sqlx::query_as::<_, HubMemberEntity>(
            r#"
            SELECT id, hub_id, user_id, role, created_at
            FROM hub_members
            WHERE hub_id = $1
            ORDER BY role, created_at
            "#,
        )
        .bind(hub_id)
        .fetch_all(&self.pool)
        .await?;

        timer.record();
        Ok(entities.into_iter().map(Into::into).collect())
    }

    /// Count members of a hub.
    pub async fn count_members(&self, hub_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_members");

        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM hub_members WHERE hub_id = $1
            "#,
        )
        .bind(hub_id)
        .fetch_one(&self.pool)
        .await?;

        timer.record();
        Ok(count)
    }

    /// Return the subset of `user_ids` that are already members of the hub.
    pub async fn members_among(
        &self,
        hub_id: Uuid,
        user_ids: &[Uuid],
    ) -> Result<Vec<Uuid>, sqlx::Error> {
        let timer = QueryTimer::new("members_among");

        let ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT user_id
            FROM hub_members
            WHERE hub_id = $1 AND user_id = ANY($2)
            "#,
        )
        .bind(hub_id)
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await?;

        timer.record();
        Ok(ids)
    }

    /// Remove a member from a hub.
    pub async fn remove_member(&self, hub_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("remove_member");

        let result = sqlx::query(
            r#"
            DELETE FROM hub_members WHERE hub_id = $1 AND user_id = $2
            "#,
        )
        .bind(hub_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        timer.record();
        Ok(result.rows_affected() > 0)
    }
}
