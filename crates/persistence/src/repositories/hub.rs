//! Hub repository for database operations.

use domain::models::{Hub, HubKind};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::hub::{HubEntity, HubKindDb};
use crate::metrics::QueryTimer;

/// Repository for hub database operations.
#[derive(Clone)]
pub struct HubRepository {
    pool: PgPool,
}

impl HubRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new hub and enroll the creator as its first admin.
    ///
    /// Both inserts run in one transaction so a hub can never exist without
    /// at least one admin.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        kind: HubKind,
        name: &str,
        description: Option<&str>,
        is_private: bool,
        date_poll_enabled: bool,
        prepare_list_enabled: bool,
        created_by: Uuid,
    ) -> Result<Hub, sqlx::Error> {
        let timer = QueryTimer::new("create_hub");

        let mut tx = self.pool.begin().await?;

        let entity = sqlx::query_as::<_, HubEntity>(
            r#"
            INSERT INTO hubs (kind, name, description, is_private, date_poll_enabled, prepare_list_enabled, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, kind, name, description, is_private, date_poll_enabled, prepare_list_enabled, start_date, end_date, created_by, created_at, updated_at
            "#,
        )
        .bind(HubKindDb::from(kind))
        .bind(name)
        .bind(description)
        .bind(is_private)
        .bind(date_poll_enabled)
        .bind(prepare_list_enabled)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO hub_members (hub_id, user_id, role)
            VALUES ($1, $2, 'admin')
            "#,
        )
        .bind(entity.id)
        .bind(created_by)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();

        Ok(entity.into())
    }

    /// Find hub by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Hub>, sqlx::Error> {
        let timer = QueryTimer::new("find_hub_by_id");

        let entity = sqlx::query_as::<_, HubEntity>(
            r#"
            SELECT id, kind, name, description, is_private, date_poll_enabled, prepare_list_enabled, start_date, end_date, created_by, created_at, updated_at
            FROM hubs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        timer.record();
        Ok(entity.map(Into::into))
    }

    /// Delete a hub; memberships, invitations, items and poll options cascade.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_hub");

        let result = sqlx::query("DELETE FROM hubs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        timer.record();
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hub_kind_db_conversion() {
        assert_eq!(HubKindDb::from(HubKind::Event), HubKindDb::Event);
        assert_eq!(HubKind::from(HubKindDb::Group), HubKind::Group);
    }
}
