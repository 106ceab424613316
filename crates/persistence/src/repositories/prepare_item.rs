//! Prepare-item repository for database operations.
//!
//! The declare toggle is the capacity-sensitive path: the item row is locked
//! with `FOR UPDATE` before the declaration count is read, so N concurrent
//! declares against a limit of K admit exactly K. The unique index on
//! `(item_id, participant_id)` keeps racing identical toggles from
//! double-applying.

use domain::models::{Declaration, PrepareItem};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::entities::prepare_item::{DeclarationEntity, PrepareItemEntity};
use crate::metrics::QueryTimer;

const UNLIMITED_PARTICIPANTS: i32 = -1;

/// Errors surfaced by prepare-item storage operations.
#[derive(Debug, Error)]
pub enum PrepareStoreError {
    /// The referenced item does not exist.
    #[error("prepare item not found")]
    ItemNotFound,

    /// The item's participant slots are full.
    #[error("participants limit of {limit} reached")]
    CapacityExceeded { limit: i32 },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Outcome of a declare toggle.
#[derive(Debug, Clone)]
pub enum DeclarationToggle {
    /// A new declaration was recorded.
    Declared(Declaration),
    /// An existing declaration was withdrawn.
    Undeclared,
}

/// Repository for prepare-item database operations.
#[derive(Clone)]
pub struct PrepareItemRepository {
    pool: PgPool,
}

impl PrepareItemRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new prepare item.
    pub async fn create(
        &self,
        hub_id: Uuid,
        description: &str,
        participants_limit: i32,
        created_by: Uuid,
    ) -> Result<PrepareItem, sqlx::Error> {
        let timer = QueryTimer::new("create_prepare_item");

        let entity = sqlx::query_as::<_, PrepareItemEntity>(
            r#"
            INSERT INTO prepare_items (hub_id, description, participants_limit, created_by)
            VALUES ($1, $2, $3, $4)
            RETURNING id, hub_id, description, participants_limit, created_by, created_at
            "#,
        )
        .bind(hub_id)
        .bind(description)
        .bind(participants_limit)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        timer.record();
        Ok(entity.into())
    }

    /// Find prepare item by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<PrepareItem>, sqlx::Error> {
        let timer = QueryTimer::new("find_prepare_item_by_id");

        let entity = sqlx::query_as::<_, PrepareItemEntity>(
            r#"
            SELECT id, hub_id, description, participants_limit, created_by, created_at
            FROM prepare_items
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        timer.record();
        Ok(entity.map(Into::into))
    }

    /// List a hub's prepare items in creation order.
    pub async fn list_by_hub(&self, hub_id: Uuid) -> Result<Vec<PrepareItem>, sqlx::Error> {
        let timer = QueryTimer::new("list_prepare_items");

        let entities = sqlx::query_as::<_, PrepareItemEntity>(
            r#"
            SELECT id, hub_id, description, participants_limit, created_by, created_at
            FROM prepare_items
            WHERE hub_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(hub_id)
        .fetch_all(&self.pool)
        .await?;

        timer.record();
        Ok(entities.into_iter().map(Into::into).collect())
    }

    /// List all declarations for a hub's items in one round trip.
    pub async fn list_declarations_by_hub(
        &self,
        hub_id: Uuid,
    ) -> Result<Vec<Declaration>, sqlx::Error> {
        let timer = QueryTimer::new("list_declarations_by_hub");

        let entities = sqlx::query_as::<_, DeclarationEntity>(
            r#"
            SELECT d.id, d.item_id, d.participant_id, d.is_done, d.created_at
            FROM declarations d
            JOIN prepare_items i ON i.id = d.item_id
            WHERE i.hub_id = $1
            ORDER BY d.created_at
            "#,
        )
        .bind(hub_id)
        .fetch_all(&self.pool)
        .await?;

        timer.record();
        Ok(entities.into_iter().map(Into::into).collect())
    }

    /// List declarations for a single item.
    pub async fn list_declarations(&self, item_id: Uuid) -> Result<Vec<Declaration>, sqlx::Error> {
        let timer = QueryTimer::new("list_declarations");

        let entities = sqlx::query_as::<_, DeclarationEntity>(
            r#"
            SELECT id, item_id, participant_id, is_done, created_at
            FROM declarations
            WHERE item_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;

        timer.record();
        Ok(entities.into_iter().map(Into::into).collect())
    }

    /// Toggle a participant's declaration on an item.
    ///
    /// The item row is locked for the duration of the transaction, which
    /// serializes concurrent declares on the same item. With the row held,
    /// an existing declaration is withdrawn; otherwise the current count is
    /// checked against the limit before inserting.
    pub async fn toggle_declaration(
        &self,
        item_id: Uuid,
        participant_id: Uuid,
    ) -> Result<DeclarationToggle, PrepareStoreError> {
        let timer = QueryTimer::new("toggle_declaration");

        let mut tx = self.pool.begin().await?;

        let limit = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT participants_limit FROM prepare_items WHERE id = $1 FOR UPDATE
            "#,
        )
        .bind(item_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(PrepareStoreError::ItemNotFound)?;

        let deleted = sqlx::query(
            r#"
            DELETE FROM declarations WHERE item_id = $1 AND participant_id = $2
            "#,
        )
        .bind(item_id)
        .bind(participant_id)
        .execute(&mut *tx)
        .await?;

        if deleted.rows_affected() > 0 {
            tx.commit().await?;
            timer.record();
            return Ok(DeclarationToggle::Undeclared);
        }

        if limit != UNLIMITED_PARTICIPANTS {
            let count = sqlx::query_scalar::<_, i64>(
                r#"
                SELECT COUNT(*) FROM declarations WHERE item_id = $1
                "#,
            )
            .bind(item_id)
            .fetch_one(&mut *tx)
            .await?;

            if count >= i64::from(limit) {
                return Err(PrepareStoreError::CapacityExceeded { limit });
            }
        }

        let declaration = sqlx::query_as::<_, DeclarationEntity>(
            r#"
            INSERT INTO declarations (item_id, participant_id, is_done)
            VALUES ($1, $2, FALSE)
            RETURNING id, item_id, participant_id, is_done, created_at
            "#,
        )
        .bind(item_id)
        .bind(participant_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();

        Ok(DeclarationToggle::Declared(declaration.into()))
    }

    /// Flip a declaration's done flag. Returns the updated declaration, or
    /// `None` if the participant has no declaration on the item.
    pub async fn toggle_done(
        &self,
        item_id: Uuid,
        participant_id: Uuid,
    ) -> Result<Option<Declaration>, sqlx::Error> {
        let timer = QueryTimer::new("toggle_declaration_done");

        let entity = sqlx::query_as::<_, DeclarationEntity>(
            r#"
            UPDATE declarations
            SET is_done = NOT is_done
            WHERE item_id = $1 AND participant_id = $2
            RETURNING id, item_id, participant_id, is_done, created_at
            "#,
        )
        .bind(item_id)
        .bind(participant_id)
        .fetch_optional(&self.pool)
        .await?;

        timer.record();
        Ok(entity.map(Into::into))
    }

    /// Delete a prepare item; its declarations cascade.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_prepare_item");

        let result = sqlx::query("DELETE FROM prepare_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        timer.record();
        Ok(result.rows_affected() > 0)
    }
}
