//! Invitation repository for database operations.
//!
//! Invitations follow a dual-consent protocol: one consent flag is set at
//! creation time and the other side's acceptance consumes the row into a
//! membership. The `(hub_id, user_id)` pair may live in at most one of
//! hub_members or hub_invitations; both guarantees are enforced here with
//! conditional inserts and the tables' unique indexes, never with separate
//! read-then-write statements.

use domain::models::{HubMember, Invitation};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::db::is_unique_violation;
use crate::entities::hub::HubMemberEntity;
use crate::entities::invitation::HubInvitationEntity;
use crate::metrics::QueryTimer;

/// Errors surfaced by invitation storage operations.
#[derive(Debug, Error)]
pub enum InvitationStoreError {
    /// The target user became a member between validation and insert.
    #[error("user {0} is already a member")]
    AlreadyMember(Uuid),

    /// A live invitation already exists for the pair.
    #[error("user {0} already has a pending invitation")]
    AlreadyInvited(Uuid),

    /// The accepted user already holds a membership row.
    #[error("membership already exists")]
    MembershipConflict,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Repository for invitation database operations.
#[derive(Clone)]
pub struct InvitationRepository {
    pool: PgPool,
}

impl InvitationRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create invitations for a batch of target users in one transaction.
    ///
    /// Each insert is conditional on the target not being a member, so a
    /// membership that appears concurrently cannot be shadowed by a fresh
    /// invitation. A duplicate live invitation trips the unique index and
    /// rolls the whole batch back. Membership is re-read after each insert:
    /// if the insert waited on the unique index while a racing accept
    /// consumed the old invitation, the member row it committed is only
    /// visible to statements issued after the wait resolved.
    pub async fn create_for_targets(
        &self,
        hub_id: Uuid,
        target_user_ids: &[Uuid],
        invited_by: Option<Uuid>,
        is_user_accepted: bool,
        is_admin_accepted: bool,
    ) -> Result<Vec<Invitation>, InvitationStoreError> {
        let timer = QueryTimer::new("create_invitations");

        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(target_user_ids.len());

        for &user_id in target_user_ids {
            let result = sqlx::query_as::<_, HubInvitationEntity>(
                r#"
                INSERT INTO hub_invitations (hub_id, user_id, is_user_accepted, is_admin_accepted, invited_by)
                SELECT $1, $2, $3, $4, $5
                WHERE NOT EXISTS (
                    SELECT 1 FROM hub_members WHERE hub_id = $1 AND user_id = $2
                )
                RETURNING id, hub_id, user_id, is_user_accepted, is_admin_accepted, invited_by, created_at
                "#,
            )
            .bind(hub_id)
            .bind(user_id)
            .bind(is_user_accepted)
            .bind(is_admin_accepted)
            .bind(invited_by)
            .fetch_optional(&mut *tx)
            .await;

            match result {
                Ok(Some(entity)) => {
                    // The NOT EXISTS guard ran on a snapshot taken before any
                    // wait on the unique index. Re-read membership now that
                    // the insert has resolved; a hit rolls the batch back.
                    let membership = sqlx::query_scalar::<_, i32>(
                        "SELECT 1 FROM hub_members WHERE hub_id = $1 AND user_id = $2",
                    )
                    .bind(hub_id)
                    .bind(user_id)
                    .fetch_optional(&mut *tx)
                    .await?;

                    if membership.is_some() {
                        return Err(InvitationStoreError::AlreadyMember(user_id));
                    }

                    created.push(entity.into());
                }
                Ok(None) => return Err(InvitationStoreError::AlreadyMember(user_id)),
                Err(err) if is_unique_violation(&err) => {
                    return Err(InvitationStoreError::AlreadyInvited(user_id));
                }
                Err(err) => return Err(err.into()),
            }
        }

        tx.commit().await?;
        timer.record();

        Ok(created)
    }

    /// Find invitation by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Invitation>, sqlx::Error> {
        let timer = QueryTimer::new("find_invitation_by_id");

        let entity = sqlx::query_as::<_, HubInvitationEntity>(
            r#"
            SELECT id, hub_id, user_id, is_user_accepted, is_admin_accepted, invited_by, created_at
            FROM hub_invitations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        timer.record();
        Ok(entity.map(Into::into))
    }

    /// Consume an invitation into a membership.
    ///
    /// Deletes the invitation and inserts the member row in one transaction.
    /// Returns `Ok(None)` if the invitation is already gone (a racing accept
    /// or decline won). A pre-existing membership row aborts the transaction
    /// with `MembershipConflict` so no partial state survives.
    pub async fn accept(&self, id: Uuid) -> Result<Option<HubMember>, InvitationStoreError> {
        let timer = QueryTimer::new("accept_invitation");

        let mut tx = self.pool.begin().await?;

        let invitation = sqlx::query_as::<_, HubInvitationEntity>(
            r#"
            DELETE FROM hub_invitations
            WHERE id = $1
            RETURNING id, hub_id, user_id, is_user_accepted, is_admin_accepted, invited_by, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let invitation = match invitation {
            Some(inv) => inv,
            None => return Ok(None),
        };

        let member = sqlx::query_as::<_, HubMemberEntity>(
            r#"
            INSERT INTO hub_members (hub_id, user_id, role)
            VALUES ($1, $2, 'member')
            RETURNING id, hub_id, user_id, role, created_at
            "#,
        )
        .bind(invitation.hub_id)
        .bind(invitation.user_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                InvitationStoreError::MembershipConflict
            } else {
                InvitationStoreError::Database(err)
            }
        })?;

        tx.commit().await?;
        timer.record();

        Ok(Some(member.into()))
    }

    /// Delete an invitation (decline or revoke).
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_invitation");

        let result = sqlx::query("DELETE FROM hub_invitations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        timer.record();
        Ok(result.rows_affected() > 0)
    }

    /// List all pending invitations for a hub.
    pub async fn list_pending(&self, hub_id: Uuid) -> Result<Vec<Invitation>, sqlx::Error> {
        let timer = QueryTimer::new("list_pending_invitations");

        let entities = sqlx::query_as::<_, HubInvitationEntity>(
            r#"
            SELECT id, hub_id, user_id, is_user_accepted, is_admin_accepted, invited_by, created_at
            FROM hub_invitations
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

    /// List pending invitations addressed to a user across all hubs.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Invitation>, sqlx::Error> {
        let timer = QueryTimer::new("list_invitations_for_user");

        let entities = sqlx::query_as::<_, HubInvitationEntity>(
            r#"
            SELECT id, hub_id, user_id, is_user_accepted, is_admin_accepted, invited_by, created_at
            FROM hub_invitations
            WHERE user_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        timer.record();
        Ok(entities.into_iter().map(Into::into).collect())
    }
}
