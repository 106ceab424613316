//! Date-poll repository for database operations.
//!
//! Votes are a pure toggle set on `(option_id, user_id)`. The unique index
//! serializes racing identical toggles; `ON CONFLICT DO NOTHING` absorbs the
//! duplicate insert instead of failing the request. Promotion copies the
//! option's dates onto the hub's canonical schedule in a single UPDATE, and
//! "currently selected" is derived on every read by comparing dates.

use chrono::{DateTime, Utc};
use domain::models::{PollOption, PromotedSchedule};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::date_poll::{PollOptionEntity, PollOptionWithVotesEntity};
use crate::metrics::QueryTimer;

/// Outcome of a vote toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteToggle {
    /// A vote was recorded for the option.
    Added,
    /// An existing vote was withdrawn.
    Removed,
}

/// Repository for date-poll database operations.
#[derive(Clone)]
pub struct DatePollRepository {
    pool: PgPool,
}

impl DatePollRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new poll option.
    pub async fn create_option(
        &self,
        hub_id: Uuid,
        start_date: DateTime<Utc>,
        end_date: Option<DateTime<Utc>>,
        suggested_by: Uuid,
    ) -> Result<PollOption, sqlx::Error> {
        let timer = QueryTimer::new("create_poll_option");

        let entity = sqlx::query_as::<_, PollOptionEntity>(
            r#"
            INSERT INTO poll_options (hub_id, start_date, end_date, suggested_by)
            VALUES ($1, $2, $3, $4)
            RETURNING id, hub_id, start_date, end_date, suggested_by, created_at
            "#,
        )
        .bind(hub_id)
        .bind(start_date)
        .bind(end_date)
        .bind(suggested_by)
        .fetch_one(&self.pool)
        .await?;

        timer.record();
        Ok(entity.into())
    }

    /// Find poll option by ID.
    pub async fn find_option(&self, id: Uuid) -> Result<Option<PollOption>, sqlx::Error> {
        let timer = QueryTimer::new("find_poll_option_by_id");

        let entity = sqlx::query_as::<_, PollOptionEntity>(
            r#"
            SELECT id, hub_id, start_date, end_date, suggested_by, created_at
            FROM poll_options
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        timer.record();
        Ok(entity.map(Into::into))
    }

    /// List a hub's poll options with vote counts and derived selection state.
    ///
    /// `is_selected` compares the option's dates to the hub's canonical
    /// schedule with IS NOT DISTINCT FROM so NULL end dates compare as equal.
    pub async fn list_options(
        &self,
        hub_id: Uuid,
    ) -> Result<Vec<PollOptionWithVotesEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_poll_options");

        let entities = sqlx::query_as::<_, PollOptionWithVotesEntity>(
            r#"
            SELECT
                o.id, o.hub_id, o.start_date, o.end_date, o.suggested_by, o.created_at,
                COUNT(v.id) AS user_count,
                (o.start_date IS NOT DISTINCT FROM h.start_date
                 AND o.end_date IS NOT DISTINCT FROM h.end_date) AS is_selected
            FROM poll_options o
            JOIN hubs h ON h.id = o.hub_id
            LEFT JOIN poll_votes v ON v.option_id = o.id
            WHERE o.hub_id = $1
            GROUP BY o.id, o.hub_id, o.start_date, o.end_date, o.suggested_by, o.created_at,
                     h.start_date, h.end_date
            ORDER BY o.start_date
            "#,
        )
        .bind(hub_id)
        .fetch_all(&self.pool)
        .await?;

        timer.record();
        Ok(entities)
    }

    /// List the voters for an option.
    pub async fn list_voters(&self, option_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
        let timer = QueryTimer::new("list_poll_voters");

        let ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT user_id FROM poll_votes WHERE option_id = $1 ORDER BY created_at
            "#,
        )
        .bind(option_id)
        .fetch_all(&self.pool)
        .await?;

        timer.record();
        Ok(ids)
    }

    /// Toggle a user's vote on an option.
    ///
    /// Delete-then-insert: if a vote row was removed the toggle is done,
    /// otherwise insert one. A racing duplicate insert is absorbed by
    /// `ON CONFLICT DO NOTHING` and still reports `Added` since the vote
    /// exists either way.
    pub async fn toggle_vote(
        &self,
        option_id: Uuid,
        user_id: Uuid,
    ) -> Result<VoteToggle, sqlx::Error> {
        let timer = QueryTimer::new("toggle_poll_vote");

        let deleted = sqlx::query(
            r#"
            DELETE FROM poll_votes WHERE option_id = $1 AND user_id = $2
            "#,
        )
        .bind(option_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if deleted.rows_affected() > 0 {
            timer.record();
            return Ok(VoteToggle::Removed);
        }

        sqlx::query(
            r#"
            INSERT INTO poll_votes (option_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (option_id, user_id) DO NOTHING
            "#,
        )
        .bind(option_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        timer.record();
        Ok(VoteToggle::Added)
    }

    /// Delete a poll option; its votes cascade.
    pub async fn delete_option(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_poll_option");

        let result = sqlx::query("DELETE FROM poll_options WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        timer.record();
        Ok(result.rows_affected() > 0)
    }

    /// Promote an option's dates onto the hub's canonical schedule.
    ///
    /// Single UPDATE joined against the option row, so the copied dates are
    /// exactly the option's dates at promotion time. The option itself is
    /// untouched; selection is derived on read.
    pub async fn promote_option(
        &self,
        option_id: Uuid,
    ) -> Result<Option<PromotedSchedule>, sqlx::Error> {
        let timer = QueryTimer::new("promote_poll_option");

        let row = sqlx::query_as::<_, (Uuid, DateTime<Utc>, Option<DateTime<Utc>>)>(
            r#"
            UPDATE hubs
            SET start_date = o.start_date, end_date = o.end_date, updated_at = NOW()
            FROM poll_options o
            WHERE o.id = $1 AND hubs.id = o.hub_id
            RETURNING hubs.id, o.start_date, o.end_date
            "#,
        )
        .bind(option_id)
        .fetch_optional(&self.pool)
        .await?;

        timer.record();
        Ok(row.map(|(hub_id, start_date, end_date)| PromotedSchedule {
            hub_id,
            start_date,
            end_date,
        }))
    }
}
