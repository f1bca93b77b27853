//! Participation repository for database operations.
//!
//! Every mutation of an existing participation is gated on the SHA-256 digest
//! of the edit token presented by the caller.

use chrono::{DateTime, Utc};
use domain::models::{HizbRange, Participation};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{GroupEntity, ParticipationEntity};
use crate::metrics::QueryTimer;

/// Fields of a participation chosen by the joiner.
#[derive(Debug, Clone)]
pub struct NewParticipation<'a> {
    pub display_name: &'a str,
    pub name_initial: &'a str,
    pub hizb_taken: i32,
    pub edit_token_hash: &'a str,
}

/// Escapes `%`, `_` and `\` so the value matches literally under ILIKE.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Repository for participation-related database operations.
#[derive(Clone)]
pub struct ParticipationRepository {
    pool: PgPool,
}

impl ParticipationRepository {
    /// Creates a new ParticipationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List a group's non-cancelled participations, oldest first.
    pub async fn list_active(
        &self,
        group_id: Uuid,
    ) -> Result<Vec<ParticipationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_active_participations");
        let result = sqlx::query_as::<_, ParticipationEntity>(
            r#"
            SELECT id, group_id, display_name, name_initial, hizb_taken, start_hizb, end_hizb,
                   completed, cancelled_at, created_at
            FROM participations
            WHERE group_id = $1 AND cancelled_at IS NULL
            ORDER BY created_at ASC
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Claim a range in a group.
    ///
    /// The group row is locked for the duration of the transaction, so joins to
    /// the same group are serialized. `choose_range` receives the locked group
    /// and its active participations and returns the range to insert; its error
    /// aborts the transaction. Returns `Ok(None)` if the group does not exist.
    pub async fn join_group<F, E>(
        &self,
        group_id: Uuid,
        new: NewParticipation<'_>,
        choose_range: F,
    ) -> Result<Option<ParticipationEntity>, E>
    where
        F: FnOnce(&GroupEntity, &[Participation]) -> Result<HizbRange, E>,
        E: From<sqlx::Error>,
    {
        let timer = QueryTimer::new("join_group");
        let mut tx = self.pool.begin().await?;

        let group = sqlx::query_as::<_, GroupEntity>(
            r#"
            SELECT id, name, total_hizb, join_code, created_at, finished_at, expires_at
            FROM groups
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(group_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(group) = group else {
            return Ok(None);
        };

        let active: Vec<Participation> = sqlx::query_as::<_, ParticipationEntity>(
            r#"
            SELECT id, group_id, display_name, name_initial, hizb_taken, start_hizb, end_hizb,
                   completed, cancelled_at, created_at
            FROM participations
            WHERE group_id = $1 AND cancelled_at IS NULL
            ORDER BY created_at ASC
            "#,
        )
        .bind(group_id)
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

        let range = choose_range(&group, &active)?;

        let participation = sqlx::query_as::<_, ParticipationEntity>(
            r#"
            INSERT INTO participations
                (group_id, display_name, name_initial, hizb_taken, start_hizb, end_hizb, edit_token_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, group_id, display_name, name_initial, hizb_taken, start_hizb, end_hizb,
                      completed, cancelled_at, created_at
            "#,
        )
        .bind(group_id)
        .bind(new.display_name)
        .bind(new.name_initial)
        .bind(new.hizb_taken)
        .bind(range.start)
        .bind(range.end)
        .bind(new.edit_token_hash)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(Some(participation))
    }

    /// Find a returning participant's active claims by name, case-insensitively.
    pub async fn find_by_name(
        &self,
        group_id: Uuid,
        display_name: &str,
        name_initial: &str,
    ) -> Result<Vec<ParticipationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_participations_by_name");
        let result = sqlx::query_as::<_, ParticipationEntity>(
            r#"
            SELECT id, group_id, display_name, name_initial, hizb_taken, start_hizb, end_hizb,
                   completed, cancelled_at, created_at
            FROM participations
            WHERE group_id = $1
              AND display_name ILIKE $2
              AND name_initial ILIKE $3
              AND cancelled_at IS NULL
            ORDER BY created_at ASC
            "#,
        )
        .bind(group_id)
        .bind(escape_like(display_name.trim()))
        .bind(escape_like(name_initial.trim()))
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Mark a participation completed.
    ///
    /// Returns `None` if the ID and token digest do not match a row.
    pub async fn mark_completed(
        &self,
        id: Uuid,
        edit_token_hash: &str,
    ) -> Result<Option<ParticipationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("mark_participation_completed");
        let result = sqlx::query_as::<_, ParticipationEntity>(
            r#"
            UPDATE participations
            SET completed = true
            WHERE id = $1 AND edit_token_hash = $2
            RETURNING id, group_id, display_name, name_initial, hizb_taken, start_hizb, end_hizb,
                      completed, cancelled_at, created_at
            "#,
        )
        .bind(id)
        .bind(edit_token_hash)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Cancel (soft delete) a participation, releasing its range.
    ///
    /// Cancelling twice keeps the first cancellation time.
    pub async fn cancel(
        &self,
        id: Uuid,
        edit_token_hash: &str,
        cancelled_at: DateTime<Utc>,
    ) -> Result<Option<ParticipationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("cancel_participation");
        let result = sqlx::query_as::<_, ParticipationEntity>(
            r#"
            UPDATE participations
            SET cancelled_at = COALESCE(cancelled_at, $3)
            WHERE id = $1 AND edit_token_hash = $2
            RETURNING id, group_id, display_name, name_initial, hizb_taken, start_hizb, end_hizb,
                      completed, cancelled_at, created_at
            "#,
        )
        .bind(id)
        .bind(edit_token_hash)
        .bind(cancelled_at)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Permanently delete a participation, returning the deleted row.
    pub async fn delete(
        &self,
        id: Uuid,
        edit_token_hash: &str,
    ) -> Result<Option<ParticipationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("delete_participation");
        let result = sqlx::query_as::<_, ParticipationEntity>(
            r#"
            DELETE FROM participations
            WHERE id = $1 AND edit_token_hash = $2
            RETURNING id, group_id, display_name, name_initial, hizb_taken, start_hizb, end_hizb,
                      completed, cancelled_at, created_at
            "#,
        )
        .bind(id)
        .bind(edit_token_hash)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}
