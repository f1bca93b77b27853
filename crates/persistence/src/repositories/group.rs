//! Group repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::GroupEntity;
use crate::metrics::QueryTimer;

/// Attempts before giving up on finding an unused join code.
const MAX_CODE_ATTEMPTS: usize = 100;

/// Unique constraint on `groups.join_code`.
const JOIN_CODE_CONSTRAINT: &str = "groups_join_code_key";

/// Repository for group-related database operations.
#[derive(Clone)]
pub struct GroupRepository {
    pool: PgPool,
}

impl GroupRepository {
    /// Creates a new GroupRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new group.
    pub async fn create_group(
        &self,
        name: &str,
        join_code: &str,
        total_hizb: i32,
    ) -> Result<GroupEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_group");
        let result = sqlx::query_as::<_, GroupEntity>(
            r#"
            INSERT INTO groups (name, join_code, total_hizb)
            VALUES ($1, $2, $3)
            RETURNING id, name, total_hizb, join_code, created_at, finished_at, expires_at
            "#,
        )
        .bind(name)
        .bind(join_code)
        .bind(total_hizb)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a group by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<GroupEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_group_by_id");
        let result = sqlx::query_as::<_, GroupEntity>(
            r#"
            SELECT id, name, total_hizb, join_code, created_at, finished_at, expires_at
            FROM groups
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a group by join code.
    pub async fn find_by_code(&self, join_code: &str) -> Result<Option<GroupEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_group_by_code");
        let result = sqlx::query_as::<_, GroupEntity>(
            r#"
            SELECT id, name, total_hizb, join_code, created_at, finished_at, expires_at
            FROM groups
            WHERE join_code = $1
            "#,
        )
        .bind(join_code)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Mark a group finished, unless it already is.
    ///
    /// Returns `None` when no unfinished group has this ID.
    pub async fn finish_group(
        &self,
        id: Uuid,
        finished_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<Option<GroupEntity>, sqlx::Error> {
        let timer = QueryTimer::new("finish_group");
        let result = sqlx::query_as::<_, GroupEntity>(
            r#"
            UPDATE groups
            SET finished_at = $2, expires_at = $3
            WHERE id = $1 AND finished_at IS NULL
            RETURNING id, name, total_hizb, join_code, created_at, finished_at, expires_at
            "#,
        )
        .bind(id)
        .bind(finished_at)
        .bind(expires_at)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create a group under a fresh join code.
    ///
    /// Codes come from `generator`. An insert that collides with an existing
    /// code is retried with the next one.
    pub async fn create_with_unique_code<F>(
        &self,
        name: &str,
        total_hizb: i32,
        mut generator: F,
    ) -> Result<GroupEntity, sqlx::Error>
    where
        F: FnMut() -> String,
    {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = generator();
            match self.create_group(name, &code, total_hizb).await {
                Err(err) if is_join_code_collision(&err) => {
                    tracing::debug!(join_code = %code, "Join code already used, retrying");
                }
                result => return result,
            }
        }

        Err(sqlx::Error::Protocol(
            "Could not generate unique join code".to_string(),
        ))
    }
}

fn is_join_code_collision(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint() == Some(JOIN_CODE_CONSTRAINT),
        _ => false,
    }
}
