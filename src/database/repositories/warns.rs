//! Warn ledger repository
//!
//! Authoritative per-(chat, user) warn counters. Two admins may warn the
//! same user from concurrently handled updates, so every mutation is a
//! single atomic statement (or one transaction holding the row lock) —
//! never a read followed by a separate write.

use sqlx::PgPool;
use crate::utils::errors::ChatWardenError;

#[derive(Debug, Clone)]
pub struct WarnRepository {
    pool: PgPool,
}

impl WarnRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Atomically add one warning and return the resulting count.
    ///
    /// When the new count reaches `warn_limit` the counter is reset to zero
    /// in the same transaction, so no committed state ever holds a count at
    /// or above the limit. The returned value is the pre-reset count; a
    /// return value `>= warn_limit` tells the caller escalation triggered.
    pub async fn increment(&self, chat_id: i64, user_id: i64, warn_limit: i32) -> Result<i32, ChatWardenError> {
        let mut tx = self.pool.begin().await?;

        let (count,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO warns (chat_id, user_id, count)
            VALUES ($1, $2, 1)
            ON CONFLICT (chat_id, user_id)
            DO UPDATE SET count = warns.count + 1
            RETURNING count
            "#
        )
        .bind(chat_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        if count >= warn_limit {
            sqlx::query("UPDATE warns SET count = 0 WHERE chat_id = $1 AND user_id = $2")
                .bind(chat_id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(count)
    }

    /// Atomically remove the last warning; returns whether one was removed
    pub async fn remove_last(&self, chat_id: i64, user_id: i64) -> Result<bool, ChatWardenError> {
        let result = sqlx::query(
            "UPDATE warns SET count = count - 1 WHERE chat_id = $1 AND user_id = $2 AND count > 0"
        )
        .bind(chat_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Atomically clear all warnings; returns whether anything changed
    pub async fn reset_all(&self, chat_id: i64, user_id: i64) -> Result<bool, ChatWardenError> {
        let result = sqlx::query(
            "UPDATE warns SET count = 0 WHERE chat_id = $1 AND user_id = $2 AND count > 0"
        )
        .bind(chat_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Point-in-time read of a user's warn count; absent rows read as zero
    pub async fn get(&self, chat_id: i64, user_id: i64) -> Result<i32, ChatWardenError> {
        let row: Option<(i32,)> = sqlx::query_as(
            "SELECT count FROM warns WHERE chat_id = $1 AND user_id = $2"
        )
        .bind(chat_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(count,)| count).unwrap_or(0))
    }
}
