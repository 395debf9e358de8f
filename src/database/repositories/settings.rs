//! Chat settings repository

use sqlx::PgPool;
use crate::models::settings::{ChatSettings, ChatSettingsPatch};
use crate::utils::errors::ChatWardenError;

#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a chat's settings, falling back to the defaults for chats that
    /// never stored any
    pub async fn get(&self, chat_id: i64) -> Result<ChatSettings, ChatWardenError> {
        let settings = sqlx::query_as::<_, ChatSettings>(
            r#"
            SELECT chat_id, warn_limit, warn_mode, warn_duration, log_chat_id
            FROM chat_settings
            WHERE chat_id = $1
            "#
        )
        .bind(chat_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(settings.unwrap_or_else(|| ChatSettings::default_for(chat_id)))
    }

    /// Apply a partial settings patch.
    ///
    /// Returns whether the stored value actually differed from the previous
    /// one; callers use this to phrase "changed" vs. "was not changed"
    /// confirmations. The row is locked for the read-merge-write so
    /// concurrent patches serialize.
    pub async fn update(&self, chat_id: i64, patch: ChatSettingsPatch) -> Result<bool, ChatWardenError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO chat_settings (chat_id) VALUES ($1) ON CONFLICT (chat_id) DO NOTHING"
        )
        .bind(chat_id)
        .execute(&mut *tx)
        .await?;

        let current = sqlx::query_as::<_, ChatSettings>(
            r#"
            SELECT chat_id, warn_limit, warn_mode, warn_duration, log_chat_id
            FROM chat_settings
            WHERE chat_id = $1
            FOR UPDATE
            "#
        )
        .bind(chat_id)
        .fetch_one(&mut *tx)
        .await?;

        let merged = current.apply(&patch);
        if merged == current {
            tx.commit().await?;
            return Ok(false);
        }

        sqlx::query(
            r#"
            UPDATE chat_settings
            SET warn_limit = $2, warn_mode = $3, warn_duration = $4, log_chat_id = $5
            WHERE chat_id = $1
            "#
        )
        .bind(chat_id)
        .bind(merged.warn_limit)
        .bind(merged.warn_mode)
        .bind(&merged.warn_duration)
        .bind(merged.log_chat_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }
}
