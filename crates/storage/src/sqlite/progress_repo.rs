use chrono::{DateTime, Utc};
use typus_core::model::{ProgressRecord, SkillKey, SportId, UserId};

use super::SqliteRepository;
use super::mapping::{count_from_i64, db_err, id_to_i64, map_progress_row};
use crate::repository::{ProgressRepository, StorageError};

#[async_trait::async_trait]
impl ProgressRepository for SqliteRepository {
    async fn increment_progress(
        &self,
        user_id: UserId,
        sport_id: SportId,
        skill_key: &SkillKey,
        skill_name: &str,
        at: DateTime<Utc>,
    ) -> Result<u32, StorageError> {
        // Single statement: the unique index on the triple serializes writers,
        // so concurrent completions never read a stale count.
        let watched: i64 = sqlx::query_scalar(
            r"
            INSERT INTO user_progress (user_id, sport_id, skill_key, skill_name, videos_watched, updated_at)
            VALUES (?1, ?2, ?3, ?4, 1, ?5)
            ON CONFLICT(user_id, sport_id, skill_key) DO UPDATE SET
                videos_watched = user_progress.videos_watched + 1,
                updated_at = excluded.updated_at
            RETURNING videos_watched
            ",
        )
        .bind(user_id.to_string())
        .bind(id_to_i64(sport_id.value())?)
        .bind(skill_key.as_str())
        .bind(skill_name.trim())
        .bind(at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        count_from_i64("videos_watched", watched)
    }

    async fn list_progress(
        &self,
        user_id: UserId,
        sport_id: SportId,
    ) -> Result<Vec<ProgressRecord>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT user_id, sport_id, skill_key, skill_name, videos_watched, updated_at
            FROM user_progress
            WHERE user_id = ?1 AND sport_id = ?2
            ORDER BY skill_key ASC
            ",
        )
        .bind(user_id.to_string())
        .bind(id_to_i64(sport_id.value())?)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(map_progress_row).collect()
    }
}
