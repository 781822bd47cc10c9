use typus_core::model::{SkillId, Video, VideoId};

use super::SqliteRepository;
use super::mapping::{count_from_i64, db_err, id_to_i64, map_video_row, video_id_from_i64};
use crate::repository::{NewVideoRecord, StorageError, VideoRepository};

#[async_trait::async_trait]
impl VideoRepository for SqliteRepository {
    async fn get_video(&self, id: VideoId) -> Result<Option<Video>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, skill_id, title, description, video_url, duration_secs
            FROM videos WHERE id = ?1
            ",
        )
        .bind(id_to_i64(id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(map_video_row).transpose()
    }

    async fn list_videos(&self, skill_id: SkillId) -> Result<Vec<Video>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, skill_id, title, description, video_url, duration_secs
            FROM videos
            WHERE skill_id = ?1
            ORDER BY id ASC
            ",
        )
        .bind(id_to_i64(skill_id.value())?)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(map_video_row).collect()
    }

    async fn count_videos(&self, skill_id: SkillId) -> Result<u32, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM videos WHERE skill_id = ?1")
            .bind(id_to_i64(skill_id.value())?)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;

        count_from_i64("video count", count)
    }

    async fn first_video(&self, skill_id: SkillId) -> Result<Option<VideoId>, StorageError> {
        let id: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM videos WHERE skill_id = ?1 ORDER BY id ASC LIMIT 1",
        )
        .bind(id_to_i64(skill_id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        id.map(video_id_from_i64).transpose()
    }

    async fn insert_video(&self, video: &NewVideoRecord) -> Result<VideoId, StorageError> {
        let checked = video.clone().into_video(VideoId::new(0))?;

        let res = sqlx::query(
            r"
            INSERT INTO videos (skill_id, title, description, video_url, duration_secs, uploaded_by)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
        )
        .bind(id_to_i64(checked.skill_id().value())?)
        .bind(checked.title())
        .bind(checked.description())
        .bind(checked.video_url().as_str())
        .bind(checked.duration_secs().map(i64::from))
        .bind(video.uploaded_by.map(|u| u.to_string()))
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        video_id_from_i64(res.last_insert_rowid())
    }
}
