use typus_core::model::{Sport, SportId};

use super::SqliteRepository;
use super::mapping::{db_err, id_to_i64, map_sport_row, sport_id_from_i64};
use crate::repository::{SportRecord, SportRepository, StorageError};

#[async_trait::async_trait]
impl SportRepository for SqliteRepository {
    async fn list_sports(&self) -> Result<Vec<Sport>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, slug, name, description, image_url
            FROM sports
            ORDER BY name ASC, id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(map_sport_row).collect()
    }

    async fn get_sport(&self, id: SportId) -> Result<Option<Sport>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, slug, name, description, image_url
            FROM sports WHERE id = ?1
            ",
        )
        .bind(id_to_i64(id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(map_sport_row).transpose()
    }

    async fn find_sport_by_slug(&self, slug: &str) -> Result<Option<Sport>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, slug, name, description, image_url
            FROM sports WHERE slug = ?1
            ",
        )
        .bind(slug.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(map_sport_row).transpose()
    }

    async fn upsert_sport(&self, sport: &SportRecord) -> Result<SportId, StorageError> {
        // Validate before writing; the id is assigned by the database.
        let checked = sport.clone().into_sport(SportId::new(0))?;

        let id: i64 = sqlx::query_scalar(
            r"
            INSERT INTO sports (slug, name, description, image_url)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(slug) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                image_url = excluded.image_url
            RETURNING id
            ",
        )
        .bind(checked.slug().as_str())
        .bind(checked.name())
        .bind(checked.description())
        .bind(checked.image_url().map(url::Url::as_str))
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        sport_id_from_i64(id)
    }
}
