use typus_core::model::{SportId, Trainer, TrainerDraft, TrainerId};

use super::SqliteRepository;
use super::mapping::{db_err, id_to_i64, map_trainer_row, ser, trainer_id_from_i64};
use crate::repository::{StorageError, TrainerRepository};

#[async_trait::async_trait]
impl TrainerRepository for SqliteRepository {
    async fn list_trainers(&self, sport_id: SportId) -> Result<Vec<Trainer>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, sport_id, name, description, contact, hourly_rate_cents,
                   experience_years, specialties, image_url
            FROM trainers
            WHERE sport_id = ?1
            ORDER BY hourly_rate_cents ASC, id ASC
            ",
        )
        .bind(id_to_i64(sport_id.value())?)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(map_trainer_row).collect()
    }

    async fn insert_trainer(
        &self,
        sport_id: SportId,
        trainer: &TrainerDraft,
    ) -> Result<TrainerId, StorageError> {
        let checked = trainer
            .clone()
            .validate(TrainerId::new(0), sport_id)
            .map_err(ser)?;
        let specialties = serde_json::to_string(&checked.specialties).map_err(ser)?;
        let description = Some(checked.description.as_str()).filter(|d| !d.is_empty());

        let res = sqlx::query(
            r"
            INSERT INTO trainers (sport_id, name, description, contact, hourly_rate_cents,
                                  experience_years, specialties, image_url)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ",
        )
        .bind(id_to_i64(sport_id.value())?)
        .bind(&checked.name)
        .bind(description)
        .bind(&checked.contact)
        .bind(i64::from(checked.hourly_rate_cents))
        .bind(checked.experience_years.map(i64::from))
        .bind(specialties)
        .bind(checked.image_url.as_ref().map(url::Url::as_str))
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        trainer_id_from_i64(res.last_insert_rowid())
    }
}
