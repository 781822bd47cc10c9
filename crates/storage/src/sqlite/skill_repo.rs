use typus_core::model::{Skill, SkillId, SportId};

use super::SqliteRepository;
use super::mapping::{db_err, id_to_i64, map_skill_row, skill_id_from_i64};
use crate::repository::{SkillRecord, SkillRepository, StorageError};

#[async_trait::async_trait]
impl SkillRepository for SqliteRepository {
    async fn list_skills(&self, sport_id: SportId) -> Result<Vec<Skill>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, sport_id, name, slug, description
            FROM skills
            WHERE sport_id = ?1
            ORDER BY name ASC, id ASC
            ",
        )
        .bind(id_to_i64(sport_id.value())?)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(map_skill_row).collect()
    }

    async fn get_skill(&self, id: SkillId) -> Result<Option<Skill>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, sport_id, name, slug, description
            FROM skills WHERE id = ?1
            ",
        )
        .bind(id_to_i64(id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(map_skill_row).transpose()
    }

    async fn upsert_skill(&self, skill: &SkillRecord) -> Result<SkillId, StorageError> {
        let checked = skill.clone().into_skill(SkillId::new(0))?;

        let id: i64 = sqlx::query_scalar(
            r"
            INSERT INTO skills (sport_id, name, slug, description)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(sport_id, slug) DO UPDATE SET
                name = excluded.name,
                description = excluded.description
            RETURNING id
            ",
        )
        .bind(id_to_i64(checked.sport_id().value())?)
        .bind(checked.name())
        .bind(checked.slug().as_str())
        .bind(checked.description())
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        skill_id_from_i64(id)
    }
}
