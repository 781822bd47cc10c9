use std::str::FromStr;

use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use typus_core::model::{
    ProgressRecord, Skill, SkillId, SkillKey, Sport, SportId, Trainer, TrainerId, UserId, Video,
    VideoId,
};
use url::Url;

use crate::repository::{AccountRecord, StorageError};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

/// Maps driver errors onto storage errors.
///
/// Constraint violations are caller mistakes. Pool timeouts and busy/locked
/// databases are `Busy` and may be retried; anything else is `Connection`,
/// since the statement may already have committed.
pub(crate) fn db_err(e: sqlx::Error) -> StorageError {
    if matches!(e, sqlx::Error::PoolTimedOut) {
        return StorageError::Busy(e.to_string());
    }
    if let sqlx::Error::Database(db) = &e {
        // Extended result codes keep the primary code in the low byte.
        let primary = db
            .code()
            .and_then(|code| code.parse::<i32>().ok())
            .map(|code| code & 0xff);
        if matches!(primary, Some(SQLITE_BUSY | SQLITE_LOCKED)) {
            return StorageError::Busy(db.message().to_owned());
        }
        if db.is_unique_violation() {
            return StorageError::Conflict;
        }
        if db.is_foreign_key_violation() {
            return StorageError::NotFound;
        }
        if db.is_check_violation() {
            return StorageError::Serialization(db.message().to_owned());
        }
    }
    StorageError::Connection(e.to_string())
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

fn i64_to_u32(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn id_to_i64(v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization("id overflow".into()))
}

pub(crate) fn sport_id_from_i64(v: i64) -> Result<SportId, StorageError> {
    Ok(SportId::new(i64_to_u64("sport_id", v)?))
}

pub(crate) fn skill_id_from_i64(v: i64) -> Result<SkillId, StorageError> {
    Ok(SkillId::new(i64_to_u64("skill_id", v)?))
}

pub(crate) fn video_id_from_i64(v: i64) -> Result<VideoId, StorageError> {
    Ok(VideoId::new(i64_to_u64("video_id", v)?))
}

pub(crate) fn trainer_id_from_i64(v: i64) -> Result<TrainerId, StorageError> {
    Ok(TrainerId::new(i64_to_u64("trainer_id", v)?))
}

pub(crate) fn user_id_from_str(v: &str) -> Result<UserId, StorageError> {
    UserId::from_str(v).map_err(ser)
}

pub(crate) fn count_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    i64_to_u32(field, v)
}

pub(crate) fn map_sport_row(row: &SqliteRow) -> Result<Sport, StorageError> {
    let image_url: Option<String> = row.try_get("image_url").map_err(ser)?;
    Sport::new(
        sport_id_from_i64(row.try_get("id").map_err(ser)?)?,
        row.try_get::<String, _>("slug").map_err(ser)?,
        row.try_get::<String, _>("name").map_err(ser)?,
        row.try_get("description").map_err(ser)?,
        image_url.as_deref(),
    )
    .map_err(ser)
}

pub(crate) fn map_skill_row(row: &SqliteRow) -> Result<Skill, StorageError> {
    Skill::new(
        skill_id_from_i64(row.try_get("id").map_err(ser)?)?,
        sport_id_from_i64(row.try_get("sport_id").map_err(ser)?)?,
        row.try_get::<String, _>("name").map_err(ser)?,
        row.try_get::<String, _>("slug").map_err(ser)?,
        row.try_get("description").map_err(ser)?,
    )
    .map_err(ser)
}

pub(crate) fn map_video_row(row: &SqliteRow) -> Result<Video, StorageError> {
    let duration = row
        .try_get::<Option<i64>, _>("duration_secs")
        .map_err(ser)?
        .map(|d| i64_to_u32("duration_secs", d))
        .transpose()?;
    let url: String = row.try_get("video_url").map_err(ser)?;
    Video::new(
        video_id_from_i64(row.try_get("id").map_err(ser)?)?,
        skill_id_from_i64(row.try_get("skill_id").map_err(ser)?)?,
        row.try_get::<String, _>("title").map_err(ser)?,
        row.try_get("description").map_err(ser)?,
        &url,
        duration,
    )
    .map_err(ser)
}

pub(crate) fn map_trainer_row(row: &SqliteRow) -> Result<Trainer, StorageError> {
    let specialties: String = row.try_get("specialties").map_err(ser)?;
    let specialties: Vec<String> = serde_json::from_str(&specialties).map_err(ser)?;
    let image_url = row
        .try_get::<Option<String>, _>("image_url")
        .map_err(ser)?
        .map(|raw| Url::parse(&raw).map_err(ser))
        .transpose()?;
    let experience_years = row
        .try_get::<Option<i64>, _>("experience_years")
        .map_err(ser)?
        .map(|y| i64_to_u32("experience_years", y))
        .transpose()?;

    Ok(Trainer {
        id: trainer_id_from_i64(row.try_get("id").map_err(ser)?)?,
        sport_id: sport_id_from_i64(row.try_get("sport_id").map_err(ser)?)?,
        name: row.try_get("name").map_err(ser)?,
        description: row
            .try_get::<Option<String>, _>("description")
            .map_err(ser)?
            .unwrap_or_default(),
        contact: row.try_get("contact").map_err(ser)?,
        hourly_rate_cents: i64_to_u32(
            "hourly_rate_cents",
            row.try_get("hourly_rate_cents").map_err(ser)?,
        )?,
        experience_years,
        specialties,
        image_url,
    })
}

pub(crate) fn map_progress_row(row: &SqliteRow) -> Result<ProgressRecord, StorageError> {
    let user_id: String = row.try_get("user_id").map_err(ser)?;
    Ok(ProgressRecord {
        user_id: user_id_from_str(&user_id)?,
        sport_id: sport_id_from_i64(row.try_get("sport_id").map_err(ser)?)?,
        skill_key: SkillKey::from_persisted(row.try_get("skill_key").map_err(ser)?),
        skill_name: row.try_get("skill_name").map_err(ser)?,
        videos_watched: i64_to_u32("videos_watched", row.try_get("videos_watched").map_err(ser)?)?,
        updated_at: row.try_get("updated_at").map_err(ser)?,
    })
}

pub(crate) fn map_account_row(row: &SqliteRow) -> Result<AccountRecord, StorageError> {
    let user_id: String = row.try_get("user_id").map_err(ser)?;
    Ok(AccountRecord {
        user_id: user_id_from_str(&user_id)?,
        email: row.try_get("email").map_err(ser)?,
        full_name: row.try_get("full_name").map_err(ser)?,
        password_hash: row.try_get("password_hash").map_err(ser)?,
        created_at: row.try_get("created_at").map_err(ser)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_timeout_is_retryable() {
        let err = db_err(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StorageError::Busy(_)));
        assert!(err.is_transient());
    }

    #[test]
    fn other_driver_errors_are_not_retried() {
        let err = db_err(sqlx::Error::Protocol("connection reset mid-response".into()));
        assert!(matches!(err, StorageError::Connection(_)));
        assert!(!err.is_transient());
    }
}
