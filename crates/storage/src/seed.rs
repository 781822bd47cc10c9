//! Loads the skill catalog (and optional demo content) into a store.

use typus_core::SkillCatalog;
use typus_core::model::{Slug, SportId, TrainerDraft};

use crate::repository::{NewVideoRecord, SkillRecord, SportRecord, Storage, StorageError};

/// Counts of what a seeding run wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub sports: usize,
    pub skills: usize,
    pub videos: usize,
    pub trainers: usize,
}

fn skill_slug(name: &str) -> Result<Slug, StorageError> {
    Slug::from_name(name).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Upserts every catalog sport and its skills.
///
/// Idempotent: running it twice leaves the same rows.
///
/// # Errors
///
/// Returns `StorageError` if any write fails.
pub async fn seed_catalog(
    storage: &Storage,
    catalog: &SkillCatalog,
) -> Result<SeedReport, StorageError> {
    let mut report = SeedReport::default();
    for entry in catalog.sports() {
        let sport_id = storage
            .sports
            .upsert_sport(&SportRecord {
                slug: entry.slug.to_string(),
                name: entry.name.clone(),
                description: None,
                image_url: None,
            })
            .await?;
        report.sports += 1;

        for name in &entry.skills {
            storage
                .skills
                .upsert_skill(&SkillRecord {
                    sport_id,
                    name: name.clone(),
                    slug: skill_slug(name)?.to_string(),
                    description: None,
                })
                .await?;
            report.skills += 1;
        }
    }
    tracing::info!(
        sports = report.sports,
        skills = report.skills,
        "seeded skill catalog"
    );
    Ok(report)
}

/// Adds one demo video per skill and two trainers per sport.
///
/// Not idempotent; meant for fresh development databases.
///
/// # Errors
///
/// Returns `StorageError` if any read or write fails.
pub async fn seed_demo_content(storage: &Storage) -> Result<SeedReport, StorageError> {
    let mut report = SeedReport::default();
    for sport in storage.sports.list_sports().await? {
        for skill in storage.skills.list_skills(sport.id()).await? {
            storage
                .videos
                .insert_video(&NewVideoRecord {
                    skill_id: skill.id(),
                    title: format!("{}: fundamentos", skill.name()),
                    description: Some(format!("Treino básico de {}", skill.name())),
                    video_url: format!(
                        "https://videos.example.com/{}/{}.mp4",
                        sport.slug(),
                        skill.slug()
                    ),
                    duration_secs: Some(180),
                    uploaded_by: None,
                })
                .await?;
            report.videos += 1;
        }
        report.trainers += seed_trainers(storage, sport.id(), sport.name()).await?;
    }
    tracing::info!(
        videos = report.videos,
        trainers = report.trainers,
        "seeded demo content"
    );
    Ok(report)
}

async fn seed_trainers(
    storage: &Storage,
    sport_id: SportId,
    sport_name: &str,
) -> Result<usize, StorageError> {
    let drafts = [
        TrainerDraft {
            name: "Ana Souza".into(),
            description: format!("Treinos individuais de {sport_name} para iniciantes."),
            contact: "ana.souza@example.com".into(),
            hourly_rate_cents: 8_000,
            experience_years: Some(4),
            specialties: vec!["Iniciantes".into(), "Técnica".into()],
            image_url: None,
        },
        TrainerDraft {
            name: "Carlos Lima".into(),
            description: format!("Preparação avançada em {sport_name}."),
            contact: "+55 11 90000-0000".into(),
            hourly_rate_cents: 15_000,
            experience_years: Some(12),
            specialties: vec!["Alto rendimento".into()],
            image_url: None,
        },
    ];
    for draft in &drafts {
        storage.trainers.insert_trainer(sport_id, draft).await?;
    }
    Ok(drafts.len())
}
