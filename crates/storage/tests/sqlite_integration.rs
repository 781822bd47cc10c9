use std::collections::HashSet;

use storage::repository::{
    AccountRecord, AccountRepository, NewVideoRecord, ProgressRepository, SkillRecord,
    SkillRepository, SportRecord, SportRepository, StorageError, TrainerRepository,
    VideoRepository,
};
use storage::sqlite::SqliteRepository;
use typus_core::model::{SkillId, SkillKey, SportId, TrainerDraft, UserId};
use typus_core::time::fixed_now;

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

async fn sport(repo: &SqliteRepository, slug: &str, name: &str) -> SportId {
    repo.upsert_sport(&SportRecord {
        slug: slug.into(),
        name: name.into(),
        description: None,
        image_url: None,
    })
    .await
    .unwrap()
}

async fn skill(repo: &SqliteRepository, sport_id: SportId, name: &str, slug: &str) -> SkillId {
    repo.upsert_skill(&SkillRecord {
        sport_id,
        name: name.into(),
        slug: slug.into(),
        description: None,
    })
    .await
    .unwrap()
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = connect("memdb_migrate_twice").await;
    repo.migrate().await.expect("second migrate");

    let versions: Vec<i64> = sqlx::query_scalar("SELECT version FROM schema_migrations")
        .fetch_all(repo.pool())
        .await
        .unwrap();
    assert_eq!(versions, vec![1]);
}

#[tokio::test]
async fn sports_and_skills_upsert_by_slug() {
    let repo = connect("memdb_catalog").await;
    let surf = sport(&repo, "surf", "Surf").await;
    let again = sport(&repo, "surf", "Surfe").await;
    assert_eq!(surf, again);
    let boxe = sport(&repo, "box", "Box").await;

    let names: Vec<_> = repo
        .list_sports()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name().to_owned())
        .collect();
    assert_eq!(names, vec!["Box", "Surfe"]);

    let drop = skill(&repo, surf, "Drop", "drop").await;
    assert_eq!(skill(&repo, surf, "Drop in", "drop").await, drop);
    skill(&repo, boxe, "Jab", "jab").await;

    let skills = repo.list_skills(surf).await.unwrap();
    assert_eq!(skills.len(), 1);
    assert_eq!(skills[0].name(), "Drop in");

    let found = repo.find_sport_by_slug("box").await.unwrap().unwrap();
    assert_eq!(found.id(), boxe);
    assert!(repo.find_sport_by_slug("curling").await.unwrap().is_none());
}

#[tokio::test]
async fn skill_for_missing_sport_is_not_found() {
    let repo = connect("memdb_skill_fk").await;
    let err = repo
        .upsert_skill(&SkillRecord {
            sport_id: SportId::new(999),
            name: "Chute".into(),
            slug: "chute".into(),
            description: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
}

#[tokio::test]
async fn videos_count_and_first() {
    let repo = connect("memdb_videos").await;
    let sport_id = sport(&repo, "futebol", "Futebol").await;
    let chute = skill(&repo, sport_id, "Chute", "chute").await;
    let passe = skill(&repo, sport_id, "Passe", "passe").await;

    assert!(repo.first_video(chute).await.unwrap().is_none());

    let mut ids = Vec::new();
    for title in ["Chute colocado", "Chute de trivela"] {
        let id = repo
            .insert_video(&NewVideoRecord {
                skill_id: chute,
                title: title.into(),
                description: None,
                video_url: "https://videos.example.com/chute.mp4".into(),
                duration_secs: Some(95),
                uploaded_by: Some(UserId::random()),
            })
            .await
            .unwrap();
        ids.push(id);
    }

    assert_eq!(repo.count_videos(chute).await.unwrap(), 2);
    assert_eq!(repo.count_videos(passe).await.unwrap(), 0);
    assert_eq!(repo.first_video(chute).await.unwrap(), Some(ids[0]));

    let video = repo.get_video(ids[1]).await.unwrap().unwrap();
    assert_eq!(video.title(), "Chute de trivela");
    assert_eq!(video.duration_secs(), Some(95));
    assert_eq!(repo.list_videos(chute).await.unwrap().len(), 2);
}

#[tokio::test]
async fn trainers_roundtrip_specialties_sorted_by_rate() {
    let repo = connect("memdb_trainers").await;
    let sport_id = sport(&repo, "tenis", "Tênis").await;
    for (name, rate) in [("Marta", 12_000), ("Rafael", 9_000)] {
        repo.insert_trainer(
            sport_id,
            &TrainerDraft {
                name: name.into(),
                contact: format!("{}@example.com", name.to_lowercase()),
                hourly_rate_cents: rate,
                experience_years: Some(3),
                specialties: vec!["Saque".into(), "Backhand".into()],
                ..TrainerDraft::default()
            },
        )
        .await
        .unwrap();
    }

    let trainers = repo.list_trainers(sport_id).await.unwrap();
    assert_eq!(trainers[0].name, "Rafael");
    assert_eq!(trainers[1].hourly_rate_cents, 12_000);
    assert_eq!(trainers[0].specialties, vec!["Saque", "Backhand"]);
}

#[tokio::test]
async fn increment_is_keyed_by_canonical_skill() {
    let repo = connect("memdb_progress_keys").await;
    let sport_id = sport(&repo, "futebol", "Futebol").await;
    let user = UserId::random();

    for raw in ["Passe", " passe ", "PASSE"] {
        let key = SkillKey::new(raw).unwrap();
        repo.increment_progress(user, sport_id, &key, raw, fixed_now())
            .await
            .unwrap();
    }

    let records = repo.list_progress(user, sport_id).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].videos_watched, 3);
    assert_eq!(records[0].skill_name, "Passe");
    assert_eq!(records[0].updated_at, fixed_now());
}

#[tokio::test]
async fn increment_for_missing_sport_is_not_found() {
    let repo = connect("memdb_progress_fk").await;
    let key = SkillKey::new("Chute").unwrap();
    let err = repo
        .increment_progress(UserId::random(), SportId::new(42), &key, "Chute", fixed_now())
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
}

#[tokio::test]
async fn concurrent_increments_are_not_lost() {
    // A real file: shared-cache memory databases do not honour busy_timeout.
    let path = std::env::temp_dir().join(format!("typus-progress-{}.sqlite3", uuid::Uuid::new_v4()));
    let url = format!("sqlite://{}?mode=rwc", path.display());
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");

    let sport_id = sport(&repo, "basquete", "Basquete").await;
    let user = UserId::random();
    let key = SkillKey::new("Arremesso").unwrap();
    repo.increment_progress(user, sport_id, &key, "Arremesso", fixed_now())
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let repo = repo.clone();
        let key = key.clone();
        handles.push(tokio::spawn(async move {
            repo.increment_progress(user, sport_id, &key, "Arremesso", fixed_now())
                .await
        }));
    }
    let mut seen = HashSet::new();
    for handle in handles {
        seen.insert(handle.await.unwrap().unwrap());
    }

    let records = repo.list_progress(user, sport_id).await.unwrap();
    assert_eq!(records[0].videos_watched, 9);
    assert_eq!(seen.len(), 8, "every writer observed a distinct count");

    repo.pool().close().await;
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn accounts_are_unique_by_email() {
    let repo = connect("memdb_accounts").await;
    let account = AccountRecord {
        user_id: UserId::random(),
        email: "joana@example.com".into(),
        full_name: Some("Joana".into()),
        password_hash: "$argon2id$stub".into(),
        created_at: fixed_now(),
    };
    repo.insert_account(&account).await.unwrap();

    let err = repo
        .insert_account(&AccountRecord {
            user_id: UserId::random(),
            ..account.clone()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Conflict));

    let found = repo
        .find_account_by_email("joana@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found, account);
}
