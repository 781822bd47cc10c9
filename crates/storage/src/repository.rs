use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use typus_core::model::{
    ProgressRecord, Skill, SkillId, SkillKey, Sport, SportId, Trainer, TrainerDraft, TrainerId,
    UserId, Video, VideoId,
};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    /// The statement never ran: pool exhausted or the database was locked.
    #[error("storage busy: {0}")]
    Busy(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl StorageError {
    /// True for failures known to have happened before the write applied,
    /// so a retry cannot count anything twice.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, StorageError::Busy(_))
    }
}

//
// ─── RECORDS ───────────────────────────────────────────────────────────────────
//

/// Writable shape of a sport; saved by slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SportRecord {
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl SportRecord {
    /// Convert the record into a domain `Sport`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the persisted fields no longer validate.
    pub fn into_sport(self, id: SportId) -> Result<Sport, StorageError> {
        Sport::new(
            id,
            self.slug,
            self.name,
            self.description,
            self.image_url.as_deref(),
        )
        .map_err(|e| StorageError::Serialization(e.to_string()))
    }
}

/// Writable shape of a skill; saved by `(sport_id, slug)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillRecord {
    pub sport_id: SportId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

impl SkillRecord {
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the persisted fields no longer validate.
    pub fn into_skill(self, id: SkillId) -> Result<Skill, StorageError> {
        Skill::new(id, self.sport_id, self.name, self.slug, self.description)
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVideoRecord {
    pub skill_id: SkillId,
    pub title: String,
    pub description: Option<String>,
    pub video_url: String,
    pub duration_secs: Option<u32>,
    pub uploaded_by: Option<UserId>,
}

impl NewVideoRecord {
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the persisted fields no longer validate.
    pub fn into_video(self, id: VideoId) -> Result<Video, StorageError> {
        Video::new(
            id,
            self.skill_id,
            self.title,
            self.description,
            &self.video_url,
            self.duration_secs,
        )
        .map_err(|e| StorageError::Serialization(e.to_string()))
    }
}

/// Persisted account for the local identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    pub user_id: UserId,
    /// Lowercased email, unique.
    pub email: String,
    pub full_name: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

//
// ─── CONTRACTS ─────────────────────────────────────────────────────────────────
//

#[async_trait]
pub trait SportRepository: Send + Sync {
    /// All sports ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_sports(&self) -> Result<Vec<Sport>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn get_sport(&self, id: SportId) -> Result<Option<Sport>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn find_sport_by_slug(&self, slug: &str) -> Result<Option<Sport>, StorageError>;

    /// Insert a sport, or update the one with the same slug.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the sport cannot be stored.
    async fn upsert_sport(&self, sport: &SportRecord) -> Result<SportId, StorageError>;
}

#[async_trait]
pub trait SkillRepository: Send + Sync {
    /// Skills of a sport ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_skills(&self, sport_id: SportId) -> Result<Vec<Skill>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn get_skill(&self, id: SkillId) -> Result<Option<Skill>, StorageError>;

    /// Insert a skill, or update the one with the same sport and slug.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the sport does not exist.
    async fn upsert_skill(&self, skill: &SkillRecord) -> Result<SkillId, StorageError>;
}

#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn get_video(&self, id: VideoId) -> Result<Option<Video>, StorageError>;

    /// Videos of a skill in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_videos(&self, skill_id: SkillId) -> Result<Vec<Video>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn count_videos(&self, skill_id: SkillId) -> Result<u32, StorageError>;

    /// The first video of a skill, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn first_video(&self, skill_id: SkillId) -> Result<Option<VideoId>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the skill does not exist.
    async fn insert_video(&self, video: &NewVideoRecord) -> Result<VideoId, StorageError>;
}

#[async_trait]
pub trait TrainerRepository: Send + Sync {
    /// Trainers of a sport ordered by hourly rate, cheapest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_trainers(&self, sport_id: SportId) -> Result<Vec<Trainer>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the sport does not exist, or
    /// `StorageError::Serialization` if the draft does not validate.
    async fn insert_trainer(
        &self,
        sport_id: SportId,
        trainer: &TrainerDraft,
    ) -> Result<TrainerId, StorageError>;
}

/// Per-user watch counters.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Atomically create the record with a count of 1, or add 1 to it.
    ///
    /// Concurrent calls for the same triple must never lose an increment.
    /// Returns the count after the increment.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails; no partial update is visible.
    async fn increment_progress(
        &self,
        user_id: UserId,
        sport_id: SportId,
        skill_key: &SkillKey,
        skill_name: &str,
        at: DateTime<Utc>,
    ) -> Result<u32, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_progress(
        &self,
        user_id: UserId,
        sport_id: SportId,
    ) -> Result<Vec<ProgressRecord>, StorageError>;
}

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the email is already registered.
    async fn insert_account(&self, account: &AccountRecord) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn find_account_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AccountRecord>, StorageError>;
}

//
// ─── IN-MEMORY ─────────────────────────────────────────────────────────────────
//

#[derive(Default)]
struct MemoryState {
    next_id: u64,
    sports: HashMap<SportId, Sport>,
    skills: HashMap<SkillId, Skill>,
    videos: Vec<Video>,
    trainers: Vec<Trainer>,
    progress: HashMap<(UserId, SportId, SkillKey), ProgressRecord>,
    accounts: HashMap<String, AccountRecord>,
}

impl MemoryState {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Simple in-memory repository implementation for testing and prototyping.
///
/// All tables live behind one lock, so every operation is atomic.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StorageError> {
        self.state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

#[async_trait]
impl SportRepository for InMemoryRepository {
    async fn list_sports(&self) -> Result<Vec<Sport>, StorageError> {
        let guard = self.lock()?;
        let mut sports: Vec<Sport> = guard.sports.values().cloned().collect();
        sports.sort_by(|a, b| a.name().cmp(b.name()).then(a.id().cmp(&b.id())));
        Ok(sports)
    }

    async fn get_sport(&self, id: SportId) -> Result<Option<Sport>, StorageError> {
        let guard = self.lock()?;
        Ok(guard.sports.get(&id).cloned())
    }

    async fn find_sport_by_slug(&self, slug: &str) -> Result<Option<Sport>, StorageError> {
        let guard = self.lock()?;
        Ok(guard
            .sports
            .values()
            .find(|s| s.slug().as_str() == slug)
            .cloned())
    }

    async fn upsert_sport(&self, sport: &SportRecord) -> Result<SportId, StorageError> {
        let mut guard = self.lock()?;
        let existing = guard
            .sports
            .values()
            .find(|s| s.slug().as_str() == sport.slug.trim())
            .map(Sport::id);
        let id = match existing {
            Some(id) => id,
            None => SportId::new(guard.allocate_id()),
        };
        let stored = sport.clone().into_sport(id)?;
        guard.sports.insert(id, stored);
        Ok(id)
    }
}

#[async_trait]
impl SkillRepository for InMemoryRepository {
    async fn list_skills(&self, sport_id: SportId) -> Result<Vec<Skill>, StorageError> {
        let guard = self.lock()?;
        let mut skills: Vec<Skill> = guard
            .skills
            .values()
            .filter(|s| s.sport_id() == sport_id)
            .cloned()
            .collect();
        skills.sort_by(|a, b| a.name().cmp(b.name()).then(a.id().cmp(&b.id())));
        Ok(skills)
    }

    async fn get_skill(&self, id: SkillId) -> Result<Option<Skill>, StorageError> {
        let guard = self.lock()?;
        Ok(guard.skills.get(&id).cloned())
    }

    async fn upsert_skill(&self, skill: &SkillRecord) -> Result<SkillId, StorageError> {
        let mut guard = self.lock()?;
        if !guard.sports.contains_key(&skill.sport_id) {
            return Err(StorageError::NotFound);
        }
        let existing = guard
            .skills
            .values()
            .find(|s| s.sport_id() == skill.sport_id && s.slug().as_str() == skill.slug.trim())
            .map(Skill::id);
        let id = match existing {
            Some(id) => id,
            None => SkillId::new(guard.allocate_id()),
        };
        let stored = skill.clone().into_skill(id)?;
        guard.skills.insert(id, stored);
        Ok(id)
    }
}

#[async_trait]
impl VideoRepository for InMemoryRepository {
    async fn get_video(&self, id: VideoId) -> Result<Option<Video>, StorageError> {
        let guard = self.lock()?;
        Ok(guard.videos.iter().find(|v| v.id() == id).cloned())
    }

    async fn list_videos(&self, skill_id: SkillId) -> Result<Vec<Video>, StorageError> {
        let guard = self.lock()?;
        Ok(guard
            .videos
            .iter()
            .filter(|v| v.skill_id() == skill_id)
            .cloned()
            .collect())
    }

    async fn count_videos(&self, skill_id: SkillId) -> Result<u32, StorageError> {
        let guard = self.lock()?;
        let count = guard
            .videos
            .iter()
            .filter(|v| v.skill_id() == skill_id)
            .count();
        u32::try_from(count).map_err(|_| StorageError::Serialization("video count overflow".into()))
    }

    async fn first_video(&self, skill_id: SkillId) -> Result<Option<VideoId>, StorageError> {
        let guard = self.lock()?;
        Ok(guard
            .videos
            .iter()
            .find(|v| v.skill_id() == skill_id)
            .map(Video::id))
    }

    async fn insert_video(&self, video: &NewVideoRecord) -> Result<VideoId, StorageError> {
        let mut guard = self.lock()?;
        if !guard.skills.contains_key(&video.skill_id) {
            return Err(StorageError::NotFound);
        }
        let id = VideoId::new(guard.allocate_id());
        let stored = video.clone().into_video(id)?;
        guard.videos.push(stored);
        Ok(id)
    }
}

#[async_trait]
impl TrainerRepository for InMemoryRepository {
    async fn list_trainers(&self, sport_id: SportId) -> Result<Vec<Trainer>, StorageError> {
        let guard = self.lock()?;
        let mut trainers: Vec<Trainer> = guard
            .trainers
            .iter()
            .filter(|t| t.sport_id == sport_id)
            .cloned()
            .collect();
        trainers.sort_by_key(|t| (t.hourly_rate_cents, t.id));
        Ok(trainers)
    }

    async fn insert_trainer(
        &self,
        sport_id: SportId,
        trainer: &TrainerDraft,
    ) -> Result<TrainerId, StorageError> {
        let mut guard = self.lock()?;
        if !guard.sports.contains_key(&sport_id) {
            return Err(StorageError::NotFound);
        }
        let id = TrainerId::new(guard.allocate_id());
        let stored = trainer
            .clone()
            .validate(id, sport_id)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        guard.trainers.push(stored);
        Ok(id)
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn increment_progress(
        &self,
        user_id: UserId,
        sport_id: SportId,
        skill_key: &SkillKey,
        skill_name: &str,
        at: DateTime<Utc>,
    ) -> Result<u32, StorageError> {
        let mut guard = self.lock()?;
        if !guard.sports.contains_key(&sport_id) {
            return Err(StorageError::NotFound);
        }
        let record = guard
            .progress
            .entry((user_id, sport_id, skill_key.clone()))
            .and_modify(|r| r.increment(at))
            .or_insert_with(|| {
                ProgressRecord::first_completion(user_id, sport_id, skill_key.clone(), skill_name, at)
            });
        Ok(record.videos_watched)
    }

    async fn list_progress(
        &self,
        user_id: UserId,
        sport_id: SportId,
    ) -> Result<Vec<ProgressRecord>, StorageError> {
        let guard = self.lock()?;
        let mut records: Vec<ProgressRecord> = guard
            .progress
            .values()
            .filter(|r| r.user_id == user_id && r.sport_id == sport_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.skill_key.cmp(&b.skill_key));
        Ok(records)
    }
}

#[async_trait]
impl AccountRepository for InMemoryRepository {
    async fn insert_account(&self, account: &AccountRecord) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        if guard.accounts.contains_key(&account.email) {
            return Err(StorageError::Conflict);
        }
        guard.accounts.insert(account.email.clone(), account.clone());
        Ok(())
    }

    async fn find_account_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AccountRecord>, StorageError> {
        let guard = self.lock()?;
        Ok(guard.accounts.get(email).cloned())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub sports: Arc<dyn SportRepository>,
    pub skills: Arc<dyn SkillRepository>,
    pub videos: Arc<dyn VideoRepository>,
    pub trainers: Arc<dyn TrainerRepository>,
    pub progress: Arc<dyn ProgressRepository>,
    pub accounts: Arc<dyn AccountRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_repository(InMemoryRepository::new())
    }

    /// Uses one repository value for every table.
    #[must_use]
    pub fn from_repository<R>(repo: R) -> Self
    where
        R: SportRepository
            + SkillRepository
            + VideoRepository
            + TrainerRepository
            + ProgressRepository
            + AccountRepository
            + Clone
            + 'static,
    {
        Self {
            sports: Arc::new(repo.clone()),
            skills: Arc::new(repo.clone()),
            videos: Arc::new(repo.clone()),
            trainers: Arc::new(repo.clone()),
            progress: Arc::new(repo.clone()),
            accounts: Arc::new(repo),
        }
    }
}
