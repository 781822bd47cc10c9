use std::future::Future;
use std::sync::Arc;

use storage::repository::{ProgressRepository, SportRepository, StorageError};
use tokio::task::JoinHandle;
use typus_core::SkillCatalog;
use typus_core::model::{SkillKey, Sport, SportId, UserId};
use typus_core::progress::{ProgressView, percentage_for};

use crate::Clock;
use crate::error::ProgressError;
use crate::session::{AuthContext, IdentityProvider};

/// Result of one recorded completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub videos_watched: u32,
    pub percentage: u8,
    /// False when the skill is not in the sport's catalog; the count is kept
    /// but never shown.
    pub in_catalog: bool,
}

/// Runs `op`, retrying once if the first attempt fails with a transient error.
///
/// Only `StorageError::Busy` counts as transient: the statement did not run,
/// so retrying an increment cannot count it twice.
async fn retry_once<T, F, Fut>(what: &'static str, mut op: F) -> Result<T, StorageError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StorageError>>,
{
    match op().await {
        Err(err) if err.is_transient() => {
            tracing::warn!(error = %err, what, "transient storage failure, retrying once");
            op().await
        }
        other => other,
    }
}

/// Records video completions and builds per-skill progress views.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    catalog: Arc<SkillCatalog>,
    identity: Arc<dyn IdentityProvider>,
    sports: Arc<dyn SportRepository>,
    progress: Arc<dyn ProgressRepository>,
}

impl ProgressService {
    #[must_use]
    pub fn new(
        clock: Clock,
        catalog: Arc<SkillCatalog>,
        identity: Arc<dyn IdentityProvider>,
        sports: Arc<dyn SportRepository>,
        progress: Arc<dyn ProgressRepository>,
    ) -> Self {
        Self {
            clock,
            catalog,
            identity,
            sports,
            progress,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &SkillCatalog {
        &self.catalog
    }

    async fn require_sport(&self, sport_id: SportId) -> Result<Sport, ProgressError> {
        self.sports
            .get_sport(sport_id)
            .await?
            .ok_or(ProgressError::NotFound)
    }

    /// Counts one finished playback of a video of `skill_name`.
    ///
    /// The increment is atomic in storage: concurrent calls for the same
    /// user, sport and skill each add exactly one.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Unauthenticated` for anonymous or signed-out
    /// callers and `ProgressError::Validation` for blank skill names, both before any
    /// storage access. Returns `ProgressError::NotFound` for unknown sports and
    /// `ProgressError::StorageUnavailable` if the write still fails after one retry.
    #[tracing::instrument(skip(self, auth))]
    pub async fn record_completion(
        &self,
        auth: &AuthContext,
        sport_id: SportId,
        skill_name: &str,
    ) -> Result<Completion, ProgressError> {
        let user_id = auth.require_session(self.identity.as_ref()).await?;
        let key =
            SkillKey::new(skill_name).map_err(|e| ProgressError::Validation(e.to_string()))?;

        let sport = self.require_sport(sport_id).await?;
        let in_catalog = self.catalog.contains(sport.slug().as_str(), skill_name);
        if !in_catalog {
            tracing::warn!(
                user_id = %user_id,
                sport = %sport.slug(),
                skill = skill_name,
                "recording completion for a skill outside the catalog"
            );
        }

        let now = self.clock.now();
        let (progress, key_ref) = (&self.progress, &key);
        let videos_watched = retry_once("increment_progress", move || {
            progress.increment_progress(user_id, sport_id, key_ref, skill_name, now)
        })
        .await
        .map_err(|err| {
            tracing::error!(user_id = %user_id, skill = skill_name, error = %err, "failed to record completion");
            ProgressError::from(err)
        })?;

        tracing::info!(user_id = %user_id, skill = %key, videos_watched, "recorded completion");
        Ok(Completion {
            videos_watched,
            percentage: percentage_for(videos_watched),
            in_catalog,
        })
    }

    /// Like `record_completion`, but runs on the runtime so the write is not
    /// dropped when the calling view goes away. Failures are logged.
    #[must_use]
    pub fn record_completion_detached(
        self: &Arc<Self>,
        auth: AuthContext,
        sport_id: SportId,
        skill_name: String,
    ) -> JoinHandle<Result<Completion, ProgressError>> {
        let service = Arc::clone(self);
        tokio::spawn(async move {
            let result = service
                .record_completion(&auth, sport_id, &skill_name)
                .await;
            if let Err(err) = &result {
                tracing::error!(sport_id = %sport_id, skill = %skill_name, error = %err, "detached completion failed");
            }
            result
        })
    }

    /// Per-skill percentages for the caller, in catalog order.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Unauthenticated`, `ProgressError::NotFound` when
    /// the sport does not exist, or `ProgressError::StorageUnavailable`.
    #[tracing::instrument(skip(self, auth, catalog))]
    pub async fn get_progress_view<S: AsRef<str>>(
        &self,
        auth: &AuthContext,
        sport_id: SportId,
        catalog: &[S],
    ) -> Result<ProgressView, ProgressError> {
        let user_id = auth.require_session(self.identity.as_ref()).await?;
        self.require_sport(sport_id).await?;
        self.view_for(user_id, sport_id, catalog).await
    }

    async fn view_for<S: AsRef<str>>(
        &self,
        user_id: UserId,
        sport_id: SportId,
        catalog: &[S],
    ) -> Result<ProgressView, ProgressError> {
        let progress = &self.progress;
        let records = retry_once("list_progress", move || {
            progress.list_progress(user_id, sport_id)
        })
        .await?;
        Ok(ProgressView::from_records(catalog, &records))
    }

    /// Resolves the sport by slug and builds its view from the built-in catalog.
    ///
    /// # Errors
    ///
    /// Same as `get_progress_view`; `ProgressError::NotFound` for unknown slugs.
    pub async fn load_sport_progress(
        &self,
        auth: &AuthContext,
        slug: &str,
    ) -> Result<(Sport, ProgressView), ProgressError> {
        let user_id = auth.require_session(self.identity.as_ref()).await?;
        let sport = self
            .sports
            .find_sport_by_slug(slug)
            .await?
            .ok_or(ProgressError::NotFound)?;
        let view = self
            .view_for(user_id, sport.id(), self.catalog.skills_for(slug))
            .await?;
        Ok((sport, view))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::{SportRecord, Storage};
    use typus_core::time::fixed_clock;

    use crate::test_support::KnownSessions;

    async fn service_with_futebol() -> (ProgressService, SportId, Arc<KnownSessions>) {
        let storage = Storage::in_memory();
        let sport_id = storage
            .sports
            .upsert_sport(&SportRecord {
                slug: "futebol".into(),
                name: "Futebol".into(),
                description: None,
                image_url: None,
            })
            .await
            .unwrap();
        let identity = Arc::new(KnownSessions::default());
        let service = ProgressService::new(
            fixed_clock(),
            Arc::new(SkillCatalog::builtin()),
            identity.clone(),
            storage.sports,
            storage.progress,
        );
        (service, sport_id, identity)
    }

    #[tokio::test]
    async fn blank_skill_is_a_validation_error() {
        let (service, sport_id, identity) = service_with_futebol().await;
        let auth = identity.signed_in();
        let err = service
            .record_completion(&auth, sport_id, "   ")
            .await
            .unwrap_err();
        assert!(matches!(err, ProgressError::Validation(_)));
    }

    #[tokio::test]
    async fn unknown_sport_is_not_found() {
        let (service, _, identity) = service_with_futebol().await;
        let auth = identity.signed_in();
        let err = service
            .record_completion(&auth, SportId::new(404), "Chute")
            .await
            .unwrap_err();
        assert!(matches!(err, ProgressError::NotFound));
    }

    #[tokio::test]
    async fn unknown_skill_is_counted_but_hidden() {
        let (service, sport_id, identity) = service_with_futebol().await;
        let auth = identity.signed_in();
        let completion = service
            .record_completion(&auth, sport_id, "Cabeceio")
            .await
            .unwrap();
        assert!(!completion.in_catalog);
        assert_eq!(completion.videos_watched, 1);

        let catalog = service.catalog().skills_for("futebol").to_vec();
        let view = service
            .get_progress_view(&auth, sport_id, &catalog)
            .await
            .unwrap();
        assert_eq!(view.len(), 7);
        assert!(view.iter().all(|e| e.percentage == 0));
    }

    #[tokio::test]
    async fn signed_out_context_cannot_record() {
        let (service, sport_id, identity) = service_with_futebol().await;
        let auth = identity.signed_in();
        let user_id = auth.session().unwrap().user_id;
        service
            .record_completion(&auth, sport_id, "Chute")
            .await
            .unwrap();

        identity.sign_out(&auth.session().unwrap().token).await;

        let err = service
            .record_completion(&auth, sport_id, "Chute")
            .await
            .unwrap_err();
        assert!(matches!(err, ProgressError::Unauthenticated(_)));
        let records = service.progress.list_progress(user_id, sport_id).await.unwrap();
        assert_eq!(records[0].videos_watched, 1);
    }
}
