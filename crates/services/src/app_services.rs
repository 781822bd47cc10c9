use std::sync::Arc;

use storage::media::MediaStore;
use storage::repository::Storage;
use storage::seed::seed_catalog;
use typus_core::SkillCatalog;

use crate::Clock;
use crate::browse::BrowseService;
use crate::error::AppServicesError;
use crate::progress::ProgressService;
use crate::session::{IdentityProvider, LocalIdentityProvider};
use crate::upload::UploadService;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    identity: Arc<dyn IdentityProvider>,
    progress: Arc<ProgressService>,
    browse: Arc<BrowseService>,
    upload: Arc<UploadService>,
}

impl AppServices {
    #[must_use]
    pub fn new(storage: &Storage, media: Arc<dyn MediaStore>, clock: Clock) -> Self {
        let catalog = Arc::new(SkillCatalog::builtin());
        let identity: Arc<dyn IdentityProvider> = Arc::new(LocalIdentityProvider::new(
            clock,
            Arc::clone(&storage.accounts),
        ));
        let progress = Arc::new(ProgressService::new(
            clock,
            catalog,
            Arc::clone(&identity),
            Arc::clone(&storage.sports),
            Arc::clone(&storage.progress),
        ));
        let browse = Arc::new(BrowseService::new(
            Arc::clone(&identity),
            Arc::clone(&storage.sports),
            Arc::clone(&storage.skills),
            Arc::clone(&storage.videos),
            Arc::clone(&storage.trainers),
        ));
        let upload = Arc::new(UploadService::new(
            Arc::clone(&identity),
            media,
            Arc::clone(&storage.skills),
            Arc::clone(&storage.videos),
        ));

        Self {
            identity,
            progress,
            browse,
            upload,
        }
    }

    /// Build services backed by `SQLite` storage, seeding the catalog sports
    /// when the database has none.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or seeding fails.
    pub async fn new_sqlite(
        db_url: &str,
        media: Arc<dyn MediaStore>,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        ensure_catalog(&storage).await?;
        Ok(Self::new(&storage, media, clock))
    }

    #[must_use]
    pub fn identity(&self) -> Arc<dyn IdentityProvider> {
        Arc::clone(&self.identity)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn browse(&self) -> Arc<BrowseService> {
        Arc::clone(&self.browse)
    }

    #[must_use]
    pub fn upload(&self) -> Arc<UploadService> {
        Arc::clone(&self.upload)
    }
}

async fn ensure_catalog(storage: &Storage) -> Result<(), AppServicesError> {
    if storage.sports.list_sports().await?.is_empty() {
        seed_catalog(storage, &SkillCatalog::builtin()).await?;
    }
    Ok(())
}
