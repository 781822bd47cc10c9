use std::sync::Arc;

use dioxus::prelude::*;
use services::{
    AppServices, AuthContext, BrowseService, IdentityProvider, ProgressService, UploadService,
};

pub trait UiApp: Send + Sync {
    fn identity(&self) -> Arc<dyn IdentityProvider>;
    fn progress(&self) -> Arc<ProgressService>;
    fn browse(&self) -> Arc<BrowseService>;
    fn upload(&self) -> Arc<UploadService>;
}

impl UiApp for AppServices {
    fn identity(&self) -> Arc<dyn IdentityProvider> {
        AppServices::identity(self)
    }

    fn progress(&self) -> Arc<ProgressService> {
        AppServices::progress(self)
    }

    fn browse(&self) -> Arc<BrowseService> {
        AppServices::browse(self)
    }

    fn upload(&self) -> Arc<UploadService> {
        AppServices::upload(self)
    }
}

#[derive(Clone)]
pub struct AppContext {
    identity: Arc<dyn IdentityProvider>,
    progress: Arc<ProgressService>,
    browse: Arc<BrowseService>,
    upload: Arc<UploadService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            identity: app.identity(),
            progress: app.progress(),
            browse: app.browse(),
            upload: app.upload(),
        }
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

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}

/// Who is signed in, shared by every view.
#[derive(Clone, Copy)]
pub struct AuthState(pub Signal<AuthContext>);

impl AuthState {
    #[must_use]
    pub fn current(&self) -> AuthContext {
        self.0.read().clone()
    }

    pub fn set(&mut self, auth: AuthContext) {
        self.0.set(auth);
    }
}

/// Provides the sign-in state; call once near the root.
pub fn provide_auth_state(initial: AuthContext) -> AuthState {
    use_context_provider(|| AuthState(Signal::new(initial)))
}

#[must_use]
pub fn use_auth() -> AuthState {
    use_context::<AuthState>()
}
