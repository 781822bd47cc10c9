#![forbid(unsafe_code)]

pub mod app_services;
pub mod browse;
pub mod error;
pub mod notice;
pub mod progress;
pub mod session;
pub mod upload;

pub use typus_core::Clock;

pub use app_services::AppServices;
pub use browse::{BrowseService, SkillWithVideos, SportSkills, SportTrainers, VideoDetail};
pub use error::{AppServicesError, AuthError, BrowseError, ProgressError, Unauthenticated, UploadError};
pub use notice::{Notice, Severity};
pub use progress::{Completion, ProgressService, ProgressViewState};
pub use session::{
    AuthContext, IdentityProvider, LocalIdentityProvider, SessionContext, SessionToken, SignUp,
};
pub use upload::{UploadService, UploadVideoRequest, UploadedVideo};

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use typus_core::model::UserId;

    use crate::error::AuthError;
    use crate::session::{AuthContext, IdentityProvider, SessionContext, SessionToken, SignUp};

    /// Identity provider that only knows sessions handed out by `signed_in`.
    #[derive(Default)]
    pub(crate) struct KnownSessions {
        sessions: Mutex<HashMap<SessionToken, SessionContext>>,
    }

    impl KnownSessions {
        pub(crate) fn signed_in(&self) -> AuthContext {
            let user_id = UserId::random();
            let session = SessionContext {
                user_id,
                token: SessionToken::from_raw(format!("token-{user_id}")),
                email: "atleta@example.com".into(),
                full_name: Some("Atleta".into()),
            };
            self.sessions
                .lock()
                .unwrap()
                .insert(session.token.clone(), session.clone());
            session.into()
        }
    }

    #[async_trait]
    impl IdentityProvider for KnownSessions {
        async fn current_session(&self, token: &SessionToken) -> Option<SessionContext> {
            self.sessions.lock().unwrap().get(token).cloned()
        }

        async fn sign_in(&self, _email: &str, _password: &str) -> Result<SessionContext, AuthError> {
            Err(AuthError::InvalidCredentials)
        }

        async fn sign_up(&self, _request: SignUp) -> Result<UserId, AuthError> {
            Err(AuthError::Validation("sign-up is not available here".into()))
        }

        async fn sign_out(&self, token: &SessionToken) {
            self.sessions.lock().unwrap().remove(token);
        }
    }
}
