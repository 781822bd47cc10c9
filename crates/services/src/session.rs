//! Identity and session handling.
//!
//! Every service operation takes an `AuthContext` argument; there is no
//! process-wide "current user".

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use async_trait::async_trait;
use storage::repository::{AccountRecord, AccountRepository, StorageError};
use typus_core::model::UserId;
use uuid::Uuid;

use crate::Clock;
use crate::error::{AuthError, Unauthenticated};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Opaque bearer token for a signed-in session.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub user_id: UserId,
    pub token: SessionToken,
    pub email: String,
    pub full_name: Option<String>,
}

/// Who is calling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthContext {
    #[default]
    Anonymous,
    Authenticated(SessionContext),
}

impl AuthContext {
    /// The calling user's id, provided the session is still live.
    ///
    /// A context cloned before sign-out keeps its token, so the token is
    /// resolved against `identity` on every call.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` for anonymous callers and for tokens the
    /// provider no longer knows or that belong to another user.
    pub async fn require_session(
        &self,
        identity: &dyn IdentityProvider,
    ) -> Result<UserId, Unauthenticated> {
        let claimed = self.session().ok_or(Unauthenticated)?;
        match identity.current_session(&claimed.token).await {
            Some(live) if live.user_id == claimed.user_id => Ok(live.user_id),
            _ => {
                tracing::debug!(user_id = %claimed.user_id, "rejected stale session");
                Err(Unauthenticated)
            }
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<&SessionContext> {
        match self {
            AuthContext::Authenticated(session) => Some(session),
            AuthContext::Anonymous => None,
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthContext::Authenticated(_))
    }
}

impl From<SessionContext> for AuthContext {
    fn from(session: SessionContext) -> Self {
        AuthContext::Authenticated(session)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUp {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolves a token to its live session, if any.
    async fn current_session(&self, token: &SessionToken) -> Option<SessionContext>;

    /// # Errors
    ///
    /// Returns `AuthError::Validation` for malformed input and
    /// `AuthError::InvalidCredentials` for unknown email or wrong password.
    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionContext, AuthError>;

    /// Creates an account. The caller signs in separately.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` for malformed input and
    /// `AuthError::EmailTaken` for duplicate emails.
    async fn sign_up(&self, request: SignUp) -> Result<UserId, AuthError>;

    /// Ends the session. Unknown tokens are ignored.
    async fn sign_out(&self, token: &SessionToken);
}

fn normalize_email(email: &str) -> Result<String, AuthError> {
    let email = email.trim().to_lowercase();
    if !email.contains('@') {
        return Err(AuthError::Validation("email must contain '@'".into()));
    }
    Ok(email)
}

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    Ok(())
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AuthError::Hashing(e.to_string()))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::Hashing(e.to_string())),
    }
}

/// Accounts in the relational store, sessions in process memory.
#[derive(Clone)]
pub struct LocalIdentityProvider {
    clock: Clock,
    accounts: Arc<dyn AccountRepository>,
    sessions: Arc<Mutex<HashMap<SessionToken, SessionContext>>>,
}

impl LocalIdentityProvider {
    #[must_use]
    pub fn new(clock: Clock, accounts: Arc<dyn AccountRepository>) -> Self {
        Self {
            clock,
            accounts,
            sessions: Arc::default(),
        }
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn current_session(&self, token: &SessionToken) -> Option<SessionContext> {
        self.sessions.lock().ok()?.get(token).cloned()
    }

    #[tracing::instrument(skip(self, password))]
    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionContext, AuthError> {
        let email = normalize_email(email)?;
        validate_password(password)?;

        let Some(account) = self.accounts.find_account_by_email(&email).await? else {
            return Err(AuthError::InvalidCredentials);
        };
        if !verify_password(password, &account.password_hash)? {
            tracing::info!("rejected sign-in with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let session = SessionContext {
            user_id: account.user_id,
            token: SessionToken::generate(),
            email: account.email,
            full_name: account.full_name,
        };
        self.sessions
            .lock()
            .map_err(|e| AuthError::Storage(StorageError::Connection(e.to_string())))?
            .insert(session.token.clone(), session.clone());
        tracing::info!(user_id = %session.user_id, "signed in");
        Ok(session)
    }

    #[tracing::instrument(skip(self, request), fields(email = %request.email))]
    async fn sign_up(&self, request: SignUp) -> Result<UserId, AuthError> {
        let email = normalize_email(&request.email)?;
        validate_password(&request.password)?;
        let full_name = request.full_name.trim().to_owned();
        if full_name.is_empty() {
            return Err(AuthError::Validation("full name cannot be empty".into()));
        }

        let account = AccountRecord {
            user_id: UserId::random(),
            email,
            full_name: Some(full_name),
            password_hash: hash_password(&request.password)?,
            created_at: self.clock.now(),
        };
        match self.accounts.insert_account(&account).await {
            Ok(()) => {}
            Err(StorageError::Conflict) => return Err(AuthError::EmailTaken),
            Err(e) => return Err(e.into()),
        }
        tracing::info!(user_id = %account.user_id, "account created");
        Ok(account.user_id)
    }

    async fn sign_out(&self, token: &SessionToken) {
        if let Ok(mut sessions) = self.sessions.lock() {
            if let Some(session) = sessions.remove(token) {
                tracing::info!(user_id = %session.user_id, "signed out");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryRepository;
    use typus_core::time::fixed_clock;

    fn provider() -> LocalIdentityProvider {
        LocalIdentityProvider::new(fixed_clock(), Arc::new(InMemoryRepository::new()))
    }

    fn sign_up_request() -> SignUp {
        SignUp {
            email: "Maria@Example.com".into(),
            password: "segredo1".into(),
            full_name: "Maria Silva".into(),
        }
    }

    #[tokio::test]
    async fn sign_up_sign_in_sign_out_roundtrip() {
        let provider = provider();
        let user_id = provider.sign_up(sign_up_request()).await.unwrap();

        let session = provider.sign_in("maria@example.com", "segredo1").await.unwrap();
        assert_eq!(session.user_id, user_id);
        assert_eq!(session.full_name.as_deref(), Some("Maria Silva"));
        assert_eq!(
            provider.current_session(&session.token).await,
            Some(session.clone())
        );

        provider.sign_out(&session.token).await;
        assert!(provider.current_session(&session.token).await.is_none());
    }

    #[tokio::test]
    async fn stale_context_fails_session_check() {
        let provider = provider();
        let user_id = provider.sign_up(sign_up_request()).await.unwrap();
        let auth: AuthContext = provider
            .sign_in("maria@example.com", "segredo1")
            .await
            .unwrap()
            .into();
        assert_eq!(auth.require_session(&provider).await, Ok(user_id));

        let kept = auth.clone();
        provider.sign_out(&auth.session().unwrap().token).await;

        assert_eq!(kept.require_session(&provider).await, Err(Unauthenticated));
        assert_eq!(
            AuthContext::Anonymous.require_session(&provider).await,
            Err(Unauthenticated)
        );
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let provider = provider();
        provider.sign_up(sign_up_request()).await.unwrap();

        let err = provider
            .sign_in("maria@example.com", "errado123")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn duplicate_email_is_taken() {
        let provider = provider();
        provider.sign_up(sign_up_request()).await.unwrap();
        let err = provider.sign_up(sign_up_request()).await.unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[tokio::test]
    async fn input_is_validated_before_lookup() {
        let provider = provider();
        let err = provider.sign_in("no-at-sign", "segredo1").await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));

        let err = provider.sign_in("a@b.c", "12345").await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));

        let err = provider
            .sign_up(SignUp {
                full_name: "   ".into(),
                ..sign_up_request()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }
}
