//! Shared error types for the services crate.

use thiserror::Error;

use storage::media::MediaError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// The caller has no signed-in session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("not signed in")]
pub struct Unauthenticated;

/// Errors emitted by the identity provider.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("an account with this email already exists")]
    EmailTaken,
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error(transparent)]
    Unauthenticated(#[from] Unauthenticated),
    #[error("sport not found")]
    NotFound,
    #[error("invalid skill: {0}")]
    Validation(String),
    #[error("progress storage unavailable")]
    StorageUnavailable(#[source] StorageError),
}

impl From<StorageError> for ProgressError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound => Self::NotFound,
            other => Self::StorageUnavailable(other),
        }
    }
}

/// Errors emitted by `BrowseService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BrowseError {
    #[error(transparent)]
    Unauthenticated(#[from] Unauthenticated),
    #[error("not found")]
    NotFound,
    #[error("catalog storage unavailable")]
    StorageUnavailable(#[source] StorageError),
}

impl From<StorageError> for BrowseError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound => Self::NotFound,
            other => Self::StorageUnavailable(other),
        }
    }
}

/// Errors emitted by `UploadService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum UploadError {
    #[error(transparent)]
    Unauthenticated(#[from] Unauthenticated),
    #[error("{0}")]
    Validation(String),
    #[error("skill not found")]
    NotFound,
    #[error(transparent)]
    Media(#[from] MediaError),
    #[error("video storage unavailable")]
    StorageUnavailable(#[source] StorageError),
}

impl From<StorageError> for UploadError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound => Self::NotFound,
            other => Self::StorageUnavailable(other),
        }
    }
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
