//! Transient, non-blocking messages shown to the user.

use crate::error::{AuthError, BrowseError, ProgressError, UploadError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Info,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notice {
    #[must_use]
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Info,
        }
    }

    #[must_use]
    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Destructive,
        }
    }

    #[must_use]
    pub fn is_destructive(&self) -> bool {
        self.severity == Severity::Destructive
    }

    #[must_use]
    pub fn no_videos() -> Self {
        Self::info(
            "Nenhum vídeo disponível",
            "Esta habilidade ainda não possui vídeos.",
        )
    }

    #[must_use]
    pub fn from_progress_error(err: &ProgressError) -> Self {
        match err {
            ProgressError::Unauthenticated(_) => Self::session_expired(),
            ProgressError::NotFound => Self::destructive("Erro", "Esporte não encontrado"),
            ProgressError::Validation(msg) => Self::destructive("Erro", msg.clone()),
            ProgressError::StorageUnavailable(_) => Self::destructive(
                "Erro ao carregar dados",
                "Não foi possível acessar seu progresso. Tente novamente.",
            ),
        }
    }

    #[must_use]
    pub fn from_browse_error(err: &BrowseError) -> Self {
        match err {
            BrowseError::Unauthenticated(_) => Self::session_expired(),
            BrowseError::NotFound => Self::destructive("Erro", "Esporte não encontrado"),
            BrowseError::StorageUnavailable(_) => Self::destructive(
                "Erro ao carregar dados",
                "Não foi possível acessar o catálogo. Tente novamente.",
            ),
        }
    }

    #[must_use]
    pub fn from_upload_error(err: &UploadError) -> Self {
        match err {
            UploadError::Unauthenticated(_) => Self::session_expired(),
            UploadError::NotFound => Self::destructive("Erro", "Habilidade não encontrada"),
            other => Self::destructive("Erro no envio", other.to_string()),
        }
    }

    #[must_use]
    pub fn from_auth_error(err: &AuthError) -> Self {
        Self::destructive("Erro", err.to_string())
    }

    fn session_expired() -> Self {
        Self::destructive("Sessão expirada", "Faça login para continuar.")
    }
}
