//! Object storage for uploaded training videos.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use thiserror::Error;
use typus_core::model::UserId;
use url::Url;

/// The only accepted container.
pub const VIDEO_EXTENSION: &str = "mp4";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MediaError {
    #[error("object name cannot be empty")]
    EmptyName,

    #[error("invalid object name: {0}")]
    InvalidName(String),

    #[error("unsupported container: {0}")]
    UnsupportedContainer(String),

    #[error("invalid media url: {0}")]
    InvalidUrl(String),

    #[error("media io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("media store unavailable: {0}")]
    Unavailable(String),
}

/// Location of an object inside the store: `<user_id>/<object>.mp4`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaPath {
    owner: UserId,
    object: String,
}

impl MediaPath {
    /// # Errors
    ///
    /// Returns `MediaError` if the object name is empty, contains path
    /// separators or `..`, or is not an `.mp4` file.
    pub fn new(owner: UserId, object: impl Into<String>) -> Result<Self, MediaError> {
        let object = object.into().trim().to_owned();
        if object.is_empty() {
            return Err(MediaError::EmptyName);
        }
        if object.contains("..") || object.contains('/') || object.contains('\\') {
            return Err(MediaError::InvalidName(object));
        }
        let extension = Path::new(&object)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some(VIDEO_EXTENSION) => {}
            Some(other) => return Err(MediaError::UnsupportedContainer(other.to_owned())),
            None => return Err(MediaError::UnsupportedContainer(object)),
        }
        if Path::new(&object).file_stem().is_none_or(|s| s.is_empty()) {
            return Err(MediaError::EmptyName);
        }
        Ok(Self { owner, object })
    }

    /// A fresh, collision-free object for the owner.
    #[must_use]
    pub fn generated(owner: UserId) -> Self {
        Self {
            owner,
            object: format!("{}.{VIDEO_EXTENSION}", uuid::Uuid::new_v4()),
        }
    }

    #[must_use]
    pub fn owner(&self) -> UserId {
        self.owner
    }

    #[must_use]
    pub fn object(&self) -> &str {
        &self.object
    }

    fn relative(&self) -> PathBuf {
        PathBuf::from(self.owner.to_string()).join(&self.object)
    }
}

impl fmt::Display for MediaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.object)
    }
}

/// Upload and address stored objects.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Stores the bytes at `path`, replacing any existing object, and returns
    /// its public URL.
    ///
    /// # Errors
    ///
    /// Returns `MediaError` if the object cannot be written.
    async fn upload(&self, path: &MediaPath, bytes: &[u8]) -> Result<Url, MediaError>;

    /// # Errors
    ///
    /// Returns `MediaError::InvalidUrl` if the URL cannot be built.
    fn public_url(&self, path: &MediaPath) -> Result<Url, MediaError>;
}

fn join_url(base: &Url, path: &MediaPath) -> Result<Url, MediaError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    base.join(&path.to_string())
        .map_err(|e| MediaError::InvalidUrl(e.to_string()))
}

/// Files under a root directory, served from `base_url`.
#[derive(Debug, Clone)]
pub struct LocalMediaStore {
    root: PathBuf,
    base_url: Url,
}

impl LocalMediaStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, base_url: Url) -> Self {
        Self {
            root: root.into(),
            base_url,
        }
    }

    /// Uses `file://<root>/` as the base URL.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::InvalidUrl` if `root` is not absolute.
    pub fn with_file_urls(root: impl Into<PathBuf>) -> Result<Self, MediaError> {
        let root = root.into();
        let base_url = Url::from_directory_path(&root)
            .map_err(|()| MediaError::InvalidUrl(root.display().to_string()))?;
        Ok(Self { root, base_url })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn upload(&self, path: &MediaPath, bytes: &[u8]) -> Result<Url, MediaError> {
        let target = self.root.join(path.relative());
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, bytes).await?;
        tracing::debug!(path = %path, size = bytes.len(), "stored media object");
        self.public_url(path)
    }

    fn public_url(&self, path: &MediaPath) -> Result<Url, MediaError> {
        join_url(&self.base_url, path)
    }
}

/// Keeps objects in memory; for tests and previews.
#[derive(Debug, Clone)]
pub struct InMemoryMediaStore {
    base_url: Url,
    objects: Arc<Mutex<HashMap<MediaPath, Vec<u8>>>>,
}

impl InMemoryMediaStore {
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            objects: Arc::default(),
        }
    }

    /// Number of stored objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.lock().map_or(0, |m| m.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn get(&self, path: &MediaPath) -> Option<Vec<u8>> {
        self.objects.lock().ok()?.get(path).cloned()
    }
}

impl Default for InMemoryMediaStore {
    /// Serves objects under `memory://media/`.
    ///
    /// # Panics
    ///
    /// Never in practice; the base URL is a constant.
    fn default() -> Self {
        Self::new(Url::parse("memory://media/").expect("constant url parses"))
    }
}

#[async_trait]
impl MediaStore for InMemoryMediaStore {
    async fn upload(&self, path: &MediaPath, bytes: &[u8]) -> Result<Url, MediaError> {
        self.objects
            .lock()
            .map_err(|e| MediaError::Unavailable(e.to_string()))?
            .insert(path.clone(), bytes.to_vec());
        self.public_url(path)
    }

    fn public_url(&self, path: &MediaPath) -> Result<Url, MediaError> {
        join_url(&self.base_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_only_mp4() {
        let owner = UserId::random();
        assert!(MediaPath::new(owner, "treino.mp4").is_ok());
        assert!(MediaPath::new(owner, "TREINO.MP4").is_ok());
        assert!(matches!(
            MediaPath::new(owner, "treino.mov"),
            Err(MediaError::UnsupportedContainer(_))
        ));
        assert!(matches!(
            MediaPath::new(owner, "treino"),
            Err(MediaError::UnsupportedContainer(_))
        ));
    }

    #[test]
    fn rejects_traversal_and_empty_names() {
        let owner = UserId::random();
        assert!(matches!(MediaPath::new(owner, "  "), Err(MediaError::EmptyName)));
        assert!(matches!(
            MediaPath::new(owner, "../x.mp4"),
            Err(MediaError::InvalidName(_))
        ));
        assert!(matches!(
            MediaPath::new(owner, "a/b.mp4"),
            Err(MediaError::InvalidName(_))
        ));
    }

    #[test]
    fn generated_path_is_owned_mp4() {
        let owner = UserId::random();
        let path = MediaPath::generated(owner);
        assert_eq!(path.owner(), owner);
        assert!(path.to_string().starts_with(&owner.to_string()));
        assert!(path.object().ends_with(".mp4"));
    }

    #[tokio::test]
    async fn in_memory_store_returns_url_under_base() {
        let store = InMemoryMediaStore::new(Url::parse("https://cdn.example.com/videos").unwrap());
        let owner = UserId::random();
        let path = MediaPath::new(owner, "clip.mp4").unwrap();

        let url = store.upload(&path, b"data").await.unwrap();

        assert_eq!(
            url.as_str(),
            format!("https://cdn.example.com/videos/{owner}/clip.mp4")
        );
        assert_eq!(store.get(&path).as_deref(), Some(&b"data"[..]));
    }

    #[tokio::test]
    async fn local_store_writes_file() {
        let root = std::env::temp_dir().join(format!("typus-media-{}", uuid::Uuid::new_v4()));
        let store = LocalMediaStore::with_file_urls(&root).unwrap();
        let path = MediaPath::generated(UserId::random());

        let url = store.upload(&path, b"mp4").await.unwrap();

        let written = tokio::fs::read(root.join(path.relative())).await.unwrap();
        assert_eq!(written, b"mp4");
        assert_eq!(url.scheme(), "file");
        let _ = tokio::fs::remove_dir_all(&root).await;
    }
}
