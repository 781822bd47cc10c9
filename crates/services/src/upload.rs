//! Uploading new training videos.

use std::path::Path;
use std::sync::Arc;

use storage::media::{MediaPath, MediaStore, VIDEO_EXTENSION};
use storage::repository::{NewVideoRecord, SkillRepository, VideoRepository};
use typus_core::model::{SkillId, VideoId};
use url::Url;

use crate::error::UploadError;
use crate::session::{AuthContext, IdentityProvider};

const VIDEO_CONTENT_TYPE: &str = "video/mp4";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadVideoRequest {
    pub skill_id: SkillId,
    pub title: String,
    pub description: Option<String>,
    /// Name of the file as chosen by the user; only its extension is used.
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub duration_secs: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedVideo {
    pub video_id: VideoId,
    pub url: Url,
}

impl UploadVideoRequest {
    fn validate(&self) -> Result<(), UploadError> {
        if self.title.trim().is_empty() {
            return Err(UploadError::Validation("title cannot be empty".into()));
        }
        if self.bytes.is_empty() {
            return Err(UploadError::Validation("file is empty".into()));
        }
        if !self
            .content_type
            .trim()
            .eq_ignore_ascii_case(VIDEO_CONTENT_TYPE)
        {
            return Err(UploadError::Validation(format!(
                "only {VIDEO_CONTENT_TYPE} videos are accepted, got {}",
                self.content_type
            )));
        }
        let is_mp4 = Path::new(self.file_name.trim())
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(VIDEO_EXTENSION));
        if !is_mp4 {
            return Err(UploadError::Validation(format!(
                "only .{VIDEO_EXTENSION} files are accepted"
            )));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct UploadService {
    identity: Arc<dyn IdentityProvider>,
    media: Arc<dyn MediaStore>,
    skills: Arc<dyn SkillRepository>,
    videos: Arc<dyn VideoRepository>,
}

impl UploadService {
    #[must_use]
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        media: Arc<dyn MediaStore>,
        skills: Arc<dyn SkillRepository>,
        videos: Arc<dyn VideoRepository>,
    ) -> Self {
        Self {
            identity,
            media,
            skills,
            videos,
        }
    }

    /// Stores the file under `<user_id>/<uuid>.mp4` and registers the video.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::Unauthenticated` or `UploadError::Validation`
    /// before touching any store, `UploadError::NotFound` for unknown skills,
    /// and `UploadError::Media`/`UploadError::StorageUnavailable` for write failures.
    #[tracing::instrument(skip(self, auth, request), fields(skill_id = %request.skill_id, size = request.bytes.len()))]
    pub async fn upload_video(
        &self,
        auth: &AuthContext,
        request: UploadVideoRequest,
    ) -> Result<UploadedVideo, UploadError> {
        let user_id = auth.require_session(self.identity.as_ref()).await?;
        request.validate()?;

        if self.skills.get_skill(request.skill_id).await?.is_none() {
            return Err(UploadError::NotFound);
        }

        let path = MediaPath::generated(user_id);
        let url = self.media.upload(&path, &request.bytes).await?;

        let video_id = self
            .videos
            .insert_video(&NewVideoRecord {
                skill_id: request.skill_id,
                title: request.title,
                description: request.description,
                video_url: url.to_string(),
                duration_secs: request.duration_secs,
                uploaded_by: Some(user_id),
            })
            .await?;

        tracing::info!(user_id = %user_id, video_id = %video_id, path = %path, "uploaded video");
        Ok(UploadedVideo { video_id, url })
    }
}
