use thiserror::Error;
use url::Url;

use crate::model::ids::{SkillId, VideoId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum VideoError {
    #[error("video title cannot be empty")]
    EmptyTitle,

    #[error("invalid video url: {0}")]
    InvalidUrl(String),
}

/// A training video attached to one skill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Video {
    id: VideoId,
    skill_id: SkillId,
    title: String,
    description: Option<String>,
    video_url: Url,
    duration_secs: Option<u32>,
}

impl Video {
    /// # Errors
    ///
    /// Returns `VideoError` if the title is blank or the url does not parse.
    pub fn new(
        id: VideoId,
        skill_id: SkillId,
        title: impl Into<String>,
        description: Option<String>,
        video_url: &str,
        duration_secs: Option<u32>,
    ) -> Result<Self, VideoError> {
        let title = title.into().trim().to_owned();
        if title.is_empty() {
            return Err(VideoError::EmptyTitle);
        }
        let video_url =
            Url::parse(video_url.trim()).map_err(|_| VideoError::InvalidUrl(video_url.to_owned()))?;
        Ok(Self {
            id,
            skill_id,
            title,
            description: description
                .map(|d| d.trim().to_owned())
                .filter(|d| !d.is_empty()),
            video_url,
            duration_secs,
        })
    }

    #[must_use]
    pub fn id(&self) -> VideoId {
        self.id
    }

    #[must_use]
    pub fn skill_id(&self) -> SkillId {
        self.skill_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn video_url(&self) -> &Url {
        &self.video_url
    }

    #[must_use]
    pub fn duration_secs(&self) -> Option<u32> {
        self.duration_secs
    }
}

/// Formats a duration as `m:ss`.
///
/// Missing or zero durations render as "Duração desconhecida".
#[must_use]
pub fn format_duration(seconds: Option<u32>) -> String {
    match seconds {
        None | Some(0) => "Duração desconhecida".to_owned(),
        Some(secs) => format!("{}:{:02}", secs / 60, secs % 60),
    }
}
