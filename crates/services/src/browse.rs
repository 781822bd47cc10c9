//! Read-only catalog screens: sports, skills, videos and trainers.

use std::sync::Arc;

use storage::repository::{SkillRepository, SportRepository, TrainerRepository, VideoRepository};
use typus_core::model::{Skill, SkillId, Sport, Trainer, Video, VideoId};

use crate::error::BrowseError;
use crate::session::{AuthContext, IdentityProvider};

/// A skill with the number of videos available for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillWithVideos {
    pub skill: Skill,
    pub video_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SportSkills {
    pub sport: Sport,
    pub skills: Vec<SkillWithVideos>,
}

/// A video with the skill and sport it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDetail {
    pub video: Video,
    pub skill: Skill,
    pub sport: Sport,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SportTrainers {
    pub sport: Sport,
    pub trainers: Vec<Trainer>,
}

#[derive(Clone)]
pub struct BrowseService {
    identity: Arc<dyn IdentityProvider>,
    sports: Arc<dyn SportRepository>,
    skills: Arc<dyn SkillRepository>,
    videos: Arc<dyn VideoRepository>,
    trainers: Arc<dyn TrainerRepository>,
}

impl BrowseService {
    #[must_use]
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        sports: Arc<dyn SportRepository>,
        skills: Arc<dyn SkillRepository>,
        videos: Arc<dyn VideoRepository>,
        trainers: Arc<dyn TrainerRepository>,
    ) -> Self {
        Self {
            identity,
            sports,
            skills,
            videos,
            trainers,
        }
    }

    /// All sports ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `BrowseError::Unauthenticated` or `BrowseError::StorageUnavailable`.
    pub async fn list_sports(&self, auth: &AuthContext) -> Result<Vec<Sport>, BrowseError> {
        auth.require_session(self.identity.as_ref()).await?;
        Ok(self.sports.list_sports().await?)
    }

    /// # Errors
    ///
    /// Returns `BrowseError::NotFound` when no sport has this slug.
    pub async fn sport_by_slug(&self, auth: &AuthContext, slug: &str) -> Result<Sport, BrowseError> {
        auth.require_session(self.identity.as_ref()).await?;
        self.sports
            .find_sport_by_slug(slug)
            .await?
            .ok_or(BrowseError::NotFound)
    }

    /// The sport's skills ordered by name, each with its video count.
    ///
    /// # Errors
    ///
    /// Returns `BrowseError::NotFound` for unknown slugs.
    #[tracing::instrument(skip(self, auth))]
    pub async fn skills_with_video_counts(
        &self,
        auth: &AuthContext,
        slug: &str,
    ) -> Result<SportSkills, BrowseError> {
        let sport = self.sport_by_slug(auth, slug).await?;
        let skills = self.skills.list_skills(sport.id()).await?;

        let mut with_counts = Vec::with_capacity(skills.len());
        for skill in skills {
            let video_count = self.videos.count_videos(skill.id()).await?;
            with_counts.push(SkillWithVideos { skill, video_count });
        }
        Ok(SportSkills {
            sport,
            skills: with_counts,
        })
    }

    /// The video to open when a skill is picked; `None` when it has no videos.
    ///
    /// # Errors
    ///
    /// Returns `BrowseError::Unauthenticated` or `BrowseError::StorageUnavailable`.
    pub async fn first_video_for_skill(
        &self,
        auth: &AuthContext,
        skill_id: SkillId,
    ) -> Result<Option<VideoId>, BrowseError> {
        auth.require_session(self.identity.as_ref()).await?;
        Ok(self.videos.first_video(skill_id).await?)
    }

    /// # Errors
    ///
    /// Returns `BrowseError::NotFound` if the video, its skill or its sport is missing.
    #[tracing::instrument(skip(self, auth))]
    pub async fn video_detail(
        &self,
        auth: &AuthContext,
        video_id: VideoId,
    ) -> Result<VideoDetail, BrowseError> {
        auth.require_session(self.identity.as_ref()).await?;
        let video = self
            .videos
            .get_video(video_id)
            .await?
            .ok_or(BrowseError::NotFound)?;
        let skill = self
            .skills
            .get_skill(video.skill_id())
            .await?
            .ok_or(BrowseError::NotFound)?;
        let sport = self
            .sports
            .get_sport(skill.sport_id())
            .await?
            .ok_or(BrowseError::NotFound)?;
        Ok(VideoDetail {
            video,
            skill,
            sport,
        })
    }

    /// Trainers for the sport, cheapest first.
    ///
    /// # Errors
    ///
    /// Returns `BrowseError::NotFound` for unknown slugs.
    pub async fn trainers_for_sport(
        &self,
        auth: &AuthContext,
        slug: &str,
    ) -> Result<SportTrainers, BrowseError> {
        let sport = self.sport_by_slug(auth, slug).await?;
        let trainers = self.trainers.list_trainers(sport.id()).await?;
        Ok(SportTrainers { sport, trainers })
    }
}
