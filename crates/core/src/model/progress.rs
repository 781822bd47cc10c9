use chrono::{DateTime, Utc};

use crate::model::ids::{SportId, UserId};
use crate::model::skill::SkillKey;
use crate::progress::percentage_for;

/// Accumulated watch activity for one (user, sport, skill) triple.
///
/// At most one record exists per triple. Created with a count of one on the
/// first completion and incremented by one on every later completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressRecord {
    pub user_id: UserId,
    pub sport_id: SportId,
    pub skill_key: SkillKey,
    /// Display name as it was first recorded.
    pub skill_name: String,
    pub videos_watched: u32,
    pub updated_at: DateTime<Utc>,
}

impl ProgressRecord {
    /// Record for a first completion.
    #[must_use]
    pub fn first_completion(
        user_id: UserId,
        sport_id: SportId,
        skill_key: SkillKey,
        skill_name: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            sport_id,
            skill_key,
            skill_name: skill_name.into(),
            videos_watched: 1,
            updated_at: at,
        }
    }

    /// Applies one more completion.
    pub fn increment(&mut self, at: DateTime<Utc>) {
        self.videos_watched = self.videos_watched.saturating_add(1);
        self.updated_at = at;
    }

    #[must_use]
    pub fn percentage(&self) -> u8 {
        percentage_for(self.videos_watched)
    }
}
