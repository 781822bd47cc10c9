//! Maps watched-video counts to a bounded per-skill completion percentage.
//!
//! Every completed video is worth [`PERCENT_PER_VIDEO`] points, capped at
//! [`MAX_PERCENT`]: the 20th and every later video for a skill leaves the
//! visible score unchanged.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{ProgressRecord, SkillKey};

pub const PERCENT_PER_VIDEO: u32 = 5;
pub const MAX_PERCENT: u8 = 100;

/// Percentage shown for a skill with `videos_watched` completions.
#[must_use]
pub fn percentage_for(videos_watched: u32) -> u8 {
    let raw = videos_watched
        .saturating_mul(PERCENT_PER_VIDEO)
        .min(u32::from(MAX_PERCENT));
    u8::try_from(raw).unwrap_or(MAX_PERCENT)
}

/// One chart point: a catalog skill and its percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillProgress {
    pub skill_name: String,
    pub percentage: u8,
}

/// Per-skill progress for one user and sport, in catalog order.
///
/// The length always equals the catalog length; skills without a record
/// show 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressView {
    entries: Vec<SkillProgress>,
}

impl ProgressView {
    /// Builds the view by joining the catalog with recorded counts.
    #[must_use]
    pub fn from_catalog<S: AsRef<str>>(catalog: &[S], counts: &HashMap<SkillKey, u32>) -> Self {
        let entries = catalog
            .iter()
            .map(|name| {
                let name = name.as_ref();
                let watched = SkillKey::new(name)
                    .ok()
                    .and_then(|key| counts.get(&key).copied())
                    .unwrap_or(0);
                SkillProgress {
                    skill_name: name.to_owned(),
                    percentage: percentage_for(watched),
                }
            })
            .collect();
        Self { entries }
    }

    /// Builds the view from stored records. Records whose key is not in the
    /// catalog are ignored.
    #[must_use]
    pub fn from_records<S: AsRef<str>>(catalog: &[S], records: &[ProgressRecord]) -> Self {
        let counts = records
            .iter()
            .map(|r| (r.skill_key.clone(), r.videos_watched))
            .collect::<HashMap<_, _>>();
        Self::from_catalog(catalog, &counts)
    }

    /// A view with every catalog skill at 0.
    #[must_use]
    pub fn zeroed<S: AsRef<str>>(catalog: &[S]) -> Self {
        Self::from_catalog(catalog, &HashMap::new())
    }

    #[must_use]
    pub fn entries(&self) -> &[SkillProgress] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn percentage_of(&self, skill_name: &str) -> Option<u8> {
        let key = SkillKey::new(skill_name).ok()?;
        self.entries
            .iter()
            .find(|e| SkillKey::new(&e.skill_name).is_ok_and(|k| k == key))
            .map(|e| e.percentage)
    }

    /// Updates the entry matching `skill_name` to reflect a new count.
    ///
    /// Returns false when the skill is not part of the view.
    pub fn apply_count(&mut self, skill_name: &str, videos_watched: u32) -> bool {
        let Ok(key) = SkillKey::new(skill_name) else {
            return false;
        };
        match self
            .entries
            .iter_mut()
            .find(|e| SkillKey::new(&e.skill_name).is_ok_and(|k| k == key))
        {
            Some(entry) => {
                entry.percentage = percentage_for(videos_watched);
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillProgress> {
        self.entries.iter()
    }
}

impl IntoIterator for ProgressView {
    type Item = SkillProgress;
    type IntoIter = std::vec::IntoIter<SkillProgress>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
