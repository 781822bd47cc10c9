use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{SkillId, SportId};
use crate::model::sport::{Slug, SlugError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SkillError {
    #[error("skill name cannot be empty")]
    EmptyName,

    #[error(transparent)]
    Slug(#[from] SlugError),
}

//
// ─── SKILL KEY ─────────────────────────────────────────────────────────────────
//

/// Canonical identity of a skill within a sport.
///
/// Built from a display name by trimming, collapsing inner whitespace and
/// lowercasing, so `"Passe"`, `" passe "` and `"PASSE"` share one key. Progress
/// records and catalog lookups compare keys, never raw names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SkillKey(String);

impl SkillKey {
    /// Canonicalizes a skill name.
    ///
    /// # Errors
    ///
    /// Returns `SkillError::EmptyName` if nothing is left after trimming.
    pub fn new(name: &str) -> Result<Self, SkillError> {
        let collapsed = name.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            return Err(SkillError::EmptyName);
        }
        Ok(Self(collapsed.to_lowercase()))
    }

    /// Rehydrates a key that was canonicalized before it was stored.
    #[must_use]
    pub fn from_persisted(raw: String) -> Self {
        Self(raw)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SkillKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//
// ─── SKILL ─────────────────────────────────────────────────────────────────────
//

/// A trainable sub-competency of a sport ("Chute" for football).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skill {
    id: SkillId,
    sport_id: SportId,
    name: String,
    slug: Slug,
    description: Option<String>,
}

impl Skill {
    /// # Errors
    ///
    /// Returns `SkillError` if the name is blank or the slug is invalid.
    pub fn new(
        id: SkillId,
        sport_id: SportId,
        name: impl Into<String>,
        slug: impl Into<String>,
        description: Option<String>,
    ) -> Result<Self, SkillError> {
        let name = name.into().trim().to_owned();
        if name.is_empty() {
            return Err(SkillError::EmptyName);
        }
        Ok(Self {
            id,
            sport_id,
            name,
            slug: Slug::new(slug)?,
            description: description
                .map(|d| d.trim().to_owned())
                .filter(|d| !d.is_empty()),
        })
    }

    #[must_use]
    pub fn id(&self) -> SkillId {
        self.id
    }

    #[must_use]
    pub fn sport_id(&self) -> SportId {
        self.sport_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn slug(&self) -> &Slug {
        &self.slug
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Canonical key of this skill's name.
    #[must_use]
    pub fn key(&self) -> SkillKey {
        // name is validated non-empty at construction
        SkillKey(
            self.name
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
                .to_lowercase(),
        )
    }

    #[must_use]
    pub fn with_id(mut self, id: SkillId) -> Self {
        self.id = id;
        self
    }
}
