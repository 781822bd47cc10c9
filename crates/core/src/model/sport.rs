use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::model::ids::SportId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SlugError {
    #[error("slug cannot be empty")]
    Empty,

    #[error("slug contains invalid character {0:?}")]
    InvalidChar(char),

    #[error("slug cannot start or end with '-'")]
    DanglingDash,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SportError {
    #[error("sport name cannot be empty")]
    EmptyName,

    #[error(transparent)]
    Slug(#[from] SlugError),

    #[error("invalid image url: {0}")]
    InvalidImageUrl(String),
}

//
// ─── SLUG ──────────────────────────────────────────────────────────────────────
//

/// URL-safe identifier used in routes (`futebol`, `jiu-jitsu`).
///
/// Only lowercase ASCII letters, digits and inner dashes are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Validates and wraps a slug.
    ///
    /// # Errors
    ///
    /// Returns `SlugError` if the value is empty or contains characters outside `[a-z0-9-]`.
    pub fn new(value: impl Into<String>) -> Result<Self, SlugError> {
        let value = value.into();
        let value = value.trim();
        if value.is_empty() {
            return Err(SlugError::Empty);
        }
        if let Some(bad) = value
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
        {
            return Err(SlugError::InvalidChar(bad));
        }
        if value.starts_with('-') || value.ends_with('-') {
            return Err(SlugError::DanglingDash);
        }
        Ok(Self(value.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derives a slug from a display name, folding Latin accents
    /// ("Movimentação" becomes "movimentacao").
    ///
    /// # Errors
    ///
    /// Returns `SlugError::Empty` if nothing alphanumeric is left.
    pub fn from_name(name: &str) -> Result<Self, SlugError> {
        let mut slug = String::with_capacity(name.len());
        let mut last_dash = false;
        for ch in name.chars().flat_map(char::to_lowercase).map(fold_accent) {
            if ch.is_ascii_alphanumeric() {
                slug.push(ch);
                last_dash = false;
            } else if !last_dash {
                slug.push('-');
                last_dash = true;
            }
        }
        Self::new(slug.trim_matches('-'))
    }
}

fn fold_accent(ch: char) -> char {
    match ch {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Slug> for String {
    fn from(value: Slug) -> Self {
        value.0
    }
}

//
// ─── SPORT ─────────────────────────────────────────────────────────────────────
//

/// A sport the user can train (football, surf, boxing...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sport {
    id: SportId,
    slug: Slug,
    name: String,
    description: Option<String>,
    image_url: Option<Url>,
}

impl Sport {
    /// Creates a sport after validating its fields.
    ///
    /// # Errors
    ///
    /// Returns `SportError` if the name is blank, the slug is invalid or the
    /// image url does not parse.
    pub fn new(
        id: SportId,
        slug: impl Into<String>,
        name: impl Into<String>,
        description: Option<String>,
        image_url: Option<&str>,
    ) -> Result<Self, SportError> {
        let name = name.into().trim().to_owned();
        if name.is_empty() {
            return Err(SportError::EmptyName);
        }
        let slug = Slug::new(slug)?;
        let image_url = image_url
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(|raw| Url::parse(raw).map_err(|_| SportError::InvalidImageUrl(raw.to_owned())))
            .transpose()?;
        let description = description
            .map(|d| d.trim().to_owned())
            .filter(|d| !d.is_empty());

        Ok(Self {
            id,
            slug,
            name,
            description,
            image_url,
        })
    }

    #[must_use]
    pub fn id(&self) -> SportId {
        self.id
    }

    #[must_use]
    pub fn slug(&self) -> &Slug {
        &self.slug
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn image_url(&self) -> Option<&Url> {
        self.image_url.as_ref()
    }

    /// Returns a copy with a different id, used after the store assigns one.
    #[must_use]
    pub fn with_id(mut self, id: SportId) -> Self {
        self.id = id;
        self
    }
}
