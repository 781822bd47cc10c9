use thiserror::Error;
use url::Url;

use crate::model::ids::{SportId, TrainerId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TrainerError {
    #[error("trainer name cannot be empty")]
    EmptyName,

    #[error("trainer contact cannot be empty")]
    EmptyContact,

    #[error("invalid image url: {0}")]
    InvalidImageUrl(String),
}

/// A paid trainer offering lessons for one sport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trainer {
    pub id: TrainerId,
    pub sport_id: SportId,
    pub name: String,
    pub description: String,
    pub contact: String,
    /// Price per hour in cents.
    pub hourly_rate_cents: u32,
    pub experience_years: Option<u32>,
    pub specialties: Vec<String>,
    pub image_url: Option<Url>,
}

/// Unvalidated trainer fields, as typed by an admin or read from seed data.
#[derive(Debug, Clone, Default)]
pub struct TrainerDraft {
    pub name: String,
    pub description: String,
    pub contact: String,
    pub hourly_rate_cents: u32,
    pub experience_years: Option<u32>,
    pub specialties: Vec<String>,
    pub image_url: Option<String>,
}

impl TrainerDraft {
    /// Validates the draft and assigns the given ids.
    ///
    /// # Errors
    ///
    /// Returns `TrainerError` for blank name/contact or an unparsable image url.
    pub fn validate(self, id: TrainerId, sport_id: SportId) -> Result<Trainer, TrainerError> {
        let name = self.name.trim().to_owned();
        if name.is_empty() {
            return Err(TrainerError::EmptyName);
        }
        let contact = self.contact.trim().to_owned();
        if contact.is_empty() {
            return Err(TrainerError::EmptyContact);
        }
        let image_url = self
            .image_url
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(|raw| Url::parse(raw).map_err(|_| TrainerError::InvalidImageUrl(raw.to_owned())))
            .transpose()?;
        let specialties = self
            .specialties
            .into_iter()
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Trainer {
            id,
            sport_id,
            name,
            description: self.description.trim().to_owned(),
            contact,
            hourly_rate_cents: self.hourly_rate_cents,
            experience_years: self.experience_years,
            specialties,
            image_url,
        })
    }
}
