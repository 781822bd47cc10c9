mod ids;
mod progress;
mod skill;
mod sport;
mod trainer;
mod video;

pub use ids::{ParseIdError, SkillId, SportId, TrainerId, UserId, VideoId};

pub use progress::ProgressRecord;
pub use skill::{Skill, SkillError, SkillKey};
pub use sport::{Slug, SlugError, Sport, SportError};
pub use trainer::{Trainer, TrainerDraft, TrainerError};
pub use video::{Video, VideoError, format_duration};
