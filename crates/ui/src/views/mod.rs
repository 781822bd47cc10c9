mod auth;
mod dashboard;
mod development;
mod notice;
mod skills;
mod sport_menu;
mod state;
mod trainers;
mod video;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use auth::AuthView;
pub use dashboard::DashboardView;
pub use development::DevelopmentView;
pub use notice::NoticeBanner;
pub use skills::SkillsView;
pub use sport_menu::SportMenuView;
pub use state::{ViewState, view_state_from_resource};
pub use trainers::TrainersView;
pub use video::VideoView;
