use typus_core::progress::ProgressView;

use crate::error::ProgressError;
use crate::notice::Notice;
use crate::progress::Completion;

/// What the development screen shows.
///
/// `Loading` -> (`Ready` | `Empty` | `Error`); a recorded completion updates a
/// `Ready` view in place and never leaves the current state on failure.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProgressViewState {
    #[default]
    Loading,
    Error(Notice),
    Empty,
    Ready(ProgressView),
}

impl ProgressViewState {
    pub fn begin_load(&mut self) {
        *self = ProgressViewState::Loading;
    }

    pub fn on_loaded(&mut self, result: Result<ProgressView, ProgressError>) {
        *self = match result {
            Ok(view) if view.is_empty() => ProgressViewState::Empty,
            Ok(view) => ProgressViewState::Ready(view),
            Err(err) => ProgressViewState::Error(Notice::from_progress_error(&err)),
        };
    }

    /// Applies a completion result. Returns a notice to show for failures.
    pub fn on_recorded(
        &mut self,
        skill_name: &str,
        result: Result<Completion, ProgressError>,
    ) -> Option<Notice> {
        match result {
            Ok(completion) => {
                if let ProgressViewState::Ready(view) = self {
                    view.apply_count(skill_name, completion.videos_watched);
                }
                None
            }
            Err(err) => Some(Notice::from_progress_error(&err)),
        }
    }

    #[must_use]
    pub fn view(&self) -> Option<&ProgressView> {
        match self {
            ProgressViewState::Ready(view) => Some(view),
            _ => None,
        }
    }
}
