mod format;
mod progress_vm;
mod radar_vm;

pub use format::{format_experience, format_price_cents};
pub use progress_vm::{SkillCardVm, map_progress_cards, overall_percentage};
pub use radar_vm::{CHART_SIZE, RadarAxisVm, RadarChartVm, map_radar_chart};
