use typus_core::progress::ProgressView;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkillCardVm {
    pub skill_name: String,
    pub percentage: u8,
    pub label: String,
    pub bar_style: String,
}

#[must_use]
pub fn map_progress_cards(view: &ProgressView) -> Vec<SkillCardVm> {
    view.iter()
        .map(|entry| SkillCardVm {
            skill_name: entry.skill_name.clone(),
            percentage: entry.percentage,
            label: format!("{}%", entry.percentage),
            bar_style: format!("width: {}%", entry.percentage),
        })
        .collect()
}

/// Mean of all skills, rounded down.
#[must_use]
pub fn overall_percentage(view: &ProgressView) -> u8 {
    if view.is_empty() {
        return 0;
    }
    let total: usize = view.iter().map(|e| usize::from(e.percentage)).sum();
    u8::try_from(total / view.len()).unwrap_or(100)
}
