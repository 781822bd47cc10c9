use std::f64::consts::{FRAC_PI_2, TAU};

use typus_core::progress::ProgressView;

pub const CHART_SIZE: f64 = 300.0;
const RADIUS: f64 = 110.0;
const LABEL_OFFSET: f64 = 1.18;
const RING_FRACTIONS: [f64; 4] = [0.25, 0.5, 0.75, 1.0];

#[derive(Clone, Debug, PartialEq)]
pub struct RadarAxisVm {
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub label_x: f64,
    pub label_y: f64,
    pub anchor: &'static str,
}

/// SVG geometry for the development radar chart, 0-100 per axis.
#[derive(Clone, Debug, PartialEq)]
pub struct RadarChartVm {
    pub size: f64,
    pub center: f64,
    pub rings: Vec<String>,
    pub axes: Vec<RadarAxisVm>,
    pub area: String,
}

impl RadarChartVm {
    #[must_use]
    pub fn view_box(&self) -> String {
        format!("0 0 {0} {0}", self.size)
    }
}

fn angle(index: usize, count: usize) -> f64 {
    // First axis points straight up, the rest go clockwise.
    -FRAC_PI_2 + TAU * index as f64 / count as f64
}

fn point(center: f64, angle: f64, fraction: f64) -> (f64, f64) {
    (
        center + RADIUS * fraction * angle.cos(),
        center + RADIUS * fraction * angle.sin(),
    )
}

fn polygon(points: impl Iterator<Item = (f64, f64)>) -> String {
    points
        .map(|(x, y)| format!("{x:.1},{y:.1}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn anchor_for(angle: f64) -> &'static str {
    let cos = angle.cos();
    if cos.abs() < 0.1 {
        "middle"
    } else if cos > 0.0 {
        "start"
    } else {
        "end"
    }
}

#[must_use]
pub fn map_radar_chart(view: &ProgressView) -> RadarChartVm {
    let center = CHART_SIZE / 2.0;
    let count = view.len();
    if count == 0 {
        return RadarChartVm {
            size: CHART_SIZE,
            center,
            rings: Vec::new(),
            axes: Vec::new(),
            area: String::new(),
        };
    }

    let rings = RING_FRACTIONS
        .iter()
        .map(|&fraction| polygon((0..count).map(|i| point(center, angle(i, count), fraction))))
        .collect();

    let axes = view
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let a = angle(i, count);
            let (x, y) = point(center, a, 1.0);
            let (label_x, label_y) = point(center, a, LABEL_OFFSET);
            RadarAxisVm {
                label: entry.skill_name.clone(),
                x,
                y,
                label_x,
                label_y,
                anchor: anchor_for(a),
            }
        })
        .collect();

    let area = polygon(view.iter().enumerate().map(|(i, entry)| {
        point(center, angle(i, count), f64::from(entry.percentage) / 100.0)
    }));

    RadarChartVm {
        size: CHART_SIZE,
        center,
        rings,
        axes,
        area,
    }
}
