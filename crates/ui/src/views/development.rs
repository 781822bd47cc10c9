use dioxus::prelude::*;
use dioxus_router::Link;
use services::ProgressViewState;
use typus_core::progress::ProgressView;

use crate::context::{AppContext, use_auth};
use crate::routes::Route;
use crate::views::NoticeBanner;
use crate::vm::{
    RadarChartVm, SkillCardVm, map_progress_cards, map_radar_chart, overall_percentage,
};

#[component]
pub fn DevelopmentView(slug: String) -> Element {
    let ctx = use_context::<AppContext>();
    let auth = use_auth();
    let progress = ctx.progress();
    let mut state = use_signal(ProgressViewState::default);

    let slug_for_resource = slug.clone();
    let loaded = use_resource(move || {
        let progress = progress.clone();
        let auth = auth.current();
        let slug = slug_for_resource.clone();
        async move {
            state.write().begin_load();
            match progress.load_sport_progress(&auth, &slug).await {
                Ok((sport, view)) => {
                    state.write().on_loaded(Ok(view));
                    Some(sport.name().to_owned())
                }
                Err(err) => {
                    state.write().on_loaded(Err(err));
                    None
                }
            }
        }
    });

    let sport_name = loaded.read().as_ref().cloned().flatten();
    let title = sport_name
        .as_deref()
        .map_or_else(|| "Desenvolvimento".to_owned(), |name| format!("Desenvolvimento em {name}"));
    let fallback = ProgressView::zeroed(ctx.progress().catalog().skills_for(&slug));

    rsx! {
        div { class: "page",
            Link { class: "back-link", to: Route::SportMenu { slug: slug.clone() }, "← Voltar" }
            h2 { "{title}" }

            match state() {
                ProgressViewState::Loading => rsx! {
                    p { "Carregando..." }
                },
                ProgressViewState::Empty => rsx! {
                    p { "Nenhuma habilidade para acompanhar neste esporte." }
                },
                ProgressViewState::Error(notice) => rsx! {
                    NoticeBanner { notice }
                    ProgressPanel { view: fallback }
                },
                ProgressViewState::Ready(view) => rsx! {
                    ProgressPanel { view }
                },
            }
        }
    }
}

#[component]
fn ProgressPanel(view: ProgressView) -> Element {
    let overall = overall_percentage(&view);
    let chart = map_radar_chart(&view);
    let cards = map_progress_cards(&view);

    rsx! {
        p { class: "overall", "Progresso geral: {overall}%" }
        RadarChart { chart }
        div { class: "progress-cards",
            for card in cards {
                ProgressCard { key: "{card.skill_name}", card }
            }
        }
        p { class: "hint", "Cada vídeo assistido soma 5% na habilidade, até 100%." }
    }
}

#[component]
fn RadarChart(chart: RadarChartVm) -> Element {
    let view_box = chart.view_box();
    let center = chart.center;

    rsx! {
        svg { class: "radar", view_box, width: "{chart.size}", height: "{chart.size}",
            for ring in chart.rings.iter() {
                polygon { class: "radar-ring", points: "{ring}" }
            }
            for axis in chart.axes.iter() {
                line {
                    class: "radar-axis",
                    x1: "{center}",
                    y1: "{center}",
                    x2: format!("{:.1}", axis.x),
                    y2: format!("{:.1}", axis.y),
                }
                text {
                    class: "radar-label",
                    x: format!("{:.1}", axis.label_x),
                    y: format!("{:.1}", axis.label_y),
                    text_anchor: axis.anchor,
                    dominant_baseline: "middle",
                    "{axis.label}"
                }
            }
            polygon { class: "radar-area", points: "{chart.area}" }
        }
    }
}

#[component]
fn ProgressCard(card: SkillCardVm) -> Element {
    rsx! {
        div { class: "progress-card",
            div { class: "progress-card-header",
                span { "{card.skill_name}" }
                span { class: "progress-value", "{card.label}" }
            }
            div { class: "progress-bar",
                div { class: "progress-fill", style: "{card.bar_style}" }
            }
        }
    }
}
