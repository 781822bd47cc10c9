use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};
use services::{Notice, SkillWithVideos};
use typus_core::model::SkillId;

use crate::context::{AppContext, use_auth};
use crate::routes::Route;
use crate::views::{NoticeBanner, ViewState, view_state_from_resource};

#[component]
pub fn SkillsView(slug: String) -> Element {
    let ctx = use_context::<AppContext>();
    let auth = use_auth();
    let navigator = use_navigator();
    let browse = ctx.browse();
    let mut notice = use_signal(|| None::<Notice>);

    let slug_for_resource = slug.clone();
    let resource = use_resource(move || {
        let browse = browse.clone();
        let auth = auth.current();
        let slug = slug_for_resource.clone();
        async move {
            browse
                .skills_with_video_counts(&auth, &slug)
                .await
                .map_err(|err| Notice::from_browse_error(&err))
        }
    });

    let open_skill = {
        let browse = ctx.browse();
        use_callback(move |skill_id: SkillId| {
            let browse = browse.clone();
            let auth = auth.current();
            spawn(async move {
                match browse.first_video_for_skill(&auth, skill_id).await {
                    Ok(Some(id)) => {
                        notice.set(None);
                        navigator.push(Route::Video { id });
                    }
                    Ok(None) => notice.set(Some(Notice::no_videos())),
                    Err(err) => notice.set(Some(Notice::from_browse_error(&err))),
                }
            });
        })
    };

    rsx! {
        div { class: "page",
            Link { class: "back-link", to: Route::SportMenu { slug: slug.clone() }, "← Voltar" }

            if let Some(current) = notice() {
                NoticeBanner { notice: current }
            }

            match view_state_from_resource(resource) {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Carregando..." }
                },
                ViewState::Error(err) => rsx! {
                    NoticeBanner { notice: err }
                },
                ViewState::Ready(data) => rsx! {
                    h2 { "Treinos de {data.sport.name()}" }
                    if data.skills.is_empty() {
                        p { "Nenhuma habilidade cadastrada." }
                    } else {
                        ul { class: "skill-list",
                            for item in data.skills {
                                SkillRow { key: "{item.skill.id()}", item, on_open: open_skill }
                            }
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn SkillRow(item: SkillWithVideos, on_open: Callback<SkillId>) -> Element {
    let skill_id = item.skill.id();
    let count_label = match item.video_count {
        1 => "1 vídeo".to_owned(),
        n => format!("{n} vídeos"),
    };

    rsx! {
        li {
            button {
                class: "skill-row",
                onclick: move |_| on_open.call(skill_id),
                span { class: "skill-name", "{item.skill.name()}" }
                span { class: "skill-count", "{count_label}" }
            }
            if let Some(description) = item.skill.description() {
                p { class: "skill-description", "{description}" }
            }
        }
    }
}
