use dioxus::prelude::*;
use dioxus_router::Link;
use services::Notice;

use crate::context::{AppContext, use_auth};
use crate::routes::Route;
use crate::views::{NoticeBanner, ViewState, view_state_from_resource};

#[component]
pub fn SportMenuView(slug: String) -> Element {
    let ctx = use_context::<AppContext>();
    let auth = use_auth();
    let browse = ctx.browse();

    let slug_for_resource = slug.clone();
    let resource = use_resource(move || {
        let browse = browse.clone();
        let auth = auth.current();
        let slug = slug_for_resource.clone();
        async move {
            browse
                .sport_by_slug(&auth, &slug)
                .await
                .map_err(|err| Notice::from_browse_error(&err))
        }
    });

    match view_state_from_resource(resource) {
        ViewState::Idle | ViewState::Loading => rsx! {
            div { class: "page", p { "Carregando..." } }
        },
        ViewState::Error(notice) => rsx! {
            div { class: "page",
                NoticeBanner { notice }
                Link { to: Route::Dashboard {}, "Voltar" }
            }
        },
        ViewState::Ready(sport) => rsx! {
            div { class: "page",
                Link { class: "back-link", to: Route::Dashboard {}, "← Esportes" }
                h2 { "{sport.name()}" }
                div { class: "menu-grid",
                    Link { class: "menu-tile", to: Route::Trainers { slug: slug.clone() },
                        h3 { "Treinadores" }
                        p { "Encontre um treinador para aulas particulares" }
                    }
                    Link { class: "menu-tile", to: Route::Skills { slug: slug.clone() },
                        h3 { "Treinos" }
                        p { "Vídeos por habilidade" }
                    }
                    Link { class: "menu-tile", to: Route::Development { slug: slug.clone() },
                        h3 { "Desenvolvimento" }
                        p { "Acompanhe seu progresso" }
                    }
                }
            }
        },
    }
}
