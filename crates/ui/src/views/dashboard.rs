use dioxus::prelude::*;
use dioxus_router::Link;
use services::Notice;
use typus_core::model::Sport;

use crate::context::{AppContext, use_auth};
use crate::routes::Route;
use crate::views::{NoticeBanner, ViewState, view_state_from_resource};

#[component]
pub fn DashboardView() -> Element {
    let ctx = use_context::<AppContext>();
    let auth = use_auth();
    let browse = ctx.browse();

    let resource = use_resource(move || {
        let browse = browse.clone();
        let auth = auth.current();
        async move {
            browse
                .list_sports(&auth)
                .await
                .map_err(|err| Notice::from_browse_error(&err))
        }
    });

    let state = view_state_from_resource(resource);
    let greeting = auth
        .current()
        .session()
        .and_then(|s| s.full_name.clone())
        .map_or_else(|| "Olá!".to_owned(), |name| format!("Olá, {name}!"));

    rsx! {
        div { class: "page",
            h2 { "{greeting}" }
            p { class: "subtitle", "Escolha um esporte para treinar" }

            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Carregando..." }
                },
                ViewState::Ready(sports) => rsx! {
                    if sports.is_empty() {
                        p { "Nenhum esporte cadastrado." }
                    } else {
                        div { class: "sport-grid",
                            for sport in sports {
                                SportCard { key: "{sport.id()}", sport }
                            }
                        }
                    }
                },
                ViewState::Error(notice) => rsx! {
                    NoticeBanner { notice }
                },
            }
        }
    }
}

#[component]
fn SportCard(sport: Sport) -> Element {
    let slug = sport.slug().as_str().to_owned();
    let image = sport.image_url().map(|url| url.to_string());

    rsx! {
        Link { class: "sport-card", to: Route::SportMenu { slug },
            if let Some(src) = image {
                img { src, alt: "{sport.name()}" }
            }
            h3 { "{sport.name()}" }
            if let Some(description) = sport.description() {
                p { "{description}" }
            }
        }
    }
}
