use dioxus::prelude::*;
use dioxus_router::Link;
use services::Notice;
use typus_core::model::Trainer;

use crate::context::{AppContext, use_auth};
use crate::routes::Route;
use crate::views::{NoticeBanner, ViewState, view_state_from_resource};
use crate::vm::{format_experience, format_price_cents};

#[component]
pub fn TrainersView(slug: String) -> Element {
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
                .trainers_for_sport(&auth, &slug)
                .await
                .map_err(|err| Notice::from_browse_error(&err))
        }
    });

    rsx! {
        div { class: "page",
            Link { class: "back-link", to: Route::SportMenu { slug: slug.clone() }, "← Voltar" }

            match view_state_from_resource(resource) {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Carregando..." }
                },
                ViewState::Error(notice) => rsx! {
                    NoticeBanner { notice }
                },
                ViewState::Ready(listing) => rsx! {
                    h2 { "Treinadores de {listing.sport.name()}" }
                    if listing.trainers.is_empty() {
                        p { "Nenhum treinador disponível no momento." }
                    } else {
                        div { class: "trainer-grid",
                            for trainer in listing.trainers {
                                TrainerCard { key: "{trainer.id}", trainer }
                            }
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn TrainerCard(trainer: Trainer) -> Element {
    let price = format_price_cents(trainer.hourly_rate_cents);
    let experience = format_experience(trainer.experience_years);
    let image = trainer.image_url.as_ref().map(ToString::to_string);

    rsx! {
        article { class: "trainer-card",
            if let Some(src) = image {
                img { src, alt: "{trainer.name}" }
            }
            h3 { "{trainer.name}" }
            p { class: "trainer-price", "{price}/hora" }
            if let Some(label) = experience {
                p { class: "trainer-experience", "{label}" }
            }
            p { "{trainer.description}" }
            if !trainer.specialties.is_empty() {
                ul { class: "tags",
                    for specialty in trainer.specialties.iter() {
                        li { key: "{specialty}", "{specialty}" }
                    }
                }
            }
            p { class: "trainer-contact", "Contato: {trainer.contact}" }
        }
    }
}
