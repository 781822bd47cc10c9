use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable, use_navigator};
use services::AuthContext;
use typus_core::model::VideoId;

use crate::context::{AppContext, use_auth};
use crate::views::{
    AuthView, DashboardView, DevelopmentView, SkillsView, SportMenuView, TrainersView, VideoView,
};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[route("/auth", AuthView)] Auth {},
    #[layout(Layout)]
        #[route("/", DashboardView)] Dashboard {},
        #[route("/sports/:slug", SportMenuView)] SportMenu { slug: String },
        #[route("/sports/:slug/skills", SkillsView)] Skills { slug: String },
        #[route("/sports/:slug/development", DevelopmentView)] Development { slug: String },
        #[route("/sports/:slug/trainers", TrainersView)] Trainers { slug: String },
        #[route("/video/:id", VideoView)] Video { id: VideoId },
}

/// Signed-in shell. Anonymous visitors are sent to the sign-in page.
#[component]
fn Layout() -> Element {
    let auth = use_auth();

    if !auth.current().is_authenticated() {
        return rsx! { RedirectToAuth {} };
    }

    rsx! {
        div { class: "app",
            Header {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn RedirectToAuth() -> Element {
    let navigator = use_navigator();
    use_effect(move || {
        navigator.replace(Route::Auth {});
    });

    rsx! {
        div { class: "page",
            p { "Faça login para continuar." }
            Link { to: Route::Auth {}, "Entrar" }
        }
    }
}

#[component]
fn Header() -> Element {
    let ctx = use_context::<AppContext>();
    let mut auth = use_auth();
    let navigator = use_navigator();
    let name = auth
        .current()
        .session()
        .map(|s| s.full_name.clone().unwrap_or_else(|| s.email.clone()))
        .unwrap_or_default();

    let sign_out = move |_| {
        let identity = ctx.identity();
        let current = auth.current();
        spawn(async move {
            if let Some(session) = current.session() {
                identity.sign_out(&session.token).await;
            }
            auth.set(AuthContext::Anonymous);
            navigator.replace(Route::Auth {});
        });
    };

    rsx! {
        header { class: "topbar",
            Link { class: "brand", to: Route::Dashboard {}, "Typus" }
            div { class: "topbar-user",
                span { "{name}" }
                button { class: "btn btn-link", onclick: sign_out, "Sair" }
            }
        }
    }
}
