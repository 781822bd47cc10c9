use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::{AppServices, AuthContext, SignUp};
use storage::media::InMemoryMediaStore;
use storage::repository::Storage;
use storage::seed::{seed_catalog, seed_demo_content};
use typus_core::SkillCatalog;
use typus_core::model::VideoId;
use typus_core::time::fixed_clock;

use crate::context::{UiApp, build_app_context, provide_auth_state};
use crate::views::{
    DashboardView, DevelopmentView, SkillsView, SportMenuView, TrainersView, VideoView,
};

#[derive(Clone, PartialEq, Eq)]
pub enum ViewKind {
    Dashboard,
    SportMenu(String),
    Skills(String),
    Development(String),
    Trainers(String),
    Video(VideoId),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<AppServices>,
    auth: AuthContext,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    provide_auth_state(props.auth.clone());
    use_context_provider(|| props.view.clone());
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Dashboard => rsx! { DashboardView {} },
        ViewKind::SportMenu(slug) => rsx! { SportMenuView { slug } },
        ViewKind::Skills(slug) => rsx! { SkillsView { slug } },
        ViewKind::Development(slug) => rsx! { DevelopmentView { slug } },
        ViewKind::Trainers(slug) => rsx! { TrainersView { slug } },
        ViewKind::Video(id) => rsx! { VideoView { id } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Rebuilds, then lets pending resources settle.
    pub async fn settle(&mut self) {
        self.rebuild();
        for _ in 0..3 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// Catalog plus demo videos and trainers, and one registered athlete.
pub struct SeededApp {
    pub services: Arc<AppServices>,
    pub storage: Storage,
}

impl SeededApp {
    pub async fn new() -> Self {
        let storage = Storage::in_memory();
        seed_catalog(&storage, &SkillCatalog::builtin())
            .await
            .expect("seed catalog");
        seed_demo_content(&storage).await.expect("seed demo content");
        let services = AppServices::new(
            &storage,
            Arc::new(InMemoryMediaStore::default()),
            fixed_clock(),
        );
        services
            .identity()
            .sign_up(SignUp {
                email: "atleta@example.com".into(),
                password: "treino123".into(),
                full_name: "Atleta Teste".into(),
            })
            .await
            .expect("sign up");
        Self {
            services: Arc::new(services),
            storage,
        }
    }

    pub async fn sign_in(&self) -> AuthContext {
        self.services
            .identity()
            .sign_in("atleta@example.com", "treino123")
            .await
            .expect("sign in")
            .into()
    }

    pub fn harness(&self, view: ViewKind, auth: AuthContext) -> ViewHarness {
        let dom = VirtualDom::new_with_props(
            ViewRouterHarness,
            ViewHarnessProps {
                app: Arc::clone(&self.services),
                auth,
                view,
            },
        );
        ViewHarness { dom }
    }
}
