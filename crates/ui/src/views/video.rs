use std::future::Future;
use std::sync::Arc;

use dioxus::prelude::*;
use dioxus_router::Link;
use services::{
    AuthContext, Completion, Notice, ProgressError, ProgressService, ProgressViewState,
    VideoDetail,
};
use typus_core::model::{VideoId, format_duration};

use crate::context::{AppContext, use_auth};
use crate::routes::Route;
use crate::views::{NoticeBanner, ViewState, view_state_from_resource};

/// Starts the write for one completion signal.
///
/// The write is spawned before this returns, so it runs to completion even if
/// the page goes away. The future yields `None` if the task itself died.
fn start_completion(
    progress: &Arc<ProgressService>,
    auth: AuthContext,
    detail: &VideoDetail,
) -> impl Future<Output = Option<Result<Completion, ProgressError>>> + 'static {
    let handle = progress.record_completion_detached(
        auth,
        detail.sport.id(),
        detail.skill.name().to_owned(),
    );
    async move {
        match handle.await {
            Ok(result) => Some(result),
            Err(err) => {
                tracing::error!(error = %err, "completion task failed");
                None
            }
        }
    }
}

#[component]
pub fn VideoView(id: VideoId) -> Element {
    let ctx = use_context::<AppContext>();
    let auth = use_auth();
    let browse = ctx.browse();
    let loader = ctx.progress();
    let mut notice = use_signal(|| None::<Notice>);
    let mut progress_state = use_signal(ProgressViewState::default);

    let resource = use_resource(move || {
        let browse = browse.clone();
        let loader = loader.clone();
        let auth = auth.current();
        async move {
            progress_state.write().begin_load();
            let detail = browse
                .video_detail(&auth, id)
                .await
                .map_err(|err| Notice::from_browse_error(&err))?;
            let loaded = loader
                .load_sport_progress(&auth, detail.sport.slug().as_str())
                .await
                .map(|(_, view)| view);
            progress_state.write().on_loaded(loaded);
            Ok::<_, Notice>(detail)
        }
    });

    let complete = {
        let progress = ctx.progress();
        use_callback(move |detail: VideoDetail| {
            let skill_name = detail.skill.name().to_owned();
            let write = start_completion(&progress, auth.current(), &detail);
            spawn(async move {
                let Some(result) = write.await else {
                    notice.set(Some(Notice::destructive(
                        "Erro",
                        "Não foi possível registrar o treino.",
                    )));
                    return;
                };
                let failure = progress_state.write().on_recorded(&skill_name, result);
                notice.set(Some(failure.unwrap_or_else(|| {
                    Notice::info(
                        "Treino concluído!",
                        format!("Seu progresso em {skill_name} foi atualizado."),
                    )
                })));
            });
        })
    };

    rsx! {
        div { class: "page",
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
                ViewState::Ready(detail) => rsx! {
                    VideoPlayer { detail, progress: progress_state(), on_complete: complete }
                },
            }
        }
    }
}

#[component]
fn VideoPlayer(
    detail: VideoDetail,
    progress: ProgressViewState,
    on_complete: Callback<VideoDetail>,
) -> Element {
    let slug = detail.sport.slug().as_str().to_owned();
    let src = detail.video.video_url().to_string();
    let duration = format_duration(detail.video.duration_secs());
    let skill_percentage = progress
        .view()
        .and_then(|view| view.percentage_of(detail.skill.name()));
    let on_ended = detail.clone();
    let on_click = detail.clone();

    rsx! {
        Link { class: "back-link", to: Route::Skills { slug }, "← {detail.sport.name()}" }
        h2 { "{detail.video.title()}" }
        p { class: "video-meta", "{detail.skill.name()} · {duration}" }
        video {
            class: "player",
            src,
            controls: true,
            onended: move |_| on_complete.call(on_ended.clone()),
        }
        if let Some(description) = detail.video.description() {
            p { class: "video-description", "{description}" }
        }
        if let Some(percentage) = skill_percentage {
            p { class: "video-progress", "Seu progresso em {detail.skill.name()}: {percentage}%" }
        }
        button {
            class: "btn btn-primary",
            onclick: move |_| on_complete.call(on_click.clone()),
            "Marcar como concluído"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::test_harness::SeededApp;

    #[tokio::test(flavor = "current_thread")]
    async fn back_to_back_signals_each_record() {
        let app = SeededApp::new().await;
        let auth = app.sign_in().await;
        let futebol = app
            .storage
            .sports
            .find_sport_by_slug("futebol")
            .await
            .unwrap()
            .unwrap();
        let skills = app.storage.skills.list_skills(futebol.id()).await.unwrap();
        let chute = skills.iter().find(|s| s.name() == "Chute").unwrap();
        let video_id = app
            .storage
            .videos
            .first_video(chute.id())
            .await
            .unwrap()
            .expect("seeded video");
        let detail = app
            .services
            .browse()
            .video_detail(&auth, video_id)
            .await
            .unwrap();
        let progress = app.services.progress();

        // `ended` and a button click arriving before the first write finishes.
        let ended = start_completion(&progress, auth.clone(), &detail);
        let clicked = start_completion(&progress, auth.clone(), &detail);
        let mut counts = [
            ended.await.unwrap().unwrap().videos_watched,
            clicked.await.unwrap().unwrap().videos_watched,
        ];
        counts.sort_unstable();
        assert_eq!(counts, [1, 2]);

        let (_, view) = progress.load_sport_progress(&auth, "futebol").await.unwrap();
        assert_eq!(view.percentage_of("Chute"), Some(10));
    }
}
