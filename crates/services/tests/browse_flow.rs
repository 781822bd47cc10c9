use std::sync::Arc;

use services::{
    AppServices, AuthContext, BrowseError, ProgressError, SignUp, UploadError, UploadVideoRequest,
};
use storage::media::InMemoryMediaStore;
use storage::repository::{NewVideoRecord, Storage};
use storage::seed::{seed_catalog, seed_demo_content};
use typus_core::SkillCatalog;
use typus_core::time::fixed_clock;

async fn seeded_services() -> (AppServices, Storage, InMemoryMediaStore) {
    let storage = Storage::in_memory();
    seed_catalog(&storage, &SkillCatalog::builtin()).await.unwrap();
    let media = InMemoryMediaStore::default();
    let services = AppServices::new(&storage, Arc::new(media.clone()), fixed_clock());
    (services, storage, media)
}

async fn sign_in(services: &AppServices) -> AuthContext {
    let identity = services.identity();
    identity
        .sign_up(SignUp {
            email: "lucas@example.com".into(),
            password: "bola123".into(),
            full_name: "Lucas".into(),
        })
        .await
        .unwrap();
    identity
        .sign_in("lucas@example.com", "bola123")
        .await
        .unwrap()
        .into()
}

fn mp4_request(skill_id: typus_core::model::SkillId) -> UploadVideoRequest {
    UploadVideoRequest {
        skill_id,
        title: "Remada forte".into(),
        description: None,
        file_name: "remada.mp4".into(),
        content_type: "video/mp4".into(),
        bytes: vec![0, 0, 0, 24, b'f', b't', b'y', b'p'],
        duration_secs: Some(42),
    }
}

#[tokio::test]
async fn browsing_requires_sign_in() {
    let (services, _, _) = seeded_services().await;
    let err = services
        .browse()
        .list_sports(&AuthContext::Anonymous)
        .await
        .unwrap_err();
    assert!(matches!(err, BrowseError::Unauthenticated(_)));
}

#[tokio::test]
async fn signed_out_context_is_rejected_everywhere() {
    let (services, storage, media) = seeded_services().await;
    let auth = sign_in(&services).await;
    let user_id = auth.session().unwrap().user_id;
    let futebol = storage
        .sports
        .find_sport_by_slug("futebol")
        .await
        .unwrap()
        .unwrap();
    let skill_id = storage.skills.list_skills(futebol.id()).await.unwrap()[0].id();

    services
        .identity()
        .sign_out(&auth.session().unwrap().token)
        .await;

    let err = services
        .progress()
        .record_completion(&auth, futebol.id(), "Chute")
        .await
        .unwrap_err();
    assert!(matches!(err, ProgressError::Unauthenticated(_)));
    let err = services.browse().list_sports(&auth).await.unwrap_err();
    assert!(matches!(err, BrowseError::Unauthenticated(_)));
    let err = services
        .upload()
        .upload_video(&auth, mp4_request(skill_id))
        .await
        .unwrap_err();
    assert!(matches!(err, UploadError::Unauthenticated(_)));

    assert!(storage.progress.list_progress(user_id, futebol.id()).await.unwrap().is_empty());
    assert!(media.is_empty());
}

#[tokio::test]
async fn dashboard_lists_sports_by_name() {
    let (services, _, _) = seeded_services().await;
    let auth = sign_in(&services).await;

    let sports = services.browse().list_sports(&auth).await.unwrap();

    assert_eq!(sports.len(), 12);
    assert_eq!(sports[0].name(), "Basquete");
    let names: Vec<_> = sports.iter().map(|s| s.name()).collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);
}

#[tokio::test]
async fn skills_screen_counts_videos_and_opens_first() {
    let (services, storage, _) = seeded_services().await;
    seed_demo_content(&storage).await.unwrap();
    let auth = sign_in(&services).await;
    let browse = services.browse();

    let surf = browse.skills_with_video_counts(&auth, "surf").await.unwrap();
    assert_eq!(surf.sport.name(), "Surf");
    assert_eq!(surf.skills.len(), 7);
    assert!(surf.skills.iter().all(|s| s.video_count == 1));

    let skill = &surf.skills[0].skill;
    let video_id = browse
        .first_video_for_skill(&auth, skill.id())
        .await
        .unwrap()
        .expect("seeded video");
    let detail = browse.video_detail(&auth, video_id).await.unwrap();
    assert_eq!(detail.skill.id(), skill.id());
    assert_eq!(detail.sport.slug().as_str(), "surf");
}

#[tokio::test]
async fn skill_without_videos_has_no_first_video() {
    let (services, _, _) = seeded_services().await;
    let auth = sign_in(&services).await;
    let browse = services.browse();
    let skills = browse.skills_with_video_counts(&auth, "box").await.unwrap();

    let first = browse
        .first_video_for_skill(&auth, skills.skills[0].skill.id())
        .await
        .unwrap();
    assert!(first.is_none());
}

#[tokio::test]
async fn unknown_slug_is_not_found() {
    let (services, _, _) = seeded_services().await;
    let auth = sign_in(&services).await;
    let err = services
        .browse()
        .trainers_for_sport(&auth, "curling")
        .await
        .unwrap_err();
    assert!(matches!(err, BrowseError::NotFound));
}

#[tokio::test]
async fn trainers_are_cheapest_first() {
    let (services, storage, _) = seeded_services().await;
    seed_demo_content(&storage).await.unwrap();
    let auth = sign_in(&services).await;

    let listing = services
        .browse()
        .trainers_for_sport(&auth, "tenis")
        .await
        .unwrap();

    let rates: Vec<_> = listing.trainers.iter().map(|t| t.hourly_rate_cents).collect();
    assert_eq!(rates, vec![8_000, 15_000]);
}

#[tokio::test]
async fn upload_stores_file_and_registers_video() {
    let (services, storage, media) = seeded_services().await;
    let auth = sign_in(&services).await;
    let user_id = auth.session().unwrap().user_id;
    let surf = services
        .browse()
        .skills_with_video_counts(&auth, "surf")
        .await
        .unwrap();
    let skill_id = surf.skills[0].skill.id();

    let uploaded = services
        .upload()
        .upload_video(&auth, mp4_request(skill_id))
        .await
        .unwrap();

    assert_eq!(media.len(), 1);
    assert!(uploaded.url.path().contains(&user_id.to_string()));
    assert!(uploaded.url.path().ends_with(".mp4"));
    let video = storage.videos.get_video(uploaded.video_id).await.unwrap().unwrap();
    assert_eq!(video.title(), "Remada forte");
    assert_eq!(video.video_url(), &uploaded.url);
}

#[tokio::test]
async fn upload_rejects_non_mp4_before_touching_store() {
    let (services, _, media) = seeded_services().await;
    let auth = sign_in(&services).await;
    let surf = services
        .browse()
        .skills_with_video_counts(&auth, "surf")
        .await
        .unwrap();
    let skill_id = surf.skills[0].skill.id();

    let mut request = mp4_request(skill_id);
    request.file_name = "remada.mov".into();
    request.content_type = "video/quicktime".into();
    let err = services
        .upload()
        .upload_video(&auth, request)
        .await
        .unwrap_err();

    assert!(matches!(err, UploadError::Validation(_)));
    assert!(media.is_empty());
}

#[tokio::test]
async fn upload_for_unknown_skill_is_not_found() {
    let (services, _, media) = seeded_services().await;
    let auth = sign_in(&services).await;
    let err = services
        .upload()
        .upload_video(&auth, mp4_request(typus_core::model::SkillId::new(9_999)))
        .await
        .unwrap_err();
    assert!(matches!(err, UploadError::NotFound));
    assert!(media.is_empty());
}

#[tokio::test]
async fn completions_from_video_skill_reach_progress_view() {
    let (services, storage, _) = seeded_services().await;
    let auth = sign_in(&services).await;
    let futebol = storage
        .sports
        .find_sport_by_slug("futebol")
        .await
        .unwrap()
        .unwrap();
    let skills = storage.skills.list_skills(futebol.id()).await.unwrap();
    let chute = skills.iter().find(|s| s.name() == "Chute").unwrap();
    storage
        .videos
        .insert_video(&NewVideoRecord {
            skill_id: chute.id(),
            title: "Chute colocado".into(),
            description: None,
            video_url: "https://videos.example.com/chute.mp4".into(),
            duration_secs: None,
            uploaded_by: None,
        })
        .await
        .unwrap();

    let progress = services.progress();
    progress
        .record_completion_detached(auth.clone(), futebol.id(), chute.name().to_owned())
        .await
        .unwrap()
        .unwrap();

    let (_, view) = progress.load_sport_progress(&auth, "futebol").await.unwrap();
    assert_eq!(view.percentage_of("Chute"), Some(5));
}
