use services::AuthContext;

use super::test_harness::{SeededApp, ViewKind};

#[tokio::test(flavor = "current_thread")]
async fn dashboard_view_smoke_lists_sports() {
    let app = SeededApp::new().await;
    let auth = app.sign_in().await;
    let mut harness = app.harness(ViewKind::Dashboard, auth);

    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Olá, Atleta Teste!"), "missing greeting in {html}");
    assert!(html.contains("Basquete"), "missing sport in {html}");
    assert!(html.contains("Surf"), "missing sport in {html}");
    assert!(html.contains("/sports/futebol"), "missing sport link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_view_smoke_anonymous_sees_session_notice() {
    let app = SeededApp::new().await;
    let mut harness = app.harness(ViewKind::Dashboard, AuthContext::Anonymous);

    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Sessão expirada"), "missing notice in {html}");
    assert!(!html.contains("Basquete"), "catalog leaked in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn sport_menu_view_smoke_links_three_sections() {
    let app = SeededApp::new().await;
    let auth = app.sign_in().await;
    let mut harness = app.harness(ViewKind::SportMenu("tenis".into()), auth);

    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("/sports/tenis/trainers"), "missing trainers link in {html}");
    assert!(html.contains("/sports/tenis/skills"), "missing skills link in {html}");
    assert!(html.contains("/sports/tenis/development"), "missing development link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn skills_view_smoke_shows_video_counts() {
    let app = SeededApp::new().await;
    let auth = app.sign_in().await;
    let mut harness = app.harness(ViewKind::Skills("surf".into()), auth);

    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Treinos de Surf"), "missing heading in {html}");
    assert!(html.contains("1 vídeo"), "missing count in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn video_view_smoke_renders_player_and_duration() {
    let app = SeededApp::new().await;
    let auth = app.sign_in().await;
    let surf = app
        .storage
        .sports
        .find_sport_by_slug("surf")
        .await
        .unwrap()
        .unwrap();
    let skills = app.storage.skills.list_skills(surf.id()).await.unwrap();
    let video_id = app
        .storage
        .videos
        .first_video(skills[0].id())
        .await
        .unwrap()
        .expect("seeded video");
    let mut harness = app.harness(ViewKind::Video(video_id), auth);

    harness.settle().await;
    let html = harness.render();

    let title = format!("{}: fundamentos", skills[0].name());
    assert!(html.contains(&title), "missing {title} in {html}");
    assert!(html.contains("<video"), "missing player in {html}");
    assert!(html.contains("3:00"), "missing duration in {html}");
    assert!(html.contains("Marcar como concluído"), "missing button in {html}");
    let progress = format!("Seu progresso em {}: 0%", skills[0].name());
    assert!(html.contains(&progress), "missing {progress} in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn development_view_smoke_renders_chart_and_cards() {
    let app = SeededApp::new().await;
    let auth = app.sign_in().await;
    let futebol = app
        .storage
        .sports
        .find_sport_by_slug("futebol")
        .await
        .unwrap()
        .unwrap();
    let progress = app.services.progress();
    for _ in 0..2 {
        progress
            .record_completion(&auth, futebol.id(), "Chute")
            .await
            .unwrap();
    }
    let mut harness = app.harness(ViewKind::Development("futebol".into()), auth);

    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Desenvolvimento em Futebol"), "missing title in {html}");
    assert!(html.contains("radar"), "missing chart in {html}");
    assert!(html.contains("Impulsão"), "missing catalog skill in {html}");
    assert!(html.contains("10%"), "missing percentage in {html}");
    assert!(html.contains("Progresso geral: 1%"), "missing overall in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn development_view_smoke_unknown_sport_shows_notice() {
    let app = SeededApp::new().await;
    let auth = app.sign_in().await;
    let mut harness = app.harness(ViewKind::Development("curling".into()), auth);

    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Esporte não encontrado"), "missing notice in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn development_view_smoke_signed_out_shows_zeroed_chart() {
    let app = SeededApp::new().await;
    let auth = app.sign_in().await;
    app.services
        .identity()
        .sign_out(&auth.session().unwrap().token)
        .await;
    let mut harness = app.harness(ViewKind::Development("futebol".into()), auth);

    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Sessão expirada"), "missing notice in {html}");
    assert!(html.contains("Progresso geral: 0%"), "missing fallback in {html}");
    assert!(html.contains("Impulsão"), "missing catalog skill in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn trainers_view_smoke_formats_prices() {
    let app = SeededApp::new().await;
    let auth = app.sign_in().await;
    let mut harness = app.harness(ViewKind::Trainers("tenis".into()), auth);

    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Ana Souza"), "missing trainer in {html}");
    assert!(html.contains("R$ 80,00/hora"), "missing price in {html}");
    assert!(html.contains("R$ 150,00/hora"), "missing price in {html}");
    assert!(html.contains("12 anos de experiência"), "missing experience in {html}");
    let ana = html.find("Ana Souza").unwrap();
    let carlos = html.find("Carlos Lima").unwrap();
    assert!(ana < carlos, "cheapest trainer should come first");
}
