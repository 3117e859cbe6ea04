use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use chrono::{Duration, NaiveDate};
use folio_config::Config;
use folio_engine::Site;
use folio_engine::media::{FileSystemStorage, MediaStorage};
use folio_engine::models::{BlogPostDraft, PortfolioItem};
use folio_server::{AppState, router};
use pretty_assertions::assert_eq;
use relative_path::RelativePath;
use serde_json::json;
use tempfile::TempDir;
use tower::ServiceExt;

struct Harness {
    dir: TempDir,
    app: Router,
    state: AppState,
}

fn config(dir: &TempDir, admin: bool) -> Config {
    let mut config = Config::default();
    config.content_path = dir.path().join("content.json");
    config.media.root = dir.path().join("media");
    config.site.posts_per_page = 3;
    config.admin.enabled = admin;
    config
}

fn harness(site: Site, admin: bool, with_storage: bool) -> Harness {
    let dir = TempDir::new().unwrap();
    let config = config(&dir, admin);
    serve(dir, config, site, with_storage)
}

fn serve(dir: TempDir, config: Config, site: Site, with_storage: bool) -> Harness {
    let storage: Option<Arc<dyn MediaStorage>> = if with_storage {
        Some(Arc::new(
            FileSystemStorage::new(&config.media.root, &config.media.base_url).unwrap(),
        ))
    } else {
        None
    };
    let state = AppState::new(config, site, storage);
    Harness {
        dir,
        app: router(state.clone()),
        state,
    }
}

fn post(n: i64) -> BlogPostDraft {
    let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap() + Duration::days(n);
    serde_json::from_value(json!({
        "slug": format!("post-{n}"),
        "title": format!("Post {n}"),
        "date": date,
        "tags": ["Rust"],
        "body": [{"type": "paragraph", "value": format!("Body of post {n}.")}],
        "live": true
    }))
    .unwrap()
}

fn site_with_posts(count: i64) -> Site {
    let mut site = Site::new();
    for n in 1..=count {
        site.save_blog_post(post(n)).unwrap();
    }
    site
}

async fn send(app: &Router, method: Method, uri: &str, body: Body) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    send(app, Method::GET, uri, Body::empty()).await
}

#[tokio::test]
async fn home_lists_latest_posts() {
    let h = harness(site_with_posts(4), false, true);

    let (status, html) = get(&h.app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("href=\"/blog/post-4/\""));
    assert!(html.contains("href=\"/blog/post-2/\""));
    assert!(!html.contains("href=\"/blog/post-1/\""));
}

#[tokio::test]
async fn unknown_post_is_404_page() {
    let h = harness(site_with_posts(1), false, true);

    let (status, html) = get(&h.app, "/blog/nope/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("Page not found"));

    let (status, _) = get(&h.app, "/no/such/route").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blog_index_paginates() {
    let h = harness(site_with_posts(7), false, true);

    let (status, html) = get(&h.app, "/blog/?page=2").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Page 2 of 3"));
    assert!(html.contains("href=\"/blog/post-4/\""));
    assert!(!html.contains("href=\"/blog/post-7/\""));

    // Out of range falls back to the last page.
    let (_, html) = get(&h.app, "/blog/?page=99").await;
    assert!(html.contains("Page 3 of 3"));
}

#[tokio::test]
async fn empty_portfolio_tag_shows_everything() {
    let mut site = Site::new();
    for (slug, tag) in [("cli-tool", "CLI"), ("web-app", "Web")] {
        site.save_project(
            serde_json::from_value(json!({
                "slug": slug, "title": slug, "tags": [tag], "body": [], "live": true
            }))
            .unwrap(),
        )
        .unwrap();
    }
    let h = harness(site, false, true);

    let (status, html) = get(&h.app, "/portfolio/?tag=").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("href=\"/portfolio/cli-tool/\""));
    assert!(html.contains("href=\"/portfolio/web-app/\""));

    let (_, html) = get(&h.app, "/portfolio/tag/web/").await;
    assert!(!html.contains("href=\"/portfolio/cli-tool/\""));
    assert!(html.contains("href=\"/portfolio/web-app/\""));
}

#[tokio::test]
async fn invalid_gallery_is_rejected_with_its_path() {
    let h = harness(Site::new(), true, true);
    let draft = json!({
        "title": "Trip",
        "date": "2024-05-01",
        "body": [{"type": "gallery", "value": {"images": [1]}}],
        "live": true
    });

    let (status, text) = send(
        &h.app,
        Method::PUT,
        "/cms/blog/trip",
        Body::from(draft.to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(text.starts_with("body[0].value.images"));
    assert!(h.state.site.read().await.posts().is_empty());
    assert!(!h.dir.path().join("content.json").exists());
}

#[tokio::test]
async fn saved_post_is_written_back_and_served() {
    let h = harness(Site::new(), true, true);
    let draft = json!({
        "title": "Hello",
        "date": "2024-05-01",
        "body": [{"type": "paragraph", "value": "First words."}],
        "live": true
    });

    let (status, _) = send(
        &h.app,
        Method::PUT,
        "/cms/blog/hello",
        Body::from(draft.to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, html) = get(&h.app, "/blog/hello/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("First words."));

    let reloaded = folio_engine::io::load_site(&h.dir.path().join("content.json")).unwrap();
    assert!(reloaded.live_post("hello").is_some());
}

#[tokio::test]
async fn admin_routes_absent_when_disabled() {
    let h = harness(Site::new(), false, true);

    let (status, _) = send(&h.app, Method::PUT, "/cms/blog/x", Body::from("{}")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn media_actions_need_storage() {
    let h = harness(Site::new(), true, false);

    let (status, _) = send(
        &h.app,
        Method::POST,
        "/cms/documents?filename=cv.pdf",
        Body::from("%PDF-1.4"),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    // Pages still render.
    let (status, _) = get(&h.app, "/").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn deleting_portfolio_item_removes_its_files() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir, true);
    let storage = FileSystemStorage::new(&config.media.root, &config.media.base_url).unwrap();
    let image = RelativePath::new("portfolio/shot.png");
    storage.save(image, b"png").unwrap();

    let mut site = Site::new();
    let item: PortfolioItem = serde_json::from_value(json!({
        "title": "Shot", "slug": "shot", "image": "portfolio/shot.png"
    }))
    .unwrap();
    site.save_portfolio_item(item).unwrap();

    let state = AppState::new(config, site, Some(Arc::new(storage)));
    let app = router(state);

    let (status, html) = get(&app, "/portfolio/shot/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("/media/portfolio/shot.png"));

    let (status, _) = send(&app, Method::DELETE, "/admin/portfolio-items/shot", Body::empty()).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(!dir.path().join("media/portfolio/shot.png").exists());

    let (status, _) = get(&app, "/portfolio/shot/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn failed_write_leaves_served_site_unchanged() {
    let dir = TempDir::new().unwrap();
    let mut config = config(&dir, true);
    std::fs::write(dir.path().join("blocker"), "not a directory").unwrap();
    config.content_path = dir.path().join("blocker/content.json");
    let h = serve(dir, config, site_with_posts(1), true);
    let draft = json!({
        "title": "Ghost",
        "date": "2024-05-01",
        "body": [],
        "live": true
    });

    let (status, _) = send(
        &h.app,
        Method::PUT,
        "/cms/blog/ghost",
        Body::from(draft.to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = get(&h.app, "/blog/ghost/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&h.app, Method::DELETE, "/cms/blog/post-1", Body::empty()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let (status, _) = get(&h.app, "/blog/post-1/").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn failed_delete_keeps_item_files() {
    let dir = TempDir::new().unwrap();
    let mut config = config(&dir, true);
    let storage = FileSystemStorage::new(&config.media.root, &config.media.base_url).unwrap();
    storage.save(RelativePath::new("portfolio/shot.png"), b"png").unwrap();
    let mut site = Site::new();
    let item: PortfolioItem = serde_json::from_value(json!({
        "title": "Shot", "slug": "shot", "image": "portfolio/shot.png"
    }))
    .unwrap();
    site.save_portfolio_item(item).unwrap();
    std::fs::write(dir.path().join("blocker"), "").unwrap();
    config.content_path = dir.path().join("blocker/content.json");
    let h = serve(dir, config, site, true);

    let (status, _) = send(&h.app, Method::DELETE, "/admin/portfolio-items/shot", Body::empty()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(h.dir.path().join("media/portfolio/shot.png").exists());
    let (status, _) = get(&h.app, "/portfolio/shot/").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn resume_entries_are_managed_under_admin() {
    let h = harness(Site::new(), true, true);
    let experience = json!({
        "role": "Data <Engineer>",
        "company": "Acme",
        "start_year": 2021,
        "bullets": [{"text": "Built pipelines", "order": 1}, {"text": "Led team", "order": 0}]
    });

    let (status, body) = send(
        &h.app,
        Method::PUT,
        "/admin/experience",
        Body::from(experience.to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"id":1}"#);

    let (_, html) = get(&h.app, "/resume/").await;
    assert!(html.contains("Data &lt;Engineer&gt;"));
    assert!(html.find("Led team").unwrap() < html.find("Built pipelines").unwrap());
    assert!(html.contains("2021 – Present"));

    let education = json!({"title": "BSc", "institution": "Uni", "start_year": 2015, "end_year": 2010});
    let (status, text) = send(
        &h.app,
        Method::PUT,
        "/admin/education",
        Body::from(education.to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(text.starts_with("end_year"));

    let skill = json!({"name": "SQL", "description": "Window *functions*"});
    let (status, _) = send(&h.app, Method::PUT, "/admin/skills", Body::from(skill.to_string())).await;
    assert_eq!(status, StatusCode::OK);
    let (_, html) = get(&h.app, "/about/").await;
    assert!(html.contains("<em>functions</em>"));

    let (status, _) = send(&h.app, Method::DELETE, "/admin/experience/1", Body::empty()).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, html) = get(&h.app, "/resume/").await;
    assert!(!html.contains("Led team"));
    let (status, _) = send(&h.app, Method::DELETE, "/admin/experience/1", Body::empty()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let reloaded = folio_engine::io::load_site(&h.dir.path().join("content.json")).unwrap();
    assert!(reloaded.experience().is_empty());
    assert_eq!(reloaded.active_skills().len(), 1);
}

#[tokio::test]
async fn category_filter_narrows_legacy_items() {
    let h = harness(Site::new(), true, true);
    for name in ["Print", "Web"] {
        let (status, _) = send(
            &h.app,
            Method::PUT,
            "/admin/portfolio-categories",
            Body::from(json!({"name": name}).to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    for (slug, category) in [("poster", "print"), ("shop", "web")] {
        let item = json!({
            "title": slug, "image": format!("portfolio/{slug}.png"), "categories": [category]
        });
        let (status, _) = send(
            &h.app,
            Method::PUT,
            &format!("/admin/portfolio-items/{slug}"),
            Body::from(item.to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, listed) = get(&h.app, "/admin/portfolio-categories").await;
    let listed: serde_json::Value = serde_json::from_str(&listed).unwrap();
    assert_eq!(listed[0]["slug"], "print");
    assert_eq!(listed[1]["slug"], "web");

    let (_, html) = get(&h.app, "/portfolio/").await;
    assert!(html.contains("href=\"/portfolio/?category=print\""));
    assert!(html.contains("href=\"/portfolio/poster/\""));
    assert!(html.contains("href=\"/portfolio/shop/\""));

    let (_, html) = get(&h.app, "/portfolio/?category=print").await;
    assert!(html.contains("href=\"/portfolio/poster/\""));
    assert!(!html.contains("href=\"/portfolio/shop/\""));

    let (status, _) = send(
        &h.app,
        Method::DELETE,
        "/admin/portfolio-categories/1",
        Body::empty(),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, html) = get(&h.app, "/portfolio/?category=print").await;
    assert!(!html.contains("href=\"/portfolio/poster/\""));
}

#[tokio::test]
async fn media_files_are_served_from_storage() {
    let h = harness(Site::new(), false, true);
    let storage = h.state.storage.clone().unwrap();
    storage.save(RelativePath::new("documents/cv.pdf"), b"%PDF-1.4").unwrap();

    let request = Request::builder()
        .uri("/media/documents/cv.pdf")
        .body(Body::empty())
        .unwrap();
    let response = h.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");

    let (status, _) = get(&h.app, "/media/documents/missing.pdf").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = get(&h.app, "/media/../content.json").await;
    assert_ne!(status, StatusCode::OK);

    let bare = harness(Site::new(), false, false);
    let (status, _) = get(&bare.app, "/media/documents/cv.pdf").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
