use std::sync::Arc;

use brand_cms_api::auth::{issue_token, ADMIN_ROLE};
use brand_cms_api::build_app;
use brand_cms_api::config::AppConfig;
use brand_cms_api::state::AppState;
use brand_cms_core::content::{UpsertContent, UpsertTextStyle};
use brand_cms_core::events::EventBus;
use brand_cms_core::store::{ContentStore, MemoryContentStore};
use chrono::Duration;
use reqwest::StatusCode;
use serde_json::{json, Value};

const SECRET: &str = "integration-secret";

struct TestServer {
    base: String,
    store: Arc<MemoryContentStore>,
    client: reqwest::Client,
}

impl TestServer {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn admin_token(&self) -> String {
        issue_token(SECRET, "editor@brand.test", ADMIN_ROLE, Duration::minutes(5)).unwrap()
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: String::new(),
        db_max_connections: 1,
        db_min_connections: 0,
        jwt_secret: SECRET.to_string(),
        event_bus_capacity: 64,
        log_level: "debug".to_string(),
        media_base_url: "https://cdn.brand.test/media".to_string(),
    }
}

async fn spawn() -> TestServer {
    let store = Arc::new(MemoryContentStore::new());
    let state = AppState::new(store.clone(), test_config(), EventBus::new(64));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, build_app(state)).await.unwrap();
    });

    TestServer {
        base: format!("http://{addr}"),
        store,
        client: reqwest::Client::new(),
    }
}

#[tokio::test]
async fn health_and_ping() {
    let server = spawn().await;

    let res = server.client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    let res = server.client.get(server.url("/v1/ping")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_reports_unavailable_store() {
    let server = spawn().await;
    server.store.set_unavailable(true);

    let res = server.client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"]["statusCode"], 503);
}

#[tokio::test]
async fn page_content_applies_text_styles() {
    let server = spawn().await;
    server
        .store
        .upsert_content(&UpsertContent {
            page: "home".to_string(),
            section: "hero".to_string(),
            content_key: "title".to_string(),
            content_value: "Welcome".to_string(),
        })
        .await
        .unwrap();
    server
        .store
        .upsert_text_style(&UpsertTextStyle {
            page: "home".to_string(),
            section: "hero".to_string(),
            content_key: "title".to_string(),
            is_bold: true,
            is_italic: false,
            is_underline: false,
            font_size: Some("2rem".to_string()),
            font_color: None,
        })
        .await
        .unwrap();

    let res = server
        .client
        .get(server.url("/v1/pages/home/content"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["cache-control"], "no-store");

    let body: Value = res.json().await.unwrap();
    let title = &body["sections"]["hero"]["title"];
    assert_eq!(title["value"], "Welcome");
    assert_eq!(title["className"], "font-bold");
    assert_eq!(title["style"]["fontSize"], "2rem");
}

#[tokio::test]
async fn page_content_is_empty_when_store_is_down() {
    let server = spawn().await;
    server.store.set_unavailable(true);

    let res = server
        .client
        .get(server.url("/v1/pages/home/content"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["sections"], json!({}));
}

#[tokio::test]
async fn admin_routes_require_bearer_token() {
    let server = spawn().await;
    let payload = json!({ "page": "home", "section": "hero", "contentKey": "title", "contentValue": "x" });

    let res = server
        .client
        .put(server.url("/v1/admin/content"))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"]["type"], "unauthorized");

    let res = server
        .client
        .put(server.url("/v1/admin/content"))
        .bearer_auth("not-a-jwt")
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let forged = issue_token("wrong-secret", "mallory", ADMIN_ROLE, Duration::minutes(5)).unwrap();
    let res = server
        .client
        .put(server.url("/v1/admin/content"))
        .bearer_auth(forged)
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let viewer = issue_token(SECRET, "viewer", "viewer", Duration::minutes(5)).unwrap();
    let res = server
        .client
        .put(server.url("/v1/admin/content"))
        .bearer_auth(viewer)
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = server
        .client
        .put(server.url("/v1/admin/content"))
        .bearer_auth(server.admin_token())
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn block_edit_history_and_restore() {
    let server = spawn().await;
    let token = server.admin_token();

    let res = server
        .client
        .post(server.url("/v1/admin/pages/7/blocks"))
        .bearer_auth(&token)
        .json(&json!({ "type": "text", "content": "First", "settings": "{\"alignment\":\"center\"}" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let block: Value = res.json().await.unwrap();
    let block_id = block["id"].as_i64().unwrap();
    assert_eq!(block["pageId"], 7);

    for content in ["Second", "Third"] {
        let res = server
            .client
            .put(server.url(&format!("/v1/admin/blocks/{block_id}")))
            .bearer_auth(&token)
            .json(&json!({ "content": content }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    let res = server
        .client
        .get(server.url(&format!("/v1/admin/blocks/{block_id}/versions")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let history: Value = res.json().await.unwrap();
    assert_eq!(history["latest"], 2);
    let versions = history["versions"].as_array().unwrap();
    assert_eq!(versions.len(), 2);
    assert_eq!(versions[0]["content"], "First");
    assert_eq!(versions[1]["content"], "Second");
    assert_eq!(versions[0]["createdBy"], "editor@brand.test");

    let first_version = versions[0]["id"].as_i64().unwrap();
    let res = server
        .client
        .post(server.url(&format!("/v1/admin/versions/{first_version}/restore")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let restored: Value = res.json().await.unwrap();
    assert_eq!(restored["content"], "First");

    let res = server
        .client
        .get(server.url("/v1/pages/7/blocks?width=1440"))
        .send()
        .await
        .unwrap();
    let rendered: Value = res.json().await.unwrap();
    assert_eq!(rendered[0]["status"], "ok");
    assert_eq!(rendered[0]["node"]["type"], "text");
    assert_eq!(rendered[0]["node"]["text"], "First");
    assert_eq!(rendered[0]["node"]["alignment"], "center");

    let history = server.store.list_versions(block_id).await.unwrap();
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn restoring_missing_version_is_not_found() {
    let server = spawn().await;

    let res = server
        .client
        .post(server.url("/v1/admin/versions/4242/restore"))
        .bearer_auth(server.admin_token())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"]["type"], "notFound");
}

#[tokio::test]
async fn rendered_blocks_respect_viewport_and_isolate_failures() {
    let server = spawn().await;
    let token = server.admin_token();

    let blocks = [
        json!({ "type": "text", "content": "desktop only", "order": 0,
                "visibility": "{\"devices\":{\"mobile\":false,\"tablet\":false,\"desktop\":true}}" }),
        json!({ "type": "image", "content": "", "order": 1 }),
        json!({ "type": "quote", "content": "Stay curious", "order": 2,
                "settings": "{\"author\":\"Ada\"}" }),
    ];
    for block in &blocks {
        let res = server
            .client
            .post(server.url("/v1/admin/pages/3/blocks"))
            .bearer_auth(&token)
            .json(block)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let mobile: Value = server
        .client
        .get(server.url("/v1/pages/3/blocks?width=375"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let mobile = mobile.as_array().unwrap();
    assert_eq!(mobile.len(), 2);
    assert_eq!(mobile[0]["status"], "failed");
    assert_eq!(mobile[0]["actions"], json!(["retry", "remove"]));
    assert_eq!(mobile[1]["node"]["author"], "Ada");

    let desktop: Value = server
        .client
        .get(server.url("/v1/pages/3/blocks?width=1280"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(desktop.as_array().unwrap().len(), 3);

    let html = server
        .client
        .get(server.url("/v1/pages/3/blocks?width=1280&format=html"))
        .send()
        .await
        .unwrap();
    assert!(html.headers()["content-type"].to_str().unwrap().starts_with("text/html"));
    let html = html.text().await.unwrap();
    assert!(html.contains("desktop only"));
    assert!(html.contains(r#"data-block-action="retry""#));
}

#[tokio::test]
async fn rendered_blocks_fail_soft_when_store_is_down() {
    let server = spawn().await;
    server.store.set_unavailable(true);

    let res = server
        .client
        .get(server.url("/v1/pages/1/blocks"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn unknown_block_type_is_a_bad_request() {
    let server = spawn().await;

    let res = server
        .client
        .post(server.url("/v1/admin/pages/1/blocks"))
        .bearer_auth(server.admin_token())
        .json(&json!({ "type": "carousel" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"]["type"], "badRequest");
}

#[tokio::test]
async fn sections_and_completeness() {
    let server = spawn().await;
    let token = server.admin_token();

    for (order, visible, content) in [
        (0, true, json!({ "title": "About us", "body": "" })),
        (1, false, json!({ "title": "Hidden", "body": "Text" })),
    ] {
        let res = server
            .client
            .post(server.url("/v1/admin/pages/5/sections"))
            .bearer_auth(&token)
            .json(&json!({
                "sectionType": "about",
                "sectionOrder": order,
                "content": content,
                "requiredFields": ["title", "body"],
                "isVisible": visible,
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let public: Value = server
        .client
        .get(server.url("/v1/pages/5/sections"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(public.as_array().unwrap().len(), 1);
    assert_eq!(public[0]["content"]["title"], "About us");

    let report: Value = server
        .client
        .get(server.url("/v1/admin/pages/5/sections/completeness"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(report["sections"][0]["completeness"], 50);
    assert_eq!(report["sections"][0]["missingFields"], json!(["body"]));
    assert_eq!(report["overallCompleteness"], 75);
}

#[tokio::test]
async fn cors_preflight_is_answered() {
    let server = spawn().await;

    let res = server
        .client
        .request(reqwest::Method::OPTIONS, server.url("/v1/admin/content"))
        .header("Origin", "https://editor.brand.test")
        .header("Access-Control-Request-Method", "PUT")
        .header("Access-Control-Request-Headers", "authorization,content-type")
        .send()
        .await
        .unwrap();
    assert!(res.status().is_success());
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use tower::ServiceExt;

    let state = AppState::new(
        Arc::new(MemoryContentStore::new()),
        test_config(),
        EventBus::new(8),
    );
    let token = issue_token(SECRET, "editor@brand.test", ADMIN_ROLE, Duration::minutes(5)).unwrap();
    let body = vec![b' '; brand_cms_api::MAX_BODY_BYTES + 1];

    let req = Request::builder()
        .method(Method::PUT)
        .uri("/v1/admin/content")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap();

    let res = build_app(state).oneshot(req).await.unwrap();
    assert_eq!(res.status().as_u16(), StatusCode::PAYLOAD_TOO_LARGE.as_u16());
}
