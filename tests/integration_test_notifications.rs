mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chrono::{Duration, Utc};
use common::TestApp;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Seeds `n` invitation_received notifications for worker-1 by inviting them
/// to `n` distinct projects.
async fn seed_notifications(app: &TestApp, company_token: &str, n: usize) {
    for i in 0..n {
        let project = json!({
            "title": format!("项目 {}", i),
            "wage_amount": 400.0,
            "wage_unit": "day",
            "required_workers": 1,
            "start_date": Utc::now().to_rfc3339(),
            "end_date": (Utc::now() + Duration::days(1)).to_rfc3339(),
        });
        let res = app.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/projects")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {}", company_token))
                .body(Body::from(project.to_string()))
                .unwrap(),
        ).await.unwrap();
        let project_id = parse_body(res).await["id"].as_str().unwrap().to_string();

        let res = app.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/invitations")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {}", company_token))
                .body(Body::from(json!({"project_id": project_id, "worker_id": "worker-1"}).to_string()))
                .unwrap(),
        ).await.unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
    }
}

async fn list(app: &TestApp, token: &str, query: &str) -> Value {
    let uri = if query.is_empty() {
        "/api/v1/notifications".to_string()
    } else {
        format!("/api/v1/notifications?{}", query)
    };
    let res = app.router.clone().oneshot(
        Request::builder()
            .method("GET")
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap(),
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    parse_body(res).await
}

#[tokio::test]
async fn test_pagination_newest_first() {
    let app = TestApp::new().await;
    seed_notifications(&app, &app.company_token("company-1"), 5).await;
    let worker = app.worker_token("worker-1");

    let page1 = list(&app, &worker, "page=1&limit=2").await;
    assert_eq!(page1["total"].as_i64().unwrap(), 5);
    assert_eq!(page1["items"].as_array().unwrap().len(), 2);
    assert_eq!(page1["page"].as_i64().unwrap(), 1);
    assert_eq!(page1["limit"].as_i64().unwrap(), 2);
    // Newest first.
    assert!(page1["items"][0]["message"].as_str().unwrap().contains("项目 4"));

    let page3 = list(&app, &worker, "page=3&limit=2").await;
    assert_eq!(page3["items"].as_array().unwrap().len(), 1);
    assert!(page3["items"][0]["message"].as_str().unwrap().contains("项目 0"));

    let beyond = list(&app, &worker, "page=9&limit=2").await;
    assert_eq!(beyond["items"].as_array().unwrap().len(), 0);
    assert_eq!(beyond["total"].as_i64().unwrap(), 5);
}

#[tokio::test]
async fn test_mark_read_and_filtering() {
    let app = TestApp::new().await;
    seed_notifications(&app, &app.company_token("company-1"), 3).await;
    let worker = app.worker_token("worker-1");

    let all = list(&app, &worker, "").await;
    let first_id = all["items"][0]["id"].as_str().unwrap().to_string();
    assert_eq!(all["items"][0]["is_read"], false);

    let res = app.router.clone().oneshot(
        Request::builder()
            .method("PUT")
            .uri(format!("/api/v1/notifications/{}/read", first_id))
            .header(header::AUTHORIZATION, format!("Bearer {}", worker))
            .body(Body::empty())
            .unwrap(),
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let marked = parse_body(res).await;
    assert_eq!(marked["is_read"], true);
    assert!(marked["read_at"].is_string());

    let unread = list(&app, &worker, "is_read=false").await;
    assert_eq!(unread["total"].as_i64().unwrap(), 2);
    let read = list(&app, &worker, "is_read=true").await;
    assert_eq!(read["total"].as_i64().unwrap(), 1);
    assert_eq!(read["items"][0]["id"].as_str().unwrap(), first_id);
}

#[tokio::test]
async fn test_mark_read_is_idempotent() {
    let app = TestApp::new().await;
    seed_notifications(&app, &app.company_token("company-1"), 1).await;
    let worker = app.worker_token("worker-1");

    let all = list(&app, &worker, "").await;
    let id = all["items"][0]["id"].as_str().unwrap().to_string();

    let first = app.router.clone().oneshot(
        Request::builder()
            .method("PUT")
            .uri(format!("/api/v1/notifications/{}/read", id))
            .header(header::AUTHORIZATION, format!("Bearer {}", worker))
            .body(Body::empty())
            .unwrap(),
    ).await.unwrap();
    let first_read_at = parse_body(first).await["read_at"].as_str().unwrap().to_string();

    let second = app.router.clone().oneshot(
        Request::builder()
            .method("PUT")
            .uri(format!("/api/v1/notifications/{}/read", id))
            .header(header::AUTHORIZATION, format!("Bearer {}", worker))
            .body(Body::empty())
            .unwrap(),
    ).await.unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    // The original read timestamp is preserved.
    assert_eq!(parse_body(second).await["read_at"].as_str().unwrap(), first_read_at);
}

#[tokio::test]
async fn test_cannot_read_someone_elses_notification() {
    let app = TestApp::new().await;
    seed_notifications(&app, &app.company_token("company-1"), 1).await;

    let all = list(&app, &app.worker_token("worker-1"), "").await;
    let id = all["items"][0]["id"].as_str().unwrap().to_string();

    let res = app.router.clone().oneshot(
        Request::builder()
            .method("PUT")
            .uri(format!("/api/v1/notifications/{}/read", id))
            .header(header::AUTHORIZATION, format!("Bearer {}", app.worker_token("worker-2")))
            .body(Body::empty())
            .unwrap(),
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_mark_all_read_reports_count() {
    let app = TestApp::new().await;
    seed_notifications(&app, &app.company_token("company-1"), 4).await;
    let worker = app.worker_token("worker-1");

    let res = app.router.clone().oneshot(
        Request::builder()
            .method("PUT")
            .uri("/api/v1/notifications/read-all")
            .header(header::AUTHORIZATION, format!("Bearer {}", worker))
            .body(Body::empty())
            .unwrap(),
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["updated"].as_i64().unwrap(), 4);

    // A second sweep has nothing left to flip.
    let res = app.router.clone().oneshot(
        Request::builder()
            .method("PUT")
            .uri("/api/v1/notifications/read-all")
            .header(header::AUTHORIZATION, format!("Bearer {}", worker))
            .body(Body::empty())
            .unwrap(),
    ).await.unwrap();
    assert_eq!(parse_body(res).await["updated"].as_i64().unwrap(), 0);

    assert_eq!(list(&app, &worker, "is_read=false").await["total"].as_i64().unwrap(), 0);
}

#[tokio::test]
async fn test_requests_without_token_are_unauthorized() {
    let app = TestApp::new().await;

    let res = app.router.clone().oneshot(
        Request::builder()
            .method("GET")
            .uri("/api/v1/notifications")
            .body(Body::empty())
            .unwrap(),
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    // Auth rejections carry the same JSON error envelope as every other error.
    assert_eq!(parse_body(res).await["error"], "Unauthorized");

    let res = app.router.clone().oneshot(
        Request::builder()
            .method("GET")
            .uri("/api/v1/notifications")
            .header(header::AUTHORIZATION, "Bearer not-a-jwt")
            .body(Body::empty())
            .unwrap(),
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(parse_body(res).await["error"], "Unauthorized");
}
