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

async fn create_project(app: &TestApp, company_token: &str) -> String {
    let payload = json!({
        "title": "装修小工",
        "wage_amount": 50.0,
        "wage_unit": "hour",
        "required_workers": 2,
        "start_date": (Utc::now() + Duration::days(1)).to_rfc3339(),
        "end_date": (Utc::now() + Duration::days(5)).to_rfc3339(),
    });
    let response = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/v1/projects")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {}", company_token))
            .body(Body::from(payload.to_string()))
            .unwrap(),
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    parse_body(response).await["id"].as_str().unwrap().to_string()
}

async fn invite(app: &TestApp, company_token: &str, project_id: &str, worker_id: &str) -> axum::response::Response {
    let payload = json!({
        "project_id": project_id,
        "worker_id": worker_id,
        "message": "明天能来吗",
    });
    app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/v1/invitations")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {}", company_token))
            .body(Body::from(payload.to_string()))
            .unwrap(),
    ).await.unwrap()
}

async fn respond(app: &TestApp, worker_token: &str, invitation_id: &str, decision: &str) -> axum::response::Response {
    let payload = json!({ "decision": decision, "note": null });
    app.router.clone().oneshot(
        Request::builder()
            .method("PUT")
            .uri(format!("/api/v1/invitations/{}/respond", invitation_id))
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {}", worker_token))
            .body(Body::from(payload.to_string()))
            .unwrap(),
    ).await.unwrap()
}

async fn list_notifications(app: &TestApp, token: &str) -> Value {
    let response = app.router.clone().oneshot(
        Request::builder()
            .method("GET")
            .uri("/api/v1/notifications")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap(),
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    parse_body(response).await
}

#[tokio::test]
async fn test_create_invitation_snapshots_wage_and_notifies_worker() {
    let app = TestApp::new().await;
    let company = app.company_token("company-1");
    let project_id = create_project(&app, &company).await;

    let response = invite(&app, &company, &project_id, "worker-1").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = parse_body(response).await;
    assert_eq!(body["status"], "pending");
    assert_eq!(body["wage_amount"].as_f64().unwrap(), 400.0);
    assert_eq!(body["original_wage"].as_f64().unwrap(), 50.0);
    assert_eq!(body["wage"]["display_string"], "50元/小时");

    let notifications = list_notifications(&app, &app.worker_token("worker-1")).await;
    assert_eq!(notifications["total"].as_i64().unwrap(), 1);
    let item = &notifications["items"][0];
    assert_eq!(item["notification_type"], "invitation_received");
    assert_eq!(item["invitation_id"], body["id"]);
    assert!(item["message"].as_str().unwrap().contains("50元/小时"));
}

#[tokio::test]
async fn test_duplicate_pending_invitation_rejected() {
    let app = TestApp::new().await;
    let company = app.company_token("company-1");
    let project_id = create_project(&app, &company).await;

    assert_eq!(invite(&app, &company, &project_id, "worker-1").await.status(), StatusCode::CREATED);
    let dup = invite(&app, &company, &project_id, "worker-1").await;
    assert_eq!(dup.status(), StatusCode::CONFLICT);

    // A different worker is unaffected.
    assert_eq!(invite(&app, &company, &project_id, "worker-2").await.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_accept_creates_job_record_and_notifies_company() {
    let app = TestApp::new().await;
    let company = app.company_token("company-1");
    let worker = app.worker_token("worker-1");
    let project_id = create_project(&app, &company).await;

    let invitation = parse_body(invite(&app, &company, &project_id, "worker-1").await).await;
    let invitation_id = invitation["id"].as_str().unwrap();

    let response = respond(&app, &worker, invitation_id, "accept").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_body(response).await;
    assert_eq!(body["status"], "accepted");
    let job_id = body["job_id"].as_str().unwrap();

    let job_res = app.router.clone().oneshot(
        Request::builder()
            .method("GET")
            .uri(format!("/api/v1/jobs/{}", job_id))
            .header(header::AUTHORIZATION, format!("Bearer {}", worker))
            .body(Body::empty())
            .unwrap(),
    ).await.unwrap();
    assert_eq!(job_res.status(), StatusCode::OK);

    let job = parse_body(job_res).await;
    assert_eq!(job["status"], "accepted");
    assert_eq!(job["invitation_id"], invitation["id"]);
    assert_eq!(job["wage_amount"].as_f64().unwrap(), 400.0);
    assert_eq!(job["payment_status"], "pending");

    let notifications = list_notifications(&app, &company).await;
    assert_eq!(notifications["items"][0]["notification_type"], "invitation_accepted");
    assert_eq!(notifications["items"][0]["job_id"].as_str().unwrap(), job_id);
}

#[tokio::test]
async fn test_double_respond_conflicts() {
    let app = TestApp::new().await;
    let company = app.company_token("company-1");
    let worker = app.worker_token("worker-1");
    let project_id = create_project(&app, &company).await;

    let invitation = parse_body(invite(&app, &company, &project_id, "worker-1").await).await;
    let invitation_id = invitation["id"].as_str().unwrap();

    assert_eq!(respond(&app, &worker, invitation_id, "accept").await.status(), StatusCode::OK);
    assert_eq!(respond(&app, &worker, invitation_id, "reject").await.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_simultaneous_accepts_create_exactly_one_job() {
    let app = TestApp::new().await;
    let company = app.company_token("company-1");
    let worker = app.worker_token("worker-1");
    let project_id = create_project(&app, &company).await;

    let invitation = parse_body(invite(&app, &company, &project_id, "worker-1").await).await;
    let invitation_id = invitation["id"].as_str().unwrap();

    // Both requests read the row while it is still pending; the status-guarded
    // update in the repository decides the winner.
    let (first, second) = tokio::join!(
        respond(&app, &worker, invitation_id, "accept"),
        respond(&app, &worker, invitation_id, "accept"),
    );

    let mut statuses = [first.status(), second.status()];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::OK, StatusCode::CONFLICT]);

    let job_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM job_records WHERE invitation_id = ?")
        .bind(invitation_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(job_count, 1);

    // Exactly one acceptance notification reached the company.
    let notifications = list_notifications(&app, &company).await;
    let accepted = notifications["items"].as_array().unwrap().iter()
        .filter(|n| n["notification_type"] == "invitation_accepted")
        .count();
    assert_eq!(accepted, 1);
}

#[tokio::test]
async fn test_reject_creates_no_job() {
    let app = TestApp::new().await;
    let company = app.company_token("company-1");
    let worker = app.worker_token("worker-1");
    let project_id = create_project(&app, &company).await;

    let invitation = parse_body(invite(&app, &company, &project_id, "worker-1").await).await;
    let invitation_id = invitation["id"].as_str().unwrap();

    let response = respond(&app, &worker, invitation_id, "reject").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_body(response).await;
    assert_eq!(body["status"], "rejected");
    assert!(body.get("job_id").is_none());

    let jobs = app.router.clone().oneshot(
        Request::builder()
            .method("GET")
            .uri("/api/v1/jobs")
            .header(header::AUTHORIZATION, format!("Bearer {}", worker))
            .body(Body::empty())
            .unwrap(),
    ).await.unwrap();
    assert_eq!(parse_body(jobs).await.as_array().unwrap().len(), 0);

    let notifications = list_notifications(&app, &company).await;
    assert_eq!(notifications["items"][0]["notification_type"], "invitation_rejected");
}

#[tokio::test]
async fn test_reinvite_allowed_after_rejection() {
    let app = TestApp::new().await;
    let company = app.company_token("company-1");
    let worker = app.worker_token("worker-1");
    let project_id = create_project(&app, &company).await;

    let invitation = parse_body(invite(&app, &company, &project_id, "worker-1").await).await;
    respond(&app, &worker, invitation["id"].as_str().unwrap(), "reject").await;

    let again = invite(&app, &company, &project_id, "worker-1").await;
    assert_eq!(again.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_only_invited_worker_may_respond() {
    let app = TestApp::new().await;
    let company = app.company_token("company-1");
    let project_id = create_project(&app, &company).await;

    let invitation = parse_body(invite(&app, &company, &project_id, "worker-1").await).await;
    let invitation_id = invitation["id"].as_str().unwrap();

    let other = respond(&app, &app.worker_token("worker-2"), invitation_id, "accept").await;
    assert_eq!(other.status(), StatusCode::FORBIDDEN);

    // A company cannot answer its own offer.
    let company_attempt = respond(&app, &company, invitation_id, "accept").await;
    assert_eq!(company_attempt.status(), StatusCode::FORBIDDEN);

    // The invitation is still open for the right worker.
    let accepted = respond(&app, &app.worker_token("worker-1"), invitation_id, "accept").await;
    assert_eq!(accepted.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_invitation_for_foreign_project_forbidden() {
    let app = TestApp::new().await;
    let project_id = create_project(&app, &app.company_token("company-1")).await;

    let response = invite(&app, &app.company_token("company-2"), &project_id, "worker-1").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unknown_invitation_is_not_found() {
    let app = TestApp::new().await;
    let worker = app.worker_token("worker-1");

    let response = respond(&app, &worker, "no-such-id", "accept").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
