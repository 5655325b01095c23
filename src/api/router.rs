use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{health, invitation, job, notification, project};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Projects
        .route("/api/v1/projects", post(project::create_project).get(project::list_projects))
        .route("/api/v1/projects/{project_id}", get(project::get_project))

        // Invitations
        .route("/api/v1/invitations", post(invitation::create_invitation).get(invitation::list_invitations))
        .route("/api/v1/invitations/{invitation_id}", get(invitation::get_invitation))
        .route("/api/v1/invitations/{invitation_id}/respond", put(invitation::respond_to_invitation))

        // Job lifecycle
        .route("/api/v1/jobs", get(job::list_jobs))
        .route("/api/v1/jobs/{job_id}", get(job::get_job))
        .route("/api/v1/jobs/{job_id}/transition", put(job::transition_job))
        .route("/api/v1/jobs/{job_id}/confirm", put(job::confirm_job))
        .route("/api/v1/jobs/{job_id}/pay", put(job::pay_job))

        // Notifications
        .route("/api/v1/notifications", get(notification::list_notifications))
        .route("/api/v1/notifications/read-all", put(notification::mark_all_read))
        .route("/api/v1/notifications/{notification_id}/read", put(notification::mark_read))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                        user_type = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
