use axum::{extract::{Path, State}, response::IntoResponse, Json};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{ConfirmJobRequest, TransitionJobRequest};
use crate::api::dtos::responses::JobView;
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::actor::UserType;
use crate::domain::models::job_record::JobStatus;
use crate::domain::services::lifecycle::{self, TransitionPayload};
use crate::domain::services::notify;
use crate::error::AppError;
use crate::state::AppState;

pub async fn get_job(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let job = state.job_repo.find_by_id(&job_id).await?
        .ok_or(AppError::NotFound("Job record not found".into()))?;

    let is_party = match user.user_type {
        UserType::Company => job.company_id == user.user_id,
        UserType::Worker => job.worker_id == user.user_id,
    };
    if !is_party {
        return Err(AppError::Forbidden("Not a party to this job".into()));
    }

    Ok(Json(JobView::from(job)))
}

pub async fn list_jobs(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let jobs = state.job_repo.list_for(&user.user_id, user.user_type).await?;
    let views: Vec<JobView> = jobs.into_iter().map(JobView::from).collect();
    Ok(Json(views))
}

async fn run_transition(
    state: &Arc<AppState>,
    user: &AuthUser,
    job_id: &str,
    target: JobStatus,
    payload: &TransitionPayload,
) -> Result<JobView, AppError> {
    let job = state.job_repo.find_by_id(job_id).await?
        .ok_or(AppError::NotFound("Job record not found".into()))?;

    let updated = lifecycle::apply(&job, target, &user.user_id, user.user_type, payload, Utc::now())?;
    let notification = notify::job_transition(&updated, user.user_type);

    let persisted = state.job_repo.transition(&updated, job.status, &notification).await?;
    info!("Job {} transitioned to {:?}", persisted.id, persisted.status);
    Ok(JobView::from(persisted))
}

pub async fn transition_job(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(job_id): Path<String>,
    Json(payload): Json<TransitionJobRequest>,
) -> Result<impl IntoResponse, AppError> {
    let view = run_transition(&state, &user, &job_id, payload.target_state, &payload.payload).await?;
    Ok(Json(view))
}

pub async fn confirm_job(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(job_id): Path<String>,
    Json(payload): Json<ConfirmJobRequest>,
) -> Result<impl IntoResponse, AppError> {
    let transition_payload = TransitionPayload {
        confirmation_notes: payload.notes,
        quality_rating: payload.quality_rating,
        ..Default::default()
    };
    let view = run_transition(&state, &user, &job_id, JobStatus::Confirmed, &transition_payload).await?;
    Ok(Json(view))
}

pub async fn pay_job(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let view = run_transition(&state, &user, &job_id, JobStatus::Paid, &TransitionPayload::default()).await?;
    Ok(Json(view))
}
