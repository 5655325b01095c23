use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Json};
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{CreateInvitationRequest, InvitationDecision, RespondInvitationRequest};
use crate::api::dtos::responses::InvitationView;
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::actor::UserType;
use crate::domain::models::invitation::{Invitation, InvitationStatus};
use crate::domain::models::job_record::JobRecord;
use crate::domain::services::notify;
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_invitation(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<CreateInvitationRequest>,
) -> Result<impl IntoResponse, AppError> {
    if user.user_type != UserType::Company {
        return Err(AppError::Forbidden("Only companies may send invitations".into()));
    }

    let project = state.project_repo.find_by_id(&payload.project_id).await?
        .ok_or(AppError::NotFound("Project not found".into()))?;
    if project.company_id != user.user_id {
        return Err(AppError::Forbidden("Project belongs to another company".into()));
    }

    if state.invitation_repo.find_pending(&project.id, &payload.worker_id).await?.is_some() {
        return Err(AppError::DuplicateInvitation);
    }

    let expires_at = payload.expires_at.unwrap_or_else(|| {
        Utc::now() + Duration::hours(state.config.invitation_ttl_hours)
    });
    if expires_at <= Utc::now() {
        return Err(AppError::Validation("Expiry must lie in the future".into()));
    }

    let invitation = Invitation::new(&project, payload.worker_id, payload.message, expires_at);
    let notification = notify::invitation_received(&invitation, &project.title);

    let created = state.invitation_repo.create(&invitation, &notification).await?;
    info!("Created invitation {} for project {}", created.id, project.id);

    Ok((StatusCode::CREATED, Json(InvitationView::from(created))))
}

pub async fn get_invitation(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(invitation_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let invitation = state.invitation_repo.find_by_id(&invitation_id).await?
        .ok_or(AppError::NotFound("Invitation not found".into()))?;

    let is_party = match user.user_type {
        UserType::Company => invitation.company_id == user.user_id,
        UserType::Worker => invitation.worker_id == user.user_id,
    };
    if !is_party {
        return Err(AppError::Forbidden("Not a party to this invitation".into()));
    }

    Ok(Json(InvitationView::from(invitation)))
}

pub async fn list_invitations(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let invitations = state.invitation_repo.list_for(&user.user_id, user.user_type).await?;
    let views: Vec<InvitationView> = invitations.into_iter().map(InvitationView::from).collect();
    Ok(Json(views))
}

pub async fn respond_to_invitation(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(invitation_id): Path<String>,
    Json(payload): Json<RespondInvitationRequest>,
) -> Result<impl IntoResponse, AppError> {
    if user.user_type != UserType::Worker {
        return Err(AppError::Forbidden("Only workers may respond to invitations".into()));
    }

    let invitation = state.invitation_repo.find_by_id(&invitation_id).await?
        .ok_or(AppError::NotFound("Invitation not found".into()))?;
    if invitation.worker_id != user.user_id {
        return Err(AppError::Forbidden("Invitation addressed to another worker".into()));
    }
    match invitation.status {
        InvitationStatus::Pending => {}
        InvitationStatus::Expired => return Err(AppError::Expired),
        _ => return Err(AppError::AlreadyResponded),
    }

    let now = Utc::now();
    if now > invitation.expires_at {
        // Flip the row before surfacing the error so a late responder leaves
        // the invitation in its true state.
        let notification = notify::invitation_expired(&invitation);
        state.invitation_repo.expire(&invitation.id, &notification).await?;
        return Err(AppError::Expired);
    }

    let mut updated = invitation.clone();
    updated.responded_at = Some(now);
    updated.response_note = payload.note;

    match payload.decision {
        InvitationDecision::Accept => {
            updated.status = InvitationStatus::Accepted;
            let job = JobRecord::from_accepted_invitation(&updated);
            let notification = notify::invitation_responded(&updated, true, Some(&job.id));
            let responded = state.invitation_repo.respond(&updated, Some(&job), &notification).await?;
            info!("Invitation {} accepted, job record {} created", responded.id, job.id);
            Ok(Json(InvitationView::with_job(responded, job.id)))
        }
        InvitationDecision::Reject => {
            updated.status = InvitationStatus::Rejected;
            let notification = notify::invitation_responded(&updated, false, None);
            let responded = state.invitation_repo.respond(&updated, None, &notification).await?;
            info!("Invitation {} rejected", responded.id);
            Ok(Json(InvitationView::from(responded)))
        }
    }
}
