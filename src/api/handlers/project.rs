use axum::{extract::{Path, State}, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::CreateProjectRequest;
use crate::api::dtos::responses::ProjectView;
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::actor::UserType;
use crate::domain::models::project::{NewProjectParams, Project};
use crate::domain::services::wage;
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_project(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<CreateProjectRequest>,
) -> Result<impl IntoResponse, AppError> {
    if user.user_type != UserType::Company {
        return Err(AppError::Forbidden("Only companies may create projects".into()));
    }
    if payload.title.trim().is_empty() {
        return Err(AppError::Validation("Project title must not be empty".into()));
    }
    if payload.required_workers < 1 {
        return Err(AppError::Validation("Required worker count must be at least 1".into()));
    }
    if payload.end_date < payload.start_date {
        return Err(AppError::Validation("Schedule end must not precede its start".into()));
    }

    // Single write path for the canonical figure.
    let daily_wage = wage::to_canonical_daily(payload.wage_amount, payload.wage_unit)?;

    let project = Project::new(NewProjectParams {
        company_id: user.user_id,
        title: payload.title,
        payment_type: payload.wage_unit.payment_type(),
        original_wage: payload.wage_amount,
        daily_wage,
        required_workers: payload.required_workers,
        start_date: payload.start_date,
        end_date: payload.end_date,
    });

    let created = state.project_repo.create(&project).await?;
    info!("Created project {}", created.id);

    Ok((axum::http::StatusCode::CREATED, Json(ProjectView::from(created))))
}

pub async fn get_project(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(project_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let project = state.project_repo.find_by_id(&project_id).await?
        .ok_or(AppError::NotFound("Project not found".into()))?;
    Ok(Json(ProjectView::from(project)))
}

pub async fn list_projects(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    if user.user_type != UserType::Company {
        return Err(AppError::Forbidden("Only companies have projects".into()));
    }
    let projects = state.project_repo.list_by_company(&user.user_id).await?;
    let views: Vec<ProjectView> = projects.into_iter().map(ProjectView::from).collect();
    Ok(Json(views))
}
