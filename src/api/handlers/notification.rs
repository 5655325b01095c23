use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::ListNotificationsQuery;
use crate::api::dtos::responses::NotificationListResponse;
use crate::api::extractors::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<ListNotificationsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = (page - 1) * limit;

    let items = state.notification_repo
        .list(&user.user_id, user.user_type, query.is_read, limit, offset)
        .await?;
    let total = state.notification_repo
        .count(&user.user_id, user.user_type, query.is_read)
        .await?;

    Ok(Json(NotificationListResponse { items, total, page, limit }))
}

pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(notification_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let notification = state.notification_repo
        .mark_read(&notification_id, &user.user_id, user.user_type)
        .await?;
    Ok(Json(notification))
}

pub async fn mark_all_read(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let updated = state.notification_repo
        .mark_all_read(&user.user_id, user.user_type)
        .await?;
    info!("Marked {} notifications read for {}", updated, user.user_id);
    Ok(Json(serde_json::json!({ "updated": updated })))
}
