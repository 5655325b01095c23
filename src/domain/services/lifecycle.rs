use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::types::Json;

use crate::domain::models::actor::UserType;
use crate::domain::models::job_record::{GeoPoint, JobRecord, JobStatus, PaymentStatus};
use crate::error::AppError;

/// Fields a transition may carry. Which ones are required depends on the
/// target state; everything else is ignored.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct TransitionPayload {
    pub location: Option<GeoPoint>,
    pub completion_notes: Option<String>,
    pub work_photo_refs: Option<Vec<String>>,
    pub confirmation_notes: Option<String>,
    pub quality_rating: Option<i32>,
    pub reason: Option<String>,
}

/// The transition table. No skipping states, no moving backward; `cancelled`
/// is reachable from any non-terminal state.
pub fn allowed(current: JobStatus, target: JobStatus) -> bool {
    matches!(
        (current, target),
        (JobStatus::Accepted, JobStatus::Arrived)
            | (JobStatus::Arrived, JobStatus::Working)
            | (JobStatus::Working, JobStatus::Completed)
            | (JobStatus::Completed, JobStatus::Confirmed)
            | (JobStatus::Confirmed, JobStatus::Paid)
    ) || (target == JobStatus::Cancelled && !current.is_terminal())
}

fn check_role(current: JobStatus, target: JobStatus, actor_type: UserType) -> Result<(), AppError> {
    let ok = match target {
        JobStatus::Arrived | JobStatus::Working | JobStatus::Completed => {
            actor_type == UserType::Worker
        }
        JobStatus::Confirmed | JobStatus::Paid => actor_type == UserType::Company,
        // Once the worker has delivered, only the company may still cancel.
        JobStatus::Cancelled => {
            if matches!(current, JobStatus::Completed | JobStatus::Confirmed) {
                actor_type == UserType::Company
            } else {
                true
            }
        }
        JobStatus::Accepted => false,
    };
    if ok {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "Actor role is not authorized for transition to {:?}",
            target
        )))
    }
}

/// Validates a transition against the current record and produces the updated
/// record. Pure: persistence applies the result with a status-guarded update
/// so a concurrent transition loses with `InvalidTransition`.
pub fn apply(
    job: &JobRecord,
    target: JobStatus,
    actor_id: &str,
    actor_type: UserType,
    payload: &TransitionPayload,
    now: DateTime<Utc>,
) -> Result<JobRecord, AppError> {
    let is_party = match actor_type {
        UserType::Company => job.company_id == actor_id,
        UserType::Worker => job.worker_id == actor_id,
    };
    if !is_party {
        return Err(AppError::Forbidden("Not a party to this job".into()));
    }

    if !allowed(job.status, target) {
        return Err(AppError::InvalidTransition(format!(
            "Cannot transition from {:?} to {:?}",
            job.status, target
        )));
    }

    check_role(job.status, target, actor_type)?;

    let mut updated = job.clone();
    updated.status = target;

    match target {
        JobStatus::Arrived => {
            let location = payload
                .location
                .ok_or_else(|| AppError::Validation("Check-in requires a geolocation payload".into()))?;
            if !location.lat.is_finite() || !location.lng.is_finite() || !location.accuracy.is_finite() {
                return Err(AppError::Validation("Geolocation coordinates must be finite".into()));
            }
            updated.arrival_time = Some(now);
            updated.arrival_location = Some(Json(location));
        }
        JobStatus::Working => {
            updated.start_work_time = Some(now);
        }
        JobStatus::Completed => {
            let notes = payload
                .completion_notes
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .ok_or_else(|| AppError::Validation("Completion requires completion notes".into()))?;
            let started = job.start_work_time.ok_or(AppError::Internal)?;
            updated.complete_time = Some(now);
            updated.completion_notes = Some(notes.to_string());
            updated.work_photo_refs = Json(payload.work_photo_refs.clone().unwrap_or_default());
            updated.actual_hours = Some(round_hours(now - started));
        }
        JobStatus::Confirmed => {
            if let Some(rating) = payload.quality_rating {
                if !(1..=5).contains(&rating) {
                    return Err(AppError::Validation(
                        "Quality rating must be an integer between 1 and 5".into(),
                    ));
                }
                updated.quality_rating = Some(rating);
            }
            updated.confirm_time = Some(now);
            updated.confirmation_notes = payload.confirmation_notes.clone();
        }
        JobStatus::Paid => {
            updated.payment_status = PaymentStatus::Paid;
        }
        JobStatus::Cancelled => {
            updated.cancel_reason = payload.reason.clone();
        }
        JobStatus::Accepted => unreachable!("accepted is the initial state, never a target"),
    }

    Ok(updated)
}

fn round_hours(elapsed: chrono::Duration) -> f64 {
    let hours = elapsed.num_seconds() as f64 / 3600.0;
    (hours * 100.0).round() / 100.0
}
