use serde_json::json;
use sqlx::types::Json;

use crate::domain::models::actor::UserType;
use crate::domain::models::invitation::Invitation;
use crate::domain::models::job_record::{JobRecord, JobStatus};
use crate::domain::models::notification::{Notification, NotificationType};
use crate::domain::services::wage;

/// Builders for the one notification each lifecycle event owes its
/// counterparty. The repositories persist the result inside the same
/// transaction as the state change, so exactly one row exists per event.

pub fn invitation_received(invitation: &Invitation, project_title: &str) -> Notification {
    let mut n = Notification::new(
        invitation.worker_id.clone(),
        UserType::Worker,
        NotificationType::InvitationReceived,
        "收到新的工作邀请".to_string(),
        format!(
            "「{}」邀请您参与工作，工资 {}",
            project_title,
            wage::to_display(invitation.original_wage, invitation.wage_unit)
        ),
    );
    n.sender_id = Some(invitation.company_id.clone());
    n.sender_type = Some(UserType::Company);
    n.project_id = Some(invitation.project_id.clone());
    n.invitation_id = Some(invitation.id.clone());
    n
}

pub fn invitation_responded(invitation: &Invitation, accepted: bool, job_id: Option<&str>) -> Notification {
    let (notification_type, title, message) = if accepted {
        (
            NotificationType::InvitationAccepted,
            "工人已接受邀请".to_string(),
            "您的邀请已被接受，工作记录已创建".to_string(),
        )
    } else {
        (
            NotificationType::InvitationRejected,
            "工人已拒绝邀请".to_string(),
            match invitation.response_note.as_deref() {
                Some(note) => format!("您的邀请被拒绝：{}", note),
                None => "您的邀请被拒绝".to_string(),
            },
        )
    };
    let mut n = Notification::new(
        invitation.company_id.clone(),
        UserType::Company,
        notification_type,
        title,
        message,
    );
    n.sender_id = Some(invitation.worker_id.clone());
    n.sender_type = Some(UserType::Worker);
    n.project_id = Some(invitation.project_id.clone());
    n.invitation_id = Some(invitation.id.clone());
    n.job_id = job_id.map(str::to_string);
    n
}

pub fn invitation_expired(invitation: &Invitation) -> Notification {
    let mut n = Notification::new(
        invitation.company_id.clone(),
        UserType::Company,
        NotificationType::InvitationExpired,
        "邀请已过期".to_string(),
        "您发出的邀请未在有效期内得到回应，已自动过期".to_string(),
    );
    n.project_id = Some(invitation.project_id.clone());
    n.invitation_id = Some(invitation.id.clone());
    n
}

/// One notification to the opposite party of whoever performed the
/// transition; the actor never notifies themselves.
pub fn job_transition(job: &JobRecord, actor_type: UserType) -> Notification {
    let (notification_type, title, message) = match job.status {
        JobStatus::Arrived => (
            NotificationType::WorkerArrived,
            "工人已到场".to_string(),
            "工人已完成到场打卡".to_string(),
        ),
        JobStatus::Working => (
            NotificationType::WorkStarted,
            "工作已开始".to_string(),
            "工人已标记开始工作".to_string(),
        ),
        JobStatus::Completed => (
            NotificationType::WorkCompleted,
            "工作已完成".to_string(),
            format!("工人已提交完工，实际工时 {:.2} 小时", job.actual_hours.unwrap_or(0.0)),
        ),
        JobStatus::Confirmed => (
            NotificationType::WorkConfirmed,
            "完工已确认".to_string(),
            "企业已确认本次工作".to_string(),
        ),
        JobStatus::Paid => (
            NotificationType::PaymentSent,
            "工资已支付".to_string(),
            format!("本次工作的工资 {} 已标记为已支付", wage::to_display(job.original_wage, job.wage_unit)),
        ),
        JobStatus::Cancelled => (
            NotificationType::JobCancelled,
            "工作已取消".to_string(),
            match job.cancel_reason.as_deref() {
                Some(reason) => format!("本次工作已被取消：{}", reason),
                None => "本次工作已被取消".to_string(),
            },
        ),
        JobStatus::Accepted => unreachable!("accepted is never a transition target"),
    };

    let recipient_type = actor_type.counterparty();
    let (recipient_id, sender_id) = match recipient_type {
        UserType::Company => (job.company_id.clone(), job.worker_id.clone()),
        UserType::Worker => (job.worker_id.clone(), job.company_id.clone()),
    };

    let mut n = Notification::new(recipient_id, recipient_type, notification_type, title, message);
    n.sender_id = Some(sender_id);
    n.sender_type = Some(actor_type);
    n.project_id = Some(job.project_id.clone());
    n.invitation_id = Some(job.invitation_id.clone());
    n.job_id = Some(job.id.clone());
    n.metadata = Some(Json(json!({ "status": job.status })));
    n
}
