use std::sync::Arc;
use std::time::Duration;
use chrono::Utc;
use tokio::time::sleep;
use tracing::{error, info, info_span, Instrument};

use crate::domain::services::notify;
use crate::state::AppState;

/// Periodic expiry sweep. Safe to run concurrently with itself and with
/// inbound responses: every row is flipped with a status-guarded update, so
/// an invitation that was responded to (or already expired) in the meantime
/// is simply skipped.
pub async fn start_background_worker(state: Arc<AppState>) {
    info!("Starting invitation expiry sweeper...");

    let interval = Duration::from_secs(state.config.expiry_sweep_interval_secs);

    loop {
        let span = info_span!("expiry_sweep");
        async {
            match expire_stale(&state).await {
                Ok(0) => {}
                Ok(count) => info!("Expired {} stale invitations", count),
                Err(e) => error!("Expiry sweep failed: {:?}", e),
            }
        }
            .instrument(span)
            .await;

        sleep(interval).await;
    }
}

pub async fn expire_stale(state: &Arc<AppState>) -> Result<u64, crate::error::AppError> {
    let now = Utc::now();
    let stale = state.invitation_repo.find_expired_pending(now).await?;

    let mut count = 0u64;
    for invitation in stale {
        let notification = notify::invitation_expired(&invitation);
        if state.invitation_repo.expire(&invitation.id, &notification).await? {
            count += 1;
        }
    }
    Ok(count)
}
