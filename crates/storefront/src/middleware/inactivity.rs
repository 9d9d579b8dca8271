//! Auto-logout middleware for idle authenticated sessions.
//!
//! Runs on every request inside the session layer. For a request whose
//! session carries an authenticated user, the stored last-activity timestamp
//! is compared against now: past the threshold, the whole session is flushed
//! (the request then proceeds unauthenticated rather than being rejected).
//! The timestamp is refreshed unconditionally afterwards, including right
//! after a flush. Unauthenticated requests never read or write it.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tower_sessions::Session;

use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// Whether a session last active at `last_activity` has idled out by `now`.
///
/// The threshold is exclusive: exactly `timeout_secs` of idle time keeps the
/// session alive.
#[must_use]
pub const fn is_expired(last_activity: i64, now: i64, timeout_secs: i64) -> bool {
    now.saturating_sub(last_activity) > timeout_secs
}

/// The middleware itself; layer with `axum::middleware::from_fn_with_state`.
pub async fn auto_logout(
    State(state): State<AppState>,
    session: Session,
    request: Request,
    next: Next,
) -> Response {
    let authenticated = session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
        .is_some();

    if authenticated {
        let now = Utc::now().timestamp();
        let last_activity = session
            .get::<i64>(session_keys::LAST_ACTIVITY)
            .await
            .ok()
            .flatten();

        if let Some(last_activity) = last_activity
            && is_expired(last_activity, now, state.config().inactivity_timeout_secs)
        {
            tracing::info!(idle_secs = now - last_activity, "idle session expired");
            if let Err(e) = session.flush().await {
                tracing::error!("Failed to flush idle session: {e}");
            }
        }

        if let Err(e) = session.insert(session_keys::LAST_ACTIVITY, now).await {
            tracing::error!("Failed to refresh last-activity timestamp: {e}");
        }
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: i64 = 300;

    #[test]
    fn test_under_threshold_keeps_session() {
        assert!(!is_expired(1_000, 1_000 + 299, THRESHOLD));
    }

    #[test]
    fn test_exactly_at_threshold_keeps_session() {
        assert!(!is_expired(1_000, 1_000 + 300, THRESHOLD));
    }

    #[test]
    fn test_over_threshold_expires() {
        assert!(is_expired(1_000, 1_000 + 301, THRESHOLD));
    }

    #[test]
    fn test_clock_skew_does_not_expire() {
        // a timestamp from the future must not underflow into an expiry
        assert!(!is_expired(2_000, 1_000, THRESHOLD));
    }
}
