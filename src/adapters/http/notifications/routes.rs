//! Axum router configuration for notification endpoints.

use axum::{routing::post, Router};

use super::handlers::{
    profile_updated_notice, send_account_sms, shorten_urls, NotificationsAppState,
};

/// Create the notification API router.
///
/// # Routes
/// - `POST /notifications/account_created` - Text a new account
/// - `POST /notifications/profile_updated` - Profile update notice
/// - `POST /short_urls` - Shorten a batch of URLs
pub fn notifications_router() -> Router<NotificationsAppState> {
    Router::new()
        .route("/notifications/account_created", post(send_account_sms))
        .route("/notifications/profile_updated", post(profile_updated_notice))
        .route("/short_urls", post(shorten_urls))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::adapters::short_url::MockUrlShortener;
    use crate::adapters::sms::MockSmsCarrier;

    #[test]
    fn notifications_router_creates_router() {
        let state = NotificationsAppState::new(
            Arc::new(MockSmsCarrier::new()),
            Arc::new(MockUrlShortener::new()),
        );
        let _: Router<()> = notifications_router().with_state(state);
    }
}
