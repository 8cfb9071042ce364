use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tracing::info;

use crate::handlers::api::{
    add_blacklist, check_accounts, import_account, kick_account, query_state, send_sms,
    stream_urls, AppState,
};
use crate::handlers::health::health_check;

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let mut router = Router::new().route("/health", get(health_check));

    // Routes stay mounted for disabled products so callers get a 503
    let tim_routes = Router::new()
        .route("/tim/accounts", post(import_account))
        .route("/tim/accounts/check", post(check_accounts))
        .route("/tim/accounts/state", post(query_state))
        .route("/tim/accounts/:user_id/kick", post(kick_account))
        .route("/tim/blacklist", post(add_blacklist));
    router = router.merge(tim_routes);

    let cloud_routes = Router::new()
        .route("/sms/send", post(send_sms))
        .route("/live/streams/:name/urls", get(stream_urls));
    router = router.merge(cloud_routes);

    info!(
        "Routes mounted, enabled products: tim={}, sms={}, live={}",
        app_state.tim.is_some(),
        app_state.sms.is_some(),
        app_state.live.is_some()
    );

    router.with_state(app_state)
}
