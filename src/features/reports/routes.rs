use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::reports::handlers::{self, ReportState};
use crate::features::reports::services::ReportService;
use crate::features::users::services::UserService;
use crate::modules::storage::MediaStorage;

/// Create routes for the reports feature
///
/// All routes require the auth middleware to be applied by the caller.
/// The static `/worker` segment takes priority over `/{id}`.
pub fn routes(
    report_service: Arc<ReportService>,
    user_service: Arc<UserService>,
    media_store: Arc<dyn MediaStorage>,
) -> Router {
    let state = ReportState {
        report_service,
        user_service,
        media_store,
    };

    Router::new()
        .route(
            "/api/reports",
            get(handlers::list_reports).post(handlers::create_report),
        )
        .route("/api/reports/worker", get(handlers::list_worker_reports))
        .route(
            "/api/reports/{id}",
            get(handlers::get_report).put(handlers::update_report_status),
        )
        .with_state(state)
}
