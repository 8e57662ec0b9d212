//! Route definitions for swing analysis.

use axum::routing::post;
use axum::Router;

use crate::handlers::analysis;
use crate::state::AppState;

/// Analysis routes mounted at the `/api/v1` root.
///
/// ```text
/// POST /analyze           -> analyze
/// POST /capture-check     -> capture_check
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analyze", post(analysis::analyze))
        .route("/capture-check", post(analysis::capture_check))
}
