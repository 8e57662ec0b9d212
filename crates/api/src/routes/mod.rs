pub mod analysis;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /analyze                                         run the engine (POST)
/// /capture-check                                   capture gate only (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(analysis::router())
}
