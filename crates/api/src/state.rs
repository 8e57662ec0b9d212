use std::sync::Arc;

use swingcoach_core::engine::SwingCoach;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// The coaching engine. Stateless, shared by every request.
    pub coach: Arc<SwingCoach>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            coach: Arc::new(SwingCoach::new()),
            config: Arc::new(config),
        }
    }
}
