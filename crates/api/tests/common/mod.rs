#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use swingcoach_api::config::ServerConfig;
use swingcoach_api::router::build_app_router;
use swingcoach_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
///
/// Caps poses at 120 frames so the size limit is cheap to exercise.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_pose_frames: 120,
    }
}

/// Build the full application router with the production middleware stack.
pub fn build_test_app() -> Router {
    let config = test_config();
    let state = AppState::new(config.clone());
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Pose fixtures
// ---------------------------------------------------------------------------

/// One standing frame with all 33 landmarks, golfer facing the camera.
fn standing_frame(i: usize) -> Value {
    let mut landmarks = vec![json!({ "x": 0.5, "y": 0.1, "visibility": 0.9 }); 33];
    let joints: [(usize, f64, f64); 10] = [
        (11, 0.58, 0.30),
        (12, 0.42, 0.30),
        (13, 0.60, 0.45),
        (14, 0.40, 0.45),
        (15, 0.52, 0.62),
        (16, 0.48, 0.62),
        (23, 0.55, 0.55),
        (24, 0.45, 0.55),
        (27, 0.60, 0.95),
        (28, 0.40, 0.95),
    ];
    for (k, x, y) in joints {
        landmarks[k] = json!({ "x": x, "y": y, "visibility": 0.99 });
    }
    json!({ "tMs": i as f64 * 1000.0 / 30.0, "landmarks": landmarks })
}

/// A pose series of `frames` identical standing frames.
pub fn standing_pose(frames: usize) -> Value {
    json!({
        "fps": 30,
        "width": 1080,
        "height": 1920,
        "frames": (0..frames).map(standing_frame).collect::<Vec<_>>(),
    })
}
