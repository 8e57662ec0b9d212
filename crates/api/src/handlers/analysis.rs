//! Handlers for swing analysis and the standalone capture check.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use swingcoach_core::capture_quality::{self, CaptureCheck, CaptureQualityInput};
use swingcoach_core::engine::{AnalysisOutcome, AnalyzeOptions};
use swingcoach_core::error::CoreError;
use swingcoach_core::pose::PoseSeries;
use swingcoach_core::report::Report;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub pose: PoseSeries,
    #[serde(default)]
    pub options: AnalyzeOptions,
}

/// Either a report or the capture check that stopped the analysis.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AnalyzeResponse {
    Report {
        report: Box<Report>,
    },
    #[serde(rename_all = "camelCase")]
    CaptureCheck {
        capture_check: CaptureCheck,
    },
}

impl From<AnalysisOutcome> for AnalyzeResponse {
    fn from(outcome: AnalysisOutcome) -> Self {
        match outcome {
            AnalysisOutcome::Report(report) => AnalyzeResponse::Report { report },
            AnalysisOutcome::CaptureRejected(capture_check) => {
                AnalyzeResponse::CaptureCheck { capture_check }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// POST /analyze
// ---------------------------------------------------------------------------

/// Run the coaching engine on one pose series.
///
/// The engine is CPU-bound, so it runs on the blocking pool.
pub async fn analyze(
    State(state): State<AppState>,
    AppJson(body): AppJson<AnalyzeRequest>,
) -> AppResult<impl IntoResponse> {
    let frames = body.pose.frame_count();
    if frames == 0 {
        return Err(CoreError::Validation("pose must contain at least one frame".into()).into());
    }
    if frames > state.config.max_pose_frames {
        return Err(CoreError::Validation(format!(
            "pose has {frames} frames, the limit is {}",
            state.config.max_pose_frames
        ))
        .into());
    }

    let coach = state.coach.clone();
    let outcome = tokio::task::spawn_blocking(move || coach.analyze(&body.pose, &body.options))
        .await
        .map_err(|e| AppError::InternalError(format!("Analysis task failed: {e}")))??;

    Ok(Json(DataResponse {
        data: AnalyzeResponse::from(outcome),
    }))
}

// ---------------------------------------------------------------------------
// POST /capture-check
// ---------------------------------------------------------------------------

/// Evaluate capture hints without any pose data.
pub async fn capture_check(
    AppJson(input): AppJson<CaptureQualityInput>,
) -> AppResult<impl IntoResponse> {
    let check = capture_quality::evaluate(&input);
    tracing::debug!(quality = ?check.quality, "Capture checked");
    Ok(Json(DataResponse { data: check }))
}
