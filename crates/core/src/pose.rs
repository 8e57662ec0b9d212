//! Pose series model (the output of the external landmark provider).
//!
//! Landmarks follow the MediaPipe Pose 33-point indexing. Coordinates are
//! normalized image coordinates with `y` growing downwards. The engine
//! treats the series as already-cleaned data: a landmark with a missing or
//! non-finite coordinate is simply unusable, never an error.

use serde::{Deserialize, Deserializer, Serialize};

use crate::metrics::MetricSet;
use crate::types::Handedness;

/// Frame rate assumed when the provider does not report one.
pub const DEFAULT_FPS: f64 = 30.0;

pub const LM_LEFT_SHOULDER: usize = 11;
pub const LM_RIGHT_SHOULDER: usize = 12;
pub const LM_LEFT_ELBOW: usize = 13;
pub const LM_RIGHT_ELBOW: usize = 14;
pub const LM_LEFT_WRIST: usize = 15;
pub const LM_RIGHT_WRIST: usize = 16;
pub const LM_LEFT_HIP: usize = 23;
pub const LM_RIGHT_HIP: usize = 24;
pub const LM_LEFT_ANKLE: usize = 27;
pub const LM_RIGHT_ANKLE: usize = 28;

/// Joints every usable frame must carry.
pub const CORE_LANDMARKS: &[usize] = &[
    LM_LEFT_SHOULDER,
    LM_RIGHT_SHOULDER,
    LM_LEFT_WRIST,
    LM_RIGHT_WRIST,
    LM_LEFT_HIP,
    LM_RIGHT_HIP,
];

/// Accept any JSON value for a numeric field; anything that is not a
/// number becomes `None` instead of failing the whole series.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64())
}

/// A single landmark as emitted by the provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    #[serde(default, deserialize_with = "lenient_number")]
    pub x: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub y: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub z: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub visibility: Option<f64>,
}

/// A 2D point in normalized image space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn midpoint(a: Point, b: Point) -> Point {
        Point {
            x: (a.x + b.x) / 2.0,
            y: (a.y + b.y) / 2.0,
        }
    }

    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

impl Landmark {
    /// The landmark as a point, if both coordinates are present and finite.
    pub fn point(&self) -> Option<Point> {
        match (self.x, self.y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some(Point { x, y }),
            _ => None,
        }
    }
}

/// One frame of landmarks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoseFrame {
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub t_ms: Option<f64>,
    #[serde(default)]
    pub landmarks: Vec<Landmark>,
}

impl PoseFrame {
    pub fn point(&self, index: usize) -> Option<Point> {
        self.landmarks.get(index).and_then(Landmark::point)
    }

    /// `true` when every core joint is usable.
    pub fn is_complete(&self) -> bool {
        CORE_LANDMARKS.iter().all(|&i| self.point(i).is_some())
    }
}

/// Frame-ordered landmark series plus provider metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoseSeries {
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub fps: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub width: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub height: Option<f64>,
    #[serde(default)]
    pub frames: Vec<PoseFrame>,
    /// Metrics already computed by the provider. They take precedence over
    /// metrics the engine extracts itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<MetricSet>,
}

impl PoseSeries {
    /// Reported frame rate, falling back to [`DEFAULT_FPS`] when absent or
    /// not a positive finite number.
    pub fn effective_fps(&self) -> f64 {
        match self.fps {
            Some(fps) if fps.is_finite() && fps > 0.0 => fps,
            _ => DEFAULT_FPS,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

/// Lead/trail landmark indices for a golfer's handedness.
///
/// For a right-handed golfer the lead side is the body's left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideMap {
    pub lead_shoulder: usize,
    pub trail_shoulder: usize,
    pub lead_wrist: usize,
    pub trail_wrist: usize,
    pub trail_elbow: usize,
    pub lead_hip: usize,
    pub trail_hip: usize,
    pub lead_ankle: usize,
    pub trail_ankle: usize,
}

impl SideMap {
    pub fn for_handedness(handedness: Handedness) -> Self {
        match handedness {
            Handedness::Right => SideMap {
                lead_shoulder: LM_LEFT_SHOULDER,
                trail_shoulder: LM_RIGHT_SHOULDER,
                lead_wrist: LM_LEFT_WRIST,
                trail_wrist: LM_RIGHT_WRIST,
                trail_elbow: LM_RIGHT_ELBOW,
                lead_hip: LM_LEFT_HIP,
                trail_hip: LM_RIGHT_HIP,
                lead_ankle: LM_LEFT_ANKLE,
                trail_ankle: LM_RIGHT_ANKLE,
            },
            Handedness::Left => SideMap {
                lead_shoulder: LM_RIGHT_SHOULDER,
                trail_shoulder: LM_LEFT_SHOULDER,
                lead_wrist: LM_RIGHT_WRIST,
                trail_wrist: LM_LEFT_WRIST,
                trail_elbow: LM_LEFT_ELBOW,
                lead_hip: LM_RIGHT_HIP,
                trail_hip: LM_LEFT_HIP,
                lead_ankle: LM_RIGHT_ANKLE,
                trail_ankle: LM_LEFT_ANKLE,
            },
        }
    }
}
