//! Biomechanical metric vocabulary and the metric set container.
//!
//! Metric names are a fixed, versioned vocabulary. A metric that is absent,
//! or present with the wrong kind of value, is "not evaluated": every
//! accessor returns `None` and no rule may treat that as a failing value.

pub mod extractor;

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

pub use extractor::{LandmarkMetricExtractor, MetricExtractor};

// ---------------------------------------------------------------------------
// Vocabulary (v1)
// ---------------------------------------------------------------------------

/// Version tag of the metric vocabulary below.
pub const METRIC_VOCABULARY_VERSION: u32 = 1;

/// Frames with every core landmark present.
pub const METRIC_FRAMES_USED: &str = "framesUsed";
/// `framesUsed / frameCount`, 0..1.
pub const METRIC_OK_RATE: &str = "okRate";
/// Mean wrist travel per frame in the mid/late window.
pub const METRIC_HANDS_PROXY: &str = "handsProxy";
/// Mean core-joint travel per frame in the mid/late window.
pub const METRIC_JITTER_PROXY: &str = "jitterProxy";
/// Shoulder peak rotation frame minus hip peak rotation frame.
pub const METRIC_SEQ_LEAD_FRAMES: &str = "seqLeadFrames";
/// Shoulder turn at the top, 0..1.
pub const METRIC_SHOULDER_TURN: &str = "shoulderTurn";
/// Hip turn at the top, 0..1.
pub const METRIC_HIP_TURN: &str = "hipTurn";
/// Shoulder turn minus hip turn.
pub const METRIC_SEPARATION: &str = "separation";
/// Pelvis drifts away from the target during the backswing.
pub const METRIC_SWAY: &str = "sway";
/// Pelvis position between trail (0) and lead (100) ankle at impact.
pub const METRIC_PRESSURE_FORWARD: &str = "pressureForward";
/// `late` / `on-time` / `early` pressure shift at transition.
pub const METRIC_PRESSURE_SHIFT: &str = "pressureShift";
/// Percent drop from downswing peak hand speed to impact hand speed.
pub const METRIC_HANDLE_SPEED_DROP: &str = "handleSpeedDrop";
/// Hands behind the pelvis at impact.
pub const METRIC_FLIP_RISK: &str = "flipRisk";
/// Trail elbow folded past 80 degrees at the top.
pub const METRIC_TRAIL_ARM_COLLAPSE: &str = "trailArmCollapse";
/// Pelvis rise from address to impact relative to torso length.
pub const METRIC_PELVIS_RISE: &str = "pelvisRise";

pub const PRESSURE_SHIFT_LATE: &str = "late";
pub const PRESSURE_SHIFT_ON_TIME: &str = "on-time";
pub const PRESSURE_SHIFT_EARLY: &str = "early";

// ---------------------------------------------------------------------------
// MetricValue / MetricSet
// ---------------------------------------------------------------------------

/// A single metric value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Flag(bool),
    Number(f64),
    Label(String),
}

impl From<f64> for MetricValue {
    fn from(v: f64) -> Self {
        MetricValue::Number(v)
    }
}

impl From<bool> for MetricValue {
    fn from(v: bool) -> Self {
        MetricValue::Flag(v)
    }
}

impl From<&str> for MetricValue {
    fn from(v: &str) -> Self {
        MetricValue::Label(v.to_string())
    }
}

impl MetricValue {
    /// Convert a JSON value, dropping anything that is not a flag, a finite
    /// number or a string.
    fn from_json(value: serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Bool(b) => Some(MetricValue::Flag(b)),
            serde_json::Value::Number(n) => n
                .as_f64()
                .filter(|f| f.is_finite())
                .map(MetricValue::Number),
            serde_json::Value::String(s) => Some(MetricValue::Label(s)),
            _ => None,
        }
    }
}

/// Named metrics for one analysis. Ordered so serialization is stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MetricSet(BTreeMap<String, MetricValue>);

impl<'de> Deserialize<'de> for MetricSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        Ok(MetricSet(
            raw.into_iter()
                .filter_map(|(k, v)| MetricValue::from_json(v).map(|v| (k, v)))
                .collect(),
        ))
    }
}

impl MetricSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: impl Into<MetricValue>) {
        self.0.insert(name.to_string(), value.into());
    }

    /// Builder-style insert, handy in tests and fixtures.
    pub fn with(mut self, name: &str, value: impl Into<MetricValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&MetricValue> {
        self.0.get(name)
    }

    /// The metric as a finite number, or `None`.
    pub fn number(&self, name: &str) -> Option<f64> {
        match self.0.get(name) {
            Some(MetricValue::Number(n)) if n.is_finite() => Some(*n),
            _ => None,
        }
    }

    /// The metric as a boolean flag, or `None`.
    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.0.get(name) {
            Some(MetricValue::Flag(b)) => Some(*b),
            _ => None,
        }
    }

    /// The metric as a label, or `None`.
    pub fn label(&self, name: &str) -> Option<&str> {
        match self.0.get(name) {
            Some(MetricValue::Label(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// `true` only when the flag is present and set.
    pub fn is_set(&self, name: &str) -> bool {
        self.flag(name) == Some(true)
    }

    /// Overlay `other` on top of `self`; `other` wins on conflicts.
    pub fn overlay(&mut self, other: &MetricSet) {
        for (k, v) in &other.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetricValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
