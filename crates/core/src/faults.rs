//! Fault detection over a metric set.
//!
//! Every fault is one entry in [`FAULT_RULES`]: a stable key, display text
//! and a predicate over the metrics. Rules are independent, run in
//! declaration order and never look at each other's output. A rule whose
//! metrics are absent (or of the wrong kind) simply does not fire.

use serde::{Deserialize, Serialize};

use crate::drills;
use crate::metrics::*;

// ---------------------------------------------------------------------------
// Fault keys
// ---------------------------------------------------------------------------

pub const FAULT_LATE_PRESSURE_SHIFT: &str = "late_pressure_shift";
pub const FAULT_FLIP_RISK: &str = "flip_risk";
pub const FAULT_EARLY_EXTENSION: &str = "early_extension";
pub const FAULT_TRAIL_ARM_COLLAPSE: &str = "trail_arm_collapse";
pub const FAULT_LOW_TURN: &str = "low_turn";
pub const FAULT_LATE_HIPS: &str = "late_hips";
pub const FAULT_SWAY: &str = "sway";

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

pub const PRESSURE_FORWARD_MIN: f64 = 60.0;
pub const HANDLE_SPEED_DROP_MAX: f64 = 12.0;
/// Handle speed drop span over which the flip score falls from 100 to 0.
const HANDLE_SPEED_DROP_SPAN: f64 = 28.0;
pub const PELVIS_RISE_MAX: f64 = 0.06;
const PELVIS_RISE_SPAN: f64 = 0.14;
pub const SHOULDER_TURN_MIN: f64 = 0.35;
pub const SEPARATION_MIN: f64 = 0.10;
/// Frames of hips-late sequencing that bottom out the score.
const SEQ_LAG_FLOOR: f64 = 12.0;

/// Frame count at which pose data is considered fully sampled.
const FULL_SAMPLE_FRAMES: f64 = 90.0;
const QUALITY_UNKNOWN: f64 = 35.0;
const SIGNAL_UNSCORED: f64 = 35.0;
const CONFIDENCE_HIGH_MIN: f64 = 75.0;
const CONFIDENCE_MEDIUM_MIN: f64 = 55.0;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How much a fault can be trusted, from data quality and signal strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// A detected swing flaw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fault {
    pub key: String,
    pub label: String,
    /// 0..=100, lower is worse.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    pub meaning: String,
    /// One-line swing thought for fixing it.
    pub cue: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_url: Option<String>,
    pub drills: Vec<String>,
    pub confidence: Confidence,
    pub evidence: Vec<String>,
}

/// What a firing rule reports back.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    /// Raw severity score, clamped to 0..=100 when the fault is built.
    pub score: Option<f64>,
    /// Metric readings that made the rule fire.
    pub evidence: Vec<String>,
}

/// One declarative fault rule.
pub struct FaultRule {
    pub key: &'static str,
    pub label: &'static str,
    pub meaning: &'static str,
    pub cue: &'static str,
    /// Things to stop doing while this fault is the priority.
    pub avoid: &'static [&'static str],
    pub evaluate: fn(&MetricSet) -> Option<Finding>,
}

// ---------------------------------------------------------------------------
// Rule predicates
// ---------------------------------------------------------------------------

fn fmt_number(name: &str, v: f64) -> String {
    format!("{name}: {}", (v * 1000.0).round() / 1000.0)
}

fn late_pressure_shift(m: &MetricSet) -> Option<Finding> {
    let label_late = m.label(METRIC_PRESSURE_SHIFT) == Some(PRESSURE_SHIFT_LATE);
    let forward = m.number(METRIC_PRESSURE_FORWARD);
    let forward_low = forward.is_some_and(|pf| pf < PRESSURE_FORWARD_MIN);
    if !label_late && !forward_low {
        return None;
    }

    let mut evidence = Vec::new();
    if label_late {
        evidence.push(format!("{METRIC_PRESSURE_SHIFT}: {PRESSURE_SHIFT_LATE}"));
    }
    if let Some(pf) = forward {
        evidence.push(fmt_number(METRIC_PRESSURE_FORWARD, pf));
    }
    Some(Finding {
        score: forward.map(|pf| 100.0 * pf / PRESSURE_FORWARD_MIN),
        evidence,
    })
}

fn flip_risk(m: &MetricSet) -> Option<Finding> {
    let flagged = m.is_set(METRIC_FLIP_RISK);
    let drop = m
        .number(METRIC_HANDLE_SPEED_DROP)
        .filter(|d| *d > HANDLE_SPEED_DROP_MAX);
    if !flagged && drop.is_none() {
        return None;
    }

    let mut evidence = Vec::new();
    if flagged {
        evidence.push(format!("{METRIC_FLIP_RISK}: true"));
    }
    if let Some(d) = drop {
        evidence.push(fmt_number(METRIC_HANDLE_SPEED_DROP, d));
    }
    Some(Finding {
        score: drop.map(|d| 100.0 - 100.0 * (d - HANDLE_SPEED_DROP_MAX) / HANDLE_SPEED_DROP_SPAN),
        evidence,
    })
}

fn early_extension(m: &MetricSet) -> Option<Finding> {
    let rise = m.number(METRIC_PELVIS_RISE).filter(|r| *r > PELVIS_RISE_MAX)?;
    Some(Finding {
        score: Some(100.0 - 100.0 * (rise - PELVIS_RISE_MAX) / PELVIS_RISE_SPAN),
        evidence: vec![fmt_number(METRIC_PELVIS_RISE, rise)],
    })
}

fn trail_arm_collapse(m: &MetricSet) -> Option<Finding> {
    m.is_set(METRIC_TRAIL_ARM_COLLAPSE).then(|| Finding {
        score: None,
        evidence: vec![format!("{METRIC_TRAIL_ARM_COLLAPSE}: true")],
    })
}

fn low_turn(m: &MetricSet) -> Option<Finding> {
    let shoulder = m
        .number(METRIC_SHOULDER_TURN)
        .filter(|t| *t < SHOULDER_TURN_MIN);
    let separation = m.number(METRIC_SEPARATION).filter(|s| *s < SEPARATION_MIN);
    if shoulder.is_none() && separation.is_none() {
        return None;
    }

    let mut evidence = Vec::new();
    let mut score = f64::INFINITY;
    if let Some(t) = shoulder {
        evidence.push(fmt_number(METRIC_SHOULDER_TURN, t));
        score = score.min(100.0 * t.max(0.0) / SHOULDER_TURN_MIN);
    }
    if let Some(s) = separation {
        evidence.push(fmt_number(METRIC_SEPARATION, s));
        score = score.min(100.0 * s.max(0.0) / SEPARATION_MIN);
    }
    Some(Finding {
        score: Some(score),
        evidence,
    })
}

fn late_hips(m: &MetricSet) -> Option<Finding> {
    let lead = m.number(METRIC_SEQ_LEAD_FRAMES).filter(|l| *l <= 0.0)?;
    Some(Finding {
        score: Some(100.0 - 100.0 * lead.abs().min(SEQ_LAG_FLOOR) / SEQ_LAG_FLOOR),
        evidence: vec![fmt_number(METRIC_SEQ_LEAD_FRAMES, lead)],
    })
}

fn sway(m: &MetricSet) -> Option<Finding> {
    m.is_set(METRIC_SWAY).then(|| Finding {
        score: None,
        evidence: vec![format!("{METRIC_SWAY}: true")],
    })
}

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

/// Declaration order is output order and the priority tie-break order.
pub const FAULT_RULES: &[FaultRule] = &[
    FaultRule {
        key: FAULT_LATE_PRESSURE_SHIFT,
        label: "Pressure shift late",
        meaning: "Low point drifts back and contact gets inconsistent.",
        cue: "Get to lead side by P5-P6, then rotate.",
        avoid: &["Spinning the shoulders from the top", "Hanging back to help the ball up"],
        evaluate: late_pressure_shift,
    },
    FaultRule {
        key: FAULT_FLIP_RISK,
        label: "Flip risk",
        meaning: "Handle stalls and the hands try to save the face.",
        cue: "Keep the chest turning; handle forward through impact.",
        avoid: &["Scooping at the ball", "Stopping the chest at impact"],
        evaluate: flip_risk,
    },
    FaultRule {
        key: FAULT_EARLY_EXTENSION,
        label: "Early extension",
        meaning: "Hips move toward the ball and you lose space.",
        cue: "Keep pelvis depth; rotate around your posture.",
        avoid: &["Thrusting the hips at the ball", "Standing up before impact"],
        evaluate: early_extension,
    },
    FaultRule {
        key: FAULT_TRAIL_ARM_COLLAPSE,
        label: "Trail arm collapse",
        meaning: "The trail elbow folds at the top and width is lost before the downswing.",
        cue: "Keep the trail arm wide to the top, elbow pointing down.",
        avoid: &["Lifting the club with the arms", "Letting the trail elbow fly behind you"],
        evaluate: trail_arm_collapse,
    },
    FaultRule {
        key: FAULT_LOW_TURN,
        label: "Sequence (low turn)",
        meaning: "The upper body under-turns, so there is little stretch to unwind.",
        cue: "Turn the lead shoulder under the chin before the arms stop.",
        avoid: &["Swinging with the arms only", "Cutting the backswing short"],
        evaluate: low_turn,
    },
    FaultRule {
        key: FAULT_LATE_HIPS,
        label: "Sequence (hips late)",
        meaning: "The shoulders fire before the hips, so speed leaks before impact.",
        cue: "Let the lead hip start down while the back still faces the target.",
        avoid: &["Starting down with the shoulders", "Rushing the transition"],
        evaluate: late_hips,
    },
    FaultRule {
        key: FAULT_SWAY,
        label: "Pressure shift (sway)",
        meaning: "The pelvis slides away from the target instead of turning.",
        cue: "Turn into the trail hip pocket; keep pressure inside the trail foot.",
        avoid: &["Sliding off the trail foot", "Chasing a longer backswing"],
        evaluate: sway,
    },
];

pub fn rule(key: &str) -> Option<&'static FaultRule> {
    FAULT_RULES.iter().find(|r| r.key == key)
}

/// Avoid-list for the fault that becomes the priority.
pub fn avoid_list(key: &str) -> &'static [&'static str] {
    rule(key).map(|r| r.avoid).unwrap_or(&[])
}

// ---------------------------------------------------------------------------
// Confidence
// ---------------------------------------------------------------------------

/// Trust in the pose data itself, 35..=98.
pub fn data_quality(m: &MetricSet) -> f64 {
    match m.number(METRIC_OK_RATE) {
        Some(ok_rate) => {
            let frames = m.number(METRIC_FRAMES_USED).unwrap_or(0.0);
            let coverage = (frames / FULL_SAMPLE_FRAMES).clamp(0.5, 1.0);
            (ok_rate * 100.0 * coverage).clamp(QUALITY_UNKNOWN, 98.0)
        }
        None => QUALITY_UNKNOWN,
    }
}

pub fn grade_confidence(quality: f64, score: Option<u8>) -> Confidence {
    let signal = score.map_or(SIGNAL_UNSCORED, |s| 100.0 - f64::from(s));
    let blended = 0.55 * quality + 0.45 * signal;
    if blended >= CONFIDENCE_HIGH_MIN {
        Confidence::High
    } else if blended >= CONFIDENCE_MEDIUM_MIN {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

fn quality_evidence(m: &MetricSet) -> Vec<String> {
    let mut e = Vec::new();
    if let Some(frames) = m.number(METRIC_FRAMES_USED) {
        e.push(format!("Frames used: {frames}"));
    }
    if let Some(ok) = m.number(METRIC_OK_RATE) {
        e.push(format!("Pose OK rate: {}", (ok * 100.0).round() / 100.0));
    }
    e
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

/// Evaluate every rule against `metrics`, in declaration order.
pub fn detect(metrics: &MetricSet) -> Vec<Fault> {
    detect_with(FAULT_RULES, metrics)
}

/// Evaluate a custom rule table.
pub fn detect_with(rules: &[FaultRule], metrics: &MetricSet) -> Vec<Fault> {
    let quality = data_quality(metrics);
    let quality_lines = quality_evidence(metrics);

    rules
        .iter()
        .filter_map(|rule| {
            let finding = (rule.evaluate)(metrics)?;
            let score = finding.score.map(|s| s.clamp(0.0, 100.0).round() as u8);
            let mut evidence = finding.evidence;
            evidence.extend(quality_lines.iter().cloned());
            Some(Fault {
                key: rule.key.to_string(),
                label: rule.label.to_string(),
                score,
                meaning: rule.meaning.to_string(),
                cue: rule.cue.to_string(),
                youtube_url: None,
                drills: drills::drills_for(rule.key)
                    .iter()
                    .map(|d| d.to_string())
                    .collect(),
                confidence: grade_confidence(quality, score),
                evidence,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
