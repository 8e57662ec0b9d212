//! Base scoring: the report skeleton before fault-driven overrides.
//!
//! A [`BaseScorer`] turns the pose series and its metrics into per-dimension
//! scores, a narrative and the canonical checkpoints. The assembler later
//! replaces whatever the fault pipeline has a better answer for.

use std::collections::BTreeMap;

use crate::checkpoints;
use crate::metrics::*;
use crate::pose::PoseSeries;
use crate::report::{BaseMeta, BaseReport, Overview, PlayerProfile, Priority, Scores};

/// Produces the base report skeleton.
pub trait BaseScorer: Send + Sync {
    fn score(&self, pose: &PoseSeries, metrics: &MetricSet) -> BaseReport;
}

const BAND_FLOOR: f64 = 55.0;
const BAND_SPAN: f64 = 40.0;

const DEFAULT_SPEED: u8 = 77;
const DEFAULT_EFFICIENCY: u8 = 72;
const DEFAULT_RELIABILITY: u8 = 74;
const DEFAULT_CONSISTENCY: u8 = 72;

const HANDS_PROXY_FLOOR: f64 = 0.0025;
const HANDS_PROXY_SPAN: f64 = 0.0175;
const JITTER_CEILING: f64 = 0.012;
const JITTER_FLOOR: f64 = 0.002;
const JITTER_SPAN: f64 = 0.008;

const HEADLINE: &str = "Post-estimation swing report";
const NEUTRAL_PRIORITY_LABEL: &str = "Keep building consistency";
const NEUTRAL_PRIORITY_WHY: &str = "No single fault stands out in this capture.";

/// Map a 0..1 reading onto the 55..=95 score band.
fn band(norm: f64) -> u8 {
    (BAND_FLOOR + BAND_SPAN * norm.clamp(0.0, 1.0)).round() as u8
}

fn mean(values: &[u8]) -> u8 {
    let sum: u32 = values.iter().map(|&v| u32::from(v)).sum();
    (f64::from(sum) / values.len() as f64).round() as u8
}

/// Efficiency from pressure, tracking stability and sequencing.
///
/// Returns `None` when none of the inputs were measured, so the base
/// score stands.
pub fn pipeline_efficiency(metrics: &MetricSet) -> Option<u8> {
    let pressure = metrics.number(METRIC_PRESSURE_FORWARD);
    let stability = metrics.number(METRIC_OK_RATE);
    let lead = metrics.number(METRIC_SEQ_LEAD_FRAMES);
    if pressure.is_none() && stability.is_none() && lead.is_none() {
        return None;
    }

    let p = pressure.map_or(0.55, |pf| (pf / 100.0).clamp(0.0, 1.0));
    let s = stability.map_or(0.6, |ok| ok.clamp(0.0, 1.0));
    let q = lead.map_or(0.5, |l| (l / 12.0).clamp(0.0, 1.0));
    Some(band(0.55 * p + 0.25 * s + 0.20 * q))
}

fn narrative(swing_score: u8) -> &'static str {
    match swing_score {
        85.. => "Efficient, repeatable motion. Polish the details and keep the tempo.",
        72..=84 => "Solid base with a couple of leaks. One focused fix will show up fast.",
        _ => "The motion is leaking speed and contact. Start with the priority fix below.",
    }
}

fn base_highlights(metrics: &MetricSet) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(frames) = metrics.number(METRIC_FRAMES_USED) {
        out.push(format!("{frames} frames analysed"));
    }
    if let Some(turn) = metrics.number(METRIC_SHOULDER_TURN) {
        out.push(format!("Shoulder turn {}%", (turn * 100.0).round()));
    }
    if let Some(pf) = metrics.number(METRIC_PRESSURE_FORWARD) {
        out.push(format!("Pressure forward at impact {}%", pf.round()));
    }
    out
}

/// Scores from motion proxies alone. Pure and deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeterministicScorer;

impl DeterministicScorer {
    pub fn scores(metrics: &MetricSet) -> Scores {
        let jitter = metrics.number(METRIC_JITTER_PROXY);

        let speed = metrics
            .number(METRIC_HANDS_PROXY)
            .map_or(DEFAULT_SPEED, |hp| band((hp - HANDS_PROXY_FLOOR) / HANDS_PROXY_SPAN));
        let efficiency =
            jitter.map_or(DEFAULT_EFFICIENCY, |j| band((JITTER_CEILING - j) / JITTER_SPAN));
        let power = (0.55 * f64::from(speed) + 0.45 * f64::from(efficiency)).round() as u8;
        let reliability = metrics
            .number(METRIC_OK_RATE)
            .map_or(DEFAULT_RELIABILITY, band);
        let consistency =
            jitter.map_or(DEFAULT_CONSISTENCY, |j| band(1.0 - (j - JITTER_FLOOR) / JITTER_SPAN));

        Scores {
            swing_score: mean(&[speed, efficiency, power, reliability, consistency]),
            speed,
            efficiency,
            power,
            reliability,
            consistency,
            grades: None,
        }
    }
}

impl BaseScorer for DeterministicScorer {
    fn score(&self, pose: &PoseSeries, metrics: &MetricSet) -> BaseReport {
        let scores = Self::scores(metrics);

        let mut extras = BTreeMap::new();
        extras.insert(
            "metricVocabulary".to_string(),
            serde_json::Value::from(METRIC_VOCABULARY_VERSION),
        );
        if let (Some(w), Some(h)) = (pose.width, pose.height) {
            extras.insert("videoWidth".to_string(), serde_json::Value::from(w));
            extras.insert("videoHeight".to_string(), serde_json::Value::from(h));
        }

        BaseReport {
            meta: BaseMeta {
                headline: HEADLINE.to_string(),
                player: PlayerProfile::default(),
                extras,
            },
            overview: Overview {
                narrative: narrative(scores.swing_score).to_string(),
                highlights: base_highlights(metrics),
                uncertainty_note: None,
            },
            scores,
            priority: Priority {
                key: None,
                label: NEUTRAL_PRIORITY_LABEL.to_string(),
                why_now: NEUTRAL_PRIORITY_WHY.to_string(),
                fix: None,
                avoid_list: Vec::new(),
            },
            faults: Vec::new(),
            power_leaks: Vec::new(),
            drills: Vec::new(),
            checkpoints: checkpoints::canonical(),
            practice_plan14: Vec::new(),
            clip_url: None,
        }
    }
}
