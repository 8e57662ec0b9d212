//! Report model and assembly.
//!
//! [`assemble`] merges the base scorer's skeleton with the fault/drill
//! pipeline output. Pipeline data wins wherever both sides carry the same
//! field, `meta` is the union of both (pipeline keys win), and the result is
//! checked against the structural contract before it is returned.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::checkpoints::{checkpoint_for_fault, Checkpoint, CheckpointStatus, CHECKPOINT_COUNT};
use crate::clock::Clock;
use crate::error::CoreError;
use crate::faults::{self, Confidence, Fault};
use crate::metrics::MetricSet;
use crate::power_leaks::PowerLeak;
use crate::types::{Handedness, Timestamp};

/// Version tag written into `meta.pipeline`.
pub const PIPELINE_VERSION: &str = "post-estimation-v1";

/// Length of the practice plan when there is something to practice.
pub const PRACTICE_PLAN_DAYS: u8 = 14;

/// Most faults turned into fix cards, in urgency order.
pub const TOP_FIX_LIMIT: usize = 3;
const TOP_FIX_DRILLS: usize = 2;

/// Score assumed for faults without a numeric severity when picking the
/// priority.
const UNSCORED_PRIORITY: u8 = 50;

const UNCERTAINTY_NOTE: &str =
    "Some findings rest on limited pose data. Re-film with the full body in frame for a firmer read.";

/// `meta` keys owned by typed fields; never taken from the extras maps.
const RESERVED_META_KEYS: &[&str] = &[
    "headline",
    "generatedAt",
    "playerName",
    "handedness",
    "eyeDominance",
    "hcp",
    "club",
    "fps",
    "frameCount",
    "sourceUrl",
    "pipeline",
];

// ---------------------------------------------------------------------------
// Report model
// ---------------------------------------------------------------------------

/// Player/session attributes echoed into `meta`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handedness: Option<Handedness>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eye_dominance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hcp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub club: Option<String>,
}

impl PlayerProfile {
    /// Copy every attribute `other` has over `self`.
    pub fn overlay(&mut self, other: &PlayerProfile) {
        if other.player_name.is_some() {
            self.player_name = other.player_name.clone();
        }
        if other.handedness.is_some() {
            self.handedness = other.handedness;
        }
        if other.eye_dominance.is_some() {
            self.eye_dominance = other.eye_dominance.clone();
        }
        if other.hcp.is_some() {
            self.hcp = other.hcp;
        }
        if other.club.is_some() {
            self.club = other.club.clone();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMeta {
    pub headline: String,
    pub generated_at: Timestamp,
    #[serde(flatten)]
    pub player: PlayerProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fps: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipeline: Option<String>,
    /// Open-ended base attributes.
    #[serde(flatten)]
    pub extras: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grades {
    pub overall: String,
    pub speed: String,
    pub efficiency: String,
    pub power: String,
    pub reliability: String,
    pub consistency: String,
}

/// Composite and per-dimension scores, 0..=100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scores {
    pub swing_score: u8,
    pub speed: u8,
    pub efficiency: u8,
    pub power: u8,
    pub reliability: u8,
    pub consistency: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grades: Option<Grades>,
}

impl Scores {
    fn dimensions(&self) -> [u8; 5] {
        [
            self.speed,
            self.efficiency,
            self.power,
            self.reliability,
            self.consistency,
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub narrative: String,
    pub highlights: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uncertainty_note: Option<String>,
}

/// The single most urgent fix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Priority {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub label: String,
    pub why_now: String,
    /// Swing thought for the priority fault.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<String>,
    pub avoid_list: Vec<String>,
}

/// A fault turned into something to practice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopFix {
    pub key: String,
    pub label: String,
    pub cue: String,
    pub drills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeDay {
    pub day: u8,
    pub focus: String,
    pub reps: String,
}

/// The canonical analysis result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub meta: ReportMeta,
    pub scores: Scores,
    pub overview: Overview,
    pub priority: Priority,
    pub top_fixes: Vec<TopFix>,
    pub metrics: MetricSet,
    pub faults: Vec<Fault>,
    pub power_leaks: Vec<PowerLeak>,
    pub drills: Vec<String>,
    pub checkpoints: Vec<Checkpoint>,
    pub practice_plan14: Vec<PracticeDay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clip_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Assembly inputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaseMeta {
    pub headline: String,
    pub player: PlayerProfile,
    pub extras: BTreeMap<String, serde_json::Value>,
}

/// Skeleton produced by a base scorer before fault-driven overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseReport {
    pub meta: BaseMeta,
    pub scores: Scores,
    pub overview: Overview,
    pub priority: Priority,
    pub faults: Vec<Fault>,
    pub power_leaks: Vec<PowerLeak>,
    pub drills: Vec<String>,
    pub checkpoints: Vec<Checkpoint>,
    pub practice_plan14: Vec<PracticeDay>,
    pub clip_url: Option<String>,
}

/// Output of the metric/fault/drill pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineOutput {
    pub metrics: MetricSet,
    pub faults: Vec<Fault>,
    pub power_leaks: Vec<PowerLeak>,
    pub drills: Vec<String>,
    pub efficiency: Option<u8>,
    /// Replaces the base highlights when present.
    pub highlights: Option<Vec<String>>,
}

/// Metadata the pipeline contributes to `meta`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineMeta {
    pub fps: f64,
    pub frame_count: usize,
    pub source_url: Option<String>,
    pub player: Option<PlayerProfile>,
    pub extras: BTreeMap<String, serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Faults ordered by urgency: lowest score first, unscored counting as 50.
/// Ties keep declaration order, so the first entry is the priority.
fn ranked(faults: &[Fault]) -> Vec<&Fault> {
    let mut out: Vec<&Fault> = faults.iter().collect();
    out.sort_by_key(|f| f.score.unwrap_or(UNSCORED_PRIORITY));
    out
}

/// Fix cards for the most urgent faults, capped at [`TOP_FIX_LIMIT`].
fn top_fixes(by_rank: &[&Fault]) -> Vec<TopFix> {
    by_rank
        .iter()
        .take(TOP_FIX_LIMIT)
        .map(|f| TopFix {
            key: f.key.clone(),
            label: f.label.clone(),
            cue: f.cue.clone(),
            drills: f.drills.iter().take(TOP_FIX_DRILLS).cloned().collect(),
        })
        .collect()
}

pub fn letter_grade(score: u8) -> &'static str {
    match score {
        90.. => "A",
        80..=89 => "B",
        70..=79 => "C",
        60..=69 => "D",
        _ => "F",
    }
}

fn grades_for(scores: &Scores) -> Grades {
    Grades {
        overall: letter_grade(scores.swing_score).to_string(),
        speed: letter_grade(scores.speed).to_string(),
        efficiency: letter_grade(scores.efficiency).to_string(),
        power: letter_grade(scores.power).to_string(),
        reliability: letter_grade(scores.reliability).to_string(),
        consistency: letter_grade(scores.consistency).to_string(),
    }
}

fn composite(scores: &Scores) -> u8 {
    let dims = scores.dimensions();
    let sum: u32 = dims.iter().map(|&d| u32::from(d)).sum();
    (f64::from(sum) / dims.len() as f64).round() as u8
}

/// Fourteen-day plan around the top one or two faults. Days 7 and 14 are
/// test days.
pub fn practice_plan(primary: &str, secondary: Option<&str>) -> Vec<PracticeDay> {
    (1..=PRACTICE_PLAN_DAYS)
        .map(|day| {
            let (focus, reps) = if day % 7 == 0 {
                (
                    "Test Day (film 2 swings + 10 balls)".to_string(),
                    "2 filmed swings, then 10 balls at 70% speed",
                )
            } else if day <= 5 {
                (
                    format!("Primary: {primary}"),
                    "10 reps drill A + 10 reps drill B + 8 balls",
                )
            } else if day <= 10 {
                let blend = match secondary {
                    Some(second) => format!("Blend: {primary} + {second}"),
                    None => format!("Blend: {primary} + tempo"),
                };
                (blend, "8 reps each drill + 12 balls")
            } else {
                (
                    "Performance: tempo + finish".to_string(),
                    "3-2-1 tempo for 8 balls + hold finish for 8 balls",
                )
            };
            PracticeDay {
                day,
                focus,
                reps: reps.to_string(),
            }
        })
        .collect()
}

fn mark_checkpoints(checkpoints: &mut [Checkpoint], faults: &[Fault], priority_key: Option<&str>) {
    for fault in faults {
        let Some(p) = checkpoint_for_fault(&fault.key) else {
            continue;
        };
        let is_priority = priority_key == Some(fault.key.as_str());
        for cp in checkpoints.iter_mut().filter(|cp| cp.p == p) {
            if is_priority {
                cp.status = CheckpointStatus::PriorityFix;
            } else if cp.status != CheckpointStatus::PriorityFix {
                cp.status = CheckpointStatus::NeedsAttention;
            }
        }
    }
}

fn merge_extras(
    base: BTreeMap<String, serde_json::Value>,
    pipeline: BTreeMap<String, serde_json::Value>,
) -> BTreeMap<String, serde_json::Value> {
    let mut out = base;
    out.extend(pipeline);
    out.retain(|k, _| !RESERVED_META_KEYS.contains(&k.as_str()));
    out
}

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

/// Structural checks every emitted report must pass.
pub fn validate(report: &Report) -> Result<(), CoreError> {
    if report.meta.headline.trim().is_empty() {
        return Err(CoreError::Contract("meta.headline is empty".into()));
    }

    if report.checkpoints.len() != CHECKPOINT_COUNT {
        return Err(CoreError::Contract(format!(
            "expected {CHECKPOINT_COUNT} checkpoints, got {}",
            report.checkpoints.len()
        )));
    }
    for (i, cp) in report.checkpoints.iter().enumerate() {
        if usize::from(cp.p) != i + 1 {
            return Err(CoreError::Contract(format!(
                "checkpoints must cover P1..P9 exactly once (position {} holds P{})",
                i + 1,
                cp.p
            )));
        }
    }

    let s = &report.scores;
    for (name, value) in [
        ("swingScore", s.swing_score),
        ("speed", s.speed),
        ("efficiency", s.efficiency),
        ("power", s.power),
        ("reliability", s.reliability),
        ("consistency", s.consistency),
    ] {
        if value > 100 {
            return Err(CoreError::Contract(format!("scores.{name} out of range: {value}")));
        }
    }
    if report.top_fixes.len() > TOP_FIX_LIMIT {
        return Err(CoreError::Contract(format!(
            "at most {TOP_FIX_LIMIT} top fixes, got {}",
            report.top_fixes.len()
        )));
    }
    if let Some(f) = report.faults.iter().find(|f| f.score.is_some_and(|v| v > 100)) {
        return Err(CoreError::Contract(format!("fault {} score out of range", f.key)));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Merge base scoring with pipeline output into a contract-checked report.
pub fn assemble(
    base: BaseReport,
    pipeline: PipelineOutput,
    meta: PipelineMeta,
    clock: &dyn Clock,
) -> Result<Report, CoreError> {
    let faults = pipeline.faults;
    let by_rank = ranked(&faults);
    let top = by_rank.first().copied();

    // Priority.
    let priority = match top {
        Some(f) => Priority {
            key: Some(f.key.clone()),
            label: f.label.clone(),
            why_now: f.meaning.clone(),
            fix: Some(f.cue.clone()),
            avoid_list: faults::avoid_list(&f.key)
                .iter()
                .map(|s| s.to_string())
                .collect(),
        },
        None => base.priority,
    };

    let top_fixes = top_fixes(&by_rank);

    // Checkpoints.
    let mut checkpoints = base.checkpoints;
    checkpoints.sort_by_key(|cp| cp.p);
    mark_checkpoints(&mut checkpoints, &faults, top.map(|f| f.key.as_str()));

    // Practice plan.
    let practice_plan14 = match top {
        Some(f) => practice_plan(&f.label, by_rank.get(1).map(|s| s.label.as_str())),
        None => Vec::new(),
    };

    // Overview.
    let mut overview = base.overview;
    if let Some(highlights) = pipeline.highlights {
        overview.highlights = highlights;
    }
    if faults.iter().any(|f| f.confidence == Confidence::Low) {
        overview.uncertainty_note = Some(UNCERTAINTY_NOTE.to_string());
    }

    // Scores.
    let mut scores = base.scores;
    if let Some(efficiency) = pipeline.efficiency {
        scores.efficiency = efficiency;
    }
    scores.swing_score = composite(&scores);
    scores.grades = Some(grades_for(&scores));

    // Meta.
    let mut player = base.meta.player;
    if let Some(p) = &meta.player {
        player.overlay(p);
    }
    let report_meta = ReportMeta {
        headline: base.meta.headline,
        generated_at: clock.now(),
        player,
        fps: Some(meta.fps),
        frame_count: Some(meta.frame_count),
        source_url: meta.source_url,
        pipeline: Some(PIPELINE_VERSION.to_string()),
        extras: merge_extras(base.meta.extras, meta.extras),
    };

    let report = Report {
        meta: report_meta,
        scores,
        overview,
        priority,
        top_fixes,
        metrics: pipeline.metrics,
        faults,
        power_leaks: pipeline.power_leaks,
        drills: pipeline.drills,
        checkpoints,
        practice_plan14,
        clip_url: base.clip_url,
    };

    validate(&report)?;
    Ok(report)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
