//! Capture quality gate.
//!
//! Decides whether an uploaded capture is usable before any biomechanical
//! inference runs. Rules are evaluated in a fixed order and each may add
//! one reason/instruction pair. Hints that were never supplied are treated
//! as "not a problem"; only explicit values trigger a rule.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Camera angle the player reports (or the uploader guessed).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AngleHint {
    FaceOn,
    DownTheLine,
    #[default]
    Unknown,
}

/// Optional hints describing the capture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaptureQualityInput {
    pub angle_hint: Option<AngleHint>,
    pub has_full_body: Option<bool>,
    pub has_club_visible: Option<bool>,
    pub has_feet_visible: Option<bool>,
    pub is_too_dark: Option<bool>,
    pub is_shaky: Option<bool>,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Overall verdict of the gate.
///
/// `Warn` is part of the output domain for soft-fail rules; none of the
/// current rules produce it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CaptureQuality {
    Pass,
    Warn,
    Fail,
}

/// Result of the gate. `reasons[i]` pairs with `instructions[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureCheck {
    pub quality: CaptureQuality,
    pub reasons: Vec<String>,
    pub instructions: Vec<String>,
    pub free_retry_eligible: bool,
}

impl CaptureCheck {
    pub fn is_fail(&self) -> bool {
        self.quality == CaptureQuality::Fail
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// One gate rule: a predicate plus the text shown when it fires.
struct CaptureRule {
    applies: fn(&CaptureQualityInput) -> bool,
    reason: &'static str,
    instruction: &'static str,
}

pub const REASON_FRAMING: &str = "The video cuts off key parts (feet/club).";
pub const INSTRUCTION_FRAMING: &str =
    "Frame the shot so feet + clubhead are visible the whole swing.";
pub const REASON_LIGHTING: &str = "Lighting is too dark to analyze reliably.";
pub const INSTRUCTION_LIGHTING: &str = "Add light or film outdoors / near a bright window.";
pub const REASON_STABILITY: &str = "Camera shake makes tracking unreliable.";
pub const INSTRUCTION_STABILITY: &str =
    "Use a tripod or lean the phone against something stable.";

fn framing_cut_off(i: &CaptureQualityInput) -> bool {
    i.has_feet_visible == Some(false) || i.has_club_visible == Some(false)
}

fn too_dark(i: &CaptureQualityInput) -> bool {
    i.is_too_dark == Some(true)
}

fn shaky(i: &CaptureQualityInput) -> bool {
    i.is_shaky == Some(true)
}

/// Evaluation order is the order of this table.
const CAPTURE_RULES: &[CaptureRule] = &[
    CaptureRule {
        applies: framing_cut_off,
        reason: REASON_FRAMING,
        instruction: INSTRUCTION_FRAMING,
    },
    CaptureRule {
        applies: too_dark,
        reason: REASON_LIGHTING,
        instruction: INSTRUCTION_LIGHTING,
    },
    CaptureRule {
        applies: shaky,
        reason: REASON_STABILITY,
        instruction: INSTRUCTION_STABILITY,
    },
];

/// Run the gate over a set of capture hints.
pub fn evaluate(input: &CaptureQualityInput) -> CaptureCheck {
    let mut reasons = Vec::new();
    let mut instructions = Vec::new();

    for rule in CAPTURE_RULES {
        if (rule.applies)(input) {
            reasons.push(rule.reason.to_string());
            instructions.push(rule.instruction.to_string());
        }
    }

    if reasons.is_empty() {
        CaptureCheck {
            quality: CaptureQuality::Pass,
            reasons,
            instructions,
            free_retry_eligible: false,
        }
    } else {
        CaptureCheck {
            quality: CaptureQuality::Fail,
            reasons,
            instructions,
            free_retry_eligible: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
