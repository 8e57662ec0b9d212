//! The nine canonical swing positions (P1..P9).

use serde::{Deserialize, Serialize};

use crate::drills::*;
use crate::faults::*;

/// Number of checkpoints every report carries.
pub const CHECKPOINT_COUNT: usize = 9;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckpointStatus {
    #[default]
    OnTrack,
    NeedsAttention,
    PriorityFix,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    pub p: u8,
    pub label: String,
    pub status: CheckpointStatus,
    pub coach_notes: String,
    pub common_misses: Vec<String>,
    pub key_drills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_url: Option<String>,
}

struct CheckpointTemplate {
    p: u8,
    label: &'static str,
    coach_notes: &'static str,
    common_misses: &'static [&'static str],
    key_drills: &'static [&'static str],
}

const CHECKPOINTS: [CheckpointTemplate; CHECKPOINT_COUNT] = [
    CheckpointTemplate {
        p: 1,
        label: "Setup (Grip/Posture)",
        coach_notes: "Neutral grip, hip hinge ~25°, pressure 55/45 (lead/trail).",
        common_misses: &["Ball position drifts by club", "Knees locked or over-flexed"],
        key_drills: &[DRILL_WALL_HIP_DEPTH],
    },
    CheckpointTemplate {
        p: 2,
        label: "Shaft Parallel - Backswing",
        coach_notes: "Face matches spine angle; club outside hands; one-piece takeaway.",
        common_misses: &["Early roll-in", "Whipping the club inside"],
        key_drills: &[DRILL_TEMPO_3_2_1],
    },
    CheckpointTemplate {
        p: 3,
        label: "Lead Arm Parallel - Backswing",
        coach_notes: "Lead wrist flat; trail elbow in front of the seam; pressure into trail midfoot.",
        common_misses: &["Pelvis slides off the trail foot", "Forearms over-rotate"],
        key_drills: &[DRILL_TRAIL_FOOT_POST, DRILL_CROSS_CHEST_TURN],
    },
    CheckpointTemplate {
        p: 4,
        label: "Top of Swing",
        coach_notes: "Complete turn; trail elbow ~90°; club not across the line.",
        common_misses: &["Trail elbow collapses", "Shoulders stop turning early"],
        key_drills: &[DRILL_TOWEL_TRAIL_ARM, DRILL_CROSS_CHEST_TURN],
    },
    CheckpointTemplate {
        p: 5,
        label: "Lead Arm Parallel - Downswing",
        coach_notes: "Pelvis, torso, arms, club. Pressure shifts forward quickly.",
        common_misses: &["Shoulders start the downswing", "Arms outrun the pivot"],
        key_drills: &[DRILL_HIP_EARLY_START, DRILL_TURTLE_HARE],
    },
    CheckpointTemplate {
        p: 6,
        label: "Shaft Parallel - Delivery",
        coach_notes: "Shaft under trail forearm; handle forward; pressure in the lead side.",
        common_misses: &["Pressure stuck on the trail side", "Hips thrust toward the ball"],
        key_drills: &[DRILL_PUMP_TO_P6, DRILL_STEP_TO_LEAD_SIDE],
    },
    CheckpointTemplate {
        p: 7,
        label: "Impact",
        coach_notes: "Forward shaft lean; ~80-90% lead side; chest slightly open.",
        common_misses: &["Handle stalls and the clubhead passes the hands", "Low point behind the ball"],
        key_drills: &[DRILL_IMPACT_BAG, DRILL_BRUSH_FORWARD_LINE],
    },
    CheckpointTemplate {
        p: 8,
        label: "Trail Arm Parallel - Follow-Through",
        coach_notes: "Arms extend; chest left of target; face square to arc.",
        common_misses: &["Chicken-wing lead arm", "Rotation stops after impact"],
        key_drills: &[DRILL_SPLIT_GRIP],
    },
    CheckpointTemplate {
        p: 9,
        label: "Finish",
        coach_notes: "Tall, balanced; belt buckle at target; full wrap.",
        common_misses: &["Back-foot spin-out", "Cannot hold the pose"],
        key_drills: &[DRILL_ROTATE_FINISH],
    },
];

/// All nine checkpoints in `p` order, every status `on_track`.
pub fn canonical() -> Vec<Checkpoint> {
    CHECKPOINTS
        .iter()
        .map(|t| Checkpoint {
            p: t.p,
            label: t.label.to_string(),
            status: CheckpointStatus::OnTrack,
            coach_notes: t.coach_notes.to_string(),
            common_misses: t.common_misses.iter().map(|s| s.to_string()).collect(),
            key_drills: t.key_drills.iter().map(|s| s.to_string()).collect(),
            youtube_url: None,
        })
        .collect()
}

/// Swing position where a fault shows up.
pub fn checkpoint_for_fault(fault_key: &str) -> Option<u8> {
    match fault_key {
        FAULT_LATE_PRESSURE_SHIFT | FAULT_EARLY_EXTENSION => Some(6),
        FAULT_FLIP_RISK => Some(7),
        FAULT_TRAIL_ARM_COLLAPSE | FAULT_LOW_TURN => Some(4),
        FAULT_LATE_HIPS => Some(5),
        FAULT_SWAY => Some(3),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_has_nine_in_order() {
        let cps = canonical();
        assert_eq!(cps.len(), CHECKPOINT_COUNT);
        let ps: Vec<u8> = cps.iter().map(|c| c.p).collect();
        assert_eq!(ps, (1..=9).collect::<Vec<u8>>());
        assert!(cps.iter().all(|c| c.status == CheckpointStatus::OnTrack));
    }

    #[test]
    fn key_drills_exist() {
        for cp in canonical() {
            for id in &cp.key_drills {
                assert!(drill(id).is_some(), "P{} references unknown drill {id}", cp.p);
            }
        }
    }

    #[test]
    fn every_fault_maps_to_a_position() {
        for rule in FAULT_RULES {
            assert!(checkpoint_for_fault(rule.key).is_some(), "{}", rule.key);
        }
        assert_eq!(checkpoint_for_fault("face_open"), None);
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(CheckpointStatus::PriorityFix).unwrap(),
            serde_json::json!("priority_fix")
        );
    }
}
