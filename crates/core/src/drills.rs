//! Drill catalog and fault-to-drill selection.

use serde::Serialize;

use crate::faults::*;

/// A prescribed practice exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Drill {
    pub id: &'static str,
    pub title: &'static str,
    pub how: &'static str,
    pub why: &'static str,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

pub const DRILL_STEP_TO_LEAD_SIDE: &str = "step_to_lead_side";
pub const DRILL_PUMP_TO_P6: &str = "pump_to_p6";
pub const DRILL_IMPACT_BAG: &str = "impact_bag";
pub const DRILL_TOWEL_TRAIL_ARM: &str = "towel_trail_arm";
pub const DRILL_SPLIT_GRIP: &str = "split_grip";
pub const DRILL_CHAIR_BUTT_LINE: &str = "chair_butt_line";
pub const DRILL_WALL_HIP_DEPTH: &str = "wall_hip_depth";
pub const DRILL_TEMPO_3_2_1: &str = "tempo_3_2_1";
pub const DRILL_BRUSH_FORWARD_LINE: &str = "brush_forward_line";
pub const DRILL_ROTATE_FINISH: &str = "rotate_finish";
pub const DRILL_TRAIL_ARM_WALL: &str = "trail_arm_wall";
pub const DRILL_HIP_EARLY_START: &str = "hip_early_start";
pub const DRILL_TURTLE_HARE: &str = "turtle_hare";
pub const DRILL_CROSS_CHEST_TURN: &str = "cross_chest_turn";
pub const DRILL_TRAIL_FOOT_POST: &str = "trail_foot_post";

pub const DRILLS: &[Drill] = &[
    Drill {
        id: DRILL_STEP_TO_LEAD_SIDE,
        title: "Step-to-Lead-Side (timing)",
        how: "Make slow swings. As the club reaches the top, step into your lead foot before starting down. Then rotate through.",
        why: "Forces pressure shift before rotation so low point moves forward.",
    },
    Drill {
        id: DRILL_PUMP_TO_P6,
        title: "Pump to P6 (delivery)",
        how: "From the top, rehearse to lead-arm-parallel downswing (P5) and shaft-parallel downswing (P6), keeping chest turning. Do 5 reps then hit.",
        why: "Builds a repeatable slot + rotation pattern without throwing hands.",
    },
    Drill {
        id: DRILL_IMPACT_BAG,
        title: "Impact Bag (handle forward)",
        how: "Hit an impact bag with half-swings: hands ahead, chest turning, lead wrist flat. Freeze for 2 seconds.",
        why: "Trains forward shaft lean and stops the flip.",
    },
    Drill {
        id: DRILL_TOWEL_TRAIL_ARM,
        title: "Towel Under Trail Arm",
        how: "Place a towel under your trail armpit and make 10 slow swings keeping it from falling until P6.",
        why: "Keeps arms connected so the chest can control the delivery.",
    },
    Drill {
        id: DRILL_SPLIT_GRIP,
        title: "Split-Grip Swings",
        how: "Split your hands on the grip by 3-4 inches and make 8 smooth swings focusing on body rotation through.",
        why: "Reduces hand flip and teaches rotation-driven speed.",
    },
    Drill {
        id: DRILL_CHAIR_BUTT_LINE,
        title: "Chair Butt-Line (early extension)",
        how: "Set a chair lightly behind your hips at setup. Make slow swings keeping your hips from moving into the chair early.",
        why: "Trains pelvis depth so you don't stand up and lose space.",
    },
    Drill {
        id: DRILL_WALL_HIP_DEPTH,
        title: "Wall Hip-Depth Rehearsal",
        how: "Stand with rear end near a wall. Turn back and through without letting hips drift toward the ball.",
        why: "Teaches depth + rotation instead of thrust.",
    },
    Drill {
        id: DRILL_TEMPO_3_2_1,
        title: "3-2-1 Tempo",
        how: "Count '3' backswing, '2' transition, '1' downswing. Keep it smooth for 10 balls.",
        why: "Stabilizes sequencing and contact under pressure.",
    },
    Drill {
        id: DRILL_BRUSH_FORWARD_LINE,
        title: "Brush the Line (low point)",
        how: "Draw a line on turf. Make swings brushing the ground in front of the line, not behind it.",
        why: "Moves low point forward and improves compression.",
    },
    Drill {
        id: DRILL_ROTATE_FINISH,
        title: "Rotate to a Tall Finish",
        how: "Hit 8 shots finishing tall and posted on lead leg; belt buckle to target; hold the finish.",
        why: "Prevents stall + flip and improves speed transfer.",
    },
    Drill {
        id: DRILL_TRAIL_ARM_WALL,
        title: "Trail-Arm Wall Drill",
        how: "Stand with your trail side a forearm's length from a wall. Swing to the top without the trail elbow touching the wall.",
        why: "Keeps the trail arm in front of the chest and preserves width at the top.",
    },
    Drill {
        id: DRILL_HIP_EARLY_START,
        title: "Lead Hip Starts Before Arms Finish",
        how: "Swing to the top at 70% speed. Before the backswing finishes, feel the lead hip glide toward target while the arms stay up for a beat.",
        why: "Gets the pelvis unwinding before the shoulders so the sequence runs hips first.",
    },
    Drill {
        id: DRILL_TURTLE_HARE,
        title: "Turtle + Hare Transition",
        how: "Swing to lead-arm-parallel and pause. Bump the lead hip toward target, keep the arms quiet, then let them fall.",
        why: "Gives the body a head start over the arms in transition.",
    },
    Drill {
        id: DRILL_CROSS_CHEST_TURN,
        title: "Cross-Chest Turn",
        how: "Hold a club across your chest in posture. Turn until the grip end points past the ball, keeping the hips quieter than the chest.",
        why: "Builds shoulder turn and hip-shoulder separation without the arms taking over.",
    },
    Drill {
        id: DRILL_TRAIL_FOOT_POST,
        title: "Trail Foot Post",
        how: "Set an alignment stick outside your trail foot. Make backswings turning into the trail hip without touching the stick.",
        why: "Trains turning over the trail leg instead of sliding off it.",
    },
];

/// Look up a drill by id.
pub fn drill(id: &str) -> Option<&'static Drill> {
    DRILLS.iter().find(|d| d.id == id)
}

// ---------------------------------------------------------------------------
// Fault -> drills
// ---------------------------------------------------------------------------

/// Static drill list per fault key, most important first.
pub const FAULT_DRILLS: &[(&str, &[&str])] = &[
    (
        FAULT_LATE_PRESSURE_SHIFT,
        &[DRILL_STEP_TO_LEAD_SIDE, DRILL_BRUSH_FORWARD_LINE, DRILL_TEMPO_3_2_1],
    ),
    (
        FAULT_FLIP_RISK,
        &[DRILL_IMPACT_BAG, DRILL_SPLIT_GRIP, DRILL_ROTATE_FINISH],
    ),
    (
        FAULT_EARLY_EXTENSION,
        &[DRILL_CHAIR_BUTT_LINE, DRILL_WALL_HIP_DEPTH, DRILL_PUMP_TO_P6],
    ),
    (
        FAULT_TRAIL_ARM_COLLAPSE,
        &[DRILL_TOWEL_TRAIL_ARM, DRILL_TRAIL_ARM_WALL, DRILL_PUMP_TO_P6],
    ),
    (FAULT_LOW_TURN, &[DRILL_CROSS_CHEST_TURN, DRILL_TEMPO_3_2_1]),
    (
        FAULT_LATE_HIPS,
        &[DRILL_HIP_EARLY_START, DRILL_TURTLE_HARE, DRILL_STEP_TO_LEAD_SIDE],
    ),
    (FAULT_SWAY, &[DRILL_TRAIL_FOOT_POST, DRILL_WALL_HIP_DEPTH]),
];

/// Drills for one fault key; unknown keys have none.
pub fn drills_for(fault_key: &str) -> &'static [&'static str] {
    FAULT_DRILLS
        .iter()
        .find(|(key, _)| *key == fault_key)
        .map(|(_, drills)| *drills)
        .unwrap_or(&[])
}

/// Ordered, de-duplicated drills for a list of fault keys.
///
/// First occurrence wins. Unknown keys contribute nothing and an empty
/// input yields an empty list.
pub fn select_drills<S: AsRef<str>>(fault_keys: &[S]) -> Vec<&'static str> {
    let mut out: Vec<&'static str> = Vec::new();
    for key in fault_keys {
        for &id in drills_for(key.as_ref()) {
            if !out.contains(&id) {
                out.push(id);
            }
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
