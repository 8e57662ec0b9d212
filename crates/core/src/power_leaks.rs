//! Power-leak ranking.
//!
//! Leaks are matched in rule-declaration order, not by severity. When no
//! rule matches, a fixed generic list is returned so the caller always has
//! something to show.

use serde::{Deserialize, Serialize};

use crate::faults::{Fault, HANDLE_SPEED_DROP_MAX, PRESSURE_FORWARD_MIN};
use crate::metrics::*;

/// Maximum number of leaks reported.
pub const MAX_POWER_LEAKS: usize = 3;

/// A ranked cause of lost efficiency, with one corrective action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerLeak {
    pub key: String,
    pub title: String,
    pub fix: String,
}

/// One declarative leak rule.
pub struct LeakRule {
    pub key: &'static str,
    pub title: &'static str,
    pub fix: &'static str,
    pub fires: fn(&MetricSet, &[Fault]) -> bool,
}

impl LeakRule {
    fn to_leak(&self) -> PowerLeak {
        PowerLeak {
            key: self.key.to_string(),
            title: self.title.to_string(),
            fix: self.fix.to_string(),
        }
    }
}

const FIX_PRESSURE: &str = "Step-through pressure shift";
const FIX_HANDLE: &str = "P6 check + turn-through";
const FIX_TRAIL_ARM: &str = "Trail-arm wall drill";
const TITLE_TRAIL_ARM: &str = "Trail arm spills early";

fn pressure_stall(m: &MetricSet, _: &[Fault]) -> bool {
    m.label(METRIC_PRESSURE_SHIFT) == Some(PRESSURE_SHIFT_LATE)
        || m.number(METRIC_PRESSURE_FORWARD).is_some_and(|pf| pf < PRESSURE_FORWARD_MIN)
}

fn handle_slow(m: &MetricSet, _: &[Fault]) -> bool {
    m.number(METRIC_HANDLE_SPEED_DROP)
        .is_some_and(|d| d > HANDLE_SPEED_DROP_MAX)
        || m.is_set(METRIC_FLIP_RISK)
}

fn trail_arm(m: &MetricSet, _: &[Fault]) -> bool {
    m.is_set(METRIC_TRAIL_ARM_COLLAPSE)
}

/// Sequencing, handle speed, arm structure.
pub const LEAK_RULES: &[LeakRule] = &[
    LeakRule {
        key: "pressure_stall",
        title: "Pressure stalls before P6",
        fix: FIX_PRESSURE,
        fires: pressure_stall,
    },
    LeakRule {
        key: "handle_slow",
        title: "Handle slows at impact",
        fix: FIX_HANDLE,
        fires: handle_slow,
    },
    LeakRule {
        key: "trail_arm",
        title: TITLE_TRAIL_ARM,
        fix: FIX_TRAIL_ARM,
        fires: trail_arm,
    },
];

/// Returned when no rule matches.
pub const FALLBACK_LEAKS: &[(&str, &str, &str)] = &[
    ("sequence", "Sequence stalls (pressure then turn)", FIX_PRESSURE),
    ("handle", "Handle slows through impact", FIX_HANDLE),
    ("trail_arm", TITLE_TRAIL_ARM, FIX_TRAIL_ARM),
];

/// Rank leaks with the built-in rules.
pub fn rank(metrics: &MetricSet, faults: &[Fault]) -> Vec<PowerLeak> {
    rank_with(LEAK_RULES, metrics, faults)
}

/// Rank leaks with a custom rule table. Output never exceeds
/// [`MAX_POWER_LEAKS`] entries.
pub fn rank_with(rules: &[LeakRule], metrics: &MetricSet, faults: &[Fault]) -> Vec<PowerLeak> {
    let mut leaks: Vec<PowerLeak> = rules
        .iter()
        .filter(|rule| (rule.fires)(metrics, faults))
        .map(LeakRule::to_leak)
        .collect();

    if leaks.is_empty() {
        leaks = FALLBACK_LEAKS
            .iter()
            .map(|(key, title, fix)| PowerLeak {
                key: key.to_string(),
                title: title.to_string(),
                fix: fix.to_string(),
            })
            .collect();
    }

    leaks.truncate(MAX_POWER_LEAKS);
    leaks
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
