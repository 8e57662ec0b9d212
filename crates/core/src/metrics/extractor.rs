//! Metric extraction from a landmark series.
//!
//! [`MetricExtractor`] is the contract the engine consumes. The default
//! [`LandmarkMetricExtractor`] derives the v1 vocabulary from 2D landmarks
//! of a face-on capture. Each metric is computed independently and only
//! inserted when the frames it needs carry usable landmarks, so partial
//! captures yield a partial metric set rather than guessed values.

use crate::pose::{Point, PoseFrame, PoseSeries, SideMap, CORE_LANDMARKS};
use crate::types::Handedness;

use super::*;

/// Converts a pose series into named metrics.
pub trait MetricExtractor: Send + Sync {
    fn extract(&self, pose: &PoseSeries, handedness: Handedness) -> MetricSet;
}

// ---------------------------------------------------------------------------
// Tunables
// ---------------------------------------------------------------------------

/// Minimum complete frames before swing phases are located.
pub const MIN_PHASE_FRAMES: usize = 8;
/// The top of the backswing is searched within this leading share of frames.
const TOP_SEARCH_SHARE: f64 = 0.75;
/// Transition (P5) sits this far between top and impact.
const TRANSITION_SHARE: f64 = 0.4;
/// Window used for the hand-speed and jitter proxies.
const PROXY_WINDOW: (f64, f64) = (0.45, 0.80);
/// Pressure below this at transition is a late shift.
const PRESSURE_LATE_BELOW: f64 = 50.0;
/// Pressure above this at transition is an early shift.
const PRESSURE_EARLY_ABOVE: f64 = 80.0;
/// Pelvis drift (share of hip width) that counts as a sway.
const SWAY_HIP_WIDTH_SHARE: f64 = 0.5;
/// Trail elbow angle (degrees) under which the arm has collapsed.
const TRAIL_ELBOW_COLLAPSE_DEG: f64 = 80.0;

const EPS: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Swing phases
// ---------------------------------------------------------------------------

/// Frame indices of the key swing positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwingPhases {
    pub address: usize,
    pub top: usize,
    pub transition: usize,
    pub impact: usize,
}

fn hands(frame: &PoseFrame, side: &SideMap) -> Option<Point> {
    Some(Point::midpoint(
        frame.point(side.lead_wrist)?,
        frame.point(side.trail_wrist)?,
    ))
}

fn pelvis(frame: &PoseFrame, side: &SideMap) -> Option<Point> {
    Some(Point::midpoint(
        frame.point(side.lead_hip)?,
        frame.point(side.trail_hip)?,
    ))
}

fn chest(frame: &PoseFrame, side: &SideMap) -> Option<Point> {
    Some(Point::midpoint(
        frame.point(side.lead_shoulder)?,
        frame.point(side.trail_shoulder)?,
    ))
}

fn span(frame: &PoseFrame, a: usize, b: usize) -> Option<f64> {
    Some(frame.point(a)?.distance(frame.point(b)?))
}

/// Locate address, top, transition and impact.
///
/// Address is the first complete frame, top the highest hands within the
/// leading share of the clip, impact the lowest hands after the top.
pub fn find_phases(frames: &[PoseFrame], side: &SideMap) -> Option<SwingPhases> {
    let complete: Vec<(usize, Point)> = frames
        .iter()
        .enumerate()
        .filter(|(_, f)| f.is_complete())
        .filter_map(|(i, f)| hands(f, side).map(|h| (i, h)))
        .collect();
    if complete.len() < MIN_PHASE_FRAMES {
        return None;
    }

    let address = complete[0].0;
    let limit = (frames.len() as f64 * TOP_SEARCH_SHARE).ceil() as usize;

    // First strictly-highest hands (smallest y).
    let mut top: Option<(usize, f64)> = None;
    for &(i, h) in complete.iter().filter(|(i, _)| *i < limit) {
        if top.map_or(true, |(_, y)| h.y < y) {
            top = Some((i, h.y));
        }
    }
    let top = top?.0;
    if top <= address {
        return None;
    }

    // First strictly-lowest hands after the top.
    let mut impact: Option<(usize, f64)> = None;
    for &(i, h) in complete.iter().filter(|(i, _)| *i > top) {
        if impact.map_or(true, |(_, y)| h.y > y) {
            impact = Some((i, h.y));
        }
    }
    let impact = impact?.0;

    let transition = top + ((impact - top) as f64 * TRANSITION_SHARE).round() as usize;

    Some(SwingPhases {
        address,
        top,
        transition,
        impact,
    })
}

// ---------------------------------------------------------------------------
// Individual metrics
// ---------------------------------------------------------------------------

fn proxy_window(n: usize) -> (usize, usize) {
    let i0 = (n as f64 * PROXY_WINDOW.0).floor() as usize;
    let i1 = ((n as f64 * PROXY_WINDOW.1).floor() as usize).min(n.saturating_sub(1));
    (i0, i1)
}

/// Mean combined wrist travel per frame in the proxy window.
fn hands_proxy(frames: &[PoseFrame], side: &SideMap) -> Option<f64> {
    let (i0, i1) = proxy_window(frames.len());
    let mut sum = 0.0;
    let mut used = 0usize;
    for i in (i0 + 1)..=i1 {
        let (prev, cur) = (&frames[i - 1], &frames[i]);
        let lead = prev
            .point(side.lead_wrist)
            .zip(cur.point(side.lead_wrist))
            .map(|(a, b)| a.distance(b));
        let trail = prev
            .point(side.trail_wrist)
            .zip(cur.point(side.trail_wrist))
            .map(|(a, b)| a.distance(b));
        if let (Some(l), Some(t)) = (lead, trail) {
            sum += l + t;
            used += 1;
        }
    }
    (used > 0).then(|| sum / used as f64)
}

/// Mean summed core-joint travel per frame in the proxy window.
fn jitter_proxy(frames: &[PoseFrame]) -> Option<f64> {
    let (i0, i1) = proxy_window(frames.len());
    let mut sum = 0.0;
    let mut used = 0usize;
    for i in (i0 + 1)..=i1 {
        let (prev, cur) = (&frames[i - 1], &frames[i]);
        if !prev.is_complete() || !cur.is_complete() {
            continue;
        }
        let travel: Option<f64> = CORE_LANDMARKS
            .iter()
            .map(|&k| Some(prev.point(k)?.distance(cur.point(k)?)))
            .sum();
        if let Some(t) = travel {
            sum += t;
            used += 1;
        }
    }
    (used > 0).then(|| sum / used as f64)
}

/// `+1.0` when the target lies towards increasing `x`, `-1.0` otherwise.
fn target_direction(frame: &PoseFrame, side: &SideMap) -> Option<f64> {
    let dx = match (frame.point(side.lead_ankle), frame.point(side.trail_ankle)) {
        (Some(lead), Some(trail)) => lead.x - trail.x,
        _ => frame.point(side.lead_hip)?.x - frame.point(side.trail_hip)?.x,
    };
    (dx.abs() > EPS).then(|| dx.signum())
}

/// Pelvis position between trail ankle (0) and lead ankle (100).
fn pressure_at(frame: &PoseFrame, side: &SideMap) -> Option<f64> {
    let lead = frame.point(side.lead_ankle)?;
    let trail = frame.point(side.trail_ankle)?;
    let width = lead.x - trail.x;
    if width.abs() < EPS {
        return None;
    }
    let hip = pelvis(frame, side)?;
    Some(((hip.x - trail.x) / width * 100.0).clamp(0.0, 100.0))
}

fn classify_pressure_shift(pressure: f64) -> &'static str {
    if pressure < PRESSURE_LATE_BELOW {
        PRESSURE_SHIFT_LATE
    } else if pressure > PRESSURE_EARLY_ABOVE {
        PRESSURE_SHIFT_EARLY
    } else {
        PRESSURE_SHIFT_ON_TIME
    }
}

/// `1 - span(top) / span(address)`, clamped to 0..1.
fn turn(frames: &[PoseFrame], ph: &SwingPhases, a: usize, b: usize) -> Option<f64> {
    let at_address = span(&frames[ph.address], a, b)?;
    let at_top = span(&frames[ph.top], a, b)?;
    if at_address < EPS {
        return None;
    }
    Some((1.0 - at_top / at_address).clamp(0.0, 1.0))
}

/// Index (absolute frame) of the fastest width change between top and impact.
fn peak_rotation_frame(frames: &[PoseFrame], ph: &SwingPhases, a: usize, b: usize) -> Option<usize> {
    let samples: Vec<(usize, f64)> = (ph.top..=ph.impact)
        .filter_map(|i| span(&frames[i], a, b).map(|w| (i, w)))
        .collect();
    if samples.len() < 3 {
        return None;
    }
    let mut best: Option<(usize, f64)> = None;
    for pair in samples.windows(2) {
        let velocity = (pair[1].1 - pair[0].1).abs();
        if best.map_or(true, |(_, v)| velocity > v) {
            best = Some((pair[1].0, velocity));
        }
    }
    best.map(|(i, _)| i)
}

fn seq_lead_frames(frames: &[PoseFrame], ph: &SwingPhases, side: &SideMap) -> Option<f64> {
    let hip = peak_rotation_frame(frames, ph, side.lead_hip, side.trail_hip)?;
    let shoulder = peak_rotation_frame(frames, ph, side.lead_shoulder, side.trail_shoulder)?;
    Some(shoulder as f64 - hip as f64)
}

fn sway(frames: &[PoseFrame], ph: &SwingPhases, side: &SideMap) -> Option<bool> {
    let address = &frames[ph.address];
    let dir = target_direction(address, side)?;
    let hip_width = span(address, side.lead_hip, side.trail_hip)?;
    let start = pelvis(address, side)?;
    let top = pelvis(&frames[ph.top], side)?;
    let drift_to_trail = (start.x - top.x) * dir;
    Some(drift_to_trail > SWAY_HIP_WIDTH_SHARE * hip_width)
}

/// Percent drop from the downswing peak hand speed to impact hand speed.
fn handle_speed_drop(frames: &[PoseFrame], ph: &SwingPhases, side: &SideMap) -> Option<f64> {
    let mut peak = 0.0f64;
    let mut at_impact = None;
    for i in (ph.top + 1)..=ph.impact {
        let step = hands(&frames[i - 1], side)
            .zip(hands(&frames[i], side))
            .map(|(a, b)| a.distance(b));
        if let Some(s) = step {
            peak = peak.max(s);
            if i == ph.impact {
                at_impact = Some(s);
            }
        }
    }
    let at_impact = at_impact?;
    if peak < EPS {
        return None;
    }
    Some(((peak - at_impact) / peak * 100.0).clamp(0.0, 100.0))
}

/// Hands trailing the pelvis at impact.
fn flip_risk(frames: &[PoseFrame], ph: &SwingPhases, side: &SideMap) -> Option<bool> {
    let dir = target_direction(&frames[ph.address], side)?;
    let impact = &frames[ph.impact];
    let h = hands(impact, side)?;
    let p = pelvis(impact, side)?;
    Some((h.x - p.x) * dir < 0.0)
}

fn angle_deg(vertex: Point, a: Point, b: Point) -> Option<f64> {
    let (ax, ay) = (a.x - vertex.x, a.y - vertex.y);
    let (bx, by) = (b.x - vertex.x, b.y - vertex.y);
    let norm = ax.hypot(ay) * bx.hypot(by);
    if norm < EPS {
        return None;
    }
    let cos = ((ax * bx + ay * by) / norm).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}

fn trail_arm_collapse(frames: &[PoseFrame], ph: &SwingPhases, side: &SideMap) -> Option<bool> {
    let top = &frames[ph.top];
    let angle = angle_deg(
        top.point(side.trail_elbow)?,
        top.point(side.trail_shoulder)?,
        top.point(side.trail_wrist)?,
    )?;
    Some(angle < TRAIL_ELBOW_COLLAPSE_DEG)
}

/// Pelvis rise between address and impact, in torso lengths (y grows down).
fn pelvis_rise(frames: &[PoseFrame], ph: &SwingPhases, side: &SideMap) -> Option<f64> {
    let address = &frames[ph.address];
    let hip_start = pelvis(address, side)?;
    let torso = chest(address, side)?.distance(hip_start);
    if torso < EPS {
        return None;
    }
    let hip_impact = pelvis(&frames[ph.impact], side)?;
    Some((hip_start.y - hip_impact.y) / torso)
}

// ---------------------------------------------------------------------------
// LandmarkMetricExtractor
// ---------------------------------------------------------------------------

/// Default extractor working on MediaPipe-style 2D landmarks.
#[derive(Debug, Clone, Copy, Default)]
pub struct LandmarkMetricExtractor;

impl MetricExtractor for LandmarkMetricExtractor {
    fn extract(&self, pose: &PoseSeries, handedness: Handedness) -> MetricSet {
        let frames = &pose.frames;
        let mut m = MetricSet::new();
        if frames.is_empty() {
            return m;
        }

        let side = SideMap::for_handedness(handedness);
        let frames_used = frames.iter().filter(|f| f.is_complete()).count();
        m.insert(METRIC_FRAMES_USED, frames_used as f64);
        m.insert(METRIC_OK_RATE, frames_used as f64 / frames.len() as f64);

        if let Some(v) = hands_proxy(frames, &side) {
            m.insert(METRIC_HANDS_PROXY, v);
        }
        if let Some(v) = jitter_proxy(frames) {
            m.insert(METRIC_JITTER_PROXY, v);
        }

        let Some(ph) = find_phases(frames, &side) else {
            return m;
        };

        let shoulder_turn = turn(frames, &ph, side.lead_shoulder, side.trail_shoulder);
        let hip_turn = turn(frames, &ph, side.lead_hip, side.trail_hip);
        if let Some(v) = shoulder_turn {
            m.insert(METRIC_SHOULDER_TURN, v);
        }
        if let Some(v) = hip_turn {
            m.insert(METRIC_HIP_TURN, v);
        }
        if let (Some(s), Some(h)) = (shoulder_turn, hip_turn) {
            m.insert(METRIC_SEPARATION, s - h);
        }
        if let Some(v) = seq_lead_frames(frames, &ph, &side) {
            m.insert(METRIC_SEQ_LEAD_FRAMES, v);
        }
        if let Some(v) = sway(frames, &ph, &side) {
            m.insert(METRIC_SWAY, v);
        }
        if let Some(v) = pressure_at(&frames[ph.impact], &side) {
            m.insert(METRIC_PRESSURE_FORWARD, v);
        }
        if let Some(v) = pressure_at(&frames[ph.transition], &side) {
            m.insert(METRIC_PRESSURE_SHIFT, classify_pressure_shift(v));
        }
        if let Some(v) = handle_speed_drop(frames, &ph, &side) {
            m.insert(METRIC_HANDLE_SPEED_DROP, v);
        }
        if let Some(v) = flip_risk(frames, &ph, &side) {
            m.insert(METRIC_FLIP_RISK, v);
        }
        if let Some(v) = trail_arm_collapse(frames, &ph, &side) {
            m.insert(METRIC_TRAIL_ARM_COLLAPSE, v);
        }
        if let Some(v) = pelvis_rise(frames, &ph, &side) {
            m.insert(METRIC_PELVIS_RISE, v);
        }

        m
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{synthetic_swing, SwingShape};

    fn extract(shape: SwingShape) -> MetricSet {
        LandmarkMetricExtractor.extract(&synthetic_swing(shape), Handedness::Right)
    }

    // -- phases ---------------------------------------------------------------

    #[test]
    fn finds_top_and_impact() {
        let pose = synthetic_swing(SwingShape::default());
        let side = SideMap::for_handedness(Handedness::Right);
        let ph = find_phases(&pose.frames, &side).unwrap();
        assert_eq!(ph.address, 0);
        assert_eq!(ph.top, 29);
        assert_eq!(ph.impact, 41);
        assert_eq!(ph.transition, 34);
    }

    #[test]
    fn too_few_frames_yield_no_phases() {
        let mut pose = synthetic_swing(SwingShape::default());
        pose.frames.truncate(MIN_PHASE_FRAMES - 1);
        let side = SideMap::for_handedness(Handedness::Right);
        assert!(find_phases(&pose.frames, &side).is_none());
    }

    // -- sound swing ----------------------------------------------------------

    #[test]
    fn sound_swing_metrics() {
        let m = extract(SwingShape::default());
        assert_eq!(m.number(METRIC_FRAMES_USED), Some(60.0));
        assert_eq!(m.number(METRIC_OK_RATE), Some(1.0));
        assert!((m.number(METRIC_PRESSURE_FORWARD).unwrap() - 80.0).abs() < 1e-6);
        assert_eq!(m.label(METRIC_PRESSURE_SHIFT), Some(PRESSURE_SHIFT_ON_TIME));
        assert!(m.number(METRIC_HANDLE_SPEED_DROP).unwrap() < 1.0);
        assert_eq!(m.flag(METRIC_FLIP_RISK), Some(false));
        assert_eq!(m.flag(METRIC_TRAIL_ARM_COLLAPSE), Some(false));
        assert_eq!(m.flag(METRIC_SWAY), Some(false));
        assert!(m.number(METRIC_SEQ_LEAD_FRAMES).unwrap() > 0.0);
        assert!((m.number(METRIC_SHOULDER_TURN).unwrap() - 0.55).abs() < 1e-6);
        assert!((m.number(METRIC_HIP_TURN).unwrap() - 0.30).abs() < 1e-6);
        assert!(m.number(METRIC_PELVIS_RISE).unwrap() < 0.06);
        assert!(m.number(METRIC_HANDS_PROXY).unwrap() > 0.0);
        assert!(m.number(METRIC_JITTER_PROXY).unwrap() > 0.0);
    }

    // -- faulty swings --------------------------------------------------------

    #[test]
    fn hips_late_swing() {
        let m = extract(SwingShape {
            hips_lead: false,
            ..Default::default()
        });
        assert!(m.number(METRIC_SEQ_LEAD_FRAMES).unwrap() < 0.0);
        assert_eq!(m.label(METRIC_PRESSURE_SHIFT), Some(PRESSURE_SHIFT_LATE));
    }

    #[test]
    fn stalled_pressure_reads_low() {
        let m = extract(SwingShape {
            impact_pressure: 50.0,
            ..Default::default()
        });
        assert!((m.number(METRIC_PRESSURE_FORWARD).unwrap() - 50.0).abs() < 1e-6);
    }

    #[test]
    fn decelerating_hands_drop_speed() {
        let m = extract(SwingShape {
            hands_decelerate: true,
            ..Default::default()
        });
        assert!(m.number(METRIC_HANDLE_SPEED_DROP).unwrap() > 12.0);
    }

    #[test]
    fn hands_behind_pelvis_is_flip_risk() {
        let m = extract(SwingShape {
            hands_behind_at_impact: true,
            ..Default::default()
        });
        assert_eq!(m.flag(METRIC_FLIP_RISK), Some(true));
    }

    #[test]
    fn folded_trail_elbow_is_collapse() {
        let m = extract(SwingShape {
            trail_elbow_at_top_deg: 60.0,
            ..Default::default()
        });
        assert_eq!(m.flag(METRIC_TRAIL_ARM_COLLAPSE), Some(true));
    }

    #[test]
    fn drifting_pelvis_is_sway() {
        let m = extract(SwingShape {
            sway: 0.06,
            ..Default::default()
        });
        assert_eq!(m.flag(METRIC_SWAY), Some(true));
    }

    #[test]
    fn standing_up_raises_pelvis() {
        let m = extract(SwingShape {
            pelvis_rise: 0.12,
            ..Default::default()
        });
        assert!((m.number(METRIC_PELVIS_RISE).unwrap() - 0.12).abs() < 1e-6);
    }

    #[test]
    fn left_handed_mirror_matches_right_handed() {
        let right = extract(SwingShape::default());
        let left = LandmarkMetricExtractor.extract(
            &crate::test_support::mirrored(&synthetic_swing(SwingShape::default())),
            Handedness::Left,
        );
        assert_eq!(
            right.flag(METRIC_FLIP_RISK),
            left.flag(METRIC_FLIP_RISK)
        );
        assert!(
            (right.number(METRIC_PRESSURE_FORWARD).unwrap()
                - left.number(METRIC_PRESSURE_FORWARD).unwrap())
            .abs()
                < 1e-6
        );
    }

    // -- partial data ---------------------------------------------------------

    #[test]
    fn missing_ankles_skip_pressure_metrics_only() {
        let mut pose = synthetic_swing(SwingShape::default());
        for f in &mut pose.frames {
            f.landmarks[crate::pose::LM_LEFT_ANKLE] = Default::default();
        }
        let m = LandmarkMetricExtractor.extract(&pose, Handedness::Right);
        assert!(m.get(METRIC_PRESSURE_FORWARD).is_none());
        assert!(m.get(METRIC_PRESSURE_SHIFT).is_none());
        assert!(m.get(METRIC_FLIP_RISK).is_some());
    }

    #[test]
    fn empty_series_yields_empty_set() {
        let m = LandmarkMetricExtractor.extract(&PoseSeries::default(), Handedness::Right);
        assert!(m.is_empty());
    }

    #[test]
    fn elbow_angle_of_right_angle() {
        let a = angle_deg(
            Point { x: 0.0, y: 0.0 },
            Point { x: 1.0, y: 0.0 },
            Point { x: 0.0, y: 1.0 },
        )
        .unwrap();
        assert!((a - 90.0).abs() < 1e-9);
    }
}
