//! Synthetic face-on swings for unit tests.
//!
//! 60 frames of a right-handed golfer, target towards `+x`:
//! address 0..=9, backswing 10..=29 (top at 29), downswing 30..=41
//! (impact at 41), follow-through 42..=59.

use crate::pose::*;

#[derive(Debug, Clone, Copy)]
pub struct SwingShape {
    /// Hips unwind before the shoulders.
    pub hips_lead: bool,
    /// Pelvis position between trail (0) and lead (100) ankle at impact.
    pub impact_pressure: f64,
    /// Hands slow down into impact.
    pub hands_decelerate: bool,
    pub hands_behind_at_impact: bool,
    pub trail_elbow_at_top_deg: f64,
    /// Pelvis drift towards the trail side at the top.
    pub sway: f64,
    /// Pelvis rise at impact, in torso lengths.
    pub pelvis_rise: f64,
}

impl Default for SwingShape {
    fn default() -> Self {
        Self {
            hips_lead: true,
            impact_pressure: 80.0,
            hands_decelerate: false,
            hands_behind_at_impact: false,
            trail_elbow_at_top_deg: 100.0,
            sway: 0.01,
            pelvis_rise: 0.02,
        }
    }
}

const FRAMES: usize = 60;
const TOP: usize = 29;
const IMPACT: usize = 41;

const TRAIL_ANKLE_X: f64 = 0.40;
const LEAD_ANKLE_X: f64 = 0.60;
const ANKLE_Y: f64 = 0.90;
const SHOULDER_Y: f64 = 0.30;
const HIP_Y: f64 = 0.55;
const TORSO: f64 = HIP_Y - SHOULDER_Y;
const SHOULDER_HALF: f64 = 0.09;
const HIP_HALF: f64 = 0.05;
const SHOULDER_TURN_AT_TOP: f64 = 0.55;
const HIP_TURN_AT_TOP: f64 = 0.30;
const HANDS_ADDRESS: Point = Point { x: 0.50, y: 0.62 };
const HANDS_TOP: Point = Point { x: 0.38, y: 0.22 };
const STRAIGHT_ARM_DEG: f64 = 170.0;

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn ease_in(t: f64) -> f64 {
    t * t
}

fn ease_out(t: f64) -> f64 {
    (t * std::f64::consts::FRAC_PI_2).sin()
}

/// Elbow placed so the shoulder-elbow-wrist angle equals `angle_deg`.
fn elbow(shoulder: Point, wrist: Point, angle_deg: f64) -> Point {
    let mid = Point::midpoint(shoulder, wrist);
    let (dx, dy) = (wrist.x - shoulder.x, wrist.y - shoulder.y);
    let len = dx.hypot(dy);
    let offset = (len / 2.0) / (angle_deg.to_radians() / 2.0).tan();
    Point {
        x: mid.x - dy / len * offset,
        y: mid.y + dx / len * offset,
    }
}

fn lm(p: Point) -> Landmark {
    Landmark {
        x: Some(p.x),
        y: Some(p.y),
        z: None,
        visibility: Some(0.99),
    }
}

struct Body {
    pelvis: Point,
    hip_half: f64,
    shoulder_half: f64,
    hands: Point,
    trail_elbow_deg: f64,
}

fn body_at(i: usize, s: &SwingShape) -> Body {
    let impact_pelvis = Point {
        x: lerp(TRAIL_ANKLE_X, LEAD_ANKLE_X, s.impact_pressure / 100.0),
        y: HIP_Y - s.pelvis_rise * TORSO,
    };
    let impact_hands = Point {
        x: if s.hands_behind_at_impact {
            impact_pelvis.x - 0.05
        } else {
            impact_pelvis.x + 0.03
        },
        y: HANDS_ADDRESS.y,
    };
    let top_pelvis = Point {
        x: 0.50 - s.sway,
        y: HIP_Y,
    };
    let top_hip_half = HIP_HALF * (1.0 - HIP_TURN_AT_TOP);
    let top_shoulder_half = SHOULDER_HALF * (1.0 - SHOULDER_TURN_AT_TOP);

    if i <= 9 {
        Body {
            pelvis: Point { x: 0.50, y: HIP_Y },
            hip_half: HIP_HALF,
            shoulder_half: SHOULDER_HALF,
            hands: HANDS_ADDRESS,
            trail_elbow_deg: STRAIGHT_ARM_DEG,
        }
    } else if i <= TOP {
        let b = (i - 9) as f64 / (TOP - 9) as f64;
        Body {
            pelvis: Point {
                x: lerp(0.50, top_pelvis.x, b),
                y: HIP_Y,
            },
            hip_half: lerp(HIP_HALF, top_hip_half, b),
            shoulder_half: lerp(SHOULDER_HALF, top_shoulder_half, b),
            hands: Point {
                x: lerp(HANDS_ADDRESS.x, HANDS_TOP.x, b),
                y: lerp(HANDS_ADDRESS.y, HANDS_TOP.y, b),
            },
            trail_elbow_deg: lerp(STRAIGHT_ARM_DEG, s.trail_elbow_at_top_deg, b),
        }
    } else if i <= IMPACT {
        let t = (i - TOP) as f64 / (IMPACT - TOP) as f64;
        let (hip_p, shoulder_p, shift_p) = if s.hips_lead {
            (ease_out(t), ease_in(t), ease_out(t))
        } else {
            (ease_in(t), ease_out(t), t * t * t)
        };
        let hand_p = if s.hands_decelerate {
            1.0 - (1.0 - t) * (1.0 - t)
        } else {
            ease_in(t)
        };
        Body {
            pelvis: Point {
                x: lerp(top_pelvis.x, impact_pelvis.x, shift_p),
                y: lerp(HIP_Y, impact_pelvis.y, t),
            },
            hip_half: lerp(top_hip_half, HIP_HALF, hip_p),
            shoulder_half: lerp(top_shoulder_half, SHOULDER_HALF, shoulder_p),
            hands: Point {
                x: lerp(HANDS_TOP.x, impact_hands.x, hand_p),
                y: lerp(HANDS_TOP.y, impact_hands.y, hand_p),
            },
            trail_elbow_deg: lerp(s.trail_elbow_at_top_deg, STRAIGHT_ARM_DEG, t),
        }
    } else {
        let f = (i - IMPACT) as f64 / (FRAMES - 1 - IMPACT) as f64;
        Body {
            pelvis: impact_pelvis,
            hip_half: HIP_HALF,
            shoulder_half: SHOULDER_HALF,
            hands: Point {
                x: impact_hands.x + 0.06 * f,
                y: impact_hands.y - 0.37 * f,
            },
            trail_elbow_deg: STRAIGHT_ARM_DEG,
        }
    }
}

fn frame_at(i: usize, s: &SwingShape) -> PoseFrame {
    let body = body_at(i, s);
    let mut landmarks = vec![Landmark::default(); 33];

    let l_shoulder = Point { x: 0.50 + body.shoulder_half, y: SHOULDER_Y };
    let r_shoulder = Point { x: 0.50 - body.shoulder_half, y: SHOULDER_Y };
    let l_wrist = Point { x: body.hands.x + 0.01, y: body.hands.y };
    let r_wrist = Point { x: body.hands.x - 0.01, y: body.hands.y };

    landmarks[LM_LEFT_SHOULDER] = lm(l_shoulder);
    landmarks[LM_RIGHT_SHOULDER] = lm(r_shoulder);
    landmarks[LM_LEFT_WRIST] = lm(l_wrist);
    landmarks[LM_RIGHT_WRIST] = lm(r_wrist);
    landmarks[LM_LEFT_ELBOW] = lm(elbow(l_shoulder, l_wrist, STRAIGHT_ARM_DEG));
    landmarks[LM_RIGHT_ELBOW] = lm(elbow(r_shoulder, r_wrist, body.trail_elbow_deg));
    landmarks[LM_LEFT_HIP] = lm(Point {
        x: body.pelvis.x + body.hip_half,
        y: body.pelvis.y,
    });
    landmarks[LM_RIGHT_HIP] = lm(Point {
        x: body.pelvis.x - body.hip_half,
        y: body.pelvis.y,
    });
    landmarks[LM_LEFT_ANKLE] = lm(Point { x: LEAD_ANKLE_X, y: ANKLE_Y });
    landmarks[LM_RIGHT_ANKLE] = lm(Point { x: TRAIL_ANKLE_X, y: ANKLE_Y });

    PoseFrame {
        t_ms: Some(i as f64 * 1000.0 / 30.0),
        landmarks,
    }
}

pub fn synthetic_swing(shape: SwingShape) -> PoseSeries {
    PoseSeries {
        fps: Some(30.0),
        width: Some(1080.0),
        height: Some(1920.0),
        frames: (0..FRAMES).map(|i| frame_at(i, &shape)).collect(),
        metrics: None,
    }
}

/// Mirror a right-handed capture into the equivalent left-handed one.
pub fn mirrored(pose: &PoseSeries) -> PoseSeries {
    const PAIRS: [(usize, usize); 5] = [
        (LM_LEFT_SHOULDER, LM_RIGHT_SHOULDER),
        (LM_LEFT_ELBOW, LM_RIGHT_ELBOW),
        (LM_LEFT_WRIST, LM_RIGHT_WRIST),
        (LM_LEFT_HIP, LM_RIGHT_HIP),
        (LM_LEFT_ANKLE, LM_RIGHT_ANKLE),
    ];
    let flip = |l: &Landmark| Landmark {
        x: l.x.map(|x| 1.0 - x),
        ..l.clone()
    };
    let mut out = pose.clone();
    for frame in &mut out.frames {
        let src = frame.landmarks.clone();
        for (l, r) in PAIRS {
            frame.landmarks[l] = flip(&src[r]);
            frame.landmarks[r] = flip(&src[l]);
        }
    }
    out
}
