//! Hand gestures from per-frame landmarks.
//!
//! Raw per-frame classification is noisy, so a gesture only becomes a
//! command after it has been seen on [`HOLD_FRAMES`] consecutive detected
//! frames. Losing the hand resets the hold.

use crate::constants::*;
use crate::particles::FormationCommand;
use glam::Vec3;

// Landmark indices (21-point hand model)
pub const WRIST: usize = 0;
pub const THUMB_MCP: usize = 2;
pub const THUMB_TIP: usize = 4;
pub const INDEX_PIP: usize = 6;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_TIP: usize = 12;
pub const RING_PIP: usize = 14;
pub const RING_TIP: usize = 16;
pub const PINKY_PIP: usize = 18;
pub const PINKY_TIP: usize = 20;
pub const LANDMARK_COUNT: usize = 21;

const FINGERS: [(usize, usize); 4] = [
    (INDEX_TIP, INDEX_PIP),
    (MIDDLE_TIP, MIDDLE_PIP),
    (RING_TIP, RING_PIP),
    (PINKY_TIP, PINKY_PIP),
];

/// One detected hand: normalized landmarks with x, y in `[0, 1]` (y grows
/// downward) and z as relative depth.
#[derive(Clone, Debug, PartialEq)]
pub struct HandFrame {
    pub landmarks: Vec<Vec3>,
}

impl HandFrame {
    pub fn new(landmarks: Vec<Vec3>) -> Self {
        Self { landmarks }
    }

    pub fn is_complete(&self) -> bool {
        self.landmarks.len() >= LANDMARK_COUNT
    }

    /// Mean of all landmarks, or `None` for an empty frame.
    pub fn centroid(&self) -> Option<Vec3> {
        if self.landmarks.is_empty() {
            return None;
        }
        let sum: Vec3 = self.landmarks.iter().copied().sum();
        Some(sum / self.landmarks.len() as f32)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gesture {
    Fist,
    Two,
    Palm,
    Unknown,
}

impl Gesture {
    pub fn from_finger_count(count: u32) -> Self {
        match count {
            0 | 1 => Gesture::Fist,
            2 => Gesture::Two,
            3 => Gesture::Unknown,
            _ => Gesture::Palm,
        }
    }

    /// Formation this gesture commits to once held, anchored at `anchor`.
    pub fn command(self, anchor: Vec3, text: &str) -> Option<FormationCommand> {
        match self {
            Gesture::Fist => Some(FormationCommand::Planet { anchor }),
            Gesture::Palm => Some(FormationCommand::Disperse),
            Gesture::Two => Some(FormationCommand::Text {
                anchor,
                text: text.to_string(),
            }),
            Gesture::Unknown => None,
        }
    }
}

/// Empirical thresholds for finger counting and debounce.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureConfig {
    /// How far above its PIP joint a fingertip must sit to count as raised.
    pub finger_margin: f32,
    pub thumb_wrist_min: f32,
    pub thumb_joint_min: f32,
    pub hold_frames: u32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            finger_margin: FINGER_MARGIN,
            thumb_wrist_min: THUMB_WRIST_MIN,
            thumb_joint_min: THUMB_JOINT_MIN,
            hold_frames: HOLD_FRAMES,
        }
    }
}

/// Counts raised fingers. Non-thumb fingers use a vertical tip-above-PIP
/// test; the thumb counts when it sits laterally away from both the wrist
/// and its own MCP joint. Incomplete frames count as zero.
pub fn count_fingers_up(hand: &HandFrame, config: &GestureConfig) -> u32 {
    if !hand.is_complete() {
        return 0;
    }
    let lm = &hand.landmarks;
    let mut count = FINGERS
        .iter()
        .filter(|(tip, pip)| lm[*tip].y < lm[*pip].y - config.finger_margin)
        .count() as u32;

    let thumb_tip = lm[THUMB_TIP];
    let lateral_joint = (thumb_tip.x - lm[THUMB_MCP].x).abs();
    let lateral_wrist = (thumb_tip.x - lm[WRIST].x).abs();
    if lateral_wrist > config.thumb_wrist_min && lateral_joint > config.thumb_joint_min {
        count += 1;
    }
    count
}

/// Maps a normalized hand position into scene units: x and y span roughly
/// ±60 (x widened by the view aspect), z is depth scaled by 100.
pub fn hand_to_scene(normalized: Vec3, aspect: f32) -> Vec3 {
    Vec3::new(
        (normalized.x - 0.5) * 2.0 * aspect * HAND_SCENE_HALF_EXTENT,
        (0.5 - normalized.y) * 2.0 * HAND_SCENE_HALF_EXTENT,
        normalized.z * HAND_DEPTH_SCALE,
    )
}

/// What one detector result produced.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GestureOutput {
    /// Live hand position in scene units, pulled toward the camera.
    pub anchor: Option<Vec3>,
    pub gesture: Option<Gesture>,
    /// Set on the single frame a held gesture commits.
    pub triggered: Option<Gesture>,
}

#[derive(Clone, Debug)]
pub struct GestureRecognizer {
    config: GestureConfig,
    aspect: f32,
    last: Option<Gesture>,
    hold: u32,
}

impl GestureRecognizer {
    pub fn new(config: GestureConfig, aspect: f32) -> Self {
        Self {
            config,
            aspect,
            last: None,
            hold: 0,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn last_gesture(&self) -> Option<Gesture> {
        self.last
    }

    pub fn hold_count(&self) -> u32 {
        self.hold
    }

    pub fn reset(&mut self) {
        self.last = None;
        self.hold = 0;
    }

    /// Feeds the debounce filter with one label. Returns the gesture on the
    /// exact frame its hold reaches the threshold; `Unknown` never commits.
    pub fn push_label(&mut self, gesture: Gesture) -> Option<Gesture> {
        if self.last == Some(gesture) {
            self.hold = self.hold.saturating_add(1);
        } else {
            self.last = Some(gesture);
            self.hold = 1;
        }
        (self.hold == self.config.hold_frames && gesture != Gesture::Unknown).then_some(gesture)
    }

    pub fn observe(&mut self, hand: Option<&HandFrame>) -> GestureOutput {
        let Some((hand, centroid)) = hand.and_then(|h| h.centroid().map(|c| (h, c))) else {
            self.reset();
            return GestureOutput::default();
        };
        let anchor = hand_to_scene(centroid, self.aspect) + hand_anchor_offset();
        let gesture = Gesture::from_finger_count(count_fingers_up(hand, &self.config));
        let triggered = self.push_label(gesture);
        if let Some(g) = triggered {
            log::info!("[gesture] {:?} held for {} frames", g, self.hold);
        }
        GestureOutput {
            anchor: Some(anchor),
            gesture: Some(gesture),
            triggered,
        }
    }
}
