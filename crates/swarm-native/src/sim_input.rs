//! Stand-ins for camera capture and the landmark detector.
//!
//! The synthetic camera emits dim, noisy frames at a webcam-like rate so the
//! exposure loop has something to correct. The detector ignores pixels and
//! reports a hand built from the mouse position and the finger count picked
//! on the keyboard.

use glam::Vec3;
use image::{Rgba, RgbaImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use swarm_core::*;

const FRAME_INTERVAL: Duration = Duration::from_millis(33);
const FRAME_BASE: u8 = 28;
const FRAME_NOISE: u8 = 24;

/// Keyboard/mouse-driven hand, shared between the event loop and the detector.
#[derive(Clone, Copy, Debug)]
pub struct VirtualHand {
    pub visible: bool,
    pub fingers: u32,
    /// Normalized window position, y growing downward.
    pub x: f32,
    pub y: f32,
}

impl Default for VirtualHand {
    fn default() -> Self {
        Self {
            visible: false,
            fingers: 5,
            x: 0.5,
            y: 0.5,
        }
    }
}

pub type SharedHand = Arc<Mutex<VirtualHand>>;

pub struct SyntheticCamera {
    width: u32,
    height: u32,
    refuse: bool,
    running: bool,
    last: Option<Instant>,
    rng: StdRng,
}

impl SyntheticCamera {
    pub fn new(profile: &DeviceProfile, refuse: bool, seed: u64) -> Self {
        Self {
            width: profile.capture_width,
            height: profile.capture_height,
            refuse,
            running: false,
            last: None,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl FrameSource for SyntheticCamera {
    fn start(&mut self) -> Result<()> {
        if self.refuse {
            return Err(SwarmError::CameraUnavailable(
                "access refused (--deny-camera)".into(),
            ));
        }
        self.running = true;
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Option<RgbaImage>> {
        if !self.running {
            return Err(SwarmError::PipelineStopped);
        }
        if self.last.is_some_and(|t| t.elapsed() < FRAME_INTERVAL) {
            return Ok(None);
        }
        let rng = &mut self.rng;
        let frame = RgbaImage::from_fn(self.width, self.height, |_, _| {
            let v = FRAME_BASE + rng.gen_range(0..FRAME_NOISE);
            Rgba([v, v, v.saturating_add(4), 255])
        });
        self.last = Some(Instant::now());
        Ok(Some(frame))
    }

    fn stop(&mut self) {
        self.running = false;
    }
}

pub struct VirtualHandDetector {
    hand: SharedHand,
    options: Option<DetectorOptions>,
}

impl VirtualHandDetector {
    pub fn new(hand: SharedHand) -> Self {
        Self {
            hand,
            options: None,
        }
    }
}

impl HandDetector for VirtualHandDetector {
    fn configure(&mut self, options: &DetectorOptions) {
        log::info!(
            "[detector] confidence {:.2}/{:.2}, max hands {}",
            options.min_detection_confidence,
            options.min_tracking_confidence,
            options.max_hands
        );
        self.options = Some(*options);
    }

    fn detect(&mut self, _frame: &RgbaImage) -> Result<Option<HandFrame>> {
        let hand = *self
            .hand
            .lock()
            .map_err(|_| SwarmError::Detector("virtual hand lock poisoned".into()))?;
        if !hand.visible {
            return Ok(None);
        }
        // the pointer already moves like a mirror image
        let mirrored = self.options.map_or(true, |o| o.selfie_mode);
        let x = if mirrored { hand.x } else { 1.0 - hand.x };
        Ok(Some(virtual_landmarks(x, hand.y, hand.fingers)))
    }
}

/// 21 landmarks around `(x, y)` with `fingers` raised. Non-thumb fingers are
/// raised first; the thumb only joins at five.
pub fn virtual_landmarks(x: f32, y: f32, fingers: u32) -> HandFrame {
    let mut lm = vec![Vec3::new(x, y, -0.02); LANDMARK_COUNT];
    lm[WRIST] = Vec3::new(x, y + 0.15, 0.0);
    lm[THUMB_MCP] = Vec3::new(x - 0.05, y + 0.10, -0.01);
    lm[THUMB_TIP] = if fingers >= 5 {
        Vec3::new(x - 0.16, y + 0.02, -0.03)
    } else {
        Vec3::new(x - 0.04, y + 0.06, -0.03)
    };
    let pairs = [
        (INDEX_TIP, INDEX_PIP),
        (MIDDLE_TIP, MIDDLE_PIP),
        (RING_TIP, RING_PIP),
        (PINKY_TIP, PINKY_PIP),
    ];
    for (i, (tip, pip)) in pairs.into_iter().enumerate() {
        let fx = x - 0.03 + i as f32 * 0.025;
        lm[pip] = Vec3::new(fx, y - 0.04, -0.03);
        let raised = (i as u32) < fingers.min(4);
        lm[tip] = Vec3::new(fx, if raised { y - 0.14 } else { y + 0.02 }, -0.04);
    }
    HandFrame::new(lm)
}
