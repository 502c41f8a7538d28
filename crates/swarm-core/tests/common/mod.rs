// Shared fixtures for the core integration tests.

#![allow(dead_code)]

use glam::Vec3;
use swarm_core::*;

/// Small standard-tier profile so tests stay fast.
pub fn small_profile(total: usize) -> DeviceProfile {
    DeviceProfile::standard().with_total_particles(total)
}

/// Synthetic 21-point hand with `up` raised fingers. Non-thumb fingers are
/// raised first; the thumb only for `up >= 5`.
pub fn hand_with_fingers(up: u32) -> HandFrame {
    let mut lm = vec![Vec3::new(0.5, 0.6, -0.05); LANDMARK_COUNT];
    lm[WRIST] = Vec3::new(0.5, 0.8, 0.0);
    lm[THUMB_MCP] = Vec3::new(0.45, 0.7, -0.02);
    lm[THUMB_TIP] = if up >= 5 {
        Vec3::new(0.35, 0.62, -0.04)
    } else {
        Vec3::new(0.46, 0.66, -0.04)
    };
    let fingers = [
        (INDEX_TIP, INDEX_PIP),
        (MIDDLE_TIP, MIDDLE_PIP),
        (RING_TIP, RING_PIP),
        (PINKY_TIP, PINKY_PIP),
    ];
    for (i, (tip, pip)) in fingers.iter().enumerate() {
        lm[*pip] = Vec3::new(0.45 + i as f32 * 0.03, 0.55, -0.03);
        let raised = (i as u32) < up.min(4);
        lm[*tip] = Vec3::new(0.45 + i as f32 * 0.03, if raised { 0.45 } else { 0.62 }, -0.05);
    }
    HandFrame::new(lm)
}

/// Renderer stand-in that records what the core told it.
#[derive(Default)]
pub struct RecordingSink {
    pub uploads: usize,
    pub frames: usize,
    pub point_sizes: Vec<f32>,
    pub resizes: Vec<(u32, u32)>,
    pub last_positions: Vec<Vec3>,
}

impl RenderSink for RecordingSink {
    fn upload(&mut self, positions: &[Vec3], _colors: &[[f32; 3]], point_size: f32) {
        self.uploads += 1;
        self.point_sizes.push(point_size);
        self.last_positions = positions.to_vec();
    }

    fn positions_changed(&mut self, positions: &[Vec3], _view: &SceneView) {
        self.frames += 1;
        self.last_positions = positions.to_vec();
    }

    fn set_point_size(&mut self, size: f32) {
        self.point_sizes.push(size);
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.resizes.push((width, height));
    }
}
