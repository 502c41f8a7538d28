use glam::Vec3;

// Shared simulation tuning constants used by the core and the native frontend.

// Particle motion
pub const MORPH_FACTOR: f32 = 0.12; // fraction of remaining distance covered per frame toward a target
pub const INACTIVE_PULL: f32 = 0.02; // pull of inactive particles toward the smoothed anchor
pub const ANCHOR_FOLLOW: f32 = 0.08; // shape anchor lag behind the commanded anchor
pub const DISPERSE_DAMPING: f32 = 0.996; // per-frame velocity decay while dispersed
pub const FRAME_BASELINE_HZ: f32 = 60.0; // velocities are expressed in units per 60 Hz frame
pub const DISPERSE_RESPAWN_DIST_SQ: f32 = 25_000.0; // ~158 units from the anchor
pub const DISPERSE_RESPAWN_CUBE: f32 = 160.0; // side of the respawn cube around the anchor
pub const SHORTFALL_CUBE: f32 = 80.0; // side of the cube used to pad short target lists
pub const MAX_FRAME_DT: f32 = 0.05; // render dt clamp (seconds)

// Initial scatter
pub const INITIAL_SCATTER_CUBE: f32 = 300.0;
pub const INITIAL_VELOCITY_SPAN: f32 = 0.7;
pub const PALETTE_HUE: (f32, f32) = (0.56, 0.68);
pub const PALETTE_SATURATION: (f32, f32) = (0.55, 0.80);
pub const PALETTE_LIGHTNESS: (f32, f32) = (0.45, 0.65);

// Planet formation
pub const PLANET_RADIUS: f32 = 18.0;
pub const RING_INNER: f32 = 26.0;
pub const RING_OUTER: f32 = 46.0;
pub const PLANET_SHARE_PCT: usize = 55; // percent of TOTAL sampled on the body
pub const RING_SHARE_PCT: usize = 45; // percent of TOTAL sampled on the ring
pub const BODY_RADIUS_JITTER: (f32, f32) = (0.86, 0.28); // r * (min + U * span)
pub const BODY_Z_SQUASH: (f32, f32) = (0.85, 0.30); // z * (min + U * span)
pub const RING_FLATTEN: f32 = 0.64; // ring ellipse ratio before tilt
pub const RING_TILT: f32 = 0.55; // radians about X
pub const RING_JITTER: [f32; 3] = [1.6, 0.6, 1.2]; // full jitter span per axis

// Text formation
pub const TEXT_CANVAS_W: u32 = 1024;
pub const TEXT_CANVAS_H: u32 = 256;
pub const FONT_SIZE_MAX: u32 = 220;
pub const FONT_SIZE_MIN: u32 = 56;
pub const FONT_SIZE_MIN_AT_LEN: usize = 40;
pub const TEXT_LIT_THRESHOLD: f32 = 200.0;
pub const TEXT_SHARE_CAP_PCT: usize = 80; // text never claims more than this percent of TOTAL
pub const TEXT_VERTICAL_RATIO: f32 = 0.35;
pub const TEXT_DEPTH_JITTER: f32 = 8.0;
pub const DEFAULT_TEXT_SAMPLE: &str = "SATURN";

// Performance control
pub const FPS_WINDOW: usize = 8;
pub const FPS_BAND_LOW: f32 = 8.0; // shrink below target - LOW
pub const FPS_BAND_HIGH: f32 = 6.0; // grow above target + HIGH
pub const ACTIVE_FLOOR_MIN: usize = 300;
pub const ACTIVE_FLOOR_PCT: usize = 20;
pub const SHRINK_COUNT: f32 = 0.86;
pub const SHRINK_SIZE: f32 = 0.94;
pub const GROW_COUNT: f32 = 1.10;
pub const GROW_SIZE: f32 = 1.06;
pub const MIN_POINT_SIZE: f32 = 0.5;

// Exposure
pub const SAMPLE_GRID_W: u32 = 160;
pub const SAMPLE_GRID_H: u32 = 120;
pub const SAMPLE_PIXEL_STRIDE: usize = 3; // every 3rd pixel of the grid
pub const LOW_PERCENTILE: f32 = 5.0;
pub const HIGH_PERCENTILE: f32 = 95.0;
pub const BRIGHTNESS_PIVOT: f32 = 120.0;
pub const BRIGHTNESS_SPAN: f32 = 80.0;
pub const BRIGHTNESS_RANGE: (f32, f32) = (0.8, 3.0);
pub const CONTRAST_PIVOT: f32 = 90.0;
pub const CONTRAST_SPAN: f32 = 120.0;
pub const CONTRAST_RANGE: (f32, f32) = (0.9, 2.5);
pub const BRIGHTNESS_SMOOTHING: f32 = 0.2;
pub const CONTRAST_SMOOTHING: f32 = 0.12;
pub const DARK_AVERAGE: f32 = 60.0;
pub const DARK_LOW_PERCENTILE: f32 = 20.0;
pub const DARK_CONFIDENCE: f32 = 0.35;
pub const APPLIED_BRIGHTNESS_RANGE: (f32, f32) = (0.6, 3.0);
pub const APPLIED_CONTRAST_RANGE: (f32, f32) = (0.7, 2.5);
pub const SATURATION_BOOST: f32 = 1.05;

// Gestures
pub const HOLD_FRAMES: u32 = 4;
pub const FINGER_MARGIN: f32 = 0.02;
pub const THUMB_WRIST_MIN: f32 = 0.06;
pub const THUMB_JOINT_MIN: f32 = 0.02;
pub const HAND_SCENE_HALF_EXTENT: f32 = 60.0;
pub const HAND_DEPTH_SCALE: f32 = 100.0;
pub const HAND_ANCHOR_PULL: f32 = 8.0; // formations sit this far behind the hand

// Scene view
pub const CAMERA_Z: f32 = 140.0;
pub const CAMERA_FOVY_DEG: f32 = 50.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 2000.0;
pub const SCENE_SPIN_PER_FRAME: f32 = 0.0009;

#[inline]
pub fn hand_anchor_offset() -> Vec3 {
    Vec3::new(0.0, 0.0, -HAND_ANCHOR_PULL)
}
