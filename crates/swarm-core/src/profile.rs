//! Device tiers.
//!
//! Every constant that differs between constrained (phone-class) and standard
//! hardware lives here, so the rest of the crate reads one profile instead of
//! branching on the tier itself.

/// Broad hardware class a profile was built for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceTier {
    Constrained,
    Standard,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DeviceProfile {
    pub tier: DeviceTier,
    /// Size of every particle buffer (`TOTAL`).
    pub total_particles: usize,
    pub base_point_size: f32,
    pub target_fps: f32,
    /// Default landmark detector confidence for well-lit scenes.
    pub detection_confidence: f32,
    /// Pixel stride used when sampling the text raster.
    pub text_stride: u32,
    /// Scene units spanned by half the text canvas width.
    pub text_scale: f32,
    /// Half-span of the per-axis velocity handed out on disperse.
    pub disperse_speed: f32,
    pub capture_width: u32,
    pub capture_height: u32,
}

impl DeviceProfile {
    pub fn constrained() -> Self {
        Self {
            tier: DeviceTier::Constrained,
            total_particles: 1200,
            base_point_size: 1.2,
            target_fps: 40.0,
            detection_confidence: 0.45,
            text_stride: 3,
            text_scale: 0.6 * 40.0,
            disperse_speed: 3.0,
            capture_width: 320,
            capture_height: 240,
        }
    }

    pub fn standard() -> Self {
        Self {
            tier: DeviceTier::Standard,
            total_particles: 4200,
            base_point_size: 1.8,
            target_fps: 50.0,
            detection_confidence: 0.55,
            text_stride: 2,
            text_scale: 0.8 * 40.0,
            disperse_speed: 4.0,
            capture_width: 640,
            capture_height: 480,
        }
    }

    /// Picks a tier from the available window width, treating anything at or
    /// below 720 logical pixels as constrained.
    pub fn for_window_width(width: u32) -> Self {
        if width <= 720 {
            Self::constrained()
        } else {
            Self::standard()
        }
    }

    pub fn with_total_particles(mut self, total: usize) -> Self {
        self.total_particles = total;
        self
    }

    pub fn is_constrained(&self) -> bool {
        self.tier == DeviceTier::Constrained
    }
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self::standard()
    }
}
