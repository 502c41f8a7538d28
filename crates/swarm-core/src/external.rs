//! Narrow interfaces to the collaborators the core drives but does not own:
//! camera capture, the hand-landmark detector and the renderer.

use crate::error::Result;
use crate::exposure::DetectorOptions;
use crate::gesture::HandFrame;
use crate::state::SceneView;
use glam::Vec3;
use image::RgbaImage;

/// Delivers raw camera frames on demand.
pub trait FrameSource: Send {
    /// Acquires the device. Must fail with
    /// [`SwarmError::CameraUnavailable`](crate::SwarmError::CameraUnavailable)
    /// when permission is denied or no camera exists.
    fn start(&mut self) -> Result<()>;

    /// Next frame, or `None` when no new frame is ready yet.
    fn next_frame(&mut self) -> Result<Option<RgbaImage>>;

    fn stop(&mut self) {}
}

/// Finds at most one hand in an image.
pub trait HandDetector: Send {
    fn configure(&mut self, options: &DetectorOptions);

    fn detect(&mut self, frame: &RgbaImage) -> Result<Option<HandFrame>>;
}

/// Receives particle buffers and redraw notifications.
pub trait RenderSink {
    /// Initial upload of the full buffer set.
    fn upload(&mut self, positions: &[Vec3], colors: &[[f32; 3]], point_size: f32);

    /// Called once per render tick after integration.
    fn positions_changed(&mut self, positions: &[Vec3], view: &SceneView);

    fn set_point_size(&mut self, size: f32);

    fn resize(&mut self, width: u32, height: u32);
}
