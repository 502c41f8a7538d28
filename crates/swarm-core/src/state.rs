//! Visual-side state types shared with the native frontend.
//!
//! These types avoid referencing platform-specific APIs. The frontend consumes
//! them to build camera matrices and to pack particles for the GPU.

use crate::constants::*;
use glam::{Mat4, Vec3};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Scene camera looking at the origin from `+z`.
    pub fn scene(aspect: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, CAMERA_Z),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy_radians: CAMERA_FOVY_DEG.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }
}

/// Camera plus the slow spin applied to the whole point cloud.
#[derive(Clone, Debug)]
pub struct SceneView {
    pub camera: Camera,
    pub spin_y: f32,
}

impl SceneView {
    pub fn new(aspect: f32) -> Self {
        Self {
            camera: Camera::scene(aspect),
            spin_y: 0.0,
        }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.camera.aspect = aspect;
        }
    }

    /// One rendered frame of spin.
    pub fn advance(&mut self) {
        self.spin_y = (self.spin_y + SCENE_SPIN_PER_FRAME).rem_euclid(std::f32::consts::TAU);
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.spin_y)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.camera.projection_matrix() * self.camera.view_matrix() * self.model_matrix()
    }
}

/// GPU instance layout for one particle; matches `points.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointInstance {
    pub pos: [f32; 3],
    pub size: f32,
    pub color: [f32; 4],
}

impl PointInstance {
    pub fn new(pos: Vec3, color: [f32; 3], size: f32) -> Self {
        Self {
            pos: pos.to_array(),
            size,
            color: [color[0], color[1], color[2], 0.95],
        }
    }
}
