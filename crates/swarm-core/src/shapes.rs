//! Target point clouds for each formation.
//!
//! Everything here is stateless: callers pass a center, the particle budget and
//! an RNG, and get back an ordered list of points. The list length is never
//! guaranteed to match the budget, so callers pad or truncate (see
//! [`crate::particles::ParticleField::apply_targets`]).

use crate::constants::*;
use crate::profile::DeviceProfile;
use glam::Vec3;
use image::{GrayImage, Luma};
use rand::seq::SliceRandom;
use rand::Rng;
use std::f32::consts::TAU;

/// Geometry of the ringed planet.
#[derive(Clone, Copy, Debug)]
pub struct PlanetParams {
    pub planet_radius: f32,
    pub ring_inner: f32,
    pub ring_outer: f32,
}

impl Default for PlanetParams {
    fn default() -> Self {
        Self {
            planet_radius: PLANET_RADIUS,
            ring_inner: RING_INNER,
            ring_outer: RING_OUTER,
        }
    }
}

/// Uniform point in an axis-aligned cube of side `side` centered on `center`.
#[inline]
pub fn scatter_in_cube<R: Rng + ?Sized>(rng: &mut R, center: Vec3, side: f32) -> Vec3 {
    center
        + Vec3::new(
            (rng.gen::<f32>() - 0.5) * side,
            (rng.gen::<f32>() - 0.5) * side,
            (rng.gen::<f32>() - 0.5) * side,
        )
}

/// Radius of one body sample, jittered to `[0.86, 1.14] * radius`.
#[inline]
pub fn sample_body_radius<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> f32 {
    radius * (BODY_RADIUS_JITTER.0 + rng.gen::<f32>() * BODY_RADIUS_JITTER.1)
}

/// Point at distance `r` in an area-uniform direction (polar angle from
/// `acos(2v - 1)`), with z squashed.
pub fn body_offset<R: Rng + ?Sized>(rng: &mut R, r: f32) -> Vec3 {
    let theta = TAU * rng.gen::<f32>();
    let phi = (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
    let squash = BODY_Z_SQUASH.0 + rng.gen::<f32>() * BODY_Z_SQUASH.1;
    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos() * squash,
    )
}

/// Offset of one point on the planet body.
pub fn sample_body_offset<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec3 {
    let r = sample_body_radius(rng, radius);
    body_offset(rng, r)
}

/// Planar ring radius with density uniform in area across the annulus.
#[inline]
pub fn sample_ring_radius<R: Rng + ?Sized>(rng: &mut R, inner: f32, outer: f32) -> f32 {
    rng.gen::<f32>().sqrt() * (outer - inner) + inner
}

/// Places a ring sample of planar radius `radius` at `angle`, flattened,
/// tilted about X by [`RING_TILT`] and jittered.
pub fn ring_offset<R: Rng + ?Sized>(rng: &mut R, radius: f32, angle: f32) -> Vec3 {
    let (sin_t, cos_t) = RING_TILT.sin_cos();
    let x0 = radius * angle.cos();
    let y0 = radius * angle.sin() * RING_FLATTEN;
    Vec3::new(
        x0 + (rng.gen::<f32>() - 0.5) * RING_JITTER[0],
        y0 * cos_t + (rng.gen::<f32>() - 0.5) * RING_JITTER[1],
        y0 * sin_t + (rng.gen::<f32>() - 0.5) * RING_JITTER[2],
    )
}

/// Ringed planet around `center`: `floor(total * 0.55)` body points followed
/// by `floor(total * 0.45)` ring points.
pub fn planet_targets<R: Rng + ?Sized>(
    center: Vec3,
    total: usize,
    params: &PlanetParams,
    rng: &mut R,
) -> Vec<Vec3> {
    let planet_count = total * PLANET_SHARE_PCT / 100;
    let ring_count = total * RING_SHARE_PCT / 100;
    let mut list = Vec::with_capacity(planet_count + ring_count);
    for _ in 0..planet_count {
        list.push(center + sample_body_offset(rng, params.planet_radius));
    }
    for _ in 0..ring_count {
        let angle = rng.gen::<f32>() * TAU;
        let radius = sample_ring_radius(rng, params.ring_inner, params.ring_outer);
        list.push(center + ring_offset(rng, radius, angle));
    }
    list
}

/// Font size in pixels for `text`: 220 for a single character, falling
/// linearly to 56 at 40 characters and clamped there for longer strings.
pub fn font_size_for_text(text: &str) -> u32 {
    let len = text.chars().count().max(1);
    let clamped = len.min(FONT_SIZE_MIN_AT_LEN) as f32;
    let span = (FONT_SIZE_MAX - FONT_SIZE_MIN) as f32;
    let size = (FONT_SIZE_MAX as f32 - (clamped - 1.0) * span / (FONT_SIZE_MIN_AT_LEN - 1) as f32)
        .round() as u32;
    size.clamp(FONT_SIZE_MIN, FONT_SIZE_MAX)
}

/// Draws text onto an off-screen grayscale canvas.
///
/// Implementations render white glyphs on black, centered both ways; pixels
/// brighter than [`TEXT_LIT_THRESHOLD`] are treated as lit.
pub trait TextRasterizer {
    fn rasterize(&self, text: &str, font_size: u32, width: u32, height: u32) -> GrayImage;
}

/// Built-in 5x7 bitmap face scaled up to the requested font size.
#[derive(Clone, Copy, Debug, Default)]
pub struct BitmapFont;

impl BitmapFont {
    const COLS: u32 = 5;
    const ROWS: u32 = 7;
    // font size maps to ten glyph cells (seven rows plus leading)
    const EM_CELLS: f32 = 10.0;

    fn cell_px(font_size: u32) -> u32 {
        ((font_size as f32 / Self::EM_CELLS).round() as u32).max(1)
    }
}

impl TextRasterizer for BitmapFont {
    fn rasterize(&self, text: &str, font_size: u32, width: u32, height: u32) -> GrayImage {
        let mut canvas = GrayImage::new(width, height);
        let chars: Vec<char> = text.chars().map(|c| c.to_ascii_uppercase()).collect();
        if chars.is_empty() {
            return canvas;
        }
        let cell = Self::cell_px(font_size) as i64;
        let advance = (Self::COLS as i64 + 1) * cell;
        let text_w = chars.len() as i64 * advance - cell;
        let text_h = Self::ROWS as i64 * cell;
        let x0 = (width as i64 - text_w) / 2;
        let y0 = (height as i64 - text_h) / 2;

        for (ci, ch) in chars.iter().enumerate() {
            let glyph = glyph_5x7(*ch);
            let gx = x0 + ci as i64 * advance;
            for (row, bits) in glyph.iter().enumerate() {
                for col in 0..Self::COLS {
                    if (bits >> (Self::COLS - 1 - col)) & 1 == 0 {
                        continue;
                    }
                    let px0 = gx + col as i64 * cell;
                    let py0 = y0 + row as i64 * cell;
                    fill_cell(&mut canvas, px0, py0, cell);
                }
            }
        }
        canvas
    }
}

fn fill_cell(canvas: &mut GrayImage, x: i64, y: i64, size: i64) {
    let (w, h) = (canvas.width() as i64, canvas.height() as i64);
    for py in y.max(0)..(y + size).min(h) {
        for px in x.max(0)..(x + size).min(w) {
            canvas.put_pixel(px as u32, py as u32, Luma([255]));
        }
    }
}

/// Points sampled from a rasterized string.
#[derive(Clone, Debug)]
pub struct TextTargets {
    pub points: Vec<Vec3>,
    pub font_size: u32,
}

/// Rasterizes `text` and maps every lit pixel on the profile's stride grid to
/// an aspect-corrected offset from `center`.
///
/// At most `floor(total * 0.8)` points are returned; a denser raster is
/// shuffled and truncated.
pub fn text_targets<T, R>(
    center: Vec3,
    text: &str,
    total: usize,
    profile: &DeviceProfile,
    rasterizer: &T,
    rng: &mut R,
) -> TextTargets
where
    T: TextRasterizer + ?Sized,
    R: Rng + ?Sized,
{
    let font_size = font_size_for_text(text);
    let canvas = rasterizer.rasterize(text, font_size, TEXT_CANVAS_W, TEXT_CANVAS_H);
    let half_w = canvas.width() as f32 / 2.0;
    let half_h = canvas.height() as f32 / 2.0;
    let stride = profile.text_stride.max(1) as usize;
    let scale = profile.text_scale;

    let mut points = Vec::new();
    for y in (0..canvas.height()).step_by(stride) {
        for x in (0..canvas.width()).step_by(stride) {
            let Luma([bright]) = *canvas.get_pixel(x, y);
            if (bright as f32) <= TEXT_LIT_THRESHOLD {
                continue;
            }
            let nx = (x as f32 - half_w) / half_w;
            let ny = -(y as f32 - half_h) / half_h;
            points.push(Vec3::new(
                center.x + nx * scale,
                center.y + ny * scale * TEXT_VERTICAL_RATIO,
                center.z + (rng.gen::<f32>() - 0.5) * TEXT_DEPTH_JITTER,
            ));
        }
    }

    let cap = total * TEXT_SHARE_CAP_PCT / 100;
    if points.len() > cap {
        points.shuffle(rng);
        points.truncate(cap);
    }
    TextTargets { points, font_size }
}

fn glyph_5x7(c: char) -> [u8; 7] {
    match c {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b11111],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b10010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b10000, 0b11110, 0b00001, 0b00001, 0b11110],
        '6' => [0b01110, 0b10000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00001, 0b01110],
        '!' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
        '?' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b00000, 0b00100],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00100, 0b00100],
        ',' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00100, 0b00100, 0b01000],
        ':' => [0b00000, 0b00100, 0b00100, 0b00000, 0b00100, 0b00100, 0b00000],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        '+' => [0b00000, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0b00000],
        '/' => [0b00001, 0b00010, 0b00010, 0b00100, 0b01000, 0b01000, 0b10000],
        '\'' => [0b00100, 0b00100, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000],
        '&' => [0b01100, 0b10010, 0b10100, 0b01000, 0b10101, 0b10010, 0b01101],
        _ => [0; 7],
    }
}
