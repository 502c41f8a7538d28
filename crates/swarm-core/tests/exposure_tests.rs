// Auto-exposure: percentiles, multiplier smoothing, detector retuning.

mod common;

use image::{Rgba, RgbaImage};
use swarm_core::*;

fn flat_frame(w: u32, h: u32, v: u8) -> RgbaImage {
    RgbaImage::from_pixel(w, h, Rgba([v, v, v, 255]))
}

fn stats(low_p: f32, high_p: f32, average: f32) -> LuminanceStats {
    LuminanceStats {
        low_p,
        high_p,
        average,
    }
}

#[test]
fn percentile_nearest_rank() {
    let samples: Vec<f32> = (0..=100).rev().map(|v| v as f32).collect();
    assert_eq!(percentile(&samples, 0.0), 0.0);
    assert_eq!(percentile(&samples, 100.0), 100.0);
    assert_eq!(percentile(&samples, 5.0), 5.0);
    assert_eq!(percentile(&samples, 95.0), 95.0);
    // floor((n - 1) * p / 100) with n = 10
    let ten: Vec<f32> = (1..=10).map(|v| v as f32).collect();
    assert_eq!(percentile(&ten, 50.0), 5.0);
    assert_eq!(percentile(&ten, 95.0), 9.0);
}

#[test]
fn percentile_edges() {
    assert_eq!(percentile(&[], 50.0), 0.0);
    assert_eq!(percentile(&[7.0], 5.0), 7.0);
    assert_eq!(percentile(&[7.0], 95.0), 7.0);
}

#[test]
fn stats_flag_dark_scenes() {
    assert!(stats(10.0, 200.0, 120.0).is_dark());
    assert!(stats(30.0, 90.0, 50.0).is_dark());
    assert!(!stats(40.0, 220.0, 130.0).is_dark());
}

#[test]
fn targets_are_clamped() {
    assert_eq!(target_brightness(0.0), 2.5);
    assert_eq!(target_brightness(255.0), 0.8);
    assert_eq!(target_brightness(120.0), 1.0);
    assert_eq!(target_contrast(0.0, 0.0), 1.75);
    assert_eq!(target_contrast(0.0, 255.0), 0.9);
    assert_eq!(target_contrast(50.0, 50.0 + 90.0), 1.0);
}

#[test]
fn multipliers_smooth_toward_targets() {
    let profile = common::small_profile(1000);
    let mut ex = ExposureNormalizer::new(&profile);
    assert_eq!(ex.brightness(), 1.0);
    assert_eq!(ex.contrast(), 1.0);
    ex.update(&stats(0.0, 0.0, 100.0));
    assert!((ex.brightness() - (1.0 + (2.5 - 1.0) * 0.2)).abs() < 1e-5);
    assert!((ex.contrast() - (1.0 + (1.75 - 1.0) * 0.12)).abs() < 1e-5);
    for _ in 0..200 {
        ex.update(&stats(0.0, 0.0, 100.0));
    }
    assert!((ex.brightness() - 2.5).abs() < 1e-3);
    assert!((ex.contrast() - 1.75).abs() < 1e-3);
}

#[test]
fn dark_scene_lowers_confidence_and_recovers() {
    let profile = DeviceProfile::standard();
    let mut ex = ExposureNormalizer::new(&profile);
    assert_eq!(ex.detector_options().min_detection_confidence, 0.55);
    assert!(ex.update(&stats(5.0, 60.0, 30.0)));
    let dark = ex.detector_options();
    assert_eq!(dark.min_detection_confidence, 0.35);
    assert_eq!(dark.min_tracking_confidence, 0.35);
    assert_eq!(dark.max_hands, 1);
    assert!(!ex.update(&stats(5.0, 60.0, 30.0)));
    assert!(ex.update(&stats(60.0, 230.0, 140.0)));
    assert_eq!(ex.detector_options().min_detection_confidence, 0.55);

    let mut small = ExposureNormalizer::new(&DeviceProfile::constrained());
    small.update(&stats(60.0, 230.0, 140.0));
    assert_eq!(small.detector_options().min_detection_confidence, 0.45);
}

#[test]
fn sample_grid_is_strided() {
    let lum = sample_luminance(&flat_frame(640, 480, 100)).expect("sample");
    // every third cell of the 160x120 grid
    assert_eq!(lum.len(), 6400);
    assert!(lum.iter().all(|v| (v - 100.0).abs() < 0.5));
}

#[test]
fn empty_frame_is_an_error() {
    let err = sample_luminance(&RgbaImage::new(0, 0)).unwrap_err();
    assert!(matches!(err, SwarmError::EmptyFrame { .. }));
    assert!(!err.is_fatal());
}

#[test]
fn process_brightens_dark_frames() {
    let mut ex = ExposureNormalizer::new(&DeviceProfile::standard());
    let frame = flat_frame(320, 240, 50);
    let out = (0..10)
        .map(|_| ex.process(&frame).0)
        .last()
        .expect("processed frame");
    assert!(ex.brightness() > 1.5);
    assert_eq!(ex.detector_options().min_detection_confidence, 0.35);
    let Rgba([r, g, b, a]) = *out.get_pixel(10, 10);
    assert!(r > 50 && g > 50 && b > 50);
    assert_eq!(a, 255);
}

#[test]
fn process_survives_empty_frames() {
    let mut ex = ExposureNormalizer::new(&DeviceProfile::standard());
    let (out, changed) = ex.process(&RgbaImage::new(0, 0));
    assert!(!changed);
    assert_eq!(out.dimensions(), (0, 0));
    assert_eq!(ex.brightness(), 1.0);
}

#[test]
fn correction_uses_applied_clamps() {
    let ex = ExposureNormalizer::new(&DeviceProfile::standard());
    // neutral multipliers with a grey frame leave it close to unchanged
    let out = ex.correct(&flat_frame(4, 4, 128));
    let Rgba([r, _, _, _]) = *out.get_pixel(0, 0);
    assert!((r as i32 - 128).abs() <= 1);
}
