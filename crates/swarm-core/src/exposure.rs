//! Percentile-based auto exposure for camera frames.
//!
//! Each camera frame is reduced to a small luminance sample; its 5th and 95th
//! percentiles drive smoothed brightness/contrast multipliers, and dark scenes
//! lower the landmark detector's confidence thresholds. The corrected frame is
//! what the detector sees.

use crate::constants::*;
use crate::error::{Result, SwarmError};
use crate::profile::DeviceProfile;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

/// Perceptual luminance (Rec. 709 weights) of an 8-bit RGB triple.
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> f32 {
    0.2126 * r as f32 + 0.7152 * g as f32 + 0.0722 * b as f32
}

/// Nearest-rank percentile: the value at `floor((n - 1) * p / 100)` of the
/// sorted sample. Returns 0 for an empty sample.
pub fn percentile(samples: &[f32], p: f32) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    percentile_sorted(&sorted, p)
}

fn percentile_sorted(sorted: &[f32], p: f32) -> f32 {
    let last = sorted.len() - 1;
    let idx = ((last as f32) * p / 100.0).floor().max(0.0) as usize;
    sorted[idx.min(last)]
}

/// Summary of one luminance sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LuminanceStats {
    pub low_p: f32,
    pub high_p: f32,
    pub average: f32,
}

impl LuminanceStats {
    pub fn from_samples(samples: &[f32]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        Some(Self {
            low_p: percentile_sorted(&sorted, LOW_PERCENTILE),
            high_p: percentile_sorted(&sorted, HIGH_PERCENTILE),
            average: sorted.iter().sum::<f32>() / sorted.len() as f32,
        })
    }

    pub fn is_dark(&self) -> bool {
        self.average < DARK_AVERAGE || self.low_p < DARK_LOW_PERCENTILE
    }
}

/// Downsamples `frame` to the sample grid and returns the luminance of every
/// [`SAMPLE_PIXEL_STRIDE`]th pixel.
pub fn sample_luminance(frame: &RgbaImage) -> Result<Vec<f32>> {
    if frame.width() == 0 || frame.height() == 0 {
        return Err(SwarmError::EmptyFrame {
            width: frame.width(),
            height: frame.height(),
        });
    }
    let grid = imageops::resize(frame, SAMPLE_GRID_W, SAMPLE_GRID_H, FilterType::Triangle);
    let lum: Vec<f32> = grid
        .pixels()
        .step_by(SAMPLE_PIXEL_STRIDE)
        .map(|Rgba([r, g, b, _])| luminance(*r, *g, *b))
        .collect();
    if lum.is_empty() {
        return Err(SwarmError::Sampling("sample grid produced no pixels".into()));
    }
    Ok(lum)
}

pub fn target_brightness(low_p: f32) -> f32 {
    (1.0 + (BRIGHTNESS_PIVOT - low_p) / BRIGHTNESS_SPAN)
        .clamp(BRIGHTNESS_RANGE.0, BRIGHTNESS_RANGE.1)
}

pub fn target_contrast(low_p: f32, high_p: f32) -> f32 {
    (1.0 + (CONTRAST_PIVOT - (high_p - low_p)) / CONTRAST_SPAN)
        .clamp(CONTRAST_RANGE.0, CONTRAST_RANGE.1)
}

/// Configuration handed to the hand-landmark detector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectorOptions {
    pub min_detection_confidence: f32,
    pub min_tracking_confidence: f32,
    pub max_hands: u8,
    pub selfie_mode: bool,
}

impl DetectorOptions {
    pub fn for_profile(profile: &DeviceProfile) -> Self {
        Self {
            min_detection_confidence: profile.detection_confidence,
            min_tracking_confidence: profile.detection_confidence,
            max_hands: 1,
            selfie_mode: true,
        }
    }

    fn with_confidence(self, confidence: f32) -> Self {
        Self {
            min_detection_confidence: confidence,
            min_tracking_confidence: confidence,
            ..self
        }
    }
}

#[derive(Clone, Debug)]
pub struct ExposureNormalizer {
    brightness: f32,
    contrast: f32,
    default_confidence: f32,
    options: DetectorOptions,
}

impl ExposureNormalizer {
    pub fn new(profile: &DeviceProfile) -> Self {
        Self {
            brightness: 1.0,
            contrast: 1.0,
            default_confidence: profile.detection_confidence,
            options: DetectorOptions::for_profile(profile),
        }
    }

    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    pub fn contrast(&self) -> f32 {
        self.contrast
    }

    pub fn detector_options(&self) -> DetectorOptions {
        self.options
    }

    /// Smooths the multipliers toward the targets implied by `stats` and
    /// retunes detector confidence. Returns `true` when the detector options
    /// changed and should be pushed to the detector.
    pub fn update(&mut self, stats: &LuminanceStats) -> bool {
        let tb = target_brightness(stats.low_p);
        let tc = target_contrast(stats.low_p, stats.high_p);
        self.brightness += (tb - self.brightness) * BRIGHTNESS_SMOOTHING;
        self.contrast += (tc - self.contrast) * CONTRAST_SMOOTHING;

        let confidence = if stats.is_dark() {
            DARK_CONFIDENCE
        } else {
            self.default_confidence
        };
        let next = self.options.with_confidence(confidence);
        let changed = next != self.options;
        if changed {
            log::debug!(
                "[exposure] low={:.0} high={:.0} avg={:.0} -> confidence {:.2}",
                stats.low_p,
                stats.high_p,
                stats.average,
                confidence
            );
        }
        self.options = next;
        changed
    }

    /// Samples `frame` and updates the multipliers from it.
    pub fn observe(&mut self, frame: &RgbaImage) -> Result<(LuminanceStats, bool)> {
        let lum = sample_luminance(frame)?;
        let stats = LuminanceStats::from_samples(&lum)
            .ok_or_else(|| SwarmError::Sampling("empty luminance sample".into()))?;
        let changed = self.update(&stats);
        Ok((stats, changed))
    }

    /// Applies the current brightness, contrast and a fixed saturation boost.
    pub fn correct(&self, frame: &RgbaImage) -> RgbaImage {
        let b = self
            .brightness
            .clamp(APPLIED_BRIGHTNESS_RANGE.0, APPLIED_BRIGHTNESS_RANGE.1);
        let c = self
            .contrast
            .clamp(APPLIED_CONTRAST_RANGE.0, APPLIED_CONTRAST_RANGE.1);
        let mut out = frame.clone();
        for px in out.pixels_mut() {
            let Rgba([r, g, bl, a]) = *px;
            let rgb = [r, g, bl].map(|v| {
                let v = (v as f32 / 255.0 * b).clamp(0.0, 1.0);
                ((v - 0.5) * c + 0.5).clamp(0.0, 1.0)
            });
            let [r, g, bl] = saturate(rgb, SATURATION_BOOST);
            *px = Rgba([to_u8(r), to_u8(g), to_u8(bl), a]);
        }
        out
    }

    /// Full per-frame step: observe then correct. Sampling failures are logged
    /// and the previous multipliers are reused, so a frame is always produced.
    pub fn process(&mut self, frame: &RgbaImage) -> (RgbaImage, bool) {
        let changed = match self.observe(frame) {
            Ok((_, changed)) => changed,
            Err(e) => {
                log::warn!("[exposure] keeping previous multipliers: {e}");
                false
            }
        };
        (self.correct(frame), changed)
    }
}

// Luminance-preserving saturation matrix (same weights as CSS `saturate()`).
fn saturate([r, g, b]: [f32; 3], s: f32) -> [f32; 3] {
    [
        (0.213 + 0.787 * s) * r + (0.715 - 0.715 * s) * g + (0.072 - 0.072 * s) * b,
        (0.213 - 0.213 * s) * r + (0.715 + 0.285 * s) * g + (0.072 - 0.072 * s) * b,
        (0.213 - 0.213 * s) * r + (0.715 - 0.715 * s) * g + (0.072 + 0.928 * s) * b,
    ]
    .map(|v| v.clamp(0.0, 1.0))
}

#[inline]
fn to_u8(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}
