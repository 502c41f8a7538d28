use crate::constants::*;
use crate::external::RenderSink;
use crate::gesture::{GestureConfig, GestureOutput, GestureRecognizer, HandFrame};
use crate::particles::{Formation, FormationCommand, ParticleField};
use crate::performance::{Adjustment, FpsMeter, PerformanceController};
use crate::pipeline::Detection;
use crate::profile::DeviceProfile;
use crate::state::SceneView;
use glam::Vec3;
use instant::Instant;
use std::sync::mpsc::Receiver;

/// Measures render dt, clamped to [`MAX_FRAME_DT`].
#[derive(Clone, Debug)]
pub struct FrameClock {
    last: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = (now - self.last).as_secs_f32();
        self.last = now;
        dt.min(MAX_FRAME_DT)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// The simulation owner: particle field, performance loop, gesture state and
/// the command surface, driven by render ticks and detector results.
pub struct Simulation {
    profile: DeviceProfile,
    field: ParticleField,
    perf: PerformanceController,
    fps: FpsMeter,
    recognizer: GestureRecognizer,
    view: SceneView,
    text_sample: String,
    last_seq: u64,
}

impl Simulation {
    pub fn new(profile: DeviceProfile, text_sample: &str, seed: u64) -> Self {
        Self::with_field(ParticleField::new(&profile, seed), profile, text_sample)
    }

    pub fn with_field(field: ParticleField, profile: DeviceProfile, text_sample: &str) -> Self {
        let aspect = 16.0 / 9.0;
        let text = text_sample.trim();
        Self {
            perf: PerformanceController::new(&profile),
            fps: FpsMeter::new(),
            recognizer: GestureRecognizer::new(GestureConfig::default(), aspect),
            view: SceneView::new(aspect),
            text_sample: if text.is_empty() {
                DEFAULT_TEXT_SAMPLE.to_string()
            } else {
                text.to_string()
            },
            last_seq: 0,
            field,
            profile,
        }
    }

    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn performance(&self) -> &PerformanceController {
        &self.perf
    }

    pub fn recognizer(&self) -> &GestureRecognizer {
        &self.recognizer
    }

    pub fn view(&self) -> &SceneView {
        &self.view
    }

    pub fn text_sample(&self) -> &str {
        &self.text_sample
    }

    /// Replaces the text used by the next text formation. Blank input is
    /// ignored and the previous text kept.
    pub fn set_text_sample(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.text_sample = text.to_string();
        true
    }

    pub fn form_planet_at(&mut self, anchor: Vec3) {
        self.apply_command(&FormationCommand::Planet { anchor });
    }

    pub fn disperse_now(&mut self) {
        self.apply_command(&FormationCommand::Disperse);
    }

    pub fn form_text_at(&mut self, anchor: Vec3) {
        let text = self.text_sample.clone();
        self.apply_command(&FormationCommand::Text { anchor, text });
    }

    pub fn apply_command(&mut self, command: &FormationCommand) {
        self.field.set_formation(command);
    }

    /// Hands the full buffer set to the renderer once at startup.
    pub fn upload<R: RenderSink + ?Sized>(&self, sink: &mut R) {
        sink.upload(
            self.field.positions(),
            self.field.colors(),
            self.perf.point_size(),
        );
    }

    pub fn resize<R: RenderSink + ?Sized>(&mut self, width: u32, height: u32, sink: &mut R) {
        if width == 0 || height == 0 {
            return;
        }
        let aspect = width as f32 / height as f32;
        self.view.set_aspect(aspect);
        self.recognizer.set_aspect(aspect);
        sink.resize(width, height);
    }

    /// One render tick: adapt the particle budget, integrate, notify.
    pub fn render_tick<R: RenderSink + ?Sized>(&mut self, dt_sec: f32, sink: &mut R) {
        let dt = dt_sec.clamp(0.0, MAX_FRAME_DT);
        let avg_fps = self.fps.push_dt(dt);
        if self.perf.update(avg_fps) != Adjustment::Hold {
            self.field.set_active_count(self.perf.active_count());
            sink.set_point_size(self.perf.point_size());
        }
        self.field.tick(dt);
        self.view.advance();
        sink.positions_changed(self.field.positions(), &self.view);
    }

    /// Applies one detector result: debounce, commit a formation if a gesture
    /// was held, and keep planet/text formations following the hand.
    pub fn apply_hand(&mut self, hand: Option<&HandFrame>) -> GestureOutput {
        let out = self.recognizer.observe(hand);
        if let (Some(g), Some(anchor)) = (out.triggered, out.anchor) {
            if let Some(cmd) = g.command(anchor, &self.text_sample) {
                self.apply_command(&cmd);
            }
        }
        if let Some(anchor) = out.anchor {
            if matches!(self.field.formation(), Formation::Planet | Formation::Text) {
                self.field.set_desired_anchor(anchor);
            }
        }
        out
    }

    /// Applies every detection that has completed since the last call, in
    /// completion order. Results older than one already applied are dropped.
    pub fn drain_detections(&mut self, rx: &Receiver<Detection>) -> usize {
        let mut applied = 0;
        for det in rx.try_iter() {
            if det.seq <= self.last_seq {
                continue;
            }
            self.last_seq = det.seq;
            self.apply_hand(det.hand.as_ref());
            applied += 1;
        }
        applied
    }
}
