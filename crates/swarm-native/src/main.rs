mod cli;
mod renderer;
mod sim_input;
mod text_entry;

use anyhow::Context;
use clap::Parser;
use glam::Vec3;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{Key, NamedKey},
    window::WindowBuilder,
};

use renderer::Renderer;
use sim_input::{SharedHand, SyntheticCamera, VirtualHand, VirtualHandDetector};
use swarm_core::{
    CameraPipeline, DetectionSeq, DeviceProfile, Detection, FrameClock, PipelineHandle, Simulation,
};
use text_entry::TextEntry;

const CAMERA_IDLE: Duration = Duration::from_millis(4);

/// Owns the camera-tick thread and can stop or restart it without touching
/// the simulation. Restarted pipelines keep numbering from `seq`.
struct CameraControl {
    profile: DeviceProfile,
    hand: SharedHand,
    tx: Sender<Detection>,
    refuse: bool,
    seed: u64,
    seq: DetectionSeq,
    handle: Option<PipelineHandle>,
    // stopped threads still finishing their last tick
    retired: Vec<PipelineHandle>,
}

impl CameraControl {
    fn start(&mut self) -> anyhow::Result<()> {
        let camera = SyntheticCamera::new(&self.profile, self.refuse, self.seed);
        let detector = VirtualHandDetector::new(Arc::clone(&self.hand));
        let pipeline = CameraPipeline::start(camera, detector, &self.profile)?
            .with_seq(Arc::clone(&self.seq));
        let handle = pipeline
            .spawn(self.tx.clone(), CAMERA_IDLE)
            .context("spawning camera thread")?;
        self.handle = Some(handle);
        Ok(())
    }

    fn toggle(&mut self) {
        match self.handle.take() {
            Some(handle) => {
                handle.request_stop();
                self.retired.push(handle);
                log::info!("[camera] capture stopped; rendering continues");
            }
            None => {
                if let Err(e) = self.start() {
                    log::error!("[camera] restart failed: {e:#}");
                }
            }
        }
    }

    /// Joins stopped threads once they have exited.
    fn reap(&mut self) {
        self.retired.retain(PipelineHandle::is_running);
    }
}

/// Applies one key press. Returns `true` when the app should quit.
fn on_key(
    key: &Key,
    text: Option<&str>,
    sim: &mut Simulation,
    camera: &mut CameraControl,
    hand: &SharedHand,
    entry: &mut TextEntry,
) -> bool {
    if entry.is_open() {
        match key {
            Key::Named(NamedKey::Enter) => {
                entry.commit(sim);
            }
            Key::Named(NamedKey::Escape) => entry.cancel(),
            Key::Named(NamedKey::Backspace) => entry.backspace(),
            _ => {
                if let Some(t) = text {
                    entry.push(t);
                }
            }
        }
        return false;
    }
    match key {
        Key::Named(NamedKey::Escape) => return true,
        Key::Named(NamedKey::Enter) => entry.open(),
        Key::Character(c) => match c.to_ascii_lowercase().as_str() {
            "p" => sim.form_planet_at(Vec3::ZERO),
            "d" => sim.disperse_now(),
            "t" => sim.form_text_at(Vec3::ZERO),
            "c" => camera.toggle(),
            digit => {
                if let Ok(fingers @ 0..=5) = digit.parse::<u32>() {
                    if let Ok(mut h) = hand.lock() {
                        h.fingers = fingers;
                    }
                    log::info!("[hand] {fingers} fingers");
                }
            }
        },
        _ => {}
    }
    false
}

fn show_hand(hand: &SharedHand, visible: bool) {
    if let Ok(mut h) = hand.lock() {
        h.visible = visible;
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();
    let args = cli::Args::parse();

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Saturn Swarm")
        .build(&event_loop)?;

    let logical = window.inner_size().to_logical::<f64>(window.scale_factor());
    let profile = args.profile(logical.width as u32);
    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!(
        "[app] {:?} profile, {} particles, seed {}",
        profile.tier,
        profile.total_particles,
        seed
    );

    let hand: SharedHand = Arc::new(Mutex::new(VirtualHand::default()));
    let (tx, rx) = mpsc::channel();
    let mut camera = CameraControl {
        profile: profile.clone(),
        hand: Arc::clone(&hand),
        tx,
        refuse: args.deny_camera,
        seed,
        seq: DetectionSeq::default(),
        handle: None,
        retired: Vec::new(),
    };
    // No camera, no app: a refused camera ends the run here.
    camera.start().context("camera unavailable")?;

    let mut renderer = pollster::block_on(Renderer::new(&window, profile.total_particles))?;
    let mut sim = Simulation::new(profile, &args.text, seed);
    let size = window.inner_size();
    sim.resize(size.width, size.height, &mut renderer);
    sim.upload(&mut renderer);
    let mut clock = FrameClock::new();
    let mut entry = TextEntry::default();

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::Resized(size) => sim.resize(size.width, size.height, &mut renderer),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        text,
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if on_key(
                    &logical_key,
                    text.as_deref(),
                    &mut sim,
                    &mut camera,
                    &hand,
                    &mut entry,
                ) {
                    elwt.exit();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let (w, h) = renderer.size();
                if let Ok(mut v) = hand.lock() {
                    v.x = (position.x as f32 / w.max(1) as f32).clamp(0.0, 1.0);
                    v.y = (position.y as f32 / h.max(1) as f32).clamp(0.0, 1.0);
                }
            }
            WindowEvent::CursorEntered { .. } => show_hand(&hand, true),
            WindowEvent::CursorLeft { .. } => show_hand(&hand, false),
            _ => {}
        },
        Event::AboutToWait => {
            camera.reap();
            sim.drain_detections(&rx);
            sim.render_tick(clock.tick(), &mut renderer);
            match renderer.render() {
                Ok(_) => renderer.window().request_redraw(),
                Err(wgpu::SurfaceError::Lost) => {
                    let size = renderer.window().inner_size();
                    sim.resize(size.width, size.height, &mut renderer);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                Err(e) => log::warn!("[render] frame skipped: {e}"),
            }
        }
        _ => {}
    })?;
    Ok(())
}
