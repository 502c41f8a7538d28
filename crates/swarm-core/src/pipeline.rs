//! Camera-tick pipeline: frame -> exposure correction -> detector -> result.
//!
//! The pipeline owns its [`ExposureNormalizer`] and detector and never touches
//! particle state. Results go out over an `mpsc` channel and are applied by
//! the render owner (see [`crate::Simulation::drain_detections`]).

use crate::error::Result;
use crate::exposure::ExposureNormalizer;
use crate::external::{FrameSource, HandDetector};
use crate::gesture::HandFrame;
use crate::profile::DeviceProfile;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// One completed detector call. `seq` increases with every camera tick and
/// keeps increasing across pipelines that share a [`DetectionSeq`].
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    pub seq: u64,
    pub hand: Option<HandFrame>,
}

/// Detection counter shared by every pipeline started for one consumer.
pub type DetectionSeq = Arc<AtomicU64>;

pub struct CameraPipeline<S: FrameSource, D: HandDetector> {
    source: S,
    detector: D,
    normalizer: ExposureNormalizer,
    seq: DetectionSeq,
}

impl<S: FrameSource, D: HandDetector> CameraPipeline<S, D> {
    /// Starts the camera. A capture failure here is fatal and nothing is left
    /// running.
    pub fn start(mut source: S, mut detector: D, profile: &DeviceProfile) -> Result<Self> {
        source.start()?;
        let normalizer = ExposureNormalizer::new(profile);
        detector.configure(&normalizer.detector_options());
        log::info!(
            "[camera] started at {}x{}",
            profile.capture_width,
            profile.capture_height
        );
        Ok(Self {
            source,
            detector,
            normalizer,
            seq: DetectionSeq::default(),
        })
    }

    /// Numbers detections from `seq`, so a restarted camera continues where
    /// the previous one stopped.
    pub fn with_seq(mut self, seq: DetectionSeq) -> Self {
        self.seq = seq;
        self
    }

    pub fn seq(&self) -> &DetectionSeq {
        &self.seq
    }

    pub fn normalizer(&self) -> &ExposureNormalizer {
        &self.normalizer
    }

    /// Runs one camera tick. Returns `None` when no frame was ready or a
    /// per-frame error was swallowed.
    pub fn step(&mut self) -> Option<Detection> {
        let frame = match self.source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("[camera] frame skipped: {e}");
                return None;
            }
        };
        let (corrected, options_changed) = self.normalizer.process(&frame);
        if options_changed {
            self.detector.configure(&self.normalizer.detector_options());
        }
        match self.detector.detect(&corrected) {
            Ok(hand) => Some(Detection {
                seq: self.seq.fetch_add(1, Ordering::Relaxed) + 1,
                hand,
            }),
            Err(e) => {
                log::warn!("[camera] detector call skipped: {e}");
                None
            }
        }
    }

    pub fn stop(&mut self) {
        self.source.stop();
    }
}

impl<S, D> CameraPipeline<S, D>
where
    S: FrameSource + 'static,
    D: HandDetector + 'static,
{
    /// Moves the pipeline onto its own thread. Dropping or stopping the
    /// returned handle halts capture and joins the thread; use
    /// [`PipelineHandle::request_stop`] from the render thread.
    pub fn spawn(mut self, tx: Sender<Detection>, idle: Duration) -> std::io::Result<PipelineHandle> {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let join = thread::Builder::new()
            .name("camera-pipeline".into())
            .spawn(move || {
                while !stop_flag.load(Ordering::Relaxed) {
                    match self.step() {
                        Some(det) => {
                            if tx.send(det).is_err() {
                                break;
                            }
                        }
                        None => thread::sleep(idle),
                    }
                }
                self.stop();
                log::info!("[camera] pipeline stopped");
            })?;
        Ok(PipelineHandle {
            stop,
            join: Some(join),
        })
    }
}

pub struct PipelineHandle {
    stop: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,
}

impl PipelineHandle {
    pub fn is_running(&self) -> bool {
        self.join.as_ref().is_some_and(|j| !j.is_finished())
    }

    /// Asks the thread to exit after its current tick. Never blocks.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn stop(&mut self) {
        self.request_stop();
        if let Some(join) = self.join.take() {
            if join.join().is_err() {
                log::error!("[camera] pipeline thread panicked");
            }
        }
    }
}

impl Drop for PipelineHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
