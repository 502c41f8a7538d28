//! Command-line options for the desktop front-end.

use clap::Parser;
use swarm_core::{DeviceProfile, DEFAULT_TEXT_SAMPLE};

#[derive(Parser, Debug)]
#[command(name = "saturn-swarm")]
#[command(about = "Gesture-driven particle swarm: cloud, ringed planet and text", long_about = None)]
#[command(version)]
pub struct Args {
    /// Text shown by the two-finger gesture and the T key
    #[arg(long, env = "SWARM_TEXT", default_value = DEFAULT_TEXT_SAMPLE)]
    pub text: String,

    /// Use the constrained device profile regardless of window size
    #[arg(long)]
    pub constrained: bool,

    /// Seed for particle sampling and camera noise (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Refuse camera access at startup, as a denied permission would
    #[arg(long)]
    pub deny_camera: bool,
}

impl Args {
    /// Picks the device profile for a window `logical_width` pixels wide.
    pub fn profile(&self, logical_width: u32) -> DeviceProfile {
        if self.constrained {
            DeviceProfile::constrained()
        } else {
            DeviceProfile::for_window_width(logical_width)
        }
    }
}
