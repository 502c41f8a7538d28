use crate::constants::*;
use crate::profile::DeviceProfile;
use crate::shapes::{
    planet_targets, scatter_in_cube, text_targets, BitmapFont, PlanetParams, TextRasterizer,
};
use glam::Vec3;
use rand::prelude::*;

/// Named target shape the swarm is currently chasing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Formation {
    #[default]
    Idle,
    Planet,
    Text,
    Disperse,
}

/// A request to switch formation, as issued by the UI or a debounced gesture.
#[derive(Clone, Debug, PartialEq)]
pub enum FormationCommand {
    Planet { anchor: Vec3 },
    Text { anchor: Vec3, text: String },
    Disperse,
}

impl FormationCommand {
    pub fn formation(&self) -> Formation {
        match self {
            FormationCommand::Planet { .. } => Formation::Planet,
            FormationCommand::Text { .. } => Formation::Text,
            FormationCommand::Disperse => Formation::Disperse,
        }
    }
}

/// Owns the per-particle buffers and integrates them once per render tick.
///
/// The four buffers (`positions`, `velocities`, `targets`, `colors`) always
/// have length `total`; colors are assigned at construction and never change.
pub struct ParticleField {
    positions: Vec<Vec3>,
    velocities: Vec<Vec3>,
    targets: Vec<Vec3>,
    colors: Vec<[f32; 3]>,
    formation: Formation,
    desired_anchor: Vec3,
    shape_anchor: Vec3,
    active_count: usize,
    profile: DeviceProfile,
    planet: PlanetParams,
    rasterizer: Box<dyn TextRasterizer + Send>,
    rng: StdRng,
}

impl ParticleField {
    pub fn new(profile: &DeviceProfile, seed: u64) -> Self {
        Self::with_rasterizer(profile, seed, Box::new(BitmapFont))
    }

    pub fn with_rasterizer(
        profile: &DeviceProfile,
        seed: u64,
        rasterizer: Box<dyn TextRasterizer + Send>,
    ) -> Self {
        let total = profile.total_particles;
        let mut rng = StdRng::seed_from_u64(seed);
        let mut positions = Vec::with_capacity(total);
        let mut velocities = Vec::with_capacity(total);
        let mut colors = Vec::with_capacity(total);
        for _ in 0..total {
            positions.push(scatter_in_cube(&mut rng, Vec3::ZERO, INITIAL_SCATTER_CUBE));
            velocities.push(scatter_in_cube(&mut rng, Vec3::ZERO, INITIAL_VELOCITY_SPAN));
            let h = rng.gen_range(PALETTE_HUE.0..PALETTE_HUE.1);
            let s = rng.gen_range(PALETTE_SATURATION.0..PALETTE_SATURATION.1);
            let l = rng.gen_range(PALETTE_LIGHTNESS.0..PALETTE_LIGHTNESS.1);
            colors.push(hsl_to_rgb(h, s, l));
        }
        let targets = positions.clone();
        Self {
            positions,
            velocities,
            targets,
            colors,
            formation: Formation::Idle,
            desired_anchor: Vec3::ZERO,
            shape_anchor: Vec3::ZERO,
            active_count: total,
            profile: profile.clone(),
            planet: PlanetParams::default(),
            rasterizer,
            rng,
        }
    }

    pub fn total(&self) -> usize {
        self.positions.len()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    pub fn targets(&self) -> &[Vec3] {
        &self.targets
    }

    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    pub fn formation(&self) -> Formation {
        self.formation
    }

    pub fn desired_anchor(&self) -> Vec3 {
        self.desired_anchor
    }

    pub fn shape_anchor(&self) -> Vec3 {
        self.shape_anchor
    }

    /// Moves the commanded anchor without regenerating targets; the formation
    /// follows rigidly as `shape_anchor` catches up.
    pub fn set_desired_anchor(&mut self, anchor: Vec3) {
        self.desired_anchor = anchor;
    }

    pub fn active_count(&self) -> usize {
        self.active_count
    }

    pub fn set_active_count(&mut self, count: usize) {
        self.active_count = count.min(self.total());
    }

    pub fn planet_params(&self) -> &PlanetParams {
        &self.planet
    }

    /// Copies `list` into the target buffer positionally. Indices past the end
    /// of `list` get a random target in a cube of side 80 around `anchor`;
    /// entries past `total` are ignored.
    pub fn apply_targets(&mut self, list: &[Vec3], anchor: Vec3) {
        let n = list.len().min(self.targets.len());
        self.targets[..n].copy_from_slice(&list[..n]);
        for t in &mut self.targets[n..] {
            *t = scatter_in_cube(&mut self.rng, anchor, SHORTFALL_CUBE);
        }
    }

    pub fn set_formation(&mut self, command: &FormationCommand) {
        self.formation = command.formation();
        match command {
            FormationCommand::Planet { anchor } => {
                self.desired_anchor = *anchor;
                let list = planet_targets(*anchor, self.total(), &self.planet, &mut self.rng);
                self.apply_targets(&list, *anchor);
                log::info!(
                    "[field] planet at ({:.1},{:.1},{:.1}) with {} samples",
                    anchor.x,
                    anchor.y,
                    anchor.z,
                    list.len()
                );
            }
            FormationCommand::Text { anchor, text } => {
                self.desired_anchor = *anchor;
                let shape = text_targets(
                    *anchor,
                    text,
                    self.total(),
                    &self.profile,
                    self.rasterizer.as_ref(),
                    &mut self.rng,
                );
                self.apply_targets(&shape.points, *anchor);
                log::info!(
                    "[field] text {:?} at {}px with {} samples",
                    text,
                    shape.font_size,
                    shape.points.len()
                );
            }
            FormationCommand::Disperse => {
                let side = self.profile.disperse_speed * 2.0;
                for v in &mut self.velocities {
                    *v = scatter_in_cube(&mut self.rng, Vec3::ZERO, side);
                }
                log::info!("[field] disperse");
            }
        }
    }

    /// Advances the swarm by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        self.shape_anchor = self.shape_anchor.lerp(self.desired_anchor, ANCHOR_FOLLOW);
        let anchor = self.shape_anchor;
        let active = self.active_count;

        if self.formation == Formation::Disperse {
            let step = dt * FRAME_BASELINE_HZ;
            for i in 0..active {
                let v = self.velocities[i] * DISPERSE_DAMPING;
                self.velocities[i] = v;
                let mut p = self.positions[i] + v * step;
                if (p - anchor).length_squared() > DISPERSE_RESPAWN_DIST_SQ {
                    p = scatter_in_cube(&mut self.rng, anchor, DISPERSE_RESPAWN_CUBE);
                }
                self.positions[i] = p;
            }
        } else {
            let shift = anchor - self.desired_anchor;
            for (p, t) in self.positions[..active]
                .iter_mut()
                .zip(&self.targets[..active])
            {
                *p += (*t + shift - *p) * MORPH_FACTOR;
            }
        }

        let dispersed = self.formation == Formation::Disperse;
        for p in &mut self.positions[active..] {
            *p += (anchor - *p) * INACTIVE_PULL;
            if dispersed && (*p - anchor).length_squared() > DISPERSE_RESPAWN_DIST_SQ {
                *p = scatter_in_cube(&mut self.rng, anchor, DISPERSE_RESPAWN_CUBE);
            }
        }
    }
}

/// HSL (all components in `[0, 1]`) to linear RGB.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [f32; 3] {
    if s <= 0.0 {
        return [l, l, l];
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let channel = |t: f32| {
        let t = t.rem_euclid(1.0);
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    };
    [channel(h + 1.0 / 3.0), channel(h), channel(h - 1.0 / 3.0)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsl_primaries() {
        let red = hsl_to_rgb(0.0, 1.0, 0.5);
        assert!((red[0] - 1.0).abs() < 1e-5 && red[1].abs() < 1e-5 && red[2].abs() < 1e-5);
        let grey = hsl_to_rgb(0.3, 0.0, 0.4);
        assert_eq!(grey, [0.4, 0.4, 0.4]);
    }
}
