// Particle field integration: target assignment, morphing, disperse bounds.

mod common;

use glam::Vec3;
use swarm_core::*;

fn field(total: usize) -> ParticleField {
    ParticleField::new(&common::small_profile(total), 42)
}

#[test]
fn buffers_share_length_and_colors_never_change() {
    let mut f = field(600);
    assert_eq!(f.positions().len(), 600);
    assert_eq!(f.velocities().len(), 600);
    assert_eq!(f.targets().len(), 600);
    assert_eq!(f.colors().len(), 600);
    let colors = f.colors().to_vec();

    f.set_formation(&FormationCommand::Planet { anchor: Vec3::ZERO });
    for _ in 0..30 {
        f.tick(1.0 / 60.0);
    }
    f.set_formation(&FormationCommand::Disperse);
    for _ in 0..30 {
        f.tick(1.0 / 60.0);
    }
    assert_eq!(f.colors(), colors.as_slice());
    assert_eq!(f.positions().len(), 600);
}

#[test]
fn short_target_list_is_padded_near_anchor() {
    let mut f = field(200);
    let anchor = Vec3::new(30.0, -12.0, 4.0);
    let list: Vec<Vec3> = (0..50).map(|i| Vec3::splat(i as f32)).collect();
    f.apply_targets(&list, anchor);
    assert_eq!(&f.targets()[..50], list.as_slice());
    for t in &f.targets()[50..] {
        let d = (*t - anchor).abs();
        assert!(d.max_element() <= 40.0, "padding target {t:?} outside cube");
    }
}

#[test]
fn surplus_targets_are_ignored() {
    let mut f = field(100);
    let list: Vec<Vec3> = (0..150).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();
    f.apply_targets(&list, Vec3::ZERO);
    assert_eq!(f.targets(), &list[..100]);
}

#[test]
fn empty_list_pads_every_target() {
    let mut f = field(100);
    let anchor = Vec3::new(-5.0, 5.0, 0.0);
    f.apply_targets(&[], anchor);
    assert!(f
        .targets()
        .iter()
        .all(|t| (*t - anchor).abs().max_element() <= 40.0));
}

#[test]
fn shape_anchor_moves_eight_percent_per_tick() {
    let mut f = field(300);
    f.set_formation(&FormationCommand::Planet {
        anchor: Vec3::new(100.0, 0.0, 0.0),
    });
    assert_eq!(f.desired_anchor(), Vec3::new(100.0, 0.0, 0.0));
    f.tick(1.0 / 60.0);
    assert!((f.shape_anchor().x - 8.0).abs() < 1e-4);
    f.tick(1.0 / 60.0);
    assert!((f.shape_anchor().x - (8.0 + 92.0 * 0.08)).abs() < 1e-3);
    for _ in 0..400 {
        f.tick(1.0 / 60.0);
    }
    assert!((f.shape_anchor() - f.desired_anchor()).length() < 1e-2);
}

#[test]
fn active_particles_morph_toward_shifted_targets() {
    let mut f = field(300);
    f.set_formation(&FormationCommand::Planet {
        anchor: Vec3::new(50.0, 0.0, 0.0),
    });
    let before = f.positions().to_vec();
    let targets = f.targets().to_vec();
    f.tick(1.0 / 60.0);
    let shift = f.shape_anchor() - f.desired_anchor();
    for i in 0..f.total() {
        let expected = before[i] + (targets[i] + shift - before[i]) * MORPH_FACTOR;
        assert!((f.positions()[i] - expected).length() < 1e-3);
    }
}

#[test]
fn settled_planet_sits_on_its_targets() {
    let mut f = field(400);
    f.set_formation(&FormationCommand::Planet { anchor: Vec3::ZERO });
    for _ in 0..300 {
        f.tick(1.0 / 60.0);
    }
    for (p, t) in f.positions().iter().zip(f.targets()) {
        assert!((*p - *t).length() < 0.05);
    }
}

#[test]
fn inactive_particles_drift_to_anchor() {
    let mut f = field(400);
    f.set_active_count(100);
    assert_eq!(f.active_count(), 100);
    let before = f.positions()[250];
    f.tick(1.0 / 60.0);
    let anchor = f.shape_anchor();
    let expected = before + (anchor - before) * INACTIVE_PULL;
    assert!((f.positions()[250] - expected).length() < 1e-4);
}

#[test]
fn active_count_is_capped_at_total() {
    let mut f = field(300);
    f.set_active_count(10_000);
    assert_eq!(f.active_count(), 300);
}

#[test]
fn disperse_keeps_cloud_bounded() {
    let mut f = field(500);
    f.set_formation(&FormationCommand::Planet { anchor: Vec3::ZERO });
    f.set_formation(&FormationCommand::Disperse);
    assert_eq!(f.formation(), Formation::Disperse);
    for step in 0..3000 {
        f.tick(1.0 / 30.0);
        let anchor = f.shape_anchor();
        for p in f.positions() {
            let d2 = (*p - anchor).length_squared();
            assert!(d2 <= 25_000.0, "step {step}: d2 {d2}");
        }
    }
}

#[test]
fn disperse_bounds_inactive_particles_too() {
    let mut f = field(1000);
    f.set_active_count(300);
    f.set_formation(&FormationCommand::Disperse);
    for step in 0..60 {
        f.tick(1.0 / 60.0);
        let anchor = f.shape_anchor();
        for (i, p) in f.positions().iter().enumerate() {
            let d2 = (*p - anchor).length_squared();
            assert!(d2 <= 25_000.0, "step {step}: particle {i} at d2 {d2}");
        }
    }
}

#[test]
fn disperse_velocities_respect_profile_speed() {
    let mut f = field(500);
    f.set_formation(&FormationCommand::Disperse);
    let speed = DeviceProfile::standard().disperse_speed;
    for v in f.velocities() {
        assert!(v.abs().max_element() <= speed);
    }
}

#[test]
fn disperse_keeps_previous_anchor() {
    let mut f = field(300);
    let anchor = Vec3::new(12.0, 3.0, -8.0);
    f.set_formation(&FormationCommand::Planet { anchor });
    f.set_formation(&FormationCommand::Disperse);
    assert_eq!(f.desired_anchor(), anchor);
}

#[test]
fn text_formation_pads_with_scatter() {
    let mut f = field(4200);
    let anchor = Vec3::new(0.0, 10.0, 0.0);
    f.set_formation(&FormationCommand::Text {
        anchor,
        text: "HI".into(),
    });
    assert_eq!(f.formation(), Formation::Text);
    let cap = 4200 * 8 / 10;
    for t in &f.targets()[cap..] {
        assert!((*t - anchor).abs().max_element() <= 40.0);
    }
}
