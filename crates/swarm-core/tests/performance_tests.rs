// Adaptive particle budget under synthetic frame rates.

mod common;

use swarm_core::*;

#[test]
fn floor_is_three_hundred_or_a_fifth() {
    let small = PerformanceController::new(&common::small_profile(1000));
    assert_eq!(small.floor(), 300);
    let big = PerformanceController::new(&common::small_profile(4200));
    assert_eq!(big.floor(), 840);
    let tiny = PerformanceController::new(&common::small_profile(120));
    assert_eq!(tiny.floor(), 120);
}

#[test]
fn slow_frames_shrink_count_and_size() {
    let profile = common::small_profile(4200);
    let mut perf = PerformanceController::new(&profile);
    assert_eq!(perf.update(20.0), Adjustment::Shrink);
    assert_eq!(perf.active_count(), (4200.0_f32 * 0.86).floor() as usize);
    assert!((perf.point_size() - profile.base_point_size * 0.94).abs() < 1e-5);
}

#[test]
fn dead_zone_holds() {
    let profile = common::small_profile(4200);
    let mut perf = PerformanceController::new(&profile);
    perf.update(10.0);
    let count = perf.active_count();
    let size = perf.point_size();
    // target 50: anything in [42, 56] is inside the band
    for fps in [42.0, 45.0, 50.0, 55.9, 56.0] {
        assert_eq!(perf.update(fps), Adjustment::Hold, "fps {fps}");
    }
    assert_eq!(perf.active_count(), count);
    assert_eq!(perf.point_size(), size);
}

#[test]
fn fast_frames_grow_back_to_total() {
    let profile = common::small_profile(4200);
    let mut perf = PerformanceController::new(&profile);
    for _ in 0..10 {
        perf.update(5.0);
    }
    let mut grew = false;
    for _ in 0..100 {
        grew |= perf.update(120.0) == Adjustment::Grow;
    }
    assert!(grew);
    assert_eq!(perf.active_count(), 4200);
    assert!(perf.point_size() <= profile.base_point_size + 1e-6);
    assert_eq!(perf.update(120.0), Adjustment::Hold);
}

#[test]
fn extreme_rates_stay_within_bounds() {
    let profile = common::small_profile(4200);
    let mut perf = PerformanceController::new(&profile);
    let floor = perf.floor();
    let rates = [1.0, 0.5, 3.0, 200.0, 1000.0, 2.0, 90.0, 0.1];
    for i in 0..2000 {
        perf.update(rates[i % rates.len()] * if i % 97 < 50 { 1.0 } else { 30.0 });
        assert!(perf.active_count() >= floor);
        assert!(perf.active_count() <= 4200);
        assert!(perf.point_size() >= MIN_POINT_SIZE);
        assert!(perf.point_size() <= profile.base_point_size + 1e-6);
    }
}

#[test]
fn sustained_slowness_bottoms_out_at_floor() {
    let profile = common::small_profile(4200);
    let mut perf = PerformanceController::new(&profile);
    for _ in 0..200 {
        perf.update(1.0);
    }
    assert_eq!(perf.active_count(), perf.floor());
    assert!(perf.point_size() >= MIN_POINT_SIZE);
    assert_eq!(perf.update(1.0), Adjustment::Hold);
}

#[test]
fn invalid_rates_are_ignored() {
    let mut perf = PerformanceController::new(&common::small_profile(4200));
    assert_eq!(perf.update(0.0), Adjustment::Hold);
    assert_eq!(perf.update(f32::NAN), Adjustment::Hold);
    assert_eq!(perf.update(-5.0), Adjustment::Hold);
    assert_eq!(perf.active_count(), 4200);
}

#[test]
fn meter_averages_recent_frames() {
    let mut meter = FpsMeter::new();
    assert_eq!(meter.average(), 0.0);
    meter.push_dt(0.02);
    let avg = meter.push_dt(0.04);
    assert!((avg - 37.5).abs() < 1e-3);
}
