//! Accumulator behaviour of the fixed-step loop.

use glam::Vec3;
use terracell_physics::{Physics, PhysicsParams, Player};
use terracell_testkit::VoxelFixture;

#[test]
fn step_count_matches_elapsed_time() {
    let empty = VoxelFixture::new();
    let mut physics = Physics::default();
    let mut player = Player::at(Vec3::new(0.0, 1000.0, 0.0));

    let dt = 1.0f32 / 60.0;
    let frames = 600;
    let mut steps = 0u32;
    for _ in 0..frames {
        steps += physics.update(dt, &mut player, &empty);
    }

    let elapsed = f64::from(dt) * frames as f64;
    let expected = (elapsed / f64::from(physics.time_step())).floor() as i64;
    assert!(
        (i64::from(steps) - expected).abs() <= 1,
        "ran {steps} steps for {expected} expected"
    );
    assert_eq!(physics.tick().0, u64::from(steps));
}

#[test]
fn uneven_frames_give_same_step_count_as_even_frames() {
    let empty = VoxelFixture::new();
    let frame_times = [0.001f32, 0.017, 0.033, 0.0005, 0.05, 0.012, 0.0071, 0.1];

    let mut uneven = Physics::default();
    let mut player = Player::at(Vec3::new(0.0, 1000.0, 0.0));
    let mut uneven_steps = 0;
    for _ in 0..20 {
        for &dt in &frame_times {
            uneven_steps += uneven.update(dt, &mut player, &empty);
        }
    }

    let total: f32 = frame_times.iter().sum::<f32>() * 20.0;
    let mut even = Physics::default();
    let mut other = Player::at(Vec3::new(0.0, 1000.0, 0.0));
    let mut even_steps = 0;
    let frames = 100;
    for _ in 0..frames {
        even_steps += even.update(total / frames as f32, &mut other, &empty);
    }

    assert!((i64::from(uneven_steps) - i64::from(even_steps)).abs() <= 1);
}

#[test]
fn every_step_integrates_gravity_over_fixed_step() {
    let empty = VoxelFixture::new();
    let params = PhysicsParams {
        simulation_rate: 100.0,
        gravity: 10.0,
        ..Default::default()
    };
    let mut physics = Physics::new(params);
    let mut player = Player::at(Vec3::new(0.0, 1000.0, 0.0));

    // Odd frame lengths; velocity depends only on how many steps ran.
    let mut steps = 0;
    for dt in [0.013f32, 0.029, 0.004, 0.041, 0.0205] {
        steps += physics.update(dt, &mut player, &empty);
    }
    let expected = -10.0 * 0.01 * steps as f32;
    assert!((player.velocity.y - expected).abs() < 1e-4);
    assert!(physics.accumulator() < 0.01);
}
