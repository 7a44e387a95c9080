#![warn(missing_docs)]
//! Fixed-timestep player physics against voxel terrain.

mod bounds;
mod collision;
mod player;

pub use bounds::{Aabb, CellRange};
pub use collision::{
    broad_phase, collide_block, narrow_phase, resolution_order, resolve_collisions, Collision,
    CollisionAxis, CollisionReport,
};
pub use player::{local_to_world, world_to_local, Player, DEFAULT_SPAWN};

use serde::{Deserialize, Serialize};
use terracell_core::SimTick;
use terracell_world::BlockSource;
use tracing::{debug, trace};

/// Tunables for [`Physics`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsParams {
    /// Fixed steps per second.
    pub simulation_rate: f32,
    /// Downward acceleration, in blocks per second squared.
    pub gravity: f32,
    /// Longest frame `dt` accepted by [`Physics::update`]; longer frames
    /// are clamped so a stall cannot trigger an unbounded catch-up.
    pub max_frame_time: f32,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            simulation_rate: 200.0,
            gravity: 32.0,
            max_frame_time: 0.25,
        }
    }
}

/// Fixed-step integrator and collision driver.
#[derive(Debug, Clone)]
pub struct Physics {
    params: PhysicsParams,
    time_step: f32,
    accumulator: f64,
    tick: SimTick,
    last_report: CollisionReport,
}

impl Default for Physics {
    fn default() -> Self {
        Self::new(PhysicsParams::default())
    }
}

impl Physics {
    /// Create an integrator.
    ///
    /// A non-positive or non-finite rate falls back to one step per second,
    /// and such a frame ceiling falls back to the default.
    pub fn new(params: PhysicsParams) -> Self {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        let rate = if positive(params.simulation_rate) {
            params.simulation_rate
        } else {
            1.0
        };
        let max_frame_time = if positive(params.max_frame_time) {
            params.max_frame_time
        } else {
            PhysicsParams::default().max_frame_time
        };
        Self {
            params: PhysicsParams {
                simulation_rate: rate,
                max_frame_time,
                ..params
            },
            time_step: 1.0 / rate,
            accumulator: 0.0,
            tick: SimTick::ZERO,
            last_report: CollisionReport::default(),
        }
    }

    /// Active parameters.
    pub fn params(&self) -> &PhysicsParams {
        &self.params
    }

    /// Duration of every simulation step, in seconds.
    pub fn time_step(&self) -> f32 {
        self.time_step
    }

    /// Carried time not yet consumed by a step.
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Number of steps executed so far.
    pub fn tick(&self) -> SimTick {
        self.tick
    }

    /// Broad and narrow phase results of the most recent step.
    pub fn last_report(&self) -> &CollisionReport {
        &self.last_report
    }

    /// Advance by a frame of `dt` seconds, running as many fixed steps as
    /// fit. Returns the number of steps executed.
    pub fn update<S: BlockSource + ?Sized>(
        &mut self,
        dt: f32,
        player: &mut Player,
        source: &S,
    ) -> u32 {
        let mut dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        if dt > self.params.max_frame_time {
            debug!(dt, max = self.params.max_frame_time, "clamping frame time");
            dt = self.params.max_frame_time;
        }

        self.accumulator += f64::from(dt);
        let step = f64::from(self.time_step);
        let mut steps = 0;
        while self.accumulator >= step {
            self.step(player, source);
            self.accumulator -= step;
            steps += 1;
        }
        steps
    }

    /// Run exactly one simulation step of [`Physics::time_step`] seconds.
    pub fn step<S: BlockSource + ?Sized>(&mut self, player: &mut Player, source: &S) {
        player.velocity.y -= self.params.gravity * self.time_step;
        player.apply_input(self.time_step);
        self.detect_collisions(player, source);
        self.tick = self.tick.advance(1);
    }

    /// Collision pass at the player's current position.
    ///
    /// Clears `on_ground`; it is set again only when a vertical contact is
    /// resolved.
    pub fn detect_collisions<S: BlockSource + ?Sized>(&mut self, player: &mut Player, source: &S) {
        player.on_ground = false;

        let candidates = broad_phase(player, source);
        let mut collisions = narrow_phase(&candidates, player);
        let resolved = if collisions.is_empty() {
            0
        } else {
            resolve_collisions(&mut collisions, player)
        };
        trace!(
            tick = self.tick.0,
            candidates = candidates.len(),
            contacts = collisions.len(),
            resolved,
            "collision pass"
        );

        self.last_report = CollisionReport {
            candidates,
            collisions,
            resolved,
        };
    }
}
