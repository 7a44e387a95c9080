//! Player body and velocity frame conversion.
//!
//! Velocity is stored in the player's yaw-relative frame (x = right,
//! y = up, -z = forward) so input maps onto it directly. Anything physical
//! happens in world space through [`local_to_world`] and [`world_to_local`].

use glam::{Quat, Vec3};

/// Spawn point used by [`Player::default`] and [`Player::reset`].
pub const DEFAULT_SPAWN: Vec3 = Vec3::new(32.0, 16.0, 32.0);

/// Rotate a yaw-relative vector into world space.
pub fn local_to_world(local: Vec3, yaw: f32) -> Vec3 {
    Quat::from_rotation_y(yaw) * local
}

/// Rotate a world-space vector into the frame of a body facing `yaw`.
pub fn world_to_local(world: Vec3, yaw: f32) -> Vec3 {
    Quat::from_rotation_y(-yaw) * world
}

/// Vertical cylinder hanging below a head point.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Head (camera) point; the cylinder extends `height` below it.
    pub position: Vec3,
    /// Velocity in the yaw-relative frame.
    pub velocity: Vec3,
    /// Requested horizontal velocity (x, z) in the yaw-relative frame,
    /// supplied by the input collaborator before each update.
    pub input: Vec3,
    /// Rotation about +Y, in radians.
    pub yaw: f32,
    /// Cylinder radius.
    pub radius: f32,
    /// Cylinder height.
    pub height: f32,
    /// Set when the last collision pass resolved a vertical contact.
    pub on_ground: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            position: DEFAULT_SPAWN,
            velocity: Vec3::ZERO,
            input: Vec3::ZERO,
            yaw: 0.0,
            radius: 0.5,
            height: 1.75,
            on_ground: false,
        }
    }
}

impl Player {
    /// Player with the default shape at `position`.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Vertical midpoint of the cylinder.
    pub fn center(&self) -> Vec3 {
        self.position - Vec3::new(0.0, self.height / 2.0, 0.0)
    }

    /// Whether `point` lies inside the cylinder (side inclusive, caps exclusive).
    pub fn contains_point(&self, point: Vec3) -> bool {
        let d = point - self.center();
        d.x * d.x + d.z * d.z <= self.radius * self.radius && d.y.abs() < self.height / 2.0
    }

    /// Velocity expressed along fixed world axes.
    pub fn world_velocity(&self) -> Vec3 {
        local_to_world(self.velocity, self.yaw)
    }

    /// Replace the velocity with a world-space value.
    pub fn set_world_velocity(&mut self, world: Vec3) {
        self.velocity = world_to_local(world, self.yaw);
    }

    /// Add a world-space change to the velocity.
    pub fn apply_world_velocity(&mut self, delta: Vec3) {
        self.velocity += world_to_local(delta, self.yaw);
    }

    /// Take the requested horizontal velocity and move for `dt` seconds.
    pub fn apply_input(&mut self, dt: f32) {
        self.velocity.x = self.input.x;
        self.velocity.z = self.input.z;
        self.position += self.world_velocity() * dt;
    }

    /// Return to `spawn` at rest.
    pub fn reset(&mut self, spawn: Vec3) {
        self.position = spawn;
        self.velocity = Vec3::ZERO;
        self.on_ground = false;
    }
}
