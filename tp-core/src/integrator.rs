//! Time integration for bodies.
//!
//! Velocities are in tiles per second and never change during integration
//! (there are no forces, only contact impulses), so explicit Euler is exact
//! for the motion between two contacts:
//!
//! ```text
//! x_new = x + v * dt * tile_size * speed
//! ```
//!
//! `speed` is the terrain multiplier under the body, or 1 for flying bodies.

use crate::body::{DirectionChange, PhysicsBody};
use crate::terrain::Terrain;
use crate::types::Vec2;

/// Explicit Euler integrator.
pub struct Euler;

impl Euler {
    /// Displacement the body would cover during `dt` seconds.
    pub fn translation<T: Terrain + ?Sized>(
        body: &PhysicsBody,
        terrain: &T,
        dt: f32,
        tile_size: f32,
    ) -> Vec2 {
        let speed = if body.can_fly() {
            1.0
        } else {
            terrain.tile_speed_on(body.position(), body.width(), body.height())
        };
        body.velocity() * (dt * tile_size * speed)
    }

    /// Advance one body by one time step.
    ///
    /// # Arguments
    /// * `body` - Body to move; its collider is re-synced afterwards
    /// * `terrain` - Map queried for the speed multiplier
    /// * `dt` - Time step in seconds
    /// * `tile_size` - World units per tile
    ///
    /// # Returns
    /// The facing change caused by the current velocity, if any.
    pub fn step<T: Terrain + ?Sized>(
        body: &mut PhysicsBody,
        terrain: &T,
        dt: f32,
        tile_size: f32,
    ) -> Option<DirectionChange> {
        let translation = Self::translation(body, terrain, dt, tile_size);
        body.translate(translation);
        body.refresh_direction(false)
    }
}

// =============================================================================
// Tests
// =============================================================================
