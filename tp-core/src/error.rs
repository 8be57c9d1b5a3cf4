//! Error types.
//!
//! Invariant violations are caught where bodies are built. Everything that can
//! go wrong inside a simulation step is logged and skipped instead, so no
//! error ever crosses [`PhysicsWorld::step`](crate::world::PhysicsWorld::step).

use thiserror::Error;

/// A body or collider was described with values the simulation cannot honor.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    #[error("mass must be finite and > 0, got {0}")]
    InvalidMass(f32),

    #[error("restitution must be within [0, 1], got {0}")]
    InvalidRestitution(f32),

    #[error("footprint must be finite and >= 0, got {width} x {height}")]
    InvalidFootprint { width: f32, height: f32 },

    #[error("circle colliders need a square footprint, got {width} x {height}")]
    NonSquareCircle { width: f32, height: f32 },
}
