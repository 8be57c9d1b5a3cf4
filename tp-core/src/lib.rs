//! # TP Core
//!
//! Fixed-step 2D collision detection and impulse response for tile-based games.
//!
//! ## Architecture
//!
//! - `types`: Core data structures (Vec2, movement policies, facing)
//! - `collision`: Box/circle colliders, SAT detection, impulse resolution
//! - `body`: Per-entity physics component
//! - `integrator`: Numerical integration (explicit Euler)
//! - `terrain`: Map query contract plus reference tile maps
//! - `world`: Body registry and the sub-stepped simulation driver
//! - `config`: YAML world settings and body presets
//! - `error`: Invariant violations reported by constructors
//!
//! ## Example
//!
//! ```ignore
//! let mut world = PhysicsWorld::new();
//! let player = world.add_body(loader.load_body("player")?.build(spawn)?);
//!
//! // once per frame
//! world.step(frame_seconds, &map);
//! for event in world.drain_events() { /* sounds, sprite refresh */ }
//! ```

pub mod body;
pub mod collision;
pub mod config;
pub mod error;
pub mod integrator;
pub mod terrain;
pub mod types;
pub mod world;

pub use body::{DirectionChange, PhysicsBody};
pub use collision::{Aabb, Circle, Collider, Contact, Shape, ShapeKind};
pub use config::{BodyPreset, ConfigError, PresetLoader, WorldConfig};
pub use error::PhysicsError;
pub use terrain::{OpenField, Terrain, Tile, TileGrid};
pub use types::{Direction, MovementPolicy, Vec2};
pub use world::{BodyHandle, ContactPartner, PhysicsWorld, WorldEvent};
