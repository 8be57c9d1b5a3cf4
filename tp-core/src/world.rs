//! Body registry and the fixed-step simulation driver.
//!
//! ## Frame Layout
//!
//! Every [`PhysicsWorld::step`] splits the frame into `sub_steps` equal slices
//! and runs three phases per slice:
//!
//! 1. **Integrate**: moving bodies advance; still ones only re-sync colliders
//! 2. **Body pairs**: every pair `(i, j)` with `i < j` in registration order
//! 3. **Tiles**: grounded bodies against the obstacle tiles under them
//!
//! Registration order is the only ordering input, so two worlds fed the same
//! bodies in the same order produce the same frames.

use slotmap::SlotMap;

use crate::body::PhysicsBody;
use crate::collision::{Aabb, Collider, Contact, ImpulseResolver};
use crate::config::{ConfigError, WorldConfig};
use crate::terrain::Terrain;
use crate::types::{Direction, Vec2};

slotmap::new_key_type! {
    /// Generational reference to a registered body. Goes stale on removal.
    pub struct BodyHandle;
}

/// What a body ran into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContactPartner {
    Body(BodyHandle),
    /// Map tile bounds
    Tile(Aabb),
}

/// Something game code may want to react to, collected during a step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldEvent {
    /// A resolved contact. `normal` points from `body` toward the partner.
    Contact {
        body: BodyHandle,
        partner: ContactPartner,
        normal: Vec2,
    },
    /// The body's facing moved to another sector; its sprite needs a refresh.
    DirectionChanged {
        body: BodyHandle,
        from: Direction,
        to: Direction,
    },
}

/// The physics world containing all registered bodies.
pub struct PhysicsWorld {
    bodies: SlotMap<BodyHandle, PhysicsBody>,
    /// Registration order, drives pair enumeration
    order: Vec<BodyHandle>,
    config: WorldConfig,
    events: Vec<WorldEvent>,
}

impl PhysicsWorld {
    /// Create a world with 5 sub-steps and 16-unit tiles.
    pub fn new() -> Self {
        Self::from_valid_config(WorldConfig::default())
    }

    pub fn with_config(config: WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: WorldConfig) -> Self {
        Self {
            bodies: SlotMap::with_key(),
            order: Vec::new(),
            config,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    // ====== Registry ======

    /// Register a body; it joins pair enumeration after every existing one.
    pub fn add_body(&mut self, body: PhysicsBody) -> BodyHandle {
        log::debug!(
            "registering {} {} body '{}' ({} before it)",
            body.movement(),
            body.as_collider().kind(),
            body.name(),
            self.order.len()
        );
        let handle = self.bodies.insert(body);
        self.order.push(handle);
        handle
    }

    /// Unregister a body and hand it back.
    ///
    /// A stale or foreign handle is logged and leaves the registry untouched.
    pub fn remove_body(&mut self, handle: BodyHandle) -> Option<PhysicsBody> {
        let Some(body) = self.bodies.remove(handle) else {
            log::error!("cannot remove body {handle:?}: not registered in this world");
            return None;
        };
        self.order.retain(|&registered| registered != handle);
        log::debug!("removed body '{}' ({handle:?})", body.name());
        Some(body)
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&PhysicsBody> {
        self.bodies.get(handle)
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut PhysicsBody> {
        self.bodies.get_mut(handle)
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains_key(handle)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Handles in registration order.
    pub fn handles(&self) -> &[BodyHandle] {
        &self.order
    }

    /// Bodies in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &PhysicsBody)> + '_ {
        self.order
            .iter()
            .filter_map(|&handle| self.bodies.get(handle).map(|body| (handle, body)))
    }

    /// Events of the last step.
    pub fn events(&self) -> &[WorldEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.events)
    }

    // ====== Simulation ======

    /// Advance the world by `delta` seconds.
    ///
    /// Clears the previous step's events first. Nothing here fails: contacts
    /// that cannot be evaluated are logged and skipped.
    pub fn step<T: Terrain + ?Sized>(&mut self, delta: f32, terrain: &T) {
        self.events.clear();

        let sub_steps = self.config.sub_steps.max(1);
        let dt = delta / sub_steps as f32;
        log::trace!(
            "step: delta={delta}, {sub_steps} sub-steps of {dt}, {} bodies",
            self.order.len()
        );

        for _ in 0..sub_steps {
            self.integrate(dt, terrain);
            self.resolve_body_pairs();
            self.resolve_tiles(terrain);
        }
    }

    fn integrate<T: Terrain + ?Sized>(&mut self, dt: f32, terrain: &T) {
        let tile_size = self.config.tile_size;

        for &handle in &self.order {
            let Some(body) = self.bodies.get_mut(handle) else {
                continue;
            };
            if !body.is_moving() {
                // Position or rotation may have been changed from outside
                body.update_collider();
                continue;
            }
            if let Some(change) = body.integrate(dt, terrain, tile_size) {
                log::trace!("'{}' turned {} -> {}", body.name(), change.from, change.to);
                self.events.push(WorldEvent::DirectionChanged {
                    body: handle,
                    from: change.from,
                    to: change.to,
                });
            }
        }
    }

    fn resolve_body_pairs(&mut self) {
        let count = self.order.len();

        for i in 0..count {
            for j in (i + 1)..count {
                let (key_a, key_b) = (self.order[i], self.order[j]);
                let (Some(a), Some(b)) = (self.bodies.get(key_a), self.bodies.get(key_b)) else {
                    continue;
                };

                let (immobile_a, immobile_b) = (a.is_immobile(), b.is_immobile());
                if immobile_a && immobile_b {
                    continue;
                }

                // Normal points from A toward B
                let normal = match a.as_collider().intersect(b.as_collider()) {
                    Contact::Penetrating(normal) => normal,
                    Contact::Separated => continue,
                    Contact::Unsupported => {
                        log::error!(
                            "unsupported contact between '{}' and '{}'; treating as no collision",
                            a.name(),
                            b.name()
                        );
                        continue;
                    }
                };

                if immobile_b {
                    self.push_out(key_a, normal);
                } else if immobile_a {
                    self.push_out(key_b, -normal);
                } else {
                    self.separate(key_a, key_b, normal);
                }

                self.events.push(WorldEvent::Contact {
                    body: key_a,
                    partner: ContactPartner::Body(key_b),
                    normal,
                });
            }
        }
    }

    fn resolve_tiles<T: Terrain + ?Sized>(&mut self, terrain: &T) {
        for index in 0..self.order.len() {
            let handle = self.order[index];
            let Some(body) = self.bodies.get(handle) else {
                continue;
            };
            if body.can_fly() || body.is_immobile() {
                continue;
            }

            let tiles = terrain.tiles_on_as_colliders(
                body.position(),
                body.width(),
                body.height(),
                body.can_walk(),
                body.can_swim(),
            );

            for tile in tiles {
                let Some(body) = self.bodies.get(handle) else {
                    break;
                };
                let normal = match body.as_collider().intersect(&Collider::Box(tile)) {
                    Contact::Penetrating(normal) => normal,
                    Contact::Separated => continue,
                    Contact::Unsupported => {
                        log::error!(
                            "unsupported contact between '{}' and tile at {}; skipping",
                            body.name(),
                            tile.position()
                        );
                        continue;
                    }
                };

                self.push_out(handle, normal);
                self.events.push(WorldEvent::Contact {
                    body: handle,
                    partner: ContactPartner::Tile(tile),
                    normal,
                });
            }
        }
    }

    /// Moves a body fully out of an immovable obstacle and bounces it off.
    ///
    /// `normal` points from the body toward the obstacle.
    fn push_out(&mut self, handle: BodyHandle, normal: Vec2) {
        let Some(body) = self.bodies.get_mut(handle) else {
            return;
        };
        body.translate(-normal);
        if let Some(impulse) = ImpulseResolver::resolve(&body.impulse_body(), None, normal) {
            body.apply_impulse(impulse.delta_a);
        }
    }

    /// Splits the correction between two movable bodies and exchanges impulse.
    fn separate(&mut self, key_a: BodyHandle, key_b: BodyHandle, normal: Vec2) {
        let (Some(a), Some(b)) = (self.bodies.get(key_a), self.bodies.get(key_b)) else {
            return;
        };
        let impulse = ImpulseResolver::resolve(&a.impulse_body(), Some(&b.impulse_body()), normal);

        if let Some(a) = self.bodies.get_mut(key_a) {
            a.translate(normal * -0.5);
            if let Some(impulse) = impulse {
                a.apply_impulse(impulse.delta_a);
            }
        }
        if let Some(b) = self.bodies.get_mut(key_b) {
            b.translate(normal * 0.5);
            if let Some(impulse) = impulse {
                b.apply_impulse(impulse.delta_b);
            }
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
