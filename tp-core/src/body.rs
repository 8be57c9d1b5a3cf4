//! Per-entity physics state.
//!
//! A `PhysicsBody` is a component: the owning entity keeps the
//! [`BodyHandle`](crate::world::BodyHandle) returned on registration and reaches
//! its body through the world. Position is shared with the entity (the entity
//! may teleport it, physics moves it every sub-step).

use crate::collision::{Aabb, Circle, Collider, ImpulseBody, ShapeKind};
use crate::error::PhysicsError;
use crate::integrator::Euler;
use crate::terrain::Terrain;
use crate::types::{Direction, MovementPolicy, Vec2};

/// A facing change worth re-rendering the entity for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionChange {
    pub from: Direction,
    pub to: Direction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsBody {
    name: String,
    /// Bottom-left corner of the physics footprint
    position: Vec2,
    width: f32,
    height: f32,
    /// Set by the owning entity's transform; boxes require it to stay zero
    rotation: f32,
    /// Tiles per second
    velocity: Vec2,
    mass: f32,
    restitution: f32,
    movement: MovementPolicy,
    direction: Direction,
    impulse_response: bool,
    collider: Collider,
}

impl PhysicsBody {
    /// Creates a body with mass 1 kg and restitution 1, at rest.
    ///
    /// The footprint (`width` x `height`) is the hitbox, which may be smaller
    /// than what the entity draws. Circle bodies need a square footprint.
    pub fn new(
        name: impl Into<String>,
        position: Vec2,
        width: f32,
        height: f32,
        shape: ShapeKind,
        movement: MovementPolicy,
    ) -> Result<Self, PhysicsError> {
        validate_footprint(width, height, shape)?;

        let collider = match shape {
            ShapeKind::Box => Collider::Box(Aabb::default()),
            ShapeKind::Circle => Collider::Circle(Circle::default()),
        };
        let mut body = Self {
            name: name.into(),
            position,
            width,
            height,
            rotation: 0.0,
            velocity: Vec2::ZERO,
            mass: 1.0,
            restitution: 1.0,
            movement,
            direction: Direction::None,
            impulse_response: true,
            collider,
        };
        body.update_collider();
        Ok(body)
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_mass(mut self, mass: f32) -> Result<Self, PhysicsError> {
        self.set_mass(mass)?;
        Ok(self)
    }

    pub fn with_restitution(mut self, restitution: f32) -> Result<Self, PhysicsError> {
        self.set_restitution(restitution)?;
        Ok(self)
    }

    // ====== Accessors ======

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Teleports the body. The collider follows on the next sync.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn set_footprint(&mut self, width: f32, height: f32) -> Result<(), PhysicsError> {
        validate_footprint(width, height, self.collider.kind())?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    pub fn add_velocity(&mut self, velocity: Vec2) {
        self.velocity += velocity;
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn set_mass(&mut self, mass: f32) -> Result<(), PhysicsError> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(PhysicsError::InvalidMass(mass));
        }
        self.mass = mass;
        Ok(())
    }

    pub fn restitution(&self) -> f32 {
        self.restitution
    }

    pub fn set_restitution(&mut self, restitution: f32) -> Result<(), PhysicsError> {
        if !(0.0..=1.0).contains(&restitution) {
            return Err(PhysicsError::InvalidRestitution(restitution));
        }
        self.restitution = restitution;
        Ok(())
    }

    pub fn movement(&self) -> MovementPolicy {
        self.movement
    }

    pub fn can_walk(&self) -> bool {
        self.movement.can_walk()
    }

    pub fn can_swim(&self) -> bool {
        self.movement.can_swim()
    }

    pub fn can_fly(&self) -> bool {
        self.movement.can_fly()
    }

    pub fn can_move_on_ground(&self) -> bool {
        self.movement.can_move_on_ground()
    }

    pub fn is_immobile(&self) -> bool {
        self.movement.is_immobile()
    }

    /// Mobile and with a velocity that is exactly non-zero.
    pub fn is_moving(&self) -> bool {
        !self.is_immobile() && !self.velocity.is_zero()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Whether contacts change this body's velocity (they always move it).
    pub fn impulse_response(&self) -> bool {
        self.impulse_response
    }

    /// Opt out of impulses, e.g. for input-driven characters.
    pub fn set_impulse_response(&mut self, enabled: bool) {
        self.impulse_response = enabled;
    }

    /// The collider as of the last sync.
    ///
    /// Only fresh after a world step, [`translate`](Self::translate) or
    /// [`update_collider`](Self::update_collider).
    pub fn as_collider(&self) -> &Collider {
        &self.collider
    }

    // ====== Motion ======

    /// Re-syncs the cached collider from position, footprint and rotation.
    pub fn update_collider(&mut self) {
        let (position, width, height) = (self.position, self.width, self.height);
        match &mut self.collider {
            Collider::Box(aabb) => {
                debug_assert!(self.rotation == 0.0, "box colliders do not support rotation");
                if self.rotation != 0.0 {
                    log::error!(
                        "body '{}' has rotation {} but a box collider; ignoring rotation",
                        self.name,
                        self.rotation
                    );
                }
                aabb.set_position(position);
                aabb.set_width(width);
                aabb.set_height(height);
            }
            Collider::Circle(circle) => {
                debug_assert!(width == height, "circle footprint must be square");
                circle.set_center(position + Vec2::new(width / 2.0, height / 2.0));
                circle.set_radius(width.min(height) / 2.0);
            }
        }
    }

    /// Moves the body and re-syncs its collider.
    pub fn translate(&mut self, translation: Vec2) {
        self.position += translation;
        self.update_collider();
    }

    /// Advances the body by `dt` seconds at its current velocity.
    ///
    /// Returns the facing change this caused, if any.
    pub fn integrate<T: Terrain + ?Sized>(
        &mut self,
        dt: f32,
        terrain: &T,
        tile_size: f32,
    ) -> Option<DirectionChange> {
        Euler::step(self, terrain, dt, tile_size)
    }

    /// Re-derives the facing from velocity.
    ///
    /// A still body keeps its facing unless `reset_when_still` is set, in which
    /// case it silently becomes `Direction::None`. Only a change between
    /// moving sectors is reported.
    pub fn refresh_direction(&mut self, reset_when_still: bool) -> Option<DirectionChange> {
        if self.velocity.is_zero() {
            if reset_when_still {
                self.direction = Direction::None;
            }
            return None;
        }

        let to = Direction::from_velocity(self.velocity);
        if to == self.direction {
            return None;
        }
        let from = std::mem::replace(&mut self.direction, to);
        Some(DirectionChange { from, to })
    }

    // ====== Contact response ======

    pub(crate) fn impulse_body(&self) -> ImpulseBody {
        ImpulseBody {
            velocity: self.velocity,
            mass: self.mass,
            restitution: self.restitution,
        }
    }

    /// Applies a contact impulse unless the body is immobile or opted out.
    pub(crate) fn apply_impulse(&mut self, delta: Vec2) {
        if self.impulse_response && !self.is_immobile() {
            self.velocity += delta;
        }
    }
}

fn validate_footprint(width: f32, height: f32, shape: ShapeKind) -> Result<(), PhysicsError> {
    let valid = |v: f32| v.is_finite() && v >= 0.0;
    if !valid(width) || !valid(height) {
        return Err(PhysicsError::InvalidFootprint { width, height });
    }
    if shape == ShapeKind::Circle && width != height {
        return Err(PhysicsError::NonSquareCircle { width, height });
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::Shape;

    fn walker() -> PhysicsBody {
        PhysicsBody::new(
            "walker",
            Vec2::new(10.0, 20.0),
            8.0,
            6.0,
            ShapeKind::Box,
            MovementPolicy::OnlyWalk,
        )
        .unwrap()
    }

    #[test]
    fn test_new_body_syncs_collider() {
        let body = walker();
        assert_eq!(
            body.as_collider(),
            &Collider::Box(Aabb::from_xywh(10.0, 20.0, 8.0, 6.0))
        );
        assert_eq!(body.mass(), 1.0);
        assert_eq!(body.restitution(), 1.0);
        assert!(body.impulse_response());
    }

    #[test]
    fn test_circle_collider_is_centered_on_footprint() {
        let body = PhysicsBody::new(
            "ball",
            Vec2::new(0.0, 0.0),
            4.0,
            4.0,
            ShapeKind::Circle,
            MovementPolicy::Fly,
        )
        .unwrap();
        assert_eq!(body.as_collider().center(), Vec2::new(2.0, 2.0));
        match body.as_collider() {
            Collider::Circle(circle) => assert_eq!(circle.radius(), 2.0),
            other => panic!("expected circle, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_construction() {
        let circle = PhysicsBody::new(
            "c",
            Vec2::ZERO,
            4.0,
            2.0,
            ShapeKind::Circle,
            MovementPolicy::Fly,
        );
        assert_eq!(
            circle.unwrap_err(),
            PhysicsError::NonSquareCircle {
                width: 4.0,
                height: 2.0,
            }
        );

        let negative =
            PhysicsBody::new("b", Vec2::ZERO, -1.0, 2.0, ShapeKind::Box, MovementPolicy::Fly);
        assert!(matches!(negative, Err(PhysicsError::InvalidFootprint { .. })));

        assert_eq!(walker().with_mass(0.0).unwrap_err(), PhysicsError::InvalidMass(0.0));
        assert_eq!(
            walker().with_restitution(1.5).unwrap_err(),
            PhysicsError::InvalidRestitution(1.5)
        );
        assert!(walker().set_footprint(3.0, f32::NAN).is_err());
    }

    #[test]
    fn test_is_moving() {
        let body = walker();
        assert!(!body.is_moving());
        assert!(body.clone().with_velocity(Vec2::new(0.0, 1.0)).is_moving());

        let tree = PhysicsBody::new(
            "tree",
            Vec2::ZERO,
            1.0,
            1.0,
            ShapeKind::Box,
            MovementPolicy::Immobile,
        )
        .unwrap()
            .with_velocity(Vec2::new(1.0, 0.0));
        assert!(!tree.is_moving());
    }

    #[test]
    fn test_translate_resyncs_collider() {
        let mut body = walker();
        body.translate(Vec2::new(-10.0, 5.0));
        assert_eq!(body.position(), Vec2::new(0.0, 25.0));
        assert_eq!(
            body.as_collider(),
            &Collider::Box(Aabb::from_xywh(0.0, 25.0, 8.0, 6.0))
        );
    }

    #[test]
    fn test_teleport_needs_explicit_sync() {
        let mut body = walker();
        body.set_position(Vec2::new(100.0, 100.0));
        assert_eq!(body.as_collider().center(), Vec2::new(14.0, 23.0));

        body.update_collider();
        assert_eq!(body.as_collider().center(), Vec2::new(104.0, 103.0));
    }

    #[test]
    fn test_refresh_direction_reports_sector_changes() {
        let mut body = walker().with_velocity(Vec2::new(2.0, 0.0));
        assert_eq!(
            body.refresh_direction(false),
            Some(DirectionChange {
                from: Direction::None,
                to: Direction::East,
            })
        );
        // Same sector, different speed: nothing to report
        body.set_velocity(Vec2::new(5.0, 0.1));
        assert_eq!(body.refresh_direction(false), None);

        body.set_velocity(Vec2::new(0.0, -3.0));
        assert_eq!(
            body.refresh_direction(false),
            Some(DirectionChange {
                from: Direction::East,
                to: Direction::South,
            })
        );
    }

    #[test]
    fn test_refresh_direction_when_still() {
        let mut body = walker().with_velocity(Vec2::new(-1.0, 1.0));
        body.refresh_direction(false);
        assert_eq!(body.direction(), Direction::NorthWest);

        body.set_velocity(Vec2::ZERO);
        assert_eq!(body.refresh_direction(false), None);
        assert_eq!(body.direction(), Direction::NorthWest);

        assert_eq!(body.refresh_direction(true), None);
        assert_eq!(body.direction(), Direction::None);
    }

    #[test]
    fn test_impulse_opt_out() {
        let mut body = walker();
        body.apply_impulse(Vec2::new(1.0, 0.0));
        assert_eq!(body.velocity(), Vec2::new(1.0, 0.0));

        body.set_impulse_response(false);
        body.apply_impulse(Vec2::new(1.0, 0.0));
        assert_eq!(body.velocity(), Vec2::new(1.0, 0.0));
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "box colliders do not support rotation")]
    fn test_rotated_box_is_fatal_in_debug() {
        let mut body = walker();
        body.set_rotation(0.5);
        body.update_collider();
    }
}
