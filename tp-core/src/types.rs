//! Core value types for the physics simulation.
//!
//! Units:
//! - Position: world units (pixels; one tile is `tile_size` units wide)
//! - Velocity: tiles per second
//! - Mass: kilograms (kg)
//! - Angles: radians, counter-clockwise

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};
use strum::{Display, EnumIter};

// =============================================================================
// Vec2 - 2D Vector
// =============================================================================

/// A 2D vector used for positions, velocities, translations and contact normals.
///
/// Coordinate system:
/// - X: horizontal (positive to the east)
/// - Y: vertical (positive to the north)
///
/// Equality is exact component comparison. [`Vec2::is_zero`] relies on it to
/// tell "no velocity" apart from a very small one.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    pub const X_AXIS: Vec2 = Vec2 { x: 1.0, y: 0.0 };
    pub const Y_AXIS: Vec2 = Vec2 { x: 0.0, y: 1.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Squared length (avoids sqrt for comparisons)
    pub fn length_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Returns a unit vector in the same direction, or zero if the length is zero
    pub fn normalized(&self) -> Self {
        let len = self.length();
        if len < constants::EPSILON {
            Self::ZERO
        } else {
            *self / len
        }
    }

    /// Normalizes in place.
    pub fn normalize(&mut self) {
        *self = self.normalized();
    }

    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// 2D cross product (z component of the 3D cross product): `x1*y2 - y1*x2`
    pub fn cross(&self, other: &Self) -> f32 {
        self.x * other.y - self.y * other.x
    }

    /// Rotates in place around the origin.
    pub fn rotate(&mut self, angle: f32) {
        let (sin, cos) = angle.sin_cos();
        *self = Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        };
    }

    /// Rotates in place around `pivot`.
    pub fn rotate_about(&mut self, angle: f32, pivot: Vec2) {
        *self -= pivot;
        self.rotate(angle);
        *self += pivot;
    }

    pub fn rotated(&self, angle: f32) -> Self {
        let mut r = *self;
        r.rotate(angle);
        r
    }

    pub fn rotated_about(&self, angle: f32, pivot: Vec2) -> Self {
        let mut r = *self;
        r.rotate_about(angle, pivot);
        r
    }

    /// Scalar projection onto `axis` (the axis does not need to be normalized)
    pub fn project_on_axis(&self, axis: &Self) -> f32 {
        self.dot(&axis.normalized())
    }

    pub fn distance_to(&self, other: &Self) -> f32 {
        (*self - *other).length()
    }

    /// Returns the candidate closest to `self`, first one wins on ties.
    ///
    /// `None` when `points` is empty.
    pub fn closest_point(&self, points: &[Vec2]) -> Option<Vec2> {
        let mut best: Option<(Vec2, f32)> = None;
        for point in points {
            let distance = self.distance_to(point);
            match best {
                Some((_, d)) if d <= distance => {}
                _ => best = Some((*point, distance)),
            }
        }
        best.map(|(point, _)| point)
    }

    /// Exact zero test, no tolerance.
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self::new(self.x * scalar, self.y * scalar)
    }
}

/// Component-wise scaling
impl Mul<Vec2> for Vec2 {
    type Output = Self;
    fn mul(self, other: Vec2) -> Self {
        Self::new(self.x * other.x, self.y * other.y)
    }
}

impl MulAssign<f32> for Vec2 {
    fn mul_assign(&mut self, scalar: f32) {
        self.x *= scalar;
        self.y *= scalar;
    }
}

impl Div<f32> for Vec2 {
    type Output = Self;
    fn div(self, scalar: f32) -> Self {
        Self::new(self.x / scalar, self.y / scalar)
    }
}

impl Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl std::fmt::Display for Vec2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} ; {})", self.x, self.y)
    }
}

// =============================================================================
// Movement Policy
// =============================================================================

/// Which terrain a body may travel over.
///
/// ```text
///                walk  swim  fly
/// Immobile        -     -     -
/// OnlyWalk        x     -     -
/// WalkAndSwim     x     x     -
/// Fly             -     -     x
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum MovementPolicy {
    Immobile,
    OnlyWalk,
    WalkAndSwim,
    Fly,
}

impl MovementPolicy {
    pub fn can_walk(self) -> bool {
        matches!(self, MovementPolicy::OnlyWalk | MovementPolicy::WalkAndSwim)
    }

    pub fn can_swim(self) -> bool {
        matches!(self, MovementPolicy::WalkAndSwim)
    }

    pub fn can_fly(self) -> bool {
        matches!(self, MovementPolicy::Fly)
    }

    pub fn can_move_on_ground(self) -> bool {
        self.can_walk() || self.can_fly()
    }

    pub fn is_immobile(self) -> bool {
        self == MovementPolicy::Immobile
    }
}

// =============================================================================
// Facing Direction
// =============================================================================

/// 8-way compass facing derived from velocity, plus `None` for "not facing".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    None,
    East,
    NorthEast,
    North,
    NorthWest,
    West,
    SouthWest,
    South,
    SouthEast,
}

impl Direction {
    /// Quantizes an angle in `[-π, π]` into one of the 8 sectors.
    ///
    /// ```text
    ///            N  [3π/8, 5π/8]
    ///    NW (5π/8, 7π/8)   NE (π/8, 3π/8)
    /// W (rest)                   E [-π/8, π/8]
    ///    SW (-7π/8, -5π/8) SE (-3π/8, -π/8)
    ///            S  [-5π/8, -3π/8]
    /// ```
    pub fn from_angle(theta: f32) -> Self {
        use std::f32::consts::PI;
        let eighth = PI / 8.0;

        if (-eighth..=eighth).contains(&theta) {
            Direction::East
        } else if theta > eighth && theta < 3.0 * eighth {
            Direction::NorthEast
        } else if (3.0 * eighth..=5.0 * eighth).contains(&theta) {
            Direction::North
        } else if theta > 5.0 * eighth && theta < 7.0 * eighth {
            Direction::NorthWest
        } else if theta < -eighth && theta > -3.0 * eighth {
            Direction::SouthEast
        } else if (-5.0 * eighth..=-3.0 * eighth).contains(&theta) {
            Direction::South
        } else if theta < -5.0 * eighth && theta > -7.0 * eighth {
            Direction::SouthWest
        } else {
            Direction::West
        }
    }

    /// Facing for a velocity, `None` for the zero vector.
    pub fn from_velocity(velocity: Vec2) -> Self {
        if velocity.is_zero() {
            return Direction::None;
        }
        Self::from_angle(velocity.y.atan2(velocity.x))
    }
}

// =============================================================================
// Physical Constants
// =============================================================================

/// Constants shared across the simulation.
pub mod constants {
    /// Sub-steps per frame when no configuration says otherwise
    pub const DEFAULT_SUB_STEPS: u32 = 5;

    /// World units per tile when no configuration says otherwise
    pub const DEFAULT_TILE_SIZE: f32 = 16.0;

    /// Small value for floating-point comparisons
    pub const EPSILON: f32 = 1e-6;
}

// =============================================================================
// Tests
// =============================================================================
