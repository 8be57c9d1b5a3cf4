//! Convex collider shapes.
//!
//! Colliders are caches owned by their body: the world re-syncs them in place
//! from the body's position and footprint every sub-step instead of building
//! new ones.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::types::Vec2;

/// What every collider shape can do, independent of the pair it is tested against.
pub trait Shape {
    /// Scalar interval `(min, max)` covered by the shape on `axis`.
    ///
    /// The axis is normalized internally.
    fn project_on_axis(&self, axis: &Vec2) -> (f32, f32);

    fn area(&self) -> f32;

    fn center(&self) -> Vec2;
}

/// Discriminant used by presets and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Box,
    Circle,
}

/// Clamps a negative or NaN extent to zero. Debug builds stop right here.
fn checked_extent(value: f32, what: &str) -> f32 {
    debug_assert!(value >= 0.0, "{what} must be >= 0, got {value}");
    if value >= 0.0 {
        value
    } else {
        log::error!("{what} must be >= 0, got {value}; clamping to 0");
        0.0
    }
}

// =============================================================================
// Axis-Aligned Box
// =============================================================================

/// Axis-aligned box anchored at its bottom-left corner. Has no rotation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Aabb {
    position: Vec2,
    width: f32,
    height: f32,
}

impl Aabb {
    pub fn new(position: Vec2, width: f32, height: f32) -> Self {
        Self {
            position,
            width: checked_extent(width, "box width"),
            height: checked_extent(height, "box height"),
        }
    }

    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(Vec2::new(x, y), width, height)
    }

    /// Bottom-left corner
    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn min_x(&self) -> f32 {
        self.position.x
    }

    pub fn max_x(&self) -> f32 {
        self.position.x + self.width
    }

    pub fn min_y(&self) -> f32 {
        self.position.y
    }

    pub fn max_y(&self) -> f32 {
        self.position.y + self.height
    }

    /// Corners, counter-clockwise from the bottom-left one.
    pub fn vertices(&self) -> [Vec2; 4] {
        let p = self.position;
        [
            p,
            p + Vec2::new(self.width, 0.0),
            p + Vec2::new(self.width, self.height),
            p + Vec2::new(0.0, self.height),
        ]
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn set_width(&mut self, width: f32) {
        self.width = checked_extent(width, "box width");
    }

    pub fn set_height(&mut self, height: f32) {
        self.height = checked_extent(height, "box height");
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

impl Shape for Aabb {
    fn project_on_axis(&self, axis: &Vec2) -> (f32, f32) {
        self.vertices()
            .iter()
            .map(|vertex| vertex.project_on_axis(axis))
            .fold((f32::MAX, f32::MIN), |(min, max), p| (min.min(p), max.max(p)))
    }

    fn area(&self) -> f32 {
        self.width * self.height
    }

    fn center(&self) -> Vec2 {
        self.position + Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

// =============================================================================
// Circle
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Circle {
    center: Vec2,
    radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self {
            center,
            radius: checked_extent(radius, "circle radius"),
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.center = center;
    }

    pub fn set_radius(&mut self, radius: f32) {
        self.radius = checked_extent(radius, "circle radius");
    }

    pub fn is_finite(&self) -> bool {
        self.center.is_finite() && self.radius.is_finite()
    }
}

impl Shape for Circle {
    fn project_on_axis(&self, axis: &Vec2) -> (f32, f32) {
        let c = self.center.project_on_axis(axis);
        (c - self.radius, c + self.radius)
    }

    fn area(&self) -> f32 {
        std::f32::consts::PI * self.radius * self.radius
    }

    fn center(&self) -> Vec2 {
        self.center
    }
}

// =============================================================================
// Collider
// =============================================================================

/// A body's collision shape.
///
/// Pair tests live in [`detection`](super::detection); every pair of variants
/// is matched there, so adding a shape fails to compile until it is handled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Collider {
    Box(Aabb),
    Circle(Circle),
}

impl Collider {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Collider::Box(_) => ShapeKind::Box,
            Collider::Circle(_) => ShapeKind::Circle,
        }
    }

    pub fn is_finite(&self) -> bool {
        match self {
            Collider::Box(aabb) => aabb.is_finite(),
            Collider::Circle(circle) => circle.is_finite(),
        }
    }
}

impl Shape for Collider {
    fn project_on_axis(&self, axis: &Vec2) -> (f32, f32) {
        match self {
            Collider::Box(aabb) => aabb.project_on_axis(axis),
            Collider::Circle(circle) => circle.project_on_axis(axis),
        }
    }

    fn area(&self) -> f32 {
        match self {
            Collider::Box(aabb) => aabb.area(),
            Collider::Circle(circle) => circle.area(),
        }
    }

    fn center(&self) -> Vec2 {
        match self {
            Collider::Box(aabb) => aabb.center(),
            Collider::Circle(circle) => circle.center(),
        }
    }
}

impl From<Aabb> for Collider {
    fn from(aabb: Aabb) -> Self {
        Collider::Box(aabb)
    }
}

impl From<Circle> for Collider {
    fn from(circle: Circle) -> Self {
        Collider::Circle(circle)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_box_extents_and_vertices() {
        let aabb = Aabb::from_xywh(1.0, 2.0, 3.0, 4.0);
        assert_eq!(aabb.min_x(), 1.0);
        assert_eq!(aabb.max_x(), 4.0);
        assert_eq!(aabb.min_y(), 2.0);
        assert_eq!(aabb.max_y(), 6.0);
        assert_eq!(aabb.center(), Vec2::new(2.5, 4.0));
        assert_eq!(aabb.vertices()[2], Vec2::new(4.0, 6.0));
        assert_eq!(aabb.area(), 12.0);
    }

    #[test]
    fn test_box_projection() {
        let aabb = Aabb::from_xywh(0.0, 0.0, 2.0, 1.0);
        let (min, max) = aabb.project_on_axis(&Vec2::new(3.0, 0.0));
        assert!(close(min, 0.0));
        assert!(close(max, 2.0));

        // Diagonal: corners project to 0, √2, 3/√2, 1/√2
        let (min, max) = aabb.project_on_axis(&Vec2::new(1.0, 1.0));
        assert!(close(min, 0.0));
        assert!(close(max, 3.0 / 2f32.sqrt()));
    }

    #[test]
    fn test_circle_projection_and_area() {
        let circle = Circle::new(Vec2::new(2.0, 0.0), 1.0);
        let (min, max) = circle.project_on_axis(&Vec2::X_AXIS);
        assert!(close(min, 1.0));
        assert!(close(max, 3.0));
        assert!(close(circle.area(), std::f32::consts::PI));
    }

    #[test]
    fn test_collider_dispatch() {
        let collider: Collider = Circle::new(Vec2::new(1.0, 1.0), 0.5).into();
        assert_eq!(collider.kind(), ShapeKind::Circle);
        assert_eq!(collider.center(), Vec2::new(1.0, 1.0));

        let collider: Collider = Aabb::from_xywh(0.0, 0.0, 1.0, 1.0).into();
        assert_eq!(collider.kind(), ShapeKind::Box);
        assert!(collider.is_finite());
    }

    #[test]
    fn test_in_place_resync() {
        let mut aabb = Aabb::default();
        aabb.set_position(Vec2::new(5.0, 5.0));
        aabb.set_width(2.0);
        aabb.set_height(3.0);
        assert_eq!(aabb, Aabb::from_xywh(5.0, 5.0, 2.0, 3.0));
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "box width must be >= 0")]
    fn test_negative_width_is_fatal_in_debug() {
        let _ = Aabb::from_xywh(0.0, 0.0, -1.0, 1.0);
    }
}
