//! Overlap tests between colliders.
//!
//! Every test yields a penetration vector: its direction points from the first
//! collider toward the second (the way the second one has to move to get out),
//! and its length is the penetration depth along that direction.
//!
//! | pair          | method                                                   |
//! |---------------|----------------------------------------------------------|
//! | box / box     | per-axis interval overlap, smallest overlap wins (x on ties) |
//! | circle/circle | center distance against the sum of radii                 |
//! | circle / box  | SAT on x, y and the axis toward the closest box corner   |
//!
//! Touching shapes (overlap of exactly zero) do not collide.

use super::shapes::{Aabb, Circle, Collider, Shape};
use crate::types::{constants, Vec2};

/// Outcome of a pair test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    /// No overlap.
    Separated,
    /// Overlap; the vector points from the first collider toward the second
    /// and its length is the penetration depth.
    Penetrating(Vec2),
    /// The pair cannot be evaluated (non-finite geometry). Treated as no
    /// collision by the world, which logs it.
    Unsupported,
}

impl Contact {
    pub fn normal(&self) -> Option<Vec2> {
        match self {
            Contact::Penetrating(normal) => Some(*normal),
            _ => None,
        }
    }

    pub fn is_penetrating(&self) -> bool {
        matches!(self, Contact::Penetrating(_))
    }

    /// Same contact seen from the other collider.
    pub fn flipped(self) -> Self {
        match self {
            Contact::Penetrating(normal) => Contact::Penetrating(-normal),
            other => other,
        }
    }
}

impl From<Option<Vec2>> for Contact {
    fn from(normal: Option<Vec2>) -> Self {
        normal.map_or(Contact::Separated, Contact::Penetrating)
    }
}

impl Collider {
    /// Tests `self` against `other`.
    pub fn intersect(&self, other: &Collider) -> Contact {
        if !self.is_finite() || !other.is_finite() {
            return Contact::Unsupported;
        }

        match (self, other) {
            (Collider::Box(a), Collider::Box(b)) => box_box(a, b).into(),
            (Collider::Circle(a), Collider::Circle(b)) => circle_circle(a, b).into(),
            (Collider::Circle(circle), Collider::Box(aabb)) => circle_box(circle, aabb).into(),
            (Collider::Box(aabb), Collider::Circle(circle)) => {
                Contact::from(circle_box(circle, aabb)).flipped()
            }
        }
    }
}

/// Overlap of two scalar intervals, `<= 0` when they are disjoint or touching.
fn interval_overlap((min_a, max_a): (f32, f32), (min_b, max_b): (f32, f32)) -> f32 {
    max_a.min(max_b) - min_a.max(min_b)
}

/// Separating Axis Theorem over the given candidate axes.
///
/// Returns `None` as soon as one axis separates the shapes. Otherwise returns
/// the axis of smallest overlap (first one wins on ties), normalized and scaled
/// by that overlap. The sign of the result is not oriented; callers flip it.
pub fn separating_axis_theorem<A, B>(a: &A, b: &B, axes: &[Vec2]) -> Option<Vec2>
where
    A: Shape + ?Sized,
    B: Shape + ?Sized,
{
    let mut best: Option<(Vec2, f32)> = None;

    for axis in axes {
        let overlap = interval_overlap(a.project_on_axis(axis), b.project_on_axis(axis));
        if overlap <= 0.0 {
            return None;
        }
        match best {
            Some((_, min)) if min <= overlap => {}
            _ => best = Some((*axis, overlap)),
        }
    }

    best.map(|(axis, overlap)| axis.normalized() * overlap)
}

/// Box against box on the two cardinal axes.
fn box_box(a: &Aabb, b: &Aabb) -> Option<Vec2> {
    let x_overlap = a.max_x().min(b.max_x()) - a.min_x().max(b.min_x());
    let y_overlap = a.max_y().min(b.max_y()) - a.min_y().max(b.min_y());

    if x_overlap <= 0.0 || y_overlap <= 0.0 {
        return None;
    }

    if x_overlap <= y_overlap {
        let sign = if a.min_x() < b.min_x() { 1.0 } else { -1.0 };
        Some(Vec2::new(x_overlap * sign, 0.0))
    } else {
        let sign = if a.min_y() < b.min_y() { 1.0 } else { -1.0 };
        Some(Vec2::new(0.0, y_overlap * sign))
    }
}

fn circle_circle(a: &Circle, b: &Circle) -> Option<Vec2> {
    let radii = a.radius() + b.radius();
    let offset = b.center() - a.center();
    let distance = offset.length();

    if distance >= radii {
        return None;
    }

    // Concentric circles have no preferred axis; push along +x.
    let axis = if distance < constants::EPSILON {
        Vec2::X_AXIS
    } else {
        offset.normalized()
    };
    Some(axis * (radii - distance))
}

/// Circle against box, oriented from the circle toward the box.
///
/// The third axis (center to closest corner) approximates the contact normal
/// when the circle sits on a corner; it is not an exact manifold.
fn circle_box(circle: &Circle, aabb: &Aabb) -> Option<Vec2> {
    let center = circle.center();
    let mut axes = vec![Vec2::X_AXIS, Vec2::Y_AXIS];
    if let Some(corner) = center.closest_point(&aabb.vertices()) {
        let to_corner = corner - center;
        if !to_corner.is_zero() {
            axes.push(to_corner);
        }
    }

    let normal = separating_axis_theorem(circle, aabb, &axes)?;
    if normal.dot(&(aabb.center() - center)) < 0.0 {
        Some(-normal)
    } else {
        Some(normal)
    }
}

// =============================================================================
// Tests
// =============================================================================
