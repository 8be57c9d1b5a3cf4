//! Impulse-based contact response.
//!
//! Follows the linear part of Chris Hecker's rigid body dynamics model: a
//! single impulse along the contact normal, no friction and no rotation.
//!
//! ```text
//! v_rel = v_b - v_a
//! j     = -(1 + e) * (v_rel · n) / (1/m_a + 1/m_b)
//! v_a  -= n * j / m_a
//! v_b  += n * j / m_b
//! ```
//!
//! An immovable partner (immobile body or map tile) has zero velocity and
//! zero inverse mass, so the whole impulse goes to the other side.

use crate::types::Vec2;

/// Dynamic state of one side of a contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpulseBody {
    pub velocity: Vec2,
    pub mass: f32,
    pub restitution: f32,
}

/// Velocity changes produced by a contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impulse {
    pub delta_a: Vec2,
    pub delta_b: Vec2,
}

/// Collision resolver for body/body and body/obstacle contacts.
pub struct ImpulseResolver;

impl ImpulseResolver {
    /// Compute the impulse between `a` and `b` along `normal`.
    ///
    /// # Arguments
    /// * `a` - Body the normal points away from
    /// * `b` - Partner body, `None` for an immovable obstacle
    /// * `normal` - Contact normal from `a` toward `b` (normalized internally)
    ///
    /// # Returns
    /// `None` when the bodies are already separating along the normal.
    pub fn resolve(a: &ImpulseBody, b: Option<&ImpulseBody>, normal: Vec2) -> Option<Impulse> {
        let normal = normal.normalized();
        let velocity_b = b.map_or(Vec2::ZERO, |b| b.velocity);
        let relative = velocity_b - a.velocity;
        let along_normal = relative.dot(&normal);

        if along_normal > 0.0 {
            return None;
        }

        let inv_mass_a = 1.0 / a.mass;
        let inv_mass_b = b.map_or(0.0, |b| 1.0 / b.mass);
        let restitution = match b {
            Some(b) => a.restitution.min(b.restitution),
            None => a.restitution,
        };

        let j = -(1.0 + restitution) * along_normal / (inv_mass_a + inv_mass_b);
        let impulse = normal * j;

        Some(Impulse {
            delta_a: impulse * -inv_mass_a,
            delta_b: impulse * inv_mass_b,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
