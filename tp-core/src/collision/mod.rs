//! Collision detection and resolution.
//!
//! This module handles:
//! - **Shapes**: the `Collider` sum type (axis-aligned box, circle)
//! - **Detection**: pair tests producing a penetration vector (SAT based)
//! - **Resolution**: impulse along the contact normal
//!
//! ## Penetration Vector
//!
//! Detection does not return a boolean. It returns how far, and in which
//! direction, the second shape has to move to stop overlapping the first:
//!
//! ```text
//!   ┌───────┐
//!   │   A ┌─┼─────┐
//!   │     │ │  B  │     normal = (+overlap_x, 0)
//!   └─────┼─┘     │     A moves by -normal/2, B by +normal/2
//!         └───────┘
//! ```

pub mod detection;
pub mod resolution;
pub mod shapes;

pub use detection::*;
pub use resolution::*;
pub use shapes::*;
