//! Ray picking using Rapier3D.
//!
//! Pickable objects are parentless ball colliders; each collider's user data
//! carries the index the caller assigned, so a hit maps straight back to the
//! caller's own arrays.

pub mod picking_world;
pub mod raycast;

pub use picking_world::*;
pub use raycast::*;

// Re-export Rapier for downstream crates
pub use rapier3d;
