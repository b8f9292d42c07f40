//! Core engine types and utilities for the orrery.
//!
//! This crate provides the foundational types used across all engine systems:
//! - Transform and spatial components
//! - Frame timing
//! - Scene components for orbiting bodies and their labels
//! - The 5x7 bitmap glyph table shared by the overlay and label rasters

pub mod components;
pub mod font;
pub mod time;
pub mod transform;

pub use components::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
pub use hecs::{Entity, World};
