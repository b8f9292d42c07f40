//! Procedural generation for the static parts of the scene: the starfield,
//! orbit guide rings, and rasterized planet labels.

pub mod label;
pub mod orbit;
pub mod starfield;

pub use label::*;
pub use orbit::*;
pub use starfield::*;
