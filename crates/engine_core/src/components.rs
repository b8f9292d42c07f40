//! Common ECS components used by the scene.

use glam::{Vec2, Vec3};
use std::f32::consts::TAU;

/// Display name of an entity (planet names are unique keys).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name(pub String);

impl Name {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Circular orbit around the system origin in the XZ plane.
///
/// The angle is accumulated without wrapping; only its sine and cosine are
/// consumed. It is kept in `f64` so that slow speeds still advance after
/// hours of accumulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    /// Radius from the system center.
    pub distance: f32,
    /// Accumulated orbital angle in radians.
    pub angle: f64,
    /// Height of the orbital plane.
    pub height: f32,
}

impl Orbit {
    /// Angular frequency of the decorative vertical bob, relative to the orbit.
    pub const BOB_FREQUENCY: f64 = 0.5;
    /// Amplitude of the decorative vertical bob.
    pub const BOB_AMPLITUDE: f64 = 0.5;

    pub fn new(distance: f32, angle: f64, height: f32) -> Self {
        Self {
            distance,
            angle,
            height,
        }
    }

    /// Add one frame's worth of angular speed.
    pub fn advance(&mut self, speed: f32) {
        self.angle += f64::from(speed);
    }

    /// World position for the current angle.
    pub fn position(&self) -> Vec3 {
        let d = f64::from(self.distance);
        let (sin, cos) = self.angle.sin_cos();
        let bob = (self.angle * Self::BOB_FREQUENCY).sin() * Self::BOB_AMPLITUDE;
        Vec3::new(
            (d * cos) as f32,
            (f64::from(self.height) + bob) as f32,
            (d * sin) as f32,
        )
    }
}

/// Constant self-rotation around the local Y axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    /// Radians per frame.
    pub rate: f32,
    /// Current yaw, kept in [0, TAU).
    pub angle: f32,
}

impl Spin {
    pub fn new(rate: f32) -> Self {
        Self { rate, angle: 0.0 }
    }

    pub fn advance(&mut self) {
        self.angle = (self.angle + self.rate).rem_euclid(TAU);
    }
}

/// A renderable sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Sphere radius in world units.
    pub radius: f32,
    /// Linear RGB color.
    pub color: [f32; 3],
    /// Emissive bodies ignore scene lighting and are always drawn at full brightness.
    pub emissive: bool,
}

/// Camera-facing text sprite that floats above another entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Billboard {
    /// World-space center of the sprite.
    pub position: Vec3,
    /// World-space width and height.
    pub size: Vec2,
    /// Row of the label atlas holding this sprite's text.
    pub atlas_slot: usize,
    pub visible: bool,
}

impl Billboard {
    pub fn new(size: Vec2, atlas_slot: usize) -> Self {
        Self {
            position: Vec3::ZERO,
            size,
            atlas_slot,
            visible: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orbit_position_follows_angle() {
        let mut orbit = Orbit::new(20.0, 0.0, 20.0);
        orbit.advance(std::f32::consts::FRAC_PI_2);
        let p = orbit.position();
        let a = std::f64::consts::FRAC_PI_2;
        let bob = (a * 0.5).sin() * 0.5;
        assert!(p.x.abs() < 1e-4);
        assert!((p.z - 20.0).abs() < 1e-4);
        assert!((p.y - (20.0 + bob as f32)).abs() < 1e-4);
    }

    #[test]
    fn negative_speed_reverses_orbit() {
        let mut orbit = Orbit::new(10.0, 1.0, 0.0);
        orbit.advance(-0.25);
        assert!((orbit.angle - 0.75).abs() < 1e-9);
    }

    #[test]
    fn slow_speed_still_advances_after_large_angles() {
        let mut orbit = Orbit::new(10.0, 1.0e5, 0.0);
        let before = orbit.angle;
        orbit.advance(0.001);
        assert!(orbit.angle > before);
    }

    #[test]
    fn spin_wraps() {
        let mut spin = Spin::new(4.0);
        spin.advance();
        spin.advance();
        assert!(spin.angle >= 0.0 && spin.angle < TAU);
        assert!((spin.angle - (8.0 - TAU)).abs() < 1e-5);
    }
}
