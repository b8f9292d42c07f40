//! Planet catalog: the static list of planets and their display colours.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Colour used for planets missing from the colour table (`#808080`).
pub const FALLBACK_COLOR: u32 = 0x808080;

/// One planet as configured at startup. Never changes during a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetSpec {
    /// Unique key; also the label text and the colour-table key.
    pub name: String,
    /// Orbit radius in world units.
    pub distance: f32,
    /// Sphere radius in world units.
    pub size: f32,
    /// Radians added to the orbital angle per frame.
    pub speed: f32,
}

impl PlanetSpec {
    pub fn new(name: &str, distance: f32, size: f32, speed: f32) -> Self {
        Self {
            name: name.to_string(),
            distance,
            size,
            speed,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("planet catalog is empty")]
    Empty,
    #[error("planet name {0:?} appears more than once")]
    DuplicateName(String),
    #[error("planet {name:?} has invalid distance {value}")]
    InvalidDistance { name: String, value: f32 },
    #[error("planet {name:?} has invalid size {value}")]
    InvalidSize { name: String, value: f32 },
    #[error("planet {name:?} has non-finite speed {value}")]
    InvalidSpeed { name: String, value: f32 },
}

/// The eight planets in their stable display order.
pub fn default_catalog() -> Vec<PlanetSpec> {
    vec![
        PlanetSpec::new("Jupiter", 35.0, 4.0, 0.002),
        PlanetSpec::new("Saturn", 45.0, 3.5, 0.0017),
        PlanetSpec::new("Uranus", 55.0, 3.0, 0.001),
        PlanetSpec::new("Neptune", 65.0, 2.5, 0.001),
        PlanetSpec::new("Earth", 20.0, 2.0, 0.01),
        PlanetSpec::new("Venus", 15.0, 1.5, 0.015),
        PlanetSpec::new("Mars", 25.0, 1.0, 0.008),
        PlanetSpec::new("Mercury", 10.0, 0.89, 0.04),
    ]
}

/// Check that names are unique and every number is usable.
pub fn validate(specs: &[PlanetSpec]) -> Result<(), CatalogError> {
    if specs.is_empty() {
        return Err(CatalogError::Empty);
    }
    let mut seen = HashSet::new();
    for spec in specs {
        if !seen.insert(spec.name.as_str()) {
            return Err(CatalogError::DuplicateName(spec.name.clone()));
        }
        if !(spec.distance.is_finite() && spec.distance > 0.0) {
            return Err(CatalogError::InvalidDistance {
                name: spec.name.clone(),
                value: spec.distance,
            });
        }
        if !(spec.size.is_finite() && spec.size > 0.0) {
            return Err(CatalogError::InvalidSize {
                name: spec.name.clone(),
                value: spec.size,
            });
        }
        if !spec.speed.is_finite() {
            return Err(CatalogError::InvalidSpeed {
                name: spec.name.clone(),
                value: spec.speed,
            });
        }
    }
    Ok(())
}

/// sRGB hex colour for a planet name; unknown names get [`FALLBACK_COLOR`].
pub fn planet_color_hex(name: &str) -> u32 {
    match name {
        "Mercury" => 0xcccccc,
        "Venus" => 0xffcc66,
        "Earth" => 0x3399ff,
        "Mars" => 0xff5733,
        "Jupiter" => 0xffcc99,
        "Saturn" => 0xffe066,
        "Uranus" => 0x66ffff,
        "Neptune" => 0x3399ff,
        _ => FALLBACK_COLOR,
    }
}

/// Linear RGB colour for a planet name.
pub fn planet_color(name: &str) -> [f32; 3] {
    hex_to_linear(planet_color_hex(name))
}

/// Convert a `0xRRGGBB` sRGB colour to linear RGB.
pub fn hex_to_linear(hex: u32) -> [f32; 3] {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
    [channel(16), channel(8), channel(0)]
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_is_valid() {
        let catalog = default_catalog();
        assert_eq!(catalog.len(), 8);
        assert_eq!(catalog[0].name, "Jupiter");
        assert_eq!(catalog[7].name, "Mercury");
        assert_eq!(validate(&catalog), Ok(()));
    }

    #[test]
    fn every_default_planet_has_a_table_colour() {
        for spec in default_catalog() {
            assert_ne!(planet_color_hex(&spec.name), FALLBACK_COLOR, "{}", spec.name);
        }
    }

    #[test]
    fn unknown_names_fall_back_to_grey() {
        assert_eq!(planet_color_hex("Pluto"), 0x808080);
        let grey = planet_color("Pluto");
        assert!((grey[0] - 0.2158).abs() < 1e-3);
        assert_eq!(grey[0], grey[1]);
        assert_eq!(grey[1], grey[2]);
    }

    #[test]
    fn srgb_endpoints_are_preserved() {
        assert_eq!(hex_to_linear(0x000000), [0.0, 0.0, 0.0]);
        let white = hex_to_linear(0xffffff);
        for c in white {
            assert!((c - 1.0).abs() < 1e-6);
        }
        let yellow = hex_to_linear(0xffff00);
        assert!((yellow[0] - 1.0).abs() < 1e-6);
        assert_eq!(yellow[2], 0.0);
    }

    #[test]
    fn validation_rejects_bad_catalogs() {
        assert_eq!(validate(&[]), Err(CatalogError::Empty));

        let dup = vec![
            PlanetSpec::new("Earth", 20.0, 2.0, 0.01),
            PlanetSpec::new("Earth", 30.0, 1.0, 0.01),
        ];
        assert_eq!(validate(&dup), Err(CatalogError::DuplicateName("Earth".into())));

        let bad_distance = vec![PlanetSpec::new("Earth", 0.0, 2.0, 0.01)];
        assert!(matches!(validate(&bad_distance), Err(CatalogError::InvalidDistance { .. })));

        let bad_size = vec![PlanetSpec::new("Earth", 20.0, -1.0, 0.01)];
        assert!(matches!(validate(&bad_size), Err(CatalogError::InvalidSize { .. })));

        let bad_speed = vec![PlanetSpec::new("Earth", 20.0, 2.0, f32::NAN)];
        assert!(matches!(validate(&bad_speed), Err(CatalogError::InvalidSpeed { .. })));
    }

    #[test]
    fn negative_speed_is_valid() {
        let reverse = vec![PlanetSpec::new("Earth", 20.0, 2.0, -0.01)];
        assert_eq!(validate(&reverse), Ok(()));
    }
}
