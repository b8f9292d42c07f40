//! Orbital speed overrides shared by the frame loop and the control panel.
//!
//! Two copies are kept: the live copy read by every frame, and the display
//! copy read by the panel. [`SpeedControl::set_speed`] is the only way to
//! change either, and it writes both before returning.

use crate::catalog::PlanetSpec;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SpeedError {
    #[error("unknown planet {0:?}")]
    UnknownPlanet(String),
    #[error("speed {0:?} is not a number")]
    NotANumber(String),
    #[error("speed {0:?} is not finite")]
    NotFinite(String),
}

/// Planet name to angular speed (radians per frame), in both copies.
#[derive(Debug, Clone, Default)]
pub struct SpeedControl {
    live: HashMap<String, f32>,
    display: HashMap<String, f32>,
    revision: u64,
}

impl SpeedControl {
    /// Seed both copies with each planet's default speed.
    pub fn from_catalog(specs: &[PlanetSpec]) -> Self {
        let live: HashMap<String, f32> = specs.iter().map(|s| (s.name.clone(), s.speed)).collect();
        Self {
            display: live.clone(),
            live,
            revision: 0,
        }
    }

    /// Speed the frame loop applies to `name`; 0 when the planet has no entry.
    pub fn live(&self, name: &str) -> f32 {
        self.live.get(name).copied().unwrap_or(0.0)
    }

    /// Speed shown by the panel for `name`.
    pub fn display(&self, name: &str) -> Option<f32> {
        self.display.get(name).copied()
    }

    /// Bumped every time the display copy changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Parse `text` and store it for `name` in both copies.
    ///
    /// On error nothing changes and the previous speed stays in force.
    pub fn set_speed(&mut self, name: &str, text: &str) -> Result<f32, SpeedError> {
        if !self.live.contains_key(name) {
            return Err(SpeedError::UnknownPlanet(name.to_string()));
        }
        let value: f32 = text
            .trim()
            .parse()
            .map_err(|_| SpeedError::NotANumber(text.to_string()))?;
        if !value.is_finite() {
            return Err(SpeedError::NotFinite(text.to_string()));
        }

        self.live.insert(name.to_string(), value);
        self.display.insert(name.to_string(), value);
        self.revision += 1;
        log::debug!("{} speed set to {}", name, value);
        Ok(value)
    }

    /// [`set_speed`](Self::set_speed), logging a warning instead of returning the error.
    pub fn apply(&mut self, name: &str, text: &str) {
        if let Err(e) = self.set_speed(name, text) {
            log::warn!("Ignoring speed change for {}: {}", name, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_catalog;

    #[test]
    fn starts_with_default_speeds() {
        let speeds = SpeedControl::from_catalog(&default_catalog());
        assert_eq!(speeds.live("Earth"), 0.01);
        assert_eq!(speeds.display("Mercury"), Some(0.04));
        assert_eq!(speeds.revision(), 0);
    }

    #[test]
    fn set_speed_writes_both_copies() {
        let mut speeds = SpeedControl::from_catalog(&default_catalog());
        assert_eq!(speeds.set_speed("Mars", "0.05"), Ok(0.05));
        assert_eq!(speeds.live("Mars"), 0.05);
        assert_eq!(speeds.display("Mars"), Some(0.05));
        assert_eq!(speeds.revision(), 1);
    }

    #[test]
    fn zero_and_negative_are_accepted() {
        let mut speeds = SpeedControl::from_catalog(&default_catalog());
        assert_eq!(speeds.set_speed("Mars", "0"), Ok(0.0));
        assert_eq!(speeds.set_speed("Earth", "-0.02"), Ok(-0.02));
        assert_eq!(speeds.live("Earth"), -0.02);
    }

    #[test]
    fn bad_text_keeps_previous_speed() {
        let mut speeds = SpeedControl::from_catalog(&default_catalog());
        assert_eq!(
            speeds.set_speed("Earth", "fast"),
            Err(SpeedError::NotANumber("fast".into()))
        );
        assert_eq!(speeds.set_speed("Earth", ""), Err(SpeedError::NotANumber("".into())));
        assert_eq!(speeds.set_speed("Earth", "inf"), Err(SpeedError::NotFinite("inf".into())));
        assert!(speeds.set_speed("Earth", "NaN").is_err());
        assert_eq!(speeds.live("Earth"), 0.01);
        assert_eq!(speeds.display("Earth"), Some(0.01));
        assert_eq!(speeds.revision(), 0);
    }

    #[test]
    fn unknown_planet_is_rejected() {
        let mut speeds = SpeedControl::from_catalog(&default_catalog());
        assert_eq!(
            speeds.set_speed("Pluto", "0.01"),
            Err(SpeedError::UnknownPlanet("Pluto".into()))
        );
        assert_eq!(speeds.live("Pluto"), 0.0);
        assert_eq!(speeds.display("Pluto"), None);
    }

    #[test]
    fn apply_swallows_errors() {
        let mut speeds = SpeedControl::from_catalog(&default_catalog());
        speeds.apply("Venus", "abc");
        assert_eq!(speeds.live("Venus"), 0.015);
        speeds.apply("Venus", " 0.002 ");
        assert_eq!(speeds.live("Venus"), 0.002);
    }
}
