//! Physics tuning
//!
//! Data-driven constants for the simulation. Loaded from JSON so gameplay
//! feel can be adjusted without a rebuild.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::Error;

/// Tunable physics parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Acceleration along world y (negative pulls down)
    pub gravity: f64,
    /// Ball speed cap applied after every sub-step
    pub max_ball_speed: f64,
    /// Largest timestep divisor before a stuck ball is reset
    pub max_divisor: u32,
    /// Speed kept after a wall bounce
    pub wall_restitution: f64,
    /// Speed kept after running into a paddle
    pub paddle_restitution: f64,
    /// Fraction of the overlap a struck paddle is pushed back by
    pub paddle_pushback: f64,
    /// Angular speed multiplier for swinging paddle hits
    pub paddle_hit_energy: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            max_ball_speed: MAX_BALL_SPEED,
            max_divisor: MAX_DIVISOR,
            wall_restitution: WALL_RESTITUTION,
            paddle_restitution: PADDLE_RESTITUTION,
            paddle_pushback: PADDLE_PUSHBACK,
            paddle_hit_energy: PADDLE_HIT_ENERGY,
        }
    }
}

impl Tuning {
    /// Tuning for the standard two-player arena (defaults plus arena gravity)
    pub fn arena() -> Self {
        Self {
            gravity: ARENA_GRAVITY,
            ..Self::default()
        }
    }

    /// Parse tuning from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(Error::Parse)
    }

    /// Serialize tuning to pretty-printed JSON
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(Error::Serialize)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(Error::Read)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }
}
