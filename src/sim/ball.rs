//! Ball rigid body

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub position: DVec2,
    pub velocity: DVec2,
    pub radius: f64,
    /// Hit points a single collision removes from a brick (always >= 1)
    penetration_power: u32,
}

impl Ball {
    /// Create a ball at the origin, at rest
    pub fn new(radius: f64) -> Self {
        Self {
            position: DVec2::ZERO,
            velocity: DVec2::ZERO,
            radius,
            penetration_power: 1,
        }
    }

    /// Move by `delta`
    #[inline]
    pub fn translate(&mut self, delta: DVec2) {
        self.position += delta;
    }

    /// Add `acc` to the velocity
    #[inline]
    pub fn accelerate(&mut self, acc: DVec2) {
        self.velocity += acc;
    }

    pub fn penetration_power(&self) -> u32 {
        self.penetration_power
    }

    pub fn set_penetration_power(&mut self, power: u32) {
        self.penetration_power = power.max(1);
    }
}
