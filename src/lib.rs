//! Flipball - ball and flipper-paddle physics for a two-player brick arcade game
//!
//! Core modules:
//! - `sim`: Collision simulation (walls, paddles, balls, adaptive sub-stepping)
//! - `tuning`: Data-driven physics constants
//! - `error`: Errors for the fallible edges (loading tuning files)

pub mod error;
pub mod sim;
pub mod tuning;

pub use error::Error;
pub use tuning::Tuning;

/// Physics configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the game loop
    pub const SIM_DT: f64 = 1.0 / 1000.0;
    /// Simulation steps run per rendered frame
    pub const SUBSTEPS_PER_FRAME: u32 = 10;

    /// Largest timestep divisor before a ball is considered stuck
    pub const MAX_DIVISOR: u32 = 256;

    /// Ball speed is clamped to this magnitude after every sub-step
    pub const MAX_BALL_SPEED: f64 = 25.0;

    /// Speed kept after bouncing off a wall
    pub const WALL_RESTITUTION: f64 = 0.95;
    /// Speed kept after running into a paddle
    pub const PADDLE_RESTITUTION: f64 = 0.75;
    /// Fraction of the overlap a paddle is pushed back by when struck
    pub const PADDLE_PUSHBACK: f64 = 0.1;
    /// Multiplier on angular speed when a swinging paddle hits the ball
    pub const PADDLE_HIT_ENERGY: f64 = 2.0;

    /// Gravity of a freshly created world
    pub const DEFAULT_GRAVITY: f64 = 0.0;
    /// Gravity used by the standard arena
    pub const ARENA_GRAVITY: f64 = -20.0;

    /// Paddle geometry relative to its scale
    pub const PADDLE_BUTT_RATIO: f64 = 0.3;
    pub const PADDLE_TIP_RATIO: f64 = 0.1;
    pub const PADDLE_LENGTH_RATIO: f64 = 1.5;

    /// Default movement area for a paddle (x, y, width, height)
    pub const PADDLE_DEFAULT_AREA: (f64, f64, f64, f64) = (-100.0, -100.0, 200.0, 200.0);
}

/// Signed angular difference `target - current` with the smallest magnitude
/// among the 0 and ±2π offsets.
#[inline]
pub fn shortest_angle_delta(current: f64, target: f64) -> f64 {
    use std::f64::consts::TAU;

    let mut delta = target - current;
    let wrapped_up = target + TAU - current;
    if wrapped_up.abs() < delta.abs() {
        delta = wrapped_up;
    }
    let wrapped_down = target - current - TAU;
    if wrapped_down.abs() < delta.abs() {
        delta = wrapped_down;
    }
    delta
}
