//! Deterministic collision simulation
//!
//! Everything that moves lives here. This module must stay deterministic:
//! - Fixed timestep only
//! - Stable iteration order (insertion order of balls, paddles and walls)
//! - No rendering or platform dependencies

pub mod ball;
pub mod collision;
pub mod paddle;
pub mod rect;
pub mod vector;
pub mod world;

pub use ball::Ball;
pub use collision::{CollisionAction, CollisionEvent, CollisionLog};
pub use paddle::Paddle;
pub use rect::Rect;
pub use vector::{VecExt, reflect_about_floor, shortest};
pub use world::{BallId, PaddleId, World};
