//! Collision callbacks
//!
//! Game logic (scoring, brick damage, sounds) plugs into the simulation
//! through [`CollisionAction`]. Callbacks run synchronously inside
//! [`World::step_with_all`] and get the world mutably, so they can reset a
//! ball, request wall removal or resize a paddle. They must not step the
//! world themselves.

use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::world::{BallId, PaddleId, World};

/// Receiver for collision events. All methods default to doing nothing.
pub trait CollisionAction {
    /// A ball bounced off a wall. `group` is the wall's current group, or
    /// `None` if the wall no longer belongs to one.
    fn on_wall_collision(
        &mut self,
        _ball: BallId,
        _wall: Rect,
        _group: Option<&str>,
        _world: &mut World,
    ) {
    }

    /// A moving ball ran into a paddle.
    fn on_paddle_collision(&mut self, _ball: BallId, _paddle: PaddleId, _world: &mut World) {}

    /// A swinging paddle struck the ball and passed on its rotation.
    fn on_paddle_hit(&mut self, _ball: BallId, _paddle: PaddleId, _world: &mut World) {}
}

/// A recorded collision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CollisionEvent {
    Wall {
        ball: BallId,
        wall: Rect,
        group: Option<String>,
    },
    Paddle {
        ball: BallId,
        paddle: PaddleId,
    },
    PaddleHit {
        ball: BallId,
        paddle: PaddleId,
    },
}

/// Sink that records every event in order
#[derive(Debug, Clone, Default)]
pub struct CollisionLog {
    pub events: Vec<CollisionEvent>,
}

impl CollisionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wall collisions against walls of `group`
    pub fn wall_hits<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a CollisionEvent> {
        self.events.iter().filter(move |e| {
            matches!(e, CollisionEvent::Wall { group: Some(g), .. } if g == group)
        })
    }

    /// Paddle collisions and paddle hits, in order
    pub fn paddle_events(&self) -> impl Iterator<Item = &CollisionEvent> {
        self.events.iter().filter(|e| {
            matches!(
                e,
                CollisionEvent::Paddle { .. } | CollisionEvent::PaddleHit { .. }
            )
        })
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl CollisionAction for CollisionLog {
    fn on_wall_collision(
        &mut self,
        ball: BallId,
        wall: Rect,
        group: Option<&str>,
        _world: &mut World,
    ) {
        self.events.push(CollisionEvent::Wall {
            ball,
            wall,
            group: group.map(str::to_owned),
        });
    }

    fn on_paddle_collision(&mut self, ball: BallId, paddle: PaddleId, _world: &mut World) {
        self.events.push(CollisionEvent::Paddle { ball, paddle });
    }

    fn on_paddle_hit(&mut self, ball: BallId, paddle: PaddleId, _world: &mut World) {
        self.events.push(CollisionEvent::PaddleHit { ball, paddle });
    }
}
