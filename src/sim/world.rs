//! Physics world and fixed timestep stepping
//!
//! The world owns walls (grouped by tag), paddles and balls. Each call to
//! [`World::step_with_all`] advances every ball by `dt`, splitting the step
//! into halves whenever a ball would touch more than one thing at once.

use std::collections::{BTreeMap, HashMap};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::collision::CollisionAction;
use super::paddle::Paddle;
use super::rect::Rect;
use super::vector::{VecExt, reflect_about_floor};
use crate::tuning::Tuning;

/// Handle to a ball in a [`World`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BallId(u32);

/// Handle to a paddle in a [`World`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PaddleId(u32);

/// Hashable form of a wall rectangle (bit-exact, -0.0 folded into 0.0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct WallKey([u64; 4]);

impl From<&Rect> for WallKey {
    fn from(r: &Rect) -> Self {
        let bits = |v: f64| (v + 0.0).to_bits();
        Self([bits(r.x), bits(r.y), bits(r.width), bits(r.height)])
    }
}

/// A wall removal waiting for the end of the current sub-step
#[derive(Debug, Clone)]
struct PendingRemoval {
    group: String,
    wall: Rect,
}

/// Outcome of one sub-step for one ball
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubStep {
    /// Moved and resolved (or the ball went away during a callback)
    Done,
    /// More than one overlap; the move was undone
    Ambiguous,
}

/// Collision simulation for one game round
#[derive(Debug, Clone, Default)]
pub struct World {
    tuning: Tuning,
    /// Every wall, in insertion order
    walls: Vec<Rect>,
    /// Walls by group tag
    wall_groups: BTreeMap<String, Vec<Rect>>,
    /// Group of each registered wall
    wall_index: HashMap<WallKey, String>,
    pending_removals: Vec<PendingRemoval>,
    balls: Vec<(BallId, Ball)>,
    paddles: Vec<(PaddleId, Paddle)>,
    next_id: u32,
}

impl World {
    /// Create an empty world with default tuning (no gravity)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tuning(tuning: Tuning) -> Self {
        Self {
            tuning,
            ..Self::default()
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn set_tuning(&mut self, tuning: Tuning) {
        self.tuning = tuning;
    }

    #[inline]
    pub fn gravity(&self) -> f64 {
        self.tuning.gravity
    }

    pub fn set_gravity(&mut self, gravity: f64) {
        self.tuning.gravity = gravity;
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // --- Walls ---

    /// Add a wall to `group`. Takes effect immediately.
    pub fn add_wall(&mut self, group: impl Into<String>, wall: Rect) {
        let group = group.into();
        self.wall_index
            .entry(WallKey::from(&wall))
            .or_insert_with(|| group.clone());
        self.wall_groups.entry(group).or_default().push(wall);
        self.walls.push(wall);
    }

    /// Add a wall from its lower-left corner and size
    pub fn add_wall_xywh(&mut self, group: impl Into<String>, x: f64, y: f64, width: f64, height: f64) {
        self.add_wall(group, Rect::new(x, y, width, height));
    }

    /// Queue `wall` for removal from `group`. The wall stays in place until
    /// the end of the current sub-step (or step). Nothing happens if `group`
    /// does not hold the wall.
    pub fn remove_wall(&mut self, group: impl Into<String>, wall: Rect) {
        self.pending_removals.push(PendingRemoval {
            group: group.into(),
            wall,
        });
    }

    /// Remove every wall of `group` right away. Unknown groups are ignored.
    pub fn clear_wall_group(&mut self, group: &str) {
        let Some(list) = self.wall_groups.get_mut(group) else {
            return;
        };
        let cleared = std::mem::take(list);
        for wall in &cleared {
            remove_first(&mut self.walls, wall);
            self.reindex_wall(wall);
        }
        log::debug!("Cleared {} walls from group '{}'", cleared.len(), group);
    }

    /// Group the wall belongs to, if any
    pub fn group_for_wall(&self, wall: &Rect) -> Option<&str> {
        self.wall_index.get(&WallKey::from(wall)).map(String::as_str)
    }

    pub fn walls(&self) -> &[Rect] {
        &self.walls
    }

    /// Walls of `group` (empty for unknown groups)
    pub fn walls_in_group(&self, group: &str) -> &[Rect] {
        self.wall_groups.get(group).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of wall removals waiting to be applied
    pub fn pending_removals(&self) -> usize {
        self.pending_removals.len()
    }

    /// Apply queued wall removals to both the flat list and the groups
    fn flush_removals(&mut self) {
        if self.pending_removals.is_empty() {
            return;
        }
        let pending = std::mem::take(&mut self.pending_removals);
        let count = pending.len();
        for PendingRemoval { group, wall } in pending {
            let in_group = self
                .wall_groups
                .get_mut(&group)
                .is_some_and(|list| remove_first(list, &wall));
            if !in_group {
                log::debug!("Ignoring removal of {} from group '{}'", wall, group);
                continue;
            }
            remove_first(&mut self.walls, &wall);
            self.reindex_wall(&wall);
        }
        log::debug!("Flushed {} wall removals", count);
    }

    /// Point the reverse index at a group still holding `wall`, or drop it
    fn reindex_wall(&mut self, wall: &Rect) {
        let key = WallKey::from(wall);
        let owner = self
            .wall_groups
            .iter()
            .find(|(_, list)| list.contains(wall))
            .map(|(group, _)| group.clone());
        match owner {
            Some(group) => {
                self.wall_index.insert(key, group);
            }
            None => {
                self.wall_index.remove(&key);
            }
        }
    }

    // --- Balls ---

    pub fn add_ball(&mut self, ball: Ball) -> BallId {
        let id = BallId(self.next_entity_id());
        self.balls.push((id, ball));
        id
    }

    /// Remove a ball, returning it. Unknown ids are ignored.
    pub fn remove_ball(&mut self, id: BallId) -> Option<Ball> {
        let idx = self.ball_index(id)?;
        Some(self.balls.remove(idx).1)
    }

    pub fn ball(&self, id: BallId) -> Option<&Ball> {
        self.ball_index(id).map(|i| &self.balls[i].1)
    }

    pub fn ball_mut(&mut self, id: BallId) -> Option<&mut Ball> {
        self.ball_index(id).map(|i| &mut self.balls[i].1)
    }

    pub fn balls(&self) -> impl Iterator<Item = (BallId, &Ball)> {
        self.balls.iter().map(|(id, ball)| (*id, ball))
    }

    fn ball_index(&self, id: BallId) -> Option<usize> {
        self.balls.iter().position(|(b, _)| *b == id)
    }

    // --- Paddles ---

    pub fn add_paddle(&mut self, paddle: Paddle) -> PaddleId {
        let id = PaddleId(self.next_entity_id());
        self.paddles.push((id, paddle));
        id
    }

    /// Remove a paddle, returning it. Unknown ids are ignored.
    pub fn remove_paddle(&mut self, id: PaddleId) -> Option<Paddle> {
        let idx = self.paddle_index(id)?;
        Some(self.paddles.remove(idx).1)
    }

    pub fn paddle(&self, id: PaddleId) -> Option<&Paddle> {
        self.paddle_index(id).map(|i| &self.paddles[i].1)
    }

    pub fn paddle_mut(&mut self, id: PaddleId) -> Option<&mut Paddle> {
        self.paddle_index(id).map(|i| &mut self.paddles[i].1)
    }

    pub fn paddles(&self) -> impl Iterator<Item = (PaddleId, &Paddle)> {
        self.paddles.iter().map(|(id, paddle)| (*id, paddle))
    }

    fn paddle_index(&self, id: PaddleId) -> Option<usize> {
        self.paddles.iter().position(|(p, _)| *p == id)
    }

    fn paddle_ids(&self) -> Vec<PaddleId> {
        self.paddles.iter().map(|(id, _)| *id).collect()
    }

    // --- Stepping ---

    /// Advance the world by `dt` without collision callbacks
    pub fn step(&mut self, dt: f64) {
        self.step_with_all(dt, &mut []);
    }

    /// Advance the world by `dt`, reporting collisions to `action`
    pub fn step_with(&mut self, dt: f64, action: &mut dyn CollisionAction) {
        self.step_with_all(dt, &mut [action]);
    }

    /// Advance the world by `dt`, reporting every collision to each action
    /// in order
    pub fn step_with_all(&mut self, dt: f64, actions: &mut [&mut dyn CollisionAction]) {
        let ids: Vec<BallId> = self.balls.iter().map(|(id, _)| *id).collect();
        for id in ids {
            self.step_ball(id, dt, actions);
        }
        self.flush_removals();
    }

    /// Step one ball, halving the timestep while collisions are ambiguous
    fn step_ball(&mut self, id: BallId, dt: f64, actions: &mut [&mut dyn CollisionAction]) {
        let max_divisor = self.tuning.max_divisor;

        // Divisors of the sub-steps still to run; both halves of a split
        // share a divisor, so order within the stack does not matter
        let mut pending = vec![1u32];
        while let Some(divisor) = pending.pop() {
            if divisor > max_divisor {
                let Some(ball) = self.ball_mut(id) else {
                    return;
                };
                log::warn!(
                    "Ball {:?} stuck at {} after {} subdivisions, resetting to origin",
                    id,
                    ball.position,
                    max_divisor
                );
                ball.position = DVec2::ZERO;
                continue;
            }

            let sub_dt = dt / f64::from(divisor);
            if self.sub_step(id, sub_dt, actions) == SubStep::Ambiguous {
                log::trace!("Ball {:?} ambiguous at divisor {}, splitting", id, divisor);
                let next = divisor.saturating_mul(2);
                pending.push(next);
                pending.push(next);
            }
        }
    }

    fn sub_step(&mut self, id: BallId, dt: f64, actions: &mut [&mut dyn CollisionAction]) -> SubStep {
        let Some(bi) = self.ball_index(id) else {
            return SubStep::Done;
        };
        let vel = self.balls[bi].1.velocity;
        self.balls[bi].1.translate(vel * dt);

        match self.count_overlaps(&self.balls[bi].1) {
            0 => self.swing_paddles(id, dt, actions),
            1 => self.resolve_single(id, vel, dt, actions),
            _ => {
                self.balls[bi].1.translate(-vel * dt);
                return SubStep::Ambiguous;
            }
        }

        let Some(bi) = self.ball_index(id) else {
            return SubStep::Done;
        };
        let ball = &mut self.balls[bi].1;
        ball.velocity.y += self.tuning.gravity * dt;

        let speed = ball.velocity.length();
        if speed > self.tuning.max_ball_speed {
            ball.velocity = ball.velocity.normalize_or_zero() * self.tuning.max_ball_speed;
        }

        self.flush_removals();
        SubStep::Done
    }

    /// Walls and paddles the ball currently overlaps
    fn count_overlaps(&self, ball: &Ball) -> usize {
        let walls = self
            .walls
            .iter()
            .filter(|w| w.distance_to_point(ball.position) < ball.radius)
            .count();
        let paddles = self
            .paddles
            .iter()
            .filter(|(_, p)| p.distance_to_point(ball.position) < ball.radius)
            .count();
        walls + paddles
    }

    /// Resolve the single wall or paddle the ball ran into during a move of
    /// `vel * dt`
    fn resolve_single(
        &mut self,
        id: BallId,
        vel: DVec2,
        dt: f64,
        actions: &mut [&mut dyn CollisionAction],
    ) {
        // Snapshot: callbacks may add or clear walls
        let walls = self.walls.clone();
        for wall in walls {
            let Some(bi) = self.ball_index(id) else {
                return;
            };
            let ball = &mut self.balls[bi].1;
            let v = wall.shortest_vector_to_point(ball.position);
            if v.length() >= ball.radius {
                continue;
            }

            // Over-travel along the collision normal, and how long it took
            let overlap = ball.radius - v.length();
            let closing_speed = vel.projection_on(v).length();
            let mut to_impact = overlap / closing_speed;
            if !to_impact.is_finite() {
                to_impact = 0.0;
            }

            // Back up to the moment of impact, bounce, use up the rest
            ball.translate(-vel * dt);
            ball.translate(vel * (dt - to_impact));
            ball.velocity = reflect_about_floor(ball.velocity, v) * self.tuning.wall_restitution;
            let bounced = ball.velocity;
            ball.translate(bounced * to_impact);

            log::trace!("Ball {:?} bounced off wall {}", id, wall);
            let group = self.group_for_wall(&wall).map(str::to_owned);
            for action in actions.iter_mut() {
                action.on_wall_collision(id, wall, group.as_deref(), self);
            }
        }

        let mut vel = vel;
        for pid in self.paddle_ids() {
            let Some(bi) = self.ball_index(id) else {
                return;
            };
            let Some(pi) = self.paddle_index(pid) else {
                continue;
            };
            let ball = &mut self.balls[bi].1;
            let paddle = &mut self.paddles[pi].1;

            let v = paddle.shortest_vector_to_point(ball.position);
            if v.length() >= ball.radius {
                continue;
            }

            paddle.translate(v * -self.tuning.paddle_pushback);

            // Bounce from where the move started instead of finding the
            // exact impact point
            ball.translate(-vel * dt);
            ball.velocity =
                reflect_about_floor(ball.velocity, v) * self.tuning.paddle_restitution;
            vel = ball.velocity;
            ball.translate(vel * dt);

            log::trace!("Ball {:?} ran into paddle {:?}", id, pid);
            for action in actions.iter_mut() {
                action.on_paddle_collision(id, pid, self);
            }
        }
    }

    /// Nothing was hit by the ball's own motion: rotate and translate the
    /// paddles, letting a swinging paddle strike the ball
    fn swing_paddles(&mut self, id: BallId, dt: f64, actions: &mut [&mut dyn CollisionAction]) {
        for pid in self.paddle_ids() {
            let Some(bi) = self.ball_index(id) else {
                return;
            };
            let Some(pi) = self.paddle_index(pid) else {
                continue;
            };
            let ball = &mut self.balls[bi].1;
            let paddle = &mut self.paddles[pi].1;

            let spin = paddle.angular_velocity * dt;
            paddle.set_angle(paddle.angle() + spin);

            let pos = ball.position;
            let v = paddle.shortest_vector_to_point(pos);
            let hit = v.length() < ball.radius;
            if hit {
                paddle.translate(v * -self.tuning.paddle_pushback);

                // Move the ball clear of the paddle and bounce it
                let overlap = ball.radius - v.length();
                ball.translate(v.normalize_or_zero() * (2.0 * overlap));
                ball.velocity = reflect_about_floor(ball.velocity, v);

                // Hits further out along the spine get more of the swing;
                // past the tip center the effect tapers off again
                let spine = paddle.tip_position() - paddle.position;
                let along = (ball.position - paddle.position).projection_on(spine);
                let mut hit_offset = along.length() / spine.length();
                if hit_offset > 1.0 {
                    hit_offset = 2.0 - hit_offset;
                }
                let boost =
                    self.tuning.paddle_hit_energy * paddle.angular_velocity.abs() * hit_offset;
                ball.accelerate(v.normalize_or_zero() * boost);

                // Rotation only shows at the moment of the hit
                paddle.set_angle(paddle.angle() - spin);

                log::trace!("Paddle {:?} hit ball {:?} (offset {:.2})", pid, id, hit_offset);
                for action in actions.iter_mut() {
                    action.on_paddle_hit(id, pid, self);
                }
            }

            // Translate the paddle unless that would drive it into the ball
            let Some(bi) = self.ball_index(id) else {
                return;
            };
            let Some(pi) = self.paddle_index(pid) else {
                continue;
            };
            let radius = self.balls[bi].1.radius;
            let pushback = self.tuning.paddle_pushback;
            let paddle = &mut self.paddles[pi].1;

            paddle.translate(paddle.velocity * dt);
            let v = paddle.shortest_vector_to_point(pos);
            if v.length() < radius {
                paddle.translate(v * -pushback);
                paddle.translate(paddle.velocity * -dt);
            }
        }
    }
}

/// Remove the first element equal to `item`, reporting whether one was found
fn remove_first(list: &mut Vec<Rect>, item: &Rect) -> bool {
    match list.iter().position(|w| w == item) {
        Some(idx) => {
            list.remove(idx);
            true
        }
        None => false,
    }
}
