//! Flipball headless demo
//!
//! Builds the two-player arena and runs it without a window: both paddles
//! flip when the ball comes close, bricks break after enough hits, and a goal
//! re-serves the ball from the middle.
//!
//! Usage: `flipball [tuning.json|-] [frames] [seed]`

use std::f64::consts::PI;

use flipball::consts::{SIM_DT, SUBSTEPS_PER_FRAME};
use flipball::sim::{Ball, BallId, CollisionAction, Paddle, PaddleId, Rect, World};
use flipball::{Error, Tuning};
use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

const DEFAULT_FRAMES: u32 = 6000;
const DEFAULT_SEED: u64 = 0x5EED;

const BALL_RADIUS: f64 = 0.15;
/// Paddles steer toward their target angle this hard
const PADDLE_ANGULAR_ACCEL: f64 = 30.0;
/// How far a flip swings the paddle away from rest
const FLIP_SWING: f64 = 1.0;
/// Ball distance that triggers a flip
const FLIP_RANGE: f64 = 2.0;
const BRICK_HIT_POINTS: u32 = 2;
/// Frames without a goal before the ball is served again
const SERVE_TIMEOUT_FRAMES: u32 = 1500;

/// Brick hit points, in brick order
struct Bricks {
    bricks: Vec<(Rect, u32)>,
    broken: u32,
}

impl CollisionAction for Bricks {
    fn on_wall_collision(
        &mut self,
        ball: BallId,
        wall: Rect,
        group: Option<&str>,
        world: &mut World,
    ) {
        if group != Some("brick") {
            return;
        }
        let power = world.ball(ball).map_or(1, Ball::penetration_power);
        let Some(idx) = self.bricks.iter().position(|(r, _)| *r == wall) else {
            return;
        };

        let hp = &mut self.bricks[idx].1;
        *hp = hp.saturating_sub(power);
        if *hp == 0 {
            self.bricks.remove(idx);
            world.remove_wall("brick", wall);
            self.broken += 1;
            log::info!("Brick {} broken, {} left", wall, self.bricks.len());
        }
    }
}

/// Goal counter that serves the ball again after each goal
struct Scoreboard {
    /// Goals for the left and right player
    scores: [u32; 2],
    rng: Pcg32,
    frames_since_serve: u32,
}

impl Scoreboard {
    fn serve(&mut self, ball: &mut Ball) {
        let side = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };
        ball.position = DVec2::new(0.0, 3.5);
        ball.velocity = DVec2::new(
            side * self.rng.random_range(3.0..6.0),
            self.rng.random_range(0.0..2.0),
        );
        self.frames_since_serve = 0;
    }
}

impl CollisionAction for Scoreboard {
    fn on_wall_collision(
        &mut self,
        ball: BallId,
        _wall: Rect,
        group: Option<&str>,
        world: &mut World,
    ) {
        // The ball reaching one side's goal scores for the other side
        let scorer = match group {
            Some("left") => 1,
            Some("right") => 0,
            _ => return,
        };
        self.scores[scorer] += 1;
        log::info!("Goal! {} - {}", self.scores[0], self.scores[1]);

        if let Some(ball) = world.ball_mut(ball) {
            self.serve(ball);
        }
    }
}

/// A paddle plus where it rests and where it flips to
struct Flipper {
    id: PaddleId,
    resting: f64,
    flipped: f64,
}

fn build_arena(tuning: Tuning) -> (World, Vec<Flipper>, Bricks) {
    let mut world = World::with_tuning(tuning);

    world.add_wall_xywh("left", -14.0, -4.5, 5.0, 9.0);
    world.add_wall_xywh("right", 9.0, -4.5, 5.0, 9.0);
    world.add_wall_xywh("static", -9.0, 4.5, 18.0, 5.0);
    world.add_wall_xywh("static", -9.0, -9.5, 18.0, 5.0);

    let mut bricks = Vec::new();
    for row in 0..3 {
        let brick = Rect::new(-0.25, -1.5 + f64::from(row), 0.5, 1.0);
        world.add_wall("brick", brick);
        bricks.push((brick, BRICK_HIT_POINTS));
    }

    let mut flippers = Vec::new();
    for (name, x, resting, flipped, area) in [
        ("left", -6.0, PI, PI - FLIP_SWING, Rect::new(-6.4, -3.0, 2.0, 6.0)),
        ("right", 6.0, 0.0, FLIP_SWING, Rect::new(4.4, -3.0, 2.0, 6.0)),
    ] {
        let mut paddle = Paddle::new(1.0, resting).with_name(name);
        paddle.area = area;
        paddle.position = DVec2::new(x, 0.0);
        let id = world.add_paddle(paddle);
        flippers.push(Flipper {
            id,
            resting,
            flipped,
        });
    }

    (
        world,
        flippers,
        Bricks {
            bricks,
            broken: 0,
        },
    )
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let tuning = match args.next().as_deref() {
        None | Some("-") => Tuning::arena(),
        Some(path) => Tuning::load(path)?,
    };
    let frames = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_FRAMES);
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SEED);

    log::info!("Flipball starting: {} frames, seed {}", frames, seed);
    log::debug!("Tuning: {}", tuning.to_json()?);

    let (mut world, flippers, mut bricks) = build_arena(tuning);
    let mut scoreboard = Scoreboard {
        scores: [0, 0],
        rng: Pcg32::seed_from_u64(seed),
        frames_since_serve: 0,
    };

    let mut ball = Ball::new(BALL_RADIUS);
    scoreboard.serve(&mut ball);
    let ball_id = world.add_ball(ball);

    for frame in 0..frames {
        let ball_pos = world.ball(ball_id).map_or(DVec2::ZERO, |b| b.position);
        for flipper in &flippers {
            let Some(paddle) = world.paddle_mut(flipper.id) else {
                continue;
            };
            let near = paddle.distance_to_point(ball_pos) < FLIP_RANGE;
            let target = if near { flipper.flipped } else { flipper.resting };
            paddle.rotate_towards_angle(target, PADDLE_ANGULAR_ACCEL);
        }

        for _ in 0..SUBSTEPS_PER_FRAME {
            world.step_with_all(SIM_DT, &mut [&mut bricks, &mut scoreboard]);
        }

        scoreboard.frames_since_serve += 1;
        if scoreboard.frames_since_serve > SERVE_TIMEOUT_FRAMES {
            log::info!("Ball idle, serving again");
            if let Some(ball) = world.ball_mut(ball_id) {
                scoreboard.serve(ball);
            }
        }

        if frame % 600 == 0 {
            if let Some(ball) = world.ball(ball_id) {
                log::debug!(
                    "frame {}: ball at {} moving {}",
                    frame,
                    ball.position,
                    ball.velocity
                );
            }
        }
    }

    log::info!(
        "Final score {} - {}, {} bricks broken, {} left",
        scoreboard.scores[0],
        scoreboard.scores[1],
        bricks.broken,
        world.walls_in_group("brick").len()
    );
    Ok(())
}
