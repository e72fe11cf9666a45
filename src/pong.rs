//! Pong round logic: paddles, ball, score and the point/game-over phases.
//!
//! Everything is in world units of a 1280x720 field. The ball moves with a
//! variable timestep (`dt` of the last frame), so there is no swept
//! collision: at very low frame rates it can pass through a paddle.

use glam::DVec2;
use rand::Rng;

use crate::audio::Sound;
use crate::geom::Rect;
use crate::Millis;

pub const WIDTH: i32 = 1280;
pub const HEIGHT: i32 = 720;

pub const PADDLE_WIDTH: i32 = 6;
pub const PADDLE_HEIGHT: i32 = 120;
pub const PADDLE_MARGIN: i32 = 10;
/// Units per second
pub const PADDLE_SPEED: f64 = 400.0;

pub const BALL_SIZE: i32 = 10;
pub const BALL_START_SPEED: f64 = 280.0;
pub const BALL_SPEED_STEP: f64 = 20.0;
pub const BALL_MAX_SPEED: f64 = 440.0;

/// How far past a side line the ball must travel before the point counts
pub const OFFSCREEN_MARGIN: i32 = 100;
pub const WIN_SCORE: u32 = 3;
pub const POINT_DELAY_MS: Millis = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    /// Play is frozen until `POINT_DELAY_MS` after `since`
    PointDelay { since: Millis },
    GameOver,
}

/// Up/down keys for one paddle as sampled this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaddleKeys {
    pub up: bool,
    pub down: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub left: PaddleKeys,
    pub right: PaddleKeys,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paddle {
    pub rect: Rect,
    /// Sub-pixel position; `rect.y` is this rounded
    pub pos_y: f64,
    /// -1 up, 0 idle, 1 down
    pub direction: i8,
}

impl Paddle {
    pub fn new(x: i32) -> Self {
        let rect = Rect::new(x, HEIGHT / 2 - PADDLE_HEIGHT / 2, PADDLE_WIDTH, PADDLE_HEIGHT);
        Paddle { rect, pos_y: rect.y as f64, direction: 0 }
    }

    /// Movement towards an edge the paddle already touches is disabled.
    pub fn steer(&mut self, keys: PaddleKeys) {
        self.direction = if keys.up && self.rect.top() > 0 {
            -1
        } else if keys.down && self.rect.bottom() < HEIGHT {
            1
        } else {
            0
        };
    }

    pub fn integrate(&mut self, dt: f64) {
        self.pos_y += self.direction as f64 * PADDLE_SPEED * dt;
        self.pos_y = self.pos_y.clamp(0.0, (HEIGHT - self.rect.h) as f64);
        self.rect.y = self.pos_y.round() as i32;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub rect: Rect,
    pub pos: DVec2,
    /// Components are ±1; only their signs change
    pub direction: DVec2,
    pub speed: f64,
}

impl Ball {
    /// Centred horizontally at a random height, heading along a random diagonal.
    pub fn spawn<R: Rng>(rng: &mut R) -> Self {
        let x = WIDTH / 2 - BALL_SIZE / 2;
        let y = rng.gen_range(1..=HEIGHT - 1 - BALL_SIZE);
        let rect = Rect::new(x, y, BALL_SIZE, BALL_SIZE);
        let direction = DVec2::new(random_sign(rng), random_sign(rng));

        Ball { rect, pos: DVec2::new(x as f64, y as f64), direction, speed: BALL_START_SPEED }
    }

    pub fn integrate(&mut self, dt: f64) {
        self.pos += self.direction * self.speed * dt;
        self.rect.x = self.pos.x.round() as i32;
        self.rect.y = self.pos.y.round() as i32;
    }

    fn speed_up(&mut self) {
        self.speed = (self.speed + BALL_SPEED_STEP).min(BALL_MAX_SPEED);
    }
}

fn random_sign<R: Rng>(rng: &mut R) -> f64 {
    if rng.gen::<bool>() {
        1.0
    } else {
        -1.0
    }
}

#[derive(Debug, Clone)]
pub struct Pong {
    pub left: Paddle,
    pub right: Paddle,
    pub ball: Ball,
    /// Indexed by `Side`: [left, right]
    pub scores: [u32; 2],
    pub phase: Phase,
}

impl Pong {
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        Pong {
            left: Paddle::new(PADDLE_MARGIN),
            right: Paddle::new(WIDTH - (PADDLE_MARGIN + PADDLE_WIDTH)),
            ball: Ball::spawn(rng),
            scores: [0, 0],
            phase: Phase::Playing,
        }
    }

    pub fn score(&self, side: Side) -> u32 {
        self.scores[side.index()]
    }

    /// Advances one frame. Returns the sound effects it triggered.
    pub fn update<R: Rng>(
        &mut self,
        controls: &Controls,
        dt: f64,
        now: Millis,
        rng: &mut R,
    ) -> Vec<Sound> {
        let mut sounds = vec![];

        match self.phase {
            Phase::GameOver => return sounds,
            Phase::PointDelay { since } => {
                if now.saturating_sub(since) < POINT_DELAY_MS {
                    return sounds;
                }
                log::debug!("point delay over, resuming play");
                self.phase = Phase::Playing;
            }
            Phase::Playing => {}
        }

        self.left.steer(controls.left);
        self.right.steer(controls.right);
        self.left.integrate(dt);
        self.right.integrate(dt);

        self.ball.integrate(dt);
        self.bounce_walls(&mut sounds);
        self.bounce_paddles(&mut sounds);
        self.check_score(now, rng);

        sounds
    }

    fn bounce_walls(&mut self, sounds: &mut Vec<Sound>) {
        let ball = &mut self.ball;

        if ball.rect.top() <= 0 {
            ball.rect.set_top(1);
            ball.direction.y = -ball.direction.y;
            ball.pos.y = ball.rect.y as f64;
            sounds.push(Sound::Collide);
        }

        if ball.rect.bottom() >= HEIGHT {
            ball.rect.set_bottom(HEIGHT - 1);
            ball.direction.y = -ball.direction.y;
            ball.pos.y = ball.rect.y as f64;
            sounds.push(Sound::Collide);
        }
    }

    fn bounce_paddles(&mut self, sounds: &mut Vec<Sound>) {
        let ball = &mut self.ball;

        if ball.rect.colliderect(&self.left.rect) {
            ball.rect.set_left(self.left.rect.right() + 1);
            ball.direction.x = -ball.direction.x;
            ball.pos.x = ball.rect.x as f64;
            ball.speed_up();
            sounds.push(Sound::Hit);
        }

        if ball.rect.colliderect(&self.right.rect) {
            ball.rect.set_right(self.right.rect.left() - 1);
            ball.direction.x = -ball.direction.x;
            ball.pos.x = ball.rect.x as f64;
            ball.speed_up();
            sounds.push(Sound::Hit);
        }
    }

    fn check_score<R: Rng>(&mut self, now: Millis, rng: &mut R) {
        if self.ball.rect.right() < -OFFSCREEN_MARGIN {
            self.award_point(Side::Right, now, rng);
        }

        if self.ball.rect.left() > WIDTH + OFFSCREEN_MARGIN {
            self.award_point(Side::Left, now, rng);
        }

        if self.scores.iter().any(|&s| s >= WIN_SCORE) && self.phase != Phase::GameOver {
            log::info!("game over, final score {}-{}", self.scores[0], self.scores[1]);
            self.phase = Phase::GameOver;
        }
    }

    fn award_point<R: Rng>(&mut self, side: Side, now: Millis, rng: &mut R) {
        self.ball = Ball::spawn(rng);
        self.scores[side.index()] += 1;
        self.phase = Phase::PointDelay { since: now };
        log::info!("point to {:?}, score {}-{}", side, self.scores[0], self.scores[1]);
    }

    /// Only acts after game over: clears the score and starts a fresh
    /// countdown from `now`. Returns whether a restart happened.
    pub fn restart(&mut self, now: Millis) -> bool {
        if self.phase != Phase::GameOver {
            return false;
        }

        self.scores = [0, 0];
        self.phase = Phase::PointDelay { since: now };
        log::info!("restarting match");
        true
    }

    /// Whole seconds left in the point delay (3, 2, 1), if one is running.
    pub fn countdown(&self, now: Millis) -> Option<u64> {
        match self.phase {
            Phase::PointDelay { since } => {
                let elapsed = now.saturating_sub(since);
                let remaining = (POINT_DELAY_MS / 1000).saturating_sub(elapsed / 1000);
                Some(remaining).filter(|&s| s > 0)
            }
            _ => None,
        }
    }
}
