//! Grid snake: tick-throttled movement, wrap-around edges, food and self
//! collision. Positions are world units on a 40x24 grid of 28-unit cells.

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::audio::Sound;
use crate::geom::{Coords, Rect};
use crate::Millis;
use Heading::*;

pub const BOX_SIZE: i32 = 28;
pub const COLS: i32 = 40;
pub const ROWS: i32 = 24;
pub const WIDTH: i32 = BOX_SIZE * COLS;
pub const HEIGHT: i32 = BOX_SIZE * ROWS;

pub const TICK_INTERVAL_MS: Millis = 120;
pub const INITIAL_LENGTH: usize = 3;

/// Random draws before food placement falls back to picking from the free cells
const FOOD_SAMPLE_ATTEMPTS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    pub fn opposite(self) -> Heading {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    /// One cell step in world units.
    pub fn delta(self) -> Coords {
        match self {
            Up => (0, -BOX_SIZE),
            Down => (0, BOX_SIZE),
            Left => (-BOX_SIZE, 0),
            Right => (BOX_SIZE, 0),
        }
    }

    pub fn head_char(self) -> char {
        match self {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Head ran into the body
    Crashed,
    /// No free cell left for food
    Won,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Active,
    GameOver(Outcome),
}

#[derive(Debug, Clone)]
pub struct Snake {
    /// Head first, tail last
    pub segments: VecDeque<Rect>,
    pub heading: Heading,
    /// Latest heading asked for by the player, applied on the next tick
    pub requested: Option<Heading>,
    pub food: Rect,
    pub score: u32,
    pub state: State,
    last_tick: Millis,
}

fn cell(x: i32, y: i32) -> Rect {
    Rect::new(x, y, BOX_SIZE, BOX_SIZE)
}

fn initial_segments() -> VecDeque<Rect> {
    (0..INITIAL_LENGTH as i32)
        .rev()
        .map(|i| cell(BOX_SIZE * i, 0))
        .collect()
}

impl Snake {
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        let mut snake = Snake {
            segments: initial_segments(),
            heading: Right,
            requested: None,
            food: cell(0, 0),
            score: 0,
            state: State::Active,
            last_tick: 0,
        };
        snake.spawn_food(rng);
        snake
    }

    pub fn head(&self) -> Rect {
        self.segments[0]
    }

    pub fn is_active(&self) -> bool {
        self.state == State::Active
    }

    pub fn steer(&mut self, heading: Heading) {
        self.requested = Some(heading);
    }

    /// Runs one movement step if a tick interval has passed since the last
    /// one. Returns the sound effects it triggered.
    pub fn update<R: Rng>(&mut self, now: Millis, rng: &mut R) -> Vec<Sound> {
        let mut sounds = vec![];

        if !self.is_active() || now.saturating_sub(self.last_tick) < TICK_INTERVAL_MS {
            return sounds;
        }
        self.last_tick = now;

        self.turn();
        self.move_step();
        self.wrap_head();

        if self.head().colliderect(&self.food) {
            self.eat(rng);
            sounds.push(Sound::Eat);
        }

        if self.is_active() && self.bites_itself() {
            log::info!("snake crashed with score {}", self.score);
            self.state = State::GameOver(Outcome::Crashed);
        }

        sounds
    }

    /// Reversing straight into the neck is ignored.
    fn turn(&mut self) {
        if let Some(requested) = self.requested {
            if requested != self.heading.opposite() {
                self.heading = requested;
            }
        }
    }

    fn move_step(&mut self) {
        let head = self.head();
        let (dx, dy) = self.heading.delta();

        self.segments.pop_back();
        self.segments.push_front(cell(head.x + dx, head.y + dy));
    }

    fn wrap_head(&mut self) {
        let head = &mut self.segments[0];

        if head.y > HEIGHT - BOX_SIZE {
            head.y = 0;
        }
        if head.y < 0 {
            head.y = HEIGHT - BOX_SIZE;
        }
        if head.x > WIDTH - BOX_SIZE {
            head.x = 0;
        }
        if head.x < 0 {
            head.x = WIDTH - BOX_SIZE;
        }
    }

    /// Grows by one cell at the food position and places new food.
    fn eat<R: Rng>(&mut self, rng: &mut R) {
        self.segments.push_front(cell(self.food.x, self.food.y));
        self.score += 1;
        log::debug!("ate food at {:?}, score {}", self.food.top_left(), self.score);

        if !self.spawn_food(rng) {
            log::info!("board full, snake wins with score {}", self.score);
            self.state = State::GameOver(Outcome::Won);
        }
    }

    /// The neck always touches the head after a step, so head and neck are
    /// left out.
    fn bites_itself(&self) -> bool {
        let head = self.head();
        self.segments.iter().skip(2).any(|segment| head.colliderect(segment))
    }

    pub fn occupies(&self, pos: Coords) -> bool {
        self.segments.iter().any(|segment| segment.top_left() == pos)
    }

    /// Places food on a random free cell. Returns false when every cell is
    /// taken, leaving the old food in place.
    pub fn spawn_food<R: Rng>(&mut self, rng: &mut R) -> bool {
        for _ in 0..FOOD_SAMPLE_ATTEMPTS {
            let pos = (rng.gen_range(0..COLS) * BOX_SIZE, rng.gen_range(0..ROWS) * BOX_SIZE);
            if !self.occupies(pos) {
                self.food = cell(pos.0, pos.1);
                return true;
            }
        }

        let free: Vec<Coords> = (0..ROWS)
            .flat_map(|row| (0..COLS).map(move |col| (col * BOX_SIZE, row * BOX_SIZE)))
            .filter(|pos| !self.occupies(*pos))
            .collect();

        match free.choose(rng) {
            Some(&(x, y)) => {
                self.food = cell(x, y);
                true
            }
            None => false,
        }
    }

    /// Only acts after game over: back to three segments heading right with
    /// a zero score. Returns whether a restart happened.
    pub fn restart<R: Rng>(&mut self, rng: &mut R) -> bool {
        if self.is_active() {
            return false;
        }

        self.segments = initial_segments();
        self.heading = Right;
        self.requested = None;
        self.score = 0;
        self.state = State::Active;

        if self.occupies(self.food.top_left()) {
            self.spawn_food(rng);
        }

        log::info!("snake respawned");
        true
    }
}
