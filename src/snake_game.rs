use crossterm::event::{KeyCode, KeyEvent};
use rand::{rngs::StdRng, SeedableRng};

use crate::Millis;
use crate::audio::Sound;
use crate::game::Game;
use crate::geom::Rect;
use crate::input::{KeyState, is_restart};
use crate::snake::{BOX_SIZE, COLS, Heading, Outcome, ROWS, Snake, State};
use crate::term::{Canvas, TermInt};

const SNAKE_BODY_CHAR: char = '█';
const DEAD_SNAKE_CHAR: char = 'X';
const FOOD_CHARS: [char; 2] = ['(', ')'];

/// Terminal columns per grid cell; cells are roughly twice as tall as wide
const CELL_COLS: i32 = 2;
const BOARD_COLS: i32 = COLS * CELL_COLS + 2;
const BOARD_ROWS: i32 = ROWS + 2;

/// Arrow keys in the order they are checked each frame.
const STEERING: [(KeyCode, Heading); 4] = [
    (KeyCode::Up, Heading::Up),
    (KeyCode::Down, Heading::Down),
    (KeyCode::Right, Heading::Right),
    (KeyCode::Left, Heading::Left),
];

pub struct SnakeGame {
    snake: Snake,
    rng: StdRng,
}

impl SnakeGame {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_rng(mut rng: StdRng) -> Self {
        let snake = Snake::new(&mut rng);
        SnakeGame { snake, rng }
    }

    pub fn state(&self) -> &Snake {
        &self.snake
    }

    pub fn state_mut(&mut self) -> &mut Snake {
        &mut self.snake
    }

    fn board_origin(canvas: &Canvas) -> (i32, i32) {
        let x = (canvas.width() as i32 - BOARD_COLS) / 2;
        let y = (canvas.height() as i32 - BOARD_ROWS - 1) / 2;
        (x.max(0), y.max(0))
    }

    fn print_cell(canvas: &mut Canvas, origin: (i32, i32), rect: &Rect, chars: [char; 2]) {
        let x = origin.0 + 1 + rect.x / BOX_SIZE * CELL_COLS;
        let y = origin.1 + 1 + rect.y / BOX_SIZE;
        canvas.put(x, y, chars[0]);
        canvas.put(x + 1, y, chars[1]);
    }
}

impl Default for SnakeGame {
    fn default() -> Self {
        Self::new()
    }
}

/// The first held arrow key, if any.
pub fn steering(keys: &KeyState, now: Millis) -> Option<Heading> {
    STEERING
        .iter()
        .find(|(code, _)| keys.is_held(*code, now))
        .map(|&(_, heading)| heading)
}

impl Game for SnakeGame {
    fn title(&self) -> &'static str {
        "Snake"
    }

    fn intro(&self) -> Vec<String> {
        vec![
            "Arrow keys to move".to_string(),
            "Edges wrap around".to_string(),
            "Space to play again after game over".to_string(),
        ]
    }

    fn min_size(&self) -> (TermInt, TermInt) {
        (BOARD_COLS as TermInt, BOARD_ROWS as TermInt + 1)
    }

    fn on_key(&mut self, ev: &KeyEvent, _now: Millis) {
        if is_restart(ev) {
            self.snake.restart(&mut self.rng);
        }
    }

    fn frame(&mut self, keys: &KeyState, _dt: f64, now: Millis) -> Vec<Sound> {
        if !self.snake.is_active() {
            return vec![];
        }

        if let Some(heading) = steering(keys, now) {
            self.snake.steer(heading);
        }
        self.snake.update(now, &mut self.rng)
    }

    fn draw(&self, canvas: &mut Canvas, _now: Millis) {
        let origin = Self::board_origin(canvas);
        let snake = &self.snake;
        let dead = snake.state == State::GameOver(Outcome::Crashed);

        canvas.border(origin.0, origin.1, BOARD_COLS, BOARD_ROWS);
        Self::print_cell(canvas, origin, &snake.food, FOOD_CHARS);

        // Tail first so the head is drawn on top of a doubled-up cell
        for (i, segment) in snake.segments.iter().enumerate().rev() {
            let ch = if dead {
                DEAD_SNAKE_CHAR
            } else if i == 0 {
                snake.heading.head_char()
            } else {
                SNAKE_BODY_CHAR
            };
            Self::print_cell(canvas, origin, segment, [ch, ch]);
        }

        let score = format!("() {}", snake.score);
        let score_x = origin.0 + BOARD_COLS - score.chars().count() as i32;
        canvas.text(score_x, origin.1 + BOARD_ROWS, &score);

        if let State::GameOver(outcome) = snake.state {
            let headline = match outcome {
                Outcome::Crashed => "GAME OVER",
                Outcome::Won => "You won!",
            };
            canvas.banner(&[
                headline,
                &format!("Score: {}", snake.score),
                "",
                "Press Space to play again,",
                "or CTRL+C to quit.",
            ]);
        }
    }
}
