use crossterm::event::{KeyCode, KeyEvent};
use rand::{rngs::StdRng, SeedableRng};

use crate::Millis;
use crate::audio::Sound;
use crate::game::Game;
use crate::geom::Rect;
use crate::input::{KeyState, is_restart};
use crate::pong::{Controls, HEIGHT, PaddleKeys, Phase, Pong, WIDTH};
use crate::term::{Canvas, TermInt};

const PADDLE_CHAR: char = '█';
const BALL_CHAR: char = 'O';
const NET_CHAR: char = ':';

const LEFT_UP: KeyCode = KeyCode::Char('e');
const LEFT_DOWN: KeyCode = KeyCode::Char('d');
const RIGHT_UP: KeyCode = KeyCode::Char('i');
const RIGHT_DOWN: KeyCode = KeyCode::Char('k');

/// Height of the score line as a fraction of the field, 170 of 720 units.
const SCORE_Y: i32 = 170;

pub struct PongGame {
    pong: Pong,
    rng: StdRng,
}

impl PongGame {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_rng(mut rng: StdRng) -> Self {
        let pong = Pong::new(&mut rng);
        PongGame { pong, rng }
    }

    pub fn state(&self) -> &Pong {
        &self.pong
    }

    pub fn state_mut(&mut self) -> &mut Pong {
        &mut self.pong
    }
}

impl Default for PongGame {
    fn default() -> Self {
        Self::new()
    }
}

pub fn controls(keys: &KeyState, now: Millis) -> Controls {
    Controls {
        left: PaddleKeys { up: keys.is_held(LEFT_UP, now), down: keys.is_held(LEFT_DOWN, now) },
        right: PaddleKeys { up: keys.is_held(RIGHT_UP, now), down: keys.is_held(RIGHT_DOWN, now) },
    }
}

/// Floor-scales a world coordinate onto `cells` terminal cells.
fn scale(v: i32, cells: TermInt, world: i32) -> i32 {
    (v as i64 * cells as i64).div_euclid(world as i64) as i32
}

/// Terminal cells covered by a world rect; never less than one cell.
fn cell_rect(rect: &Rect, cols: TermInt, rows: TermInt) -> Rect {
    let x = scale(rect.left(), cols, WIDTH);
    let y = scale(rect.top(), rows, HEIGHT);
    let right = scale(rect.right(), cols, WIDTH).max(x + 1);
    let bottom = scale(rect.bottom(), rows, HEIGHT).max(y + 1);
    Rect::new(x, y, right - x, bottom - y)
}

fn fill(canvas: &mut Canvas, rect: &Rect, ch: char) {
    let cells = cell_rect(rect, canvas.width(), canvas.height());
    canvas.fill_rect(cells.x, cells.y, cells.w, cells.h, ch);
}

impl Game for PongGame {
    fn title(&self) -> &'static str {
        "Pong"
    }

    fn intro(&self) -> Vec<String> {
        vec![
            "E / D to move the left paddle".to_string(),
            "I / K to move the right paddle".to_string(),
            "First to 3 points wins".to_string(),
            "Space to play again after game over".to_string(),
        ]
    }

    fn min_size(&self) -> (TermInt, TermInt) {
        (40, 12)
    }

    fn on_key(&mut self, ev: &KeyEvent, now: Millis) {
        if is_restart(ev) {
            self.pong.restart(now);
        }
    }

    fn frame(&mut self, keys: &KeyState, dt: f64, now: Millis) -> Vec<Sound> {
        let controls = controls(keys, now);
        self.pong.update(&controls, dt, now, &mut self.rng)
    }

    fn draw(&self, canvas: &mut Canvas, now: Millis) {
        let (cols, rows) = (canvas.width(), canvas.height());
        let pong = &self.pong;

        canvas.vline(cols as i32 / 2, NET_CHAR);

        if let Some(remaining) = pong.countdown(now) {
            canvas.text_centered(rows as i32 / 2, &remaining.to_string());
        }

        fill(canvas, &pong.left.rect, PADDLE_CHAR);
        fill(canvas, &pong.right.rect, PADDLE_CHAR);
        fill(canvas, &pong.ball.rect, BALL_CHAR);

        let score = format!("{}    {}", pong.scores[0], pong.scores[1]);
        canvas.text_centered(scale(SCORE_Y, rows, HEIGHT), &score);

        if pong.phase == Phase::GameOver {
            canvas.banner(&["GAME OVER", "", "Press Space to play again,", "or CTRL+C to quit."]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyModifiers};

    fn game() -> PongGame {
        PongGame::with_rng(StdRng::seed_from_u64(11))
    }

    #[test]
    fn test_key_bindings_drive_paddles() {
        let mut keys = KeyState::new(180, false);
        keys.apply(&KeyEvent::new(KeyCode::Char('E'), KeyModifiers::SHIFT), 0);
        keys.apply(&KeyEvent::new(KeyCode::Char('k'), KeyModifiers::NONE), 0);

        let c = controls(&keys, 10);
        assert_eq!(c.left, PaddleKeys { up: true, down: false });
        assert_eq!(c.right, PaddleKeys { up: false, down: true });

        let mut release = KeyEvent::new(KeyCode::Char('k'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        keys.apply(&release, 20);
        assert!(!controls(&keys, 20).right.down);
    }

    #[test]
    fn test_cell_mapping() {
        // 10 units per column, 20 per row
        assert_eq!(cell_rect(&Rect::new(10, 300, 6, 120), 128, 36), Rect::new(1, 15, 1, 6));
        assert_eq!(cell_rect(&Rect::new(-25, 0, 10, 10), 128, 36), Rect::new(-3, 0, 1, 1));
    }

    #[test]
    fn test_draw_layout() {
        let mut game = game();
        game.state_mut().ball.rect = Rect::new(400, 400, 10, 10);
        let mut canvas = Canvas::new(128, 36);

        game.draw(&mut canvas, 0);

        assert_eq!(canvas.get(1, 15), PADDLE_CHAR);
        assert_eq!(canvas.get(1, 20), PADDLE_CHAR);
        assert_eq!(canvas.get(1, 21), ' ');
        assert_eq!(canvas.get(126, 15), PADDLE_CHAR);
        assert_eq!(canvas.get(40, 20), BALL_CHAR);
        assert_eq!(canvas.get(64, 0), NET_CHAR);
        assert!(canvas.row(8).contains("0    0"));
    }

    #[test]
    fn test_countdown_and_game_over_overlays() {
        let mut game = game();
        game.state_mut().phase = Phase::PointDelay { since: 0 };
        let mut canvas = Canvas::new(128, 36);
        game.draw(&mut canvas, 1_200);
        assert!(canvas.row(18).contains('2'));

        game.state_mut().phase = Phase::GameOver;
        let mut canvas = Canvas::new(128, 36);
        game.draw(&mut canvas, 0);
        assert!((0..36).any(|y| canvas.row(y).contains("GAME OVER")));

        let space = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE);
        game.on_key(&space, 5_000);
        assert_eq!(game.state().phase, Phase::PointDelay { since: 5_000 });
    }
}
