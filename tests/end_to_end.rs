use arcade::audio::Sound;
use arcade::game::Game;
use arcade::geom::Rect;
use arcade::input::KeyState;
use arcade::pong::{self, Phase, Side};
use arcade::pong_game::PongGame;
use arcade::snake::{self, BOX_SIZE};
use arcade::snake_game::SnakeGame;
use arcade::term::Canvas;
use glam::DVec2;
use rand::{rngs::StdRng, SeedableRng};

const DT: f64 = 1.0 / 60.0;

#[test]
fn pong_point_pauses_then_resumes_with_fresh_ball() {
    let mut game = PongGame::with_rng(StdRng::seed_from_u64(42));
    let keys = KeyState::new(180, false);

    // Ball heading right, just short of the scoring line
    let ball = &mut game.state_mut().ball;
    ball.pos = DVec2::new((pong::WIDTH + pong::OFFSCREEN_MARGIN - 2) as f64, 300.0);
    ball.direction = DVec2::new(1.0, 1.0);
    ball.speed = 400.0;

    game.frame(&keys, DT, 5_000);

    let state = game.state();
    assert_eq!(state.score(Side::Left), 1);
    assert_eq!(state.score(Side::Right), 0);
    assert_eq!(state.phase, Phase::PointDelay { since: 5_000 });
    assert_eq!(state.ball.rect.x, pong::WIDTH / 2 - pong::BALL_SIZE / 2);
    assert_eq!(state.ball.speed, pong::BALL_START_SPEED);

    // Frozen for the whole delay, with the countdown on screen
    let spawned = state.ball.clone();
    let mut canvas = Canvas::new(128, 36);
    game.draw(&mut canvas, 6_500);
    assert!(canvas.row(18).contains('2'));
    for now in (5_016..8_000).step_by(16) {
        game.frame(&keys, DT, now);
    }
    assert_eq!(game.state().ball, spawned);

    game.frame(&keys, DT, 8_000);
    assert_eq!(game.state().phase, Phase::Playing);
    assert_ne!(game.state().ball.pos, spawned.pos);
    assert_eq!(game.state().scores, [1, 0]);
}

#[test]
fn snake_eats_food_and_grows() {
    let mut game = SnakeGame::with_rng(StdRng::seed_from_u64(42));
    let keys = KeyState::new(180, false);
    let head = game.state().head();
    game.state_mut().food = Rect::new(head.x + BOX_SIZE, head.y, BOX_SIZE, BOX_SIZE);
    let eaten_at = game.state().food.top_left();

    let sounds = game.frame(&keys, DT, snake::TICK_INTERVAL_MS);

    let state = game.state();
    assert_eq!(sounds, vec![Sound::Eat]);
    assert_eq!(state.score, 1);
    assert_eq!(state.segments.len(), snake::INITIAL_LENGTH + 1);
    assert_eq!(state.head().top_left(), eaten_at);
    assert_ne!(state.food.top_left(), eaten_at);
    assert!(state.segments.iter().all(|s| s.top_left() != state.food.top_left()));
}
