use std::thread::sleep;

use crossterm::event::KeyEvent;

use crate::{Error, Millis, Result};
use crate::audio::{Mixer, Sound};
use crate::clock::Clock;
use crate::config::Settings;
use crate::input::{KeyState, is_pause, is_press, is_quit};
use crate::term::{Canvas, TermInt, TermManager};

/// One arcade game as seen by the frame loop.
pub trait Game {
    fn title(&self) -> &'static str;

    /// Controls and rules shown before the first frame.
    fn intro(&self) -> Vec<String>;

    /// Smallest terminal (columns, rows) the game can be drawn in.
    fn min_size(&self) -> (TermInt, TermInt);

    /// Discrete key presses (restart and the like). Held keys are read from
    /// the `KeyState` passed to `frame`.
    fn on_key(&mut self, ev: &KeyEvent, now: Millis);

    /// Advances the game by one frame of `dt` seconds.
    fn frame(&mut self, keys: &KeyState, dt: f64, now: Millis) -> Vec<Sound>;

    fn draw(&self, canvas: &mut Canvas, now: Millis);
}

/// Runs the game until the player quits. The terminal is restored on every
/// exit path.
pub fn run<G: Game>(game: &mut G, settings: &Settings) -> Result<()> {
    let mut term = TermManager::new();
    let (width, height) = term.size()?;
    let need = game.min_size();
    if width < need.0 || height < need.1 {
        return Err(Error::TerminalTooSmall { need, have: (width, height) });
    }

    term.setup()?;
    log::info!("starting {} on a {}x{} terminal", game.title(), width, height);

    let result = match show_intro(game, &mut term) {
        Ok(true) => play(game, settings, &mut term),
        Ok(false) => Ok(()),
        Err(err) => Err(err),
    };

    term.restore()?;
    result
}

/// Returns false if the player quit from the intro screen.
fn show_intro<G: Game>(game: &G, term: &mut TermManager) -> Result<bool> {
    let (width, height) = term.size()?;
    let mut lines = game.intro();
    lines.extend(
        ["", "Esc to pause", "CTRL+C or Q to quit", "", "Press any key to begin"]
            .iter()
            .map(|s| s.to_string()),
    );
    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();

    let mut canvas = Canvas::new(width, height);
    canvas.text_centered(1, game.title());
    canvas.banner(&lines);
    term.present(&canvas)?;

    Ok(!is_quit(&term.read_key_blocking()?))
}

fn play<G: Game>(game: &mut G, settings: &Settings, term: &mut TermManager) -> Result<()> {
    let mixer = Mixer::new(settings);
    let mut keys = KeyState::new(settings.key_hold.as_millis() as Millis, term.reports_release());
    let mut clock = Clock::new();
    let mut canvas = Canvas::new(0, 0);

    loop {
        let now = clock.ticks();

        for ev in term.read_key_events_queue()? {
            if is_quit(&ev) {
                log::info!("quit requested");
                return Ok(());
            }

            if is_pause(&ev) {
                clock.toggle_pause();
                keys.clear();
                log::debug!("paused: {}", clock.is_paused());
                continue;
            }

            if clock.is_paused() {
                continue;
            }

            keys.apply(&ev, now);
            if is_press(&ev) {
                game.on_key(&ev, now);
            }
        }
        keys.expire(now);

        if !clock.is_paused() {
            let dt = clock.frame_dt();
            let sounds = game.frame(&keys, dt, now);
            if mixer.mix(&sounds) {
                term.bell()?;
            }
        }

        let (width, height) = term.size()?;
        if (canvas.width(), canvas.height()) != (width, height) {
            canvas = Canvas::new(width, height);
        } else {
            canvas.clear();
        }

        let need = game.min_size();
        if width < need.0 || height < need.1 {
            canvas.text_centered(height as i32 / 2, "Terminal too small, please enlarge");
        } else {
            game.draw(&mut canvas, now);
            if clock.is_paused() {
                canvas.banner(&["Paused", "Press Esc to resume", "or CTRL+C to quit"]);
            }
        }
        term.present(&canvas)?;

        sleep(settings.frame_interval);
    }
}
