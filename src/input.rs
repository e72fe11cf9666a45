//! Polled key state built from the terminal's key event stream.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::Millis;

pub struct KeyState {
    held: HashMap<KeyCode, Millis>,
    hold_ms: Millis,
    reports_release: bool,
}

impl KeyState {
    /// `hold_ms` only matters when the terminal cannot report key releases:
    /// a key then counts as held until that long after its last press or
    /// auto-repeat.
    pub fn new(hold_ms: Millis, reports_release: bool) -> Self {
        KeyState { held: HashMap::new(), hold_ms, reports_release }
    }

    pub fn apply(&mut self, ev: &KeyEvent, now: Millis) {
        let code = normalize(ev.code);

        match ev.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.held.insert(code, now);
            }
            KeyEventKind::Release => {
                self.held.remove(&code);
            }
        }
    }

    pub fn is_held(&self, code: KeyCode, now: Millis) -> bool {
        match self.held.get(&normalize(code)) {
            Some(_) if self.reports_release => true,
            Some(&since) => now.saturating_sub(since) <= self.hold_ms,
            None => false,
        }
    }

    /// Drops keys whose hold window has passed.
    pub fn expire(&mut self, now: Millis) {
        if self.reports_release {
            return;
        }

        let hold_ms = self.hold_ms;
        self.held.retain(|_, since| now.saturating_sub(*since) <= hold_ms);
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }
}

/// Letter bindings are case-insensitive.
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

pub fn is_press(ev: &KeyEvent) -> bool {
    ev.kind != KeyEventKind::Release
}

pub fn is_quit(ev: &KeyEvent) -> bool {
    is_press(ev)
        && match ev.code {
            KeyCode::Char('c') => ev.modifiers.contains(KeyModifiers::CONTROL),
            KeyCode::Char('q') | KeyCode::Char('Q') => true,
            _ => false,
        }
}

pub fn is_restart(ev: &KeyEvent) -> bool {
    is_press(ev) && ev.code == KeyCode::Char(' ')
}

pub fn is_pause(ev: &KeyEvent) -> bool {
    is_press(ev) && ev.code == KeyCode::Esc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent { code, modifiers: KeyModifiers::NONE, kind, state: KeyEventState::NONE }
    }

    #[test]
    fn test_hold_window_without_release_reports() {
        let mut keys = KeyState::new(180, false);
        keys.apply(&key(KeyCode::Char('E'), KeyEventKind::Press), 1000);

        assert!(keys.is_held(KeyCode::Char('e'), 1100));
        assert!(keys.is_held(KeyCode::Char('e'), 1180));
        assert!(!keys.is_held(KeyCode::Char('e'), 1181));

        // Auto-repeat renews the window
        keys.apply(&key(KeyCode::Char('e'), KeyEventKind::Press), 1150);
        assert!(keys.is_held(KeyCode::Char('e'), 1300));

        keys.expire(2000);
        assert!(!keys.is_held(KeyCode::Char('e'), 1300));
    }

    #[test]
    fn test_release_reporting_terminal() {
        let mut keys = KeyState::new(180, true);
        keys.apply(&key(KeyCode::Up, KeyEventKind::Press), 0);

        assert!(keys.is_held(KeyCode::Up, 60_000));

        keys.apply(&key(KeyCode::Up, KeyEventKind::Release), 60_001);
        assert!(!keys.is_held(KeyCode::Up, 60_001));
    }

    #[test]
    fn test_bindings() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(is_quit(&ctrl_c));
        assert!(!is_quit(&key(KeyCode::Char('c'), KeyEventKind::Press)));
        assert!(is_quit(&key(KeyCode::Char('q'), KeyEventKind::Press)));
        assert!(is_restart(&key(KeyCode::Char(' '), KeyEventKind::Press)));
        assert!(!is_restart(&key(KeyCode::Char(' '), KeyEventKind::Release)));
        assert!(is_pause(&key(KeyCode::Esc, KeyEventKind::Press)));
    }
}
