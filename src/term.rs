use std::{io::{Stdout, Write, stdout}, time::Duration};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{
    Event, KeyEvent, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags, poll, read,
};

use crate::input::is_press;
use crate::Result;

pub type TermInt = u16;

/// Character frame buffer. Games redraw it from scratch every frame and
/// `TermManager::present` writes out only what changed.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    width: TermInt,
    height: TermInt,
    cells: Vec<char>,
}

impl Canvas {
    pub fn new(width: TermInt, height: TermInt) -> Self {
        Canvas { width, height, cells: vec![' '; width as usize * height as usize] }
    }

    pub fn width(&self) -> TermInt {
        self.width
    }

    pub fn height(&self) -> TermInt {
        self.height
    }

    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = ' ');
    }

    /// Writes outside the canvas are dropped.
    pub fn put(&mut self, x: i32, y: i32, ch: char) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        self.cells[self.width as usize * y as usize + x as usize] = ch;
    }

    pub fn get(&self, x: TermInt, y: TermInt) -> char {
        self.cells[self.width as usize * y as usize + x as usize]
    }

    pub fn row(&self, y: TermInt) -> String {
        (0..self.width).map(|x| self.get(x, y)).collect()
    }

    pub fn text(&mut self, x: i32, y: i32, text: &str) {
        for (i, ch) in text.chars().enumerate() {
            self.put(x + i as i32, y, ch);
        }
    }

    pub fn text_centered(&mut self, y: i32, text: &str) {
        let x = (self.width as i32 - text.chars().count() as i32) / 2;
        self.text(x, y, text);
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, ch: char) {
        for yy in y..y + h {
            for xx in x..x + w {
                self.put(xx, yy, ch);
            }
        }
    }

    pub fn vline(&mut self, x: i32, ch: char) {
        for y in 0..self.height as i32 {
            self.put(x, y, ch);
        }
    }

    /// Outline of the `w` x `h` box whose top-left corner is at (x, y).
    pub fn border(&mut self, x: i32, y: i32, w: i32, h: i32) {
        let (end_x, end_y) = (x + w - 1, y + h - 1);

        for xx in x..=end_x {
            let ch = if xx == x || xx == end_x {'+'} else {'-'};
            self.put(xx, y, ch);
            self.put(xx, end_y, ch);
        }

        for yy in y + 1..end_y {
            self.put(x, yy, '|');
            self.put(end_x, yy, '|');
        }
    }

    /// Centred message box with a blank line above and below the text.
    pub fn banner(&mut self, lines: &[&str]) {
        let msg_height = lines.len() as i32 + 2;
        let msg_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as i32 + 2;
        let left = (self.width as i32 - msg_width) / 2;
        let top = (self.height as i32 - msg_height) / 2;

        self.fill_rect(left - 1, top - 1, msg_width + 2, msg_height + 2, ' ');
        for x in left - 1..=left + msg_width {
            self.put(x, top - 1, '-');
            self.put(x, top + msg_height, '-');
        }
        for y in top..top + msg_height {
            self.put(left - 1, y, '|');
            self.put(left + msg_width, y, '|');
        }

        for (i, line) in lines.iter().enumerate() {
            let padded = format!("{line: ^width$}", line = line, width = msg_width as usize);
            self.text(left, top + 1 + i as i32, &padded);
        }
    }
}

pub struct TermManager {
    stdout: Stdout,
    front: Option<Canvas>,
    enhanced_keys: bool,
    active: bool,
}

impl TermManager {
    pub fn new() -> Self {
        TermManager { stdout: stdout(), front: None, enhanced_keys: false, active: false }
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        self.active = true;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)?;

        // Release events make held keys exact; without them input falls back
        // to a hold window
        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                self.stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            self.enhanced_keys = true;
        }

        log::info!("terminal ready, release events: {}", self.enhanced_keys);
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        if self.enhanced_keys {
            execute!(self.stdout, PopKeyboardEnhancementFlags)?;
        }
        terminal::disable_raw_mode()?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)?;
        log::info!("terminal restored");
        Ok(())
    }

    pub fn reports_release(&self) -> bool {
        self.enhanced_keys
    }

    pub fn size(&self) -> Result<(TermInt, TermInt)> {
        Ok(terminal::size()?)
    }

    pub fn read_key_blocking(&self) -> Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read()? {
                if is_press(&ev) {
                    return Ok(ev);
                }
            }
        }
    }

    pub fn read_key_events_queue(&self) -> Result<Vec<KeyEvent>> {
        let mut events = vec![];

        while poll(Duration::ZERO)? {
            if let Event::Key(ev) = read()? {
                events.push(ev);
            }
        }

        Ok(events)
    }

    /// Draws the canvas, writing only cells that differ from the last
    /// presented frame (everything after a resize).
    pub fn present(&mut self, canvas: &Canvas) -> Result<()> {
        let full_redraw = match &self.front {
            Some(front) => front.width != canvas.width || front.height != canvas.height,
            None => true,
        };

        if full_redraw {
            queue!(self.stdout, terminal::Clear(ClearType::All))?;
        }

        for y in 0..canvas.height {
            for x in 0..canvas.width {
                let ch = canvas.get(x, y);
                let changed = match &self.front {
                    Some(front) if !full_redraw => front.get(x, y) != ch,
                    _ => ch != ' ',
                };
                if changed {
                    queue!(self.stdout, cursor::MoveTo(x, y), style::Print(ch))?;
                }
            }
        }

        self.stdout.flush()?;
        self.front = Some(canvas.clone());
        Ok(())
    }

    pub fn bell(&mut self) -> Result<()> {
        queue!(self.stdout, style::Print('\x07'))?;
        Ok(())
    }
}

impl Default for TermManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            log::error!("failed to restore terminal: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_clips_to_canvas() {
        let mut canvas = Canvas::new(4, 2);
        canvas.put(-1, 0, 'x');
        canvas.put(4, 0, 'x');
        canvas.put(0, 2, 'x');
        canvas.put(3, 1, 'o');

        assert_eq!(canvas.row(0), "    ");
        assert_eq!(canvas.row(1), "   o");
    }

    #[test]
    fn test_text_centered_and_clear() {
        let mut canvas = Canvas::new(10, 1);
        canvas.text_centered(0, "ab");
        assert_eq!(canvas.row(0), "    ab    ");

        canvas.clear();
        assert_eq!(canvas.row(0), " ".repeat(10));
    }

    #[test]
    fn test_border() {
        let mut canvas = Canvas::new(7, 4);
        canvas.border(1, 0, 5, 3);

        assert_eq!(canvas.row(0), " +---+ ");
        assert_eq!(canvas.row(1), " |   | ");
        assert_eq!(canvas.row(2), " +---+ ");
        assert_eq!(canvas.row(3), "       ");
    }

    #[test]
    fn test_banner_is_boxed_and_centred() {
        let mut canvas = Canvas::new(20, 9);
        canvas.fill_rect(0, 0, 20, 9, '#');
        canvas.banner(&["GAME OVER", "hi"]);

        assert_eq!(canvas.row(0), "#".repeat(20));
        assert_eq!(canvas.row(1), "###-------------####");
        assert_eq!(canvas.row(2), "###|           |####");
        assert_eq!(canvas.row(3), "###| GAME OVER |####");
        assert_eq!(canvas.row(4), "###|    hi     |####");
        assert_eq!(canvas.row(5), "###|           |####");
        assert_eq!(canvas.row(6), "###-------------####");
    }
}
