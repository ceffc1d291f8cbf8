//! Crossterm screen and keypad
//!
//! Each pixel is drawn as two colored spaces so the 8×8 screen looks
//! square. Terminals only report presses, so a key counts as held for the
//! one frame in which its press (or auto-repeat) arrived.

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use fourinarow_core::{FourError, KeySet, Pix, Result, color};
use fourinarow_game::{Keypad, Screen};
use std::io::{Stdout, Write};
use std::time::Duration;

fn display_error(e: std::io::Error) -> FourError {
    FourError::DisplayError(e.to_string())
}

/// Raw mode plus alternate screen, restored on drop
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn enter() -> Result<Self> {
        Self::init_term().map_err(display_error)?;
        let default_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = Self::clean_term();
            default_hook(info);
        }));
        Ok(Self)
    }

    fn init_term() -> std::io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(std::io::stdout(), EnterAlternateScreen, Hide, Clear(ClearType::All))
    }

    fn clean_term() -> std::io::Result<()> {
        execute!(std::io::stdout(), ResetColor, Show, LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = Self::clean_term();
    }
}

fn pixel_color(value: u8) -> Color {
    match value {
        color::GREEN => Color::Green,
        color::RED => Color::Red,
        color::YELLOW => Color::Yellow,
        _ => Color::Black,
    }
}

pub struct TerminalScreen {
    out: Stdout,
}

impl Default for TerminalScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalScreen {
    pub fn new() -> Self {
        Self {
            out: std::io::stdout(),
        }
    }

    fn draw_pixels(&mut self, frame: &Pix) -> std::io::Result<()> {
        queue!(self.out, MoveTo(0, 0))?;
        for (y, row) in frame.rows().enumerate() {
            queue!(self.out, MoveTo(0, y as u16))?;
            for &value in row {
                queue!(self.out, SetBackgroundColor(pixel_color(value)), Print("  "))?;
            }
            queue!(self.out, ResetColor)?;
        }
        self.out.flush()
    }

    fn draw_menu(&mut self, title: &str, entries: &[String], selected: usize) -> std::io::Result<()> {
        queue!(
            self.out,
            Clear(ClearType::All),
            MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(title),
            ResetColor
        )?;
        for (i, entry) in entries.iter().enumerate() {
            queue!(self.out, MoveTo(0, i as u16 + 2))?;
            if i == selected {
                queue!(
                    self.out,
                    SetAttribute(Attribute::Reverse),
                    Print(format!("> {}", entry)),
                    SetAttribute(Attribute::Reset)
                )?;
            } else {
                queue!(self.out, Print(format!("  {}", entry)))?;
            }
        }
        self.out.flush()
    }
}

impl Screen for TerminalScreen {
    fn show(&mut self, frame: &Pix) -> Result<()> {
        self.draw_pixels(frame).map_err(display_error)
    }

    fn show_menu(&mut self, title: &str, entries: &[String], selected: usize) -> Result<()> {
        self.draw_menu(title, entries, selected).map_err(display_error)
    }
}

/// Map a key event to device keys
pub fn keys_for(key: &KeyEvent) -> KeySet {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeySet::QUIT;
    }
    match key.code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('h') => KeySet::LEFT,
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('l') => KeySet::RIGHT,
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('k') => KeySet::UP,
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('j') => KeySet::DOWN,
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('o') => KeySet::O,
        KeyCode::Char('x') => KeySet::X,
        KeyCode::Esc | KeyCode::Char('q') => KeySet::QUIT,
        _ => KeySet::NONE,
    }
}

/// Keys pressed since the previous sample
#[derive(Debug, Default)]
pub struct TerminalKeypad;

impl Keypad for TerminalKeypad {
    fn sample(&mut self) -> Result<KeySet> {
        let mut keys = KeySet::NONE;
        // Zero timeout: never block the frame
        while event::poll(Duration::ZERO).map_err(|e| FourError::InputError(e.to_string()))? {
            let ev = event::read().map_err(|e| FourError::InputError(e.to_string()))?;
            if let Event::Key(key) = ev {
                if key.kind != KeyEventKind::Release {
                    keys = keys | keys_for(&key);
                }
            }
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(keys_for(&press(KeyCode::Left)), KeySet::LEFT);
        assert_eq!(keys_for(&press(KeyCode::Char('x'))), KeySet::X);
        assert_eq!(keys_for(&press(KeyCode::Enter)), KeySet::O);
        assert_eq!(keys_for(&press(KeyCode::Esc)), KeySet::QUIT);
        assert_eq!(keys_for(&press(KeyCode::Char('z'))), KeySet::NONE);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(keys_for(&key), KeySet::QUIT);
    }

    #[test]
    fn test_palette() {
        assert_eq!(pixel_color(color::OFF), Color::Black);
        assert_eq!(pixel_color(color::RED), Color::Red);
    }
}
