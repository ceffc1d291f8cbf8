//! Frame collaborators: screen, keypad and frame clock
//!
//! The game and the lobby never talk to a terminal or a device directly.
//! They draw into a [`Pix`], hand it to a [`Screen`], read a [`KeySet`]
//! from a [`Keypad`], and wait on a [`FrameClock`].

use fourinarow_core::{KeySet, Pix, Result};
use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior};

/// Frame period while a match is running
pub const GAME_PERIOD: Duration = Duration::from_millis(150);

/// Frame period while the pairing menu is shown
pub const MENU_PERIOD: Duration = Duration::from_micros(1_000_000 / 24);

/// Something frames can be pushed to
pub trait Screen {
    /// Present a full pixel frame
    fn show(&mut self, frame: &Pix) -> Result<()>;

    /// Present a vertical menu with one highlighted entry
    fn show_menu(&mut self, title: &str, entries: &[String], selected: usize) -> Result<()>;
}

/// Source of the keys currently held down
pub trait Keypad {
    fn sample(&mut self) -> Result<KeySet>;
}

/// Sleeps until the next tick boundary
pub struct FrameClock {
    interval: Interval,
}

impl FrameClock {
    /// Must be called from inside a tokio runtime
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval }
    }

    pub async fn tick(&mut self) {
        self.interval.tick().await;
    }
}

/// A screen that keeps every frame it was shown
#[derive(Debug, Default)]
pub struct FrameRecorder {
    pub frames: Vec<Pix>,
    pub menus: Vec<MenuFrame>,
}

/// One presented menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuFrame {
    pub title: String,
    pub entries: Vec<String>,
    pub selected: usize,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_frame(&self) -> Option<&Pix> {
        self.frames.last()
    }

    pub fn last_menu(&self) -> Option<&MenuFrame> {
        self.menus.last()
    }
}

impl Screen for FrameRecorder {
    fn show(&mut self, frame: &Pix) -> Result<()> {
        self.frames.push(frame.clone());
        Ok(())
    }

    fn show_menu(&mut self, title: &str, entries: &[String], selected: usize) -> Result<()> {
        self.menus.push(MenuFrame {
            title: title.to_string(),
            entries: entries.to_vec(),
            selected,
        });
        Ok(())
    }
}

/// A keypad replaying a fixed sequence of samples
///
/// Once the script runs out every further sample returns `after`.
#[derive(Debug, Clone)]
pub struct ScriptedKeys {
    script: VecDeque<KeySet>,
    after: KeySet,
}

impl ScriptedKeys {
    pub fn new(script: impl IntoIterator<Item = KeySet>) -> Self {
        Self {
            script: script.into_iter().collect(),
            after: KeySet::NONE,
        }
    }

    /// Keep returning `keys` once the script is exhausted
    pub fn then(mut self, keys: KeySet) -> Self {
        self.after = keys;
        self
    }

    /// Append more samples to the script
    pub fn push(&mut self, keys: KeySet) {
        self.script.push_back(keys);
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl Keypad for ScriptedKeys {
    fn sample(&mut self) -> Result<KeySet> {
        Ok(self.script.pop_front().unwrap_or(self.after))
    }
}
