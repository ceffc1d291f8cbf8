//! # fourinarow-game
//!
//! The playable part of four-in-a-row.
//!
//! This crate provides:
//! - `Match`, the per-frame game state machine
//! - The animation scheduler with drop and blink animations
//! - Screen, keypad and frame clock collaborators, plus headless doubles
//! - The hot-seat frame loop

pub mod animation;
pub mod frame;
pub mod game;
pub mod runner;

pub use animation::{Animation, BlinkTask, DropTask, Progress, Scheduler};
pub use frame::{
    FrameClock, FrameRecorder, GAME_PERIOD, Keypad, MENU_PERIOD, MenuFrame, Screen, ScriptedKeys,
};
pub use game::{BOARD_TOP, FrameReport, Match, Outcome, Phase};
pub use runner::run_local;
