//! # fourinarow-core
//!
//! Core types for four-in-a-row.
//!
//! This crate provides the pieces every other crate builds on:
//! - Board, cells and players
//! - Win detection
//! - Pixel buffers and the palette
//! - Key bitmasks sampled once per frame
//! - The shared error type

pub mod board;
pub mod error;
pub mod keys;
pub mod pix;
pub mod win;

pub use board::{Board, COLUMNS, Cell, Coord, Player, ROWS};
pub use error::{FourError, Result};
pub use keys::KeySet;
pub use pix::{Pix, SCREEN_SIZE, color};
pub use win::{WinningLine, find_winning_line};
