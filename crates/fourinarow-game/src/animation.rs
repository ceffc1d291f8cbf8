//! Cooperative animations
//!
//! Each animation is a small state machine that draws one frame's worth of
//! change per step and keeps its own progress between frames. The
//! [`Scheduler`] steps every registered animation once per frame and drops
//! the ones that report they are done.

use crate::game::BOARD_TOP;
use fourinarow_core::{Coord, Pix, WinningLine, color};

/// Result of stepping an animation once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Running,
    Done,
}

/// A piece falling from the top of the screen into its resting cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTask {
    color: u8,
    column: u8,
    /// Screen row of the resting cell
    target: u8,
    /// Screen row lit on the next step
    next: u8,
}

impl DropTask {
    /// Animate a piece of `color` coming to rest at board cell `landing`
    pub fn new(color: u8, landing: Coord) -> Self {
        Self {
            color,
            column: landing.column,
            target: landing.row + BOARD_TOP,
            next: 1,
        }
    }

    /// Screen row of the resting cell
    pub fn target(&self) -> u8 {
        self.target
    }

    /// The board already holds the piece, so its resting pixel is blanked
    /// until the fall reaches it.
    fn step(&mut self, screen: &mut Pix) -> Progress {
        screen.set_pixel(self.column, self.target, color::OFF);
        screen.set_pixel(self.column, self.next, self.color);
        self.next += 1;
        if self.next >= self.target {
            Progress::Done
        } else {
            Progress::Running
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlinkPhase {
    /// Another animation is still running
    Waiting,
    /// The line was left visible this frame
    Lit,
    /// The line was blanked this frame
    Dark,
}

/// The winning line flashing on and off. Never finishes on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlinkTask {
    line: WinningLine,
    phase: BlinkPhase,
}

impl BlinkTask {
    pub fn new(line: WinningLine) -> Self {
        Self {
            line,
            phase: BlinkPhase::Waiting,
        }
    }

    /// Whether the line is blanked on the current frame
    pub fn is_dark(&self) -> bool {
        self.phase == BlinkPhase::Dark
    }

    fn step(&mut self, screen: &mut Pix, active: usize) -> Progress {
        self.phase = match self.phase {
            BlinkPhase::Waiting if active > 1 => BlinkPhase::Waiting,
            BlinkPhase::Waiting | BlinkPhase::Dark => BlinkPhase::Lit,
            BlinkPhase::Lit => {
                for cell in self.line.cells() {
                    screen.set_pixel(cell.column, cell.row + BOARD_TOP, color::OFF);
                }
                BlinkPhase::Dark
            }
        };
        Progress::Running
    }
}

/// An animation owned by the scheduler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Animation {
    Drop(DropTask),
    Blink(BlinkTask),
}

impl Animation {
    /// Advance by one frame. `active` is how many animations are
    /// registered at the moment this one is stepped.
    fn step(&mut self, screen: &mut Pix, active: usize) -> Progress {
        match self {
            Animation::Drop(task) => task.step(screen),
            Animation::Blink(task) => task.step(screen, active),
        }
    }
}

impl From<DropTask> for Animation {
    fn from(task: DropTask) -> Self {
        Animation::Drop(task)
    }
}

impl From<BlinkTask> for Animation {
    fn from(task: BlinkTask) -> Self {
        Animation::Blink(task)
    }
}

/// Collection of running animations
#[derive(Debug, Default)]
pub struct Scheduler {
    tasks: Vec<Animation>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an animation; it is first stepped on the next `step_all`
    pub fn add(&mut self, task: impl Into<Animation>) {
        self.tasks.push(task.into());
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn count(&self) -> usize {
        self.tasks.len()
    }

    pub fn tasks(&self) -> &[Animation] {
        &self.tasks
    }

    /// Step every animation once, newest first, removing the ones that finish
    ///
    /// Walking from the back means a removal never shifts an animation that
    /// has not been stepped yet.
    pub fn step_all(&mut self, screen: &mut Pix) {
        for i in (0..self.tasks.len()).rev() {
            let active = self.tasks.len();
            if self.tasks[i].step(screen, active) == Progress::Done {
                self.tasks.remove(i);
            }
        }
    }
}
