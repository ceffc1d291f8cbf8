//! Local game state machine
//!
//! A [`Match`] owns everything that changes while a game is played: the
//! board, the cursor, whose turn it is, the previous frame's keys and the
//! running animations. [`Match::step`] advances it by exactly one frame.

use crate::animation::{BlinkTask, DropTask, Scheduler};
use fourinarow_core::{
    Board, COLUMNS, Coord, KeySet, Pix, Player, WinningLine, color, find_winning_line,
};
use tracing::{debug, info};

/// Screen row where board row 0 is drawn
pub const BOARD_TOP: u8 = 2;

/// Column the cursor starts on
pub const START_COLUMN: u8 = 3;

/// How a finished match ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won { winner: Player, line: WinningLine },
    /// Every column filled without a line of four
    Draw,
}

/// Match phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    Over(Outcome),
}

/// What happened during one call to [`Match::step`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// The local cursor changed column
    pub cursor_moved: bool,
    /// A piece was placed by local input, and where it landed
    pub placed: Option<Coord>,
    /// The match is over and the player asked to leave
    pub finished: bool,
    /// The player asked to quit mid-match
    pub quit: bool,
}

/// State of a single match
#[derive(Debug)]
pub struct Match {
    board: Board,
    cursor: u8,
    turn: Player,
    previous: KeySet,
    phase: Phase,
    animations: Scheduler,
    /// Player driven by this device's keys; `None` when both players share it
    local: Option<Player>,
    /// Last cursor column announced by the remote player
    remote_cursor: Option<u8>,
    /// Whether local drop presses may place a piece
    drops_allowed: bool,
}

impl Default for Match {
    fn default() -> Self {
        Self::new()
    }
}

impl Match {
    /// Two players taking turns on the same device
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            cursor: START_COLUMN,
            turn: Player::One,
            previous: KeySet::ALL,
            phase: Phase::Playing,
            animations: Scheduler::new(),
            local: None,
            remote_cursor: None,
            drops_allowed: true,
        }
    }

    /// A match where this device only plays `local`; the other player's
    /// moves arrive through [`Match::apply_remote_drop`].
    pub fn networked(local: Player) -> Self {
        Self {
            local: Some(local),
            ..Self::new()
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn cursor(&self) -> u8 {
        self.cursor
    }

    pub fn turn(&self) -> Player {
        self.turn
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::Over(_))
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::Playing => None,
            Phase::Over(outcome) => Some(outcome),
        }
    }

    pub fn animations(&self) -> &Scheduler {
        &self.animations
    }

    /// Hold back or release local drops
    ///
    /// Held-back presses are still recorded, so a drop key that is already
    /// down when drops are allowed again does not place a piece.
    pub fn allow_drops(&mut self, allowed: bool) {
        self.drops_allowed = allowed;
    }

    /// Whether this device's keys may drop a piece right now
    pub fn is_local_turn(&self) -> bool {
        self.local.is_none_or(|local| local == self.turn)
    }

    /// Drop a piece for whoever's turn it is into `column`
    ///
    /// A full column is not an error: nothing happens and the turn stays.
    pub fn place(&mut self, column: u8) -> Option<Coord> {
        if self.is_over() {
            return None;
        }
        let player = self.turn;
        let landing = self.board.place(column.min(COLUMNS - 1), player)?;
        self.animations.add(DropTask::new(player.color(), landing));
        debug!(?player, ?landing, "piece placed");

        if let Some(line) = find_winning_line(&self.board) {
            info!(winner = ?player, ?line, "match won");
            self.phase = Phase::Over(Outcome::Won {
                winner: player,
                line,
            });
            self.animations.add(BlinkTask::new(line));
        } else if self.board.is_full() {
            info!("match drawn");
            self.phase = Phase::Over(Outcome::Draw);
        }

        self.turn = self.turn.other();
        Some(landing)
    }

    /// Apply a drop announced by the remote player. Ignored unless it is
    /// the remote player's turn.
    pub fn apply_remote_drop(&mut self, column: u8) -> Option<Coord> {
        if self.is_local_turn() || self.is_over() || column >= COLUMNS {
            debug!(column, "ignoring remote drop");
            return None;
        }
        self.place(column)
    }

    /// Record where the remote player's cursor is
    pub fn set_remote_cursor(&mut self, column: u8) {
        if column < COLUMNS {
            self.remote_cursor = Some(column);
        }
    }

    /// Column the turn indicator is drawn above
    pub fn indicator_column(&self) -> u8 {
        if self.is_local_turn() {
            self.cursor
        } else {
            self.remote_cursor.unwrap_or(self.cursor)
        }
    }

    /// Handle one frame of input, then draw the frame into `screen`
    pub fn step(&mut self, keys: KeySet, screen: &mut Pix) -> FrameReport {
        let mut report = FrameReport::default();
        if keys.intersects(KeySet::QUIT) {
            report.quit = true;
            return report;
        }

        match self.phase {
            Phase::Playing => self.handle_input(keys, &mut report),
            Phase::Over(outcome) => {
                let lingering = match outcome {
                    Outcome::Won { .. } => 1,
                    Outcome::Draw => 0,
                };
                if self.previous.is_empty()
                    && !keys.is_empty()
                    && self.animations.count() == lingering
                {
                    debug!("leaving finished match");
                    report.finished = true;
                    return report;
                }
            }
        }
        self.previous = keys;

        self.draw(screen);
        report
    }

    fn handle_input(&mut self, keys: KeySet, report: &mut FrameReport) {
        if keys.intersects(KeySet::LEFT) && self.cursor > 0 {
            self.cursor -= 1;
            report.cursor_moved = true;
        }
        if keys.intersects(KeySet::RIGHT) && self.cursor < COLUMNS - 1 {
            self.cursor += 1;
            report.cursor_moved = true;
        }
        if keys.pressed_since(self.previous).intersects(KeySet::DROP)
            && self.drops_allowed
            && self.is_local_turn()
        {
            report.placed = self.place(self.cursor);
        }
    }

    fn draw(&mut self, screen: &mut Pix) {
        screen.fill_box(0, 0, color::OFF, COLUMNS, BOARD_TOP);
        if !self.is_over() {
            screen.set_pixel(self.indicator_column(), 0, self.turn.color());
        }
        screen.blit(&self.board.pixels(), 0, BOARD_TOP);
        self.animations.step_all(screen);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fourinarow_core::ROWS;

    /// Press a drop key and release it
    fn drop_piece(game: &mut Match, screen: &mut Pix) -> Option<Coord> {
        let placed = game.step(KeySet::DOWN, screen).placed;
        game.step(KeySet::NONE, screen);
        placed
    }

    fn fresh() -> (Match, Pix) {
        let mut game = Match::new();
        let mut screen = Pix::screen();
        // Release the startup "all keys held" mask
        game.step(KeySet::NONE, &mut screen);
        (game, screen)
    }

    #[test]
    fn test_initial_state() {
        let game = Match::new();
        assert_eq!(game.cursor(), START_COLUMN);
        assert_eq!(game.turn(), Player::One);
        assert_eq!(game.phase(), Phase::Playing);
        assert!(game.animations().is_empty());
    }

    #[test]
    fn test_key_held_at_start_does_not_drop() {
        let mut game = Match::new();
        let mut screen = Pix::screen();
        assert_eq!(game.step(KeySet::DOWN, &mut screen).placed, None);
        assert_eq!(game.board().pieces(), 0);
    }

    #[test]
    fn test_holding_drop_places_once() {
        let (mut game, mut screen) = fresh();
        for _ in 0..5 {
            game.step(KeySet::X, &mut screen);
        }
        assert_eq!(game.board().pieces(), 1);
    }

    #[test]
    fn test_cursor_clamped_at_edges() {
        let (mut game, mut screen) = fresh();
        for _ in 0..10 {
            game.step(KeySet::LEFT, &mut screen);
        }
        assert_eq!(game.cursor(), 0);
        let report = game.step(KeySet::LEFT, &mut screen);
        assert!(!report.cursor_moved);

        for _ in 0..10 {
            game.step(KeySet::RIGHT, &mut screen);
        }
        assert_eq!(game.cursor(), COLUMNS - 1);
    }

    #[test]
    fn test_turn_alternates_and_survives_rejected_move() {
        let (mut game, mut screen) = fresh();
        assert_eq!(drop_piece(&mut game, &mut screen), Some(Coord::new(3, 5)));
        assert_eq!(game.turn(), Player::Two);

        for _ in 1..ROWS {
            assert!(drop_piece(&mut game, &mut screen).is_some());
        }
        let turn = game.turn();
        assert_eq!(drop_piece(&mut game, &mut screen), None);
        assert_eq!(game.turn(), turn);
        assert_eq!(game.board().pieces(), ROWS as usize);
    }

    #[test]
    fn test_cursor_indicator_uses_turn_color() {
        let (mut game, mut screen) = fresh();
        assert_eq!(screen.pixel(START_COLUMN, 0), color::GREEN);
        drop_piece(&mut game, &mut screen);
        game.step(KeySet::LEFT, &mut screen);
        assert_eq!(screen.pixel(START_COLUMN - 1, 0), color::RED);
        assert_eq!(screen.pixel(START_COLUMN, 0), color::OFF);
    }

    /// Green fills the bottom row of columns 0..=3 while red stacks in column 6
    fn play_green_win(game: &mut Match, screen: &mut Pix) {
        for column in 0..4 {
            game.place(column);
            if column < 3 {
                game.place(6);
            }
        }
        // Let the drop of the last piece finish
        while game.animations().count() > 1 {
            game.step(KeySet::NONE, screen);
        }
    }

    #[test]
    fn test_win_ends_match_with_blink() {
        let (mut game, mut screen) = fresh();
        play_green_win(&mut game, &mut screen);

        match game.phase() {
            Phase::Over(Outcome::Won { winner, line }) => {
                assert_eq!(winner, Player::One);
                assert_eq!(line.cells()[0], Coord::new(0, 5));
            }
            other => panic!("unexpected phase {:?}", other),
        }
        assert_eq!(game.place(5), None);
        // No indicator once the match is over
        game.step(KeySet::NONE, &mut screen);
        assert!((0..COLUMNS).all(|x| screen.pixel(x, 0) == color::OFF));
    }

    #[test]
    fn test_exit_requires_release_then_press() {
        let (mut game, mut screen) = fresh();
        for column in 0..3 {
            game.place(column);
            game.place(6);
        }
        // The winning drop is still held on the frames after the win
        assert!(game.step(KeySet::LEFT, &mut screen).placed.is_none());
        game.place(3);
        assert!(game.is_over());

        while game.animations().count() > 1 {
            assert!(!game.step(KeySet::DOWN, &mut screen).finished);
        }
        assert!(!game.step(KeySet::DOWN, &mut screen).finished);
        assert!(!game.step(KeySet::NONE, &mut screen).finished);
        assert!(game.step(KeySet::O, &mut screen).finished);
    }

    /// Run frames until every drop has landed
    fn settle(game: &mut Match, screen: &mut Pix) {
        while !game.animations().is_empty() {
            game.step(KeySet::NONE, screen);
        }
    }

    #[test]
    fn test_exit_waits_for_drop_to_finish() {
        let (mut game, mut screen) = fresh();
        for column in 0..3 {
            game.place(column);
            game.place(6);
        }
        settle(&mut game, &mut screen);
        game.place(3);
        assert_eq!(game.animations().count(), 2);

        game.step(KeySet::NONE, &mut screen);
        assert!(!game.step(KeySet::X, &mut screen).finished);
    }

    #[test]
    fn test_draw_when_board_fills() {
        let mut game = Match::new();
        // Column pairs alternate the starting color so no line of four forms
        let order = [0, 1, 0, 1, 0, 1, 1, 0, 1, 0, 1, 0, 2, 3, 2, 3, 2, 3, 3, 2, 3, 2, 3, 2];
        let tail = [4, 5, 4, 5, 4, 5, 5, 4, 5, 4, 5, 4, 6, 6, 6, 6, 6, 6];
        for column in order.into_iter().chain(tail) {
            assert!(game.place(column).is_some(), "column {column} rejected");
        }
        assert!(game.board().is_full());
        assert_eq!(game.outcome(), Some(Outcome::Draw));
    }

    #[test]
    fn test_networked_match_only_drops_on_local_turn() {
        let mut game = Match::networked(Player::Two);
        let mut screen = Pix::screen();
        game.step(KeySet::NONE, &mut screen);

        assert_eq!(game.step(KeySet::DOWN, &mut screen).placed, None);
        game.step(KeySet::NONE, &mut screen);

        assert_eq!(game.apply_remote_drop(0), Some(Coord::new(0, 5)));
        assert_eq!(game.apply_remote_drop(1), None);
        assert_eq!(game.step(KeySet::DOWN, &mut screen).placed, Some(Coord::new(3, 5)));
        assert_eq!(game.turn(), Player::One);
    }

    #[test]
    fn test_drop_held_while_blocked_does_not_place_later() {
        let mut game = Match::networked(Player::One);
        let mut screen = Pix::screen();
        game.step(KeySet::NONE, &mut screen);

        game.allow_drops(false);
        assert_eq!(game.step(KeySet::DOWN, &mut screen).placed, None);
        game.allow_drops(true);
        assert_eq!(game.step(KeySet::DOWN, &mut screen).placed, None);
        assert_eq!(game.board().pieces(), 0);

        game.step(KeySet::NONE, &mut screen);
        assert_eq!(game.step(KeySet::DOWN, &mut screen).placed, Some(Coord::new(3, 5)));
    }

    #[test]
    fn test_indicator_follows_remote_cursor() {
        let mut game = Match::networked(Player::Two);
        let mut screen = Pix::screen();
        game.set_remote_cursor(5);
        game.step(KeySet::NONE, &mut screen);
        assert_eq!(screen.pixel(5, 0), color::GREEN);
        assert_eq!(screen.pixel(START_COLUMN, 0), color::OFF);
    }
}
