//! Frame loop for two players sharing one device

use crate::frame::{FrameClock, GAME_PERIOD, Keypad, Screen};
use crate::game::{Match, Outcome};
use fourinarow_core::{Pix, Result};
use tracing::info;

/// Play a hot-seat match until it is over and the player leaves
///
/// Returns `None` when the player quit before the match finished.
pub async fn run_local<S, K>(screen: &mut S, keypad: &mut K) -> Result<Option<Outcome>>
where
    S: Screen,
    K: Keypad,
{
    let mut game = Match::new();
    let mut frame = Pix::screen();
    let mut clock = FrameClock::new(GAME_PERIOD);
    info!("local match started");

    loop {
        let keys = keypad.sample()?;
        let report = game.step(keys, &mut frame);
        if report.quit {
            info!("local match abandoned");
            return Ok(None);
        }
        if report.finished {
            return Ok(game.outcome());
        }
        screen.show(&frame)?;
        clock.tick().await;
    }
}
