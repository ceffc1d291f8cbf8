//! Networked play: lobby, then a synchronized match
//!
//! Whatever way the session ends, [`play_networked`] retracts the lobby
//! presence and disconnects the bus before returning.

use crate::name::PlayerName;
use crate::negotiator::{Resolution, run_lobby};
use crate::session::Session;
use crate::sync::{RemoteEvent, RemoteSync};
use crate::topics;
use fourinarow_bus::MessageBus;
use fourinarow_core::{Pix, Player, Result};
use fourinarow_game::{FrameClock, GAME_PERIOD, Keypad, Match, Outcome, Screen};
use tracing::{info, warn};

/// Play one networked session on an already connected bus
///
/// Returns `None` if the player left the lobby or quit mid-match.
pub async fn play_networked<B, S, K>(
    bus: &mut B,
    local: PlayerName,
    screen: &mut S,
    keypad: &mut K,
) -> Result<Option<Outcome>>
where
    B: MessageBus + ?Sized,
    S: Screen + ?Sized,
    K: Keypad + ?Sized,
{
    let result = lobby_then_match(bus, local.clone(), screen, keypad).await;
    if let Err(e) = &result {
        warn!("networked session failed: {}", e);
    }
    shutdown(bus, &local).await;
    result
}

async fn lobby_then_match<B, S, K>(
    bus: &mut B,
    local: PlayerName,
    screen: &mut S,
    keypad: &mut K,
) -> Result<Option<Outcome>>
where
    B: MessageBus + ?Sized,
    S: Screen + ?Sized,
    K: Keypad + ?Sized,
{
    match run_lobby(bus, local, screen, keypad).await? {
        Resolution::Left => Ok(None),
        Resolution::Paired(session) => run_match(bus, &session, screen, keypad).await,
    }
}

/// Best-effort cleanup; failures are logged
async fn shutdown<B: MessageBus + ?Sized>(bus: &mut B, local: &PlayerName) {
    if let Err(e) = bus.publish(&topics::presence_topic(local), b"", true).await {
        warn!("failed to retract presence: {}", e);
    }
    if let Err(e) = bus.publish(&topics::opponent_topic(local), b"", true).await {
        warn!("failed to clear opponent: {}", e);
    }
    if let Err(e) = bus.publish(&topics::cursor_topic(local), b"", true).await {
        warn!("failed to clear cursor: {}", e);
    }
    match bus.disconnect().await {
        Ok(()) => info!("bus disconnected"),
        Err(e) => warn!("failed to disconnect: {}", e),
    }
}

/// Play a paired match
///
/// Drops are held back, ours and theirs, until the opponent announces that
/// it is playing us.
/// If both players picked each other at once, both start as green; the one
/// with the larger name switches to red before any piece is placed.
pub async fn run_match<B, S, K>(
    bus: &mut B,
    session: &Session,
    screen: &mut S,
    keypad: &mut K,
) -> Result<Option<Outcome>>
where
    B: MessageBus + ?Sized,
    S: Screen + ?Sized,
    K: Keypad + ?Sized,
{
    let mut game = Match::networked(session.side());
    let mut sync = RemoteSync::new(session);
    sync.start(bus, game.cursor()).await?;
    let mut frame = Pix::screen();
    let mut clock = FrameClock::new(GAME_PERIOD);
    info!(side = ?session.side(), "match against {} started", session.opponent());

    loop {
        let keys = keypad.sample()?;
        game.allow_drops(sync.opponent_ready());
        let report = game.step(keys, &mut frame);
        if report.quit {
            info!("match abandoned");
            return Ok(None);
        }
        if report.finished {
            info!(outcome = ?game.outcome(), "match finished");
            return Ok(game.outcome());
        }
        if report.cursor_moved {
            sync.publish_cursor(bus, game.cursor()).await?;
        }
        if let Some(landing) = report.placed {
            sync.publish_drop(bus, landing.column).await?;
        }

        for message in bus.poll().await? {
            match sync.accept(topics::decode(&message, session.local())) {
                Some(RemoteEvent::Cursor(column)) => game.set_remote_cursor(column),
                Some(RemoteEvent::Drop(column)) => {
                    game.apply_remote_drop(column);
                }
                Some(RemoteEvent::CrossedJoin) => {
                    if game.board().pieces() == 0
                        && game.is_local_turn()
                        && session.local() > session.opponent()
                    {
                        info!("crossed join with {}, switching to red", session.opponent());
                        game = Match::networked(Player::Two);
                        sync.publish_cursor(bus, game.cursor()).await?;
                    }
                }
                None => {}
            }
        }

        screen.show(&frame)?;
        clock.tick().await;
    }
}
