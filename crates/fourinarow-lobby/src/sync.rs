//! Remote sync adapter
//!
//! Announces who we are playing, publishes the local cursor (retained, one
//! byte) and local drops, and turns the opponent's cursor and drop messages
//! into events for the match.

use crate::name::PlayerName;
use crate::session::Session;
use crate::topics::{self, Inbound};
use fourinarow_bus::MessageBus;
use fourinarow_core::Result;
use tracing::{debug, info, warn};

/// Something the opponent did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteEvent {
    Cursor(u8),
    Drop(u8),
    /// The opponent sent us a join after we had already sent them one
    CrossedJoin,
}

#[derive(Debug)]
pub struct RemoteSync {
    local: PlayerName,
    opponent: PlayerName,
    published_cursor: Option<u8>,
    confirmed: bool,
}

impl RemoteSync {
    pub fn new(session: &Session) -> Self {
        Self {
            local: session.local().clone(),
            opponent: session.opponent().clone(),
            published_cursor: None,
            confirmed: false,
        }
    }

    /// Follow the opponent's topics, then announce who we play and where
    /// our cursor is
    pub async fn start<B: MessageBus + ?Sized>(&mut self, bus: &mut B, cursor: u8) -> Result<()> {
        bus.subscribe(&topics::opponent_topic(&self.opponent)).await?;
        bus.subscribe(&topics::cursor_topic(&self.opponent)).await?;
        bus.subscribe(&topics::drop_topic(&self.opponent)).await?;
        bus.publish(&topics::opponent_topic(&self.local), self.opponent.as_bytes(), true)
            .await?;
        self.publish_cursor(bus, cursor).await
    }

    /// Whether the opponent has announced that it is playing us
    ///
    /// The opponent subscribes to our topics before that announcement, so
    /// from then on our drops reach it and its drops are meant for us.
    pub fn opponent_ready(&self) -> bool {
        self.confirmed
    }

    /// Publish the cursor if it differs from the last published column
    pub async fn publish_cursor<B: MessageBus + ?Sized>(&mut self, bus: &mut B, column: u8) -> Result<()> {
        if self.published_cursor == Some(column) {
            return Ok(());
        }
        bus.publish(&topics::cursor_topic(&self.local), &[column], true)
            .await?;
        self.published_cursor = Some(column);
        Ok(())
    }

    pub async fn publish_drop<B: MessageBus + ?Sized>(&mut self, bus: &mut B, column: u8) -> Result<()> {
        debug!(column, "publishing drop");
        bus.publish(&topics::drop_topic(&self.local), &[column], false)
            .await
    }

    /// Keep only what the opponent sent us
    ///
    /// Drops are ignored until the opponent has confirmed the pairing.
    pub fn accept(&mut self, inbound: Inbound) -> Option<RemoteEvent> {
        match inbound {
            Inbound::Opponent { peer, opponent } if peer == self.opponent => {
                let confirmed = opponent == self.local;
                if confirmed && !self.confirmed {
                    info!("{} is at the board", self.opponent);
                } else if !confirmed {
                    warn!("{} is playing {}, not us", self.opponent, opponent);
                }
                self.confirmed = confirmed;
                None
            }
            Inbound::Cursor { peer, column } if peer == self.opponent => {
                Some(RemoteEvent::Cursor(column))
            }
            Inbound::Drop { peer, column } if peer == self.opponent && self.confirmed => {
                Some(RemoteEvent::Drop(column))
            }
            Inbound::Drop { peer, column } if peer == self.opponent => {
                debug!(column, "drop from unconfirmed opponent ignored");
                None
            }
            Inbound::Join { from } if from == self.opponent => Some(RemoteEvent::CrossedJoin),
            Inbound::Join { from } => {
                debug!("join from {} while in a match ignored", from);
                None
            }
            _ => None,
        }
    }
}
