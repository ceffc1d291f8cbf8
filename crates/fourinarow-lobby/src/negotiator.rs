//! Pairing negotiator
//!
//! Runs the lobby menu until either someone asks to play against us or we
//! pick an opponent (or leave). An inbound join seen in a poll cycle always
//! beats a menu confirmation in the same cycle, and only one of the two is
//! ever applied.

use crate::directory::PresenceDirectory;
use crate::menu::{Choice, LobbyMenu, MENU_TITLE};
use crate::name::PlayerName;
use crate::session::Session;
use crate::topics::{self, Inbound};
use fourinarow_bus::MessageBus;
use fourinarow_core::{KeySet, Player, Result};
use fourinarow_game::{FrameClock, Keypad, MENU_PERIOD, Screen};
use tracing::{debug, info};

/// How the lobby ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Paired(Session),
    /// The player left without choosing an opponent
    Left,
}

pub struct Negotiator {
    directory: PresenceDirectory,
    menu: LobbyMenu,
}

impl Negotiator {
    pub fn new(local: PlayerName) -> Self {
        Self {
            directory: PresenceDirectory::new(local),
            menu: LobbyMenu::new(),
        }
    }

    pub fn directory(&self) -> &PresenceDirectory {
        &self.directory
    }

    pub fn menu(&self) -> &LobbyMenu {
        &self.menu
    }

    fn local(&self) -> &PlayerName {
        self.directory.local()
    }

    /// Listen for join requests and announce presence
    pub async fn start<B: MessageBus + ?Sized>(&mut self, bus: &mut B) -> Result<()> {
        bus.subscribe(&topics::join_topic(self.local())).await?;
        self.directory.announce(bus).await
    }

    /// One lobby cycle: drain the bus, then look at the menu
    ///
    /// Returns the resolution once there is one; presence has already been
    /// retracted by then.
    pub async fn step<B: MessageBus + ?Sized>(
        &mut self,
        bus: &mut B,
        keys: KeySet,
    ) -> Result<Option<Resolution>> {
        let mut requested_by: Option<PlayerName> = None;
        for message in bus.poll().await? {
            match topics::decode(&message, self.directory.local()) {
                Inbound::Presence { peer, presence } => {
                    self.directory.apply(peer, presence);
                }
                Inbound::Join { from } if requested_by.is_none() => {
                    info!("join request from {}", from);
                    requested_by = Some(from);
                }
                Inbound::Join { from } => debug!("extra join request from {} ignored", from),
                other => debug!(?other, "ignored in lobby"),
            }
        }

        let resolution = match requested_by {
            Some(opponent) => {
                Resolution::Paired(Session::new(self.local().clone(), opponent, Player::Two))
            }
            None => match self.menu.step(keys, self.directory.peers()) {
                None => return Ok(None),
                Some(Choice::Leave) => {
                    info!("leaving the lobby");
                    Resolution::Left
                }
                Some(Choice::Peer(opponent)) => {
                    bus.publish(&topics::join_topic(&opponent), self.local().as_bytes(), false)
                        .await?;
                    info!("sent join request to {}", opponent);
                    Resolution::Paired(Session::new(self.local().clone(), opponent, Player::One))
                }
            },
        };

        if let Resolution::Paired(session) = &resolution {
            info!(side = ?session.side(), "paired with {}", session.opponent());
        }
        self.directory.retract(bus).await?;
        Ok(Some(resolution))
    }

    /// Present the menu
    pub fn render<S: Screen + ?Sized>(&self, screen: &mut S) -> Result<()> {
        let peers = self.directory.peers();
        let selected = self.menu.selected().min(peers.len());
        screen.show_menu(MENU_TITLE, &LobbyMenu::labels(peers), selected)
    }
}

/// Drive the lobby at menu speed until it resolves
///
/// QUIT leaves the lobby like the "leave" entry.
pub async fn run_lobby<B, S, K>(
    bus: &mut B,
    local: PlayerName,
    screen: &mut S,
    keypad: &mut K,
) -> Result<Resolution>
where
    B: MessageBus + ?Sized,
    S: Screen + ?Sized,
    K: Keypad + ?Sized,
{
    let mut negotiator = Negotiator::new(local);
    negotiator.start(bus).await?;
    let mut clock = FrameClock::new(MENU_PERIOD);

    loop {
        let keys = keypad.sample()?;
        if keys.intersects(KeySet::QUIT) {
            info!("lobby abandoned");
            negotiator.directory.retract(bus).await?;
            return Ok(Resolution::Left);
        }
        if let Some(resolution) = negotiator.step(bus, keys).await? {
            return Ok(resolution);
        }
        negotiator.render(screen)?;
        clock.tick().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fourinarow_bus::{Broker, MemoryBus};
    use fourinarow_game::{FrameRecorder, ScriptedKeys};

    fn name(raw: &str) -> PlayerName {
        PlayerName::parse(raw.as_bytes()).unwrap()
    }

    fn connect(broker: &Broker, raw: &str) -> MemoryBus {
        MemoryBus::connect(broker, topics::connect_options(&name(raw)))
    }

    fn paired(resolution: Option<Resolution>) -> Session {
        match resolution {
            Some(Resolution::Paired(session)) => session,
            other => panic!("expected pairing, got {:?}", other),
        }
    }

    async fn started(broker: &Broker, raw: &str) -> (Negotiator, MemoryBus) {
        let mut bus = connect(broker, raw);
        let mut negotiator = Negotiator::new(name(raw));
        negotiator.start(&mut bus).await.unwrap();
        (negotiator, bus)
    }

    #[tokio::test]
    async fn test_peers_appear_in_menu() {
        let broker = Broker::new();
        let (mut alice, mut alice_bus) = started(&broker, "alice").await;
        let (_bob, _bob_bus) = started(&broker, "bob").await;

        assert_eq!(alice.step(&mut alice_bus, KeySet::NONE).await.unwrap(), None);
        assert_eq!(alice.directory().peers(), &[name("bob")]);

        let mut screen = FrameRecorder::new();
        alice.render(&mut screen).unwrap();
        assert_eq!(
            screen.last_menu().unwrap().entries,
            vec!["bob".to_string(), "leave".to_string()]
        );
    }

    #[tokio::test]
    async fn test_selecting_peer_sends_join_and_plays_green() {
        let broker = Broker::new();
        let (mut alice, mut alice_bus) = started(&broker, "alice").await;
        let (mut bob, mut bob_bus) = started(&broker, "bob").await;

        alice.step(&mut alice_bus, KeySet::NONE).await.unwrap();
        let resolution = alice.step(&mut alice_bus, KeySet::O).await.unwrap();
        let session = paired(resolution);
        assert_eq!(session.opponent(), &name("bob"));
        assert_eq!(session.side(), Player::One);
        assert_eq!(broker.retained(b"fourinarow/lobby/alice"), None);

        let resolution = bob.step(&mut bob_bus, KeySet::NONE).await.unwrap();
        let session = paired(resolution);
        assert_eq!(session.opponent(), &name("alice"));
        assert_eq!(session.side(), Player::Two);
    }

    #[tokio::test]
    async fn test_inbound_join_beats_local_selection() {
        let broker = Broker::new();
        let (mut alice, mut alice_bus) = started(&broker, "alice").await;
        let (mut bob, mut bob_bus) = started(&broker, "bob").await;
        let mut carol_bus = connect(&broker, "carol");

        alice.step(&mut alice_bus, KeySet::NONE).await.unwrap();
        carol_bus
            .publish(b"fourinarow/join/alice", b"carol", false)
            .await
            .unwrap();

        // Alice confirms bob in the same cycle carol's join arrives
        let resolution = alice.step(&mut alice_bus, KeySet::O).await.unwrap();
        let session = paired(resolution);
        assert_eq!(session.opponent(), &name("carol"));
        assert_eq!(session.side(), Player::Two);

        // Bob never got a join
        assert_eq!(bob.step(&mut bob_bus, KeySet::NONE).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_leave_entry() {
        let broker = Broker::new();
        let (mut alice, mut alice_bus) = started(&broker, "alice").await;
        alice.step(&mut alice_bus, KeySet::NONE).await.unwrap();
        let resolution = alice.step(&mut alice_bus, KeySet::X).await.unwrap();
        assert_eq!(resolution, Some(Resolution::Left));
        assert_eq!(broker.retained(b"fourinarow/lobby/alice"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_lobby_quit() {
        let broker = Broker::new();
        let mut bus = connect(&broker, "alice");
        let mut screen = FrameRecorder::new();
        let mut keys = ScriptedKeys::new([KeySet::NONE, KeySet::NONE]).then(KeySet::QUIT);
        let resolution = run_lobby(&mut bus, name("alice"), &mut screen, &mut keys)
            .await
            .unwrap();
        assert_eq!(resolution, Resolution::Left);
        assert_eq!(screen.menus.len(), 2);
        assert_eq!(broker.retained(b"fourinarow/lobby/alice"), None);
    }
}
