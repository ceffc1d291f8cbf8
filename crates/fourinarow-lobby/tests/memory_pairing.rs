//! Two devices pairing and playing a full match over an in-process broker

use fourinarow_bus::{Broker, MemoryBus};
use fourinarow_core::{KeySet, Player};
use fourinarow_game::{FrameRecorder, Outcome, ScriptedKeys};
use fourinarow_lobby::{PlayerName, connect_options, play_networked};

fn name(raw: &str) -> PlayerName {
    PlayerName::parse(raw.as_bytes()).unwrap()
}

fn taps(script: &mut ScriptedKeys, keys: KeySet, count: usize) {
    for _ in 0..count {
        script.push(keys);
        script.push(KeySet::NONE);
    }
}

#[tokio::test(start_paused = true)]
async fn test_paired_match_is_played_to_the_end() {
    let broker = Broker::new();
    let mut alice_bus = MemoryBus::connect(&broker, connect_options(&name("alice")));
    let mut bob_bus = MemoryBus::connect(&broker, connect_options(&name("bob")));

    // Alice waits for bob to show up, picks him, then keeps tapping drop on
    // column 3 until she has four in a column and leaves
    let mut alice_keys = ScriptedKeys::new([KeySet::NONE; 5]);
    alice_keys.push(KeySet::O);
    taps(&mut alice_keys, KeySet::DOWN, 200);

    // Bob idles through the lobby, walks to column 0 and taps drop there
    let mut bob_keys = ScriptedKeys::new([KeySet::NONE; 20]);
    for _ in 0..3 {
        bob_keys.push(KeySet::LEFT);
    }
    taps(&mut bob_keys, KeySet::DOWN, 200);

    let mut alice_screen = FrameRecorder::new();
    let mut bob_screen = FrameRecorder::new();

    let (alice, bob) = tokio::join!(
        play_networked(&mut alice_bus, name("alice"), &mut alice_screen, &mut alice_keys),
        play_networked(&mut bob_bus, name("bob"), &mut bob_screen, &mut bob_keys),
    );

    for outcome in [alice.unwrap(), bob.unwrap()] {
        match outcome {
            Some(Outcome::Won { winner, line }) => {
                assert_eq!(winner, Player::One);
                assert!(line.cells().iter().all(|cell| cell.column == 3));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    assert!(!alice_screen.menus.is_empty());
    assert!(!bob_screen.frames.is_empty());
    assert_eq!(broker.retained(b"fourinarow/lobby/alice"), None);
    assert_eq!(broker.retained(b"fourinarow/lobby/bob"), None);
    assert_eq!(broker.retained(b"fourinarow/game/alice/cursor"), None);
    assert_eq!(broker.retained(b"fourinarow/game/bob/opponent"), None);
    assert_eq!(broker.client_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_leaving_the_lobby_cleans_up() {
    let broker = Broker::new();
    let mut bus = MemoryBus::connect(&broker, connect_options(&name("alice")));
    let mut keys = ScriptedKeys::new([KeySet::NONE, KeySet::X]);
    let mut screen = FrameRecorder::new();

    let outcome = play_networked(&mut bus, name("alice"), &mut screen, &mut keys)
        .await
        .unwrap();
    assert_eq!(outcome, None);
    assert_eq!(broker.retained(b"fourinarow/lobby/alice"), None);
    assert_eq!(broker.client_count(), 0);
}
