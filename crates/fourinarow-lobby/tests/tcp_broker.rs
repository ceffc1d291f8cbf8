//! Lobby and pairing through the TCP broker

use fourinarow_bus::{Broker, MessageBus, TcpBus, serve};
use fourinarow_core::{KeySet, Player};
use fourinarow_lobby::{Negotiator, PlayerName, Resolution, Session, connect_options};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_test::assert_ok;

fn name(raw: &str) -> PlayerName {
    PlayerName::parse(raw.as_bytes()).unwrap()
}

async fn start_broker() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve(listener, Broker::new()));
    addr
}

async fn join_lobby(addr: SocketAddr, raw: &str) -> (Negotiator, TcpBus) {
    let mut bus = assert_ok!(TcpBus::connect(addr, connect_options(&name(raw))).await);
    let mut negotiator = Negotiator::new(name(raw));
    assert_ok!(negotiator.start(&mut bus).await);
    (negotiator, bus)
}

/// Step the lobby with no keys until `done` holds
async fn idle_until(
    negotiator: &mut Negotiator,
    bus: &mut TcpBus,
    done: impl Fn(&Negotiator) -> bool,
) {
    for _ in 0..400 {
        assert_eq!(assert_ok!(negotiator.step(bus, KeySet::NONE).await), None);
        if done(negotiator) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("lobby never reached the expected state");
}

async fn wait_for_pairing(negotiator: &mut Negotiator, bus: &mut TcpBus) -> Session {
    for _ in 0..400 {
        match assert_ok!(negotiator.step(bus, KeySet::NONE).await) {
            Some(Resolution::Paired(session)) => return session,
            Some(Resolution::Left) => panic!("left the lobby"),
            None => tokio::time::sleep(Duration::from_millis(5)).await,
        }
    }
    panic!("never paired");
}

#[tokio::test]
async fn test_presence_and_pairing_over_tcp() {
    let addr = start_broker().await;
    let (mut alice, mut alice_bus) = join_lobby(addr, "alice").await;
    let (mut bob, mut bob_bus) = join_lobby(addr, "bob").await;

    // A third player shows up and vanishes without saying goodbye
    let (_carol, carol_bus) = join_lobby(addr, "carol").await;
    idle_until(&mut alice, &mut alice_bus, |n| n.directory().peers().len() == 2).await;
    drop(carol_bus);
    idle_until(&mut alice, &mut alice_bus, |n| {
        n.directory().peers() == [name("bob")].as_slice()
    })
    .await;

    let resolution = assert_ok!(alice.step(&mut alice_bus, KeySet::O).await);
    match resolution {
        Some(Resolution::Paired(session)) => {
            assert_eq!(session.opponent(), &name("bob"));
            assert_eq!(session.side(), Player::One);
        }
        other => panic!("expected pairing, got {:?}", other),
    }

    let session = wait_for_pairing(&mut bob, &mut bob_bus).await;
    assert_eq!(session.opponent(), &name("alice"));
    assert_eq!(session.side(), Player::Two);

    assert_ok!(alice_bus.disconnect().await);
    assert_ok!(bob_bus.disconnect().await);
}
