//! Integration tests for the WebSocket transport.
//!
//! A local tokio-tungstenite server stands in for the chat server so the real
//! connect, frame and reconnect paths are exercised.

#![cfg(feature = "transport")]

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use parley_client::{
    ClientAction, ClientConfig, ClientEvent, Inbound, JoinForm, Language, Outbound,
    SessionController, SystemEnv, TransportEvent,
    transport::{self, ConnectedClient, ReconnectConfig},
};
use parley_proto::{JoinRequest, LanguageChangeRequest, RosterUpdate};
use tokio::{net::TcpListener, time::timeout};
use tokio_tungstenite::tungstenite::Message;

const WAIT: Duration = Duration::from_secs(5);

fn fast_reconnect() -> ReconnectConfig {
    ReconnectConfig {
        initial_delay: Duration::from_millis(20),
        max_delay: Duration::from_millis(50),
        randomization: 0.0,
        max_attempts: Some(20),
    }
}

async fn next_event(client: &mut ConnectedClient) -> TransportEvent {
    timeout(WAIT, client.from_server.recv()).await.unwrap().unwrap()
}

fn join_request() -> Outbound {
    Outbound::Join(JoinRequest {
        display_name: "alice".into(),
        language: Language::Spanish,
        room: "general".into(),
    })
}

#[tokio::test]
async fn join_round_trip_and_reconnect() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());

    let server = tokio::spawn(async move {
        // First connection: read the join, answer with a roster, then drop.
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
        let first = match ws.next().await {
            Some(Ok(Message::Text(text))) => text.as_str().to_string(),
            other => panic!("expected join frame, got {other:?}"),
        };
        let roster = Inbound::Roster(RosterUpdate { members: vec!["alice".into()] });
        ws.send(Message::text(roster.encode().unwrap())).await.unwrap();
        drop(ws);

        // Second connection: read the rejoin.
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
        let second = match ws.next().await {
            Some(Ok(Message::Text(text))) => text.as_str().to_string(),
            other => panic!("expected rejoin frame, got {other:?}"),
        };
        (first, second)
    });

    let mut client = transport::connect(url, fast_reconnect());
    assert_eq!(next_event(&mut client).await, TransportEvent::Connected);

    client.to_server.send(join_request()).await.unwrap();
    assert_eq!(
        next_event(&mut client).await,
        TransportEvent::Received(Inbound::Roster(RosterUpdate { members: vec!["alice".into()] }))
    );

    assert!(matches!(next_event(&mut client).await, TransportEvent::Disconnected { .. }));
    assert_eq!(next_event(&mut client).await, TransportEvent::Reconnected);

    client.to_server.send(join_request()).await.unwrap();
    let (first, second) = timeout(WAIT, server).await.unwrap().unwrap();

    let expected = join_request().encode().unwrap();
    assert_eq!(first, expected);
    assert_eq!(second, expected);

    client.stop();
}

#[tokio::test]
async fn unreachable_server_reports_connect_error() {
    // Bind then drop to get a port nobody listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());
    drop(listener);

    let config = ReconnectConfig { max_attempts: Some(1), ..fast_reconnect() };
    let mut client = transport::connect(url, config);

    assert!(matches!(next_event(&mut client).await, TransportEvent::ConnectError { .. }));
    // Gave up: the channel closes.
    assert_eq!(timeout(WAIT, client.from_server.recv()).await.unwrap(), None);
}

#[tokio::test]
async fn undecodable_frames_are_skipped() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());

    tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
        ws.send(Message::text("not json")).await.unwrap();
        ws.send(Message::text(r#"["mystery", {}]"#)).await.unwrap();
        let roster = Inbound::Roster(RosterUpdate { members: vec![] });
        ws.send(Message::text(roster.encode().unwrap())).await.unwrap();
        // Hold the socket open until the client is done.
        let _ = ws.next().await;
    });

    let mut client = transport::connect(url, fast_reconnect());
    assert_eq!(next_event(&mut client).await, TransportEvent::Connected);
    assert_eq!(
        next_event(&mut client).await,
        TransportEvent::Received(Inbound::Roster(RosterUpdate { members: vec![] }))
    );
    client.stop();
}

async fn forward(client: &ConnectedClient, actions: Vec<ClientAction>) {
    for action in actions {
        if let ClientAction::Send(outbound) = action {
            client.to_server.send(outbound).await.unwrap();
        }
    }
}

#[tokio::test]
async fn join_typed_before_connected_is_drained_reaches_server_once() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());

    // Count join frames until the language change marks the end.
    let server = tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
        let mut joins = 0;
        while let Some(Ok(Message::Text(text))) = ws.next().await {
            match Outbound::decode(text.as_str()) {
                Ok(Outbound::ChangeLanguage(_)) => break,
                Ok(Outbound::Join(_)) => joins += 1,
                _ => {},
            }
        }
        joins
    });

    let mut client = transport::connect(url, fast_reconnect());
    let mut controller = SessionController::new(SystemEnv, ClientConfig::default());

    // The socket is up but `Connected` has not been drained yet.
    tokio::time::sleep(Duration::from_millis(200)).await;
    let actions = controller
        .handle(ClientEvent::SubmitJoin(JoinForm::new("alice", Some(Language::Spanish), "")))
        .unwrap();
    forward(&client, actions).await;

    let connected = next_event(&mut client).await;
    assert_eq!(connected, TransportEvent::Connected);
    let actions = controller.handle(ClientEvent::Transport(connected)).unwrap();
    forward(&client, actions).await;

    client
        .to_server
        .send(Outbound::ChangeLanguage(LanguageChangeRequest { language: Language::French }))
        .await
        .unwrap();
    let joins = timeout(WAIT, server).await.unwrap().unwrap();
    assert_eq!(joins, 1);

    client.stop();
}
