//! Snapshot tests of observable client state.

use parley_client::{JoinForm, Language};
use parley_harness::{Input, SimWorld};

#[tokio::test]
async fn joined_client_view() {
    let mut world = SimWorld::new(1);
    let alice = world.add_client().await;
    let bob = world.add_client().await;
    world.run_until_quiescent().await.expect("connect settles");

    world.input(alice, Input::Join(JoinForm::new("alice", Some(Language::Japanese), "lobby")));
    world.run_until_quiescent().await.expect("join settles");
    world.input(bob, Input::Join(JoinForm::new("bob", Some(Language::English), "lobby")));
    world.run_until_quiescent().await.expect("join settles");

    let snapshot = world.snapshot();
    let client = &snapshot.clients[alice];

    insta::assert_json_snapshot!(client.app, { ".banner" => "[banner]" }, @r#"
    {
      "identity": {
        "display_name": "alice",
        "language": "ja",
        "room": "lobby"
      },
      "joined": true,
      "roster": [
        "alice",
        "bob"
      ],
      "health": "Connected",
      "translation_available": true,
      "banner": "[banner]",
      "can_send": true
    }
    "#);
}

#[tokio::test]
async fn transcript_lines() {
    let mut world = SimWorld::new(1);
    let alice = world.add_client().await;
    let bob = world.add_client().await;
    world.run_until_quiescent().await.expect("connect settles");

    world.input(alice, Input::Join(JoinForm::new("alice", Some(Language::French), "")));
    world.run_until_quiescent().await.expect("join settles");
    world.input(bob, Input::Join(JoinForm::new("bob", Some(Language::Italian), "")));
    world.run_until_quiescent().await.expect("join settles");
    world.input(bob, Input::Send("ciao".into()));
    world.run_until_quiescent().await.expect("message settles");

    let snapshot = world.snapshot();
    insta::assert_json_snapshot!(snapshot.clients[alice].transcript, @r#"
    [
      "* alice joined the chat",
      "* bob joined the chat",
      "[00:00:00] bob: [fr] ciao [translated]"
    ]
    "#);
}
