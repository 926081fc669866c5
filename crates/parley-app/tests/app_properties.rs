//! Property-based tests for App state machine.
//!
//! Tests verify that invariants hold under arbitrary event sequences.

use parley_app::{App, AppAction, AppEvent};
use parley_client::{ChatMessage, ConnectionHealth, Identity, Language};
use proptest::prelude::*;

fn identity() -> impl Strategy<Value = Identity> {
    ("[a-z]{1,6}", prop::sample::select(Language::ALL.to_vec()), "[a-z]{1,6}").prop_map(
        |(display_name, language, room)| Identity { display_name, language, room },
    )
}

/// Generate random app events.
fn event_strategy() -> impl Strategy<Value = AppEvent> {
    prop_oneof![
        1 => Just(AppEvent::Tick),
        2 => identity().prop_map(|identity| AppEvent::SessionStarted { identity }),
        1 => Just(AppEvent::SessionJoined),
        1 => Just(AppEvent::SessionEnded),
        1 => prop::sample::select(Language::ALL.to_vec())
            .prop_map(|language| AppEvent::LanguageSet { language }),
        2 => "[a-z ]{0,10}".prop_map(|content| AppEvent::MessageReceived(ChatMessage {
            sender: "bob".into(),
            content,
            timestamp: "00:00:00".into(),
            is_translated: false,
            is_own: false,
        })),
        2 => prop::collection::vec("[a-z]{1,4}", 0..5)
            .prop_map(|members| AppEvent::RosterReplaced { members }),
        1 => prop::sample::select(vec![
            ConnectionHealth::Connecting,
            ConnectionHealth::Connected,
            ConnectionHealth::Disconnected,
        ])
        .prop_map(AppEvent::HealthChanged),
        1 => any::<bool>().prop_map(|can_send| AppEvent::SendAvailability { can_send }),
    ]
}

proptest! {
    #[test]
    fn prop_app_invariants_hold(events in prop::collection::vec(event_strategy(), 0..50)) {
        let mut app = App::new("ws://localhost:5000".into());
        let mut transcript_len = 0;

        for event in events {
            let was_end = matches!(event, AppEvent::SessionEnded);
            let last_roster = match &event {
                AppEvent::RosterReplaced { members } => Some(members.clone()),
                _ => None,
            };

            let actions = app.handle(event);

            // Transcript only grows.
            prop_assert!(app.transcript().len() >= transcript_len);
            transcript_len = app.transcript().len();

            // Joined implies a session.
            prop_assert!(!app.is_joined() || app.in_session());

            // Roster is exactly the last snapshot.
            if let Some(members) = last_roster {
                prop_assert_eq!(app.roster(), members.as_slice());
            }

            // Only session end asks to quit.
            prop_assert_eq!(actions.contains(&AppAction::Quit), was_end);
            if was_end {
                prop_assert!(!app.in_session());
                prop_assert!(app.roster().is_empty());
            }
        }
    }
}
