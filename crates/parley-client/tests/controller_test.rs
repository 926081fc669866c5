//! Scenario tests for the session controller.
//!
//! Every test drives the controller purely through events against a manually
//! advanced clock, so cooldown and banner timing is exact.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use parley_client::{
    ClientAction, ClientConfig, ClientError, ClientEvent, ConnectionHealth, Environment, Inbound,
    JoinForm, Language, NoticeKind, Outbound, SessionController, SessionPhase, TransportEvent,
};
use parley_proto::{JoinRequest, LanguageChanged, PresenceNotice, ReceivedMessage, RosterUpdate};

/// Clock that only moves when told to.
#[derive(Clone, Default)]
struct ManualClock {
    millis: Arc<AtomicU64>,
}

impl ManualClock {
    fn advance(&self, by: Duration) -> Duration {
        let millis = self.millis.fetch_add(by.as_millis() as u64, Ordering::SeqCst);
        Duration::from_millis(millis) + by
    }
}

impl Environment for ManualClock {
    type Instant = Duration;

    fn now(&self) -> Duration {
        Duration::from_millis(self.millis.load(Ordering::SeqCst))
    }
}

struct Harness {
    clock: ManualClock,
    controller: SessionController<ManualClock>,
}

impl Harness {
    fn new() -> Self {
        let clock = ManualClock::default();
        let controller = SessionController::new(clock.clone(), ClientConfig::default());
        Self { clock, controller }
    }

    fn online() -> Self {
        let mut h = Self::new();
        h.transport(TransportEvent::Connected);
        h
    }

    fn joined() -> Self {
        let mut h = Self::online();
        h.join("alice", Language::English, "lobby").unwrap();
        h.receive(Inbound::Roster(RosterUpdate { members: vec!["alice".into()] }));
        h
    }

    fn handle(&mut self, event: ClientEvent<Duration>) -> Result<Vec<ClientAction>, ClientError> {
        self.controller.handle(event)
    }

    fn join(
        &mut self,
        name: &str,
        language: Language,
        room: &str,
    ) -> Result<Vec<ClientAction>, ClientError> {
        self.handle(ClientEvent::SubmitJoin(JoinForm::new(name, Some(language), room)))
    }

    fn transport(&mut self, event: TransportEvent) -> Vec<ClientAction> {
        self.handle(ClientEvent::Transport(event)).unwrap()
    }

    fn receive(&mut self, inbound: Inbound) -> Vec<ClientAction> {
        self.transport(TransportEvent::Received(inbound))
    }

    fn send(&mut self, content: &str) -> Result<Vec<ClientAction>, ClientError> {
        self.handle(ClientEvent::SendMessage { content: content.into() })
    }

    fn tick_after(&mut self, by: Duration) -> Vec<ClientAction> {
        let now = self.clock.advance(by);
        self.handle(ClientEvent::Tick { now }).unwrap()
    }
}

fn sent(actions: &[ClientAction]) -> Vec<Outbound> {
    actions
        .iter()
        .filter_map(|a| match a {
            ClientAction::Send(out) => Some(out.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn join_with_missing_fields_never_emits() {
    let mut h = Harness::online();

    for form in [
        JoinForm::new("", Some(Language::English), ""),
        JoinForm::new("  \t", Some(Language::English), "lobby"),
        JoinForm::new("alice", None, "lobby"),
    ] {
        let result = h.handle(ClientEvent::SubmitJoin(form));
        assert!(matches!(result, Err(ClientError::Validation(_))));
    }

    assert_eq!(h.controller.session().phase(), SessionPhase::Unjoined);
}

#[test]
fn join_trims_name_and_defaults_room() {
    let mut h = Harness::online();
    let actions = h.join("  alice  ", Language::Japanese, "").unwrap();

    assert_eq!(sent(&actions), vec![Outbound::Join(JoinRequest {
        display_name: "alice".into(),
        language: Language::Japanese,
        room: "general".into(),
    })]);
    assert!(actions.iter().any(|a| matches!(a, ClientAction::SessionStarted(_))));
}

#[test]
fn disconnect_reconnect_rejoins_exactly_once() {
    let mut h = Harness::joined();
    let identity = h.controller.session().identity().cloned().unwrap();

    let dropped = h.transport(TransportEvent::Disconnected { reason: "io error".into() });
    assert!(dropped.contains(&ClientAction::HealthChanged(ConnectionHealth::Disconnected)));
    assert!(dropped.contains(&ClientAction::TranslationAvailability(false)));
    assert_eq!(h.controller.session().identity(), Some(&identity));
    assert_eq!(h.controller.session().phase(), SessionPhase::Joined);

    let back = h.transport(TransportEvent::Reconnected);
    assert_eq!(sent(&back), vec![Outbound::Join(identity.join_request())]);
    assert_eq!(h.controller.session().identity(), Some(&identity));
    assert!(back.contains(&ClientAction::TranslationAvailability(true)));
}

#[test]
fn rejoin_carries_language_changed_while_offline() {
    let mut h = Harness::joined();
    h.transport(TransportEvent::Disconnected { reason: "io error".into() });

    h.handle(ClientEvent::ChangeLanguage { language: Language::Korean }).unwrap();
    let back = h.transport(TransportEvent::Reconnected);

    let [Outbound::Join(request)]: [Outbound; 1] = sent(&back).try_into().unwrap() else {
        panic!("expected a single join");
    };
    assert_eq!(request.language, Language::Korean);
}

#[test]
fn send_cooldown_cycle() {
    let mut h = Harness::joined();

    assert!(h.send("").unwrap().is_empty());
    assert!(h.send("   ").unwrap().is_empty());
    assert!(h.controller.can_send());

    let actions = h.send("hi").unwrap();
    assert_eq!(sent(&actions), vec![Outbound::SendMessage(parley_proto::SendMessage {
        content: "hi".into()
    })]);
    assert!(actions.contains(&ClientAction::SendAvailability(false)));
    assert!(!h.controller.can_send());

    let early = h.send("again");
    assert!(matches!(early, Err(ClientError::CoolingDown { .. })));

    assert!(h.tick_after(Duration::from_millis(499)).is_empty());
    let ready = h.tick_after(Duration::from_millis(1));
    assert!(ready.contains(&ClientAction::SendAvailability(true)));
    assert!(h.controller.can_send());
}

#[test]
fn late_tick_does_not_reject_send() {
    let mut h = Harness::joined();
    h.send("one").unwrap();

    // Time passes without a tick.
    h.clock.advance(Duration::from_millis(600));
    let actions = h.send("two").unwrap();
    assert_eq!(sent(&actions).len(), 1);
}

#[test]
fn tick_older_than_the_cooldown_start_is_ignored() {
    let mut h = Harness::joined();
    h.clock.advance(Duration::from_secs(5));
    h.send("one").unwrap();

    let stale = h.handle(ClientEvent::Tick { now: Duration::from_secs(1) }).unwrap();
    assert!(!stale.contains(&ClientAction::SendAvailability(true)));
    assert!(!h.controller.can_send());

    let ready = h.tick_after(Duration::from_millis(500));
    assert!(ready.contains(&ClientAction::SendAvailability(true)));
}

#[test]
fn change_language_same_is_silent() {
    let mut h = Harness::joined();
    let actions = h.handle(ClientEvent::ChangeLanguage { language: Language::English }).unwrap();
    assert!(actions.is_empty());
    assert_eq!(h.controller.session().language(), Some(Language::English));
}

#[test]
fn change_language_confirmation_notice() {
    let mut h = Harness::joined();
    let actions = h.handle(ClientEvent::ChangeLanguage { language: Language::Spanish }).unwrap();
    assert_eq!(sent(&actions).len(), 1);
    assert_eq!(h.controller.session().language(), Some(Language::Spanish));

    let confirmed =
        h.receive(Inbound::LanguageChanged(LanguageChanged { language: Language::Spanish }));
    let notice = confirmed.iter().find_map(|a| match a {
        ClientAction::Notice(n) if n.kind == NoticeKind::LanguageChanged => Some(n.text.clone()),
        _ => None,
    });
    assert_eq!(notice.as_deref(), Some("Your language has been changed to Spanish"));
    assert!(!confirmed.iter().any(|a| matches!(a, ClientAction::LanguageSet(_))));
}

#[test]
fn roster_is_replaced_not_merged() {
    let mut h = Harness::joined();
    h.receive(Inbound::Roster(RosterUpdate { members: vec!["a".into(), "b".into()] }));
    let actions = h.receive(Inbound::Roster(RosterUpdate { members: vec!["b".into()] }));

    assert_eq!(actions, vec![ClientAction::RosterReplaced(vec!["b".into()])]);
    assert_eq!(h.controller.presence().members(), ["b".to_string()].as_slice());
}

#[test]
fn presence_notices_never_touch_roster() {
    let mut h = Harness::joined();
    let before = h.controller.presence().members().to_vec();

    let joined = h.receive(Inbound::UserJoined(PresenceNotice {
        username: Some("bob".into()),
        message: "bob joined the chat".into(),
    }));
    let left = h.receive(Inbound::UserLeft(PresenceNotice {
        username: None,
        message: "carol left the chat".into(),
    }));

    assert!(!joined.iter().chain(&left).any(|a| matches!(a, ClientAction::RosterReplaced(_))));
    assert_eq!(h.controller.presence().members(), before.as_slice());
}

#[test]
fn is_own_follows_display_name() {
    let mut h = Harness::joined();
    let deliver = |h: &mut Harness, sender: &str| {
        h.receive(Inbound::Message(ReceivedMessage {
            sender: sender.into(),
            content: "hola".into(),
            timestamp: "12:00:00".into(),
            is_translated: true,
        }))
        .into_iter()
        .find_map(|a| match a {
            ClientAction::DeliverMessage(m) => Some(m),
            _ => None,
        })
        .unwrap()
    };

    let own = deliver(&mut h, "alice");
    assert!(own.is_own);
    assert!(own.is_translated);
    assert!(!deliver(&mut h, "bob").is_own);
}

#[test]
fn connected_banner_dismisses_after_three_seconds() {
    let mut h = Harness::new();
    let actions = h.transport(TransportEvent::Connected);
    assert!(actions.iter().any(|a| matches!(a, ClientAction::ShowBanner(b) if b.text == "Connected!")));

    assert!(h.tick_after(Duration::from_millis(2999)).is_empty());
    assert_eq!(h.tick_after(Duration::from_millis(1)), vec![ClientAction::DismissBanner]);
}

#[test]
fn disconnected_banner_persists() {
    let mut h = Harness::joined();
    h.transport(TransportEvent::Disconnected { reason: "gone".into() });

    assert!(!h.tick_after(Duration::from_secs(60)).contains(&ClientAction::DismissBanner));
    let banner = h.controller.status().banner().cloned().unwrap();
    assert_eq!(banner.text, "Connection lost. Reconnecting...");
}

#[test]
fn connect_error_leaves_session_untouched() {
    let mut h = Harness::new();
    h.join("alice", Language::French, "").unwrap();

    let actions = h.transport(TransportEvent::ConnectError { reason: "refused".into() });
    assert!(sent(&actions).is_empty());
    assert_eq!(h.controller.session().phase(), SessionPhase::Joining);
    assert_eq!(
        h.controller.status().banner().map(|b| b.text.as_str()),
        Some("Connection failed. Please check if the server is running.")
    );
}

#[test]
fn leave_cancels_pending_timers() {
    let mut h = Harness::joined();
    h.send("bye").unwrap();

    let actions = h.handle(ClientEvent::Leave).unwrap();
    assert_eq!(actions.first(), Some(&ClientAction::Disconnect));
    assert!(actions.contains(&ClientAction::SessionEnded));

    // Neither the cooldown nor the banner fires after teardown.
    assert!(h.tick_after(Duration::from_secs(10)).is_empty());
    assert_eq!(h.controller.session().phase(), SessionPhase::Unjoined);
    assert!(h.controller.presence().is_empty());
}

#[test]
fn join_after_leave_starts_fresh() {
    let mut h = Harness::joined();
    h.handle(ClientEvent::Leave).unwrap();

    // Leave tore the transport down, so the new join waits for a connect.
    let actions = h.join("alice2", Language::German, "other").unwrap();
    assert!(sent(&actions).is_empty());

    let connected = h.transport(TransportEvent::Connected);
    assert!(connected.contains(&ClientAction::HealthChanged(ConnectionHealth::Connected)));
    assert_eq!(sent(&connected), vec![Outbound::Join(JoinRequest {
        display_name: "alice2".into(),
        language: Language::German,
        room: "other".into(),
    })]);
}
