//! In-memory chat server for simulation.
//!
//! `SimServer` mirrors the reference room server: it keeps per-connection
//! membership, broadcasts presence notices and roster snapshots, replays
//! recent history to joiners, and translates each message per recipient.
//!
//! This server is designed for test-driven usage: callers push requests in
//! and drain each connection's outbox explicitly. Nothing runs on its own.

use std::{
    collections::{BTreeMap, VecDeque},
    sync::{Arc, Mutex},
    time::Duration,
};

use parley_proto::{
    Inbound, JoinRequest, Language, LanguageChanged, Outbound, PresenceNotice, ReceivedMessage,
    RosterUpdate,
};
use tracing::debug;

use crate::{TaggingTranslator, Translator};

/// Messages replayed to a joiner.
pub const HISTORY_REPLAY: usize = 50;

/// Connection identifier, unique for the lifetime of the server.
pub type ConnId = u64;

/// Shared server handle for multiple drivers.
pub type SharedSimServer = Arc<Mutex<SimServer>>;

/// Create a server wrapped for sharing between drivers.
pub fn create_shared_server() -> SharedSimServer {
    Arc::new(Mutex::new(SimServer::new()))
}

#[derive(Debug, Clone)]
struct Member {
    username: String,
    language: Language,
    room: String,
}

#[derive(Default)]
struct Connection {
    member: Option<Member>,
    outbox: VecDeque<Inbound>,
}

#[derive(Debug, Clone)]
struct StoredMessage {
    username: String,
    content: String,
    language: Language,
    room: String,
    timestamp: String,
}

/// Simulated chat server.
pub struct SimServer {
    translator: Box<dyn Translator>,
    connections: BTreeMap<ConnId, Connection>,
    history: Vec<StoredMessage>,
    next_conn: ConnId,
}

impl Default for SimServer {
    fn default() -> Self {
        Self::new()
    }
}

impl SimServer {
    /// Create a server with the tagging translator.
    pub fn new() -> Self {
        Self::with_translator(Box::new(TaggingTranslator))
    }

    /// Create a server with a custom translator.
    pub fn with_translator(translator: Box<dyn Translator>) -> Self {
        Self { translator, connections: BTreeMap::new(), history: Vec::new(), next_conn: 1 }
    }

    /// Accept a new connection.
    pub fn connect(&mut self) -> ConnId {
        let conn = self.next_conn;
        self.next_conn += 1;
        self.connections.insert(conn, Connection::default());
        debug!(conn, "sim server: connection accepted");
        conn
    }

    /// Drop a connection. Remaining room members see a notice and a roster.
    pub fn disconnect(&mut self, conn: ConnId) {
        let Some(connection) = self.connections.remove(&conn) else {
            return;
        };
        debug!(conn, "sim server: connection closed");

        if let Some(member) = connection.member {
            let notice = PresenceNotice {
                username: Some(member.username.clone()),
                message: format!("{} left the chat", member.username),
            };
            self.broadcast(&member.room, &Inbound::UserLeft(notice));
            self.broadcast_roster(&member.room);
        }
    }

    /// Handle a request from `conn` at virtual time `now`.
    pub fn handle(&mut self, conn: ConnId, request: Outbound, now: Duration) {
        if !self.connections.contains_key(&conn) {
            return;
        }

        match request {
            Outbound::Join(join) => self.join(conn, join),
            Outbound::SendMessage(message) => self.send_message(conn, message.content, now),
            Outbound::ChangeLanguage(change) => {
                if let Some(member) = self.member_mut(conn) {
                    member.language = change.language;
                    self.deliver(conn, Inbound::LanguageChanged(LanguageChanged {
                        language: change.language,
                    }));
                }
            },
        }
    }

    /// Take the next event queued for `conn`.
    pub fn next_for(&mut self, conn: ConnId) -> Option<Inbound> {
        self.connections.get_mut(&conn).and_then(|c| c.outbox.pop_front())
    }

    /// Whether `conn` has undelivered events.
    pub fn has_pending(&self, conn: ConnId) -> bool {
        self.connections.get(&conn).is_some_and(|c| !c.outbox.is_empty())
    }

    /// Members of each room, in connection order.
    pub fn rooms(&self) -> BTreeMap<String, Vec<String>> {
        let mut rooms: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for member in self.connections.values().filter_map(|c| c.member.as_ref()) {
            rooms.entry(member.room.clone()).or_default().push(member.username.clone());
        }
        rooms
    }

    /// Language the server has on file for `conn`.
    pub fn language_of(&self, conn: ConnId) -> Option<Language> {
        self.connections.get(&conn).and_then(|c| c.member.as_ref()).map(|m| m.language)
    }

    /// Number of stored messages across all rooms.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    fn join(&mut self, conn: ConnId, join: JoinRequest) {
        let JoinRequest { display_name, language, room } = join;
        debug!(conn, %room, "sim server: join");

        if let Some(connection) = self.connections.get_mut(&conn) {
            connection.member =
                Some(Member { username: display_name.clone(), language, room: room.clone() });
        }

        let notice = PresenceNotice {
            username: Some(display_name.clone()),
            message: format!("{display_name} joined the chat"),
        };
        self.broadcast(&room, &Inbound::UserJoined(notice));

        let in_room: Vec<_> = self.history.iter().filter(|m| m.room == room).cloned().collect();
        let skip = in_room.len().saturating_sub(HISTORY_REPLAY);
        for stored in in_room.into_iter().skip(skip) {
            let message = self.render_for(&stored, language);
            self.deliver(conn, Inbound::Message(message));
        }

        self.broadcast_roster(&room);
    }

    fn send_message(&mut self, conn: ConnId, content: String, now: Duration) {
        let Some(sender) = self.member(conn).cloned() else {
            debug!(conn, "sim server: message from unjoined connection ignored");
            return;
        };

        let stored = StoredMessage {
            username: sender.username,
            content,
            language: sender.language,
            room: sender.room,
            timestamp: format_timestamp(now),
        };
        self.history.push(stored.clone());

        let recipients: Vec<_> = self.members_of(&stored.room).collect();
        for (recipient, language) in recipients {
            let message = self.render_for(&stored, language);
            self.deliver(recipient, Inbound::Message(message));
        }
    }

    fn render_for(&self, stored: &StoredMessage, language: Language) -> ReceivedMessage {
        let is_translated = stored.language != language;
        let content = if is_translated {
            self.translator.translate(&stored.content, stored.language, language)
        } else {
            stored.content.clone()
        };

        ReceivedMessage {
            sender: stored.username.clone(),
            content,
            timestamp: stored.timestamp.clone(),
            is_translated,
        }
    }

    fn broadcast_roster(&mut self, room: &str) {
        let members = self.rooms().remove(room).unwrap_or_default();
        self.broadcast(room, &Inbound::Roster(RosterUpdate { members }));
    }

    fn broadcast(&mut self, room: &str, event: &Inbound) {
        let recipients: Vec<_> = self.members_of(room).map(|(conn, _)| conn).collect();
        for conn in recipients {
            self.deliver(conn, event.clone());
        }
    }

    fn members_of<'a>(&'a self, room: &'a str) -> impl Iterator<Item = (ConnId, Language)> + 'a {
        self.connections.iter().filter_map(move |(conn, c)| {
            c.member.as_ref().filter(|m| m.room == room).map(|m| (*conn, m.language))
        })
    }

    fn member(&self, conn: ConnId) -> Option<&Member> {
        self.connections.get(&conn).and_then(|c| c.member.as_ref())
    }

    fn member_mut(&mut self, conn: ConnId) -> Option<&mut Member> {
        self.connections.get_mut(&conn).and_then(|c| c.member.as_mut())
    }

    fn deliver(&mut self, conn: ConnId, event: Inbound) {
        if let Some(connection) = self.connections.get_mut(&conn) {
            connection.outbox.push_back(event);
        }
    }
}

/// Wall-clock style `HH:MM:SS` for an offset from simulation start.
fn format_timestamp(now: Duration) -> String {
    let secs = now.as_secs();
    format!("{:02}:{:02}:{:02}", (secs / 3600) % 24, (secs / 60) % 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use parley_proto::SendMessage;

    use super::*;

    fn join(server: &mut SimServer, conn: ConnId, name: &str, language: Language) {
        server.handle(
            conn,
            Outbound::Join(JoinRequest {
                display_name: name.into(),
                language,
                room: "general".into(),
            }),
            Duration::ZERO,
        );
    }

    fn drain(server: &mut SimServer, conn: ConnId) -> Vec<Inbound> {
        std::iter::from_fn(|| server.next_for(conn)).collect()
    }

    #[test]
    fn join_broadcasts_notice_and_roster() {
        let mut server = SimServer::new();
        let alice = server.connect();
        let bob = server.connect();
        join(&mut server, alice, "alice", Language::English);
        drain(&mut server, alice);

        join(&mut server, bob, "bob", Language::Spanish);

        let to_alice = drain(&mut server, alice);
        assert!(matches!(&to_alice[0], Inbound::UserJoined(n) if n.message == "bob joined the chat"));
        assert_eq!(
            to_alice[1],
            Inbound::Roster(RosterUpdate { members: vec!["alice".into(), "bob".into()] })
        );
    }

    #[test]
    fn messages_are_translated_per_recipient() {
        let mut server = SimServer::new();
        let alice = server.connect();
        let bob = server.connect();
        join(&mut server, alice, "alice", Language::English);
        join(&mut server, bob, "bob", Language::Spanish);
        drain(&mut server, alice);
        drain(&mut server, bob);

        server.handle(
            alice,
            Outbound::SendMessage(SendMessage { content: "hello".into() }),
            Duration::from_secs(3661),
        );

        let [Inbound::Message(own)]: [Inbound; 1] = drain(&mut server, alice).try_into().unwrap() else {
            panic!("expected one message");
        };
        assert_eq!(own.content, "hello");
        assert!(!own.is_translated);
        assert_eq!(own.timestamp, "01:01:01");

        let [Inbound::Message(theirs)]: [Inbound; 1] = drain(&mut server, bob).try_into().unwrap() else {
            panic!("expected one message");
        };
        assert_eq!(theirs.content, "[es] hello");
        assert!(theirs.is_translated);
    }

    #[test]
    fn history_replays_last_fifty() {
        let mut server = SimServer::new();
        let alice = server.connect();
        join(&mut server, alice, "alice", Language::English);
        for i in 0..60 {
            server.handle(
                alice,
                Outbound::SendMessage(SendMessage { content: format!("m{i}") }),
                Duration::ZERO,
            );
        }

        let late = server.connect();
        join(&mut server, late, "late", Language::English);
        let replayed: Vec<_> = drain(&mut server, late)
            .into_iter()
            .filter_map(|e| match e {
                Inbound::Message(m) => Some(m.content),
                _ => None,
            })
            .collect();

        assert_eq!(replayed.len(), HISTORY_REPLAY);
        assert_eq!(replayed.first().map(String::as_str), Some("m10"));
    }

    #[test]
    fn unjoined_messages_are_ignored() {
        let mut server = SimServer::new();
        let conn = server.connect();
        server.handle(
            conn,
            Outbound::SendMessage(SendMessage { content: "hi".into() }),
            Duration::ZERO,
        );
        assert_eq!(server.history_len(), 0);
        assert!(!server.has_pending(conn));
    }

    #[test]
    fn disconnect_notifies_room() {
        let mut server = SimServer::new();
        let alice = server.connect();
        let bob = server.connect();
        join(&mut server, alice, "alice", Language::English);
        join(&mut server, bob, "bob", Language::English);
        drain(&mut server, alice);

        server.disconnect(bob);

        let events = drain(&mut server, alice);
        assert!(matches!(&events[0], Inbound::UserLeft(_)));
        assert_eq!(events[1], Inbound::Roster(RosterUpdate { members: vec!["alice".into()] }));
        assert_eq!(server.rooms().get("general").map(Vec::len), Some(1));
    }
}
