//! UI rendering
//!
//! Rendering functions that convert App state into terminal output using
//! ratatui widgets. All functions are pure (no I/O), taking state and
//! returning widget trees.

mod chat;
mod input;
mod roster;
mod status;

use parley_app::App;
use parley_client::ConnectionHealth;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
};

use crate::InputState;

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App, input: &InputState) {
    const MAIN_AREA_MIN_HEIGHT: u16 = 3;
    const BANNER_HEIGHT: u16 = 1;
    const INPUT_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(BANNER_HEIGHT),
            Constraint::Min(MAIN_AREA_MIN_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    let [banner_area, main_area, input_area, status_area] = chunks.as_ref() else {
        return;
    };

    status::render_banner(frame, app, *banner_area);
    render_main_area(frame, app, *main_area);
    input::render(frame, input, *input_area);
    status::render(frame, app, *status_area);
}

/// Render the main area (chat + roster sidebar).
fn render_main_area(frame: &mut Frame, app: &App, area: Rect) {
    const ROSTER_SIDEBAR_WIDTH: u16 = 18;
    const CHAT_AREA_MIN_WIDTH: u16 = 20;

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(CHAT_AREA_MIN_WIDTH), Constraint::Length(ROSTER_SIDEBAR_WIDTH)])
        .split(area);

    let [chat_area, roster_area] = chunks.as_ref() else {
        return;
    };

    chat::render(frame, app, *chat_area);
    roster::render(frame, app, *roster_area);
}

fn health_style(health: ConnectionHealth) -> Style {
    match health {
        ConnectionHealth::Connecting => Style::default().fg(Color::Yellow),
        ConnectionHealth::Connected => Style::default().fg(Color::Green),
        ConnectionHealth::Disconnected => Style::default().fg(Color::Red),
    }
}

#[cfg(test)]
mod tests {
    use parley_app::AppEvent;
    use parley_client::{Banner, ChatMessage, Identity, Language, Notice, NoticeKind};
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 14)).unwrap();
        terminal.draw(|frame| render(frame, app, &InputState::new())).unwrap();

        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn joined_app() -> App {
        let mut app = App::new("ws://localhost:5000".into());
        app.handle(AppEvent::SessionStarted {
            identity: Identity {
                display_name: "alice".into(),
                language: Language::Spanish,
                room: "lobby".into(),
            },
        });
        app.handle(AppEvent::SessionJoined);
        app.handle(AppEvent::HealthChanged(ConnectionHealth::Connected));
        app.handle(AppEvent::TranslationAvailability { available: true });
        app.handle(AppEvent::RosterReplaced { members: vec!["alice".into(), "bob".into()] });
        app
    }

    #[test]
    fn unjoined_screen_prompts_for_join() {
        let app = App::new("ws://localhost:5000".into());
        let text = screen(&app);

        assert!(text.contains("/join <name> <language>"));
        assert!(text.contains("Connecting"));
    }

    #[test]
    fn joined_screen_shows_transcript_and_roster() {
        let mut app = joined_app();
        app.handle(AppEvent::Notice(Notice {
            kind: NoticeKind::UserJoined,
            text: "bob joined the chat".into(),
        }));
        app.handle(AppEvent::MessageReceived(ChatMessage {
            sender: "bob".into(),
            content: "[es] hola".into(),
            timestamp: "12:00:01".into(),
            is_translated: true,
            is_own: false,
        }));

        let text = screen(&app);
        assert!(text.contains("#lobby"));
        assert!(text.contains("bob joined the chat"));
        assert!(text.contains("[12:00:01] bob: [es] hola"));
        assert!(text.contains("Online (2)"));
        assert!(text.contains("alice (you)"));
        assert!(text.contains("Spanish"));
    }

    #[test]
    fn banner_line_shows_banner_text() {
        let mut app = joined_app();
        app.handle(AppEvent::BannerShown(Banner {
            text: "Connection lost. Reconnecting...".into(),
            health: ConnectionHealth::Disconnected,
        }));

        assert!(screen(&app).lines().next().is_some_and(|l| l.contains("Connection lost")));
    }
}
