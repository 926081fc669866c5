//! Status bar and banner
//!
//! The status bar shows connection health, identity, translation
//! availability and the last status message. The banner line above the chat
//! shows the connection banner while one is up.

use parley_app::App;
use parley_client::ConnectionHealth;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::health_style;

/// Render the status bar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let health = match app.health() {
        ConnectionHealth::Connecting => "Connecting...",
        ConnectionHealth::Connected => "Connected",
        ConnectionHealth::Disconnected => "Disconnected",
    };
    let connection_status =
        Span::styled(health, health_style(app.health()).add_modifier(Modifier::BOLD));

    let identity = app.identity().map_or_else(String::new, |identity| {
        format!(" | {} ({})", identity.display_name, identity.language)
    });

    let translation = if app.translation_available() {
        " | Translation on"
    } else {
        " | Translation unavailable"
    };

    let cooldown = if app.can_send() { "" } else { " | Wait..." };

    let message = app.status_message().map_or_else(String::new, |m| format!(" | {m}"));

    let status_line = Line::from(vec![
        Span::raw(" "),
        connection_status,
        Span::raw(identity),
        Span::raw(translation),
        Span::raw(cooldown),
        Span::styled(message, Style::default().fg(Color::Yellow)),
    ]);

    let paragraph =
        Paragraph::new(status_line).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}

/// Render the banner line. Blank when no banner is up.
pub fn render_banner(frame: &mut Frame, app: &App, area: Rect) {
    let Some(banner) = app.banner() else {
        return;
    };

    let line = Line::from(Span::styled(
        format!(" {} ", banner.text),
        health_style(banner.health).add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(line), area);
}
