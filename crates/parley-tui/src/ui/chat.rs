//! Chat area
//!
//! Displays the transcript: messages and notices in arrival order.

use parley_app::{App, Entry};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

use crate::commands::HELP;

const BORDER_SIZE: u16 = 2;

/// Render the chat area.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let title = app
        .identity()
        .map_or_else(|| " Not joined ".to_string(), |identity| format!(" #{} ", identity.room));

    let block = Block::default().borders(Borders::ALL).title(title);

    let items: Vec<ListItem> = if app.identity().is_none() && app.transcript().is_empty() {
        vec![ListItem::new(Line::from(Span::styled(HELP, Style::default().fg(Color::DarkGray))))]
    } else {
        app.transcript().entries().iter().map(entry_item).collect()
    };

    let visible_height = area.height.saturating_sub(BORDER_SIZE) as usize;
    let skip = items.len().saturating_sub(visible_height);
    let visible_items: Vec<_> = items.into_iter().skip(skip).collect();

    let list = List::new(visible_items).block(block);

    frame.render_widget(list, area);
}

fn entry_item(entry: &Entry) -> ListItem<'_> {
    match entry {
        Entry::Message(msg) => {
            let sender_color = if msg.is_own { Color::Cyan } else { Color::Green };
            let mut spans = vec![
                Span::styled(format!("[{}] ", msg.timestamp), Style::default().fg(Color::DarkGray)),
                Span::styled(
                    msg.sender.as_str(),
                    Style::default().fg(sender_color).add_modifier(Modifier::BOLD),
                ),
                Span::raw(": "),
                Span::raw(msg.content.as_str()),
            ];
            if msg.is_translated {
                spans.push(Span::styled(" (translated)", Style::default().fg(Color::DarkGray)));
            }
            ListItem::new(Line::from(spans))
        },
        Entry::Notice(notice) => ListItem::new(Line::from(Span::styled(
            format!("* {}", notice.text),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ))),
    }
}
