//! Roster sidebar
//!
//! Displays room members in server order, marking the local participant.

use parley_app::App;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

const OWN_SUFFIX: &str = " (you)";

/// Render the roster sidebar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let own_name = app.identity().map(|identity| identity.display_name.as_str());

    let items: Vec<ListItem> = app
        .roster()
        .iter()
        .map(|member| {
            if Some(member.as_str()) == own_name {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        member.as_str(),
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(OWN_SUFFIX),
                ]))
            } else {
                ListItem::new(Line::from(member.as_str()))
            }
        })
        .collect();

    let title = format!(" Online ({}) ", app.roster().len());
    let block = Block::default().borders(Borders::ALL).title(title);
    let list = List::new(items).block(block);

    frame.render_widget(list, area);
}
