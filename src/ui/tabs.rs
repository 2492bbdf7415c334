// Tab bar rendering with badge support for Console tab.
// Handles visual indication of active tab and unread warning/error count.

use ratatui::{prelude::*, widgets::*};

use crate::app::{App, Tab};

use super::theme::Palette;

/// Draw the tab bar at the top of the screen.
pub fn draw_tabs(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let unread = app.console.unread;

    let tab_titles: Vec<Line> = Tab::ALL
        .iter()
        .map(|tab| {
            let title = if *tab == Tab::Console && unread > 0 {
                format!("{} ({})", tab.title(), unread)
            } else {
                tab.title().to_string()
            };

            let style = if *tab == app.active_tab {
                Style::default()
                    .fg(palette.active)
                    .add_modifier(Modifier::BOLD)
            } else if *tab == Tab::Console && unread > 0 {
                Style::default().fg(palette.error)
            } else {
                Style::default().fg(palette.text)
            };

            Line::from(Span::styled(title, style))
        })
        .collect();

    let selected_index = Tab::ALL
        .iter()
        .position(|t| *t == app.active_tab)
        .unwrap_or(0);

    let tabs_widget = Tabs::new(tab_titles)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(palette.muted_style())
                .title(" folio ")
                .title_style(palette.title_style()),
        )
        .select(selected_index)
        .highlight_style(Style::default().fg(palette.active))
        .divider(Span::raw(" │ "));

    frame.render_widget(tabs_widget, area);
}
