// Filter bar under the tab bar.
// Search box, active filter chips, sort, and counts for the Projects tab;
// user, sort order, and last load time for the GitHub tab, or the dashboard
// URL prompt while it is open.

use chrono::{DateTime, Utc};
use ratatui::{prelude::*, widgets::*};

use crate::app::App;

use super::theme::Palette;

/// Format timestamp for display in local time.
fn format_timestamp(dt: &DateTime<Utc>) -> String {
    let local: DateTime<chrono::Local> = dt.with_timezone(&chrono::Local);
    local.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn bar_block(palette: &Palette) -> Block<'static> {
    Block::default()
        .borders(Borders::BOTTOM)
        .border_style(palette.muted_style())
}

/// Render search state and removable filter chips.
pub fn draw_project_filters(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let portfolio = &app.portfolio;
    let mut spans = Vec::new();

    if app.search_active {
        spans.push(Span::styled("/", Style::default().fg(palette.active)));
        spans.push(Span::raw(app.search_input.clone()));
        spans.push(Span::styled("█ ", Style::default().fg(palette.active)));
    } else {
        let filters = portfolio.active_filters();
        if filters.is_empty() {
            spans.push(Span::styled("All projects", palette.muted_style()));
        }
        for (i, filter) in filters.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(
                format!("[{} ×]", filter.label),
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            ));
        }
    }

    spans.push(Span::styled("  Sort: ", palette.muted_style()));
    spans.push(Span::styled(
        portfolio.sort().label(),
        Style::default().fg(palette.text),
    ));

    let counts = format!(
        "{} of {} projects  page {}/{}",
        portfolio.visible_count(),
        portfolio.total_count(),
        portfolio.page(),
        portfolio.page_count()
    );

    render_with_right_text(frame, Line::from(spans), counts, palette, area);
}

/// Render the GitHub user, repository ordering, and last load time.
pub fn draw_github_bar(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    if let Some(input) = &app.url_input {
        let line = Line::from(vec![
            Span::styled("Dashboard URL: ", Style::default().fg(palette.active)),
            Span::raw(input.clone()),
            Span::styled("█", Style::default().fg(palette.active)),
        ]);
        frame.render_widget(Paragraph::new(line).block(bar_block(palette)), area);
        return;
    }

    let mut spans = vec![Span::styled(
        app.integration.username().unwrap_or("no user").to_string(),
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD),
    )];
    spans.push(Span::styled("  Sort: ", palette.muted_style()));
    spans.push(Span::styled(
        app.repo_order.to_string(),
        Style::default().fg(palette.text),
    ));
    if app.repo_filter.forks == Some(false) {
        spans.push(Span::styled("  [forks hidden]", palette.muted_style()));
    }

    let loaded = app
        .integration
        .snapshot()
        .map(|s| format!("Updated {}", format_timestamp(&s.loaded_at)))
        .unwrap_or_default();

    render_with_right_text(frame, Line::from(spans), loaded, palette, area);
}

pub fn draw_plain_bar(frame: &mut Frame, palette: &Palette, area: Rect) {
    frame.render_widget(bar_block(palette), area);
}

fn render_with_right_text(
    frame: &mut Frame,
    line: Line,
    right: String,
    palette: &Palette,
    area: Rect,
) {
    let paragraph = Paragraph::new(line).block(bar_block(palette));
    frame.render_widget(paragraph, area);

    if !right.is_empty() {
        let right = Paragraph::new(Line::from(Span::styled(right, palette.muted_style())))
            .alignment(Alignment::Right);
        frame.render_widget(
            right,
            Rect {
                x: area.x,
                y: area.y,
                width: area.width,
                height: 1,
            },
        );
    }
}
