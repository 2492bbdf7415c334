// List rendering for projects, repositories, and console messages.
// Provides styled list views with loading, error, and empty states.

use chrono::{DateTime, NaiveDate, Utc};
use ratatui::{prelude::*, widgets::*};

use crate::state::{
    ConsoleLevel, ConsoleState, LoadingState, PortfolioView, ProjectStatus, Snapshot,
    category_label,
};
use crate::transform::RepositoryView;

use super::theme::Palette;

/// Format a timestamp as relative time (e.g., "2h ago").
pub fn format_relative_time(dt: &DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(*dt);

    if duration.num_days() > 0 {
        format!("{}d ago", duration.num_days())
    } else if duration.num_hours() > 0 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_minutes() > 0 {
        format!("{}m ago", duration.num_minutes())
    } else {
        "just now".to_string()
    }
}

/// "Mar 20, 2024".
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

pub fn status_color(status: ProjectStatus, palette: &Palette) -> Color {
    match status {
        ProjectStatus::Live => palette.success,
        ProjectStatus::Development => palette.warn,
        ProjectStatus::Archived | ProjectStatus::Unknown => palette.muted,
    }
}

/// Render a loading indicator.
pub fn render_loading(frame: &mut Frame, area: Rect, message: &str, palette: &Palette) {
    let text = Paragraph::new(format!("⏳ {}...", message))
        .alignment(Alignment::Center)
        .style(Style::default().fg(palette.warn));
    frame.render_widget(text, area);
}

/// Render an error message with a retry hint.
pub fn render_error(frame: &mut Frame, area: Rect, error: &str, palette: &Palette) {
    let text = Paragraph::new(vec![
        Line::from(format!("❌ {}", error)),
        Line::from(""),
        Line::from(Span::styled("Press r to retry", palette.muted_style())),
    ])
    .alignment(Alignment::Center)
    .style(Style::default().fg(palette.error));
    frame.render_widget(text, area);
}

/// Render an empty state message.
pub fn render_empty(frame: &mut Frame, area: Rect, message: &str, palette: &Palette) {
    let text = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(palette.muted_style());
    frame.render_widget(text, area);
}

/// Render the current page of project cards.
pub fn render_projects(
    frame: &mut Frame,
    portfolio: &mut PortfolioView,
    palette: &Palette,
    area: Rect,
) {
    let block = Block::default().borders(Borders::ALL).title(" Projects ");

    if portfolio.total_count() == 0 {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        render_empty(frame, inner, "No projects loaded. Pass --projects FILE", palette);
        return;
    }
    if portfolio.visible_count() == 0 {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        render_empty(
            frame,
            inner,
            "No projects match your filters. Press x to clear them",
            palette,
        );
        return;
    }

    let items: Vec<ListItem> = portfolio
        .page_items()
        .iter()
        .map(|project| {
            let updated = project.updated_at.as_ref().map(format_date).unwrap_or_default();
            let header = Line::from(vec![
                Span::styled(
                    project.name.clone(),
                    Style::default()
                        .fg(palette.accent)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {}", project.status.label()),
                    Style::default().fg(status_color(project.status, palette)),
                ),
                Span::styled(
                    format!("  {}", category_label(&project.category)),
                    palette.muted_style(),
                ),
            ]);
            let details = Line::from(vec![
                Span::styled(
                    format!("  ★ {}  ⑂ {}  ", project.stars, project.forks),
                    Style::default().fg(palette.text),
                ),
                Span::styled(project.technologies.join(", "), palette.muted_style()),
                Span::styled(format!("  {}", updated), palette.muted_style()),
            ]);
            ListItem::new(vec![header, details])
        })
        .collect();

    let list_widget = List::new(items)
        .block(block)
        .highlight_style(palette.highlight_style())
        .highlight_symbol("> ");

    frame.render_stateful_widget(list_widget, area, &mut portfolio.list_state);
}

/// Render the repository list for the GitHub tab.
pub fn render_repositories(
    frame: &mut Frame,
    state: &LoadingState<std::sync::Arc<Snapshot>>,
    repositories: &[RepositoryView],
    list_state: &mut ListState,
    palette: &Palette,
    area: Rect,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Repositories ({}) ", repositories.len()));

    if repositories.is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        match state {
            LoadingState::Idle => render_empty(frame, inner, "Not loaded yet", palette),
            LoadingState::Loading => render_loading(frame, inner, "Loading repositories", palette),
            LoadingState::Error(e) => render_error(frame, inner, e, palette),
            LoadingState::Loaded(_) => render_empty(frame, inner, "No repositories found", palette),
        }
        return;
    }

    let items: Vec<ListItem> = repositories
        .iter()
        .map(|repo| {
            let visibility = if repo.is_private { "🔒" } else { "🌐" };
            let updated = repo
                .updated_at
                .as_ref()
                .map(format_relative_time)
                .unwrap_or_default();
            let mut spans = vec![
                Span::raw(format!("{} ", visibility)),
                Span::styled(repo.name.clone(), Style::default().fg(palette.accent)),
                Span::styled(
                    format!("  ★ {} ⑂ {}", repo.stars, repo.forks),
                    Style::default().fg(palette.text),
                ),
            ];
            if let Some(language) = &repo.language {
                spans.push(Span::styled(format!("  {}", language), palette.muted_style()));
            }
            if repo.is_fork {
                spans.push(Span::styled("  fork", palette.muted_style()));
            }
            if repo.is_archived {
                spans.push(Span::styled("  archived", Style::default().fg(palette.warn)));
            }
            spans.push(Span::styled(format!("  {}", updated), palette.muted_style()));
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list_widget = List::new(items)
        .block(block)
        .highlight_style(palette.highlight_style())
        .highlight_symbol("> ");

    frame.render_stateful_widget(list_widget, area, list_state);
}

/// Render console messages, newest first.
pub fn render_console(
    frame: &mut Frame,
    console: &mut ConsoleState,
    palette: &Palette,
    area: Rect,
) {
    let block = Block::default().borders(Borders::ALL).title(" Console ");

    if console.messages.is_empty() {
        let text = Paragraph::new("No messages")
            .alignment(Alignment::Center)
            .style(palette.muted_style())
            .block(block);
        frame.render_widget(text, area);
        return;
    }

    let items: Vec<ListItem> = console
        .messages
        .iter()
        .rev()
        .map(|msg| {
            let (icon, color) = match msg.level {
                ConsoleLevel::Error => ("❌", palette.error),
                ConsoleLevel::Warn => ("⚠️", palette.warn),
                ConsoleLevel::Info => ("ℹ️", palette.accent),
            };

            ListItem::new(Line::from(vec![
                Span::raw(format!("{} ", icon)),
                Span::styled(format_relative_time(&msg.timestamp), palette.muted_style()),
                Span::raw(" "),
                Span::styled(msg.message.clone(), Style::default().fg(color)),
            ]))
        })
        .collect();

    let list_widget = List::new(items)
        .block(block)
        .highlight_style(palette.highlight_style())
        .highlight_symbol("> ");

    frame.render_stateful_widget(list_widget, area, &mut console.list_state);
}
