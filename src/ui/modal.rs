// Project detail modal.
// Drawn over the Projects tab; numbered technologies double as filter shortcuts.

use ratatui::{prelude::*, widgets::*};

use crate::state::{Project, category_label};

use super::list::{format_date, status_color};
use super::theme::Palette;

/// Centered rect of at most `width` x `height` inside `area`.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn field<'a>(label: &'a str, value: String, palette: &Palette) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{:<10}", label), palette.muted_style()),
        Span::styled(value, Style::default().fg(palette.text)),
    ])
}

/// Draw the detail modal for `project`.
pub fn draw_project_modal(frame: &mut Frame, project: &Project, palette: &Palette) {
    let modal_area = centered(frame.area(), 70, 22);

    // Clear the area behind the modal
    frame.render_widget(Clear, modal_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Details
            Constraint::Length(1), // Instructions
        ])
        .split(modal_area);

    let date = |d: Option<&chrono::NaiveDate>| d.map(format_date).unwrap_or_else(|| "-".into());

    let mut lines = vec![
        Line::from(Span::styled(
            project.description.clone(),
            Style::default().fg(palette.text),
        )),
        Line::from(""),
        field("Category", category_label(&project.category).to_string(), palette),
        Line::from(vec![
            Span::styled(format!("{:<10}", "Status"), palette.muted_style()),
            Span::styled(
                project.status.label(),
                Style::default().fg(status_color(project.status, palette)),
            ),
        ]),
        field("Stars", project.stars.to_string(), palette),
        field("Forks", project.forks.to_string(), palette),
        field("Created", date(project.created_at.as_ref()), palette),
        field("Updated", date(project.updated_at.as_ref()), palette),
    ];
    if let Some(language) = &project.language {
        lines.push(field("Language", language.clone(), palette));
    }
    if let Some(url) = &project.github_url {
        lines.push(field("GitHub", url.clone(), palette));
    }
    if let Some(url) = &project.live_url {
        lines.push(field("Live", url.clone(), palette));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Technologies",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for (i, technology) in project.technologies.iter().take(9).enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!("  {} ", i + 1), Style::default().fg(palette.active)),
            Span::styled(technology.clone(), Style::default().fg(palette.accent)),
        ]));
    }

    let details = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent))
                .title(format!(" {} ", project.name))
                .title_style(palette.title_style()),
        );
    frame.render_widget(details, chunks[0]);

    let instructions = Line::from(vec![
        Span::styled(" 1-9", Style::default().fg(palette.active)),
        Span::styled(" = Filter by technology  ", palette.muted_style()),
        Span::styled("Esc", Style::default().fg(palette.active)),
        Span::styled(" = Close ", palette.muted_style()),
    ]);
    frame.render_widget(
        Paragraph::new(instructions).alignment(Alignment::Center),
        chunks[1],
    );
}
