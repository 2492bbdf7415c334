// Contact tab: one row per field with its inline error, then the Send button.

use ratatui::{prelude::*, widgets::*};

use crate::state::{ContactField, ContactForm};

use super::theme::Palette;

pub fn draw_contact_tab(frame: &mut Frame, form: &ContactForm, palette: &Palette, area: Rect) {
    let mut lines = Vec::new();

    for field in ContactField::ALL {
        let focused = form.focused() == Some(field);
        let editing = focused && form.editing;

        let label_style = if focused {
            Style::default()
                .fg(palette.active)
                .add_modifier(Modifier::BOLD)
        } else {
            palette.muted_style()
        };
        let marker = if focused { "▶ " } else { "  " };

        let mut spans = vec![
            Span::styled(marker, Style::default().fg(palette.active)),
            Span::styled(format!("{:<9}", field.label()), label_style),
            Span::styled(form.value(field).to_string(), Style::default().fg(palette.text)),
        ];
        if editing {
            spans.push(Span::styled("█", Style::default().fg(palette.active)));
        }
        lines.push(Line::from(spans));

        match form.error(field) {
            Some(error) => lines.push(Line::from(Span::styled(
                format!("           {}", error),
                Style::default().fg(palette.error),
            ))),
            None => lines.push(Line::from("")),
        }
    }

    let button_style = if form.send_focused() {
        palette.highlight_style()
    } else {
        Style::default().fg(palette.accent)
    };
    lines.push(Line::from(vec![
        Span::raw("           "),
        Span::styled("[ Send ]", button_style),
    ]));

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.muted_style())
                .title(" Get in touch ")
                .title_style(palette.title_style()),
        );
    frame.render_widget(paragraph, area);
}
