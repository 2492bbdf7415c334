// UI module for rendering the TUI.
// Contains widgets for tabs, the filter bar, lists, the project modal, stats,
// and the contact form.

mod contact;
mod filters;
mod list;
mod modal;
mod stats;
mod tabs;
mod theme;

use ratatui::{prelude::*, widgets::*};

use crate::app::{App, Tab};

use theme::Palette;

/// Main draw function that renders the entire UI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let palette = Palette::for_theme(app.prefs.theme());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Length(2), // Filter bar
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    tabs::draw_tabs(frame, app, &palette, chunks[0]);

    match app.active_tab {
        Tab::Projects => filters::draw_project_filters(frame, app, &palette, chunks[1]),
        Tab::GitHub => filters::draw_github_bar(frame, app, &palette, chunks[1]),
        Tab::Contact | Tab::Console => filters::draw_plain_bar(frame, &palette, chunks[1]),
    }

    match app.active_tab {
        Tab::Projects => list::render_projects(frame, &mut app.portfolio, &palette, chunks[2]),
        Tab::GitHub => stats::draw_github_tab(frame, app, &palette, chunks[2]),
        Tab::Contact => contact::draw_contact_tab(frame, &app.contact, &palette, chunks[2]),
        Tab::Console => list::render_console(frame, &mut app.console, &palette, chunks[2]),
    }

    draw_status_bar(frame, app, &palette, chunks[3]);

    if app.active_tab == Tab::Projects {
        if let Some(project) = app.portfolio.modal_project() {
            modal::draw_project_modal(frame, project, &palette);
        }
    }

    // Help overlay (rendered last, on top of everything)
    if app.show_help {
        draw_help_overlay(frame, &palette);
    }
}

fn hint(key: &'static str, label: &'static str, palette: &Palette) -> [Span<'static>; 2] {
    [
        Span::raw(format!("  {} ", key)),
        Span::styled(label, palette.muted_style()),
    ]
}

/// Draw the status bar with keybinding hints and rate limit.
fn draw_status_bar(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let keys: &[(&'static str, &'static str)] = if app.search_active {
        &[("↵", "Apply"), ("Esc", "Done")]
    } else if app.url_input.is_some() {
        &[("↵", "Save (empty clears)"), ("Esc", "Cancel")]
    } else if app.contact.editing && app.active_tab == Tab::Contact {
        &[("↵", "Done"), ("Tab", "Next field")]
    } else if app.show_repo_details && app.active_tab == Tab::GitHub {
        &[("Esc", "Close"), ("?", "Help")]
    } else {
        match app.active_tab {
            Tab::Projects => &[
                ("↑↓", "Select"),
                ("↵", "Details"),
                ("/", "Search"),
                ("c", "Category"),
                ("s", "Sort"),
                ("←→", "Page"),
                ("?", "Help"),
                ("q", "Quit"),
            ],
            Tab::GitHub => &[
                ("↑↓", "Select"),
                ("↵", "Details"),
                ("s", "Sort"),
                ("f", "Forks"),
                ("r", "Refresh"),
                ("e", "Export"),
                ("u", "Dashboard"),
                ("?", "Help"),
                ("q", "Quit"),
            ],
            Tab::Contact => &[
                ("↑↓", "Field"),
                ("↵", "Edit/Send"),
                ("x", "Clear"),
                ("?", "Help"),
                ("q", "Quit"),
            ],
            Tab::Console => &[
                ("↑↓", "Scroll"),
                ("Tab", "Switch"),
                ("?", "Help"),
                ("q", "Quit"),
            ],
        }
    };

    let mut spans: Vec<Span> = keys
        .iter()
        .flat_map(|(key, label)| hint(key, label, palette))
        .collect();

    if app.integration.is_loading() {
        spans.push(Span::styled("  ⏳ Loading", Style::default().fg(palette.warn)));
    }

    let rate = app.integration.rate_limit();
    spans.push(Span::styled(
        format!("  API: {}/{}", rate.remaining, rate.limit),
        Style::default().fg(stats::rate_limit_color(&rate, palette)),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draw the help overlay.
fn draw_help_overlay(frame: &mut Frame, palette: &Palette) {
    let popup_area = modal::centered(frame.area(), 58, 23);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let key_style = Style::default().fg(palette.accent);
    let rows = [
        ("  ↑/↓ or j/k    ", "Navigate list"),
        ("  Enter         ", "Project or repository details"),
        ("  Tab/S-Tab     ", "Switch tabs"),
        ("  /             ", "Search projects"),
        ("  c             ", "Cycle category"),
        ("  s             ", "Cycle sort order"),
        ("  ←/→ or p/n    ", "Previous/next page"),
        ("  Backspace     ", "Remove last filter"),
        ("  x             ", "Clear filters or contact form"),
        ("  f             ", "Hide/show forks (GitHub)"),
        ("  r             ", "Refresh GitHub data"),
        ("  e             ", "Export dashboard JSON"),
        ("  u             ", "Set or clear dashboard URL"),
        ("  t             ", "Toggle light/dark theme"),
        ("  ?             ", "Show/hide this help"),
        ("  q             ", "Quit"),
    ];

    let mut help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
    ];
    help_text.extend(rows.iter().map(|(key, action)| {
        Line::from(vec![Span::styled(*key, key_style), Span::raw(*action)])
    }));
    help_text.push(Line::from(""));
    help_text.push(Line::from(vec![
        Span::styled("Press ", palette.muted_style()),
        Span::styled("Esc", Style::default().fg(palette.active)),
        Span::styled(" or ", palette.muted_style()),
        Span::styled("?", Style::default().fg(palette.active)),
        Span::styled(" to close", palette.muted_style()),
    ]));

    let help_paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent))
                .title(" Help ")
                .title_style(palette.title_style()),
        )
        .alignment(Alignment::Left);

    frame.render_widget(help_paragraph, popup_area);
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Instant;

    use crossterm::event::{KeyCode, KeyEvent};
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::app::testing::{app, push_alice, settle};
    use crate::http::mock::MockTransport;

    fn render(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(110, 32)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[tokio::test]
    async fn test_projects_tab_renders_cards_and_counts() {
        let mut app = app(&MockTransport::new(), PathBuf::from("unused.json"));
        let screen = render(&mut app);
        assert!(screen.contains("Projects"));
        assert!(screen.contains("E-Commerce Platform"));
        assert!(screen.contains("6 of 6 projects"));
        assert!(screen.contains("API: 60/60"));
    }

    #[tokio::test]
    async fn test_modal_and_help_render() {
        let mut app = app(&MockTransport::new(), PathBuf::from("unused.json"));
        app.portfolio.open_modal();
        let screen = render(&mut app);
        assert!(screen.contains("Filter by technology"));
        assert!(screen.contains("MongoDB"));

        app.portfolio.close_modal();
        app.show_help = true;
        assert!(render(&mut app).contains("Keyboard Shortcuts"));
    }

    #[tokio::test]
    async fn test_github_tab_renders_profile_and_repositories() {
        let transport = MockTransport::new();
        push_alice(&transport);
        let mut app = app(&transport, PathBuf::from("unused.json"));
        app.integration.load_user_data().await;
        app.tick(Instant::now());
        app.active_tab = Tab::GitHub;

        let screen = render(&mut app);
        assert!(screen.contains("Alice"));
        assert!(screen.contains("Repositories (2)"));
        assert!(screen.contains("folio"));
        assert!(screen.contains("Rust"));
    }

    #[tokio::test]
    async fn test_github_error_shows_retry_hint() {
        let mut app = app(&MockTransport::new(), PathBuf::from("unused.json"));
        app.integration.load_user_data().await;
        app.active_tab = Tab::GitHub;
        app.prefs.toggle_theme();

        let screen = render(&mut app);
        assert!(screen.contains("Press r to retry"));
    }

    #[tokio::test]
    async fn test_repo_details_panel_renders() {
        let transport = MockTransport::new();
        push_alice(&transport);
        transport.push_json(
            "https://api.github.com/repos/alice/folio/languages",
            serde_json::json!({"Rust": 900, "Shell": 100}),
        );
        transport.push_json(
            "https://api.github.com/repos/alice/folio/contributors",
            serde_json::json!([{"id": 1, "login": "alice", "contributions": 12}]),
        );
        transport.push_json(
            "https://api.github.com/repos/alice/folio/readme",
            serde_json::json!({
                "name": "README.md",
                "encoding": "base64",
                "content": "IyBmb2xpbwo=",
            }),
        );
        let mut app = app(&transport, PathBuf::from("unused.json"));
        app.start();
        settle(&mut app).await;

        app.active_tab = Tab::GitHub;
        app.handle_key(KeyEvent::from(KeyCode::Char('f')));
        app.handle_key(KeyEvent::from(KeyCode::Enter));
        assert!(render(&mut app).contains("Loading repository"));

        settle(&mut app).await;
        let screen = render(&mut app);
        assert!(screen.contains("alice/folio"));
        assert!(screen.contains("90.0%"));
        assert!(screen.contains("12 commits"));
        assert!(screen.contains("# folio"));
    }

    #[tokio::test]
    async fn test_contact_tab_shows_inline_errors() {
        let mut app = app(&MockTransport::new(), PathBuf::from("unused.json"));
        app.active_tab = Tab::Contact;
        let screen = render(&mut app);
        assert!(screen.contains("Get in touch"));
        assert!(screen.contains("[ Send ]"));

        app.handle_key(KeyEvent::from(KeyCode::Down));
        app.handle_key(KeyEvent::from(KeyCode::Enter));
        for c in "ada@".chars() {
            app.handle_key(KeyEvent::from(KeyCode::Char(c)));
        }
        assert!(render(&mut app).contains("ada@█"));

        app.handle_key(KeyEvent::from(KeyCode::Enter));
        assert!(render(&mut app).contains("Please enter a valid email address"));
    }

    #[tokio::test]
    async fn test_dashboard_prompt_renders_in_bar() {
        let mut app = app(&MockTransport::new(), PathBuf::from("unused.json"));
        app.active_tab = Tab::GitHub;
        app.handle_key(KeyEvent::from(KeyCode::Char('u')));
        app.handle_key(KeyEvent::from(KeyCode::Char('h')));
        let screen = render(&mut app);
        assert!(screen.contains("Dashboard URL: h█"));
        assert!(screen.contains("Save (empty clears)"));
    }
}
