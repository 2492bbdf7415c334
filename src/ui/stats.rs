// GitHub tab: profile and aggregate statistics beside the repository list.

use chrono::Utc;
use ratatui::{prelude::*, widgets::*};

use crate::app::App;
use crate::github::RateLimitState;
use crate::state::{LoadingState, RepoDetails};
use crate::transform::RankedCount;

use super::list;
use super::theme::Palette;

const TOP_N: usize = 5;

pub fn draw_github_tab(frame: &mut Frame, app: &mut App, palette: &Palette, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(38), Constraint::Min(20)])
        .split(area);

    draw_summary(frame, app, palette, columns[0]);

    if app.show_repo_details {
        draw_repo_details(frame, &app.repo_details(), palette, columns[1]);
        return;
    }

    let state = app.integration.state();
    let repositories = app.visible_repositories();
    list::render_repositories(
        frame,
        &state,
        &repositories,
        &mut app.repo_list_state,
        palette,
        columns[1],
    );
}

fn draw_summary(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Profile ");
    let mut lines: Vec<Line> = Vec::new();

    match app.integration.snapshot() {
        Some(snapshot) => {
            let profile = &snapshot.profile;
            let stats = &snapshot.stats;
            lines.push(Line::from(Span::styled(
                profile.display_name().to_string(),
                palette.title_style(),
            )));
            if let Some(bio) = &profile.bio {
                lines.push(Line::from(Span::styled(bio.clone(), palette.muted_style())));
            }
            lines.push(Line::from(format!(
                "{} followers · {} following",
                profile.followers, profile.following
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(format!(
                "{} repositories  ★ {}  ⑂ {}",
                stats.total, stats.total_stars, stats.total_forks
            )));
            lines.push(Line::from(Span::styled(
                format!(
                    "{} public · {} private · {} forks · {} archived",
                    stats.public, stats.private, stats.forks, stats.archived
                ),
                palette.muted_style(),
            )));

            push_ranked(&mut lines, "Languages", &app.integration.language_stats(), palette);
            push_ranked(&mut lines, "Topics", &app.integration.topic_stats(), palette);
        }
        None => {
            let message = match app.integration.state().error() {
                Some(_) => "Load failed. Press r to retry",
                None if app.integration.username().is_none() => "No GitHub user configured",
                None => "Loading profile...",
            };
            lines.push(Line::from(Span::styled(message, palette.muted_style())));
        }
    }

    lines.push(Line::from(""));
    lines.push(rate_limit_line(&app.integration.rate_limit(), palette));
    if let Some(url) = app.prefs.dashboard_url() {
        lines.push(Line::from(vec![
            Span::styled("Dashboard ", palette.muted_style()),
            Span::styled(url.to_string(), Style::default().fg(palette.accent)),
        ]));
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(paragraph, area);
}

fn draw_repo_details(
    frame: &mut Frame,
    state: &LoadingState<std::sync::Arc<RepoDetails>>,
    palette: &Palette,
    area: Rect,
) {
    let title = match state {
        LoadingState::Loaded(details) => format!(" {} ", details.repository.full_name),
        _ => " Repository ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent))
        .title(title)
        .title_style(palette.title_style());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let details = match state {
        LoadingState::Idle => return,
        LoadingState::Loading => {
            list::render_loading(frame, inner, "Loading repository", palette);
            return;
        }
        LoadingState::Error(e) => {
            list::render_error(frame, inner, e, palette);
            return;
        }
        LoadingState::Loaded(details) => details,
    };

    let repo = &details.repository;
    let mut lines = vec![
        Line::from(Span::styled(repo.description.clone(), Style::default().fg(palette.text))),
        Line::from(Span::styled(
            format!(
                "★ {}  ⑂ {}  👁 {}  issues {}{}",
                repo.stars,
                repo.forks,
                repo.watchers,
                repo.open_issues,
                repo.license
                    .as_ref()
                    .map(|l| format!("  {}", l))
                    .unwrap_or_default()
            ),
            palette.muted_style(),
        )),
    ];

    if !details.languages.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Languages",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for share in &details.languages {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {:<16}", share.language),
                    Style::default().fg(palette.accent),
                ),
                Span::raw(format!("{:>5.1}%", share.percentage)),
            ]));
        }
    }

    if !details.contributors.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Contributors",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for contributor in details.contributors.iter().take(TOP_N) {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {:<20}", contributor.username),
                    Style::default().fg(palette.accent),
                ),
                Span::raw(format!("{} commits", contributor.contributions)),
            ]));
        }
    }

    lines.push(Line::from(""));
    match &details.readme {
        Some(readme) => {
            lines.extend(readme.lines().map(|l| Line::from(l.to_string())));
        }
        None => lines.push(Line::from(Span::styled("No README", palette.muted_style()))),
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn push_ranked(lines: &mut Vec<Line>, title: &str, ranked: &[RankedCount], palette: &Palette) {
    if ranked.is_empty() {
        return;
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        title.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for entry in ranked.iter().take(TOP_N) {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<20}", entry.name), Style::default().fg(palette.accent)),
            Span::raw(entry.count.to_string()),
        ]));
    }
}

pub fn rate_limit_color(rate: &RateLimitState, palette: &Palette) -> Color {
    let remaining_share = rate.remaining as f64 / rate.limit.max(1) as f64;
    if remaining_share < 0.1 {
        palette.error
    } else if remaining_share < 0.25 {
        palette.warn
    } else {
        palette.muted
    }
}

fn rate_limit_line(rate: &RateLimitState, palette: &Palette) -> Line<'static> {
    let resets_in = (rate.reset_at - Utc::now()).num_minutes().max(0);
    Line::from(vec![
        Span::styled("API quota ", palette.muted_style()),
        Span::styled(
            format!("{}/{}", rate.remaining, rate.limit),
            Style::default().fg(rate_limit_color(rate, palette)),
        ),
        Span::styled(format!("  resets in {}m", resets_in), palette.muted_style()),
    ])
}
