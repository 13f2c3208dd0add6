//! TUI Dashboard page: read-only summary panels.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use ladybug_core::config::ProjectConfig;
use ladybug_core::derive;
use ladybug_core::state::AppState;

use crate::output::percent_bar;

pub struct DashboardView {
    top_performers: usize,
}

impl DashboardView {
    pub fn new(config: &ProjectConfig) -> Self {
        Self {
            top_performers: config.dashboard.top_performers,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);
        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(34),
                Constraint::Percentage(33),
                Constraint::Percentage(33),
            ])
            .split(rows[0]);
        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);

        Self::render_status(frame, top[0], state);
        Self::render_teams(frame, top[1], state);
        Self::render_bounties(frame, top[2], state);
        self.render_performers(frame, bottom[0], state);
        Self::render_critical(frame, bottom[1], state);
    }

    fn render_status(frame: &mut Frame, area: Rect, state: &AppState) {
        let total = state.bugs.len();
        let lines: Vec<Line> = derive::status_counts(state.bugs.as_slice())
            .into_iter()
            .map(|(status, count)| {
                #[allow(clippy::cast_precision_loss)]
                let share = if total == 0 {
                    0.0
                } else {
                    count as f64 / total as f64 * 100.0
                };
                Line::from(format!(
                    "{:<12} {:>2}  {}",
                    status.label(),
                    count,
                    percent_bar(share, 10)
                ))
            })
            .collect();
        let widget = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(" Bug Status "));
        frame.render_widget(widget, area);
    }

    fn render_teams(frame: &mut Frame, area: Rect, state: &AppState) {
        let lines: Vec<Line> =
            derive::team_activity(state.bugs.as_slice(), state.teams.as_slice())
                .into_iter()
                .map(|row| {
                    Line::from(format!(
                        "{:<12} reported {:>2}  resolved {:>2}",
                        row.team, row.reported, row.resolved
                    ))
                })
                .collect();
        let widget = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Team Performance "),
        );
        frame.render_widget(widget, area);
    }

    fn render_bounties(frame: &mut Frame, area: Rect, state: &AppState) {
        let lines: Vec<Line> = derive::cadence_progress(state.bounties.as_slice())
            .into_iter()
            .map(|(cadence, progress)| {
                Line::from(format!("{:<8} {}", cadence.label(), percent_bar(progress, 12)))
            })
            .collect();
        let widget = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Bounty Progress "),
        );
        frame.render_widget(widget, area);
    }

    fn render_performers(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let performers = derive::top_performers(
            state.bugs.as_slice(),
            state.teams.as_slice(),
            self.top_performers,
        );
        let lines: Vec<Line> = if performers.is_empty() {
            vec![Line::from(Span::styled(
                "No resolutions yet.",
                Style::default().fg(Color::DarkGray),
            ))]
        } else {
            performers
                .into_iter()
                .map(|p| {
                    Line::from(format!(
                        "{:<18} resolved {:>2}   ${}",
                        p.name, p.resolved, p.reward
                    ))
                })
                .collect()
        };
        let widget = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Top Performers "),
        );
        frame.render_widget(widget, area);
    }

    fn render_critical(frame: &mut Frame, area: Rect, state: &AppState) {
        let issues = derive::critical_issues(state.bugs.as_slice());
        let lines: Vec<Line> = if issues.is_empty() {
            vec![Line::from(Span::styled(
                "No open high-severity bugs.",
                Style::default().fg(Color::DarkGray),
            ))]
        } else {
            issues
                .into_iter()
                .map(|bug| {
                    Line::from(vec![
                        Span::styled(
                            format!("{:<9} ", bug.severity.label()),
                            Style::default()
                                .fg(Color::Red)
                                .add_modifier(Modifier::BOLD),
                        ),
                        Span::raw(format!(
                            "{:<40} {}",
                            bug.title,
                            state.assignee_label(bug.assignee)
                        )),
                    ])
                })
                .collect()
        };
        let widget = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Critical Issues "),
        );
        frame.render_widget(widget, area);
    }
}
