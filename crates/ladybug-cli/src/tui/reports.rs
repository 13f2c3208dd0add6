//! TUI Reports page: read-only trend, distribution, and summary panels.

use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use ladybug_core::config::ProjectConfig;
use ladybug_core::derive;
use ladybug_core::report;
use ladybug_core::state::AppState;

pub struct ReportsView {
    trend_weeks: usize,
}

impl ReportsView {
    pub fn new(config: &ProjectConfig) -> Self {
        Self {
            trend_weeks: config.report.trend_weeks,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);
        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[0]);
        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);

        self.render_trend(frame, top[0], state);
        Self::render_buckets(frame, top[1], state);
        Self::render_summary(frame, bottom[0], state);
        Self::render_members(frame, bottom[1], state);
    }

    fn render_trend(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let bugs = state.bugs.as_slice();
        let anchor = bugs
            .iter()
            .map(|b| b.updated_at)
            .max()
            .unwrap_or_else(Utc::now);
        let lines: Vec<Line> = report::weekly_trend(bugs, self.trend_weeks, anchor)
            .into_iter()
            .map(|week| {
                Line::from(vec![
                    Span::raw(format!("{:<9} ", week.week)),
                    Span::styled(
                        "+".repeat(week.created),
                        Style::default().fg(Color::Red),
                    ),
                    Span::styled(
                        "·".repeat(week.resolved),
                        Style::default().fg(Color::Green),
                    ),
                    Span::raw(format!(
                        "  created {} resolved {}",
                        week.created, week.resolved
                    )),
                ])
            })
            .collect();
        let widget = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Created vs Resolved "),
        );
        frame.render_widget(widget, area);
    }

    fn render_buckets(frame: &mut Frame, area: Rect, state: &AppState) {
        let lines: Vec<Line> =
            report::bucket_distribution(state.bugs.as_slice(), state.buckets.as_slice())
                .into_iter()
                .map(|row| Line::from(format!("{:<20} {}", row.bucket, row.count)))
                .collect();
        let widget = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Bugs by Category "),
        );
        frame.render_widget(widget, area);
    }

    fn render_summary(frame: &mut Frame, area: Rect, state: &AppState) {
        let bugs = state.bugs.as_slice();
        let summary = report::summary(bugs);
        let mut lines = vec![
            Line::from(format!("Total bugs:            {}", summary.total_bugs)),
            Line::from(format!("Resolution rate:       {:.1}%", summary.resolution_rate)),
            Line::from(format!(
                "Avg resolution (days): {:.1}",
                summary.avg_resolution_days
            )),
            Line::from(vec![
                Span::raw("Open critical:         "),
                Span::styled(
                    summary.open_critical.to_string(),
                    Style::default()
                        .fg(Color::Red)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
        ];
        for (severity, count) in derive::severity_counts(bugs) {
            lines.push(Line::from(format!("{:<9} {}", severity.label(), count)));
        }
        let widget = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Summary Statistics "),
        );
        frame.render_widget(widget, area);
    }

    fn render_members(frame: &mut Frame, area: Rect, state: &AppState) {
        let lines: Vec<Line> =
            report::member_performance(state.bugs.as_slice(), state.teams.as_slice())
                .into_iter()
                .map(|row| {
                    Line::from(format!(
                        "{:<18} {:<10} reported {:>2}  resolved {:>2}",
                        row.name, row.team, row.reported, row.resolved
                    ))
                })
                .collect();
        let widget = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Team Member Performance "),
        );
        frame.render_widget(widget, area);
    }
}
