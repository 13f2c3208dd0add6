//! TUI Export page: section toggles, format cycling, and the simulated
//! export run with cancellation.
//!
//! Keys: b/t/r/s toggle sections, f cycle format, e start export,
//! c cancel.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::time::Duration;

use ladybug_core::config::ProjectConfig;
use ladybug_core::export::{ExportRequest, ExportStatus, ExportTask, Format, Section};
use ladybug_core::state::AppState;

pub enum ExportAction {
    Notice(String),
}

pub struct ExportView {
    request: ExportRequest,
    task: ExportTask,
}

impl ExportView {
    pub fn new(config: &ProjectConfig) -> Self {
        Self {
            request: ExportRequest::default(),
            task: ExportTask::new(Duration::from_millis(config.export.simulated_delay_ms)),
        }
    }

    fn toggle(&mut self, section: Section) -> Option<ExportAction> {
        if !self.request.sections.remove(&section) {
            self.request.sections.insert(section);
        }
        None
    }

    pub fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Option<ExportAction> {
        match key.code {
            KeyCode::Char('b') => self.toggle(Section::Bugs),
            KeyCode::Char('t') => self.toggle(Section::Teams),
            KeyCode::Char('r') => self.toggle(Section::Rewards),
            KeyCode::Char('s') => self.toggle(Section::Statistics),
            KeyCode::Char('f') => {
                self.request.format = match self.request.format {
                    Format::Csv => Format::Json,
                    Format::Json => Format::Excel,
                    Format::Excel => Format::Pdf,
                    Format::Pdf => Format::Csv,
                };
                None
            }
            KeyCode::Char('e') => match self.task.start(&self.request, state) {
                Ok(()) => Some(ExportAction::Notice("Export started".into())),
                Err(err) => Some(ExportAction::Notice(format!("Export rejected: {err}"))),
            },
            KeyCode::Char('c') => {
                self.task.cancel();
                None
            }
            _ => None,
        }
    }

    /// Advance the simulated run; on success, write the artifact next to
    /// the process and report it.
    pub fn tick(&mut self) -> Option<ExportAction> {
        self.task.tick();
        let artifact = self.task.take_artifact()?;
        let path = std::path::PathBuf::from(&artifact.file_name);
        match std::fs::write(&path, &artifact.bytes) {
            Ok(()) => Some(ExportAction::Notice(format!(
                "Export written to {}",
                path.display()
            ))),
            Err(err) => Some(ExportAction::Notice(format!("Export write failed: {err}"))),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, _state: &AppState) {
        let mut lines: Vec<Line> = vec![
            Line::from(Span::styled(
                "Select data to export",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
        ];
        for section in &Section::ALL {
            let mark = if self.request.sections.contains(section) {
                "[x]"
            } else {
                "[ ]"
            };
            let key = section
                .to_string()
                .chars()
                .next()
                .unwrap_or('?');
            lines.push(Line::from(format!("  {key} {mark} {}", section.label())));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(format!(
            "Format: {}    File: {}",
            self.request.format,
            self.request.file_name()
        )));

        lines.push(Line::from(""));
        let status_line = match self.task.status() {
            ExportStatus::Idle => Line::from("Status: idle"),
            ExportStatus::Running => Line::from(Span::styled(
                "Status: exporting...",
                Style::default().fg(Color::Yellow),
            )),
            ExportStatus::Succeeded { file_name, bytes } => Line::from(Span::styled(
                format!("Status: exported {file_name} ({bytes} bytes)"),
                Style::default().fg(Color::Green),
            )),
            ExportStatus::Failed { reason } => Line::from(Span::styled(
                format!("Status: failed — {reason}"),
                Style::default().fg(Color::Red),
            )),
            ExportStatus::Cancelled => Line::from(Span::styled(
                "Status: cancelled",
                Style::default().fg(Color::Gray),
            )),
        };
        lines.push(status_line);

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "b/t/r/s toggle sections  f format  e export  c cancel",
            Style::default().fg(Color::DarkGray),
        )));

        let widget = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(" Export Data "));
        frame.render_widget(widget, area);
    }
}
