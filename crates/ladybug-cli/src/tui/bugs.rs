//! TUI Bugs page: searchable, filterable bug table with a status summary
//! sidebar and the new-bug dialog.
//!
//! Keys: j/k navigate, / search, t cycle status tab, s cycle severity
//! filter, n new bug, Esc clear search.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use ladybug_core::config::ProjectConfig;
use ladybug_core::derive::{self, BugFilter, SortDirection, SortKey};
use ladybug_core::form::{BugDraft, FormSession};
use ladybug_core::model::bug::{Bug, Severity, Status};
use ladybug_core::state::AppState;

use super::dialog::{DialogOutcome, Field, FormDialog};

/// Result of a key press that the app shell cares about.
pub enum BugsAction {
    /// A bug was created; show this in the status line.
    Notice(String),
}

pub struct BugsView {
    filter: BugFilter,
    /// Active status tab; `None` is the "All" tab.
    tab: Option<Status>,
    search_mode: bool,
    table: TableState,
    session: FormSession<BugDraft>,
    dialog: Option<FormDialog>,
    default_severity: Severity,
}

// Dialog field order.
const F_TITLE: usize = 0;
const F_DESCRIPTION: usize = 1;
const F_SEVERITY: usize = 2;
const F_BUCKET: usize = 3;
const F_ASSIGNEE: usize = 4;

impl BugsView {
    pub fn new(config: &ProjectConfig) -> Self {
        let mut table = TableState::default();
        table.select(Some(0));
        Self {
            filter: BugFilter::default(),
            tab: None,
            search_mode: false,
            table,
            session: FormSession::new(),
            dialog: None,
            default_severity: config.bugs.default_severity,
        }
    }

    pub fn dialog_open(&self) -> bool {
        self.dialog.is_some()
    }

    /// True while a dialog or the search prompt is consuming raw input.
    pub fn input_active(&self) -> bool {
        self.dialog.is_some() || self.search_mode
    }

    fn visible_bugs(&self, state: &AppState) -> Vec<Bug> {
        let mut filter = self.filter.clone();
        filter.status = self.tab;
        let mut bugs = filter.apply(state.bugs.as_slice());
        derive::sort_bugs(&mut bugs, SortKey::Updated, SortDirection::Descending);
        bugs
    }

    pub fn handle_key(&mut self, key: KeyEvent, state: &mut AppState) -> Option<BugsAction> {
        if self.dialog.is_some() {
            return self.handle_dialog_key(key, state);
        }

        if self.search_mode {
            match key.code {
                KeyCode::Esc => {
                    self.search_mode = false;
                    self.filter.search.clear();
                }
                KeyCode::Enter => self.search_mode = false,
                KeyCode::Backspace => {
                    self.filter.search.pop();
                }
                KeyCode::Char(c) => self.filter.search.push(c),
                _ => {}
            }
            return None;
        }

        match key.code {
            KeyCode::Char('/') => self.search_mode = true,
            KeyCode::Char('t') => self.tab = next_tab(self.tab),
            KeyCode::Char('s') => self.filter.severity = next_severity(self.filter.severity),
            KeyCode::Char('n') => self.open_dialog(state),
            KeyCode::Char('j') | KeyCode::Down => self.select_next(state),
            KeyCode::Char('k') | KeyCode::Up => self.select_prev(state),
            KeyCode::Esc => self.filter.search.clear(),
            _ => {}
        }
        None
    }

    fn open_dialog(&mut self, state: &AppState) {
        self.session.open(BugDraft {
            severity: self.default_severity,
            ..BugDraft::default()
        });

        let severity_options: Vec<String> =
            Severity::ALL.iter().map(ToString::to_string).collect();
        let severity_default = Severity::ALL
            .iter()
            .position(|&s| s == self.default_severity)
            .unwrap_or(0);
        let bucket_options: Vec<String> =
            state.buckets.iter().map(|b| b.name.clone()).collect();
        let mut assignee_options = vec!["Unassigned".to_string()];
        assignee_options.extend(
            state
                .teams
                .iter()
                .flat_map(|t| t.members.iter())
                .map(|m| m.name.clone()),
        );

        self.dialog = Some(FormDialog::new(
            "Report New Bug",
            vec![
                Field::text("Title"),
                Field::text("Description"),
                Field::select("Severity", severity_options, severity_default),
                Field::select("Bucket", bucket_options, 0),
                Field::select("Assignee", assignee_options, 0),
            ],
        ));
    }

    fn handle_dialog_key(&mut self, key: KeyEvent, state: &mut AppState) -> Option<BugsAction> {
        let outcome = self.dialog.as_mut()?.handle_key(key)?;
        match outcome {
            DialogOutcome::Cancel => {
                self.session.cancel();
                self.dialog = None;
                None
            }
            DialogOutcome::Submit => self.submit_dialog(state),
        }
    }

    fn submit_dialog(&mut self, state: &mut AppState) -> Option<BugsAction> {
        let (title, description, severity, bucket, assignee) = {
            let dialog = self.dialog.as_ref()?;
            let severity = Severity::ALL.get(dialog.choice(F_SEVERITY)).copied();
            let bucket = state
                .buckets
                .iter()
                .nth(dialog.choice(F_BUCKET))
                .map(|b| b.id);
            // Choice 0 is "Unassigned".
            let assignee = dialog.choice(F_ASSIGNEE).checked_sub(1).and_then(|i| {
                state
                    .teams
                    .iter()
                    .flat_map(|t| t.members.iter())
                    .nth(i)
                    .map(|m| m.id)
            });
            (
                dialog.value(F_TITLE).to_string(),
                dialog.value(F_DESCRIPTION).to_string(),
                severity,
                bucket,
                assignee,
            )
        };

        if let Some(draft) = self.session.draft_mut() {
            draft.title = title;
            draft.description = description;
            if let Some(severity) = severity {
                draft.severity = severity;
            }
            draft.bucket = bucket;
            draft.assignee = assignee;
        }

        match self.session.commit() {
            Ok(draft) => match state.bugs.create(draft.into_bug()) {
                Ok(bug) => {
                    let notice = format!("Bug {} created: {}", bug.id, bug.title);
                    self.dialog = None;
                    Some(BugsAction::Notice(notice))
                }
                Err(err) => {
                    if let Some(dialog) = self.dialog.as_mut() {
                        dialog.set_error(err.to_string());
                    }
                    None
                }
            },
            Err(err) => {
                if let Some(dialog) = self.dialog.as_mut() {
                    dialog.set_error(err.to_string());
                }
                None
            }
        }
    }

    fn select_next(&mut self, state: &AppState) {
        let len = self.visible_bugs(state).len();
        if len == 0 {
            return;
        }
        let i = self
            .table
            .selected()
            .map_or(0, |i| if i + 1 >= len { 0 } else { i + 1 });
        self.table.select(Some(i));
    }

    fn select_prev(&mut self, state: &AppState) {
        let len = self.visible_bugs(state).len();
        if len == 0 {
            return;
        }
        let i = self
            .table
            .selected()
            .map_or(0, |i| if i == 0 { len - 1 } else { i - 1 });
        self.table.select(Some(i));
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(72), Constraint::Percentage(28)])
            .split(area);

        self.render_table(frame, chunks[0], state);
        self.render_summary(frame, chunks[1], state);

        if let Some(dialog) = &self.dialog {
            dialog.render(frame, area);
        }
    }

    fn render_table(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let bugs = self.visible_bugs(state);

        let header = Row::new(vec!["Title", "Status", "Severity", "Bucket", "Assignee"])
            .style(Style::default().add_modifier(Modifier::BOLD));
        let rows: Vec<Row> = bugs
            .iter()
            .map(|bug| {
                Row::new(vec![
                    Cell::from(bug.title.clone()),
                    Cell::from(bug.status.label()),
                    Cell::from(bug.severity.label()),
                    Cell::from(
                        state
                            .bucket_name(bug.bucket)
                            .unwrap_or("unknown")
                            .to_string(),
                    ),
                    Cell::from(state.assignee_label(bug.assignee).to_string()),
                ])
            })
            .collect();

        let tab_label = self.tab.map_or("All", Status::label);
        let severity_label = self.filter.severity.map_or("All", Severity::label);
        let search = if self.search_mode {
            format!(" /{}_", self.filter.search)
        } else if self.filter.search.is_empty() {
            String::new()
        } else {
            format!(" /{}", self.filter.search)
        };
        let title = format!(" Bugs [{tab_label}] sev:{severity_label}{search} ");

        let table = Table::new(
            rows,
            [
                Constraint::Percentage(40),
                Constraint::Percentage(13),
                Constraint::Percentage(12),
                Constraint::Percentage(20),
                Constraint::Percentage(15),
            ],
        )
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("► ");

        if bugs.is_empty() {
            let empty = Paragraph::new("No bugs found matching your filters")
                .block(Block::default().borders(Borders::ALL).title(" Bugs "));
            frame.render_widget(empty, area);
        } else {
            frame.render_stateful_widget(table, area, &mut self.table);
        }
    }

    fn render_summary(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let counts = derive::status_counts(state.bugs.as_slice());
        let total = state.bugs.len();

        let mut lines: Vec<Line> = vec![Line::from(Span::styled(
            "Current status of bugs",
            Style::default().fg(Color::Gray),
        ))];
        for (status, count) in counts {
            #[allow(clippy::cast_precision_loss)]
            let share = if total == 0 {
                0.0
            } else {
                count as f64 / total as f64
            };
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let filled = (share * 12.0).round() as usize;
            lines.push(Line::from(vec![
                Span::raw(format!("{:<12} {:>2} ", status.label(), count)),
                Span::styled("█".repeat(filled), Style::default().fg(Color::Cyan)),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "j/k move  / search  t tab  s severity  n new",
            Style::default().fg(Color::DarkGray),
        )));

        let summary = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(" Bug Summary "));
        frame.render_widget(summary, area);
    }
}

fn next_tab(current: Option<Status>) -> Option<Status> {
    match current {
        None => Some(Status::New),
        Some(Status::New) => Some(Status::InProgress),
        Some(Status::InProgress) => Some(Status::Testing),
        Some(Status::Testing) => Some(Status::Resolved),
        Some(Status::Resolved) => Some(Status::Closed),
        Some(Status::Closed) => None,
    }
}

fn next_severity(current: Option<Severity>) -> Option<Severity> {
    match current {
        None => Some(Severity::Low),
        Some(Severity::Low) => Some(Severity::Medium),
        Some(Severity::Medium) => Some(Severity::High),
        Some(Severity::High) => Some(Severity::Critical),
        Some(Severity::Critical) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{next_severity, next_tab, BugsAction, BugsView};
    use crossterm::event::{KeyCode, KeyEvent};
    use ladybug_core::config::ProjectConfig;
    use ladybug_core::model::bug::{Severity, Status};
    use ladybug_core::seed;

    fn view() -> BugsView {
        BugsView::new(&ProjectConfig::default())
    }

    fn type_text(view: &mut BugsView, state: &mut ladybug_core::state::AppState, text: &str) {
        for c in text.chars() {
            view.handle_key(KeyEvent::from(KeyCode::Char(c)), state);
        }
    }

    #[test]
    fn search_mode_builds_the_filter() {
        let mut state = seed::sample();
        let mut view = view();

        view.handle_key(KeyEvent::from(KeyCode::Char('/')), &mut state);
        type_text(&mut view, &mut state, "login");
        view.handle_key(KeyEvent::from(KeyCode::Enter), &mut state);

        let bugs = view.visible_bugs(&state);
        assert_eq!(bugs.len(), 1);
        assert_eq!(bugs[0].title, "Login Authentication Bypass");
    }

    #[test]
    fn tab_and_severity_cycles_wrap() {
        assert_eq!(next_tab(None), Some(Status::New));
        assert_eq!(next_tab(Some(Status::Closed)), None);
        assert_eq!(next_severity(None), Some(Severity::Low));
        assert_eq!(next_severity(Some(Severity::Critical)), None);
    }

    #[test]
    fn new_bug_dialog_commits_into_the_store() {
        let mut state = seed::sample();
        let bugs_before = state.bugs.len();
        let mut view = view();

        view.handle_key(KeyEvent::from(KeyCode::Char('n')), &mut state);
        assert!(view.dialog_open());

        type_text(&mut view, &mut state, "Broken pagination");
        view.handle_key(KeyEvent::from(KeyCode::Tab), &mut state);
        type_text(&mut view, &mut state, "Page two renders page one");

        let action = view.handle_key(KeyEvent::from(KeyCode::Enter), &mut state);
        assert!(matches!(action, Some(BugsAction::Notice(_))));
        assert!(!view.dialog_open());
        assert_eq!(state.bugs.len(), bugs_before + 1);

        let created = state.bugs.iter().last().unwrap();
        assert_eq!(created.title, "Broken pagination");
        assert_eq!(created.severity, Severity::Medium);
        assert!(created.assignee.is_none());
    }

    #[test]
    fn empty_dialog_submission_stays_open_with_error() {
        let mut state = seed::sample();
        let bugs_before = state.bugs.len();
        let mut view = view();

        view.handle_key(KeyEvent::from(KeyCode::Char('n')), &mut state);
        let action = view.handle_key(KeyEvent::from(KeyCode::Enter), &mut state);
        assert!(action.is_none());
        assert!(view.dialog_open());
        assert_eq!(state.bugs.len(), bugs_before);
    }

    #[test]
    fn dialog_cancel_discards_the_draft() {
        let mut state = seed::sample();
        let bugs_before = state.bugs.len();
        let mut view = view();

        view.handle_key(KeyEvent::from(KeyCode::Char('n')), &mut state);
        type_text(&mut view, &mut state, "Half-typed title");
        view.handle_key(KeyEvent::from(KeyCode::Esc), &mut state);

        assert!(!view.dialog_open());
        assert_eq!(state.bugs.len(), bugs_before);
    }
}
