//! TUI Teams & Buckets page.
//!
//! Two tabs: team rosters and bug buckets. Keys: Tab switch tabs, j/k
//! select, n new team/bucket, m add member to the selected team.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use ladybug_core::form::{BucketDraft, FormSession, MemberDraft, TeamDraft};
use ladybug_core::state::AppState;

use super::dialog::{DialogOutcome, Field, FormDialog};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Teams,
    Buckets,
}

#[derive(Debug, Clone, Copy)]
enum OpenDialog {
    Team,
    Member,
    Bucket,
}

pub enum TeamsAction {
    Notice(String),
}

pub struct TeamsView {
    tab: Tab,
    list: ListState,
    team_session: FormSession<TeamDraft>,
    member_session: FormSession<MemberDraft>,
    bucket_session: FormSession<BucketDraft>,
    dialog: Option<(OpenDialog, FormDialog)>,
}

impl TeamsView {
    pub fn new() -> Self {
        let mut list = ListState::default();
        list.select(Some(0));
        Self {
            tab: Tab::Teams,
            list,
            team_session: FormSession::new(),
            member_session: FormSession::new(),
            bucket_session: FormSession::new(),
            dialog: None,
        }
    }

    pub fn dialog_open(&self) -> bool {
        self.dialog.is_some()
    }

    fn row_count(&self, state: &AppState) -> usize {
        match self.tab {
            Tab::Teams => state.teams.len(),
            Tab::Buckets => state.buckets.len(),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, state: &mut AppState) -> Option<TeamsAction> {
        if self.dialog.is_some() {
            return self.handle_dialog_key(key, state);
        }

        match key.code {
            KeyCode::Tab => {
                self.tab = match self.tab {
                    Tab::Teams => Tab::Buckets,
                    Tab::Buckets => Tab::Teams,
                };
                self.list.select(Some(0));
            }
            KeyCode::Char('j') | KeyCode::Down => self.select_step(state, 1),
            KeyCode::Char('k') | KeyCode::Up => self.select_step(state, -1),
            KeyCode::Char('n') => match self.tab {
                Tab::Teams => self.open_team_dialog(),
                Tab::Buckets => self.open_bucket_dialog(),
            },
            KeyCode::Char('m') => {
                if self.tab == Tab::Teams {
                    self.open_member_dialog(state);
                }
            }
            _ => {}
        }
        None
    }

    fn select_step(&mut self, state: &AppState, step: isize) {
        let len = self.row_count(state);
        if len == 0 {
            return;
        }
        let current = self.list.selected().unwrap_or(0) as isize;
        #[allow(clippy::cast_sign_loss)]
        let next = (current + step).rem_euclid(len as isize) as usize;
        self.list.select(Some(next));
    }

    fn open_team_dialog(&mut self) {
        self.team_session.open(TeamDraft::default());
        self.dialog = Some((
            OpenDialog::Team,
            FormDialog::new(
                "Create New Team",
                vec![Field::text("Team Name"), Field::text("Description")],
            ),
        ));
    }

    fn open_member_dialog(&mut self, state: &AppState) {
        let Some(team) = self
            .list
            .selected()
            .and_then(|i| state.teams.iter().nth(i))
        else {
            return;
        };
        self.member_session.open(MemberDraft {
            team: Some(team.id),
            ..MemberDraft::default()
        });
        self.dialog = Some((
            OpenDialog::Member,
            FormDialog::new(
                "Add Team Member",
                vec![Field::text("Name"), Field::text("Designation")],
            ),
        ));
    }

    fn open_bucket_dialog(&mut self) {
        self.bucket_session.open(BucketDraft::default());
        self.dialog = Some((
            OpenDialog::Bucket,
            FormDialog::new(
                "Create New Bucket",
                vec![
                    Field::text("Bucket Name"),
                    Field::text("Description"),
                    // Comma-separated team names; resolved on submit.
                    Field::text("Teams"),
                ],
            ),
        ));
    }

    fn handle_dialog_key(&mut self, key: KeyEvent, state: &mut AppState) -> Option<TeamsAction> {
        let outcome = self.dialog.as_mut().map(|(_, d)| d.handle_key(key))??;
        match outcome {
            DialogOutcome::Cancel => {
                self.team_session.cancel();
                self.member_session.cancel();
                self.bucket_session.cancel();
                self.dialog = None;
                None
            }
            DialogOutcome::Submit => self.submit_dialog(state),
        }
    }

    fn submit_dialog(&mut self, state: &mut AppState) -> Option<TeamsAction> {
        let kind = match &self.dialog {
            Some((kind, _)) => *kind,
            None => return None,
        };
        match kind {
            OpenDialog::Team => self.submit_team(state),
            OpenDialog::Member => self.submit_member(state),
            OpenDialog::Bucket => self.submit_bucket(state),
        }
    }

    fn submit_team(&mut self, state: &mut AppState) -> Option<TeamsAction> {
        let (name, description) = {
            let (_, dialog) = self.dialog.as_ref()?;
            (dialog.value(0).to_string(), dialog.value(1).to_string())
        };
        if let Some(draft) = self.team_session.draft_mut() {
            draft.name = name;
            draft.description = description;
        }
        match self.team_session.commit() {
            Ok(draft) => match state.teams.create(draft.into_team()) {
                Ok(team) => {
                    let notice = format!("Team {} created: {}", team.id, team.name);
                    self.dialog = None;
                    Some(TeamsAction::Notice(notice))
                }
                Err(err) => {
                    self.dialog_error(err.to_string());
                    None
                }
            },
            Err(err) => {
                self.dialog_error(err.to_string());
                None
            }
        }
    }

    fn submit_member(&mut self, state: &mut AppState) -> Option<TeamsAction> {
        let (name, designation) = {
            let (_, dialog) = self.dialog.as_ref()?;
            (dialog.value(0).to_string(), dialog.value(1).to_string())
        };
        if let Some(draft) = self.member_session.draft_mut() {
            draft.name = name;
            draft.designation = designation;
        }
        match self.member_session.commit() {
            Ok(draft) => match state.add_member(draft) {
                Ok(id) => {
                    let notice = format!("Member {id} added");
                    self.dialog = None;
                    Some(TeamsAction::Notice(notice))
                }
                Err(err) => {
                    self.dialog_error(err.to_string());
                    None
                }
            },
            Err(err) => {
                self.dialog_error(err.to_string());
                None
            }
        }
    }

    fn submit_bucket(&mut self, state: &mut AppState) -> Option<TeamsAction> {
        let (name, description, teams_raw) = {
            let (_, dialog) = self.dialog.as_ref()?;
            (
                dialog.value(0).to_string(),
                dialog.value(1).to_string(),
                dialog.value(2).to_string(),
            )
        };

        // Resolve comma-separated team names case-insensitively.
        let mut teams = Vec::new();
        for raw in teams_raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match state
                .teams
                .iter()
                .find(|t| t.name.eq_ignore_ascii_case(raw))
            {
                Some(team) => teams.push(team.id),
                None => {
                    self.dialog_error(format!("unknown team: '{raw}'"));
                    return None;
                }
            }
        }

        if let Some(draft) = self.bucket_session.draft_mut() {
            draft.name = name;
            draft.description = description;
            draft.teams = teams;
        }
        match self.bucket_session.commit() {
            Ok(draft) => match state.buckets.create(draft.into_bucket()) {
                Ok(bucket) => {
                    let notice = format!("Bucket {} created: {}", bucket.id, bucket.name);
                    self.dialog = None;
                    Some(TeamsAction::Notice(notice))
                }
                Err(err) => {
                    self.dialog_error(err.to_string());
                    None
                }
            },
            Err(err) => {
                self.dialog_error(err.to_string());
                None
            }
        }
    }

    fn dialog_error(&mut self, message: String) {
        if let Some((_, dialog)) = self.dialog.as_mut() {
            dialog.set_error(message);
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        match self.tab {
            Tab::Teams => self.render_teams(frame, area, state),
            Tab::Buckets => self.render_buckets(frame, area, state),
        }
        if let Some((_, dialog)) = &self.dialog {
            dialog.render(frame, area);
        }
    }

    fn render_teams(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let items: Vec<ListItem> = state
            .teams
            .iter()
            .map(|team| {
                let mut lines = vec![Line::from(vec![
                    Span::styled(
                        team.name.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("  {}", team.description),
                        Style::default().fg(Color::Gray),
                    ),
                ])];
                if team.members.is_empty() {
                    lines.push(Line::from(Span::styled(
                        "    No members yet. Add some with m.",
                        Style::default().fg(Color::DarkGray),
                    )));
                }
                for member in &team.members {
                    lines.push(Line::from(format!(
                        "    {} ({})",
                        member.name, member.designation
                    )));
                }
                ListItem::new(lines)
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Teams | buckets (Tab)  n new team  m add member "),
            )
            .highlight_style(Style::default().bg(Color::DarkGray));
        frame.render_stateful_widget(list, area, &mut self.list);
    }

    fn render_buckets(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let items: Vec<ListItem> = state
            .buckets
            .iter()
            .map(|bucket| {
                let teams: Vec<String> = bucket
                    .teams
                    .iter()
                    .map(|&id| state.team_name(id).unwrap_or("unknown").to_string())
                    .collect();
                let lines = vec![
                    Line::from(Span::styled(
                        bucket.name.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        format!("    {}", bucket.description),
                        Style::default().fg(Color::Gray),
                    )),
                    Line::from(format!("    Assigned: {}", teams.join(", "))),
                ];
                ListItem::new(lines)
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Buckets | teams (Tab)  n new bucket "),
            )
            .highlight_style(Style::default().bg(Color::DarkGray));
        frame.render_stateful_widget(list, area, &mut self.list);
    }
}

impl Default for TeamsView {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{TeamsAction, TeamsView};
    use crossterm::event::{KeyCode, KeyEvent};
    use ladybug_core::seed;

    fn type_text(view: &mut TeamsView, state: &mut ladybug_core::state::AppState, text: &str) {
        for c in text.chars() {
            view.handle_key(KeyEvent::from(KeyCode::Char(c)), state);
        }
    }

    #[test]
    fn new_team_dialog_commits() {
        let mut state = seed::sample();
        let mut view = TeamsView::new();

        view.handle_key(KeyEvent::from(KeyCode::Char('n')), &mut state);
        assert!(view.dialog_open());
        type_text(&mut view, &mut state, "Platform Team");

        let action = view.handle_key(KeyEvent::from(KeyCode::Enter), &mut state);
        assert!(matches!(action, Some(TeamsAction::Notice(_))));
        assert_eq!(state.teams.len(), 3);
    }

    #[test]
    fn add_member_targets_the_selected_team() {
        let mut state = seed::sample();
        let mut view = TeamsView::new();

        // Move selection to the second team (Tech Team).
        view.handle_key(KeyEvent::from(KeyCode::Char('j')), &mut state);
        view.handle_key(KeyEvent::from(KeyCode::Char('m')), &mut state);
        type_text(&mut view, &mut state, "Riley Chen");
        view.handle_key(KeyEvent::from(KeyCode::Tab), &mut state);
        type_text(&mut view, &mut state, "SRE");

        let action = view.handle_key(KeyEvent::from(KeyCode::Enter), &mut state);
        assert!(matches!(action, Some(TeamsAction::Notice(_))));
        let tech = state.teams.iter().nth(1).unwrap();
        assert!(tech.members.iter().any(|m| m.name == "Riley Chen"));
    }

    #[test]
    fn bucket_dialog_resolves_team_names() {
        let mut state = seed::sample();
        let mut view = TeamsView::new();

        // Switch to the buckets tab and open the dialog.
        view.handle_key(KeyEvent::from(KeyCode::Tab), &mut state);
        view.handle_key(KeyEvent::from(KeyCode::Char('n')), &mut state);
        type_text(&mut view, &mut state, "Documentation");
        view.handle_key(KeyEvent::from(KeyCode::Tab), &mut state);
        type_text(&mut view, &mut state, "Docs and examples");
        view.handle_key(KeyEvent::from(KeyCode::Tab), &mut state);
        type_text(&mut view, &mut state, "qa team, Tech Team");

        let action = view.handle_key(KeyEvent::from(KeyCode::Enter), &mut state);
        assert!(matches!(action, Some(TeamsAction::Notice(_))));
        let bucket = state.buckets.iter().last().unwrap();
        assert_eq!(bucket.name, "Documentation");
        assert_eq!(bucket.teams.len(), 2);
    }

    #[test]
    fn bucket_dialog_rejects_unknown_team() {
        let mut state = seed::sample();
        let buckets_before = state.buckets.len();
        let mut view = TeamsView::new();

        view.handle_key(KeyEvent::from(KeyCode::Tab), &mut state);
        view.handle_key(KeyEvent::from(KeyCode::Char('n')), &mut state);
        type_text(&mut view, &mut state, "Documentation");
        view.handle_key(KeyEvent::from(KeyCode::Tab), &mut state);
        view.handle_key(KeyEvent::from(KeyCode::Tab), &mut state);
        type_text(&mut view, &mut state, "No Such Team");

        let action = view.handle_key(KeyEvent::from(KeyCode::Enter), &mut state);
        assert!(action.is_none());
        assert!(view.dialog_open());
        assert_eq!(state.buckets.len(), buckets_before);
    }
}
