//! TUI Bounties page: active bounties grouped by cadence, plus the reward
//! history tab.
//!
//! Keys: Tab switch tabs, n new bounty.

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::str::FromStr;

use ladybug_core::derive;
use ladybug_core::form::{BountyDraft, FormSession};
use ladybug_core::model::bounty::Cadence;
use ladybug_core::state::AppState;

use crate::output::percent_bar;

use super::dialog::{DialogOutcome, Field, FormDialog};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Active,
    Rewards,
}

pub enum BountiesAction {
    Notice(String),
}

pub struct BountiesView {
    tab: Tab,
    session: FormSession<BountyDraft>,
    dialog: Option<FormDialog>,
}

const F_TITLE: usize = 0;
const F_DESCRIPTION: usize = 1;
const F_DEADLINE: usize = 2;
const F_TARGET: usize = 3;
const F_REWARD: usize = 4;
const F_CADENCE: usize = 5;

impl BountiesView {
    pub fn new() -> Self {
        Self {
            tab: Tab::Active,
            session: FormSession::new(),
            dialog: None,
        }
    }

    pub fn dialog_open(&self) -> bool {
        self.dialog.is_some()
    }

    pub fn handle_key(&mut self, key: KeyEvent, state: &mut AppState) -> Option<BountiesAction> {
        if self.dialog.is_some() {
            return self.handle_dialog_key(key, state);
        }

        match key.code {
            KeyCode::Tab => {
                self.tab = match self.tab {
                    Tab::Active => Tab::Rewards,
                    Tab::Rewards => Tab::Active,
                };
            }
            KeyCode::Char('n') => self.open_dialog(),
            _ => {}
        }
        None
    }

    fn open_dialog(&mut self) {
        self.session.open(BountyDraft::default());
        let cadences: Vec<String> = Cadence::ALL.iter().map(ToString::to_string).collect();
        self.dialog = Some(FormDialog::new(
            "Create New Bounty",
            vec![
                Field::text("Title"),
                Field::text("Description"),
                Field::text_with("Deadline", "2023-04-30"),
                Field::text("Target"),
                Field::text("Reward"),
                Field::select("Type", cadences, 0),
            ],
        ));
    }

    fn handle_dialog_key(&mut self, key: KeyEvent, state: &mut AppState) -> Option<BountiesAction> {
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

    fn submit_dialog(&mut self, state: &mut AppState) -> Option<BountiesAction> {
        let (title, description, deadline_raw, target, reward, cadence) = {
            let dialog = self.dialog.as_ref()?;
            (
                dialog.value(F_TITLE).to_string(),
                dialog.value(F_DESCRIPTION).to_string(),
                dialog.value(F_DEADLINE).to_string(),
                dialog.value(F_TARGET).to_string(),
                dialog.value(F_REWARD).to_string(),
                Cadence::ALL.get(dialog.choice(F_CADENCE)).copied(),
            )
        };

        let deadline = NaiveDate::from_str(deadline_raw.trim()).ok();
        if !deadline_raw.trim().is_empty() && deadline.is_none() {
            self.dialog_error(format!("invalid deadline: '{}'", deadline_raw.trim()));
            return None;
        }

        if let Some(draft) = self.session.draft_mut() {
            draft.title = title;
            draft.description = description;
            draft.deadline = deadline;
            draft.target = target;
            draft.reward = reward;
            if let Some(cadence) = cadence {
                draft.cadence = cadence;
            }
        }

        match self.session.commit() {
            Ok(draft) => match state.bounties.create(draft.into_bounty()) {
                Ok(bounty) => {
                    let notice = format!("Bounty {} created: {}", bounty.id, bounty.title);
                    self.dialog = None;
                    Some(BountiesAction::Notice(notice))
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
        if let Some(dialog) = self.dialog.as_mut() {
            dialog.set_error(message);
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        match self.tab {
            Tab::Active => self.render_active(frame, area, state),
            Tab::Rewards => Self::render_rewards(frame, area, state),
        }
        if let Some(dialog) = &self.dialog {
            dialog.render(frame, area);
        }
    }

    fn render_active(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let mut lines: Vec<Line> = Vec::new();
        for cadence in Cadence::ALL {
            lines.push(Line::from(Span::styled(
                cadence.label(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )));
            let group: Vec<_> = state
                .bounties
                .iter()
                .filter(|b| b.cadence == cadence)
                .collect();
            if group.is_empty() {
                lines.push(Line::from(Span::styled(
                    "  No bounties found for this period.",
                    Style::default().fg(Color::DarkGray),
                )));
            }
            for bounty in group {
                lines.push(Line::from(vec![
                    Span::raw(format!("  {:<34}", bounty.title)),
                    Span::styled(
                        format!("due {}  ", bounty.deadline),
                        Style::default().fg(Color::Gray),
                    ),
                    Span::styled(
                        format!("{:>6}  ", bounty.reward),
                        Style::default().fg(Color::Green),
                    ),
                    Span::raw(format!(
                        "{}/{}  {}",
                        bounty.current,
                        bounty.target,
                        percent_bar(bounty.progress_percent(), 12)
                    )),
                ]));
            }
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            "Tab rewards  n new bounty",
            Style::default().fg(Color::DarkGray),
        )));

        let widget = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(" Active Bounties "));
        frame.render_widget(widget, area);
    }

    fn render_rewards(frame: &mut Frame, area: Rect, state: &AppState) {
        let by_month = derive::team_rewards_by_month(&state.rewards, state.teams.as_slice());
        let totals = derive::reward_totals(&state.rewards);

        let mut lines: Vec<Line> = vec![Line::from(Span::styled(
            "Team rewards by month",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))];
        for month in &by_month {
            let row: Vec<String> = month
                .totals
                .iter()
                .map(|(team, total)| format!("{team}: ${total}"))
                .collect();
            lines.push(Line::from(format!("  {:<4} {}", month.month, row.join("  "))));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Individual rewards",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        for (member, total) in &totals {
            lines.push(Line::from(format!("  {member:<18} ${total}")));
        }

        let widget = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(" Reward History "));
        frame.render_widget(widget, area);
    }
}

impl Default for BountiesView {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{BountiesAction, BountiesView};
    use crossterm::event::{KeyCode, KeyEvent};
    use ladybug_core::model::bounty::Cadence;
    use ladybug_core::seed;

    fn type_text(view: &mut BountiesView, state: &mut ladybug_core::state::AppState, text: &str) {
        for c in text.chars() {
            view.handle_key(KeyEvent::from(KeyCode::Char(c)), state);
        }
    }

    #[test]
    fn new_bounty_dialog_commits_with_cadence() {
        let mut state = seed::sample();
        let mut view = BountiesView::new();

        view.handle_key(KeyEvent::from(KeyCode::Char('n')), &mut state);
        type_text(&mut view, &mut state, "Close ten stale bugs");
        view.handle_key(KeyEvent::from(KeyCode::Tab), &mut state); // description
        view.handle_key(KeyEvent::from(KeyCode::Tab), &mut state); // deadline (prefilled)
        view.handle_key(KeyEvent::from(KeyCode::Tab), &mut state); // target
        type_text(&mut view, &mut state, "10");
        view.handle_key(KeyEvent::from(KeyCode::Tab), &mut state); // reward
        type_text(&mut view, &mut state, "120");
        view.handle_key(KeyEvent::from(KeyCode::Tab), &mut state); // cadence
        view.handle_key(KeyEvent::from(KeyCode::Right), &mut state); // weekly

        let action = view.handle_key(KeyEvent::from(KeyCode::Enter), &mut state);
        assert!(matches!(action, Some(BountiesAction::Notice(_))));

        let created = state.bounties.iter().last().unwrap();
        assert_eq!(created.title, "Close ten stale bugs");
        assert_eq!(created.cadence, Cadence::Weekly);
        assert_eq!(created.target, 10);
        assert_eq!(created.reward, "$120");
        assert_eq!(created.current, 0);
    }

    #[test]
    fn missing_target_keeps_dialog_open() {
        let mut state = seed::sample();
        let before = state.bounties.len();
        let mut view = BountiesView::new();

        view.handle_key(KeyEvent::from(KeyCode::Char('n')), &mut state);
        type_text(&mut view, &mut state, "No target bounty");
        let action = view.handle_key(KeyEvent::from(KeyCode::Enter), &mut state);

        assert!(action.is_none());
        assert!(view.dialog_open());
        assert_eq!(state.bounties.len(), before);
    }

    #[test]
    fn bad_deadline_is_surfaced_before_commit() {
        let mut state = seed::sample();
        let mut view = BountiesView::new();

        view.handle_key(KeyEvent::from(KeyCode::Char('n')), &mut state);
        // Clear the prefilled deadline and type garbage.
        view.handle_key(KeyEvent::from(KeyCode::Tab), &mut state);
        view.handle_key(KeyEvent::from(KeyCode::Tab), &mut state);
        for _ in 0..10 {
            view.handle_key(KeyEvent::from(KeyCode::Backspace), &mut state);
        }
        type_text(&mut view, &mut state, "soon");

        let action = view.handle_key(KeyEvent::from(KeyCode::Enter), &mut state);
        assert!(action.is_none());
        assert!(view.dialog_open());
    }
}
