//! Shared overlay dialog for create/edit forms.
//!
//! A dialog is a stack of labeled fields — free text or a cycling select —
//! with one focused at a time. The dialog itself is purely presentational:
//! pages copy its values into a `FormSession` draft on submit, and feed
//! commit-time validation failures back via [`FormDialog::set_error`].
//!
//! Keys: **Tab**/**Down** next field, **Shift-Tab**/**Up** previous,
//! **Left**/**Right** cycle a select, **Enter** submit, **Esc** cancel.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// What a field edits.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Free text, edited a character at a time.
    Text,
    /// One of a fixed set of options, cycled with Left/Right.
    Select(Vec<String>),
}

/// One labeled input row.
#[derive(Debug, Clone)]
pub struct Field {
    pub label: &'static str,
    pub kind: FieldKind,
    /// Current text (Text fields only).
    pub value: String,
    /// Current option index (Select fields only).
    pub choice: usize,
}

impl Field {
    pub fn text(label: &'static str) -> Self {
        Self {
            label,
            kind: FieldKind::Text,
            value: String::new(),
            choice: 0,
        }
    }

    pub fn text_with(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            kind: FieldKind::Text,
            value: value.into(),
            choice: 0,
        }
    }

    pub fn select(label: &'static str, options: Vec<String>, choice: usize) -> Self {
        Self {
            label,
            kind: FieldKind::Select(options),
            value: String::new(),
            choice,
        }
    }

    /// The selected option of a Select field, or the text value.
    pub fn selected(&self) -> &str {
        match &self.kind {
            FieldKind::Text => &self.value,
            FieldKind::Select(options) => options
                .get(self.choice)
                .map_or("", String::as_str),
        }
    }
}

/// The action the dialog wants the caller to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOutcome {
    /// The user pressed Enter; read the fields and try to commit.
    Submit,
    /// The user cancelled; close the overlay, no store mutation.
    Cancel,
}

/// Overlay dialog state.
#[derive(Debug, Clone)]
pub struct FormDialog {
    title: &'static str,
    pub fields: Vec<Field>,
    focused: usize,
    error: Option<String>,
}

impl FormDialog {
    pub fn new(title: &'static str, fields: Vec<Field>) -> Self {
        Self {
            title,
            fields,
            focused: 0,
            error: None,
        }
    }

    /// Surface a commit-time validation failure; the dialog stays open.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// The current validation error (for external read-back).
    #[cfg(test)]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Convenience accessor for a field's effective value by index.
    pub fn value(&self, index: usize) -> &str {
        self.fields.get(index).map_or("", Field::selected)
    }

    /// A Select field's option index.
    pub fn choice(&self, index: usize) -> usize {
        self.fields.get(index).map_or(0, |f| f.choice)
    }

    /// Feed a key event to the dialog. Returns `Some` when the dialog is
    /// complete and the caller should act on the outcome.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<DialogOutcome> {
        match key.code {
            KeyCode::Esc => Some(DialogOutcome::Cancel),
            KeyCode::Enter => Some(DialogOutcome::Submit),
            KeyCode::Tab | KeyCode::Down => {
                self.focus_next();
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus_prev();
                None
            }
            KeyCode::Left => {
                self.cycle(-1);
                None
            }
            KeyCode::Right => {
                self.cycle(1);
                None
            }
            KeyCode::Backspace => {
                if let Some(field) = self.fields.get_mut(self.focused) {
                    if matches!(field.kind, FieldKind::Text) {
                        field.value.pop();
                        self.error = None;
                    }
                }
                None
            }
            KeyCode::Char(c) => {
                if let Some(field) = self.fields.get_mut(self.focused) {
                    if matches!(field.kind, FieldKind::Text) {
                        field.value.push(c);
                        self.error = None;
                    }
                }
                None
            }
            _ => None,
        }
    }

    fn focus_next(&mut self) {
        if self.fields.is_empty() {
            return;
        }
        self.focused = (self.focused + 1) % self.fields.len();
    }

    fn focus_prev(&mut self) {
        if self.fields.is_empty() {
            return;
        }
        self.focused = if self.focused == 0 {
            self.fields.len() - 1
        } else {
            self.focused - 1
        };
    }

    fn cycle(&mut self, step: isize) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            if let FieldKind::Select(options) = &field.kind {
                if options.is_empty() {
                    return;
                }
                let len = options.len() as isize;
                let next = (field.choice as isize + step).rem_euclid(len);
                #[allow(clippy::cast_sign_loss)]
                {
                    field.choice = next as usize;
                }
                self.error = None;
            }
        }
    }

    /// Render the dialog as a centered overlay on top of `area`.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let dialog_w: u16 = 64.min(area.width.saturating_sub(4));
        #[allow(clippy::cast_possible_truncation)]
        let dialog_h: u16 = (self.fields.len() as u16 + 4).min(area.height.saturating_sub(2));

        let x = area.x + area.width.saturating_sub(dialog_w) / 2;
        let y = area.y + area.height.saturating_sub(dialog_h) / 2;
        let dialog_area = Rect {
            x,
            y,
            width: dialog_w,
            height: dialog_h,
        };

        frame.render_widget(Clear, dialog_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", self.title))
            .title_style(
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )
            .style(Style::default().bg(Color::Black));
        frame.render_widget(block, dialog_area);

        let mut lines: Vec<Line> = self
            .fields
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let focused = i == self.focused;
                let label_style = if focused {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                };
                let rendered = match &field.kind {
                    FieldKind::Text => {
                        if focused {
                            format!("{}_", field.value)
                        } else {
                            field.value.clone()
                        }
                    }
                    FieldKind::Select(_) => format!("< {} >", field.selected()),
                };
                Line::from(vec![
                    Span::styled(format!("{:<13}", format!("{}:", field.label)), label_style),
                    Span::raw(rendered),
                ])
            })
            .collect();

        if let Some(error) = &self.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter submit  Esc cancel  Tab next field",
                Style::default().fg(Color::DarkGray),
            )));
        }

        let inner = Rect {
            x: dialog_area.x + 2,
            y: dialog_area.y + 1,
            width: dialog_area.width.saturating_sub(4),
            height: dialog_area.height.saturating_sub(2),
        };
        frame.render_widget(Paragraph::new(lines), inner);
    }
}
