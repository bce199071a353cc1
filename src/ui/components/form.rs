//! Field-by-field editing shared by the wizards.
//!
//! Up/Down moves between fields, Enter starts and stops editing, `s` saves
//! and Esc cancels.

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use super::date_input::DateInputState;
use crate::format::label;

#[derive(Debug, Clone)]
pub enum FieldKind {
    Text,
    /// Rendered as asterisks
    Secret,
    /// Non-negative decimal amount
    Number,
    /// One of a fixed list of stored values
    Choice(Vec<String>),
    Date(DateInputState),
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
    pub kind: FieldKind,
    pub required: bool,
}

impl FormField {
    pub fn text(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            kind: FieldKind::Text,
            required: false,
        }
    }

    pub fn secret(label: &'static str) -> Self {
        Self {
            kind: FieldKind::Secret,
            ..Self::text(label)
        }
    }

    pub fn number(label: &'static str) -> Self {
        Self {
            kind: FieldKind::Number,
            ..Self::text(label)
        }
    }

    /// The first option is selected unless `value` names another
    pub fn choice(label: &'static str, options: &[&str], value: &str) -> Self {
        let options: Vec<String> = options.iter().map(|o| o.to_string()).collect();
        let value = if options.iter().any(|o| o == value) {
            value.to_string()
        } else {
            options.first().cloned().unwrap_or_default()
        };
        Self {
            label,
            value,
            kind: FieldKind::Choice(options),
            required: false,
        }
    }

    pub fn date(label: &'static str, date: NaiveDate) -> Self {
        Self {
            label,
            value: date.format("%Y-%m-%d").to_string(),
            kind: FieldKind::Date(DateInputState::new(date)),
            required: true,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    fn display(&self, editing: bool) -> String {
        match &self.kind {
            FieldKind::Secret => "*".repeat(self.value.chars().count()),
            FieldKind::Choice(_) if editing => format!("< {} >", label(Some(&self.value))),
            FieldKind::Choice(_) => label(Some(&self.value)),
            FieldKind::Date(state) => state.get_display_string(),
            _ if editing => format!("{}|", self.value),
            _ => self.value.clone(),
        }
    }

    fn cycle(&mut self, forward: bool) {
        let FieldKind::Choice(options) = &self.kind else {
            return;
        };
        if options.is_empty() {
            return;
        }
        let current = options.iter().position(|o| *o == self.value).unwrap_or(0);
        let next = if forward {
            (current + 1) % options.len()
        } else {
            (current + options.len() - 1) % options.len()
        };
        self.value = options[next].clone();
    }

    fn edit(&mut self, key: KeyCode) {
        if matches!(self.kind, FieldKind::Choice(_)) {
            match key {
                KeyCode::Right | KeyCode::Char(' ') => self.cycle(true),
                KeyCode::Left => self.cycle(false),
                _ => {}
            }
            return;
        }

        match &mut self.kind {
            FieldKind::Choice(_) => {}
            FieldKind::Date(state) => {
                state.handle_input(key);
                self.value = state.date.format("%Y-%m-%d").to_string();
            }
            FieldKind::Number => match key {
                KeyCode::Char(c) if c.is_ascii_digit() => self.value.push(c),
                KeyCode::Char('.') if !self.value.contains('.') => self.value.push('.'),
                KeyCode::Backspace => {
                    self.value.pop();
                }
                _ => {}
            },
            FieldKind::Text | FieldKind::Secret => match key {
                KeyCode::Char(c) => self.value.push(c),
                KeyCode::Backspace => {
                    self.value.pop();
                }
                _ => {}
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    Save,
    Cancel,
}

#[derive(Debug, Clone)]
pub struct FormState {
    pub title: String,
    pub fields: Vec<FormField>,
    pub current: usize,
    pub editing: bool,
    pub error: Option<String>,
}

impl FormState {
    pub fn new(title: impl Into<String>, fields: Vec<FormField>) -> Self {
        Self {
            title: title.into(),
            fields,
            current: 0,
            editing: false,
            error: None,
        }
    }

    fn field(&self, label: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.label == label)
    }

    /// Trimmed value of a field, empty when the label is unknown
    pub fn value(&self, label: &str) -> &str {
        self.field(label).map(|f| f.value.trim()).unwrap_or("")
    }

    /// `None` for blank fields
    pub fn optional(&self, label: &str) -> Option<String> {
        Some(self.value(label)).filter(|v| !v.is_empty()).map(str::to_string)
    }

    pub fn amount(&self, label: &str) -> Option<f64> {
        self.value(label).parse().ok()
    }

    pub fn date(&self, label: &str) -> Option<NaiveDate> {
        match self.field(label).map(|f| &f.kind) {
            Some(FieldKind::Date(state)) => Some(state.date),
            _ => None,
        }
    }

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.current = (self.current + 1) % self.fields.len();
        }
    }

    pub fn previous_field(&mut self) {
        if !self.fields.is_empty() {
            self.current = (self.current + self.fields.len() - 1) % self.fields.len();
        }
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
        if let Some(FieldKind::Date(state)) = self.fields.get_mut(self.current).map(|f| &mut f.kind) {
            if state.editing != self.editing {
                state.toggle_editing();
            }
        }
    }

    /// Checks required fields and amounts; the first problem is kept in `error`
    pub fn validate(&mut self) -> bool {
        self.error = self.fields.iter().find_map(|field| {
            let value = field.value.trim();
            if field.required && value.is_empty() {
                return Some(format!("{} is required", field.label));
            }
            if matches!(field.kind, FieldKind::Number) && !value.is_empty() {
                match value.parse::<f64>() {
                    Ok(amount) if amount > 0.0 => {}
                    _ => return Some(format!("{} must be a positive amount", field.label)),
                }
            }
            None
        });
        self.error.is_none()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<FormEvent> {
        match key.code {
            KeyCode::Esc => {
                if self.editing {
                    self.toggle_editing();
                } else {
                    return Some(FormEvent::Cancel);
                }
            }
            KeyCode::Enter => self.toggle_editing(),
            KeyCode::Up if !self.editing => self.previous_field(),
            KeyCode::Down | KeyCode::Tab if !self.editing => self.next_field(),
            KeyCode::Char('s') if !self.editing => {
                if self.validate() {
                    return Some(FormEvent::Save);
                }
            }
            code if self.editing => {
                if let Some(field) = self.fields.get_mut(self.current) {
                    field.edit(code);
                }
            }
            _ => {}
        }
        None
    }
}

pub fn render_form<B: Backend>(f: &mut Frame<B>, area: Rect, state: &FormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(3)].as_ref())
        .split(area);

    let title = Paragraph::new(state.title.as_str())
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let items: Vec<ListItem> = state
        .fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let selected = i == state.current;
            let editing = selected && state.editing;
            let name = if field.required {
                format!("{} *: ", field.label)
            } else {
                format!("{}: ", field.label)
            };
            let name_style = if selected {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            let value_style = if editing {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            ListItem::new(Spans::from(vec![
                Span::styled(name, name_style),
                Span::styled(field.display(editing), value_style),
            ]))
        })
        .collect();

    let form = List::new(items).block(Block::default().borders(Borders::ALL).title("Details"));
    f.render_widget(form, chunks[1]);

    let help = match (&state.error, state.editing) {
        (Some(error), _) => Span::styled(error.as_str(), Style::default().fg(Color::Red)),
        (None, true) => match state.fields.get(state.current).map(|f| &f.kind) {
            Some(FieldKind::Choice(_)) => Span::raw("Left/Right - Change | Enter - Done | Esc - Done"),
            Some(FieldKind::Date(_)) => {
                Span::raw("Digits - Type | Left/Right - Switch date part | Enter - Done")
            }
            _ => Span::raw("Enter - Save field | Esc - Stop editing"),
        },
        (None, false) => Span::raw("Enter - Edit field | Up/Down - Navigate fields | S - Save | Esc - Cancel"),
    };
    let help = Paragraph::new(Spans::from(help))
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    pub(crate) fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    pub(crate) fn type_text(form: &mut FormState, text: &str) {
        form.handle_key(key(KeyCode::Enter));
        for c in text.chars() {
            form.handle_key(key(KeyCode::Char(c)));
        }
        form.handle_key(key(KeyCode::Enter));
    }

    fn sample() -> FormState {
        FormState::new(
            "Sample",
            vec![
                FormField::text("Name").required(),
                FormField::number("Amount"),
                FormField::choice("Status", &["ongoing", "pending"], "pending"),
            ],
        )
    }

    #[test]
    fn typing_fills_the_current_field() {
        let mut form = sample();
        type_text(&mut form, "Landing page");
        assert_eq!(form.value("Name"), "Landing page");
        assert!(!form.editing);
    }

    #[test]
    fn save_requires_mandatory_fields() {
        let mut form = sample();
        assert_eq!(form.handle_key(key(KeyCode::Char('s'))), None);
        assert_eq!(form.error.as_deref(), Some("Name is required"));

        type_text(&mut form, "Site");
        assert_eq!(form.handle_key(key(KeyCode::Char('s'))), Some(FormEvent::Save));
    }

    #[test]
    fn number_fields_accept_only_amounts() {
        let mut form = sample();
        form.next_field();
        type_text(&mut form, "12a.5.0");
        assert_eq!(form.value("Amount"), "12.50");
        assert_eq!(form.amount("Amount"), Some(12.5));
    }

    #[test]
    fn zero_amount_is_rejected() {
        let mut form = sample();
        type_text(&mut form, "Site");
        form.next_field();
        type_text(&mut form, "0");
        assert!(!form.validate());
        assert_eq!(form.error.as_deref(), Some("Amount must be a positive amount"));
    }

    #[test]
    fn choice_cycles_through_options() {
        let mut form = sample();
        form.current = 2;
        assert_eq!(form.value("Status"), "pending");
        form.handle_key(key(KeyCode::Enter));
        form.handle_key(key(KeyCode::Right));
        assert_eq!(form.value("Status"), "ongoing");
        form.handle_key(key(KeyCode::Left));
        assert_eq!(form.value("Status"), "pending");
    }

    #[test]
    fn escape_stops_editing_before_cancelling() {
        let mut form = sample();
        form.handle_key(key(KeyCode::Enter));
        assert_eq!(form.handle_key(key(KeyCode::Esc)), None);
        assert_eq!(form.handle_key(key(KeyCode::Esc)), Some(FormEvent::Cancel));
    }

    #[test]
    fn date_fields_edit_through_the_date_input() {
        let mut form = FormState::new(
            "Payment",
            vec![FormField::date("Date", NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())],
        );
        type_text(&mut form, "2024");
        assert_eq!(form.date("Date"), NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(form.value("Date"), "2024-01-01");
    }
}
