use crossterm::event::{KeyCode, KeyEvent};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::format::{label, short_date};
use crate::models::Profile;
use crate::ui::components::popup::render_confirm;

// Account picker; choosing a profile signs in as that account
pub struct ProfilesState {
    profiles: Vec<Profile>,
    list_state: ListState,
    show_delete_confirmation: bool,
}

impl ProfilesState {
    pub fn new(profiles: Vec<Profile>) -> Self {
        let mut list_state = ListState::default();
        if !profiles.is_empty() {
            list_state.select(Some(0));
        }

        Self {
            profiles,
            list_state,
            show_delete_confirmation: false,
        }
    }

    pub fn next(&mut self) {
        if self.profiles.is_empty() {
            return;
        }

        let i = match self.list_state.selected() {
            Some(i) if i + 1 < self.profiles.len() => i + 1,
            _ => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.profiles.is_empty() {
            return;
        }

        let i = match self.list_state.selected() {
            Some(0) | None => self.profiles.len() - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    pub fn toggle_delete_confirmation(&mut self) {
        self.show_delete_confirmation = !self.show_delete_confirmation;
    }

    pub fn selected_profile(&self) -> Option<&Profile> {
        self.list_state.selected().and_then(|i| self.profiles.get(i))
    }

    pub fn selected_profile_id(&self) -> Option<i32> {
        self.selected_profile().map(|p| p.id)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ProfileAction {
    Exit,
    NewProfile,
    DeleteProfile(i32),
    SelectProfile(i32),
    EditProfile(i32),
}

pub fn render_profiles<B: Backend>(frame: &mut Frame<B>, state: &mut ProfilesState) {
    let size = frame.size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1), Constraint::Length(3)].as_ref())
        .split(size);

    let title = Paragraph::new("Freelance Manager | Sign in")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    let items: Vec<ListItem> = state
        .profiles
        .iter()
        .map(|profile| {
            ListItem::new(Spans::from(vec![
                Span::styled(profile.full_name.as_str(), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw("  "),
                Span::styled(profile.email.as_str(), Style::default().fg(Color::Gray)),
                Span::styled(
                    format!(
                        "  {} theme, updated {}",
                        label(Some(profile.theme_preference.as_str())),
                        short_date(&profile.updated_at)
                    ),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let profiles_list = List::new(items)
        .block(Block::default().title("Accounts").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(profiles_list, chunks[1], &mut state.list_state);

    let buttons_text = if state.selected_profile().is_some() {
        "<N> New Account | <E> Edit | <D> Delete | <Enter> Sign in | <Esc> Exit"
    } else {
        "<N> New Account | <Esc> Exit"
    };

    let buttons = Paragraph::new(buttons_text)
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));

    frame.render_widget(buttons, chunks[2]);

    if state.show_delete_confirmation {
        render_confirm(
            frame,
            "Confirm Delete",
            &[
                "Are you sure you want to delete this account?",
                "All of its projects, phases and payments will also be deleted.",
            ],
        );
    }
}

pub fn handle_input(state: &mut ProfilesState, key: KeyEvent) -> Option<ProfileAction> {
    if state.show_delete_confirmation {
        match key.code {
            KeyCode::Char('y') => {
                state.toggle_delete_confirmation();
                return state.selected_profile_id().map(ProfileAction::DeleteProfile);
            }
            KeyCode::Char('n') | KeyCode::Esc => state.toggle_delete_confirmation(),
            _ => {}
        }
        return None;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Some(ProfileAction::Exit),
        KeyCode::Char('n') => return Some(ProfileAction::NewProfile),
        KeyCode::Char('e') => return state.selected_profile_id().map(ProfileAction::EditProfile),
        KeyCode::Char('d') => {
            if state.selected_profile().is_some() {
                state.toggle_delete_confirmation();
            }
        }
        KeyCode::Down => state.next(),
        KeyCode::Up => state.previous(),
        KeyCode::Enter => return state.selected_profile_id().map(ProfileAction::SelectProfile),
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::components::form::tests::key;

    fn profile(id: i32, name: &str) -> Profile {
        let mut profile = Profile::draft();
        profile.id = id;
        profile.full_name = name.to_string();
        profile
    }

    #[test]
    fn navigation_wraps_around() {
        let mut state = ProfilesState::new(vec![profile(1, "Asha"), profile(2, "Ravi")]);
        state.previous();
        assert_eq!(state.selected_profile_id(), Some(2));
        state.next();
        assert_eq!(state.selected_profile_id(), Some(1));
    }

    #[test]
    fn delete_needs_confirmation() {
        let mut state = ProfilesState::new(vec![profile(7, "Asha")]);
        assert_eq!(handle_input(&mut state, key(KeyCode::Char('d'))), None);
        assert_eq!(
            handle_input(&mut state, key(KeyCode::Char('y'))),
            Some(ProfileAction::DeleteProfile(7))
        );
    }

    #[test]
    fn enter_signs_in_as_selected_profile() {
        let mut state = ProfilesState::new(vec![profile(3, "Asha")]);
        assert_eq!(
            handle_input(&mut state, key(KeyCode::Enter)),
            Some(ProfileAction::SelectProfile(3))
        );
        let mut empty = ProfilesState::new(vec![]);
        assert_eq!(handle_input(&mut empty, key(KeyCode::Enter)), None);
    }
}
