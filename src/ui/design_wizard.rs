use crossterm::event::KeyEvent;
use tui::{backend::Backend, layout::Margin, Frame};

use crate::models::{LoginType, CUSTOM_DESIGN};
use crate::ui::components::form::{render_form, FormEvent, FormField, FormState};

const LOGIN: &str = "Login Screen";
const TITLE: &str = "Title";
const URL: &str = "Design URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignDraft {
    pub project_id: i32,
    pub login_type: String,
    pub title: String,
    pub url: String,
}

#[derive(Debug)]
pub enum DesignWizardAction {
    Cancel,
    Save(DesignDraft),
}

pub struct DesignWizardState {
    pub project_id: i32,
    pub form: FormState,
}

impl DesignWizardState {
    /// `slot` preselects the login screen the design is for; `None` starts a custom design
    pub fn new(project_id: i32, slot: Option<LoginType>) -> Self {
        let mut keys: Vec<&str> = LoginType::ALL.iter().map(|t| t.key()).collect();
        keys.push(CUSTOM_DESIGN);
        let selected = slot.map_or(CUSTOM_DESIGN, |s| s.key());
        Self {
            project_id,
            form: FormState::new(
                "Add Design",
                vec![
                    FormField::choice(LOGIN, &keys, selected),
                    FormField::text(TITLE),
                    FormField::text(URL).required(),
                ],
            ),
        }
    }

    pub fn draft(&self) -> DesignDraft {
        DesignDraft {
            project_id: self.project_id,
            login_type: self.form.value(LOGIN).to_string(),
            title: self.form.value(TITLE).to_string(),
            url: self.form.value(URL).to_string(),
        }
    }

    fn is_custom(&self) -> bool {
        self.form.value(LOGIN) == CUSTOM_DESIGN
    }
}

pub fn render_design_wizard<B: Backend>(f: &mut Frame<B>, state: &mut DesignWizardState) {
    let area = f.size().inner(&Margin {
        vertical: 2,
        horizontal: 2,
    });
    render_form(f, area, &state.form);
}

pub fn handle_input(state: &mut DesignWizardState, key: KeyEvent) -> Option<DesignWizardAction> {
    match state.form.handle_key(key)? {
        FormEvent::Cancel => Some(DesignWizardAction::Cancel),
        FormEvent::Save if state.is_custom() && state.form.value(TITLE).trim().is_empty() => {
            state.form.error = Some(format!("{} is required for a custom design", TITLE));
            None
        }
        FormEvent::Save => Some(DesignWizardAction::Save(state.draft())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::components::form::tests::{key, type_text};
    use crossterm::event::KeyCode;

    #[test]
    fn slot_preselects_login_type() {
        let mut state = DesignWizardState::new(3, Some(LoginType::Client));
        state.form.current = 2;
        type_text(&mut state.form, "https://figma.com/file/abc");

        let Some(DesignWizardAction::Save(draft)) = handle_input(&mut state, key(KeyCode::Char('s'))) else {
            panic!("expected save");
        };
        assert_eq!(draft.login_type, "client");
        assert_eq!(draft.title, "");
        assert_eq!(draft.url, "https://figma.com/file/abc");
    }

    #[test]
    fn no_free_slot_starts_a_custom_design() {
        let mut state = DesignWizardState::new(3, None);
        assert_eq!(state.form.value(LOGIN), CUSTOM_DESIGN);
        state.form.current = 1;
        type_text(&mut state.form, "Onboarding flow");
        state.form.current = 2;
        type_text(&mut state.form, "https://figma.com/file/xyz");

        let Some(DesignWizardAction::Save(draft)) = handle_input(&mut state, key(KeyCode::Char('s'))) else {
            panic!("expected save");
        };
        assert_eq!(draft.login_type, "custom");
        assert_eq!(draft.title, "Onboarding flow");
    }

    #[test]
    fn custom_design_needs_a_title() {
        let mut state = DesignWizardState::new(3, None);
        state.form.current = 2;
        type_text(&mut state.form, "https://figma.com/file/xyz");

        assert!(handle_input(&mut state, key(KeyCode::Char('s'))).is_none());
        assert_eq!(
            state.form.error.as_deref(),
            Some("Title is required for a custom design")
        );
    }
}
