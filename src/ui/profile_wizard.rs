use crossterm::event::KeyEvent;
use tui::{
    backend::Backend,
    layout::Margin,
    Frame,
};

use crate::models::{Profile, Theme};
use crate::ui::components::form::{render_form, FormEvent, FormField, FormState};

const FULL_NAME: &str = "Full Name";
const EMAIL: &str = "Email";
const AVATAR: &str = "Avatar File";
const THEME: &str = "Theme";

/// Profile details plus an avatar file to upload, if one was picked
#[derive(Debug, Clone)]
pub struct ProfileDraft {
    pub profile: Profile,
    pub avatar_path: Option<String>,
}

#[derive(Debug)]
pub enum ProfileWizardAction {
    Cancel,
    Save(ProfileDraft),
}

pub struct ProfileWizardState {
    pub profile: Profile,
    pub form: FormState,
}

impl ProfileWizardState {
    pub fn new() -> Self {
        Self::with_profile(Profile::draft(), "Create Account")
    }

    pub fn from_existing(profile: Profile) -> Self {
        Self::with_profile(profile, "Settings")
    }

    fn with_profile(profile: Profile, title: &str) -> Self {
        let themes: Vec<&str> = Theme::ALL.iter().map(|t| t.as_str()).collect();
        let avatar_hint = match &profile.avatar_url {
            Some(url) => format!("{} (avatar: {})", title, url),
            None => title.to_string(),
        };

        let form = FormState::new(
            avatar_hint,
            vec![
                FormField::text(FULL_NAME).required().with_value(&profile.full_name),
                FormField::text(EMAIL).required().with_value(&profile.email),
                FormField::text(AVATAR),
                FormField::choice(THEME, &themes, profile.theme_preference.as_str()),
            ],
        );

        Self { profile, form }
    }

    pub fn draft(&self) -> ProfileDraft {
        let mut profile = self.profile.clone();
        profile.full_name = self.form.value(FULL_NAME).to_string();
        profile.email = self.form.value(EMAIL).to_string();
        profile.theme_preference = self.form.value(THEME).parse().unwrap_or_default();

        ProfileDraft {
            profile,
            avatar_path: self.form.optional(AVATAR),
        }
    }
}

pub fn render_profile_wizard<B: Backend>(f: &mut Frame<B>, state: &mut ProfileWizardState) {
    let area = f.size().inner(&Margin {
        vertical: 2,
        horizontal: 2,
    });
    render_form(f, area, &state.form);
}

pub fn handle_input(state: &mut ProfileWizardState, key: KeyEvent) -> Option<ProfileWizardAction> {
    match state.form.handle_key(key)? {
        FormEvent::Cancel => Some(ProfileWizardAction::Cancel),
        FormEvent::Save => Some(ProfileWizardAction::Save(state.draft())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::components::form::tests::{key, type_text};
    use crossterm::event::KeyCode;

    #[test]
    fn new_account_collects_name_email_and_theme() {
        let mut state = ProfileWizardState::new();
        type_text(&mut state.form, "Asha Rao");
        state.form.next_field();
        type_text(&mut state.form, "asha@example.com");
        state.form.next_field();
        state.form.next_field();
        state.form.handle_key(key(KeyCode::Enter));
        state.form.handle_key(key(KeyCode::Right));
        state.form.handle_key(key(KeyCode::Enter));

        let Some(ProfileWizardAction::Save(draft)) = handle_input(&mut state, key(KeyCode::Char('s'))) else {
            panic!("expected save");
        };
        assert_eq!(draft.profile.id, 0);
        assert_eq!(draft.profile.full_name, "Asha Rao");
        assert_eq!(draft.profile.email, "asha@example.com");
        assert_eq!(draft.profile.theme_preference, Theme::Light);
        assert!(draft.avatar_path.is_none());
    }

    #[test]
    fn editing_keeps_the_profile_id() {
        let mut profile = Profile::draft();
        profile.id = 4;
        profile.full_name = "Ravi".to_string();
        profile.email = "ravi@example.com".to_string();

        let state = ProfileWizardState::from_existing(profile);
        let draft = state.draft();
        assert_eq!(draft.profile.id, 4);
        assert_eq!(draft.profile.full_name, "Ravi");
    }
}
