use crossterm::event::KeyEvent;
use tui::{backend::Backend, layout::Margin, Frame};

use crate::models::{ClientSource, Project, ProjectStatus, WorkType};
use crate::ui::components::form::{render_form, FormEvent, FormField, FormState};

const NAME: &str = "Project Name";
const STATUS: &str = "Status";
const CLIENT_EMAIL: &str = "Client Email";
const CLIENT_SOURCE: &str = "Client Source";
const REFERRAL_NAME: &str = "Referral Name";
const WORK_TYPE: &str = "Work Type";
const QUOTATION: &str = "Quotation File";
const LOGO: &str = "Logo File";

/// A new project and the local files to upload with it
#[derive(Debug, Clone)]
pub struct ProjectDraft {
    pub project: Project,
    pub quotation_path: Option<String>,
    pub logo_path: Option<String>,
}

#[derive(Debug)]
pub enum ProjectWizardAction {
    Cancel,
    Save(ProjectDraft),
}

pub struct ProjectWizardState {
    pub profile_id: i32,
    pub form: FormState,
}

/// Choices with a leading blank for "not specified"
fn optional_choices(choices: &[&'static str]) -> Vec<&'static str> {
    std::iter::once("").chain(choices.iter().copied()).collect()
}

impl ProjectWizardState {
    pub fn new(profile_id: i32) -> Self {
        let statuses: Vec<&str> = ProjectStatus::ALL.iter().map(|s| s.as_str()).collect();

        let form = FormState::new(
            "New Project",
            vec![
                FormField::text(NAME).required(),
                FormField::choice(STATUS, &statuses, ProjectStatus::Ongoing.as_str()),
                FormField::text(CLIENT_EMAIL),
                FormField::choice(CLIENT_SOURCE, &optional_choices(&ClientSource::CHOICES), ""),
                FormField::text(REFERRAL_NAME),
                FormField::choice(WORK_TYPE, &optional_choices(&WorkType::CHOICES), ""),
                FormField::text(QUOTATION),
                FormField::text(LOGO),
            ],
        );

        Self { profile_id, form }
    }

    pub fn profile_id(&self) -> i32 {
        self.profile_id
    }

    pub fn draft(&self) -> ProjectDraft {
        let mut project = Project::draft(self.profile_id);
        project.name = self.form.value(NAME).to_string();
        project.status = self.form.value(STATUS).parse().unwrap_or(ProjectStatus::Ongoing);
        project.client_email = self.form.optional(CLIENT_EMAIL);
        project.client_source = self.form.optional(CLIENT_SOURCE);
        // Referral name only means something for referred clients
        if project.client_source.as_deref() == Some(ClientSource::REFERRAL) {
            project.referral_name = self.form.optional(REFERRAL_NAME);
        }
        project.work_type = self.form.optional(WORK_TYPE);

        ProjectDraft {
            project,
            quotation_path: self.form.optional(QUOTATION),
            logo_path: self.form.optional(LOGO),
        }
    }
}

pub fn render_project_wizard<B: Backend>(f: &mut Frame<B>, state: &mut ProjectWizardState) {
    let area = f.size().inner(&Margin {
        vertical: 2,
        horizontal: 2,
    });
    render_form(f, area, &state.form);
}

pub fn handle_input(state: &mut ProjectWizardState, key: KeyEvent) -> Option<ProjectWizardAction> {
    match state.form.handle_key(key)? {
        FormEvent::Cancel => Some(ProjectWizardAction::Cancel),
        FormEvent::Save => Some(ProjectWizardAction::Save(state.draft())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::components::form::tests::{key, type_text};
    use crossterm::event::KeyCode;

    fn pick(state: &mut ProjectWizardState, field: usize, steps: usize) {
        state.form.current = field;
        state.form.handle_key(key(KeyCode::Enter));
        for _ in 0..steps {
            state.form.handle_key(key(KeyCode::Right));
        }
        state.form.handle_key(key(KeyCode::Enter));
    }

    #[test]
    fn name_is_required() {
        let mut state = ProjectWizardState::new(1);
        assert!(handle_input(&mut state, key(KeyCode::Char('s'))).is_none());
        assert_eq!(state.form.error.as_deref(), Some("Project Name is required"));
    }

    #[test]
    fn referral_name_kept_only_for_referrals() {
        let mut state = ProjectWizardState::new(3);
        type_text(&mut state.form, "Bakery Site");
        state.form.current = 4;
        type_text(&mut state.form, "Meera");

        assert!(state.draft().project.referral_name.is_none());

        pick(&mut state, 3, 1);
        let draft = state.draft();
        assert_eq!(draft.project.client_source.as_deref(), Some("referral"));
        assert_eq!(draft.project.referral_name.as_deref(), Some("Meera"));
        assert_eq!(draft.project.profile_id, 3);
    }

    #[test]
    fn pending_status_and_work_type_are_stored() {
        let mut state = ProjectWizardState::new(1);
        type_text(&mut state.form, "App");
        pick(&mut state, 1, 1);
        pick(&mut state, 5, 2);

        let Some(ProjectWizardAction::Save(draft)) = handle_input(&mut state, key(KeyCode::Char('s'))) else {
            panic!("expected save");
        };
        assert_eq!(draft.project.status, ProjectStatus::Pending);
        assert_eq!(draft.project.work_type.as_deref(), Some("mobile_app"));
        assert!(draft.project.client_email.is_none());
        assert!(draft.logo_path.is_none());
    }
}
