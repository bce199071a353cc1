use crossterm::event::KeyEvent;
use tui::{backend::Backend, layout::Margin, Frame};

use crate::models::Phase;
use crate::ui::components::form::{render_form, FormEvent, FormField, FormState};

const NAME: &str = "Phase Name";
const AMOUNT: &str = "Amount";
const FEATURES: &str = "Features (comma separated)";

#[derive(Debug, Clone, PartialEq)]
pub enum PhaseDraft {
    New {
        project_id: i32,
        name: String,
        amount: f64,
        description: Option<String>,
    },
    Features {
        phase_id: i32,
        description: String,
    },
}

#[derive(Debug)]
pub enum PhaseWizardAction {
    Cancel,
    Save(PhaseDraft),
}

pub struct PhaseWizardState {
    pub project_id: i32,
    phase_id: Option<i32>,
    pub form: FormState,
}

impl PhaseWizardState {
    pub fn new(project_id: i32) -> Self {
        Self {
            project_id,
            phase_id: None,
            form: FormState::new(
                "Add Phase",
                vec![
                    FormField::text(NAME).required(),
                    FormField::number(AMOUNT).required(),
                    FormField::text(FEATURES),
                ],
            ),
        }
    }

    /// Edits the feature list of an existing phase
    pub fn edit_features(phase: &Phase) -> Self {
        Self {
            project_id: phase.project_id,
            phase_id: Some(phase.id),
            form: FormState::new(
                format!("Features of {}", phase.name),
                vec![FormField::text(FEATURES).with_value(phase.description.clone().unwrap_or_default())],
            ),
        }
    }

    pub fn draft(&self) -> Option<PhaseDraft> {
        match self.phase_id {
            Some(phase_id) => Some(PhaseDraft::Features {
                phase_id,
                description: self.form.value(FEATURES).to_string(),
            }),
            None => Some(PhaseDraft::New {
                project_id: self.project_id,
                name: self.form.value(NAME).to_string(),
                amount: self.form.amount(AMOUNT)?,
                description: self.form.optional(FEATURES),
            }),
        }
    }
}

pub fn render_phase_wizard<B: Backend>(f: &mut Frame<B>, state: &mut PhaseWizardState) {
    let area = f.size().inner(&Margin {
        vertical: 2,
        horizontal: 2,
    });
    render_form(f, area, &state.form);
}

pub fn handle_input(state: &mut PhaseWizardState, key: KeyEvent) -> Option<PhaseWizardAction> {
    match state.form.handle_key(key)? {
        FormEvent::Cancel => Some(PhaseWizardAction::Cancel),
        FormEvent::Save => state.draft().map(PhaseWizardAction::Save),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::tests::phase;
    use crate::ui::components::form::tests::{key, type_text};
    use crossterm::event::KeyCode;

    #[test]
    fn new_phase_needs_name_and_amount() {
        let mut state = PhaseWizardState::new(9);
        type_text(&mut state.form, "Design");
        assert!(handle_input(&mut state, key(KeyCode::Char('s'))).is_none());
        assert_eq!(state.form.error.as_deref(), Some("Amount is required"));

        state.form.next_field();
        type_text(&mut state.form, "15000");
        state.form.next_field();
        type_text(&mut state.form, "Wireframes, Mockups");

        let Some(PhaseWizardAction::Save(draft)) = handle_input(&mut state, key(KeyCode::Char('s'))) else {
            panic!("expected save");
        };
        assert_eq!(
            draft,
            PhaseDraft::New {
                project_id: 9,
                name: "Design".to_string(),
                amount: 15000.0,
                description: Some("Wireframes, Mockups".to_string()),
            }
        );
    }

    #[test]
    fn feature_edit_starts_from_current_description() {
        let existing = phase(4, "Build", Some("API, UI"), &[]);
        let mut state = PhaseWizardState::edit_features(&existing);
        assert_eq!(state.form.value(FEATURES), "API, UI");

        type_text(&mut state.form, ", Docs");
        assert_eq!(
            state.draft(),
            Some(PhaseDraft::Features {
                phase_id: 4,
                description: "API, UI, Docs".to_string(),
            })
        );
    }
}
