use crossterm::event::KeyEvent;
use tui::{backend::Backend, layout::Margin, Frame};

use crate::git::parse_repo_url;
use crate::ui::components::form::{render_form, FormEvent, FormField, FormState};

const REPO: &str = "Repository URL";
const TOKEN: &str = "GitHub Token";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitDraft {
    pub project_id: i32,
    pub repo_url: String,
    /// `None` keeps the token already stored on the project
    pub token: Option<String>,
}

#[derive(Debug)]
pub enum GitWizardAction {
    Cancel,
    Save(GitDraft),
}

pub struct GitWizardState {
    pub project_id: i32,
    pub form: FormState,
}

impl GitWizardState {
    pub fn new(project_id: i32, repo_url: Option<&str>) -> Self {
        Self {
            project_id,
            form: FormState::new(
                "Connect Repository (token is only needed for private repos)",
                vec![
                    FormField::text(REPO).required().with_value(repo_url.unwrap_or_default()),
                    FormField::secret(TOKEN),
                ],
            ),
        }
    }
}

pub fn render_git_wizard<B: Backend>(f: &mut Frame<B>, state: &mut GitWizardState) {
    let area = f.size().inner(&Margin {
        vertical: 2,
        horizontal: 2,
    });
    render_form(f, area, &state.form);
}

pub fn handle_input(state: &mut GitWizardState, key: KeyEvent) -> Option<GitWizardAction> {
    match state.form.handle_key(key)? {
        FormEvent::Cancel => Some(GitWizardAction::Cancel),
        FormEvent::Save => {
            let repo_url = state.form.value(REPO).to_string();
            if let Err(e) = parse_repo_url(&repo_url) {
                state.form.error = Some(e.to_string());
                return None;
            }
            Some(GitWizardAction::Save(GitDraft {
                project_id: state.project_id,
                repo_url,
                token: state.form.optional(TOKEN),
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::components::form::tests::{key, type_text};
    use crossterm::event::KeyCode;

    #[test]
    fn rejects_urls_that_are_not_github() {
        let mut state = GitWizardState::new(1, None);
        type_text(&mut state.form, "https://gitlab.com/acme/site");
        assert!(handle_input(&mut state, key(KeyCode::Char('s'))).is_none());
        assert_eq!(state.form.error.as_deref(), Some("Invalid GitHub URL format"));
    }

    #[test]
    fn blank_token_keeps_stored_one() {
        let mut state = GitWizardState::new(5, Some("https://github.com/acme/site"));
        let Some(GitWizardAction::Save(draft)) = handle_input(&mut state, key(KeyCode::Char('s'))) else {
            panic!("expected save");
        };
        assert_eq!(draft.repo_url, "https://github.com/acme/site");
        assert_eq!(draft.token, None);
    }
}
