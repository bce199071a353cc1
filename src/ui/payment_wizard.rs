use chrono::NaiveDate;
use crossterm::event::KeyEvent;
use tui::{backend::Backend, layout::Margin, Frame};

use crate::ui::components::form::{render_form, FormEvent, FormField, FormState};

const AMOUNT: &str = "Amount";
const DATE: &str = "Date";
const NOTES: &str = "Notes";
const RECEIPT: &str = "Receipt File";

/// An advance payment as entered, before the receipt is uploaded
#[derive(Debug, Clone, PartialEq)]
pub struct AdvanceDraft {
    pub project_id: i32,
    pub amount: f64,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub receipt_path: Option<String>,
}

#[derive(Debug)]
pub enum PaymentWizardAction {
    Cancel,
    Save(AdvanceDraft),
}

pub struct PaymentWizardState {
    pub project_id: i32,
    pub form: FormState,
}

impl PaymentWizardState {
    pub fn new(project_id: i32, today: NaiveDate) -> Self {
        Self {
            project_id,
            form: FormState::new(
                "Record Advance Payment",
                vec![
                    FormField::number(AMOUNT).required(),
                    FormField::date(DATE, today),
                    FormField::text(NOTES),
                    FormField::text(RECEIPT),
                ],
            ),
        }
    }

    pub fn draft(&self) -> Option<AdvanceDraft> {
        Some(AdvanceDraft {
            project_id: self.project_id,
            amount: self.form.amount(AMOUNT)?,
            date: self.form.date(DATE)?,
            notes: self.form.optional(NOTES),
            receipt_path: self.form.optional(RECEIPT),
        })
    }
}

pub fn render_payment_wizard<B: Backend>(f: &mut Frame<B>, state: &mut PaymentWizardState) {
    let area = f.size().inner(&Margin {
        vertical: 2,
        horizontal: 2,
    });
    render_form(f, area, &state.form);
}

pub fn handle_input(state: &mut PaymentWizardState, key: KeyEvent) -> Option<PaymentWizardAction> {
    match state.form.handle_key(key)? {
        FormEvent::Cancel => Some(PaymentWizardAction::Cancel),
        FormEvent::Save => state.draft().map(PaymentWizardAction::Save),
    }
}
