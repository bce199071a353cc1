mod commit;
mod design;
mod payment;
mod phase;
mod profile;
mod project;

pub use commit::Commit;
pub use design::{Design, LoginType, CUSTOM_DESIGN};
pub use payment::{Payment, PaymentType, PaymentWithProject};
pub use phase::{Phase, PhaseStatus};
pub use profile::{Profile, Theme};
pub use project::{ClientSource, Project, ProjectStatus, WorkType};

/// A text column held a value none of the enum variants accept
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value:?}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
