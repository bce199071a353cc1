pub mod components;
pub mod dashboard;
pub mod design_wizard;
pub mod finances;
pub mod git_wizard;
pub mod payment_wizard;
pub mod phase_wizard;
pub mod profile_wizard;
pub mod profiles;
pub mod project_detail;
pub mod project_wizard;
pub mod projects;
pub mod reports;
pub mod theme;
