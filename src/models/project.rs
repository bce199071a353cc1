use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::ParseEnumError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Ongoing,
    Pending,
    Completed,
}

impl ProjectStatus {
    /// Order used by the status tabs of the projects screen
    pub const ALL: [ProjectStatus; 3] = [
        ProjectStatus::Ongoing,
        ProjectStatus::Pending,
        ProjectStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Ongoing => "ongoing",
            ProjectStatus::Pending => "pending",
            ProjectStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ongoing" => Ok(ProjectStatus::Ongoing),
            "pending" => Ok(ProjectStatus::Pending),
            "completed" => Ok(ProjectStatus::Completed),
            other => Err(ParseEnumError::new("project status", other)),
        }
    }
}

impl TryFrom<String> for ProjectStatus {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Where a client came from. Stored as free text so older rows with other
/// values still load; these are the choices offered when creating a project.
pub struct ClientSource;

impl ClientSource {
    pub const REFERRAL: &'static str = "referral";

    pub const CHOICES: [&'static str; 10] = [
        "referral",
        "social_media",
        "linkedin",
        "instagram",
        "cold_outreach",
        "upwork",
        "fiverr",
        "website",
        "repeat_client",
        "other",
    ];
}

pub struct WorkType;

impl WorkType {
    pub const CHOICES: [&'static str; 11] = [
        "web_development",
        "mobile_app",
        "ui_ux_design",
        "logo_design",
        "branding",
        "ecommerce",
        "saas",
        "wordpress",
        "maintenance",
        "consulting",
        "other",
    ];
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Project {
    pub id: i32,
    pub profile_id: i32,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub status: ProjectStatus,
    pub client_email: Option<String>,
    pub referral_name: Option<String>,
    pub client_source: Option<String>,
    pub work_type: Option<String>,
    pub quotation_url: Option<String>,
    pub logo_url: Option<String>,
    pub git_repo: Option<String>,
    #[serde(skip)]
    pub github_token: Option<String>,
    pub last_commit_msg: Option<String>,
    pub last_commit_date: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub share_token: Option<String>,
    #[serde(skip)]
    pub share_enabled: bool,
    pub progress_status: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// An unsaved project; `id` 0 marks it as new
    pub fn draft(profile_id: i32) -> Self {
        Self {
            id: 0,
            profile_id,
            name: String::new(),
            status: ProjectStatus::Ongoing,
            client_email: None,
            referral_name: None,
            client_source: None,
            work_type: None,
            quotation_url: None,
            logo_url: None,
            git_repo: None,
            github_token: None,
            last_commit_msg: None,
            last_commit_date: None,
            share_token: None,
            share_enabled: false,
            progress_status: None,
            created_at: Utc::now(),
        }
    }

    /// Two-letter badge shown when a project has no logo
    pub fn initials(&self) -> String {
        self.name.chars().take(2).collect::<String>().to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_text() {
        for status in ProjectStatus::ALL {
            assert_eq!(status.as_str().parse::<ProjectStatus>().unwrap(), status);
        }
        let err = "archived".parse::<ProjectStatus>().unwrap_err();
        assert_eq!(err.value, "archived");
    }

    #[test]
    fn initials_use_first_two_characters() {
        let mut project = Project::draft(1);
        project.name = "website redesign".to_string();
        assert_eq!(project.initials(), "WE");

        project.name = "x".to_string();
        assert_eq!(project.initials(), "X");
    }
}
