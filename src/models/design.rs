use chrono::{DateTime, Utc};
use serde::Serialize;

/// Stored login type of designs that sit outside the predefined slots
pub const CUSTOM_DESIGN: &str = "custom";

/// The predefined login screens every project gets a design slot for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginType {
    Admin,
    User,
    Client,
}

impl LoginType {
    pub const ALL: [LoginType; 3] = [LoginType::Admin, LoginType::User, LoginType::Client];

    pub fn key(&self) -> &'static str {
        match self {
            LoginType::Admin => "admin",
            LoginType::User => "user",
            LoginType::Client => "client",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LoginType::Admin => "Admin Login",
            LoginType::User => "User Login",
            LoginType::Client => "Client Portal",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.key() == key)
    }
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Design {
    pub id: i32,
    pub project_id: i32,
    pub title: String,
    pub url: String,
    pub login_type: String,
    pub created_at: DateTime<Utc>,
}

impl Design {
    /// Whether this design fills one of the predefined login slots
    pub fn slot(&self) -> Option<LoginType> {
        LoginType::from_key(&self.login_type).or_else(|| LoginType::from_key(&self.title))
    }

    /// Name shown for the design: the slot name, or the title for custom designs
    pub fn display_title(&self) -> String {
        match self.slot() {
            Some(slot) => slot.name().to_string(),
            None if self.title.trim().is_empty() => "Custom Design".to_string(),
            None => self.title.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn design(title: &str, login_type: &str) -> Design {
        Design {
            id: 1,
            project_id: 1,
            title: title.to_string(),
            url: "https://figma.com/file/abc".to_string(),
            login_type: login_type.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn slot_comes_from_login_type_or_title() {
        assert_eq!(design("Mockup", "user").slot(), Some(LoginType::User));
        assert_eq!(design("client", "").slot(), Some(LoginType::Client));
        assert_eq!(design("Onboarding", CUSTOM_DESIGN).slot(), None);
    }

    #[test]
    fn custom_designs_show_their_title() {
        assert_eq!(design("Onboarding", CUSTOM_DESIGN).display_title(), "Onboarding");
        assert_eq!(design("  ", CUSTOM_DESIGN).display_title(), "Custom Design");
        assert_eq!(design("admin", "admin").display_title(), "Admin Login");
    }
}
