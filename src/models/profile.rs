use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::ParseEnumError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub const ALL: [Theme; 2] = [Theme::Dark, Theme::Light];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(ParseEnumError::new("theme", other)),
        }
    }
}

impl TryFrom<String> for Theme {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// The freelancer account that owns projects
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Profile {
    pub id: i32,
    pub full_name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    #[sqlx(try_from = "String")]
    pub theme_preference: Theme,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn draft() -> Self {
        Self {
            id: 0,
            full_name: String::new(),
            email: String::new(),
            avatar_url: None,
            theme_preference: Theme::default(),
            updated_at: Utc::now(),
        }
    }
}
