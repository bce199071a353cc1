use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::ParseEnumError;

/// Billing state of a phase; independent of whether its work is done
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    Pending,
    Paid,
}

impl PhaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseStatus::Pending => "pending",
            PhaseStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for PhaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PhaseStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PhaseStatus::Pending),
            "paid" => Ok(PhaseStatus::Paid),
            other => Err(ParseEnumError::new("phase status", other)),
        }
    }
}

impl TryFrom<String> for PhaseStatus {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Phase {
    pub id: i32,
    pub project_id: i32,
    pub name: String,
    pub amount: f64,
    pub description: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: PhaseStatus,
    pub is_completed: bool,
    pub completed_features: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Phase {
    pub fn is_paid(&self) -> bool {
        self.status == PhaseStatus::Paid
    }
}
