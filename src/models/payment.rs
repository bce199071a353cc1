use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::ParseEnumError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    Advance,
    PhasePayment,
    Adhoc,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Advance => "advance",
            PaymentType::PhasePayment => "phase_payment",
            PaymentType::Adhoc => "adhoc",
        }
    }

    /// Label shown to clients on the share page
    pub fn display_label(&self) -> &'static str {
        match self {
            PaymentType::Advance => "Advance",
            PaymentType::PhasePayment => "Phase Completion",
            PaymentType::Adhoc => "Adhoc",
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "advance" => Ok(PaymentType::Advance),
            "phase_payment" => Ok(PaymentType::PhasePayment),
            "adhoc" => Ok(PaymentType::Adhoc),
            other => Err(ParseEnumError::new("payment type", other)),
        }
    }
}

impl TryFrom<String> for PaymentType {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Payment {
    pub id: i32,
    pub project_id: i32,
    pub amount: f64,
    #[sqlx(rename = "type", try_from = "String")]
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
    pub notes: Option<String>,
    pub receipt_url: Option<String>,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// A payment joined with the name of its project, for the transactions list
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct PaymentWithProject {
    #[sqlx(flatten)]
    pub payment: Payment,
    pub project_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_payments_read_as_phase_completion() {
        assert_eq!(PaymentType::PhasePayment.display_label(), "Phase Completion");
        assert_eq!(
            "phase_payment".parse::<PaymentType>().unwrap(),
            PaymentType::PhasePayment
        );
        assert!("refund".parse::<PaymentType>().is_err());
    }
}
