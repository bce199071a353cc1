use chrono::{DateTime, Utc};
use sqlx::Result;

use super::Database;
use crate::models::{Payment, PaymentType, PaymentWithProject};

const PAYMENT_COLUMNS: &str =
    "p.id, p.project_id, p.amount::float8 AS amount, p.type, p.notes, p.receipt_url, p.date, p.created_at";

/// Fields of an advance entered in the payment form
#[derive(Debug, Clone, PartialEq)]
pub struct NewAdvance {
    pub amount: f64,
    pub notes: Option<String>,
    pub receipt_url: Option<String>,
    pub date: DateTime<Utc>,
}

impl Database {
    /// Payments of a project, newest first
    pub async fn get_payments_by_project(&self, project_id: i32) -> Result<Vec<Payment>> {
        sqlx::query_as::<_, Payment>(&format!(
            "SELECT {} FROM payments p WHERE p.project_id = $1 ORDER BY p.created_at DESC",
            PAYMENT_COLUMNS
        ))
        .bind(project_id)
        .fetch_all(self.get_pool())
        .await
    }

    pub async fn get_payments_by_profile(&self, profile_id: i32) -> Result<Vec<Payment>> {
        sqlx::query_as::<_, Payment>(&format!(
            r#"
            SELECT {} FROM payments p
            JOIN projects pr ON pr.id = p.project_id
            WHERE pr.profile_id = $1
            ORDER BY p.created_at DESC
            "#,
            PAYMENT_COLUMNS
        ))
        .bind(profile_id)
        .fetch_all(self.get_pool())
        .await
    }

    /// Payments of a profile with their project names, for the transactions list
    pub async fn get_transactions(&self, profile_id: i32) -> Result<Vec<PaymentWithProject>> {
        sqlx::query_as::<_, PaymentWithProject>(&format!(
            r#"
            SELECT {}, pr.name AS project_name FROM payments p
            JOIN projects pr ON pr.id = p.project_id
            WHERE pr.profile_id = $1
            ORDER BY p.created_at DESC
            "#,
            PAYMENT_COLUMNS
        ))
        .bind(profile_id)
        .fetch_all(self.get_pool())
        .await
    }

    pub async fn add_advance_payment(&self, project_id: i32, advance: &NewAdvance) -> Result<i32> {
        sqlx::query_scalar(
            r#"
            INSERT INTO payments (project_id, amount, type, notes, receipt_url, date)
            VALUES ($1, $2::float8, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(project_id)
        .bind(advance.amount)
        .bind(PaymentType::Advance.as_str())
        .bind(&advance.notes)
        .bind(&advance.receipt_url)
        .bind(advance.date)
        .fetch_one(self.get_pool())
        .await
    }

    pub async fn get_project_advances(&self, project_id: i32) -> Result<f64> {
        sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0)::float8 FROM payments WHERE project_id = $1 AND type = $2",
        )
        .bind(project_id)
        .bind(PaymentType::Advance.as_str())
        .fetch_one(self.get_pool())
        .await
    }

    pub async fn delete_payment(&self, payment_id: i32) -> Result<()> {
        sqlx::query("DELETE FROM payments WHERE id = $1")
            .bind(payment_id)
            .execute(self.get_pool())
            .await?;

        Ok(())
    }
}
