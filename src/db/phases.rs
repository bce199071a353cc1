use sqlx::Result;

use super::Database;
use crate::models::{PaymentType, Phase, PhaseStatus};
use crate::progress::toggle_feature;

const PHASE_COLUMNS: &str = r#"
    id, project_id, name, amount::float8 AS amount, description, status,
    is_completed, completed_features, created_at
"#;

impl Database {
    /// Phases of a project, oldest first
    pub async fn get_phases_by_project(&self, project_id: i32) -> Result<Vec<Phase>> {
        sqlx::query_as::<_, Phase>(&format!(
            "SELECT {} FROM phases WHERE project_id = $1 ORDER BY created_at ASC, id ASC",
            PHASE_COLUMNS
        ))
        .bind(project_id)
        .fetch_all(self.get_pool())
        .await
    }

    pub async fn get_phases_by_profile(&self, profile_id: i32) -> Result<Vec<Phase>> {
        sqlx::query_as::<_, Phase>(&format!(
            r#"
            SELECT {} FROM phases
            WHERE project_id IN (SELECT id FROM projects WHERE profile_id = $1)
            ORDER BY created_at ASC, id ASC
            "#,
            PHASE_COLUMNS
        ))
        .bind(profile_id)
        .fetch_all(self.get_pool())
        .await
    }

    pub async fn add_phase(
        &self,
        project_id: i32,
        name: &str,
        amount: f64,
        description: Option<&str>,
    ) -> Result<i32> {
        let description = description.map(str::trim).filter(|d| !d.is_empty());

        sqlx::query_scalar(
            r#"
            INSERT INTO phases (project_id, name, amount, description, status, is_completed)
            VALUES ($1, $2, $3::float8, $4, $5, FALSE)
            RETURNING id
            "#,
        )
        .bind(project_id)
        .bind(name)
        .bind(amount)
        .bind(description)
        .bind(PhaseStatus::Pending.as_str())
        .fetch_one(self.get_pool())
        .await
    }

    /// Marks the phase paid and records the matching payment atomically
    pub async fn mark_phase_paid(&self, phase_id: i32) -> Result<()> {
        let mut tx = self.get_pool().begin().await?;

        let (project_id, amount): (i32, f64) = sqlx::query_as(
            "UPDATE phases SET status = $1 WHERE id = $2 RETURNING project_id, amount::float8",
        )
        .bind(PhaseStatus::Paid.as_str())
        .bind(phase_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO payments (project_id, amount, type) VALUES ($1, $2::float8, $3)")
            .bind(project_id)
            .bind(amount)
            .bind(PaymentType::PhasePayment.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    pub async fn set_phase_completed(&self, phase_id: i32, is_completed: bool) -> Result<()> {
        sqlx::query("UPDATE phases SET is_completed = $1 WHERE id = $2")
            .bind(is_completed)
            .bind(phase_id)
            .execute(self.get_pool())
            .await?;

        Ok(())
    }

    pub async fn update_phase_description(&self, phase_id: i32, description: &str) -> Result<()> {
        sqlx::query("UPDATE phases SET description = $1 WHERE id = $2")
            .bind(description)
            .bind(phase_id)
            .execute(self.get_pool())
            .await?;

        Ok(())
    }

    /// Ticks one feature of a phase on or off
    pub async fn set_feature_completed(
        &self,
        phase_id: i32,
        feature: &str,
        is_completed: bool,
    ) -> Result<Vec<String>> {
        let mut tx = self.get_pool().begin().await?;

        let current: Vec<String> =
            sqlx::query_scalar("SELECT completed_features FROM phases WHERE id = $1 FOR UPDATE")
                .bind(phase_id)
                .fetch_one(&mut *tx)
                .await?;

        let next = toggle_feature(&current, feature, is_completed);

        sqlx::query("UPDATE phases SET completed_features = $1 WHERE id = $2")
            .bind(&next)
            .bind(phase_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(next)
    }

    pub async fn delete_phase(&self, phase_id: i32) -> Result<()> {
        sqlx::query("DELETE FROM phases WHERE id = $1")
            .bind(phase_id)
            .execute(self.get_pool())
            .await?;

        Ok(())
    }
}
