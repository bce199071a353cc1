use chrono::{DateTime, Utc};
use sqlx::Result;

use super::Database;
use crate::models::{Project, ProjectStatus};

const PROJECT_COLUMNS: &str = r#"
    id, profile_id, name, status, client_email, referral_name, client_source, work_type,
    quotation_url, logo_url, git_repo, github_token, last_commit_msg, last_commit_date,
    share_token, share_enabled, progress_status, created_at
"#;

/// Sharing columns of a project
#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct ShareStatus {
    pub share_token: Option<String>,
    pub share_enabled: bool,
    pub progress_status: Option<String>,
}

impl Database {
    pub async fn get_projects_by_profile(&self, profile_id: i32) -> Result<Vec<Project>> {
        sqlx::query_as::<_, Project>(&format!(
            "SELECT {} FROM projects WHERE profile_id = $1 ORDER BY created_at DESC",
            PROJECT_COLUMNS
        ))
        .bind(profile_id)
        .fetch_all(self.get_pool())
        .await
    }

    pub async fn get_projects_by_status(
        &self,
        profile_id: i32,
        status: ProjectStatus,
    ) -> Result<Vec<Project>> {
        sqlx::query_as::<_, Project>(&format!(
            "SELECT {} FROM projects WHERE profile_id = $1 AND status = $2 ORDER BY created_at DESC",
            PROJECT_COLUMNS
        ))
        .bind(profile_id)
        .bind(status.as_str())
        .fetch_all(self.get_pool())
        .await
    }

    pub async fn get_recent_projects(&self, profile_id: i32, limit: i64) -> Result<Vec<Project>> {
        sqlx::query_as::<_, Project>(&format!(
            "SELECT {} FROM projects WHERE profile_id = $1 ORDER BY created_at DESC LIMIT $2",
            PROJECT_COLUMNS
        ))
        .bind(profile_id)
        .bind(limit)
        .fetch_all(self.get_pool())
        .await
    }

    pub async fn get_project(&self, id: i32) -> Result<Project> {
        sqlx::query_as::<_, Project>(&format!("SELECT {} FROM projects WHERE id = $1", PROJECT_COLUMNS))
            .bind(id)
            .fetch_one(self.get_pool())
            .await
    }

    pub async fn create_project(&self, project: &Project) -> Result<i32> {
        sqlx::query_scalar(
            r#"
            INSERT INTO projects (profile_id, name, status, client_email, referral_name,
                                  client_source, work_type, quotation_url, logo_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(project.profile_id)
        .bind(&project.name)
        .bind(project.status.as_str())
        .bind(&project.client_email)
        .bind(&project.referral_name)
        .bind(&project.client_source)
        .bind(&project.work_type)
        .bind(&project.quotation_url)
        .bind(&project.logo_url)
        .fetch_one(self.get_pool())
        .await
    }

    /// Moves a project awaiting confirmation to ongoing
    pub async fn approve_project(&self, id: i32) -> Result<()> {
        self.set_project_status(id, ProjectStatus::Ongoing).await
    }

    pub async fn set_project_status(&self, id: i32, status: ProjectStatus) -> Result<()> {
        sqlx::query("UPDATE projects SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(self.get_pool())
            .await?;

        Ok(())
    }

    /// Phases, payments, designs and commits are removed by FK cascade
    pub async fn delete_project(&self, id: i32) -> Result<()> {
        sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(self.get_pool())
            .await?;

        Ok(())
    }

    // Git operations
    pub async fn save_github_token(&self, id: i32, token: &str) -> Result<()> {
        sqlx::query("UPDATE projects SET github_token = $1 WHERE id = $2")
            .bind(token)
            .bind(id)
            .execute(self.get_pool())
            .await?;

        Ok(())
    }

    pub async fn get_github_token(&self, id: i32) -> Result<Option<String>> {
        let token: Option<Option<String>> =
            sqlx::query_scalar("SELECT github_token FROM projects WHERE id = $1")
                .bind(id)
                .fetch_optional(self.get_pool())
                .await?;

        Ok(token.flatten().filter(|t| !t.is_empty()))
    }

    pub async fn update_git_repo(&self, id: i32, repo_url: &str) -> Result<()> {
        sqlx::query("UPDATE projects SET git_repo = $1 WHERE id = $2")
            .bind(repo_url)
            .bind(id)
            .execute(self.get_pool())
            .await?;

        Ok(())
    }

    pub async fn update_last_commit(
        &self,
        id: i32,
        repo_url: &str,
        message: &str,
        date: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE projects SET git_repo = $1, last_commit_msg = $2, last_commit_date = $3 WHERE id = $4",
        )
        .bind(repo_url)
        .bind(message)
        .bind(date)
        .bind(id)
        .execute(self.get_pool())
        .await?;

        Ok(())
    }

    // Share operations
    pub async fn get_share_status(&self, id: i32) -> Result<ShareStatus> {
        sqlx::query_as::<_, ShareStatus>(
            "SELECT share_token, share_enabled, progress_status FROM projects WHERE id = $1",
        )
        .bind(id)
        .fetch_one(self.get_pool())
        .await
    }

    pub async fn set_sharing(&self, id: i32, token: &str, enabled: bool) -> Result<()> {
        sqlx::query("UPDATE projects SET share_token = $1, share_enabled = $2 WHERE id = $3")
            .bind(token)
            .bind(enabled)
            .bind(id)
            .execute(self.get_pool())
            .await?;

        Ok(())
    }

    pub async fn disable_sharing(&self, id: i32) -> Result<()> {
        sqlx::query("UPDATE projects SET share_enabled = FALSE WHERE id = $1")
            .bind(id)
            .execute(self.get_pool())
            .await?;

        Ok(())
    }

    pub async fn update_progress_status(&self, id: i32, status: &str) -> Result<()> {
        sqlx::query("UPDATE projects SET progress_status = $1 WHERE id = $2")
            .bind(status)
            .bind(id)
            .execute(self.get_pool())
            .await?;

        Ok(())
    }

    /// Only projects with sharing switched on are visible through a token
    pub async fn get_project_by_share_token(&self, token: &str) -> Result<Option<Project>> {
        sqlx::query_as::<_, Project>(&format!(
            "SELECT {} FROM projects WHERE share_token = $1 AND share_enabled = TRUE",
            PROJECT_COLUMNS
        ))
        .bind(token)
        .fetch_optional(self.get_pool())
        .await
    }
}
