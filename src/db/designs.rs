use sqlx::Result;

use super::Database;
use crate::models::Design;

impl Database {
    pub async fn get_designs_by_project(&self, project_id: i32) -> Result<Vec<Design>> {
        sqlx::query_as::<_, Design>(
            r#"
            SELECT id, project_id, title, url, login_type, created_at
            FROM designs WHERE project_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(self.get_pool())
        .await
    }

    /// Title falls back to the login type when left empty
    pub async fn add_design(&self, project_id: i32, title: &str, url: &str, login_type: &str) -> Result<i32> {
        let title = if title.trim().is_empty() { login_type } else { title.trim() };

        sqlx::query_scalar(
            r#"
            INSERT INTO designs (project_id, title, url, login_type)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(project_id)
        .bind(title)
        .bind(url)
        .bind(login_type)
        .fetch_one(self.get_pool())
        .await
    }

    pub async fn delete_design(&self, design_id: i32) -> Result<()> {
        sqlx::query("DELETE FROM designs WHERE id = $1")
            .bind(design_id)
            .execute(self.get_pool())
            .await?;

        Ok(())
    }
}
