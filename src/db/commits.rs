use sqlx::Result;

use super::Database;
use crate::git::RemoteCommit;
use crate::models::Commit;

impl Database {
    /// Inserts a commit unless the project already has one with this sha
    pub async fn upsert_commit(&self, project_id: i32, commit: &RemoteCommit) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO commits (project_id, sha, message, author, committed_at, url)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (project_id, sha) DO NOTHING
            "#,
        )
        .bind(project_id)
        .bind(&commit.sha)
        .bind(&commit.message)
        .bind(&commit.author)
        .bind(commit.committed_at)
        .bind(&commit.url)
        .execute(self.get_pool())
        .await?;

        Ok(())
    }

    /// Stored commits of a project, newest first
    pub async fn get_commits_by_project(&self, project_id: i32) -> Result<Vec<Commit>> {
        sqlx::query_as::<_, Commit>(
            r#"
            SELECT id, project_id, sha, message, author, committed_at, url
            FROM commits WHERE project_id = $1
            ORDER BY committed_at DESC
            "#,
        )
        .bind(project_id)
        .fetch_all(self.get_pool())
        .await
    }
}
