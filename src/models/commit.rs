use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Commit {
    pub id: i32,
    pub project_id: i32,
    pub sha: String,
    pub message: String,
    pub author: String,
    pub committed_at: DateTime<Utc>,
    pub url: String,
}

impl Commit {
    pub fn short_sha(&self) -> &str {
        self.sha.get(..7).unwrap_or(&self.sha)
    }
}
