//! Commit metadata pulled from GitHub for a project's repository.

use chrono::{DateTime, Utc};
use regex::Regex;
use reqwest::StatusCode;
use serde::Deserialize;
use std::sync::LazyLock;
use thiserror::Error;

use crate::db::Database;
use crate::format::first_line;
use crate::models::Commit;

const USER_AGENT: &str = "FreelanceManager";
const PER_PAGE: u32 = 50;

static REPO_PATTERNS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"github\.com/([^/]+)/([^/.\s]+)").expect("valid pattern"),
        Regex::new(r"github\.com:([^/]+)/([^/.\s]+)").expect("valid pattern"),
    ]
});

#[derive(Debug, Error)]
pub enum GitError {
    #[error("Invalid GitHub URL format")]
    InvalidUrl,

    #[error("Access denied. Please configure a GitHub token for private repos.")]
    AccessDenied,

    #[error("Repository not found. Check the URL or ensure you have access.")]
    RepoNotFound,

    #[error("GitHub API error: {0}")]
    Api(StatusCode),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

/// Extracts owner and repository from the usual GitHub URL shapes
pub fn parse_repo_url(url: &str) -> Result<RepoRef, GitError> {
    REPO_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(url))
        .map(|caps| RepoRef {
            owner: caps[1].to_string(),
            repo: caps[2].trim_end_matches(".git").to_string(),
        })
        .ok_or(GitError::InvalidUrl)
}

#[derive(Debug, Deserialize)]
struct GitHubCommit {
    sha: String,
    commit: GitHubCommitDetail,
    html_url: String,
}

#[derive(Debug, Deserialize)]
struct GitHubCommitDetail {
    message: String,
    author: Option<GitHubAuthor>,
    committer: Option<GitHubAuthor>,
}

#[derive(Debug, Deserialize)]
struct GitHubAuthor {
    name: String,
    date: DateTime<Utc>,
}

/// A commit as returned by the API, before it is stored
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteCommit {
    pub sha: String,
    pub message: String,
    pub author: String,
    pub committed_at: DateTime<Utc>,
    pub url: String,
}

impl GitHubCommit {
    /// Author date first, then committer date; `None` when the API sent neither
    fn into_remote(self) -> Option<RemoteCommit> {
        let GitHubCommitDetail {
            message,
            author,
            committer,
        } = self.commit;
        let committed_at = author.as_ref().or(committer.as_ref())?.date;
        let author = author
            .or(committer)
            .map(|a| a.name)
            .unwrap_or_else(|| "unknown".to_string());

        Some(RemoteCommit {
            sha: self.sha,
            message,
            author,
            committed_at,
            url: self.html_url,
        })
    }
}

/// The most recently dated commit of a batch
fn newest(commits: &[RemoteCommit]) -> Option<&RemoteCommit> {
    commits.iter().max_by_key(|c| c.committed_at)
}

#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_base: String,
}

impl GitHubClient {
    pub fn new(api_base: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    /// Lists the latest commits of a repository, newest first
    pub async fn fetch_commits(
        &self,
        repo: &RepoRef,
        token: Option<&str>,
    ) -> Result<Vec<RemoteCommit>, GitError> {
        let url = format!(
            "{}/repos/{}/{}/commits?per_page={}",
            self.api_base, repo.owner, repo.repo, PER_PAGE
        );

        let mut request = self
            .http
            .get(&url)
            .header("Accept", "application/vnd.github.v3+json")
            .header("User-Agent", USER_AGENT);
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status));
        }

        let commits: Vec<GitHubCommit> = response.json().await?;
        let total = commits.len();
        let remote: Vec<RemoteCommit> = commits.into_iter().filter_map(GitHubCommit::into_remote).collect();
        if remote.len() < total {
            tracing::debug!(skipped = total - remote.len(), "commits without a date skipped");
        }
        Ok(remote)
    }
}

fn status_error(status: StatusCode) -> GitError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GitError::AccessDenied,
        StatusCode::NOT_FOUND => GitError::RepoNotFound,
        other => GitError::Api(other),
    }
}

/// Pulls commits for a project and stores them.
///
/// A new token is saved on the project before use; without one the stored
/// token is used. Returns every stored commit of the project, newest first.
pub async fn sync_commits(
    db: &Database,
    client: &GitHubClient,
    project_id: i32,
    repo_url: &str,
    new_token: Option<&str>,
) -> Result<Vec<Commit>, GitError> {
    let repo = parse_repo_url(repo_url)?;
    let new_token = new_token.filter(|t| !t.is_empty());

    if let Some(token) = new_token {
        db.save_github_token(project_id, token).await?;
    }
    let token = match new_token {
        Some(token) => Some(token.to_string()),
        None => db.get_github_token(project_id).await?,
    };

    let remote = client.fetch_commits(&repo, token.as_deref()).await?;
    tracing::info!(
        project_id,
        owner = %repo.owner,
        repo = %repo.repo,
        count = remote.len(),
        "fetched commits"
    );

    for commit in &remote {
        db.upsert_commit(project_id, commit).await?;
    }

    if let Some(latest) = newest(&remote) {
        db.update_last_commit(
            project_id,
            repo_url,
            first_line(&latest.message),
            latest.committed_at,
        )
        .await?;
    }

    Ok(db.get_commits_by_project(project_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(owner: &str, name: &str) -> RepoRef {
        RepoRef {
            owner: owner.to_string(),
            repo: name.to_string(),
        }
    }

    #[test]
    fn parses_common_url_shapes() {
        assert_eq!(parse_repo_url("https://github.com/acme/site").unwrap(), repo("acme", "site"));
        assert_eq!(parse_repo_url("https://github.com/acme/site.git").unwrap(), repo("acme", "site"));
        assert_eq!(
            parse_repo_url("https://github.com/acme/site/tree/main").unwrap(),
            repo("acme", "site")
        );
        assert_eq!(parse_repo_url("git@github.com:acme/site.git").unwrap(), repo("acme", "site"));
    }

    #[test]
    fn rejects_other_hosts() {
        assert!(matches!(
            parse_repo_url("https://gitlab.com/acme/site"),
            Err(GitError::InvalidUrl)
        ));
        assert!(matches!(parse_repo_url(""), Err(GitError::InvalidUrl)));
    }

    #[test]
    fn maps_status_codes() {
        assert!(matches!(status_error(StatusCode::UNAUTHORIZED), GitError::AccessDenied));
        assert!(matches!(status_error(StatusCode::FORBIDDEN), GitError::AccessDenied));
        assert!(matches!(status_error(StatusCode::NOT_FOUND), GitError::RepoNotFound));
        assert_eq!(
            status_error(StatusCode::BAD_GATEWAY).to_string(),
            "GitHub API error: 502 Bad Gateway"
        );
    }

    #[test]
    fn decodes_api_payload() {
        let body = r#"[{
            "sha": "abc1234def",
            "commit": {
                "message": "Add pricing page\n\nDetails",
                "author": {"name": "Asha", "date": "2025-02-03T10:00:00Z"}
            },
            "html_url": "https://github.com/acme/site/commit/abc1234def"
        }]"#;
        let commits: Vec<GitHubCommit> = serde_json::from_str(body).unwrap();
        let remote = commits.into_iter().next().unwrap().into_remote().unwrap();

        assert_eq!(remote.author, "Asha");
        assert_eq!(first_line(&remote.message), "Add pricing page");
        assert_eq!(remote.committed_at.to_rfc3339(), "2025-02-03T10:00:00+00:00");
    }

    #[test]
    fn missing_author_falls_back_to_committer() {
        let body = r#"[
            {
                "sha": "aaa1111",
                "commit": {
                    "message": "Merge branch",
                    "author": null,
                    "committer": {"name": "GitHub", "date": "2025-01-10T08:00:00Z"}
                },
                "html_url": "https://github.com/acme/site/commit/aaa1111"
            },
            {
                "sha": "bbb2222",
                "commit": {"message": "Orphan", "author": null, "committer": null},
                "html_url": "https://github.com/acme/site/commit/bbb2222"
            },
            {
                "sha": "ccc3333",
                "commit": {
                    "message": "Hero section",
                    "author": {"name": "Asha", "date": "2025-01-12T08:00:00Z"}
                },
                "html_url": "https://github.com/acme/site/commit/ccc3333"
            }
        ]"#;
        let commits: Vec<GitHubCommit> = serde_json::from_str(body).unwrap();
        let remote: Vec<RemoteCommit> = commits.into_iter().filter_map(GitHubCommit::into_remote).collect();

        assert_eq!(remote.len(), 2);
        assert_eq!(remote[0].author, "GitHub");
        assert_eq!(remote[0].committed_at.to_rfc3339(), "2025-01-10T08:00:00+00:00");
        assert_eq!(newest(&remote).map(|c| c.sha.as_str()), Some("ccc3333"));
    }
}
