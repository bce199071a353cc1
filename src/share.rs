//! Read-only client share links.
//!
//! A project with sharing enabled is reachable through its token. The view
//! built here backs both the HTML page and the JSON form of the share server.

use std::future::Future;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use thiserror::Error;

use crate::db::Database;
use crate::finance::{total_advances, total_paid};
use crate::format::{currency, first_line, label, short_date};
use crate::git::{GitHubClient, sync_commits};
use crate::models::{Commit, Design, Payment, Phase, Project};
use crate::progress::{ProjectProgress, feature_progress, order_phases, sorted_features};

pub const TOKEN_LEN: usize = 12;
const TOKEN_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";
const RECENT_COMMITS: usize = 5;

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("Shared project not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Serialize)]
struct ApiErrorBody {
    code: &'static str,
    message: &'static str,
}

impl IntoResponse for ShareError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ShareError::NotFound => (
                StatusCode::NOT_FOUND,
                ApiErrorBody {
                    code: "NOT_FOUND",
                    message: "This share link is invalid or has been disabled.",
                },
            ),
            ShareError::Database(e) => {
                tracing::error!(error = %e, "share lookup failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An internal server error occurred.",
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// A random URL-safe token
pub fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    (0..TOKEN_LEN)
        .map(|_| TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())] as char)
        .collect()
}

pub fn share_url(public_url: &str, token: &str) -> String {
    format!("{}/share/{}", public_url.trim_end_matches('/'), token)
}

/// Turns sharing on, keeping an existing token so old links keep working
pub async fn enable_sharing(db: &Database, project_id: i32) -> Result<String, sqlx::Error> {
    let status = db.get_share_status(project_id).await?;
    let token = status
        .share_token
        .filter(|t| !t.is_empty())
        .unwrap_or_else(generate_token);

    db.set_sharing(project_id, &token, true).await?;
    tracing::info!(project_id, "sharing enabled");

    Ok(token)
}

pub async fn disable_sharing(db: &Database, project_id: i32) -> Result<(), sqlx::Error> {
    db.disable_sharing(project_id).await?;
    tracing::info!(project_id, "sharing disabled");
    Ok(())
}

/// Everything the share page shows for one project
#[derive(Debug, Clone)]
pub struct SharedProject {
    pub project: Project,
    pub phases: Vec<Phase>,
    pub payments: Vec<Payment>,
    pub designs: Vec<Design>,
    pub commits: Vec<Commit>,
}

/// Source of shared projects for the share server
pub trait ShareStore: Clone + Send + Sync + 'static {
    fn project_by_token(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<Option<SharedProject>, ShareError>> + Send;
}

#[derive(Clone)]
pub struct DbShareStore {
    db: Database,
    github: GitHubClient,
}

impl DbShareStore {
    pub fn new(db: Database, github: GitHubClient) -> Self {
        Self { db, github }
    }
}

impl ShareStore for DbShareStore {
    async fn project_by_token(&self, token: &str) -> Result<Option<SharedProject>, ShareError> {
        let Some(project) = self.db.get_project_by_share_token(token).await? else {
            return Ok(None);
        };

        let commits = match project.git_repo.as_deref().filter(|r| !r.is_empty()) {
            Some(repo_url) => {
                match sync_commits(&self.db, &self.github, project.id, repo_url, None).await {
                    Ok(commits) => commits,
                    Err(e) => {
                        tracing::warn!(project_id = project.id, error = %e, "commit sync failed, using stored commits");
                        self.db.get_commits_by_project(project.id).await?
                    }
                }
            }
            None => self.db.get_commits_by_project(project.id).await?,
        };

        Ok(Some(SharedProject {
            phases: self.db.get_phases_by_project(project.id).await?,
            payments: self.db.get_payments_by_project(project.id).await?,
            designs: self.db.get_designs_by_project(project.id).await?,
            commits,
            project,
        }))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectHeader {
    pub name: String,
    pub status: String,
    pub work_type: String,
    pub initials: String,
    pub logo_url: Option<String>,
    pub git_repo: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureView {
    pub name: String,
    pub done: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PhaseView {
    pub name: String,
    pub amount: f64,
    pub state: &'static str,
    pub paid: bool,
    pub feature_progress: u8,
    pub features: Vec<FeatureView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentView {
    pub label: &'static str,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
    pub receipt_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DesignView {
    pub title: String,
    pub login: String,
    pub url: String,
    /// Listed apart from the login slots
    pub custom: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommitView {
    pub sha: String,
    pub message: String,
    pub author: String,
    pub committed_at: DateTime<Utc>,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShareView {
    pub project: ProjectHeader,
    pub progress: ProjectProgress,
    pub phases: Vec<PhaseView>,
    pub payments: Vec<PaymentView>,
    pub total_paid: f64,
    pub total_advances: f64,
    pub designs: Vec<DesignView>,
    pub commits: Vec<CommitView>,
}

impl ShareView {
    pub fn build(shared: SharedProject) -> Self {
        let SharedProject {
            project,
            mut phases,
            payments,
            designs,
            mut commits,
        } = shared;

        order_phases(&mut phases);
        let progress = ProjectProgress::from_phases(&phases, project.progress_status.as_deref());

        let phase_views = phases
            .iter()
            .enumerate()
            .map(|(i, phase)| PhaseView {
                name: phase.name.clone(),
                amount: phase.amount,
                state: progress.state_of(i, phase).label(),
                paid: phase.is_paid(),
                feature_progress: feature_progress(phase),
                features: sorted_features(phase)
                    .into_iter()
                    .map(|(name, done)| FeatureView { name, done })
                    .collect(),
            })
            .collect();

        let payment_views = payments
            .iter()
            .map(|p| PaymentView {
                label: p.payment_type.display_label(),
                amount: p.amount,
                date: p.date,
                notes: p.notes.clone(),
                receipt_url: p.receipt_url.clone(),
            })
            .collect();

        let design_views = designs
            .iter()
            .map(|d| match d.slot() {
                Some(slot) => DesignView {
                    title: d.title.clone(),
                    login: slot.name().to_string(),
                    url: d.url.clone(),
                    custom: false,
                },
                None => DesignView {
                    title: d.display_title(),
                    login: "Custom".to_string(),
                    url: d.url.clone(),
                    custom: true,
                },
            })
            .collect();

        commits.sort_by(|a, b| b.committed_at.cmp(&a.committed_at));
        let commit_views = commits
            .iter()
            .take(RECENT_COMMITS)
            .map(|c| CommitView {
                sha: c.short_sha().to_string(),
                message: first_line(&c.message).to_string(),
                author: c.author.clone(),
                committed_at: c.committed_at,
                url: c.url.clone(),
            })
            .collect();

        Self {
            project: ProjectHeader {
                initials: project.initials(),
                status: label(Some(project.status.as_str())),
                work_type: label(project.work_type.as_deref()),
                name: project.name,
                logo_url: project.logo_url,
                git_repo: project.git_repo,
            },
            progress,
            phases: phase_views,
            total_paid: total_paid(&payments),
            total_advances: total_advances(&payments),
            payments: payment_views,
            designs: design_views,
            commits: commit_views,
        }
    }

    /// Standalone HTML page; every interpolated value is escaped
    pub fn render_html(&self) -> String {
        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
        html.push_str(&format!("<title>{} | Project Progress</title>\n", escape_html(&self.project.name)));
        html.push_str(STYLE);
        html.push_str("</head>\n<body>\n<main>\n");

        html.push_str("<header>\n");
        match &self.project.logo_url {
            Some(url) => html.push_str(&format!(
                "<img class=\"logo\" src=\"{}\" alt=\"\">\n",
                escape_html(url)
            )),
            None => html.push_str(&format!(
                "<div class=\"logo\">{}</div>\n",
                escape_html(&self.project.initials)
            )),
        }
        html.push_str(&format!(
            "<div><h1>{}</h1><p>{} &middot; {}</p></div>\n</header>\n",
            escape_html(&self.project.name),
            escape_html(&self.project.status),
            escape_html(&self.project.work_type)
        ));

        html.push_str(&format!(
            "<section class=\"progress\">\n<h2>{}</h2>\n<div class=\"bar\"><span style=\"width:{}%\"></span></div>\n<p>{}% &middot; {} of {} phases complete</p>\n</section>\n",
            escape_html(&self.progress.status_text),
            self.progress.percent,
            self.progress.percent,
            self.progress.completed,
            self.progress.total
        ));

        html.push_str("<section>\n<h2>Phases</h2>\n");
        if self.phases.is_empty() {
            html.push_str("<p class=\"muted\">No phases yet.</p>\n");
        }
        for phase in &self.phases {
            html.push_str(&format!(
                "<article class=\"phase\">\n<h3>{} <small>{}</small></h3>\n<p>{}{}</p>\n",
                escape_html(&phase.name),
                phase.state,
                escape_html(&currency(phase.amount)),
                if phase.paid { " &middot; Paid" } else { "" }
            ));
            if !phase.features.is_empty() {
                html.push_str("<ul>\n");
                for feature in &phase.features {
                    html.push_str(&format!(
                        "<li class=\"{}\">{}</li>\n",
                        if feature.done { "done" } else { "todo" },
                        escape_html(&feature.name)
                    ));
                }
                html.push_str("</ul>\n");
            }
            html.push_str("</article>\n");
        }
        html.push_str("</section>\n");

        html.push_str(&format!(
            "<section>\n<h2>Payments</h2>\n<p>Total paid {} &middot; Advances {}</p>\n<table>\n",
            escape_html(&currency(self.total_paid)),
            escape_html(&currency(self.total_advances))
        ));
        for payment in &self.payments {
            let receipt = payment
                .receipt_url
                .as_deref()
                .map(|url| format!("<a href=\"{}\">Receipt</a>", escape_html(url)))
                .unwrap_or_default();
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                escape_html(&short_date(&payment.date)),
                payment.label,
                escape_html(&currency(payment.amount)),
                escape_html(payment.notes.as_deref().unwrap_or("")),
                receipt
            ));
        }
        html.push_str("</table>\n</section>\n");

        let (custom, slotted): (Vec<&DesignView>, Vec<&DesignView>) =
            self.designs.iter().partition(|d| d.custom);
        if !slotted.is_empty() {
            html.push_str("<section>\n<h2>Designs</h2>\n<ul>\n");
            for design in slotted {
                html.push_str(&format!(
                    "<li><a href=\"{}\">{}</a> <small>{}</small></li>\n",
                    escape_html(&design.url),
                    escape_html(&design.title),
                    escape_html(&design.login)
                ));
            }
            html.push_str("</ul>\n</section>\n");
        }
        if !custom.is_empty() {
            html.push_str("<section>\n<h2>Custom Designs</h2>\n<ul>\n");
            for design in custom {
                html.push_str(&format!(
                    "<li><a href=\"{}\">{}</a></li>\n",
                    escape_html(&design.url),
                    escape_html(&design.title)
                ));
            }
            html.push_str("</ul>\n</section>\n");
        }

        if !self.commits.is_empty() {
            html.push_str("<section>\n<h2>Recent Activity</h2>\n<ul>\n");
            for commit in &self.commits {
                html.push_str(&format!(
                    "<li><a href=\"{}\"><code>{}</code></a> {} <small>{} &middot; {}</small></li>\n",
                    escape_html(&commit.url),
                    escape_html(&commit.sha),
                    escape_html(&commit.message),
                    escape_html(&commit.author),
                    escape_html(&short_date(&commit.committed_at))
                ));
            }
            html.push_str("</ul>\n</section>\n");
        }

        html.push_str("</main>\n</body>\n</html>\n");
        html
    }
}

const STYLE: &str = "<style>\
body{font-family:system-ui,sans-serif;background:#0f172a;color:#e2e8f0;margin:0}\
main{max-width:760px;margin:0 auto;padding:24px}\
header{display:flex;gap:16px;align-items:center}\
.logo{width:56px;height:56px;border-radius:12px;background:#1e293b;display:flex;align-items:center;justify-content:center;font-weight:700}\
.bar{background:#1e293b;border-radius:8px;height:10px;overflow:hidden}\
.bar span{display:block;height:100%;background:#22c55e}\
.phase{border:1px solid #1e293b;border-radius:12px;padding:12px;margin:8px 0}\
.done{text-decoration:line-through;color:#94a3b8}\
.muted,small{color:#94a3b8}\
table{width:100%;border-collapse:collapse}td{padding:6px;border-bottom:1px solid #1e293b}\
a{color:#60a5fa}\
</style>\n";

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::tests::{payment, project};
    use crate::models::{PaymentType, PhaseStatus, ProjectStatus};
    use crate::progress::tests::phase;
    use chrono::{Duration, TimeZone};

    fn commit(id: i32, days: i64) -> Commit {
        Commit {
            id,
            project_id: 1,
            sha: format!("{:07}abcdef", id),
            message: format!("Commit {}\n\nbody", id),
            author: "Asha".to_string(),
            committed_at: Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap() + Duration::days(days),
            url: format!("https://github.com/acme/site/commit/{}", id),
        }
    }

    fn shared() -> SharedProject {
        let mut paid = phase(1, "Design", Some("Wireframes, Mockups"), &["Mockups", "Wireframes"]);
        paid.status = PhaseStatus::Paid;
        SharedProject {
            project: project(1, ProjectStatus::Ongoing),
            phases: vec![phase(2, "Build", Some("API, UI"), &["UI"]), paid],
            payments: vec![
                payment(1, 1, 1000.0, PaymentType::PhasePayment),
                payment(2, 1, 400.0, PaymentType::Advance),
            ],
            designs: vec![],
            commits: (1..=7).map(|i| commit(i, i as i64)).collect(),
        }
    }

    #[test]
    fn tokens_are_url_safe() {
        for _ in 0..50 {
            let token = generate_token();
            assert_eq!(token.len(), TOKEN_LEN);
            assert!(token.bytes().all(|b| TOKEN_ALPHABET.contains(&b)));
        }
        assert_ne!(generate_token(), generate_token());
    }

    #[test]
    fn share_url_joins_public_url() {
        assert_eq!(
            share_url("https://freelance.example.com/", "abc_DEF-123"),
            "https://freelance.example.com/share/abc_DEF-123"
        );
    }

    #[test]
    fn view_orders_phases_and_tracks_focus() {
        let view = ShareView::build(shared());

        assert_eq!(view.phases[0].name, "Design");
        assert_eq!(view.phases[0].state, "Done");
        assert!(view.phases[0].paid);
        assert_eq!(view.phases[1].state, "In Progress");
        assert_eq!(view.phases[1].features[0].name, "UI");
        assert!(view.phases[1].features[0].done);
        assert_eq!(view.progress.percent, 50);
        assert_eq!(view.progress.status_text, "Current Focus: Build");
    }

    #[test]
    fn view_totals_payments_and_labels_them() {
        let view = ShareView::build(shared());
        assert_eq!(view.total_paid, 1400.0);
        assert_eq!(view.total_advances, 400.0);
        assert_eq!(view.payments[0].label, "Phase Completion");
        assert_eq!(view.payments[1].label, "Advance");
    }

    #[test]
    fn view_keeps_five_newest_commits() {
        let view = ShareView::build(shared());
        assert_eq!(view.commits.len(), 5);
        assert_eq!(view.commits[0].message, "Commit 7");
        assert_eq!(view.commits[0].sha, "0000007");
    }

    #[test]
    fn html_escapes_user_text() {
        let mut bundle = shared();
        bundle.project.name = "<script>alert('x')</script>".to_string();
        let html = ShareView::build(bundle).render_html();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
    }

    #[test]
    fn custom_designs_are_listed_on_their_own() {
        let mut bundle = shared();
        let design = |id: i32, title: &str, login_type: &str| Design {
            id,
            project_id: 1,
            title: title.to_string(),
            url: format!("https://figma.com/file/{}", id),
            login_type: login_type.to_string(),
            created_at: Utc::now(),
        };
        bundle.designs = vec![
            design(1, "Admin screens", "admin"),
            design(2, "Onboarding", "custom"),
            design(3, "", "custom"),
        ];
        let view = ShareView::build(bundle);

        assert!(!view.designs[0].custom);
        assert_eq!(view.designs[0].login, "Admin Login");
        assert!(view.designs[1].custom);
        assert_eq!(view.designs[1].title, "Onboarding");
        assert_eq!(view.designs[2].title, "Custom Design");

        let html = view.render_html();
        let custom_section = html.find("<h2>Custom Designs</h2>").unwrap();
        assert!(html.find("Admin screens").unwrap() < custom_section);
        assert!(html.find("Onboarding").unwrap() > custom_section);
    }

    #[test]
    fn not_found_maps_to_404() {
        let response = ShareError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
