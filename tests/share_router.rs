use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use chrono::{TimeZone, Utc};
use serde_json::Value;
use tower::ServiceExt;

use freelance_manager::models::{Payment, PaymentType, Phase, PhaseStatus, Project};
use freelance_manager::server::share_router;
use freelance_manager::share::{ShareError, ShareStore, SharedProject};

#[derive(Clone, Default)]
struct MemoryStore {
    projects: Arc<HashMap<String, SharedProject>>,
}

impl ShareStore for MemoryStore {
    async fn project_by_token(&self, token: &str) -> Result<Option<SharedProject>, ShareError> {
        Ok(self.projects.get(token).cloned())
    }
}

fn phase(id: i32, name: &str, is_completed: bool) -> Phase {
    Phase {
        id,
        project_id: 1,
        name: name.to_string(),
        amount: 1500.0,
        description: None,
        status: PhaseStatus::Pending,
        is_completed,
        completed_features: Vec::new(),
        created_at: Utc.with_ymd_and_hms(2025, 1, id as u32, 9, 0, 0).unwrap(),
    }
}

fn advance(id: i32, amount: f64) -> Payment {
    Payment {
        id,
        project_id: 1,
        amount,
        payment_type: PaymentType::Advance,
        notes: None,
        receipt_url: None,
        date: Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap(),
        created_at: Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap(),
    }
}

fn store() -> MemoryStore {
    let mut project = Project::draft(1);
    project.id = 1;
    project.name = "Cafe <Menu> & Co".to_string();
    project.share_enabled = true;
    project.share_token = Some("tok123".to_string());

    let shared = SharedProject {
        project,
        phases: vec![phase(2, "Build", false), phase(1, "Design", true)],
        payments: vec![advance(1, 400.0)],
        designs: Vec::new(),
        commits: Vec::new(),
    };

    MemoryStore {
        projects: Arc::new(HashMap::from([("tok123".to_string(), shared)])),
    }
}

async fn get(uri: &str, upload_dir: &std::path::Path) -> (StatusCode, Vec<u8>) {
    let app = share_router(store(), upload_dir);
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn health_reports_ok() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = get("/health", dir.path()).await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn unknown_token_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = get("/share/nope", dir.path()).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["code"], "NOT_FOUND");

    let (status, _) = get("/api/share/nope", dir.path()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn share_page_escapes_project_text() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = get("/share/tok123", dir.path()).await;

    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("Cafe &lt;Menu&gt; &amp; Co"));
    assert!(!html.contains("<Menu>"));
    assert!(html.contains("Current Focus: Build"));
}

#[tokio::test]
async fn share_json_orders_phases_and_sums_advances() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = get("/api/share/tok123", dir.path()).await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["project"]["name"], "Cafe <Menu> & Co");
    assert_eq!(json["progress"]["total"], 2);
    assert_eq!(json["progress"]["completed"], 1);
    assert_eq!(json["progress"]["percent"], 50);
    assert_eq!(json["phases"][0]["name"], "Design");
    assert_eq!(json["phases"][0]["state"], "Done");
    assert_eq!(json["phases"][1]["state"], "In Progress");
    assert_eq!(json["total_advances"], 400.0);
}

#[tokio::test]
async fn uploaded_files_are_served() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("uploads")).unwrap();
    std::fs::write(dir.path().join("uploads").join("receipt.txt"), "paid").unwrap();

    let (status, body) = get("/files/uploads/receipt.txt", dir.path()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"paid");
}
