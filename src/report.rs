use anyhow::Result;
use chrono::{DateTime, Local};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::format::{currency, label, percent};
use crate::models::{Payment, Phase, Project, ProjectStatus};

const UNSPECIFIED: &str = "unspecified";
const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// A project together with the rows the report aggregates over
#[derive(Debug, Clone)]
pub struct ProjectLedger {
    pub project: Project,
    pub phases: Vec<Phase>,
    pub payments: Vec<Payment>,
}

impl ProjectLedger {
    fn value(&self) -> f64 {
        self.phases.iter().map(|p| p.amount).sum()
    }

    fn received(&self) -> f64 {
        self.payments.iter().map(|p| p.amount).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    Csv,
    Text,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Text => "txt",
        }
    }
}

/// Aggregated business metrics across every project of a profile
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportData {
    pub total_projects: usize,
    pub completed_projects: usize,
    pub ongoing_projects: usize,
    pub pending_projects: usize,
    pub total_value: f64,
    pub total_received: f64,
    pub total_pending: f64,
    pub collection_rate: f64,
    pub client_sources: HashMap<String, usize>,
    pub work_types: HashMap<String, usize>,
    pub revenue_by_work_type: HashMap<String, f64>,
}

fn key_or_unspecified(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => UNSPECIFIED.to_string(),
    }
}

/// Entries sorted by value descending, ties broken by key
pub fn ranked<V: Copy + PartialOrd>(map: &HashMap<String, V>) -> Vec<(String, V)> {
    let mut entries: Vec<(String, V)> = map.iter().map(|(k, v)| (k.clone(), *v)).collect();
    entries.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    entries
}

/// The first five ranked entries
pub fn top<V: Copy + PartialOrd>(map: &HashMap<String, V>) -> Vec<(String, V)> {
    ranked(map).into_iter().take(5).collect()
}

impl ReportData {
    pub fn compute(ledgers: &[ProjectLedger]) -> Self {
        let mut data = ReportData {
            total_projects: ledgers.len(),
            ..Default::default()
        };

        for ledger in ledgers {
            match ledger.project.status {
                ProjectStatus::Completed => data.completed_projects += 1,
                ProjectStatus::Ongoing => data.ongoing_projects += 1,
                ProjectStatus::Pending => data.pending_projects += 1,
            }

            let received = ledger.received();
            data.total_value += ledger.value();
            data.total_received += received;

            let source = key_or_unspecified(ledger.project.client_source.as_deref());
            *data.client_sources.entry(source).or_insert(0) += 1;

            let work_type = key_or_unspecified(ledger.project.work_type.as_deref());
            *data.work_types.entry(work_type.clone()).or_insert(0) += 1;
            *data.revenue_by_work_type.entry(work_type).or_insert(0.0) += received;
        }

        data.total_pending = data.total_value - data.total_received;
        data.collection_rate = if data.total_value > 0.0 {
            data.total_received / data.total_value * 100.0
        } else {
            0.0
        };

        data
    }

    /// Share of all projects in percent
    pub fn share_of_projects(&self, count: usize) -> f64 {
        if self.total_projects == 0 {
            return 0.0;
        }
        count as f64 / self.total_projects as f64 * 100.0
    }

    pub fn render(&self, format: ReportFormat, generated_at: DateTime<Local>) -> String {
        match format {
            ReportFormat::Csv => self.render_csv(generated_at),
            ReportFormat::Text => self.render_text(generated_at),
        }
    }

    pub fn render_csv(&self, generated_at: DateTime<Local>) -> String {
        let mut rows: Vec<Vec<String>> = vec![
            vec!["FREELANCE BUSINESS REPORT".into()],
            vec![format!("Generated on: {}", generated_at.format("%d %B %Y %H:%M"))],
            vec![String::new()],
            vec!["=== PROJECT OVERVIEW ===".into()],
            vec!["Metric".into(), "Value".into()],
            vec!["Total Projects".into(), self.total_projects.to_string()],
            vec!["Completed Projects".into(), self.completed_projects.to_string()],
            vec!["Ongoing Projects".into(), self.ongoing_projects.to_string()],
            vec!["Pending Projects".into(), self.pending_projects.to_string()],
            vec![String::new()],
            vec!["=== FINANCIAL SUMMARY ===".into()],
            vec!["Metric".into(), "Value".into()],
            vec!["Total Revenue Received".into(), currency(self.total_received)],
            vec!["Pending Payments".into(), currency(self.total_pending)],
            vec!["Total Project Value".into(), currency(self.total_value)],
            vec!["Collection Rate".into(), percent(self.collection_rate)],
            vec![String::new()],
            vec!["=== CLIENT SOURCES ===".into()],
            vec!["Source".into(), "Count".into(), "Percentage".into()],
        ];

        for (source, count) in ranked(&self.client_sources) {
            rows.push(vec![
                label(Some(&source)),
                count.to_string(),
                percent(self.share_of_projects(count)),
            ]);
        }

        rows.push(vec![String::new()]);
        rows.push(vec!["=== WORK TYPES ===".into()]);
        rows.push(vec!["Type".into(), "Count".into(), "Revenue".into()]);

        for (work_type, count) in ranked(&self.work_types) {
            let revenue = self.revenue_by_work_type.get(&work_type).copied().unwrap_or(0.0);
            rows.push(vec![label(Some(&work_type)), count.to_string(), currency(revenue)]);
        }

        rows.iter()
            .map(|row| row.iter().map(|f| csv_field(f)).collect::<Vec<_>>().join(","))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn render_text(&self, generated_at: DateTime<Local>) -> String {
        let mut lines: Vec<String> = vec![
            "╔════════════════════════════════════════════════════════════════╗".into(),
            "║              FREELANCE BUSINESS REPORT                         ║".into(),
            "╚════════════════════════════════════════════════════════════════╝".into(),
            String::new(),
            format!("Generated on: {}", generated_at.format("%d %B %Y %H:%M")),
            String::new(),
        ];

        section(&mut lines, "PROJECT OVERVIEW");
        lines.push(format!("  Total Projects:     {}", self.total_projects));
        lines.push(format!("  ├─ Completed:       {}", self.completed_projects));
        lines.push(format!("  ├─ Ongoing:         {}", self.ongoing_projects));
        lines.push(format!("  └─ Pending:         {}", self.pending_projects));
        lines.push(String::new());

        section(&mut lines, "FINANCIAL SUMMARY");
        lines.push(format!("  Total Revenue:      {}", currency(self.total_received)));
        lines.push(format!("  Pending Payments:   {}", currency(self.total_pending)));
        lines.push(format!("  Total Value:        {}", currency(self.total_value)));
        lines.push(format!("  Collection Rate:    {}", percent(self.collection_rate)));
        lines.push(String::new());

        section(&mut lines, "CLIENT SOURCES");
        for (source, count) in ranked(&self.client_sources) {
            lines.push(format!(
                "  {:<20} {:>3} projects ({})",
                label(Some(&source)),
                count,
                percent(self.share_of_projects(count))
            ));
        }
        lines.push(String::new());

        section(&mut lines, "WORK TYPES & REVENUE");
        for (work_type, count) in ranked(&self.work_types) {
            let revenue = self.revenue_by_work_type.get(&work_type).copied().unwrap_or(0.0);
            lines.push(format!(
                "  {:<20} {:>3} projects → {}",
                label(Some(&work_type)),
                count,
                currency(revenue)
            ));
        }
        lines.push(String::new());

        lines.push(RULE.into());
        lines.push("                    Generated by Freelance Manager".into());
        lines.push(RULE.into());

        lines.join("\n")
    }
}

fn section(lines: &mut Vec<String>, title: &str) {
    lines.push(RULE.into());
    lines.push(format!("                    {}", title));
    lines.push(RULE.into());
    lines.push(String::new());
}

// Amounts carry grouping commas, so fields are quoted when needed.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Writes rendered reports into the configured output directory
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self> {
        let path = output_dir.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }

        Ok(Self {
            output_dir: path.to_path_buf(),
        })
    }

    pub fn file_name(format: ReportFormat, generated_at: DateTime<Local>) -> String {
        format!(
            "freelance-report-{}.{}",
            generated_at.format("%Y-%m-%d"),
            format.extension()
        )
    }

    /// Renders the report and writes it, returning the written path
    pub fn write(
        &self,
        data: &ReportData,
        format: ReportFormat,
        generated_at: DateTime<Local>,
    ) -> Result<PathBuf> {
        let content = data.render(format, generated_at);
        let path = self.output_dir.join(Self::file_name(format, generated_at));

        let mut file = File::create(&path)?;
        file.write_all(content.as_bytes())?;

        tracing::info!(path = %path.display(), "report written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::tests::{payment, project};
    use crate::models::{PaymentType, PhaseStatus};
    use crate::progress::tests::phase;
    use chrono::TimeZone;

    fn ledger(
        id: i32,
        status: ProjectStatus,
        source: Option<&str>,
        work_type: Option<&str>,
        value: f64,
        received: f64,
    ) -> ProjectLedger {
        let mut p = project(id, status);
        p.client_source = source.map(str::to_string);
        p.work_type = work_type.map(str::to_string);

        let mut ph = phase(id, "Phase", None, &[]);
        ph.project_id = id;
        ph.amount = value;
        ph.status = PhaseStatus::Pending;

        let payments = if received > 0.0 {
            vec![payment(id, id, received, PaymentType::Advance)]
        } else {
            Vec::new()
        };

        ProjectLedger {
            project: p,
            phases: vec![ph],
            payments,
        }
    }

    fn sample() -> ReportData {
        ReportData::compute(&[
            ledger(1, ProjectStatus::Ongoing, Some("referral"), Some("web_development"), 50000.0, 20000.0),
            ledger(2, ProjectStatus::Completed, Some("referral"), Some("web_development"), 30000.0, 30000.0),
            ledger(3, ProjectStatus::Pending, None, Some("logo_design"), 20000.0, 0.0),
        ])
    }

    fn generated_at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn aggregates_counts_and_money() {
        let data = sample();
        assert_eq!(data.total_projects, 3);
        assert_eq!(data.ongoing_projects, 1);
        assert_eq!(data.completed_projects, 1);
        assert_eq!(data.pending_projects, 1);
        assert_eq!(data.total_value, 100000.0);
        assert_eq!(data.total_received, 50000.0);
        assert_eq!(data.total_pending, 50000.0);
        assert_eq!(data.collection_rate, 50.0);
        assert_eq!(data.client_sources.get("referral"), Some(&2));
        assert_eq!(data.client_sources.get("unspecified"), Some(&1));
        assert_eq!(data.revenue_by_work_type.get("web_development"), Some(&50000.0));
        assert_eq!(data.revenue_by_work_type.get("logo_design"), Some(&0.0));
    }

    #[test]
    fn empty_report_has_zero_collection_rate() {
        let data = ReportData::compute(&[]);
        assert_eq!(data.collection_rate, 0.0);
        assert_eq!(data.share_of_projects(0), 0.0);
    }

    #[test]
    fn top_entries_rank_by_value_then_key() {
        let mut map = HashMap::new();
        for (k, v) in [("a", 1), ("b", 3), ("c", 3), ("d", 2), ("e", 1), ("f", 1)] {
            map.insert(k.to_string(), v);
        }
        let keys: Vec<String> = top(&map).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "c", "d", "a", "e"]);
    }

    #[test]
    fn csv_quotes_grouped_amounts() {
        let csv = sample().render_csv(generated_at());
        assert!(csv.starts_with("FREELANCE BUSINESS REPORT\nGenerated on: 01 June 2025 09:30"));
        assert!(csv.contains("Total Revenue Received,\"₹50,000\""));
        assert!(csv.contains("Collection Rate,50.0%"));
        assert!(csv.contains("Referral,2,66.7%"));
        assert!(csv.contains("Web Development,2,\"₹50,000\""));
    }

    #[test]
    fn text_report_lists_sections() {
        let text = sample().render_text(generated_at());
        assert!(text.contains("PROJECT OVERVIEW"));
        assert!(text.contains("  ├─ Completed:       1"));
        assert!(text.contains("  Collection Rate:    50.0%"));
        assert!(text.contains(&format!("  {:<20} {:>3} projects (33.3%)", "Unspecified", 1)));
        assert!(text.contains("Logo Design"));
    }

    #[test]
    fn writer_creates_dated_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("reports");
        let writer = ReportWriter::new(&out).unwrap();

        let path = writer.write(&sample(), ReportFormat::Csv, generated_at()).unwrap();
        assert_eq!(path, out.join("freelance-report-2025-06-01.csv"));
        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("=== WORK TYPES ==="));
    }
}
