use crossterm::event::{KeyCode, KeyEvent};
use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::finance::ProjectFinancials;
use crate::format::{currency, date_time, first_line, label, short_date};
use crate::models::{Commit, Design, LoginType, Payment, Phase, Project};
use crate::progress::{feature_counts, order_phases, sorted_features, PhaseState, ProjectProgress};
use crate::share::share_url;
use crate::ui::components::form::{render_form, FormEvent, FormField, FormState};
use crate::ui::components::popup::{centered_rect, render_confirm};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Phases,
    Payments,
    Designs,
    Commits,
    Share,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Phases,
        Section::Payments,
        Section::Designs,
        Section::Commits,
        Section::Share,
    ];

    fn title(&self) -> &'static str {
        match self {
            Section::Phases => "Phases",
            Section::Payments => "Payments",
            Section::Designs => "Designs",
            Section::Commits => "Commits",
            Section::Share => "Share",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Confirm {
    DeletePhase(i32),
    DeletePayment(i32),
    DeleteDesign(i32),
}

/// Everything stored for one project
#[derive(Debug, Clone)]
pub struct ProjectRecord {
    pub project: Project,
    pub phases: Vec<Phase>,
    pub payments: Vec<Payment>,
    pub designs: Vec<Design>,
    pub commits: Vec<Commit>,
}

pub struct ProjectDetailState {
    pub project: Project,
    phases: Vec<Phase>,
    payments: Vec<Payment>,
    designs: Vec<Design>,
    commits: Vec<Commit>,
    financials: ProjectFinancials,
    progress: ProjectProgress,
    share_url: Option<String>,
    section: Section,
    list_state: ListState,
    /// Selected feature of the selected phase while ticking features
    feature_cursor: Option<usize>,
    confirm: Option<Confirm>,
    status_form: Option<FormState>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailAction {
    Back,
    AddPhase(i32),
    EditFeatures(i32),
    MarkPhasePaid(i32),
    SetPhaseCompleted(i32, bool),
    SetFeature { phase_id: i32, feature: String, done: bool },
    DeletePhase(i32),
    AddAdvance(i32),
    DeletePayment(i32),
    /// `None` when every login slot is taken and the design is custom
    AddDesign(i32, Option<LoginType>),
    DeleteDesign(i32),
    ConnectRepo(i32),
    SyncCommits(i32),
    EnableSharing(i32),
    DisableSharing(i32),
    UpdateProgressStatus(i32, String),
    EmailShareLink(i32),
}

impl ProjectDetailState {
    pub fn new(record: ProjectRecord, public_url: &str, section: Section) -> Self {
        let ProjectRecord {
            project,
            mut phases,
            payments,
            designs,
            commits,
        } = record;

        order_phases(&mut phases);
        let financials = ProjectFinancials::compute(&phases, &payments);
        let progress = ProjectProgress::from_phases(&phases, project.progress_status.as_deref());
        let share_url = project
            .share_token
            .as_deref()
            .filter(|_| project.share_enabled)
            .map(|token| share_url(public_url, token));

        let mut state = Self {
            project,
            phases,
            payments,
            designs,
            commits,
            financials,
            progress,
            share_url,
            section,
            list_state: ListState::default(),
            feature_cursor: None,
            confirm: None,
            status_form: None,
        };
        state.reset_selection();
        state
    }

    pub fn project_id(&self) -> i32 {
        self.project.id
    }

    /// Keeps the cursor where it was before the project was reloaded
    pub fn keep_position(&mut self, previous: &ProjectDetailState) {
        if previous.project.id != self.project.id || previous.section != self.section {
            return;
        }
        let count = self.row_count();
        if let Some(i) = previous.list_state.selected().filter(|_| count > 0) {
            self.list_state.select(Some(i.min(count - 1)));
        }
        // Ticking a feature moves it between groups, so follow it by name
        self.feature_cursor = match (previous.selected_feature(), self.selected_phase()) {
            (Some((phase_id, name, _)), Some(phase)) if phase.id == phase_id => sorted_features(phase)
                .iter()
                .position(|(f, _)| *f == name),
            _ => None,
        };
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn phase(&self, phase_id: i32) -> Option<&Phase> {
        self.phases.iter().find(|p| p.id == phase_id)
    }

    pub fn share_url(&self) -> Option<&str> {
        self.share_url.as_deref()
    }

    fn row_count(&self) -> usize {
        match self.section {
            Section::Phases => self.phases.len(),
            Section::Payments => self.payments.len(),
            Section::Designs => self.designs.len(),
            Section::Commits => self.commits.len(),
            Section::Share => 0,
        }
    }

    fn reset_selection(&mut self) {
        self.feature_cursor = None;
        self.list_state
            .select(if self.row_count() > 0 { Some(0) } else { None });
    }

    fn switch_section(&mut self, forward: bool) {
        let len = Section::ALL.len();
        let i = self.section.index();
        let next = if forward { (i + 1) % len } else { (i + len - 1) % len };
        self.section = Section::ALL[next];
        self.reset_selection();
    }

    fn move_selection(&mut self, forward: bool) {
        let count = self.row_count();
        if count == 0 {
            return;
        }
        let i = match (self.list_state.selected(), forward) {
            (Some(i), true) if i + 1 < count => i + 1,
            (_, true) => 0,
            (Some(0) | None, false) => count - 1,
            (Some(i), false) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    fn selected_phase(&self) -> Option<&Phase> {
        match self.section {
            Section::Phases => self.list_state.selected().and_then(|i| self.phases.get(i)),
            _ => None,
        }
    }

    fn selected_design(&self) -> Option<&Design> {
        match self.section {
            Section::Designs => self.list_state.selected().and_then(|i| self.designs.get(i)),
            _ => None,
        }
    }

    fn selected_payment(&self) -> Option<&Payment> {
        match self.section {
            Section::Payments => self.list_state.selected().and_then(|i| self.payments.get(i)),
            _ => None,
        }
    }

    /// First login screen without a design
    fn free_design_slot(&self) -> Option<LoginType> {
        LoginType::ALL
            .into_iter()
            .find(|slot| !self.designs.iter().any(|d| d.slot() == Some(*slot)))
    }

    fn selected_feature(&self) -> Option<(i32, String, bool)> {
        let phase = self.selected_phase()?;
        let (name, done) = sorted_features(phase).into_iter().nth(self.feature_cursor?)?;
        Some((phase.id, name, done))
    }
}

pub fn render_project_detail<B: Backend>(f: &mut Frame<B>, state: &mut ProjectDetailState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(4),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(f.size());

    render_header(f, state, chunks[0]);
    render_money(f, state, chunks[1]);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(state.progress.status_text.as_str()))
        .gauge_style(Style::default().fg(Color::Green))
        .percent(u16::from(state.progress.percent))
        .label(format!(
            "{}% ({}/{} phases)",
            state.progress.percent, state.progress.completed, state.progress.total
        ));
    f.render_widget(gauge, chunks[2]);

    let tabs = Tabs::new(Section::ALL.iter().map(|s| Spans::from(s.title())).collect())
        .select(state.section.index())
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, chunks[3]);

    match state.section {
        Section::Phases => render_phases(f, state, chunks[4]),
        Section::Payments => render_payments(f, state, chunks[4]),
        Section::Designs => render_designs(f, state, chunks[4]),
        Section::Commits => render_commits(f, state, chunks[4]),
        Section::Share => render_share(f, state, chunks[4]),
    }

    let help = Paragraph::new(help_text(state))
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::TOP));
    f.render_widget(help, chunks[5]);

    match state.confirm {
        Some(Confirm::DeletePhase(_)) => {
            render_confirm(f, "Confirm Delete", &["Delete this phase?"]);
        }
        Some(Confirm::DeletePayment(_)) => {
            render_confirm(f, "Confirm Delete", &["Delete this payment?"]);
        }
        Some(Confirm::DeleteDesign(_)) => {
            render_confirm(f, "Confirm Delete", &["Remove this design link?"]);
        }
        None => {}
    }

    if let Some(form) = &state.status_form {
        let area = centered_rect(70, 50, f.size());
        f.render_widget(tui::widgets::Clear, area);
        render_form(f, area, form);
    }
}

fn render_header<B: Backend>(f: &mut Frame<B>, state: &ProjectDetailState, area: Rect) {
    let project = &state.project;
    let lines = vec![
        Spans::from(vec![
            Span::styled(
                format!("[{}] ", project.initials()),
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            ),
            Span::styled(project.name.as_str(), Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(format!("  {}", label(Some(project.status.as_str())))),
        ]),
        Spans::from(Span::styled(
            format!(
                "Client: {} | Source: {} | Work: {}{}",
                project.client_email.as_deref().unwrap_or("-"),
                label(project.client_source.as_deref()),
                label(project.work_type.as_deref()),
                project
                    .referral_name
                    .as_deref()
                    .map(|r| format!(" | Referred by {}", r))
                    .unwrap_or_default(),
            ),
            Style::default().fg(Color::Gray),
        )),
    ];
    let header = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Project"));
    f.render_widget(header, area);
}

fn render_money<B: Backend>(f: &mut Frame<B>, state: &ProjectDetailState, area: Rect) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4].as_ref())
        .split(area);

    let money = &state.financials;
    let figures = [
        ("Total Value", money.total_phase_amount, Color::White),
        ("Received", money.received, Color::Green),
        ("Advances", money.advances, Color::Cyan),
        ("Remaining", money.remaining, Color::Yellow),
    ];
    for ((title, amount, color), area) in figures.into_iter().zip(cards.iter()) {
        let card = Paragraph::new(Span::styled(currency(amount), Style::default().fg(color)))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(card, *area);
    }
}

fn highlight() -> Style {
    Style::default().bg(Color::Blue).fg(Color::White).add_modifier(Modifier::BOLD)
}

fn render_phases<B: Backend>(f: &mut Frame<B>, state: &mut ProjectDetailState, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)].as_ref())
        .split(area);

    let items: Vec<ListItem> = state
        .phases
        .iter()
        .enumerate()
        .map(|(i, phase)| {
            let phase_state = state.progress.state_of(i, phase);
            let color = match phase_state {
                PhaseState::Done => Color::Green,
                PhaseState::InProgress => Color::Yellow,
                PhaseState::Upcoming => Color::Gray,
            };
            let (done, total) = feature_counts(phase);
            let features = if total > 0 {
                format!(" | {}/{} features", done, total)
            } else {
                String::new()
            };
            ListItem::new(Spans::from(vec![
                Span::styled(format!("{:<12}", phase_state.label()), Style::default().fg(color)),
                Span::raw(format!("{} | {}", phase.name, currency(phase.amount))),
                Span::styled(
                    if phase.is_paid() { " | Paid" } else { " | Unpaid" },
                    Style::default().fg(if phase.is_paid() { Color::Green } else { Color::Red }),
                ),
                Span::raw(features),
            ]))
        })
        .collect();

    let title = if state.phases.is_empty() { "No phases yet" } else { "Phases" };
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(highlight());
    f.render_stateful_widget(list, columns[0], &mut state.list_state);

    let mut feature_state = ListState::default();
    feature_state.select(state.feature_cursor);
    let features: Vec<ListItem> = state
        .selected_phase()
        .map(sorted_features)
        .unwrap_or_default()
        .into_iter()
        .map(|(name, done)| {
            let (mark, style) = if done {
                ("[x] ", Style::default().fg(Color::Green))
            } else {
                ("[ ] ", Style::default())
            };
            ListItem::new(Span::styled(format!("{}{}", mark, name), style))
        })
        .collect();
    let features_title = if state.feature_cursor.is_some() {
        "Features (Space to tick)"
    } else {
        "Features"
    };
    let features = List::new(features)
        .block(Block::default().borders(Borders::ALL).title(features_title))
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    f.render_stateful_widget(features, columns[1], &mut feature_state);
}

fn render_payments<B: Backend>(f: &mut Frame<B>, state: &mut ProjectDetailState, area: Rect) {
    let items: Vec<ListItem> = state
        .payments
        .iter()
        .map(|p| {
            let mut spans = vec![
                Span::raw(format!("{} | ", short_date(&p.date))),
                Span::styled(
                    format!("{:<16}", p.payment_type.display_label()),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(currency(p.amount), Style::default().fg(Color::Green)),
            ];
            if let Some(notes) = &p.notes {
                spans.push(Span::raw(format!(" | {}", notes)));
            }
            if let Some(url) = &p.receipt_url {
                spans.push(Span::styled(format!(" | {}", url), Style::default().fg(Color::Gray)));
            }
            ListItem::new(Spans::from(spans))
        })
        .collect();

    let title = if state.payments.is_empty() { "No payments yet" } else { "Payments" };
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(highlight());
    f.render_stateful_widget(list, area, &mut state.list_state);
}

fn render_designs<B: Backend>(f: &mut Frame<B>, state: &mut ProjectDetailState, area: Rect) {
    let items: Vec<ListItem> = state
        .designs
        .iter()
        .map(|d| {
            let (kind, title) = match d.slot() {
                Some(slot) => (slot.name().to_string(), d.title.clone()),
                None => ("Custom".to_string(), d.display_title()),
            };
            ListItem::new(Spans::from(vec![
                Span::styled(format!("{:<14}", kind), Style::default().fg(Color::Cyan)),
                Span::raw(format!("{} | ", title)),
                Span::styled(d.url.as_str(), Style::default().fg(Color::Gray)),
            ]))
        })
        .collect();

    let missing: Vec<&str> = LoginType::ALL
        .iter()
        .filter(|slot| !state.designs.iter().any(|d| d.slot() == Some(**slot)))
        .map(|slot| slot.name())
        .collect();
    let title = if missing.is_empty() {
        "Designs".to_string()
    } else {
        format!("Designs (missing: {})", missing.join(", "))
    };

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(highlight());
    f.render_stateful_widget(list, area, &mut state.list_state);
}

fn render_commits<B: Backend>(f: &mut Frame<B>, state: &mut ProjectDetailState, area: Rect) {
    let items: Vec<ListItem> = state
        .commits
        .iter()
        .map(|c| {
            ListItem::new(Spans::from(vec![
                Span::styled(format!("{} ", c.short_sha()), Style::default().fg(Color::Yellow)),
                Span::raw(first_line(&c.message).to_string()),
                Span::styled(
                    format!(" | {} | {}", c.author, date_time(&c.committed_at)),
                    Style::default().fg(Color::Gray),
                ),
            ]))
        })
        .collect();

    let title = match &state.project.git_repo {
        Some(repo) => format!("Commits of {}", repo),
        None => "No repository connected".to_string(),
    };
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(highlight());
    f.render_stateful_widget(list, area, &mut state.list_state);
}

fn render_share<B: Backend>(f: &mut Frame<B>, state: &ProjectDetailState, area: Rect) {
    let status = state
        .project
        .progress_status
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or("Not set");

    let lines = match &state.share_url {
        Some(url) => vec![
            Spans::from(Span::styled("Sharing is ON", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))),
            Spans::from(""),
            Spans::from(vec![Span::raw("Link: "), Span::styled(url.as_str(), Style::default().fg(Color::Cyan))]),
            Spans::from(format!("Progress status: {}", status)),
            Spans::from(""),
            Spans::from(Span::styled(
                "Clients see progress, phases, payments, designs and recent commits.",
                Style::default().fg(Color::Gray),
            )),
        ],
        None => vec![
            Spans::from(Span::styled("Sharing is OFF", Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD))),
            Spans::from(""),
            Spans::from(format!("Progress status: {}", status)),
            Spans::from(""),
            Spans::from("Turn sharing on to create a read-only link for your client."),
        ],
    };

    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Client Share Link"));
    f.render_widget(panel, area);
}

fn help_text(state: &ProjectDetailState) -> &'static str {
    if state.feature_cursor.is_some() {
        return "<Up/Down> Feature | <Space> Tick | <Esc> Done";
    }
    match state.section {
        Section::Phases => {
            "<Tab> Section | <N> Add | <P> Mark paid | <C> Complete | <F> Features | <E> Edit features | <D> Delete | <Esc> Back"
        }
        Section::Payments => "<Tab> Section | <N> Record advance | <D> Delete | <Esc> Back",
        Section::Designs => "<Tab> Section | <N> Add design | <D> Delete | <Esc> Back",
        Section::Commits => "<Tab> Section | <G> Connect repository | <R> Refresh | <Esc> Back",
        Section::Share => "<Tab> Section | <T> Toggle sharing | <U> Progress status | <M> Email link | <Esc> Back",
    }
}

pub fn handle_input(state: &mut ProjectDetailState, key: KeyEvent) -> Option<DetailAction> {
    let project_id = state.project.id;

    if let Some(form) = &mut state.status_form {
        return match form.handle_key(key)? {
            FormEvent::Cancel => {
                state.status_form = None;
                None
            }
            FormEvent::Save => {
                let text = form.value(PROGRESS_STATUS).to_string();
                state.status_form = None;
                Some(DetailAction::UpdateProgressStatus(project_id, text))
            }
        };
    }

    if let Some(confirm) = state.confirm {
        match key.code {
            KeyCode::Char('y') => {
                state.confirm = None;
                return Some(match confirm {
                    Confirm::DeletePhase(id) => DetailAction::DeletePhase(id),
                    Confirm::DeletePayment(id) => DetailAction::DeletePayment(id),
                    Confirm::DeleteDesign(id) => DetailAction::DeleteDesign(id),
                });
            }
            KeyCode::Char('n') | KeyCode::Esc => state.confirm = None,
            _ => {}
        }
        return None;
    }

    if let Some(cursor) = state.feature_cursor {
        let count = state.selected_phase().map(|p| sorted_features(p).len()).unwrap_or(0);
        match key.code {
            KeyCode::Esc => state.feature_cursor = None,
            KeyCode::Down if count > 0 => state.feature_cursor = Some((cursor + 1) % count),
            KeyCode::Up if count > 0 => state.feature_cursor = Some((cursor + count - 1) % count),
            KeyCode::Char(' ') | KeyCode::Enter => {
                let (phase_id, feature, done) = state.selected_feature()?;
                return Some(DetailAction::SetFeature {
                    phase_id,
                    feature,
                    done: !done,
                });
            }
            _ => {}
        }
        return None;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => return Some(DetailAction::Back),
        KeyCode::Tab | KeyCode::Right => state.switch_section(true),
        KeyCode::BackTab | KeyCode::Left => state.switch_section(false),
        KeyCode::Down => state.move_selection(true),
        KeyCode::Up => state.move_selection(false),
        code => return section_key(state, code),
    }
    None
}

const PROGRESS_STATUS: &str = "Progress Status";

fn section_key(state: &mut ProjectDetailState, code: KeyCode) -> Option<DetailAction> {
    let project_id = state.project.id;

    match (state.section, code) {
        (Section::Phases, KeyCode::Char('n')) => Some(DetailAction::AddPhase(project_id)),
        (Section::Phases, KeyCode::Char('p')) => {
            let phase = state.selected_phase().filter(|p| !p.is_paid())?;
            Some(DetailAction::MarkPhasePaid(phase.id))
        }
        (Section::Phases, KeyCode::Char('c')) => {
            // Phases with features complete through their features
            let phase = state.selected_phase().filter(|p| feature_counts(p).1 == 0)?;
            Some(DetailAction::SetPhaseCompleted(phase.id, !phase.is_completed))
        }
        (Section::Phases, KeyCode::Char('f')) => {
            let phase = state.selected_phase()?;
            if !sorted_features(phase).is_empty() {
                state.feature_cursor = Some(0);
            }
            None
        }
        (Section::Phases, KeyCode::Char('e')) => {
            state.selected_phase().map(|p| DetailAction::EditFeatures(p.id))
        }
        (Section::Phases, KeyCode::Char('d')) => {
            state.confirm = state.selected_phase().map(|p| Confirm::DeletePhase(p.id));
            None
        }
        (Section::Payments, KeyCode::Char('n')) => Some(DetailAction::AddAdvance(project_id)),
        (Section::Payments, KeyCode::Char('d')) => {
            state.confirm = state.selected_payment().map(|p| Confirm::DeletePayment(p.id));
            None
        }
        (Section::Designs, KeyCode::Char('n')) => {
            Some(DetailAction::AddDesign(project_id, state.free_design_slot()))
        }
        (Section::Designs, KeyCode::Char('d')) => {
            state.confirm = state.selected_design().map(|d| Confirm::DeleteDesign(d.id));
            None
        }
        (Section::Commits, KeyCode::Char('g')) => Some(DetailAction::ConnectRepo(project_id)),
        (Section::Commits, KeyCode::Char('r')) => {
            state.project.git_repo.as_ref()?;
            Some(DetailAction::SyncCommits(project_id))
        }
        (Section::Share, KeyCode::Char('t')) => Some(if state.share_url.is_some() {
            DetailAction::DisableSharing(project_id)
        } else {
            DetailAction::EnableSharing(project_id)
        }),
        (Section::Share, KeyCode::Char('u')) => {
            let current = state.project.progress_status.clone().unwrap_or_default();
            state.status_form = Some(FormState::new(
                "Progress status shown to the client",
                vec![FormField::text(PROGRESS_STATUS).with_value(current)],
            ));
            None
        }
        (Section::Share, KeyCode::Char('m')) => {
            state.share_url.as_ref()?;
            Some(DetailAction::EmailShareLink(project_id))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::tests::{payment, project};
    use crate::models::{PaymentType, PhaseStatus, ProjectStatus};
    use crate::progress::tests::phase;
    use crate::ui::components::form::tests::{key, type_text};
    use chrono::Utc;

    fn design(id: i32, login_type: &str) -> Design {
        Design {
            id,
            project_id: 1,
            title: login_type.to_string(),
            url: "https://figma.com/x".to_string(),
            login_type: login_type.to_string(),
            created_at: Utc::now(),
        }
    }

    fn state() -> ProjectDetailState {
        state_with_build_done(&["UI"])
    }

    fn state_with_build_done(done: &[&str]) -> ProjectDetailState {
        let mut paid = phase(1, "Design", None, &[]);
        paid.status = PhaseStatus::Paid;
        paid.is_completed = true;
        let record = ProjectRecord {
            project: project(1, ProjectStatus::Ongoing),
            phases: vec![phase(2, "Build", Some("API, UI"), done), paid],
            payments: vec![
                payment(10, 1, 1000.0, PaymentType::PhasePayment),
                payment(11, 1, 300.0, PaymentType::Advance),
            ],
            designs: vec![design(1, "admin")],
            commits: vec![],
        };
        ProjectDetailState::new(record, "https://x.test", Section::Phases)
    }

    fn press(state: &mut ProjectDetailState, code: KeyCode) -> Option<DetailAction> {
        handle_input(state, key(code))
    }

    #[test]
    fn header_figures_come_from_phases_and_payments() {
        let state = state();
        assert_eq!(state.financials.total_phase_amount, 2000.0);
        assert_eq!(state.financials.received, 1300.0);
        assert_eq!(state.financials.remaining, 700.0);
        assert_eq!(state.progress.status_text, "Current Focus: Build");
        assert_eq!(state.phases[0].name, "Design");
    }

    #[test]
    fn mark_paid_skips_paid_phases() {
        let mut state = state();
        assert_eq!(press(&mut state, KeyCode::Char('p')), None);
        press(&mut state, KeyCode::Down);
        assert_eq!(press(&mut state, KeyCode::Char('p')), Some(DetailAction::MarkPhasePaid(2)));
    }

    #[test]
    fn completion_flag_only_for_phases_without_features() {
        let mut state = state();
        assert_eq!(
            press(&mut state, KeyCode::Char('c')),
            Some(DetailAction::SetPhaseCompleted(1, false))
        );
        press(&mut state, KeyCode::Down);
        assert_eq!(press(&mut state, KeyCode::Char('c')), None);
    }

    #[test]
    fn ticking_a_feature_flips_it() {
        let mut state = state();
        press(&mut state, KeyCode::Down);
        press(&mut state, KeyCode::Char('f'));
        // done features are listed first
        assert_eq!(
            press(&mut state, KeyCode::Char(' ')),
            Some(DetailAction::SetFeature {
                phase_id: 2,
                feature: "UI".to_string(),
                done: false,
            })
        );
        press(&mut state, KeyCode::Down);
        assert_eq!(
            press(&mut state, KeyCode::Char(' ')),
            Some(DetailAction::SetFeature {
                phase_id: 2,
                feature: "API".to_string(),
                done: true,
            })
        );
        press(&mut state, KeyCode::Esc);
        assert_eq!(press(&mut state, KeyCode::Esc), Some(DetailAction::Back));
    }

    #[test]
    fn deleting_a_payment_asks_first() {
        let mut state = state();
        press(&mut state, KeyCode::Tab);
        assert_eq!(state.section(), Section::Payments);
        press(&mut state, KeyCode::Down);
        assert_eq!(press(&mut state, KeyCode::Char('d')), None);
        assert_eq!(press(&mut state, KeyCode::Char('y')), Some(DetailAction::DeletePayment(11)));
    }

    #[test]
    fn new_design_targets_first_free_slot() {
        let mut state = state();
        state.section = Section::Designs;
        assert_eq!(
            press(&mut state, KeyCode::Char('n')),
            Some(DetailAction::AddDesign(1, Some(LoginType::User)))
        );
    }

    #[test]
    fn new_design_is_custom_once_every_slot_is_taken() {
        let mut state = state();
        state.designs = vec![design(1, "admin"), design(2, "user"), design(3, "client")];
        state.section = Section::Designs;
        assert_eq!(
            press(&mut state, KeyCode::Char('n')),
            Some(DetailAction::AddDesign(1, None))
        );

        // a custom design does not fill a slot
        state.designs = vec![design(1, "admin"), design(2, "custom"), design(3, "client")];
        assert_eq!(
            press(&mut state, KeyCode::Char('n')),
            Some(DetailAction::AddDesign(1, Some(LoginType::User)))
        );
    }

    #[test]
    fn removing_a_design_can_be_cancelled() {
        let mut state = state();
        press(&mut state, KeyCode::Tab);
        press(&mut state, KeyCode::Tab);
        assert_eq!(state.section(), Section::Designs);

        press(&mut state, KeyCode::Char('d'));
        assert_eq!(press(&mut state, KeyCode::Char('n')), None);
        press(&mut state, KeyCode::Char('d'));
        assert_eq!(press(&mut state, KeyCode::Char('y')), Some(DetailAction::DeleteDesign(1)));
    }

    #[test]
    fn refresh_needs_a_repository() {
        let mut state = state();
        state.section = Section::Commits;
        assert_eq!(press(&mut state, KeyCode::Char('r')), None);
        state.project.git_repo = Some("https://github.com/acme/site".to_string());
        assert_eq!(press(&mut state, KeyCode::Char('r')), Some(DetailAction::SyncCommits(1)));
    }

    #[test]
    fn share_toggle_and_status_update() {
        let mut state = state();
        state.section = Section::Share;
        assert_eq!(press(&mut state, KeyCode::Char('t')), Some(DetailAction::EnableSharing(1)));
        assert_eq!(press(&mut state, KeyCode::Char('m')), None);

        press(&mut state, KeyCode::Char('u'));
        let form = state.status_form.as_mut().unwrap();
        type_text(form, "Testing on staging");
        assert_eq!(
            press(&mut state, KeyCode::Char('s')),
            Some(DetailAction::UpdateProgressStatus(1, "Testing on staging".to_string()))
        );
        assert!(state.status_form.is_none());
    }

    #[test]
    fn reload_keeps_cursor_on_the_same_phase() {
        let mut before = state();
        press(&mut before, KeyCode::Down);
        press(&mut before, KeyCode::Char('f'));
        press(&mut before, KeyCode::Down);

        let mut after = state();
        after.keep_position(&before);
        assert_eq!(after.list_state.selected(), Some(1));
        assert_eq!(after.feature_cursor, Some(1));
    }

    #[test]
    fn reload_follows_the_ticked_feature() {
        let mut before = state();
        press(&mut before, KeyCode::Down);
        press(&mut before, KeyCode::Char('f'));
        press(&mut before, KeyCode::Down);
        assert_eq!(before.selected_feature(), Some((2, "API".to_string(), false)));

        // API is now done and sorts ahead of UI
        let mut after = state_with_build_done(&["UI", "API"]);
        after.keep_position(&before);
        assert_eq!(after.feature_cursor, Some(0));
        assert_eq!(after.selected_feature(), Some((2, "API".to_string(), true)));
    }

    #[test]
    fn enabled_sharing_shows_link() {
        let mut record = ProjectRecord {
            project: project(1, ProjectStatus::Ongoing),
            phases: vec![],
            payments: vec![],
            designs: vec![],
            commits: vec![],
        };
        record.project.share_token = Some("tok_12345678".to_string());
        record.project.share_enabled = true;
        let mut state = ProjectDetailState::new(record, "https://x.test/", Section::Share);

        assert_eq!(state.share_url(), Some("https://x.test/share/tok_12345678"));
        assert_eq!(press(&mut state, KeyCode::Char('t')), Some(DetailAction::DisableSharing(1)));
        assert_eq!(press(&mut state, KeyCode::Char('m')), Some(DetailAction::EmailShareLink(1)));
    }
}
