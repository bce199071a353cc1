use std::io;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use chrono::{Local, NaiveTime, TimeZone, Utc};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
    widgets::Block,
};

use freelance_manager::{
    cli::{Cli, Command},
    config::{self, Config},
    db::{self, Database, NewAdvance},
    format::currency,
    git::{GitHubClient, sync_commits},
    mail,
    models::{Profile, ProjectStatus},
    report::{ReportData, ReportWriter},
    server,
    share::{self, DbShareStore},
    storage::{AVATARS, PROJECT_FILES, UPLOADS, Uploads, avatar_key, logo_key, quotation_key, receipt_key},
    telemetry,
    ui::{
        components::popup::{Notice, render_notice},
        dashboard::{DashboardAction, DashboardState, RECENT_PROJECTS, render_dashboard, handle_input as handle_dashboard_input},
        design_wizard::{DesignWizardAction, DesignWizardState, render_design_wizard, handle_input as handle_design_wizard_input},
        finances::{FinanceAction, FinancesState, render_finances, handle_input as handle_finances_input},
        git_wizard::{GitWizardAction, GitWizardState, render_git_wizard, handle_input as handle_git_wizard_input},
        payment_wizard::{PaymentWizardAction, PaymentWizardState, render_payment_wizard, handle_input as handle_payment_wizard_input},
        phase_wizard::{PhaseDraft, PhaseWizardAction, PhaseWizardState, render_phase_wizard, handle_input as handle_phase_wizard_input},
        profile_wizard::{ProfileWizardAction, ProfileWizardState, render_profile_wizard, handle_input as handle_profile_wizard_input},
        profiles::{ProfileAction, ProfilesState, render_profiles, handle_input as handle_profiles_input},
        project_detail::{DetailAction, ProjectDetailState, ProjectRecord, Section, render_project_detail, handle_input as handle_detail_input},
        project_wizard::{ProjectWizardAction, ProjectWizardState, render_project_wizard, handle_input as handle_project_wizard_input},
        projects::{ProjectAction, ProjectsState, render_projects, handle_input as handle_projects_input},
        reports::{ReportAction, ReportsState, render_reports, handle_input as handle_reports_input},
        theme::Palette,
    },
};

// Represents the current screen in the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AppScreen {
    Profiles,
    ProfileWizard,
    Dashboard,
    Projects,
    ProjectWizard,
    ProjectDetail,
    PhaseWizard,
    PaymentWizard,
    DesignWizard,
    GitWizard,
    Finances,
    Reports,
}

// Main application state
struct AppState {
    db: Database,
    config: Config,
    uploads: Uploads,
    github: GitHubClient,
    screen: AppScreen,
    /// Signed-in account
    profile: Option<Profile>,
    palette: Palette,
    notice: Option<Notice>,
    profiles_state: Option<ProfilesState>,
    profile_wizard_state: Option<ProfileWizardState>,
    dashboard_state: Option<DashboardState>,
    projects_state: Option<ProjectsState>,
    project_wizard_state: Option<ProjectWizardState>,
    detail_state: Option<ProjectDetailState>,
    phase_wizard_state: Option<PhaseWizardState>,
    payment_wizard_state: Option<PaymentWizardState>,
    design_wizard_state: Option<DesignWizardState>,
    git_wizard_state: Option<GitWizardState>,
    finances_state: Option<FinancesState>,
    reports_state: Option<ReportsState>,
}

impl AppState {
    fn new(db: Database, config: Config) -> Self {
        let uploads = Uploads::new(&config.upload_dir, config.public_url());
        let github = GitHubClient::new(&config.github_api_url);

        Self {
            db,
            config,
            uploads,
            github,
            screen: AppScreen::Profiles,
            profile: None,
            palette: Palette::default(),
            notice: None,
            profiles_state: None,
            profile_wizard_state: None,
            dashboard_state: None,
            projects_state: None,
            project_wizard_state: None,
            detail_state: None,
            phase_wizard_state: None,
            payment_wizard_state: None,
            design_wizard_state: None,
            git_wizard_state: None,
            finances_state: None,
            reports_state: None,
        }
    }

    fn profile_id(&self) -> Result<i32> {
        self.profile
            .as_ref()
            .map(|p| p.id)
            .ok_or_else(|| anyhow!("No account is signed in"))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::init()?;

    match cli.selected() {
        Command::Dashboard => {
            // stderr belongs to the terminal UI
            telemetry::init_file(&config)?;
            run_dashboard(config).await
        }
        Command::Serve { bind } => {
            telemetry::init_stderr(&config)?;
            let db = db::init(&config).await?;
            let store = DbShareStore::new(db, GitHubClient::new(&config.github_api_url));
            let addr = bind.unwrap_or_else(|| config.share_bind.clone());
            server::serve(store, &config.upload_dir, &addr).await
        }
        Command::Report { profile, format, output } => {
            telemetry::init_stderr(&config)?;
            let db = db::init(&config).await?;
            let profile_id = match profile {
                Some(id) => id,
                None => only_profile(&db).await?,
            };

            let ledgers = db.load_ledgers(profile_id).await?;
            let data = ReportData::compute(&ledgers);
            let writer = ReportWriter::new(output.as_deref().unwrap_or(config.report_dir.as_str()))?;
            let path = writer.write(&data, format, Local::now())?;
            println!("Report written to {}", path.display());
            Ok(())
        }
        Command::SyncCommits { project, token } => {
            telemetry::init_stderr(&config)?;
            let db = db::init(&config).await?;
            let repo_url = db
                .get_project(project)
                .await?
                .git_repo
                .ok_or_else(|| anyhow!("Project {} has no repository connected", project))?;

            let github = GitHubClient::new(&config.github_api_url);
            let commits = sync_commits(&db, &github, project, &repo_url, token.as_deref()).await?;
            println!("{} commits stored for project {}", commits.len(), project);
            Ok(())
        }
    }
}

async fn only_profile(db: &Database) -> Result<i32> {
    let profiles = db.load_profiles().await?;
    match profiles.as_slice() {
        [profile] => Ok(profile.id),
        [] => bail!("No accounts exist yet"),
        _ => bail!("Several accounts exist; pick one with --profile"),
    }
}

async fn run_dashboard(config: Config) -> Result<()> {
    let db = db::init(&config).await.context("Failed to connect to the database")?;

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app_state = AppState::new(db, config);

    let result = match load_profiles_screen(&mut app_state).await {
        Ok(()) => run_app(&mut terminal, &mut app_state).await,
        Err(err) => Err(err),
    };

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        tracing::error!(error = %err, "dashboard stopped");
    }
    result
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut AppState) -> Result<()> {
    loop {
        terminal.draw(|f| {
            f.render_widget(Block::default().style(app.palette.base()), f.size());

            match app.screen {
                AppScreen::Profiles => {
                    if let Some(state) = &mut app.profiles_state {
                        render_profiles(f, state);
                    }
                }
                AppScreen::ProfileWizard => {
                    if let Some(state) = &mut app.profile_wizard_state {
                        render_profile_wizard(f, state);
                    }
                }
                AppScreen::Dashboard => {
                    if let Some(state) = &mut app.dashboard_state {
                        render_dashboard(f, state);
                    }
                }
                AppScreen::Projects => {
                    if let Some(state) = &mut app.projects_state {
                        render_projects(f, state);
                    }
                }
                AppScreen::ProjectWizard => {
                    if let Some(state) = &mut app.project_wizard_state {
                        render_project_wizard(f, state);
                    }
                }
                AppScreen::ProjectDetail => {
                    if let Some(state) = &mut app.detail_state {
                        render_project_detail(f, state);
                    }
                }
                AppScreen::PhaseWizard => {
                    if let Some(state) = &mut app.phase_wizard_state {
                        render_phase_wizard(f, state);
                    }
                }
                AppScreen::PaymentWizard => {
                    if let Some(state) = &mut app.payment_wizard_state {
                        render_payment_wizard(f, state);
                    }
                }
                AppScreen::DesignWizard => {
                    if let Some(state) = &mut app.design_wizard_state {
                        render_design_wizard(f, state);
                    }
                }
                AppScreen::GitWizard => {
                    if let Some(state) = &mut app.git_wizard_state {
                        render_git_wizard(f, state);
                    }
                }
                AppScreen::Finances => {
                    if let Some(state) = &mut app.finances_state {
                        render_finances(f, state);
                    }
                }
                AppScreen::Reports => {
                    if let Some(state) = &mut app.reports_state {
                        render_reports(f, state);
                    }
                }
            }

            if let Some(notice) = &app.notice {
                render_notice(f, notice);
            }
        })?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        // Any key dismisses a notice
        if app.notice.take().is_some() {
            continue;
        }

        let screen = app.screen;
        match handle_screen(app, key).await {
            Ok(true) => break,
            Ok(false) => {}
            Err(err) => {
                tracing::error!(?screen, error = %err, "action failed");
                app.notice = Some(Notice::error(format!("Something went wrong: {}", err)));
            }
        }
    }

    Ok(())
}

async fn handle_screen(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match app.screen {
        AppScreen::Profiles => handle_profiles_screen(app, key).await,
        AppScreen::ProfileWizard => handle_profile_wizard_screen(app, key).await,
        AppScreen::Dashboard => handle_dashboard_screen(app, key).await,
        AppScreen::Projects => handle_projects_screen(app, key).await,
        AppScreen::ProjectWizard => handle_project_wizard_screen(app, key).await,
        AppScreen::ProjectDetail => handle_detail_screen(app, key).await,
        AppScreen::PhaseWizard => handle_phase_wizard_screen(app, key).await,
        AppScreen::PaymentWizard => handle_payment_wizard_screen(app, key).await,
        AppScreen::DesignWizard => handle_design_wizard_screen(app, key).await,
        AppScreen::GitWizard => handle_git_wizard_screen(app, key).await,
        AppScreen::Finances => handle_finances_screen(app, key).await,
        AppScreen::Reports => handle_reports_screen(app, key).await,
    }
}

async fn load_profiles_screen(app: &mut AppState) -> Result<()> {
    let profiles = app.db.load_profiles().await?;

    app.profiles_state = Some(ProfilesState::new(profiles));
    app.screen = AppScreen::Profiles;

    Ok(())
}

async fn open_dashboard(app: &mut AppState) -> Result<()> {
    let profile = app
        .profile
        .clone()
        .ok_or_else(|| anyhow!("No account is signed in"))?;

    let projects = app.db.get_projects_by_profile(profile.id).await?;
    let recent = app.db.get_recent_projects(profile.id, RECENT_PROJECTS as i64).await?;
    let payments = app.db.get_payments_by_profile(profile.id).await?;

    app.palette = Palette::for_theme(profile.theme_preference);
    app.dashboard_state = Some(DashboardState::new(profile, &projects, recent, &payments));
    app.screen = AppScreen::Dashboard;

    Ok(())
}

async fn open_projects(app: &mut AppState, status: ProjectStatus) -> Result<()> {
    let profile_id = app.profile_id()?;
    let projects = app.db.get_projects_by_status(profile_id, status).await?;

    app.projects_state = Some(ProjectsState::new(profile_id, status, projects));
    app.screen = AppScreen::Projects;

    Ok(())
}

async fn load_record(db: &Database, project_id: i32) -> Result<ProjectRecord> {
    Ok(ProjectRecord {
        project: db.get_project(project_id).await?,
        phases: db.get_phases_by_project(project_id).await?,
        payments: db.get_payments_by_project(project_id).await?,
        designs: db.get_designs_by_project(project_id).await?,
        commits: db.get_commits_by_project(project_id).await?,
    })
}

async fn open_detail(app: &mut AppState, project_id: i32, section: Section) -> Result<()> {
    let record = load_record(&app.db, project_id).await?;
    let mut state = ProjectDetailState::new(record, app.config.public_url(), section);
    if let Some(previous) = &app.detail_state {
        state.keep_position(previous);
    }

    app.detail_state = Some(state);
    app.screen = AppScreen::ProjectDetail;

    Ok(())
}

/// Reloads the open project in the section it was left on
async fn return_to_detail(app: &mut AppState, project_id: i32) -> Result<()> {
    let section = app
        .detail_state
        .as_ref()
        .map(|s| s.section())
        .unwrap_or(Section::Phases);
    open_detail(app, project_id, section).await
}

async fn open_finances(app: &mut AppState) -> Result<()> {
    let profile_id = app.profile_id()?;
    let projects = app.db.get_projects_by_profile(profile_id).await?;
    let phases = app.db.get_phases_by_profile(profile_id).await?;
    let transactions = app.db.get_transactions(profile_id).await?;

    app.finances_state = Some(FinancesState::new(profile_id, &projects, &phases, transactions));
    app.screen = AppScreen::Finances;

    Ok(())
}

async fn open_reports(app: &mut AppState) -> Result<()> {
    let profile_id = app.profile_id()?;
    let ledgers = app.db.load_ledgers(profile_id).await?;

    app.reports_state = Some(ReportsState::new(
        profile_id,
        ReportData::compute(&ledgers),
        Local::now(),
    ));
    app.screen = AppScreen::Reports;

    Ok(())
}

async fn handle_profiles_screen(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    let Some(state) = &mut app.profiles_state else {
        return Ok(false);
    };

    match handle_profiles_input(state, key) {
        Some(ProfileAction::Exit) => return Ok(true),
        Some(ProfileAction::SelectProfile(profile_id)) => {
            let profile = app.db.get_profile(profile_id).await?;
            tracing::info!(profile_id, "signed in");
            app.profile = Some(profile);
            open_dashboard(app).await?;
        }
        Some(ProfileAction::DeleteProfile(profile_id)) => {
            app.db.delete_profile(profile_id).await?;
            load_profiles_screen(app).await?;
        }
        Some(ProfileAction::EditProfile(profile_id)) => {
            let profile = app.db.get_profile(profile_id).await?;
            app.profile_wizard_state = Some(ProfileWizardState::from_existing(profile));
            app.screen = AppScreen::ProfileWizard;
        }
        Some(ProfileAction::NewProfile) => {
            app.profile_wizard_state = Some(ProfileWizardState::new());
            app.screen = AppScreen::ProfileWizard;
        }
        None => {}
    }

    Ok(false)
}

async fn handle_profile_wizard_screen(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    let Some(state) = &mut app.profile_wizard_state else {
        return Ok(false);
    };

    match handle_profile_wizard_input(state, key) {
        Some(ProfileWizardAction::Cancel) => {
            app.profile_wizard_state = None;
            if app.profile.is_some() {
                open_dashboard(app).await?;
            } else {
                load_profiles_screen(app).await?;
            }
        }
        Some(ProfileWizardAction::Save(draft)) => {
            let mut profile = draft.profile;
            if profile.id == 0 {
                profile.id = app.db.create_profile(&profile).await?;
            }
            if let Some(path) = draft.avatar_path.as_deref() {
                let url = app.uploads.store(AVATARS, &avatar_key(profile.id), Path::new(path)).await?;
                profile.avatar_url = Some(url);
            }
            app.db.update_profile(&profile).await?;
            app.profile_wizard_state = None;

            let signed_in = app.profile.as_ref().map(|p| p.id);
            if signed_in == Some(profile.id) {
                app.profile = Some(profile);
                open_dashboard(app).await?;
                app.notice = Some(Notice::info("Settings saved"));
            } else {
                load_profiles_screen(app).await?;
            }
        }
        None => {}
    }

    Ok(false)
}

async fn handle_dashboard_screen(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    let Some(state) = &mut app.dashboard_state else {
        return Ok(false);
    };

    match handle_dashboard_input(state, key) {
        Some(DashboardAction::Exit) => return Ok(true),
        Some(DashboardAction::SignOut) => {
            tracing::info!("signed out");
            app.profile = None;
            app.palette = Palette::default();
            app.dashboard_state = None;
            load_profiles_screen(app).await?;
        }
        Some(DashboardAction::OpenProjects) => open_projects(app, ProjectStatus::Ongoing).await?,
        Some(DashboardAction::OpenFinances) => open_finances(app).await?,
        Some(DashboardAction::OpenReports) => open_reports(app).await?,
        Some(DashboardAction::OpenSettings) => {
            let profile = app
                .profile
                .clone()
                .ok_or_else(|| anyhow!("No account is signed in"))?;
            app.profile_wizard_state = Some(ProfileWizardState::from_existing(profile));
            app.screen = AppScreen::ProfileWizard;
        }
        None => {}
    }

    Ok(false)
}

async fn handle_projects_screen(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    let Some(state) = &mut app.projects_state else {
        return Ok(false);
    };
    let status = state.status();

    match handle_projects_input(state, key) {
        Some(ProjectAction::Back) => open_dashboard(app).await?,
        Some(ProjectAction::ShowStatus(status)) => open_projects(app, status).await?,
        Some(ProjectAction::NewProject) => {
            let profile_id = state.profile_id();
            app.project_wizard_state = Some(ProjectWizardState::new(profile_id));
            app.screen = AppScreen::ProjectWizard;
        }
        Some(ProjectAction::ApproveProject(project_id)) => {
            app.db.approve_project(project_id).await?;
            tracing::info!(project_id, "project approved");
            open_projects(app, status).await?;
            app.notice = Some(Notice::info("Project approved and moved to Ongoing"));
        }
        Some(ProjectAction::DeleteProject(project_id)) => {
            app.db.delete_project(project_id).await?;
            open_projects(app, status).await?;
        }
        Some(ProjectAction::OpenProject(project_id)) => {
            app.detail_state = None;
            open_detail(app, project_id, Section::Phases).await?;
        }
        None => {}
    }

    Ok(false)
}

async fn handle_project_wizard_screen(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    let Some(state) = &mut app.project_wizard_state else {
        return Ok(false);
    };

    match handle_project_wizard_input(state, key) {
        Some(ProjectWizardAction::Cancel) => {
            app.project_wizard_state = None;
            open_projects(app, ProjectStatus::Ongoing).await?;
        }
        Some(ProjectWizardAction::Save(draft)) => {
            let mut project = draft.project;
            if let Some(path) = draft.quotation_path.as_deref() {
                project.quotation_url = app.uploads.store_optional(PROJECT_FILES, path, quotation_key).await?;
            }
            if let Some(path) = draft.logo_path.as_deref() {
                project.logo_url = app.uploads.store_optional(PROJECT_FILES, path, logo_key).await?;
            }

            let project_id = app.db.create_project(&project).await?;
            tracing::info!(project_id, status = project.status.as_str(), "project created");
            app.project_wizard_state = None;
            open_projects(app, project.status).await?;
        }
        None => {}
    }

    Ok(false)
}

async fn handle_detail_screen(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    let Some(state) = &mut app.detail_state else {
        return Ok(false);
    };
    let project_id = state.project_id();

    let Some(action) = handle_detail_input(state, key) else {
        return Ok(false);
    };

    match action {
        DetailAction::Back => {
            let status = state.project.status;
            app.detail_state = None;
            open_projects(app, status).await?;
        }
        DetailAction::AddPhase(project_id) => {
            app.phase_wizard_state = Some(PhaseWizardState::new(project_id));
            app.screen = AppScreen::PhaseWizard;
        }
        DetailAction::EditFeatures(phase_id) => {
            let phase = state
                .phase(phase_id)
                .ok_or_else(|| anyhow!("Phase {} is not part of this project", phase_id))?;
            app.phase_wizard_state = Some(PhaseWizardState::edit_features(phase));
            app.screen = AppScreen::PhaseWizard;
        }
        DetailAction::MarkPhasePaid(phase_id) => {
            app.db.mark_phase_paid(phase_id).await?;
            return_to_detail(app, project_id).await?;
        }
        DetailAction::SetPhaseCompleted(phase_id, done) => {
            app.db.set_phase_completed(phase_id, done).await?;
            return_to_detail(app, project_id).await?;
        }
        DetailAction::SetFeature { phase_id, feature, done } => {
            app.db.set_feature_completed(phase_id, &feature, done).await?;
            return_to_detail(app, project_id).await?;
        }
        DetailAction::DeletePhase(phase_id) => {
            app.db.delete_phase(phase_id).await?;
            return_to_detail(app, project_id).await?;
        }
        DetailAction::AddAdvance(project_id) => {
            app.payment_wizard_state = Some(PaymentWizardState::new(project_id, Local::now().date_naive()));
            app.screen = AppScreen::PaymentWizard;
        }
        DetailAction::DeletePayment(payment_id) => {
            app.db.delete_payment(payment_id).await?;
            return_to_detail(app, project_id).await?;
        }
        DetailAction::DeleteDesign(design_id) => {
            app.db.delete_design(design_id).await?;
            return_to_detail(app, project_id).await?;
        }
        DetailAction::AddDesign(project_id, slot) => {
            app.design_wizard_state = Some(DesignWizardState::new(project_id, slot));
            app.screen = AppScreen::DesignWizard;
        }
        DetailAction::ConnectRepo(project_id) => {
            let repo_url = state.project.git_repo.clone();
            app.git_wizard_state = Some(GitWizardState::new(project_id, repo_url.as_deref()));
            app.screen = AppScreen::GitWizard;
        }
        DetailAction::SyncCommits(project_id) => {
            let repo_url = state
                .project
                .git_repo
                .clone()
                .ok_or_else(|| anyhow!("Connect a repository first"))?;
            let commits = sync_commits(&app.db, &app.github, project_id, &repo_url, None).await?;
            return_to_detail(app, project_id).await?;
            app.notice = Some(Notice::info(format!("{} commits synced", commits.len())));
        }
        DetailAction::EnableSharing(project_id) => {
            let token = share::enable_sharing(&app.db, project_id).await?;
            return_to_detail(app, project_id).await?;
            let url = share::share_url(app.config.public_url(), &token);
            app.notice = Some(Notice::info(format!("Share link: {}", url)));
        }
        DetailAction::DisableSharing(project_id) => {
            share::disable_sharing(&app.db, project_id).await?;
            return_to_detail(app, project_id).await?;
        }
        DetailAction::UpdateProgressStatus(project_id, status) => {
            app.db.update_progress_status(project_id, &status).await?;
            return_to_detail(app, project_id).await?;
        }
        DetailAction::EmailShareLink(_) => {
            let url = state
                .share_url()
                .map(str::to_string)
                .ok_or_else(|| anyhow!("Enable sharing before emailing the link"))?;
            mail::email_share_link(&app.config, &state.project, &url).await?;
            let recipient = state.project.client_email.clone().unwrap_or_default();
            app.notice = Some(Notice::info(format!("Share link sent to {}", recipient)));
        }
    }

    Ok(false)
}

async fn handle_phase_wizard_screen(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    let Some(state) = &mut app.phase_wizard_state else {
        return Ok(false);
    };
    let project_id = app.detail_state.as_ref().map(|s| s.project_id());

    match handle_phase_wizard_input(state, key) {
        Some(PhaseWizardAction::Cancel) => {}
        Some(PhaseWizardAction::Save(PhaseDraft::New { project_id, name, amount, description })) => {
            let phase_id = app.db.add_phase(project_id, &name, amount, description.as_deref()).await?;
            tracing::info!(project_id, phase_id, "phase added");
        }
        Some(PhaseWizardAction::Save(PhaseDraft::Features { phase_id, description })) => {
            app.db.update_phase_description(phase_id, &description).await?;
        }
        None => return Ok(false),
    }

    app.phase_wizard_state = None;
    let project_id = project_id.ok_or_else(|| anyhow!("No project is open"))?;
    return_to_detail(app, project_id).await?;

    Ok(false)
}

async fn handle_payment_wizard_screen(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    let Some(state) = &mut app.payment_wizard_state else {
        return Ok(false);
    };
    let project_id = state.project_id;

    match handle_payment_wizard_input(state, key) {
        Some(PaymentWizardAction::Cancel) => {}
        Some(PaymentWizardAction::Save(draft)) => {
            let receipt_url = match draft.receipt_path.as_deref() {
                Some(path) => {
                    app.uploads
                        .store_optional(UPLOADS, path, |name| receipt_key(draft.project_id, name))
                        .await?
                }
                None => None,
            };
            let advance = NewAdvance {
                amount: draft.amount,
                notes: draft.notes,
                receipt_url,
                date: Utc.from_utc_datetime(&draft.date.and_time(NaiveTime::default())),
            };

            let payment_id = app.db.add_advance_payment(draft.project_id, &advance).await?;
            tracing::info!(project_id, payment_id, amount = advance.amount, "advance recorded");

            let advances = app.db.get_project_advances(project_id).await?;
            app.payment_wizard_state = None;
            return_to_detail(app, project_id).await?;
            app.notice = Some(Notice::info(format!(
                "Advance recorded. Advances so far: {}",
                currency(advances)
            )));
            return Ok(false);
        }
        None => return Ok(false),
    }

    app.payment_wizard_state = None;
    return_to_detail(app, project_id).await?;

    Ok(false)
}

async fn handle_design_wizard_screen(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    let Some(state) = &mut app.design_wizard_state else {
        return Ok(false);
    };
    let project_id = state.project_id;

    match handle_design_wizard_input(state, key) {
        Some(DesignWizardAction::Cancel) => {}
        Some(DesignWizardAction::Save(draft)) => {
            app.db
                .add_design(draft.project_id, &draft.title, &draft.url, &draft.login_type)
                .await?;
        }
        None => return Ok(false),
    }

    app.design_wizard_state = None;
    return_to_detail(app, project_id).await?;

    Ok(false)
}

async fn handle_git_wizard_screen(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    let Some(state) = &mut app.git_wizard_state else {
        return Ok(false);
    };
    let project_id = state.project_id;

    match handle_git_wizard_input(state, key) {
        Some(GitWizardAction::Cancel) => {
            app.git_wizard_state = None;
            return_to_detail(app, project_id).await?;
        }
        Some(GitWizardAction::Save(draft)) => {
            app.db.update_git_repo(draft.project_id, &draft.repo_url).await?;
            app.git_wizard_state = None;
            // The repository stays connected even when the first sync fails
            open_detail(app, draft.project_id, Section::Commits).await?;

            let commits = sync_commits(
                &app.db,
                &app.github,
                draft.project_id,
                &draft.repo_url,
                draft.token.as_deref(),
            )
            .await?;
            open_detail(app, draft.project_id, Section::Commits).await?;
            app.notice = Some(Notice::info(format!("Repository connected, {} commits synced", commits.len())));
        }
        None => {}
    }

    Ok(false)
}

async fn handle_finances_screen(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    let Some(state) = &mut app.finances_state else {
        return Ok(false);
    };

    match handle_finances_input(state, key) {
        Some(FinanceAction::Back) => {
            app.finances_state = None;
            open_dashboard(app).await?;
        }
        None => {}
    }

    Ok(false)
}

async fn handle_reports_screen(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    let Some(state) = &mut app.reports_state else {
        return Ok(false);
    };

    match handle_reports_input(state, key) {
        Some(ReportAction::Back) => {
            app.reports_state = None;
            open_dashboard(app).await?;
        }
        Some(ReportAction::Export(format)) => {
            let writer = ReportWriter::new(&app.config.report_dir)?;
            let path = writer.write(&state.data, format, state.generated_at)?;
            app.notice = Some(Notice::info(format!("Report saved to {}", path.display())));
        }
        None => {}
    }

    Ok(false)
}
