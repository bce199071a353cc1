use crossterm::event::{KeyCode, KeyEvent};
use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{BarChart, Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::finance::DashboardStats;
use crate::format::{currency, label, short_date};
use crate::models::{Payment, Profile, Project};
use crate::quotes::{random_quote, Quote};
use crate::ui::theme::Palette;

pub const RECENT_PROJECTS: usize = 3;

pub struct DashboardState {
    pub profile: Profile,
    pub stats: DashboardStats,
    pub recent: Vec<Project>,
    pub quote: Quote,
    pub palette: Palette,
}

impl DashboardState {
    pub fn new(profile: Profile, projects: &[Project], recent: Vec<Project>, payments: &[Payment]) -> Self {
        let stats = DashboardStats::compute(projects, payments);
        let palette = Palette::for_theme(profile.theme_preference);
        let recent = recent.into_iter().take(RECENT_PROJECTS).collect();

        Self {
            profile,
            stats,
            recent,
            quote: random_quote(),
            palette,
        }
    }

    pub fn profile_id(&self) -> i32 {
        self.profile.id
    }

    fn first_name(&self) -> &str {
        self.profile.full_name.split_whitespace().next().unwrap_or("there")
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum DashboardAction {
    Exit,
    SignOut,
    OpenProjects,
    OpenFinances,
    OpenReports,
    OpenSettings,
}

pub fn render_dashboard<B: Backend>(f: &mut Frame<B>, state: &mut DashboardState) {
    let palette = state.palette;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(5),
                Constraint::Min(8),
                Constraint::Length(5),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(f.size());

    let header = Paragraph::new(Spans::from(vec![
        Span::styled(format!("Welcome back, {}", state.first_name()), palette.title()),
        Span::styled("  |  Dashboard", palette.muted()),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    render_cards(f, state, chunks[1]);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(chunks[2]);

    let data = [
        ("Ongoing", state.stats.active_projects as u64),
        ("Pending", state.stats.pending_projects as u64),
        ("Done", state.stats.completed_projects as u64),
    ];
    let chart = BarChart::default()
        .block(Block::default().title("Projects by Status").borders(Borders::ALL))
        .data(&data)
        .bar_width(9)
        .bar_gap(3)
        .bar_style(Style::default().fg(palette.accent))
        .value_style(Style::default().fg(Color::Black).bg(palette.accent).add_modifier(Modifier::BOLD));
    f.render_widget(chart, middle[0]);

    let items: Vec<ListItem> = if state.recent.is_empty() {
        vec![ListItem::new(Span::styled("No projects yet", palette.muted()))]
    } else {
        state
            .recent
            .iter()
            .map(|p| {
                ListItem::new(vec![
                    Spans::from(Span::styled(p.name.as_str(), Style::default().add_modifier(Modifier::BOLD))),
                    Spans::from(Span::styled(
                        format!("{} | {}", label(Some(p.status.as_str())), short_date(&p.created_at)),
                        palette.muted(),
                    )),
                ])
            })
            .collect()
    };
    let recent = List::new(items).block(Block::default().title("Recent Activity").borders(Borders::ALL));
    f.render_widget(recent, middle[1]);

    let quote = Paragraph::new(vec![
        Spans::from(Span::styled(
            format!("\"{}\"", state.quote.text),
            Style::default().add_modifier(Modifier::ITALIC),
        )),
        Spans::from(Span::styled(format!("- {}", state.quote.author), palette.muted())),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(Block::default().title("Daily Motivation").borders(Borders::ALL));
    f.render_widget(quote, chunks[3]);

    let help = Paragraph::new(
        "<P> Projects | <F> Finances | <R> Reports | <S> Settings | <M> New quote | <Esc> Sign out | <Q> Quit",
    )
    .style(palette.muted())
    .block(Block::default().borders(Borders::TOP));
    f.render_widget(help, chunks[4]);
}

fn render_cards<B: Backend>(f: &mut Frame<B>, state: &DashboardState, area: Rect) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4].as_ref())
        .split(area);

    let figures = [
        ("Total Revenue", currency(state.stats.total_revenue), Color::Green),
        ("Active Projects", state.stats.active_projects.to_string(), Color::Cyan),
        ("Completed", state.stats.completed_projects.to_string(), Color::Blue),
        ("Pending", state.stats.pending_projects.to_string(), Color::Yellow),
    ];

    for ((title, value, color), area) in figures.into_iter().zip(cards.iter()) {
        let card = Paragraph::new(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .block(Block::default().title(title).borders(Borders::ALL));
        f.render_widget(card, *area);
    }
}

pub fn handle_input(state: &mut DashboardState, key: KeyEvent) -> Option<DashboardAction> {
    match key.code {
        KeyCode::Char('q') => Some(DashboardAction::Exit),
        KeyCode::Esc => Some(DashboardAction::SignOut),
        KeyCode::Char('p') => Some(DashboardAction::OpenProjects),
        KeyCode::Char('f') => Some(DashboardAction::OpenFinances),
        KeyCode::Char('r') => Some(DashboardAction::OpenReports),
        KeyCode::Char('s') => Some(DashboardAction::OpenSettings),
        KeyCode::Char('m') => {
            state.quote = random_quote();
            None
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::tests::{payment, project};
    use crate::models::{PaymentType, ProjectStatus};
    use crate::ui::components::form::tests::key;

    fn state() -> DashboardState {
        let mut profile = Profile::draft();
        profile.id = 2;
        profile.full_name = "Asha Rao".to_string();
        let projects = vec![
            project(4, ProjectStatus::Pending),
            project(3, ProjectStatus::Ongoing),
            project(2, ProjectStatus::Completed),
            project(1, ProjectStatus::Ongoing),
        ];
        let payments = vec![payment(1, 1, 2500.0, PaymentType::Advance)];
        let recent = projects.clone();
        DashboardState::new(profile, &projects, recent, &payments)
    }

    #[test]
    fn keeps_three_most_recent_projects() {
        let state = state();
        assert_eq!(state.recent.len(), 3);
        assert_eq!(state.recent[0].id, 4);
        assert_eq!(state.stats.active_projects, 2);
        assert_eq!(state.stats.total_revenue, 2500.0);
        assert_eq!(state.first_name(), "Asha");
    }

    #[test]
    fn keys_open_sections() {
        let mut state = state();
        assert_eq!(handle_input(&mut state, key(KeyCode::Char('p'))), Some(DashboardAction::OpenProjects));
        assert_eq!(handle_input(&mut state, key(KeyCode::Esc)), Some(DashboardAction::SignOut));
        assert_eq!(handle_input(&mut state, key(KeyCode::Char('m'))), None);
    }
}
