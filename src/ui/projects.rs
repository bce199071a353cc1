use crossterm::event::{KeyCode, KeyEvent};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Tabs},
    Frame,
};

use crate::format::{label, short_date};
use crate::models::{Project, ProjectStatus};
use crate::ui::components::popup::render_confirm;

// Projects of one account, one status tab at a time
pub struct ProjectsState {
    profile_id: i32,
    status: ProjectStatus,
    projects: Vec<Project>,
    table_state: TableState,
    show_delete_confirmation: bool,
}

impl ProjectsState {
    pub fn new(profile_id: i32, status: ProjectStatus, projects: Vec<Project>) -> Self {
        let mut table_state = TableState::default();
        if !projects.is_empty() {
            table_state.select(Some(0));
        }

        Self {
            profile_id,
            status,
            projects,
            table_state,
            show_delete_confirmation: false,
        }
    }

    pub fn profile_id(&self) -> i32 {
        self.profile_id
    }

    pub fn status(&self) -> ProjectStatus {
        self.status
    }

    pub fn next(&mut self) {
        if self.projects.is_empty() {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i + 1 < self.projects.len() => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.projects.is_empty() {
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) | None => self.projects.len() - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.table_state.selected().and_then(|i| self.projects.get(i))
    }

    fn selected_id(&self) -> Option<i32> {
        self.selected_project().map(|p| p.id)
    }

    fn tab_index(&self) -> usize {
        ProjectStatus::ALL.iter().position(|s| *s == self.status).unwrap_or(0)
    }

    fn neighbour_tab(&self, forward: bool) -> ProjectStatus {
        let len = ProjectStatus::ALL.len();
        let i = self.tab_index();
        let next = if forward { (i + 1) % len } else { (i + len - 1) % len };
        ProjectStatus::ALL[next]
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ProjectAction {
    Back,
    ShowStatus(ProjectStatus),
    NewProject,
    ApproveProject(i32),
    DeleteProject(i32),
    OpenProject(i32),
}

pub fn render_projects<B: Backend>(f: &mut Frame<B>, state: &mut ProjectsState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(3)].as_ref())
        .split(f.size());

    let titles = ProjectStatus::ALL
        .iter()
        .map(|s| Spans::from(label(Some(s.as_str()))))
        .collect();
    let tabs = Tabs::new(titles)
        .select(state.tab_index())
        .block(Block::default().title("Projects").borders(Borders::ALL))
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, chunks[0]);

    let header = Row::new(vec!["Name", "Work Type", "Client", "Source", "Last Commit", "Created"])
        .style(Style::default().fg(Color::Yellow))
        .bottom_margin(1);

    let rows: Vec<Row> = state
        .projects
        .iter()
        .map(|p| {
            Row::new(vec![
                Cell::from(p.name.clone()),
                Cell::from(label(p.work_type.as_deref())),
                Cell::from(p.client_email.clone().unwrap_or_else(|| "-".to_string())),
                Cell::from(label(p.client_source.as_deref())),
                Cell::from(p.last_commit_msg.clone().unwrap_or_else(|| "-".to_string())),
                Cell::from(short_date(&p.created_at)),
            ])
        })
        .collect();

    let empty_title = format!("No {} projects", state.status.as_str());
    let table = Table::new(rows)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(if state.projects.is_empty() { empty_title.as_str() } else { "" }),
        )
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White).add_modifier(Modifier::BOLD))
        .widths(&[
            Constraint::Percentage(22),
            Constraint::Percentage(14),
            Constraint::Percentage(20),
            Constraint::Percentage(12),
            Constraint::Percentage(20),
            Constraint::Percentage(12),
        ]);
    f.render_stateful_widget(table, chunks[1], &mut state.table_state);

    let mut help = vec![Span::raw("<Left/Right> Status | <N> New | <Enter> Open | <D> Delete")];
    if state.status == ProjectStatus::Pending {
        help.push(Span::raw(" | <A> Approve"));
    }
    help.push(Span::raw(" | <Esc> Back"));
    let help = Paragraph::new(Spans::from(help))
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::TOP));
    f.render_widget(help, chunks[2]);

    if state.show_delete_confirmation {
        render_confirm(
            f,
            "Confirm Delete",
            &[
                "Are you sure you want to delete this project?",
                "Its phases, payments, designs and commits will also be deleted.",
            ],
        );
    }
}

pub fn handle_input(state: &mut ProjectsState, key: KeyEvent) -> Option<ProjectAction> {
    if state.show_delete_confirmation {
        match key.code {
            KeyCode::Char('y') => {
                state.show_delete_confirmation = false;
                return state.selected_id().map(ProjectAction::DeleteProject);
            }
            KeyCode::Char('n') | KeyCode::Esc => state.show_delete_confirmation = false,
            _ => {}
        }
        return None;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => Some(ProjectAction::Back),
        KeyCode::Right | KeyCode::Tab => Some(ProjectAction::ShowStatus(state.neighbour_tab(true))),
        KeyCode::Left | KeyCode::BackTab => Some(ProjectAction::ShowStatus(state.neighbour_tab(false))),
        KeyCode::Down => {
            state.next();
            None
        }
        KeyCode::Up => {
            state.previous();
            None
        }
        KeyCode::Char('n') => Some(ProjectAction::NewProject),
        KeyCode::Char('a') if state.status == ProjectStatus::Pending => {
            state.selected_id().map(ProjectAction::ApproveProject)
        }
        KeyCode::Char('d') => {
            if state.selected_project().is_some() {
                state.show_delete_confirmation = true;
            }
            None
        }
        KeyCode::Enter => state.selected_id().map(ProjectAction::OpenProject),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::tests::project;
    use crate::ui::components::form::tests::key;

    #[test]
    fn tabs_cycle_through_statuses() {
        let mut state = ProjectsState::new(1, ProjectStatus::Ongoing, vec![]);
        assert_eq!(
            handle_input(&mut state, key(KeyCode::Right)),
            Some(ProjectAction::ShowStatus(ProjectStatus::Pending))
        );
        assert_eq!(
            handle_input(&mut state, key(KeyCode::Left)),
            Some(ProjectAction::ShowStatus(ProjectStatus::Completed))
        );
    }

    #[test]
    fn approve_only_on_pending_tab() {
        let mut ongoing = ProjectsState::new(1, ProjectStatus::Ongoing, vec![project(5, ProjectStatus::Ongoing)]);
        assert_eq!(handle_input(&mut ongoing, key(KeyCode::Char('a'))), None);

        let mut pending = ProjectsState::new(1, ProjectStatus::Pending, vec![project(6, ProjectStatus::Pending)]);
        assert_eq!(
            handle_input(&mut pending, key(KeyCode::Char('a'))),
            Some(ProjectAction::ApproveProject(6))
        );
    }

    #[test]
    fn delete_is_confirmed_first() {
        let mut state = ProjectsState::new(1, ProjectStatus::Ongoing, vec![project(8, ProjectStatus::Ongoing)]);
        assert_eq!(handle_input(&mut state, key(KeyCode::Char('d'))), None);
        assert_eq!(handle_input(&mut state, key(KeyCode::Char('n'))), None);
        assert_eq!(handle_input(&mut state, key(KeyCode::Char('d'))), None);
        assert_eq!(
            handle_input(&mut state, key(KeyCode::Char('y'))),
            Some(ProjectAction::DeleteProject(8))
        );
    }
}
