use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};
use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::format::{currency, label, percent};
use crate::report::{top, ReportData, ReportFormat};

pub struct ReportsState {
    profile_id: i32,
    pub data: ReportData,
    pub generated_at: DateTime<Local>,
}

impl ReportsState {
    pub fn new(profile_id: i32, data: ReportData, generated_at: DateTime<Local>) -> Self {
        Self {
            profile_id,
            data,
            generated_at,
        }
    }

    pub fn profile_id(&self) -> i32 {
        self.profile_id
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ReportAction {
    Back,
    Export(ReportFormat),
}

pub fn render_reports<B: Backend>(f: &mut Frame<B>, state: &mut ReportsState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(4),
                Constraint::Length(4),
                Constraint::Min(7),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(f.size());

    let title = Paragraph::new(format!(
        "Reports | generated {}",
        state.generated_at.format("%d %b %Y, %H:%M")
    ))
    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let data = &state.data;
    render_row(
        f,
        chunks[1],
        &[
            ("Total Projects", data.total_projects.to_string(), Color::White),
            ("Total Value", currency(data.total_value), Color::Cyan),
            ("Received", currency(data.total_received), Color::Green),
            ("Pending", currency(data.total_pending), Color::Yellow),
        ],
    );
    render_row(
        f,
        chunks[2],
        &[
            ("Collection Rate", percent(data.collection_rate), Color::Magenta),
            ("Ongoing", data.ongoing_projects.to_string(), Color::Cyan),
            ("Completed", data.completed_projects.to_string(), Color::Green),
            ("Pending", data.pending_projects.to_string(), Color::Yellow),
        ],
    );

    let breakdowns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(chunks[3]);

    let sources: Vec<Spans> = top(&data.client_sources)
        .into_iter()
        .map(|(source, count)| {
            Spans::from(vec![
                Span::styled(format!("{:<18}", label(Some(&source))), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(format!("{} ({})", count, percent(data.share_of_projects(count)))),
            ])
        })
        .collect();
    f.render_widget(
        Paragraph::new(or_empty(sources)).block(Block::default().title("Top Client Sources").borders(Borders::ALL)),
        breakdowns[0],
    );

    let work_types: Vec<Spans> = top(&data.work_types)
        .into_iter()
        .map(|(work_type, count)| {
            let revenue = data.revenue_by_work_type.get(&work_type).copied().unwrap_or(0.0);
            Spans::from(vec![
                Span::styled(format!("{:<18}", label(Some(&work_type))), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(format!("{} projects | ", count)),
                Span::styled(currency(revenue), Style::default().fg(Color::Green)),
            ])
        })
        .collect();
    f.render_widget(
        Paragraph::new(or_empty(work_types)).block(Block::default().title("Work Types").borders(Borders::ALL)),
        breakdowns[1],
    );

    let help = Paragraph::new("<C> Export CSV | <T> Export text | <Esc> Back")
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::TOP));
    f.render_widget(help, chunks[4]);
}

fn or_empty(lines: Vec<Spans<'_>>) -> Vec<Spans<'_>> {
    if lines.is_empty() {
        vec![Spans::from(Span::styled("No data yet", Style::default().fg(Color::Gray)))]
    } else {
        lines
    }
}

fn render_row<B: Backend>(f: &mut Frame<B>, area: Rect, cards: &[(&str, String, Color)]) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4].as_ref())
        .split(area);

    for ((title, value, color), area) in cards.iter().zip(columns.iter()) {
        let card = Paragraph::new(Span::styled(
            value.as_str(),
            Style::default().fg(*color).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(*title));
        f.render_widget(card, *area);
    }
}

pub fn handle_input(_state: &mut ReportsState, key: KeyEvent) -> Option<ReportAction> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => Some(ReportAction::Back),
        KeyCode::Char('c') => Some(ReportAction::Export(ReportFormat::Csv)),
        KeyCode::Char('t') => Some(ReportAction::Export(ReportFormat::Text)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::components::form::tests::key;

    #[test]
    fn export_keys_pick_the_format() {
        let mut state = ReportsState::new(1, ReportData::default(), Local::now());
        assert_eq!(
            handle_input(&mut state, key(KeyCode::Char('c'))),
            Some(ReportAction::Export(ReportFormat::Csv))
        );
        assert_eq!(
            handle_input(&mut state, key(KeyCode::Char('t'))),
            Some(ReportAction::Export(ReportFormat::Text))
        );
        assert_eq!(handle_input(&mut state, key(KeyCode::Esc)), Some(ReportAction::Back));
    }
}
