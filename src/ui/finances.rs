use crossterm::event::{KeyCode, KeyEvent};
use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::finance::FinanceOverview;
use crate::format::{currency, short_date};
use crate::models::{Payment, PaymentWithProject, Phase, Project};

pub struct FinancesState {
    profile_id: i32,
    overview: FinanceOverview,
    transactions: Vec<PaymentWithProject>,
    table_state: TableState,
}

impl FinancesState {
    pub fn new(
        profile_id: i32,
        projects: &[Project],
        phases: &[Phase],
        transactions: Vec<PaymentWithProject>,
    ) -> Self {
        let payments: Vec<Payment> = transactions.iter().map(|t| t.payment.clone()).collect();
        let overview = FinanceOverview::compute(projects, phases, &payments);

        let mut table_state = TableState::default();
        if !transactions.is_empty() {
            table_state.select(Some(0));
        }

        Self {
            profile_id,
            overview,
            transactions,
            table_state,
        }
    }

    pub fn profile_id(&self) -> i32 {
        self.profile_id
    }

    pub fn overview(&self) -> &FinanceOverview {
        &self.overview
    }

    fn step(&mut self, forward: bool) {
        let len = self.transactions.len();
        if len == 0 {
            return;
        }
        let i = match (self.table_state.selected(), forward) {
            (Some(i), true) => (i + 1) % len,
            (Some(0) | None, false) => len - 1,
            (Some(i), false) => i - 1,
            (None, true) => 0,
        };
        self.table_state.select(Some(i));
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum FinanceAction {
    Back,
}

pub fn render_finances<B: Backend>(f: &mut Frame<B>, state: &mut FinancesState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(4), Constraint::Min(5), Constraint::Length(3)].as_ref())
        .split(f.size());

    let title = Paragraph::new("Finances")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    render_cards(f, &state.overview, chunks[1]);

    let header = Row::new(vec!["Date", "Project", "Type", "Amount", "Notes"])
        .style(Style::default().fg(Color::Yellow))
        .bottom_margin(1);
    let rows: Vec<Row> = state
        .transactions
        .iter()
        .map(|t| {
            Row::new(vec![
                Cell::from(short_date(&t.payment.date)),
                Cell::from(t.project_name.clone().unwrap_or_else(|| "-".to_string())),
                Cell::from(t.payment.payment_type.display_label()),
                Cell::from(Span::styled(currency(t.payment.amount), Style::default().fg(Color::Green))),
                Cell::from(t.payment.notes.clone().unwrap_or_default()),
            ])
        })
        .collect();

    let table_title = if state.transactions.is_empty() {
        "No transactions yet"
    } else {
        "Transactions"
    };
    let table = Table::new(rows)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(table_title))
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
        .widths(&[
            Constraint::Percentage(15),
            Constraint::Percentage(25),
            Constraint::Percentage(18),
            Constraint::Percentage(15),
            Constraint::Percentage(27),
        ]);
    f.render_stateful_widget(table, chunks[2], &mut state.table_state);

    let help = Paragraph::new("<Up/Down> Scroll | <Esc> Back")
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::TOP));
    f.render_widget(help, chunks[3]);
}

fn render_cards<B: Backend>(f: &mut Frame<B>, overview: &FinanceOverview, area: Rect) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4].as_ref())
        .split(area);

    let figures = [
        ("Total Revenue", overview.revenue, Color::Green),
        ("Expenses", overview.expenses, Color::Red),
        ("Net Profit", overview.profit, Color::Cyan),
        ("Pending", overview.pending, Color::Yellow),
    ];
    for ((title, amount, color), area) in figures.into_iter().zip(cards.iter()) {
        let card = Paragraph::new(Span::styled(
            currency(amount),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(card, *area);
    }
}

pub fn handle_input(state: &mut FinancesState, key: KeyEvent) -> Option<FinanceAction> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => return Some(FinanceAction::Back),
        KeyCode::Down => state.step(true),
        KeyCode::Up => state.step(false),
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::tests::{payment, project};
    use crate::models::{PaymentType, ProjectStatus};
    use crate::progress::tests::phase;
    use crate::ui::components::form::tests::key;

    #[test]
    fn overview_uses_every_transaction() {
        let projects = vec![project(1, ProjectStatus::Ongoing)];
        let phases = vec![phase(1, "Build", None, &[])];
        let transactions = vec![
            PaymentWithProject {
                payment: payment(1, 1, 700.0, PaymentType::Advance),
                project_name: Some("Project 1".to_string()),
            },
            PaymentWithProject {
                payment: payment(2, 1, 300.0, PaymentType::Adhoc),
                project_name: Some("Project 1".to_string()),
            },
        ];

        let mut state = FinancesState::new(1, &projects, &phases, transactions);
        assert_eq!(state.overview().revenue, 1000.0);
        assert_eq!(state.overview().profit, 1000.0);
        assert_eq!(state.overview().pending, 1000.0);

        state.step(false);
        assert_eq!(state.table_state.selected(), Some(1));
        assert_eq!(handle_input(&mut state, key(KeyCode::Esc)), Some(FinanceAction::Back));
    }
}
