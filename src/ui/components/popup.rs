use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// A message shown over the current screen until any key is pressed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

pub fn render_notice<B: Backend>(frame: &mut Frame<B>, notice: &Notice) {
    let area = centered_rect(60, 25, frame.size());
    let (title, color) = match notice.kind {
        NoticeKind::Info => ("Done", Color::Green),
        NoticeKind::Error => ("Something went wrong", Color::Red),
    };

    let popup = Paragraph::new(vec![
        Spans::from(""),
        Spans::from(notice.message.as_str()),
        Spans::from(""),
        Spans::from(Span::styled("Press any key to continue", Style::default().fg(Color::Gray))),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title(Span::styled(title, Style::default().fg(color).add_modifier(Modifier::BOLD)))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color)),
    );

    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

pub fn render_confirm<B: Backend>(frame: &mut Frame<B>, title: &str, lines: &[&str]) {
    let area = centered_rect(50, 25, frame.size());

    let mut text = vec![Spans::from("")];
    text.extend(lines.iter().map(|l| Spans::from(*l)));
    text.push(Spans::from(""));
    text.push(Spans::from("<Y> Yes  <N> No"));

    let popup = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().title(title).borders(Borders::ALL))
        .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

/// A rectangle of the given percentages centered in `r`
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_stays_inside_parent() {
        let parent = Rect::new(0, 0, 100, 40);
        let inner = centered_rect(50, 50, parent);
        assert_eq!(inner.width, 50);
        assert_eq!(inner.height, 20);
        assert_eq!(inner.x, 25);
        assert_eq!(inner.y, 10);
    }
}
