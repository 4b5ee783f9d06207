use crate::state::{AppState, CounterState, StatusState};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the entire application UI
pub fn render(state: &AppState, area: Rect, f: &mut Frame) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(area);

    let counters = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    render_counter(" left (a/z) ", &state.left, counters[0], f);
    render_counter(" right (k/j) ", &state.right, counters[1], f);
    render_status(&state.status, rows[1], f);
    render_help(rows[2], f);
}

fn render_counter(title: &str, counter: &CounterState, area: Rect, f: &mut Frame) {
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let color = if counter.value < 0 {
        Color::Red
    } else {
        Color::Green
    };

    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            counter.value.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
    ])
    .block(block)
    .alignment(Alignment::Center);

    f.render_widget(paragraph, area);
}

fn render_status(status: &StatusState, area: Rect, f: &mut Frame) {
    let mut spans = Vec::new();
    if status.is_busy() {
        spans.push(Span::styled(
            format!("⏳ {} pending ", status.pending_requests),
            Style::default().fg(Color::Yellow),
        ));
    }
    if let Some(message) = &status.message {
        spans.push(Span::raw(message.as_str()));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().title(" status ").borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

fn render_help(area: Rect, f: &mut Frame) {
    let hint = Style::default().fg(Color::Cyan);
    let line = Line::from(vec![
        Span::styled(" space ", hint),
        Span::raw("feeling lucky  ").dim(),
        Span::styled(" r ", hint),
        Span::raw("reset  ").dim(),
        Span::styled(" q ", hint),
        Span::raw("quit").dim(),
    ]);

    f.render_widget(
        Paragraph::new(line).block(Block::default().borders(Borders::ALL)),
        area,
    );
}
