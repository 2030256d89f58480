//! Card detail view. Reads the same shared state the board renders
//! from, looked up by card id, so the two views cannot disagree.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use deskboard_domain::{BadgePlacement, Card, FieldName, TimerKind};

use crate::app::{App, AppMode};
use crate::ui::badge_span;

pub fn render_detail(app: &App, frame: &mut Frame, area: Rect) {
    let state = app.engine.state.lock();
    let card = app
        .detail_card_id
        .as_deref()
        .and_then(|card_id| state.card(card_id));

    let Some(card) = card else {
        let gone = Paragraph::new("Card no longer exists on the board.")
            .block(Block::default().borders(Borders::ALL).title(" card "));
        frame.render_widget(gone, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(0)])
        .split(area);

    frame.render_widget(header(card), chunks[0]);
    frame.render_widget(description(card), chunks[1]);

    if app.mode == AppMode::AddTime || app.mode == AppMode::ToggleLabel {
        render_prompt(app, frame);
    }
}

fn header(card: &Card) -> Paragraph<'_> {
    let mut lines = Vec::new();

    let mut title_spans = vec![Span::styled(
        card.title.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    for badge in card
        .badges
        .iter()
        .filter(|b| b.placement == BadgePlacement::Top)
    {
        title_spans.push(Span::raw(" "));
        title_spans.push(badge_span(badge));
    }
    lines.push(Line::from(title_spans));

    if let Some(due) = card.due {
        lines.push(Line::from(format!("due: {}", due.format("%Y-%m-%d %H:%M"))));
    }
    if !card.people.is_empty() {
        lines.push(Line::from(format!("people: {}", card.people.join(", "))));
    }
    if !card.labels.is_empty() {
        let labels: Vec<String> = card.labels.iter().cloned().collect();
        lines.push(Line::from(format!("labels: {}", labels.join(", "))));
    }

    lines.push(Line::from(format!(
        "timer: {}  ({} min)   work: {}  ({} min)",
        running_marker(card, TimerKind::Active),
        duration_or_zero(card, FieldName::Duration),
        running_marker(card, TimerKind::Work),
        duration_or_zero(card, FieldName::WorkDuration),
    )));

    Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" card "))
}

fn running_marker(card: &Card, kind: TimerKind) -> &'static str {
    if card.timer_running(kind) {
        "running"
    } else {
        "stopped"
    }
}

fn duration_or_zero(card: &Card, field: FieldName) -> &str {
    let value = card.field(field);
    if value.is_empty() {
        "0"
    } else {
        value
    }
}

fn description(card: &Card) -> Paragraph<'_> {
    let text = if card.description.is_empty() {
        Span::styled("(no description)", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(card.description.as_str())
    };
    Paragraph::new(Line::from(text))
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" description "))
}

fn render_prompt(app: &App, frame: &mut Frame) {
    let title = match app.mode {
        AppMode::AddTime => " add time ",
        _ => " toggle label ",
    };
    let area = centered_rect(40, 3, frame.area());
    let prompt = Paragraph::new(format!("{}_", app.input.as_str()))
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(ratatui::widgets::Clear, area);
    frame.render_widget(prompt, area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
