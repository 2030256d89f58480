use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use deskboard_domain::{Badge, BadgePlacement, Bucket, DragItem, DragState};

use crate::app::{App, AppMode};
use crate::detail;

pub fn render(app: &mut App, frame: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(frame.area());

    match app.mode {
        AppMode::Normal => render_board(app, frame, chunks[0]),
        AppMode::CardDetail | AppMode::AddTime | AppMode::ToggleLabel => {
            detail::render_detail(app, frame, chunks[0]);
        }
    }
    render_footer(app, frame, chunks[1]);
}

fn render_board(app: &App, frame: &mut Frame, area: Rect) {
    let state = app.engine.state.lock();

    if state.buckets.is_empty() {
        let empty = Paragraph::new("No buckets yet. Waiting for the first poll...")
            .block(Block::default().borders(Borders::ALL).title(" deskboard "));
        frame.render_widget(empty, area);
        return;
    }

    let constraints: Vec<Constraint> = state
        .buckets
        .iter()
        .map(|_| Constraint::Ratio(1, state.buckets.len() as u32))
        .collect();
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    let selected_bucket = app.bucket_selection.get();
    let dragging = app.drag.state();

    for (idx, bucket) in state.buckets.iter().enumerate() {
        let is_selected = selected_bucket == Some(idx);
        let is_dragged =
            matches!(dragging, DragState::Dragging(DragItem::Bucket { current, .. }) if current == idx);

        let border_style = if is_dragged {
            Style::default().fg(Color::Yellow)
        } else if is_selected {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!(" {} ({}) ", bucket.title, bucket.cards.len()));

        let lines = bucket_lines(app, bucket, idx, is_selected, dragging);
        frame.render_widget(Paragraph::new(lines).block(block), columns[idx]);
    }
}

fn bucket_lines<'a>(
    app: &App,
    bucket: &'a Bucket,
    bucket_idx: usize,
    bucket_selected: bool,
    dragging: DragState,
) -> Vec<Line<'a>> {
    let mut lines = Vec::new();
    for (card_idx, card) in bucket.cards.iter().enumerate() {
        let selected = bucket_selected && app.card_selection.get() == Some(card_idx);
        let dragged = matches!(
            dragging,
            DragState::Dragging(DragItem::Card { current, .. }) if current == (bucket_idx, card_idx)
        );

        let marker = if dragged {
            "⇅ "
        } else if selected {
            "> "
        } else {
            "  "
        };
        let style = if dragged {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else if selected {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };

        let mut spans = vec![Span::styled(format!("{}{}", marker, card.title), style)];
        for badge in card.badges.iter().filter(|b| b.placement == BadgePlacement::Top) {
            spans.push(Span::raw(" "));
            spans.push(badge_span(badge));
        }
        lines.push(Line::from(spans));
    }
    lines
}

pub(crate) fn badge_span(badge: &Badge) -> Span<'static> {
    use deskboard_domain::BadgeKind;
    let color = match badge.kind {
        BadgeKind::Priority => Color::Red,
        BadgeKind::Status => Color::Blue,
        BadgeKind::Active => Color::Green,
        BadgeKind::Timer => Color::Magenta,
        BadgeKind::Label => Color::Gray,
    };
    Span::styled(format!("[{}]", badge.text), Style::default().fg(color))
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let text = if let Some(status) = &app.status {
        Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Red),
        ))
    } else {
        let hints = match app.mode {
            AppMode::Normal if app.drag.is_dragging() => {
                "arrows: move | Enter: drop | Esc: cancel"
            }
            AppMode::Normal => {
                "arrows: navigate | Enter: open | m: move card | B: move bucket | r: refresh | q: quit"
            }
            AppMode::CardDetail => {
                "p/s: priority/status | a: active | t/w: timers | +: add time | L: label | e: edit desc | Esc: back"
            }
            AppMode::AddTime => "minutes or h:mm, Enter to apply | Esc: back",
            AppMode::ToggleLabel => "label name, Enter to toggle | Esc: back",
        };
        Line::from(Span::raw(hints))
    };

    let footer = Paragraph::new(text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
