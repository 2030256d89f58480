use crossterm::{
    event::{DisableFocusChange, EnableFocusChange, KeyCode, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use tokio::sync::broadcast;

use deskboard_core::DeskResult;
use deskboard_domain::{CardId, DragEngine, DragItem, DragState, FieldName, TimerKind};
use deskboard_sync::{SyncEngine, SyncEvent};

use crate::editor::edit_in_external_editor;
use crate::events::{Event, EventHandler};
use crate::input::{parse_manual_minutes, InputState};
use crate::selection::SelectionState;
use crate::ui;

pub const PRIORITY_OPTIONS: [&str; 5] = ["", "LOW", "MEDIUM", "HIGH", "URGENT"];
pub const STATUS_OPTIONS: [&str; 5] = ["", "Todo", "Doing", "Blocked", "Done"];

#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    Normal,
    CardDetail,
    AddTime,
    ToggleLabel,
}

pub struct App {
    pub engine: SyncEngine,
    pub should_quit: bool,
    pub mode: AppMode,
    pub bucket_selection: SelectionState,
    pub card_selection: SelectionState,
    pub drag: DragEngine,
    pub detail_card_id: Option<CardId>,
    pub input: InputState,
    pub status: Option<String>,
    sync_events: broadcast::Receiver<SyncEvent>,
}

impl App {
    pub fn new(engine: SyncEngine) -> Self {
        let sync_events = engine.subscribe();
        Self {
            engine,
            should_quit: false,
            mode: AppMode::Normal,
            bucket_selection: SelectionState::new(),
            card_selection: SelectionState::new(),
            drag: DragEngine::new(),
            detail_card_id: None,
            input: InputState::new(),
            status: None,
            sync_events,
        }
    }

    pub async fn run(&mut self) -> DeskResult<()> {
        let mut terminal = setup_terminal()?;
        self.engine.start();

        while !self.should_quit {
            let mut events = EventHandler::new();

            loop {
                terminal.draw(|frame| ui::render(self, frame))?;

                if let Some(event) = events.next().await {
                    match event {
                        Event::Key(key) => {
                            let should_restart = self.handle_key(key, &mut terminal, &events)?;
                            if should_restart {
                                break;
                            }
                        }
                        Event::Focus(visible) => {
                            self.engine.guards.set_visible(visible);
                        }
                        Event::Tick => {
                            self.drain_sync_events();
                        }
                    }
                }

                if self.should_quit {
                    break;
                }
            }
        }

        self.engine.stop();
        restore_terminal(&mut terminal)?;
        Ok(())
    }

    fn handle_key(
        &mut self,
        key: KeyEvent,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        events: &EventHandler,
    ) -> DeskResult<bool> {
        self.status = None;
        match self.mode {
            AppMode::Normal => {
                self.handle_board_key(key);
                Ok(false)
            }
            AppMode::CardDetail => self.handle_detail_key(key, terminal, events),
            AppMode::AddTime | AppMode::ToggleLabel => {
                self.handle_prompt_key(key);
                Ok(false)
            }
        }
    }

    fn handle_board_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Esc => self.cancel_drag(),
            KeyCode::Char('m') => self.begin_card_drag(),
            KeyCode::Char('B') => self.begin_bucket_drag(),
            KeyCode::Enter => {
                if self.drag.is_dragging() {
                    self.finish_drag();
                } else {
                    self.open_detail();
                }
            }
            KeyCode::Char('r') => {
                let poller = Arc::clone(&self.engine.poller);
                tokio::spawn(async move {
                    poller.force_refresh().await;
                });
            }
            KeyCode::Left
            | KeyCode::Right
            | KeyCode::Up
            | KeyCode::Down
            | KeyCode::Char('h' | 'j' | 'k' | 'l') => self.navigate(key.code),
            _ => {}
        }
    }

    fn navigate(&mut self, code: KeyCode) {
        if self.drag.is_dragging() {
            self.move_drag(code);
            return;
        }

        let state = self.engine.state.lock();
        match code {
            KeyCode::Left | KeyCode::Char('h') => {
                self.bucket_selection.prev();
                self.card_selection.set(Some(0));
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.bucket_selection.next(state.buckets.len());
                self.card_selection.set(Some(0));
            }
            KeyCode::Up | KeyCode::Char('k') => self.card_selection.prev(),
            KeyCode::Down | KeyCode::Char('j') => {
                let cards = self
                    .bucket_selection
                    .get()
                    .and_then(|idx| state.buckets.get(idx))
                    .map(|bucket| bucket.cards.len())
                    .unwrap_or(0);
                self.card_selection.next(cards);
            }
            _ => {}
        }
        drop(state);
        self.clamp_selections();
    }

    fn begin_card_drag(&mut self) {
        let (Some(bucket), Some(card)) = (self.bucket_selection.get(), self.card_selection.get())
        else {
            return;
        };
        let state = self.engine.state.lock();
        if self.drag.begin_card(bucket, card, &state.buckets) {
            self.engine.guards.set_dragging(true);
        }
    }

    fn begin_bucket_drag(&mut self) {
        let Some(bucket) = self.bucket_selection.get() else {
            return;
        };
        let state = self.engine.state.lock();
        if self.drag.begin_bucket(bucket, &state.buckets) {
            self.engine.guards.set_dragging(true);
        }
    }

    fn move_drag(&mut self, code: KeyCode) {
        let state = &mut *self.engine.state.lock();
        match self.drag.state() {
            DragState::Dragging(DragItem::Bucket { current, .. }) => match code {
                KeyCode::Left | KeyCode::Char('h') => {
                    self.drag
                        .enter_bucket_slot(&mut state.buckets, current.saturating_sub(1));
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    self.drag.enter_bucket_slot(&mut state.buckets, current + 1);
                }
                _ => {}
            },
            DragState::Dragging(DragItem::Card {
                current: (bucket, index),
                ..
            }) => match code {
                KeyCode::Up | KeyCode::Char('k') => {
                    self.drag
                        .enter_card_slot(&mut state.buckets, bucket, index.saturating_sub(1));
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.drag
                        .enter_card_slot(&mut state.buckets, bucket, index + 1);
                }
                KeyCode::Left | KeyCode::Char('h') => {
                    if bucket > 0 {
                        self.drag
                            .enter_card_slot(&mut state.buckets, bucket - 1, index);
                    }
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    self.drag
                        .enter_card_slot(&mut state.buckets, bucket + 1, index);
                }
                _ => {}
            },
            DragState::Idle => {}
        }

        // Selection follows the dragged item
        match self.drag.state() {
            DragState::Dragging(DragItem::Bucket { current, .. }) => {
                self.bucket_selection.set(Some(current));
            }
            DragState::Dragging(DragItem::Card {
                current: (bucket, index),
                ..
            }) => {
                self.bucket_selection.set(Some(bucket));
                self.card_selection.set(Some(index));
            }
            DragState::Idle => {}
        }
    }

    fn finish_drag(&mut self) {
        let commit = {
            let state = &mut *self.engine.state.lock();
            self.drag.drop(&mut state.buckets)
        };
        self.engine.guards.set_dragging(false);
        if let Some(commit) = commit {
            self.engine.mutator.commit_drag(commit);
        }
    }

    fn cancel_drag(&mut self) {
        if !self.drag.is_dragging() {
            return;
        }
        {
            let state = &mut *self.engine.state.lock();
            self.drag.cancel(&mut state.buckets);
        }
        self.engine.guards.set_dragging(false);
        self.clamp_selections();
    }

    fn open_detail(&mut self) {
        let card_id = {
            let state = self.engine.state.lock();
            self.bucket_selection
                .get()
                .zip(self.card_selection.get())
                .and_then(|(bucket, card)| {
                    state
                        .buckets
                        .get(bucket)
                        .and_then(|b| b.cards.get(card))
                        .map(|c| c.id.clone())
                })
        };
        if let Some(card_id) = card_id {
            self.detail_card_id = Some(card_id);
            self.mode = AppMode::CardDetail;
        }
    }

    fn close_detail(&mut self) {
        // Any unsent prompt input dies with the view
        self.detail_card_id = None;
        self.input.clear();
        self.mode = AppMode::Normal;
    }

    fn handle_detail_key(
        &mut self,
        key: KeyEvent,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        events: &EventHandler,
    ) -> DeskResult<bool> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.close_detail(),
            KeyCode::Char('p') => self.cycle_field(FieldName::Priority, &PRIORITY_OPTIONS),
            KeyCode::Char('s') => self.cycle_field(FieldName::Status, &STATUS_OPTIONS),
            KeyCode::Char('a') => self.toggle_active(),
            KeyCode::Char('t') => self.toggle_timer(TimerKind::Active),
            KeyCode::Char('w') => self.toggle_timer(TimerKind::Work),
            KeyCode::Char('+') => {
                self.input.clear();
                self.mode = AppMode::AddTime;
            }
            KeyCode::Char('L') => {
                self.input.clear();
                self.mode = AppMode::ToggleLabel;
            }
            KeyCode::Char('e') => {
                self.edit_description(terminal, events)?;
                return Ok(true);
            }
            _ => {}
        }
        Ok(false)
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.input.clear();
                self.mode = AppMode::CardDetail;
            }
            KeyCode::Enter => {
                let entry = self.input.take();
                let submitted_mode = self.mode.clone();
                self.mode = AppMode::CardDetail;
                match submitted_mode {
                    AppMode::AddTime => self.submit_manual_time(&entry),
                    AppMode::ToggleLabel => self.submit_label_toggle(&entry),
                    _ => {}
                }
            }
            KeyCode::Backspace => self.input.backspace(),
            KeyCode::Char(c) => self.input.insert_char(c),
            _ => {}
        }
    }

    fn submit_manual_time(&mut self, entry: &str) {
        let Some(card_id) = self.detail_card_id.clone() else {
            return;
        };
        match parse_manual_minutes(entry) {
            Some(minutes) => {
                let result = self.engine.mutator.add_manual_time(&card_id, minutes);
                self.report(result);
            }
            None => {
                self.status = Some(format!("could not read a time from '{}'", entry));
            }
        }
    }

    fn submit_label_toggle(&mut self, entry: &str) {
        let Some(card_id) = self.detail_card_id.clone() else {
            return;
        };
        let label = entry.trim();
        if label.is_empty() {
            return;
        }
        let add = {
            let state = self.engine.state.lock();
            state.card(&card_id).is_some_and(|card| !card.has_label(label))
        };
        let result = self.engine.mutator.toggle_label(&card_id, label, add);
        self.report(result);
    }

    fn cycle_field(&mut self, field: FieldName, options: &[&str]) {
        let Some(card_id) = self.detail_card_id.clone() else {
            return;
        };
        let next = {
            let state = self.engine.state.lock();
            let Some(card) = state.card(&card_id) else {
                return;
            };
            let position = options
                .iter()
                .position(|option| *option == card.field(field))
                .unwrap_or(options.len() - 1);
            options[(position + 1) % options.len()]
        };
        let result = self.engine.mutator.set_custom_field(&card_id, field, next);
        self.report(result);
    }

    fn toggle_active(&mut self) {
        let Some(card_id) = self.detail_card_id.clone() else {
            return;
        };
        let next = {
            let state = self.engine.state.lock();
            match state.card(&card_id) {
                Some(card) if card.field(FieldName::Active) == "true" => "",
                Some(_) => "true",
                None => return,
            }
        };
        let result = self
            .engine
            .mutator
            .set_custom_field(&card_id, FieldName::Active, next);
        self.report(result);
    }

    fn toggle_timer(&mut self, kind: TimerKind) {
        let Some(card_id) = self.detail_card_id.clone() else {
            return;
        };
        let running = {
            let state = self.engine.state.lock();
            match state.card(&card_id) {
                Some(card) => card.timer_running(kind),
                None => return,
            }
        };
        let result = if running {
            self.engine.mutator.stop_timer(&card_id, kind)
        } else {
            self.engine.mutator.start_timer(&card_id, kind)
        };
        self.report(result);
    }

    fn edit_description(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        events: &EventHandler,
    ) -> DeskResult<()> {
        let Some(card_id) = self.detail_card_id.clone() else {
            return Ok(());
        };
        let current = {
            let state = self.engine.state.lock();
            match state.card(&card_id) {
                Some(card) => card.description.clone(),
                None => return Ok(()),
            }
        };

        let temp_file = std::env::temp_dir().join(format!("deskboard-{}-description.md", card_id));
        if let Some(edited) = edit_in_external_editor(terminal, events, temp_file, &current)? {
            let result = self.engine.mutator.set_description(&card_id, edited);
            self.report(result);
        }
        Ok(())
    }

    fn drain_sync_events(&mut self) {
        loop {
            match self.sync_events.try_recv() {
                Ok(SyncEvent::BoardRefreshed) => {
                    self.clamp_selections();
                    // The open card may have been deleted server-side
                    if let Some(card_id) = &self.detail_card_id {
                        if self.engine.state.lock().card(card_id).is_none() {
                            self.close_detail();
                        }
                    }
                }
                Ok(SyncEvent::CardPatched { .. }) => {}
                Ok(SyncEvent::WriteFailed { message, .. }) => {
                    self.status = Some(format!("write failed, change reverted: {}", message));
                }
                Ok(SyncEvent::MoveFailed { message, .. }) => {
                    self.status = Some(format!("move failed: {}", message));
                }
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }
    }

    fn clamp_selections(&mut self) {
        let state = self.engine.state.lock();
        self.bucket_selection.clamp(state.buckets.len());
        let cards = self
            .bucket_selection
            .get()
            .and_then(|idx| state.buckets.get(idx))
            .map(|bucket| bucket.cards.len())
            .unwrap_or(0);
        self.card_selection.clamp(cards);
    }

    fn report(&mut self, result: DeskResult<()>) {
        if let Err(err) = result {
            self.status = Some(err.to_string());
        }
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>, io::Error> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<(), io::Error> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableFocusChange, LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
