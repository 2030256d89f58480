//! Optimistic mutation layer.
//!
//! Every operation applies locally first (instant feedback), registers a
//! pending lock so the next polls cannot revert it, then fires the
//! remote write on a detached task. A failed write rolls the optimistic
//! value back (unless the user already edited the field again) and
//! releases the lock so the next poll restores server truth.

use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast;

use deskboard_core::{DeskResult, DeskboardError};
use deskboard_domain::{
    find_card_mut,
    timer::{accumulate_duration, elapsed_minutes, parse_timer_start},
    CardField, DragCommit, FieldName, TimerKind, SIMPLE_LOCK_TTL_MS, TIMER_LOCK_TTL_MS,
};
use deskboard_remote::BoardSource;

use crate::events::SyncEvent;
use crate::guards::SyncGuards;
use crate::state::SharedState;

#[derive(Clone)]
pub struct BoardMutator {
    source: Arc<dyn BoardSource>,
    state: SharedState,
    guards: Arc<SyncGuards>,
    events: broadcast::Sender<SyncEvent>,
}

impl BoardMutator {
    pub fn new(
        source: Arc<dyn BoardSource>,
        state: SharedState,
        guards: Arc<SyncGuards>,
        events: broadcast::Sender<SyncEvent>,
    ) -> Self {
        Self {
            source,
            state,
            guards,
            events,
        }
    }

    pub fn set_custom_field(
        &self,
        card_id: &str,
        field: FieldName,
        value: impl Into<String>,
    ) -> DeskResult<()> {
        self.apply_field_edit(card_id, field, value.into(), SIMPLE_LOCK_TTL_MS)
    }

    pub fn set_description(&self, card_id: &str, text: impl Into<String>) -> DeskResult<()> {
        let text = text.into();
        let previous = {
            let state = &mut *self.state.lock();
            let card = find_card_mut(&mut state.buckets, card_id)
                .ok_or_else(|| DeskboardError::NotFound(format!("card {}", card_id)))?;
            let previous = std::mem::replace(&mut card.description, text.clone());
            state
                .locks
                .lock(card_id, CardField::Description, Utc::now(), SIMPLE_LOCK_TTL_MS);
            previous
        };
        self.patched(card_id, CardField::Description);

        let this = self.clone();
        let card_id = card_id.to_string();
        tokio::spawn(async move {
            if let Err(err) = this.source.set_description(&card_id, &text).await {
                tracing::warn!(error = %err, card = %card_id, "description write failed; rolling back");
                {
                    let state = &mut *this.state.lock();
                    if let Some(card) = find_card_mut(&mut state.buckets, &card_id) {
                        if card.description == text {
                            card.description = previous;
                        }
                    }
                    state.locks.release(&card_id, &CardField::Description);
                }
                this.write_failed(card_id, CardField::Description, err.to_string());
            }
        });
        Ok(())
    }

    pub fn toggle_label(&self, card_id: &str, label: impl Into<String>, add: bool) -> DeskResult<()> {
        let label = label.into();
        {
            let state = &mut *self.state.lock();
            let card = find_card_mut(&mut state.buckets, card_id)
                .ok_or_else(|| DeskboardError::NotFound(format!("card {}", card_id)))?;
            if add {
                card.labels.insert(label.clone());
            } else {
                card.labels.remove(&label);
            }
            card.refresh_badges();
            state
                .locks
                .lock(card_id, CardField::Labels, Utc::now(), SIMPLE_LOCK_TTL_MS);
        }
        self.patched(card_id, CardField::Labels);

        let this = self.clone();
        let card_id = card_id.to_string();
        tokio::spawn(async move {
            let result = if add {
                this.source.add_label(&card_id, &label).await
            } else {
                this.source.remove_label(&card_id, &label).await
            };
            if let Err(err) = result {
                tracing::warn!(error = %err, card = %card_id, label = %label, "label write failed; rolling back");
                {
                    let state = &mut *this.state.lock();
                    if let Some(card) = find_card_mut(&mut state.buckets, &card_id) {
                        if card.has_label(&label) == add {
                            if add {
                                card.labels.remove(&label);
                            } else {
                                card.labels.insert(label.clone());
                            }
                            card.refresh_badges();
                        }
                    }
                    state.locks.release(&card_id, &CardField::Labels);
                }
                this.write_failed(card_id, CardField::Labels, err.to_string());
            }
        });
        Ok(())
    }

    pub fn start_timer(&self, card_id: &str, kind: TimerKind) -> DeskResult<()> {
        let now_ms = Utc::now().timestamp_millis();
        self.apply_field_edit(
            card_id,
            kind.start_field(),
            now_ms.to_string(),
            TIMER_LOCK_TTL_MS,
        )
    }

    /// Stop a timer: clear the start field and fold the elapsed minutes
    /// into the cumulative duration. A corrupt or absent start just
    /// clears the field; the duration is untouched and never decreases.
    pub fn stop_timer(&self, card_id: &str, kind: TimerKind) -> DeskResult<()> {
        let stop_ms = Utc::now().timestamp_millis();
        let new_duration = {
            let state = self.state.lock();
            let card = state
                .card(card_id)
                .ok_or_else(|| DeskboardError::NotFound(format!("card {}", card_id)))?;
            parse_timer_start(card.field(kind.start_field())).map(|start_ms| {
                accumulate_duration(
                    card.field(kind.duration_field()),
                    elapsed_minutes(start_ms, stop_ms),
                )
            })
        };

        self.apply_field_edit(card_id, kind.start_field(), String::new(), TIMER_LOCK_TTL_MS)?;
        if let Some(duration) = new_duration {
            self.apply_field_edit(card_id, kind.duration_field(), duration, TIMER_LOCK_TTL_MS)?;
        }
        Ok(())
    }

    /// Fold manually-entered minutes into the cumulative duration. Zero
    /// or negative totals are a no-op.
    pub fn add_manual_time(&self, card_id: &str, minutes: f64) -> DeskResult<()> {
        if minutes <= 0.0 {
            return Ok(());
        }
        let duration = {
            let state = self.state.lock();
            let card = state
                .card(card_id)
                .ok_or_else(|| DeskboardError::NotFound(format!("card {}", card_id)))?;
            accumulate_duration(card.field(FieldName::Duration), minutes)
        };
        self.apply_field_edit(card_id, FieldName::Duration, duration, SIMPLE_LOCK_TTL_MS)
    }

    /// Apply a completed drag gesture. A bucket reorder only updates the
    /// local order authority; a card move stamps the quiet-period guard
    /// and issues its single move request.
    pub fn commit_drag(&self, commit: DragCommit) {
        match commit {
            DragCommit::BucketOrder(ids) => {
                self.state.lock().order.set(ids);
            }
            DragCommit::CardMove {
                card_id,
                target_bucket,
                position,
                ..
            } => {
                self.guards.note_move(Instant::now());

                let this = self.clone();
                tokio::spawn(async move {
                    if let Err(err) = this
                        .source
                        .move_card(&card_id, &target_bucket, position)
                        .await
                    {
                        tracing::warn!(error = %err, card = %card_id, "card move failed; next poll restores server state");
                        let _ = this.events.send(SyncEvent::MoveFailed {
                            card_id,
                            message: err.to_string(),
                        });
                    }
                });
            }
        }
    }

    fn apply_field_edit(
        &self,
        card_id: &str,
        field: FieldName,
        value: String,
        ttl_ms: i64,
    ) -> DeskResult<()> {
        let previous = {
            let state = &mut *self.state.lock();
            let card = find_card_mut(&mut state.buckets, card_id)
                .ok_or_else(|| DeskboardError::NotFound(format!("card {}", card_id)))?;
            let previous = card.field(field).to_string();
            card.set_field(field, value.clone());
            card.refresh_badges();
            state
                .locks
                .lock(card_id, CardField::Custom(field), Utc::now(), ttl_ms);
            previous
        };
        self.patched(card_id, CardField::Custom(field));

        let this = self.clone();
        let card_id = card_id.to_string();
        tokio::spawn(async move {
            if let Err(err) = this.source.set_custom_field(&card_id, field, &value).await {
                tracing::warn!(error = %err, card = %card_id, field = %field, "field write failed; rolling back");
                {
                    let state = &mut *this.state.lock();
                    if let Some(card) = find_card_mut(&mut state.buckets, &card_id) {
                        if card.field(field) == value {
                            card.set_field(field, previous);
                            card.refresh_badges();
                        }
                    }
                    state.locks.release(&card_id, &CardField::Custom(field));
                }
                this.write_failed(card_id, CardField::Custom(field), err.to_string());
            }
        });
        Ok(())
    }

    fn patched(&self, card_id: &str, field: CardField) {
        let _ = self.events.send(SyncEvent::CardPatched {
            card_id: card_id.to_string(),
            field,
        });
    }

    fn write_failed(&self, card_id: String, field: CardField, message: String) {
        let _ = self.events.send(SyncEvent::WriteFailed {
            card_id,
            field,
            message,
        });
    }
}
