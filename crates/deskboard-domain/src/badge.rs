//! Derived card badges.
//!
//! Badges are never stored or edited directly: they are a pure function
//! of a card's labels and custom fields, recomputed after every mutation
//! and every merge.

use crate::fields::FieldName;
use crate::timer::parse_timer_start;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BadgeKind {
    Priority,
    Status,
    Active,
    Timer,
    Label,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BadgePlacement {
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub text: String,
    pub kind: BadgeKind,
    pub placement: BadgePlacement,
}

impl Badge {
    fn top(text: impl Into<String>, kind: BadgeKind) -> Self {
        Self {
            text: text.into(),
            kind,
            placement: BadgePlacement::Top,
        }
    }

    fn bottom(text: impl Into<String>, kind: BadgeKind) -> Self {
        Self {
            text: text.into(),
            kind,
            placement: BadgePlacement::Bottom,
        }
    }
}

fn field<'a>(fields: &'a BTreeMap<FieldName, String>, name: FieldName) -> &'a str {
    fields.get(&name).map(String::as_str).unwrap_or("")
}

/// Compute the badge row for a card. Deterministic: same inputs, same
/// badges in the same order. Produces exactly one Priority badge when
/// the Priority field is non-empty and none otherwise.
pub fn derive_badges(
    labels: &BTreeSet<String>,
    fields: &BTreeMap<FieldName, String>,
) -> Vec<Badge> {
    let mut badges = Vec::new();

    let priority = field(fields, FieldName::Priority);
    if !priority.is_empty() {
        badges.push(Badge::top(priority, BadgeKind::Priority));
    }

    let status = field(fields, FieldName::Status);
    if !status.is_empty() {
        badges.push(Badge::top(status, BadgeKind::Status));
    }

    if field(fields, FieldName::Active) == "true" {
        badges.push(Badge::top("ACTIVE", BadgeKind::Active));
    }

    if parse_timer_start(field(fields, FieldName::TimerStart)).is_some() {
        badges.push(Badge::bottom("TIMER", BadgeKind::Timer));
    }
    if parse_timer_start(field(fields, FieldName::WorkTimerStart)).is_some() {
        badges.push(Badge::bottom("WORK", BadgeKind::Timer));
    }

    for label in labels {
        badges.push(Badge::bottom(label.clone(), BadgeKind::Label));
    }

    badges
}
