use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::badge::{derive_badges, Badge};
use crate::bucket::BucketId;
use crate::fields::FieldName;
use crate::timer::{parse_timer_start, TimerKind};

/// Opaque id assigned by the remote board. The client never mints one.
pub type CardId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub bucket_id: BucketId,
    pub title: String,
    #[serde(default)]
    pub due: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pos: f64,
    #[serde(default)]
    pub labels: BTreeSet<String>,
    #[serde(default)]
    pub people: Vec<String>,
    #[serde(default)]
    pub custom_fields: BTreeMap<FieldName, String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub badges: Vec<Badge>,
}

impl Card {
    pub fn new(id: impl Into<CardId>, bucket_id: impl Into<BucketId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            bucket_id: bucket_id.into(),
            title: title.into(),
            due: None,
            pos: 0.0,
            labels: BTreeSet::new(),
            people: Vec::new(),
            custom_fields: BTreeMap::new(),
            description: String::new(),
            badges: Vec::new(),
        }
    }

    /// Current value of a custom field; unset fields read as empty.
    pub fn field(&self, name: FieldName) -> &str {
        self.custom_fields
            .get(&name)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Set a custom field. An empty value clears the entry so "unset"
    /// has one representation.
    pub fn set_field(&mut self, name: FieldName, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            self.custom_fields.remove(&name);
        } else {
            self.custom_fields.insert(name, value);
        }
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    pub fn timer_running(&self, kind: TimerKind) -> bool {
        parse_timer_start(self.field(kind.start_field())).is_some()
    }

    pub fn refresh_badges(&mut self) {
        self.badges = derive_badges(&self.labels, &self.custom_fields);
    }
}
