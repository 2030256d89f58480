//! Wire-to-domain normalization.
//!
//! All shape-sniffing happens here, once, at the fetch boundary. The
//! merge engine and the UI only ever see fully-populated domain types.
//! Alongside the snapshot this produces a directory of remote ids
//! (custom fields, dropdown options, labels) that write calls need.

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};

use deskboard_domain::{BoardSnapshot, Bucket, Card, FieldName};

use crate::wire::{WireBoard, WireCustomFieldItem};

#[derive(Debug, Clone, Default)]
pub struct FieldSlot {
    pub id: String,
    /// Dropdown option text -> option id. Empty for free-form fields.
    pub options: HashMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct FieldDirectory {
    pub fields: HashMap<FieldName, FieldSlot>,
    /// Normalized label name -> label id.
    pub labels: HashMap<String, String>,
}

impl FieldDirectory {
    pub fn field_id(&self, name: FieldName) -> Option<&str> {
        self.fields.get(&name).map(|slot| slot.id.as_str())
    }

    pub fn option_id(&self, name: FieldName, text: &str) -> Option<&str> {
        self.fields
            .get(&name)
            .and_then(|slot| slot.options.get(text))
            .map(String::as_str)
    }

    pub fn label_id(&self, name: &str) -> Option<&str> {
        self.labels
            .get(&name.trim().to_lowercase())
            .map(String::as_str)
    }
}

pub fn normalize_board(board: WireBoard) -> (BoardSnapshot, FieldDirectory) {
    // Field definitions: def id -> field name, plus option id -> text
    let mut directory = FieldDirectory::default();
    let mut def_names: HashMap<String, FieldName> = HashMap::new();
    let mut option_texts: HashMap<String, String> = HashMap::new();

    for def in &board.custom_fields {
        let Some(name) = FieldName::from_name(&def.name) else {
            continue;
        };
        def_names.insert(def.id.clone(), name);
        let mut slot = FieldSlot {
            id: def.id.clone(),
            options: HashMap::new(),
        };
        for option in &def.options {
            option_texts.insert(option.id.clone(), option.value.text.clone());
            slot.options
                .insert(option.value.text.clone(), option.id.clone());
        }
        directory.fields.insert(name, slot);
    }

    for label in &board.labels {
        if !label.name.is_empty() {
            directory
                .labels
                .insert(label.name.trim().to_lowercase(), label.id.clone());
        }
    }

    let member_names: HashMap<&str, &str> = board
        .members
        .iter()
        .map(|member| (member.id.as_str(), member.full_name.as_str()))
        .collect();

    let mut lists = board.lists;
    lists.sort_by(|a, b| a.pos.total_cmp(&b.pos));

    let mut buckets: Vec<Bucket> = lists
        .iter()
        .map(|list| Bucket::new(list.id.clone(), list.name.clone()))
        .collect();
    let bucket_index: HashMap<&str, usize> = lists
        .iter()
        .enumerate()
        .map(|(idx, list)| (list.id.as_str(), idx))
        .collect();

    let mut cards = board.cards;
    cards.sort_by(|a, b| a.pos.total_cmp(&b.pos));

    for wire in cards {
        // Cards pointing at a list we did not receive are unplaceable
        let Some(&idx) = bucket_index.get(wire.id_list.as_str()) else {
            tracing::debug!(card = %wire.id, list = %wire.id_list, "dropping card with unknown list");
            continue;
        };

        let mut card = Card::new(wire.id, wire.id_list, wire.name);
        card.description = wire.desc;
        card.pos = wire.pos;
        card.due = wire.due.as_deref().and_then(parse_due);
        card.labels = wire
            .labels
            .iter()
            .filter(|label| !label.name.is_empty())
            .map(|label| label.name.clone())
            .collect();
        card.people = wire
            .id_members
            .iter()
            .filter_map(|id| member_names.get(id.as_str()))
            .map(|name| name.to_string())
            .collect();
        card.custom_fields =
            resolve_fields(&wire.custom_field_items, &def_names, &option_texts);
        card.refresh_badges();

        buckets[idx].cards.push(card);
    }

    (BoardSnapshot::from_buckets(buckets), directory)
}

fn resolve_fields(
    items: &[WireCustomFieldItem],
    def_names: &HashMap<String, FieldName>,
    option_texts: &HashMap<String, String>,
) -> BTreeMap<FieldName, String> {
    let mut fields = BTreeMap::new();
    for item in items {
        let Some(&name) = def_names.get(&item.id_custom_field) else {
            continue;
        };
        let value = item
            .id_value
            .as_ref()
            .and_then(|id| option_texts.get(id).cloned())
            .or_else(|| item.value.as_ref().and_then(|value| value.as_string()));
        if let Some(value) = value {
            if !value.is_empty() {
                fields.insert(name, value);
            }
        }
    }
    fields
}

fn parse_due(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}
