//! Bucket visibility and ordering.
//!
//! These are deliberately two separate authorities: the persona decides
//! which buckets are shown, and the order authority decides their
//! sequence. Conflating them (the obvious title-allow-list shortcut)
//! silently drops any server bucket whose title drifts.

use serde::{Deserialize, Serialize};

use crate::bucket::{Bucket, BucketId};

fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Persona-configured visibility filter over bucket titles. Matching is
/// trimmed and case-insensitive so cosmetic renames don't hide buckets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BucketFilter {
    visible: Option<Vec<String>>,
}

impl BucketFilter {
    /// Show everything.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn from_titles<S: AsRef<str>>(titles: &[S]) -> Self {
        Self {
            visible: Some(titles.iter().map(|t| normalize_title(t.as_ref())).collect()),
        }
    }

    pub fn is_visible(&self, title: &str) -> bool {
        match &self.visible {
            None => true,
            Some(titles) => titles.contains(&normalize_title(title)),
        }
    }

    pub fn retain(&self, buckets: Vec<Bucket>) -> Vec<Bucket> {
        match &self.visible {
            None => buckets,
            Some(_) => buckets
                .into_iter()
                .filter(|bucket| self.is_visible(&bucket.title))
                .collect(),
        }
    }
}

/// Client-side bucket order authority.
///
/// Starts deferring to server order; once the user reorders, the recorded
/// id sequence governs every later snapshot. Buckets the authority has
/// never seen (created server-side after the reorder) append in server
/// order rather than disappearing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BucketOrder {
    order: Option<Vec<BucketId>>,
}

impl BucketOrder {
    pub fn server_order() -> Self {
        Self::default()
    }

    pub fn is_user_defined(&self) -> bool {
        self.order.is_some()
    }

    pub fn set(&mut self, ids: Vec<BucketId>) {
        self.order = Some(ids);
    }

    /// Forget the user order (logout/reconnect).
    pub fn reset(&mut self) {
        self.order = None;
    }

    pub fn apply(&self, buckets: Vec<Bucket>) -> Vec<Bucket> {
        let Some(order) = &self.order else {
            return buckets;
        };

        let mut remaining = buckets;
        let mut sorted = Vec::with_capacity(remaining.len());

        for id in order {
            if let Some(idx) = remaining.iter().position(|bucket| &bucket.id == id) {
                sorted.push(remaining.remove(idx));
            }
        }
        sorted.extend(remaining);
        sorted
    }
}
