use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of custom fields the board uses.
///
/// Field names double as the match key against the remote board's
/// custom-field definitions, so the string forms must stay in sync with
/// the field names configured on the remote board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum FieldName {
    Priority,
    Status,
    Active,
    Duration,
    TimerStart,
    WorkDuration,
    WorkTimerStart,
}

impl FieldName {
    pub const ALL: [FieldName; 7] = [
        FieldName::Priority,
        FieldName::Status,
        FieldName::Active,
        FieldName::Duration,
        FieldName::TimerStart,
        FieldName::WorkDuration,
        FieldName::WorkTimerStart,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldName::Priority => "Priority",
            FieldName::Status => "Status",
            FieldName::Active => "Active",
            FieldName::Duration => "Duration",
            FieldName::TimerStart => "TimerStart",
            FieldName::WorkDuration => "WorkDuration",
            FieldName::WorkTimerStart => "WorkTimerStart",
        }
    }

    /// Resolve a remote field definition name, tolerating surrounding
    /// whitespace and case differences.
    pub fn from_name(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(trimmed))
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_exact() {
        assert_eq!(FieldName::from_name("Priority"), Some(FieldName::Priority));
        assert_eq!(
            FieldName::from_name("WorkTimerStart"),
            Some(FieldName::WorkTimerStart)
        );
    }

    #[test]
    fn test_from_name_tolerant() {
        assert_eq!(FieldName::from_name(" priority "), Some(FieldName::Priority));
        assert_eq!(FieldName::from_name("STATUS"), Some(FieldName::Status));
        assert_eq!(FieldName::from_name("Estimate"), None);
    }

    #[test]
    fn test_roundtrip_all() {
        for field in FieldName::ALL {
            assert_eq!(FieldName::from_name(field.as_str()), Some(field));
        }
    }
}
