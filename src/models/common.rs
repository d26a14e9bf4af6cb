//! Shared enumerations stored as text columns

use serde::{Deserialize, Serialize};

/// Yes/no answer as stored by the portal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum YesNo {
    #[serde(alias = "Yes", alias = "YES")]
    Yes,
    #[default]
    #[serde(alias = "No", alias = "NO")]
    No,
}

impl YesNo {
    pub fn is_yes(self) -> bool {
        matches!(self, YesNo::Yes)
    }
}

impl From<bool> for YesNo {
    fn from(value: bool) -> Self {
        if value {
            YesNo::Yes
        } else {
            YesNo::No
        }
    }
}

/// Lifecycle of base and published events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Upcoming,
    Ongoing,
    Completed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_no_accepts_capitalised_input() {
        let parsed: YesNo = serde_json::from_str("\"Yes\"").unwrap();
        assert_eq!(parsed, YesNo::Yes);
        assert_eq!(serde_json::to_string(&YesNo::No).unwrap(), "\"no\"");
    }

    #[test]
    fn event_status_defaults_to_upcoming() {
        assert_eq!(EventStatus::default(), EventStatus::Upcoming);
    }
}
