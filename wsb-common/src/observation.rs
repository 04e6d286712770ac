//! Observation records: one row per reported score

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::parser::ScoreHeader;
use crate::scoring::ScoreToken;

/// A single reported score, immutable once recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// When the report was received
    pub timestamp: DateTime<FixedOffset>,
    /// Display identity of the reporter
    pub user_id: String,
    /// Daily puzzle number
    pub edition: u32,
    pub score: ScoreToken,
}

impl Observation {
    pub fn new(
        timestamp: DateTime<FixedOffset>,
        user_id: impl Into<String>,
        edition: u32,
        score: ScoreToken,
    ) -> Self {
        Self {
            timestamp,
            user_id: user_id.into(),
            edition,
            score,
        }
    }

    /// Build an observation from a parsed report header
    pub fn from_header(
        timestamp: DateTime<FixedOffset>,
        user_id: impl Into<String>,
        header: ScoreHeader,
    ) -> Self {
        Self::new(timestamp, user_id, header.edition, header.score)
    }
}

/// Derive the display identity recorded for a reporter
///
/// The username wins when present and non-empty; otherwise the given and
/// family names are concatenated as-is.
pub fn derive_user_id(username: Option<&str>, first_name: &str, last_name: Option<&str>) -> String {
    match username {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => format!("{}{}", first_name, last_name.unwrap_or_default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_user_id_prefers_username() {
        assert_eq!(derive_user_id(Some("alice"), "Alice", Some("Smith")), "alice");
    }

    #[test]
    fn test_derive_user_id_falls_back_to_names() {
        assert_eq!(derive_user_id(None, "Alice", Some("Smith")), "AliceSmith");
        assert_eq!(derive_user_id(Some(""), "Alice", Some("Smith")), "AliceSmith");
        assert_eq!(derive_user_id(None, "Alice", None), "Alice");
    }

    #[test]
    fn test_from_header() {
        let ts = DateTime::parse_from_rfc3339("2022-02-12T08:30:00+00:00").unwrap();
        let header = ScoreHeader {
            edition: 238,
            score: ScoreToken::Four,
        };
        let obs = Observation::from_header(ts, "bob", header);
        assert_eq!(obs.edition, 238);
        assert_eq!(obs.score, ScoreToken::Four);
        assert_eq!(obs.user_id, "bob");
    }
}
