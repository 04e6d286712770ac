//! Calendar date to edition resolution
//!
//! A new puzzle is published every day, so one known (edition, date) pair is
//! enough to project any date onto an edition number.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// A known edition and the calendar date it was published
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditionAnchor {
    pub edition: u32,
    pub date: NaiveDate,
}

/// Inclusive range of editions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EditionWindow {
    pub start: i64,
    pub end: i64,
}

impl EditionWindow {
    pub fn contains(&self, edition: u32) -> bool {
        let edition = i64::from(edition);
        self.start <= edition && edition <= self.end
    }
}

impl EditionAnchor {
    /// Edition published on `date`
    ///
    /// Dates before the anchor may yield zero or negative editions.
    pub fn edition_for_date(&self, date: NaiveDate) -> i64 {
        i64::from(self.edition) + (date - self.date).num_days()
    }

    /// The trailing seven editions ending yesterday
    pub fn weekly_window(&self, today: NaiveDate) -> EditionWindow {
        let yesterday = today.checked_sub_days(Days::new(1)).unwrap_or(today);
        let end = self.edition_for_date(yesterday);
        EditionWindow { start: end - 6, end }
    }
}

impl Default for EditionAnchor {
    /// Wordle 238 was published on 2022-02-12
    fn default() -> Self {
        Self {
            edition: 238,
            date: NaiveDate::from_ymd_opt(2022, 2, 12).unwrap_or_default(),
        }
    }
}
