//! Recap and weekly leaderboard queries

use chrono::NaiveDate;
use serde::Serialize;

use crate::aggregate::{Aggregator, Leaderboard};
use crate::edition::{EditionAnchor, EditionWindow};
use crate::observation::Observation;

/// Leaderboard for a single edition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditionBoard {
    pub edition: i64,
    pub leaderboard: Leaderboard,
}

/// Boards for the latest edition on record and the one before it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recap {
    pub previous: EditionBoard,
    pub latest: EditionBoard,
}

/// Full leaderboard over the trailing seven-edition window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Weekly {
    pub window: EditionWindow,
    pub leaderboard: Leaderboard,
}

/// Top-`n` boards for the two most recent editions
///
/// The latest edition is the highest edition on record. Either board may be
/// empty when nobody reported that edition. Returns `None` when there are no
/// observations at all.
pub fn recap(aggregator: &Aggregator, observations: &[Observation], n: usize) -> Option<Recap> {
    let latest = i64::from(observations.iter().map(|obs| obs.edition).max()?);
    let previous = latest - 1;

    let board_for = |edition: i64| EditionBoard {
        edition,
        leaderboard: aggregator.top_n(
            observations
                .iter()
                .filter(|obs| i64::from(obs.edition) == edition),
            n,
        ),
    };

    Some(Recap {
        previous: board_for(previous),
        latest: board_for(latest),
    })
}

/// Full ranked leaderboard for the week ending yesterday
pub fn weekly(
    aggregator: &Aggregator,
    anchor: &EditionAnchor,
    observations: &[Observation],
    today: NaiveDate,
) -> Weekly {
    let window = anchor.weekly_window(today);
    let leaderboard = aggregator.ranked(observations.iter().filter(|obs| window.contains(obs.edition)));
    Weekly { window, leaderboard }
}
