//! Leaderboard aggregation
//!
//! Sums points per user over a set of observations and ranks the result.
//! Ranking keeps every user tied with the last included position, so a
//! top-5 board can hold more than five users.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::observation::Observation;
use crate::scoring::{Points, PointsTable};

/// Number of positions shown on a recap board
pub const DEFAULT_TOP_N: usize = 5;

/// How repeated reports of one edition by one user are counted
///
/// The bot historically summed every report, so `None` is the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupPolicy {
    /// Count every report
    #[default]
    None,
    /// Count only the earliest report per (user, edition)
    KeepFirst,
    /// Count only the latest report per (user, edition)
    KeepLast,
}

impl DedupPolicy {
    /// Filter observations according to the policy, preserving input order
    ///
    /// "First" and "last" refer to store order, which is append order.
    pub fn apply<'a, I>(&self, observations: I) -> Vec<&'a Observation>
    where
        I: IntoIterator<Item = &'a Observation>,
    {
        match self {
            DedupPolicy::None => observations.into_iter().collect(),
            DedupPolicy::KeepFirst => {
                let mut seen = HashSet::new();
                observations
                    .into_iter()
                    .filter(|obs| seen.insert((obs.user_id.as_str(), obs.edition)))
                    .collect()
            }
            DedupPolicy::KeepLast => {
                let all: Vec<&Observation> = observations.into_iter().collect();
                let mut last_index = HashMap::new();
                for (i, obs) in all.iter().enumerate() {
                    last_index.insert((obs.user_id.as_str(), obs.edition), i);
                }
                all.iter()
                    .enumerate()
                    .filter(|(i, obs)| last_index.get(&(obs.user_id.as_str(), obs.edition)) == Some(i))
                    .map(|(_, obs)| *obs)
                    .collect()
            }
        }
    }
}

/// One user's aggregated points
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub user_id: String,
    pub points: Points,
}

/// Ordered user → points mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Leaderboard {
    standings: Vec<Standing>,
}

impl Leaderboard {
    pub fn len(&self) -> usize {
        self.standings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.standings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Standing> {
        self.standings.iter()
    }

    /// Points for a user, if present
    pub fn get(&self, user_id: &str) -> Option<Points> {
        self.standings
            .iter()
            .find(|s| s.user_id == user_id)
            .map(|s| s.points)
    }

    /// Users in board order
    pub fn users(&self) -> Vec<&str> {
        self.standings.iter().map(|s| s.user_id.as_str()).collect()
    }

    fn sort_descending(&mut self) {
        // Stable: equal totals keep first-seen order
        self.standings.sort_by(|a, b| b.points.cmp(&a.points));
    }
}

impl<'a> IntoIterator for &'a Leaderboard {
    type Item = &'a Standing;
    type IntoIter = std::slice::Iter<'a, Standing>;

    fn into_iter(self) -> Self::IntoIter {
        self.standings.iter()
    }
}

/// Sums and ranks observations with a fixed points table and dedup policy
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    table: PointsTable,
    dedup: DedupPolicy,
}

impl Aggregator {
    pub fn new(table: PointsTable, dedup: DedupPolicy) -> Self {
        Self { table, dedup }
    }

    pub fn table(&self) -> &PointsTable {
        &self.table
    }

    /// Total points per user, in first-seen order
    pub fn total_points<'a, I>(&self, observations: I) -> Leaderboard
    where
        I: IntoIterator<Item = &'a Observation>,
    {
        let mut board = Leaderboard::default();
        let mut positions: HashMap<&str, usize> = HashMap::new();

        for obs in self.dedup.apply(observations) {
            let points = self.table.points_for(obs.score);
            match positions.get(obs.user_id.as_str()) {
                Some(&pos) => {
                    let standing = &mut board.standings[pos];
                    standing.points = standing.points + points;
                }
                None => {
                    positions.insert(obs.user_id.as_str(), board.standings.len());
                    board.standings.push(Standing {
                        user_id: obs.user_id.clone(),
                        points,
                    });
                }
            }
        }

        board
    }

    /// Total points per user, highest first, without a cutoff
    pub fn ranked<'a, I>(&self, observations: I) -> Leaderboard
    where
        I: IntoIterator<Item = &'a Observation>,
    {
        let mut board = self.total_points(observations);
        board.sort_descending();
        board
    }

    /// The top `n` users, plus anyone tied with the user in position `n`
    pub fn top_n<'a, I>(&self, observations: I, n: usize) -> Leaderboard
    where
        I: IntoIterator<Item = &'a Observation>,
    {
        let mut board = self.ranked(observations);
        if n == 0 {
            board.standings.clear();
        } else if board.len() > n {
            let bound = board.standings[n - 1].points;
            board.standings.retain(|s| s.points >= bound);
        }
        board
    }
}
