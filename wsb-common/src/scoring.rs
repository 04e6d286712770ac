//! Score tokens and the points table
//!
//! A Wordle result is one of seven tokens: `1/6` through `6/6` for a solve in
//! that many guesses, or `X/6` for a failure. Each token is worth a fixed
//! number of points:
//!
//! | score | points |
//! |:-----:|:------:|
//! |  1/6  |    6   |
//! |  2/6  |    5   |
//! |  3/6  |    4   |
//! |  4/6  |    3   |
//! |  5/6  |    2   |
//! |  6/6  |    1   |
//! |  X/6  |   0.5  |
//!
//! Points are kept as a count of half points so that sums, equality and
//! ordering stay exact.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use crate::{Error, Result};

/// One of the seven legal Wordle results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ScoreToken {
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    /// Not solved within six guesses
    Failed,
}

impl ScoreToken {
    /// All tokens, best first
    pub const ALL: [ScoreToken; 7] = [
        ScoreToken::One,
        ScoreToken::Two,
        ScoreToken::Three,
        ScoreToken::Four,
        ScoreToken::Five,
        ScoreToken::Six,
        ScoreToken::Failed,
    ];

    /// Textual form as it appears in a score report
    pub fn as_str(self) -> &'static str {
        match self {
            ScoreToken::One => "1/6",
            ScoreToken::Two => "2/6",
            ScoreToken::Three => "3/6",
            ScoreToken::Four => "4/6",
            ScoreToken::Five => "5/6",
            ScoreToken::Six => "6/6",
            ScoreToken::Failed => "X/6",
        }
    }

    /// Token for the guess character in a report header (`1`..`6` or `X`)
    pub fn from_guess_char(c: char) -> Option<Self> {
        match c {
            '1' => Some(ScoreToken::One),
            '2' => Some(ScoreToken::Two),
            '3' => Some(ScoreToken::Three),
            '4' => Some(ScoreToken::Four),
            '5' => Some(ScoreToken::Five),
            '6' => Some(ScoreToken::Six),
            'X' => Some(ScoreToken::Failed),
            _ => None,
        }
    }

    fn index(self) -> usize {
        match self {
            ScoreToken::One => 0,
            ScoreToken::Two => 1,
            ScoreToken::Three => 2,
            ScoreToken::Four => 3,
            ScoreToken::Five => 4,
            ScoreToken::Six => 5,
            ScoreToken::Failed => 6,
        }
    }
}

impl fmt::Display for ScoreToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoreToken {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ScoreToken::ALL
            .into_iter()
            .find(|token| token.as_str() == s)
            .ok_or_else(|| Error::InvalidScoreToken(s.to_string()))
    }
}

impl TryFrom<String> for ScoreToken {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ScoreToken> for String {
    fn from(token: ScoreToken) -> Self {
        token.as_str().to_string()
    }
}

/// A non-negative multiple of half a point
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Points(u32);

impl Points {
    pub const ZERO: Points = Points(0);

    /// Whole number of points
    pub const fn whole(points: u32) -> Self {
        Points(points * 2)
    }

    pub const fn from_half_points(half_points: u32) -> Self {
        Points(half_points)
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 2.0
    }
}

impl Add for Points {
    type Output = Points;

    fn add(self, rhs: Points) -> Points {
        Points(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Points {
    fn sum<I: Iterator<Item = Points>>(iter: I) -> Points {
        iter.fold(Points::ZERO, Add::add)
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 2;
        if self.0 % 2 == 0 {
            write!(f, "{}", whole)
        } else {
            write!(f, "{}.5", whole)
        }
    }
}

impl Serialize for Points {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.0 % 2 == 0 {
            serializer.serialize_u32(self.0 / 2)
        } else {
            serializer.serialize_f64(self.as_f64())
        }
    }
}

/// Immutable mapping from score token to points
///
/// Built once at startup and handed to the [`crate::Aggregator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointsTable {
    values: [Points; 7],
}

impl PointsTable {
    /// The standard table: 6 points for a first-guess solve down to 1 point
    /// for a sixth-guess solve, and half a point for a failure
    pub const fn standard() -> Self {
        Self {
            values: [
                Points::whole(6),
                Points::whole(5),
                Points::whole(4),
                Points::whole(3),
                Points::whole(2),
                Points::whole(1),
                Points::from_half_points(1),
            ],
        }
    }

    /// Points for a typed token
    pub fn points_for(&self, token: ScoreToken) -> Points {
        self.values[token.index()]
    }

    /// Points for a textual token
    ///
    /// Fails with [`Error::InvalidScoreToken`] for anything other than the
    /// seven legal tokens.
    pub fn score_to_points(&self, token: &str) -> Result<Points> {
        let token: ScoreToken = token.parse()?;
        Ok(self.points_for(token))
    }

    /// Inverse of [`PointsTable::points_for`]
    ///
    /// Returns `None` when `points` is not exactly one of the table values.
    /// Aggregated sums frequently land here (6 + 6 = 12 has no single-game
    /// equivalent); callers display the raw number in that case.
    pub fn points_to_score(&self, points: Points) -> Option<ScoreToken> {
        ScoreToken::ALL
            .into_iter()
            .find(|token| self.points_for(*token) == points)
    }
}

impl Default for PointsTable {
    fn default() -> Self {
        Self::standard()
    }
}
