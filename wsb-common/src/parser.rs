//! Score report header parsing
//!
//! A score report starts with a header such as `Wordle 238 4/6`, usually
//! followed by the emoji grid. Only a header at the very start of the message
//! counts; anything after it is ignored.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::scoring::ScoreToken;

/// Edition and result extracted from a report header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreHeader {
    pub edition: u32,
    pub score: ScoreToken,
}

static HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Wordle ([0-9]+) ([1-6X])/6").expect("valid score header regex")
});

/// Parse the score header at the start of `text`
///
/// Returns `None` for ordinary chat, reports that are not at position 0,
/// truncated headers and illegal results such as `7/6`.
///
/// ```
/// use wsb_common::parser::parse_header;
/// use wsb_common::ScoreToken;
///
/// let header = parse_header("Wordle 238 4/6\n\n⬛🟨⬛⬛⬛").unwrap();
/// assert_eq!(header.edition, 238);
/// assert_eq!(header.score, ScoreToken::Four);
///
/// assert!(parse_header("see my Wordle 238 4/6").is_none());
/// ```
pub fn parse_header(text: &str) -> Option<ScoreHeader> {
    let caps = HEADER_RE.captures(text)?;
    // Editions beyond u32 are not real reports
    let edition = caps.get(1)?.as_str().parse::<u32>().ok()?;
    let score = ScoreToken::from_guess_char(caps.get(2)?.as_str().chars().next()?)?;
    Some(ScoreHeader { edition, score })
}
