//! Leaderboard rendering for chat
//!
//! Boards are shown as monospace tables inside `<pre>` blocks, so the
//! output is meant for Telegram's HTML parse mode.

use wsb_common::{EditionBoard, Leaderboard, PointsTable, Recap, Weekly};

const EMPTY_BOARD: &str = "No scores yet.";

/// Both recap boards, previous edition first
///
/// Scores are shown as tokens (`3/6`) where the total maps back to a single
/// result, otherwise as the raw point total.
pub fn render_recap(recap: &Recap, table: &PointsTable) -> String {
    format!(
        "{}\n\n{}",
        render_edition_board(&recap.previous, table),
        render_edition_board(&recap.latest, table)
    )
}

fn render_edition_board(board: &EditionBoard, table: &PointsTable) -> String {
    let rows = board
        .leaderboard
        .iter()
        .map(|s| {
            let score = table
                .points_to_score(s.points)
                .map(|token| token.to_string())
                .unwrap_or_else(|| s.points.to_string());
            (s.user_id.clone(), score)
        })
        .collect();
    format!("<b>Wordle {}</b>\n{}", board.edition, render_table(("user", "score"), rows))
}

/// The weekly board with point totals
pub fn render_weekly(weekly: &Weekly) -> String {
    format!(
        "<b>Wordle {} - {}</b>\n{}",
        weekly.window.start,
        weekly.window.end,
        render_points(&weekly.leaderboard)
    )
}

fn render_points(board: &Leaderboard) -> String {
    let rows = board
        .iter()
        .map(|s| (s.user_id.clone(), s.points.to_string()))
        .collect();
    render_table(("user", "points"), rows)
}

fn render_table(headers: (&str, &str), rows: Vec<(String, String)>) -> String {
    if rows.is_empty() {
        return EMPTY_BOARD.to_string();
    }

    let width = rows
        .iter()
        .map(|(user, _)| user.chars().count())
        .chain(std::iter::once(headers.0.len()))
        .max()
        .unwrap_or_default();

    let mut out = String::from("<pre>");
    out.push_str(&format_row(headers.0, headers.1, width));
    for (user, value) in &rows {
        out.push('\n');
        out.push_str(&format_row(user, value, width));
    }
    out.push_str("</pre>");
    out
}

fn format_row(left: &str, right: &str, width: usize) -> String {
    let pad = width.saturating_sub(left.chars().count());
    format!("{}{}  {}", escape_html(left), " ".repeat(pad), escape_html(right))
}

/// Escape text for Telegram's HTML parse mode
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
