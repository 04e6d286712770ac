//! Local delimited-text store
//!
//! One observation per line under a `date,username,wordle,score` header.
//! Fields containing a comma or quote are quoted, with embedded quotes
//! doubled.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{decode_row, encode_row, is_header, RecordStore, HEADER};
use crate::observation::Observation;
use crate::{Error, Result};

/// Append-only CSV file
pub struct CsvStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CsvStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl RecordStore for CsvStore {
    async fn append(&self, observation: &Observation) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let is_new = !tokio::fs::try_exists(&self.path).await?;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        let mut text = String::new();
        if is_new {
            debug!(path = %self.path.display(), "Creating score file");
            text.push_str(&format_line(&HEADER));
        }
        text.push_str(&format_line(&encode_row(observation)));

        file.write_all(text.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<Observation>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut observations = Vec::new();
        for (idx, raw) in content.lines().enumerate() {
            let line = idx + 1;
            if raw.trim().is_empty() {
                continue;
            }
            let fields = split_line(raw).map_err(|reason| Error::CorruptRecord { line, reason })?;
            if line == 1 && is_header(&fields) {
                continue;
            }
            match decode_row(line, &fields) {
                Ok(obs) => observations.push(obs),
                Err(e) => {
                    warn!(path = %self.path.display(), line, error = %e, "Unreadable score row");
                    return Err(e);
                }
            }
        }

        Ok(observations)
    }

    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }
}

fn format_line<S: AsRef<str>>(fields: &[S]) -> String {
    let mut line = fields
        .iter()
        .map(|f| quote_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}

fn quote_field(field: &str) -> String {
    // Rows are line-oriented; line breaks never survive into the file
    let field: String = field
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    if field.contains(',') || field.contains('"') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field
    }
}

fn split_line(line: &str) -> std::result::Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            ('"', true) => in_quotes = false,
            ('"', false) if current.is_empty() => in_quotes = true,
            (',', false) => fields.push(std::mem::take(&mut current)),
            (c, _) => current.push(c),
        }
    }

    if in_quotes {
        return Err("unterminated quoted field".to_string());
    }
    fields.push(current);
    Ok(fields)
}
