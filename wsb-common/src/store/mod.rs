//! Record stores: append-only persistence for observations
//!
//! The scoring engine only ever sees a `Vec<Observation>`; where it came from
//! is decided once at startup by [`open`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use tracing::info;

use crate::config::{StoreBackend, StoreConfig};
use crate::observation::Observation;
use crate::scoring::ScoreToken;
use crate::{Error, Result};

pub mod csv;
pub mod memory;
pub mod mirror;
pub mod sheet;

pub use self::csv::CsvStore;
pub use memory::MemoryStore;
pub use mirror::MirroredStore;
pub use sheet::SheetStore;

/// Column names shared by every backend
pub const HEADER: [&str; 4] = ["date", "username", "wordle", "score"];

/// Append-only observation log
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist one observation
    async fn append(&self, observation: &Observation) -> Result<()>;

    /// Snapshot of every stored observation, in append order
    async fn read_all(&self) -> Result<Vec<Observation>>;

    /// Short human-readable description for logs
    fn describe(&self) -> String;
}

/// Build the configured store
pub fn open(config: &StoreConfig) -> Result<Arc<dyn RecordStore>> {
    let store: Arc<dyn RecordStore> = match config.backend {
        StoreBackend::Csv => Arc::new(CsvStore::new(&config.csv_path)),
        StoreBackend::Sheet => {
            let url = config
                .sheet_url
                .as_deref()
                .ok_or_else(|| Error::Config("store.sheet_url is not set".to_string()))?;
            let token = config
                .sheet_token
                .as_deref()
                .ok_or_else(|| Error::Config("store.sheet_token is not set".to_string()))?;
            let sheet: Arc<dyn RecordStore> = Arc::new(SheetStore::new(url, token, &config.sheet_range)?);

            if config.local_mirror {
                Arc::new(MirroredStore::new(sheet, Arc::new(CsvStore::new(&config.csv_path))))
            } else {
                sheet
            }
        }
    };

    info!(store = %store.describe(), "Record store ready");
    Ok(store)
}

/// Encode an observation as a store row
pub fn encode_row(observation: &Observation) -> [String; 4] {
    [
        observation.timestamp.to_rfc3339(),
        observation.user_id.clone(),
        observation.edition.to_string(),
        observation.score.to_string(),
    ]
}

/// Decode a store row; `line` is the 1-based row number used in errors
pub fn decode_row<S: AsRef<str>>(line: usize, fields: &[S]) -> Result<Observation> {
    let [date, user, edition, score] = fields else {
        return Err(Error::CorruptRecord {
            line,
            reason: format!("expected 4 fields, found {}", fields.len()),
        });
    };

    let timestamp = DateTime::parse_from_rfc3339(date.as_ref().trim()).map_err(|e| Error::CorruptRecord {
        line,
        reason: format!("bad date {:?}: {}", date.as_ref(), e),
    })?;
    let edition = edition.as_ref().trim().parse::<u32>().map_err(|e| Error::CorruptRecord {
        line,
        reason: format!("bad edition {:?}: {}", edition.as_ref(), e),
    })?;
    let score: ScoreToken = score.as_ref().trim().parse()?;

    Ok(Observation::new(timestamp, user.as_ref(), edition, score))
}

/// True when a row is the column header
pub fn is_header<S: AsRef<str>>(fields: &[S]) -> bool {
    fields.len() == HEADER.len()
        && fields
            .iter()
            .zip(HEADER)
            .all(|(field, name)| field.as_ref().trim() == name)
}
