//! Google Sheets store
//!
//! Uses the Sheets v4 values API: `values/{range}` to read every row and
//! `values/{range}:append` to add one. The sheet carries the same four
//! columns as the CSV file, with a header row in the first line.

use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{decode_row, encode_row, is_header, RecordStore, HEADER};
use crate::observation::Observation;
use crate::{Error, Result};

const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com";
const REQUEST_TIMEOUT_SECS: u64 = 30;

static SPREADSHEET_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/spreadsheets/d/([A-Za-z0-9_-]+)").expect("valid spreadsheet id regex")
});

/// Body of a values read or append
#[derive(Debug, Default, Deserialize, Serialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Spreadsheet-backed record store
pub struct SheetStore {
    http_client: reqwest::Client,
    base_url: String,
    spreadsheet_id: String,
    range: String,
    access_token: String,
    /// Whether the sheet is known to start with a header row; locked for
    /// the whole of each append
    header_checked: Mutex<bool>,
}

impl SheetStore {
    /// `sheet` is either the full sheet URL or a bare spreadsheet id
    pub fn new(sheet: &str, access_token: &str, range: &str) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http_client,
            base_url: SHEETS_BASE_URL.to_string(),
            spreadsheet_id: spreadsheet_id(sheet)?,
            range: range.to_string(),
            access_token: access_token.to_string(),
            header_checked: Mutex::new(false),
        })
    }

    /// Point the store at a different API host
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn values_url(&self, suffix: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}{}",
            self.base_url,
            self.spreadsheet_id,
            urlencoding::encode(&self.range),
            suffix
        )
    }

    async fn fetch_rows(&self) -> Result<Vec<Vec<String>>> {
        let url = self.values_url("");
        debug!(url = %url, "Reading sheet values");

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let body: ValueRange = check_status(response).await?.json().await?;

        Ok(body
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }

    async fn append_rows(&self, rows: Vec<Vec<Value>>) -> Result<()> {
        let url = self.values_url(":append?valueInputOption=RAW&insertDataOption=INSERT_ROWS");
        debug!(url = %url, rows = rows.len(), "Appending sheet rows");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&ValueRange { values: rows })
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for SheetStore {
    async fn append(&self, observation: &Observation) -> Result<()> {
        let mut header_checked = self.header_checked.lock().await;
        let mut rows = Vec::with_capacity(2);

        if !*header_checked && self.fetch_rows().await?.is_empty() {
            debug!(sheet = %self.spreadsheet_id, "Sheet is empty, writing header row");
            rows.push(HEADER.iter().map(|h| Value::String(h.to_string())).collect());
        }

        rows.push(encode_row(observation).into_iter().map(Value::String).collect());
        self.append_rows(rows).await?;
        *header_checked = true;
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<Observation>> {
        let rows = self.fetch_rows().await?;

        let mut observations = Vec::with_capacity(rows.len());
        for (idx, row) in rows.iter().enumerate() {
            let line = idx + 1;
            if row.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }
            if line == 1 && is_header(row) {
                continue;
            }
            match decode_row(line, row) {
                Ok(obs) => observations.push(obs),
                Err(e) => {
                    warn!(sheet = %self.spreadsheet_id, line, error = %e, "Unreadable score row");
                    return Err(e);
                }
            }
        }

        Ok(observations)
    }

    fn describe(&self) -> String {
        format!("sheet:{}", self.spreadsheet_id)
    }
}

/// Extract the spreadsheet id from a sheet URL, or accept a bare id
pub fn spreadsheet_id(sheet: &str) -> Result<String> {
    if let Some(caps) = SPREADSHEET_ID_RE.captures(sheet) {
        return Ok(caps[1].to_string());
    }
    let bare = sheet.trim();
    if !bare.is_empty() && bare.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Ok(bare.to_string());
    }
    Err(Error::Config(format!("Cannot find a spreadsheet id in {:?}", sheet)))
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(Error::Sheet {
        status: status.as_u16(),
        message,
    })
}

fn cell_text(cell: Value) -> String {
    match cell {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spreadsheet_id_from_url() {
        let url = "https://docs.google.com/spreadsheets/d/1AbC-d_E2/edit#gid=0";
        assert_eq!(spreadsheet_id(url).unwrap(), "1AbC-d_E2");
    }

    #[test]
    fn test_spreadsheet_id_bare() {
        assert_eq!(spreadsheet_id("1AbC-d_E2").unwrap(), "1AbC-d_E2");
    }

    #[test]
    fn test_spreadsheet_id_rejects_other_urls() {
        assert!(spreadsheet_id("https://example.com/nothing here").is_err());
        assert!(spreadsheet_id("").is_err());
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(Value::String("a".into())), "a");
        assert_eq!(cell_text(serde_json::json!(238)), "238");
        assert_eq!(cell_text(Value::Null), "");
    }

    #[test]
    fn test_value_range_without_values() {
        let body: ValueRange = serde_json::from_str(r#"{"range":"Sheet1!A1:Z1000","majorDimension":"ROWS"}"#).unwrap();
        assert!(body.values.is_empty());
    }

    #[test]
    fn test_values_url() {
        let store = SheetStore::new("abc", "token", "Sheet1")
            .unwrap()
            .with_base_url("http://127.0.0.1:9000/");
        assert_eq!(store.values_url(""), "http://127.0.0.1:9000/v4/spreadsheets/abc/values/Sheet1");
    }

    #[test]
    fn test_values_url_encodes_range() {
        let store = SheetStore::new("abc", "token", "Scores 2022!A:D")
            .unwrap()
            .with_base_url("http://127.0.0.1:9000");
        assert_eq!(
            store.values_url(":append"),
            "http://127.0.0.1:9000/v4/spreadsheets/abc/values/Scores%202022%21A%3AD:append"
        );
    }
}
