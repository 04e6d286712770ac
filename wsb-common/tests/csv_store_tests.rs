//! CSV record store against real files

use chrono::DateTime;
use tempfile::TempDir;
use wsb_common::store::{CsvStore, RecordStore};
use wsb_common::{Error, Observation, ScoreToken};

fn observation(user: &str, edition: u32, score: ScoreToken) -> Observation {
    let ts = DateTime::parse_from_rfc3339("2022-02-12T09:15:00-05:00").unwrap();
    Observation::new(ts, user, edition, score)
}

#[tokio::test]
async fn test_missing_file_reads_empty() {
    let dir = TempDir::new().unwrap();
    let store = CsvStore::new(dir.path().join("scores.csv"));

    assert!(store.read_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_first_append_writes_header() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scores.csv");
    let store = CsvStore::new(&path);

    store.append(&observation("alice", 238, ScoreToken::Four)).await.unwrap();
    store.append(&observation("bob", 238, ScoreToken::Failed)).await.unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "date,username,wordle,score");
    assert_eq!(lines[1], "2022-02-12T09:15:00-05:00,alice,238,4/6");
    assert_eq!(lines[2], "2022-02-12T09:15:00-05:00,bob,238,X/6");
}

#[tokio::test]
async fn test_append_then_read_preserves_order() {
    let dir = TempDir::new().unwrap();
    let store = CsvStore::new(dir.path().join("scores.csv"));

    let written = vec![
        observation("alice", 238, ScoreToken::Four),
        observation("Bob, Jr", 238, ScoreToken::One),
        observation("alice", 239, ScoreToken::Six),
    ];
    for obs in &written {
        store.append(obs).await.unwrap();
    }

    assert_eq!(store.read_all().await.unwrap(), written);
}

#[tokio::test]
async fn test_corrupt_score_token_fails_read() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scores.csv");
    std::fs::write(
        &path,
        "date,username,wordle,score\n2022-02-12T09:15:00+00:00,alice,238,4/6\n2022-02-12T09:16:00+00:00,bob,238,8/6\n",
    )
    .unwrap();

    let store = CsvStore::new(&path);
    match store.read_all().await {
        Err(Error::InvalidScoreToken(token)) => assert_eq!(token, "8/6"),
        other => panic!("expected InvalidScoreToken, got {:?}", other),
    }
}

#[tokio::test]
async fn test_corrupt_row_reports_line() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scores.csv");
    std::fs::write(
        &path,
        "date,username,wordle,score\n\n2022-02-12T09:15:00+00:00,alice,238\n",
    )
    .unwrap();

    let store = CsvStore::new(&path);
    assert!(matches!(
        store.read_all().await,
        Err(Error::CorruptRecord { line: 3, .. })
    ));
}

#[tokio::test]
async fn test_concurrent_appends_all_land() {
    let dir = TempDir::new().unwrap();
    let store = std::sync::Arc::new(CsvStore::new(dir.path().join("scores.csv")));

    let mut handles = Vec::new();
    for i in 0..20u32 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .append(&observation(&format!("user{}", i), 300, ScoreToken::Three))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let rows = store.read_all().await.unwrap();
    assert_eq!(rows.len(), 20);
}

#[test]
fn test_describe_names_path() {
    let store = CsvStore::new("scores.csv");
    assert_eq!(store.describe(), "csv:scores.csv");
}
