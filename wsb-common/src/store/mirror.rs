//! Primary store with a best-effort copy
//!
//! Appends go to the mirror first and then to the primary, so the local
//! copy keeps every score even while the primary is down. Reads come from
//! the primary only. A failed mirror append is logged and otherwise ignored.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use super::RecordStore;
use crate::observation::Observation;
use crate::Result;

pub struct MirroredStore {
    primary: Arc<dyn RecordStore>,
    mirror: Arc<dyn RecordStore>,
}

impl MirroredStore {
    pub fn new(primary: Arc<dyn RecordStore>, mirror: Arc<dyn RecordStore>) -> Self {
        Self { primary, mirror }
    }
}

#[async_trait]
impl RecordStore for MirroredStore {
    async fn append(&self, observation: &Observation) -> Result<()> {
        if let Err(e) = self.mirror.append(observation).await {
            warn!(
                mirror = %self.mirror.describe(),
                error = %e,
                "Mirror append failed"
            );
        }
        self.primary.append(observation).await
    }

    async fn read_all(&self) -> Result<Vec<Observation>> {
        self.primary.read_all().await
    }

    fn describe(&self) -> String {
        format!("{} (mirrored to {})", self.primary.describe(), self.mirror.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::{Error, ScoreToken};
    use chrono::DateTime;

    struct BrokenStore;

    #[async_trait]
    impl RecordStore for BrokenStore {
        async fn append(&self, _observation: &Observation) -> Result<()> {
            Err(Error::Sheet {
                status: 503,
                message: "unavailable".to_string(),
            })
        }

        async fn read_all(&self) -> Result<Vec<Observation>> {
            Err(Error::Sheet {
                status: 503,
                message: "unavailable".to_string(),
            })
        }

        fn describe(&self) -> String {
            "broken".to_string()
        }
    }

    fn sample() -> Observation {
        let ts = DateTime::parse_from_rfc3339("2022-02-12T08:30:00+00:00").unwrap();
        Observation::new(ts, "alice", 238, ScoreToken::Two)
    }

    #[tokio::test]
    async fn test_appends_to_both() {
        let primary = Arc::new(MemoryStore::new());
        let mirror = Arc::new(MemoryStore::new());
        let store = MirroredStore::new(primary.clone(), mirror.clone());

        store.append(&sample()).await.unwrap();

        assert_eq!(primary.read_all().await.unwrap().len(), 1);
        assert_eq!(mirror.read_all().await.unwrap().len(), 1);
        assert_eq!(store.read_all().await.unwrap(), vec![sample()]);
    }

    #[tokio::test]
    async fn test_mirror_failure_is_not_fatal() {
        let primary = Arc::new(MemoryStore::new());
        let store = MirroredStore::new(primary.clone(), Arc::new(BrokenStore));

        store.append(&sample()).await.unwrap();
        assert_eq!(primary.read_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_primary_failure_is_fatal_but_mirror_keeps_row() {
        let mirror = Arc::new(MemoryStore::new());
        let store = MirroredStore::new(Arc::new(BrokenStore), mirror.clone());

        assert!(store.append(&sample()).await.is_err());
        assert!(store.read_all().await.is_err());
        assert_eq!(mirror.read_all().await.unwrap(), vec![sample()]);
    }
}
